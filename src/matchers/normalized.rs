use super::MatchContext;
use crate::models::Suggestion;
use crate::utils::tokens::{normalize, string_encloses};

pub fn match_by_normalized_query(
    query: &str,
    suggestions: &[Suggestion],
    context: &MatchContext<'_>,
) -> Option<usize> {
    let query_lower = query.to_lowercase();
    let normalized_query = normalize(&query_lower, context.stopwords);
    if normalized_query.is_empty() {
        return None;
    }

    let mut matches = Vec::new();
    let mut extended = false;
    for (idx, suggestion) in suggestions.iter().enumerate() {
        let suggested = suggestion.value.to_lowercase();
        if string_encloses(&query_lower, &suggested) {
            return None;
        }
        if suggested.find(&normalized_query).map(|pos| pos > 0).unwrap_or(false) {
            return None;
        }
        let normalized_suggestion = normalize(&suggested, context.stopwords);
        if normalized_suggestion == normalized_query {
            matches.push(idx);
        } else if normalized_suggestion.starts_with(&normalized_query) {
            extended = true;
        }
    }

    match matches.as_slice() {
        [single] if !extended => Some(*single),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::stopwords::ADDRESS_STOPWORDS;

    fn plain(values: &[&str]) -> Vec<Suggestion> {
        values.iter().map(|v| Suggestion::plain(*v)).collect()
    }

    #[test]
    fn equal_value_matches() {
        let ctx = MatchContext::default();
        assert_eq!(match_by_normalized_query("Moscow", &plain(&["Moscow"]), &ctx), Some(0));
        assert_eq!(match_by_normalized_query("moscow", &plain(&["MOSCOW"]), &ctx), Some(0));
    }

    #[test]
    fn longer_suggestion_makes_match_ambiguous() {
        let ctx = MatchContext::default();
        let suggestions = plain(&["Moscow", "Moscow region"]);
        assert_eq!(match_by_normalized_query("Moscow", &suggestions, &ctx), None);
    }

    #[test]
    fn duplicate_values_are_ambiguous() {
        let ctx = MatchContext::default();
        let suggestions = plain(&["Иванов", "Иванов"]);
        assert_eq!(match_by_normalized_query("Иванов", &suggestions, &ctx), None);
    }

    #[test]
    fn query_enclosing_suggestion_stops_matching() {
        let ctx = MatchContext::default();
        let suggestions = plain(&["Moscow", "Moscow region"]);
        assert_eq!(match_by_normalized_query("Moscow region 1", &suggestions, &ctx), None);
    }

    #[test]
    fn query_inside_suggestion_stops_matching() {
        let ctx = MatchContext::default();
        let suggestions = plain(&["Tver", "New Tver"]);
        assert_eq!(match_by_normalized_query("Tver", &suggestions, &ctx), None);
    }

    #[test]
    fn stopwords_are_ignored_on_both_sides() {
        let ctx = MatchContext::with_stopwords(&ADDRESS_STOPWORDS);
        let suggestions = plain(&["г Москва, ул Ленина"]);
        assert_eq!(
            match_by_normalized_query("Москва ул Ленина", &suggestions, &ctx),
            Some(0)
        );
        let without = MatchContext::default();
        assert_eq!(
            match_by_normalized_query("Москва ул Ленина", &suggestions, &without),
            None
        );
    }

    #[test]
    fn round_trip_single_candidate() {
        let ctx = MatchContext::default();
        for value in ["Иван Иванович", "ул. Ленина, 5", "a-b/c"] {
            let suggestions = plain(&[value]);
            assert_eq!(match_by_normalized_query(value, &suggestions, &ctx), Some(0), "{}", value);
        }
    }
}
