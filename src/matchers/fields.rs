use super::MatchContext;
use crate::models::Suggestion;
use crate::utils::tokens::{is_subset, word_tokens};

pub fn match_by_fields(
    query: &str,
    suggestions: &[Suggestion],
    context: &MatchContext<'_>,
) -> Option<usize> {
    let [suggestion] = suggestions else {
        return None;
    };
    let query_tokens = word_tokens(query, context.stopwords);
    if query_tokens.is_empty() {
        return None;
    }

    let field_tokens: Vec<String> = context
        .field_stopwords
        .iter()
        .filter_map(|(path, stopwords)| {
            suggestion
                .field_text(path)
                .map(|text| word_tokens(&text, *stopwords))
        })
        .flatten()
        .collect();

    is_subset(&query_tokens, &field_tokens).then_some(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::stopwords::ADDRESS_STOPWORDS;
    use crate::utils::tokens::Stopwords;
    use serde_json::json;

    fn party() -> Suggestion {
        Suggestion::new(
            "ПАО Сбербанк",
            Some(json!({
                "inn": "7707083893",
                "address": {"value": "г Москва, ул Вавилова, д 19"}
            })),
        )
    }

    fn fields() -> Vec<(&'static str, Option<&'static Stopwords>)> {
        vec![
            ("value", None),
            ("data.address.value", Some(&*ADDRESS_STOPWORDS)),
            ("data.inn", None),
        ]
    }

    #[test]
    fn words_spread_over_fields_match() {
        let fields = fields();
        let ctx = MatchContext::with_fields(&fields);
        let suggestions = [party()];
        assert_eq!(match_by_fields("сбербанк 7707083893", &suggestions, &ctx), Some(0));
        assert_eq!(match_by_fields("сбербанк вавилова", &suggestions, &ctx), Some(0));
    }

    #[test]
    fn missing_word_does_not_match() {
        let fields = fields();
        let ctx = MatchContext::with_fields(&fields);
        assert_eq!(match_by_fields("сбербанк тверская", &[party()], &ctx), None);
    }

    #[test]
    fn several_candidates_never_match() {
        let fields = fields();
        let ctx = MatchContext::with_fields(&fields);
        assert_eq!(match_by_fields("сбербанк", &[party(), party()], &ctx), None);
        assert_eq!(match_by_fields("сбербанк", &[], &ctx), None);
    }

    #[test]
    fn absent_data_fields_are_skipped() {
        let fields = fields();
        let ctx = MatchContext::with_fields(&fields);
        let plain = [Suggestion::plain("ООО Ромашка")];
        assert_eq!(match_by_fields("ромашка", &plain, &ctx), Some(0));
        assert_eq!(match_by_fields("ромашка 123", &plain, &ctx), None);
    }
}
