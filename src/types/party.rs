use super::stopwords::ADDRESS_STOPWORDS;
use super::{SuggestionType, TypeProfile};
use crate::highlight::markup::{
    choose_formatted, group_digits, highlight_html, strip_postal_prefix, subtext,
    wrap_formatted_value,
};
use crate::matchers::{MatchContext, Matcher, Strategy};
use crate::models::Suggestion;
use crate::utils::tokens::Stopwords;
use once_cell::sync::Lazy;

static FIELDS: Lazy<Vec<(&'static str, Option<&'static Stopwords>)>> = Lazy::new(|| {
    vec![
        ("value", None),
        ("data.address.value", Some(&*ADDRESS_STOPWORDS)),
        ("data.inn", None),
    ]
});

static MATCHERS: Lazy<[Matcher; 1]> =
    Lazy::new(|| [Matcher::new(Strategy::Fields, MatchContext::with_fields(FIELDS.as_slice()))]);

fn inn_groups(party_type: Option<&str>) -> Option<&'static [usize]> {
    match party_type {
        Some("LEGAL") => Some(&[2, 2, 5, 1]),
        Some("INDIVIDUAL") => Some(&[2, 2, 6, 2]),
        _ => None,
    }
}

pub struct PartyProfile;

impl PartyProfile {
    fn formatted_inn(&self, suggestion: &Suggestion, query: &str) -> String {
        let Some(inn) = suggestion.data_text("inn") else {
            return String::new();
        };
        let formatted = highlight_html(&inn, query, None, None);
        match inn_groups(suggestion.data_text("type").as_deref()) {
            Some(groups) => group_digits(&formatted, groups),
            None => formatted,
        }
    }
}

pub(crate) fn formatted_address(suggestion: &Suggestion, query: &str) -> String {
    match suggestion.data_text("address.value") {
        Some(address) => highlight_html(
            &strip_postal_prefix(&address),
            query,
            Some(&*ADDRESS_STOPWORDS),
            None,
        ),
        None => String::new(),
    }
}

fn highlighted_field(suggestion: &Suggestion, path: &str, query: &str) -> String {
    suggestion
        .data_text(path)
        .map(|text| highlight_html(&text, query, None, None))
        .unwrap_or_default()
}

impl TypeProfile for PartyProfile {
    fn kind(&self) -> SuggestionType {
        SuggestionType::Party
    }

    fn matchers(&self) -> &'static [Matcher] {
        MATCHERS.as_slice()
    }

    fn geo_enabled(&self) -> bool {
        true
    }

    fn format_result(&self, suggestion: &Suggestion, query: &str, max_length: Option<usize>) -> String {
        let inn_or_ogrn = choose_formatted(
            self.formatted_inn(suggestion, query),
            highlighted_field(suggestion, "ogrn", query),
        );
        let manager = highlighted_field(suggestion, "management.name", query);
        let address = formatted_address(suggestion, query);

        let name = choose_formatted(
            highlight_html(&suggestion.value, query, None, max_length),
            highlighted_field(suggestion, "name.latin", query),
        );
        let mut html = wrap_formatted_value(&name, suggestion);

        if !inn_or_ogrn.is_empty() || !address.is_empty() || !manager.is_empty() {
            html.push_str(&subtext(&inn_or_ogrn, &choose_formatted(address, manager)));
        }
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sberbank() -> Suggestion {
        Suggestion::new(
            "ПАО СБЕРБАНК",
            Some(json!({
                "inn": "7707083893",
                "ogrn": "1027700132195",
                "type": "LEGAL",
                "address": {"value": "117997, г Москва, ул Вавилова, д 19"},
                "management": {"name": "Греф Герман Оскарович"}
            })),
        )
    }

    #[test]
    fn matches_by_inn_and_address() {
        let suggestions = [sberbank()];
        let matcher = PartyProfile.matchers()[0];
        assert_eq!(matcher.find("сбербанк 7707083893", &suggestions), Some(0));
        assert_eq!(matcher.find("сбербанк вавилова", &suggestions), Some(0));
        assert_eq!(matcher.find("сбербанк тверская", &suggestions), None);
    }

    #[test]
    fn subtext_shows_grouped_inn_and_address() {
        let html = PartyProfile.format_result(&sberbank(), "7707", None);
        assert!(html.starts_with("<span class=\"suggestions-value\">ПАО СБЕРБАНК</span>"));
        assert!(html.contains("<strong>77"));
        assert!(html.contains("suggestions-subtext-delimiter"));
        assert!(html.contains("г Москва"));
        assert!(!html.contains("117997"));
    }

    #[test]
    fn manager_replaces_address_when_it_matches() {
        let html = PartyProfile.format_result(&sberbank(), "греф", None);
        assert!(html.contains("<strong>Греф</strong>"));
        assert!(!html.contains("Вавилова"));
    }

    #[test]
    fn plain_party_has_no_subtext() {
        let html = PartyProfile.format_result(&Suggestion::plain("ООО Ромашка"), "ром", None);
        assert_eq!(
            html,
            "<span class=\"suggestions-value\">ООО <strong>Ром</strong>ашка</span>"
        );
    }
}
