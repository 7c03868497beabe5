use super::party::formatted_address;
use super::{SuggestionType, TypeProfile};
use crate::highlight::markup::{format_value, highlight_html, subtext};
use crate::matchers::{MatchContext, Matcher, SameParent, Strategy};
use crate::models::Suggestion;

static MATCHERS: [Matcher; 1] = [Matcher::new(
    Strategy::Words(SameParent::Raw),
    MatchContext::EMPTY,
)];

pub struct BankProfile;

impl TypeProfile for BankProfile {
    fn kind(&self) -> SuggestionType {
        SuggestionType::Bank
    }

    fn matchers(&self) -> &'static [Matcher] {
        &MATCHERS
    }

    fn format_selected(&self, suggestion: &Suggestion) -> Option<String> {
        suggestion.data_text("name.payment")
    }

    fn format_result(&self, suggestion: &Suggestion, query: &str, max_length: Option<usize>) -> String {
        let bic = suggestion
            .data_text("bic")
            .map(|bic| highlight_html(&bic, query, None, None))
            .unwrap_or_default();
        let address = formatted_address(suggestion, query);

        let mut html = format_value(suggestion, query, None, max_length);
        if !bic.is_empty() || !address.is_empty() {
            html.push_str(&subtext(&bic, &address));
        }
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bank() -> Suggestion {
        Suggestion::new(
            "Сбербанк России",
            Some(json!({
                "bic": "044525225",
                "name": {"payment": "ПАО СБЕРБАНК"},
                "address": {"value": "117997, г Москва, ул Вавилова, д 19"}
            })),
        )
    }

    #[test]
    fn selects_payment_name() {
        assert_eq!(BankProfile.format_selected(&bank()).as_deref(), Some("ПАО СБЕРБАНК"));
        assert_eq!(BankProfile.format_selected(&Suggestion::plain("x")), None);
    }

    #[test]
    fn subtext_carries_bic_and_address() {
        let html = BankProfile.format_result(&bank(), "0445", None);
        assert!(html.contains("<span class=\"suggestions-subtext suggestions-subtext_inline\"><strong>0445</strong>25225</span>"));
        assert!(html.contains("Вавилова"));
    }
}
