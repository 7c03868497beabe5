use super::{SuggestionType, TypeProfile};
use crate::matchers::{MatchContext, Matcher, SameParent, Strategy};
use crate::utils::json_path::deep_text;
use serde_json::Value;

static MATCHERS: [Matcher; 2] = [
    Matcher::new(Strategy::NormalizedQuery, MatchContext::EMPTY),
    Matcher::new(Strategy::Words(SameParent::Raw), MatchContext::EMPTY),
];

pub struct ProfessionsProfile;

impl TypeProfile for ProfessionsProfile {
    fn kind(&self) -> SuggestionType {
        SuggestionType::Professions
    }

    fn matchers(&self) -> &'static [Matcher] {
        &MATCHERS
    }

    fn field_names(&self) -> &'static [(&'static str, &'static str)] {
        &[("profession", "должность")]
    }

    fn always_continue_selecting(&self) -> bool {
        true
    }

    fn compose_value(&self, data: &Value) -> Option<String> {
        Some(deep_text(data, "profession").unwrap_or_default())
    }
}
