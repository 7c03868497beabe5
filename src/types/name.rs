use super::bounds::Bounds;
use super::{SuggestionType, TypeProfile};
use crate::constants::delimiters::is_word_delimiter;
use crate::matchers::{MatchContext, Matcher, SameParent, Strategy};
use crate::models::{Suggestion, SuggestionsOptions};
use crate::utils::json_path::{compact_join, deep_text, fields_not_empty};
use serde_json::Value;

static MATCHERS: [Matcher; 2] = [
    Matcher::new(Strategy::NormalizedQuery, MatchContext::EMPTY),
    Matcher::new(Strategy::Words(SameParent::Raw), MatchContext::EMPTY),
];

pub struct NameProfile;

impl TypeProfile for NameProfile {
    fn kind(&self) -> SuggestionType {
        SuggestionType::Name
    }

    fn matchers(&self) -> &'static [Matcher] {
        &MATCHERS
    }

    fn field_names(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("surname", "фамилия"),
            ("name", "имя"),
            ("patronymic", "отчество"),
        ]
    }

    fn always_continue_selecting(&self) -> bool {
        true
    }

    fn is_data_complete(
        &self,
        suggestion: &Suggestion,
        options: &SuggestionsOptions,
        _bounds: &Bounds,
    ) -> bool {
        let Some(data) = suggestion.data_object() else {
            return false;
        };
        let parts: Option<Vec<String>> = options
            .params
            .get("parts")
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_lowercase)
                    .collect()
            });
        let fields: Vec<String> = match parts {
            Some(parts) => parts,
            None => {
                let mut fields = vec!["surname".to_string(), "name".to_string()];
                if value_starts_with(suggestion, "surname") {
                    fields.push("patronymic".to_string());
                }
                fields
            }
        };
        let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
        fields_not_empty(data, &fields)
    }

    fn compose_value(&self, data: &Value) -> Option<String> {
        let value = compact_join(
            ["surname", "name", "patronymic"].map(|field| deep_text(data, field)),
            " ",
        );
        Some(value)
    }
}

fn value_starts_with(suggestion: &Suggestion, field: &str) -> bool {
    let Some(field_value) = suggestion.data_text(field) else {
        return false;
    };
    let value = suggestion.value.to_lowercase();
    let field_value = field_value.to_lowercase();
    match value.strip_prefix(field_value.as_str()) {
        Some(rest) => rest.chars().next().map(is_word_delimiter).unwrap_or(true),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person(value: &str, data: Value) -> Suggestion {
        Suggestion::new(value, Some(data))
    }

    #[test]
    fn surname_first_requires_patronymic() {
        let options = SuggestionsOptions::for_type("NAME");
        let bounds = Bounds::default();
        let partial = person("Иванов Иван", json!({"surname": "Иванов", "name": "Иван"}));
        assert!(!NameProfile.is_data_complete(&partial, &options, &bounds));

        let full = person(
            "Иванов Иван Иванович",
            json!({"surname": "Иванов", "name": "Иван", "patronymic": "Иванович"}),
        );
        assert!(NameProfile.is_data_complete(&full, &options, &bounds));
    }

    #[test]
    fn name_first_skips_patronymic() {
        let options = SuggestionsOptions::for_type("NAME");
        let suggestion = person("Иван Иванов", json!({"surname": "Иванов", "name": "Иван"}));
        assert!(NameProfile.is_data_complete(&suggestion, &options, &Bounds::default()));
    }

    #[test]
    fn parts_param_overrides_required_fields() {
        let mut options = SuggestionsOptions::for_type("NAME");
        options.params.insert("parts".to_string(), json!(["NAME"]));
        let suggestion = person("Иван", json!({"name": "Иван"}));
        assert!(NameProfile.is_data_complete(&suggestion, &options, &Bounds::default()));
        assert!(!NameProfile.is_data_complete(&Suggestion::plain("Иван"), &options, &Bounds::default()));
    }

    #[test]
    fn composes_full_name() {
        let data = json!({"surname": "Иванов", "name": "Иван", "patronymic": null});
        assert_eq!(NameProfile.compose_value(&data).as_deref(), Some("Иванов Иван"));
    }
}
