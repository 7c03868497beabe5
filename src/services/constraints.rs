use crate::constants::location;
use crate::models::ConstraintOption;
use crate::types::TypeProfile;
use crate::utils::json_path::is_truthy;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constraint {
    pub id: String,
    pub label: Option<String>,
    pub locations: Vec<Value>,
    pub deletable: bool,
}

pub fn filtered_location(data: &Value) -> Option<Value> {
    let data = data.as_object()?;
    let location: Map<String, Value> = data
        .iter()
        .filter(|(key, value)| location::FIELDS.contains(&key.as_str()) && is_truthy(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if location.is_empty() {
        return None;
    }
    match location.get("kladr_id") {
        Some(kladr_id) => Some(serde_json::json!({ "kladr_id": kladr_id })),
        None => Some(Value::Object(location)),
    }
}

pub fn format_constraint(option: &ConstraintOption, profile: &dyn TypeProfile) -> Option<Constraint> {
    let raw = option.location_list();
    let label = option.label.clone().or_else(|| {
        let composed: Vec<String> = raw
            .iter()
            .filter_map(|location| profile.compose_value(location))
            .filter(|composed| !composed.is_empty())
            .collect();
        (!composed.is_empty()).then(|| composed.join(", "))
    });
    let locations: Vec<Value> = raw.iter().filter_map(filtered_location).collect();
    if locations.is_empty() {
        return None;
    }
    Some(Constraint {
        id: format!("c{}", uuid::Uuid::new_v4().simple()),
        label,
        locations,
        deletable: option.deletable,
    })
}

pub fn constraint_params(constraints: &[Constraint], restrict_value: bool) -> Map<String, Value> {
    let locations: Vec<Value> = constraints
        .iter()
        .flat_map(|constraint| constraint.locations.iter().cloned())
        .collect();
    let mut params = Map::new();
    if !locations.is_empty() {
        params.insert("locations".to_string(), Value::Array(locations));
        params.insert("restrict_value".to_string(), Value::Bool(restrict_value));
    }
    params
}

pub fn parent_params(parent_data: &Value) -> Map<String, Value> {
    let mut params = Map::new();
    if let Some(location) = filtered_location(parent_data) {
        params.insert("locations".to_string(), Value::Array(vec![location]));
        params.insert("restrict_value".to_string(), Value::Bool(true));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SuggestionType;
    use serde_json::json;

    #[test]
    fn kladr_id_wins_over_other_fields() {
        let data = json!({"kladr_id": "77", "region": "Москва", "house": "1"});
        assert_eq!(filtered_location(&data), Some(json!({"kladr_id": "77"})));
        let data = json!({"region": "Москва", "city": "", "house": "1"});
        assert_eq!(filtered_location(&data), Some(json!({"region": "Москва"})));
        assert_eq!(filtered_location(&json!({"house": "1"})), None);
        assert_eq!(filtered_location(&json!("Москва")), None);
    }

    #[test]
    fn label_defaults_to_composed_value() {
        let option = ConstraintOption {
            label: None,
            locations: json!({"region": "Москва", "region_type": "г"}),
            deletable: false,
        };
        let constraint = format_constraint(&option, SuggestionType::Address.profile()).unwrap();
        assert_eq!(constraint.label.as_deref(), Some("Москва г"));
        assert_eq!(constraint.locations, vec![json!({"region": "Москва"})]);
        assert!(constraint.id.starts_with('c'));
    }

    #[test]
    fn constraint_without_locations_is_dropped() {
        let option = ConstraintOption {
            label: Some("Дом".to_string()),
            locations: json!([{"house": "1"}]),
            deletable: true,
        };
        assert!(format_constraint(&option, SuggestionType::Address.profile()).is_none());
    }

    #[test]
    fn params_collect_all_locations() {
        let constraints = vec![
            Constraint {
                id: "c1".into(),
                label: None,
                locations: vec![json!({"region": "Москва"})],
                deletable: false,
            },
            Constraint {
                id: "c2".into(),
                label: None,
                locations: vec![json!({"kladr_id": "50"})],
                deletable: false,
            },
        ];
        let params = constraint_params(&constraints, false);
        assert_eq!(params["locations"], json!([{"region": "Москва"}, {"kladr_id": "50"}]));
        assert_eq!(params["restrict_value"], json!(false));
        assert!(constraint_params(&[], true).is_empty());
        assert_eq!(
            Value::Object(parent_params(&json!({"city": "Химки", "street": "Ленина"}))),
            json!({"locations": [{"city": "Химки", "street": "Ленина"}], "restrict_value": true})
        );
    }
}
