use crate::errors::SuggestError;
use crate::utils::json_path::{deep_text, deep_value};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub value: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrestricted_value: Option<String>,
}

impl Suggestion {
    pub fn new(value: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            value: value.into(),
            data,
            unrestricted_value: None,
        }
    }

    pub fn plain(value: impl Into<String>) -> Self {
        Self::new(value, None)
    }

    pub fn data_object(&self) -> Option<&Value> {
        self.data.as_ref().filter(|data| data.is_object())
    }

    pub fn data_value(&self, path: &str) -> Option<&Value> {
        deep_value(self.data_object()?, path)
    }

    pub fn data_text(&self, path: &str) -> Option<String> {
        deep_text(self.data_object()?, path)
    }

    pub fn field_text(&self, path: &str) -> Option<String> {
        match path {
            "value" => Some(self.value.clone()).filter(|v| !v.is_empty()),
            "unrestricted_value" => self.unrestricted_value.clone(),
            _ => path
                .strip_prefix("data.")
                .and_then(|rest| self.data_text(rest)),
        }
    }

    pub fn same_as(&self, other: &Suggestion) -> bool {
        self.value == other.value && data_same(self.data.as_ref(), other.data.as_ref())
    }
}

fn data_same(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(Value::Object(a)), Some(Value::Object(b))) => a
            .iter()
            .all(|(key, value)| data_same(Some(value), b.get(key))),
        (Some(a), Some(b)) => a == b,
        (None | Some(Value::Null), None | Some(Value::Null)) => true,
        _ => false,
    }
}

pub fn parse_suggestions(response: &Value) -> Result<Vec<Suggestion>, SuggestError> {
    let items = response
        .get("suggestions")
        .and_then(Value::as_array)
        .ok_or_else(|| SuggestError::malformed("Response has no suggestions array"))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::String(text) => Ok(Suggestion::plain(text.clone())),
            Value::Object(map) => {
                let value = map.get("value").and_then(Value::as_str).ok_or_else(|| {
                    SuggestError::malformed(format!("Suggestion #{} has no string value", idx))
                })?;
                let data = map.get("data").filter(|d| !d.is_null()).cloned();
                let unrestricted_value = map
                    .get("unrestricted_value")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Ok(Suggestion {
                    value: value.to_string(),
                    data,
                    unrestricted_value,
                })
            }
            other => Err(SuggestError::malformed(format!(
                "Suggestion #{} is neither a string nor an object",
                idx
            ))
            .with_details(other.clone())),
        })
        .collect()
}
