use crate::constants::defaults;
use crate::errors::SuggestError;
use crate::utils::feature_flags::{env_flag, env_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoLocationOption {
    Flag(bool),
    Many(Vec<Value>),
    One(Map<String, Value>),
}

impl Default for GeoLocationOption {
    fn default() -> Self {
        GeoLocationOption::Flag(true)
    }
}

impl GeoLocationOption {
    pub fn explicit(&self) -> Option<Vec<Value>> {
        match self {
            GeoLocationOption::Flag(_) => None,
            GeoLocationOption::Many(items) => Some(items.clone()),
            GeoLocationOption::One(map) => Some(vec![Value::Object(map.clone())]),
        }
    }

    pub fn enabled(&self) -> bool {
        !matches!(self, GeoLocationOption::Flag(false))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintOption {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, alias = "restrictions")]
    pub locations: Value,
    #[serde(default)]
    pub deletable: bool,
}

impl ConstraintOption {
    pub fn location_list(&self) -> Vec<Value> {
        match &self.locations {
            Value::Null => Vec::new(),
            Value::Array(items) => items.clone(),
            other => vec![other.clone()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsOptions {
    #[serde(alias = "serviceUrl")]
    pub service_url: Option<String>,
    pub token: Option<String>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    #[serde(alias = "minChars")]
    pub min_chars: usize,
    #[serde(alias = "deferRequestBy")]
    pub defer_request_by: u64,
    pub timeout: u64,
    #[serde(alias = "noCache")]
    pub no_cache: bool,
    #[serde(alias = "preventBadQueries")]
    pub prevent_bad_queries: bool,
    pub count: u32,
    #[serde(alias = "paramName")]
    pub param_name: String,
    pub params: Map<String, Value>,
    #[serde(alias = "restrictValue")]
    pub restrict_value: bool,
    pub bounds: Option<String>,
    pub constraints: Option<Vec<ConstraintOption>>,
    #[serde(alias = "geoLocation")]
    pub geo_location: GeoLocationOption,
    #[serde(alias = "suggestLocal")]
    pub suggest_local: bool,
    #[serde(alias = "triggerSelectOnSpace")]
    pub trigger_select_on_space: bool,
    #[serde(alias = "autoSelectFirst")]
    pub auto_select_first: bool,
    pub hint: Option<String>,
    #[serde(alias = "maxLength")]
    pub max_length: Option<usize>,
    pub headers: BTreeMap<String, String>,
}

impl Default for SuggestionsOptions {
    fn default() -> Self {
        Self {
            service_url: None,
            token: None,
            type_name: None,
            min_chars: defaults::MIN_CHARS,
            defer_request_by: defaults::DEFER_REQUEST_BY_MS,
            timeout: defaults::TIMEOUT_MS,
            no_cache: false,
            prevent_bad_queries: false,
            count: defaults::COUNT,
            param_name: defaults::PARAM_NAME.to_string(),
            params: Map::new(),
            restrict_value: false,
            bounds: None,
            constraints: None,
            geo_location: GeoLocationOption::default(),
            suggest_local: true,
            trigger_select_on_space: false,
            auto_select_first: false,
            hint: Some(defaults::HINT.to_string()),
            max_length: None,
            headers: BTreeMap::new(),
        }
    }
}

impl SuggestionsOptions {
    pub fn for_type(type_name: &str) -> Self {
        Self {
            type_name: Some(type_name.to_string()),
            ..Self::default()
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, SuggestError> {
        if !value.is_object() {
            return Err(SuggestError::configuration("Options must be an object"));
        }
        let options: Self = serde_json::from_value(value.clone()).map_err(|err| {
            SuggestError::configuration(format!("Invalid options: {}", err))
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn merged(&self, patch: &Value) -> Result<Self, SuggestError> {
        let Some(patch) = patch.as_object() else {
            return Err(SuggestError::configuration("Options patch must be an object"));
        };
        let mut base = serde_json::to_value(self)
            .map_err(|err| SuggestError::configuration(format!("Options not serializable: {}", err)))?;
        if let Value::Object(map) = &mut base {
            for (key, value) in patch {
                let key = camel_to_snake(key);
                map.insert(key, value.clone());
            }
        }
        Self::from_value(&base)
    }

    pub fn apply_env(mut self) -> Self {
        if let Some(url) = env_text("SUGGESTIONS_SERVICE_URL") {
            self.service_url = Some(url);
        }
        if let Some(token) = env_text("SUGGESTIONS_TOKEN") {
            self.token = Some(token);
        }
        if let Some(no_cache) = env_flag("SUGGESTIONS_NO_CACHE") {
            self.no_cache = no_cache;
        }
        self
    }

    pub fn validate(&self) -> Result<(), SuggestError> {
        if self.param_name.trim().is_empty() {
            return Err(SuggestError::configuration("param_name must be a non-empty string"));
        }
        if self.timeout == 0 {
            return Err(SuggestError::configuration("timeout must be positive")
                .with_hint("Use milliseconds, e.g. 3000."));
        }
        if let Some(url) = self.service_url.as_deref() {
            url::Url::parse(url)?;
        }
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_widget_defaults() {
        let options = SuggestionsOptions::default();
        assert_eq!(options.min_chars, 1);
        assert_eq!(options.defer_request_by, 100);
        assert_eq!(options.timeout, 3000);
        assert_eq!(options.count, 5);
        assert_eq!(options.param_name, "query");
        assert!(options.geo_location.enabled());
    }

    #[test]
    fn accepts_camel_case_aliases() {
        let options = SuggestionsOptions::from_value(&json!({
            "type": "ADDRESS",
            "minChars": 3,
            "deferRequestBy": 0,
            "preventBadQueries": true,
            "bounds": "region-city",
            "geoLocation": {"kladr_id": "77"},
            "constraints": [{"label": "Москва", "restrictions": {"region": "Москва"}}]
        }))
        .unwrap();
        assert_eq!(options.type_name.as_deref(), Some("ADDRESS"));
        assert_eq!(options.min_chars, 3);
        assert_eq!(options.defer_request_by, 0);
        assert!(options.prevent_bad_queries);
        assert_eq!(options.geo_location.explicit().unwrap().len(), 1);
        let constraints = options.constraints.unwrap();
        assert_eq!(constraints[0].location_list(), vec![json!({"region": "Москва"})]);
    }

    #[test]
    fn merged_overrides_only_given_keys() {
        let base = SuggestionsOptions::for_type("NAME");
        let merged = base.merged(&json!({"minChars": 2, "noCache": true})).unwrap();
        assert_eq!(merged.min_chars, 2);
        assert!(merged.no_cache);
        assert_eq!(merged.type_name.as_deref(), Some("NAME"));
    }

    #[test]
    fn invalid_options_are_configuration_errors() {
        let err = SuggestionsOptions::from_value(&json!({"service_url": "not a url"})).unwrap_err();
        assert_eq!(err.kind, crate::errors::SuggestErrorKind::Configuration);
        assert!(SuggestionsOptions::from_value(&json!({"timeout": 0})).is_err());
        assert!(SuggestionsOptions::from_value(&json!("ADDRESS")).is_err());
    }
}
