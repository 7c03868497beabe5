use crate::constants::kladr;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bounds {
    pub from: Option<&'static str>,
    pub to: Option<&'static str>,
    pub all: Vec<&'static str>,
    pub own: Vec<&'static str>,
}

impl Bounds {
    pub fn parse(range: Option<&str>, available: &[&'static str]) -> Self {
        let range = range.map(str::trim).unwrap_or_default();
        let parts: Vec<&str> = range.split('-').collect();
        let lookup = |name: &str| available.iter().position(|bound| *bound == name);

        let from = parts
            .first()
            .and_then(|name| lookup(name))
            .map(|idx| available[idx]);
        let to = parts
            .last()
            .and_then(|name| lookup(name))
            .filter(|idx| *idx + 1 < available.len())
            .map(|idx| available[idx]);

        let mut bounds = Bounds {
            from,
            to,
            ..Bounds::default()
        };
        if from.is_none() && to.is_none() {
            return bounds;
        }

        let mut is_own = from.is_none();
        for bound in available {
            if Some(*bound) == from {
                is_own = true;
            }
            bounds.all.push(bound);
            if is_own {
                bounds.own.push(bound);
            }
            if Some(*bound) == to {
                break;
            }
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.own.is_empty()
    }

    pub fn request_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        if let Some(from) = self.from {
            params.insert("from_bound".to_string(), json!({ "value": from }));
        }
        if let Some(to) = self.to {
            params.insert("to_bound".to_string(), json!({ "value": to }));
        }
        params
    }
}

pub fn copy_bounded_data(
    data: &Value,
    range: &[&str],
    fields_of: impl Fn(&str) -> &'static [&'static str],
) -> Map<String, Value> {
    let mut result = Map::new();
    let Some(data) = data.as_object() else {
        return result;
    };
    for bound in range {
        for field in fields_of(bound) {
            if let Some(value) = data.get(*field).filter(|value| !value.is_null()) {
                result.insert(field.to_string(), value.clone());
            }
        }
    }
    result
}

pub fn bounded_kladr_id(kladr_id: &str, range: &[&str]) -> Option<String> {
    let last = range.last()?;
    let (_, digits, zeros) = kladr::LENGTHS.iter().find(|(name, _, _)| name == last)?;
    let mut result: String = kladr_id.chars().take(*digits).collect();
    result.push_str(&"0".repeat(*zeros));
    Some(result)
}
