use serde_json::Value;

pub fn deep_value<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, step| current.as_object()?.get(step))
}

pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn deep_text(value: &Value, path: &str) -> Option<String> {
    deep_value(value, path).and_then(scalar_text)
}

pub fn fields_not_empty(data: &Value, fields: &[&str]) -> bool {
    let Some(obj) = data.as_object() else {
        return false;
    };
    fields.iter().all(|field| obj.get(*field).map(is_truthy).unwrap_or(false))
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn compact_join<I, S>(parts: I, separator: &str) -> String
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .flatten()
        .filter(|part| !part.as_ref().is_empty())
        .map(|part| part.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deep_value_walks_objects() {
        let suggestion = json!({"value": "x", "data": {"address": {"value": "Москва"}, "inn": 7707083893u64}});
        assert_eq!(
            deep_text(&suggestion, "data.address.value").as_deref(),
            Some("Москва")
        );
        assert_eq!(deep_text(&suggestion, "data.inn").as_deref(), Some("7707083893"));
        assert!(deep_value(&suggestion, "data.address.missing").is_none());
        assert!(deep_value(&suggestion, "value.nested").is_none());
    }

    #[test]
    fn fields_not_empty_requires_object() {
        let data = json!({"surname": "Иванов", "name": "", "patronymic": null});
        assert!(fields_not_empty(&data, &["surname"]));
        assert!(!fields_not_empty(&data, &["surname", "name"]));
        assert!(!fields_not_empty(&data, &["patronymic"]));
        assert!(!fields_not_empty(&Value::Null, &[]));
    }

    #[test]
    fn compact_join_skips_empty_parts() {
        let joined = compact_join([Some("г"), None, Some(""), Some("Москва")], " ");
        assert_eq!(joined, "г Москва");
    }
}
