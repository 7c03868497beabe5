use crate::constants::delimiters::is_word_delimiter;
use crate::models::Suggestion;
use crate::utils::tokens::normalize_token;

pub fn suggestion_label(
    suggestions: &[Suggestion],
    index: usize,
    field_names: &[(&str, &str)],
) -> Option<String> {
    let suggestion = suggestions.get(index)?;
    if field_names.is_empty() || suggestion.data_object().is_none() {
        return None;
    }
    let repeated = suggestions
        .iter()
        .enumerate()
        .any(|(idx, other)| idx != index && other.value == suggestion.value);
    if !repeated {
        return None;
    }

    let mut pending: Vec<(&str, String)> = field_names
        .iter()
        .filter_map(|(field, label)| {
            suggestion
                .data_text(field)
                .map(|value| (*label, normalize_token(&value)))
        })
        .collect();

    let mut labels = Vec::new();
    let value = normalize_token(&suggestion.value);
    for word in value.split(is_word_delimiter).filter(|w| !w.is_empty()) {
        if let Some(pos) = pending.iter().position(|(_, data)| data == word) {
            labels.push(pending.remove(pos).0);
        }
    }

    (!labels.is_empty()).then(|| labels.join(", "))
}
