use super::MatchContext;
use crate::models::Suggestion;
use crate::utils::tokens::{is_subset, string_encloses, word_tokens};
use once_cell::sync::Lazy;
use regex::Regex;

static ADDRESS_HOUSE_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r", (?:д|вл|двлд|к) .+$").expect("house tail regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameParent {
    Raw,
    Address,
}

impl SameParent {
    fn parent_of<'a>(&self, value: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            SameParent::Raw => std::borrow::Cow::Borrowed(value),
            SameParent::Address => ADDRESS_HOUSE_TAIL.replace(value, ""),
        }
    }
}

pub fn same_parent(suggestions: &[Suggestion], parent: SameParent) -> bool {
    let Some(first) = suggestions.first() else {
        return false;
    };
    let parent_value = parent.parent_of(&first.value);
    suggestions
        .iter()
        .all(|s| parent.parent_of(&s.value).starts_with(parent_value.as_ref()))
}

pub fn match_by_words(
    query: &str,
    suggestions: &[Suggestion],
    parent: SameParent,
    context: &MatchContext<'_>,
) -> Option<usize> {
    if !same_parent(suggestions, parent) {
        return None;
    }
    let query_lower = query.to_lowercase();
    let query_tokens = word_tokens(&query_lower, context.stopwords);
    if query_tokens.is_empty() {
        return None;
    }

    for (idx, suggestion) in suggestions.iter().enumerate() {
        let suggested = suggestion.value.to_lowercase();
        if string_encloses(&query_lower, &suggested) {
            return None;
        }
        let suggestion_tokens = word_tokens(&suggested, context.stopwords);
        if is_subset(&query_tokens, &suggestion_tokens) {
            return Some(idx);
        }
    }
    None
}
