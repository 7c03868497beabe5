use super::{SuggestionType, TypeProfile};
use crate::matchers::{MatchContext, Matcher, Strategy};
use crate::models::SuggestionsOptions;

static MATCHERS: [Matcher; 1] = [Matcher::new(Strategy::NormalizedQuery, MatchContext::EMPTY)];

pub struct EmailProfile;

impl TypeProfile for EmailProfile {
    fn kind(&self) -> SuggestionType {
        SuggestionType::Email
    }

    fn matchers(&self) -> &'static [Matcher] {
        &MATCHERS
    }

    fn is_query_requestable(&self, query: &str, options: &SuggestionsOptions) -> bool {
        options.suggest_local || query.contains('@')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_part_needs_suggest_local() {
        let mut options = SuggestionsOptions::for_type("EMAIL");
        assert!(EmailProfile.is_query_requestable("ivan", &options));
        options.suggest_local = false;
        assert!(!EmailProfile.is_query_requestable("ivan", &options));
        assert!(EmailProfile.is_query_requestable("ivan@", &options));
    }
}
