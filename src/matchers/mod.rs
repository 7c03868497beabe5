mod fields;
mod normalized;
mod words;

use crate::models::Suggestion;
use crate::utils::tokens::Stopwords;

pub use fields::match_by_fields;
pub use normalized::match_by_normalized_query;
pub use words::{match_by_words, same_parent, SameParent};

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchContext<'a> {
    pub stopwords: Option<&'a Stopwords>,
    pub field_stopwords: &'a [(&'a str, Option<&'a Stopwords>)],
}

impl<'a> MatchContext<'a> {
    pub const EMPTY: Self = Self {
        stopwords: None,
        field_stopwords: &[],
    };

    pub fn with_stopwords(stopwords: &'a Stopwords) -> Self {
        Self {
            stopwords: Some(stopwords),
            field_stopwords: &[],
        }
    }

    pub fn with_fields(field_stopwords: &'a [(&'a str, Option<&'a Stopwords>)]) -> Self {
        Self {
            stopwords: None,
            field_stopwords,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    NormalizedQuery,
    Words(SameParent),
    Fields,
}

#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    pub strategy: Strategy,
    pub context: MatchContext<'static>,
}

impl Matcher {
    pub const fn new(strategy: Strategy, context: MatchContext<'static>) -> Self {
        Self { strategy, context }
    }

    pub fn plain(strategy: Strategy) -> Self {
        Self::new(strategy, MatchContext::default())
    }

    pub fn find(&self, query: &str, suggestions: &[Suggestion]) -> Option<usize> {
        match self.strategy {
            Strategy::NormalizedQuery => {
                match_by_normalized_query(query, suggestions, &self.context)
            }
            Strategy::Words(parent) => match_by_words(query, suggestions, parent, &self.context),
            Strategy::Fields => match_by_fields(query, suggestions, &self.context),
        }
    }
}

pub fn find_in_pipeline(
    pipeline: &[Matcher],
    query: &str,
    suggestions: &[Suggestion],
) -> Option<usize> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    pipeline
        .iter()
        .find_map(|matcher| matcher.find(query, suggestions))
}
