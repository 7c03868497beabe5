pub mod app;
pub mod cli;
pub mod constants;
pub mod errors;
pub mod highlight;
pub mod matchers;
pub mod models;
pub mod services;
pub mod types;
pub mod utils;
pub mod widget;

pub use errors::{SuggestError, SuggestErrorKind};
pub use models::{Suggestion, SuggestionsOptions};
pub use services::fetcher::{FetchRequest, ServiceMethod, SuggestionsFetcher};
pub use types::SuggestionType;
pub use widget::{RenderedSuggestion, SelectOptions, Suggestions, SuggestionsListener};
