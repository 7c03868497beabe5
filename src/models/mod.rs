pub mod options;
pub mod suggestion;

pub use options::{ConstraintOption, GeoLocationOption, SuggestionsOptions};
pub use suggestion::{parse_suggestions, Suggestion};
