mod address;
mod bank;
pub mod bounds;
mod email;
mod name;
mod party;
mod profession;
pub mod stopwords;

use crate::errors::SuggestError;
use crate::highlight::markup;
use crate::matchers::Matcher;
use crate::models::{Suggestion, SuggestionsOptions};
use crate::utils::tokens::Stopwords;
use bounds::Bounds;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub use address::AddressProfile;
pub use bank::BankProfile;
pub use email::EmailProfile;
pub use name::NameProfile;
pub use party::PartyProfile;
pub use profession::ProfessionsProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SuggestionType {
    Name,
    Address,
    Party,
    Email,
    Bank,
    Professions,
}

impl SuggestionType {
    pub const ALL: [SuggestionType; 6] = [
        SuggestionType::Name,
        SuggestionType::Address,
        SuggestionType::Party,
        SuggestionType::Email,
        SuggestionType::Bank,
        SuggestionType::Professions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionType::Name => "NAME",
            SuggestionType::Address => "ADDRESS",
            SuggestionType::Party => "PARTY",
            SuggestionType::Email => "EMAIL",
            SuggestionType::Bank => "BANK",
            SuggestionType::Professions => "PROFESSIONS",
        }
    }

    pub fn url_suffix(&self) -> &'static str {
        match self {
            SuggestionType::Name => "fio",
            SuggestionType::Address => "address",
            SuggestionType::Party => "party",
            SuggestionType::Email => "email",
            SuggestionType::Bank => "bank",
            SuggestionType::Professions => "professions",
        }
    }

    pub fn profile(&self) -> &'static dyn TypeProfile {
        match self {
            SuggestionType::Name => &NameProfile,
            SuggestionType::Address => &AddressProfile,
            SuggestionType::Party => &PartyProfile,
            SuggestionType::Email => &EmailProfile,
            SuggestionType::Bank => &BankProfile,
            SuggestionType::Professions => &ProfessionsProfile,
        }
    }

    pub fn valid_names() -> Vec<&'static str> {
        Self::ALL.iter().map(SuggestionType::as_str).collect()
    }
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionType {
    type Err = SuggestError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                SuggestError::configuration(format!("Unknown suggestion type: '{}'", raw.trim()))
                    .with_hint(format!(
                        "Use one of: {}.",
                        Self::valid_names().join(", ")
                    ))
                    .with_details(serde_json::json!({ "valid_types": Self::valid_names() }))
            })
    }
}

pub trait TypeProfile: Send + Sync {
    fn kind(&self) -> SuggestionType;

    fn matchers(&self) -> &'static [Matcher];

    fn field_names(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    fn always_continue_selecting(&self) -> bool {
        false
    }

    fn enrichment_enabled(&self) -> bool {
        false
    }

    fn geo_enabled(&self) -> bool {
        false
    }

    fn unformattable_tokens(&self) -> Option<&'static Stopwords> {
        None
    }

    fn bounds_available(&self) -> &'static [&'static str] {
        &[]
    }

    fn bound_fields(&self, _bound: &str) -> &'static [&'static str] {
        &[]
    }

    fn is_query_requestable(&self, _query: &str, _options: &SuggestionsOptions) -> bool {
        true
    }

    fn is_data_complete(
        &self,
        _suggestion: &Suggestion,
        _options: &SuggestionsOptions,
        _bounds: &Bounds,
    ) -> bool {
        true
    }

    fn compose_value(&self, _data: &Value) -> Option<String> {
        None
    }

    fn format_selected(&self, _suggestion: &Suggestion) -> Option<String> {
        None
    }

    fn format_result(&self, suggestion: &Suggestion, query: &str, max_length: Option<usize>) -> String {
        markup::format_value(suggestion, query, self.unformattable_tokens(), max_length)
    }
}

impl fmt::Debug for dyn TypeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeProfile({})", self.kind())
    }
}
