use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestErrorKind {
    Configuration,
    Network,
    Timeout,
    Cancelled,
    Stale,
    BadQuery,
    Vetoed,
    MalformedResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestError {
    pub kind: SuggestErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl SuggestError {
    pub fn new(
        kind: SuggestErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(SuggestErrorKind::Configuration, "CONFIGURATION", message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SuggestErrorKind::Network, "NETWORK", message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SuggestErrorKind::Timeout, "TIMEOUT", message)
    }

    pub fn cancelled() -> Self {
        Self::new(
            SuggestErrorKind::Cancelled,
            "CANCELLED",
            "Request was superseded",
        )
    }

    pub fn stale(query: &str) -> Self {
        Self::new(
            SuggestErrorKind::Stale,
            "STALE",
            format!("Response for '{}' arrived after the value changed", query),
        )
    }

    pub fn bad_query(query: &str) -> Self {
        Self::new(
            SuggestErrorKind::BadQuery,
            "BAD_QUERY",
            format!("Query '{}' extends a query known to return nothing", query),
        )
    }

    pub fn vetoed() -> Self {
        Self::new(
            SuggestErrorKind::Vetoed,
            "VETOED",
            "Search was vetoed by on_search_start",
        )
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(
            SuggestErrorKind::MalformedResponse,
            "MALFORMED_RESPONSE",
            message,
        )
    }

    pub fn is_silent(&self) -> bool {
        matches!(
            self.kind,
            SuggestErrorKind::Cancelled
                | SuggestErrorKind::Stale
                | SuggestErrorKind::BadQuery
                | SuggestErrorKind::Vetoed
        )
    }
}

impl fmt::Display for SuggestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for SuggestError {}

impl From<reqwest::Error> for SuggestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SuggestError::timeout(format!("Suggestions request timed out: {}", err))
        } else {
            SuggestError::network(format!("Suggestions request failed: {}", err))
        }
    }
}

impl From<url::ParseError> for SuggestError {
    fn from(err: url::ParseError) -> Self {
        SuggestError::configuration(format!("Invalid service_url: {}", err))
    }
}
