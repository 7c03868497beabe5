use crate::errors::SuggestError;
use crate::types::SuggestionType;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceMethod {
    Suggest,
    Status,
    DetectAddressByIp,
}

impl ServiceMethod {
    pub fn path(&self) -> &'static str {
        match self {
            ServiceMethod::Suggest => "suggest",
            ServiceMethod::Status => "status",
            ServiceMethod::DetectAddressByIp => "detectAddressByIp",
        }
    }

    pub fn typed(&self) -> bool {
        !matches!(self, ServiceMethod::DetectAddressByIp)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchRequest {
    pub method: ServiceMethod,
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub params: Value,
    #[serde(skip)]
    pub timeout: Duration,
}

impl FetchRequest {
    pub fn new(method: ServiceMethod, kind: SuggestionType, params: Value, timeout: Duration) -> Self {
        Self {
            method,
            kind,
            params,
            timeout,
        }
    }

    pub fn path(&self) -> String {
        if self.method.typed() {
            format!("{}/{}", self.method.path(), self.kind.url_suffix())
        } else {
            self.method.path().to_string()
        }
    }
}

#[async_trait]
pub trait SuggestionsFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<Value, SuggestError>;
}
