use crate::constants::version::{PLUGIN_VERSION, USER_AGENT};
use crate::errors::SuggestError;
use crate::models::SuggestionsOptions;
use crate::services::fetcher::{FetchRequest, ServiceMethod, SuggestionsFetcher};
use crate::services::logger::Logger;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method};
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

#[derive(Clone)]
pub struct HttpFetcher {
    logger: Logger,
    client: Client,
    base_url: String,
    token: Option<String>,
    extra_headers: BTreeMap<String, String>,
}

impl HttpFetcher {
    pub fn new(logger: Logger, options: &SuggestionsOptions) -> Result<Self, SuggestError> {
        let base_url = normalize_base_url(options.service_url.as_deref())?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| SuggestError::configuration(format!("HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("http"),
            client,
            base_url,
            token: options.token().map(str::to_string),
            extra_headers: options.headers.clone(),
        })
    }

    pub fn url_for(&self, request: &FetchRequest) -> String {
        format!("{}/{}", self.base_url, request.path())
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &self.extra_headers {
            let parsed = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            );
            if let (Ok(name), Ok(value)) = parsed {
                headers.insert(name, value);
            }
        }
        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Token {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers.insert("X-Version", HeaderValue::from_static(PLUGIN_VERSION));
        headers
    }
}

#[async_trait]
impl SuggestionsFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Value, SuggestError> {
        let url = self.url_for(request);
        self.logger.debug(
            "fetch",
            Some(&serde_json::json!({ "url": url, "method": request.method })),
        );

        let builder = match request.method {
            ServiceMethod::Suggest => self
                .client
                .request(Method::POST, &url)
                .json(&request.params),
            ServiceMethod::Status | ServiceMethod::DetectAddressByIp => {
                self.client.request(Method::GET, &url)
            }
        };
        let builder = builder.headers(self.build_headers());

        let response = tokio::time::timeout(request.timeout, builder.send())
            .await
            .map_err(|_| {
                SuggestError::timeout("Suggestions request timed out")
                    .with_details(serde_json::json!({ "timeout_ms": request.timeout.as_millis() as u64 }))
            })??;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let err = SuggestError::network(format!(
                "Suggestions service responded {}",
                status.as_u16()
            ))
            .with_details(serde_json::json!({ "status": status.as_u16(), "url": url }));
            let err = if status.as_u16() == 401 || status.as_u16() == 403 {
                err.with_hint("Check the API token.")
            } else {
                err
            };
            self.logger.warn(
                "Service request failed",
                Some(&serde_json::json!({ "status": status.as_u16() })),
            );
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|err| {
            SuggestError::malformed(format!("Response is not JSON: {}", err))
        })
    }
}

fn normalize_base_url(raw: Option<&str>) -> Result<String, SuggestError> {
    let raw = raw.unwrap_or("").trim();
    if raw.is_empty() {
        return Err(SuggestError::configuration("service_url is required")
            .with_hint("Set options.service_url or SUGGESTIONS_SERVICE_URL."));
    }
    let mut url = Url::parse(raw)?;
    url.set_fragment(None);
    url.set_query(None);
    let normalized = format!("{}{}", url.origin().ascii_serialization(), url.path());
    Ok(normalized.trim_end_matches('/').to_string())
}
