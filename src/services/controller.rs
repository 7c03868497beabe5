use crate::errors::{SuggestError, SuggestErrorKind};
use crate::models::{parse_suggestions, Suggestion};
use crate::services::cache::SuggestionCache;
use crate::services::fetcher::{FetchRequest, ServiceMethod, SuggestionsFetcher};
use crate::services::listener::Listeners;
use crate::services::logger::Logger;
use crate::types::SuggestionType;
use futures::future::{AbortHandle, Abortable};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub kind: SuggestionType,
    pub query: String,
    pub params: Value,
    pub timeout: Duration,
    pub no_cache: bool,
    pub prevent_bad_queries: bool,
    pub unrestricted_label: Option<String>,
    pub no_callbacks: bool,
    pub use_enrichment_cache: bool,
}

impl SearchRequest {
    pub fn new(kind: SuggestionType, query: impl Into<String>, params: Value) -> Self {
        Self {
            kind,
            query: query.into(),
            params,
            timeout: Duration::from_millis(crate::constants::defaults::TIMEOUT_MS),
            no_cache: false,
            prevent_bad_queries: false,
            unrestricted_label: None,
            no_callbacks: false,
            use_enrichment_cache: false,
        }
    }
}

#[derive(Default)]
struct ControllerState {
    current_value: String,
    in_flight: Option<(u64, AbortHandle)>,
    next_request_id: u64,
}

#[derive(Clone)]
pub struct RequestController {
    logger: Logger,
    fetcher: Arc<dyn SuggestionsFetcher>,
    cache: SuggestionCache,
    listeners: Listeners,
    state: Arc<Mutex<ControllerState>>,
}

impl RequestController {
    pub fn new(logger: Logger, fetcher: Arc<dyn SuggestionsFetcher>, listeners: Listeners) -> Self {
        let logger = logger.child("controller");
        Self {
            cache: SuggestionCache::new(logger.clone()),
            logger,
            fetcher,
            listeners,
            state: Arc::new(Mutex::new(ControllerState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    pub fn current_value(&self) -> String {
        self.state().current_value.clone()
    }

    pub fn set_current_value(&self, value: impl Into<String>) {
        self.state().current_value = value.into();
    }

    pub fn is_fetching(&self) -> bool {
        self.state().in_flight.is_some()
    }

    pub fn abort(&self) {
        let in_flight = self.state().in_flight.take();
        if let Some((id, handle)) = in_flight {
            self.logger.debug(
                "Aborting request",
                Some(&serde_json::json!({ "request_id": id })),
            );
            handle.abort();
        }
    }

    pub async fn get_suggestions(&self, request: SearchRequest) -> Result<Vec<Suggestion>, SuggestError> {
        let key = self.cache.build_key(&request.params);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        if request.prevent_bad_queries && self.cache.is_bad_query(&request.query) {
            return Err(SuggestError::bad_query(&request.query));
        }

        if !request.no_callbacks && !self.listeners.search_start(&request.params) {
            return Err(SuggestError::vetoed());
        }

        let fetch = FetchRequest::new(
            ServiceMethod::Suggest,
            request.kind,
            request.params.clone(),
            request.timeout,
        );
        let response = match self.fetch_exclusive(fetch).await {
            Ok(response) => response,
            Err(err) => {
                if !request.no_callbacks && err.kind != SuggestErrorKind::Cancelled {
                    self.logger.warn(
                        "Suggest request failed",
                        Some(&serde_json::json!({ "query": request.query, "error": err })),
                    );
                    let query = request.query.as_str();
                    self.listeners
                        .each(|listener| listener.on_search_error(Some(query), &err));
                }
                return Err(err);
            }
        };

        let (mut suggestions, well_formed) = match parse_suggestions(&response) {
            Ok(parsed) => (parsed, true),
            Err(err) => {
                self.logger.warn(
                    "Malformed suggest response",
                    Some(&serde_json::json!({ "query": request.query, "error": err })),
                );
                (Vec::new(), false)
            }
        };
        fill_unrestricted_values(&mut suggestions, request.unrestricted_label.as_deref());

        let result = if request.query == self.current_value() {
            if well_formed && !request.no_cache {
                if request.use_enrichment_cache {
                    if let Some(first) = suggestions.first() {
                        self.cache.store_enriched(&request.query, first.clone());
                    }
                } else {
                    self.cache.enrich_response(&request.query, &mut suggestions);
                    self.cache.store(key, suggestions.clone());
                    if request.prevent_bad_queries && suggestions.is_empty() {
                        self.cache.add_bad_query(&request.query);
                    }
                }
            }
            Ok(suggestions.clone())
        } else {
            self.logger.debug(
                "Dropping stale response",
                Some(&serde_json::json!({ "query": request.query })),
            );
            Err(SuggestError::stale(&request.query))
        };

        if !request.no_callbacks {
            let query = request.query.as_str();
            self.listeners
                .each(|listener| listener.on_search_complete(query, &suggestions));
        }
        result
    }

    async fn fetch_exclusive(&self, request: FetchRequest) -> Result<Value, SuggestError> {
        let (handle, registration) = AbortHandle::new_pair();
        let (request_id, previous) = {
            let mut state = self.state();
            state.next_request_id += 1;
            let id = state.next_request_id;
            (id, state.in_flight.replace((id, handle)))
        };
        if let Some((_, previous)) = previous {
            previous.abort();
        }

        let outcome = Abortable::new(self.fetch(request), registration).await;

        {
            let mut state = self.state();
            if matches!(state.in_flight, Some((id, _)) if id == request_id) {
                state.in_flight = None;
            }
        }

        match outcome {
            Ok(result) => result,
            Err(_) => Err(SuggestError::cancelled()),
        }
    }

    pub async fn fetch(&self, request: FetchRequest) -> Result<Value, SuggestError> {
        let timeout = request.timeout;
        tokio::time::timeout(timeout, self.fetcher.fetch(&request))
            .await
            .map_err(|_| {
                SuggestError::timeout(format!("{} timed out", request.path())).with_details(
                    serde_json::json!({ "timeout_ms": timeout.as_millis() as u64 }),
                )
            })?
    }
}

fn fill_unrestricted_values(suggestions: &mut [Suggestion], label: Option<&str>) {
    for suggestion in suggestions {
        let unrestricted = match label {
            Some(label) => format!("{}, {}", label, suggestion.value),
            None => suggestion
                .unrestricted_value
                .take()
                .unwrap_or_else(|| suggestion.value.clone()),
        };
        suggestion.unrestricted_value = Some(unrestricted);
    }
}
