#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use suggestions::errors::{SuggestError, SuggestErrorKind};
use suggestions::models::{Suggestion, SuggestionsOptions};
use suggestions::services::fetcher::{FetchRequest, ServiceMethod, SuggestionsFetcher};
use suggestions::services::logger::Logger;
use suggestions::widget::{RenderedSuggestion, Suggestions, SuggestionsListener};
use tokio::sync::oneshot;

pub static ENV_LOCK: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Scripted service. Suggest replies are keyed by the `query` param; unknown
/// queries get an empty list.
#[derive(Default)]
pub struct MockFetcher {
    requests: Mutex<Vec<FetchRequest>>,
    replies: Mutex<HashMap<String, Value>>,
    failures: Mutex<HashMap<String, SuggestError>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<Value>>>,
    status: Mutex<Option<Value>>,
    location: Mutex<Option<Value>>,
}

impl MockFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, query: &str, response: Value) {
        self.replies.lock().unwrap().insert(query.to_string(), response);
    }

    pub fn reply_values(&self, query: &str, values: &[&str]) {
        self.reply(query, values_response(values));
    }

    pub fn fail(&self, query: &str, err: SuggestError) {
        self.failures.lock().unwrap().insert(query.to_string(), err);
    }

    /// The next suggest call for `query` waits until the returned sender fires.
    pub fn gate(&self, query: &str) -> oneshot::Sender<Value> {
        let (sender, receiver) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.to_string(), receiver);
        sender
    }

    pub fn set_status(&self, status: Value) {
        *self.status.lock().unwrap() = Some(status);
    }

    pub fn set_location(&self, response: Value) {
        *self.location.lock().unwrap() = Some(response);
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn suggest_requests(&self) -> Vec<FetchRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == ServiceMethod::Suggest)
            .collect()
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_requests().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.suggest_requests()
            .iter()
            .map(|request| query_of(request).to_string())
            .collect()
    }

    pub fn last_params(&self) -> Value {
        self.suggest_requests()
            .last()
            .map(|request| request.params.clone())
            .unwrap_or(Value::Null)
    }
}

fn query_of(request: &FetchRequest) -> &str {
    request
        .params
        .get("query")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

#[async_trait]
impl SuggestionsFetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Value, SuggestError> {
        self.requests.lock().unwrap().push(request.clone());
        match request.method {
            ServiceMethod::Status => Ok(self
                .status
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| json!({"search": true, "enrich": true}))),
            ServiceMethod::DetectAddressByIp => Ok(self
                .location
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| json!({"location": null}))),
            ServiceMethod::Suggest => {
                let query = query_of(request).to_string();
                let gate = self.gates.lock().unwrap().remove(&query);
                if let Some(gate) = gate {
                    return gate
                        .await
                        .map_err(|_| SuggestError::network("gate dropped"));
                }
                if let Some(err) = self.failures.lock().unwrap().get(&query) {
                    return Err(err.clone());
                }
                let reply = self.replies.lock().unwrap().get(&query).cloned();
                Ok(reply.unwrap_or_else(|| json!({"suggestions": []})))
            }
        }
    }
}

pub fn values_response(values: &[&str]) -> Value {
    json!({
        "suggestions": values
            .iter()
            .map(|value| json!({"value": value, "data": null}))
            .collect::<Vec<_>>()
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Render(Vec<String>),
    Hide,
    SearchStart(Value),
    SearchComplete(String, usize),
    SearchError(Option<String>, SuggestErrorKind),
    Select(String, bool),
    SelectNothing(String),
    Invalidate(String),
}

#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Event>>,
    veto: AtomicBool,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn veto(&self, veto: bool) {
        self.veto.store(veto, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<(Option<String>, SuggestErrorKind)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::SearchError(query, kind) => Some((query, kind)),
                _ => None,
            })
            .collect()
    }

    pub fn selects(&self) -> Vec<(String, bool)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Select(value, changed) => Some((value, changed)),
                _ => None,
            })
            .collect()
    }

    pub fn last_render(&self) -> Option<Vec<String>> {
        self.events().into_iter().rev().find_map(|event| match event {
            Event::Render(values) => Some(values),
            _ => None,
        })
    }

    pub fn count(&self, wanted: fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|event| wanted(event)).count()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl SuggestionsListener for RecordingListener {
    fn render(&self, suggestions: &[RenderedSuggestion]) {
        let values = suggestions
            .iter()
            .map(|row| row.chunks.iter().map(|chunk| chunk.text.as_str()).collect::<String>())
            .collect();
        self.push(Event::Render(values));
    }

    fn hide(&self) {
        self.push(Event::Hide);
    }

    fn on_search_start(&self, params: &Value) -> bool {
        self.push(Event::SearchStart(params.clone()));
        !self.veto.load(Ordering::SeqCst)
    }

    fn on_search_complete(&self, query: &str, suggestions: &[Suggestion]) {
        self.push(Event::SearchComplete(query.to_string(), suggestions.len()));
    }

    fn on_search_error(&self, query: Option<&str>, error: &SuggestError) {
        self.push(Event::SearchError(query.map(str::to_string), error.kind));
    }

    fn on_select(&self, suggestion: &Suggestion, value_changed: bool) {
        self.push(Event::Select(suggestion.value.clone(), value_changed));
    }

    fn on_select_nothing(&self, query: &str) {
        self.push(Event::SelectNothing(query.to_string()));
    }

    fn on_invalidate_selection(&self, suggestion: &Suggestion) {
        self.push(Event::Invalidate(suggestion.value.clone()));
    }
}

/// Widget over `fetcher` with immediate requests and a recording listener.
pub fn widget(
    options: Value,
    fetcher: &Arc<MockFetcher>,
) -> (Suggestions, Arc<RecordingListener>, Logger) {
    let mut merged = json!({"deferRequestBy": 0});
    if let (Some(base), Some(extra)) = (merged.as_object_mut(), options.as_object()) {
        base.extend(extra.clone());
    }
    let options = SuggestionsOptions::from_value(&merged).expect("valid options");
    let logger = Logger::capturing("test");
    let widget = Suggestions::with_logger(options, fetcher.clone(), logger.clone());
    let listener = RecordingListener::new();
    widget.add_listener(listener.clone());
    (widget, listener, logger)
}
