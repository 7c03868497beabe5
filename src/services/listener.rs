use crate::errors::SuggestError;
use crate::highlight::Chunk;
use crate::models::Suggestion;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSuggestion {
    pub index: usize,
    pub chunks: Vec<Chunk>,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub selected: bool,
}

pub trait SuggestionsListener: Send + Sync {
    fn render(&self, _suggestions: &[RenderedSuggestion]) {}

    fn hide(&self) {}

    fn on_search_start(&self, _params: &Value) -> bool {
        true
    }

    fn on_search_complete(&self, _query: &str, _suggestions: &[Suggestion]) {}

    fn on_search_error(&self, _query: Option<&str>, _error: &SuggestError) {}

    fn on_select(&self, _suggestion: &Suggestion, _value_changed: bool) {}

    fn on_select_nothing(&self, _query: &str) {}

    fn on_invalidate_selection(&self, _suggestion: &Suggestion) {}
}

#[derive(Clone, Default)]
pub struct Listeners {
    inner: Arc<Mutex<Vec<Arc<dyn SuggestionsListener>>>>,
}

impl Listeners {
    pub fn add(&self, listener: Arc<dyn SuggestionsListener>) {
        self.lock().push(listener);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn SuggestionsListener>>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn each(&self, f: impl Fn(&dyn SuggestionsListener)) {
        let snapshot: Vec<Arc<dyn SuggestionsListener>> = self.lock().clone();
        for listener in snapshot {
            f(listener.as_ref());
        }
    }

    pub fn search_start(&self, params: &Value) -> bool {
        let snapshot: Vec<Arc<dyn SuggestionsListener>> = self.lock().clone();
        snapshot
            .iter()
            .fold(true, |allowed, listener| listener.on_search_start(params) && allowed)
    }
}
