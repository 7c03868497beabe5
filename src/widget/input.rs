use super::{FetchPhase, GeoState, Suggestions};
use crate::errors::SuggestError;
use crate::models::Suggestion;
use crate::services::constraints::constraint_params;
use crate::services::controller::SearchRequest;
use futures::FutureExt;
use serde_json::{Map, Value};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub(super) struct RequestFlags {
    pub no_callbacks: bool,
    pub use_enrichment_cache: bool,
}

impl Suggestions {
    pub async fn input(&self, value: &str) {
        let (generation, defer) = {
            let mut state = self.state();
            if state.disabled {
                return;
            }
            state.value = value.to_string();
            state.input_generation += 1;
            state.pending_input = None;
            (state.input_generation, state.options.defer_request_by)
        };
        if self.inner.controller.current_value() == value {
            return;
        }

        self.inner.controller.abort();
        self.state().pending_input = Some(generation);
        if defer > 0 {
            tokio::time::sleep(Duration::from_millis(defer)).await;
        }

        let due = {
            let mut state = self.state();
            if state.pending_input == Some(generation) {
                state.pending_input = None;
                true
            } else {
                false
            }
        };
        if due {
            self.on_value_change().await;
        }
    }

    pub(super) async fn flush_input(&self) {
        let pending = self.state().pending_input.take();
        if pending.is_some() {
            self.on_value_change().await;
        }
    }

    async fn on_value_change(&self) {
        let invalidated = {
            let mut state = self.state();
            state.selected_index = None;
            state.selection.take()
        };
        if let Some(selection) = invalidated {
            self.inner
                .listeners
                .each(|listener| listener.on_invalidate_selection(&selection));
            self.notify_children(super::linkage::ParentEvent::InvalidateSelection);
        }
        self.update().await;
    }

    pub async fn update(&self) {
        let query = {
            let state = self.state();
            if state.disabled {
                return;
            }
            state.value.clone()
        };
        if self.is_query_requestable(&query) {
            self.inner.controller.set_current_value(query.as_str());
            let _ = self.update_suggestions(query).await;
        } else {
            self.hide();
        }
    }

    pub fn is_query_requestable(&self, query: &str) -> bool {
        let state = self.state();
        let Some(kind) = state.kind else {
            return false;
        };
        query.chars().count() >= state.options.min_chars
            && kind.profile().is_query_requestable(query, &state.options)
    }

    pub(super) async fn update_suggestions(&self, query: String) -> Result<Vec<Suggestion>, SuggestError> {
        let this = self.clone();
        let phase: FetchPhase = async move {
            let result = this
                .get_suggestions(&query, Map::new(), RequestFlags::default())
                .await;
            if let Ok(suggestions) = &result {
                this.assign_suggestions(suggestions.clone());
            }
            result
        }
        .boxed()
        .shared();
        self.state().fetch_phase = Some(phase.clone());
        phase.await
    }

    fn assign_suggestions(&self, suggestions: Vec<Suggestion>) {
        self.state().suggestions = suggestions;
        self.suggest();
    }

    pub(super) async fn get_suggestions(
        &self,
        query: &str,
        custom: Map<String, Value>,
        flags: RequestFlags,
    ) -> Result<Vec<Suggestion>, SuggestError> {
        let request = self.search_request(query, custom, flags)?;
        self.inner.controller.get_suggestions(request).await
    }

    fn search_request(
        &self,
        query: &str,
        custom: Map<String, Value>,
        flags: RequestFlags,
    ) -> Result<SearchRequest, SuggestError> {
        let linked = self.linked_constraint_params();
        let state = self.state();
        let kind = state.kind.ok_or_else(|| {
            SuggestError::configuration("Widget has no valid suggestion type")
        })?;
        let options = &state.options;

        let mut params = options.params.clone();
        params.extend(state.bounds.request_params());
        let unrestricted_label = match linked {
            Some(linked) => {
                params.extend(linked);
                None
            }
            None => {
                params.extend(constraint_params(&state.constraints, options.restrict_value));
                match state.constraints.as_slice() {
                    [single] if options.restrict_value => {
                        Some(single.label.clone().unwrap_or_default())
                    }
                    _ => None,
                }
            }
        };
        if kind.profile().geo_enabled() {
            if let GeoState::Resolved(locations) = &state.geo {
                params.insert(
                    "locations_boost".to_string(),
                    Value::Array(locations.clone()),
                );
            }
        }
        params.insert(options.param_name.clone(), Value::String(query.to_string()));
        if options.count > 0 {
            params.insert("count".to_string(), Value::from(options.count));
        }
        for (key, value) in custom {
            if value.is_null() {
                params.remove(&key);
            } else {
                params.insert(key, value);
            }
        }

        Ok(SearchRequest {
            kind,
            query: query.to_string(),
            params: Value::Object(params),
            timeout: Duration::from_millis(options.timeout),
            no_cache: options.no_cache,
            prevent_bad_queries: options.prevent_bad_queries,
            unrestricted_label,
            no_callbacks: flags.no_callbacks,
            use_enrichment_cache: flags.use_enrichment_cache,
        })
    }

    pub fn request_params(&self, query: &str) -> Option<Value> {
        self.search_request(query, Map::new(), RequestFlags::default())
            .ok()
            .map(|request| request.params)
    }

    pub async fn press_space(&self) {
        let enabled = {
            let state = self.state();
            state.options.trigger_select_on_space && state.visible && !state.disabled
        };
        if enabled {
            let options = super::SelectOptions {
                continue_selecting: true,
                dont_enrich: true,
                ..Default::default()
            };
            if self.select_current_value(options).await.is_some() {
                return;
            }
        }
        let value = format!("{} ", self.value());
        self.input(&value).await;
    }
}
