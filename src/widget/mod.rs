mod input;
mod linkage;
mod select;
mod service;

use crate::errors::SuggestError;
use crate::highlight::{highlight, label::suggestion_label};
use crate::models::{Suggestion, SuggestionsOptions};
use crate::services::constraints::{format_constraint, Constraint};
use crate::services::controller::RequestController;
use crate::services::fetcher::SuggestionsFetcher;
use crate::services::listener::Listeners;
use crate::services::logger::Logger;
use crate::types::bounds::Bounds;
use crate::types::{SuggestionType, TypeProfile};
use futures::future::{BoxFuture, Shared};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

pub use crate::services::listener::{RenderedSuggestion, SuggestionsListener};
pub use select::SelectOptions;
pub use service::GeoState;

type FetchPhase = Shared<BoxFuture<'static, Result<Vec<Suggestion>, SuggestError>>>;

#[derive(Clone)]
pub struct Suggestions {
    inner: Arc<Inner>,
}

// No `state` guard is held across an `.await`.
struct Inner {
    logger: Logger,
    controller: RequestController,
    listeners: Listeners,
    state: Mutex<WidgetState>,
}

#[derive(Default)]
struct WidgetState {
    options: SuggestionsOptions,
    kind: Option<SuggestionType>,
    bounds: Bounds,
    constraints: Vec<Constraint>,
    parent: Option<Weak<Inner>>,
    children: Vec<Weak<Inner>>,
    value: String,
    suggestions: Vec<Suggestion>,
    selection: Option<Suggestion>,
    selected_index: Option<usize>,
    visible: bool,
    disabled: bool,
    disposed: bool,
    dropdown_disabled: bool,
    configuration_error: Option<SuggestError>,
    status: Option<Value>,
    geo: GeoState,
    input_generation: u64,
    pending_input: Option<u64>,
    fetch_phase: Option<FetchPhase>,
}

impl Suggestions {
    pub fn new(options: SuggestionsOptions, fetcher: Arc<dyn SuggestionsFetcher>) -> Self {
        Self::with_logger(options, fetcher, Logger::new("suggestions"))
    }

    pub fn with_logger(
        options: SuggestionsOptions,
        fetcher: Arc<dyn SuggestionsFetcher>,
        logger: Logger,
    ) -> Self {
        let logger = logger.child("widget");
        let listeners = Listeners::default();
        let controller = RequestController::new(logger.clone(), fetcher, listeners.clone());
        let widget = Self {
            inner: Arc::new(Inner {
                logger,
                controller,
                listeners,
                state: Mutex::new(WidgetState::default()),
            }),
        };
        let _ = widget.apply_options(options);
        widget
    }

    fn from_inner(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    fn state(&self) -> MutexGuard<'_, WidgetState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_listener(&self, listener: Arc<dyn SuggestionsListener>) {
        self.inner.listeners.add(listener);
    }

    pub fn logger(&self) -> &Logger {
        &self.inner.logger
    }

    pub fn controller(&self) -> &RequestController {
        &self.inner.controller
    }

    pub fn set_options(&self, patch: &Value) -> Result<(), SuggestError> {
        let current = self.state().options.clone();
        match current.merged(patch) {
            Ok(options) => self.apply_options(options),
            Err(err) => {
                self.fail_configuration(err.clone());
                Err(err)
            }
        }
    }

    fn apply_options(&self, options: SuggestionsOptions) -> Result<(), SuggestError> {
        let kind = match options.type_name.as_deref() {
            Some(name) => name.parse::<SuggestionType>(),
            None => Err(SuggestError::configuration("Suggestion type is required")
                .with_hint(format!("Use one of: {}.", SuggestionType::valid_names().join(", ")))
                .with_details(serde_json::json!({ "valid_types": SuggestionType::valid_names() }))),
        };
        let kind = match kind {
            Ok(kind) => kind,
            Err(err) => {
                self.state().options = options;
                self.fail_configuration(err.clone());
                return Err(err);
            }
        };

        let profile = kind.profile();
        let bounds = Bounds::parse(options.bounds.as_deref(), profile.bounds_available());
        let constraints: Vec<Constraint> = options
            .constraints
            .iter()
            .flatten()
            .filter_map(|option| format_constraint(option, profile))
            .collect();

        let mut state = self.state();
        if state.kind != Some(kind) {
            state.status = None;
            state.geo = GeoState::default();
        }
        if state.options.geo_location != options.geo_location {
            state.geo = GeoState::default();
        }
        if state.configuration_error.take().is_some() && !state.disposed {
            state.disabled = false;
        }
        state.kind = Some(kind);
        state.bounds = bounds;
        state.constraints = constraints;
        state.options = options;
        drop(state);

        self.inner.logger.debug(
            "Options applied",
            Some(&serde_json::json!({ "type": kind })),
        );
        Ok(())
    }

    fn fail_configuration(&self, err: SuggestError) {
        self.inner.logger.error(
            "Invalid configuration, widget disabled",
            Some(&serde_json::json!({ "error": err })),
        );
        {
            let mut state = self.state();
            state.kind = None;
            state.disabled = true;
            state.configuration_error = Some(err);
        }
        self.inner.controller.abort();
        self.hide();
    }

    pub fn configuration_error(&self) -> Option<SuggestError> {
        self.state().configuration_error.clone()
    }

    pub fn options(&self) -> SuggestionsOptions {
        self.state().options.clone()
    }

    pub fn kind(&self) -> Option<SuggestionType> {
        self.state().kind
    }

    fn profile(&self) -> Option<&'static dyn TypeProfile> {
        self.state().kind.map(|kind| kind.profile())
    }

    pub fn bounds(&self) -> Bounds {
        self.state().bounds.clone()
    }

    pub fn constraints(&self) -> Vec<Constraint> {
        self.state().constraints.clone()
    }

    pub fn value(&self) -> String {
        self.state().value.clone()
    }

    pub fn current_value(&self) -> String {
        self.inner.controller.current_value()
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.state().suggestions.clone()
    }

    pub fn selection(&self) -> Option<Suggestion> {
        self.state().selection.clone()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state().selected_index
    }

    pub fn activate(&self, index: Option<usize>) {
        let mut state = self.state();
        state.selected_index = index.filter(|idx| *idx < state.suggestions.len());
    }

    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    pub fn is_disabled(&self) -> bool {
        self.state().disabled
    }

    pub fn cache_stats(&self) -> Value {
        self.inner.controller.cache().stats()
    }

    pub fn clear(&self) {
        self.inner.controller.cache().clear();
        self.inner.controller.set_current_value("");
        {
            let mut state = self.state();
            state.selection = None;
            state.suggestions.clear();
            state.value.clear();
        }
        self.hide();
        self.notify_children(linkage::ParentEvent::Clear);
    }

    pub fn clear_cache(&self) {
        self.inner.controller.cache().clear();
    }

    pub fn disable(&self) {
        self.state().disabled = true;
        self.inner.controller.abort();
        self.hide();
    }

    pub fn enable(&self) {
        let mut state = self.state();
        if state.configuration_error.is_none() && !state.disposed {
            state.disabled = false;
        }
    }

    pub fn dispose(&self) {
        {
            let mut state = self.state();
            state.disabled = true;
            state.disposed = true;
            state.pending_input = None;
        }
        self.inner.controller.abort();
        self.hide();
        self.unbind_from_parent();
        self.notify_children(linkage::ParentEvent::Dispose);
        self.inner.listeners.clear();
        self.inner.logger.debug("Disposed", None);
    }

    pub fn hide(&self) {
        {
            let mut state = self.state();
            state.visible = false;
            state.selected_index = None;
        }
        self.inner.listeners.each(|listener| listener.hide());
    }

    pub fn has_suggestions_to_choose(&self) -> bool {
        let state = self.state();
        match state.suggestions.as_slice() {
            [] => false,
            [only] => state
                .selection
                .as_ref()
                .map_or(true, |selection| only.value.trim() != selection.value.trim()),
            _ => true,
        }
    }

    pub fn render_suggestions(&self) -> Vec<RenderedSuggestion> {
        let Some(profile) = self.profile() else {
            return Vec::new();
        };
        let query = self.current_value();
        let state = self.state();
        let max_length = state.options.max_length;
        state
            .suggestions
            .iter()
            .enumerate()
            .map(|(index, suggestion)| RenderedSuggestion {
                index,
                chunks: highlight(
                    &suggestion.value,
                    &query,
                    profile.unformattable_tokens(),
                    max_length,
                ),
                html: profile.format_result(suggestion, &query, max_length),
                label: suggestion_label(&state.suggestions, index, profile.field_names()),
                selected: state.selected_index == Some(index),
            })
            .collect()
    }

    fn suggest(&self) {
        if self.state().dropdown_disabled {
            return;
        }
        if !self.has_suggestions_to_choose() {
            self.hide();
            return;
        }
        {
            let mut state = self.state();
            let selected = state.selection.as_ref().and_then(|selection| {
                state
                    .suggestions
                    .iter()
                    .position(|suggestion| suggestion.same_as(selection))
            });
            state.selected_index = selected.or(state.options.auto_select_first.then_some(0));
            state.visible = true;
        }
        let rendered = self.render_suggestions();
        self.inner.listeners.each(|listener| listener.render(&rendered));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SuggestErrorKind;
    use crate::services::fetcher::FetchRequest;
    use async_trait::async_trait;

    struct Offline;

    #[async_trait]
    impl SuggestionsFetcher for Offline {
        async fn fetch(&self, _request: &FetchRequest) -> Result<Value, SuggestError> {
            Err(SuggestError::network("offline"))
        }
    }

    fn widget(type_name: &str) -> Suggestions {
        Suggestions::with_logger(
            SuggestionsOptions::for_type(type_name),
            Arc::new(Offline),
            Logger::capturing("test"),
        )
    }

    #[test]
    fn unknown_type_disables_widget() {
        let widget = widget("PLANET");
        assert!(widget.is_disabled());
        assert!(widget.kind().is_none());
        let err = widget.configuration_error().unwrap();
        assert_eq!(err.kind, SuggestErrorKind::Configuration);
        assert!(err.hint.unwrap().contains("ADDRESS"));

        widget.enable();
        assert!(widget.is_disabled());
        widget.set_options(&serde_json::json!({"type": "ADDRESS"})).unwrap();
        assert!(!widget.is_disabled());
        assert_eq!(widget.kind(), Some(SuggestionType::Address));
    }

    #[test]
    fn options_resolve_bounds_and_constraints() {
        let widget = widget("ADDRESS");
        widget
            .set_options(&serde_json::json!({
                "bounds": "city-street",
                "constraints": [{"locations": {"region": "Москва"}}, {"locations": {"house": "1"}}]
            }))
            .unwrap();
        assert_eq!(widget.bounds().own, vec!["city", "settlement", "street"]);
        let constraints = widget.constraints();
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].label.as_deref(), Some("Москва"));
    }

    #[test]
    fn one_suggestion_equal_to_selection_is_nothing_to_choose() {
        let widget = widget("NAME");
        {
            let mut state = widget.state();
            state.suggestions = vec![Suggestion::plain("Иванов ")];
            state.selection = Some(Suggestion::plain("Иванов"));
        }
        assert!(!widget.has_suggestions_to_choose());
        widget.state().selection = None;
        assert!(widget.has_suggestions_to_choose());
    }

    #[test]
    fn disable_then_enable() {
        let widget = widget("EMAIL");
        widget.disable();
        assert!(widget.is_disabled());
        widget.enable();
        assert!(!widget.is_disabled());
        widget.dispose();
        widget.enable();
        assert!(widget.is_disabled());
    }
}
