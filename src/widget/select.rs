use super::input::RequestFlags;
use super::Suggestions;
use crate::matchers::find_in_pipeline;
use crate::models::Suggestion;
use crate::types::bounds::{bounded_kladr_id, copy_bounded_data, Bounds};
use crate::types::TypeProfile;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    pub continue_selecting: bool,
    pub no_space: bool,
    pub dont_enrich: bool,
}

impl Suggestions {
    pub async fn select_current_value(&self, options: SelectOptions) -> Option<usize> {
        if self.is_disabled() {
            return None;
        }
        self.flush_input().await;

        let phase = self.state().fetch_phase.clone();
        if let Some(phase) = phase {
            if phase.await.is_err() {
                return None;
            }
        }

        {
            let state = self.state();
            if state.selection.is_some() && !state.visible {
                return None;
            }
        }

        let index = self.find_suggestion_index();
        self.select(index, options).await;
        index
    }

    pub fn find_suggestion_index(&self) -> Option<usize> {
        let state = self.state();
        if state.selected_index.is_some() {
            return state.selected_index;
        }
        let profile = state.kind?.profile();
        find_in_pipeline(profile.matchers(), &state.value, &state.suggestions)
    }

    pub async fn select(&self, index: Option<usize>, options: SelectOptions) {
        let last_value = self.current_value();
        let (picked, has_selection) = {
            let state = self.state();
            let picked = index.and_then(|idx| {
                state
                    .suggestions
                    .get(idx)
                    .cloned()
                    .map(|suggestion| (idx, suggestion))
            });
            (picked, state.selection.is_some())
        };

        let Some((index, suggestion)) = picked else {
            if !options.continue_selecting && !has_selection {
                self.inner
                    .listeners
                    .each(|listener| listener.on_select_nothing(&last_value));
            }
            self.on_select_complete(options.continue_selecting).await;
            return;
        };

        let (suggestion, enriched) = self.enrich_suggestion(suggestion, options).await;
        self.select_suggestion(suggestion, index, &last_value, options, enriched)
            .await;
    }

    pub(super) async fn select_suggestion(
        &self,
        mut suggestion: Suggestion,
        index: usize,
        last_value: &str,
        options: SelectOptions,
        has_been_enriched: bool,
    ) {
        let Some(profile) = self.profile() else {
            return;
        };
        let (complete, bounds) = {
            let mut state = self.state();
            let complete = profile.is_data_complete(&suggestion, &state.options, &state.bounds);
            if has_been_enriched {
                match state.suggestions.get_mut(index) {
                    Some(slot) => *slot = suggestion.clone(),
                    None => state.suggestions.push(suggestion.clone()),
                }
            }
            (complete, state.bounds.clone())
        };
        let continue_selecting =
            (options.continue_selecting || profile.always_continue_selecting()) && !complete;

        check_value_bounds(&mut suggestion, profile, &bounds);
        let mut value = suggestion_value(&suggestion, profile);
        if !value.is_empty() && !options.no_space && !complete {
            value.push(' ');
        }
        self.inner.controller.set_current_value(value.as_str());
        self.state().value = value.clone();

        if value.is_empty() {
            self.state().selection = None;
            self.inner
                .listeners
                .each(|listener| listener.on_select_nothing(&value));
        } else {
            let changed = {
                let mut state = self.state();
                let same = state
                    .selection
                    .as_ref()
                    .map_or(false, |previous| suggestion.same_as(previous));
                state.selection = Some(suggestion.clone());
                !same
            };
            if changed {
                let value_changed = value != last_value;
                self.inner.logger.debug(
                    "Selected",
                    Some(&serde_json::json!({ "value": value, "value_changed": value_changed })),
                );
                self.inner
                    .listeners
                    .each(|listener| listener.on_select(&suggestion, value_changed));
                self.notify_children(super::linkage::ParentEvent::Select { value_changed });
            }
            self.on_select_complete(continue_selecting).await;
        }

        self.share_with_parent(&suggestion);
    }

    async fn on_select_complete(&self, continue_selecting: bool) {
        if continue_selecting {
            self.state().selected_index = None;
            let query = self.current_value();
            let _ = self.update_suggestions(query).await;
        } else {
            self.hide();
        }
    }

    pub fn set_suggestion(&self, suggestion: Suggestion) {
        let Some(profile) = self.profile() else {
            return;
        };
        if suggestion.data_object().is_none() {
            return;
        }
        let mut suggestion = suggestion;
        let bounds = self.bounds();
        if !bounds.is_empty() {
            check_value_bounds(&mut suggestion, profile, &bounds);
            if let Some(data) = suggestion.data.take() {
                let mut bounded = copy_bounded_data(&data, &bounds.all, |bound| {
                    profile.bound_fields(bound)
                });
                let kladr_id = data
                    .get("kladr_id")
                    .and_then(Value::as_str)
                    .and_then(|kladr_id| bounded_kladr_id(kladr_id, &bounds.all));
                if let Some(kladr_id) = kladr_id {
                    bounded.insert("kladr_id".to_string(), Value::String(kladr_id));
                }
                suggestion.data = Some(Value::Object(bounded));
            }
        }

        let value = suggestion_value(&suggestion, profile);
        self.inner.controller.set_current_value(value.as_str());
        {
            let mut state = self.state();
            state.value = value;
            state.selection = Some(suggestion.clone());
            state.suggestions = vec![suggestion];
        }
        self.inner.controller.abort();
    }

    pub async fn fix_data(&self) {
        let full_query = self.extended_current_value();
        let last_value = self.value();

        let mut fixed = None;
        if self.is_query_requestable(&full_query) {
            self.inner.controller.set_current_value(full_query.as_str());
            let mut custom = Map::new();
            custom.insert("count".to_string(), Value::from(1));
            custom.insert("from_bound".to_string(), Value::Null);
            custom.insert("to_bound".to_string(), Value::Null);
            if let Ok(found) = self
                .get_suggestions(&full_query, custom, RequestFlags::default())
                .await
            {
                fixed = found.into_iter().next();
            }
        }

        match fixed {
            Some(suggestion) => {
                self.select_suggestion(suggestion, 0, &last_value, SelectOptions::default(), true)
                    .await;
            }
            None => {
                self.inner.controller.set_current_value("");
                let mut state = self.state();
                state.selection = None;
                state.value.clear();
            }
        }
    }
}

fn suggestion_value(suggestion: &Suggestion, profile: &dyn TypeProfile) -> String {
    profile
        .format_selected(suggestion)
        .filter(|formatted| !formatted.is_empty())
        .unwrap_or_else(|| suggestion.value.clone())
}

fn check_value_bounds(suggestion: &mut Suggestion, profile: &dyn TypeProfile, bounds: &Bounds) {
    if bounds.own.is_empty() {
        return;
    }
    let Some(data) = suggestion.data_object() else {
        return;
    };
    let own = copy_bounded_data(data, &bounds.own, |bound| profile.bound_fields(bound));
    if let Some(value) = profile.compose_value(&Value::Object(own)) {
        suggestion.value = value;
    }
}
