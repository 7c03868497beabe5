use super::{Inner, Suggestions};
use crate::models::Suggestion;
use crate::services::constraints::{constraint_params, parent_params};
use serde_json::{Map, Value};
use std::sync::{Arc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParentEvent {
    Select { value_changed: bool },
    InvalidateSelection,
    Clear,
    Dispose,
}

impl Suggestions {
    pub fn bind_to_parent(&self, parent: &Suggestions) {
        if self.is_ancestor_of(parent) {
            self.inner
                .logger
                .warn("Parent link would form a cycle, ignored", None);
            return;
        }
        self.unbind_from_parent();
        self.state().parent = Some(Arc::downgrade(&parent.inner));
        parent
            .state()
            .children
            .push(Arc::downgrade(&self.inner));
    }

    fn is_ancestor_of(&self, other: &Suggestions) -> bool {
        let mut current = Some(other.clone());
        while let Some(widget) = current {
            if Arc::ptr_eq(&self.inner, &widget.inner) {
                return true;
            }
            current = widget.parent();
        }
        false
    }

    pub fn unbind_from_parent(&self) {
        let parent = self.state().parent.take().and_then(|weak| weak.upgrade());
        if let Some(parent) = parent {
            let me = Arc::downgrade(&self.inner);
            parent
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .children
                .retain(|child| child.strong_count() > 0 && !Weak::ptr_eq(child, &me));
        }
    }

    pub fn parent(&self) -> Option<Suggestions> {
        self.state()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Suggestions::from_inner)
    }

    pub(super) fn notify_children(&self, event: ParentEvent) {
        let children: Vec<Arc<Inner>> = {
            let mut state = self.state();
            state.children.retain(|child| child.strong_count() > 0);
            state.children.iter().filter_map(Weak::upgrade).collect()
        };
        for child in children {
            Suggestions::from_inner(child).on_parent_event(event);
        }
    }

    fn on_parent_event(&self, event: ParentEvent) {
        match event {
            ParentEvent::Select {
                value_changed: false,
            } => {}
            ParentEvent::Select { .. } | ParentEvent::InvalidateSelection | ParentEvent::Clear => {
                self.clear();
            }
            ParentEvent::Dispose => {
                self.state().parent = None;
            }
        }
    }

    pub fn extended_current_value(&self) -> String {
        let parent_value = self.parent().map(|parent| parent.extended_current_value());
        let own = self.value().trim().to_string();
        [parent_value.unwrap_or_default(), own]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(super) fn linked_constraint_params(&self) -> Option<Map<String, Value>> {
        let mut ancestor = self.parent()?;
        loop {
            let data = ancestor
                .selection()
                .and_then(|selection| selection.data_object().cloned());
            if let Some(data) = data {
                return Some(parent_params(&data));
            }
            match ancestor.parent() {
                Some(next) => ancestor = next,
                None => {
                    let restrict_value = self.state().options.restrict_value;
                    return Some(constraint_params(&ancestor.constraints(), restrict_value));
                }
            }
        }
    }

    pub async fn remove_constraint(&self, id: &str) {
        let removed = {
            let mut state = self.state();
            let before = state.constraints.len();
            state.constraints.retain(|constraint| constraint.id != id);
            state.constraints.len() != before
        };
        if removed {
            self.update().await;
        }
    }

    pub(super) fn share_with_parent(&self, suggestion: &Suggestion) {
        let Some(parent) = self.parent() else {
            return;
        };
        if parent.kind() != self.kind() || belongs_to_area(suggestion, &parent) {
            return;
        }
        parent.share_with_parent(suggestion);
        parent.set_suggestion(suggestion.clone());
    }
}

fn belongs_to_area(suggestion: &Suggestion, parent: &Suggestions) -> bool {
    let Some(selection) = parent.selection() else {
        return false;
    };
    let Some(parent_data) = selection.data_object() else {
        return false;
    };
    let data = suggestion.data_object();
    parent.bounds().all.iter().all(|bound| {
        parent_data.get(*bound) == data.and_then(|data| data.get(*bound))
    })
}
