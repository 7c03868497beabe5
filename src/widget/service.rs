use super::input::RequestFlags;
use super::{SelectOptions, Suggestions};
use crate::errors::SuggestError;
use crate::models::Suggestion;
use crate::services::fetcher::{FetchRequest, ServiceMethod};
use crate::utils::json_path::is_truthy;
use serde_json::{Map, Value};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum GeoState {
    #[default]
    Unresolved,
    Resolved(Vec<Value>),
    Unavailable,
}

impl Suggestions {
    pub fn status(&self) -> Option<Value> {
        self.state().status.clone()
    }

    pub fn geo_state(&self) -> GeoState {
        self.state().geo.clone()
    }

    pub async fn check_status(&self) -> Result<Value, SuggestError> {
        let (kind, timeout) = {
            let state = self.state();
            if let Some(status) = &state.status {
                return Ok(status.clone());
            }
            let kind = state.kind.ok_or_else(|| {
                SuggestError::configuration("Widget has no valid suggestion type")
            })?;
            (kind, Duration::from_millis(state.options.timeout))
        };

        let request = FetchRequest::new(ServiceMethod::Status, kind, Value::Object(Map::new()), timeout);
        let outcome = self
            .inner
            .controller
            .fetch(request)
            .await
            .and_then(|status| {
                if status.get("search").map_or(false, is_truthy) {
                    Ok(status)
                } else {
                    Err(SuggestError::network("Service Unavailable")
                        .with_details(serde_json::json!({ "status": status })))
                }
            });

        match outcome {
            Ok(status) => {
                self.inner.logger.debug(
                    "Service status",
                    Some(&serde_json::json!({ "type": kind, "status": status })),
                );
                self.state().status = Some(status.clone());
                Ok(status)
            }
            Err(err) => {
                self.inner.logger.warn(
                    "Service status check failed",
                    Some(&serde_json::json!({ "type": kind, "error": err })),
                );
                self.inner
                    .listeners
                    .each(|listener| listener.on_search_error(None, &err));
                Err(err)
            }
        }
    }

    pub async fn check_location(&self) -> GeoState {
        let (kind, option, timeout, current) = {
            let state = self.state();
            let Some(kind) = state.kind else {
                return GeoState::Unavailable;
            };
            (
                kind,
                state.options.geo_location.clone(),
                Duration::from_millis(state.options.timeout),
                state.geo.clone(),
            )
        };
        if current != GeoState::Unresolved {
            return current;
        }

        let resolved = if !kind.profile().geo_enabled() || !option.enabled() {
            GeoState::Unavailable
        } else if let Some(explicit) = option.explicit() {
            GeoState::Resolved(explicit)
        } else {
            let request = FetchRequest::new(
                ServiceMethod::DetectAddressByIp,
                kind,
                Value::Object(Map::new()),
                timeout,
            );
            match self.inner.controller.fetch(request).await {
                Ok(response) => response
                    .pointer("/location/data")
                    .filter(|data| data.get("kladr_id").map_or(false, is_truthy))
                    .map(|data| GeoState::Resolved(vec![data.clone()]))
                    .unwrap_or(GeoState::Unavailable),
                Err(err) => {
                    self.inner.logger.debug(
                        "Location lookup failed",
                        Some(&serde_json::json!({ "error": err })),
                    );
                    GeoState::Unavailable
                }
            }
        };

        self.state().geo = resolved.clone();
        resolved
    }

    pub(super) async fn enrich_suggestion(
        &self,
        suggestion: Suggestion,
        options: SelectOptions,
    ) -> (Suggestion, bool) {
        let wanted = {
            let state = self.state();
            let enrich_available = state
                .status
                .as_ref()
                .and_then(|status| status.get("enrich"))
                .map_or(false, is_truthy);
            let profile_enriches = state
                .kind
                .map_or(false, |kind| kind.profile().enrichment_enabled());
            enrich_available
                && profile_enriches
                && state.options.token().is_some()
                && !options.dont_enrich
        };
        let has_quality = suggestion
            .data_value("qc")
            .map_or(false, |qc| !qc.is_null());
        if !wanted || has_quality {
            return (suggestion, false);
        }

        self.state().dropdown_disabled = true;
        self.inner
            .controller
            .set_current_value(suggestion.value.as_str());
        let mut custom = Map::new();
        custom.insert("count".to_string(), Value::from(1));
        let flags = RequestFlags {
            no_callbacks: true,
            use_enrichment_cache: true,
        };
        let result = self.get_suggestions(&suggestion.value, custom, flags).await;
        self.state().dropdown_disabled = false;

        match result {
            Ok(found) => match found.into_iter().next() {
                Some(enriched) => {
                    self.inner.logger.debug(
                        "Suggestion enriched",
                        Some(&serde_json::json!({ "value": enriched.value })),
                    );
                    (enriched, true)
                }
                None => (suggestion, false),
            },
            Err(_) => (suggestion, false),
        }
    }
}
