use crate::models::Suggestion;
use crate::services::logger::Logger;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct SuggestionCache {
    logger: Logger,
    state: Arc<Mutex<CacheState>>,
}

#[derive(Default)]
struct CacheState {
    responses: HashMap<String, Vec<Suggestion>>,
    enriched: HashMap<String, Suggestion>,
    bad_queries: Vec<String>,
    stats: CacheStats,
}

#[derive(Default)]
struct CacheStats {
    hits: u64,
    misses: u64,
    writes: u64,
    clears: u64,
}

impl SuggestionCache {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger: logger.child("cache"),
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn build_key(&self, params: &Value) -> String {
        let payload = stable_stringify(params);
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<Vec<Suggestion>> {
        let mut state = self.state();
        let found = state.responses.get(key).cloned();
        match found {
            Some(_) => state.stats.hits += 1,
            None => state.stats.misses += 1,
        }
        found
    }

    pub fn store(&self, key: String, suggestions: Vec<Suggestion>) {
        let mut state = self.state();
        state.stats.writes += 1;
        state.responses.insert(key, suggestions);
    }

    pub fn is_bad_query(&self, query: &str) -> bool {
        self.state()
            .bad_queries
            .iter()
            .any(|bad| query.starts_with(bad.as_str()))
    }

    pub fn add_bad_query(&self, query: &str) {
        self.logger.debug(
            "Remembering empty query",
            Some(&serde_json::json!({ "query": query })),
        );
        self.state().bad_queries.push(query.to_string());
    }

    pub fn enriched(&self, query: &str) -> Option<Suggestion> {
        self.state().enriched.get(query).cloned()
    }

    pub fn store_enriched(&self, query: &str, suggestion: Suggestion) {
        self.state().enriched.insert(query.to_string(), suggestion);
    }

    pub fn enrich_response(&self, query: &str, suggestions: &mut [Suggestion]) {
        let Some(enriched) = self.enriched(query) else {
            return;
        };
        if let Some(slot) = suggestions.iter_mut().find(|s| s.value == query) {
            *slot = enriched;
        }
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.responses.clear();
        state.enriched.clear();
        state.bad_queries.clear();
        state.stats.clears += 1;
    }

    pub fn is_empty(&self) -> bool {
        let state = self.state();
        state.responses.is_empty() && state.enriched.is_empty() && state.bad_queries.is_empty()
    }

    pub fn stats(&self) -> Value {
        let state = self.state();
        serde_json::json!({
            "entries": state.responses.len(),
            "enriched": state.enriched.len(),
            "bad_queries": state.bad_queries.len(),
            "hits": state.stats.hits,
            "misses": state.stats.misses,
            "writes": state.stats.writes,
            "clears": state.stats.clears,
        })
    }
}

fn stable_stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => serde_json::to_string(s).unwrap_or_else(|_| s.clone()),
        Value::Array(arr) => {
            let inner: Vec<String> = arr.iter().map(stable_stringify).collect();
            format!("[{}]", inner.join(","))
        }
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            let inner: Vec<String> = keys
                .iter()
                .map(|key| {
                    format!(
                        "{}:{}",
                        serde_json::to_string(key).unwrap_or_default(),
                        stable_stringify(&map[*key])
                    )
                })
                .collect();
            format!("{{{}}}", inner.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache() -> SuggestionCache {
        SuggestionCache::new(Logger::capturing("test"))
    }

    #[test]
    fn key_ignores_field_order() {
        let cache = cache();
        let a = cache.build_key(&json!({"query": "мос", "count": 5, "locations": [{"region": "77"}]}));
        let b = cache.build_key(&json!({"locations": [{"region": "77"}], "count": 5, "query": "мос"}));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, cache.build_key(&json!({"query": "мос", "count": 10})));
    }

    #[test]
    fn bad_queries_match_by_prefix() {
        let cache = cache();
        cache.add_bad_query("xyz");
        assert!(cache.is_bad_query("xyz"));
        assert!(cache.is_bad_query("xyzzy"));
        assert!(!cache.is_bad_query("xy"));
    }

    #[test]
    fn enrichment_replaces_first_equal_value() {
        let cache = cache();
        let full = Suggestion::new("г Москва", Some(json!({"qc": 0})));
        cache.store_enriched("г Москва", full.clone());
        let mut response = vec![
            Suggestion::plain("г Москва, ул Ленина"),
            Suggestion::plain("г Москва"),
            Suggestion::plain("г Москва"),
        ];
        cache.enrich_response("г Москва", &mut response);
        assert_eq!(response[1], full);
        assert_eq!(response[2], Suggestion::plain("г Москва"));
    }

    #[test]
    fn clear_resets_everything() {
        let cache = cache();
        cache.store("k".to_string(), vec![Suggestion::plain("a")]);
        cache.store_enriched("a", Suggestion::plain("a"));
        cache.add_bad_query("zzz");
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("k").is_none());
        assert!(!cache.is_bad_query("zzz"));
        assert_eq!(cache.stats()["clears"], 1);
    }
}
