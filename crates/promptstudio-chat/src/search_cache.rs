use std::collections::HashMap;

use promptstudio_models::ToolOutcome;
use serde_json::{json, Value};

/// Maximum unique searches per request
pub const SEARCH_CLAMP_LIMIT: usize = 6;

/// Result of consulting the tracker before a `search_web` call
#[derive(Debug)]
pub enum SearchLookup {
    /// Identical canonical key already resolved; reuse the result as-is
    Cached(ToolOutcome),
    /// Unique-search budget exhausted; `warn` is set the first time only
    Clamped { outcome: ToolOutcome, warn: bool },
    /// Not seen yet; execute and `record` under the returned key
    Miss(String),
}

/// Per-request search deduplication and clamping.
///
/// Keys canonicalize `(query, after, before, time_hint)`; only successful
/// results are cached and counted against the clamp.
#[derive(Debug)]
pub struct SearchTracker {
    cache: HashMap<String, ToolOutcome>,
    unique_count: usize,
    clamp_limit: usize,
    clamp_warning_sent: bool,
}

impl SearchTracker {
    pub fn new(clamp_limit: usize) -> Self {
        Self {
            cache: HashMap::new(),
            unique_count: 0,
            clamp_limit,
            clamp_warning_sent: false,
        }
    }

    pub fn clamp_limit(&self) -> usize {
        self.clamp_limit
    }

    /// Canonical cache key over the search arguments.
    ///
    /// serde_json maps serialize with sorted keys, so the output is stable.
    pub fn cache_key(args: &Value) -> String {
        let text = |key: &str| {
            args.get(key)
                .and_then(Value::as_str)
                .unwrap_or("")
                .trim()
                .to_string()
        };
        json!({
            "q": text("query").to_lowercase(),
            "after": text("after"),
            "before": text("before"),
            "hint": text("time_hint").to_lowercase(),
        })
        .to_string()
    }

    pub fn lookup(&mut self, args: &Value) -> SearchLookup {
        let key = Self::cache_key(args);

        if let Some(cached) = self.cache.get(&key) {
            return SearchLookup::Cached(cached.clone());
        }

        if self.unique_count >= self.clamp_limit {
            let warn = !self.clamp_warning_sent;
            self.clamp_warning_sent = true;
            return SearchLookup::Clamped {
                outcome: ToolOutcome::error(format!(
                    "Search trimmed by clamp ({})",
                    self.clamp_limit
                )),
                warn,
            };
        }

        SearchLookup::Miss(key)
    }

    /// Cache a fresh result; failures are not cached so a retry may succeed
    pub fn record(&mut self, key: String, outcome: &ToolOutcome) {
        if outcome.success {
            self.cache.insert(key, outcome.clone());
            self.unique_count += 1;
        }
    }
}

impl Default for SearchTracker {
    fn default() -> Self {
        Self::new(SEARCH_CLAMP_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(n: u64) -> ToolOutcome {
        ToolOutcome::success(json!({"n": n}))
    }

    #[test]
    fn key_canonicalizes_case_and_whitespace() {
        let a = SearchTracker::cache_key(&json!({"query": "  Finance News ", "time_hint": "Week"}));
        let b = SearchTracker::cache_key(&json!({"query": "finance news", "time_hint": "week"}));
        assert_eq!(a, b);

        let c = SearchTracker::cache_key(&json!({"query": "finance news", "after": "2026-01-01"}));
        assert_ne!(a, c);
    }

    #[test]
    fn duplicate_lookups_hit_the_cache() {
        let mut tracker = SearchTracker::default();
        let args = json!({"query": "rust 1.85"});

        let SearchLookup::Miss(key) = tracker.lookup(&args) else {
            panic!("expected miss");
        };
        tracker.record(key, &success(1));

        match tracker.lookup(&args) {
            SearchLookup::Cached(outcome) => assert_eq!(outcome, success(1)),
            other => panic!("expected cached, got {other:?}"),
        }
    }

    #[test]
    fn failures_are_not_cached_or_counted() {
        let mut tracker = SearchTracker::new(2);
        let args = json!({"query": "flaky"});

        let SearchLookup::Miss(key) = tracker.lookup(&args) else {
            panic!("expected miss");
        };
        tracker.record(key, &ToolOutcome::error("timeout"));

        assert!(matches!(tracker.lookup(&args), SearchLookup::Miss(_)));
    }

    #[test]
    fn seventh_unique_search_is_clamped_with_single_warning() {
        let mut tracker = SearchTracker::default();
        for i in 0..6 {
            let args = json!({"query": format!("q{i}")});
            let SearchLookup::Miss(key) = tracker.lookup(&args) else {
                panic!("expected miss");
            };
            tracker.record(key, &success(i));
        }

        match tracker.lookup(&json!({"query": "q6"})) {
            SearchLookup::Clamped { outcome, warn } => {
                assert!(warn);
                assert_eq!(outcome.error.as_deref(), Some("Search trimmed by clamp (6)"));
            }
            other => panic!("expected clamp, got {other:?}"),
        }

        // Warning fires at most once per request
        match tracker.lookup(&json!({"query": "q7"})) {
            SearchLookup::Clamped { warn, .. } => assert!(!warn),
            other => panic!("expected clamp, got {other:?}"),
        }

        // Cached keys still resolve after the clamp engages
        match tracker.lookup(&json!({"query": "q0"})) {
            SearchLookup::Cached(outcome) => assert_eq!(outcome, success(0)),
            other => panic!("expected cached, got {other:?}"),
        }
    }
}
