#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use power_dash::config::{AggregationSettings, SyntheticSettings};
use power_dash::db::SyntheticSource;
use power_dash::services::{DataContext, SeriesCache, ViewSettings};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::apply(changes);
    f()
}

struct ScopedEnv {
    previous: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let previous = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (key, value) in changes {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }

        Self { previous }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Small, fully observed synthetic dataset.
pub fn synthetic_settings() -> SyntheticSettings {
    SyntheticSettings {
        days: 3,
        missing_ratio: 0.0,
        provinces: vec!["Guangdong".to_string(), "Shandong".to_string()],
        ..Default::default()
    }
}

/// Context over [`synthetic_settings`] with default aggregation settings.
pub fn synthetic_context(cache: SeriesCache) -> DataContext {
    let source = SyntheticSource::generate(&synthetic_settings());
    DataContext::new(
        Arc::new(source),
        cache,
        ViewSettings::from_settings(&AggregationSettings::default())
            .expect("default aggregation settings"),
    )
}
