//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`DossierSettings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::DossierSettings;

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<DossierSettings> {
    let defaults = serde_json::to_value(DossierSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: DossierSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
#[must_use]
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Each env var has strict parsing rules; invalid values are silently
/// ignored (falling back to file/default).
pub fn apply_env_overrides(settings: &mut DossierSettings) {
    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = read_env_string("DOSSIER_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("DOSSIER_PORT", 1, 65535) {
        settings.server.port = v;
    }

    // ── Auth ────────────────────────────────────────────────────────
    // Only the key material is overridable; names and limits stay as
    // configured.
    if let Some(v) = read_env_string("DOSSIER_API_KEY_1") {
        if let Some(cred) = settings.auth.keys.first_mut() {
            cred.key = v;
        }
    }
    if let Some(v) = read_env_string("DOSSIER_API_KEY_2") {
        if let Some(cred) = settings.auth.keys.get_mut(1) {
            cred.key = v;
        }
    }

    // ── LLM ─────────────────────────────────────────────────────────
    if let Some(v) = read_env_string("DOSSIER_LLM_BASE_URL") {
        settings.llm.base_url = v;
    }
    if let Some(v) = read_env_string("DOSSIER_RESEARCH_MODEL") {
        settings.llm.research_model = v;
    }
    if let Some(v) = read_env_string("DOSSIER_SUMMARY_MODEL") {
        settings.llm.summary_model = v;
    }
    if let Some(v) = read_env_u64("DOSSIER_LLM_TIMEOUT_SECS", 1, 600) {
        settings.llm.request_timeout_secs = v;
    }

    // ── Cache ───────────────────────────────────────────────────────
    if let Some(v) = read_env_u64("DOSSIER_CACHE_TTL_SECS", 1, 86_400) {
        settings.cache.ttl_secs = v;
    }
    if let Some(v) = read_env_usize("DOSSIER_CACHE_MAX_ENTRIES", 1, 100_000) {
        settings.cache.max_entries = v;
    }

    // ── Rate limits ─────────────────────────────────────────────────
    if let Some(v) = read_env_u64("DOSSIER_RATE_WINDOW_SECS", 1, 3600) {
        settings.rate_limit.window_secs = v;
    }
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    std::env::var(name)
        .ok()?
        .parse::<u16>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    std::env::var(name)
        .ok()?
        .parse::<u64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    std::env::var(name)
        .ok()?
        .parse::<usize>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn deep_merge_overrides_scalars() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"b": 3});
        let merged = deep_merge(target, source);
        assert_eq!(merged, serde_json::json!({"a": 1, "b": 3}));
    }

    #[test]
    fn deep_merge_recurses_into_objects() {
        let target = serde_json::json!({"server": {"host": "127.0.0.1", "port": 8000}});
        let source = serde_json::json!({"server": {"port": 9000}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["server"]["host"], "127.0.0.1");
        assert_eq!(merged["server"]["port"], 9000);
    }

    #[test]
    fn deep_merge_skips_nulls() {
        let target = serde_json::json!({"a": 1});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn deep_merge_replaces_arrays() {
        let target = serde_json::json!({"keys": [1, 2, 3]});
        let source = serde_json::json!({"keys": [9]});
        let merged = deep_merge(target, source);
        assert_eq!(merged["keys"], serde_json::json!([9]));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings =
            load_settings_from_path(Path::new("/nonexistent/dossier-settings.json")).unwrap();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.cache.ttl_secs, 300);
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server": {{"port": 9100}}, "cache": {{"ttl_secs": 60}}}}"#
        )
        .unwrap();
        let settings = load_settings_from_path(file.path()).unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.cache.ttl_secs, 60);
        // Untouched keys keep their defaults
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.cache.max_entries, 100);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(load_settings_from_path(file.path()).is_err());
    }

    #[test]
    fn env_range_parsing_rejects_out_of_range() {
        // Not set at all
        assert_eq!(read_env_u16("DOSSIER_TEST_UNSET_VAR", 1, 10), None);
    }
}
