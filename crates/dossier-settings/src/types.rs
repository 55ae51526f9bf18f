//! Settings types with compiled defaults.

use serde::{Deserialize, Serialize};

/// Top-level settings for the dossier service.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DossierSettings {
    /// HTTP server binding.
    pub server: ServerSettings,
    /// API-key credentials and header name.
    pub auth: AuthSettings,
    /// Generation backend configuration.
    pub llm: LlmSettings,
    /// Response cache sizing.
    pub cache: CacheSettings,
    /// Per-endpoint rate-limit ceilings.
    pub rate_limit: RateLimitSettings,
}

/// HTTP server binding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `8000`).
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

/// One configured API key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// The shared-secret key string.
    pub key: String,
    /// Display name for logging.
    pub name: String,
    /// Total-call ceiling for this key.
    pub usage_limit: u64,
}

/// Auth gate configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Request header carrying the key (default `"X-API-Key"`).
    pub header_name: String,
    /// The static credential table.
    pub keys: Vec<CredentialConfig>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            header_name: "X-API-Key".into(),
            keys: vec![
                CredentialConfig {
                    key: "dev_key_123".into(),
                    name: "Development".into(),
                    usage_limit: 100,
                },
                CredentialConfig {
                    key: "demo_key_456".into(),
                    name: "Demo".into(),
                    usage_limit: 50,
                },
            ],
        }
    }
}

/// Generation backend configuration.
///
/// The API key itself is never stored in the settings file; it is read from
/// the `GOOGLE_API_KEY` environment variable at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Gemini API base URL (overridable for tests).
    pub base_url: String,
    /// Model for research and claim verification.
    pub research_model: String,
    /// Model for summarization.
    pub summary_model: String,
    /// Sampling temperature for research.
    pub research_temperature: f64,
    /// Sampling temperature for summaries.
    pub summary_temperature: f64,
    /// Sampling temperature for claim verification (low: factual).
    pub verify_temperature: f64,
    /// Per-request timeout in seconds for generation calls.
    pub request_timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            research_model: "gemini-2.5-flash".into(),
            summary_model: "gemini-2.0-flash".into(),
            research_temperature: 0.3,
            summary_temperature: 0.3,
            verify_temperature: 0.1,
            request_timeout_secs: 60,
        }
    }
}

/// Response cache sizing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Entry time-to-live in seconds (default 300).
    pub ttl_secs: u64,
    /// Maximum cached entries (default 100).
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_entries: 100,
        }
    }
}

/// Per-endpoint rate-limit ceilings over a shared window.
///
/// Heavier multi-stage endpoints get stricter ceilings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Window length in seconds (default 60).
    pub window_secs: u64,
    /// `/research` ceiling per window.
    pub research: u32,
    /// `/summarize` ceiling per window.
    pub summarize: u32,
    /// `/verify` ceiling per window.
    pub verify: u32,
    /// `/complete` ceiling per window (strictest: runs the whole pipeline).
    pub complete: u32,
    /// `/health` ceiling per window (generous).
    pub health: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: 60,
            research: 10,
            summarize: 20,
            verify: 10,
            complete: 3,
            health: 120,
        }
    }
}

impl RateLimitSettings {
    /// Ceiling for a named endpoint, `None` for unlimited endpoints.
    #[must_use]
    pub fn ceiling_for(&self, endpoint: &str) -> Option<u32> {
        match endpoint {
            "research" => Some(self.research),
            "summarize" => Some(self.summarize),
            "verify" => Some(self.verify),
            "complete" => Some(self.complete),
            "health" => Some(self.health),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_server_binding() {
        let s = ServerSettings::default();
        assert_eq!(s.host, "127.0.0.1");
        assert_eq!(s.port, 8000);
    }

    #[test]
    fn default_credentials_table() {
        let a = AuthSettings::default();
        assert_eq!(a.header_name, "X-API-Key");
        assert_eq!(a.keys.len(), 2);
        assert_eq!(a.keys[0].name, "Development");
        assert_eq!(a.keys[0].usage_limit, 100);
        assert_eq!(a.keys[1].name, "Demo");
        assert_eq!(a.keys[1].usage_limit, 50);
    }

    #[test]
    fn default_cache_sizing() {
        let c = CacheSettings::default();
        assert_eq!(c.ttl_secs, 300);
        assert_eq!(c.max_entries, 100);
    }

    #[test]
    fn default_llm_models_and_temperatures() {
        let l = LlmSettings::default();
        assert_eq!(l.research_model, "gemini-2.5-flash");
        assert_eq!(l.summary_model, "gemini-2.0-flash");
        assert!((l.verify_temperature - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn complete_is_strictest_ceiling() {
        let r = RateLimitSettings::default();
        assert!(r.complete < r.research);
        assert!(r.research <= r.summarize);
        assert!(r.health > r.summarize);
    }

    #[test]
    fn ceiling_lookup() {
        let r = RateLimitSettings::default();
        assert_eq!(r.ceiling_for("complete"), Some(3));
        assert_eq!(r.ceiling_for("health"), Some(120));
        assert_eq!(r.ceiling_for("stats"), None);
    }

    #[test]
    fn settings_serde_roundtrip() {
        let s = DossierSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: DossierSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.server.port, s.server.port);
        assert_eq!(back.auth.keys.len(), s.auth.keys.len());
        assert_eq!(back.rate_limit.complete, s.rate_limit.complete);
    }
}
