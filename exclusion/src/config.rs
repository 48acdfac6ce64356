//! Exclusion-source configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use meridian_types::KeyType;

/// One configured remote exclusion source.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExclusionSource {
    /// HTTP(S) endpoint serving the signed exclusion list.
    pub url: String,

    /// Hex-encoded public key the source's lists must be signed with.
    pub public_key: String,

    /// Signature scheme of `public_key`.
    pub key_type: KeyType,
}

/// Configuration for the remote exclusion fetcher.
///
/// Can be loaded from a TOML fragment via [`ExclusionFetchConfig::from_toml_str`]
/// or built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExclusionFetchConfig {
    /// Remote sources to fetch, in configuration order.
    #[serde(default)]
    pub sources: Vec<ExclusionSource>,

    /// Seconds between fetch cycles. There is no faster retry on failure;
    /// backoff is interval-based.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_interval_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    20
}

impl Default for ExclusionFetchConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ExclusionFetchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = ExclusionFetchConfig::from_toml_str("").unwrap();
        assert!(config.sources.is_empty());
        assert_eq!(config.interval_secs, 300);
        assert_eq!(config.request_timeout_secs, 20);
    }

    #[test]
    fn parses_sources() {
        let toml_str = r#"
            interval_secs = 60

            [[sources]]
            url = "https://exclusions.example.com/list.json"
            public_key = "aabbcc"
            key_type = "ed25519"

            [[sources]]
            url = "https://other.example.com/list.json"
            public_key = "ddeeff"
            key_type = "secp256k1"
        "#;
        let config = ExclusionFetchConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.sources[0].key_type, KeyType::Ed25519);
        assert_eq!(config.sources[1].key_type, KeyType::Secp256k1);
    }

    #[test]
    fn rejects_unknown_key_type() {
        let toml_str = r#"
            [[sources]]
            url = "https://exclusions.example.com/list.json"
            public_key = "aabbcc"
            key_type = "rsa"
        "#;
        assert!(ExclusionFetchConfig::from_toml_str(toml_str).is_err());
    }
}
