//! Client configuration.
//!
//! The base URL is fixed when the client is built and never changes after
//! that. An empty base URL makes every request path origin-relative.

use serde::Deserialize;

/// Environment variable read by `ClientConfig::from_env`.
pub const BASE_URL_ENV: &str = "PUBLIC_API_URL";

/// Older name, consulted when `PUBLIC_API_URL` is unset.
pub const LEGACY_BASE_URL_ENV: &str = "NEXT_PUBLIC_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read `PUBLIC_API_URL`, then `NEXT_PUBLIC_API_URL`, defaulting to the
    /// empty string.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_ENV)
            .or_else(|| lookup(LEGACY_BASE_URL_ENV))
            .unwrap_or_default();
        Self::new(base_url)
    }

    /// Base URL with any trailing `/` removed.
    pub(crate) fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }
}
