use serde::Deserialize;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://traindata-stag-api.railsmart.io/api";

const KEY_VAR: &str = "VELOCITI_API_KEY";
const BASE_VAR: &str = "VELOCITI_API_BASE";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

impl ApiConfig {
    /// Read `VELOCITI_API_KEY` and `VELOCITI_API_BASE` from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name| lookup(name).filter(|v: &String| !v.trim().is_empty());
        Self {
            base_url: non_empty(BASE_VAR).unwrap_or_else(default_base_url),
            api_key: non_empty(KEY_VAR),
        }
    }

    pub fn require_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(ApiError::MissingApiKey)
    }
}
