use url::Url;

use crate::error::Error;

/// Environment variable holding the generator backend's base URL.
pub const API_BASE_VAR: &str = "SAMLTF_API_BASE";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Runtime settings of the front-end.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL every backend path is resolved against.
    pub api_base: Url,
}

impl Settings {
    /// Read settings from the environment, falling back to the local backend.
    pub fn from_env() -> Result<Self, Error> {
        let raw = std::env::var(API_BASE_VAR).unwrap_or_else(|_| DEFAULT_API_BASE.into());
        Self::with_api_base(&raw)
    }

    pub fn with_api_base(raw: &str) -> Result<Self, Error> {
        let api_base = Url::parse(raw)?;
        if api_base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(raw.into()));
        }
        Ok(Self { api_base })
    }
}
