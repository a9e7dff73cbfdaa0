use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const BASE_URL_ENV: &str = "BOOKSTORE_API_URL";

/// Where the JSON store lives. Passed explicitly into
/// [`crate::api::ApiClient::new`] so several stores can be targeted side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
}

impl Settings {
    /// Validate `base_url` and drop trailing slashes.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        reqwest::Url::parse(trimmed)
            .with_context(|| format!("invalid store URL '{base_url}'"))?;
        Ok(Settings {
            base_url: trimmed.to_string(),
        })
    }

    /// Read `BOOKSTORE_API_URL`, or use `http://localhost:3000`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(&base_url).with_context(|| format!("failed to read {BASE_URL_ENV}"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
