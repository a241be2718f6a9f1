use crate::error::{OmnigageError, Result};
use std::env;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.omnigage.io/api/v1/";

/// Optional forward proxy used for every outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy address, e.g. `http://debugproxy.com:8080`.
    pub address: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Credentials and connection settings for one run against the Omnigage API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Token key from Account -> Developer -> API Tokens.
    pub token_key: String,
    /// Token secret paired with `token_key`.
    pub token_secret: String,
    /// The "Key" field from Account -> Settings -> General.
    pub account_key: String,
    /// API base URL. Always ends with `/` so relative paths join beneath it.
    pub host: Url,
    pub proxy: Option<ProxyConfig>,
}

impl Config {
    /// Creates a configuration for the given credentials and API host.
    ///
    /// A missing trailing slash on `host` is added, otherwise `Url::join`
    /// would replace the last path segment (`.../v1` + `uploads` -> `.../uploads`).
    ///
    /// # Errors
    ///
    /// - `OmnigageError::UrlParseFailed` if `host` is not a valid URL.
    pub fn new(
        token_key: impl Into<String>,
        token_secret: impl Into<String>,
        account_key: impl Into<String>,
        host: &str,
    ) -> Result<Self> {
        let host = if host.ends_with('/') {
            Url::parse(host)?
        } else {
            Url::parse(&format!("{host}/"))?
        };

        Ok(Self {
            token_key: token_key.into(),
            token_secret: token_secret.into(),
            account_key: account_key.into(),
            host,
            proxy: None,
        })
    }

    /// Routes all requests through `proxy`.
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Loads the configuration from environment variables.
    ///
    /// Required: `OMNIGAGE_TOKEN_KEY`, `OMNIGAGE_TOKEN_SECRET`, `OMNIGAGE_ACCOUNT_KEY`.
    /// Optional: `OMNIGAGE_HOST` (defaults to the production API), and
    /// `OMNIGAGE_PROXY_HOST` with `OMNIGAGE_PROXY_USER` / `OMNIGAGE_PROXY_PASS`.
    ///
    /// A variable set to the empty string is treated as unset, so an empty
    /// credential fails with [`OmnigageError::MissingConfig`].
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        let token_key = required("OMNIGAGE_TOKEN_KEY")?;
        let token_secret = required("OMNIGAGE_TOKEN_SECRET")?;
        let account_key = required("OMNIGAGE_ACCOUNT_KEY")?;
        let host = optional("OMNIGAGE_HOST").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let mut config = Self::new(token_key, token_secret, account_key, &host)?;

        if let Some(address) = optional("OMNIGAGE_PROXY_HOST") {
            config = config.with_proxy(ProxyConfig {
                address,
                user: optional("OMNIGAGE_PROXY_USER"),
                password: optional("OMNIGAGE_PROXY_PASS"),
            });
        }

        Ok(config)
    }
}

fn required(name: &'static str) -> Result<String> {
    optional(name).ok_or(OmnigageError::MissingConfig(name))
}

// Empty values count as unset, for required and optional variables alike.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_gets_trailing_slash() {
        let config = Config::new("k", "s", "a", "https://api.omnigage.io/api/v1").unwrap();
        assert_eq!(config.host.as_str(), "https://api.omnigage.io/api/v1/");
        assert_eq!(
            config.host.join("uploads").unwrap().as_str(),
            "https://api.omnigage.io/api/v1/uploads"
        );
    }

    #[test]
    fn invalid_host_is_rejected() {
        let result = Config::new("k", "s", "a", "not a url");
        assert!(matches!(result, Err(OmnigageError::UrlParseFailed(_))));
    }

    #[test]
    fn empty_required_variable_is_missing() {
        env::set_var("OMNIGAGE_TEST_EMPTY_REQUIRED", "");
        let result = required("OMNIGAGE_TEST_EMPTY_REQUIRED");
        assert!(matches!(
            result,
            Err(OmnigageError::MissingConfig("OMNIGAGE_TEST_EMPTY_REQUIRED"))
        ));
    }

    #[test]
    fn unset_required_variable_is_missing() {
        env::remove_var("OMNIGAGE_TEST_UNSET_REQUIRED");
        assert!(matches!(
            required("OMNIGAGE_TEST_UNSET_REQUIRED"),
            Err(OmnigageError::MissingConfig(_))
        ));
    }

    #[test]
    fn set_required_variable_is_returned() {
        env::set_var("OMNIGAGE_TEST_SET_REQUIRED", "value");
        assert_eq!(required("OMNIGAGE_TEST_SET_REQUIRED").unwrap(), "value");
    }
}
