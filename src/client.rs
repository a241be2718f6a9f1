use crate::auth::create_authorization;
use crate::config::{Config, ProxyConfig};
use crate::error::{OmnigageError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = "Omnigage Email Template Demo";
const ACCOUNT_KEY_HEADER: &str = "x-account-key";

/// The main client for interacting with the Omnigage API.
///
/// It holds two `reqwest::Client`s: one carrying the API's base headers
/// (authorization, account key, user agent) and a bare one for posting to
/// presigned storage endpoints, which must not receive the API credentials.
#[derive(Clone)]
pub struct OmnigageClient {
    client: reqwest::Client,
    pub(crate) storage: reqwest::Client,
    base_url: Url,
}

impl OmnigageClient {
    /// Creates a new `OmnigageClient` from a [`Config`].
    ///
    /// # Errors
    ///
    /// - `OmnigageError::InvalidHeader` if the account key or encoded credentials
    ///   are not valid header values.
    /// - `OmnigageError::RequestFailed` if the proxy address is invalid or an
    ///   internal HTTP client fails to build.
    pub fn new(config: &Config) -> Result<Self> {
        let authorization = create_authorization(&config.token_key, &config.token_secret);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", authorization))?,
        );
        headers.insert(
            HeaderName::from_static(ACCOUNT_KEY_HEADER),
            HeaderValue::from_str(&config.account_key)?,
        );

        let mut client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT);
        let mut storage = reqwest::Client::builder();

        if let Some(proxy) = &config.proxy {
            client = client.proxy(build_proxy(proxy)?);
            storage = storage.proxy(build_proxy(proxy)?);
        }

        Ok(Self {
            client: client.build()?,
            storage: storage.build()?,
            base_url: config.host.clone(),
        })
    }

    /// Creates a new `OmnigageClient` with a custom base URL.
    ///
    /// This is useful for testing or for connecting to the sandbox API.
    pub fn new_with_url(
        token_key: &str,
        token_secret: &str,
        account_key: &str,
        base_url: &str,
    ) -> Result<Self> {
        Self::new(&Config::new(token_key, token_secret, account_key, base_url)?)
    }

    /// The API base URL every request path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request to `path` and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// `OmnigageError::ApiError` carrying the status and raw body if the API
    /// answers with a non-success status.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let text = self.send(Method::GET, path, None::<&()>).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Sends `body` as JSON in a POST request to `path`.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.send(Method::POST, path, Some(body)).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Sends `body` as JSON in a PATCH request to `path`.
    ///
    /// The returned value is parsed from the response, i.e. the resource as the
    /// server stored it. A success with an empty body (`204 No Content`) yields
    /// `None`.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.send(Method::PATCH, path, Some(body)).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Sends the request and returns the body of a successful response.
    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;
        debug!(%method, %url, "sending API request");

        let mut request: RequestBuilder = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        checked_body(response).await
    }
}

/// Returns the response body, or `ApiError` for a non-success status.
async fn checked_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    debug!(status = status.as_u16(), "received API response");

    if !status.is_success() {
        return Err(OmnigageError::ApiError {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

fn build_proxy(config: &ProxyConfig) -> Result<reqwest::Proxy> {
    let proxy = reqwest::Proxy::all(config.address.as_str())?;
    Ok(match &config.user {
        Some(user) => proxy.basic_auth(user, config.password.as_deref().unwrap_or_default()),
        None => proxy,
    })
}
