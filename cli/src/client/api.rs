//! Bufete API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::client::abort::{with_signal, AbortSignal};
use crate::client::assets::AssetResolver;
use crate::client::listing::{normalize_list, unwrap_resource, ListPage};
use crate::client::middleware::{CredentialsMiddleware, MultipartReplay, SessionRefreshMiddleware};
use crate::client::multipart::MultipartPayload;
use crate::client::session::RefreshCoordinator;
use crate::config::ApiConfig;
use crate::error::{BufeteError, Result};

/// Query parameters for list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    params: Vec<(String, String)>,
}

impl ListQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter; blank values are ignored.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.params.push((key.into(), value));
        }
        self
    }

    /// Adds a filter when a value is present.
    #[must_use]
    pub fn filter_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.filter(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn page(self, page: Option<u64>) -> Self {
        self.filter_opt("page", page.map(|p| p.to_string()))
    }

    #[must_use]
    pub fn per_page(self, per_page: Option<u64>) -> Self {
        self.filter_opt("per_page", per_page.map(|p| p.to_string()))
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Main API client for communicating with the firm's backend.
pub struct BufeteApiClient {
    client: ClientWithMiddleware,
    base_url: Url,
    cookies: Arc<Jar>,
    coordinator: Arc<RefreshCoordinator>,
    assets: AssetResolver,
}

impl BufeteApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.endpoint_base()?;
        let cookies = Arc::new(Jar::default());

        let inner_client = Client::builder()
            .user_agent(format!("bufete/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_provider(Arc::clone(&cookies))
            .build()?;

        let coordinator = Arc::new(RefreshCoordinator::new());

        // Build middleware stack
        let client = ClientBuilder::new(inner_client.clone())
            .with(CredentialsMiddleware)
            .with(SessionRefreshMiddleware::new(
                Arc::clone(&coordinator),
                base_url.join("auth/refresh")?,
                inner_client,
            ))
            .build();

        Ok(Self {
            client,
            assets: AssetResolver::new(config.asset_origin()),
            base_url,
            cookies,
            coordinator,
        })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolver for asset paths returned by this backend.
    #[must_use]
    pub fn assets(&self) -> &AssetResolver {
        &self.assets
    }

    /// The coordinator serializing session refreshes for this client.
    #[must_use]
    pub fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Resolve an endpoint path relative to the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Session cookies for the backend, as a `Cookie` header value.
    #[must_use]
    pub fn session_cookies(&self) -> Option<String> {
        self.cookies
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(ToString::to_string))
    }

    /// Load cookies saved by [`session_cookies`](Self::session_cookies).
    pub fn restore_session(&self, cookie_header: &str) {
        for pair in cookie_header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.cookies
                .add_cookie_str(&format!("{pair}; Path=/"), &self.base_url);
        }
    }

    /// Fetch a list endpoint and normalize its envelope.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, non-success statuses, or
    /// [`BufeteError::Cancelled`] if `signal` fires first.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
        signal: Option<&AbortSignal>,
    ) -> Result<ListPage<T>> {
        let url = self.endpoint(path)?;
        let request = self.client.get(url).query(query.pairs());
        let body = with_signal(signal, self.send_json(request)).await?;
        Ok(normalize_list(body))
    }

    /// Fetch a single resource, unwrapping a `data` envelope if present.
    pub async fn get_resource<T: DeserializeOwned>(
        &self,
        path: &str,
        signal: Option<&AbortSignal>,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let body = with_signal(signal, self.send_json(self.client.get(url))).await?;
        Ok(unwrap_resource(body)?)
    }

    /// Send a JSON body and return the raw JSON response.
    pub async fn send_json_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let url = self.endpoint(path)?;
        self.send_json(self.client.request(method, url).json(body))
            .await
    }

    /// Send a multipart payload (always as POST) and return the raw JSON response.
    pub async fn send_multipart(&self, path: &str, payload: MultipartPayload) -> Result<Value> {
        let url = self.endpoint(path)?;
        let request = self
            .client
            .post(url)
            .multipart(payload.to_form()?)
            .with_extension(MultipartReplay(payload));
        self.send_json(request).await
    }

    /// Delete a resource.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.endpoint(path)?;
        self.send_json(self.client.delete(url)).await?;
        Ok(())
    }

    /// Send a request, map failures to [`BufeteError`], and parse the body.
    ///
    /// Empty bodies parse as `null`.
    async fn send_json(&self, request: RequestBuilder) -> Result<Value> {
        let response = Self::ensure_success(request.send().await?).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%status, "Request failed");
        Err(BufeteError::from_status(status.as_u16(), &body))
    }
}
