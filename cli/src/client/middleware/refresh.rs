//! Session refresh middleware.
//!
//! When a request fails with a 401 whose message says the session *expired*,
//! the middleware refreshes the session once (shared with every concurrent
//! caller through a [`RefreshCoordinator`]) and re-issues the original request
//! exactly once. Anything else passes through untouched.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::{HeaderMap, ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use http::{Extensions, Method};
use reqwest::{Client, Request, Response, StatusCode};
use reqwest_middleware::{Error, Middleware, Next, Result};
use url::Url;

use crate::client::multipart::MultipartPayload;
use crate::client::session::{RefreshCoordinator, RefreshOutcome, Ticket};

/// Endpoints whose 401s are final and never trigger a refresh.
pub const AUTH_ENDPOINTS: [&str; 3] = ["auth/login", "auth/register", "auth/refresh"];

/// Extension marking a request that was already re-issued after a refresh.
#[derive(Debug, Clone, Copy)]
pub struct AlreadyRetried;

/// Extension carrying the payload of a multipart request, whose streaming body
/// cannot be cloned, so it can be rebuilt for the retry.
#[derive(Debug, Clone)]
pub struct MultipartReplay(pub MultipartPayload);

/// Middleware that refreshes expired sessions and retries the failed request.
pub struct SessionRefreshMiddleware {
    coordinator: Arc<RefreshCoordinator>,
    refresh_url: Url,
    inner_client: Client,
}

impl SessionRefreshMiddleware {
    /// Create a new session refresh middleware.
    ///
    /// `inner_client` must share the cookie jar of the wrapped client so the
    /// renewed session is visible to the retry.
    #[must_use]
    pub fn new(coordinator: Arc<RefreshCoordinator>, refresh_url: Url, inner_client: Client) -> Self {
        Self {
            coordinator,
            refresh_url,
            inner_client,
        }
    }

    async fn refresh_session(&self) -> RefreshOutcome {
        let result = self
            .inner_client
            .post(self.refresh_url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Session refreshed");
                RefreshOutcome::Refreshed
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Session refresh rejected");
                RefreshOutcome::Failed
            }
            Err(e) => {
                tracing::warn!("Session refresh failed: {e}");
                RefreshOutcome::Failed
            }
        }
    }
}

/// Whether `url` targets one of the [`AUTH_ENDPOINTS`].
#[must_use]
pub fn is_auth_endpoint(url: &Url) -> bool {
    let path = url.path().trim_end_matches('/');
    AUTH_ENDPOINTS
        .iter()
        .any(|endpoint| path.ends_with(&format!("/{endpoint}")) || path == *endpoint)
}

/// Whether a 401 body reports an expired session rather than a missing one.
#[must_use]
pub fn is_expired_session(body: &[u8]) -> bool {
    let message = match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => ["message", "error"]
            .iter()
            .filter_map(|key| json.get(*key).and_then(|v| v.as_str()))
            .collect::<Vec<_>>()
            .join(" "),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    };
    message.to_lowercase().contains("expired")
}

/// A way to re-issue the original request.
enum Replay {
    Cloned(Request),
    Multipart {
        method: Method,
        url: Url,
        headers: HeaderMap,
        payload: MultipartPayload,
    },
    Unavailable,
}

impl Replay {
    fn capture(req: &Request, extensions: &Extensions) -> Self {
        if let Some(clone) = req.try_clone() {
            return Self::Cloned(clone);
        }
        match extensions.get::<MultipartReplay>() {
            Some(MultipartReplay(payload)) => Self::Multipart {
                method: req.method().clone(),
                url: req.url().clone(),
                headers: req.headers().clone(),
                payload: payload.clone(),
            },
            None => Self::Unavailable,
        }
    }

    fn into_request(self, client: &Client) -> Result<Option<Request>> {
        match self {
            Self::Cloned(req) => Ok(Some(req)),
            Self::Multipart {
                method,
                url,
                mut headers,
                payload,
            } => {
                // The rebuilt form gets a new boundary.
                headers.remove(CONTENT_TYPE);
                headers.remove(CONTENT_LENGTH);
                let form = payload.to_form().map_err(Error::middleware)?;
                let req = client
                    .request(method, url)
                    .headers(headers)
                    .multipart(form)
                    .build()?;
                Ok(Some(req))
            }
            Self::Unavailable => Ok(None),
        }
    }
}

/// Reads a 401 body to decide whether it is refresh-worthy, handing back an
/// equivalent response either way.
async fn inspect_unauthorized(response: Response) -> Result<(Response, bool)> {
    let status = response.status();
    let version = response.version();
    let headers = response.headers().clone();
    let body = response.bytes().await?;

    let expired = is_expired_session(&body);

    let mut rebuilt = http::Response::new(body);
    *rebuilt.status_mut() = status;
    *rebuilt.version_mut() = version;
    *rebuilt.headers_mut() = headers;

    Ok((Response::from(rebuilt), expired))
}

#[async_trait]
impl Middleware for SessionRefreshMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        if is_auth_endpoint(req.url()) || extensions.get::<AlreadyRetried>().is_some() {
            return next.run(req, extensions).await;
        }

        let url = req.url().clone();
        let replay = Replay::capture(&req, extensions);
        let response = next.clone().run(req, extensions).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let (response, expired) = inspect_unauthorized(response).await?;
        if !expired {
            return Ok(response);
        }

        let Some(retry) = replay.into_request(&self.inner_client)? else {
            tracing::warn!(%url, "Session expired but request body cannot be replayed");
            return Ok(response);
        };

        let outcome = match self.coordinator.begin() {
            Ticket::Leader(lease) => {
                tracing::debug!(%url, "Session expired, refreshing");
                let outcome = self.refresh_session().await;
                let released = lease.settle(outcome);
                tracing::debug!(released, "Released requests waiting on refresh");
                outcome
            }
            Ticket::Waiter(waiter) => {
                tracing::debug!(%url, "Waiting for in-flight session refresh");
                waiter.wait().await
            }
        };

        tracing::debug!(%url, ?outcome, "Retrying request after session refresh");
        extensions.insert(AlreadyRetried);
        next.run(retry, extensions).await
    }
}
