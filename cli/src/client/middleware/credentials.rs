//! Middleware applying the defaults every backend request carries.

use async_trait::async_trait;
use http::header::{HeaderValue, ACCEPT};
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// Marks requests as JSON API calls from the admin client.
///
/// Session cookies themselves are attached by the client's cookie jar.
pub struct CredentialsMiddleware;

#[async_trait]
impl Middleware for CredentialsMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let headers = req.headers_mut();
        headers
            .entry(ACCEPT)
            .or_insert_with(|| HeaderValue::from_static("application/json"));
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );

        tracing::debug!(method = %req.method(), url = %req.url(), "Sending request");
        let response = next.run(req, extensions).await?;
        tracing::debug!(status = %response.status(), url = %response.url(), "Received response");

        Ok(response)
    }
}
