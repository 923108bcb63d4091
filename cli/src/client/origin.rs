//! Backend origin resolution.
//!
//! Every fallback for a missing or malformed base URL lives here so the policy
//! is defined once.

use url::Url;

/// Origin used when nothing usable is configured.
pub const DEV_ORIGIN: &str = "http://localhost:8000";

/// Returns the scheme+host(+port) of an absolute URL, or `None` if `url` is
/// not a well-formed absolute URL with a host.
#[must_use]
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let origin = parsed.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Resolves the backend origin.
///
/// Tries the explicit origin, then the origin of the base URL, and finally
/// falls back to [`DEV_ORIGIN`].
#[must_use]
pub fn resolve_origin(explicit_origin: Option<&str>, base_url: Option<&str>) -> String {
    explicit_origin
        .and_then(origin_of)
        .or_else(|| base_url.and_then(origin_of))
        .unwrap_or_else(|| {
            tracing::debug!("No usable API origin configured, using {DEV_ORIGIN}");
            DEV_ORIGIN.to_string()
        })
}
