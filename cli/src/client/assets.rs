//! Turns storage paths returned by the backend into absolute URLs.

/// Resolves possibly-relative asset URLs against the backend origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    origin: Option<String>,
}

impl AssetResolver {
    /// Creates a resolver for the given origin (trailing slashes are ignored).
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self {
            origin: (!origin.is_empty()).then_some(origin),
        }
    }

    /// A resolver with no origin; relative inputs come back unchanged.
    #[must_use]
    pub const fn without_origin() -> Self {
        Self { origin: None }
    }

    /// The origin relative paths are resolved against, if any.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Returns a usable absolute URL for `url`.
    ///
    /// Absolute `http(s)` URLs and `data:`/`blob:` URIs are returned as is.
    /// Empty input yields an empty string.
    #[must_use]
    pub fn resolve(&self, url: Option<&str>) -> String {
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            return String::new();
        };

        if is_passthrough(url) {
            return url.to_string();
        }

        let Some(origin) = self.origin.as_deref() else {
            return url.to_string();
        };

        if url.starts_with('/') && !url.starts_with("//") {
            format!("{origin}{url}")
        } else {
            format!("{origin}/{}", url.trim_start_matches('/'))
        }
    }
}

fn is_passthrough(url: &str) -> bool {
    ["http://", "https://", "data:", "blob:"]
        .iter()
        .any(|prefix| starts_with_ignore_case(url, prefix))
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
