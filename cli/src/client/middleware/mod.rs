//! HTTP client middleware.

pub mod credentials;
pub mod refresh;

pub use credentials::CredentialsMiddleware;
pub use refresh::{MultipartReplay, SessionRefreshMiddleware};
