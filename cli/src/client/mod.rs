//! Access layer for the firm's content API.
//!
//! [`BufeteApiClient`] owns the cookie-carrying HTTP stack and the session
//! refresh interceptor. Per-resource endpoints live in [`resources`]; the
//! pure helpers (origin resolution, asset URLs, list normalization, multipart
//! flattening) can be used on their own.

pub mod abort;
pub mod api;
pub mod assets;
pub mod listing;
pub mod middleware;
pub mod multipart;
pub mod origin;
pub mod resources;
pub mod session;

pub use abort::{AbortController, AbortSignal};
pub use api::{BufeteApiClient, ListQuery};
pub use assets::AssetResolver;
pub use listing::{ListPage, PageMeta};
pub use multipart::FileUpload;
