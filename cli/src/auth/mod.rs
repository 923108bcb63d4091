//! Authentication module for bufete.
//!
//! Login itself is a plain API call; this module keeps the resulting session
//! cookie in secure storage so later commands can reuse it.

pub mod session_store;

pub use session_store::{KeyringSessionStore, SessionStore, StoredSession};
