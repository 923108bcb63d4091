//! Session persistence between CLI invocations.
//!
//! The backend authenticates with an HttpOnly session cookie. After a
//! successful login the cookie header is kept in the OS keyring and replayed
//! into the next process's cookie jar:
//! - macOS: Keychain
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - Windows: Credential Manager

use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};

use crate::client::BufeteApiClient;
use crate::error::{BufeteError, Result};
use crate::models::User;

const SERVICE_NAME: &str = "dev.bufete.cli";
const SESSION_KEY: &str = "session";

/// A saved login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// `Cookie` header value captured after login.
    pub cookies: String,
    /// API base URL the cookies belong to.
    pub api_url: String,
    pub email: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    /// Whether this session was issued by the backend at `api_url`.
    #[must_use]
    pub fn belongs_to(&self, api_url: &str) -> bool {
        self.api_url.trim_end_matches('/') == api_url.trim_end_matches('/')
    }
}

/// Storage for the saved login (enables mocking).
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Loads the saved session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inaccessible or its contents are unreadable.
    fn load(&self) -> Result<Option<StoredSession>>;

    /// Saves a session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inaccessible.
    fn save(&self, session: &StoredSession) -> Result<()>;

    /// Removes the saved session. No-op when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inaccessible.
    fn clear(&self) -> Result<()>;
}

/// Session storage backed by the OS keyring.
pub struct KeyringSessionStore {
    entry: Entry,
}

impl KeyringSessionStore {
    /// Opens the keyring entry for this CLI.
    ///
    /// # Errors
    ///
    /// Returns [`BufeteError::CredentialStorage`] if the keyring service is
    /// unavailable or locked.
    pub fn new() -> Result<Self> {
        let entry = Entry::new(SERVICE_NAME, SESSION_KEY)?;
        Ok(Self { entry })
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<StoredSession>> {
        match self.entry.get_password() {
            Ok(json) => serde_json::from_str(&json).map(Some).map_err(|_| {
                BufeteError::CredentialStorage(
                    "stored session is unreadable; run 'bufete auth logout'".to_string(),
                )
            }),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.entry.set_password(&json)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Loads the saved session into `client`'s cookie jar.
///
/// Returns the session when one was restored. Sessions saved against a
/// different API URL are ignored.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn resume(client: &BufeteApiClient, store: &dyn SessionStore) -> Result<Option<StoredSession>> {
    let Some(session) = store.load()? else {
        return Ok(None);
    };
    if !session.belongs_to(client.base_url().as_str()) {
        tracing::debug!(saved = %session.api_url, "Ignoring session for another backend");
        return Ok(None);
    }
    client.restore_session(&session.cookies);
    Ok(Some(session))
}

/// Like [`resume`] but fails with [`BufeteError::NotAuthenticated`] when no
/// session applies.
///
/// # Errors
///
/// Returns an error if there is no usable session or the store cannot be read.
pub fn require(client: &BufeteApiClient, store: &dyn SessionStore) -> Result<StoredSession> {
    resume(client, store)?.ok_or(BufeteError::NotAuthenticated)
}

/// Captures `client`'s session cookies after logging in as `user`.
///
/// # Errors
///
/// Returns [`BufeteError::AuthenticationFailed`] if the backend set no
/// session cookie, or an error if the store cannot be written.
pub fn persist(
    client: &BufeteApiClient,
    store: &dyn SessionStore,
    user: &User,
) -> Result<StoredSession> {
    let cookies = client.session_cookies().ok_or_else(|| {
        BufeteError::AuthenticationFailed("the backend did not issue a session cookie".to_string())
    })?;
    let session = StoredSession {
        cookies,
        api_url: client.base_url().to_string(),
        email: user.email.clone(),
        saved_at: Utc::now(),
    };
    store.save(&session)?;
    tracing::debug!(email = %session.email, "Session saved");
    Ok(session)
}

/// Re-saves `saved` when a refresh during this run rotated the cookies.
///
/// Returns whether the store was updated.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn save_if_rotated(
    client: &BufeteApiClient,
    store: &dyn SessionStore,
    saved: &StoredSession,
) -> Result<bool> {
    match client.session_cookies() {
        Some(cookies) if cookies != saved.cookies => {
            store.save(&StoredSession {
                cookies,
                saved_at: Utc::now(),
                ..saved.clone()
            })?;
            tracing::debug!("Session cookie rotated");
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Re-saves rotated cookies after `outcome`, whether it succeeded or not.
///
/// A refresh can rotate the cookie before the retried call fails, so the
/// save happens first. A failed save only surfaces when `outcome` is `Ok`.
///
/// # Errors
///
/// Returns the error in `outcome`, or the save error if `outcome` is `Ok`.
pub fn settle<T>(
    client: &BufeteApiClient,
    store: &dyn SessionStore,
    saved: &StoredSession,
    outcome: Result<T>,
) -> Result<T> {
    match (outcome, save_if_rotated(client, store, saved)) {
        (Ok(value), Ok(_)) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), save) => {
            if let Err(save_error) = save {
                tracing::warn!("Could not save rotated session: {save_error}");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn client() -> BufeteApiClient {
        BufeteApiClient::new(&ApiConfig::with_base_url("http://localhost:8000/api")).unwrap()
    }

    fn session(api_url: &str) -> StoredSession {
        StoredSession {
            cookies: "bufete_session=abc".to_string(),
            api_url: api_url.to_string(),
            email: "admin@example.com".to_string(),
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn belongs_to_ignores_trailing_slash() {
        let saved = session("http://localhost:8000/api/");
        assert!(saved.belongs_to("http://localhost:8000/api"));
        assert!(!saved.belongs_to("https://bufete.example.com/api"));
    }

    #[test]
    fn resume_restores_matching_session() {
        let mut store = MockSessionStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|| Ok(Some(session("http://localhost:8000/api/"))));

        let client = client();
        let restored = resume(&client, &store).unwrap();

        assert!(restored.is_some());
        assert_eq!(client.session_cookies().as_deref(), Some("bufete_session=abc"));
    }

    #[test]
    fn resume_skips_session_for_other_backend() {
        let mut store = MockSessionStore::new();
        store
            .expect_load()
            .returning(|| Ok(Some(session("https://bufete.example.com/api/"))));

        let client = client();
        assert!(resume(&client, &store).unwrap().is_none());
        assert!(client.session_cookies().is_none());
    }

    #[test]
    fn require_without_session_is_not_authenticated() {
        let mut store = MockSessionStore::new();
        store.expect_load().returning(|| Ok(None));

        let err = require(&client(), &store).unwrap_err();
        assert!(matches!(err, BufeteError::NotAuthenticated));
    }

    #[test]
    fn persist_saves_cookies_for_this_backend() {
        let client = client();
        client.restore_session("bufete_session=xyz");

        let mut store = MockSessionStore::new();
        store
            .expect_save()
            .withf(|s| s.cookies == "bufete_session=xyz" && s.email == "admin@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let user = User {
            id: 1,
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            role: None,
        };
        let saved = persist(&client, &store, &user).unwrap();
        assert!(saved.belongs_to(client.base_url().as_str()));
    }

    #[test]
    fn unchanged_cookies_are_not_saved_again() {
        let client = client();
        client.restore_session("bufete_session=abc");

        let mut store = MockSessionStore::new();
        store.expect_save().never();

        let saved = session("http://localhost:8000/api/");
        assert!(!save_if_rotated(&client, &store, &saved).unwrap());
    }

    #[test]
    fn rotated_cookies_replace_saved_session() {
        let client = client();
        client.restore_session("bufete_session=rotated");

        let mut store = MockSessionStore::new();
        store
            .expect_save()
            .withf(|s| s.cookies == "bufete_session=rotated" && s.email == "admin@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let saved = session("http://localhost:8000/api/");
        assert!(save_if_rotated(&client, &store, &saved).unwrap());
    }

    #[tokio::test]
    async fn rotated_cookie_is_saved_when_retried_call_fails() {
        use crate::models::TeamMemberInput;
        use serde_json::json;
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/team-members"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Token has expired" })),
            )
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(204)
                    .insert_header("set-cookie", "bufete_session=fresh; Path=/; HttpOnly"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/team-members"))
            .and(header("cookie", "bufete_session=fresh"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "The nombre field is required.",
                "errors": { "nombre": ["The nombre field is required."] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api_url = format!("{}/api", server.uri());
        let client = BufeteApiClient::new(&ApiConfig::with_base_url(&api_url)).unwrap();
        let saved = StoredSession {
            cookies: "bufete_session=stale".to_string(),
            ..session(&api_url)
        };
        client.restore_session(&saved.cookies);

        let mut store = MockSessionStore::new();
        store
            .expect_save()
            .withf(|s| s.cookies == "bufete_session=fresh")
            .times(1)
            .returning(|_| Ok(()));

        let outcome = client
            .create_team_member(&TeamMemberInput::default(), None)
            .await;
        let err = settle(&client, &store, &saved, outcome).unwrap_err();
        assert!(matches!(err, BufeteError::Validation { .. }));
    }

    #[test]
    fn settle_keeps_call_error_when_save_fails() {
        let client = client();
        client.restore_session("bufete_session=rotated");

        let mut store = MockSessionStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(BufeteError::Config("keyring locked".to_string())));

        let saved = session("http://localhost:8000/api/");
        let err = settle::<()>(&client, &store, &saved, Err(BufeteError::NotFound("x".into())))
            .unwrap_err();
        assert!(matches!(err, BufeteError::NotFound(_)));
    }

    #[test]
    fn settle_reports_save_failure_after_success() {
        let client = client();
        client.restore_session("bufete_session=rotated");

        let mut store = MockSessionStore::new();
        store
            .expect_save()
            .returning(|_| Err(BufeteError::Config("keyring locked".to_string())));

        let saved = session("http://localhost:8000/api/");
        let err = settle(&client, &store, &saved, Ok(7)).unwrap_err();
        assert!(matches!(err, BufeteError::Config(_)));
    }

    #[test]
    fn persist_without_cookie_fails() {
        let mut store = MockSessionStore::new();
        store.expect_save().never();

        let user = User {
            id: 1,
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            role: None,
        };
        let err = persist(&client(), &store, &user).unwrap_err();
        assert!(matches!(err, BufeteError::AuthenticationFailed(_)));
    }
}
