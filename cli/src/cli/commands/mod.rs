//! Command implementations.

pub mod auth;
pub mod content;
pub mod local;
pub mod media;
pub mod site;

pub use auth::{handle_login, handle_logout, handle_register, handle_status};
pub use content::{handle_areas, handle_articles, handle_team};
pub use local::{handle_asset, handle_completions, handle_prefs};
pub use media::{handle_carousel, handle_media};
pub use site::{handle_contact, handle_settings};

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::auth::session_store::{self, KeyringSessionStore, StoredSession};
use crate::client::{AbortSignal, BufeteApiClient, FileUpload, ListQuery};
use crate::config::{load_config, BufeteConfig};
use crate::cli::args::PageArgs;
use crate::error::Result;

/// Options every command receives from the global flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub api_url: Option<String>,
    pub json: bool,
    pub signal: Option<AbortSignal>,
}

impl Context {
    /// Loads configuration, applying `--api-url`.
    pub fn config(&self) -> Result<BufeteConfig> {
        let mut config = load_config()?;
        if let Some(url) = &self.api_url {
            config.api.base_url.clone_from(url);
        }
        Ok(config)
    }

    /// A client carrying the saved session when there is one.
    ///
    /// Public endpoints work without a session, so a missing or unreadable
    /// keyring only logs.
    pub fn client(&self) -> Result<BufeteApiClient> {
        let client = BufeteApiClient::new(&self.config()?.api)?;
        match KeyringSessionStore::new().and_then(|store| session_store::resume(&client, &store)) {
            Ok(_) => {}
            Err(e) => tracing::debug!("Continuing without saved session: {e}"),
        }
        Ok(client)
    }

    /// A client for an endpoint that needs a logged-in user.
    pub fn authenticated(&self) -> Result<AuthenticatedClient> {
        let client = BufeteApiClient::new(&self.config()?.api)?;
        let store = KeyringSessionStore::new()?;
        let saved = session_store::require(&client, &store)?;
        Ok(AuthenticatedClient {
            client,
            store,
            saved,
        })
    }

    pub fn signal(&self) -> Option<&AbortSignal> {
        self.signal.as_ref()
    }
}

/// A client restored from the saved session.
pub struct AuthenticatedClient {
    pub client: BufeteApiClient,
    store: KeyringSessionStore,
    saved: StoredSession,
}

impl AuthenticatedClient {
    /// Passes `outcome` through after saving cookies rotated during this run.
    pub fn settle<T>(&self, outcome: Result<T>) -> Result<T> {
        session_store::settle(&self.client, &self.store, &self.saved, outcome)
    }
}

/// Builds a list query from paging flags plus resource filters.
pub fn list_query(paging: &PageArgs) -> ListQuery {
    ListQuery::new()
        .page(paging.page)
        .per_page(paging.per_page)
}

/// Reads a file to upload, if a path was given.
pub fn upload_from(path: Option<&Path>) -> Result<Option<FileUpload>> {
    path.map(FileUpload::from_path).transpose()
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Asks a yes/no question on stdin. `assume_yes` skips the prompt.
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Reads one line from stdin after printing `label`.
pub fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Shortens text for table cells.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Renders an optional cell as `-` when empty.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Laboral", 10), "Laboral");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Derecho de familia", 8), "Derecho…");
        assert_eq!(truncate("Mediación", 9), "Mediación");
    }

    #[test]
    fn empty_cells_render_as_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("Socia")), "Socia");
    }

    #[test]
    fn list_query_skips_unset_paging() {
        let query = list_query(&PageArgs {
            page: Some(3),
            per_page: None,
        });
        assert_eq!(query.pairs(), &[("page".to_string(), "3".to_string())]);
    }

    #[test]
    fn missing_upload_path_is_none() {
        assert!(upload_from(None).unwrap().is_none());
    }

    #[test]
    fn upload_reads_file_from_disk() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("logo.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let upload = upload_from(Some(path.as_path())).unwrap().unwrap();
        assert_eq!(upload.file_name, "logo.png");
        assert_eq!(upload.mime_type, "image/png");
        assert_eq!(upload.size(), 4);
    }
}
