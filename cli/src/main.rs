//! Bufete - admin CLI for the firm's website backend.

use bufete::auth::{KeyringSessionStore, SessionStore};
use bufete::cli::commands::{self, Context};
use bufete::cli::{AuthCommands, Cli, Commands};
use bufete::client::AbortController;
use bufete::config::settings::env;
use bufete::error::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Exit status for a run stopped by Ctrl-C.
const INTERRUPTED: i32 = 130;
const INTERRUPT_GRACE: std::time::Duration = std::time::Duration::from_millis(300);

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(env::LOG_LEVEL).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Ctrl-C aborts signal-aware requests; anything else exits shortly after
    let controller = AbortController::new();
    let ctx = Context {
        api_url: cli.api_url.clone(),
        json: cli.json,
        signal: Some(controller.signal()),
    };
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            controller.abort();
            tokio::time::sleep(INTERRUPT_GRACE).await;
            std::process::exit(INTERRUPTED);
        }
    });

    // Run the command
    if let Err(e) = run(cli.command, &ctx).await {
        if e.is_cancelled() {
            eprintln!("Cancelled.");
            std::process::exit(INTERRUPTED);
        }
        if e.requires_reauth() {
            forget_session();
        }
        eprintln!("Error: {e}");
        if e.is_retriable() {
            eprintln!("The backend may be briefly unavailable; try again in a moment.");
        }
        std::process::exit(1);
    }
}

/// Drops a stored session the backend no longer accepts.
fn forget_session() {
    if let Err(e) = KeyringSessionStore::new().and_then(|store| store.clear()) {
        tracing::debug!("Could not clear stored session: {e}");
    }
}

async fn run(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Auth { command } => match command {
            AuthCommands::Login {
                email,
                password,
                remember,
            } => commands::handle_login(ctx, email, password, remember).await,
            AuthCommands::Register {
                name,
                email,
                password,
            } => commands::handle_register(ctx, name, email, password).await,
            AuthCommands::Logout => commands::handle_logout(ctx).await,
            AuthCommands::Status => commands::handle_status(ctx).await,
        },
        Commands::Team { command } => commands::handle_team(ctx, command).await,
        Commands::Areas { command } => commands::handle_areas(ctx, command).await,
        Commands::Articles { command } => commands::handle_articles(ctx, command).await,
        Commands::Media { command } => commands::handle_media(ctx, command).await,
        Commands::Carousel { command } => commands::handle_carousel(ctx, command).await,
        Commands::Settings { command } => commands::handle_settings(ctx, command).await,
        Commands::Contact(args) => commands::handle_contact(ctx, args).await,
        Commands::Asset { path, origin } => commands::handle_asset(ctx, &path, origin.as_deref()),
        Commands::Prefs { command } => commands::handle_prefs(ctx, command),
        Commands::Completions { shell } => commands::handle_completions(shell),
    }
}
