//! Commands that work without talking to the backend.

use clap_complete::Shell;

use crate::cli::args::PrefsCommands;
use crate::cli::commands::{print_json, Context};
use crate::client::origin::resolve_origin;
use crate::client::AssetResolver;
use crate::config::{preferences, Preferences};
use crate::error::Result;

/// Handle `bufete asset <path>`.
pub fn handle_asset(ctx: &Context, path: &str, origin: Option<&str>) -> Result<()> {
    let config = ctx.config()?;
    let origin = match origin {
        Some(explicit) => resolve_origin(Some(explicit), Some(&config.api.base_url)),
        None => config.api.asset_origin(),
    };
    println!("{}", AssetResolver::new(origin).resolve(Some(path)));
    Ok(())
}

/// Handle `bufete prefs ...`.
pub fn handle_prefs(ctx: &Context, command: PrefsCommands) -> Result<()> {
    let mut prefs = Preferences::load()?;

    match command {
        PrefsCommands::Show => {
            if ctx.json {
                return print_json(&prefs);
            }
            println!("Preferences ({})", preferences::location()?.display());
            println!();
            println!("  Theme:          {}", prefs.theme);
            println!(
                "  Remember email: {}",
                prefs.remembered_email.as_deref().unwrap_or("(none)")
            );
            return Ok(());
        }
        PrefsCommands::Theme { theme } => {
            prefs.theme = theme.into();
            println!("Theme set to {}.", prefs.theme);
        }
        PrefsCommands::Remember { email } => {
            prefs.remember_email(Some(&email));
            match &prefs.remembered_email {
                Some(email) => println!("Will prefill {email} on login."),
                None => println!("Nothing to remember."),
            }
        }
        PrefsCommands::Forget => {
            prefs.remember_email(None);
            println!("Forgot remembered email.");
        }
    }

    prefs.save()
}

/// Handle `bufete completions <shell>`.
pub fn handle_completions(shell: Shell) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = crate::cli::Cli::command();
    generate(shell, &mut cmd, "bufete", &mut std::io::stdout());

    Ok(())
}
