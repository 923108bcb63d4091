//! Authentication command handlers.

use crate::auth::session_store::{self, KeyringSessionStore, SessionStore};
use crate::cli::commands::{print_json, prompt, Context};
use crate::client::BufeteApiClient;
use crate::config::Preferences;
use crate::error::{BufeteError, Result};
use crate::models::{Credentials, Registration, User};

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt("Password"),
    }
}

fn save_login(client: &BufeteApiClient, user: &User) -> Result<()> {
    let store = KeyringSessionStore::new()?;
    session_store::persist(client, &store, user)?;
    Ok(())
}

/// Handle the `bufete auth login` command.
pub async fn handle_login(
    ctx: &Context,
    email: Option<String>,
    password: Option<String>,
    remember: bool,
) -> Result<()> {
    let mut prefs = Preferences::load()?;

    let email = match email.or_else(|| prefs.remembered_email.clone()) {
        Some(email) => email,
        None => prompt("Email")?,
    };
    let password = password_or_prompt(password)?;

    let config = ctx.config()?;
    let client = BufeteApiClient::new(&config.api)?;
    let user = client
        .login(&Credentials {
            email: email.clone(),
            password,
            remember,
        })
        .await?;
    save_login(&client, &user)?;

    if remember {
        prefs.remember_email(Some(&email));
        prefs.save()?;
    }

    if ctx.json {
        return print_json(&user);
    }
    println!("Logged in as {} <{}>.", user.name, user.email);
    Ok(())
}

/// Handle the `bufete auth register` command.
pub async fn handle_register(
    ctx: &Context,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let (password, confirmation) = match password {
        Some(password) => (password.clone(), password),
        None => (prompt("Password")?, prompt("Confirm password")?),
    };
    if confirmation != password {
        return Err(BufeteError::AuthenticationFailed(
            "passwords do not match".to_string(),
        ));
    }

    let client = BufeteApiClient::new(&ctx.config()?.api)?;
    let user = client
        .register(&Registration {
            name,
            email,
            password,
            password_confirmation: confirmation,
        })
        .await?;
    save_login(&client, &user)?;

    if ctx.json {
        return print_json(&user);
    }
    println!("Account created. Logged in as {} <{}>.", user.name, user.email);
    Ok(())
}

/// Handle the `bufete auth logout` command.
pub async fn handle_logout(ctx: &Context) -> Result<()> {
    let store = KeyringSessionStore::new()?;
    let client = BufeteApiClient::new(&ctx.config()?.api)?;

    if session_store::resume(&client, &store)?.is_none() {
        println!("Not currently logged in.");
        return Ok(());
    }

    // The local session goes regardless of what the backend says.
    if let Err(e) = client.logout().await {
        tracing::warn!("Backend logout failed: {e}");
    }
    store.clear()?;
    println!("Successfully logged out.");
    Ok(())
}

/// Handle the `bufete auth status` command.
pub async fn handle_status(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let client = BufeteApiClient::new(&config.api)?;
    let store = KeyringSessionStore::new()?;

    let Some(saved) = session_store::resume(&client, &store)? else {
        println!("Not logged in");
        println!();
        println!("Run 'bufete auth login' to authenticate.");
        return Ok(());
    };

    let outcome = client.current_user().await;
    match session_store::settle(&client, &store, &saved, outcome) {
        Ok(user) => {
            if ctx.json {
                return print_json(&user);
            }
            println!("Logged in");
            println!();
            println!("  Name:       {}", user.name);
            println!("  Email:      {}", user.email);
            if let Some(role) = &user.role {
                println!("  Role:       {role}");
            }
            println!("  API Server: {}", client.base_url());
            println!("  Since:      {}", saved.saved_at.format("%Y-%m-%d %H:%M UTC"));
        }
        Err(e) if e.requires_reauth() => {
            println!("Session expired for {}.", saved.email);
            println!();
            println!("Run 'bufete auth login' to authenticate again.");
        }
        Err(e) => return Err(e),
    }
    Ok(())
}
