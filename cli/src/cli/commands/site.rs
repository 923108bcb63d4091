//! Site settings and contact form handlers.

use crate::cli::args::{ContactArgs, SettingsCommands};
use crate::cli::commands::{or_dash, print_json, Context};
use crate::client::{BufeteApiClient, FileUpload};
use crate::error::Result;
use crate::models::{ContactMessage, SiteSettings, SiteSettingsInput};

fn print_settings(client: &BufeteApiClient, settings: &SiteSettings) {
    println!("{}", or_dash(settings.firm_name.as_deref()));
    println!();
    println!("  Logo:    {}", client.assets().resolve(settings.logo.as_deref()));
    println!("  Phone:   {}", or_dash(settings.phone.as_deref()));
    println!("  Email:   {}", or_dash(settings.email.as_deref()));
    println!("  Address: {}", or_dash(settings.address.as_deref()));
    println!("  Hours:   {}", or_dash(settings.hours.as_deref()));
    for (network, url) in &settings.social {
        println!("  {:<8} {url}", format!("{network}:"));
    }
}

/// Handle `bufete settings ...`.
pub async fn handle_settings(ctx: &Context, command: SettingsCommands) -> Result<()> {
    let (session, settings) = match command {
        SettingsCommands::Show => {
            let client = ctx.client()?;
            let settings = client.get_settings().await?;
            if ctx.json {
                return print_json(&settings);
            }
            print_settings(&client, &settings);
            return Ok(());
        }
        SettingsCommands::Update {
            firm_name,
            phone,
            email,
            address,
            hours,
        } => {
            let input = SiteSettingsInput {
                firm_name,
                phone,
                email,
                address,
                hours,
            };
            let session = ctx.authenticated()?;
            let outcome = session.client.update_settings(&input, None).await;
            let settings = session.settle(outcome)?;
            (session, settings)
        }
        SettingsCommands::Logo { file } => {
            let logo = FileUpload::from_path(&file)?;
            let session = ctx.authenticated()?;
            let outcome = session
                .client
                .update_settings(&SiteSettingsInput::default(), Some(logo))
                .await;
            let settings = session.settle(outcome)?;
            (session, settings)
        }
    };

    if ctx.json {
        return print_json(&settings);
    }
    println!("Settings updated.");
    println!();
    print_settings(&session.client, &settings);
    Ok(())
}

/// Handle `bufete contact`.
pub async fn handle_contact(ctx: &Context, args: ContactArgs) -> Result<()> {
    let message = ContactMessage {
        name: args.name,
        email: args.email,
        phone: args.phone,
        subject: args.subject,
        message: args.message,
    };
    ctx.client()?.send_contact(&message).await?;
    println!("Message sent.");
    Ok(())
}
