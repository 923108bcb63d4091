//! Media slot and carousel command handlers.

use crate::cli::args::{CarouselCommands, MediaCommands};
use crate::cli::commands::content::print_footer;
use crate::cli::commands::{confirm, or_dash, print_json, truncate, Context};
use crate::client::FileUpload;
use crate::error::Result;
use crate::models::CarouselImageInput;

/// Handle `bufete media ...`.
pub async fn handle_media(ctx: &Context, command: MediaCommands) -> Result<()> {
    match command {
        MediaCommands::List => {
            let client = ctx.client()?;
            let page = client.list_media_slots().await?;
            if ctx.json {
                return print_json(&page.items);
            }
            if page.items.is_empty() {
                println!("No media slots defined.");
                return Ok(());
            }
            println!("{:<24} {:<28} {}", "KEY", "LABEL", "IMAGE");
            for slot in &page.items {
                println!(
                    "{:<24} {:<28} {}",
                    slot.key,
                    truncate(or_dash(slot.label.as_deref()), 28),
                    client.assets().resolve(slot.image.as_deref())
                );
            }
        }
        MediaCommands::Upload { key, file, label } => {
            let image = FileUpload::from_path(&file)?;
            let session = ctx.authenticated()?;
            let outcome = session
                .client
                .upload_media_slot(&key, label.as_deref(), image)
                .await;
            let slot = session.settle(outcome)?;
            if ctx.json {
                return print_json(&slot);
            }
            println!(
                "Updated slot '{}': {}",
                slot.key,
                session.client.assets().resolve(slot.image.as_deref())
            );
        }
    }
    Ok(())
}

/// Handle `bufete carousel ...`.
pub async fn handle_carousel(ctx: &Context, command: CarouselCommands) -> Result<()> {
    match command {
        CarouselCommands::List => {
            let client = ctx.client()?;
            let page = client.list_carousel_images().await?;
            if ctx.json {
                return print_json(&page.items);
            }
            if page.items.is_empty() {
                println!("The carousel is empty.");
                return Ok(());
            }
            println!("{:>5}  {:>5}  {:<28} {}", "ID", "ORDER", "TITLE", "IMAGE");
            for image in &page.items {
                println!(
                    "{:>5}  {:>5}  {:<28} {}",
                    image.id,
                    image.order.map_or_else(|| "-".to_string(), |o| o.to_string()),
                    truncate(or_dash(image.title.as_deref()), 28),
                    client.assets().resolve(image.image.as_deref())
                );
            }
            print_footer(page.items.len(), page.meta.as_ref());
        }
        CarouselCommands::Upload {
            file,
            title,
            subtitle,
            order,
            active,
        } => {
            let upload = FileUpload::from_path(&file)?;
            let input = CarouselImageInput {
                title,
                subtitle,
                order,
                active,
            };
            let session = ctx.authenticated()?;
            let outcome = session.client.create_carousel_image(&input, upload).await;
            let image = session.settle(outcome)?;
            if ctx.json {
                return print_json(&image);
            }
            println!("Added carousel image {}.", image.id);
        }
        CarouselCommands::Delete { id, yes } => {
            if !confirm(&format!("Delete carousel image {id}?"), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            let session = ctx.authenticated()?;
            let outcome = session.client.delete_carousel_image(id).await;
            session.settle(outcome)?;
            println!("Deleted carousel image {id}.");
        }
    }
    Ok(())
}
