//! Team, practice area and article command handlers.

use crate::cli::args::{AreaArgs, AreaCommands, ArticleArgs, ArticleCommands, TeamCommands, TeamMemberArgs};
use crate::cli::commands::{
    confirm, list_query, or_dash, print_json, truncate, upload_from, Context,
};
use crate::client::{BufeteApiClient, ListPage, PageMeta};
use crate::error::Result;
use crate::models::{ArticleInput, PracticeArea, PracticeAreaInput, TeamMemberInput};

/// Prints the pagination footer under a table.
pub(crate) fn print_footer(shown: usize, meta: Option<&PageMeta>) {
    println!();
    match meta {
        Some(meta) => {
            let total = meta.total.map_or_else(String::new, |t| format!(", {t} total"));
            println!(
                "Page {} of {}{total}.",
                meta.current_page.unwrap_or(1),
                meta.last_page.unwrap_or(1)
            );
            if meta.has_more() {
                println!("Use --page to see more.");
            }
        }
        None => println!("{shown} item(s)."),
    }
}

fn team_input(args: TeamMemberArgs) -> TeamMemberInput {
    TeamMemberInput {
        name: args.name,
        role: args.role,
        email: args.email,
        phone: args.phone,
        bio: args.bio,
        order: args.order,
        active: args.active,
        links: Vec::new(),
    }
}

fn area_input(args: AreaArgs) -> PracticeAreaInput {
    PracticeAreaInput {
        title: args.title,
        slug: args.slug,
        description: args.description,
        bullets: (!args.bullets.is_empty()).then_some(args.bullets),
        order: args.order,
        active: args.active,
    }
}

fn article_input(args: ArticleArgs) -> Result<ArticleInput> {
    let body = args.body.as_deref().map(std::fs::read_to_string).transpose()?;
    Ok(ArticleInput {
        title: args.title,
        slug: args.slug,
        excerpt: args.excerpt,
        body,
        category: args.category,
        tags: (!args.tags.is_empty()).then_some(args.tags),
        published: args.published,
    })
}

/// Handle `bufete team ...`.
pub async fn handle_team(ctx: &Context, command: TeamCommands) -> Result<()> {
    match command {
        TeamCommands::List {
            name,
            active,
            paging,
        } => {
            let client = ctx.client()?;
            let query = list_query(&paging)
                .filter_opt("nombre", name)
                .filter_opt("activo", active.map(|a| if a { "1" } else { "0" }));
            let page = client.list_team_members(&query, ctx.signal()).await?;
            if ctx.json {
                return print_json(&page.items);
            }
            if page.items.is_empty() {
                println!("No team members found.");
                return Ok(());
            }
            println!("{:>5}  {:<28} {:<24} {}", "ID", "NAME", "ROLE", "ACTIVE");
            for member in &page.items {
                println!(
                    "{:>5}  {:<28} {:<24} {}",
                    member.id,
                    truncate(&member.name, 28),
                    truncate(or_dash(member.role.as_deref()), 24),
                    if member.active { "yes" } else { "no" }
                );
            }
            print_footer(page.items.len(), page.meta.as_ref());
        }
        TeamCommands::Show { id } => {
            let client = ctx.client()?;
            let member = client.get_team_member(id).await?;
            if ctx.json {
                return print_json(&member);
            }
            println!("{}", member.name);
            println!();
            println!("  Role:   {}", or_dash(member.role.as_deref()));
            println!("  Email:  {}", or_dash(member.email.as_deref()));
            println!("  Phone:  {}", or_dash(member.phone.as_deref()));
            println!("  Photo:  {}", client.assets().resolve(member.photo.as_deref()));
            println!("  Active: {}", if member.active { "yes" } else { "no" });
            for link in &member.links {
                println!("  {:<7} {}", format!("{}:", link.network), link.url);
            }
            if let Some(bio) = &member.bio {
                println!();
                println!("{bio}");
            }
        }
        TeamCommands::Create(args) => {
            let session = ctx.authenticated()?;
            let photo = upload_from(args.photo.as_deref())?;
            let outcome = session
                .client
                .create_team_member(&team_input(args), photo)
                .await;
            let member = session.settle(outcome)?;
            if ctx.json {
                return print_json(&member);
            }
            println!("Created team member '{}' (id {}).", member.name, member.id);
        }
        TeamCommands::Update { id, fields } => {
            let session = ctx.authenticated()?;
            let photo = upload_from(fields.photo.as_deref())?;
            let outcome = session
                .client
                .update_team_member(id, &team_input(fields), photo)
                .await;
            let member = session.settle(outcome)?;
            if ctx.json {
                return print_json(&member);
            }
            println!("Updated team member '{}'.", member.name);
        }
        TeamCommands::Delete { id, yes } => {
            if !confirm(&format!("Delete team member {id}?"), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            let session = ctx.authenticated()?;
            let outcome = session.client.delete_team_member(id).await;
            session.settle(outcome)?;
            println!("Deleted team member {id}.");
        }
    }
    Ok(())
}

fn print_area(client: &BufeteApiClient, area: &PracticeArea) {
    println!("{}", area.title);
    println!();
    println!("  Slug:   {}", or_dash(area.slug.as_deref()));
    println!("  Icon:   {}", client.assets().resolve(area.icon.as_deref()));
    println!("  Active: {}", if area.active { "yes" } else { "no" });
    if let Some(description) = &area.description {
        println!();
        println!("{description}");
    }
    if !area.bullets.is_empty() {
        println!();
        for bullet in &area.bullets {
            println!("  - {bullet}");
        }
    }
}

/// Handle `bufete areas ...`.
pub async fn handle_areas(ctx: &Context, command: AreaCommands) -> Result<()> {
    match command {
        AreaCommands::List { search, paging } => {
            let client = ctx.client()?;
            let query = list_query(&paging).filter_opt("search", search);
            let page: ListPage<PracticeArea> =
                client.list_practice_areas(&query, ctx.signal()).await?;
            if ctx.json {
                return print_json(&page.items);
            }
            if page.items.is_empty() {
                println!("No practice areas found.");
                return Ok(());
            }
            println!("{:>5}  {:<32} {:<24} {}", "ID", "TITLE", "SLUG", "ACTIVE");
            for area in &page.items {
                println!(
                    "{:>5}  {:<32} {:<24} {}",
                    area.id,
                    truncate(&area.title, 32),
                    truncate(or_dash(area.slug.as_deref()), 24),
                    if area.active { "yes" } else { "no" }
                );
            }
            print_footer(page.items.len(), page.meta.as_ref());
        }
        AreaCommands::Show { id } => {
            let client = ctx.client()?;
            let area = client.get_practice_area(&id).await?;
            if ctx.json {
                return print_json(&area);
            }
            print_area(&client, &area);
        }
        AreaCommands::Create(args) => {
            let session = ctx.authenticated()?;
            let icon = upload_from(args.icon.as_deref())?;
            let outcome = session
                .client
                .create_practice_area(&area_input(args), icon)
                .await;
            let area = session.settle(outcome)?;
            if ctx.json {
                return print_json(&area);
            }
            println!("Created practice area '{}' (id {}).", area.title, area.id);
        }
        AreaCommands::Update { id, fields } => {
            let session = ctx.authenticated()?;
            let icon = upload_from(fields.icon.as_deref())?;
            let outcome = session
                .client
                .update_practice_area(id, &area_input(fields), icon)
                .await;
            let area = session.settle(outcome)?;
            if ctx.json {
                return print_json(&area);
            }
            println!("Updated practice area '{}'.", area.title);
        }
        AreaCommands::Delete { id, yes } => {
            if !confirm(&format!("Delete practice area {id}?"), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            let session = ctx.authenticated()?;
            let outcome = session.client.delete_practice_area(id).await;
            session.settle(outcome)?;
            println!("Deleted practice area {id}.");
        }
    }
    Ok(())
}

/// Handle `bufete articles ...`.
pub async fn handle_articles(ctx: &Context, command: ArticleCommands) -> Result<()> {
    match command {
        ArticleCommands::List {
            search,
            category,
            published,
            paging,
        } => {
            let client = ctx.client()?;
            let query = list_query(&paging)
                .filter_opt("search", search)
                .filter_opt("categoria", category)
                .filter_opt("publicado", published.map(|p| p.to_string()));
            let page = client.list_articles(&query, ctx.signal()).await?;
            if ctx.json {
                return print_json(&page.items);
            }
            if page.items.is_empty() {
                println!("No articles found.");
                return Ok(());
            }
            println!("{:>5}  {:<40} {:<16} {}", "ID", "TITLE", "CATEGORY", "PUBLISHED");
            for article in &page.items {
                let published = article
                    .published_at
                    .filter(|_| article.published)
                    .map_or_else(
                        || if article.published { "yes".to_string() } else { "draft".to_string() },
                        |at| at.format("%Y-%m-%d").to_string(),
                    );
                println!(
                    "{:>5}  {:<40} {:<16} {}",
                    article.id,
                    truncate(&article.title, 40),
                    truncate(or_dash(article.category.as_deref()), 16),
                    published
                );
            }
            if let Some(categories) = page.meta.as_ref().and_then(|m| m.facet("categories")) {
                println!();
                let counts: Vec<String> = categories
                    .iter()
                    .map(|(name, count)| format!("{name} ({count})"))
                    .collect();
                println!("Categories: {}", counts.join(", "));
            }
            print_footer(page.items.len(), page.meta.as_ref());
        }
        ArticleCommands::Show { id } => {
            let client = ctx.client()?;
            let article = client.get_article(&id).await?;
            if ctx.json {
                return print_json(&article);
            }
            println!("{}", article.title);
            println!();
            println!("  Slug:     {}", or_dash(article.slug.as_deref()));
            println!("  Author:   {}", or_dash(article.author.as_deref()));
            println!("  Category: {}", or_dash(article.category.as_deref()));
            if !article.tags.is_empty() {
                println!("  Tags:     {}", article.tags.join(", "));
            }
            println!("  Cover:    {}", client.assets().resolve(article.cover.as_deref()));
            if let Some(excerpt) = &article.excerpt {
                println!();
                println!("{excerpt}");
            }
        }
        ArticleCommands::Create(args) => {
            let session = ctx.authenticated()?;
            let cover = upload_from(args.cover.as_deref())?;
            let outcome = session
                .client
                .create_article(&article_input(args)?, cover)
                .await;
            let article = session.settle(outcome)?;
            if ctx.json {
                return print_json(&article);
            }
            println!("Created article '{}' (id {}).", article.title, article.id);
        }
        ArticleCommands::Update { id, fields } => {
            let session = ctx.authenticated()?;
            let cover = upload_from(fields.cover.as_deref())?;
            let outcome = session
                .client
                .update_article(id, &article_input(fields)?, cover)
                .await;
            let article = session.settle(outcome)?;
            if ctx.json {
                return print_json(&article);
            }
            println!("Updated article '{}'.", article.title);
        }
        ArticleCommands::Delete { id, yes } => {
            if !confirm(&format!("Delete article {id}?"), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            let session = ctx.authenticated()?;
            let outcome = session.client.delete_article(id).await;
            session.settle(outcome)?;
            println!("Deleted article {id}.");
        }
    }
    Ok(())
}
