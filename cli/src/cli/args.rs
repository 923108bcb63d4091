//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::config::Theme;

/// Admin CLI for the firm's website backend.
///
/// Manages the team directory, practice areas, articles, media and site
/// settings through the same API the public website uses.
#[derive(Parser, Debug)]
#[command(name = "bufete")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config and `BUFETE_API_URL`).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Print raw JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the dashboard session.
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Manage team members.
    Team {
        #[command(subcommand)]
        command: TeamCommands,
    },

    /// Manage practice areas.
    Areas {
        #[command(subcommand)]
        command: AreaCommands,
    },

    /// Manage articles.
    Articles {
        #[command(subcommand)]
        command: ArticleCommands,
    },

    /// Manage named image slots used across the site.
    Media {
        #[command(subcommand)]
        command: MediaCommands,
    },

    /// Manage the home page carousel.
    Carousel {
        #[command(subcommand)]
        command: CarouselCommands,
    },

    /// Show or change site settings.
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Send a message through the public contact form.
    Contact(ContactArgs),

    /// Print the absolute URL for an asset path returned by the backend.
    Asset {
        /// Storage path, relative path or absolute URL.
        path: String,

        /// Asset origin to resolve against (defaults to the API's origin).
        #[arg(long)]
        origin: Option<String>,
    },

    /// Show or change local preferences.
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },

    /// Generate shell completion scripts.
    ///
    /// Outputs completion script for the specified shell.
    /// Follow shell-specific instructions to install.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Authentication subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Log in with email and password.
    Login {
        /// Account email (defaults to the remembered one).
        #[arg(short, long)]
        email: Option<String>,

        /// Account password (prompted when omitted).
        #[arg(long, env = "BUFETE_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Ask the backend for a long-lived session and remember the email.
        #[arg(short, long)]
        remember: bool,
    },

    /// Create a dashboard account and log in.
    Register {
        /// Display name.
        #[arg(long)]
        name: String,

        /// Account email.
        #[arg(short, long)]
        email: String,

        /// Account password (prompted when omitted).
        #[arg(long, env = "BUFETE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Log out and remove the stored session.
    Logout,

    /// Show current authentication status.
    Status,
}

/// Paging options shared by list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page number.
    #[arg(long)]
    pub page: Option<u64>,

    /// Items per page.
    #[arg(long)]
    pub per_page: Option<u64>,
}

/// Team subcommands.
#[derive(Subcommand, Debug)]
pub enum TeamCommands {
    /// List team members.
    List {
        /// Filter by name.
        #[arg(short, long)]
        name: Option<String>,

        /// Filter by active flag.
        #[arg(long)]
        active: Option<bool>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show a team member.
    Show { id: u64 },

    /// Add a team member.
    Create(TeamMemberArgs),

    /// Change a team member.
    Update {
        id: u64,

        #[command(flatten)]
        fields: TeamMemberArgs,
    },

    /// Remove a team member.
    Delete {
        id: u64,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Editable team member fields.
#[derive(Args, Debug, Clone, Default)]
pub struct TeamMemberArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// Position within the firm.
    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    /// Portrait image file.
    #[arg(long, value_name = "FILE")]
    pub photo: Option<PathBuf>,

    /// Sort position.
    #[arg(long)]
    pub order: Option<i64>,

    #[arg(long)]
    pub active: Option<bool>,
}

/// Practice area subcommands.
#[derive(Subcommand, Debug)]
pub enum AreaCommands {
    /// List practice areas.
    List {
        /// Free-text search.
        #[arg(short, long)]
        search: Option<String>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show a practice area by id or slug.
    Show { id: String },

    /// Add a practice area.
    Create(AreaArgs),

    /// Change a practice area.
    Update {
        id: u64,

        #[command(flatten)]
        fields: AreaArgs,
    },

    /// Remove a practice area.
    Delete {
        id: u64,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Editable practice area fields.
#[derive(Args, Debug, Clone, Default)]
pub struct AreaArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Bullet point (repeat for several).
    #[arg(short, long = "bullet")]
    pub bullets: Vec<String>,

    /// Icon image file.
    #[arg(long, value_name = "FILE")]
    pub icon: Option<PathBuf>,

    #[arg(long)]
    pub order: Option<i64>,

    #[arg(long)]
    pub active: Option<bool>,
}

/// Article subcommands.
#[derive(Subcommand, Debug)]
pub enum ArticleCommands {
    /// List articles.
    List {
        /// Free-text search.
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Filter by published flag.
        #[arg(long)]
        published: Option<bool>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show an article by id or slug.
    Show { id: String },

    /// Write a new article.
    Create(ArticleArgs),

    /// Change an article.
    Update {
        id: u64,

        #[command(flatten)]
        fields: ArticleArgs,
    },

    /// Remove an article.
    Delete {
        id: u64,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Editable article fields.
#[derive(Args, Debug, Clone, Default)]
pub struct ArticleArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long)]
    pub excerpt: Option<String>,

    /// File holding the article body (HTML or Markdown).
    #[arg(long, value_name = "FILE")]
    pub body: Option<PathBuf>,

    #[arg(long)]
    pub category: Option<String>,

    /// Tag (repeat for several).
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Cover image file.
    #[arg(long, value_name = "FILE")]
    pub cover: Option<PathBuf>,

    #[arg(long)]
    pub published: Option<bool>,
}

/// Media slot subcommands.
#[derive(Subcommand, Debug)]
pub enum MediaCommands {
    /// List media slots.
    List,

    /// Replace the image in a slot.
    Upload {
        /// Slot key, e.g. `home_hero`.
        key: String,

        /// Image file.
        file: PathBuf,

        /// Human-readable label.
        #[arg(long)]
        label: Option<String>,
    },
}

/// Carousel subcommands.
#[derive(Subcommand, Debug)]
pub enum CarouselCommands {
    /// List carousel images.
    List,

    /// Add an image to the carousel.
    Upload {
        /// Image file.
        file: PathBuf,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        subtitle: Option<String>,

        #[arg(long)]
        order: Option<i64>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Remove a carousel image.
    Delete {
        id: u64,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Site settings subcommands.
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show site settings.
    Show,

    /// Change contact details.
    Update {
        /// Firm name.
        #[arg(long)]
        firm_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// Office hours.
        #[arg(long)]
        hours: Option<String>,
    },

    /// Replace the site logo.
    Logo {
        /// Image file.
        file: PathBuf,
    },
}

/// Contact form fields.
#[derive(Args, Debug)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub message: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,
}

/// Preference subcommands.
#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Show stored preferences.
    Show,

    /// Set the dashboard theme.
    Theme {
        #[arg(value_enum)]
        theme: ThemeArg,
    },

    /// Remember an email for the next login.
    Remember { email: String },

    /// Forget the remembered email.
    Forget,
}

/// Theme argument for CLI.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
            ThemeArg::System => Self::System,
        }
    }
}
