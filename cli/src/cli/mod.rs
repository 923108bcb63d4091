//! CLI module for bufete.

pub mod args;
pub mod commands;

pub use args::{
    AreaCommands, ArticleCommands, AuthCommands, CarouselCommands, Cli, Commands, MediaCommands,
    PrefsCommands, SettingsCommands, TeamCommands,
};
