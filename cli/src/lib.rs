//! Access layer for the firm's website backend, plus the `bufete` admin CLI.
//!
//! Talks to the same API as the public site: team directory, practice areas,
//! articles, media slots, carousel and site settings. The dashboard session
//! is a cookie that is refreshed transparently and kept in the OS keyring.
//!
//! - [`client`] - HTTP client, session refresh, response and upload helpers
//! - [`models`] - typed records and request bodies
//! - [`config`] - config file, environment overrides and local preferences
//! - [`auth`] - session persistence between runs
//! - [`cli`] - argument parsing and command handlers

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
