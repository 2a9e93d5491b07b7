//! # warden-cli
//!
//! The `warden` command: checks access to a content directory from the
//! shell.
//!
//! - `resolve`: gate a `dir/dir/file` path, tracing each admitted page
//! - `page`: gate a page request with home/error fallbacks
//! - `check` / `ls`: inspect a page's rule and its children
//! - `rule`: decode and encode stored rule text
//! - `config`: locate, show, query, and create the config file

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;

pub use commands::{Report, Session, Status};
pub use config::WardenConfig;
pub use error::{Error, Result};
