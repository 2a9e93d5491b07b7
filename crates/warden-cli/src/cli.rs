//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use warden_core::Identity;

/// Warden - access control for page and file content trees
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(author, version, about = "Check who may see which pages and files", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Content directory (overrides `content_root` from the config file)
    #[arg(long, global = true)]
    pub content: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Gate a `dir/dir/file` content path
    Resolve {
        /// Path below the content root, e.g. `1-blog/post-1/image.jpg`
        path: String,

        /// Requester: `anonymous`, `user:<name>:<role>`, or `role:<id>`
        #[arg(long = "as", value_name = "IDENT", default_value = "anonymous")]
        identity: Identity,
    },

    /// Gate a page request by page id
    Page {
        /// Page id, e.g. `blog/post-1`; `/` for the home page
        uid: String,

        /// Requester: `anonymous`, `user:<name>:<role>`, or `role:<id>`
        #[arg(long = "as", value_name = "IDENT", default_value = "anonymous")]
        identity: Identity,
    },

    /// Show a page's rule and whether the requester may access it
    Check {
        /// Page id; `/` for the site root
        page_id: String,

        /// Requester: `anonymous`, `user:<name>:<role>`, or `role:<id>`
        #[arg(long = "as", value_name = "IDENT", default_value = "anonymous")]
        identity: Identity,
    },

    /// List a page's children split by accessibility
    Ls {
        /// Page id (defaults to the site root)
        page_id: Option<String>,

        /// Requester: `anonymous`, `user:<name>:<role>`, or `role:<id>`
        #[arg(long = "as", value_name = "IDENT", default_value = "anonymous")]
        identity: Identity,
    },

    /// Decode or encode stored rule text
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Rule codec subcommands.
#[derive(Subcommand, Debug)]
pub enum RuleAction {
    /// Interpret stored rule text
    Decode {
        /// Rule text as stored in a content field
        text: String,

        /// Fail on malformed text instead of treating it as public
        #[arg(long)]
        strict: bool,
    },

    /// Produce the stored text for a rule
    Encode {
        /// Rule kind
        #[arg(long, value_enum)]
        kind: RuleKind,

        /// Comma-separated allow-list (usernames or role ids)
        #[arg(long, value_delimiter = ',')]
        allow: Vec<String>,
    },
}

/// Rule kinds accepted by `rule encode`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
    /// Everyone
    Public,
    /// Listed usernames
    Users,
    /// Listed role ids
    Roles,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Print the effective configuration
    Show,

    /// Get a value by dotted key, e.g. `access.field_name`
    Get {
        /// Dotted key
        key: String,
    },

    /// Write a default config file
    Init {
        /// Target file (defaults to the platform config path)
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
