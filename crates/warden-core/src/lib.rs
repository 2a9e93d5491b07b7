//! # warden-core
//!
//! Identities, access rules, and the access evaluator.
//!
//! This crate holds the decision logic and nothing else. It has no Warden
//! dependencies and does no I/O.
//!
//! # Modules
//!
//! - [`identity`]: who is asking
//! - [`rule`]: the per-page rule and its stored text form
//! - [`evaluator`]: admit/deny for one rule and one identity
//! - [`config`]: rule field name, redirect target, special pages
//! - [`error`]: Error types and Result alias
//!
//! # Example
//!
//! ```rust
//! use warden_core::{AccessRule, Identity, evaluator};
//!
//! let rule = AccessRule::decode("type: roles\nroles: [editor]");
//! let editor = Identity::role_id("editor").unwrap();
//!
//! assert!(evaluator::is_restricted(&rule));
//! assert!(evaluator::is_accessible_by(&rule, &editor));
//! assert!(!evaluator::is_accessible_by(&rule, &Identity::Anonymous));
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod identity;
pub mod rule;

mod proptests;

// Re-export key types at crate root for convenience
pub use config::AccessConfig;
pub use error::{Error, Result};
pub use identity::Identity;
pub use rule::{AccessKind, AccessRule};
