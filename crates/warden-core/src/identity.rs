//! The requester of an access check.
//!
//! An [`Identity`] is built per request from whatever session or auth state
//! the host keeps. Warden never authenticates anyone; it only consumes the
//! result.
//!
//! # Textual form
//!
//! Identities parse from and display as:
//!
//! - `anonymous`
//! - `user:<username>:<role>`
//! - `role:<id>`
//!
//! ```
//! use warden_core::Identity;
//!
//! let alice: Identity = "user:alice:member".parse().unwrap();
//! assert_eq!(alice.username(), Some("alice"));
//! assert_eq!(alice.role(), Some("member"));
//! assert_eq!(alice.to_string(), "user:alice:member");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Who is asking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Identity {
    /// No requester (not logged in).
    #[default]
    Anonymous,
    /// A named user holding exactly one role.
    User {
        /// Login name
        username: String,
        /// Role id the user holds
        role: String,
    },
    /// A bare role, used when checking what a role as a whole may see.
    Role {
        /// Role id
        id: String,
    },
}

impl Identity {
    /// The anonymous requester.
    pub fn anonymous() -> Self {
        Identity::Anonymous
    }

    /// A named user with a role. Both parts are trimmed and must be non-empty.
    pub fn user(username: impl Into<String>, role: impl Into<String>) -> Result<Self> {
        let username = trimmed(username.into());
        let role = trimmed(role.into());
        if username.is_empty() {
            return Err(Error::invalid_identity("username must not be empty"));
        }
        if role.is_empty() {
            return Err(Error::invalid_identity(format!(
                "role of user '{username}' must not be empty"
            )));
        }
        Ok(Identity::User { username, role })
    }

    /// A role. The id is trimmed and must be non-empty.
    pub fn role_id(id: impl Into<String>) -> Result<Self> {
        let id = trimmed(id.into());
        if id.is_empty() {
            return Err(Error::invalid_identity("role id must not be empty"));
        }
        Ok(Identity::Role { id })
    }

    /// Returns `true` for [`Identity::Anonymous`].
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    /// The username, for user identities.
    pub fn username(&self) -> Option<&str> {
        match self {
            Identity::User { username, .. } => Some(username),
            _ => None,
        }
    }

    /// The role a requester acts under: the user's role or the role's own id.
    pub fn role(&self) -> Option<&str> {
        match self {
            Identity::User { role, .. } => Some(role),
            Identity::Role { id } => Some(id),
            Identity::Anonymous => None,
        }
    }
}

fn trimmed(s: String) -> String {
    let t = s.trim();
    if t.len() == s.len() {
        s
    } else {
        t.to_string()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Anonymous => write!(f, "anonymous"),
            Identity::User { username, role } => write!(f, "user:{username}:{role}"),
            Identity::Role { id } => write!(f, "role:{id}"),
        }
    }
}

impl FromStr for Identity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("anonymous") {
            return Ok(Identity::Anonymous);
        }

        match s.split_once(':') {
            Some(("user", rest)) => match rest.split_once(':') {
                Some((username, role)) => Identity::user(username, role),
                None => Err(Error::invalid_identity(format!(
                    "expected user:<username>:<role>, got '{s}'"
                ))),
            },
            Some(("role", id)) => Identity::role_id(id),
            _ => Err(Error::invalid_identity(format!(
                "expected anonymous, user:<username>:<role> or role:<id>, got '{s}'"
            ))),
        }
    }
}
