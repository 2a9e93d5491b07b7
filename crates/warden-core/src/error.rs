//! Error types for warden-core

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for Warden operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the Warden crates.
///
/// Access decisions are never reported through this type: a denial or a
/// missing path segment is an ordinary outcome value. These variants cover
/// bad input, bad configuration, and I/O.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An identity was constructed with an empty name, role, or id.
    #[error("Invalid identity: {message}")]
    InvalidIdentity {
        /// What was wrong with the identity
        message: String,
    },

    /// Stored rule text could not be interpreted.
    #[error("Malformed access rule: {message}")]
    MalformedRule {
        /// Why the rule was rejected
        message: String,
    },

    /// Generic parse failure (content files, CLI arguments).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error tied to a filesystem path
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A page or file with the same key already exists under the parent.
    #[error("Duplicate node '{name}' under '{parent}'")]
    DuplicateNode {
        /// Id of the parent page
        parent: String,
        /// Conflicting dirname or filename
        name: String,
    },

    /// A node handle does not belong to the tree it was used with.
    #[error("Unknown node: {0}")]
    UnknownNode(String),
}

impl Error {
    /// Creates a new invalid identity error.
    pub fn invalid_identity<S: Into<String>>(message: S) -> Self {
        Error::InvalidIdentity {
            message: message.into(),
        }
    }

    /// Creates a new malformed rule error.
    pub fn malformed_rule<S: Into<String>>(message: S) -> Self {
        Error::MalformedRule {
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse(message.into())
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path that produced it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the error comes from caller-supplied input rather than the
    /// environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidIdentity { .. } | Error::MalformedRule { .. } | Error::Parse(_)
        )
    }
}
