//! Settings that shape how rules are looked up and how denials are reported.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default content field holding a page's rule.
pub const DEFAULT_FIELD_NAME: &str = "access";
/// Default uid of the home page.
pub const DEFAULT_HOME_PAGE: &str = "home";
/// Default uid of the error page.
pub const DEFAULT_ERROR_PAGE: &str = "error";

/// Access control settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Content field the rule is stored in.
    pub field_name: String,
    /// Where denied page requests are sent. `None` reports them as forbidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    /// Uid served for `/`.
    pub home_page: String,
    /// Uid served when a requested page does not exist.
    pub error_page: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            field_name: DEFAULT_FIELD_NAME.to_string(),
            redirect: None,
            home_page: DEFAULT_HOME_PAGE.to_string(),
            error_page: DEFAULT_ERROR_PAGE.to_string(),
        }
    }
}

impl AccessConfig {
    /// Use a different rule field.
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    /// Redirect denied page requests to `target`.
    pub fn with_redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.field_name.trim().is_empty() {
            return Err(Error::config("access.field_name must not be empty"));
        }
        if self.home_page.trim().is_empty() {
            return Err(Error::config("access.home_page must not be empty"));
        }
        if matches!(&self.redirect, Some(target) if target.trim().is_empty()) {
            return Err(Error::config(
                "access.redirect must be omitted or a non-empty target",
            ));
        }
        Ok(())
    }
}
