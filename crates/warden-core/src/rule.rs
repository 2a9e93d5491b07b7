//! Access rules and their stored text form.
//!
//! A rule lives in one content field of a page. The canonical stored form is
//! a YAML mapping naming the rule type and carrying the matching allow-list:
//!
//! ```yaml
//! type: roles
//! roles:
//!   - editor
//!   - admin
//! ```
//!
//! Decoding also understands:
//!
//! - the sentinels `1`/`true`/`yes`/`on` (public) and `0`/`false`/`no`/`off`
//!   (hidden for everybody);
//! - the legacy mapping without a `type` key that carries `users` and `roles`
//!   lists side by side. It decodes to [`AccessRule::Legacy`] and encodes back
//!   in the same shape.
//!
//! Missing or blank text means the page was never configured and is public.
//!
//! ```
//! use warden_core::AccessRule;
//!
//! let rule = AccessRule::decode("type: users\nusers: [alice]");
//! assert_eq!(rule, AccessRule::users(["alice"]));
//!
//! let text = rule.encode().unwrap();
//! assert_eq!(AccessRule::decode(&text), rule);
//! ```

use std::fmt;

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

const TYPE_KEY: &str = "type";
const USERS_KEY: &str = "users";
const ROLES_KEY: &str = "roles";
const PUBLIC_TYPE: &str = "public";

const ACCEPTED: [&str; 4] = ["1", "true", "yes", "on"];
const DENIED: [&str; 4] = ["0", "false", "no", "off"];

/// Which allow-list a rule consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Unrestricted.
    Public,
    /// Restricted to listed usernames.
    Users,
    /// Restricted to listed role ids.
    Roles,
    /// Legacy form carrying both lists.
    Legacy,
}

impl AccessKind {
    /// The name used for this kind in stored text.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKind::Public => PUBLIC_TYPE,
            AccessKind::Users => USERS_KEY,
            AccessKind::Roles => ROLES_KEY,
            AccessKind::Legacy => "legacy",
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The restriction attached to a page.
///
/// A restricted rule with an empty allow-list denies everybody. That is the
/// "hidden for all" state written by the `0`/`false` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessRule {
    /// Anyone may access the page.
    #[default]
    Public,
    /// Only the listed usernames.
    Users(Vec<String>),
    /// Only identities acting under one of the listed roles.
    Roles(Vec<String>),
    /// Legacy two-list form. A role identity matches on `roles`; a user
    /// matches on its role in `roles` or its username in `users`.
    Legacy {
        /// Allowed usernames
        users: Vec<String>,
        /// Allowed role ids
        roles: Vec<String>,
    },
}

impl AccessRule {
    /// The public rule.
    pub fn public() -> Self {
        AccessRule::Public
    }

    /// A rule restricted to the given usernames.
    pub fn users<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AccessRule::Users(names.into_iter().map(Into::into).collect())
    }

    /// A rule restricted to the given role ids.
    pub fn roles<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AccessRule::Roles(ids.into_iter().map(Into::into).collect())
    }

    /// The deny-all rule, as produced by the denied sentinel.
    pub fn deny_all() -> Self {
        AccessRule::Users(Vec::new())
    }

    /// Which list this rule consults.
    pub fn kind(&self) -> AccessKind {
        match self {
            AccessRule::Public => AccessKind::Public,
            AccessRule::Users(_) => AccessKind::Users,
            AccessRule::Roles(_) => AccessKind::Roles,
            AccessRule::Legacy { .. } => AccessKind::Legacy,
        }
    }

    /// The single allow-list of a typed rule. `None` for public and legacy
    /// rules.
    pub fn allow_list(&self) -> Option<&[String]> {
        match self {
            AccessRule::Users(list) | AccessRule::Roles(list) => Some(list),
            AccessRule::Public | AccessRule::Legacy { .. } => None,
        }
    }

    // ------------------------------------------------------------------------
    // Decoding
    // ------------------------------------------------------------------------

    /// Decode stored rule text, recovering to [`AccessRule::Public`] when the
    /// text cannot be interpreted.
    ///
    /// Corrupt rule data must not take the site down; the failure is logged.
    pub fn decode(raw: &str) -> Self {
        match Self::try_decode(raw) {
            Ok(rule) => rule,
            Err(e) => {
                log::warn!("Treating unreadable access rule as public: {e}");
                AccessRule::Public
            }
        }
    }

    /// Decode an optional field value. An absent field is public.
    pub fn decode_field(raw: Option<&str>) -> Self {
        raw.map(Self::decode).unwrap_or_default()
    }

    /// Decode stored rule text, reporting anything unreadable.
    pub fn try_decode(raw: &str) -> Result<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return Ok(AccessRule::Public);
        }
        if let Some(rule) = sentinel(text) {
            return Ok(rule);
        }

        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| Error::malformed_rule(format!("invalid YAML: {e}")))?;
        Self::from_value(&value)
    }

    /// Interpret an already-parsed YAML value as a rule.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(AccessRule::Public),
            Value::Bool(true) => Ok(AccessRule::Public),
            Value::Bool(false) => Ok(AccessRule::deny_all()),
            Value::Number(n) => match n.as_u64() {
                Some(1) => Ok(AccessRule::Public),
                Some(0) => Ok(AccessRule::deny_all()),
                _ => Err(Error::malformed_rule(format!("unexpected number {n}"))),
            },
            Value::String(s) => sentinel(s.trim())
                .ok_or_else(|| Error::malformed_rule(format!("unexpected literal '{s}'"))),
            Value::Mapping(map) => from_mapping(map),
            Value::Tagged(tagged) => Self::from_value(&tagged.value),
            Value::Sequence(_) => Err(Error::malformed_rule(
                "expected a mapping or a sentinel, found a list",
            )),
        }
    }

    // ------------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------------

    /// The YAML value written to storage.
    pub fn to_value(&self) -> Value {
        let mut map = Mapping::new();
        match self {
            AccessRule::Public => {
                map.insert(TYPE_KEY.into(), PUBLIC_TYPE.into());
            }
            AccessRule::Users(list) => {
                map.insert(TYPE_KEY.into(), USERS_KEY.into());
                map.insert(USERS_KEY.into(), list_value(list));
            }
            AccessRule::Roles(list) => {
                map.insert(TYPE_KEY.into(), ROLES_KEY.into());
                map.insert(ROLES_KEY.into(), list_value(list));
            }
            AccessRule::Legacy { users, roles } => {
                map.insert(USERS_KEY.into(), list_value(users));
                map.insert(ROLES_KEY.into(), list_value(roles));
            }
        }
        Value::Mapping(map)
    }

    /// Encode to the stored text form.
    pub fn encode(&self) -> Result<String> {
        serde_yaml::to_string(&self.to_value())
            .map_err(|e| Error::parse(format!("Failed to encode access rule: {e}")))
    }
}

impl fmt::Display for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessRule::Public => write!(f, "public"),
            AccessRule::Users(list) if list.is_empty() => write!(f, "deny-all (users)"),
            AccessRule::Roles(list) if list.is_empty() => write!(f, "deny-all (roles)"),
            AccessRule::Users(list) => write!(f, "users [{}]", list.join(", ")),
            AccessRule::Roles(list) => write!(f, "roles [{}]", list.join(", ")),
            AccessRule::Legacy { users, roles } => write!(
                f,
                "legacy users [{}] roles [{}]",
                users.join(", "),
                roles.join(", ")
            ),
        }
    }
}

/// Match the accepted/denied literals.
fn sentinel(text: &str) -> Option<AccessRule> {
    let lowered = text.to_ascii_lowercase();
    if ACCEPTED.contains(&lowered.as_str()) {
        Some(AccessRule::Public)
    } else if DENIED.contains(&lowered.as_str()) {
        Some(AccessRule::deny_all())
    } else {
        None
    }
}

fn from_mapping(map: &Mapping) -> Result<AccessRule> {
    let Some(kind) = map.get(TYPE_KEY) else {
        let users = map.get(USERS_KEY);
        let roles = map.get(ROLES_KEY);
        if users.is_none() && roles.is_none() {
            // Nothing configured yet.
            return Ok(AccessRule::Public);
        }
        return Ok(AccessRule::Legacy {
            users: string_list(users),
            roles: string_list(roles),
        });
    };

    match kind.as_str() {
        Some(PUBLIC_TYPE) => Ok(AccessRule::Public),
        Some(USERS_KEY) => Ok(AccessRule::Users(string_list(map.get(USERS_KEY)))),
        Some(ROLES_KEY) => Ok(AccessRule::Roles(string_list(map.get(ROLES_KEY)))),
        Some(other) => Err(Error::malformed_rule(format!("unknown type '{other}'"))),
        None => Err(Error::malformed_rule("'type' must be a string")),
    }
}

/// Read an allow-list. A missing list is empty; a lone scalar string is a
/// one-element list; non-string items are skipped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(seq)) => seq
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn list_value(list: &[String]) -> Value {
    Value::Sequence(list.iter().map(|s| Value::String(s.clone())).collect())
}

// ============================================================================
// Tests
// ============================================================================
