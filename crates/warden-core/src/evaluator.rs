//! The admit/deny decision for one rule and one identity.
//!
//! Everything here is a pure function of its arguments, so it is safe to call
//! from any number of concurrent requests.

use crate::identity::Identity;
use crate::rule::AccessRule;

/// Returns `true` unless the rule is public.
///
/// A restricted rule with an empty allow-list still counts as restricted: it
/// denies everybody.
pub fn is_restricted(rule: &AccessRule) -> bool {
    !matches!(rule, AccessRule::Public)
}

/// Returns `true` for a restricted rule whose allow-lists are all empty.
pub fn is_deny_all(rule: &AccessRule) -> bool {
    match rule {
        AccessRule::Public => false,
        AccessRule::Users(list) | AccessRule::Roles(list) => list.is_empty(),
        AccessRule::Legacy { users, roles } => users.is_empty() && roles.is_empty(),
    }
}

/// Decide whether `identity` may access content guarded by `rule`.
///
/// Public rules admit everybody, anonymous included. Restricted rules never
/// admit the anonymous requester and never admit anybody when deny-all.
/// Otherwise a users rule matches on username only (a bare role never
/// matches), and a roles rule matches on the role the requester acts under.
pub fn is_accessible_by(rule: &AccessRule, identity: &Identity) -> bool {
    if !is_restricted(rule) {
        return true;
    }
    if identity.is_anonymous() || is_deny_all(rule) {
        return false;
    }

    match (rule, identity) {
        (AccessRule::Public, _) => true,
        (_, Identity::Anonymous) => false,
        (AccessRule::Users(names), Identity::User { username, .. }) => contains(names, username),
        (AccessRule::Users(_), Identity::Role { .. }) => false,
        (AccessRule::Roles(ids), Identity::User { role, .. }) => contains(ids, role),
        (AccessRule::Roles(ids), Identity::Role { id }) => contains(ids, id),
        (AccessRule::Legacy { roles, .. }, Identity::Role { id }) => contains(roles, id),
        (AccessRule::Legacy { users, roles }, Identity::User { username, role }) => {
            contains(roles, role) || contains(users, username)
        }
    }
}

fn contains(list: &[String], needle: &str) -> bool {
    list.iter().any(|item| item == needle)
}
