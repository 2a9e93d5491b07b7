//! Command implementations.
//!
//! Every command renders a [`Report`] and returns its [`Status`], which the
//! binary maps to the process exit code: 0 when the requester gets what was
//! asked for, 3 on denial, 4 when something does not exist.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use warden_content::{ContentProvider, ContentTree, LoadOptions, PageId, load_tree_with};
use warden_core::{AccessConfig, AccessRule, Identity};
use warden_gate::{
    CollectionFilter, Missing, NodeAccessService, PageGate, PageOutcome, PathGate, WalkState,
};

use crate::cli::{Command, RuleAction, RuleKind};
use crate::error::Result;

// ============================================================================
// Status and report
// ============================================================================

/// How a command ended, as far as access is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Resolved or accessible
    Ok,
    /// Denied (including a redirect)
    Forbidden,
    /// Page or file does not exist
    NotFound,
}

impl Status {
    /// Process exit code for this status.
    pub fn code(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Forbidden => 3,
            Status::NotFound => 4,
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status.code())
    }
}

/// Output of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Access status
    pub status: Status,
    /// One-line result
    pub summary: String,
    /// Supporting detail, one entry per line
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Report {
    fn new(status: Status, summary: impl Into<String>) -> Self {
        Self {
            status,
            summary: summary.into(),
            details: Vec::new(),
        }
    }

    fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Write the report as text or pretty JSON.
    pub fn write_to(&self, out: &mut dyn Write, json: bool) -> Result<()> {
        if json {
            serde_json::to_writer_pretty(&mut *out, self)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", self.summary)?;
            for line in &self.details {
                writeln!(out, "  {line}")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Session over a loaded tree
// ============================================================================

/// A loaded content tree plus the access settings to judge it with.
#[derive(Debug)]
pub struct Session {
    tree: ContentTree,
    access: AccessConfig,
}

impl Session {
    /// Wrap an already built tree.
    pub fn new(tree: ContentTree, access: AccessConfig) -> Self {
        Self { tree, access }
    }

    /// Load the tree under `content_root`.
    pub async fn load(content_root: &Path, access: AccessConfig) -> Result<Self> {
        Self::load_with_templates(content_root, access, Vec::new()).await
    }

    /// Load the tree, preferring content files named after `templates`.
    pub async fn load_with_templates(
        content_root: &Path,
        access: AccessConfig,
        templates: Vec<String>,
    ) -> Result<Self> {
        let options = LoadOptions::default()
            .with_rule_field(access.field_name.clone())
            .with_templates(templates);
        let tree = load_tree_with(content_root, &options).await?;
        Ok(Self::new(tree, access))
    }

    /// The loaded tree.
    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    fn service(&self) -> NodeAccessService<'_, ContentTree> {
        NodeAccessService::new(&self.tree, self.access.clone())
    }

    fn label(&self, page: PageId) -> String {
        self.tree.page_label(page)
    }

    fn lookup(&self, page_id: &str) -> Option<PageId> {
        let trimmed = page_id.trim().trim_matches('/');
        if trimmed.is_empty() {
            Some(self.tree.root())
        } else {
            self.tree.page_by_id(trimmed)
        }
    }

    /// `warden resolve`: gate a content path, tracing each hop.
    pub fn resolve(&self, path: &str, identity: &Identity) -> Report {
        let service = self.service();
        let gate = PathGate::new(&service);

        let mut details = Vec::new();
        let mut last = None;
        for state in gate.walk(path, identity) {
            if let WalkState::Walking { current, .. } = state {
                details.push(format!("admitted {}", self.label(current)));
            }
            last = Some(state);
        }

        let report = match last {
            Some(WalkState::Resolved(file)) => {
                let (name, location) = match self.tree.file(file) {
                    Some(f) => (
                        f.filename().to_string(),
                        f.path().map(|p| p.display().to_string()),
                    ),
                    None => (file.to_string(), None),
                };
                if let Some(location) = location {
                    details.push(format!("file at {location}"));
                }
                Report::new(Status::Ok, format!("resolved: {name}"))
            }
            Some(WalkState::Forbidden { page }) => Report::new(
                Status::Forbidden,
                format!("forbidden: {} denies {identity}", self.label(page)),
            ),
            Some(WalkState::NotFound(missing)) => {
                Report::new(Status::NotFound, self.describe_missing(&missing))
            }
            Some(WalkState::Walking { .. }) | None => {
                Report::new(Status::NotFound, "not found: walk did not finish")
            }
        };
        report.with_details(details)
    }

    fn describe_missing(&self, missing: &Missing) -> String {
        match missing {
            Missing::Page { parent, segment } => {
                format!("not found: no page '{segment}' under {}", self.label(*parent))
            }
            Missing::File { page, filename } => {
                format!("not found: no file '{filename}' on {}", self.label(*page))
            }
            Missing::NoFilename => "not found: path does not name a file".to_string(),
        }
    }

    /// `warden page`: gate a page request.
    pub fn page(&self, uid: &str, identity: &Identity) -> Report {
        let service = self.service();
        let gate = PageGate::new(&service);

        match gate.resolve_page(uid, identity) {
            PageOutcome::Resolved(page) => {
                Report::new(Status::Ok, format!("page: {}", self.label(page)))
            }
            PageOutcome::ErrorPage(page) => Report::new(
                Status::NotFound,
                format!("error page: {} (no page '{uid}')", self.label(page)),
            ),
            PageOutcome::Forbidden { page } => Report::new(
                Status::Forbidden,
                format!("forbidden: {} denies {identity}", self.label(page)),
            ),
            PageOutcome::RedirectTo(target) => {
                Report::new(Status::Forbidden, format!("redirect: {target}"))
            }
            PageOutcome::NotFound => {
                Report::new(Status::NotFound, format!("not found: no page '{uid}'"))
            }
        }
    }

    /// `warden check`: show a page's own rule and the requester's access to it.
    pub fn check(&self, page_id: &str, identity: &Identity) -> Report {
        let Some(page) = self.lookup(page_id) else {
            return Report::new(Status::NotFound, format!("not found: no page '{page_id}'"));
        };
        let service = self.service();
        let rule = service
            .page_rule(page)
            .map_or_else(|| "unknown".to_string(), ToString::to_string);
        let restricted = service.is_access_restricted(page);
        let accessible = service.is_accessible_by(page, identity);

        let details = vec![
            format!("rule: {rule}"),
            format!("restricted: {}", if restricted { "yes" } else { "no" }),
        ];
        let (status, verdict) = if accessible {
            (Status::Ok, "accessible")
        } else {
            (Status::Forbidden, "denied")
        };
        Report::new(
            status,
            format!("{}: {verdict} for {identity}", self.label(page)),
        )
        .with_details(details)
    }

    /// `warden ls`: a page's children split by accessibility.
    pub fn ls(&self, page_id: Option<&str>, identity: &Identity) -> Report {
        let page_id = page_id.unwrap_or("/");
        let Some(page) = self.lookup(page_id) else {
            return Report::new(Status::NotFound, format!("not found: no page '{page_id}'"));
        };
        let service = self.service();
        let listing = CollectionFilter::new(&service).children_of(page, identity);

        let details = listing
            .accessible
            .iter()
            .map(|child| format!("+ {}", self.label(*child)))
            .chain(
                listing
                    .inaccessible
                    .iter()
                    .map(|child| format!("- {}", self.label(*child))),
            )
            .collect();
        Report::new(
            Status::Ok,
            format!(
                "{}: {} accessible, {} inaccessible for {identity}",
                self.label(page),
                listing.accessible.len(),
                listing.inaccessible.len()
            ),
        )
        .with_details(details)
    }
}

// ============================================================================
// Rule codec commands
// ============================================================================

/// `warden rule decode`: interpret stored rule text.
pub fn rule_decode(text: &str, strict: bool) -> Result<Report> {
    let rule = if strict {
        AccessRule::try_decode(text)?
    } else {
        AccessRule::decode(text)
    };
    let mut details = vec![format!("kind: {}", rule.kind())];
    if let Some(list) = rule.allow_list() {
        details.push(format!("allow: [{}]", list.join(", ")));
    }
    details.push(format!(
        "restricted: {}",
        if warden_core::evaluator::is_restricted(&rule) {
            "yes"
        } else {
            "no"
        }
    ));
    details.extend(rule.encode()?.lines().map(|line| format!("| {line}")));
    Ok(Report::new(Status::Ok, rule.to_string()).with_details(details))
}

/// `warden rule encode`: produce stored text for a rule.
pub fn rule_encode(kind: RuleKind, allow: &[String]) -> Result<Report> {
    let allow = allow.iter().map(|s| s.trim()).filter(|s| !s.is_empty());
    let rule = match kind {
        RuleKind::Public => AccessRule::public(),
        RuleKind::Users => AccessRule::users(allow),
        RuleKind::Roles => AccessRule::roles(allow),
    };
    let text = rule.encode()?;
    Ok(Report::new(Status::Ok, text.trim_end().to_string()))
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run a command that needs no content tree, if `command` is one.
pub fn run_offline(command: &Command) -> Option<Result<Report>> {
    match command {
        Command::Rule {
            action: RuleAction::Decode { text, strict },
        } => Some(rule_decode(text, *strict)),
        Command::Rule {
            action: RuleAction::Encode { kind, allow },
        } => Some(rule_encode(*kind, allow)),
        _ => None,
    }
}

/// Run a command against a loaded session.
pub fn run_with_session(session: &Session, command: &Command) -> Option<Report> {
    match command {
        Command::Resolve { path, identity } => Some(session.resolve(path, identity)),
        Command::Page { uid, identity } => Some(session.page(uid, identity)),
        Command::Check { page_id, identity } => Some(session.check(page_id, identity)),
        Command::Ls { page_id, identity } => Some(session.ls(page_id.as_deref(), identity)),
        Command::Rule { .. } | Command::Config { .. } => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut tree = ContentTree::new();
        tree.add_page(PageId::ROOT, "home").unwrap();
        let blog = tree.add_page(PageId::ROOT, "1-blog").unwrap();
        let post = tree.add_page(blog, "post-1").unwrap();
        tree.set_field(post, "access", "type: users\nusers: [alice]")
            .unwrap();
        tree.add_file(post, "image.jpg", None).unwrap();
        tree.add_page(blog, "post-2").unwrap();
        Session::new(tree, AccessConfig::default())
    }

    fn alice() -> Identity {
        Identity::user("alice", "member").unwrap()
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Ok.code(), 0);
        assert_eq!(Status::Forbidden.code(), 3);
        assert_eq!(Status::NotFound.code(), 4);
    }

    // ------------------------------------------------------------------------
    // resolve
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_forbidden_for_anonymous() {
        let report = session().resolve("1-blog/post-1/image.jpg", &Identity::Anonymous);
        assert_eq!(report.status, Status::Forbidden);
        assert_eq!(report.summary, "forbidden: blog/post-1 denies anonymous");
        assert_eq!(report.details, vec!["admitted blog"]);
    }

    #[test]
    fn test_resolve_for_alice() {
        let report = session().resolve("1-blog/post-1/image.jpg", &alice());
        assert_eq!(report.status, Status::Ok);
        assert_eq!(report.summary, "resolved: image.jpg");
        assert_eq!(report.details, vec!["admitted blog", "admitted blog/post-1"]);
    }

    #[test]
    fn test_resolve_missing_page() {
        let report = session().resolve("missing-page/file.jpg", &alice());
        assert_eq!(report.status, Status::NotFound);
        assert!(report.summary.contains("'missing-page'"));
    }

    // ------------------------------------------------------------------------
    // page / check / ls
    // ------------------------------------------------------------------------

    #[test]
    fn test_page_home_for_slash() {
        let report = session().page("/", &Identity::Anonymous);
        assert_eq!(report.status, Status::Ok);
        assert_eq!(report.summary, "page: home");
    }

    #[test]
    fn test_page_missing_without_error_page() {
        let report = session().page("nope", &Identity::Anonymous);
        assert_eq!(report.status, Status::NotFound);
    }

    #[test]
    fn test_check_reports_rule() {
        let report = session().check("blog/post-1", &Identity::Anonymous);
        assert_eq!(report.status, Status::Forbidden);
        assert!(report.details.contains(&"rule: users [alice]".to_string()));
        assert!(report.details.contains(&"restricted: yes".to_string()));
    }

    #[test]
    fn test_check_root() {
        let report = session().check("/", &Identity::Anonymous);
        assert_eq!(report.status, Status::Ok);
        assert!(report.details.contains(&"restricted: no".to_string()));
    }

    #[test]
    fn test_ls_splits_children() {
        let report = session().ls(Some("blog"), &Identity::Anonymous);
        assert_eq!(report.status, Status::Ok);
        assert_eq!(report.details, vec!["+ blog/post-2", "- blog/post-1"]);
    }

    #[test]
    fn test_ls_unknown_page() {
        let report = session().ls(Some("nope"), &alice());
        assert_eq!(report.status, Status::NotFound);
    }

    // ------------------------------------------------------------------------
    // rule codec
    // ------------------------------------------------------------------------

    #[test]
    fn test_rule_decode_sentinel() {
        let report = rule_decode("0", false).unwrap();
        assert!(report.details.contains(&"restricted: yes".to_string()));
        assert!(report.details.contains(&"allow: []".to_string()));
    }

    #[test]
    fn test_rule_decode_strict_rejects_unknown_type() {
        assert!(rule_decode("type: groups", true).is_err());
        assert_eq!(rule_decode("type: groups", false).unwrap().summary, "public");
    }

    #[test]
    fn test_rule_encode_users() {
        let report = rule_encode(RuleKind::Users, &["alice".into(), " ".into()]).unwrap();
        assert_eq!(
            AccessRule::try_decode(&report.summary).unwrap(),
            AccessRule::users(["alice"])
        );
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    #[test]
    fn test_report_text_rendering() {
        let report = Report::new(Status::Ok, "done").with_details(vec!["a".into()]);
        let mut out = Vec::new();
        report.write_to(&mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "done\n  a\n");
    }

    #[test]
    fn test_report_json_rendering() {
        let report = Report::new(Status::NotFound, "gone");
        let mut out = Vec::new();
        report.write_to(&mut out, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "not_found");
        assert_eq!(value["summary"], "gone");
        assert!(value.get("details").is_none());
    }
}
