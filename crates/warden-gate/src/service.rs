//! Node-level access checks.
//!
//! [`NodeAccessService`] ties the rule decoder and evaluator to a content
//! provider: it finds the rule guarding a page or file and asks the
//! evaluator about it. Files have no rule of their own and answer with their
//! page's rule.

use std::fmt;
use std::sync::OnceLock;

use warden_content::{ContentProvider, FileId, PageId};
use warden_core::{AccessConfig, AccessRule, Identity, evaluator};

use crate::context::RequestContext;

static PUBLIC: AccessRule = AccessRule::Public;

/// A page or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// A page
    Page(PageId),
    /// A file attached to a page
    File(FileId),
}

impl From<PageId> for Node {
    fn from(page: PageId) -> Self {
        Node::Page(page)
    }
}

impl From<FileId> for Node {
    fn from(file: FileId) -> Self {
        Node::File(file)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Page(page) => write!(f, "{page}"),
            Node::File(file) => write!(f, "{file}"),
        }
    }
}

/// Access checks for pages and files of one content snapshot.
///
/// Rules are decoded lazily and cached per page for the life of the service.
/// The provider is only ever read.
pub struct NodeAccessService<'a, P: ContentProvider + ?Sized> {
    provider: &'a P,
    config: AccessConfig,
    rules: Vec<OnceLock<AccessRule>>,
}

impl<'a, P: ContentProvider + ?Sized> NodeAccessService<'a, P> {
    /// Create a service over `provider`.
    pub fn new(provider: &'a P, config: AccessConfig) -> Self {
        let rules = (0..provider.page_count()).map(|_| OnceLock::new()).collect();
        Self {
            provider,
            config,
            rules,
        }
    }

    /// The content provider.
    pub fn provider(&self) -> &'a P {
        self.provider
    }

    /// The access settings.
    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// The rule guarding a page.
    ///
    /// The root is never restricted. Returns `None` for a page the provider
    /// does not know.
    pub fn page_rule(&self, page: PageId) -> Option<&AccessRule> {
        if page == self.provider.root() {
            return Some(&PUBLIC);
        }
        let slot = self.rules.get(page.index())?;
        Some(slot.get_or_init(|| {
            let raw = self.provider.field(page, &self.config.field_name);
            AccessRule::decode_field(raw)
        }))
    }

    /// The rule guarding a node. Files use their owning page's rule; a file
    /// whose owner cannot be resolved has no rule.
    pub fn rule(&self, node: Node) -> Option<&AccessRule> {
        match node {
            Node::Page(page) => self.page_rule(page),
            Node::File(file) => match self.provider.file_owner(file) {
                Some(owner) => self.page_rule(owner),
                None => {
                    log::warn!("File {file} has no resolvable page, denying access");
                    None
                }
            },
        }
    }

    /// Whether access to a node is limited to specific users or roles.
    ///
    /// Nodes without a resolvable rule count as restricted.
    pub fn is_access_restricted(&self, node: impl Into<Node>) -> bool {
        self.rule(node.into()).is_none_or(evaluator::is_restricted)
    }

    /// Whether `identity` may access a node.
    ///
    /// Nodes without a resolvable rule are inaccessible to everybody.
    pub fn is_accessible_by(&self, node: impl Into<Node>, identity: &Identity) -> bool {
        let node = node.into();
        let Some(rule) = self.rule(node) else {
            return false;
        };
        let admitted = evaluator::is_accessible_by(rule, identity);
        log::debug!(
            "{} {node} for {identity} under {rule}",
            if admitted { "Admit" } else { "Deny" }
        );
        admitted
    }

    /// Whether the requester of `ctx` may access a node.
    pub fn is_accessible(&self, node: impl Into<Node>, ctx: &RequestContext) -> bool {
        self.is_accessible_by(node, ctx.identity())
    }
}

impl<P: ContentProvider + ?Sized> fmt::Debug for NodeAccessService<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeAccessService")
            .field("config", &self.config)
            .field("pages", &self.rules.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
