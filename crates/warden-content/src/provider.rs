//! Read-only navigation over a content tree.
//!
//! [`ContentProvider`] is the seam between the access gates and whatever
//! holds the content. [`ContentTree`] implements it; hosts with their own
//! page store can implement it too.

use crate::tree::{ContentTree, FileId, PageId};

/// Parent/child navigation, field lookup, and file lookup over pages.
///
/// Implementations must be read-only snapshots: the gates assume nothing
/// changes while a request is being evaluated.
pub trait ContentProvider {
    /// The site root.
    fn root(&self) -> PageId;

    /// Upper bound (exclusive) on page indices, used to size per-page caches.
    fn page_count(&self) -> usize;

    /// Parent of a page; `None` for the root or an unknown page.
    fn parent(&self, page: PageId) -> Option<PageId>;

    /// Child pages in order.
    fn children(&self, page: PageId) -> Vec<PageId>;

    /// Child page with the given directory name (sort prefix included).
    fn child_by_dirname(&self, page: PageId, dirname: &str) -> Option<PageId>;

    /// Child page with the given uid.
    fn child_by_uid(&self, page: PageId, uid: &str) -> Option<PageId>;

    /// Raw text of a content field.
    fn field(&self, page: PageId, name: &str) -> Option<&str>;

    /// Files attached to a page, in order.
    fn files(&self, page: PageId) -> Vec<FileId>;

    /// File attached to a page by name.
    fn file(&self, page: PageId, filename: &str) -> Option<FileId>;

    /// Page owning a file. `None` when the owner cannot be resolved.
    fn file_owner(&self, file: FileId) -> Option<PageId>;

    /// Human-readable label for logs.
    fn page_label(&self, page: PageId) -> String;

    /// Resolve a page id (`blog/post-1`) by walking uids from the root.
    ///
    /// Empty segments are ignored, so `/blog/` finds `blog`.
    fn page_by_id(&self, id: &str) -> Option<PageId> {
        let mut current = self.root();
        let mut walked = false;
        for uid in id.split('/').filter(|s| !s.is_empty()) {
            current = self.child_by_uid(current, uid)?;
            walked = true;
        }
        walked.then_some(current)
    }

    /// The page and its ancestors below the root, top-down.
    fn lineage(&self, page: PageId) -> Vec<PageId> {
        let root = self.root();
        let mut chain = Vec::new();
        let mut current = Some(page);
        while let Some(p) = current {
            if p == root {
                break;
            }
            chain.push(p);
            current = self.parent(p);
        }
        chain.reverse();
        chain
    }
}

impl ContentProvider for ContentTree {
    fn root(&self) -> PageId {
        PageId::ROOT
    }

    fn page_count(&self) -> usize {
        ContentTree::page_count(self)
    }

    fn parent(&self, page: PageId) -> Option<PageId> {
        self.page(page)?.parent()
    }

    fn children(&self, page: PageId) -> Vec<PageId> {
        self.page(page)
            .map(|p| p.children().to_vec())
            .unwrap_or_default()
    }

    fn child_by_dirname(&self, page: PageId, dirname: &str) -> Option<PageId> {
        self.page(page)?
            .children()
            .iter()
            .copied()
            .find(|c| self.page(*c).is_some_and(|p| p.dirname() == dirname))
    }

    fn child_by_uid(&self, page: PageId, uid: &str) -> Option<PageId> {
        self.page(page)?
            .children()
            .iter()
            .copied()
            .find(|c| self.page(*c).is_some_and(|p| p.uid() == uid))
    }

    fn field(&self, page: PageId, name: &str) -> Option<&str> {
        self.page(page)?.field(name)
    }

    fn files(&self, page: PageId) -> Vec<FileId> {
        self.page(page)
            .map(|p| p.files().to_vec())
            .unwrap_or_default()
    }

    fn file(&self, page: PageId, filename: &str) -> Option<FileId> {
        self.page(page)?
            .files()
            .iter()
            .copied()
            .find(|f| ContentTree::file(self, *f).is_some_and(|file| file.filename() == filename))
    }

    fn file_owner(&self, file: FileId) -> Option<PageId> {
        let owner = ContentTree::file(self, file)?.page()?;
        self.page(owner).map(|_| owner)
    }

    fn page_label(&self, page: PageId) -> String {
        match self.page(page) {
            Some(p) if p.is_root() => "/".to_string(),
            Some(p) => p.id().to_string(),
            None => page.to_string(),
        }
    }
}
