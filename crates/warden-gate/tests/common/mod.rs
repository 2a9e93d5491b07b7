//! Shared trees and providers for the gate tests.

use std::sync::Mutex;

use warden_content::{ContentProvider, ContentTree, FileId, PageId};
use warden_core::Identity;

/// Build a tree from `(path-of-dirnames, access-field)` pairs. Parents must
/// be listed before children. Files are added with [`add_file`].
pub fn build_tree(pages: &[(&str, Option<&str>)]) -> ContentTree {
    let mut tree = ContentTree::new();
    for (path, access) in pages {
        let (parent, dirname) = match path.rsplit_once('/') {
            Some((parent, dirname)) => (find_by_dirnames(&tree, parent), dirname),
            None => (PageId::ROOT, *path),
        };
        let page = tree.add_page(parent, dirname).unwrap();
        if let Some(access) = access {
            tree.set_field(page, "access", *access).unwrap();
        }
    }
    tree
}

/// Attach a file to the page at `path` (dirnames).
pub fn add_file(tree: &mut ContentTree, path: &str, filename: &str) -> FileId {
    let page = find_by_dirnames(tree, path);
    tree.add_file(page, filename, None).unwrap()
}

/// Find a page by its dirname path.
pub fn find_by_dirnames(tree: &ContentTree, path: &str) -> PageId {
    path.split('/').fold(PageId::ROOT, |page, dirname| {
        tree.child_by_dirname(page, dirname).unwrap()
    })
}

/// The blog tree: `blog` public, `post-1` for alice only, `post-2` public.
pub fn blog_tree() -> ContentTree {
    let mut tree = build_tree(&[
        ("blog", None),
        ("blog/post-1", Some("type: users\nusers: [alice]")),
        ("blog/post-2", Some("1")),
    ]);
    add_file(&mut tree, "blog/post-1", "image.jpg");
    add_file(&mut tree, "blog/post-2", "image.jpg");
    tree
}

pub fn alice() -> Identity {
    Identity::user("alice", "member").unwrap()
}

pub fn bob() -> Identity {
    Identity::user("bob", "member").unwrap()
}

/// A provider that records every page whose fields were read.
pub struct RecordingProvider {
    pub inner: ContentTree,
    pub reads: Mutex<Vec<PageId>>,
}

impl RecordingProvider {
    pub fn new(inner: ContentTree) -> Self {
        Self {
            inner,
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn was_read(&self, page: PageId) -> bool {
        self.reads.lock().unwrap().contains(&page)
    }
}

impl ContentProvider for RecordingProvider {
    fn root(&self) -> PageId {
        self.inner.root()
    }

    fn page_count(&self) -> usize {
        ContentProvider::page_count(&self.inner)
    }

    fn parent(&self, page: PageId) -> Option<PageId> {
        self.inner.parent(page)
    }

    fn children(&self, page: PageId) -> Vec<PageId> {
        self.inner.children(page)
    }

    fn child_by_dirname(&self, page: PageId, dirname: &str) -> Option<PageId> {
        self.inner.child_by_dirname(page, dirname)
    }

    fn child_by_uid(&self, page: PageId, uid: &str) -> Option<PageId> {
        self.inner.child_by_uid(page, uid)
    }

    fn field(&self, page: PageId, name: &str) -> Option<&str> {
        self.reads.lock().unwrap().push(page);
        self.inner.field(page, name)
    }

    fn files(&self, page: PageId) -> Vec<FileId> {
        ContentProvider::files(&self.inner, page)
    }

    fn file(&self, page: PageId, filename: &str) -> Option<FileId> {
        ContentProvider::file(&self.inner, page, filename)
    }

    fn file_owner(&self, file: FileId) -> Option<PageId> {
        self.inner.file_owner(file)
    }

    fn page_label(&self, page: PageId) -> String {
        self.inner.page_label(page)
    }
}
