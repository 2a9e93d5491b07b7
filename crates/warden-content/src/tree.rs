//! In-memory content tree.
//!
//! Pages and files live in two arenas and refer to each other by index. The
//! tree is built once (by hand or by [`crate::loader::load_tree`]) and then
//! only read.
//!
//! ```
//! use warden_content::{ContentTree, PageId};
//!
//! let mut tree = ContentTree::new();
//! let blog = tree.add_page(PageId::ROOT, "1-blog").unwrap();
//! let post = tree.add_page(blog, "post-1").unwrap();
//! tree.set_field(post, "Access", "type: users\nusers: [alice]").unwrap();
//! tree.add_file(post, "image.jpg", None).unwrap();
//!
//! assert_eq!(tree.page(post).unwrap().id(), "blog/post-1");
//! assert_eq!(tree.page(post).unwrap().field("access"), Some("type: users\nusers: [alice]"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use warden_core::{Error, Result};

use crate::dirname::parse_dirname;

/// Handle to a page in a [`ContentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(usize);

impl PageId {
    /// The site root.
    pub const ROOT: PageId = PageId(0);

    /// Arena index of the page.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Handle to a file in a [`ContentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

impl FileId {
    /// Arena index of the file.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// A page: a directory in the content tree.
#[derive(Debug, Clone)]
pub struct Page {
    id: String,
    dirname: String,
    uid: String,
    num: Option<u32>,
    parent: Option<PageId>,
    children: Vec<PageId>,
    files: Vec<FileId>,
    fields: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl Page {
    fn new(id: String, dirname: &str, parent: Option<PageId>) -> Self {
        let parsed = parse_dirname(dirname);
        Self {
            id,
            uid: parsed.uid.to_string(),
            num: parsed.num,
            dirname: dirname.to_string(),
            parent,
            children: Vec::new(),
            files: Vec::new(),
            fields: BTreeMap::new(),
            path: None,
        }
    }

    /// Uids from the root joined with `/` (`blog/post-1`). Empty for the root.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Directory name, sort prefix included.
    pub fn dirname(&self) -> &str {
        &self.dirname
    }

    /// Directory name without its sort prefix.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Sort number from the directory name.
    pub fn num(&self) -> Option<u32> {
        self.num
    }

    /// Parent page; `None` for the root.
    pub fn parent(&self) -> Option<PageId> {
        self.parent
    }

    /// Child pages in insertion order.
    pub fn children(&self) -> &[PageId] {
        &self.children
    }

    /// Attached files in insertion order.
    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    /// Raw text of a content field. Field names are case-insensitive.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_lowercase()).map(String::as_str)
    }

    /// All content fields, keyed by lowercase name.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Directory on disk, for loaded trees.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns `true` for the site root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A file attached to a page.
#[derive(Debug, Clone)]
pub struct File {
    filename: String,
    page: Option<PageId>,
    path: Option<PathBuf>,
}

impl File {
    /// File name within its page.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Owning page. `None` for a detached file.
    pub fn page(&self) -> Option<PageId> {
        self.page
    }

    /// Location on disk, for loaded trees.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Arena-backed page/file tree with a single root.
#[derive(Debug, Clone)]
pub struct ContentTree {
    pages: Vec<Page>,
    files: Vec<File>,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree {
    /// An empty tree holding only the root page.
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new(String::new(), "", None)],
            files: Vec::new(),
        }
    }

    /// Look up a page.
    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id.0)
    }

    /// Look up a file.
    pub fn file(&self, id: FileId) -> Option<&File> {
        self.files.get(id.0)
    }

    /// Number of pages, root included.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of files, detached ones included.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Iterate over all page handles in insertion order.
    pub fn page_ids(&self) -> impl Iterator<Item = PageId> + '_ {
        (0..self.pages.len()).map(PageId)
    }

    /// Add a child page under `parent`.
    ///
    /// Fails if `parent` is unknown or already has a child with this dirname.
    pub fn add_page(&mut self, parent: PageId, dirname: &str) -> Result<PageId> {
        if dirname.is_empty() || dirname.contains('/') {
            return Err(Error::parse(format!("invalid page dirname '{dirname}'")));
        }
        let parent_page = self.page_checked(parent)?;
        if parent_page
            .children
            .iter()
            .any(|c| self.pages[c.0].dirname == dirname)
        {
            return Err(Error::DuplicateNode {
                parent: parent_page.id.clone(),
                name: dirname.to_string(),
            });
        }

        let uid = parse_dirname(dirname).uid;
        let id = if parent_page.id.is_empty() {
            uid.to_string()
        } else {
            format!("{}/{uid}", parent_page.id)
        };

        let page_id = PageId(self.pages.len());
        self.pages.push(Page::new(id, dirname, Some(parent)));
        self.pages[parent.0].children.push(page_id);
        Ok(page_id)
    }

    /// Set a content field on a page, replacing any previous value.
    pub fn set_field(&mut self, page: PageId, name: &str, value: impl Into<String>) -> Result<()> {
        self.page_checked(page)?;
        self.pages[page.0]
            .fields
            .insert(name.to_lowercase(), value.into());
        Ok(())
    }

    /// Set several content fields at once.
    pub fn set_fields<I, K, V>(&mut self, page: PageId, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in fields {
            self.set_field(page, name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Record where a page lives on disk.
    pub fn set_path(&mut self, page: PageId, path: impl Into<PathBuf>) -> Result<()> {
        self.page_checked(page)?;
        self.pages[page.0].path = Some(path.into());
        Ok(())
    }

    /// Attach a file to a page.
    pub fn add_file(
        &mut self,
        page: PageId,
        filename: &str,
        path: Option<PathBuf>,
    ) -> Result<FileId> {
        let owner = self.page_checked(page)?;
        if filename.is_empty() || filename.contains('/') {
            return Err(Error::parse(format!("invalid filename '{filename}'")));
        }
        if owner
            .files
            .iter()
            .any(|f| self.files[f.0].filename == filename)
        {
            return Err(Error::DuplicateNode {
                parent: owner.id.clone(),
                name: filename.to_string(),
            });
        }

        let file_id = FileId(self.files.len());
        self.files.push(File {
            filename: filename.to_string(),
            page: Some(page),
            path,
        });
        self.pages[page.0].files.push(file_id);
        Ok(file_id)
    }

    /// Register a file whose owning page is unknown.
    ///
    /// Such files are reachable only by handle and are never accessible.
    pub fn add_detached_file(&mut self, filename: &str, path: Option<PathBuf>) -> FileId {
        let file_id = FileId(self.files.len());
        self.files.push(File {
            filename: filename.to_string(),
            page: None,
            path,
        });
        file_id
    }

    fn page_checked(&self, id: PageId) -> Result<&Page> {
        self.pages
            .get(id.0)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_root() {
        let tree = ContentTree::new();
        let root = tree.page(PageId::ROOT).unwrap();
        assert!(root.is_root());
        assert_eq!(root.id(), "");
        assert_eq!(tree.page_count(), 1);
        assert_eq!(tree.file_count(), 0);
    }

    #[test]
    fn test_page_ids_use_uids() {
        let mut tree = ContentTree::new();
        let blog = tree.add_page(PageId::ROOT, "1-blog").unwrap();
        let post = tree.add_page(blog, "3-post-1").unwrap();

        let page = tree.page(post).unwrap();
        assert_eq!(page.id(), "blog/post-1");
        assert_eq!(page.dirname(), "3-post-1");
        assert_eq!(page.uid(), "post-1");
        assert_eq!(page.num(), Some(3));
        assert_eq!(page.parent(), Some(blog));
        assert_eq!(tree.page(blog).unwrap().children(), &[post]);
    }

    #[test]
    fn test_duplicate_dirname_rejected() {
        let mut tree = ContentTree::new();
        tree.add_page(PageId::ROOT, "blog").unwrap();
        let err = tree.add_page(PageId::ROOT, "blog").unwrap_err();
        assert!(matches!(err, Error::DuplicateNode { .. }));
    }

    #[test]
    fn test_invalid_dirname_rejected() {
        let mut tree = ContentTree::new();
        assert!(tree.add_page(PageId::ROOT, "").is_err());
        assert!(tree.add_page(PageId::ROOT, "a/b").is_err());
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut tree = ContentTree::new();
        let err = tree.add_page(PageId(42), "blog").unwrap_err();
        assert!(matches!(err, Error::UnknownNode(_)));
    }

    #[test]
    fn test_fields_are_case_insensitive() {
        let mut tree = ContentTree::new();
        let page = tree.add_page(PageId::ROOT, "about").unwrap();
        tree.set_fields(page, [("Title", "About"), ("ACCESS", "1")])
            .unwrap();

        let page = tree.page(page).unwrap();
        assert_eq!(page.field("title"), Some("About"));
        assert_eq!(page.field("Access"), Some("1"));
        assert_eq!(page.field("missing"), None);
    }

    #[test]
    fn test_files_attach_to_page() {
        let mut tree = ContentTree::new();
        let page = tree.add_page(PageId::ROOT, "gallery").unwrap();
        let file = tree.add_file(page, "a.jpg", None).unwrap();

        assert_eq!(tree.file(file).unwrap().page(), Some(page));
        assert_eq!(tree.page(page).unwrap().files(), &[file]);
        assert!(tree.add_file(page, "a.jpg", None).is_err());
    }

    #[test]
    fn test_detached_file_has_no_owner() {
        let mut tree = ContentTree::new();
        let file = tree.add_detached_file("stray.pdf", None);
        assert_eq!(tree.file(file).unwrap().page(), None);
        assert_eq!(tree.file_count(), 1);
    }
}
