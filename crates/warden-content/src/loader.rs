//! Build a [`ContentTree`] from a content directory.
//!
//! Layout:
//!
//! ```text
//! content/
//! ├── site.txt            ← root content file
//! ├── 1-blog/
//! │   ├── blog.txt        ← content file of "blog"
//! │   └── post-1/
//! │       ├── post.md     ← content file of "blog/post-1"
//! │       ├── image.jpg   ← attached file
//! │       └── image.jpg.txt  ← meta data of image.jpg, skipped
//! └── error/
//!     └── error.txt
//! ```
//!
//! Every directory is a page. Child pages are ordered by their sort prefix
//! (`2-blog` before `10-about`), unnumbered ones last, ties by name.
//!
//! In each directory the `*.md` and `*.txt` files are content file
//! candidates, except double-extension `*.txt` files (`image.jpg.txt`),
//! which hold file meta data and are skipped. The candidate whose stem names
//! a configured template wins, otherwise the first by name; the others are
//! attached files. When the chosen file lacks the rule field but another
//! candidate has one, that rule is taken over, and an unreadable content
//! file denies everybody. A page's rule is never lost to layout.
//!
//! Entries whose names start with `.` are skipped.

use std::fs::FileType;
use std::path::{Path, PathBuf};

use warden_core::config::DEFAULT_FIELD_NAME;
use warden_core::{Error, Result};

use crate::content_file::{ContentFormat, Fields, parse_fields};
use crate::dirname::parse_dirname;
use crate::tree::{ContentTree, PageId};

/// Rule text written in place of a content file that could not be read.
const UNREADABLE_RULE: &str = "0";

/// Settings for [`load_tree_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field holding the access rule. Kept when choosing between content
    /// files.
    pub rule_field: String,
    /// Template names, e.g. `post`. A content file named after one of them
    /// is preferred over the first by name.
    pub templates: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            rule_field: DEFAULT_FIELD_NAME.to_string(),
            templates: Vec::new(),
        }
    }
}

impl LoadOptions {
    /// Use a different rule field.
    pub fn with_rule_field(mut self, name: impl Into<String>) -> Self {
        self.rule_field = name.into();
        self
    }

    /// Prefer content files named after these templates.
    pub fn with_templates<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.templates = templates.into_iter().map(Into::into).collect();
        self
    }
}

/// A regular file of a page directory.
struct PageFile {
    name: String,
    path: PathBuf,
    format: Option<ContentFormat>,
}

/// Load a content directory into a tree with default [`LoadOptions`].
pub async fn load_tree(root: impl AsRef<Path>) -> Result<ContentTree> {
    load_tree_with(root, &LoadOptions::default()).await
}

/// Load a content directory into a tree.
///
/// Unreadable directories fail the load.
pub async fn load_tree_with(root: impl AsRef<Path>, options: &LoadOptions) -> Result<ContentTree> {
    let root = root.as_ref();
    let metadata = tokio::fs::metadata(root)
        .await
        .map_err(|e| Error::io_with_path(e, root))?;
    if !metadata.is_dir() {
        return Err(Error::config(format!(
            "content root {} is not a directory",
            root.display()
        )));
    }

    let mut tree = ContentTree::new();
    tree.set_path(PageId::ROOT, root)?;

    let mut pending = vec![(PageId::ROOT, root.to_path_buf())];
    while let Some((page, dir)) = pending.pop() {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for (name, path, file_type) in read_sorted_entries(&dir).await? {
            if name.starts_with('.') {
                continue;
            }
            if file_type.is_dir() {
                dirs.push((name, path));
            } else if !file_type.is_file() {
                continue;
            } else if is_meta_file(&name) {
                log::debug!("Skipping file meta data {}", path.display());
            } else {
                let format = ContentFormat::from_path(&path);
                files.push(PageFile { name, path, format });
            }
        }

        dirs.sort_by(|a, b| page_order(&a.0).cmp(&page_order(&b.0)));
        for (name, path) in dirs {
            let child = tree.add_page(page, &name)?;
            tree.set_path(child, &path)?;
            pending.push((child, path));
        }

        let chosen = pick_content_file(&files, &options.templates);
        if let Some(index) = chosen {
            let fields = read_page_fields(&files, index, &dir, options).await;
            tree.set_fields(page, fields)?;
        }
        for (index, file) in files.into_iter().enumerate() {
            if Some(index) != chosen {
                tree.add_file(page, &file.name, Some(file.path))?;
            }
        }
    }

    log::info!(
        "Loaded {} pages and {} files from {}",
        tree.page_count(),
        tree.file_count(),
        root.display()
    );
    Ok(tree)
}

/// `image.jpg.txt` and the like: meta data of a sibling file, not content.
fn is_meta_file(name: &str) -> bool {
    let path = Path::new(name);
    path.extension().is_some_and(|ext| ext == "txt")
        && path
            .file_stem()
            .is_some_and(|stem| Path::new(stem).extension().is_some())
}

/// Sort key for child pages: numbered first by number, then by name.
fn page_order(name: &str) -> (bool, Option<u32>, &str) {
    let num = parse_dirname(name).num;
    (num.is_none(), num, name)
}

fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

/// Index of the page's content file among `files`.
fn pick_content_file(files: &[PageFile], templates: &[String]) -> Option<usize> {
    let candidates = || {
        files
            .iter()
            .enumerate()
            .filter(|(_, file)| file.format.is_some())
    };
    candidates()
        .find(|(_, file)| {
            let stem = stem(&file.name);
            templates.iter().any(|t| t.eq_ignore_ascii_case(stem))
        })
        .or_else(|| candidates().next())
        .map(|(index, _)| index)
}

/// Fields of the chosen content file, with the rule carried over from
/// another candidate when the chosen one has none.
async fn read_page_fields(
    files: &[PageFile],
    chosen: usize,
    dir: &Path,
    options: &LoadOptions,
) -> Fields {
    let rule_field = options.rule_field.to_lowercase();
    let others: Vec<&PageFile> = files
        .iter()
        .enumerate()
        .filter(|(index, file)| *index != chosen && file.format.is_some())
        .map(|(_, file)| file)
        .collect();

    if !others.is_empty() {
        log::warn!(
            "{} content files in {}, using {}",
            others.len() + 1,
            dir.display(),
            files[chosen].name
        );
    }

    let Some(mut fields) = read_fields(&files[chosen]).await else {
        log::warn!(
            "Denying access to {} until its content file can be read",
            dir.display()
        );
        return Fields::from([(rule_field, UNREADABLE_RULE.to_string())]);
    };

    if !fields.contains_key(&rule_field) {
        for other in others {
            let rule = read_fields(other)
                .await
                .and_then(|mut f| f.remove(&rule_field));
            if let Some(rule) = rule {
                log::warn!(
                    "{} has no '{rule_field}' field, using the one in {}",
                    files[chosen].name,
                    other.name
                );
                fields.insert(rule_field, rule);
                break;
            }
        }
    }
    fields
}

async fn read_fields(file: &PageFile) -> Option<Fields> {
    let format = file.format?;
    match tokio::fs::read_to_string(&file.path).await {
        Ok(text) => Some(parse_fields(format, &text)),
        Err(e) => {
            log::warn!("Cannot read content file {}: {e}", file.path.display());
            None
        }
    }
}

async fn read_sorted_entries(dir: &Path) -> Result<Vec<(String, PathBuf, FileType)>> {
    let mut reader = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| Error::io_with_path(e, dir))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| Error::io_with_path(e, dir))?
    {
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            log::warn!("Skipping non UTF-8 entry {}", path.display());
            continue;
        };
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| Error::io_with_path(e, &path))?;
        entries.push((name, path, file_type));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}
