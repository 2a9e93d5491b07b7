//! Content tree, provider trait, and content directory loading.
//!
//! The access gates in `warden-gate` only need to navigate pages, read a
//! field, and find files. This crate supplies that view:
//!
//! - [`ContentProvider`]: the navigation trait the gates are written against
//! - [`ContentTree`]: arena-backed implementation, built by hand or loaded
//! - [`loader::load_tree`]: builds a tree from a content directory
//! - [`content_file`]: frontmatter and field-text content file parsing
//! - [`dirname`]: sort prefix / uid splitting for page directories
//!
//! # Example
//!
//! ```rust
//! use warden_content::{ContentProvider, ContentTree, PageId};
//!
//! let mut tree = ContentTree::new();
//! let blog = tree.add_page(PageId::ROOT, "1-blog").unwrap();
//! tree.set_field(blog, "access", "type: roles\nroles: [editor]").unwrap();
//!
//! assert_eq!(tree.child_by_dirname(PageId::ROOT, "1-blog"), Some(blog));
//! assert_eq!(tree.page_by_id("blog"), Some(blog));
//! assert!(tree.field(blog, "Access").is_some());
//! ```

pub mod content_file;
pub mod dirname;
pub mod loader;
pub mod provider;
pub mod tree;

pub use content_file::{ContentFormat, Fields};
pub use loader::{LoadOptions, load_tree, load_tree_with};
pub use provider::ContentProvider;
pub use tree::{ContentTree, File, FileId, Page, PageId};
