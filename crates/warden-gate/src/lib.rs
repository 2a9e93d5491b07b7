//! Access enforcement over a content tree.
//!
//! Built on the evaluator in `warden-core` and the [`ContentProvider`]
//! trait from `warden-content`:
//!
//! - [`NodeAccessService`]: is a page or file restricted, and may a given
//!   identity access it
//! - [`CollectionFilter`]: order-preserving accessible/inaccessible splits
//! - [`PathGate`]: walks `dir/dir/file` paths, checking every page on the way
//! - [`PageGate`]: resolves page requests, with home/error page fallbacks and
//!   an optional redirect on denial
//!
//! Denials and missing nodes are outcome values ([`PathOutcome`],
//! [`PageOutcome`]), not errors.
//!
//! # Example
//!
//! ```rust
//! use warden_content::{ContentTree, PageId};
//! use warden_core::{AccessConfig, Identity};
//! use warden_gate::{NodeAccessService, PathGate, PathOutcome};
//!
//! let mut tree = ContentTree::new();
//! let blog = tree.add_page(PageId::ROOT, "blog").unwrap();
//! let post = tree.add_page(blog, "post-1").unwrap();
//! tree.set_field(post, "access", "type: users\nusers: [alice]").unwrap();
//! let image = tree.add_file(post, "image.jpg", None).unwrap();
//!
//! let service = NodeAccessService::new(&tree, AccessConfig::default());
//! let gate = PathGate::new(&service);
//!
//! let alice = Identity::user("alice", "member").unwrap();
//! assert_eq!(gate.resolve_path("blog/post-1/image.jpg", &alice), PathOutcome::Resolved(image));
//! assert_eq!(
//!     gate.resolve_path("blog/post-1/image.jpg", &Identity::Anonymous),
//!     PathOutcome::Forbidden { page: post }
//! );
//! ```
//!
//! [`ContentProvider`]: warden_content::ContentProvider

pub mod context;
pub mod filter;
pub mod page_gate;
pub mod path_gate;
pub mod service;

pub use context::RequestContext;
pub use filter::{CollectionFilter, Listing};
pub use page_gate::{PageGate, PageOutcome};
pub use path_gate::{Missing, PathGate, PathOutcome, PathWalk, WalkState};
pub use service::{Node, NodeAccessService};
