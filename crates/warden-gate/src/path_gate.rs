//! Gating nested resources addressed by a content path.
//!
//! A path such as `1-blog/post-1/image.jpg` names pages by directory name
//! and ends with a file name. The walk starts at the root and checks every
//! page on the way down before looking at the file:
//!
//! ```text
//! Walking(root, [1-blog, post-1]) ──child missing──▶ NotFound
//!        │                        ──child denied───▶ Forbidden
//!        ▼ child admitted
//! Walking(1-blog, [post-1])
//!        ▼
//! Walking(post-1, [])  ──file found──▶ Resolved
//!                      ──no file────▶ NotFound
//! ```
//!
//! A denial anywhere stops the walk, so no rule below a denied page is ever
//! consulted.

use warden_content::{ContentProvider, FileId, PageId};
use warden_core::Identity;

use crate::context::RequestContext;
use crate::service::NodeAccessService;

/// What could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// No child page with this directory name.
    Page {
        /// Parent that was searched
        parent: PageId,
        /// Directory name looked up
        segment: String,
    },
    /// No file with this name on the final page.
    File {
        /// Page that was searched
        page: PageId,
        /// File name looked up
        filename: String,
    },
    /// The path does not end in a file name.
    NoFilename,
}

/// Where a walk stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkState {
    /// At `current`, with page segments from index `next` still to walk.
    Walking {
        /// Last admitted page
        current: PageId,
        /// Index of the next page segment
        next: usize,
    },
    /// Access to `page` was denied.
    Forbidden {
        /// Page whose rule denied access
        page: PageId,
    },
    /// A page segment or the file was not found.
    NotFound(Missing),
    /// The file was found and every page above it admitted the requester.
    Resolved(FileId),
}

impl WalkState {
    /// Returns `true` once the walk cannot move any further.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WalkState::Walking { .. })
    }

    /// The outcome a terminal state stands for, `None` while walking.
    pub fn outcome(&self) -> Option<PathOutcome> {
        match self {
            WalkState::Walking { .. } => None,
            WalkState::Forbidden { page } => Some(PathOutcome::Forbidden { page: *page }),
            WalkState::NotFound(missing) => Some(PathOutcome::NotFound(missing.clone())),
            WalkState::Resolved(file) => Some(PathOutcome::Resolved(*file)),
        }
    }
}

/// Final result of gating a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    /// Serve this file.
    Resolved(FileId),
    /// The requester may not see the page named.
    Forbidden {
        /// Page whose rule denied access
        page: PageId,
    },
    /// Something on the path does not exist.
    NotFound(Missing),
}

impl PathOutcome {
    /// Returns `true` for [`PathOutcome::Resolved`].
    pub fn is_resolved(&self) -> bool {
        matches!(self, PathOutcome::Resolved(_))
    }
}

/// A path being walked for one requester.
///
/// Iterating yields each state after a transition, ending with the terminal
/// one.
pub struct PathWalk<'g, 'a, P: ContentProvider + ?Sized> {
    service: &'g NodeAccessService<'a, P>,
    identity: &'g Identity,
    segments: Vec<String>,
    filename: Option<String>,
    state: WalkState,
    finished: bool,
}

impl<'g, 'a, P: ContentProvider + ?Sized> PathWalk<'g, 'a, P> {
    fn new(service: &'g NodeAccessService<'a, P>, path: &str, identity: &'g Identity) -> Self {
        let (segments, filename) = split_path(path);
        Self {
            service,
            identity,
            segments,
            filename,
            state: WalkState::Walking {
                current: service.provider().root(),
                next: 0,
            },
            finished: false,
        }
    }

    /// The current state.
    pub fn state(&self) -> &WalkState {
        &self.state
    }

    /// Perform one transition. Terminal states are left unchanged.
    pub fn step(&mut self) -> &WalkState {
        if let WalkState::Walking { current, next } = self.state {
            self.state = self.transition(current, next);
        }
        &self.state
    }

    /// Walk to a terminal state.
    pub fn finish(mut self) -> PathOutcome {
        loop {
            if let Some(outcome) = self.state.outcome() {
                return outcome;
            }
            self.step();
        }
    }

    fn transition(&self, current: PageId, next: usize) -> WalkState {
        let provider = self.service.provider();

        let Some(segment) = self.segments.get(next) else {
            return self.resolve_file(current);
        };

        let Some(child) = provider.child_by_dirname(current, segment) else {
            log::debug!(
                "No page '{segment}' under {}",
                provider.page_label(current)
            );
            return WalkState::NotFound(Missing::Page {
                parent: current,
                segment: segment.clone(),
            });
        };

        if !self.service.is_accessible_by(child, self.identity) {
            log::debug!(
                "Access to {} denied for {}",
                provider.page_label(child),
                self.identity
            );
            return WalkState::Forbidden { page: child };
        }

        WalkState::Walking {
            current: child,
            next: next + 1,
        }
    }

    fn resolve_file(&self, page: PageId) -> WalkState {
        let Some(filename) = &self.filename else {
            return WalkState::NotFound(Missing::NoFilename);
        };
        match self.service.provider().file(page, filename) {
            Some(file) => WalkState::Resolved(file),
            None => WalkState::NotFound(Missing::File {
                page,
                filename: filename.clone(),
            }),
        }
    }
}

impl<P: ContentProvider + ?Sized> Iterator for PathWalk<'_, '_, P> {
    type Item = WalkState;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let state = self.step().clone();
        self.finished = state.is_terminal();
        Some(state)
    }
}

/// Gate for content paths.
pub struct PathGate<'s, 'a, P: ContentProvider + ?Sized> {
    service: &'s NodeAccessService<'a, P>,
}

impl<'s, 'a, P: ContentProvider + ?Sized> PathGate<'s, 'a, P> {
    /// Gate backed by `service`.
    pub fn new(service: &'s NodeAccessService<'a, P>) -> Self {
        Self { service }
    }

    /// Start a step-by-step walk of `path` for `identity`.
    pub fn walk<'g>(&'g self, path: &str, identity: &'g Identity) -> PathWalk<'g, 'a, P> {
        PathWalk::new(self.service, path, identity)
    }

    /// Resolve `path` for `identity`.
    pub fn resolve_path(&self, path: &str, identity: &Identity) -> PathOutcome {
        let outcome = self.walk(path, identity).finish();
        log::debug!("Path '{path}' for {identity}: {outcome:?}");
        outcome
    }

    /// Resolve `path` for the requester of `ctx`.
    pub fn resolve_path_current(&self, path: &str, ctx: &RequestContext) -> PathOutcome {
        self.resolve_path(path, ctx.identity())
    }
}

/// Split a path into page segments and the trailing file name.
///
/// Leading and repeated slashes are ignored. A path ending in `/` (or empty)
/// has no file name.
fn split_path(path: &str) -> (Vec<String>, Option<String>) {
    let path = path.trim().trim_start_matches('/');
    let (dirs, filename) = match path.rsplit_once('/') {
        Some((dirs, filename)) => (dirs, filename),
        None => ("", path),
    };
    let segments = dirs
        .split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    let filename = (!filename.is_empty()).then(|| filename.to_string());
    (segments, filename)
}

// ============================================================================
// Tests
// ============================================================================
