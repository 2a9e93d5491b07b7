//! Gating direct page requests.
//!
//! A page request names a page by its id (`blog/post-1`). The gate finds the
//! page, falling back to the home page for `/` and to the error page when
//! nothing matches, then checks the page and every ancestor top-down. A page
//! below a denied ancestor is therefore never served directly, matching what
//! a path walk would decide.

use warden_content::{ContentProvider, PageId};
use warden_core::Identity;

use crate::context::RequestContext;
use crate::service::NodeAccessService;

/// Result of gating a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Serve this page.
    Resolved(PageId),
    /// The requested page does not exist; serve the configured error page.
    ErrorPage(PageId),
    /// Access denied and no redirect configured.
    Forbidden {
        /// Page whose rule denied access
        page: PageId,
    },
    /// Access denied; send the requester here instead.
    RedirectTo(String),
    /// Neither the requested page nor the error page exists.
    NotFound,
}

/// Gate for page requests.
pub struct PageGate<'s, 'a, P: ContentProvider + ?Sized> {
    service: &'s NodeAccessService<'a, P>,
}

impl<'s, 'a, P: ContentProvider + ?Sized> PageGate<'s, 'a, P> {
    /// Gate backed by `service`.
    pub fn new(service: &'s NodeAccessService<'a, P>) -> Self {
        Self { service }
    }

    /// Resolve a page request for `identity`.
    pub fn resolve_page(&self, uid: &str, identity: &Identity) -> PageOutcome {
        let provider = self.service.provider();
        let config = self.service.config();

        let uid = uid.trim().trim_matches('/');
        let requested = if uid.is_empty() {
            provider.page_by_id(&config.home_page)
        } else {
            provider.page_by_id(uid)
        };

        let (page, found) = match requested {
            Some(page) => (page, true),
            None => match provider.page_by_id(&config.error_page) {
                Some(error_page) => {
                    log::debug!("No page '{uid}', serving error page");
                    (error_page, false)
                }
                None => {
                    log::debug!("No page '{uid}' and no error page");
                    return PageOutcome::NotFound;
                }
            },
        };

        if let Some(denied) = provider
            .lineage(page)
            .into_iter()
            .find(|p| !self.service.is_accessible_by(*p, identity))
        {
            log::debug!(
                "Page '{}' denied for {identity} at {}",
                provider.page_label(page),
                provider.page_label(denied)
            );
            return match &config.redirect {
                Some(target) => PageOutcome::RedirectTo(target.clone()),
                None => PageOutcome::Forbidden { page: denied },
            };
        }

        if found {
            PageOutcome::Resolved(page)
        } else {
            PageOutcome::ErrorPage(page)
        }
    }

    /// Resolve a page request for the requester of `ctx`.
    pub fn resolve_page_current(&self, uid: &str, ctx: &RequestContext) -> PageOutcome {
        self.resolve_page(uid, ctx.identity())
    }
}
