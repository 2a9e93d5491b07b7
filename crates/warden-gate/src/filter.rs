//! Splitting collections of pages or files by accessibility.
//!
//! Both halves keep the input order, and every input node lands in exactly
//! one of them.

use warden_content::{ContentProvider, PageId};
use warden_core::Identity;

use crate::context::RequestContext;
use crate::service::{Node, NodeAccessService};

/// Order-preserving accessibility filters over node collections.
pub struct CollectionFilter<'s, 'a, P: ContentProvider + ?Sized> {
    service: &'s NodeAccessService<'a, P>,
}

impl<P: ContentProvider + ?Sized> Clone for CollectionFilter<'_, '_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: ContentProvider + ?Sized> Copy for CollectionFilter<'_, '_, P> {}

/// Children of a page split by accessibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Children the requester may access
    pub accessible: Vec<PageId>,
    /// Children the requester may not access
    pub inaccessible: Vec<PageId>,
}

impl<'s, 'a, P: ContentProvider + ?Sized> CollectionFilter<'s, 'a, P> {
    /// Filters backed by `service`.
    pub fn new(service: &'s NodeAccessService<'a, P>) -> Self {
        Self { service }
    }

    /// The nodes `identity` may access, in input order.
    pub fn accessible_by<N, I>(&self, nodes: I, identity: &Identity) -> Vec<N>
    where
        I: IntoIterator<Item = N>,
        N: Copy + Into<Node>,
    {
        nodes
            .into_iter()
            .filter(|n| self.service.is_accessible_by(*n, identity))
            .collect()
    }

    /// The nodes `identity` may not access, in input order.
    pub fn inaccessible_by<N, I>(&self, nodes: I, identity: &Identity) -> Vec<N>
    where
        I: IntoIterator<Item = N>,
        N: Copy + Into<Node>,
    {
        nodes
            .into_iter()
            .filter(|n| !self.service.is_accessible_by(*n, identity))
            .collect()
    }

    /// Both halves in one pass: `(accessible, inaccessible)`.
    pub fn partition<N, I>(&self, nodes: I, identity: &Identity) -> (Vec<N>, Vec<N>)
    where
        I: IntoIterator<Item = N>,
        N: Copy + Into<Node>,
    {
        nodes
            .into_iter()
            .partition(|n| self.service.is_accessible_by(*n, identity))
    }

    /// [`Self::accessible_by`] for the requester of `ctx`.
    pub fn accessible<N, I>(&self, nodes: I, ctx: &RequestContext) -> Vec<N>
    where
        I: IntoIterator<Item = N>,
        N: Copy + Into<Node>,
    {
        self.accessible_by(nodes, ctx.identity())
    }

    /// [`Self::inaccessible_by`] for the requester of `ctx`.
    pub fn inaccessible<N, I>(&self, nodes: I, ctx: &RequestContext) -> Vec<N>
    where
        I: IntoIterator<Item = N>,
        N: Copy + Into<Node>,
    {
        self.inaccessible_by(nodes, ctx.identity())
    }

    /// The children of `page`, split by accessibility.
    pub fn children_of(&self, page: PageId, identity: &Identity) -> Listing {
        let children = self.service.provider().children(page);
        let (accessible, inaccessible) = self.partition(children, identity);
        Listing {
            accessible,
            inaccessible,
        }
    }
}
