//! Capability set used by the search engine to walk a hierarchy

use derive_more::{Display, From};
use std::ops::Deref;

use crate::error::ProviderError;

/// Opaque reference to a node inside one provider
///
/// Only meaningful to the provider that issued it. Ids from a nested
/// hierarchy must be queried against that nested provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display(fmt = "ItemId({})", _0)]
pub struct ItemId(u32);

impl ItemId {
    /// Create a new ItemId from a raw value
    pub const fn new(id: u32) -> Self {
        ItemId(id)
    }

    /// Get the inner value
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Use the id as an arena index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A hierarchy whose nodes can be enumerated and named
///
/// All enumeration methods report "no more" as `Ok(None)`. Any `Err` is a
/// real failure and aborts the search that issued the query.
///
/// Queries are not reentrant: a provider serves one search at a time.
pub trait HierarchyProvider {
    /// The absolute traversal root
    fn root_node(&self) -> ItemId;

    /// Resolve a node that hands its entire subtree to another provider
    ///
    /// Returns `Ok(None)` when the node is an ordinary node of this provider.
    fn try_resolve_nested(
        &self,
        node: ItemId,
    ) -> Result<Option<NestedHierarchy<'_>>, ProviderError>;

    /// Provider-assigned unique identifier, possibly empty
    fn canonical_name(&self, node: ItemId) -> Result<String, ProviderError>;

    /// Human-readable label
    fn display_name(&self, node: ItemId) -> Result<String, ProviderError>;

    /// First child of `node`, restricted to visible children when `visible_only`
    fn first_child(&self, node: ItemId, visible_only: bool)
        -> Result<Option<ItemId>, ProviderError>;

    /// Next sibling of `node` under the same enumeration mode
    fn next_sibling(
        &self,
        node: ItemId,
        visible_only: bool,
    ) -> Result<Option<ItemId>, ProviderError>;
}

/// A provider reached through delegation, either borrowed from its parent or
/// produced on demand
pub enum ProviderHandle<'a> {
    Borrowed(&'a dyn HierarchyProvider),
    Owned(Box<dyn HierarchyProvider + 'a>),
}

impl<'a> Deref for ProviderHandle<'a> {
    type Target = dyn HierarchyProvider + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            ProviderHandle::Borrowed(provider) => *provider,
            ProviderHandle::Owned(provider) => provider.as_ref(),
        }
    }
}

/// Result of resolving a delegating node: the nested provider and the node in
/// it that stands in for the delegating node
///
/// The searcher holds this only for the duration of the recursive call into
/// the nested hierarchy; dropping it releases the nested provider.
pub struct NestedHierarchy<'a> {
    pub provider: ProviderHandle<'a>,
    pub root: ItemId,
}

impl<'a> NestedHierarchy<'a> {
    /// Delegate to a provider owned by the parent
    pub fn borrowed(provider: &'a dyn HierarchyProvider, root: ItemId) -> Self {
        Self {
            provider: ProviderHandle::Borrowed(provider),
            root,
        }
    }

    /// Delegate to a provider created for this resolution
    pub fn owned(provider: Box<dyn HierarchyProvider + 'a>, root: ItemId) -> Self {
        Self {
            provider: ProviderHandle::Owned(provider),
            root,
        }
    }
}

impl std::fmt::Debug for NestedHierarchy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.provider {
            ProviderHandle::Borrowed(_) => "borrowed",
            ProviderHandle::Owned(_) => "owned",
        };
        f.debug_struct("NestedHierarchy")
            .field("provider", &kind)
            .field("root", &self.root)
            .finish()
    }
}
