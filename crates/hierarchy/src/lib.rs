//! Hierarchy search and path replay
//!
//! Locates a single item inside a lazily materialized, possibly multi-provider
//! tree and replays the resulting root-to-item path against an interactive
//! tree widget so the item becomes visible and selected.
//!
//! # Core Concepts
//!
//! - **HierarchyProvider**: capability set used to walk a tree; nodes may
//!   delegate their whole subtree to another provider (nested hierarchy)
//! - **HierarchySearcher**: depth-first, early-exit search producing a
//!   [`SearchPath`] of [`NodeIdentity`] values
//! - **WidgetTree**: capability set used to expand and select nodes in a UI tree
//! - **replay_and_select**: walks a [`SearchPath`] through a [`WidgetTree`]
//!
//! # Example
//!
//! ```ignore
//! let searcher = HierarchySearcher::new(TraversalPolicy::default());
//! if let Some(path) = searcher.search(&provider, "proj/b.txt")? {
//!     let root = widget.root();
//!     replay_and_select(&mut widget, root, &path);
//! }
//! ```

mod cancel;
mod error;
mod identity;
mod policy;
mod provider;
mod replay;
mod search;

pub use cancel::{CancellationHandle, CancellationToken};
pub use error::{ProviderError, SearchError};
pub use identity::{NodeIdentity, SearchPath};
pub use policy::{MatchRule, SearchTarget, TraversalPolicy};
pub use provider::{HierarchyProvider, ItemId, NestedHierarchy, ProviderHandle};
pub use replay::{replay_and_select, select_root, WidgetTree};
pub use search::{find_and_select, EnumeratedItem, HierarchySearcher, SearchOutcome};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        find_and_select, replay_and_select, HierarchyProvider, HierarchySearcher, ItemId,
        MatchRule, NodeIdentity, SearchError, SearchPath, SearchTarget, TraversalPolicy,
        WidgetTree,
    };
}
