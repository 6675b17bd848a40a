//! Solution Tree Library
//!
//! Concrete hierarchies to search with the `hierarchy` crate, and an
//! explorer-style widget to replay search results into.
//!
//! # Core Concepts
//!
//! - **ArenaHierarchy**: in-memory tree, nodes may delegate to nested arenas
//! - **FilesystemHierarchy**: lazily loaded directory tree where project
//!   directories become nested hierarchies
//! - **ExplorerTree**: expandable, selectable widget, optionally mirrored
//!   from any provider
//!
//! # Example
//!
//! ```no_run
//! use hierarchy::prelude::*;
//! use solution_tree::prelude::*;
//!
//! let tree = FilesystemHierarchy::new("./src").expect("Failed to open directory");
//! let mut widget = ExplorerTree::mirror(&tree, false).expect("Failed to mirror tree");
//! let root = widget.root();
//!
//! let searcher = HierarchySearcher::new(TraversalPolicy::default());
//! let path = find_and_select(&searcher, &tree, &mut widget, root, "./src/lib.rs")
//!     .expect("Search failed");
//! println!("{}", path.join(" -> "));
//! ```

pub mod tree;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::tree::prelude::*;
}
