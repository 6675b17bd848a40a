//! Concrete hierarchies and the explorer widget
//!
//! Every tree here is arena-backed and keyed by index. The hierarchies
//! implement [`hierarchy::HierarchyProvider`]; the widget implements
//! [`hierarchy::WidgetTree`].

mod arena;
pub mod filesystem;
mod node;
mod widget;

pub use arena::{ArenaHierarchy, ArenaLinks};
pub use filesystem::{FilesystemHierarchy, FsEntry, DEFAULT_PROJECT_MARKER};
pub use node::{Node, NodeKind};
pub use widget::{ExplorerTree, WidgetNode, WidgetState};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{ArenaHierarchy, ExplorerTree, FilesystemHierarchy, Node, NodeKind, WidgetNode};
}
