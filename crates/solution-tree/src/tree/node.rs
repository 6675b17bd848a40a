//! Arena node record shared by the concrete trees

use derive_more::Display;
use std::fmt;

/// The type/kind of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    /// A container node - can have children (e.g., project, folder)
    #[display(fmt = "Container")]
    Container,
    /// An item node - cannot have children (e.g., file)
    #[display(fmt = "Item")]
    Item,
}

impl NodeKind {
    /// Returns true if this is a container node
    pub const fn is_container(self) -> bool {
        matches!(self, NodeKind::Container)
    }

    /// Returns true if this is an item node
    pub const fn is_item(self) -> bool {
        matches!(self, NodeKind::Item)
    }
}

/// A single node stored in an arena
///
/// Generic over the data type `D`, which carries whatever bookkeeping the
/// owning tree needs (links, load state, widget state).
#[derive(Debug, Clone)]
pub struct Node<D> {
    /// Label shown to the user
    pub name: String,
    /// Unique name used for matching; empty when the node has none
    pub canonical_name: String,
    /// Whether this is a container or an item
    pub kind: NodeKind,
    /// Hidden nodes are skipped by visible-only enumeration
    pub hidden: bool,
    /// Tree-specific data associated with this node
    pub data: D,
}

impl<D> Node<D> {
    /// Create a new node
    pub fn new(
        name: impl Into<String>,
        canonical_name: impl Into<String>,
        kind: NodeKind,
        data: D,
    ) -> Self {
        Self {
            name: name.into(),
            canonical_name: canonical_name.into(),
            kind,
            hidden: false,
            data,
        }
    }

    /// Create a new container node
    pub fn container(name: impl Into<String>, canonical_name: impl Into<String>, data: D) -> Self {
        Self::new(name, canonical_name, NodeKind::Container, data)
    }

    /// Create a new item node
    pub fn item(name: impl Into<String>, canonical_name: impl Into<String>, data: D) -> Self {
        Self::new(name, canonical_name, NodeKind::Item, data)
    }

    /// Returns true if this is a container node
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Returns true if this node shows up in visible-only enumeration
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }
}

impl<D> fmt::Display for Node<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - {}", self.name, self.canonical_name, self.kind)
    }
}
