//! Node identities and the root-to-node path built during a search

use std::fmt;

/// The names captured for one concrete node visited during a search
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeIdentity {
    /// Unique name given to the node by its provider, used for matching.
    /// May be empty.
    pub canonical_name: String,
    /// Label shown in the UI, used to replay the path
    pub display_name: String,
}

impl NodeIdentity {
    /// Create a new identity
    pub fn new(canonical_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            display_name: display_name.into(),
        }
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.canonical_name)
    }
}

/// Ordered, root-first sequence of node identities
///
/// While a search runs, the path holds the identities of every ancestor of the
/// node being visited, inclusive. Callers only ever see a finished snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPath {
    nodes: Vec<NodeIdentity>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, identity: NodeIdentity) {
        self.nodes.push(identity);
    }

    pub(crate) fn pop(&mut self) -> Option<NodeIdentity> {
        self.nodes.pop()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeIdentity> {
        self.nodes.iter()
    }

    /// The matched node, for a path returned by a successful search
    pub fn last(&self) -> Option<&NodeIdentity> {
        self.nodes.last()
    }

    pub fn as_slice(&self) -> &[NodeIdentity] {
        &self.nodes
    }

    /// Display names in root-to-node order
    pub fn display_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.display_name.as_str()).collect()
    }

    /// Canonical names in root-to-node order
    pub fn canonical_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.canonical_name.as_str()).collect()
    }

    /// User-facing path strings, one per node
    pub fn to_strings(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.to_string()).collect()
    }
}

impl From<Vec<NodeIdentity>> for SearchPath {
    fn from(nodes: Vec<NodeIdentity>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<NodeIdentity> for SearchPath {
    fn from_iter<I: IntoIterator<Item = NodeIdentity>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SearchPath {
    type Item = &'a NodeIdentity;
    type IntoIter = std::slice::Iter<'a, NodeIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str("->")?;
            }
            f.write_str(&node.display_name)?;
        }
        Ok(())
    }
}
