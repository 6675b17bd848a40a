//! In-memory explorer widget with expansion and single selection

use derive_more::{Display, From};
use hierarchy::{HierarchyProvider, ItemId, ProviderError, WidgetTree};
use std::fmt;

use crate::tree::{Node, NodeKind};

/// Handle to a node in an [`ExplorerTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display(fmt = "WidgetNode({})", _0)]
pub struct WidgetNode(usize);

impl WidgetNode {
    /// Get the raw index
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Per-node widget state
#[derive(Debug, Clone, Default)]
pub struct WidgetState {
    parent: Option<WidgetNode>,
    children: Vec<WidgetNode>,
    expanded: bool,
}

/// A tree widget the way an explorer pane shows it
///
/// The root is an invisible container; the first visible level is its
/// children. At most one node is selected at a time.
#[derive(Debug, Clone)]
pub struct ExplorerTree {
    nodes: Vec<Node<WidgetState>>,
    selected: Option<WidgetNode>,
}

impl Default for ExplorerTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerTree {
    /// Create an empty widget holding only the invisible root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::container("", "", WidgetState::default())],
            selected: None,
        }
    }

    /// Build a widget showing the same structure as `provider`
    ///
    /// Nested hierarchies are flattened: a delegating node is shown as the
    /// root of the hierarchy it delegates to, so labels line up with the
    /// paths a search produces.
    pub fn mirror(
        provider: &dyn HierarchyProvider,
        visible_only: bool,
    ) -> Result<Self, ProviderError> {
        let mut tree = Self::new();
        let root = tree.root();
        tree.mirror_node(provider, provider.root_node(), root, visible_only)?;
        Ok(tree)
    }

    fn mirror_node(
        &mut self,
        provider: &dyn HierarchyProvider,
        node: ItemId,
        parent: WidgetNode,
        visible_only: bool,
    ) -> Result<(), ProviderError> {
        if let Some(nested) = provider.try_resolve_nested(node)? {
            return self.mirror_node(&*nested.provider, nested.root, parent, visible_only);
        }

        let label = provider.display_name(node)?;
        let canonical = provider.canonical_name(node)?;
        let first = provider.first_child(node, visible_only)?;
        let kind = if first.is_some() {
            NodeKind::Container
        } else {
            NodeKind::Item
        };
        let id = self.push(parent, Node::new(label, canonical, kind, WidgetState::default()));

        let mut child = first;
        while let Some(current) = child {
            self.mirror_node(provider, current, id, visible_only)?;
            child = provider.next_sibling(current, visible_only)?;
        }
        Ok(())
    }

    /// The invisible root
    pub fn root(&self) -> WidgetNode {
        WidgetNode(0)
    }

    /// Add a labelled node under `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this widget.
    pub fn add(&mut self, parent: WidgetNode, label: impl Into<String>) -> WidgetNode {
        self.entry_mut(parent).kind = NodeKind::Container;
        self.push(parent, Node::item(label, "", WidgetState::default()))
    }

    fn push(&mut self, parent: WidgetNode, mut node: Node<WidgetState>) -> WidgetNode {
        let id = WidgetNode(self.nodes.len());
        self.entry_mut(parent).data.children.push(id);
        node.data.parent = Some(parent);
        self.nodes.push(node);
        id
    }

    fn entry_mut(&mut self, node: WidgetNode) -> &mut Node<WidgetState> {
        let count = self.nodes.len();
        match self.nodes.get_mut(node.index()) {
            Some(entry) => entry,
            None => panic!("{} is not in this widget of {} nodes", node, count),
        }
    }

    /// Get the label of a node
    pub fn label(&self, node: WidgetNode) -> Option<&str> {
        self.nodes.get(node.index()).map(|n| n.name.as_str())
    }

    /// Get the canonical name a mirrored node was built from
    pub fn canonical_name(&self, node: WidgetNode) -> Option<&str> {
        self.nodes.get(node.index()).map(|n| n.canonical_name.as_str())
    }

    /// Follow labels from the root, taking the first match at each level
    pub fn find_path(&self, labels: &[&str]) -> Option<WidgetNode> {
        labels.iter().try_fold(self.root(), |current, label| {
            self.nodes[current.index()]
                .data
                .children
                .iter()
                .copied()
                .find(|child| self.nodes[child.index()].name == *label)
        })
    }

    /// Check whether a node is expanded
    pub fn is_expanded(&self, node: WidgetNode) -> bool {
        self.nodes
            .get(node.index())
            .map(|n| n.data.expanded)
            .unwrap_or(false)
    }

    /// The selected node, if any
    pub fn selected(&self) -> Option<WidgetNode> {
        self.selected
    }

    /// Labels from the first visible level down to the selected node
    pub fn selected_path(&self) -> Vec<String> {
        let mut labels = Vec::new();
        let mut current = self.selected;
        while let Some(node) = current {
            if node == self.root() {
                break;
            }
            let entry = &self.nodes[node.index()];
            labels.push(entry.name.clone());
            current = entry.data.parent;
        }
        labels.reverse();
        labels
    }

    /// Count nodes, including the invisible root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Render the visible part of the tree, one node per line
    ///
    /// Collapsed containers show as `>`, expanded ones as `v`, items as `-`.
    /// The selected node is marked with `*`.
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn render_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: WidgetNode,
        depth: usize,
    ) -> fmt::Result {
        let entry = &self.nodes[node.index()];
        let marker = match (entry.kind, entry.data.expanded) {
            (NodeKind::Item, _) => '-',
            (NodeKind::Container, true) => 'v',
            (NodeKind::Container, false) => '>',
        };
        let selected = if self.selected == Some(node) { " *" } else { "" };
        writeln!(f, "{}{} {}{}", "  ".repeat(depth), marker, entry.name, selected)?;

        if entry.data.expanded {
            for &child in &entry.data.children {
                self.render_node(f, child, depth + 1)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ExplorerTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &child in &self.nodes[0].data.children {
            self.render_node(f, child, 0)?;
        }
        Ok(())
    }
}

impl WidgetTree for ExplorerTree {
    type Node = WidgetNode;

    fn children(&self, node: WidgetNode) -> Vec<(WidgetNode, String)> {
        self.nodes
            .get(node.index())
            .map(|n| {
                n.data
                    .children
                    .iter()
                    .map(|&id| (id, self.nodes[id.index()].name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_expanded(&mut self, node: WidgetNode, expanded: bool) {
        if let Some(entry) = self.nodes.get_mut(node.index()) {
            entry.data.expanded = expanded;
        }
    }

    fn select(&mut self, node: WidgetNode) {
        if node.index() < self.nodes.len() {
            self.selected = Some(node);
        }
    }
}
