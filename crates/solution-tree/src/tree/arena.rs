//! In-memory hierarchy with nested sub-hierarchies and hidden nodes

use hierarchy::{HierarchyProvider, ItemId, NestedHierarchy, ProviderError};

use crate::tree::{Node, NodeKind};

/// Links and flags for one arena node
#[derive(Debug, Clone, Default)]
pub struct ArenaLinks {
    parent: Option<ItemId>,
    children: Vec<ItemId>,
    /// Position within the parent's children
    position: usize,
    /// Index into the owning arena's nested hierarchies
    nested: Option<usize>,
    failing: bool,
}

/// A hierarchy held entirely in memory
///
/// Nodes are stored in an arena indexed by [`ItemId`]; the root always has id
/// 0. Any node can delegate its subtree to another `ArenaHierarchy`, which is
/// how embedded projects are modelled.
///
/// The builder methods take ids handed out by this arena and panic when
/// given one that is not.
///
/// # Example
///
/// ```
/// use solution_tree::tree::ArenaHierarchy;
///
/// let mut solution = ArenaHierarchy::new("Root", "");
/// let docs = solution.add_container(solution.root(), "Docs", "proj/docs");
/// solution.add_item(docs, "b.txt", "proj/b.txt");
/// assert_eq!(solution.node_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ArenaHierarchy {
    nodes: Vec<Node<ArenaLinks>>,
    nested: Vec<ArenaHierarchy>,
}

impl ArenaHierarchy {
    /// Create a hierarchy containing only its root
    pub fn new(name: impl Into<String>, canonical_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::container(name, canonical_name, ArenaLinks::default())],
            nested: Vec::new(),
        }
    }

    /// The root node (always id 0)
    pub fn root(&self) -> ItemId {
        ItemId::new(0)
    }

    /// Add a container under `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this arena.
    pub fn add_container(
        &mut self,
        parent: ItemId,
        name: impl Into<String>,
        canonical_name: impl Into<String>,
    ) -> ItemId {
        self.add(parent, Node::container(name, canonical_name, ArenaLinks::default()))
    }

    /// Add an item under `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this arena.
    pub fn add_item(
        &mut self,
        parent: ItemId,
        name: impl Into<String>,
        canonical_name: impl Into<String>,
    ) -> ItemId {
        self.add(parent, Node::item(name, canonical_name, ArenaLinks::default()))
    }

    fn add(&mut self, parent: ItemId, mut node: Node<ArenaLinks>) -> ItemId {
        let id = ItemId::new(self.nodes.len() as u32);
        let siblings = &mut self.entry_mut(parent).data.children;
        node.data.parent = Some(parent);
        node.data.position = siblings.len();
        siblings.push(id);
        self.nodes.push(node);
        id
    }

    /// Hide or show a node in visible-only enumeration
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a node of this arena.
    pub fn set_hidden(&mut self, node: ItemId, hidden: bool) {
        self.entry_mut(node).hidden = hidden;
    }

    /// Hand the subtree of `node` over to `nested`
    ///
    /// Searches entering `node` continue at the root of `nested`; `node`'s own
    /// names and children are no longer consulted. Delegating a node again
    /// replaces its earlier nested hierarchy.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a node of this arena.
    pub fn delegate(&mut self, node: ItemId, nested: ArenaHierarchy) {
        let existing = self.entry_mut(node).data.nested;
        match existing {
            Some(index) => self.nested[index] = nested,
            None => {
                self.nodes[node.index()].data.nested = Some(self.nested.len());
                self.nested.push(nested);
            }
        }
    }

    /// Make every query about `node` fail
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a node of this arena.
    pub fn fail_on(&mut self, node: ItemId) {
        self.entry_mut(node).data.failing = true;
    }

    fn entry_mut(&mut self, node: ItemId) -> &mut Node<ArenaLinks> {
        let count = self.nodes.len();
        match self.nodes.get_mut(node.index()) {
            Some(entry) => entry,
            None => panic!("{} is not in this arena of {} nodes", node, count),
        }
    }

    /// Get a node by its ID
    pub fn get(&self, id: ItemId) -> Option<&Node<ArenaLinks>> {
        self.nodes.get(id.index())
    }

    /// Parent of a node, `None` for the root
    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.get(id)?.data.parent
    }

    /// Children of a node in insertion order, including hidden ones
    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.get(id)
            .map(|n| n.data.children.as_slice())
            .unwrap_or(&[])
    }

    /// The hierarchy `node` delegates to, if any
    pub fn nested(&self, node: ItemId) -> Option<&ArenaHierarchy> {
        let index = self.get(node)?.data.nested?;
        self.nested.get(index)
    }

    /// Count nodes in this arena, not counting nested hierarchies
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Count the hierarchies this arena delegates to
    pub fn nested_count(&self) -> usize {
        self.nested.len()
    }

    fn lookup(&self, id: ItemId, query: &'static str) -> Result<&Node<ArenaLinks>, ProviderError> {
        let node = self.get(id).ok_or(ProviderError::UnknownNode(id))?;
        if node.data.failing {
            return Err(ProviderError::query(id, query, "node is unavailable"));
        }
        Ok(node)
    }

    fn first_from(&self, siblings: &[ItemId], visible_only: bool) -> Option<ItemId> {
        siblings
            .iter()
            .copied()
            .find(|&id| !visible_only || self.nodes[id.index()].is_visible())
    }
}

impl HierarchyProvider for ArenaHierarchy {
    fn root_node(&self) -> ItemId {
        self.root()
    }

    fn try_resolve_nested(
        &self,
        node: ItemId,
    ) -> Result<Option<NestedHierarchy<'_>>, ProviderError> {
        self.lookup(node, "try_resolve_nested")?;
        Ok(self
            .nested(node)
            .map(|nested| NestedHierarchy::borrowed(nested, nested.root())))
    }

    fn canonical_name(&self, node: ItemId) -> Result<String, ProviderError> {
        Ok(self.lookup(node, "canonical_name")?.canonical_name.clone())
    }

    fn display_name(&self, node: ItemId) -> Result<String, ProviderError> {
        Ok(self.lookup(node, "display_name")?.name.clone())
    }

    fn first_child(
        &self,
        node: ItemId,
        visible_only: bool,
    ) -> Result<Option<ItemId>, ProviderError> {
        let entry = self.lookup(node, "first_child")?;
        if entry.kind == NodeKind::Item {
            return Ok(None);
        }
        Ok(self.first_from(&entry.data.children, visible_only))
    }

    fn next_sibling(
        &self,
        node: ItemId,
        visible_only: bool,
    ) -> Result<Option<ItemId>, ProviderError> {
        let entry = self.lookup(node, "next_sibling")?;
        let Some(parent) = entry.data.parent else {
            return Ok(None);
        };
        let later = self
            .children(parent)
            .get(entry.data.position + 1..)
            .unwrap_or(&[]);
        Ok(self.first_from(later, visible_only))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ArenaHierarchy, ItemId, ItemId, ItemId) {
        let mut tree = ArenaHierarchy::new("Root", "");
        let a = tree.add_item(tree.root(), "a", "a");
        let b = tree.add_item(tree.root(), "b", "b");
        let c = tree.add_item(tree.root(), "c", "c");
        (tree, a, b, c)
    }

    #[test]
    fn test_structure() {
        let (tree, a, b, c) = sample();
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.children(tree.root()), &[a, b, c]);
        assert_eq!(tree.parent(b), Some(tree.root()));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_enumeration_skips_hidden_when_visible_only() {
        let (mut tree, a, b, c) = sample();
        tree.set_hidden(b, true);

        let root = tree.root();
        assert_eq!(tree.first_child(root, true).unwrap(), Some(a));
        assert_eq!(tree.next_sibling(a, true).unwrap(), Some(c));
        assert_eq!(tree.next_sibling(a, false).unwrap(), Some(b));
        assert_eq!(tree.next_sibling(c, false).unwrap(), None);

        tree.set_hidden(a, true);
        assert_eq!(tree.first_child(root, true).unwrap(), Some(c));
    }

    #[test]
    fn test_items_have_no_children() {
        let (tree, a, _, _) = sample();
        assert_eq!(tree.first_child(a, false).unwrap(), None);
    }

    #[test]
    fn test_delegation_resolves_nested_root() {
        let (mut tree, _, b, _) = sample();
        let mut nested = ArenaHierarchy::new("Inner", "inner");
        nested.add_item(nested.root(), "x", "x");
        tree.delegate(b, nested);

        let resolved = tree.try_resolve_nested(b).unwrap().unwrap();
        assert_eq!(resolved.root, ItemId::new(0));
        assert_eq!(resolved.provider.display_name(resolved.root).unwrap(), "Inner");
        assert!(tree.try_resolve_nested(tree.root()).unwrap().is_none());
    }

    #[test]
    fn test_failing_and_unknown_nodes() {
        let (mut tree, a, _, _) = sample();
        tree.fail_on(a);
        assert!(matches!(
            tree.display_name(a),
            Err(ProviderError::Query { query: "display_name", .. })
        ));
        assert!(matches!(
            tree.canonical_name(ItemId::new(99)),
            Err(ProviderError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_wide_level_enumerates_in_order() {
        let mut tree = ArenaHierarchy::new("Root", "");
        let added: Vec<ItemId> = (0..2_000)
            .map(|i| {
                let id = tree.add_item(tree.root(), format!("f{}", i), format!("f{}", i));
                tree.set_hidden(id, i % 3 == 1);
                id
            })
            .collect();

        let mut visible = Vec::new();
        let mut current = tree.first_child(tree.root(), true).unwrap();
        while let Some(id) = current {
            visible.push(id);
            current = tree.next_sibling(id, true).unwrap();
        }

        let expected: Vec<ItemId> = added
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 3 != 1)
            .map(|(_, &id)| id)
            .collect();
        assert_eq!(visible, expected);
        assert_eq!(tree.next_sibling(added[1_999], false).unwrap(), None);
    }

    #[test]
    fn test_delegating_twice_replaces_nested() {
        let (mut tree, a, _, _) = sample();
        tree.delegate(a, ArenaHierarchy::new("First", "first"));
        tree.delegate(a, ArenaHierarchy::new("Second", "second"));

        assert_eq!(tree.nested_count(), 1);
        let nested = tree.nested(a).unwrap();
        assert_eq!(nested.display_name(nested.root()).unwrap(), "Second");
    }

    #[test]
    #[should_panic(expected = "is not in this arena")]
    fn test_add_under_unknown_parent_panics() {
        let (mut tree, _, _, _) = sample();
        tree.add_item(ItemId::new(99), "x", "x");
    }

    #[test]
    fn test_delegating_unknown_node_leaves_arena_untouched() {
        let (mut tree, _, _, _) = sample();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            tree.delegate(ItemId::new(99), ArenaHierarchy::new("Inner", "inner"));
        }));

        assert!(outcome.is_err());
        assert_eq!(tree.nested_count(), 0);
        assert_eq!(tree.node_count(), 4);
    }
}
