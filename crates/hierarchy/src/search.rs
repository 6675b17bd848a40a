//! Depth-first hierarchy search
//!
//! The searcher walks a [`HierarchyProvider`] in pre-order, left to right,
//! following nested hierarchies transparently, and stops at the first node
//! accepted by its [`MatchRule`]. The path of ancestors is maintained as a
//! stack: an identity is pushed before its children are visited and popped
//! again when the subtree turns out not to contain the target.

use log::{debug, trace};

use crate::cancel::CancellationToken;
use crate::error::SearchError;
use crate::identity::{NodeIdentity, SearchPath};
use crate::policy::{MatchRule, SearchTarget, TraversalPolicy};
use crate::provider::{HierarchyProvider, ItemId};
use crate::replay::{replay_and_select, WidgetTree};

/// Result of [`HierarchySearcher::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Path from the root to the first matching node, inclusive
    Found(SearchPath),
    /// No reachable node matched
    NotFound,
    /// Every reachable concrete node, in visit order
    Enumerated(Vec<EnumeratedItem>),
}

impl SearchOutcome {
    /// The found path, if any
    pub fn into_path(self) -> Option<SearchPath> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }
}

/// One node reported by an enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratedItem {
    pub identity: NodeIdentity,
    /// Depth below the search root (root = 0)
    pub depth: usize,
    /// The node had no children under the enumeration mode used for it
    pub is_leaf: bool,
}

/// Searches hierarchies for a target node
#[derive(Debug, Clone, Default)]
pub struct HierarchySearcher {
    policy: TraversalPolicy,
    rule: MatchRule,
    cancellation: Option<CancellationToken>,
}

impl HierarchySearcher {
    /// Create a searcher using exact canonical-name matching
    pub fn new(policy: TraversalPolicy) -> Self {
        Self {
            policy,
            rule: MatchRule::default(),
            cancellation: None,
        }
    }

    /// Use a different match rule
    pub fn with_match_rule(mut self, rule: MatchRule) -> Self {
        self.rule = rule;
        self
    }

    /// Check `token` before every node visit
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn policy(&self) -> TraversalPolicy {
        self.policy
    }

    pub fn match_rule(&self) -> MatchRule {
        self.rule
    }

    /// Search from the provider's root node
    ///
    /// Returns `Ok(None)` when no node matches.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidArgument`] for an empty target, and
    /// propagates provider failures and cancellation.
    pub fn search(
        &self,
        provider: &dyn HierarchyProvider,
        target: &str,
    ) -> Result<Option<SearchPath>, SearchError> {
        self.search_from(provider, provider.root_node(), target)
    }

    /// Search from an explicit start node
    pub fn search_from(
        &self,
        provider: &dyn HierarchyProvider,
        root: ItemId,
        target: &str,
    ) -> Result<Option<SearchPath>, SearchError> {
        let outcome = self.run(provider, root, &SearchTarget::item(target))?;
        Ok(outcome.into_path())
    }

    /// Visit every reachable concrete node from the provider's root
    pub fn enumerate(
        &self,
        provider: &dyn HierarchyProvider,
    ) -> Result<Vec<EnumeratedItem>, SearchError> {
        match self.run(provider, provider.root_node(), &SearchTarget::EnumerateAll)? {
            SearchOutcome::Enumerated(items) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    /// Returns true if any reachable node has the given display name
    pub fn contains_display_name(
        &self,
        provider: &dyn HierarchyProvider,
        display_name: &str,
    ) -> Result<bool, SearchError> {
        if display_name.is_empty() {
            return Err(SearchError::InvalidArgument("display name cannot be empty"));
        }
        let searcher = self.clone().with_match_rule(MatchRule::DisplayName);
        Ok(searcher.search(provider, display_name)?.is_some())
    }

    /// General entry point for both search modes
    pub fn run(
        &self,
        provider: &dyn HierarchyProvider,
        root: ItemId,
        target: &SearchTarget,
    ) -> Result<SearchOutcome, SearchError> {
        match target {
            SearchTarget::Item(target) if target.is_empty() => Err(
                SearchError::InvalidArgument("target identifier cannot be empty"),
            ),
            SearchTarget::Item(target) => {
                let mut walk = Walk::new(self, Some(target.as_str()));
                let found = walk.visit(provider, root, 0, true)?;
                debug!(
                    "search for {:?} ({} match) from {}: {}",
                    target,
                    self.rule,
                    root,
                    if found { "found" } else { "not found" }
                );
                if found {
                    Ok(SearchOutcome::Found(walk.path))
                } else {
                    Ok(SearchOutcome::NotFound)
                }
            }
            SearchTarget::EnumerateAll => {
                let mut walk = Walk::new(self, None);
                walk.visit(provider, root, 0, true)?;
                debug!("enumerated {} nodes from {}", walk.visited.len(), root);
                Ok(SearchOutcome::Enumerated(walk.visited))
            }
        }
    }
}

/// State of one search call
struct Walk<'a> {
    searcher: &'a HierarchySearcher,
    /// `None` enumerates everything
    target: Option<&'a str>,
    path: SearchPath,
    visited: Vec<EnumeratedItem>,
}

impl<'a> Walk<'a> {
    fn new(searcher: &'a HierarchySearcher, target: Option<&'a str>) -> Self {
        Self {
            searcher,
            target,
            path: SearchPath::new(),
            visited: Vec::new(),
        }
    }

    fn check_cancelled(&self) -> Result<(), SearchError> {
        match &self.searcher.cancellation {
            Some(token) if token.is_cancelled() => Err(SearchError::Cancelled),
            _ => Ok(()),
        }
    }

    fn visit(
        &mut self,
        provider: &dyn HierarchyProvider,
        node: ItemId,
        level: usize,
        is_solution_root: bool,
    ) -> Result<bool, SearchError> {
        self.check_cancelled()?;

        if let Some(nested) = provider.try_resolve_nested(node)? {
            trace!("{} delegates to nested hierarchy at {}", node, nested.root);
            // The nested handle lives exactly as long as this call.
            return self.visit(&*nested.provider, nested.root, level, false);
        }

        self.visit_concrete(provider, node, level, is_solution_root)
    }

    fn visit_concrete(
        &mut self,
        provider: &dyn HierarchyProvider,
        node: ItemId,
        level: usize,
        is_solution_root: bool,
    ) -> Result<bool, SearchError> {
        let identity = NodeIdentity {
            canonical_name: provider.canonical_name(node)?,
            display_name: provider.display_name(node)?,
        };
        trace!("walking hierarchy node: {}", identity);

        let matched = self
            .target
            .map(|target| self.searcher.rule.matches(target, &identity))
            .unwrap_or(false);

        let slot = self.target.is_none().then(|| {
            self.visited.push(EnumeratedItem {
                identity: identity.clone(),
                depth: self.path.len(),
                is_leaf: true,
            });
            self.visited.len() - 1
        });

        self.path.push(identity);
        if matched {
            return Ok(true);
        }

        let result = self.visit_children(provider, node, level + 1, is_solution_root, slot);
        if !matches!(result, Ok(true)) {
            self.path.pop();
        }
        result
    }

    fn visit_children(
        &mut self,
        provider: &dyn HierarchyProvider,
        node: ItemId,
        level: usize,
        is_solution_root: bool,
        slot: Option<usize>,
    ) -> Result<bool, SearchError> {
        let visible_only = self
            .searcher
            .policy
            .uses_visible_enumeration(level, is_solution_root);

        let mut child = provider.first_child(node, visible_only)?;
        if let (Some(slot), Some(_)) = (slot, child) {
            self.visited[slot].is_leaf = false;
        }

        while let Some(id) = child {
            if self.visit(provider, id, level, false)? {
                return Ok(true);
            }
            child = provider.next_sibling(id, visible_only)?;
        }

        Ok(false)
    }
}

/// Search for `target` and, if found, select it in `widget`
///
/// Returns the found path as `"<display> (<canonical>)"` strings, or an empty
/// list when nothing matched.
pub fn find_and_select<W: WidgetTree>(
    searcher: &HierarchySearcher,
    provider: &dyn HierarchyProvider,
    widget: &mut W,
    widget_root: W::Node,
    target: &str,
) -> Result<Vec<String>, SearchError> {
    match searcher.search(provider, target)? {
        Some(path) => {
            replay_and_select(widget, widget_root, &path);
            Ok(path.to_strings())
        }
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationHandle;
    use crate::error::ProviderError;
    use crate::provider::NestedHierarchy;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct TestNode {
        canonical: String,
        display: String,
        parent: Option<ItemId>,
        children: Vec<ItemId>,
        hidden: bool,
        nested: Option<usize>,
        fail: bool,
    }

    // Simple test hierarchy with query logging
    struct TestHierarchy {
        nodes: Vec<TestNode>,
        nested: Vec<TestHierarchy>,
        owned_nested: bool,
        drops: Rc<Cell<usize>>,
        queried: RefCell<Vec<ItemId>>,
        cancel_at: Option<(ItemId, CancellationHandle)>,
    }

    impl TestHierarchy {
        fn new(root: &str) -> Self {
            Self {
                nodes: vec![TestNode {
                    canonical: String::new(),
                    display: root.to_string(),
                    parent: None,
                    children: vec![],
                    hidden: false,
                    nested: None,
                    fail: false,
                }],
                nested: vec![],
                owned_nested: false,
                drops: Rc::new(Cell::new(0)),
                queried: RefCell::new(vec![]),
                cancel_at: None,
            }
        }

        fn add(&mut self, parent: ItemId, canonical: &str, display: &str) -> ItemId {
            let id = ItemId::new(self.nodes.len() as u32);
            self.nodes.push(TestNode {
                canonical: canonical.to_string(),
                display: display.to_string(),
                parent: Some(parent),
                children: vec![],
                hidden: false,
                nested: None,
                fail: false,
            });
            self.nodes[parent.index()].children.push(id);
            id
        }

        fn delegate(&mut self, node: ItemId, nested: TestHierarchy) {
            self.nested.push(nested);
            self.nodes[node.index()].nested = Some(self.nested.len() - 1);
        }

        fn log(&self, node: ItemId) -> Result<&TestNode, ProviderError> {
            self.queried.borrow_mut().push(node);
            if let Some((at, handle)) = &self.cancel_at {
                if *at == node {
                    handle.cancel();
                }
            }
            let entry = self
                .nodes
                .get(node.index())
                .ok_or(ProviderError::UnknownNode(node))?;
            if entry.fail {
                return Err(ProviderError::query(node, "property", "E_FAIL"));
            }
            Ok(entry)
        }

        fn was_queried(&self, node: ItemId) -> bool {
            self.queried.borrow().contains(&node)
        }

        fn next_in(&self, siblings: &[ItemId], from: usize, visible_only: bool) -> Option<ItemId> {
            siblings[from..]
                .iter()
                .copied()
                .find(|id| !visible_only || !self.nodes[id.index()].hidden)
        }
    }

    struct Released<'a> {
        inner: &'a TestHierarchy,
        drops: Rc<Cell<usize>>,
    }

    impl Drop for Released<'_> {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    impl HierarchyProvider for Released<'_> {
        fn root_node(&self) -> ItemId {
            self.inner.root_node()
        }

        fn try_resolve_nested(
            &self,
            node: ItemId,
        ) -> Result<Option<NestedHierarchy<'_>>, ProviderError> {
            self.inner.try_resolve_nested(node)
        }

        fn canonical_name(&self, node: ItemId) -> Result<String, ProviderError> {
            self.inner.canonical_name(node)
        }

        fn display_name(&self, node: ItemId) -> Result<String, ProviderError> {
            self.inner.display_name(node)
        }

        fn first_child(
            &self,
            node: ItemId,
            visible_only: bool,
        ) -> Result<Option<ItemId>, ProviderError> {
            self.inner.first_child(node, visible_only)
        }

        fn next_sibling(
            &self,
            node: ItemId,
            visible_only: bool,
        ) -> Result<Option<ItemId>, ProviderError> {
            self.inner.next_sibling(node, visible_only)
        }
    }

    impl HierarchyProvider for TestHierarchy {
        fn root_node(&self) -> ItemId {
            ItemId::new(0)
        }

        fn try_resolve_nested(
            &self,
            node: ItemId,
        ) -> Result<Option<NestedHierarchy<'_>>, ProviderError> {
            let Some(index) = self.log(node)?.nested else {
                return Ok(None);
            };
            let nested = &self.nested[index];
            let root = nested.root_node();
            if self.owned_nested {
                let handle = Released {
                    inner: nested,
                    drops: self.drops.clone(),
                };
                Ok(Some(NestedHierarchy::owned(Box::new(handle), root)))
            } else {
                Ok(Some(NestedHierarchy::borrowed(nested, root)))
            }
        }

        fn canonical_name(&self, node: ItemId) -> Result<String, ProviderError> {
            Ok(self.log(node)?.canonical.clone())
        }

        fn display_name(&self, node: ItemId) -> Result<String, ProviderError> {
            Ok(self.log(node)?.display.clone())
        }

        fn first_child(
            &self,
            node: ItemId,
            visible_only: bool,
        ) -> Result<Option<ItemId>, ProviderError> {
            let entry = self.log(node)?;
            Ok(self.next_in(&entry.children, 0, visible_only))
        }

        fn next_sibling(
            &self,
            node: ItemId,
            visible_only: bool,
        ) -> Result<Option<ItemId>, ProviderError> {
            let entry = self.log(node)?;
            let Some(parent) = entry.parent else {
                return Ok(None);
            };
            let siblings = &self.nodes[parent.index()].children;
            let position = siblings.iter().position(|&id| id == node).unwrap();
            Ok(self.next_in(siblings, position + 1, visible_only))
        }
    }

    /// Root -> [Src -> [a.txt], Docs -> [b.txt]]
    fn scenario_tree() -> TestHierarchy {
        let mut tree = TestHierarchy::new("Root");
        let root = tree.root_node();
        let src = tree.add(root, "proj/src", "Src");
        tree.add(src, "proj/a.txt", "a.txt");
        let docs = tree.add(root, "proj/docs", "Docs");
        tree.add(docs, "proj/b.txt", "b.txt");
        tree
    }

    fn searcher() -> HierarchySearcher {
        HierarchySearcher::new(TraversalPolicy::default())
    }

    #[test]
    fn test_found_path_lists_ancestors() {
        let tree = scenario_tree();
        let path = searcher().search(&tree, "proj/b.txt").unwrap().unwrap();
        assert_eq!(path.display_names(), vec!["Root", "Docs", "b.txt"]);
        assert_eq!(path.last().unwrap().canonical_name, "proj/b.txt");
    }

    #[test]
    fn test_match_ignores_case() {
        let tree = scenario_tree();
        let path = searcher().search(&tree, "PROJ/A.TXT").unwrap().unwrap();
        assert_eq!(path.display_names(), vec!["Root", "Src", "a.txt"]);
    }

    #[test]
    fn test_not_found_leaves_path_empty() {
        let tree = scenario_tree();
        let searcher = searcher();
        let mut walk = Walk::new(&searcher, Some("proj/missing.txt"));
        let found = walk.visit(&tree, tree.root_node(), 0, true).unwrap();
        assert!(!found);
        assert!(walk.path.is_empty());

        assert_eq!(searcher.search(&tree, "proj/missing.txt").unwrap(), None);
    }

    #[test]
    fn test_first_match_wins_and_stops() {
        let mut tree = TestHierarchy::new("Root");
        let root = tree.root_node();
        let first = tree.add(root, "dup", "First");
        let second = tree.add(root, "dup", "Second");
        let below_second = tree.add(second, "below", "Below");

        let path = searcher().search(&tree, "dup").unwrap().unwrap();
        assert_eq!(path.display_names(), vec!["Root", "First"]);
        assert!(tree.was_queried(first));
        assert!(!tree.was_queried(second));
        assert!(!tree.was_queried(below_second));
    }

    #[test]
    fn test_matching_container_is_not_descended() {
        let mut tree = TestHierarchy::new("Root");
        let root = tree.root_node();
        let dir = tree.add(root, "proj/dir", "dir");
        let inner = tree.add(dir, "proj/dir/x", "x");

        let path = searcher().search(&tree, "proj/dir").unwrap().unwrap();
        assert_eq!(path.display_names(), vec!["Root", "dir"]);
        assert!(!tree.was_queried(inner));
    }

    #[test]
    fn test_nested_hierarchy_is_transparent() {
        let mut nested = TestHierarchy::new("P2Root");
        let nested_root = nested.root_node();
        nested.add(nested_root, "x", "x");

        let mut tree = TestHierarchy::new("Root");
        let root = tree.root_node();
        let embedded = tree.add(root, "embedded", "Embedded");
        tree.delegate(embedded, nested);

        // The nested root stands in for the delegating node.
        let path = searcher().search(&tree, "x").unwrap().unwrap();
        assert_eq!(path.display_names(), vec!["Root", "P2Root", "x"]);
    }

    #[test]
    fn test_delegating_node_never_matches_directly() {
        let nested = TestHierarchy::new("Inner");
        let mut tree = TestHierarchy::new("Root");
        let root = tree.root_node();
        let embedded = tree.add(root, "embedded", "Embedded");
        tree.delegate(embedded, nested);

        assert_eq!(searcher().search(&tree, "embedded").unwrap(), None);
    }

    #[test]
    fn test_owned_nested_handle_released_on_every_exit() {
        let mut nested = TestHierarchy::new("Inner");
        let nested_root = nested.root_node();
        let x = nested.add(nested_root, "x", "x");
        let y = nested.add(nested_root, "y", "y");

        let mut tree = TestHierarchy::new("Root");
        tree.owned_nested = true;
        let root = tree.root_node();
        let embedded = tree.add(root, "embedded", "Embedded");
        tree.delegate(embedded, nested);

        searcher().search(&tree, "x").unwrap().unwrap();
        assert_eq!(tree.drops.get(), 1);

        assert_eq!(searcher().search(&tree, "missing").unwrap(), None);
        assert_eq!(tree.drops.get(), 2);

        // Provider failure inside the nested tree
        tree.nested[0].nodes[y.index()].fail = true;
        let err = searcher().search(&tree, "missing").unwrap_err();
        assert!(matches!(err, SearchError::Provider(_)));
        assert_eq!(tree.drops.get(), 3);
        tree.nested[0].nodes[y.index()].fail = false;

        // Cancellation raised while walking the nested tree
        let (token, handle) = CancellationToken::new();
        tree.nested[0].cancel_at = Some((x, handle));
        let err = searcher()
            .with_cancellation(token)
            .search(&tree, "missing")
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(tree.drops.get(), 4);
    }

    #[test]
    fn test_provider_failure_is_fatal() {
        let mut tree = scenario_tree();
        tree.nodes[1].fail = true;

        let searcher = searcher();
        let mut walk = Walk::new(&searcher, Some("proj/b.txt"));
        let err = walk.visit(&tree, tree.root_node(), 0, true).unwrap_err();
        assert!(matches!(err, SearchError::Provider(ProviderError::Query { .. })));
        assert!(walk.path.is_empty());
    }

    #[test]
    fn test_cancellation_before_start() {
        let tree = scenario_tree();
        let (token, handle) = CancellationToken::new();
        handle.cancel();
        let err = searcher()
            .with_cancellation(token)
            .search(&tree, "proj/b.txt")
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(tree.queried.borrow().is_empty());
    }

    #[test]
    fn test_cancellation_mid_walk_restores_path() {
        let mut tree = scenario_tree();
        let (token, handle) = CancellationToken::new();
        // Src's child a.txt is queried first; cancel there.
        tree.cancel_at = Some((ItemId::new(2), handle));

        let searcher = searcher().with_cancellation(token);
        let mut walk = Walk::new(&searcher, Some("proj/b.txt"));
        let err = walk.visit(&tree, tree.root_node(), 0, true).unwrap_err();
        assert!(err.is_cancelled());
        assert!(walk.path.is_empty());
        assert!(!tree.was_queried(ItemId::new(4)));
    }

    #[test]
    fn test_solution_root_children_use_visible_enumeration() {
        let mut tree = TestHierarchy::new("Root");
        let root = tree.root_node();
        let hidden = tree.add(root, "hidden", "Hidden");
        tree.nodes[hidden.index()].hidden = true;
        let shown = tree.add(root, "shown", "Shown");
        let deep_hidden = tree.add(shown, "deep", "Deep");
        tree.nodes[deep_hidden.index()].hidden = true;

        let default = searcher();
        assert_eq!(default.search(&tree, "hidden").unwrap(), None);
        assert!(default.search(&tree, "deep").unwrap().is_some());

        let structural = HierarchySearcher::new(TraversalPolicy::structural());
        assert!(structural.search(&tree, "hidden").unwrap().is_some());

        let visible = HierarchySearcher::new(TraversalPolicy::visible_only());
        assert_eq!(visible.search(&tree, "deep").unwrap(), None);
    }

    #[test]
    fn test_nested_root_is_not_solution_root() {
        let mut nested = TestHierarchy::new("Inner");
        let nested_root = nested.root_node();
        let hidden = nested.add(nested_root, "inner/hidden", "Hidden");
        nested.nodes[hidden.index()].hidden = true;

        // Root delegates directly, so the nested root sits at level 0 but is
        // not the solution root: its children use full enumeration.
        let mut tree = TestHierarchy::new("Root");
        tree.delegate(tree.root_node(), nested);

        let path = searcher().search(&tree, "inner/hidden").unwrap().unwrap();
        assert_eq!(path.display_names(), vec!["Inner", "Hidden"]);
    }

    #[test]
    fn test_empty_target_is_invalid() {
        let tree = scenario_tree();
        let err = searcher().search(&tree, "").unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
    }

    #[test]
    fn test_suffix_rule_finds_legacy_names() {
        let tree = scenario_tree();
        let path = searcher()
            .with_match_rule(MatchRule::Suffix)
            .search(&tree, "b.txt")
            .unwrap()
            .unwrap();
        assert_eq!(path.display_names(), vec!["Root", "Docs", "b.txt"]);
    }

    #[test]
    fn test_contains_display_name() {
        let tree = scenario_tree();
        assert!(searcher().contains_display_name(&tree, "docs").unwrap());
        assert!(!searcher().contains_display_name(&tree, "missing").unwrap());
        assert!(matches!(
            searcher().contains_display_name(&tree, ""),
            Err(SearchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_enumerate_visits_everything() {
        let tree = scenario_tree();
        let items = searcher().enumerate(&tree).unwrap();
        let listing: Vec<_> = items
            .iter()
            .map(|item| (item.depth, item.identity.display_name.as_str(), item.is_leaf))
            .collect();
        assert_eq!(
            listing,
            vec![
                (0, "Root", false),
                (1, "Src", false),
                (2, "a.txt", true),
                (1, "Docs", false),
                (2, "b.txt", true),
            ]
        );
    }

    #[test]
    fn test_run_reports_outcomes() {
        let tree = scenario_tree();
        let searcher = searcher();
        let root = tree.root_node();
        assert_eq!(
            searcher.run(&tree, root, &SearchTarget::item("nope")).unwrap(),
            SearchOutcome::NotFound
        );
        assert!(matches!(
            searcher.run(&tree, root, &SearchTarget::item("proj/a.txt")).unwrap(),
            SearchOutcome::Found(_)
        ));
    }
}
