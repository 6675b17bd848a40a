//! Traversal and matching configuration

use derive_more::Display;

use crate::identity::NodeIdentity;

/// Controls which children the searcher asks the provider for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TraversalPolicy {
    /// Enumerate only the children the provider currently exposes as visible
    pub visible_only: bool,
    /// The search starts at the absolute solution root, whose immediate
    /// children are always enumerated as visible
    pub root_is_solution_root: bool,
}

impl Default for TraversalPolicy {
    fn default() -> Self {
        Self {
            visible_only: false,
            root_is_solution_root: true,
        }
    }
}

impl TraversalPolicy {
    /// Enumerate only visible children at every level
    pub fn visible_only() -> Self {
        Self {
            visible_only: true,
            ..Self::default()
        }
    }

    /// Enumerate the full structural set everywhere, including below the
    /// solution root
    pub fn structural() -> Self {
        Self {
            visible_only: false,
            root_is_solution_root: false,
        }
    }

    /// Whether children of a node at `level` (already incremented past the
    /// node itself) use visible enumeration
    ///
    /// `is_solution_root` is true only while walking the start node of a
    /// search; it has no effect unless `root_is_solution_root` is set.
    pub fn uses_visible_enumeration(&self, level: usize, is_solution_root: bool) -> bool {
        self.visible_only || (self.root_is_solution_root && is_solution_root && level == 1)
    }
}

/// How a target identifier is compared against a visited node
///
/// All comparisons ignore case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchRule {
    /// Canonical name equals the target
    #[default]
    #[display(fmt = "exact")]
    Exact,
    /// Canonical name ends with the target
    #[display(fmt = "suffix")]
    Suffix,
    /// Display name equals the target
    #[display(fmt = "display name")]
    DisplayName,
}

impl MatchRule {
    /// Returns true if `identity` satisfies this rule for `target`
    ///
    /// An empty target never matches.
    pub fn matches(self, target: &str, identity: &NodeIdentity) -> bool {
        if target.is_empty() {
            return false;
        }
        let target = target.to_lowercase();
        match self {
            MatchRule::Exact => identity.canonical_name.to_lowercase() == target,
            MatchRule::Suffix => identity.canonical_name.to_lowercase().ends_with(&target),
            MatchRule::DisplayName => identity.display_name.to_lowercase() == target,
        }
    }
}

/// What a search is looking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    /// Stop at the first node matching this identifier
    Item(String),
    /// Visit every reachable node and report all of them
    EnumerateAll,
}

impl SearchTarget {
    pub fn item(target: impl Into<String>) -> Self {
        SearchTarget::Item(target.into())
    }
}
