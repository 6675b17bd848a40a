//! Replaying a search path against an interactive tree widget

use log::debug;

use crate::identity::SearchPath;

/// A UI tree whose nodes can be expanded and selected
///
/// The widget does not know canonical names; nodes are matched by their
/// display label only.
pub trait WidgetTree {
    /// Handle to a widget node
    type Node: Copy;

    /// Children of `node` in display order, with their labels
    fn children(&self, node: Self::Node) -> Vec<(Self::Node, String)>;

    /// Expand or collapse `node`
    fn set_expanded(&mut self, node: Self::Node, expanded: bool);

    /// Make `node` the single selected node
    fn select(&mut self, node: Self::Node);
}

/// Expand and select each segment of `path`, starting from the children of
/// `root`
///
/// Segments are matched by exact, case-sensitive display name; the first
/// matching child wins. The walk stops quietly at the first segment that is
/// not present, leaving the last matched node selected, since the widget may
/// lag behind the hierarchy it mirrors.
pub fn replay_and_select<W: WidgetTree>(tree: &mut W, root: W::Node, path: &SearchPath) {
    replay_segments(tree, root, path, path.len());
}

/// Select only the first segment of `path`
///
/// Bringing the top of the tree into view first makes navigation to items
/// deep in large trees more reliable.
pub fn select_root<W: WidgetTree>(tree: &mut W, root: W::Node, path: &SearchPath) {
    replay_segments(tree, root, path, 1);
}

fn replay_segments<W: WidgetTree>(tree: &mut W, root: W::Node, path: &SearchPath, limit: usize) {
    let mut current = root;
    for (depth, segment) in path.iter().take(limit).enumerate() {
        let found = tree
            .children(current)
            .into_iter()
            .find(|(_, label)| *label == segment.display_name);

        let Some((node, _)) = found else {
            debug!(
                "replay stopped at depth {}: {:?} not present in widget",
                depth, segment.display_name
            );
            return;
        };

        tree.set_expanded(node, true);
        tree.select(node);
        current = node;
    }
}
