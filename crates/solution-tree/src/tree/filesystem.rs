//! Filesystem hierarchy with lazy loading support

use anyhow::{Context, Result};
use hierarchy::{HierarchyProvider, ItemId, NestedHierarchy, ProviderError};
use log::{trace, warn};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::tree::{Node, NodeKind};

/// Marker file that turns a sub-directory into an embedded project
pub const DEFAULT_PROJECT_MARKER: &str = "Cargo.toml";

/// State of a node's children - loaded or not yet loaded
#[derive(Debug, Clone)]
enum ChildrenState {
    /// Children have not been read from disk yet
    NotLoaded,
    /// Children have been loaded, directories first
    Loaded(Vec<ItemId>),
}

/// Per-node filesystem bookkeeping
#[derive(Debug, Clone)]
pub struct FsEntry {
    /// Full path on the filesystem
    full_path: PathBuf,
    /// Parent node ID
    parent: Option<ItemId>,
    /// Position within the parent's loaded children
    position: usize,
    /// Children loading state
    children: ChildrenState,
}

/// A directory tree exposed as a [`HierarchyProvider`]
///
/// Directory contents are read on demand the first time a node's children
/// are enumerated, so searching a large tree only touches the directories the
/// search actually walks into.
///
/// - canonical name: the full path
/// - display name: the file name
/// - dot-files are hidden from visible-only enumeration
/// - a sub-directory containing the project marker file is reported as a
///   nested hierarchy backed by its own `FilesystemHierarchy`
///
/// # Example
///
/// ```ignore
/// let tree = FilesystemHierarchy::new("/path/to/solution")?;
/// let searcher = HierarchySearcher::new(TraversalPolicy::default());
/// let path = searcher.search(&tree, "/path/to/solution/src/main.rs")?;
/// ```
pub struct FilesystemHierarchy {
    /// Arena storage for nodes, grown as directories are loaded
    nodes: RefCell<Vec<Node<FsEntry>>>,
    /// Root path for relative path calculations
    root_path: PathBuf,
    /// File whose presence marks a nested project
    project_marker: Option<String>,
}

impl FilesystemHierarchy {
    /// Create a hierarchy rooted at the given directory
    ///
    /// Only the root is read immediately; everything else is loaded lazily.
    ///
    /// # Errors
    ///
    /// Returns an error if the path doesn't exist or isn't a directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::open(path).with_context(|| format!("Failed to open hierarchy at {}", path.display()))
    }

    fn open(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Path must be a directory",
            ));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("root")
            .to_string();

        let root = Node::container(
            name,
            path.to_string_lossy(),
            FsEntry {
                full_path: path.to_path_buf(),
                parent: None,
                position: 0,
                children: ChildrenState::NotLoaded,
            },
        );

        Ok(Self {
            nodes: RefCell::new(vec![root]),
            root_path: path.to_path_buf(),
            project_marker: Some(DEFAULT_PROJECT_MARKER.to_string()),
        })
    }

    /// Use a different project marker, or `None` to disable nested projects
    pub fn with_project_marker(mut self, marker: Option<&str>) -> Self {
        self.project_marker = marker.map(str::to_string);
        self
    }

    /// The root node (always id 0)
    pub fn root(&self) -> ItemId {
        ItemId::new(0)
    }

    /// Get the full filesystem path for a node
    pub fn full_path(&self, id: ItemId) -> Option<PathBuf> {
        self.nodes
            .borrow()
            .get(id.index())
            .map(|n| n.data.full_path.clone())
    }

    /// Get the path relative to the hierarchy root
    pub fn relative_path(&self, id: ItemId) -> Option<PathBuf> {
        let full_path = self.full_path(id)?;
        full_path
            .strip_prefix(&self.root_path)
            .ok()
            .map(|p| p.to_path_buf())
    }

    /// Check if a node's children have been loaded
    pub fn is_loaded(&self, id: ItemId) -> bool {
        self.nodes
            .borrow()
            .get(id.index())
            .map(|n| matches!(n.data.children, ChildrenState::Loaded(_)))
            .unwrap_or(false)
    }

    /// Count nodes materialized so far
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Ensure children are loaded for a node
    ///
    /// Called automatically by child enumeration. A failed load leaves the
    /// node unloaded so a later enumeration retries it.
    pub fn ensure_loaded(&self, id: ItemId) -> Result<(), ProviderError> {
        let path = {
            let nodes = self.nodes.borrow();
            let node = nodes.get(id.index()).ok_or(ProviderError::UnknownNode(id))?;
            if matches!(node.data.children, ChildrenState::Loaded(_)) || !node.is_container() {
                return Ok(());
            }
            node.data.full_path.clone()
        };

        trace!("loading children of {}", path.display());
        let loaded = Self::read_children(&path)?;

        let mut nodes = self.nodes.borrow_mut();
        let mut child_ids = Vec::with_capacity(loaded.len());
        for (position, mut child) in loaded.into_iter().enumerate() {
            child.data.parent = Some(id);
            child.data.position = position;
            child_ids.push(ItemId::new(nodes.len() as u32));
            nodes.push(child);
        }
        nodes[id.index()].data.children = ChildrenState::Loaded(child_ids);
        Ok(())
    }

    /// Read and sort the entries of one directory
    fn read_children(path: &Path) -> io::Result<Vec<Node<FsEntry>>> {
        let mut children = Vec::new();

        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let entry_path = entry.path();
            let metadata = entry.metadata()?;
            let name = entry.file_name().to_string_lossy().to_string();

            let kind = if metadata.is_dir() {
                NodeKind::Container
            } else {
                NodeKind::Item
            };

            let mut node = Node::new(
                name,
                entry_path.to_string_lossy().into_owned(),
                kind,
                FsEntry {
                    full_path: entry_path,
                    parent: None,
                    position: 0,
                    children: ChildrenState::NotLoaded,
                },
            );
            node.hidden = node.name.starts_with('.');
            children.push(node);
        }

        // Sort children: directories first, then files, alphabetically within each group
        children.sort_by(|a, b| match (a.kind, b.kind) {
            (NodeKind::Container, NodeKind::Item) => std::cmp::Ordering::Less,
            (NodeKind::Item, NodeKind::Container) => std::cmp::Ordering::Greater,
            _ => a.name.cmp(&b.name),
        });

        Ok(children)
    }

    fn with_node<T>(
        &self,
        id: ItemId,
        f: impl FnOnce(&Node<FsEntry>) -> T,
    ) -> Result<T, ProviderError> {
        let nodes = self.nodes.borrow();
        let node = nodes.get(id.index()).ok_or(ProviderError::UnknownNode(id))?;
        Ok(f(node))
    }

    /// First child of `parent` at or after position `from`
    fn child_from(
        &self,
        parent: ItemId,
        from: usize,
        visible_only: bool,
    ) -> Result<Option<ItemId>, ProviderError> {
        self.ensure_loaded(parent)?;
        let nodes = self.nodes.borrow();
        let node = nodes.get(parent.index()).ok_or(ProviderError::UnknownNode(parent))?;
        let ChildrenState::Loaded(children) = &node.data.children else {
            return Ok(None);
        };
        Ok(children
            .get(from..)
            .unwrap_or(&[])
            .iter()
            .copied()
            .find(|id| !visible_only || nodes[id.index()].is_visible()))
    }

    fn project_dir(&self, id: ItemId) -> Result<Option<PathBuf>, ProviderError> {
        let Some(marker) = &self.project_marker else {
            return Ok(None);
        };
        if id == self.root() {
            return Ok(None);
        }
        self.with_node(id, |node| {
            (node.is_container() && node.data.full_path.join(marker).is_file())
                .then(|| node.data.full_path.clone())
        })
    }
}

impl HierarchyProvider for FilesystemHierarchy {
    fn root_node(&self) -> ItemId {
        self.root()
    }

    fn try_resolve_nested(
        &self,
        node: ItemId,
    ) -> Result<Option<NestedHierarchy<'_>>, ProviderError> {
        let Some(dir) = self.project_dir(node)? else {
            return Ok(None);
        };

        match FilesystemHierarchy::open(&dir) {
            Ok(nested) => {
                let nested = nested.with_project_marker(self.project_marker.as_deref());
                let root = nested.root();
                Ok(Some(NestedHierarchy::owned(Box::new(nested), root)))
            }
            Err(e) => {
                warn!("Treating {} as a folder, project could not be opened: {}", dir.display(), e);
                Ok(None)
            }
        }
    }

    fn canonical_name(&self, node: ItemId) -> Result<String, ProviderError> {
        self.with_node(node, |n| n.canonical_name.clone())
    }

    fn display_name(&self, node: ItemId) -> Result<String, ProviderError> {
        self.with_node(node, |n| n.name.clone())
    }

    fn first_child(
        &self,
        node: ItemId,
        visible_only: bool,
    ) -> Result<Option<ItemId>, ProviderError> {
        self.child_from(node, 0, visible_only)
    }

    fn next_sibling(
        &self,
        node: ItemId,
        visible_only: bool,
    ) -> Result<Option<ItemId>, ProviderError> {
        let Some((parent, position)) =
            self.with_node(node, |n| n.data.parent.map(|p| (p, n.data.position)))?
        else {
            return Ok(None);
        };
        self.child_from(parent, position + 1, visible_only)
    }
}
