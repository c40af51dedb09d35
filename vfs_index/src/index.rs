//! Namespace index implementation
//!
//! This module provides the owning registry behind the virtual namespace:
//! every node lives in a hash-keyed map, and the add/remove/get/find
//! algorithms keep the map and the parent/child hierarchy consistent.

use std::collections::HashMap;

use log::{debug, trace};
use sha2::{Digest, Sha256};
use thiserror::Error;
use vfs_tree::{split_path, Node, NodeHash, NodePayload};

use crate::settings::VfsSettings;

/// Errors reported by namespace operations.
///
/// Every variant except [`VfsError::Corrupted`] is an expected condition
/// returned before any mutation has taken place. `Corrupted` signals a
/// violated internal invariant; callers are not expected to recover from
/// it.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Path rejected by the active settings
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// No node registered under the path
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-recursive removal of a directory that still has children
    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// Recursive removal requested on a file
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// The root node is only destroyed by teardown
    #[error("The root node cannot be removed")]
    RootRemoval,

    /// Operation on an index that has been torn down
    #[error("Index has been torn down")]
    TornDown,

    /// Internal invariant violation, unrecoverable
    #[error("Hierarchy corrupted: {0}")]
    Corrupted(String),
}

/// The owning registry of an in-memory virtual hierarchical namespace.
///
/// Maps slash-delimited string paths to file or directory nodes with O(1)
/// lookup by full path. Inserting a path materializes its whole ancestor
/// chain; removal tears entries down bottom-up. The index exclusively owns
/// every node, and a node's caller-attached file content is dropped
/// together with the node.
///
/// Entries are keyed purely on the path hash; two distinct paths hashing
/// to the same value would alias each other. No collision check is
/// performed.
///
/// Not safe for concurrent use; a host sharing one index across threads
/// must serialize access externally.
#[derive(Debug)]
pub struct VfsIndex {
    nodes: HashMap<NodeHash, Node>,
    settings: VfsSettings,
    root: NodeHash,
    initialized: bool,
}

impl VfsIndex {
    /// Creates an index with the default settings.
    pub fn new() -> Self {
        Self::with_settings(VfsSettings::default())
    }

    /// Creates an index with explicit settings.
    ///
    /// The root node (empty path, directory-typed) is registered
    /// immediately and lives until [`VfsIndex::teardown`].
    pub fn with_settings(settings: VfsSettings) -> Self {
        let root = Self::digest_path("", settings.lowercase_filesystem);

        let mut nodes = HashMap::new();
        nodes.insert(root, Node::root(root));

        Self {
            nodes,
            settings,
            root,
            initialized: true,
        }
    }

    /// Registers a complete path, returning its payload slot.
    ///
    /// Missing ancestors are created as directory nodes; a trailing slash
    /// marks the leaf itself as a directory. Re-adding an existing path is
    /// not an error and returns the already registered slot. The empty
    /// path resolves to the root, which is never created anew.
    ///
    /// The returned slot is where the host attaches its file content.
    pub fn add(&mut self, path: &str) -> Result<&mut NodePayload, VfsError> {
        if !self.initialized {
            return Err(VfsError::TornDown);
        }

        let hash = self.add_node(path)?;
        let entry = self
            .nodes
            .get_mut(&hash)
            .ok_or_else(|| VfsError::Corrupted(format!("{hash} registered but not indexed")))?;

        Ok(entry.payload_mut())
    }

    /// Removes the node registered under a path.
    ///
    /// Directories with children require `recursive`, which deletes every
    /// descendant bottom-up before the directory itself. Files reject
    /// `recursive`. The root is only destroyed by [`VfsIndex::teardown`].
    pub fn remove(&mut self, path: &str, recursive: bool) -> Result<(), VfsError> {
        if !self.initialized {
            return Err(VfsError::TornDown);
        }

        let hash = self
            .hash_entry(path)
            .ok_or_else(|| VfsError::InvalidPath(path.to_string()))?;

        if hash == self.root {
            return Err(VfsError::RootRemoval);
        }
        if !self.nodes.contains_key(&hash) {
            return Err(VfsError::NotFound(path.to_string()));
        }

        self.remove_node(hash, recursive)
    }

    /// Looks up the node registered under a path.
    ///
    /// Returns None both for a path rejected by the active settings and
    /// for a valid path with no entry.
    pub fn get(&self, path: &str) -> Option<&Node> {
        if !self.initialized {
            return None;
        }

        let hash = self.hash_entry(path)?;
        self.nodes.get(&hash)
    }

    /// Looks up a node mutably, e.g. to attach file content later on.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut Node> {
        if !self.initialized {
            return None;
        }

        let hash = self.hash_entry(path)?;
        self.nodes.get_mut(&hash)
    }

    /// Collects every node whose full path contains `filter`.
    ///
    /// Plain textual containment, not segment-aware. The output vector is
    /// replaced with the matches; the returned count equals its length.
    pub fn find<'a>(&'a self, filter: &str, out: &mut Vec<&'a Node>) -> usize {
        out.clear();
        if !self.initialized {
            return 0;
        }

        for entry in self.nodes.values() {
            if entry.path().contains(filter) {
                out.push(entry);
            }
        }

        trace!("find {:?} matched {} nodes", filter, out.len());
        out.len()
    }

    /// Returns the number of indexed nodes, root included.
    pub fn size(&self) -> usize {
        if !self.initialized {
            return 0;
        }

        self.nodes.len()
    }

    /// Returns the active settings.
    pub fn settings(&self) -> &VfsSettings {
        &self.settings
    }

    /// Returns the root node.
    pub fn root(&self) -> Option<&Node> {
        if !self.initialized {
            return None;
        }

        self.nodes.get(&self.root)
    }

    /// Resolves a node identity, as stored in parent and child links.
    pub fn node(&self, hash: NodeHash) -> Option<&Node> {
        if !self.initialized {
            return None;
        }

        self.nodes.get(&hash)
    }

    /// Resolves a node's parent link.
    pub fn parent_of(&self, entry: &Node) -> Option<&Node> {
        entry.parent().and_then(|hash| self.node(hash))
    }

    /// Resolves a directory node's children, in insertion order.
    ///
    /// Files and directories that never received a child yield an empty
    /// list.
    pub fn children(&self, entry: &Node) -> Vec<&Node> {
        if !self.initialized {
            return Vec::new();
        }

        match entry.payload().directory() {
            Some(dir) => dir.iter().filter_map(|hash| self.nodes.get(&hash)).collect(),
            None => Vec::new(),
        }
    }

    /// Destroys every node, root last, dropping all attached file content.
    ///
    /// Afterwards the index consistently reports the torn-down state:
    /// lookups yield None, mutations yield [`VfsError::TornDown`], counts
    /// are zero. Tearing down twice is a no-op.
    pub fn teardown(&mut self) -> Result<(), VfsError> {
        if !self.initialized {
            return Ok(());
        }

        debug!("tearing down index with {} nodes", self.nodes.len());
        self.initialized = false;
        self.remove_node(self.root, true)
    }

    /// Validates a path against the settings and derives its hash.
    ///
    /// The hash is computed over the case-folded path when
    /// `lowercase_filesystem` is set; the caller's path text is never
    /// modified.
    fn hash_entry(&self, path: &str) -> Option<NodeHash> {
        if self.settings.ansi_paths {
            // Only printable ASCII is legal in this mode.
            if path.bytes().any(|b| !(32..=126).contains(&b)) {
                return None;
            }
        }

        Some(Self::digest_path(path, self.settings.lowercase_filesystem))
    }

    fn digest_path(path: &str, fold_case: bool) -> NodeHash {
        let digest = if fold_case {
            Sha256::digest(path.to_ascii_lowercase().as_bytes())
        } else {
            Sha256::digest(path.as_bytes())
        };

        let mut raw = [0u8; 8];
        raw.copy_from_slice(&digest[..8]);
        NodeHash::new(u64::from_le_bytes(raw))
    }

    /// Recursive insertion: ensures the whole ancestor chain exists, then
    /// registers the leaf. Bounded by path depth.
    fn add_node(&mut self, path: &str) -> Result<NodeHash, VfsError> {
        let hash = self
            .hash_entry(path)
            .ok_or_else(|| VfsError::InvalidPath(path.to_string()))?;

        // The root node is created when the index is constructed, never
        // here.
        if path.is_empty() {
            return Ok(self.root);
        }

        if self.nodes.contains_key(&hash) {
            return Ok(hash);
        }

        let (prefix, _leaf) = split_path(path);
        let parent_hash = self.add_node(prefix)?;

        let is_file = !path.ends_with('/');
        let mut entry = Node::new(hash, path, is_file);
        entry.set_parent(Some(parent_hash));

        let parent = self
            .nodes
            .get_mut(&parent_hash)
            .ok_or_else(|| VfsError::Corrupted(format!("parent of {path} is not indexed")))?;
        let dir = parent
            .payload_mut()
            .ensure_directory()
            .ok_or_else(|| VfsError::Corrupted(format!("parent of {path} is file-typed")))?;
        dir.add_child(hash);

        self.nodes.insert(hash, entry);
        debug!("added node: {path}");

        Ok(hash)
    }

    /// Removal entry point shared by `remove` and `teardown`. The target
    /// is known to be indexed.
    fn remove_node(&mut self, hash: NodeHash, recursive: bool) -> Result<(), VfsError> {
        let entry = self
            .nodes
            .get(&hash)
            .ok_or_else(|| VfsError::Corrupted(format!("{hash} vanished during removal")))?;
        let path = entry.path().to_string();

        if entry.is_file() {
            // Files have no children to recurse into.
            if recursive {
                return Err(VfsError::NotADirectory(path));
            }
        } else {
            let child_count = entry.payload().directory().map_or(0, |dir| dir.len());
            if child_count > 0 {
                if !recursive {
                    return Err(VfsError::DirectoryNotEmpty(path));
                }
                self.delete_recursive(hash)?;
            }
        }

        self.delete_single(hash)
    }

    /// Depth-first bottom-up deletion of a directory's descendants.
    fn delete_recursive(&mut self, dir_hash: NodeHash) -> Result<(), VfsError> {
        // Snapshot the children so deletion never mutates a container
        // while it is being walked.
        let children: Vec<NodeHash> = self
            .nodes
            .get(&dir_hash)
            .and_then(|entry| entry.payload().directory())
            .map(|dir| dir.children().to_vec())
            .unwrap_or_default();

        for &child in &children {
            let descend = self.nodes.get(&child).map_or(false, |entry| {
                entry.is_directory()
                    && entry.payload().directory().map_or(false, |dir| !dir.is_empty())
            });
            if descend {
                self.delete_recursive(child)?;
            }
        }

        for child in children {
            self.delete_single(child)?;
        }

        // A directory fully processed for recursive deletion must end
        // empty.
        let leftovers = self
            .nodes
            .get(&dir_hash)
            .and_then(|entry| entry.payload().directory())
            .map_or(0, |dir| dir.len());
        if leftovers > 0 {
            return Err(VfsError::Corrupted(format!(
                "{dir_hash} still has {leftovers} children after recursive delete"
            )));
        }

        Ok(())
    }

    /// Deletes one node: unregister, verify the hierarchy invariants,
    /// detach from the parent, drop.
    fn delete_single(&mut self, hash: NodeHash) -> Result<(), VfsError> {
        let entry = self
            .nodes
            .remove(&hash)
            .ok_or_else(|| VfsError::Corrupted(format!("{hash} missing from the index")))?;

        match entry.parent() {
            None => {
                // Only the root may live without a parent.
                if !entry.is_root() {
                    return Err(VfsError::Corrupted(format!(
                        "non-root node {} has no parent",
                        entry.path()
                    )));
                }
            }
            Some(parent_hash) => {
                let parent = self.nodes.get_mut(&parent_hash).ok_or_else(|| {
                    VfsError::Corrupted(format!("parent of {} is not indexed", entry.path()))
                })?;
                if parent.is_file() {
                    return Err(VfsError::Corrupted(format!(
                        "parent of {} is file-typed",
                        entry.path()
                    )));
                }

                let detached = parent
                    .payload_mut()
                    .directory_mut()
                    .map_or(false, |dir| dir.remove_child(hash));
                if !detached {
                    return Err(VfsError::Corrupted(format!(
                        "{} was not linked under its parent",
                        entry.path()
                    )));
                }
            }
        }

        trace!("removed node: {}", entry.path());

        // Dropping the node drops its payload, running the destructor of
        // any caller-attached file content.
        Ok(())
    }
}

impl Default for VfsIndex {
    fn default() -> Self {
        Self::new()
    }
}
