//! Node entity and payload variants
//!
//! A node is one entry in the namespace, either a file or a directory. The
//! payload enum doubles as the discriminant: file nodes carry an opaque
//! caller-provided content handle, directory nodes carry the lazily
//! allocated child container.

use core::any::Any;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::directory::Directory;

/// Identity of a node, derived from its normalized full path.
///
/// Parent and child links are stored as hashes and resolved through the
/// owning index, never as direct references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHash(u64);

impl NodeHash {
    /// Creates a node hash from its raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw hash value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({:016x})", self.0)
    }
}

/// Opaque content attached to a file node.
///
/// The namespace core promises exactly one thing about the content: it is
/// dropped when its node is destroyed. Everything else (byte storage,
/// streaming, archive decoding) belongs to the host application, which can
/// recover its concrete type through [`FileContent::as_any`].
pub trait FileContent: fmt::Debug {
    /// Enables downcasting to the concrete content type.
    fn as_any(&self) -> &dyn Any;

    /// Enables mutable downcasting to the concrete content type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Payload slot of a node.
///
/// Both variants start out empty: file content is attached by the caller
/// after insertion, and a directory container is allocated only when the
/// first child is inserted.
#[derive(Debug)]
pub enum NodePayload {
    /// Caller-defined file content, empty until attached.
    File(Option<Box<dyn FileContent>>),
    /// Child container, allocated on first insertion.
    Directory(Option<Directory>),
}

impl NodePayload {
    /// Returns true for a file slot.
    pub fn is_file(&self) -> bool {
        matches!(self, NodePayload::File(_))
    }

    /// Returns true for a directory slot.
    pub fn is_directory(&self) -> bool {
        matches!(self, NodePayload::Directory(_))
    }

    /// Stores file content into the slot, replacing any previous content.
    ///
    /// Returns false if this is a directory slot, which cannot carry
    /// caller content.
    pub fn attach(&mut self, content: Box<dyn FileContent>) -> bool {
        match self {
            NodePayload::File(slot) => {
                *slot = Some(content);
                true
            }
            NodePayload::Directory(_) => false,
        }
    }

    /// Returns the attached file content, if any.
    pub fn content(&self) -> Option<&dyn FileContent> {
        match self {
            NodePayload::File(Some(content)) => Some(content.as_ref()),
            _ => None,
        }
    }

    /// Returns the attached file content mutably, if any.
    pub fn content_mut(&mut self) -> Option<&mut dyn FileContent> {
        match self {
            NodePayload::File(Some(content)) => Some(content.as_mut()),
            _ => None,
        }
    }

    /// Returns the directory container, if one has been allocated.
    pub fn directory(&self) -> Option<&Directory> {
        match self {
            NodePayload::Directory(Some(dir)) => Some(dir),
            _ => None,
        }
    }

    /// Returns the directory container mutably, if one has been allocated.
    pub fn directory_mut(&mut self) -> Option<&mut Directory> {
        match self {
            NodePayload::Directory(Some(dir)) => Some(dir),
            _ => None,
        }
    }

    /// Returns the directory container, allocating it on first use.
    ///
    /// Returns None on a file slot; files cannot contain children.
    pub fn ensure_directory(&mut self) -> Option<&mut Directory> {
        match self {
            NodePayload::Directory(slot) => Some(slot.get_or_insert_with(Directory::new)),
            NodePayload::File(_) => None,
        }
    }
}

/// One entry in the namespace.
///
/// Nodes are created by the index's insertion algorithm and destroyed by
/// its removal algorithm; a node owns its payload for its whole lifetime
/// and drops it when the node itself is dropped.
#[derive(Debug)]
pub struct Node {
    hash: NodeHash,
    path: String,
    is_root: bool,
    parent: Option<NodeHash>,
    payload: NodePayload,
}

impl Node {
    /// Creates a non-root node with an empty payload slot.
    pub fn new(hash: NodeHash, path: impl Into<String>, is_file: bool) -> Self {
        let payload = if is_file {
            NodePayload::File(None)
        } else {
            NodePayload::Directory(None)
        };

        Self {
            hash,
            path: path.into(),
            is_root: false,
            parent: None,
            payload,
        }
    }

    /// Creates the distinguished root node (empty path, directory-typed).
    pub fn root(hash: NodeHash) -> Self {
        Self {
            hash,
            path: String::new(),
            is_root: true,
            parent: None,
            payload: NodePayload::Directory(None),
        }
    }

    /// Returns the identity of the containing node, None only for root.
    pub fn parent(&self) -> Option<NodeHash> {
        self.parent
    }

    /// Sets the identity of the containing node.
    pub fn set_parent(&mut self, parent: Option<NodeHash>) {
        self.parent = parent;
    }

    /// Returns the full path exactly as supplied at creation.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the node identity.
    pub fn hash(&self) -> NodeHash {
        self.hash
    }

    /// Returns true for the single root node.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Returns true for file nodes.
    pub fn is_file(&self) -> bool {
        self.payload.is_file()
    }

    /// Returns true for directory nodes.
    pub fn is_directory(&self) -> bool {
        self.payload.is_directory()
    }

    /// Returns the payload slot.
    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    /// Returns the payload slot mutably.
    pub fn payload_mut(&mut self) -> &mut NodePayload {
        &mut self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct StubContent {
        marker: u32,
    }

    impl FileContent for StubContent {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_file_node_starts_empty() {
        let node = Node::new(NodeHash::new(1), "file.png", true);

        assert!(node.is_file());
        assert!(!node.is_directory());
        assert!(!node.is_root());
        assert!(node.payload().content().is_none());
    }

    #[test]
    fn test_directory_node_starts_unallocated() {
        let node = Node::new(NodeHash::new(1), "folder1/", false);

        assert!(node.is_directory());
        assert!(node.payload().directory().is_none());
    }

    #[test]
    fn test_root_node() {
        let node = Node::root(NodeHash::new(0));

        assert!(node.is_root());
        assert!(node.is_directory());
        assert_eq!(node.path(), "");
        assert!(node.parent().is_none());
    }

    #[test]
    fn test_attach_content_to_file() {
        let mut node = Node::new(NodeHash::new(1), "file.png", true);

        assert!(node.payload_mut().attach(Box::new(StubContent { marker: 7 })));

        let content = node.payload().content().expect("content attached");
        let stub = content
            .as_any()
            .downcast_ref::<StubContent>()
            .expect("concrete type recovered");
        assert_eq!(stub.marker, 7);
    }

    #[test]
    fn test_attach_content_to_directory_fails() {
        let mut node = Node::new(NodeHash::new(1), "folder1/", false);

        assert!(!node.payload_mut().attach(Box::new(StubContent { marker: 7 })));
        assert!(node.payload().content().is_none());
    }

    #[test]
    fn test_ensure_directory_allocates_once() {
        let mut node = Node::new(NodeHash::new(1), "folder1/", false);

        {
            let dir = node.payload_mut().ensure_directory().expect("directory slot");
            dir.add_child(NodeHash::new(2));
        }

        let dir = node.payload().directory().expect("allocated");
        assert_eq!(dir.len(), 1);

        // A second call reuses the allocated container.
        let dir = node.payload_mut().ensure_directory().expect("directory slot");
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_ensure_directory_on_file_fails() {
        let mut node = Node::new(NodeHash::new(1), "file.png", true);
        assert!(node.payload_mut().ensure_directory().is_none());
    }

    #[test]
    fn test_parent_link() {
        let mut node = Node::new(NodeHash::new(2), "folder1/file.png", true);
        assert!(node.parent().is_none());

        node.set_parent(Some(NodeHash::new(1)));
        assert_eq!(node.parent(), Some(NodeHash::new(1)));
    }

    #[test]
    fn test_node_hash_accessors() {
        let hash = NodeHash::new(0xabcd);
        assert_eq!(hash.as_u64(), 0xabcd);
        assert_eq!(format!("{}", hash), "Node(000000000000abcd)");
    }
}
