//! # Namespace Index
//!
//! This crate provides an in-memory virtual hierarchical namespace: a tree
//! mapping slash-delimited string paths to opaque file payloads or
//! directory containers, with O(1) lookup by full path through a path-hash
//! index.
//!
//! ## Philosophy
//!
//! - **Synthetic hierarchies**: represent an archive, a network listing,
//!   or any abstract structure without touching real storage
//! - **One owner**: the index owns every node; links between nodes are
//!   identities, never pointers
//! - **Opaque content**: what a file carries is the host's business; the
//!   core only guarantees cleanup
//! - **Quiet on expected failures, loud on corruption**: lookups that miss
//!   and removals that cannot proceed are ordinary results; violated
//!   hierarchy invariants surface as a dedicated unrecoverable error
//!
//! ## Example
//!
//! ```
//! use vfs_index::VfsIndex;
//!
//! let mut index = VfsIndex::new();
//!
//! // Ancestors materialize on demand; a trailing slash marks a directory.
//! index.add("folder2/file2.png").expect("valid path");
//! assert_eq!(index.size(), 3);
//!
//! let node = index.get("folder2/file2.png").expect("registered");
//! assert!(node.is_file());
//!
//! index.remove("folder2/", true).expect("recursive removal");
//! assert_eq!(index.size(), 1);
//! ```

pub mod index;
pub mod settings;

pub use index::{VfsError, VfsIndex};
pub use settings::{deserialize_settings, serialize_settings, SettingsError, VfsSettings};

// The entity types travel with the index surface.
pub use vfs_tree::{Directory, FileContent, Node, NodeHash, NodePayload};
