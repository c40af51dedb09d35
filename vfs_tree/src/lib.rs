//! # Namespace Tree Entities
//!
//! This crate provides the entities of an in-memory virtual hierarchical
//! namespace: nodes, their payload variants, and the directory container.
//!
//! ## Design
//!
//! - **Identity over pointers**: every node is addressed by the hash of its
//!   normalized full path; parent and child links store hashes and are
//!   resolved through the owning index
//! - **Single ownership**: the index owns every node, a node owns its
//!   payload, a directory holds only child identities
//! - **Lazy containers**: a directory node allocates its child container on
//!   the first insertion, never at creation time
//! - **Opaque file content**: what a file node carries is defined entirely
//!   by the host application through the [`FileContent`] trait
//!
//! The algorithms that compose these entities into a consistent tree live
//! in the `vfs_index` crate.

pub mod directory;
pub mod node;
pub mod path;

pub use directory::Directory;
pub use node::{FileContent, Node, NodeHash, NodePayload};
pub use path::split_path;
