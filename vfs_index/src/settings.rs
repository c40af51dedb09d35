//! Validation policy for namespace paths
//!
//! Settings are plain immutable values: construct one, hand it to an index,
//! share it between indexes, or diverge per instance. There is no
//! process-wide mutable configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path validation and normalization policy for one index instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VfsSettings {
    /// Case-fold paths before hashing, so paths differing only by ASCII
    /// case resolve to the same entry. Stored paths keep their original
    /// casing.
    pub lowercase_filesystem: bool,
    /// Reject any path containing a byte outside the printable ASCII range
    /// 32-126. When enabled this is the only legality check.
    pub ansi_paths: bool,
    /// Intended ceiling on path length. Declared for hosts to enforce; the
    /// core does not reject overlong paths itself.
    pub max_path: usize,
}

impl VfsSettings {
    /// Default path length ceiling.
    pub const DEFAULT_MAX_PATH: usize = 255;

    /// Creates a settings value.
    pub fn new(lowercase_filesystem: bool, ansi_paths: bool, max_path: usize) -> Self {
        Self {
            lowercase_filesystem,
            ansi_paths,
            max_path,
        }
    }
}

impl Default for VfsSettings {
    /// Case-insensitive, ASCII-only, 255-character intent.
    fn default() -> Self {
        Self::new(true, true, Self::DEFAULT_MAX_PATH)
    }
}

/// Errors that can occur when persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to serialize settings
    #[error("Failed to serialize settings: {0}")]
    SerializationFailed(String),

    /// Failed to deserialize settings
    #[error("Failed to deserialize settings: {0}")]
    DeserializationFailed(String),
}

/// Serializes a settings value to JSON bytes.
pub fn serialize_settings(settings: &VfsSettings) -> Result<Vec<u8>, SettingsError> {
    serde_json::to_vec_pretty(settings)
        .map_err(|e| SettingsError::SerializationFailed(e.to_string()))
}

/// Deserializes a settings value from JSON bytes.
pub fn deserialize_settings(bytes: &[u8]) -> Result<VfsSettings, SettingsError> {
    serde_json::from_slice(bytes).map_err(|e| SettingsError::DeserializationFailed(e.to_string()))
}
