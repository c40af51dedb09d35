//! Path splitting for slash-delimited namespace paths
//!
//! Paths in the namespace use `/` as the only separator. A trailing slash
//! marks a directory path (`"folder1/"`), its absence marks a file path
//! (`"folder1/file.png"`).

/// Splits a full path into its parent prefix and leaf name.
///
/// The last `/` is located while ignoring the final byte, so the trailing
/// slash of a directory path is not treated as the split point. The prefix
/// keeps its trailing slash; a path without an interior slash yields an
/// empty prefix.
///
/// # Examples
///
/// ```
/// use vfs_tree::split_path;
///
/// assert_eq!(split_path("folder1/file.png"), ("folder1/", "file.png"));
/// assert_eq!(split_path("folder1/folder2/"), ("folder1/", "folder2/"));
/// assert_eq!(split_path("file.png"), ("", "file.png"));
/// ```
pub fn split_path(path: &str) -> (&str, &str) {
    // Scan over bytes so the function stays well-defined for non-ASCII
    // input; the split point itself is always an ASCII slash.
    let bytes = path.as_bytes();
    let scan = &bytes[..bytes.len().saturating_sub(1)];

    match scan.iter().rposition(|&b| b == b'/') {
        Some(index) => path.split_at(index + 1),
        None => ("", path),
    }
}
