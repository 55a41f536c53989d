//! Path validation for record sources.
//!
//! Backends only ever expose the files sitting directly in their root, so a
//! valid storage path is one that normalises to exactly one file name.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a storage path and normalises it to a bare file name.
///
/// `.` components and redundant separators are dropped and `..` is resolved
/// against the preceding component. The result must be a single normal
/// component: paths escaping the root, naming a nested entry, containing a
/// null byte, or normalising to nothing are rejected with
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use syllabus_storage::validate_path;
/// assert_eq!(validate_path("go-basics.json").unwrap(), Path::new("go-basics.json"));
/// assert_eq!(validate_path("./drafts/../go-basics.json").unwrap(), Path::new("go-basics.json"));
/// assert!(validate_path("../etc/passwd").is_err());
/// assert!(validate_path("drafts/go-basics.json").is_err());
/// assert!(validate_path("a\0b").is_err());
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(original.to_path_buf());
    let mut stack = Vec::new();
    for component in original.components() {
        match component {
            Component::Normal(name) => {
                // Null bytes survive Path::components() on Unix but truncate
                // in C-based syscalls.
                if name.as_encoded_bytes().contains(&0) {
                    exn::bail!(invalid());
                }
                stack.push(name);
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(invalid()),
            Component::ParentDir => {
                if stack.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
        }
    }
    match stack.as_slice() {
        [name] => Ok(PathBuf::from(name)),
        _ => exn::bail!(invalid()),
    }
}
