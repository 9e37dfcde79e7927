use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

/// Collapses `.` lexically and rejects anything that could leave the sandbox.
///
/// Content paths are generated, never user-supplied, so `..` is rejected outright.
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();

    for c in path.components() {
        match c {
            Component::CurDir => {},
            Component::Normal(seg) => out.push(seg),
            Component::ParentDir => {
                return Err(StorageError::PathTraversalAttempt {
                    message: path.display().to_string().into(),
                    context: Some("Parent segments are not allowed in content paths".into()),
                });
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::PathTraversalAttempt {
                    message: path.display().to_string().into(),
                    context: Some("Absolute paths are not allowed in sandbox".into()),
                });
            },
        }
    }

    Ok(out)
}

/// Record names are flat file names over `[a-z0-9._-]` that do not start with a dot.
pub(crate) fn validate_record_name(name: &str) -> Result<&str, StorageError> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && !name.starts_with('.')
        && name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b"._-".contains(&b));
    if valid {
        Ok(name)
    } else {
        Err(StorageError::InvalidAddress {
            message: name.to_owned().into(),
            context: Some("Invalid record name".into()),
        })
    }
}

/// Joins `path` to the canonical `root` and checks the result stays inside it.
pub(crate) fn resolve_path(root: &Path, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
    let joined = root.join(normalize_relative(path.as_ref())?);

    match joined.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(canonical),
        Ok(canonical) => Err(StorageError::PathTraversalAttempt {
            message: canonical.display().to_string().into(),
            context: Some("Resolved path escapes the sandbox".into()),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => validate_ancestors(root, &joined),
        Err(e) => Err(StorageError::Io { source: e, context: None }),
    }
}

/// Validates a path that does not exist yet through its first existing ancestor,
/// so a symlinked shard directory cannot redirect writes outside the root.
fn validate_ancestors(root: &Path, joined: &Path) -> Result<PathBuf, StorageError> {
    let mut current = joined.parent();

    while let Some(path) = current {
        if path == root {
            return Ok(joined.to_path_buf());
        }
        if path.exists() {
            return match path.canonicalize() {
                Ok(canonical) if canonical.starts_with(root) => Ok(joined.to_path_buf()),
                Ok(canonical) => Err(StorageError::PathTraversalAttempt {
                    message: canonical.display().to_string().into(),
                    context: Some("Existing shard directory is a symlink outside sandbox".into()),
                }),
                Err(e) => Err(StorageError::Io {
                    source: e,
                    context: Some("Failed to verify shard directory".into()),
                }),
            };
        }
        current = path.parent();
    }

    Err(StorageError::PathTraversalAttempt {
        message: joined.display().to_string().into(),
        context: Some("No valid parent directory found within sandbox".into()),
    })
}
