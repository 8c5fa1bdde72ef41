/*
 * Deskhand - Sandboxed File-System Assistant
 * File Path: src/sandbox.rs
 * Responsibility: Workspace bootstrap and path containment checks.
 */

use crate::error::{ToolError, ToolResult};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the sandbox directory under the invocation directory.
pub const WORKSPACE_DIR: &str = "calculator";

/// Locate the workspace under `cwd` and create it on first use.
pub fn ensure_workspace(cwd: &Path) -> Result<PathBuf> {
    let workspace = cwd.join(WORKSPACE_DIR);
    if !workspace.exists() {
        fs::create_dir_all(&workspace)
            .with_context(|| format!("Failed to create workspace at {:?}", workspace))?;
    }
    Ok(workspace)
}

/// Resolve a user-supplied relative path against the workspace root.
///
/// The target may not exist yet (write creates it), so canonicalization is
/// applied to the deepest existing ancestor and the non-existing remainder is
/// re-appended afterwards. Containment is checked with `Path::starts_with`,
/// which compares whole path components, so a sibling like `work2` can never
/// pass for a root named `work`.
pub fn resolve(root: &Path, relative: &str) -> ToolResult<PathBuf> {
    let root_real =
        fs::canonicalize(root).map_err(|_| ToolError::OutsideWorkspace(relative.to_string()))?;

    let target = root.join(relative);
    let mut existing = target;
    let mut remainder: Vec<std::ffi::OsString> = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                remainder.push(name.to_os_string());
                existing = parent.to_path_buf();
            }
            _ => return Err(ToolError::OutsideWorkspace(relative.to_string())),
        }
    }

    let mut resolved = fs::canonicalize(&existing)
        .map_err(|_| ToolError::OutsideWorkspace(relative.to_string()))?;
    for part in remainder.iter().rev() {
        resolved.push(part);
    }

    if resolved.starts_with(&root_real) {
        Ok(resolved)
    } else {
        Err(ToolError::OutsideWorkspace(relative.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_accepts_nested_relative_path() {
        let dir = tempdir().unwrap();
        let resolved = resolve(dir.path(), "a/b.txt").unwrap();
        assert!(resolved.starts_with(fs::canonicalize(dir.path()).unwrap()));
        assert!(resolved.ends_with("a/b.txt"));
    }

    #[test]
    fn test_resolve_rejects_parent_escape() {
        let dir = tempdir().unwrap();
        let err = resolve(dir.path(), "../outside.txt").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: \"../outside.txt\" is outside the working directory"
        );
    }

    #[test]
    fn test_resolve_rejects_absolute_path() {
        let dir = tempdir().unwrap();
        assert!(resolve(dir.path(), "/etc/passwd").is_err());
    }

    #[test]
    fn test_resolve_rejects_sibling_with_shared_prefix() {
        let parent = tempdir().unwrap();
        let root = parent.path().join("work");
        let sibling = parent.path().join("work2");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&sibling).unwrap();
        fs::write(sibling.join("secret.txt"), "secret").unwrap();

        // String-prefix containment would accept this; component comparison must not.
        assert!(resolve(&root, "../work2/secret.txt").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_escape() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let escape_target = outside.path().join("outside.txt");
        fs::write(&escape_target, "secret").unwrap();
        std::os::unix::fs::symlink(&escape_target, dir.path().join("escape.txt")).unwrap();

        assert!(resolve(dir.path(), "escape.txt").is_err());
    }

    #[test]
    fn test_ensure_workspace_creates_directory_once() {
        let dir = tempdir().unwrap();
        let first = ensure_workspace(dir.path()).unwrap();
        assert!(first.is_dir());
        let second = ensure_workspace(dir.path()).unwrap();
        assert_eq!(first, second);
    }
}
