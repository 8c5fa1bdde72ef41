/*
 * Deskhand - Sandboxed File-System Assistant
 * File Path: src/tools.rs
 * Responsibility: Sandboxed list/read/write primitives.
 */

use crate::error::{ToolError, ToolResult};
use crate::sandbox;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// List the immediate children of the workspace. Entries come back in
/// filesystem order; callers must not assume sorting.
pub fn list_files(root: &Path) -> ToolResult<String> {
    let entries: Vec<_> = fs::read_dir(root)
        .map_err(ToolError::List)?
        .filter_map(|entry| entry.ok())
        .collect();

    if entries.is_empty() {
        return Ok("Directory is empty".to_string());
    }

    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if path.is_dir() {
            lines.push(format!("[DIR]  {}/", name));
        } else {
            let size = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            lines.push(format!("[FILE] {} ({} bytes)", name, size));
        }
    }

    Ok(lines.join("\n"))
}

/// Read a file inside the workspace, truncated to `max_chars` characters.
/// A marker naming the limit is appended only when content was actually cut.
pub fn read_file(root: &Path, relative: &str, max_chars: usize) -> ToolResult<String> {
    let path = sandbox::resolve(root, relative)?;

    if !path.is_file() {
        return Err(ToolError::NotAFile(relative.to_string()));
    }

    let bytes = fs::read(&path).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => ToolError::ReadDenied(relative.to_string()),
        _ => ToolError::Read {
            path: relative.to_string(),
            source: e,
        },
    })?;

    let content =
        String::from_utf8(bytes).map_err(|_| ToolError::NotText(relative.to_string()))?;

    if content.chars().count() > max_chars {
        let truncated: String = content.chars().take(max_chars).collect();
        Ok(format!(
            "{}\n[... File \"{}\" truncated at {} characters ...]",
            truncated, relative, max_chars
        ))
    } else {
        Ok(content)
    }
}

/// Write (overwrite, never append) a file inside the workspace, creating any
/// missing parent directories. The sandbox check runs before any mutation.
pub fn write_file(root: &Path, relative: &str, content: &str) -> ToolResult<String> {
    let path = sandbox::resolve(root, relative)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ToolError::Write {
            path: relative.to_string(),
            source: e,
        })?;
    }

    fs::write(&path, content).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => ToolError::WriteDenied(relative.to_string()),
        _ => ToolError::Write {
            path: relative.to_string(),
            source: e,
        },
    })?;

    Ok(format!("Successfully wrote to \"{}\"", relative))
}
