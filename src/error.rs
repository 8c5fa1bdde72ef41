/*
 * Deskhand - Sandboxed File-System Assistant
 * File Path: src/error.rs
 * Responsibility: Tool error taxonomy with a stable textual rendering.
 */

use thiserror::Error;

/// Every way a tool invocation can fail. The `Display` output of each variant
/// is the contract surfaced to the caller: tests match on these strings.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Error: \"{0}\" is outside the working directory")]
    OutsideWorkspace(String),

    #[error("Error: \"{0}\" does not exist or is not a file")]
    NotAFile(String),

    #[error("Error: \"{0}\" is not a file")]
    NotAScript(String),

    #[error("Error: Cannot read \"{0}\" as text (binary file?)")]
    NotText(String),

    #[error("Error: Permission denied to read \"{0}\"")]
    ReadDenied(String),

    #[error("Error: Permission denied to write to \"{0}\"")]
    WriteDenied(String),

    #[error("Error reading \"{path}\": {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Error writing to \"{path}\": {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Error listing directory: {0}")]
    List(std::io::Error),

    #[error("Error: Script timed out after {0} seconds")]
    Timeout(u64),

    #[error("Exception running script: {0}")]
    Spawn(String),

    #[error("Could not understand the request. LLM response: {0}")]
    MalformedDecision(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;
