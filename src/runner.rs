/*
 * Deskhand - Sandboxed File-System Assistant
 * File Path: src/runner.rs
 * Responsibility: Sandboxed script execution with a wall-clock timeout.
 */

use crate::error::{ToolError, ToolResult};
use crate::sandbox;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Run a script inside the workspace via the configured interpreter.
///
/// `args` is split with shell-word semantics (quotes respected). The timeout
/// is wall-clock; on expiry the pending child is killed (`kill_on_drop`) and
/// a timeout message is returned instead of partial output.
pub async fn run_python(
    root: &Path,
    relative: &str,
    args: &str,
    timeout_secs: u64,
    interpreter: &str,
) -> ToolResult<String> {
    let script = sandbox::resolve(root, relative)?;
    if !script.is_file() {
        return Err(ToolError::NotAScript(relative.to_string()));
    }

    let argv = shell_words::split(args).map_err(|e| ToolError::Spawn(e.to_string()))?;

    let child = Command::new(interpreter)
        .arg(&script)
        .args(&argv)
        .current_dir(root)
        .kill_on_drop(true)
        .output();

    let output = match timeout(Duration::from_secs(timeout_secs), child).await {
        Ok(result) => result.map_err(|e| ToolError::Spawn(e.to_string()))?,
        Err(_) => return Err(ToolError::Timeout(timeout_secs)),
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let code = output.status.code().unwrap_or(-1);

    let mut formatted = format!("Exit code: {}\n", code);
    if !stdout.is_empty() {
        formatted.push_str(&format!("Stdout:\n{}\n", stdout));
    }
    if !stderr.is_empty() {
        formatted.push_str(&format!("Stderr:\n{}", stderr));
    }

    Ok(formatted.trim_end().to_string())
}
