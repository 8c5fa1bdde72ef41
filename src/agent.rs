/*
 * Deskhand - Sandboxed File-System Assistant
 * File Path: src/agent.rs
 * Responsibility: Instruction dispatch: heuristic fast path, model state,
 * listing post-filters, and the top-level error catch-all.
 */

use crate::config::Config;
use crate::decision::{self, ToolDecision, ToolKind};
use crate::error::ToolError;
use crate::llm;
use crate::runner;
use crate::tools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static QUOTED_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).unwrap());
static EXTENSION_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[a-z0-9]+").unwrap());

/// Entry point for one instruction. Tool failures are already rendered as
/// text by the tool layer; anything that still propagates (model transport,
/// most likely) is folded into an `Error: ...` string here. The caller never
/// sees an Err.
pub async fn handle_instruction(
    instruction: &str,
    root: &Path,
    config: &Config,
    verbose: bool,
) -> String {
    if let Some(result) = fast_path(instruction, root, config) {
        return result;
    }

    match model_path(instruction, root, config, verbose).await {
        Ok(result) => result,
        Err(e) => format!("Error: {}", e),
    }
}

/// Heuristic state: recognized instruction shapes short-circuit to a direct
/// tool call and the model is never invoked.
pub fn fast_path(instruction: &str, root: &Path, config: &Config) -> Option<String> {
    let lower = instruction.to_lowercase();

    let wants_listing = lower.contains("list")
        && ["files", "folder", "directory"]
            .iter()
            .any(|word| lower.contains(word));
    if wants_listing {
        let listing = tools::list_files(root).unwrap_or_else(|e| e.to_string());
        return Some(filter_listing(instruction, &listing));
    }

    if lower.contains("read greeting") {
        return Some(read_to_text(root, "greeting.txt", config));
    }

    if lower.contains("read lorem") {
        // "2" anywhere in the instruction selects the alternate file.
        let filename = if lower.contains('2') { "lorem2.txt" } else { "lorem.txt" };
        return Some(read_to_text(root, filename, config));
    }

    None
}

/// Model state: prompt the model with the current listing and tool catalog,
/// parse its decision, and route it.
async fn model_path(
    instruction: &str,
    root: &Path,
    config: &Config,
    verbose: bool,
) -> anyhow::Result<String> {
    let listing = tools::list_files(root).unwrap_or_else(|e| e.to_string());
    let prompt = build_prompt(instruction, root, &listing);

    let raw = llm::generate(&prompt, &config.model).await?;
    if verbose {
        println!("LLM Response: {}", raw);
    }

    let decision = match decision::parse(&raw) {
        Ok(decision) => decision,
        // "Could not understand" is a result, not a fault.
        Err(e) => return Ok(e.to_string()),
    };

    Ok(execute_decision(instruction, &decision, root, config, verbose).await)
}

/// Route a parsed decision to the matching tool. Missing arguments default to
/// empty strings; the tool layer produces the descriptive failure text.
pub async fn execute_decision(
    instruction: &str,
    decision: &ToolDecision,
    root: &Path,
    config: &Config,
    verbose: bool,
) -> String {
    let Some(name) = decision.tool_name() else {
        return decision
            .response
            .clone()
            .unwrap_or_else(|| "No response from assistant".to_string());
    };

    let Some(kind) = ToolKind::from_name(name) else {
        return ToolError::UnknownTool(name.to_string()).to_string();
    };

    if verbose {
        println!("Using tool: {}", name);
        println!(
            "Arguments: {}",
            serde_json::Value::Object(decision.arguments.clone())
        );
    }

    match kind {
        ToolKind::ListFiles => {
            let listing = tools::list_files(root).unwrap_or_else(|e| e.to_string());
            filter_listing(instruction, &listing)
        }
        ToolKind::ReadFile => read_to_text(root, &decision.str_arg("file_path"), config),
        ToolKind::WriteFile => tools::write_file(
            root,
            &decision.str_arg("file_path"),
            &decision.str_arg("content"),
        )
        .unwrap_or_else(|e| e.to_string()),
        ToolKind::RunPython => runner::run_python(
            root,
            &decision.str_arg("file_path"),
            &decision.str_arg("args"),
            config.runtime.run_timeout_secs,
            &config.runtime.interpreter,
        )
        .await
        .unwrap_or_else(|e| e.to_string()),
    }
}

/// Prompt-driven post-filter for listings. A quoted substring keeps entries
/// whose name starts with it; failing that, an extension token keeps matching
/// file lines. Never errors: a no-match yields an explicit message.
pub fn filter_listing(instruction: &str, listing: &str) -> String {
    if let Some(cap) = QUOTED_PATTERN.captures(instruction) {
        let pattern = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
        let kept: Vec<&str> = listing
            .lines()
            .filter(|line| entry_name(line).is_some_and(|name| name.starts_with(pattern)))
            .collect();
        return if kept.is_empty() {
            format!("No files matching '{}' found", pattern)
        } else {
            kept.join("\n")
        };
    }

    let lower = instruction.to_lowercase();
    if let Some(found) = EXTENSION_TOKEN.find(&lower) {
        let ext = found.as_str();
        let kept: Vec<&str> = listing
            .lines()
            .filter(|line| line.starts_with("[FILE]") && line.to_lowercase().contains(ext))
            .collect();
        return if kept.is_empty() {
            format!("No {} files found", ext)
        } else {
            kept.join("\n")
        };
    }

    listing.to_string()
}

fn read_to_text(root: &Path, relative: &str, config: &Config) -> String {
    tools::read_file(root, relative, config.runtime.max_read_chars)
        .unwrap_or_else(|e| e.to_string())
}

/// The name portion of a `[FILE] ...`/`[DIR]  ...` listing line.
fn entry_name(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("[FILE] ") {
        Some(rest.rsplit_once(" (").map(|(name, _)| name).unwrap_or(rest))
    } else if let Some(rest) = line.strip_prefix("[DIR]  ") {
        Some(rest.strip_suffix('/').unwrap_or(rest))
    } else {
        None
    }
}

/// Fixed instruction-following prompt: tool catalog, workspace state, worked
/// examples, and the JSON contract the decision parser expects.
fn build_prompt(instruction: &str, root: &Path, listing: &str) -> String {
    format!(
        r#"You are a file system assistant. You have access to these tools:
1. list_files - Lists files in the working directory
2. read_file(file_path) - Reads content of a file
3. write_file(file_path, content) - Writes content to a file
4. run_python(file_path, args) - Runs a Python file

Working directory: {root}

Current files in directory:
{listing}

When user asks for something, decide which tool to use and provide the arguments in JSON format.
Respond ONLY with JSON in this format:
{{
    "tool": "tool_name",
    "arguments": {{...}},
    "explanation": "brief explanation"
}}

If no tool is needed, respond with:
{{
    "tool": null,
    "response": "your response here"
}}

Examples:
- User: "List files" -> {{"tool": "list_files", "arguments": {{}}, "explanation": "User wants to see files"}}
- User: "Read greeting.txt" -> {{"tool": "read_file", "arguments": {{"file_path": "greeting.txt"}}, "explanation": "User wants to read greeting.txt"}}
- User: "Write test.txt Hello" -> {{"tool": "write_file", "arguments": {{"file_path": "test.txt", "content": "Hello"}}, "explanation": "User wants to write to test.txt"}}
- User: "Run script.py" -> {{"tool": "run_python", "arguments": {{"file_path": "script.py"}}, "explanation": "User wants to run script.py"}}
- User: "What files start with 'lorem'?" -> {{"tool": "list_files", "arguments": {{}}, "explanation": "Check all files to see which start with lorem"}}
- User: "Show me .py files" -> {{"tool": "list_files", "arguments": {{}}, "explanation": "List all files and filter for .py extension"}}

User question: {instruction}

Respond with JSON only:"#,
        root = root.display(),
        listing = listing,
        instruction = instruction
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_fast_path_lists_empty_directory() {
        let dir = tempdir().unwrap();
        let result = fast_path("List files in the folder", dir.path(), &Config::default());
        assert_eq!(result.as_deref(), Some("Directory is empty"));
    }

    #[test]
    fn test_fast_path_requires_listing_keyword_pair() {
        let dir = tempdir().unwrap();
        let config = Config::default();
        assert!(fast_path("list everything you know", dir.path(), &config).is_none());
        assert!(fast_path("what is in this directory", dir.path(), &config).is_none());
        assert!(fast_path("List the files please", dir.path(), &config).is_some());
    }

    #[test]
    fn test_fast_path_reads_greeting() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("greeting.txt"), "hello there").unwrap();
        let result = fast_path("Read greeting.txt for me", dir.path(), &Config::default());
        assert_eq!(result.as_deref(), Some("hello there"));
    }

    #[test]
    fn test_fast_path_selects_alternate_lorem_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("lorem.txt"), "first").unwrap();
        fs::write(dir.path().join("lorem2.txt"), "second").unwrap();
        let config = Config::default();

        assert_eq!(
            fast_path("read lorem", dir.path(), &config).as_deref(),
            Some("first")
        );
        assert_eq!(
            fast_path("read lorem 2", dir.path(), &config).as_deref(),
            Some("second")
        );
    }

    #[test]
    fn test_filter_listing_by_quoted_prefix() {
        let listing = "[FILE] lorem.txt (10 bytes)\n[FILE] lorem2.txt (12 bytes)\n[FILE] main.py (50 bytes)";
        let filtered = filter_listing("What files start with 'lorem'?", listing);
        assert_eq!(
            filtered,
            "[FILE] lorem.txt (10 bytes)\n[FILE] lorem2.txt (12 bytes)"
        );
    }

    #[test]
    fn test_filter_listing_by_extension_token() {
        let listing = "[FILE] lorem.txt (10 bytes)\n[FILE] main.py (50 bytes)\n[DIR]  pkg/";
        assert_eq!(
            filter_listing("Show me all .py files", listing),
            "[FILE] main.py (50 bytes)"
        );
    }

    #[test]
    fn test_filter_listing_no_match_is_explicit() {
        let listing = "[FILE] main.py (50 bytes)";
        assert_eq!(
            filter_listing("files starting with 'zeta'", listing),
            "No files matching 'zeta' found"
        );
        assert_eq!(
            filter_listing("Show me .rs files", listing),
            "No .rs files found"
        );
    }

    #[test]
    fn test_filter_listing_passthrough_without_pattern() {
        let listing = "[FILE] main.py (50 bytes)\n[DIR]  pkg/";
        assert_eq!(filter_listing("list files", listing), listing);
    }

    #[tokio::test]
    async fn test_execute_decision_none_tool_returns_response() {
        let dir = tempdir().unwrap();
        let decision = decision::parse(r#"{"tool": null, "response": "hi"}"#).unwrap();
        let out = execute_decision("say hi", &decision, dir.path(), &Config::default(), false).await;
        assert_eq!(out, "hi");
    }

    #[tokio::test]
    async fn test_execute_decision_none_tool_without_response() {
        let dir = tempdir().unwrap();
        let decision = decision::parse("{}").unwrap();
        let out = execute_decision("hello", &decision, dir.path(), &Config::default(), false).await;
        assert_eq!(out, "No response from assistant");
    }

    #[tokio::test]
    async fn test_execute_decision_unknown_tool() {
        let dir = tempdir().unwrap();
        let decision = decision::parse(r#"{"tool": "delete_everything"}"#).unwrap();
        let out =
            execute_decision("wipe it", &decision, dir.path(), &Config::default(), false).await;
        assert_eq!(out, "Unknown tool: delete_everything");
    }

    #[tokio::test]
    async fn test_execute_decision_write_then_read() {
        let dir = tempdir().unwrap();
        let config = Config::default();

        let write = decision::parse(
            r#"{"tool": "write_file", "arguments": {"file_path": "test.txt", "content": "Hello"}}"#,
        )
        .unwrap();
        let out = execute_decision("Write test.txt Hello", &write, dir.path(), &config, false).await;
        assert_eq!(out, "Successfully wrote to \"test.txt\"");

        let read = decision::parse(
            r#"{"tool": "read_file", "arguments": {"file_path": "test.txt"}}"#,
        )
        .unwrap();
        let out = execute_decision("Read test.txt", &read, dir.path(), &config, false).await;
        assert_eq!(out, "Hello");
    }

    #[tokio::test]
    async fn test_execute_decision_defaults_missing_file_path() {
        let dir = tempdir().unwrap();
        let decision = decision::parse(r#"{"tool": "read_file"}"#).unwrap();
        let out =
            execute_decision("read it", &decision, dir.path(), &Config::default(), false).await;
        assert_eq!(out, "Error: \"\" does not exist or is not a file");
    }

    #[tokio::test]
    async fn test_execute_decision_list_applies_post_filter() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "print()").unwrap();
        fs::write(dir.path().join("notes.txt"), "n").unwrap();

        let decision = decision::parse(r#"{"tool": "list_files", "arguments": {}}"#).unwrap();
        let out = execute_decision(
            "Show me all .py files",
            &decision,
            dir.path(),
            &Config::default(),
            false,
        )
        .await;
        assert_eq!(out, "[FILE] main.py (7 bytes)");
    }
}
