/*
 * Deskhand - Sandboxed File-System Assistant
 * File Path: src/decision.rs
 * Responsibility: Parsing a structured tool decision out of raw model output.
 */

use crate::error::{ToolError, ToolResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

// Greedy span so fenced or chatty output still yields the embedded object.
static JSON_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// The four tools the dispatcher knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ListFiles,
    ReadFile,
    WriteFile,
    RunPython,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "list_files" => Some(Self::ListFiles),
            "read_file" => Some(Self::ReadFile),
            "write_file" => Some(Self::WriteFile),
            "run_python" => Some(Self::RunPython),
            _ => None,
        }
    }
}

/// One decision as emitted by the model. Every field is optional on the wire;
/// absent `tool` means "answer directly" and absent `arguments` is an empty
/// map, so a sloppy model response still routes somewhere sensible.
#[derive(Debug, Deserialize, Default)]
pub struct ToolDecision {
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl ToolDecision {
    /// The selected tool name, with `null`/`"none"` normalized to None.
    pub fn tool_name(&self) -> Option<&str> {
        self.tool
            .as_deref()
            .filter(|name| !name.is_empty() && *name != "none" && *name != "null")
    }

    /// String argument lookup, defaulting to "" and stringifying non-string
    /// JSON values rather than failing.
    pub fn str_arg(&self, key: &str) -> String {
        match self.arguments.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// Parse model output into a decision. Primary path: the whole trimmed text
/// is JSON. Recovery path: the first greedy `{...}` span. Both failing is a
/// malformed decision carrying the raw text for diagnostics.
pub fn parse(raw: &str) -> ToolResult<ToolDecision> {
    if let Ok(decision) = serde_json::from_str::<ToolDecision>(raw.trim()) {
        return Ok(decision);
    }

    if let Some(span) = JSON_SPAN.find(raw) {
        if let Ok(decision) = serde_json::from_str::<ToolDecision>(span.as_str()) {
            return Ok(decision);
        }
    }

    Err(ToolError::MalformedDecision(raw.to_string()))
}
