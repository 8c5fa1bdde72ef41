/*
 * Deskhand - Sandboxed File-System Assistant
 * File Path: src/config.rs
 * Responsibility: YAML configuration structure and tolerant loading.
 */
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "deskhand.yml";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_num_predict")]
    pub num_predict: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuntimeConfig {
    /// Character budget for `read_file` before truncation kicks in.
    #[serde(default = "default_max_read_chars")]
    pub max_read_chars: usize,
    /// Wall-clock limit for `run_python`, in seconds.
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_num_predict() -> u32 {
    1024
}

fn default_max_read_chars() -> usize {
    10_000
}

fn default_run_timeout_secs() -> u64 {
    30
}

fn default_interpreter() -> String {
    "python3".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            num_predict: default_num_predict(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_read_chars: default_max_read_chars(),
            run_timeout_secs: default_run_timeout_secs(),
            interpreter: default_interpreter(),
        }
    }
}

impl Config {
    /// Load configuration from `path`. A missing file is not an error; the
    /// assistant runs against local defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file at {:?}", path.as_ref()))?;
        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
