use crate::config::ModelConfig;
use anyhow::Result;
use once_cell::sync::Lazy;
use serde_json::json;

static POOLED_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .build()
        .expect("Failed to create pooled reqwest client")
});

/// Single synchronous-in-spirit call to the local Ollama endpoint: prompt in,
/// text out. No retry and no request timeout; a dead endpoint surfaces as a
/// transport error for the dispatcher's catch-all.
pub async fn generate(prompt: &str, config: &ModelConfig) -> Result<String> {
    let url = format!("{}/api/generate", config.base_url.trim_end_matches('/'));

    let payload = json!({
        "model": config.model,
        "prompt": prompt,
        "stream": false,
        "options": {
            "temperature": config.temperature,
            "num_predict": config.num_predict
        }
    });

    let response = POOLED_CLIENT.post(url).json(&payload).send().await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(anyhow::anyhow!(
            "Ollama API Error (Model: {}): {}",
            config.model,
            error_text
        ));
    }

    let res_json: serde_json::Value = response.json().await?;
    match res_json["response"].as_str() {
        Some(text) => Ok(text.to_string()),
        None => Err(anyhow::anyhow!(
            "Ollama returned no response field: {}",
            res_json
        )),
    }
}
