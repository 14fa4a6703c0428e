use async_trait::async_trait;
use screenbudget_common::{Error, Result, TextGenSettings};
use std::time::Duration;
use tracing::debug;

/// Capability for phrasing challenges. The reply is free-form text the
/// caller must treat as untrusted; any transport failure surfaces as
/// [`Error::Upstream`] and is absorbed by the generator's fallback.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Ollama-backed text generation over its local HTTP API.
pub struct OllamaTextGenerator {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaTextGenerator {
    pub fn new(settings: &TextGenSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::Upstream(e.to_string()))?;

        Ok(Self { client, url: settings.url.clone(), model: settings.model.clone() })
    }
}

#[async_trait]
impl TextGenerator for OllamaTextGenerator {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "system": system,
            "prompt": prompt,
            "stream": false,
            "format": "json"
        });

        debug!("Requesting completion from {} (model {})", self.url, self.model);

        let response = self
            .client
            .post(format!("{}/api/generate", self.url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!("generation request failed: {}", response.status())));
        }

        let json: serde_json::Value =
            response.json().await.map_err(|e| Error::Upstream(e.to_string()))?;

        json.get("response")
            .and_then(|r| r.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Upstream("reply carried no response field".to_string()))
    }
}
