//! Anthropic messages API client (vision).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{http_client, CompletionProvider, MAX_COMPLETION_TOKENS};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    api_key: String,
    model: String,
    http: Client,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            http: http_client(),
        }
    }
}

fn build_body(model: &str, system_prompt: &str, prompt: &str, image_b64: &str) -> Value {
    serde_json::json!({
        "model": model,
        "max_tokens": MAX_COMPLETION_TOKENS,
        "system": system_prompt,
        "messages": [{
            "role": "user",
            "content": [
                {
                    "type": "image",
                    "source": {
                        "type": "base64",
                        "media_type": "image/png",
                        "data": image_b64,
                    },
                },
                { "type": "text", "text": prompt },
            ],
        }],
    })
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        prompt: &str,
        image_b64: &str,
    ) -> Result<String> {
        let body = build_body(&self.model, system_prompt, prompt, image_b64);

        let resp = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .context("anthropic request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("anthropic error: {}: {}", status.as_u16(), text);
        }

        let data: Value = resp
            .json()
            .await
            .context("failed to parse anthropic response")?;

        let text = data["content"]
            .as_array()
            .and_then(|blocks| {
                blocks
                    .iter()
                    .find_map(|b| b["text"].as_str().map(|s| s.to_string()))
            })
            .context("no text content in anthropic response")?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_image_and_prompt() {
        let body = build_body("claude-3-7-sonnet-20250219", "sys", "act now", "QUJD");
        assert_eq!(body["model"], "claude-3-7-sonnet-20250219");
        assert_eq!(body["system"], "sys");
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["source"]["data"], "QUJD");
        assert_eq!(content[0]["source"]["media_type"], "image/png");
        assert_eq!(content[1]["text"], "act now");
    }
}
