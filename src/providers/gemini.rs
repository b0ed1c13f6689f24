//! Gemini generateContent API client (vision).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{http_client, CompletionProvider, MAX_COMPLETION_TOKENS};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiProvider {
    api_key: String,
    model: String,
    http: Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            http: http_client(),
        }
    }
}

fn build_body(system_prompt: &str, prompt: &str, image_b64: &str) -> Value {
    serde_json::json!({
        "system_instruction": {
            "parts": [{ "text": system_prompt }],
        },
        "contents": [{
            "parts": [
                { "text": prompt },
                {
                    "inline_data": {
                        "mime_type": "image/png",
                        "data": image_b64,
                    },
                },
            ],
        }],
        "generationConfig": {
            "maxOutputTokens": MAX_COMPLETION_TOKENS,
        },
    })
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        prompt: &str,
        image_b64: &str,
    ) -> Result<String> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let body = build_body(system_prompt, prompt, image_b64);

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("gemini error: {}: {}", status.as_u16(), text);
        }

        let data: Value = resp
            .json()
            .await
            .context("failed to parse gemini response")?;

        let text = data["candidates"][0]["content"]["parts"]
            .as_array()
            .and_then(|parts| {
                parts
                    .iter()
                    .find_map(|p| p["text"].as_str().map(|s| s.to_string()))
            })
            .context("no text part in gemini response")?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_system_instruction_and_inline_image() {
        let body = build_body("sys", "act now", "QUJD");
        assert_eq!(body["system_instruction"]["parts"][0]["text"], "sys");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "act now");
        assert_eq!(parts[1]["inline_data"]["data"], "QUJD");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
    }
}
