//! OpenAI chat-completions API client (vision).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{http_client, CompletionProvider, MAX_COMPLETION_TOKENS};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiProvider {
    api_key: String,
    model: String,
    http: Client,
}

impl OpenAiProvider {
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
        "messages": [
            { "role": "system", "content": system_prompt },
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    {
                        "type": "image_url",
                        "image_url": {
                            "url": format!("data:image/png;base64,{}", image_b64),
                        },
                    },
                ],
            },
        ],
    })
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
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
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("openai request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("openai error: {}: {}", status.as_u16(), text);
        }

        let data: Value = resp
            .json()
            .await
            .context("failed to parse openai response")?;

        let text = data["choices"][0]["message"]["content"]
            .as_str()
            .context("no message content in openai response")?
            .to_string();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_embeds_image_as_data_url() {
        let body = build_body("gpt-4o", "sys", "act now", "QUJD");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "sys");
        let user = &body["messages"][1]["content"];
        assert_eq!(user[0]["text"], "act now");
        assert_eq!(
            user[1]["image_url"]["url"],
            "data:image/png;base64,QUJD"
        );
    }
}
