//! Completion Providers
//!
//! One provider-agnostic capability -- `complete(system, prompt, image)` --
//! implemented for each of the supported vision APIs. Reactive and
//! strategic cadences reuse the same provider with different prompts.
//!
//! Every client carries an explicit request timeout so a hung completion
//! call fails the cycle instead of silently stalling its worker.

pub mod anthropic;
pub mod gemini;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::PilotError;
use crate::types::ProviderKind;

/// Ceiling on a single completion call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Token budget per completion. Instruction blocks are short; the
/// strategic analysis around them needs some headroom.
pub(crate) const MAX_COMPLETION_TOKENS: u32 = 2048;

/// A vision-capable completion API.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// One completion call: system prompt, user prompt, and a base64 PNG
    /// of the current screen. Returns the raw response text.
    async fn complete(&self, system_prompt: &str, prompt: &str, image_b64: &str)
        -> Result<String>;
}

/// Build the configured provider, reading its API key from the
/// conventional environment variable. A missing key is a configuration
/// error: it aborts startup before any worker launches.
pub fn create_provider(
    kind: ProviderKind,
    model: &str,
) -> Result<Arc<dyn CompletionProvider>, PilotError> {
    let api_key = std::env::var(kind.api_key_env()).map_err(|_| {
        PilotError::config(format!(
            "{} is not set (required for provider `{}`)",
            kind.api_key_env(),
            kind
        ))
    })?;

    let provider: Arc<dyn CompletionProvider> = match kind {
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(api_key, model.to_string())),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(api_key, model.to_string())),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(api_key, model.to_string())),
    };
    Ok(provider)
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("reqwest client construction cannot fail with these options")
}
