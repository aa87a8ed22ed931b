//! Language-model provider clients for dbqa.
//!
//! Concrete implementations of the `ChatModel` capability from `dbqa-core`
//! for hosted providers:
//!
//! - **Gemini** - Google's Gemini models (provider name `google_genai`)
//! - **OpenAI** - OpenAI chat models (provider name `openai`)
//!
//! Both clients support structured output, where the model response is
//! constrained to a caller-supplied JSON schema.
//!
//! # Example
//!
//! ```rust,ignore
//! use dbqa_llm::{build_model, ProviderConfig, GEMINI_BASE_URL};
//!
//! let config = ProviderConfig::from_env(
//!     "GOOGLE_API_KEY",
//!     GEMINI_BASE_URL,
//!     "gemini-2.5-flash",
//! )?;
//! let model = build_model("google_genai", config)?;
//!
//! let answer = model.generate("What is SQL?").await?;
//! ```

pub mod config;
pub mod error;
pub mod gemini;
pub mod openai;

use std::sync::Arc;

use dbqa_core::ChatModel;

pub use config::ProviderConfig;
pub use error::{LlmError, Result};
pub use gemini::{GeminiClient, GEMINI_BASE_URL};
pub use openai::{OpenAiClient, OPENAI_BASE_URL};

/// Default base URL for a provider name, or `None` when the provider is
/// unknown.
pub fn default_base_url(provider: &str) -> Option<&'static str> {
    match provider {
        "google_genai" => Some(GEMINI_BASE_URL),
        "openai" => Some(OPENAI_BASE_URL),
        _ => None,
    }
}

/// Environment variable holding the credential for a provider name.
pub fn api_key_var(provider: &str) -> Option<&'static str> {
    match provider {
        "google_genai" => Some("GOOGLE_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        _ => None,
    }
}

/// Build a shared model client for the given provider name.
pub fn build_model(provider: &str, config: ProviderConfig) -> Result<Arc<dyn ChatModel>> {
    match provider {
        "google_genai" => Ok(Arc::new(GeminiClient::new(config)?)),
        "openai" => Ok(Arc::new(OpenAiClient::new(config)?)),
        other => Err(LlmError::UnsupportedProvider(other.to_string())),
    }
}
