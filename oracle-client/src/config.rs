//! Oracle configuration: credentials and model selection from the
//! environment.

use anyhow::{Context, Result};
use std::env;

/// Configuration for the OpenAI-backed oracle.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl OracleConfig {
    /// Loads from environment variables. A missing `OPENAI_API_KEY` is a
    /// startup-fatal configuration error: the service must not accept
    /// requests without the credential.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;
        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = env::var("MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }
}
