//! Generative model providers

use async_trait::async_trait;

use crate::error::Error;
use crate::request::{Credential, PromptSpec};

pub mod gemini;

// Re-export for convenience
pub use gemini::{GeminiClient, GeminiConnector};

/// A model client able to fill one prompt's output field
#[async_trait]
pub trait ModelClient: Send + Sync
{   /// Issue one request and return the declared field's text
    async fn generate(&self, spec: &PromptSpec) -> Result<String, Error>;
}

/// Builds a short-lived client scoped to a single credential
pub trait Connector: Send + Sync
{   fn connect(&self, credential: &Credential) -> Box<dyn ModelClient>;
}
