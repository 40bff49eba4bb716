//! Outbound provider clients and the seams the planner talks through.

pub mod cloudinary;
pub mod gemini_client;
pub mod maps;
pub mod prompt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GenerationError;

pub use cloudinary::CloudinaryClient;
pub use gemini_client::GeminiClient;

/// A single schema-constrained generation call.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub model: String,
    pub prompt: String,
    /// Response schema in the provider's dialect.
    pub response_schema: Value,
}

/// Generative-text provider returning JSON text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_json(&self, request: &StructuredRequest) -> Result<String, GenerationError>;
}

/// Image-generation provider returning base64-encoded image bytes.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
}

/// Image hosting returning the public URL of an upload.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload_data_uri(&self, data_uri: &str, folder: &str)
        -> Result<String, GenerationError>;
}
