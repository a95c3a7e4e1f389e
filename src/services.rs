//! Seams between the workflow and the remote endpoints.
//!
//! `ConceptLister` and `ImagePipeline` only see these traits, so tests can swap
//! the OpenAI clients for in-process fakes.

use crate::{
    error::ApiError,
    models::{GeneratedImage, ImageGenerationRequest},
};
use async_trait::async_trait;

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Sends one user prompt and returns the model's reply text.
    async fn complete(&self, prompt: &str) -> Result<String, ApiError>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<GeneratedImage, ApiError>;
}
