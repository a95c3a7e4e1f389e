use super::ApiTransport;
use crate::{
    error::ApiError,
    models::{GeneratedImage, ImageGenerationRequest, ImageGenerationResponse},
    services::ImageGenerationService,
};
use async_trait::async_trait;

#[derive(Clone)]
pub struct ImageClient {
    transport: ApiTransport,
}

impl ImageClient {
    pub(crate) fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    pub fn model(&self) -> Option<&str> {
        self.transport.config.image_model.as_deref()
    }

    pub async fn create(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ApiError> {
        log::info!(
            "Generating image with model: {}",
            request.model.as_deref().unwrap_or("default")
        );
        self.transport.post_json("images/generations", request).await
    }

    /// Issues the request and returns the first image it produced.
    pub async fn generate(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<GeneratedImage, ApiError> {
        let request = if request.model.is_none() {
            request.with_model(self.model().map(String::from))
        } else {
            request
        };

        let response = self.create(&request).await?;
        let first = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Malformed("No images generated".into()))?;

        if let Some(revised) = &first.revised_prompt {
            log::debug!("Revised prompt: {}", revised);
        }

        match (first.url, first.b64_json) {
            (Some(url), _) => Ok(GeneratedImage::Url(url)),
            (None, Some(data)) => Ok(GeneratedImage::Base64(data)),
            (None, None) => Err(ApiError::Malformed(
                "image data carried neither url nor b64_json".into(),
            )),
        }
    }
}

#[async_trait]
impl ImageGenerationService for ImageClient {
    async fn generate_image(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<GeneratedImage, ApiError> {
        self.generate(request).await
    }
}
