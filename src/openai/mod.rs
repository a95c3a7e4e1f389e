pub mod chat_client;
pub mod image_client;

use crate::{
    config::OpenAiConfig,
    error::{ApiError, Result, ThumbnailError},
    models::ApiErrorBody,
};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

pub use chat_client::ChatClient;
pub use image_client::ImageClient;

/// Authenticated JSON transport shared by the sub-clients.
#[derive(Clone)]
pub(crate) struct ApiTransport {
    http: Client,
    config: Arc<OpenAiConfig>,
    api_key: Arc<str>,
}

impl ApiTransport {
    pub(crate) async fn post_json<Req, Resp>(
        &self,
        path: &str,
        body: &Req,
    ) -> std::result::Result<Resp, ApiError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&*self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => body.error.message,
                Err(_) if text.trim().is_empty() => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
                Err(_) => text,
            };
            log::debug!("{} returned {}: {}", path, status.as_u16(), message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

/// Entry point for the two OpenAI endpoints this crate talks to.
#[derive(Clone)]
pub struct OpenAiClient {
    chat_client: ChatClient,
    image_client: ImageClient,
}

impl OpenAiClient {
    /// Fails with `MissingCredential` before any network traffic if the key is absent.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let api_key: Arc<str> = Arc::from(config.require_api_key()?);

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ThumbnailError::Config(format!("failed to build HTTP client: {}", e)))?;

        let transport = ApiTransport {
            http,
            config: Arc::new(config),
            api_key,
        };

        Ok(Self {
            chat_client: ChatClient::new(transport.clone()),
            image_client: ImageClient::new(transport),
        })
    }

    pub fn chat(&self) -> &ChatClient {
        &self.chat_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_credential() {
        let result = OpenAiClient::new(OpenAiConfig::new());
        assert!(matches!(result, Err(ThumbnailError::MissingCredential(_))));

        let result = OpenAiClient::new(OpenAiConfig::new().with_api_key(""));
        assert!(matches!(result, Err(ThumbnailError::MissingCredential(_))));
    }

    #[test]
    fn test_new_with_credential() {
        let client = OpenAiClient::new(OpenAiConfig::new().with_api_key("sk-test")).unwrap();
        assert_eq!(client.chat().model(), "gpt-3.5-turbo");
        assert!(client.image().model().is_none());
    }
}
