use super::ApiTransport;
use crate::{
    error::ApiError,
    models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
    services::ChatService,
};
use async_trait::async_trait;

#[derive(Clone)]
pub struct ChatClient {
    transport: ApiTransport,
}

impl ChatClient {
    pub(crate) fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    pub fn model(&self) -> &str {
        &self.transport.config.chat_model
    }

    pub async fn create(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiError> {
        log::info!("Invoking chat model: {}", request.model);
        self.transport.post_json("chat/completions", request).await
    }

    /// Sends a single user message and returns the first choice's content.
    pub async fn ask(&self, prompt: &str) -> Result<String, ApiError> {
        let request = ChatCompletionRequest {
            model: self.model().to_string(),
            messages: vec![ChatMessage::user(prompt)],
        };

        let response = self.create(&request).await?;
        if let Some(reason) = response.choices.first().and_then(|c| c.finish_reason.as_deref()) {
            log::debug!("Chat finish reason: {}", reason);
        }

        response
            .first_content()
            .map(String::from)
            .ok_or_else(|| ApiError::Malformed("chat completion returned no message content".into()))
    }
}

#[async_trait]
impl ChatService for ChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        self.ask(prompt).await
    }
}
