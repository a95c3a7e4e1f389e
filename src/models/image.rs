use crate::error::{Result, ThumbnailError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Square sizes accepted by the image generation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "256x256")]
    S256x256,
    #[serde(rename = "512x512")]
    S512x512,
    #[default]
    #[serde(rename = "1024x1024")]
    S1024x1024,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::S256x256 => "256x256",
            ImageSize::S512x512 => "512x512",
            ImageSize::S1024x1024 => "1024x1024",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "256x256" => Ok(ImageSize::S256x256),
            "512x512" => Ok(ImageSize::S512x512),
            "1024x1024" => Ok(ImageSize::S1024x1024),
            other => Err(ThumbnailError::Config(format!(
                "unsupported image size '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageResponseFormat {
    #[default]
    Url,
    B64Json,
}

impl FromStr for ImageResponseFormat {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "url" => Ok(ImageResponseFormat::Url),
            "b64_json" => Ok(ImageResponseFormat::B64Json),
            other => Err(ThumbnailError::Config(format!(
                "unsupported response format '{}', expected 'url' or 'b64_json'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub prompt: String,
    pub n: u8,
    pub size: ImageSize,
    pub response_format: ImageResponseFormat,
}

impl ImageGenerationRequest {
    /// One image per request, which is all the pipeline ever asks for.
    pub fn single(prompt: impl Into<String>, size: ImageSize, format: ImageResponseFormat) -> Self {
        Self {
            model: None,
            prompt: prompt.into(),
            n: 1,
            size,
            response_format: format,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub created: i64,
    pub data: Vec<ImageData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

/// A freshly generated image, before it has been written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedImage {
    Url(String),
    Base64(String),
}

impl GeneratedImage {
    pub fn describe(&self) -> String {
        match self {
            GeneratedImage::Url(url) => url.clone(),
            GeneratedImage::Base64(data) => format!("<inline b64_json, {} chars>", data.len()),
        }
    }
}
