use crate::error::{Result, ThumbnailError};
use crate::models::{ImageResponseFormat, ImageSize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OUTPUT_DIR: &str = "images";
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

pub const DEFAULT_CONCEPT_PROMPT: &str = "As I Software Developer, I want to know the 10 most important Computer Science Concepts. I want just the concept title like 'Data structures' or 'Networks', for example. Please provide the answer in the following format:\n\n1 - Concept 1\n2 - Concept 2\n...\n10 - Concept 10";

/// `{concept}` is replaced verbatim with the concept name.
pub const DEFAULT_IMAGE_PROMPT: &str = "Thumbnail for the Computer Science class about {concept}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failed concept and skip the rest.
    #[default]
    FailFast,
    /// Attempt every concept and report failures at the end.
    Continue,
}

impl FromStr for FailurePolicy {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" | "failfast" => Ok(FailurePolicy::FailFast),
            "continue" | "best-effort" => Ok(FailurePolicy::Continue),
            other => Err(ThumbnailError::Config(format!(
                "unknown failure policy '{}', expected 'fail-fast' or 'continue'",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub image_model: Option<String>,
    pub timeout: Option<Duration>,
}

// Hand-written so the key never ends up in a log line.
impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("image_model", &self.image_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: None,
            timeout: None,
        }
    }
}

impl OpenAiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = OpenAiConfig::default();
        config.api_key = lookup(API_KEY_VAR);
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = lookup("OPENAI_CHAT_MODEL") {
            config.chat_model = model;
        }
        config.image_model = lookup("OPENAI_IMAGE_MODEL");
        if let Some(secs) = lookup("OPENAI_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ThumbnailError::Config(format!("OPENAI_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the API key, or `MissingCredential` if it is absent or blank.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ThumbnailError::MissingCredential(API_KEY_VAR.to_string())),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    pub image_size: ImageSize,
    pub response_format: ImageResponseFormat,
    pub failure_policy: FailurePolicy,
    pub expected_concepts: Option<usize>,
    pub concept_prompt: String,
    pub image_prompt: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            image_size: ImageSize::default(),
            response_format: ImageResponseFormat::default(),
            failure_policy: FailurePolicy::default(),
            expected_concepts: None,
            concept_prompt: DEFAULT_CONCEPT_PROMPT.to_string(),
            image_prompt: DEFAULT_IMAGE_PROMPT.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = PipelineConfig::default();
        if let Some(dir) = lookup("THUMBNAIL_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(size) = lookup("THUMBNAIL_IMAGE_SIZE") {
            config.image_size = size.parse()?;
        }
        if let Some(format) = lookup("THUMBNAIL_RESPONSE_FORMAT") {
            config.response_format = format.parse()?;
        }
        if let Some(policy) = lookup("THUMBNAIL_FAILURE_POLICY") {
            config.failure_policy = policy.parse()?;
        }
        if let Some(count) = lookup("THUMBNAIL_EXPECTED_CONCEPTS") {
            let count: usize = count.trim().parse().map_err(|_| {
                ThumbnailError::Config(format!(
                    "THUMBNAIL_EXPECTED_CONCEPTS is not a number: {}",
                    count
                ))
            })?;
            config.expected_concepts = Some(count);
        }
        Ok(config)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_image_size(mut self, size: ImageSize) -> Self {
        self.image_size = size;
        self
    }

    pub fn with_response_format(mut self, format: ImageResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_expected_concepts(mut self, count: usize) -> Self {
        self.expected_concepts = Some(count);
        self
    }

    pub fn with_concept_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.concept_prompt = prompt.into();
        self
    }

    pub fn with_image_prompt(mut self, template: impl Into<String>) -> Self {
        self.image_prompt = template.into();
        self
    }

    pub fn image_prompt_for(&self, concept: &str) -> String {
        self.image_prompt.replace("{concept}", concept)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub pipeline: PipelineConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Ok(Config {
            openai: OpenAiConfig::from_env()?,
            pipeline: PipelineConfig::from_env()?,
        })
    }

    pub fn with_openai(mut self, config: OpenAiConfig) -> Self {
        self.openai = config;
        self
    }

    pub fn with_pipeline(mut self, config: PipelineConfig) -> Self {
        self.pipeline = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.openai.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.pipeline.output_dir, PathBuf::from("images"));
        assert_eq!(config.pipeline.image_size, ImageSize::S1024x1024);
        assert_eq!(config.pipeline.response_format, ImageResponseFormat::Url);
        assert_eq!(config.pipeline.failure_policy, FailurePolicy::FailFast);
        assert!(config.pipeline.expected_concepts.is_none());
        assert!(config.openai.timeout.is_none());
    }

    #[test]
    fn test_missing_or_blank_key_is_rejected() {
        let missing = OpenAiConfig::new();
        assert!(matches!(
            missing.require_api_key(),
            Err(ThumbnailError::MissingCredential(var)) if var == "OPENAI_API_KEY"
        ));

        let blank = OpenAiConfig::new().with_api_key("   ");
        assert!(blank.require_api_key().is_err());

        let present = OpenAiConfig::new().with_api_key("sk-test");
        assert_eq!(present.require_api_key().ok(), Some("sk-test"));
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let openai = OpenAiConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_BASE_URL", "http://localhost:9999/v1/"),
            ("OPENAI_IMAGE_MODEL", "dall-e-3"),
            ("OPENAI_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(openai.api_key.as_deref(), Some("sk-env"));
        assert_eq!(openai.image_model.as_deref(), Some("dall-e-3"));
        assert_eq!(openai.timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            openai.endpoint("/chat/completions"),
            "http://localhost:9999/v1/chat/completions"
        );

        let pipeline = PipelineConfig::from_lookup(lookup(&[
            ("THUMBNAIL_OUTPUT_DIR", "out/thumbs"),
            ("THUMBNAIL_IMAGE_SIZE", "512x512"),
            ("THUMBNAIL_RESPONSE_FORMAT", "b64_json"),
            ("THUMBNAIL_FAILURE_POLICY", "continue"),
            ("THUMBNAIL_EXPECTED_CONCEPTS", "10"),
        ]))
        .unwrap();
        assert_eq!(pipeline.output_dir, PathBuf::from("out/thumbs"));
        assert_eq!(pipeline.image_size, ImageSize::S512x512);
        assert_eq!(pipeline.response_format, ImageResponseFormat::B64Json);
        assert_eq!(pipeline.failure_policy, FailurePolicy::Continue);
        assert_eq!(pipeline.expected_concepts, Some(10));
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = PipelineConfig::from_lookup(lookup(&[("THUMBNAIL_FAILURE_POLICY", "retry")]))
            .unwrap_err();
        assert!(matches!(err, ThumbnailError::Config(_)));

        let err = OpenAiConfig::from_lookup(lookup(&[("OPENAI_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ThumbnailError::Config(_)));
    }

    #[test]
    fn test_image_prompt_embeds_concept_verbatim() {
        let config = PipelineConfig::new();
        assert_eq!(
            config.image_prompt_for("Data structures"),
            "Thumbnail for the Computer Science class about Data structures"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = OpenAiConfig::new().with_api_key("sk-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
