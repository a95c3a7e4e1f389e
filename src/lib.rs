//! Asks a chat model for the most important Computer Science concepts and saves a
//! generated thumbnail for each of them.
//!
//! ```no_run
//! # async fn demo() -> concept_thumbnails::Result<()> {
//! use concept_thumbnails::{Config, OpenAiConfig};
//!
//! let config = Config::new().with_openai(OpenAiConfig::new().with_api_key("sk-..."));
//! let summary = concept_thumbnails::run(&config, uuid::Uuid::new_v4()).await?;
//! let paths = summary.report.into_result()?;
//! println!("{} images written", paths.len());
//! # Ok(())
//! # }
//! ```

pub mod concepts;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod openai;
pub mod output;
pub mod pipeline;
pub mod runner;
pub mod services;

pub use concepts::{parse_numbered_list, ConceptLister};
pub use config::{Config, FailurePolicy, OpenAiConfig, PipelineConfig};
pub use error::{ApiError, Result, ThumbnailError};
pub use models::{
    ConceptList, ConceptOutcome, GeneratedImage, ImageGenerationRequest, ImageResponseFormat,
    ImageSize, OutcomeStatus, PipelineReport,
};
pub use openai::{ChatClient, ImageClient, OpenAiClient};
pub use output::{sanitize_file_stem, FileNamer, OutputDirectory};
pub use pipeline::ImagePipeline;
pub use runner::{run, RunSummary};
pub use services::{ChatService, ImageGenerationService};
