use crate::{
    config::{FailurePolicy, PipelineConfig},
    error::{ApiError, Result, ThumbnailError},
    logger,
    models::{ConceptList, GeneratedImage, ImageGenerationRequest, OutcomeStatus, PipelineReport},
    output::FileNamer,
    services::ImageGenerationService,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::{fs::File, io::AsyncWriteExt};
use uuid::Uuid;

/// Generates, downloads and saves one image per concept, strictly in list order.
pub struct ImagePipeline<'a> {
    images: &'a dyn ImageGenerationService,
    http: Client,
    config: &'a PipelineConfig,
}

impl<'a> ImagePipeline<'a> {
    /// `http` is used only for downloads and must not carry API credentials.
    pub fn new(images: &'a dyn ImageGenerationService, http: Client, config: &'a PipelineConfig) -> Self {
        Self {
            images,
            http,
            config,
        }
    }

    /// Runs every concept and reports each outcome. Never returns early with an
    /// error; under `FailFast` the concepts after the first failure are marked skipped.
    pub async fn run(&self, concepts: &ConceptList, run_id: Uuid) -> PipelineReport {
        let mut report = PipelineReport::new(run_id);
        let mut namer = FileNamer::new(&self.config.output_dir);
        let mut stopped = false;

        for (index, concept) in concepts.iter().enumerate() {
            if stopped {
                report.record(index, concept, OutcomeStatus::Skipped);
                continue;
            }

            log::info!("🎨 Generating image for concept {}", concept);
            let _timer = logger::timer(concept);

            match self.process(index, concept, &mut namer).await {
                Ok((path, bytes)) => {
                    log::info!("💾 Saved {} ({} bytes)", path.display(), bytes);
                    report.record(index, concept, OutcomeStatus::Saved { path, bytes });
                }
                Err(err) => {
                    log::debug!("Concept '{}' failed at {}: {}", concept, err.stage(), err);
                    report.record(index, concept, OutcomeStatus::Failed(err));
                    if self.config.failure_policy == FailurePolicy::FailFast {
                        stopped = true;
                    }
                }
            }
        }

        if report.skipped_count() > 0 {
            log::warn!(
                "⚠️  Stopped after the first failure, {} concept(s) skipped",
                report.skipped_count()
            );
        }

        report.finish();
        report
    }

    async fn process(
        &self,
        index: usize,
        concept: &str,
        namer: &mut FileNamer,
    ) -> Result<(PathBuf, u64)> {
        let request = ImageGenerationRequest::single(
            self.config.image_prompt_for(concept),
            self.config.image_size,
            self.config.response_format,
        );

        let image = self
            .images
            .generate_image(request)
            .await
            .map_err(|source| ThumbnailError::ImageGeneration {
                concept: concept.to_string(),
                source,
            })?;
        log::debug!("Image for '{}': {}", concept, image.describe());

        match image {
            GeneratedImage::Url(url) => {
                let response = self.open_download(&url).await?;
                let path = namer.path_for(concept, index);
                let bytes = stream_to_file(response, &url, &path).await?;
                Ok((path, bytes))
            }
            GeneratedImage::Base64(data) => {
                let decoded = STANDARD.decode(data.trim()).map_err(|e| {
                    ThumbnailError::ImageGeneration {
                        concept: concept.to_string(),
                        source: ApiError::Malformed(format!("invalid b64_json payload: {}", e)),
                    }
                })?;
                let path = namer.path_for(concept, index);
                let bytes = write_file(&decoded, &path).await?;
                Ok((path, bytes))
            }
        }
    }

    async fn open_download(&self, url: &str) -> Result<reqwest::Response> {
        let download_error = |source: ApiError| ThumbnailError::Download {
            url: url.to_string(),
            source,
        };

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            let message = status.canonical_reason().unwrap_or("download failed").to_string();
            return Err(download_error(ApiError::Status {
                status: status.as_u16(),
                message,
            }));
        }
        Ok(response)
    }
}

async fn create_file(path: &Path) -> Result<File> {
    File::create(path)
        .await
        .map_err(|source| ThumbnailError::FileCreation {
            path: path.to_path_buf(),
            source,
        })
}

/// Copies the body chunk by chunk. A failed read mid-stream leaves a truncated file.
async fn stream_to_file(mut response: reqwest::Response, url: &str, path: &Path) -> Result<u64> {
    let mut file = create_file(path).await?;
    let write_error = |source: std::io::Error| ThumbnailError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ThumbnailError::Download {
            url: url.to_string(),
            source: e.into(),
        })?
    {
        file.write_all(&chunk).await.map_err(write_error)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(write_error)?;
    Ok(written)
}

async fn write_file(bytes: &[u8], path: &Path) -> Result<u64> {
    let mut file = create_file(path).await?;
    let write_error = |source: std::io::Error| ThumbnailError::Write {
        path: path.to_path_buf(),
        source,
    };
    file.write_all(bytes).await.map_err(write_error)?;
    file.flush().await.map_err(write_error)?;
    Ok(bytes.len() as u64)
}
