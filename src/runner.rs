use crate::{
    concepts::ConceptLister,
    config::Config,
    error::{Result, ThumbnailError},
    models::{ConceptList, PipelineReport},
    openai::OpenAiClient,
    output::OutputDirectory,
    pipeline::ImagePipeline,
};
use reqwest::Client;
use uuid::Uuid;

/// Everything one run produced: the concepts it discovered and what happened to each.
#[derive(Debug)]
pub struct RunSummary {
    pub concepts: ConceptList,
    pub report: PipelineReport,
}

/// Lists concepts, prepares the output directory, then runs the image pipeline.
///
/// Errors before the pipeline starts (credential, chat call, concept count, output
/// directory) are returned directly and leave the output directory untouched when
/// they happen before it is prepared. Per-concept failures are in the report.
pub async fn run(config: &Config, run_id: Uuid) -> Result<RunSummary> {
    let client = OpenAiClient::new(config.openai.clone())?;

    let concepts = ConceptLister::from_config(client.chat(), &config.pipeline)
        .list()
        .await?;
    log::info!(
        "📚 The {} most important Computer Science Concepts are: {}",
        concepts.len(),
        concepts
    );

    OutputDirectory::new(&config.pipeline.output_dir)
        .prepare()
        .await?;

    let downloads = download_client(config)?;
    let report = ImagePipeline::new(client.image(), downloads, &config.pipeline)
        .run(&concepts, run_id)
        .await;

    Ok(RunSummary { concepts, report })
}

fn download_client(config: &Config) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.openai.timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ThumbnailError::Config(format!("failed to build download client: {}", e)))
}
