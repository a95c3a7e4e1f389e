use concept_thumbnails::{logger, Config, RunSummary};
use std::process::ExitCode;
use uuid::Uuid;

#[tokio::main]
async fn main() -> ExitCode {
    let env_loaded = dotenv::dotenv().is_ok();
    let run_id = Uuid::new_v4();

    if let Err(e) = logger::init_with_config(
        logger::LoggerConfig::from_env().with_run_id(run_id.to_string()),
    ) {
        eprintln!("{}", e);
    }

    if env_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using process environment");
    }

    match execute(run_id).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(run_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    log::debug!("Configuration: {:?}", config);

    let RunSummary { report, .. } = concept_thumbnails::run(&config, run_id).await?;

    for (level, line) in report.console_lines(config.pipeline.failure_policy) {
        log::log!(level, "{}", line);
    }
    if let Some(ms) = report.duration_ms() {
        log::info!(
            "📊 {} saved, {} failed, {} skipped in {}ms",
            report.saved_count(),
            report.failed_count(),
            report.skipped_count(),
            ms
        );
    }

    report.into_result()?;
    log::info!(
        "🎉 Images generated and saved in the {} directory",
        config.pipeline.output_dir.display()
    );
    Ok(())
}
