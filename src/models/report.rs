use crate::config::FailurePolicy;
use crate::error::{Result, ThumbnailError};
use log::Level;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug)]
pub enum OutcomeStatus {
    Saved { path: PathBuf, bytes: u64 },
    Failed(ThumbnailError),
    /// Never attempted because an earlier concept failed under fail-fast.
    Skipped,
}

#[derive(Debug)]
pub struct ConceptOutcome {
    pub index: usize,
    pub concept: String,
    pub status: OutcomeStatus,
}

impl ConceptOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.status, OutcomeStatus::Saved { .. })
    }
}

#[derive(Debug)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcomes: Vec<ConceptOutcome>,
}

impl PipelineReport {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, index: usize, concept: &str, status: OutcomeStatus) {
        self.outcomes.push(ConceptOutcome {
            index,
            concept: concept.to_string(),
            status,
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn saved(&self) -> impl Iterator<Item = &ConceptOutcome> {
        self.outcomes.iter().filter(|o| o.is_saved())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ThumbnailError)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            OutcomeStatus::Failed(err) => Some((o.concept.as_str(), err)),
            _ => None,
        })
    }

    pub fn saved_count(&self) -> usize {
        self.saved().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Skipped))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0 && self.skipped_count() == 0
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }

    /// Per-concept lines for the console.
    ///
    /// Saved images are always listed. Failures and skips are only listed under
    /// `Continue`; a fail-fast run has one failure and it is reported once, by the caller.
    pub fn console_lines(&self, policy: FailurePolicy) -> Vec<(Level, String)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match &outcome.status {
                OutcomeStatus::Saved { path, bytes } => Some((
                    Level::Info,
                    format!("   ✅ {} -> {} ({} bytes)", outcome.concept, path.display(), bytes),
                )),
                OutcomeStatus::Failed(err) if policy == FailurePolicy::Continue => Some((
                    Level::Warn,
                    format!("   ❌ {} [{}]: {}", outcome.concept, err.stage(), err),
                )),
                OutcomeStatus::Skipped if policy == FailurePolicy::Continue => Some((
                    Level::Warn,
                    format!("   ⏭️  {} skipped", outcome.concept),
                )),
                _ => None,
            })
            .collect()
    }

    /// Paths of every saved image, or the first failure in list order.
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(self.outcomes.len());
        for outcome in self.outcomes {
            match outcome.status {
                OutcomeStatus::Saved { path, .. } => paths.push(path),
                OutcomeStatus::Failed(err) => return Err(err),
                OutcomeStatus::Skipped => {}
            }
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_into_result_returns_first_failure() {
        let mut report = PipelineReport::new(Uuid::new_v4());
        report.record(
            0,
            "Algorithms",
            OutcomeStatus::Saved {
                path: PathBuf::from("images/Algorithms.png"),
                bytes: 4,
            },
        );
        report.record(
            1,
            "Networks",
            OutcomeStatus::Failed(ThumbnailError::Download {
                url: "https://cdn.example/n.png".to_string(),
                source: ApiError::Status {
                    status: 404,
                    message: "not found".to_string(),
                },
            }),
        );
        report.record(2, "Compilers", OutcomeStatus::Skipped);
        report.finish();

        assert_eq!(report.saved_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert!(!report.is_success());
        assert!(report.duration_ms().is_some());

        let err = report.into_result().unwrap_err();
        assert_eq!(err.stage(), "download");
    }

    fn report_with_failure() -> PipelineReport {
        let mut report = PipelineReport::new(Uuid::new_v4());
        report.record(
            0,
            "Algorithms",
            OutcomeStatus::Saved {
                path: PathBuf::from("images/Algorithms.png"),
                bytes: 4,
            },
        );
        report.record(
            1,
            "Networks",
            OutcomeStatus::Failed(ThumbnailError::ImageGeneration {
                concept: "Networks".to_string(),
                source: ApiError::Status {
                    status: 400,
                    message: "rejected by safety system".to_string(),
                },
            }),
        );
        report
    }

    #[test]
    fn test_fail_fast_console_lines_leave_failure_to_caller() {
        let lines = report_with_failure().console_lines(FailurePolicy::FailFast);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::Info);
        assert!(lines.iter().all(|(_, line)| !line.contains("rejected by safety system")));
    }

    #[test]
    fn test_continue_console_lines_list_each_failure_once() {
        let lines = report_with_failure().console_lines(FailurePolicy::Continue);
        let warnings: Vec<_> = lines.iter().filter(|(level, _)| *level == Level::Warn).collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].1.contains("Networks [generate]"));
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = PipelineReport::new(Uuid::new_v4());
        assert!(report.is_success());
        assert!(report.into_result().unwrap().is_empty());
    }
}
