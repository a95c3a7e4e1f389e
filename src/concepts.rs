use crate::{
    config::{PipelineConfig, DEFAULT_CONCEPT_PROMPT},
    error::{Result, ThumbnailError},
    models::ConceptList,
    services::ChatService,
};

/// Splits a numbered-list reply into one entry per line.
///
/// Line `i` (1-based) is trimmed, then a literal `"<i> - "` prefix is removed if present.
/// Lines whose prefix doesn't match are kept as they are, and blank lines are kept too,
/// so the output always has one entry per input line.
pub fn parse_numbered_list(text: &str) -> Vec<String> {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| {
            let line = line.trim();
            let prefix = format!("{} - ", i + 1);
            line.strip_prefix(prefix.as_str()).unwrap_or(line).to_string()
        })
        .collect()
}

pub struct ConceptLister<'a> {
    chat: &'a dyn ChatService,
    prompt: String,
    expected: Option<usize>,
}

impl<'a> ConceptLister<'a> {
    pub fn new(chat: &'a dyn ChatService) -> Self {
        Self {
            chat,
            prompt: DEFAULT_CONCEPT_PROMPT.to_string(),
            expected: None,
        }
    }

    pub fn from_config(chat: &'a dyn ChatService, config: &PipelineConfig) -> Self {
        Self {
            chat,
            prompt: config.concept_prompt.clone(),
            expected: config.expected_concepts,
        }
    }

    pub fn with_expected_count(mut self, count: usize) -> Self {
        self.expected = Some(count);
        self
    }

    /// One chat request, no retry. Blank lines in the reply are dropped.
    pub async fn list(&self) -> Result<ConceptList> {
        log::info!("🔄 Asking the chat model for concepts...");

        let reply = self
            .chat
            .complete(&self.prompt)
            .await
            .map_err(ThumbnailError::Request)?;
        log::debug!("Chat reply: {:?}", reply);

        let parsed = parse_numbered_list(&reply);
        let total_lines = parsed.len();
        let concepts: Vec<String> = parsed.into_iter().filter(|c| !c.is_empty()).collect();
        if concepts.len() != total_lines {
            log::debug!(
                "Dropped {} blank line(s) from the chat reply",
                total_lines - concepts.len()
            );
        }

        if let Some(expected) = self.expected {
            if concepts.len() != expected {
                return Err(ThumbnailError::ConceptCount {
                    expected,
                    actual: concepts.len(),
                });
            }
        }

        Ok(ConceptList::new(concepts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedChat {
        reply: std::result::Result<String, u16>,
        calls: AtomicUsize,
    }

    impl CannedChat {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn status(status: u16) -> Self {
            Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatService for CannedChat {
        async fn complete(&self, _prompt: &str) -> std::result::Result<String, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(status) => Err(ApiError::Status {
                    status: *status,
                    message: "Incorrect API key provided".to_string(),
                }),
            }
        }
    }

    const TEN: &str = "1 - Algorithms\n2 - Data structures\n3 - Networks\n4 - Operating systems\n5 - Databases\n6 - Compilers\n7 - Computer architecture\n8 - Security\n9 - Distributed systems\n10 - Machine learning";

    #[test]
    fn test_parse_ten_numbered_lines() {
        let concepts = parse_numbered_list(TEN);
        assert_eq!(concepts.len(), 10);
        assert_eq!(concepts[0], "Algorithms");
        assert_eq!(concepts[1], "Data structures");
        assert_eq!(concepts[9], "Machine learning");
        for concept in &concepts {
            assert!(!concept.starts_with(char::is_numeric));
            assert_eq!(concept.trim(), concept);
        }
    }

    #[test]
    fn test_parse_is_idempotent_on_clean_input() {
        let clean = "Algorithms\nNetworks";
        assert_eq!(parse_numbered_list(clean), vec!["Algorithms", "Networks"]);

        let once = parse_numbered_list(TEN).join("\n");
        assert_eq!(parse_numbered_list(&once).join("\n"), once);
    }

    #[test]
    fn test_parse_keeps_mismatched_prefix() {
        // The second line claims "3", which does not match its position.
        let concepts = parse_numbered_list("1 - Algorithms\n3 - Networks\n3. Compilers");
        assert_eq!(concepts, vec!["Algorithms", "3 - Networks", "3. Compilers"]);
    }

    #[test]
    fn test_parse_trims_whitespace_and_crlf() {
        let concepts = parse_numbered_list("  1 - Algorithms  \r\n\t2 - Networks\r\n");
        assert_eq!(concepts, vec!["Algorithms", "Networks", ""]);
    }

    #[tokio::test]
    async fn test_list_drops_blank_lines() {
        let chat = CannedChat::ok("1 - Algorithms\n2 - Networks\n\n");
        let concepts = ConceptLister::new(&chat).list().await.unwrap();
        assert_eq!(concepts.as_slice(), ["Algorithms", "Networks"]);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_list_wraps_remote_failure_without_retry() {
        let chat = CannedChat::status(401);
        let err = ConceptLister::new(&chat).list().await.unwrap_err();
        assert!(matches!(
            err,
            ThumbnailError::Request(ApiError::Status { status: 401, .. })
        ));
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expected_count_is_enforced_when_set() {
        let chat = CannedChat::ok("1 - Algorithms\n2 - Networks");

        let err = ConceptLister::new(&chat)
            .with_expected_count(10)
            .list()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ThumbnailError::ConceptCount {
                expected: 10,
                actual: 2
            }
        ));

        let ok = ConceptLister::new(&chat)
            .with_expected_count(2)
            .list()
            .await
            .unwrap();
        assert_eq!(ok.len(), 2);
    }
}
