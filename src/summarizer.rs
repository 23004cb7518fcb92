//! Review summarization pipeline.
//!
//! Coordinates the entire process for one product: video search, transcript
//! collection, prompt assembly and the chat query.

use crate::chat::ChatProvider;
use crate::config::TemplateSource;
use crate::error::{OmtaleError, Result};
use crate::search::{SearchHit, VideoSearch};
use crate::transcript::{flatten_lines, TranscriptMap, TranscriptProvider};
use std::sync::Arc;
use tracing::{info, instrument};

/// Separator between review blocks in the assembled prompt.
const REVIEW_SEPARATOR: &str = "\n\n------------------\n\n";

/// Progress notifications emitted while the pipeline runs.
///
/// A presentation layer (CLI, GUI) subscribes with a sink; the pipeline never
/// talks to the user directly.
#[derive(Debug, Clone)]
pub enum Progress {
    /// Video search started.
    Searching { query: String },
    /// Video search finished.
    SearchComplete { hits: usize },
    /// Fetching the transcript for one search hit.
    FetchingTranscript {
        channel: String,
        current: usize,
        total: usize,
    },
    /// Assembling the summary prompt.
    AssemblingPrompt,
    /// Waiting for the chat service's reply.
    Querying,
}

/// Callback receiving [`Progress`] events.
pub type ProgressSink = Box<dyn Fn(Progress) + Send + Sync>;

/// What the pipeline has produced so far.
///
/// Each variant carries only the data valid for that stage, so stale
/// combinations (transcripts without search results, or transcripts left
/// over from a previous search) cannot be represented.
#[derive(Debug, Clone, Default)]
enum PipelineState {
    #[default]
    Empty,
    Searched {
        hits: Vec<SearchHit>,
    },
    Transcribed {
        hits: Vec<SearchHit>,
        transcripts: TranscriptMap,
    },
}

/// The review summarization pipeline.
///
/// Operations must run in order: [`fetch_search_results`], then
/// [`fetch_transcripts`], then [`assemble_prompt`]; [`run`] drives all of
/// them plus the chat query. Calling an operation before its predecessor
/// fails with [`OmtaleError::Precondition`] and leaves the state untouched.
/// Collaborator failures propagate verbatim; the pipeline performs no
/// retries, no fallback and keeps no partial results.
///
/// [`fetch_search_results`]: ReviewSummarizer::fetch_search_results
/// [`fetch_transcripts`]: ReviewSummarizer::fetch_transcripts
/// [`assemble_prompt`]: ReviewSummarizer::assemble_prompt
/// [`run`]: ReviewSummarizer::run
pub struct ReviewSummarizer {
    num_reviews: usize,
    product_type: String,
    product_name: String,
    search: Arc<dyn VideoSearch>,
    transcript_provider: Arc<dyn TranscriptProvider>,
    chat: Arc<dyn ChatProvider>,
    template: Arc<dyn TemplateSource>,
    progress: Option<ProgressSink>,
    state: PipelineState,
}

impl ReviewSummarizer {
    /// Create a pipeline for one product. `num_reviews` caps the search and
    /// is assumed to be >= 1.
    pub fn new(
        num_reviews: usize,
        product_type: impl Into<String>,
        product_name: impl Into<String>,
        search: Arc<dyn VideoSearch>,
        transcript_provider: Arc<dyn TranscriptProvider>,
        chat: Arc<dyn ChatProvider>,
        template: Arc<dyn TemplateSource>,
    ) -> Self {
        Self {
            num_reviews,
            product_type: product_type.into(),
            product_name: product_name.into(),
            search,
            transcript_provider,
            chat,
            template,
            progress: None,
            state: PipelineState::Empty,
        }
    }

    /// Install a progress sink.
    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    fn emit(&self, event: Progress) {
        if let Some(sink) = &self.progress {
            sink(event);
        }
    }

    /// The hits of the current run, if a search has completed.
    pub fn search_results(&self) -> Option<&[SearchHit]> {
        match &self.state {
            PipelineState::Empty => None,
            PipelineState::Searched { hits } | PipelineState::Transcribed { hits, .. } => {
                Some(hits)
            }
        }
    }

    /// The collected transcripts of the current run, if fetched.
    pub fn transcripts(&self) -> Option<&TranscriptMap> {
        match &self.state {
            PipelineState::Transcribed { transcripts, .. } => Some(transcripts),
            _ => None,
        }
    }

    /// Search the video platform for reviews of the product.
    ///
    /// Queries `"{product_name} review"`, capped at the requested review
    /// count, and stores the hits. Re-running replaces the whole pipeline
    /// state with a fresh search, dropping transcripts from any earlier run.
    #[instrument(skip(self), fields(product = %self.product_name))]
    pub async fn fetch_search_results(&mut self) -> Result<()> {
        let query = format!("{} review", self.product_name);

        self.emit(Progress::Searching {
            query: query.clone(),
        });

        let hits = self.search.search(&query, self.num_reviews).await?;
        info!("Search for '{}' returned {} hits", query, hits.len());

        self.emit(Progress::SearchComplete { hits: hits.len() });
        self.state = PipelineState::Searched { hits };
        Ok(())
    }

    /// Fetch and normalize the transcript of every search hit.
    ///
    /// Transcripts are keyed by channel display name; when two hits share a
    /// channel, the later one wins. Fetched sequentially, one hit at a time;
    /// the first failure aborts the step with the state unchanged.
    #[instrument(skip(self))]
    pub async fn fetch_transcripts(&mut self) -> Result<()> {
        let hits = match &self.state {
            PipelineState::Searched { hits } | PipelineState::Transcribed { hits, .. } => {
                hits.clone()
            }
            PipelineState::Empty => {
                return Err(OmtaleError::Precondition(
                    "must have search results for getting transcripts".to_string(),
                ));
            }
        };

        let total = hits.len();
        let mut transcripts = TranscriptMap::new();

        for (i, hit) in hits.iter().enumerate() {
            self.emit(Progress::FetchingTranscript {
                channel: hit.channel.clone(),
                current: i + 1,
                total,
            });

            let transcript = self.transcript_provider.fetch(&hit.id).await?;
            transcripts.insert(&hit.channel, flatten_lines(&transcript.to_text()));
        }

        info!("Collected {} transcripts", transcripts.len());
        self.state = PipelineState::Transcribed { hits, transcripts };
        Ok(())
    }

    /// Assemble the summary prompt from the template and the collected
    /// transcripts. Reads the state without mutating it.
    pub fn assemble_prompt(&self) -> Result<String> {
        let PipelineState::Transcribed { hits, transcripts } = &self.state else {
            return Err(OmtaleError::Precondition(
                "must have transcripts for prompt".to_string(),
            ));
        };

        let template = self.template.load()?;

        let mut prompt = template
            .replace("<$num$>", &hits.len().to_string())
            .replace("<$product_type$>", &self.product_type)
            .replace("<$product_name$>", &self.product_name);
        prompt.push_str("\n\n");

        for (channel, transcript) in transcripts.iter() {
            prompt.push_str(&format!(
                "Review by {}:\n\n{}{}",
                channel, transcript, REVIEW_SEPARATOR
            ));
        }

        // Strip exactly the trailing separator; with no transcripts there is
        // none to strip.
        if !transcripts.is_empty() {
            prompt.truncate(prompt.len() - REVIEW_SEPARATOR.len());
        }

        Ok(prompt)
    }

    /// Run search, transcript collection and prompt assembly, returning the
    /// prompt without querying the chat service.
    pub async fn prompt(&mut self) -> Result<String> {
        self.fetch_search_results().await?;
        self.fetch_transcripts().await?;
        self.emit(Progress::AssemblingPrompt);
        self.assemble_prompt()
    }

    /// Run the whole pipeline and return the chat service's summary.
    ///
    /// A fresh session is created per run. Straight-line composition: any
    /// failure in an earlier step propagates unhandled.
    #[instrument(skip(self), fields(product = %self.product_name))]
    pub async fn run(&mut self) -> Result<String> {
        let prompt = self.prompt().await?;

        self.emit(Progress::Querying);
        let session = self.chat.create_session().await?;
        self.chat.send_message(&session, &prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Session;
    use crate::transcript::{Transcript, TranscriptLine};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StubSearch {
        hits: Vec<SearchHit>,
    }

    #[async_trait]
    impl VideoSearch for StubSearch {
        async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
            Ok(self.hits.iter().take(max_results).cloned().collect())
        }
    }

    struct StubTranscripts {
        by_id: HashMap<String, Vec<String>>,
    }

    #[async_trait]
    impl TranscriptProvider for StubTranscripts {
        async fn fetch(&self, video_id: &str) -> Result<Transcript> {
            let lines = self.by_id.get(video_id).ok_or_else(|| {
                OmtaleError::Transcript(format!("no transcript for {}", video_id))
            })?;
            Ok(Transcript {
                video_id: video_id.to_string(),
                lines: lines
                    .iter()
                    .enumerate()
                    .map(|(i, text)| TranscriptLine {
                        text: text.clone(),
                        start_seconds: i as f64,
                    })
                    .collect(),
            })
        }
    }

    struct StubChat {
        reply: String,
        sent: Mutex<Vec<String>>,
    }

    impl StubChat {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for StubChat {
        async fn create_session(&self) -> Result<Session> {
            Ok(Session {
                organization_id: "org".to_string(),
                conversation_id: "conv".to_string(),
            })
        }

        async fn send_message(&self, _session: &Session, text: &str) -> Result<String> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(self.reply.clone())
        }
    }

    struct StaticTemplate(String);

    impl TemplateSource for StaticTemplate {
        fn load(&self) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn hit(id: &str, channel: &str) -> SearchHit {
        SearchHit {
            id: id.to_string(),
            channel: channel.to_string(),
            title: format!("{} review", channel),
        }
    }

    fn summarizer(
        num_reviews: usize,
        hits: Vec<SearchHit>,
        transcripts: &[(&str, &[&str])],
        chat: Arc<StubChat>,
        template: &str,
    ) -> ReviewSummarizer {
        let by_id = transcripts
            .iter()
            .map(|(id, lines)| {
                (
                    id.to_string(),
                    lines.iter().map(|l| l.to_string()).collect(),
                )
            })
            .collect();

        ReviewSummarizer::new(
            num_reviews,
            "gadget",
            "Widget",
            Arc::new(StubSearch { hits }),
            Arc::new(StubTranscripts { by_id }),
            chat,
            Arc::new(StaticTemplate(template.to_string())),
        )
    }

    const TEMPLATE: &str = "N=<$num$>,T=<$product_type$>,P=<$product_name$>";

    #[tokio::test]
    async fn test_search_then_transcripts_never_fails_precondition() {
        let chat = Arc::new(StubChat::new("ok"));
        let mut s = summarizer(
            2,
            vec![hit("aaaaaaaaaaa", "Ch1")],
            &[("aaaaaaaaaaa", &["hello"])],
            chat,
            TEMPLATE,
        );

        s.fetch_search_results().await.unwrap();
        s.fetch_transcripts().await.unwrap();
    }

    #[tokio::test]
    async fn test_transcripts_before_search_fails_and_keeps_state() {
        let chat = Arc::new(StubChat::new("ok"));
        let mut s = summarizer(2, vec![], &[], chat, TEMPLATE);

        let err = s.fetch_transcripts().await.unwrap_err();
        match err {
            OmtaleError::Precondition(msg) => {
                assert_eq!(msg, "must have search results for getting transcripts")
            }
            other => panic!("expected Precondition, got {:?}", other),
        }

        assert!(s.search_results().is_none());
        assert!(s.transcripts().is_none());
    }

    #[tokio::test]
    async fn test_assemble_before_transcripts_fails_and_keeps_state() {
        let chat = Arc::new(StubChat::new("ok"));
        let mut s = summarizer(
            1,
            vec![hit("vvvvvvvvvvv", "Ch1")],
            &[("vvvvvvvvvvv", &["hello"])],
            chat,
            TEMPLATE,
        );

        // From the empty state.
        let err = s.assemble_prompt().unwrap_err();
        assert!(matches!(&err, OmtaleError::Precondition(msg)
            if msg == "must have transcripts for prompt"));

        // From the searched state.
        s.fetch_search_results().await.unwrap();
        let err = s.assemble_prompt().unwrap_err();
        assert!(matches!(&err, OmtaleError::Precondition(msg)
            if msg == "must have transcripts for prompt"));

        // Search results survived the failed call.
        assert_eq!(s.search_results().unwrap().len(), 1);
        assert!(s.transcripts().is_none());
    }

    #[tokio::test]
    async fn test_prompt_assembly_exact_output() {
        let chat = Arc::new(StubChat::new("ok"));
        let mut s = summarizer(
            2,
            vec![hit("aaaaaaaaaaa", "Ch1"), hit("bbbbbbbbbbb", "Ch2")],
            &[("aaaaaaaaaaa", &["hello"]), ("bbbbbbbbbbb", &["world"])],
            chat,
            TEMPLATE,
        );

        s.fetch_search_results().await.unwrap();
        s.fetch_transcripts().await.unwrap();
        let prompt = s.assemble_prompt().unwrap();

        assert_eq!(
            prompt,
            "N=2,T=gadget,P=Widget\n\n\
             Review by Ch1:\n\nhello\
             \n\n------------------\n\n\
             Review by Ch2:\n\nworld"
        );
    }

    #[tokio::test]
    async fn test_assemble_with_no_transcripts() {
        let chat = Arc::new(StubChat::new("ok"));
        let mut s = summarizer(3, vec![], &[], chat, TEMPLATE);

        s.fetch_search_results().await.unwrap();
        s.fetch_transcripts().await.unwrap();
        let prompt = s.assemble_prompt().unwrap();

        assert_eq!(prompt, "N=0,T=gadget,P=Widget\n\n");
    }

    #[tokio::test]
    async fn test_duplicate_channel_keeps_last_transcript() {
        let chat = Arc::new(StubChat::new("ok"));
        let mut s = summarizer(
            2,
            vec![hit("aaaaaaaaaaa", "SameChannel"), hit("bbbbbbbbbbb", "SameChannel")],
            &[
                ("aaaaaaaaaaa", &["first video"]),
                ("bbbbbbbbbbb", &["second video"]),
            ],
            chat,
            TEMPLATE,
        );

        s.fetch_search_results().await.unwrap();
        s.fetch_transcripts().await.unwrap();

        let transcripts = s.transcripts().unwrap();
        assert_eq!(transcripts.len(), 1);
        assert_eq!(transcripts.get("SameChannel"), Some("second video"));
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let chat = Arc::new(StubChat::new("Reviewers loved it."));
        let mut s = summarizer(
            1,
            vec![hit("abcabcabcab", "ReviewGuy")],
            &[("abcabcabcab", &["Great product", "Really liked it"])],
            chat.clone(),
            TEMPLATE,
        );

        let reply = s.run().await.unwrap();
        assert_eq!(reply, "Reviewers loved it.");

        let transcripts = s.transcripts().unwrap();
        assert_eq!(transcripts.len(), 1);
        assert_eq!(
            transcripts.get("ReviewGuy"),
            Some("Great product Really liked it")
        );

        let sent = chat.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Review by ReviewGuy:\n\nGreat product Really liked it"));
    }

    #[tokio::test]
    async fn test_search_caps_at_requested_count() {
        let chat = Arc::new(StubChat::new("ok"));
        let mut s = summarizer(
            1,
            vec![hit("aaaaaaaaaaa", "Ch1"), hit("bbbbbbbbbbb", "Ch2")],
            &[("aaaaaaaaaaa", &["hello"])],
            chat,
            TEMPLATE,
        );

        s.fetch_search_results().await.unwrap();
        assert_eq!(s.search_results().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_research_drops_previous_transcripts() {
        let chat = Arc::new(StubChat::new("ok"));
        let mut s = summarizer(
            1,
            vec![hit("aaaaaaaaaaa", "Ch1")],
            &[("aaaaaaaaaaa", &["hello"])],
            chat,
            TEMPLATE,
        );

        s.fetch_search_results().await.unwrap();
        s.fetch_transcripts().await.unwrap();
        assert!(s.transcripts().is_some());

        s.fetch_search_results().await.unwrap();
        assert!(s.search_results().is_some());
        assert!(s.transcripts().is_none());
    }

    #[tokio::test]
    async fn test_transcript_failure_propagates_verbatim() {
        let chat = Arc::new(StubChat::new("ok"));
        // Hit with no matching transcript in the stub.
        let mut s = summarizer(1, vec![hit("zzzzzzzzzzz", "Ch1")], &[], chat, TEMPLATE);

        s.fetch_search_results().await.unwrap();
        let err = s.fetch_transcripts().await.unwrap_err();
        assert!(matches!(err, OmtaleError::Transcript(_)));

        // The failed step left no partial transcripts behind.
        assert!(s.transcripts().is_none());
        assert!(s.search_results().is_some());
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink_events = events.clone();

        let chat = Arc::new(StubChat::new("ok"));
        let mut s = summarizer(
            1,
            vec![hit("aaaaaaaaaaa", "Ch1")],
            &[("aaaaaaaaaaa", &["hello"])],
            chat,
            TEMPLATE,
        )
        .with_progress(Box::new(move |event| {
            sink_events.lock().unwrap().push(format!("{:?}", event));
        }));

        s.run().await.unwrap();

        let events = events.lock().unwrap();
        assert!(events[0].starts_with("Searching"));
        assert!(events.iter().any(|e| e.starts_with("FetchingTranscript")));
        assert!(events.last().unwrap().starts_with("Querying"));
    }
}
