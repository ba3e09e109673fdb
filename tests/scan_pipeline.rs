//! End-to-end pipeline tests against a canned backend.

mod common;

use async_trait::async_trait;
use sigsweep::llm::types::{GroundingChunk, SignalReply};
use sigsweep::llm::{SignalBackend, TransportError};
use sigsweep::scan::compiler::{CompiledRequest, ScanScope};
use sigsweep::scan::model::{Platform, RiskLevel, SearchKind, SearchRequest};
use sigsweep::scan::{run_scan, ScanError};

/// Backend double replaying a fixed reply, recording the compiled prompt.
struct CannedBackend {
    text: String,
    grounding: Vec<GroundingChunk>,
    seen_prompts: std::sync::Mutex<Vec<String>>,
}

impl CannedBackend {
    fn new(text: impl Into<String>, grounding: Vec<GroundingChunk>) -> Self {
        Self {
            text: text.into(),
            grounding,
            seen_prompts: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SignalBackend for CannedBackend {
    async fn generate(&self, request: &CompiledRequest) -> Result<SignalReply, TransportError> {
        self.seen_prompts
            .lock()
            .unwrap()
            .push(request.prompt.clone());
        Ok(SignalReply {
            text: self.text.clone(),
            grounding: self.grounding.clone(),
        })
    }
}

/// Backend double that always fails at the transport layer.
struct DeadBackend;

#[async_trait]
impl SignalBackend for DeadBackend {
    async fn generate(&self, _request: &CompiledRequest) -> Result<SignalReply, TransportError> {
        Err(TransportError::QuotaExceeded)
    }
}

fn topic_request() -> SearchRequest {
    SearchRequest {
        query: "aid-distribution".to_string(),
        kind: SearchKind::TopicSearch,
        country: String::new(),
        town: String::new(),
        facility: String::new(),
        platforms: vec![Platform::X, Platform::Telegram],
        filters: Default::default(),
    }
}

#[tokio::test]
async fn two_group_scenario_normalizes_end_to_end() {
    let backend = CannedBackend::new(common::two_group_payload(), vec![]);

    let result = run_scan(&backend, &topic_request(), &ScanScope::default())
        .await
        .unwrap();

    assert_eq!(result.analysis, "found 2 groups");
    assert_eq!(result.links.len(), 2);
    assert_eq!(result.summary.total_detected, 2);
    assert_eq!(result.summary.risk_level, RiskLevel::Medium);
    assert!(result.links[0].high_confidence);
    assert!(!result.links[1].high_confidence);

    // The compiled prompt that reached the backend names the literal query.
    let prompts = backend.seen_prompts.lock().unwrap();
    assert!(prompts[0].contains("aid-distribution"));
}

#[tokio::test]
async fn prose_wrapped_payload_still_normalizes() {
    let raw = format!(
        "Sure, here is the data:\n{}\nHope that helps!",
        common::two_group_payload()
    );
    let backend = CannedBackend::new(raw, vec![]);

    let result = run_scan(&backend, &topic_request(), &ScanScope::default())
        .await
        .unwrap();
    assert_eq!(result.links.len(), 2);
}

#[tokio::test]
async fn grounding_chunks_surface_as_sources() {
    let backend = CannedBackend::new(
        common::two_group_payload(),
        vec![
            common::bare_chunk(),
            common::web_chunk(Some("Field report"), Some("https://example.org/report")),
            common::web_chunk(None, Some("https://example.org/untitled")),
        ],
    );

    let result = run_scan(&backend, &topic_request(), &ScanScope::default())
        .await
        .unwrap();

    assert_eq!(result.sources.len(), 2);
    assert_eq!(result.sources[0].title, "Field report");
    assert_eq!(result.sources[1].title, "Untitled source");
}

#[tokio::test]
async fn transport_failure_propagates_unchanged() {
    let err = run_scan(&DeadBackend, &topic_request(), &ScanScope::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScanError::Transport(TransportError::QuotaExceeded)
    ));
}

#[tokio::test]
async fn unparseable_reply_is_a_parse_failure() {
    let backend = CannedBackend::new("signal lost", vec![]);

    let err = run_scan(&backend, &topic_request(), &ScanScope::default())
        .await
        .unwrap_err();

    match err {
        ScanError::Parse { raw } => assert_eq!(raw, "signal lost"),
        other => panic!("expected Parse, got {other:?}"),
    }
}
