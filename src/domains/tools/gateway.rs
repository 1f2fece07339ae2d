//! Tool gateway - validation, dispatch and envelope construction.
//!
//! Every tool request goes through the same sequence:
//!
//! 1. the tool definition validates the request and resolves any artifact
//!    path (`Received -> Validated`); failures stop here, before any I/O
//! 2. the matching capability is invoked, bounded by the capability timeout
//!    (`Dispatched`)
//! 3. the result or the failure becomes exactly one envelope
//!    (`Succeeded | Failed -> Responded`)
//!
//! There is no retry; a failed capability call is terminal for the request.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::artifact::PendingArtifact;
use super::capabilities::Capabilities;
use super::definitions::{
    CreateFilePlan, CreateFileTool, TtsPlan, TtsTool, WhoisPlan, WhoisTool,
};
use super::envelope::ResponseEnvelope;
use super::error::{CapabilityFailure, ToolError};
use super::request::{ToolKind, ToolRequest};
use crate::core::config::Config;

/// Lifecycle of one tool request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DispatchPhase {
    Received,
    Validated,
    Dispatched,
    Succeeded,
    Failed,
    Responded,
}

/// Tracks and logs the phase of a single dispatch. Phases only move forward.
#[derive(Debug)]
struct DispatchTrace {
    tool: &'static str,
    phase: DispatchPhase,
}

impl DispatchTrace {
    fn new(kind: ToolKind) -> Self {
        Self {
            tool: kind.name(),
            phase: DispatchPhase::Received,
        }
    }

    fn advance(&mut self, next: DispatchPhase) {
        debug_assert!(next > self.phase, "{:?} -> {:?}", self.phase, next);
        debug!(tool = self.tool, from = ?self.phase, to = ?next, "dispatch phase");
        self.phase = next;
    }
}

/// A request that passed validation, with everything the capability needs.
#[derive(Debug)]
enum ToolPlan {
    Tts(TtsPlan),
    Whois(WhoisPlan),
    CreateFile(CreateFilePlan),
}

/// Dispatches tool requests to capability adapters.
#[derive(Clone)]
pub struct ToolGateway {
    config: Arc<Config>,
    capabilities: Capabilities,
}

impl ToolGateway {
    /// Create a gateway over the given configuration and adapters.
    pub fn new(config: Arc<Config>, capabilities: Capabilities) -> Self {
        Self {
            config,
            capabilities,
        }
    }

    /// Handle one tool request and produce its response envelope.
    #[instrument(skip_all, fields(tool = request.kind().name()))]
    pub async fn handle(&self, request: ToolRequest) -> ResponseEnvelope {
        let mut trace = DispatchTrace::new(request.kind());

        let plan = match self.plan(request) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Rejected {} request: {}", trace.tool, e);
                trace.advance(DispatchPhase::Failed);
                let envelope = ResponseEnvelope::from(&e);
                trace.advance(DispatchPhase::Responded);
                return envelope;
            }
        };
        trace.advance(DispatchPhase::Validated);

        trace.advance(DispatchPhase::Dispatched);
        let envelope = match self.invoke(plan).await {
            Ok(envelope) => {
                trace.advance(DispatchPhase::Succeeded);
                info!("{} request succeeded", trace.tool);
                envelope
            }
            Err(e) => {
                trace.advance(DispatchPhase::Failed);
                error!("{}", e);
                ResponseEnvelope::from(&e)
            }
        };

        trace.advance(DispatchPhase::Responded);
        envelope
    }

    fn plan(&self, request: ToolRequest) -> Result<ToolPlan, ToolError> {
        let config = self.config.as_ref();
        match request {
            ToolRequest::Tts { text, lang } => {
                TtsTool::plan(&text, lang.as_deref(), config).map(ToolPlan::Tts)
            }
            ToolRequest::Whois { domain } => WhoisTool::plan(&domain, config).map(ToolPlan::Whois),
            ToolRequest::CreateFile { filename, content } => {
                CreateFileTool::plan(&filename, &content, config).map(ToolPlan::CreateFile)
            }
        }
    }

    async fn invoke(&self, plan: ToolPlan) -> Result<ResponseEnvelope, ToolError> {
        match plan {
            ToolPlan::Tts(plan) => {
                let dest = &plan.artifact.absolute_path;
                let guard = PendingArtifact::generated(dest.clone());
                self.bounded(self.capabilities.speech.synthesize(&plan.text, &plan.lang, dest))
                    .await
                    .map_err(|e| ToolError::capability(TtsTool::NAME, e))?;
                guard.commit();
                Ok(TtsTool::success(&plan.artifact))
            }
            ToolPlan::Whois(plan) => {
                let raw = self
                    .bounded(self.capabilities.whois.lookup(&plan.domain, plan.timeout))
                    .await
                    .map_err(|e| ToolError::capability(WhoisTool::NAME, e))?;
                Ok(WhoisTool::success(&plan.domain, &raw))
            }
            ToolPlan::CreateFile(plan) => {
                let dest = &plan.artifact.absolute_path;
                let guard = PendingArtifact::client_named(dest.clone());
                self.bounded(self.capabilities.files.write(dest, plan.content.as_bytes()))
                    .await
                    .map_err(|e| ToolError::capability(CreateFileTool::NAME, e))?;
                guard.commit();
                if plan.replaces_existing {
                    info!("Replaced artifact {}", plan.artifact.relative_name);
                }
                Ok(CreateFileTool::success(&plan.artifact))
            }
        }
    }

    /// Run a capability call under the gateway-wide timeout.
    async fn bounded<T, E, F>(&self, call: F) -> Result<T, CapabilityFailure>
    where
        F: Future<Output = Result<T, E>>,
        CapabilityFailure: From<E>,
    {
        let limit = self.config.capability_timeout();
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(CapabilityFailure::from),
            Err(_) => Err(CapabilityFailure::TimedOut(limit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::capabilities::{
        DomainLookup, FileWriter, LocalFileWriter, LookupError, SpeechSynthesizer, SynthesisError,
        WriteError,
    };
    use crate::domains::tools::envelope::EnvelopeStatus;
    use async_trait::async_trait;
    use http::StatusCode;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    /// Speech double writing a fixed payload, or failing on demand.
    #[derive(Default)]
    struct FakeSpeech {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeSpeech {
        async fn synthesize(&self, text: &str, _lang: &str, dest: &Path) -> Result<(), SynthesisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                std::fs::write(dest, b"partial")?;
                return Err(SynthesisError::backend("upstream said no: token=abc123"));
            }
            std::fs::write(dest, text.as_bytes())?;
            Ok(())
        }
    }

    /// Lookup double returning canned text after an optional delay.
    #[derive(Default)]
    struct FakeWhois {
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl DomainLookup for FakeWhois {
        async fn lookup(&self, domain: &str, _timeout: Duration) -> Result<String, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(format!("Domain Name: {}\n\nStatus: active\n", domain.to_uppercase()))
        }
    }

    /// Writer double counting calls and delegating to the real writer.
    #[derive(Default)]
    struct CountingWriter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FileWriter for CountingWriter {
        async fn write(&self, path: &Path, content: &[u8]) -> Result<(), WriteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            LocalFileWriter.write(path, content).await
        }
    }

    struct Harness {
        root: TempDir,
        speech: Arc<FakeSpeech>,
        whois: Arc<FakeWhois>,
        files: Arc<CountingWriter>,
        gateway: ToolGateway,
    }

    impl Harness {
        fn total_calls(&self) -> usize {
            self.speech.calls.load(Ordering::SeqCst)
                + self.whois.calls.load(Ordering::SeqCst)
                + self.files.calls.load(Ordering::SeqCst)
        }
    }

    fn harness_with(speech: FakeSpeech, whois: FakeWhois, tweak: impl FnOnce(&mut Config)) -> Harness {
        let root = TempDir::new().unwrap();
        let mut config = Config::default();
        config.artifacts.root_dir = root.path().to_path_buf();
        tweak(&mut config);

        let speech = Arc::new(speech);
        let whois = Arc::new(whois);
        let files = Arc::new(CountingWriter::default());
        let gateway = ToolGateway::new(
            Arc::new(config),
            Capabilities {
                speech: speech.clone(),
                whois: whois.clone(),
                files: files.clone(),
            },
        );

        Harness {
            root,
            speech,
            whois,
            files,
            gateway,
        }
    }

    fn harness() -> Harness {
        harness_with(FakeSpeech::default(), FakeWhois::default(), |_| {})
    }

    fn tts(text: &str) -> ToolRequest {
        ToolRequest::Tts {
            text: text.to_string(),
            lang: None,
        }
    }

    #[tokio::test]
    async fn test_tts_success_writes_artifact() {
        let h = harness();
        let envelope = h.gateway.handle(tts("Terima kasih")).await;

        assert_eq!(envelope.http_code(), StatusCode::OK);
        let filename = envelope.field("filename").and_then(|v| v.as_str()).unwrap();
        let written = std::fs::read_to_string(h.root.path().join(filename)).unwrap();
        assert_eq!(written, "Terima kasih");
        assert!(envelope
            .field("stream_url")
            .and_then(|v| v.as_str())
            .unwrap()
            .ends_with(filename));
    }

    #[tokio::test]
    async fn test_identical_tts_requests_get_distinct_artifacts() {
        let h = harness();
        let first = h.gateway.handle(tts("sama")).await;
        let second = h.gateway.handle(tts("sama")).await;

        assert_ne!(first.field("filename"), second.field("filename"));
        assert_ne!(first.field("stream_url"), second.field("stream_url"));
    }

    #[tokio::test]
    async fn test_missing_fields_never_reach_capabilities() {
        let h = harness();
        let requests = vec![
            tts("   "),
            ToolRequest::Whois {
                domain: String::new(),
            },
            ToolRequest::CreateFile {
                filename: String::new(),
                content: "x".to_string(),
            },
            ToolRequest::CreateFile {
                filename: "a.txt".to_string(),
                content: " ".to_string(),
            },
        ];

        for request in requests {
            let envelope = h.gateway.handle(request).await;
            assert_eq!(envelope.http_code(), StatusCode::BAD_REQUEST);
            assert_eq!(envelope.status(), EnvelopeStatus::Error);
        }
        assert_eq!(h.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_traversal_rejected_without_write() {
        let h = harness();
        let envelope = h
            .gateway
            .handle(ToolRequest::CreateFile {
                filename: "../../etc/passwd".to_string(),
                content: "owned".to_string(),
            })
            .await;

        assert_eq!(envelope.http_code(), StatusCode::BAD_REQUEST);
        assert_eq!(h.files.calls.load(Ordering::SeqCst), 0);
        assert_eq!(std::fs::read_dir(h.root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_createfile_writes_and_overwrites() {
        let h = harness();
        for content in ["first", "second"] {
            let envelope = h
                .gateway
                .handle(ToolRequest::CreateFile {
                    filename: "notes.txt".to_string(),
                    content: content.to_string(),
                })
                .await;
            assert!(envelope.is_success());
        }

        let written = std::fs::read_to_string(h.root.path().join("notes.txt")).unwrap();
        assert_eq!(written, "second");
        assert_eq!(h.files.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_createfile_conflict_when_overwrite_disabled() {
        let h = harness_with(FakeSpeech::default(), FakeWhois::default(), |c| {
            c.artifacts.allow_overwrite = false;
        });
        std::fs::write(h.root.path().join("keep.txt"), "original").unwrap();

        let envelope = h
            .gateway
            .handle(ToolRequest::CreateFile {
                filename: "keep.txt".to_string(),
                content: "replacement".to_string(),
            })
            .await;

        assert_eq!(envelope.http_code(), StatusCode::CONFLICT);
        assert_eq!(
            std::fs::read_to_string(h.root.path().join("keep.txt")).unwrap(),
            "original"
        );
        assert_eq!(h.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_generic_and_cleaned_up() {
        let h = harness_with(
            FakeSpeech {
                fail: true,
                ..Default::default()
            },
            FakeWhois::default(),
            |_| {},
        );

        let envelope = h.gateway.handle(tts("halo")).await;

        assert_eq!(envelope.http_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.message(), "Failed to create the TTS file.");
        let body = serde_json::to_string(&envelope).unwrap();
        assert!(!body.contains("abc123"));
        // The partial file the adapter left behind is removed
        assert_eq!(std::fs::read_dir(h.root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_whois_success() {
        let h = harness();
        let envelope = h
            .gateway
            .handle(ToolRequest::Whois {
                domain: " Example.com ".to_string(),
            })
            .await;

        assert!(envelope.is_success());
        assert_eq!(
            envelope.field("query_domain").and_then(|v| v.as_str()),
            Some("example.com")
        );
        assert!(envelope
            .field("raw_data")
            .and_then(|v| v.as_str())
            .unwrap()
            .contains("EXAMPLE.COM"));
        assert_eq!(
            envelope.field("formatted_data").and_then(|v| v.as_array()).map(Vec::len),
            Some(2)
        );
    }

    #[tokio::test]
    async fn test_hung_capability_returns_500_within_bound() {
        let h = harness_with(
            FakeSpeech::default(),
            FakeWhois {
                delay: Some(Duration::from_secs(30)),
                ..Default::default()
            },
            |c| c.tools.capability_timeout_ms = 100,
        );

        let started = Instant::now();
        let envelope = h
            .gateway
            .handle(ToolRequest::Whois {
                domain: "slow.example".to_string(),
            })
            .await;

        assert_eq!(envelope.http_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.message(), "The whois service did not respond in time.");
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_phases_are_ordered() {
        assert!(DispatchPhase::Received < DispatchPhase::Validated);
        assert!(DispatchPhase::Dispatched < DispatchPhase::Succeeded);
        assert!(DispatchPhase::Failed < DispatchPhase::Responded);
    }
}
