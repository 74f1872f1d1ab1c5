use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use postcraft::ai_gateway::{
    adapters::BackendAdapter,
    credentials::CredentialProvider,
    error::{GatewayError, GatewayErrorKind},
    gateway::AIGateway,
    telemetry::{GatewayTelemetryEvent, TelemetrySink},
    types::{
        AIGatewayConfig, AdapterContext, BackendCapabilities, BackendDialect, BackendProfile,
        ClassificationRequest, CredentialRef, LabelScore, ModelProfile, ModelTarget,
        ResolvedCredential, SamplingParams, TextGenerationRequest,
    },
};

#[derive(Default)]
struct StaticCredentialProvider;

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn resolve(
        &self,
        _reference: &CredentialRef,
        _backend: &BackendProfile,
    ) -> Result<ResolvedCredential, GatewayError> {
        Ok(ResolvedCredential::bearer("test-token"))
    }
}

#[derive(Debug, Clone)]
struct CapturedCall {
    model: String,
    request_id: String,
    auth_header: Option<String>,
    prompt: String,
    sampling: Option<SamplingParams>,
}

struct CapturingAdapter {
    calls: Arc<Mutex<Vec<CapturedCall>>>,
    outputs: Vec<String>,
    labels: Vec<LabelScore>,
}

impl CapturingAdapter {
    fn new(outputs: &[&str], labels: Vec<LabelScore>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            outputs: outputs.iter().map(|value| value.to_string()).collect(),
            labels,
        }
    }

    fn record(&self, ctx: &AdapterContext, prompt: &str, sampling: Option<SamplingParams>) {
        self.calls.lock().expect("lock").push(CapturedCall {
            model: ctx.model.clone(),
            request_id: ctx.request_id.clone(),
            auth_header: ctx.credential.auth_header.clone(),
            prompt: prompt.to_string(),
            sampling,
        });
    }
}

#[async_trait]
impl BackendAdapter for CapturingAdapter {
    fn dialect(&self) -> BackendDialect {
        BackendDialect::HuggingFaceInference
    }

    fn static_capabilities(&self) -> BackendCapabilities {
        BackendCapabilities::default()
    }

    async fn generate_text(
        &self,
        ctx: AdapterContext,
        req: &TextGenerationRequest,
    ) -> Result<Vec<String>, GatewayError> {
        self.record(&ctx, &req.prompt, Some(req.sampling.clone()));
        Ok(self.outputs.clone())
    }

    async fn classify(
        &self,
        ctx: AdapterContext,
        text: &str,
    ) -> Result<Vec<LabelScore>, GatewayError> {
        self.record(&ctx, text, None);
        Ok(self.labels.clone())
    }
}

#[derive(Default)]
struct RecordingTelemetrySink {
    events: Mutex<Vec<GatewayTelemetryEvent>>,
}

impl TelemetrySink for RecordingTelemetrySink {
    fn on_event(&self, event: GatewayTelemetryEvent) {
        self.events.lock().expect("lock").push(event);
    }
}

fn gateway_config(capabilities: Option<BackendCapabilities>) -> AIGatewayConfig {
    let mut route_aliases = BTreeMap::new();
    route_aliases.insert(
        "default".to_string(),
        ModelTarget {
            backend_id: "hf".to_string(),
            model_id: "gpt2".to_string(),
        },
    );
    route_aliases.insert(
        "sentiment".to_string(),
        ModelTarget {
            backend_id: "hf".to_string(),
            model_id: "sst2".to_string(),
        },
    );

    AIGatewayConfig {
        backends: vec![BackendProfile {
            id: "hf".to_string(),
            dialect: BackendDialect::HuggingFaceInference,
            endpoint: Some("https://hf.example".to_string()),
            credential: CredentialRef::Env {
                var: "HF_TOKEN".to_string(),
            },
            models: vec![
                ModelProfile {
                    id: "gpt2".to_string(),
                },
                ModelProfile {
                    id: "sst2".to_string(),
                },
            ],
            capabilities,
        }],
        route_aliases,
        request_timeout_ms: 30_000,
    }
}

fn build_gateway(
    config: AIGatewayConfig,
    adapter: Arc<CapturingAdapter>,
    telemetry: Arc<RecordingTelemetrySink>,
) -> AIGateway {
    let mut adapters: HashMap<BackendDialect, Arc<dyn BackendAdapter>> = HashMap::new();
    adapters.insert(BackendDialect::HuggingFaceInference, adapter);
    AIGateway::new(config, Arc::new(StaticCredentialProvider), telemetry)
        .expect("gateway should build")
        .with_adapters(adapters)
}

fn sampling() -> SamplingParams {
    SamplingParams {
        max_output_tokens: 100,
        num_return_sequences: 1,
        do_sample: true,
        temperature: 0.9,
        top_p: 0.9,
    }
}

fn label(label: &str, score: f64) -> LabelScore {
    LabelScore {
        label: label.to_string(),
        score: Some(score),
    }
}

#[tokio::test]
async fn given_default_route_when_generating_then_first_sequence_is_returned() {
    let adapter = Arc::new(CapturingAdapter::new(&["first caption", "second"], vec![]));
    let telemetry = Arc::new(RecordingTelemetrySink::default());
    let gateway = build_gateway(gateway_config(None), adapter.clone(), telemetry.clone());

    let response = gateway
        .generate_text(TextGenerationRequest {
            request_id: Some("req-1:caption".to_string()),
            route: None,
            instructions: None,
            prompt: "Morning coffee".to_string(),
            sampling: sampling(),
        })
        .await
        .expect("generation should succeed");

    assert_eq!(response.text, "first caption");
    assert_eq!(response.request_id, "req-1:caption");
    assert_eq!(response.backend_id, "hf");
    assert_eq!(response.model, "gpt2");

    let calls = adapter.calls.lock().expect("lock").clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, "Morning coffee");
    assert_eq!(calls[0].request_id, "req-1:caption");
    assert_eq!(calls[0].auth_header.as_deref(), Some("Bearer test-token"));
    assert_eq!(calls[0].sampling, Some(sampling()));

    let events = telemetry.events.lock().expect("lock");
    assert!(matches!(
        events.first(),
        Some(GatewayTelemetryEvent::RequestStarted { .. })
    ));
    assert!(matches!(
        events.last(),
        Some(GatewayTelemetryEvent::RequestCompleted { .. })
    ));
}

#[tokio::test]
async fn given_sentiment_alias_when_classifying_then_top_label_is_returned() {
    let adapter = Arc::new(CapturingAdapter::new(
        &[],
        vec![label("POSITIVE", 0.98), label("NEGATIVE", 0.02)],
    ));
    let gateway = build_gateway(
        gateway_config(None),
        adapter.clone(),
        Arc::new(RecordingTelemetrySink::default()),
    );

    let response = gateway
        .classify(ClassificationRequest {
            request_id: None,
            route: Some("sentiment".to_string()),
            text: "What a great morning".to_string(),
        })
        .await
        .expect("classification should succeed");

    assert_eq!(response.label, "POSITIVE");
    assert_eq!(response.score, Some(0.98));
    assert_eq!(response.model, "sst2");
    assert!(!response.request_id.is_empty(), "gateway assigns request id");

    let calls = adapter.calls.lock().expect("lock").clone();
    assert_eq!(calls[0].model, "sst2");
    assert_eq!(calls[0].prompt, "What a great morning");
}

#[tokio::test]
async fn given_backend_without_labels_when_classifying_then_protocol_violation_is_returned() {
    let adapter = Arc::new(CapturingAdapter::new(&[], vec![]));
    let telemetry = Arc::new(RecordingTelemetrySink::default());
    let gateway = build_gateway(gateway_config(None), adapter, telemetry.clone());

    let err = gateway
        .classify(ClassificationRequest {
            request_id: None,
            route: None,
            text: "anything".to_string(),
        })
        .await
        .expect_err("empty label list is a protocol violation");

    assert_eq!(err.kind, GatewayErrorKind::ProtocolViolation);
    let events = telemetry.events.lock().expect("lock");
    assert!(matches!(
        events.last(),
        Some(GatewayTelemetryEvent::RequestFailed { .. })
    ));
}

#[tokio::test]
async fn given_backend_without_classification_capability_when_classifying_then_adapter_is_not_called()
 {
    let adapter = Arc::new(CapturingAdapter::new(&[], vec![label("POSITIVE", 0.9)]));
    let gateway = build_gateway(
        gateway_config(Some(BackendCapabilities {
            text_generation: true,
            sentiment_classification: false,
        })),
        adapter.clone(),
        Arc::new(RecordingTelemetrySink::default()),
    );

    let err = gateway
        .classify(ClassificationRequest {
            request_id: None,
            route: None,
            text: "anything".to_string(),
        })
        .await
        .expect_err("capability is disabled");

    assert_eq!(err.kind, GatewayErrorKind::UnsupportedCapability);
    assert_eq!(err.backend_id.as_deref(), Some("hf"));
    assert!(adapter.calls.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn given_blank_prompt_when_generating_then_invalid_request_is_returned() {
    let adapter = Arc::new(CapturingAdapter::new(&["unused"], vec![]));
    let gateway = build_gateway(
        gateway_config(None),
        adapter.clone(),
        Arc::new(RecordingTelemetrySink::default()),
    );

    let err = gateway
        .generate_text(TextGenerationRequest {
            request_id: None,
            route: None,
            instructions: None,
            prompt: "   ".to_string(),
            sampling: sampling(),
        })
        .await
        .expect_err("blank prompt is rejected");

    assert_eq!(err.kind, GatewayErrorKind::InvalidRequest);
    assert!(adapter.calls.lock().expect("lock").is_empty());
}
