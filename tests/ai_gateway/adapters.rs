use std::time::Duration;

use postcraft::ai_gateway::{
    adapters::{build_default_adapters, http_common::map_http_error},
    error::GatewayErrorKind,
    types::{
        AdapterContext, BackendDialect, BackendProfile, CredentialRef, ModelProfile,
        ResolvedCredential, SamplingParams, TextGenerationRequest,
    },
};

fn context_without_endpoint(dialect: BackendDialect) -> AdapterContext {
    AdapterContext {
        backend_id: "b1".to_string(),
        model: "m1".to_string(),
        profile: BackendProfile {
            id: "b1".to_string(),
            dialect,
            endpoint: None,
            credential: CredentialRef::None,
            models: vec![ModelProfile {
                id: "m1".to_string(),
            }],
            capabilities: None,
        },
        credential: ResolvedCredential::none(),
        timeout: Duration::from_millis(500),
        request_id: "req-adapter".to_string(),
    }
}

fn request() -> TextGenerationRequest {
    TextGenerationRequest {
        request_id: Some("req-adapter".to_string()),
        route: None,
        instructions: None,
        prompt: "Exciting career opportunities".to_string(),
        sampling: SamplingParams {
            max_output_tokens: 100,
            num_return_sequences: 1,
            do_sample: true,
            temperature: 0.9,
            top_p: 0.9,
        },
    }
}

#[test]
fn given_default_registry_when_built_then_every_dialect_has_an_adapter() {
    let adapters = build_default_adapters();
    for dialect in [
        BackendDialect::OpenAiCompatible,
        BackendDialect::Ollama,
        BackendDialect::HuggingFaceInference,
    ] {
        let adapter = adapters.get(&dialect).expect("adapter registered");
        assert_eq!(adapter.dialect(), dialect);
    }
}

#[tokio::test]
async fn given_backend_without_endpoint_when_generating_then_invalid_request_is_returned() {
    let adapters = build_default_adapters();
    for (dialect, adapter) in adapters {
        let err = adapter
            .generate_text(context_without_endpoint(dialect), &request())
            .await
            .expect_err("endpoint is required");
        assert_eq!(err.kind, GatewayErrorKind::InvalidRequest, "{dialect:?}");
    }
}

#[tokio::test]
async fn given_backend_without_endpoint_when_classifying_then_invalid_request_is_returned() {
    let adapters = build_default_adapters();
    for (dialect, adapter) in adapters {
        let err = adapter
            .classify(context_without_endpoint(dialect), "Breaking news in tech")
            .await
            .expect_err("endpoint is required");
        assert_eq!(err.kind, GatewayErrorKind::InvalidRequest, "{dialect:?}");
    }
}

#[test]
fn given_server_error_status_when_mapping_then_backend_transient_keeps_status_and_body() {
    let err = map_http_error(503, "b1", "model is loading");
    assert_eq!(err.kind, GatewayErrorKind::BackendTransient);
    assert_eq!(err.provider_http_status, Some(503));
    assert_eq!(err.backend_id.as_deref(), Some("b1"));
    assert!(err.message.contains("model is loading"));
}
