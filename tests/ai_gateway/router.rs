use std::collections::BTreeMap;

use postcraft::ai_gateway::{
    error::GatewayErrorKind,
    router::BackendRouter,
    types::{
        AIGatewayConfig, BackendDialect, BackendProfile, CredentialRef, ModelProfile, ModelTarget,
    },
};

fn backend(id: &str, models: &[&str]) -> BackendProfile {
    BackendProfile {
        id: id.to_string(),
        dialect: BackendDialect::HuggingFaceInference,
        endpoint: Some("https://hf.example".to_string()),
        credential: CredentialRef::None,
        models: models
            .iter()
            .map(|id| ModelProfile { id: id.to_string() })
            .collect(),
        capabilities: None,
    }
}

fn target(backend_id: &str, model_id: &str) -> ModelTarget {
    ModelTarget {
        backend_id: backend_id.to_string(),
        model_id: model_id.to_string(),
    }
}

fn config(backends: Vec<BackendProfile>, aliases: &[(&str, ModelTarget)]) -> AIGatewayConfig {
    AIGatewayConfig {
        backends,
        route_aliases: aliases
            .iter()
            .map(|(alias, target)| (alias.to_string(), target.clone()))
            .collect::<BTreeMap<_, _>>(),
        request_timeout_ms: 30_000,
    }
}

#[test]
fn given_no_route_when_selecting_then_default_alias_is_used() {
    let router = BackendRouter::new(&config(
        vec![backend("hf", &["gpt2", "sst2"])],
        &[("default", target("hf", "gpt2")), ("sentiment", target("hf", "sst2"))],
    ))
    .expect("router should build");

    let selected = router.select(None).expect("default route resolves");
    assert_eq!(selected.backend_id, "hf");
    assert_eq!(selected.resolved_model, "gpt2");

    let selected = router.select(Some("sentiment")).expect("alias resolves");
    assert_eq!(selected.resolved_model, "sst2");
}

#[test]
fn given_backend_slash_model_route_when_selecting_then_direct_target_is_used() {
    let router = BackendRouter::new(&config(
        vec![backend("hf", &["gpt2", "sst2"])],
        &[("default", target("hf", "gpt2"))],
    ))
    .expect("router should build");

    let selected = router.select(Some("hf/sst2")).expect("direct route resolves");
    assert_eq!(selected.resolved_model, "sst2");

    let err = router
        .select(Some("hf/unknown"))
        .expect_err("undeclared model is rejected");
    assert_eq!(err.kind, GatewayErrorKind::InvalidRequest);

    let err = router
        .select(Some("not-an-alias"))
        .expect_err("unknown alias is rejected");
    assert_eq!(err.kind, GatewayErrorKind::InvalidRequest);
}

#[test]
fn given_missing_default_alias_when_building_then_config_is_rejected() {
    let err = BackendRouter::new(&config(
        vec![backend("hf", &["gpt2"])],
        &[("caption", target("hf", "gpt2"))],
    ))
    .err()
    .expect("default alias is required");
    assert_eq!(err.kind, GatewayErrorKind::InvalidRequest);
    assert!(err.message.contains("default"));
}

#[test]
fn given_duplicate_backend_ids_when_building_then_config_is_rejected() {
    let err = BackendRouter::new(&config(
        vec![backend("hf", &["gpt2"]), backend("hf", &["gpt2"])],
        &[("default", target("hf", "gpt2"))],
    ))
    .err()
    .expect("duplicate ids are rejected");
    assert!(err.message.contains("duplicate"));
}

#[test]
fn given_alias_to_unknown_model_when_building_then_config_is_rejected() {
    let err = BackendRouter::new(&config(
        vec![backend("hf", &["gpt2"])],
        &[("default", target("hf", "gpt3"))],
    ))
    .err()
    .expect("unknown alias model is rejected");
    assert!(err.message.contains("unknown model"));
}
