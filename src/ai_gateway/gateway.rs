use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::Instrument;
use uuid::Uuid;

use crate::ai_gateway::{
    adapters::{BackendAdapter, build_default_adapters},
    credentials::CredentialProvider,
    error::{GatewayError, GatewayErrorKind, invalid_request, unsupported_capability},
    router::{BackendRouter, SelectedBackend},
    telemetry::{GatewayOperation, GatewayTelemetryEvent, TelemetrySink},
    types::{
        AIGatewayConfig, AdapterContext, BackendDialect, ClassificationRequest,
        ClassificationResponse, RequestId, TextGenerationRequest, TextGenerationResponse,
    },
};

/// Single entry point for the external text-generation and sentiment-classification capabilities.
pub struct AIGateway {
    router: BackendRouter,
    credential_provider: Arc<dyn CredentialProvider>,
    adapters: HashMap<BackendDialect, Arc<dyn BackendAdapter>>,
    telemetry: Arc<dyn TelemetrySink>,
    request_timeout: Duration,
}

impl AIGateway {
    pub fn new(
        config: AIGatewayConfig,
        credential_provider: Arc<dyn CredentialProvider>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self, GatewayError> {
        let router = BackendRouter::new(&config)?;
        Ok(Self {
            router,
            credential_provider,
            adapters: build_default_adapters(),
            telemetry,
            request_timeout: Duration::from_millis(config.request_timeout_ms.max(1)),
        })
    }

    pub fn with_adapters(
        mut self,
        adapters: HashMap<BackendDialect, Arc<dyn BackendAdapter>>,
    ) -> Self {
        self.adapters = adapters;
        self
    }

    /// Returns the first generated sequence.
    pub async fn generate_text(
        &self,
        request: TextGenerationRequest,
    ) -> Result<TextGenerationResponse, GatewayError> {
        if request.prompt.trim().is_empty() {
            return Err(invalid_request("generation prompt must not be empty"));
        }

        let operation = GatewayOperation::TextGeneration;
        let request_id = resolve_request_id(request.request_id.clone());
        let (selected, adapter, ctx) = self
            .prepare(&request_id, request.route.as_deref(), operation)
            .await?;
        let span = request_span(&request_id, &selected, operation);

        let started_at = Instant::now();
        let result = adapter
            .generate_text(ctx, &request)
            .instrument(span)
            .await
            .and_then(|outputs| {
                outputs.into_iter().next().ok_or_else(|| {
                    GatewayError::new(
                        GatewayErrorKind::ProtocolViolation,
                        "backend returned no generated sequences",
                    )
                    .with_retryable(false)
                    .with_backend_id(selected.backend_id.clone())
                })
            });
        self.finish(&request_id, operation, started_at, &result);

        let text = result?;
        Ok(TextGenerationResponse {
            request_id,
            backend_id: selected.backend_id,
            model: selected.resolved_model,
            text,
        })
    }

    /// Returns the highest-scoring label reported by the backend.
    pub async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<ClassificationResponse, GatewayError> {
        let operation = GatewayOperation::SentimentClassification;
        let request_id = resolve_request_id(request.request_id.clone());
        let (selected, adapter, ctx) = self
            .prepare(&request_id, request.route.as_deref(), operation)
            .await?;
        let span = request_span(&request_id, &selected, operation);

        let started_at = Instant::now();
        let result = adapter
            .classify(ctx, &request.text)
            .instrument(span)
            .await
            .and_then(|labels| {
                labels.into_iter().next().ok_or_else(|| {
                    GatewayError::new(
                        GatewayErrorKind::ProtocolViolation,
                        "backend returned no classification labels",
                    )
                    .with_retryable(false)
                    .with_backend_id(selected.backend_id.clone())
                })
            });
        self.finish(&request_id, operation, started_at, &result);

        let top = result?;
        Ok(ClassificationResponse {
            request_id,
            backend_id: selected.backend_id,
            model: selected.resolved_model,
            label: top.label,
            score: top.score,
        })
    }

    async fn prepare(
        &self,
        request_id: &str,
        route: Option<&str>,
        operation: GatewayOperation,
    ) -> Result<(SelectedBackend, Arc<dyn BackendAdapter>, AdapterContext), GatewayError> {
        let selected = self.router.select(route)?;
        let adapter = self
            .adapters
            .get(&selected.profile.dialect)
            .cloned()
            .ok_or_else(|| {
                invalid_request(format!(
                    "adapter for dialect {:?} is not registered",
                    selected.profile.dialect
                ))
                .with_backend_id(selected.backend_id.clone())
            })?;

        let capabilities = selected
            .profile
            .capabilities
            .clone()
            .unwrap_or_else(|| adapter.static_capabilities());
        let supported = match operation {
            GatewayOperation::TextGeneration => capabilities.text_generation,
            GatewayOperation::SentimentClassification => capabilities.sentiment_classification,
        };
        if !supported {
            return Err(unsupported_capability(format!(
                "backend does not support {}",
                operation.as_str()
            ))
            .with_backend_id(selected.backend_id.clone()));
        }

        let credential = self
            .credential_provider
            .resolve(&selected.profile.credential, &selected.profile)
            .await?;

        tracing::debug!(
            target: "ai_gateway",
            request_id = %request_id,
            backend_id = %selected.backend_id,
            dialect = ?selected.profile.dialect,
            model = %selected.resolved_model,
            operation = operation.as_str(),
            timeout_ms = self.request_timeout.as_millis() as u64,
            "gateway_request_prepared"
        );
        self.telemetry.on_event(GatewayTelemetryEvent::RequestStarted {
            request_id: request_id.to_string(),
            backend_id: selected.backend_id.clone(),
            model: selected.resolved_model.clone(),
            operation,
        });

        let ctx = AdapterContext {
            backend_id: selected.backend_id.clone(),
            model: selected.resolved_model.clone(),
            profile: selected.profile.clone(),
            credential,
            timeout: self.request_timeout,
            request_id: request_id.to_string(),
        };
        Ok((selected, adapter, ctx))
    }

    fn finish<T>(
        &self,
        request_id: &str,
        operation: GatewayOperation,
        started_at: Instant,
        result: &Result<T, GatewayError>,
    ) {
        let elapsed_ms = started_at.elapsed().as_millis() as u64;
        match result {
            Ok(_) => self.telemetry.on_event(GatewayTelemetryEvent::RequestCompleted {
                request_id: request_id.to_string(),
                operation,
                elapsed_ms,
            }),
            Err(err) => {
                tracing::debug!(
                    target: "ai_gateway",
                    request_id = %request_id,
                    operation = operation.as_str(),
                    error_kind = ?err.kind,
                    error = %err,
                    elapsed_ms = elapsed_ms,
                    "gateway_request_failed"
                );
                self.telemetry.on_event(GatewayTelemetryEvent::RequestFailed {
                    request_id: request_id.to_string(),
                    operation,
                    error_kind: err.kind,
                    elapsed_ms,
                });
            }
        }
    }
}

fn resolve_request_id(request_id: Option<RequestId>) -> RequestId {
    request_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

fn request_span(
    request_id: &str,
    selected: &SelectedBackend,
    operation: GatewayOperation,
) -> tracing::Span {
    tracing::info_span!(
        target: "ai_gateway",
        "gateway_request",
        request_id = %request_id,
        backend_id = %selected.backend_id,
        model = %selected.resolved_model,
        operation = operation.as_str()
    )
}
