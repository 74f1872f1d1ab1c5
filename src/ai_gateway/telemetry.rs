use std::sync::OnceLock;

use crate::ai_gateway::{
    error::GatewayErrorKind,
    types::{BackendId, RequestId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOperation {
    TextGeneration,
    SentimentClassification,
}

impl GatewayOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextGeneration => "text_generation",
            Self::SentimentClassification => "sentiment_classification",
        }
    }
}

#[derive(Debug, Clone)]
pub enum GatewayTelemetryEvent {
    RequestStarted {
        request_id: RequestId,
        backend_id: BackendId,
        model: String,
        operation: GatewayOperation,
    },
    RequestCompleted {
        request_id: RequestId,
        operation: GatewayOperation,
        elapsed_ms: u64,
    },
    RequestFailed {
        request_id: RequestId,
        operation: GatewayOperation,
        error_kind: GatewayErrorKind,
        elapsed_ms: u64,
    },
}

pub trait TelemetrySink: Send + Sync {
    fn on_event(&self, event: GatewayTelemetryEvent);
}

pub fn ai_gateway_debug_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("POSTCRAFT_DEBUG_AI_GATEWAY")
            .ok()
            .is_some_and(|raw| env_flag_enabled(&raw))
    })
}

fn env_flag_enabled(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "debug"
    )
}

#[derive(Default)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn on_event(&self, _event: GatewayTelemetryEvent) {}
}

/// Forwards gateway events to the `ai_gateway.telemetry` tracing target.
#[derive(Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn on_event(&self, event: GatewayTelemetryEvent) {
        match event {
            GatewayTelemetryEvent::RequestStarted {
                request_id,
                backend_id,
                model,
                operation,
            } => {
                tracing::info!(
                    target: "ai_gateway.telemetry",
                    request_id = %request_id,
                    backend_id = %backend_id,
                    model = %model,
                    operation = operation.as_str(),
                    "request_started"
                );
            }
            GatewayTelemetryEvent::RequestCompleted {
                request_id,
                operation,
                elapsed_ms,
            } => {
                tracing::info!(
                    target: "ai_gateway.telemetry",
                    request_id = %request_id,
                    operation = operation.as_str(),
                    elapsed_ms = elapsed_ms,
                    "request_completed"
                );
            }
            GatewayTelemetryEvent::RequestFailed {
                request_id,
                operation,
                error_kind,
                elapsed_ms,
            } => {
                tracing::warn!(
                    target: "ai_gateway.telemetry",
                    request_id = %request_id,
                    operation = operation.as_str(),
                    error_kind = ?error_kind,
                    elapsed_ms = elapsed_ms,
                    "request_failed"
                );
            }
        }
    }
}
