use std::time::{Duration, Instant};

use reqwest::{Client, header};
use serde_json::Value;

use crate::ai_gateway::{
    error::{GatewayError, GatewayErrorKind, protocol_violation},
    types::{AdapterContext, LabelScore},
};

pub const SENTIMENT_LABELS: [&str; 3] = ["positive", "negative", "neutral"];

pub fn build_client() -> Client {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
}

pub fn require_endpoint(ctx: &AdapterContext, dialect_name: &str) -> Result<String, GatewayError> {
    ctx.profile
        .endpoint
        .as_deref()
        .map(|endpoint| endpoint.trim_end_matches('/').to_string())
        .filter(|endpoint| !endpoint.is_empty())
        .ok_or_else(|| {
            GatewayError::new(
                GatewayErrorKind::InvalidRequest,
                format!("{} backend requires endpoint", dialect_name),
            )
            .with_retryable(false)
            .with_backend_id(ctx.backend_id.clone())
        })
}

/// Posts a JSON body and decodes a JSON response, mapping every failure onto the gateway taxonomy.
pub async fn post_json(
    client: &Client,
    ctx: &AdapterContext,
    url: &str,
    body: &Value,
) -> Result<Value, GatewayError> {
    let started_at = Instant::now();
    tracing::debug!(
        target: "ai_gateway.http",
        request_id = %ctx.request_id,
        backend_id = %ctx.backend_id,
        model = %ctx.model,
        timeout_ms = ctx.timeout.as_millis() as u64,
        url = %url,
        "http_dispatch_start"
    );

    let mut req_builder = client
        .post(url)
        .timeout(ctx.timeout)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-request-id", ctx.request_id.clone())
        .json(body);

    if let Some(auth_header) = &ctx.credential.auth_header {
        req_builder = req_builder.header(header::AUTHORIZATION, auth_header);
    }
    for (k, v) in &ctx.credential.extra_headers {
        req_builder = req_builder.header(k, v);
    }

    let response = req_builder
        .send()
        .await
        .map_err(|err| map_transport_error(&err, &ctx.backend_id))?;

    let status = response.status().as_u16();
    tracing::debug!(
        target: "ai_gateway.http",
        request_id = %ctx.request_id,
        backend_id = %ctx.backend_id,
        status = status,
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        "http_headers"
    );

    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_http_error(status, &ctx.backend_id, &body));
    }

    response.json::<Value>().await.map_err(|err| {
        if err.is_timeout() {
            map_transport_error(&err, &ctx.backend_id)
        } else {
            protocol_violation(format!("invalid response payload: {}", err))
                .with_backend_id(ctx.backend_id.clone())
        }
    })
}

pub fn map_transport_error(err: &reqwest::Error, backend_id: &str) -> GatewayError {
    let kind = if err.is_timeout() {
        GatewayErrorKind::Timeout
    } else {
        GatewayErrorKind::BackendTransient
    };
    GatewayError::new(kind, format!("backend request failed: {}", err))
        .with_backend_id(backend_id.to_string())
}

pub fn map_http_error(status: u16, backend_id: &str, body: &str) -> GatewayError {
    let normalized_body = body.chars().take(240).collect::<String>();

    let mut err = if status == 401 {
        GatewayError::new(GatewayErrorKind::Authentication, "authentication failed")
            .with_retryable(false)
    } else if status == 403 {
        GatewayError::new(GatewayErrorKind::Authorization, "authorization failed")
            .with_retryable(false)
    } else if status == 408 || status == 429 {
        GatewayError::new(
            GatewayErrorKind::RateLimited,
            format!("backend returned status {}", status),
        )
    } else if (400..500).contains(&status) {
        GatewayError::new(
            GatewayErrorKind::InvalidRequest,
            format!("backend returned status {}", status),
        )
        .with_retryable(false)
    } else {
        GatewayError::new(
            GatewayErrorKind::BackendTransient,
            format!("backend returned status {}", status),
        )
    };

    err = err
        .with_backend_id(backend_id.to_string())
        .with_provider_http_status(status);

    if !normalized_body.trim().is_empty() {
        err.message = format!("{}: {}", err.message, normalized_body.trim());
    }

    err
}

/// Instruction given to chat models so their reply is a single sentiment label.
pub fn sentiment_instructions() -> String {
    format!(
        "Classify the sentiment of the user's text. Reply with exactly one word: {}.",
        SENTIMENT_LABELS.join(", ")
    )
}

pub fn parse_label_reply(reply: &str, backend_id: &str) -> Result<LabelScore, GatewayError> {
    let label = reply
        .split(|c: char| !c.is_alphabetic())
        .find(|word| !word.is_empty())
        .map(str::to_lowercase)
        .ok_or_else(|| {
            protocol_violation("classification reply contained no label")
                .with_backend_id(backend_id.to_string())
        })?;
    Ok(LabelScore { label, score: None })
}
