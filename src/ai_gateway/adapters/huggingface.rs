use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::ai_gateway::{
    adapters::{BackendAdapter, http_common},
    error::{GatewayError, protocol_violation},
    types::{
        AdapterContext, BackendCapabilities, BackendDialect, LabelScore, SamplingParams,
        TextGenerationRequest,
    },
};

/// Hugging Face Inference API: one hosted pipeline per model id.
#[derive(Clone)]
pub struct HuggingFaceInferenceAdapter {
    client: Client,
}

impl Default for HuggingFaceInferenceAdapter {
    fn default() -> Self {
        Self {
            client: http_common::build_client(),
        }
    }
}

#[async_trait]
impl BackendAdapter for HuggingFaceInferenceAdapter {
    fn dialect(&self) -> BackendDialect {
        BackendDialect::HuggingFaceInference
    }

    fn static_capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            text_generation: true,
            sentiment_classification: true,
        }
    }

    async fn generate_text(
        &self,
        ctx: AdapterContext,
        req: &TextGenerationRequest,
    ) -> Result<Vec<String>, GatewayError> {
        let url = model_url(&ctx)?;
        let body = build_generation_body(&req.prompt, &req.sampling);
        let payload = http_common::post_json(&self.client, &ctx, &url, &body).await?;
        parse_generation_payload(&payload, &ctx.backend_id)
    }

    async fn classify(
        &self,
        ctx: AdapterContext,
        text: &str,
    ) -> Result<Vec<LabelScore>, GatewayError> {
        let url = model_url(&ctx)?;
        let payload =
            http_common::post_json(&self.client, &ctx, &url, &json!({ "inputs": text })).await?;
        parse_classification_payload(&payload, &ctx.backend_id)
    }
}

fn model_url(ctx: &AdapterContext) -> Result<String, GatewayError> {
    let endpoint = http_common::require_endpoint(ctx, "huggingface-inference")?;
    Ok(format!("{}/models/{}", endpoint, ctx.model))
}

pub fn build_generation_body(prompt: &str, sampling: &SamplingParams) -> Value {
    json!({
        "inputs": prompt,
        "parameters": {
            "max_new_tokens": sampling.max_output_tokens,
            "num_return_sequences": sampling.num_return_sequences.max(1),
            "do_sample": sampling.do_sample,
            "temperature": sampling.temperature,
            "top_p": sampling.top_p,
            "return_full_text": true,
        },
        "options": {
            "wait_for_model": true,
        },
    })
}

pub fn parse_generation_payload(
    payload: &Value,
    backend_id: &str,
) -> Result<Vec<String>, GatewayError> {
    let items = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(_) => std::slice::from_ref(payload),
        _ => &[],
    };

    let texts = items
        .iter()
        .filter_map(|item| item.get("generated_text").and_then(Value::as_str))
        .map(str::to_string)
        .collect::<Vec<_>>();

    if texts.is_empty() {
        return Err(
            protocol_violation("huggingface response missing generated_text")
                .with_backend_id(backend_id.to_string()),
        );
    }
    Ok(texts)
}

/// Accepts both `[[{label, score}]]` and `[{label, score}]`, sorted by descending score.
pub fn parse_classification_payload(
    payload: &Value,
    backend_id: &str,
) -> Result<Vec<LabelScore>, GatewayError> {
    let outer = payload.as_array().ok_or_else(|| {
        protocol_violation("huggingface classification response is not an array")
            .with_backend_id(backend_id.to_string())
    })?;
    let candidates = match outer.first() {
        Some(Value::Array(inner)) => inner.as_slice(),
        _ => outer.as_slice(),
    };

    let mut scored = candidates
        .iter()
        .filter_map(|candidate| {
            let label = candidate.get("label").and_then(Value::as_str)?;
            Some(LabelScore {
                label: label.to_string(),
                score: candidate.get("score").and_then(Value::as_f64),
            })
        })
        .collect::<Vec<_>>();

    if scored.is_empty() {
        return Err(
            protocol_violation("huggingface classification response has no labels")
                .with_backend_id(backend_id.to_string()),
        );
    }

    scored.sort_by(|a, b| {
        b.score
            .unwrap_or(f64::MIN)
            .total_cmp(&a.score.unwrap_or(f64::MIN))
    });
    Ok(scored)
}
