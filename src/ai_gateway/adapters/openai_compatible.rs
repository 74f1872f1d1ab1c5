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

#[derive(Clone)]
pub struct OpenAiCompatibleAdapter {
    client: Client,
}

impl Default for OpenAiCompatibleAdapter {
    fn default() -> Self {
        Self {
            client: http_common::build_client(),
        }
    }
}

#[async_trait]
impl BackendAdapter for OpenAiCompatibleAdapter {
    fn dialect(&self) -> BackendDialect {
        BackendDialect::OpenAiCompatible
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
        let endpoint = http_common::require_endpoint(&ctx, "openai-compatible")?;
        let url = format!("{}/chat/completions", endpoint);
        let body = build_chat_body(
            &ctx.model,
            req.instructions.as_deref(),
            &req.prompt,
            &req.sampling,
        );
        let payload = http_common::post_json(&self.client, &ctx, &url, &body).await?;
        parse_choices(&payload, &ctx.backend_id)
    }

    async fn classify(
        &self,
        ctx: AdapterContext,
        text: &str,
    ) -> Result<Vec<LabelScore>, GatewayError> {
        let endpoint = http_common::require_endpoint(&ctx, "openai-compatible")?;
        let url = format!("{}/chat/completions", endpoint);
        let instructions = http_common::sentiment_instructions();
        let body = build_chat_body(&ctx.model, Some(&instructions), text, &classifier_sampling());
        let payload = http_common::post_json(&self.client, &ctx, &url, &body).await?;
        let reply = parse_choices(&payload, &ctx.backend_id)?
            .into_iter()
            .next()
            .unwrap_or_default();
        Ok(vec![http_common::parse_label_reply(
            &reply,
            &ctx.backend_id,
        )?])
    }
}

fn classifier_sampling() -> SamplingParams {
    SamplingParams {
        max_output_tokens: 4,
        num_return_sequences: 1,
        do_sample: false,
        temperature: 0.0,
        top_p: 1.0,
    }
}

pub fn build_chat_body(
    model: &str,
    instructions: Option<&str>,
    prompt: &str,
    sampling: &SamplingParams,
) -> Value {
    let mut messages = Vec::new();
    if let Some(instructions) = instructions {
        messages.push(json!({"role": "system", "content": instructions}));
    }
    messages.push(json!({"role": "user", "content": prompt}));

    // Greedy decoding is expressed as temperature 0 on chat endpoints.
    let temperature = if sampling.do_sample {
        sampling.temperature
    } else {
        0.0
    };

    json!({
        "model": model,
        "messages": messages,
        "max_tokens": sampling.max_output_tokens,
        "temperature": temperature,
        "top_p": sampling.top_p,
        "n": sampling.num_return_sequences.max(1),
        "stream": false,
    })
}

pub fn parse_choices(payload: &Value, backend_id: &str) -> Result<Vec<String>, GatewayError> {
    let choices = payload
        .get("choices")
        .and_then(Value::as_array)
        .filter(|choices| !choices.is_empty())
        .ok_or_else(|| {
            protocol_violation("openai-compatible response missing choices")
                .with_backend_id(backend_id.to_string())
        })?;

    Ok(choices
        .iter()
        .map(|choice| {
            choice
                .get("message")
                .and_then(|message| message.get("content"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        })
        .collect())
}
