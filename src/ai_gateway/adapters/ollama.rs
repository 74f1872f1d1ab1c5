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
pub struct OllamaAdapter {
    client: Client,
}

impl Default for OllamaAdapter {
    fn default() -> Self {
        Self {
            client: http_common::build_client(),
        }
    }
}

#[async_trait]
impl BackendAdapter for OllamaAdapter {
    fn dialect(&self) -> BackendDialect {
        BackendDialect::Ollama
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
        let endpoint = http_common::require_endpoint(&ctx, "ollama")?;
        let url = format!("{}/api/chat", endpoint);
        let body = build_chat_body(
            &ctx.model,
            req.instructions.as_deref(),
            &req.prompt,
            &req.sampling,
        );

        // Ollama answers one sequence per call.
        let mut outputs = Vec::new();
        for _ in 0..req.sampling.num_return_sequences.max(1) {
            let payload = http_common::post_json(&self.client, &ctx, &url, &body).await?;
            outputs.push(parse_message_content(&payload, &ctx.backend_id)?);
        }
        Ok(outputs)
    }

    async fn classify(
        &self,
        ctx: AdapterContext,
        text: &str,
    ) -> Result<Vec<LabelScore>, GatewayError> {
        let endpoint = http_common::require_endpoint(&ctx, "ollama")?;
        let url = format!("{}/api/chat", endpoint);
        let instructions = http_common::sentiment_instructions();
        let sampling = SamplingParams {
            max_output_tokens: 4,
            num_return_sequences: 1,
            do_sample: false,
            temperature: 0.0,
            top_p: 1.0,
        };
        let body = build_chat_body(&ctx.model, Some(&instructions), text, &sampling);
        let payload = http_common::post_json(&self.client, &ctx, &url, &body).await?;
        let reply = parse_message_content(&payload, &ctx.backend_id)?;
        Ok(vec![http_common::parse_label_reply(
            &reply,
            &ctx.backend_id,
        )?])
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

    let temperature = if sampling.do_sample {
        sampling.temperature
    } else {
        0.0
    };

    json!({
        "model": model,
        "messages": messages,
        "stream": false,
        "options": {
            "num_predict": sampling.max_output_tokens,
            "temperature": temperature,
            "top_p": sampling.top_p,
        },
    })
}

pub fn parse_message_content(payload: &Value, backend_id: &str) -> Result<String, GatewayError> {
    payload
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            protocol_violation("ollama response missing message.content")
                .with_backend_id(backend_id.to_string())
        })
}
