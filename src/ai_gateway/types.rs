use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

pub type BackendId = String;
pub type ModelId = String;
pub type RequestId = String;
pub const DEFAULT_ROUTE_ALIAS: &str = "default";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BackendDialect {
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "huggingface_inference")]
    HuggingFaceInference,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendCapabilities {
    #[serde(default = "default_enabled_true")]
    pub text_generation: bool,
    #[serde(default = "default_enabled_true")]
    pub sentiment_classification: bool,
}

impl Default for BackendCapabilities {
    fn default() -> Self {
        Self {
            text_generation: true,
            sentiment_classification: true,
        }
    }
}

fn default_enabled_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialRef {
    Env { var: String },
    InlineToken { token: String },
    None,
}

#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub auth_header: Option<String>,
    pub extra_headers: Vec<(String, String)>,
}

impl ResolvedCredential {
    pub fn none() -> Self {
        Self {
            auth_header: None,
            extra_headers: Vec::new(),
        }
    }

    pub fn bearer(token: &str) -> Self {
        Self {
            auth_header: Some(format!("Bearer {}", token)),
            extra_headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendProfile {
    pub id: BackendId,
    pub dialect: BackendDialect,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub credential: CredentialRef,
    pub models: Vec<ModelProfile>,
    #[serde(default)]
    pub capabilities: Option<BackendCapabilities>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelProfile {
    pub id: ModelId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelTarget {
    pub backend_id: BackendId,
    pub model_id: ModelId,
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIGatewayConfig {
    pub backends: Vec<BackendProfile>,
    #[serde(default)]
    pub route_aliases: BTreeMap<String, ModelTarget>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Sampling parameters for one text-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub max_output_tokens: u64,
    pub num_return_sequences: u32,
    pub do_sample: bool,
    pub temperature: f64,
    pub top_p: f64,
}

#[derive(Debug, Clone)]
pub struct TextGenerationRequest {
    pub request_id: Option<RequestId>,
    pub route: Option<String>,
    /// System-level guidance for chat dialects; completion dialects ignore it.
    pub instructions: Option<String>,
    pub prompt: String,
    pub sampling: SamplingParams,
}

#[derive(Debug, Clone)]
pub struct TextGenerationResponse {
    pub request_id: RequestId,
    pub backend_id: BackendId,
    pub model: ModelId,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub request_id: Option<RequestId>,
    pub route: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ClassificationResponse {
    pub request_id: RequestId,
    pub backend_id: BackendId,
    pub model: ModelId,
    pub label: String,
    pub score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AdapterContext {
    pub backend_id: BackendId,
    pub model: String,
    pub profile: BackendProfile,
    pub credential: ResolvedCredential,
    pub timeout: Duration,
    pub request_id: RequestId,
}
