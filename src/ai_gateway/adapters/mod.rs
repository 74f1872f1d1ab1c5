use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use crate::ai_gateway::{
    error::GatewayError,
    types::{
        AdapterContext, BackendCapabilities, BackendDialect, LabelScore, TextGenerationRequest,
    },
};

pub mod http_common;
pub mod huggingface;
pub mod ollama;
pub mod openai_compatible;

#[async_trait]
pub trait BackendAdapter: Send + Sync {
    fn dialect(&self) -> BackendDialect;
    fn static_capabilities(&self) -> BackendCapabilities;

    /// Returns every generated sequence in backend order.
    async fn generate_text(
        &self,
        ctx: AdapterContext,
        req: &TextGenerationRequest,
    ) -> Result<Vec<String>, GatewayError>;

    /// Returns the candidate labels; callers pick the highest score.
    async fn classify(
        &self,
        ctx: AdapterContext,
        text: &str,
    ) -> Result<Vec<LabelScore>, GatewayError>;
}

pub fn build_default_adapters() -> HashMap<BackendDialect, Arc<dyn BackendAdapter>> {
    let mut adapters: HashMap<BackendDialect, Arc<dyn BackendAdapter>> = HashMap::new();
    adapters.insert(
        BackendDialect::OpenAiCompatible,
        Arc::new(openai_compatible::OpenAiCompatibleAdapter::default()),
    );
    adapters.insert(
        BackendDialect::Ollama,
        Arc::new(ollama::OllamaAdapter::default()),
    );
    adapters.insert(
        BackendDialect::HuggingFaceInference,
        Arc::new(huggingface::HuggingFaceInferenceAdapter::default()),
    );
    adapters
}
