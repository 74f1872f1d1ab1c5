use async_trait::async_trait;

use crate::post::{
    error::PostError,
    types::{GenerationOptions, SentimentLabel},
};

#[derive(Debug, Clone)]
pub struct CaptionRequest {
    pub request_id: String,
    pub prompt: String,
    pub options: GenerationOptions,
}

#[derive(Debug, Clone)]
pub struct SentimentRequest {
    pub request_id: String,
    pub text: String,
}

#[async_trait]
pub trait CaptionGeneratorPort: Send + Sync {
    async fn generate(&self, req: CaptionRequest) -> Result<String, PostError>;
}

#[async_trait]
pub trait SentimentClassifierPort: Send + Sync {
    async fn classify(&self, req: SentimentRequest) -> Result<SentimentLabel, PostError>;
}
