use std::sync::Arc;

use crate::post::{
    error::{PostError, invalid_input},
    ports::{CaptionGeneratorPort, CaptionRequest},
    types::GenerationOptions,
};

/// Turns a topic into one caption through the text-generation capability.
#[derive(Clone)]
pub struct CaptionProducer {
    port: Arc<dyn CaptionGeneratorPort>,
    options: GenerationOptions,
}

impl CaptionProducer {
    pub fn new(port: Arc<dyn CaptionGeneratorPort>, options: GenerationOptions) -> Self {
        Self { port, options }
    }

    pub async fn produce(&self, request_id: &str, topic: &str) -> Result<String, PostError> {
        if topic.trim().is_empty() {
            return Err(invalid_input("topic cannot be empty"));
        }

        let caption = self
            .port
            .generate(CaptionRequest {
                request_id: request_id.to_string(),
                prompt: topic.to_string(),
                options: self.options.clone(),
            })
            .await?;
        Ok(caption.trim().to_string())
    }
}
