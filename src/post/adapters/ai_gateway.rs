use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    ai_gateway::{
        gateway::AIGateway,
        types::{ClassificationRequest, SamplingParams, TextGenerationRequest},
    },
    post::{
        error::{PostError, classification_failed, generation_failed},
        ports::{CaptionGeneratorPort, CaptionRequest, SentimentClassifierPort, SentimentRequest},
        types::{GenerationOptions, SentimentLabel},
    },
};

#[derive(Clone)]
pub struct AIGatewayCaptionGenerator {
    gateway: Arc<AIGateway>,
    route: Option<String>,
    instructions: Option<String>,
}

impl AIGatewayCaptionGenerator {
    pub fn new(gateway: Arc<AIGateway>, route: Option<String>, instructions: Option<String>) -> Self {
        Self {
            gateway,
            route,
            instructions,
        }
    }
}

#[derive(Clone)]
pub struct AIGatewaySentimentClassifier {
    gateway: Arc<AIGateway>,
    route: Option<String>,
}

impl AIGatewaySentimentClassifier {
    pub fn new(gateway: Arc<AIGateway>, route: Option<String>) -> Self {
        Self { gateway, route }
    }
}

#[async_trait]
impl CaptionGeneratorPort for AIGatewayCaptionGenerator {
    async fn generate(&self, req: CaptionRequest) -> Result<String, PostError> {
        let response = self
            .gateway
            .generate_text(TextGenerationRequest {
                request_id: Some(format!("{}:caption", req.request_id)),
                route: self.route.clone(),
                instructions: self.instructions.clone(),
                prompt: req.prompt,
                sampling: sampling_params(&req.options),
            })
            .await
            .map_err(|err| generation_failed(err.to_string()))?;
        Ok(response.text)
    }
}

#[async_trait]
impl SentimentClassifierPort for AIGatewaySentimentClassifier {
    async fn classify(&self, req: SentimentRequest) -> Result<SentimentLabel, PostError> {
        let response = self
            .gateway
            .classify(ClassificationRequest {
                request_id: Some(format!("{}:sentiment", req.request_id)),
                route: self.route.clone(),
                text: req.text,
            })
            .await
            .map_err(|err| classification_failed(err.to_string()))?;
        Ok(SentimentLabel {
            label: response.label,
            score: response.score,
        })
    }
}

fn sampling_params(options: &GenerationOptions) -> SamplingParams {
    SamplingParams {
        max_output_tokens: options.max_output_tokens,
        num_return_sequences: options.num_return_sequences,
        do_sample: options.do_sample,
        temperature: options.temperature,
        top_p: options.top_p,
    }
}
