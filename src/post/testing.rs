use std::{future::Future, pin::Pin, sync::Arc};

use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng};

use crate::post::{
    error::{PostError, classification_failed, generation_failed},
    generator::PostGenerator,
    ports::{CaptionGeneratorPort, CaptionRequest, SentimentClassifierPort, SentimentRequest},
    types::{GenerationOptions, SentimentLabel},
};

type CaptionFuture = Pin<Box<dyn Future<Output = Result<String, PostError>> + Send>>;
type SentimentFuture = Pin<Box<dyn Future<Output = Result<SentimentLabel, PostError>> + Send>>;

pub type CaptionHook = Arc<dyn Fn(CaptionRequest) -> CaptionFuture + Send + Sync>;
pub type SentimentHook = Arc<dyn Fn(SentimentRequest) -> SentimentFuture + Send + Sync>;

pub fn boxed<T>(
    future: impl Future<Output = T> + Send + 'static,
) -> Pin<Box<dyn Future<Output = T> + Send>>
where
    T: Send + 'static,
{
    Box::pin(future)
}

pub struct HookCaptionGenerator {
    hook: CaptionHook,
}

impl HookCaptionGenerator {
    pub fn new(hook: CaptionHook) -> Self {
        Self { hook }
    }
}

#[async_trait]
impl CaptionGeneratorPort for HookCaptionGenerator {
    async fn generate(&self, req: CaptionRequest) -> Result<String, PostError> {
        (self.hook)(req).await
    }
}

pub struct HookSentimentClassifier {
    hook: SentimentHook,
}

impl HookSentimentClassifier {
    pub fn new(hook: SentimentHook) -> Self {
        Self { hook }
    }
}

#[async_trait]
impl SentimentClassifierPort for HookSentimentClassifier {
    async fn classify(&self, req: SentimentRequest) -> Result<SentimentLabel, PostError> {
        (self.hook)(req).await
    }
}

pub fn caption_returning(text: &'static str) -> CaptionHook {
    Arc::new(move |_req: CaptionRequest| {
        boxed(async move { Ok::<_, PostError>(text.to_string()) })
    })
}

pub fn caption_failing(message: &'static str) -> CaptionHook {
    Arc::new(move |_req: CaptionRequest| {
        boxed(async move { Err::<String, _>(generation_failed(message)) })
    })
}

pub fn sentiment_returning(label: &'static str) -> SentimentHook {
    Arc::new(move |_req: SentimentRequest| {
        boxed(async move {
            Ok::<_, PostError>(SentimentLabel {
                label: label.to_string(),
                score: Some(0.99),
            })
        })
    })
}

pub fn sentiment_failing(message: &'static str) -> SentimentHook {
    Arc::new(move |_req: SentimentRequest| {
        boxed(async move { Err::<SentimentLabel, _>(classification_failed(message)) })
    })
}

/// Builds a generator over hook-backed ports with a seeded random source.
pub fn generator_with_hooks(
    caption: CaptionHook,
    sentiment: SentimentHook,
    seed: u64,
) -> PostGenerator {
    PostGenerator::new(
        Arc::new(HookCaptionGenerator::new(caption)),
        Arc::new(HookSentimentClassifier::new(sentiment)),
        GenerationOptions::default(),
    )
    .with_rng(StdRng::seed_from_u64(seed))
}
