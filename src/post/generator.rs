use std::sync::Arc;

use rand::RngCore;
use tracing::Instrument;
use uuid::Uuid;

use crate::post::{
    caption::CaptionProducer,
    emotion::EmotionTagger,
    hashtags::compose_hashtags,
    ports::{CaptionGeneratorPort, SentimentClassifierPort},
    sampling::SharedRng,
    types::{GeneratedPost, GenerationOptions, PostOutcome, PostRequest, PostState},
};

pub const PROMPT_FOR_INPUT_MESSAGE: &str = "Please enter a keyword or theme";
pub const GENERATION_FAILED_MESSAGE: &str =
    "An error occurred while generating the post. Please try again.";

/// Runs caption, emoji and hashtag generation for one request.
pub struct PostGenerator {
    caption: CaptionProducer,
    emotion: EmotionTagger,
    rng: SharedRng,
}

impl PostGenerator {
    pub fn new(
        caption_port: Arc<dyn CaptionGeneratorPort>,
        classifier_port: Arc<dyn SentimentClassifierPort>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            caption: CaptionProducer::new(caption_port, options),
            emotion: EmotionTagger::new(classifier_port),
            rng: SharedRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = SharedRng::new(rng);
        self
    }

    pub async fn generate(&self, request: &PostRequest) -> PostOutcome {
        if request.topic.trim().is_empty() {
            return PostOutcome {
                state: PostState::AwaitingInput,
                post: GeneratedPost::message_only(PROMPT_FOR_INPUT_MESSAGE),
            };
        }

        let request_id = Uuid::now_v7().to_string();
        let span = tracing::info_span!(
            target: "post",
            "post_request",
            request_id = %request_id,
            platform = %request.platform
        );
        self.run(&request_id, request).instrument(span).await
    }

    async fn run(&self, request_id: &str, request: &PostRequest) -> PostOutcome {
        let caption = match self.caption.produce(request_id, &request.topic).await {
            Ok(caption) => caption,
            Err(err) => {
                tracing::error!(
                    target: "post",
                    request_id = %request_id,
                    error_kind = ?err.kind,
                    error = %err,
                    "caption_generation_failed"
                );
                return PostOutcome {
                    state: PostState::Failed,
                    post: GeneratedPost::message_only(GENERATION_FAILED_MESSAGE),
                };
            }
        };

        let emojis = self.emotion.tag(request_id, &caption, &self.rng).await;
        let hashtags = self
            .rng
            .with(|rng| compose_hashtags(&request.topic, request.platform, rng));

        tracing::info!(
            target: "post",
            request_id = %request_id,
            caption_chars = caption.chars().count(),
            hashtag_count = hashtags.split_whitespace().count(),
            "post_generated"
        );

        PostOutcome {
            state: PostState::Complete,
            post: GeneratedPost {
                caption,
                emojis,
                hashtags,
            },
        }
    }
}
