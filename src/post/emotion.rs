use std::sync::Arc;

use rand::Rng;

use crate::post::{
    palettes::{EMOJIS_PER_POST, FALLBACK_EMOJIS, emojis_for_label, unmapped_label_emojis},
    ports::{SentimentClassifierPort, SentimentRequest},
    sampling::{SharedRng, sample_distinct},
};

/// Decorates text with emoji matching its sentiment. Never fails.
#[derive(Clone)]
pub struct EmotionTagger {
    port: Arc<dyn SentimentClassifierPort>,
}

impl EmotionTagger {
    pub fn new(port: Arc<dyn SentimentClassifierPort>) -> Self {
        Self { port }
    }

    pub async fn tag(&self, request_id: &str, text: &str, rng: &SharedRng) -> String {
        let label = match self
            .port
            .classify(SentimentRequest {
                request_id: request_id.to_string(),
                text: text.to_string(),
            })
            .await
        {
            Ok(label) => label,
            Err(err) => {
                tracing::warn!(
                    target: "post",
                    request_id = %request_id,
                    error_kind = ?err.kind,
                    error = %err,
                    "sentiment_classification_failed"
                );
                return FALLBACK_EMOJIS.to_string();
            }
        };

        tracing::debug!(
            target: "post",
            request_id = %request_id,
            label = %label.label,
            score = ?label.score,
            "sentiment_classified"
        );
        rng.with(|rng| pick_emojis(&label.label, rng))
    }
}

/// Samples emoji for a raw classifier label, falling back when the label has too few candidates.
pub fn pick_emojis<R>(label: &str, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let normalized = label.trim().to_lowercase();
    let candidates = match emojis_for_label(&normalized) {
        Some(candidates) => candidates,
        None => {
            tracing::info!(
                target: "post",
                label = %normalized,
                "sentiment_label_unmapped"
            );
            unmapped_label_emojis()
        }
    };

    match sample_distinct(rng, candidates, EMOJIS_PER_POST) {
        Some(picked) => picked.concat(),
        None => FALLBACK_EMOJIS.to_string(),
    }
}
