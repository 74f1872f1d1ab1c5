pub mod adapters;
pub mod caption;
pub mod emotion;
pub mod error;
pub mod generator;
pub mod hashtags;
pub mod palettes;
pub mod ports;
pub mod sampling;
pub mod testing;
pub mod types;

pub use adapters::ai_gateway::{AIGatewayCaptionGenerator, AIGatewaySentimentClassifier};
pub use error::{PostError, PostErrorKind};
pub use generator::{GENERATION_FAILED_MESSAGE, PROMPT_FOR_INPUT_MESSAGE, PostGenerator};
pub use ports::{CaptionGeneratorPort, CaptionRequest, SentimentClassifierPort, SentimentRequest};
pub use types::{
    GeneratedPost, GenerationOptions, Platform, PostOutcome, PostRequest, PostState,
    SentimentLabel,
};
