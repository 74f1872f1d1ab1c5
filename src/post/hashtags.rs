use rand::Rng;

use crate::post::{
    palettes::{MAX_CONTENT_TAGS, MIN_TAG_WORD_CHARS, PLATFORM_TAGS_PER_POST, platform_tags},
    sampling::sample_distinct,
    types::Platform,
};

/// Tags derived from the topic: long-enough words, lower-cased, in original order.
pub fn content_tags(topic: &str) -> Vec<String> {
    topic
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_TAG_WORD_CHARS)
        .take(MAX_CONTENT_TAGS)
        .map(|word| format!("#{}", word))
        .collect()
}

pub fn compose_hashtags<R>(topic: &str, platform: Platform, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let mut tags = content_tags(topic);
    let platform_pool = platform_tags(platform);
    // Every platform table holds more than PLATFORM_TAGS_PER_POST entries.
    let picked = sample_distinct(rng, platform_pool, PLATFORM_TAGS_PER_POST).unwrap_or_default();
    tags.extend(picked.into_iter().map(str::to_string));
    tags.join(" ")
}
