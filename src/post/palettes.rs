//! Fixed emoji and hashtag tables. Read-only for the life of the process.

use crate::post::types::Platform;

pub const EMOJIS_PER_POST: usize = 3;
pub const PLATFORM_TAGS_PER_POST: usize = 2;
pub const MAX_CONTENT_TAGS: usize = 5;
/// Topic words must be longer than this many characters to become a tag.
pub const MIN_TAG_WORD_CHARS: usize = 3;

pub const FALLBACK_EMOJIS: &str = "😊😊😊";

const POSITIVE_EMOJIS: &[&str] = &["😊", "🌟", "🔥", "💪", "🚀", "✨"];
const NEGATIVE_EMOJIS: &[&str] = &["😢", "😞", "💔", "😠", "😓"];
const NEUTRAL_EMOJIS: &[&str] = &["🙂", "😐", "🧐", "🤔", "😶"];
const UNMAPPED_LABEL_EMOJIS: &[&str] = &["😐"];

const INSTAGRAM_TAGS: &[&str] = &[
    "#instadaily",
    "#igers",
    "#picoftheday",
    "#instagood",
    "#photooftheday",
];
const LINKEDIN_TAGS: &[&str] = &[
    "#career",
    "#leadership",
    "#networking",
    "#business",
    "#success",
];
const TWITTER_TAGS: &[&str] = &["#tweet", "#trending", "#news", "#viral", "#twitter"];

/// Looks up a normalized (lower-case) sentiment label.
pub fn emojis_for_label(label: &str) -> Option<&'static [&'static str]> {
    match label {
        "positive" => Some(POSITIVE_EMOJIS),
        "negative" => Some(NEGATIVE_EMOJIS),
        "neutral" => Some(NEUTRAL_EMOJIS),
        _ => None,
    }
}

pub fn unmapped_label_emojis() -> &'static [&'static str] {
    UNMAPPED_LABEL_EMOJIS
}

pub fn platform_tags(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Instagram => INSTAGRAM_TAGS,
        Platform::LinkedIn => LINKEDIN_TAGS,
        Platform::Twitter => TWITTER_TAGS,
    }
}
