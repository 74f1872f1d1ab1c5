use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::post::error::{PostError, invalid_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    Instagram,
    LinkedIn,
    Twitter,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::LinkedIn, Platform::Twitter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitter => "Twitter",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PostError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| {
                invalid_input(format!(
                    "unknown platform '{}': expected one of Instagram, LinkedIn, Twitter",
                    raw.trim()
                ))
            })
    }
}

impl TryFrom<String> for Platform {
    type Error = PostError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub topic: String,
    pub platform: Platform,
}

impl PostRequest {
    pub fn new(topic: impl Into<String>, platform: Platform) -> Self {
        Self {
            topic: topic.into(),
            platform,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub caption: String,
    pub emojis: String,
    pub hashtags: String,
}

impl GeneratedPost {
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            caption: message.into(),
            emojis: String::new(),
            hashtags: String::new(),
        }
    }

    /// Caption, emojis and hashtags separated by blank lines.
    pub fn to_clipboard_text(&self) -> String {
        format!("{}\n\n{}\n\n{}", self.caption, self.emojis, self.hashtags)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostState {
    AwaitingInput,
    Complete,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostOutcome {
    pub state: PostState,
    pub post: GeneratedPost,
}

fn default_max_output_tokens() -> u64 {
    100
}

fn default_num_return_sequences() -> u32 {
    1
}

fn default_do_sample() -> bool {
    true
}

fn default_temperature() -> f64 {
    0.9
}

fn default_top_p() -> f64 {
    0.9
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u64,
    #[serde(default = "default_num_return_sequences")]
    pub num_return_sequences: u32,
    #[serde(default = "default_do_sample")]
    pub do_sample: bool,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_output_tokens: default_max_output_tokens(),
            num_return_sequences: default_num_return_sequences(),
            do_sample: default_do_sample(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentLabel {
    pub label: String,
    pub score: Option<f64>,
}
