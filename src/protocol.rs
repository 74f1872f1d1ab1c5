use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::post::{GeneratedPost, Platform, PostState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Generate { topic: String, platform: Platform },
    Clear,
    Copy(GeneratedPost),
    Exit,
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid message json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("'{kind}' message is missing field '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("{0}")]
    InvalidPlatform(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireMessage {
    #[serde(rename = "type")]
    kind: WireMessageType,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    emojis: Option<String>,
    #[serde(default)]
    hashtags: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum WireMessageType {
    Generate,
    Clear,
    Copy,
    Exit,
}

pub fn parse_client_message(line: &str) -> Result<ClientMessage, ProtocolError> {
    let wire: WireMessage = serde_json::from_str(line)?;
    let message = match wire.kind {
        WireMessageType::Generate => {
            // A missing topic is a valid request that yields the input prompt.
            let topic = wire.topic.unwrap_or_default();
            let platform = wire
                .platform
                .ok_or(ProtocolError::MissingField {
                    kind: "generate",
                    field: "platform",
                })?
                .parse::<Platform>()
                .map_err(|err| ProtocolError::InvalidPlatform(err.to_string()))?;
            ClientMessage::Generate { topic, platform }
        }
        WireMessageType::Clear => ClientMessage::Clear,
        WireMessageType::Copy => ClientMessage::Copy(GeneratedPost {
            caption: wire.caption.unwrap_or_default(),
            emojis: wire.emojis.unwrap_or_default(),
            hashtags: wire.hashtags.unwrap_or_default(),
        }),
        WireMessageType::Exit => ClientMessage::Exit,
    };
    Ok(message)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Post {
        state: PostState,
        caption: String,
        emojis: String,
        hashtags: String,
    },
    Cleared {
        caption: String,
        emojis: String,
        hashtags: String,
    },
    Copied {
        status: String,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn post(state: PostState, post: GeneratedPost) -> Self {
        Self::Post {
            state,
            caption: post.caption,
            emojis: post.emojis,
            hashtags: post.hashtags,
        }
    }

    pub fn cleared() -> Self {
        Self::Cleared {
            caption: String::new(),
            emojis: String::new(),
            hashtags: String::new(),
        }
    }
}

pub fn encode_server_message(message: &ServerMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}
