use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostErrorKind {
    InvalidInput,
    GenerationFailed,
    ClassificationFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostError {
    pub kind: PostErrorKind,
    pub message: String,
}

impl PostError {
    pub fn new(kind: PostErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for PostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PostError {}

pub fn invalid_input(message: impl Into<String>) -> PostError {
    PostError::new(PostErrorKind::InvalidInput, message)
}

pub fn generation_failed(message: impl Into<String>) -> PostError {
    PostError::new(PostErrorKind::GenerationFailed, message)
}

pub fn classification_failed(message: impl Into<String>) -> PostError {
    PostError::new(PostErrorKind::ClassificationFailed, message)
}
