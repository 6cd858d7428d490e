//! Token stream types and the errors the capabilities can report.

use splash_theme::TokenKind;
use thiserror::Error;

/// A run of source text with its semantic kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// An unstyled token.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, text)
    }
}

/// A tokenizer could not process its input.
#[derive(Debug, Clone, Error)]
#[error("failed to tokenize {language}: {message}")]
pub struct TokenizeError {
    /// Language of the tokenizer that failed.
    pub language: String,
    pub message: String,
}

impl TokenizeError {
    pub fn new(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            message: message.into(),
        }
    }
}

/// A renderer could not produce markup or CSS.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("failed to render markup: {0}")]
    Markup(String),
    #[error("failed to render CSS for style {style}: {message}")]
    Css { style: String, message: String },
}

impl From<std::fmt::Error> for RenderError {
    fn from(e: std::fmt::Error) -> Self {
        RenderError::Markup(e.to_string())
    }
}
