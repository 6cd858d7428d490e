//! Errors of a highlighting pass.

use splash_highlight::{RenderError, TokenizeError};
use thiserror::Error;

/// Errors that abort a highlighting pass.
///
/// No partial output is ever returned alongside one of these. The
/// underlying tokenizer or renderer failure is the error's source.
#[derive(Debug, Error)]
pub enum SplashError {
    /// The document has neither `</head>` nor `<html>` to hold the stylesheet.
    #[error("HTML should contain </head> or <html> to add the stylesheet")]
    MissingAnchor,

    #[error("document is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("code block at byte {offset} could not be tokenized")]
    Tokenize {
        offset: usize,
        #[source]
        source: TokenizeError,
    },

    #[error("code block at byte {offset} could not be rendered")]
    Render {
        offset: usize,
        #[source]
        source: RenderError,
    },
}

pub type Result<T, E = SplashError> = std::result::Result<T, E>;
