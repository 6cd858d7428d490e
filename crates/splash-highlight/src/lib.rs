//! Tokenizing and rendering capabilities for splash.
//!
//! The code block rewriter in the `splash` crate does not know how to lex any
//! programming language, nor how to turn tokens into markup. It consumes those
//! capabilities through the traits defined here:
//!
//! - [`Tokenizer`]: turns source text into a token stream
//! - [`TokenizerProvider`]: hands out tokenizers by declared language or by
//!   auto-detection, with a fixed fallback
//! - [`Renderer`]: How a token stream and a [`Style`] become markup and CSS
//!
//! # Language Selection
//!
//! [`TokenizerProvider::select`] encodes the precedence every caller should use:
//!
//! | Step | Source | On failure |
//! |------|--------|------------|
//! | 1 | declared language (e.g. `class="language-go"`) | go to 2 |
//! | 2 | auto-detection over the source text | go to 3 |
//! | 3 | the provider's fallback tokenizer | always succeeds |
//!
//! Resolution failures are never errors. Only [`Tokenizer::tokenize`] and the
//! [`Renderer`] methods can fail.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use splash_highlight::{HtmlRenderer, Renderer, SyntectProvider, TokenizerProvider, coalesce};
//! use splash_theme::StyleSet;
//!
//! let provider = SyntectProvider::new();
//! let styles = StyleSet::builtin();
//! let renderer = HtmlRenderer::default();
//!
//! let tokenizer = provider.select(Some("go"), "package main");
//! let tokens = coalesce(tokenizer.tokenize("package main")?);
//! let html = renderer.render_markup(&tokens, styles.resolve_or_default("github"))?;
//! // <pre class="splash"><span class="k">package</span> main</pre>
//! ```

mod detect;
mod render;
mod types;

#[cfg(feature = "syntect")]
pub mod syntect;

pub use detect::{detect_language, normalize_language};
pub use render::{CONTAINER_CLASS, HtmlRenderer, coalesce, html_escape, tokens_to_html};
pub use splash_theme::{Style, StyleSet, TokenKind};
pub use types::{RenderError, Token, TokenizeError};

#[cfg(feature = "syntect")]
pub use self::syntect::{SyntectProvider, SyntectTokenizer};

/// A tokenizer for one language.
///
/// This is implemented by:
/// - syntect based tokenizers ([`SyntectTokenizer`])
/// - Mock implementations (for testing)
pub trait Tokenizer {
    /// Identifier of the language this tokenizer handles.
    fn language(&self) -> &str;

    /// Split `source` into an ordered token stream.
    ///
    /// Concatenating the text of the returned tokens must reproduce `source`.
    fn tokenize(&self, source: &str) -> Result<Vec<Token>, TokenizeError>;
}

/// Provides tokenizers for languages.
///
/// Tokenizers are returned by value; implementations are expected to make
/// them cheap to produce (e.g. by sharing grammar data behind an `Arc`).
pub trait TokenizerProvider {
    /// The tokenizer type this provider returns.
    type Tokenizer: Tokenizer;

    /// Get a tokenizer for a declared language identifier.
    ///
    /// Returns `None` if the language is not supported.
    fn by_language(&self, language: &str) -> Option<Self::Tokenizer>;

    /// Guess a tokenizer from the source text itself.
    ///
    /// Returns `None` if no language could be identified with confidence.
    fn detect(&self, source: &str) -> Option<Self::Tokenizer>;

    /// The tokenizer used when neither a declared language nor detection
    /// produced one. Always available.
    fn fallback(&self) -> Self::Tokenizer;

    /// Pick a tokenizer: declared language first, then detection, then the fallback.
    fn select(&self, declared: Option<&str>, source: &str) -> Self::Tokenizer {
        if let Some(language) = declared {
            if let Some(tokenizer) = self.by_language(language) {
                return tokenizer;
            }
            log::debug!("no tokenizer for declared language {language:?}, detecting");
        }
        if let Some(tokenizer) = self.detect(source) {
            return tokenizer;
        }
        log::debug!("language detection failed, using fallback tokenizer");
        self.fallback()
    }
}

/// Turns token streams into highlighted markup, and styles into CSS.
pub trait Renderer {
    /// The class placed on the element that wraps highlighted markup.
    ///
    /// CSS produced by [`Renderer::render_css`] is scoped to this class.
    fn container_class(&self) -> &str;

    /// CSS rules for `style`.
    fn render_css(&self, style: &Style) -> Result<String, RenderError>;

    /// Highlighted markup for `tokens`, wrapped in the renderer's container element.
    fn render_markup(&self, tokens: &[Token], style: &Style) -> Result<String, RenderError>;
}
