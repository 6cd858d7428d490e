//! Syntax highlight the code blocks of an HTML document.
//!
//! splash finds source code embedded in `<pre>` and `<code>` elements,
//! replaces it with highlighted markup, and adds the matching stylesheet to
//! the document's `<head>`. Everything outside the code blocks is left
//! byte-for-byte intact, and running splash on its own output changes
//! nothing.
//!
//! # Usage
//!
//! ```rust,ignore
//! let html = r#"<html><head></head><body>
//! <pre><code class="language-go">fmt.Println("hi")</code></pre>
//! </body></html>"#;
//!
//! let highlighted = splash::highlight(html, "github", false)?;
//! ```
//!
//! # Recognized blocks
//!
//! | Markup | Pattern |
//! |--------|---------|
//! | `<pre>…</pre>` | [`WrappingPattern::Pre`] |
//! | `<pre><code>…</code></pre>` | [`WrappingPattern::PreCode`] |
//! | `<code><pre>…</pre></code>` | [`WrappingPattern::CodePre`] |
//! | `<code class="language-X">…</code>`, with or without `<pre>` | [`WrappingPattern::LanguageCode`] |
//! | `<code>…</code>` | [`WrappingPattern::Code`] |
//!
//! Blocks already carrying the `splash` class, and blocks whose content still
//! contains `<pre` or `<code` markup, are skipped.
//!
//! # Batch processing
//!
//! [`Processor`] runs the same transformation over files and directory
//! trees in parallel. The `splash` binary is a thin CLI over it.

mod error;
mod inject;
mod processor;
mod region;
mod rewrite;

pub use error::{Result, SplashError};
pub use inject::inject_css;
pub use processor::{ProcessError, ProcessOptions, Processor, ProcessorStats};
pub use region::{Layer, Region, Tag, WrappingPattern, find_regions};
pub use rewrite::{Rewrite, RewriteStats, Rewriter};

pub use splash_highlight::{
    HtmlRenderer, RenderError, Renderer, SyntectProvider, SyntectTokenizer, Token, TokenizeError,
    Tokenizer, TokenizerProvider,
};
pub use splash_theme::{DEFAULT_STYLE, Style, StyleSet};

use std::sync::LazyLock;

/// A configured highlighter: where tokenizers come from, how tokens become
/// markup, and which styles can be requested.
#[derive(Debug, Clone)]
pub struct Splash<P = SyntectProvider, R = HtmlRenderer> {
    provider: P,
    renderer: R,
    styles: StyleSet,
}

impl Splash {
    /// syntect grammars, the class-based HTML renderer and the built-in styles.
    pub fn new() -> Self {
        Self::with_parts(SyntectProvider::new(), HtmlRenderer::default(), StyleSet::builtin())
    }
}

impl Default for Splash {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> Splash<P, R>
where
    P: TokenizerProvider,
    R: Renderer,
{
    pub fn with_parts(provider: P, renderer: R, styles: StyleSet) -> Self {
        Self {
            provider,
            renderer,
            styles,
        }
    }

    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    /// Highlight every code block of `html` and inject the stylesheet.
    ///
    /// Unknown style names fall back to the default style. `unescape`
    /// decodes HTML entities in code before tokenizing, for documents whose
    /// code was already escaped by a Markdown renderer.
    pub fn highlight(&self, html: &str, style: &str, unescape: bool) -> Result<String> {
        let rewrite = self.highlight_blocks(html, style, unescape)?;
        inject_css(&rewrite.html, &rewrite.css)
    }

    /// [`Splash::highlight`] over raw bytes. The input must be UTF-8.
    pub fn highlight_bytes(&self, html: &[u8], style: &str, unescape: bool) -> Result<Vec<u8>> {
        let html = std::str::from_utf8(html)?;
        self.highlight(html, style, unescape).map(String::into_bytes)
    }

    /// Highlight every code block without injecting the stylesheet.
    pub fn highlight_blocks(&self, html: &str, style: &str, unescape: bool) -> Result<Rewrite> {
        let resolved = self.styles.resolve(style).unwrap_or_else(|| {
            log::debug!(
                "unknown style {style:?}, using {}",
                self.styles.default_style().name
            );
            self.styles.default_style()
        });
        Rewriter::new(&self.provider, &self.renderer, resolved)
            .unescape(unescape)
            .rewrite(html)
    }
}

static DEFAULT: LazyLock<Splash> = LazyLock::new(Splash::new);

/// Highlight `html` with the default [`Splash`].
pub fn highlight(html: &str, style: &str, unescape: bool) -> Result<String> {
    DEFAULT.highlight(html, style, unescape)
}

/// Highlight UTF-8 `html` bytes with the default [`Splash`].
pub fn highlight_bytes(html: &[u8], style: &str, unescape: bool) -> Result<Vec<u8>> {
    DEFAULT.highlight_bytes(html, style, unescape)
}

/// Rewrite the code blocks of `html` with the default [`Splash`], without
/// injecting the stylesheet.
pub fn highlight_blocks(html: &str, style: &str, unescape: bool) -> Result<Rewrite> {
    DEFAULT.highlight_blocks(html, style, unescape)
}
