//! HTML rendering from token streams.
//!
//! Tokens are rendered as `<span class="TAG">` elements where `TAG` is the
//! short class of the token's [`TokenKind`](splash_theme::TokenKind) (`k`, `f`, `s`, ...). The matching
//! CSS comes from [`Style::to_css`], scoped to the renderer's container class.
//!
//! # Token Coalescing
//!
//! Adjacent tokens of the same kind are merged into a single element. A
//! tokenizer that reports `fn` and ` ` and `main` as three `Text` tokens
//! produces one unwrapped run of escaped text.

use crate::{Renderer, RenderError, Token};
use splash_theme::Style;
use std::fmt::Write;

/// Class of the element wrapping rendered markup.
pub const CONTAINER_CLASS: &str = "splash";

/// Merge adjacent tokens with the same kind and drop empty ones.
pub fn coalesce(tokens: Vec<Token>) -> Vec<Token> {
    let mut coalesced: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        if token.text.is_empty() {
            continue;
        }
        if let Some(last) = coalesced.last_mut() {
            if last.kind == token.kind {
                last.text.push_str(&token.text);
                continue;
            }
        }
        coalesced.push(token);
    }

    coalesced
}

/// Escape HTML special characters.
pub fn html_escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render tokens as class-annotated spans.
///
/// `Text` tokens are emitted as bare escaped text.
pub fn tokens_to_html(tokens: &[Token]) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write_tokens(&mut html, tokens);
    html
}

fn write_tokens<W: Write>(w: &mut W, tokens: &[Token]) -> std::fmt::Result {
    for token in tokens {
        match token.kind.tag() {
            Some(tag) => write!(w, "<span class=\"{tag}\">{}</span>", html_escape(&token.text))?,
            None => w.write_str(&html_escape(&token.text))?,
        }
    }
    Ok(())
}

/// Class-based HTML renderer.
///
/// Markup is wrapped in `<pre class="CONTAINER">`; the CSS for a style is
/// scoped to the same class.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    container_class: String,
}

impl HtmlRenderer {
    pub fn new(container_class: impl Into<String>) -> Self {
        Self {
            container_class: container_class.into(),
        }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(CONTAINER_CLASS)
    }
}

impl Renderer for HtmlRenderer {
    fn container_class(&self) -> &str {
        &self.container_class
    }

    fn render_css(&self, style: &Style) -> Result<String, RenderError> {
        if self.container_class.is_empty() {
            return Err(RenderError::Css {
                style: style.name.clone(),
                message: "empty container class".to_string(),
            });
        }
        Ok(style.to_css(&self.container_class))
    }

    fn render_markup(&self, tokens: &[Token], _style: &Style) -> Result<String, RenderError> {
        let len: usize = tokens.iter().map(|t| t.text.len()).sum();
        let mut html = String::with_capacity(len * 2 + 32);
        write!(html, "<pre class=\"{}\">", self.container_class)?;
        write_tokens(&mut html, tokens)?;
        html.push_str("</pre>");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splash_theme::{Color, KindStyle, Modifiers, TokenKind};

    fn keyword_style() -> Style {
        Style::new("test").with(
            TokenKind::Keyword,
            KindStyle {
                foreground: Some(Color::new(0xd7, 0x3a, 0x49)),
                background: None,
                modifiers: Modifiers {
                    bold: true,
                    ..Modifiers::default()
                },
            },
        )
    }

    #[test]
    fn test_simple_highlight() {
        let tokens = vec![
            Token::new(TokenKind::Keyword, "fn"),
            Token::text(" "),
            Token::new(TokenKind::Function, "main"),
        ];
        assert_eq!(
            tokens_to_html(&tokens),
            "<span class=\"k\">fn</span> <span class=\"f\">main</span>"
        );
    }

    #[test]
    fn test_adjacent_same_kind_coalesce() {
        let tokens = vec![
            Token::new(TokenKind::Keyword, "key"),
            Token::new(TokenKind::Keyword, "word"),
            Token::text(""),
            Token::text(" x"),
            Token::text(" y"),
        ];
        let coalesced = coalesce(tokens);
        assert_eq!(
            coalesced,
            vec![Token::new(TokenKind::Keyword, "keyword"), Token::text(" x y")]
        );
        assert_eq!(tokens_to_html(&coalesced), "<span class=\"k\">keyword</span> x y");
    }

    #[test]
    fn test_separated_same_kind_not_merged() {
        let tokens = vec![
            Token::new(TokenKind::Keyword, "with"),
            Token::text(" "),
            Token::new(TokenKind::Keyword, "use"),
        ];
        assert_eq!(coalesce(tokens).len(), 3);
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a && 'b' \"c\""), "a &amp;&amp; &#39;b&#39; &quot;c&quot;");
        let tokens = vec![Token::new(TokenKind::String, "\"<b>\"")];
        assert_eq!(
            tokens_to_html(&tokens),
            "<span class=\"s\">&quot;&lt;b&gt;&quot;</span>"
        );
    }

    #[test]
    fn test_render_markup_wraps_in_container() {
        let renderer = HtmlRenderer::default();
        let tokens = vec![Token::new(TokenKind::Keyword, "package"), Token::text(" main")];
        let html = renderer.render_markup(&tokens, &keyword_style()).unwrap();
        assert_eq!(
            html,
            "<pre class=\"splash\"><span class=\"k\">package</span> main</pre>"
        );
    }

    #[test]
    fn test_render_markup_empty_tokens() {
        let renderer = HtmlRenderer::new("hl");
        let html = renderer.render_markup(&[], &Style::plain()).unwrap();
        assert_eq!(html, "<pre class=\"hl\"></pre>");
    }

    #[test]
    fn test_render_css_scoped_to_container() {
        let renderer = HtmlRenderer::new("hl");
        let css = renderer.render_css(&keyword_style()).unwrap();
        assert!(css.contains(".hl .k {"), "got: {css}");
        assert!(css.contains("font-weight: bold"), "got: {css}");
        assert!(!css.contains(".splash"), "got: {css}");
    }

    #[test]
    fn test_render_css_rejects_empty_container() {
        let renderer = HtmlRenderer::new("");
        let err = renderer.render_css(&keyword_style()).unwrap_err();
        assert!(matches!(err, RenderError::Css { .. }));
    }
}
