//! Stylesheet injection.

use crate::error::{Result, SplashError};

const HEAD_CLOSE: &str = "</head>";
const HTML_OPEN: &str = "<html>";

/// Splice a `<style>` block holding `css` into `html`.
///
/// The block goes right before the first `</head>`. Without a head, a head
/// holding the block is opened right after the first literal `<html>`.
/// A document with neither anchor is rejected, even when `css` is empty;
/// empty CSS otherwise leaves the document unchanged.
pub fn inject_css(html: &str, css: &str) -> Result<String> {
    if let Some(at) = html.find(HEAD_CLOSE) {
        if css.is_empty() {
            return Ok(html.to_string());
        }
        let mut out = String::with_capacity(html.len() + css.len() + 32);
        out.push_str(&html[..at]);
        out.push_str("<style>");
        out.push_str(css);
        out.push_str("\n    </style>\n  ");
        out.push_str(&html[at..]);
        return Ok(out);
    }

    if let Some(at) = html.find(HTML_OPEN) {
        if css.is_empty() {
            return Ok(html.to_string());
        }
        let after = at + HTML_OPEN.len();
        let mut out = String::with_capacity(html.len() + css.len() + 64);
        out.push_str(&html[..after]);
        out.push_str("\n  <head>\n    <style>");
        out.push_str(css);
        out.push_str("\n    </style>\n  </head>");
        out.push_str(&html[after..]);
        return Ok(out);
    }

    Err(SplashError::MissingAnchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserts_before_head_close() {
        let out = inject_css("<html><head><title>t</title></head><body></body></html>", "p{}").unwrap();
        assert_eq!(
            out,
            "<html><head><title>t</title><style>p{}\n    </style>\n  </head><body></body></html>"
        );
    }

    #[test]
    fn test_opens_head_after_html() {
        let out = inject_css("<html><body>x</body></html>", "p{}").unwrap();
        assert_eq!(
            out,
            "<html>\n  <head>\n    <style>p{}\n    </style>\n  </head><body>x</body></html>"
        );
    }

    #[test]
    fn test_only_first_head_is_used() {
        let out = inject_css("<head></head><head></head>", "x").unwrap();
        assert_eq!(out.matches("<style>").count(), 1);
        assert!(out.starts_with("<head><style>x"));
    }

    #[test]
    fn test_html_with_attributes_is_not_an_anchor() {
        let err = inject_css("<html lang=\"en\"><body></body></html>", "p{}").unwrap_err();
        assert!(matches!(err, SplashError::MissingAnchor));
    }

    #[test]
    fn test_missing_anchor() {
        assert!(matches!(
            inject_css("<body><pre>x</pre></body>", "p{}"),
            Err(SplashError::MissingAnchor)
        ));
        assert!(matches!(
            inject_css("<p>no css</p>", ""),
            Err(SplashError::MissingAnchor)
        ));
    }

    #[test]
    fn test_empty_css_leaves_document_alone() {
        let html = "<html><head></head></html>";
        assert_eq!(inject_css(html, "").unwrap(), html);
    }
}
