//! The code block rewriter.
//!
//! Regions are discovered once against the original document, then each
//! highlightable region is replaced by its reconstructed markup in a single
//! forward pass. Any tokenize or render failure aborts the whole pass.

use crate::error::{Result, SplashError};
use crate::region::{Region, Tag, find_regions, open_tag_at};
use splash_highlight::{Renderer, Style, Tokenizer, TokenizerProvider, coalesce};
use std::borrow::Cow;

/// Counters for one rewrite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Regions replaced with highlighted markup.
    pub highlighted: usize,
    /// Regions left untouched (already highlighted, or nested markup).
    pub skipped: usize,
}

/// Result of a rewrite pass, before stylesheet injection.
#[derive(Debug, Clone, Default)]
pub struct Rewrite {
    pub html: String,
    /// CSS accumulated for every highlighted region, in document order.
    pub css: String,
    pub stats: RewriteStats,
}

/// Rewrites every code region of a document using one provider, renderer and style.
pub struct Rewriter<'a, P, R> {
    provider: &'a P,
    renderer: &'a R,
    style: &'a Style,
    unescape: bool,
}

impl<'a, P, R> Rewriter<'a, P, R>
where
    P: TokenizerProvider,
    R: Renderer,
{
    pub fn new(provider: &'a P, renderer: &'a R, style: &'a Style) -> Self {
        Self {
            provider,
            renderer,
            style,
            unescape: false,
        }
    }

    /// Decode HTML entities in code before tokenizing it.
    pub fn unescape(mut self, unescape: bool) -> Self {
        self.unescape = unescape;
        self
    }

    pub fn rewrite(&self, html: &str) -> Result<Rewrite> {
        let marker = self.renderer.container_class();
        let regions = find_regions(html, marker);

        let mut out = String::with_capacity(html.len() * 2);
        let mut css = String::new();
        let mut stats = RewriteStats::default();
        let mut last = 0;

        for region in &regions {
            if region.pattern.is_skipped() {
                log::debug!(
                    "skipping {:?} block at byte {}",
                    region.pattern,
                    region.span.start
                );
                stats.skipped += 1;
                continue;
            }

            let (replacement, region_css) = self.highlight_region(region)?;
            out.push_str(&html[last..region.span.start]);
            out.push_str(&replacement);
            css.push_str(&region_css);
            last = region.span.end;
            stats.highlighted += 1;
        }
        out.push_str(&html[last..]);

        log::debug!(
            "rewrote {} blocks, skipped {}",
            stats.highlighted,
            stats.skipped
        );
        Ok(Rewrite {
            html: out,
            css,
            stats,
        })
    }

    fn highlight_region(&self, region: &Region<'_>) -> Result<(String, String)> {
        let offset = region.span.start;
        let source = region.source(self.unescape);

        let tokenizer = self.provider.select(region.language, &source);
        log::debug!(
            "highlighting {:?} block at byte {offset} as {} (declared: {:?})",
            region.pattern,
            tokenizer.language(),
            region.language
        );

        let tokens = tokenizer
            .tokenize(&source)
            .map_err(|source| SplashError::Tokenize { offset, source })?;
        let tokens = coalesce(tokens);

        let render_err = |source| SplashError::Render { offset, source };
        let markup = self
            .renderer
            .render_markup(&tokens, self.style)
            .map_err(render_err)?;
        let css = self.renderer.render_css(self.style).map_err(render_err)?;

        let marker = self.renderer.container_class();
        let replacement = region.reconstruct(&markup, marker, marker);
        Ok((collapse_duplicate_tags(&replacement).into_owned(), css))
    }
}

/// Collapse runs of adjacent `<pre ...>` opening tags, and of `</pre>`
/// closing tags, into their first tag. Whitespace between them is dropped.
pub(crate) fn collapse_duplicate_tags(html: &str) -> Cow<'_, str> {
    if !html.contains("<pre") {
        return Cow::Borrowed(html);
    }

    let close = Tag::Pre.close();
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(i) = rest.find('<') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];

        if let Some((Tag::Pre, len)) = open_tag_at(rest) {
            out.push_str(&rest[..len]);
            rest = &rest[len..];
            while let Some((Tag::Pre, len)) = open_tag_at(rest.trim_start()) {
                rest = &rest.trim_start()[len..];
            }
        } else if let Some(after) = rest.strip_prefix(close) {
            out.push_str(close);
            rest = after;
            while let Some(after) = rest.trim_start().strip_prefix(close) {
                rest = after;
            }
        } else {
            out.push('<');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}
