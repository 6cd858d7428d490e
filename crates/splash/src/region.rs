//! Code region discovery.
//!
//! A region starts at a `<pre>` or `<code>` opening tag (with or without
//! attributes) and ends at the first matching closing tag. Regions are found
//! by scanning the text, not by parsing a DOM, so everything outside a region
//! is left byte-for-byte intact.
//!
//! Up to two wrapping layers are peeled off a region: the outer tag, and an
//! inner tag of the other kind if it wraps the whole remaining content
//! (`<pre><code>…</code></pre>` or `<code><pre>…</pre></code>`). Whitespace
//! between the two layers belongs to the outer layer. Every layer keeps its
//! original text so the same structure can be put back around the
//! highlighted markup.

use std::borrow::Cow;
use std::ops::Range;

/// A tag that can delimit a code region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Pre,
    Code,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Pre => "pre",
            Tag::Code => "code",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Tag::Pre => "</pre>",
            Tag::Code => "</code>",
        }
    }
}

/// How a region is wrapped.
///
/// Exactly one pattern applies to a region. [`Highlighted`] and [`Nested`]
/// regions are left untouched.
///
/// [`Highlighted`]: WrappingPattern::Highlighted
/// [`Nested`]: WrappingPattern::Nested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrappingPattern {
    /// `<pre>…</pre>`
    Pre,
    /// `<pre><code>…</code></pre>`
    PreCode,
    /// `<code><pre>…</pre></code>`
    CodePre,
    /// `<code class="language-X">…</code>`, optionally inside `<pre>`
    LanguageCode { in_pre: bool },
    /// `<code>…</code>` without a language
    Code,
    /// A layer already carries the marker class.
    Highlighted,
    /// The content still contains `<pre` or `<code` markup.
    Nested,
}

impl WrappingPattern {
    /// Whether regions of this pattern are skipped by the rewriter.
    pub fn is_skipped(self) -> bool {
        matches!(self, WrappingPattern::Highlighted | WrappingPattern::Nested)
    }
}

/// One stripped wrapping layer, as it appeared in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer<'a> {
    pub tag: Tag,
    /// Opening tag, plus any whitespace before the next layer.
    pub open: &'a str,
    /// Closing tag, plus any whitespace after the previous layer.
    pub close: &'a str,
}

/// A highlightable span of the document.
#[derive(Debug, Clone)]
pub struct Region<'a> {
    /// Byte span in the document.
    pub span: Range<usize>,
    pub pattern: WrappingPattern,
    /// Stripped layers, outermost first.
    pub layers: Vec<Layer<'a>>,
    /// Language from a `language-X` or `lang-X` class. The innermost layer wins.
    pub language: Option<&'a str>,
    /// Content inside the innermost layer, untrimmed.
    pub inner: &'a str,
}

impl<'a> Region<'a> {
    fn parse(whole: &'a str, offset: usize, marker: &str) -> Option<Self> {
        let (tag, open_len) = open_tag_at(whole)?;
        let inner_end = whole.len().checked_sub(tag.close().len())?;
        if inner_end < open_len || !whole.ends_with(tag.close()) {
            return None;
        }

        let mut layers = vec![Layer {
            tag,
            open: &whole[..open_len],
            close: &whole[inner_end..],
        }];
        let mut inner = open_len..inner_end;

        let body = &whole[open_len..inner_end];
        let trimmed = body.trim();
        let lead = body.len() - body.trim_start().len();
        let trail = body.len() - body.trim_end().len();
        if let Some((inner_tag, inner_open_len)) = open_tag_at(trimmed)
            && inner_tag != tag
            && trimmed.ends_with(inner_tag.close())
            && trimmed.len() >= inner_open_len + inner_tag.close().len()
        {
            let start = open_len + lead;
            let end = inner_end - trail;
            let content_start = start + inner_open_len;
            let content_end = end - inner_tag.close().len();

            layers[0].open = &whole[..start];
            layers[0].close = &whole[end..];
            layers.push(Layer {
                tag: inner_tag,
                open: &whole[start..content_start],
                close: &whole[content_end..end],
            });
            inner = content_start..content_end;
        }

        let inner = &whole[inner];
        let language = layers.iter().rev().find_map(|l| language_class(l.open));
        let pattern = classify(&layers, inner, marker);

        Some(Region {
            span: offset..offset + whole.len(),
            pattern,
            layers,
            language,
            inner,
        })
    }

    /// Source text handed to the tokenizer: trailing whitespace trimmed and,
    /// if requested, HTML entities decoded.
    pub fn source(&self, unescape: bool) -> Cow<'a, str> {
        let text = self.inner.trim_end();
        if unescape {
            html_escape::decode_html_entities(text)
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Wrap highlighted markup in the region's original layers.
    ///
    /// A `<pre>` container with class `container` around `markup` is dropped,
    /// since the region supplies its own outer layer. The marker class goes
    /// on the outermost `<pre>` layer, or on the outermost layer if there is
    /// no `<pre>`.
    pub fn reconstruct(&self, markup: &str, container: &str, marker: &str) -> String {
        let body = strip_container(markup, container);
        let marked = self
            .layers
            .iter()
            .position(|l| l.tag == Tag::Pre)
            .unwrap_or(0);

        let mut out = String::with_capacity(body.len() + 64);
        for (i, layer) in self.layers.iter().enumerate() {
            if i == marked && !marker.is_empty() {
                out.push_str(&add_class(layer.open, marker));
            } else {
                out.push_str(layer.open);
            }
        }
        out.push_str(body);
        for layer in self.layers.iter().rev() {
            out.push_str(layer.close);
        }
        out
    }
}

/// Find every region of `html`, in document order.
///
/// Spans never overlap: scanning resumes after the end of each region.
/// Comments and `<script>`, `<style>` and `<textarea>` content are skipped.
pub fn find_regions<'a>(html: &'a str, marker: &str) -> Vec<Region<'a>> {
    let mut regions = Vec::new();
    let mut pos = 0;

    while let Some(rel) = html[pos..].find('<') {
        let start = pos + rel;
        if let Some(len) = opaque_len(&html[start..]) {
            pos = start + len;
            continue;
        }
        let Some((tag, open_len)) = open_tag_at(&html[start..]) else {
            pos = start + 1;
            continue;
        };
        let body_start = start + open_len;
        let Some(close_rel) = html[body_start..].find(tag.close()) else {
            pos = start + 1;
            continue;
        };
        let end = body_start + close_rel + tag.close().len();
        if let Some(region) = Region::parse(&html[start..end], start, marker) {
            log::trace!("region {:?} at {}..{}", region.pattern, start, end);
            regions.push(region);
        }
        pos = end;
    }

    regions
}

/// Classify peeled layers. Checks run from most to least specific.
pub fn classify(layers: &[Layer<'_>], inner: &str, marker: &str) -> WrappingPattern {
    if !marker.is_empty() && layers.iter().any(|l| has_class(l.open, marker)) {
        return WrappingPattern::Highlighted;
    }
    if inner.contains("<pre") || inner.contains("<code") {
        return WrappingPattern::Nested;
    }
    match layers {
        [outer, code] if outer.tag == Tag::Pre => {
            if language_class(code.open).is_some() {
                WrappingPattern::LanguageCode { in_pre: true }
            } else {
                WrappingPattern::PreCode
            }
        }
        [_, _] => WrappingPattern::CodePre,
        [only] if only.tag == Tag::Code => {
            if language_class(only.open).is_some() {
                WrappingPattern::LanguageCode { in_pre: false }
            } else {
                WrappingPattern::Code
            }
        }
        _ => WrappingPattern::Pre,
    }
}

/// Parse a `<pre>` or `<code>` opening tag at the start of `s`.
///
/// Returns the tag and the byte length of the opening tag.
pub(crate) fn open_tag_at(s: &str) -> Option<(Tag, usize)> {
    let tag = if s.starts_with("<pre") {
        Tag::Pre
    } else if s.starts_with("<code") {
        Tag::Code
    } else {
        return None;
    };
    let name_end = 1 + tag.name().len();
    let rest = &s[name_end..];
    match rest.as_bytes().first()? {
        b'>' => Some((tag, name_end + 1)),
        b if b.is_ascii_whitespace() => Some((tag, tag_end(s, name_end)?)),
        _ => None,
    }
}

/// Byte offset just past the `>` closing the tag that `s` starts with,
/// scanning from `from`. A `>` inside a quoted attribute value does not
/// close the tag.
fn tag_end(s: &str, from: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i + 1),
            b'=' => {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                if let Some(&q) = bytes.get(i)
                    && (q == b'"' || q == b'\'')
                {
                    i += 1 + s[i + 1..].find(q as char)?;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Elements whose content is never markup.
const RAW_TEXT: [&str; 3] = ["script", "style", "textarea"];

/// Byte length of a comment or raw-text element at the start of `s`, whose
/// content may spell `<pre>` without being markup. An unclosed one runs to
/// the end of `s`.
fn opaque_len(s: &str) -> Option<usize> {
    if let Some(body) = s.strip_prefix("<!--") {
        return Some(body.find("-->").map_or(s.len(), |i| 4 + i + 3));
    }

    let bytes = s.as_bytes();
    let name = RAW_TEXT.into_iter().find(|name| {
        bytes
            .get(1..1 + name.len())
            .is_some_and(|b| b.eq_ignore_ascii_case(name.as_bytes()))
            && bytes
                .get(1 + name.len())
                .is_some_and(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
    })?;

    let Some(open_end) = tag_end(s, 1 + name.len()) else {
        return Some(s.len());
    };
    let close = s[open_end..].match_indices("</").map(|(i, _)| open_end + i).find(|&at| {
        bytes
            .get(at + 2..at + 2 + name.len())
            .is_some_and(|b| b.eq_ignore_ascii_case(name.as_bytes()))
    });
    Some(
        close
            .and_then(|at| s[at..].find('>').map(|gt| at + gt + 1))
            .unwrap_or(s.len()),
    )
}

/// Location of a class attribute's value inside an opening tag.
struct ClassAttr {
    value: Range<usize>,
    quoted: bool,
}

fn class_attr(open: &str) -> Option<ClassAttr> {
    let bytes = open.as_bytes();
    let len = bytes.len();
    let is_space = |b: u8| b.is_ascii_whitespace();

    // Skip `<` and the tag name
    let mut i = 1;
    while i < len && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }

    loop {
        while i < len && is_space(bytes[i]) {
            i += 1;
        }
        if i >= len || bytes[i] == b'>' || bytes[i] == b'/' {
            return None;
        }

        let name_start = i;
        while i < len && !is_space(bytes[i]) && bytes[i] != b'=' && bytes[i] != b'>' {
            i += 1;
        }
        let name = &open[name_start..i];
        while i < len && is_space(bytes[i]) {
            i += 1;
        }
        if i >= len || bytes[i] != b'=' {
            continue;
        }

        i += 1;
        while i < len && is_space(bytes[i]) {
            i += 1;
        }
        let attr = match bytes.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => {
                let start = i + 1;
                let end = start + open[start..].find(q as char)?;
                i = end + 1;
                ClassAttr {
                    value: start..end,
                    quoted: true,
                }
            }
            _ => {
                let start = i;
                while i < len && !is_space(bytes[i]) && bytes[i] != b'>' {
                    i += 1;
                }
                ClassAttr {
                    value: start..i,
                    quoted: false,
                }
            }
        };
        if name.eq_ignore_ascii_case("class") {
            return Some(attr);
        }
    }
}

fn classes(open: &str) -> impl Iterator<Item = &str> {
    class_attr(open)
        .map(|attr| &open[attr.value])
        .unwrap_or_default()
        .split_ascii_whitespace()
}

pub(crate) fn has_class(open: &str, class: &str) -> bool {
    classes(open).any(|c| c == class)
}

/// Language named by a `language-X` or `lang-X` class.
pub(crate) fn language_class(open: &str) -> Option<&str> {
    classes(open)
        .filter_map(|c| c.strip_prefix("language-").or_else(|| c.strip_prefix("lang-")))
        .find(|lang| !lang.is_empty())
}

/// Add `class` in front of an opening tag's existing classes, or add a class
/// attribute right after the tag name.
pub(crate) fn add_class(open: &str, class: &str) -> String {
    match class_attr(open) {
        Some(attr) if attr.quoted => {
            let sep = if attr.value.is_empty() { "" } else { " " };
            format!(
                "{}{class}{sep}{}",
                &open[..attr.value.start],
                &open[attr.value.start..]
            )
        }
        Some(attr) => format!(
            "{}\"{class} {}\"{}",
            &open[..attr.value.start],
            &open[attr.value.clone()],
            &open[attr.value.end..]
        ),
        None => {
            let name_end = open_tag_at(open).map_or(0, |(tag, _)| 1 + tag.name().len());
            format!("{} class=\"{class}\"{}", &open[..name_end], &open[name_end..])
        }
    }
}

/// Drop a renderer's `<pre class="container">…</pre>` wrapper.
fn strip_container<'m>(markup: &'m str, container: &str) -> &'m str {
    if let Some((Tag::Pre, open_len)) = open_tag_at(markup)
        && has_class(&markup[..open_len], container)
        && markup.len() >= open_len + Tag::Pre.close().len()
        && markup.ends_with(Tag::Pre.close())
    {
        &markup[open_len..markup.len() - Tag::Pre.close().len()]
    } else {
        markup
    }
}
