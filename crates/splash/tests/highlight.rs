//! End-to-end tests over the default syntect provider and built-in styles.

use splash::{
    HtmlRenderer, Splash, SplashError, StyleSet, SyntectProvider, SyntectTokenizer, Token,
    TokenizeError, Tokenizer, TokenizerProvider, highlight, highlight_blocks, highlight_bytes,
};
use std::sync::{Arc, Mutex};

fn count_tags(html: &str) -> (usize, usize) {
    (html.matches("<pre").count(), html.matches("<code").count())
}

#[test]
fn test_code_pre_document() {
    let input = r#"<html><head></head><body><code><pre>fmt.Println("hi")</pre></code></body></html>"#;
    let output = highlight(input, "github", false).unwrap();

    assert_eq!(count_tags(&output), (1, 1));
    assert!(!output.contains(r#"fmt.Println("hi")"#), "{output}");
    assert!(output.contains("<span class="), "{output}");

    let style_start = output.find("<style>").expect("style block");
    let style_end = output.find("</style>").expect("style block end");
    let head_close = output.find("</head>").expect("head");
    assert!(style_start < style_end && style_end < head_close);
    assert!(!output[style_start + "<style>".len()..style_end].trim().is_empty());
}

#[test]
fn test_tag_counts_across_patterns() {
    let input = r#"<html><head><title>t</title></head><body>
<pre>plain pre</pre>
<pre class="x"><code>pre code</code></pre>
<code><pre>code pre</pre></code>
<pre><code class="language-rust">fn main() {}</code></pre>
<p>inline <code class="lang-go">x := 1</code> and <code>ls -la</code></p>
<pre><code>a</code> and <code>b</code></pre>
</body></html>"#;
    let output = highlight(input, "github", false).unwrap();
    assert_eq!(count_tags(&output), count_tags(input));

    let rewrite = highlight_blocks(input, "github", false).unwrap();
    assert_eq!(rewrite.stats.highlighted, 6);
    assert_eq!(rewrite.stats.skipped, 1);
}

#[test]
fn test_attribute_values_survive() {
    let input = r#"<html><head></head><body><pre data-x="a>b">int x;</pre></body></html>"#;
    let output = highlight(input, "github", false).unwrap();
    assert!(
        output.contains(r#"<pre class="splash" data-x="a>b"><span"#),
        "{output}"
    );
    assert!(!output.contains("&quot;&gt;int"), "{output}");
    assert_eq!(count_tags(&output), (1, 0));
}

#[test]
fn test_comments_and_scripts_do_not_hide_blocks() {
    let input = r#"<html><head></head><body>
<!-- see <pre> below -->
<script>const tpl = "<code>";</script>
<pre>int main(void) { return 0; }</pre>
</body></html>"#;
    let rewrite = highlight_blocks(input, "github", false).unwrap();
    assert_eq!(rewrite.stats.highlighted, 1);
    assert_eq!(rewrite.stats.skipped, 0);
    assert!(rewrite.html.contains("<!-- see <pre> below -->"));
    assert!(rewrite.html.contains(r#"<script>const tpl = "<code>";</script>"#));
    assert!(rewrite.html.contains(r#"<pre class="splash">"#));
}

#[test]
fn test_second_run_is_a_no_op() {
    let input = r#"<html><head></head><body>
<pre>int main(void) { return 0; }</pre>
<pre><code class="language-python">def f():
    return 1
</code></pre>
<code>inline</code>
</body></html>"#;
    let first = highlight(input, "github", false).unwrap();
    let second = highlight(&first, "github", false).unwrap();
    assert_eq!(second, first);
    assert_eq!(first.matches("<style>").count(), 1);

    let rewrite = highlight_blocks(&first, "github", false).unwrap();
    assert_eq!(rewrite.stats.highlighted, 0);
    assert_eq!(rewrite.stats.skipped, 3);
}

#[test]
fn test_plain_text_uses_fallback() {
    let input = "<html><head></head><body><pre>just some words, nothing else</pre></body></html>";
    let output = highlight(input, "github", false).unwrap();
    assert!(output.contains(r#"<pre class="splash">"#), "{output}");
    assert!(output.contains("just some words"), "{output}");
}

#[test]
fn test_missing_anchor_fails() {
    let err = highlight("<body><pre>x = 1</pre></body>", "github", false).unwrap_err();
    assert!(matches!(err, SplashError::MissingAnchor), "{err}");
}

#[test]
fn test_unescape() {
    let input = "<html><head></head><body>\
        <pre><code class=\"language-text\">a &amp;&amp; b</code></pre></body></html>";

    let decoded = highlight(input, "github", true).unwrap();
    assert!(decoded.contains(">a &amp;&amp; b</code>"), "{decoded}");

    let literal = highlight(input, "github", false).unwrap();
    assert!(literal.contains(">a &amp;amp;&amp;amp; b</code>"), "{literal}");
}

#[test]
fn test_unknown_style_falls_back() {
    let input = "<html><head></head><body><pre>x</pre></body></html>";
    let output = highlight(input, "no-such-style", false).unwrap();
    assert!(output.contains("/* splash style: inspiredgithub */"), "{output}");
}

#[test]
fn test_bytes_must_be_utf8() {
    let err = highlight_bytes(b"<html>\xff</html>", "github", false).unwrap_err();
    assert!(matches!(err, SplashError::InvalidUtf8(_)), "{err}");

    let out = highlight_bytes(b"<html><pre>x</pre></html>", "github", false).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("<head>"));
}

/// Wraps the syntect provider and records which tokenizer ran.
struct Recording {
    inner: SyntectProvider,
    used: Arc<Mutex<Vec<String>>>,
}

struct RecordingTokenizer {
    inner: SyntectTokenizer,
    used: Arc<Mutex<Vec<String>>>,
}

impl Recording {
    fn wrap(&self, inner: SyntectTokenizer) -> RecordingTokenizer {
        RecordingTokenizer {
            inner,
            used: Arc::clone(&self.used),
        }
    }
}

impl Tokenizer for RecordingTokenizer {
    fn language(&self) -> &str {
        self.inner.language()
    }

    fn tokenize(&self, source: &str) -> Result<Vec<Token>, TokenizeError> {
        self.used.lock().unwrap().push(self.inner.language().to_string());
        self.inner.tokenize(source)
    }
}

impl TokenizerProvider for Recording {
    type Tokenizer = RecordingTokenizer;

    fn by_language(&self, language: &str) -> Option<RecordingTokenizer> {
        self.inner.by_language(language).map(|t| self.wrap(t))
    }

    fn detect(&self, source: &str) -> Option<RecordingTokenizer> {
        self.inner.detect(source).map(|t| self.wrap(t))
    }

    fn fallback(&self) -> RecordingTokenizer {
        self.wrap(self.inner.fallback())
    }
}

#[test]
fn test_declared_language_beats_detection() {
    let go = "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}\n";
    let used = Arc::new(Mutex::new(Vec::new()));
    let splash = Splash::with_parts(
        Recording {
            inner: SyntectProvider::new(),
            used: Arc::clone(&used),
        },
        HtmlRenderer::default(),
        StyleSet::builtin(),
    );

    let declared = format!(
        "<html><head></head><body><pre><code class=\"language-python\">{go}</code></pre></body></html>"
    );
    let undeclared = format!("<html><head></head><body><pre>{go}</pre></body></html>");
    splash.highlight(&declared, "github", false).unwrap();
    splash.highlight(&undeclared, "github", false).unwrap();

    assert_eq!(*used.lock().unwrap(), ["Python", "Go"]);
}
