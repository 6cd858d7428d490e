//! Tokenizers backed by syntect's bundled sublime-syntax grammars.

use crate::detect::{detect_language, normalize_language};
use crate::{Token, TokenizeError, Tokenizer, TokenizerProvider};
use splash_theme::{TokenKind, scope_to_kind};
use std::sync::Arc;
use ::syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};
use ::syntect::util::LinesWithEndings;

/// Name of the syntax used when nothing else matches.
const FALLBACK_SYNTAX: &str = "C";

/// Provides [`SyntectTokenizer`]s from a shared [`SyntaxSet`].
#[derive(Clone)]
pub struct SyntectProvider {
    syntaxes: Arc<SyntaxSet>,
}

impl SyntectProvider {
    /// Provider over syntect's default syntaxes.
    pub fn new() -> Self {
        Self::with_syntax_set(SyntaxSet::load_defaults_newlines())
    }

    /// Provider over a custom syntax set. The set must be built for lines
    /// that include their newline.
    pub fn with_syntax_set(syntaxes: SyntaxSet) -> Self {
        Self {
            syntaxes: Arc::new(syntaxes),
        }
    }

    pub fn syntax_set(&self) -> &SyntaxSet {
        &self.syntaxes
    }

    fn tokenizer(&self, syntax: &SyntaxReference) -> SyntectTokenizer {
        SyntectTokenizer {
            syntax: syntax.name.clone(),
            syntaxes: Arc::clone(&self.syntaxes),
        }
    }
}

impl Default for SyntectProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SyntectProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntectProvider")
            .field("syntaxes", &self.syntaxes.syntaxes().len())
            .finish()
    }
}

impl TokenizerProvider for SyntectProvider {
    type Tokenizer = SyntectTokenizer;

    fn by_language(&self, language: &str) -> Option<SyntectTokenizer> {
        let language = normalize_language(language);
        if language.is_empty() {
            return None;
        }
        let syntax = if language == "text" {
            self.syntaxes.find_syntax_plain_text()
        } else {
            self.syntaxes.find_syntax_by_token(&language)?
        };
        Some(self.tokenizer(syntax))
    }

    fn detect(&self, source: &str) -> Option<SyntectTokenizer> {
        let first_line = source.trim_start_matches(['\n', '\r']).lines().next()?;
        if let Some(syntax) = self.syntaxes.find_syntax_by_first_line(first_line) {
            log::trace!("detected {} from first line", syntax.name);
            return Some(self.tokenizer(syntax));
        }
        let language = detect_language(source)?;
        log::trace!("detected {language} from content");
        self.by_language(language)
    }

    fn fallback(&self) -> SyntectTokenizer {
        let syntax = self
            .syntaxes
            .find_syntax_by_name(FALLBACK_SYNTAX)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        self.tokenizer(syntax)
    }
}

/// Tokenizer for a single syntect syntax.
///
/// Each run of text between two scope operations becomes a token whose kind
/// comes from the innermost scope on the stack that maps to a styled kind.
#[derive(Clone)]
pub struct SyntectTokenizer {
    syntax: String,
    syntaxes: Arc<SyntaxSet>,
}

impl std::fmt::Debug for SyntectTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntectTokenizer")
            .field("syntax", &self.syntax)
            .finish()
    }
}

fn kind_for_stack(stack: &ScopeStack) -> TokenKind {
    stack
        .as_slice()
        .iter()
        .rev()
        .map(|scope| scope_to_kind(&scope.build_string()))
        .find(|kind| *kind != TokenKind::Text)
        .unwrap_or(TokenKind::Text)
}

impl Tokenizer for SyntectTokenizer {
    fn language(&self) -> &str {
        &self.syntax
    }

    fn tokenize(&self, source: &str) -> Result<Vec<Token>, TokenizeError> {
        let syntax = self
            .syntaxes
            .find_syntax_by_name(&self.syntax)
            .ok_or_else(|| TokenizeError::new(&self.syntax, "syntax not in syntax set"))?;

        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut tokens = Vec::new();

        for line in LinesWithEndings::from(source) {
            let ops = state
                .parse_line(line, &self.syntaxes)
                .map_err(|e| TokenizeError::new(&self.syntax, e.to_string()))?;

            let mut pos = 0;
            for (offset, op) in ops {
                let offset = offset.min(line.len());
                if offset > pos {
                    tokens.push(Token::new(kind_for_stack(&stack), &line[pos..offset]));
                    pos = offset;
                }
                stack
                    .apply(&op)
                    .map_err(|e| TokenizeError::new(&self.syntax, e.to_string()))?;
            }
            if pos < line.len() {
                tokens.push(Token::new(kind_for_stack(&stack), &line[pos..]));
            }
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coalesce;
    use std::sync::LazyLock;

    static PROVIDER: LazyLock<SyntectProvider> = LazyLock::new(SyntectProvider::new);

    fn joined(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_by_language_uses_aliases() {
        assert_eq!(PROVIDER.by_language("go").unwrap().language(), "Go");
        assert_eq!(PROVIDER.by_language("golang").unwrap().language(), "Go");
        assert_eq!(PROVIDER.by_language("Python").unwrap().language(), "Python");
        assert_eq!(PROVIDER.by_language("rs").unwrap().language(), "Rust");
        assert!(PROVIDER.by_language("no-such-language").is_none());
        assert!(PROVIDER.by_language("").is_none());
    }

    #[test]
    fn test_fallback_is_c() {
        assert_eq!(PROVIDER.fallback().language(), "C");
        assert_eq!(PROVIDER.select(None, "hello world").language(), "C");
    }

    #[test]
    fn test_detect_from_content() {
        let go = "package main\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}\n";
        assert_eq!(PROVIDER.detect(go).unwrap().language(), "Go");
        assert_eq!(
            PROVIDER.detect("#!/usr/bin/env python3\nprint(1)\n").unwrap().language(),
            "Python"
        );
    }

    #[test]
    fn test_tokens_cover_source() {
        let source = "package main\n\n// héllo\nfunc main() {\n\tx := \"<b>\"\n}\n";
        let tokenizer = PROVIDER.by_language("go").unwrap();
        let tokens = tokenizer.tokenize(source).unwrap();
        assert_eq!(joined(&tokens), source);
    }

    #[test]
    fn test_go_keyword_and_string() {
        let tokenizer = PROVIDER.by_language("go").unwrap();
        let tokens = coalesce(tokenizer.tokenize("package main\nvar s = \"hi\"\n").unwrap());
        assert!(
            tokens
                .iter()
                .any(|t| t.kind == TokenKind::Keyword && t.text == "package"),
            "got: {tokens:?}"
        );
        assert!(
            tokens
                .iter()
                .any(|t| t.kind == TokenKind::String && t.text.contains("hi")),
            "got: {tokens:?}"
        );
    }

    #[test]
    fn test_comment_punctuation_is_comment() {
        let tokenizer = PROVIDER.by_language("python").unwrap();
        let tokens = coalesce(tokenizer.tokenize("# hi\n").unwrap());
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert!(tokens[0].text.starts_with("# hi"), "got: {tokens:?}");
    }

    #[test]
    fn test_plain_text_has_no_styled_tokens() {
        let tokenizer = PROVIDER.by_language("text").unwrap();
        let tokens = tokenizer.tokenize("fn main() {}\n").unwrap();
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Text));
        assert_eq!(joined(&tokens), "fn main() {}\n");
    }
}
