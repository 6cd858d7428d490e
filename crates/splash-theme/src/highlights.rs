//! Token kind definitions - single source of truth.
//!
//! This module defines the semantic categories a tokenizer can assign to a run of
//! source text, and maps the large vocabulary of TextMate scope names (as produced
//! by sublime-syntax grammars) onto that small, fixed set.
//!
//! # Architecture
//!
//! The highlighting system has three layers:
//!
//! 1. **Scope names** - The broad vocabulary used by grammars
//!    (e.g., `keyword.control.go`, `entity.name.function.rust`, `string.quoted.double`)
//!
//! 2. **Token kinds** - A fixed set of ~25 categories that styles define colours for
//!    (e.g., `keyword`, `function`, `string`, `comment`, `type`)
//!
//! 3. **CSS classes** - Short class names for rendering (e.g., `k`, `f`, `s`)
//!
//! Many scope names map to the same kind. For example:
//! - `keyword.control`, `keyword.other`, `storage.modifier` → all use `Keyword`
//! - `constant.numeric.integer`, `constant.numeric.float` → both use `Number`
//!
//! Adjacent tokens that share a kind are coalesced into a single element when rendered.

/// The token kinds - the fixed set of semantic categories that styles colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Keyword,
    Function,
    String,
    Comment,
    Type,
    Variable,
    Constant,
    Number,
    Operator,
    Punctuation,
    Property,
    Attribute,
    Tag,
    Macro,
    Label,
    Namespace,
    Constructor,
    /// Markup: headings, titles
    Title,
    /// Markup: bold text
    Strong,
    /// Markup: italic text
    Emphasis,
    /// Markup: links/URLs
    Link,
    /// Markup: raw/literal/code blocks
    Literal,
    /// Markup: strikethrough
    Strikethrough,
    /// Diff additions
    DiffAdd,
    /// Diff deletions
    DiffDelete,
    /// Embedded content
    Embedded,
    /// Invalid or illegal syntax
    Error,
    /// Plain text, never styled
    Text,
}

impl TokenKind {
    /// Every kind, in rendering order. CSS rules are emitted in this order.
    pub const ALL: [TokenKind; 28] = [
        TokenKind::Keyword,
        TokenKind::Function,
        TokenKind::String,
        TokenKind::Comment,
        TokenKind::Type,
        TokenKind::Variable,
        TokenKind::Constant,
        TokenKind::Number,
        TokenKind::Operator,
        TokenKind::Punctuation,
        TokenKind::Property,
        TokenKind::Attribute,
        TokenKind::Tag,
        TokenKind::Macro,
        TokenKind::Label,
        TokenKind::Namespace,
        TokenKind::Constructor,
        TokenKind::Title,
        TokenKind::Strong,
        TokenKind::Emphasis,
        TokenKind::Link,
        TokenKind::Literal,
        TokenKind::Strikethrough,
        TokenKind::DiffAdd,
        TokenKind::DiffDelete,
        TokenKind::Embedded,
        TokenKind::Error,
        TokenKind::Text,
    ];

    /// Get the CSS class for this kind.
    /// Returns None for kinds that produce no styling.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            TokenKind::Keyword => Some("k"),
            TokenKind::Function => Some("f"),
            TokenKind::String => Some("s"),
            TokenKind::Comment => Some("c"),
            TokenKind::Type => Some("t"),
            TokenKind::Variable => Some("v"),
            TokenKind::Constant => Some("co"),
            TokenKind::Number => Some("n"),
            TokenKind::Operator => Some("o"),
            TokenKind::Punctuation => Some("p"),
            TokenKind::Property => Some("pr"),
            TokenKind::Attribute => Some("at"),
            TokenKind::Tag => Some("tg"),
            TokenKind::Macro => Some("m"),
            TokenKind::Label => Some("l"),
            TokenKind::Namespace => Some("ns"),
            TokenKind::Constructor => Some("cr"),
            TokenKind::Title => Some("tt"),
            TokenKind::Strong => Some("st"),
            TokenKind::Emphasis => Some("em"),
            TokenKind::Link => Some("tu"),
            TokenKind::Literal => Some("tl"),
            TokenKind::Strikethrough => Some("tx"),
            TokenKind::DiffAdd => Some("da"),
            TokenKind::DiffDelete => Some("dd"),
            TokenKind::Embedded => Some("eb"),
            TokenKind::Error => Some("er"),
            TokenKind::Text => None,
        }
    }

    /// Long, human readable name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Function => "function",
            TokenKind::String => "string",
            TokenKind::Comment => "comment",
            TokenKind::Type => "type",
            TokenKind::Variable => "variable",
            TokenKind::Constant => "constant",
            TokenKind::Number => "number",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Property => "property",
            TokenKind::Attribute => "attribute",
            TokenKind::Tag => "tag",
            TokenKind::Macro => "macro",
            TokenKind::Label => "label",
            TokenKind::Namespace => "namespace",
            TokenKind::Constructor => "constructor",
            TokenKind::Title => "title",
            TokenKind::Strong => "strong",
            TokenKind::Emphasis => "emphasis",
            TokenKind::Link => "link",
            TokenKind::Literal => "literal",
            TokenKind::Strikethrough => "strikethrough",
            TokenKind::DiffAdd => "diff.addition",
            TokenKind::DiffDelete => "diff.deletion",
            TokenKind::Embedded => "embedded",
            TokenKind::Error => "error",
            TokenKind::Text => "text",
        }
    }

    /// A TextMate scope whose colour in a theme stands for this kind.
    ///
    /// Used when deriving a [`Style`](crate::Style) from a scope-based theme.
    pub fn representative_scope(self) -> Option<&'static str> {
        match self {
            TokenKind::Keyword => Some("keyword"),
            TokenKind::Function => Some("entity.name.function"),
            TokenKind::String => Some("string"),
            TokenKind::Comment => Some("comment"),
            TokenKind::Type => Some("storage.type"),
            TokenKind::Variable => Some("variable"),
            TokenKind::Constant => Some("constant.language"),
            TokenKind::Number => Some("constant.numeric"),
            TokenKind::Operator => Some("keyword.operator"),
            TokenKind::Punctuation => Some("punctuation"),
            TokenKind::Property => Some("variable.other.member"),
            TokenKind::Attribute => Some("entity.other.attribute-name"),
            TokenKind::Tag => Some("entity.name.tag"),
            TokenKind::Macro => Some("meta.preprocessor"),
            TokenKind::Label => Some("entity.name.label"),
            TokenKind::Namespace => Some("entity.name.namespace"),
            TokenKind::Constructor => Some("entity.name.class"),
            TokenKind::Title => Some("markup.heading"),
            TokenKind::Strong => Some("markup.bold"),
            TokenKind::Emphasis => Some("markup.italic"),
            TokenKind::Link => Some("markup.underline.link"),
            TokenKind::Literal => Some("markup.raw"),
            TokenKind::Strikethrough => Some("markup.strikethrough"),
            TokenKind::DiffAdd => Some("markup.inserted"),
            TokenKind::DiffDelete => Some("markup.deleted"),
            TokenKind::Embedded => Some("source"),
            TokenKind::Error => Some("invalid"),
            TokenKind::Text => None,
        }
    }
}

/// Scope prefixes and the kind they map to.
///
/// Ordered most specific first: the first prefix that matches wins, so
/// `keyword.operator` has to come before `keyword`.
const SCOPE_PREFIXES: &[(&str, TokenKind)] = &[
    // Comments, including their punctuation
    ("comment", TokenKind::Comment),
    ("punctuation.definition.comment", TokenKind::Comment),
    // Strings and everything that lives inside them
    ("constant.character.escape", TokenKind::String),
    ("punctuation.definition.string", TokenKind::String),
    ("string", TokenKind::String),
    // Numbers before the generic constant prefix
    ("constant.numeric", TokenKind::Number),
    ("constant.language", TokenKind::Constant),
    ("constant.character", TokenKind::Constant),
    ("constant.other", TokenKind::Constant),
    ("constant", TokenKind::Constant),
    ("entity.name.constant", TokenKind::Constant),
    ("support.constant", TokenKind::Constant),
    // Operators before keywords
    ("keyword.operator", TokenKind::Operator),
    ("punctuation.operator", TokenKind::Operator),
    ("keyword", TokenKind::Keyword),
    ("storage.type", TokenKind::Type),
    ("storage.modifier", TokenKind::Keyword),
    ("storage", TokenKind::Keyword),
    // Preprocessor and macros
    ("meta.preprocessor", TokenKind::Macro),
    ("support.function.macro", TokenKind::Macro),
    ("entity.name.macro", TokenKind::Macro),
    ("support.macro", TokenKind::Macro),
    // Functions
    ("entity.name.function.constructor", TokenKind::Constructor),
    ("entity.name.function", TokenKind::Function),
    ("support.function", TokenKind::Function),
    ("variable.function", TokenKind::Function),
    ("meta.function-call.identifier", TokenKind::Function),
    // Types
    ("entity.name.type", TokenKind::Type),
    ("entity.name.class", TokenKind::Constructor),
    ("entity.name.struct", TokenKind::Type),
    ("entity.name.enum", TokenKind::Type),
    ("entity.name.interface", TokenKind::Type),
    ("entity.name.trait", TokenKind::Type),
    ("entity.other.inherited-class", TokenKind::Type),
    ("support.type.property-name", TokenKind::Property),
    ("support.type", TokenKind::Type),
    ("support.class", TokenKind::Type),
    // Markup-ish entities
    ("entity.name.tag", TokenKind::Tag),
    ("entity.other.attribute-name", TokenKind::Attribute),
    ("entity.name.namespace", TokenKind::Namespace),
    ("entity.name.module", TokenKind::Namespace),
    ("entity.name.label", TokenKind::Label),
    ("entity.name.section", TokenKind::Title),
    // Variables and members
    ("variable.other.member", TokenKind::Property),
    ("variable.other.property", TokenKind::Property),
    ("meta.property-name", TokenKind::Property),
    ("variable.parameter", TokenKind::Variable),
    ("variable.language", TokenKind::Variable),
    ("variable", TokenKind::Variable),
    // Punctuation
    ("punctuation", TokenKind::Punctuation),
    // Markup
    ("markup.heading", TokenKind::Title),
    ("markup.bold", TokenKind::Strong),
    ("markup.italic", TokenKind::Emphasis),
    ("markup.underline.link", TokenKind::Link),
    ("markup.link", TokenKind::Link),
    ("markup.raw", TokenKind::Literal),
    ("markup.strikethrough", TokenKind::Strikethrough),
    ("markup.inserted", TokenKind::DiffAdd),
    ("markup.deleted", TokenKind::DiffDelete),
    ("markup.quote", TokenKind::Punctuation),
    ("markup.list", TokenKind::Punctuation),
    // Errors
    ("invalid", TokenKind::Error),
    // Embedded code inside another language
    ("source.embedded", TokenKind::Embedded),
    ("meta.embedded", TokenKind::Embedded),
];

/// Map any scope name to its token kind.
///
/// This handles the vocabulary of scope names used by sublime-syntax and
/// TextMate grammars, including language suffixes (`keyword.control.go` matches
/// the `keyword` prefix). A prefix only matches on a segment boundary, so
/// `stringy` does not match `string`.
///
/// Unknown scopes (`source.go`, `meta.block`, `text.plain`) map to [`TokenKind::Text`].
pub fn scope_to_kind(scope: &str) -> TokenKind {
    SCOPE_PREFIXES
        .iter()
        .find(|(prefix, _)| {
            scope
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        })
        .map(|&(_, kind)| kind)
        .unwrap_or(TokenKind::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_produces_no_tag() {
        assert_eq!(TokenKind::Text.tag(), None);
    }

    #[test]
    fn test_tags_are_unique() {
        let mut tags: Vec<&str> = TokenKind::ALL.iter().filter_map(|k| k.tag()).collect();
        let total = tags.len();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), total);
    }

    #[test]
    fn test_every_styled_kind_has_a_scope() {
        for kind in TokenKind::ALL {
            assert_eq!(kind.tag().is_some(), kind.representative_scope().is_some());
        }
    }

    #[test]
    fn test_scope_to_kind_keywords() {
        assert_eq!(scope_to_kind("keyword"), TokenKind::Keyword);
        assert_eq!(scope_to_kind("keyword.control.go"), TokenKind::Keyword);
        assert_eq!(scope_to_kind("keyword.other.rust"), TokenKind::Keyword);
        assert_eq!(scope_to_kind("storage.modifier.c"), TokenKind::Keyword);
    }

    #[test]
    fn test_scope_to_kind_operator_before_keyword() {
        assert_eq!(scope_to_kind("keyword.operator.assignment.go"), TokenKind::Operator);
    }

    #[test]
    fn test_scope_to_kind_numbers_and_constants() {
        assert_eq!(scope_to_kind("constant.numeric.integer.decimal.c"), TokenKind::Number);
        assert_eq!(scope_to_kind("constant.language.boolean"), TokenKind::Constant);
        assert_eq!(scope_to_kind("constant.character.escape.python"), TokenKind::String);
    }

    #[test]
    fn test_scope_to_kind_functions() {
        assert_eq!(scope_to_kind("entity.name.function.go"), TokenKind::Function);
        assert_eq!(scope_to_kind("support.function.builtin.python"), TokenKind::Function);
        assert_eq!(scope_to_kind("variable.function.go"), TokenKind::Function);
        assert_eq!(scope_to_kind("support.function.macro.rust"), TokenKind::Macro);
    }

    #[test]
    fn test_scope_to_kind_segment_boundary() {
        assert_eq!(scope_to_kind("stringy"), TokenKind::Text);
        assert_eq!(scope_to_kind("string.quoted.double.go"), TokenKind::String);
    }

    #[test]
    fn test_scope_to_kind_unstyled() {
        assert_eq!(scope_to_kind("source.go"), TokenKind::Text);
        assert_eq!(scope_to_kind("meta.block.go"), TokenKind::Text);
        assert_eq!(scope_to_kind("text.plain"), TokenKind::Text);
    }

    #[test]
    fn test_scope_to_kind_markup() {
        assert_eq!(scope_to_kind("markup.heading.1.markdown"), TokenKind::Title);
        assert_eq!(scope_to_kind("markup.inserted.diff"), TokenKind::DiffAdd);
        assert_eq!(scope_to_kind("markup.deleted.diff"), TokenKind::DiffDelete);
    }
}
