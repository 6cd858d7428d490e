//! Language identification for code blocks that do not declare one.
//!
//! Detection runs in two stages:
//!
//! 1. The first line is checked for a shebang (`#!/usr/bin/env python3`).
//! 2. Every language in a fixed table is scored against the text with
//!    weighted regular expressions. The best language wins if its score
//!    reaches a fixed threshold.
//!
//! Pattern weights follow the usual relevance categories: a pattern that
//! only one language has is worth far more than a keyword most C-like
//! languages share, and a negative pattern counts against a language.

use regex::Regex;
use std::sync::LazyLock;

/// Minimum score a language needs before it is reported.
const MIN_SCORE: i32 = 12;

/// Only this prefix of a block is scored.
const SCAN_LIMIT: usize = 20_000;

#[derive(Debug, Clone, Copy)]
enum Weight {
    /// Only this language has the pattern
    Unique,
    /// Very indicative, rarely seen elsewhere
    Strong,
    /// Shared with related languages
    Medium,
    /// Rules the language out
    Negative,
}

impl Weight {
    const fn points(self) -> i32 {
        match self {
            Weight::Unique => 10,
            Weight::Strong => 8,
            Weight::Medium => 5,
            Weight::Negative => -10,
        }
    }
}

use Weight::*;

type PatternTable = &'static [(&'static str, Weight)];

static LANGUAGES: &[(&str, PatternTable)] = &[
    (
        "go",
        &[
            (r"(?m)^package\s+\w+\s*$", Unique),
            (r"\bfunc\s+(\([^)]*\)\s*)?\w+\s*\(", Unique),
            (r"\bfmt\.\w+\(", Unique),
            (r"(?m)^import\s+\(", Unique),
            (r"\bgo\s+func\b", Unique),
            (r"\bdefer\s+\w+", Strong),
            (r"\bchan\s+\w+", Strong),
            (r"\w+\s*:=\s*", Medium),
            (r"\bmake\(\[\]", Strong),
        ],
    ),
    (
        "rust",
        &[
            (r"\bfn\s+\w+\s*(<[^>]*>)?\s*\([^)]*\)\s*->", Unique),
            (r"\bimpl(<[^>]*>)?\s+\w+", Unique),
            (r"#\[derive\(", Unique),
            (r"\b(println|eprintln|format|vec|assert_eq|panic)!\s*[(\[]", Unique),
            (r"\buse\s+(std|crate|super|self)::", Unique),
            (r"&mut\s", Unique),
            (r"\blet\s+mut\s", Strong),
            (r"\bpub\s+(fn|struct|enum|mod|trait)\s", Strong),
            (r"\bfn\s+\w+", Medium),
            (r"\bfunction\s+\w+", Negative),
            (r"\bdef\s+\w+\s*\(", Negative),
            (r"\bfunc\s+\w+", Negative),
        ],
    ),
    (
        "python",
        &[
            (r"\bdef\s+\w+\s*\([^)]*\)\s*(->\s*[\w\[\], ]+)?\s*:", Unique),
            (r"(?m)^\s*class\s+\w+\s*(\([^)]*\))?\s*:", Unique),
            (r#"if\s+__name__\s*==\s*['"]__main__['"]"#, Unique),
            (r"(?m)^\s*from\s+[\w.]+\s+import\s", Unique),
            (r"\bself\.\w+", Strong),
            (r"(?m)^\s*elif\b", Unique),
            (r"\bprint\(", Medium),
            (r"(?m)^\s*import\s+\w+\s*$", Medium),
            (r"\bNone\b|\bTrue\b|\bFalse\b", Medium),
            (r"(?m);\s*$", Negative),
        ],
    ),
    (
        "c",
        &[
            (r"(?m)^\s*#include\s*<\w+\.h>", Unique),
            (r"\bprintf\s*\(", Strong),
            (r"\bint\s+main\s*\(", Strong),
            (r"\b(malloc|free|sizeof)\s*\(", Strong),
            (r"\b(unsigned|void|char|int|long)\s+\*?\w+\s*[=;(]", Medium),
            (r"(?m)^\s*#define\s+\w+", Medium),
            (r"\bstd::", Negative),
            (r"\bclass\s+\w+", Negative),
        ],
    ),
    (
        "cpp",
        &[
            (r"(?m)^\s*#include\s*<\w+>", Unique),
            (r"\bstd::\w+", Unique),
            (r"\bstd::cout\b|\bstd::endl\b", Unique),
            (r"\btemplate\s*<", Unique),
            (r"\bnamespace\s+\w+\s*\{", Strong),
            (r"\busing\s+namespace\s+\w+;", Unique),
            (r"\b(public|private|protected):", Strong),
            (r"\bint\s+main\s*\(", Medium),
        ],
    ),
    (
        "javascript",
        &[
            (r"\bfunction\s*\w*\s*\([^)]*\)\s*\{", Unique),
            (r"\bconsole\.(log|error|warn)\(", Unique),
            (r"\b(const|let)\s+\w+\s*=\s*(\([^)]*\)|\w+)\s*=>", Unique),
            (r"\brequire\(['\x22]", Unique),
            (r"\bdocument\.\w+", Unique),
            (r"===|!==", Strong),
            (r"\b(const|let|var)\s+\w+\s*=", Medium),
            (r"\bexport\s+(default|const|function)\b", Strong),
            (r"\bdef\s+\w+", Negative),
        ],
    ),
    (
        "java",
        &[
            (r"\bpublic\s+(final\s+)?class\s+\w+", Unique),
            (r"\bpublic\s+static\s+void\s+main\s*\(", Unique),
            (r"\bSystem\.out\.print(ln)?\(", Unique),
            (r"(?m)^import\s+java\.", Unique),
            (r"(?m)^package\s+[\w.]+;", Unique),
            (r"@Override\b", Unique),
            (r"\b(private|protected|public)\s+\w+(<[^>]*>)?\s+\w+\s*[;=(]", Strong),
            (r"\bnew\s+\w+(<[^>]*>)?\(", Medium),
        ],
    ),
    (
        "bash",
        &[
            (r"(?m)^\s*(if|while)\s+\[\[?\s", Unique),
            (r"(?m)^\s*(fi|done|esac)\s*$", Unique),
            (r"\$\{?\w+\}?", Medium),
            (r"(?m)^\s*echo\s", Strong),
            (r"(?m)^\s*export\s+\w+=", Strong),
            (r"(?m)^\s*\w+\(\)\s*\{", Strong),
            (r"(?m)^\s*(sudo|apt-get|apt|brew|cd|mkdir|chmod)\s", Strong),
            (r"(?m)^\s*\$\s+\w+", Strong),
            (r"\s\|\s*(grep|sed|awk|xargs)\b", Unique),
        ],
    ),
    (
        "html",
        &[
            (r"(?i)<!doctype\s+html", Unique),
            (r"(?i)<html[\s>]", Unique),
            (r"(?i)<(div|span|body|head|p|a|ul|li|table)[\s>]", Strong),
            (r"(?i)</(div|span|body|head|p|a|ul|li|table)>", Strong),
            (r#"\s(class|id|href|src)=""#, Medium),
        ],
    ),
    (
        "css",
        &[
            (r"(?m)^\s*[.#]?[\w-]+(\s*[,>+~]?\s*[.#]?[\w-]+)*\s*\{\s*$", Medium),
            (r"(?m)^\s*[\w-]+\s*:\s*[^;{}]+;\s*$", Strong),
            (r"@media\s", Unique),
            (r"@import\s+url\(", Unique),
            (r"\b\d+(px|em|rem|vh|vw)\b", Strong),
            (r"#[0-9a-fA-F]{3,6}\s*;", Strong),
            (r"\bfunction\b|\bdef\b|\bfn\b", Negative),
        ],
    ),
    (
        "json",
        &[
            (r#"^\s*[\[{]\s*"[^"]+"\s*:"#, Unique),
            (r#"(?m)^\s*"[^"]+"\s*:\s*("|\d|\[|\{|true|false|null)"#, Strong),
            (r"[}\]]\s*$", Medium),
            (r"(?m)^\s*(//|#)", Negative),
        ],
    ),
    (
        "sql",
        &[
            (r"(?i)\bselect\s+[\w*,\s.]+\s+from\s+\w+", Unique),
            (r"(?i)\binsert\s+into\s+\w+", Unique),
            (r"(?i)\bcreate\s+table\s+\w+", Unique),
            (r"(?i)\bupdate\s+\w+\s+set\s", Unique),
            (r"(?i)\bdelete\s+from\s+\w+", Unique),
            (r"(?i)\bwhere\s+\w+\s*(=|<|>|like|in)\s*", Strong),
            (r"(?i)\b(inner|left|right)\s+join\b", Strong),
        ],
    ),
];

struct CompiledLanguage {
    name: &'static str,
    patterns: Vec<(Regex, i32)>,
}

impl CompiledLanguage {
    fn compile(name: &'static str, table: PatternTable) -> Self {
        let patterns = table
            .iter()
            .filter_map(|(pattern, weight)| match Regex::new(pattern) {
                Ok(re) => Some((re, weight.points())),
                Err(e) => {
                    log::warn!("skipping invalid {name} detection pattern: {e}");
                    None
                }
            })
            .collect();
        Self { name, patterns }
    }

    /// Sum of pattern weights. Repeated matches add half weight each, capped
    /// at five matches per pattern.
    fn score(&self, code: &str) -> i32 {
        self.patterns
            .iter()
            .map(|(re, points)| {
                let count = re.find_iter(code).take(5).count() as i32;
                if count == 0 {
                    0
                } else {
                    points * (1 + (count - 1) / 2)
                }
            })
            .sum()
    }
}

static COMPILED: LazyLock<Vec<CompiledLanguage>> = LazyLock::new(|| {
    LANGUAGES
        .iter()
        .map(|(name, table)| CompiledLanguage::compile(name, table))
        .collect()
});

fn detect_shebang(first_line: &str) -> Option<&'static str> {
    let interpreter = first_line.strip_prefix("#!")?.trim();
    // `#!/usr/bin/env python3` names the interpreter in the last word
    let interpreter = interpreter
        .split_whitespace()
        .find(|word| !word.ends_with("/env") && !word.starts_with('-'))?;
    let name = interpreter.rsplit('/').next().unwrap_or(interpreter);

    if name.starts_with("python") {
        Some("python")
    } else if name.starts_with("node") {
        Some("javascript")
    } else if matches!(name, "bash" | "sh" | "zsh" | "dash" | "ksh") {
        Some("bash")
    } else {
        None
    }
}

/// Guess the language of `code`.
///
/// Returns an identifier understood by [`normalize_language`] or `None` when
/// no language scores high enough. Ties go to the language listed first.
pub fn detect_language(code: &str) -> Option<&'static str> {
    let code = code.trim_start_matches(['\n', '\r']);
    if let Some(lang) = code.lines().next().and_then(detect_shebang) {
        return Some(lang);
    }

    let mut end = code.len().min(SCAN_LIMIT);
    while !code.is_char_boundary(end) {
        end -= 1;
    }
    let code = &code[..end];

    let mut best: Option<(&'static str, i32)> = None;
    for lang in COMPILED.iter() {
        let score = lang.score(code);
        log::trace!("detection score {}: {score}", lang.name);
        if score >= MIN_SCORE && best.is_none_or(|(_, b)| score > b) {
            best = Some((lang.name, score));
        }
    }
    best.map(|(name, _)| name)
}

/// Normalize a language identifier to a canonical name.
///
/// Lower-cases the identifier and maps common aliases and file extensions
/// (`golang`, `py3`, `c++`, `sh`, ...) to the name tokenizers are looked up by.
/// Unknown identifiers are returned lower-cased.
pub fn normalize_language(language: &str) -> String {
    let language = language.trim().to_ascii_lowercase();
    let canonical = match language.as_str() {
        "js" | "jsx" | "mjs" | "cjs" | "node" => "javascript",
        "ts" | "mts" | "cts" => "typescript",
        "py" | "py3" | "python3" => "python",
        "rb" => "ruby",
        "rs" => "rust",
        "sh" | "shell" | "zsh" | "console" | "shell-session" => "bash",
        "yml" => "yaml",
        "htm" | "xhtml" => "html",
        "cs" | "csharp" | "c-sharp" => "c#",
        "c++" | "cxx" | "cc" | "hpp" | "hxx" => "cpp",
        "golang" => "go",
        "hs" => "haskell",
        "kt" | "kts" => "kotlin",
        "pl" | "pm" => "perl",
        "h" => "c",
        "jsonc" | "json5" => "json",
        "mysql" | "postgresql" | "postgres" | "sqlite" | "psql" => "sql",
        "md" | "mkd" => "markdown",
        "patch" => "diff",
        "txt" | "plaintext" | "plain" => "text",
        _ => return language,
    };
    canonical.to_string()
}
