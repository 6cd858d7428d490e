//! Styles: colour tables keyed by [`TokenKind`], and their CSS rendering.
//!
//! A [`Style`] is what a style name resolves to. It carries the base
//! foreground/background of a code block plus an optional [`KindStyle`] per
//! token kind. [`StyleSet`] is the registry callers configure: it owns the
//! styles, their aliases, and the default style used when a name does not
//! resolve.

use crate::highlights::TokenKind;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Name of the style used when a requested style cannot be resolved.
pub const DEFAULT_STYLE: &str = "inspiredgithub";

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as a CSS hex colour, e.g. `#a71d5d`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Font modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Modifiers {
    pub fn is_empty(self) -> bool {
        !self.bold && !self.italic && !self.underline
    }
}

/// Presentation of a single token kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub modifiers: Modifiers,
}

impl KindStyle {
    pub fn is_empty(&self) -> bool {
        self.foreground.is_none() && self.background.is_none() && self.modifiers.is_empty()
    }

    fn write_declarations(&self, out: &mut String) {
        if let Some(fg) = self.foreground {
            let _ = write!(out, " color: {};", fg.to_hex());
        }
        if let Some(bg) = self.background {
            let _ = write!(out, " background-color: {};", bg.to_hex());
        }
        if self.modifiers.bold {
            out.push_str(" font-weight: bold;");
        }
        if self.modifiers.italic {
            out.push_str(" font-style: italic;");
        }
        if self.modifiers.underline {
            out.push_str(" text-decoration: underline;");
        }
    }
}

/// A named style.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub name: String,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    kinds: BTreeMap<TokenKind, KindStyle>,
}

impl Style {
    /// Create an empty style with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            foreground: None,
            background: None,
            kinds: BTreeMap::new(),
        }
    }

    /// A style without any colours. Always available.
    pub fn plain() -> Self {
        Self::new("plain")
    }

    /// Set the presentation of a kind. Empty presentations and [`TokenKind::Text`]
    /// are ignored.
    pub fn set(&mut self, kind: TokenKind, style: KindStyle) {
        if kind.tag().is_none() || style.is_empty() {
            self.kinds.remove(&kind);
        } else {
            self.kinds.insert(kind, style);
        }
    }

    /// Builder variant of [`Style::set`].
    pub fn with(mut self, kind: TokenKind, style: KindStyle) -> Self {
        self.set(kind, style);
        self
    }

    /// Presentation of a kind, if the style defines one.
    pub fn get(&self, kind: TokenKind) -> Option<&KindStyle> {
        self.kinds.get(&kind)
    }

    /// Render this style as CSS scoped to `container_class`.
    ///
    /// Produces one rule for the container (base colours) and one rule per
    /// styled kind, selector `.<container> .<tag>`. Rules are emitted in
    /// [`TokenKind::ALL`] order so the output is deterministic.
    pub fn to_css(&self, container_class: &str) -> String {
        let mut css = String::new();
        let _ = writeln!(css, "/* splash style: {} */", self.name);

        let mut base = String::new();
        if let Some(fg) = self.foreground {
            let _ = write!(base, " color: {};", fg.to_hex());
        }
        if let Some(bg) = self.background {
            let _ = write!(base, " background-color: {};", bg.to_hex());
        }
        if !base.is_empty() {
            let _ = writeln!(css, ".{container_class} {{{base} }}");
        }

        for kind in TokenKind::ALL {
            let (Some(tag), Some(style)) = (kind.tag(), self.kinds.get(&kind)) else {
                continue;
            };
            let mut decls = String::new();
            style.write_declarations(&mut decls);
            let _ = writeln!(css, ".{container_class} .{tag} {{{decls} }}");
        }

        css
    }
}

#[cfg(feature = "syntect")]
mod from_syntect {
    use super::*;
    use syntect::highlighting::{FontStyle, Highlighter, Theme, ThemeSet};
    use syntect::parsing::Scope;

    impl From<syntect::highlighting::Color> for Color {
        fn from(c: syntect::highlighting::Color) -> Self {
            Color::new(c.r, c.g, c.b)
        }
    }

    impl From<FontStyle> for Modifiers {
        fn from(fs: FontStyle) -> Self {
            Modifiers {
                bold: fs.contains(FontStyle::BOLD),
                italic: fs.contains(FontStyle::ITALIC),
                underline: fs.contains(FontStyle::UNDERLINE),
            }
        }
    }

    impl Style {
        /// Derive a style from a syntect theme by looking up the colour of
        /// each kind's representative scope.
        ///
        /// Colours equal to the theme's base colours are dropped; they are
        /// already inherited from the container rule.
        pub fn from_syntect(name: &str, theme: &Theme) -> Style {
            let highlighter = Highlighter::new(theme);
            let mut style = Style::new(name);
            style.foreground = theme.settings.foreground.map(Color::from);
            style.background = theme.settings.background.map(Color::from);

            for kind in TokenKind::ALL {
                let Some(scope) = kind.representative_scope() else {
                    continue;
                };
                let Ok(scope) = Scope::new(scope) else {
                    continue;
                };
                let modifier = highlighter.style_mod_for_stack(&[scope]);
                let foreground = modifier
                    .foreground
                    .map(Color::from)
                    .filter(|c| Some(*c) != style.foreground);
                let background = modifier
                    .background
                    .map(Color::from)
                    .filter(|c| Some(*c) != style.background);
                style.set(
                    kind,
                    KindStyle {
                        foreground,
                        background,
                        modifiers: modifier.font_style.map(Modifiers::from).unwrap_or_default(),
                    },
                );
            }

            style
        }
    }

    impl StyleSet {
        /// All of syntect's bundled themes, under normalized names.
        ///
        /// Includes the aliases `github` and `solarized`. The default style is
        /// [`DEFAULT_STYLE`].
        pub fn builtin() -> StyleSet {
            let theme_set = ThemeSet::load_defaults();
            let mut set = StyleSet::new(Style::plain());
            for (name, theme) in &theme_set.themes {
                set.insert(Style::from_syntect(&normalize_style_name(name), theme));
            }
            set.set_default(DEFAULT_STYLE);
            set.with_alias("github", "inspiredgithub")
                .with_alias("solarized", "solarized-dark")
        }
    }
}

/// Normalize a style name for lookup.
///
/// Lower-cases, collapses runs of non-alphanumeric characters into a single
/// `-`, and trims leading/trailing dashes: `"Solarized (dark)"` becomes
/// `"solarized-dark"`, `"base16-ocean.dark"` becomes `"base16-ocean-dark"`.
pub fn normalize_style_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// A registry of styles with aliases and a guaranteed default.
#[derive(Debug, Clone)]
pub struct StyleSet {
    styles: Vec<Style>,
    aliases: BTreeMap<String, String>,
    default_index: usize,
}

impl StyleSet {
    /// Create a set containing only `default`, which becomes the default style.
    pub fn new(default: Style) -> Self {
        Self {
            styles: vec![default],
            aliases: BTreeMap::new(),
            default_index: 0,
        }
    }

    /// Add a style, replacing any existing style with the same name.
    pub fn insert(&mut self, style: Style) {
        match self.styles.iter().position(|s| s.name == style.name) {
            Some(idx) => self.styles[idx] = style,
            None => self.styles.push(style),
        }
    }

    /// Builder variant of [`StyleSet::insert`].
    pub fn with_style(mut self, style: Style) -> Self {
        self.insert(style);
        self
    }

    /// Make `alias` resolve to the style named `target`.
    pub fn with_alias(mut self, alias: &str, target: &str) -> Self {
        self.aliases
            .insert(normalize_style_name(alias), normalize_style_name(target));
        self
    }

    /// Change the default style. Returns false (and keeps the current default)
    /// if no style by that name exists.
    pub fn set_default(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.default_index = idx;
                true
            }
            None => false,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = normalize_style_name(name);
        let key = self.aliases.get(&key).map(String::as_str).unwrap_or(&key);
        self.styles
            .iter()
            .position(|s| normalize_style_name(&s.name) == key)
    }

    /// Look up a style by name or alias.
    pub fn resolve(&self, name: &str) -> Option<&Style> {
        self.position(name).map(|idx| &self.styles[idx])
    }

    /// Look up a style, falling back to the default style.
    pub fn resolve_or_default(&self, name: &str) -> &Style {
        self.resolve(name).unwrap_or_else(|| self.default_style())
    }

    pub fn default_style(&self) -> &Style {
        &self.styles[self.default_index]
    }

    /// Names of all styles, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleSet {
    fn default() -> Self {
        #[cfg(feature = "syntect")]
        {
            StyleSet::builtin()
        }
        #[cfg(not(feature = "syntect"))]
        {
            StyleSet::new(Style::plain())
        }
    }
}
