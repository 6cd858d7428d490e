//! Theme support for splash syntax highlighting.
//!
//! This crate provides:
//! - Token kind definitions (the canonical list of semantic categories)
//! - The mapping from TextMate scope names to those kinds
//! - Styles (colour tables keyed by kind) and CSS output generation
//! - The built-in style set, derived from syntect's bundled themes

pub mod highlights;
pub mod theme;

pub use highlights::{TokenKind, scope_to_kind};
pub use theme::{
    Color, DEFAULT_STYLE, KindStyle, Modifiers, Style, StyleSet, normalize_style_name,
};
