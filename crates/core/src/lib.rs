#![deny(missing_docs)]
//! Tinymark core: tokenizer, recursive-descent parser, and HTML renderer
//! for a restricted Markdown dialect.
//!
//! The dialect covers headers, bold and italic emphasis, links, hard line
//! breaks, and backslash escapes. Conversion is a strictly linear
//! pipeline over [`tokenize`], [`parse`], and [`render`], bundled by
//! [`render_markdown`]. Malformed markup is never an error: anything that
//! fails validation degrades to literal text.

/// Syntax tree node types.
pub mod ast;
/// Conversion error types.
pub mod error;
/// Input tokenization.
pub mod lexer;
/// Token sequence to tree parsing.
pub mod parser;
/// Tree to HTML rendering.
pub mod render;
/// Lexical token types.
pub mod token;

pub use ast::{HeaderLevel, Node};
pub use error::MarkdownError;
pub use lexer::{tokenize, tokenize_strict};
pub use parser::parse;
pub use render::render;
pub use token::{Token, TokenKind};

/// Converts tinymark input to an HTML fragment.
///
/// Every pipeline stage is total, so any input string produces a defined
/// HTML string; unrecognized characters pass through as literal text.
///
/// # Examples
///
/// ```
/// let html = tinymark_core::render_markdown("__bold _and italic_ text__");
/// assert_eq!(html, "<strong>bold <em>and italic</em> text</strong>");
/// ```
pub fn render_markdown(text: &str) -> String {
    render(&parse(&tokenize(text)))
}

/// Converts tinymark input to HTML, rejecting unclassifiable characters.
///
/// Same pipeline as [`render_markdown`], except tokenization fails fast
/// on the first character outside the recognized classes.
///
/// # Examples
///
/// ```
/// use tinymark_core::{MarkdownError, render_markdown_strict};
///
/// assert_eq!(
///     render_markdown_strict("# Title\n").unwrap(),
///     "<h1>Title</h1><br/>"
/// );
/// assert!(matches!(
///     render_markdown_strict("smile 😀"),
///     Err(MarkdownError::UnknownCharacter { .. })
/// ));
/// ```
pub fn render_markdown_strict(text: &str) -> Result<String, MarkdownError> {
    let tokens = tokenize_strict(text)?;
    Ok(render(&parse(&tokens)))
}
