//! Single-pass tokenizer for the tinymark dialect.
//!
//! The scanner walks the input left to right exactly once, merging
//! contiguous letter and digit runs into single tokens and emitting every
//! other recognized character as a one-character token. Tokenization is
//! lossless: the concatenated token texts reproduce the input.

use crate::error::MarkdownError;
use crate::token::{Token, TokenKind};

/// Tokenizes `text`, mapping unclassified characters to literal words.
///
/// This entry point is total: any character outside the recognized classes
/// becomes a single-character [`TokenKind::Word`] token, so conversion
/// never fails on unexpected input.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    scan(text).tokens
}

/// Tokenizes `text`, rejecting the first unclassified character.
///
/// Behaves exactly like [`tokenize`] on input made of recognized
/// characters. An unrecognized character aborts the whole conversion with
/// [`MarkdownError::UnknownCharacter`].
pub fn tokenize_strict(text: &str) -> Result<Vec<Token<'_>>, MarkdownError> {
    let outcome = scan(text);
    match outcome.first_unknown {
        Some((character, offset)) => Err(MarkdownError::unknown_character(character, offset)),
        None => Ok(outcome.tokens),
    }
}

/// Outcome of one scanning pass over the input.
struct ScanOutcome<'a> {
    /// Tokens in input order.
    tokens: Vec<Token<'a>>,
    /// First character outside every class, with its byte offset.
    first_unknown: Option<(char, usize)>,
}

fn scan(text: &str) -> ScanOutcome<'_> {
    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut first_unknown = None;
    let mut last_start = 0usize;
    let mut last_mergeable = false;

    for (offset, character) in text.char_indices() {
        let classified = classify(character);
        let kind = classified.unwrap_or(TokenKind::Word);
        if classified.is_none() {
            if first_unknown.is_none() {
                first_unknown = Some((character, offset));
            }
            log::debug!(
                "unclassified character {character:?} at byte {offset}, keeping as literal word"
            );
        }

        let end = offset + character.len_utf8();
        // Only genuine letter/digit runs merge; a fallback word stays on
        // its own so the unknown character remains a one-char token.
        let mergeable =
            classified.is_some() && matches!(kind, TokenKind::Word | TokenKind::Number);

        if mergeable
            && last_mergeable
            && let Some(last) = tokens.last_mut()
            && last.kind == kind
        {
            *last = Token::new(kind, &text[last_start..end]);
            continue;
        }

        tokens.push(Token::new(kind, &text[offset..end]));
        last_start = offset;
        last_mergeable = mergeable;
    }

    ScanOutcome {
        tokens,
        first_unknown,
    }
}

/// Maps a character to its token classification, or `None` when it falls
/// outside every recognized class.
fn classify(character: char) -> Option<TokenKind> {
    match character {
        '#' => Some(TokenKind::Grid),
        '_' => Some(TokenKind::Underscore),
        '*' => Some(TokenKind::Asterisk),
        '\\' => Some(TokenKind::Slash),
        '[' => Some(TokenKind::LeftBracket),
        ']' => Some(TokenKind::RightBracket),
        '(' => Some(TokenKind::LeftParen),
        ')' => Some(TokenKind::RightParen),
        '\t' => Some(TokenKind::Tab),
        '\n' | '\r' => Some(TokenKind::Escape),
        ' ' | '\u{00A0}' | '\u{200B}' => Some(TokenKind::Space),
        c if c.is_ascii_digit() => Some(TokenKind::Number),
        c if c.is_alphabetic() => Some(TokenKind::Word),
        _ => None,
    }
}
