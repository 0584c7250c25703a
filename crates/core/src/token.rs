//! Lexical token model for the tinymark dialect.
//!
//! Tokens are the unit of exchange between the tokenizer and the parser.
//! Each one borrows the exact slice of input it covers, so concatenating
//! the `text` of every token reproduces the original string.

/// Classification of a single lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenKind {
    /// Maximal run of letter characters.
    Word,
    /// Maximal run of ASCII digits.
    Number,
    /// One whitespace character: space, no-break space, or zero-width space.
    Space,
    /// `_`, the emphasis marker.
    Underscore,
    /// `#`, the header marker.
    Grid,
    /// `\`, the escape prefix.
    Slash,
    /// `\n` or `\r`, a hard line break.
    Escape,
    /// `[`, opens a link label.
    LeftBracket,
    /// `]`, closes a link label.
    RightBracket,
    /// `(`, opens a link target.
    LeftParen,
    /// `)`, closes a link target.
    RightParen,
    /// `*`. Classified on its own kind but not an active marker; the
    /// parser renders it literally.
    Asterisk,
    /// Tab character.
    Tab,
}

/// A classified slice of the input text.
///
/// Value equality is by `(kind, text)`. Tokens are immutable once
/// produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token<'a> {
    /// The token's classification.
    pub kind: TokenKind,
    /// The exact input slice the token covers.
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Creates a token over `text` classified as `kind`.
    pub const fn new(kind: TokenKind, text: &'a str) -> Self {
        Token { kind, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_kind_and_text() {
        assert_eq!(
            Token::new(TokenKind::Word, "abc"),
            Token::new(TokenKind::Word, "abc")
        );
        assert_ne!(
            Token::new(TokenKind::Word, "abc"),
            Token::new(TokenKind::Word, "abd")
        );
        assert_ne!(
            Token::new(TokenKind::Word, "1"),
            Token::new(TokenKind::Number, "1")
        );
    }

    #[test]
    fn tokens_are_copyable() {
        let token = Token::new(TokenKind::Grid, "#");
        let copy = token;
        assert_eq!(token, copy);
    }
}
