use thiserror::Error;

/// Errors surfaced by the strict conversion pipeline.
///
/// Malformed markup is never an error anywhere in this crate; the parser
/// resolves it to literal text. The only runtime failure is the strict
/// tokenizer rejecting a character outside the recognized classes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkdownError {
    /// A character matched none of the token classes.
    #[error("unknown character {character:?} at byte offset {offset}")]
    UnknownCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character in the input.
        offset: usize,
    },
}

impl MarkdownError {
    /// Create an unknown-character error at a byte offset
    pub fn unknown_character(character: char, offset: usize) -> Self {
        Self::UnknownCharacter { character, offset }
    }
}
