//! rulescan_diagnostics: Error types reported by the tokenizer.
//!
//! Scanning has exactly three failure kinds, all fatal to the call that
//! raised them. Rule-set validation failures are reported separately, when a
//! tokenizer is constructed.

use miette::Diagnostic;
use rulescan_core::text::LinePos;
use thiserror::Error;

/// Maximum number of chars captured in an [`ScanError::UnexpectedCharacter`] preview.
pub const PREVIEW_LEN: usize = 30;

/// An error raised while tokenizing input or consuming the resulting tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ScanError {
    /// The char at the cursor matches no character run and starts no literal or section.
    #[error("unexpected character {character:?} at {position}, near {preview:?}")]
    #[diagnostic(
        code(rulescan::unexpected_character),
        help("no character-run, literal, or section rule accepts this character")
    )]
    UnexpectedCharacter {
        character: char,
        /// Up to [`PREVIEW_LEN`] chars of input starting at the offending char.
        preview: String,
        position: LinePos,
    },

    /// End of input was reached while awaiting a section end marker.
    #[error("section opened at {start} is not terminated before end of input at {end}")]
    #[diagnostic(code(rulescan::unterminated_section))]
    UnterminatedSection { start: LinePos, end: LinePos },

    /// A consumed token's kind is outside the caller's allow-list.
    #[error("illegal token {kind} {text:?}")]
    #[diagnostic(code(rulescan::illegal_token))]
    IllegalToken { kind: String, text: String },
}

impl ScanError {
    /// Build an `UnexpectedCharacter` error from the remaining input at the cursor.
    pub fn unexpected_character(rest: &[char], position: LinePos) -> Self {
        ScanError::UnexpectedCharacter {
            character: rest.first().copied().unwrap_or('\0'),
            preview: rest.iter().take(PREVIEW_LEN).collect(),
            position,
        }
    }

    /// The source position this error refers to, if it has one.
    pub fn position(&self) -> Option<LinePos> {
        match self {
            ScanError::UnexpectedCharacter { position, .. } => Some(*position),
            ScanError::UnterminatedSection { start, .. } => Some(*start),
            ScanError::IllegalToken { .. } => None,
        }
    }
}

/// A malformed rule passed to a tokenizer at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RuleError {
    #[error("rule #{index}: literal text must not be empty")]
    #[diagnostic(code(rulescan::empty_literal))]
    EmptyLiteral { index: usize },

    #[error("rule #{index}: section begin marker must not be empty")]
    #[diagnostic(code(rulescan::empty_section_begin))]
    EmptySectionBegin { index: usize },

    #[error("rule #{index}: section must declare at least one end marker")]
    #[diagnostic(code(rulescan::no_section_end))]
    NoSectionEnd { index: usize },

    #[error("rule #{index}: section end marker must not be empty")]
    #[diagnostic(code(rulescan::empty_section_end))]
    EmptySectionEnd { index: usize },
}

pub type ScanResult<T> = Result<T, ScanError>;
