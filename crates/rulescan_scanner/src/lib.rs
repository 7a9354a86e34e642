//! rulescan_scanner: A declarative, rule-driven tokenizer.
//!
//! Callers describe their token categories as [`Rule`]s and freeze them into
//! a [`Tokenizer`]. Tokenizing produces a [`TokenList`] with line/column
//! tracking, deterministic match priority, and recursively tokenized
//! sections. Supported rule kinds:
//! - Character runs over a per-char class
//! - Literal strings, longest match first per leading char
//! - Delimited sections, raw or recursively tokenized
//! - Escape characters for raw section capture

mod char_codes;
mod index;
mod rule;
mod scanner;
mod token;

pub use rule::{CharClass, Rule};
pub use rulescan_core::text::{LinePos, TextRange};
pub use rulescan_diagnostics::{RuleError, ScanError, ScanResult};
pub use scanner::Tokenizer;
pub use token::{ConsumeAll, SectionParts, Token, TokenList};
