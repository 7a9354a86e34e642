//! Declarative rules describing how to recognize one token category.
//!
//! A rule set is built once by a caller and frozen into a
//! [`Tokenizer`](crate::Tokenizer). The kind tag `T` is chosen by the caller;
//! the scanner only clones it into tokens and compares it for equality.

use crate::char_codes::{is_digit, is_letter, is_line_break, is_white_space_single_line};
use rulescan_diagnostics::RuleError;
use serde::{Deserialize, Serialize};

/// Index of a rule in its tokenizer's declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RuleId(pub(crate) usize);

/// A classifier over a single char.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CharClass {
    /// ASCII decimal digits.
    Digit,
    Letter,
    LetterOrDigit,
    /// Whitespace other than line terminators.
    Whitespace,
    /// `\n` or `\r`.
    EndOfLine,
    Any,
}

impl CharClass {
    /// Whether this class accepts `ch`.
    #[inline]
    pub fn accepts(self, ch: char) -> bool {
        match self {
            CharClass::Digit => is_digit(ch),
            CharClass::Letter => is_letter(ch),
            CharClass::LetterOrDigit => is_letter(ch) || is_digit(ch),
            CharClass::Whitespace => is_white_space_single_line(ch),
            CharClass::EndOfLine => is_line_break(ch),
            CharClass::Any => true,
        }
    }
}

/// How to recognize one token category.
///
/// Every variant except [`Rule::Escape`] carries a kind and a `discard` flag.
/// Discarded text is consumed from the input but never emitted as a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Rule<T> {
    /// A maximal span of chars accepted by `class`.
    CharacterRun {
        kind: T,
        class: CharClass,
        #[serde(default)]
        discard: bool,
    },
    /// One fixed, non-empty string.
    Literal {
        kind: T,
        text: String,
        #[serde(default)]
        discard: bool,
    },
    /// A delimited span opened by `begin` and closed by any of `end`.
    ///
    /// When `nested` is set the interior is tokenized recursively; otherwise
    /// it is captured as raw text with escape decoding.
    Section {
        kind: T,
        begin: String,
        end: Vec<String>,
        #[serde(default)]
        nested: bool,
        #[serde(default)]
        discard: bool,
    },
    /// A char that escapes the next char during raw section capture.
    Escape { escape: char },
}

impl<T> Rule<T> {
    pub fn run(kind: T, class: CharClass) -> Self {
        Rule::CharacterRun {
            kind,
            class,
            discard: false,
        }
    }

    pub fn literal(kind: T, text: impl Into<String>) -> Self {
        Rule::Literal {
            kind,
            text: text.into(),
            discard: false,
        }
    }

    /// A raw (non-nested) section. Use [`Rule::nested`] to tokenize its interior.
    pub fn section<I, S>(kind: T, begin: impl Into<String>, end: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::Section {
            kind,
            begin: begin.into(),
            end: end.into_iter().map(Into::into).collect(),
            nested: false,
            discard: false,
        }
    }

    pub fn escape(escape: char) -> Self {
        Rule::Escape { escape }
    }

    /// Mark this rule's matches as discarded. No effect on escape rules.
    pub fn discarded(mut self) -> Self {
        match &mut self {
            Rule::CharacterRun { discard, .. }
            | Rule::Literal { discard, .. }
            | Rule::Section { discard, .. } => *discard = true,
            Rule::Escape { .. } => {}
        }
        self
    }

    /// Tokenize this section's interior recursively. No effect on other rules.
    pub fn nested(mut self) -> Self {
        if let Rule::Section { nested, .. } = &mut self {
            *nested = true;
        }
        self
    }

    /// The token kind this rule emits, or `None` for escape rules.
    pub fn kind(&self) -> Option<&T> {
        match self {
            Rule::CharacterRun { kind, .. }
            | Rule::Literal { kind, .. }
            | Rule::Section { kind, .. } => Some(kind),
            Rule::Escape { .. } => None,
        }
    }

    pub fn is_discard(&self) -> bool {
        match self {
            Rule::CharacterRun { discard, .. }
            | Rule::Literal { discard, .. }
            | Rule::Section { discard, .. } => *discard,
            Rule::Escape { .. } => false,
        }
    }

    /// Check the structural invariants of this rule, at position `index` in its rule list.
    pub fn validate(&self, index: usize) -> Result<(), RuleError> {
        match self {
            Rule::Literal { text, .. } if text.is_empty() => Err(RuleError::EmptyLiteral { index }),
            Rule::Section { begin, .. } if begin.is_empty() => {
                Err(RuleError::EmptySectionBegin { index })
            }
            Rule::Section { end, .. } if end.is_empty() => Err(RuleError::NoSectionEnd { index }),
            Rule::Section { end, .. } if end.iter().any(String::is_empty) => {
                Err(RuleError::EmptySectionEnd { index })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_classes() {
        assert!(CharClass::Digit.accepts('7'));
        assert!(!CharClass::Digit.accepts('a'));
        assert!(CharClass::Letter.accepts('é'));
        assert!(CharClass::LetterOrDigit.accepts('9'));
        assert!(!CharClass::LetterOrDigit.accepts('_'));
        assert!(CharClass::Whitespace.accepts('\t'));
        assert!(!CharClass::Whitespace.accepts('\n'));
        assert!(CharClass::EndOfLine.accepts('\n'));
        assert!(CharClass::Any.accepts('#'));
    }

    #[test]
    fn test_builders() {
        let rule = Rule::section("quote", "\"", ["\""]).nested().discarded();
        assert_eq!(
            rule,
            Rule::Section {
                kind: "quote",
                begin: "\"".to_string(),
                end: vec!["\"".to_string()],
                nested: true,
                discard: true,
            }
        );
        assert_eq!(rule.kind(), Some(&"quote"));
        assert!(rule.is_discard());

        let escape: Rule<&str> = Rule::escape('\\').discarded();
        assert_eq!(escape.kind(), None);
        assert!(!escape.is_discard());
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            Rule::literal(0, "").validate(3),
            Err(RuleError::EmptyLiteral { index: 3 })
        );
        assert_eq!(
            Rule::section(0, "", [")"]).validate(0),
            Err(RuleError::EmptySectionBegin { index: 0 })
        );
        assert_eq!(
            Rule::section(0, "(", Vec::<String>::new()).validate(1),
            Err(RuleError::NoSectionEnd { index: 1 })
        );
        assert_eq!(
            Rule::section(0, "(", [")", ""]).validate(2),
            Err(RuleError::EmptySectionEnd { index: 2 })
        );
        assert_eq!(Rule::run(0, CharClass::Any).validate(0), Ok(()));
    }
}
