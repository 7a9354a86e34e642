//! rulescan_options: Rule sets loaded from JSON documents.
//!
//! A rule-set document lists rules in declaration order:
//!
//! ```json
//! {
//!   "name": "config-string",
//!   "rules": [
//!     { "type": "characterRun", "kind": "Word", "class": "letterOrDigit" },
//!     { "type": "characterRun", "kind": "Space", "class": "whitespace", "discard": true },
//!     { "type": "literal", "kind": "Equal", "text": "=" },
//!     { "type": "section", "kind": "Quoted", "begin": "'", "end": ["'"] },
//!     { "type": "escape", "escape": "\\" }
//!   ]
//! }
//! ```
//!
//! The kind tag type is chosen by the caller and deserialized with serde.

use rulescan_diagnostics::RuleError;
use rulescan_scanner::{Rule, Tokenizer};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// A rule-set document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetOptions<T> {
    /// Optional human-readable name, used in log output only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub rules: Vec<Rule<T>>,
}

/// An error loading or compiling a rule-set document.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read rule set: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rule set document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid rule: {0}")]
    Rule(#[from] RuleError),
}

impl<T: DeserializeOwned> RuleSetOptions<T> {
    /// Parse a rule-set document from a string.
    pub fn from_json(content: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a rule-set document from a path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl<T: Clone + PartialEq + fmt::Debug> RuleSetOptions<T> {
    pub fn new(rules: Vec<Rule<T>>) -> Self {
        Self { name: None, rules }
    }

    /// Check every rule without building a tokenizer.
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (i, rule) in self.rules.iter().enumerate() {
            rule.validate(i)?;
        }
        Ok(())
    }

    /// Compile the rules into a tokenizer.
    pub fn build(self) -> Result<Tokenizer<T>, OptionsError> {
        tracing::debug!(
            name = self.name.as_deref().unwrap_or("<unnamed>"),
            rules = self.rules.len(),
            "building tokenizer from rule set"
        );
        Ok(Tokenizer::new(self.rules)?)
    }
}

impl<T: Serialize> RuleSetOptions<T> {
    /// Serialize this document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulescan_scanner::CharClass;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    enum Kind {
        Word,
        Space,
        Equal,
        Quoted,
    }

    const DOCUMENT: &str = r#"{
        "name": "config-string",
        "rules": [
            { "type": "characterRun", "kind": "Word", "class": "letterOrDigit" },
            { "type": "characterRun", "kind": "Space", "class": "whitespace", "discard": true },
            { "type": "literal", "kind": "Equal", "text": "=" },
            { "type": "section", "kind": "Quoted", "begin": "'", "end": ["'"] },
            { "type": "escape", "escape": "\\" }
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let options: RuleSetOptions<Kind> = RuleSetOptions::from_json(DOCUMENT).unwrap();
        assert_eq!(options.name.as_deref(), Some("config-string"));
        assert_eq!(
            options.rules,
            vec![
                Rule::run(Kind::Word, CharClass::LetterOrDigit),
                Rule::run(Kind::Space, CharClass::Whitespace).discarded(),
                Rule::literal(Kind::Equal, "="),
                Rule::section(Kind::Quoted, "'", ["'"]),
                Rule::escape('\\'),
            ]
        );
    }

    #[test]
    fn test_build_and_tokenize() {
        let tokenizer = RuleSetOptions::<Kind>::from_json(DOCUMENT)
            .unwrap()
            .build()
            .unwrap();
        let tokens = tokenizer.tokenize("key = 'it\\'s'").unwrap();
        let kinds: Vec<Kind> = tokens.kinds().copied().collect();
        assert_eq!(kinds, vec![Kind::Word, Kind::Equal, Kind::Quoted]);
        assert_eq!(tokens[2].content(), "it's");
    }

    #[test]
    fn test_section_flags() {
        let options: RuleSetOptions<Kind> = RuleSetOptions::from_json(
            r#"{ "rules": [
                { "type": "section", "kind": "Quoted", "begin": "(", "end": [")"], "nested": true }
            ] }"#,
        )
        .unwrap();
        assert_eq!(options.name, None);
        assert_eq!(
            options.rules,
            vec![Rule::section(Kind::Quoted, "(", [")"]).nested()]
        );
    }

    #[test]
    fn test_invalid_rule_is_reported() {
        let options: RuleSetOptions<Kind> = RuleSetOptions::from_json(
            r#"{ "rules": [
                { "type": "literal", "kind": "Equal", "text": "=" },
                { "type": "section", "kind": "Quoted", "begin": "'", "end": [] }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            options.validate(),
            Err(OptionsError::Rule(RuleError::NoSectionEnd { index: 1 }))
        ));
        assert!(matches!(
            options.build(),
            Err(OptionsError::Rule(RuleError::NoSectionEnd { index: 1 }))
        ));
    }

    #[test]
    fn test_malformed_document() {
        let err = RuleSetOptions::<Kind>::from_json(r#"{ "rules": [ { "type": "bogus" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, OptionsError::Json(_)));
    }

    #[test]
    fn test_to_json_round_trips() {
        let options = RuleSetOptions::new(vec![
            Rule::literal(Kind::Equal, "="),
            Rule::escape('\\'),
        ]);
        let json = options.to_json().unwrap();
        let parsed: RuleSetOptions<Kind> = RuleSetOptions::from_json(&json).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_missing_file() {
        let err = RuleSetOptions::<Kind>::from_file("/nonexistent/rules.json").unwrap_err();
        assert!(matches!(err, OptionsError::Io(_)));
    }
}
