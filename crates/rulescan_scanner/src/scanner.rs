//! The rule-driven scanning engine.
//!
//! A [`Tokenizer`] owns an immutable rule list and the match index built from
//! it. Every [`Tokenizer::tokenize`] call runs its own cursor over the
//! input, so one tokenizer can serve any number of concurrent calls.
//!
//! Match priority at each cursor position:
//! 1. an enclosing section's end marker stops the current nesting level;
//! 2. the longest literal sharing the current leading char is a candidate,
//!    as is the first character-run rule accepting the current char;
//! 3. the literal wins unless the run candidate continues the run in progress.
//!
//! Nested sections recurse once per nesting level on the native stack. There
//! is no depth limit.

use crate::char_codes::{is_line_break, translate_escape};
use crate::index::{LiteralCandidate, MatchIndex};
use crate::rule::{Rule, RuleId};
use crate::token::{SectionParts, Token, TokenList};
use rulescan_core::text::{text_pos, LinePos, TextRange};
use rulescan_diagnostics::{RuleError, ScanError, ScanResult};
use std::fmt;
use tracing::{debug, trace};

/// A compiled, immutable rule set.
#[derive(Debug, Clone)]
pub struct Tokenizer<T> {
    rules: Vec<Rule<T>>,
    index: MatchIndex,
}

impl<T: Clone + PartialEq + fmt::Debug> Tokenizer<T> {
    /// Freeze `rules` and build the match index.
    pub fn new(rules: impl IntoIterator<Item = Rule<T>>) -> Result<Self, RuleError> {
        let rules: Vec<Rule<T>> = rules.into_iter().collect();
        for (i, rule) in rules.iter().enumerate() {
            rule.validate(i)?;
        }
        let index = MatchIndex::build(&rules);
        debug!(
            rules = rules.len(),
            runs = index.run_count(),
            literals = index.literal_count(),
            escapes = index.escape_count(),
            "built tokenizer match index"
        );
        Ok(Self { rules, index })
    }

    /// The frozen rule list, in declaration order.
    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    fn rule(&self, id: RuleId) -> &Rule<T> {
        &self.rules[id.0]
    }

    /// Convert `text` into a token list.
    #[tracing::instrument(level = "trace", skip_all, fields(len = text.len()))]
    pub fn tokenize(&self, text: &str) -> ScanResult<TokenList<T>> {
        let mut cursor = Cursor::new(self, text);
        let tokens = cursor.scan(None)?;
        trace!(tokens = tokens.len(), "tokenized input");
        Ok(tokens)
    }
}

/// A character run that has not been flushed into a token yet.
struct PendingRun {
    rule: RuleId,
    buffer: String,
    start: LinePos,
    start_pos: usize,
}

/// A literal candidate matched at the cursor.
struct LiteralMatch {
    rule: RuleId,
    /// Input chars covered by the match, including a leading escape char.
    consumed: usize,
    /// Whether the match is a real (unescaped) line break.
    line_break: bool,
}

/// Per-call scanning state.
struct Cursor<'t, T> {
    tokenizer: &'t Tokenizer<T>,
    text: Vec<char>,
    pos: usize,
    line_pos: LinePos,
}

impl<'t, T: Clone + PartialEq + fmt::Debug> Cursor<'t, T> {
    fn new(tokenizer: &'t Tokenizer<T>, text: &str) -> Self {
        Self {
            tokenizer,
            text: text.chars().collect(),
            pos: 0,
            line_pos: LinePos::START,
        }
    }

    // ========================================================================
    // Cursor primitives
    // ========================================================================

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text.get(self.pos).copied()
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset).copied()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    fn index(&self) -> &'t MatchIndex {
        &self.tokenizer.index
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.text[start..end].iter().collect()
    }

    /// Whether `marker` appears verbatim at `pos`.
    #[inline]
    fn matches_at(&self, pos: usize, marker: &[char]) -> bool {
        self.text
            .get(pos..pos + marker.len())
            .is_some_and(|window| window == marker)
    }

    /// Length of the first marker in `markers` that matches at the cursor.
    fn match_any(&self, markers: &[Vec<char>]) -> Option<usize> {
        self.match_any_at(self.pos, markers)
    }

    fn match_any_at(&self, pos: usize, markers: &[Vec<char>]) -> Option<usize> {
        markers
            .iter()
            .find(|marker| self.matches_at(pos, marker))
            .map(Vec::len)
    }

    /// Range from `start` to the cursor.
    fn range_from(&self, start: usize) -> TextRange {
        TextRange::new(text_pos(start), text_pos(self.pos))
    }

    fn advance(&mut self, count: usize) {
        self.pos += count;
        self.line_pos.advance(count);
    }

    fn advance_line(&mut self, count: usize) {
        self.pos += count;
        self.line_pos.next_line();
    }

    /// Consume a section end marker of `len` chars. A marker made only of
    /// line breaks ends the line.
    fn advance_marker(&mut self, len: usize) {
        if self.text[self.pos..self.pos + len]
            .iter()
            .all(|&c| is_line_break(c))
        {
            self.advance_line(len);
        } else {
            self.advance(len);
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan until end of input or, when `bound` is set, until one of its end
    /// markers matches at the cursor.
    fn scan(&mut self, bound: Option<&[Vec<char>]>) -> ScanResult<TokenList<T>> {
        let mut tokens = TokenList::new();
        let mut pending: Option<PendingRun> = None;

        while !self.is_eof() {
            if bound.is_some_and(|ends| self.match_any(ends).is_some()) {
                break;
            }

            let run = self.current_char().and_then(|ch| self.index().run_for(ch));
            let continues_run = run.is_some_and(|r| pending.as_ref().is_some_and(|p| p.rule == r));
            let literal = self.best_literal().filter(|_| !continues_run);

            match (literal, run) {
                (Some(m), _) => {
                    self.flush(&mut tokens, pending.take());
                    let discard = self.tokenizer.rule(m.rule).is_discard();
                    let token = self.scan_literal(m)?;
                    if !discard {
                        tokens.push(token);
                    }
                }
                (None, Some(rule)) => {
                    if pending.as_ref().is_some_and(|p| p.rule != rule) {
                        self.flush(&mut tokens, pending.take());
                    }
                    let start = self.line_pos;
                    let start_pos = self.pos;
                    let run = pending.get_or_insert_with(|| PendingRun {
                        rule,
                        buffer: String::new(),
                        start,
                        start_pos,
                    });
                    run.buffer.push(self.text[self.pos]);
                    self.advance(1);
                }
                (None, None) => {
                    return Err(ScanError::unexpected_character(
                        &self.text[self.pos..],
                        self.line_pos,
                    ));
                }
            }
        }

        self.flush(&mut tokens, pending);
        Ok(tokens)
    }

    /// Complete a pending run, emitting it unless its rule discards.
    fn flush(&self, tokens: &mut TokenList<T>, pending: Option<PendingRun>) {
        let Some(run) = pending else {
            return;
        };
        let rule = self.tokenizer.rule(run.rule);
        if rule.is_discard() {
            return;
        }
        if let Some(kind) = rule.kind() {
            tokens.push(Token::new(
                kind.clone(),
                run.buffer,
                run.start,
                self.range_from(run.start_pos),
            ));
        }
    }

    /// The longest literal candidate matching at the cursor.
    ///
    /// An escape char at the cursor is compared as the translated char that
    /// follows it; the rest of the literal is compared verbatim.
    fn best_literal(&self) -> Option<LiteralMatch> {
        let ch = self.current_char()?;
        let (lead, skip) = match self.char_at(1) {
            Some(next) if self.index().is_escape(ch) => (translate_escape(next), 1),
            _ => (ch, 0),
        };

        self.index()
            .literals_starting_with(lead)
            .iter()
            .find(|candidate| self.matches_at(self.pos + skip + 1, &candidate.text[1..]))
            .map(|candidate: &LiteralCandidate| LiteralMatch {
                rule: candidate.rule,
                consumed: skip + candidate.text.len(),
                line_break: candidate.end_of_line && skip == 0,
            })
    }

    /// Consume a matched literal or section begin marker and build its token.
    fn scan_literal(&mut self, m: LiteralMatch) -> ScanResult<Token<T>> {
        let start = self.line_pos;
        let start_pos = self.pos;
        let text = self.slice(self.pos, self.pos + m.consumed);
        if m.line_break {
            self.advance_line(m.consumed);
        } else {
            self.advance(m.consumed);
        }

        let tokenizer = self.tokenizer;
        match tokenizer.rule(m.rule) {
            Rule::Literal { kind, .. } => Ok(Token::new(
                kind.clone(),
                text,
                start,
                self.range_from(start_pos),
            )),
            Rule::Section {
                kind, nested: true, ..
            } => {
                let ends = self.index().section_ends(m.rule);
                trace!(line = start.line, column = start.column, "entering nested section");
                let nested = self.scan(Some(ends))?;
                let end_len = self.match_any(ends).ok_or(ScanError::UnterminatedSection {
                    start,
                    end: self.line_pos,
                })?;
                let end = self.slice(self.pos, self.pos + end_len);
                self.advance_marker(end_len);
                Ok(Token::new(
                    kind.clone(),
                    format!("{text}{end}"),
                    start,
                    self.range_from(start_pos),
                )
                .with_nested(nested)
                .with_section(SectionParts {
                    begin: text,
                    end,
                    content: None,
                }))
            }
            Rule::Section { kind, .. } => {
                let ends = self.index().section_ends(m.rule);
                let capture = self.capture_raw(ends, start)?;
                Ok(Token::new(
                    kind.clone(),
                    format!("{text}{}{}", capture.raw, capture.end),
                    start,
                    self.range_from(start_pos),
                )
                .with_section(SectionParts {
                    begin: text,
                    end: capture.end,
                    content: Some(capture.content),
                }))
            }
            Rule::CharacterRun { .. } | Rule::Escape { .. } => {
                unreachable!("literal index holds only literal and section rules")
            }
        }
    }

    /// Capture a raw section interior up to and including its end marker.
    fn capture_raw(&mut self, ends: &[Vec<char>], start: LinePos) -> ScanResult<RawCapture> {
        let interior_start = self.pos;
        let mut content = String::new();

        loop {
            let Some(ch) = self.current_char() else {
                return Err(ScanError::UnterminatedSection {
                    start,
                    end: self.line_pos,
                });
            };

            if self.index().is_escape(ch) {
                match self.char_at(1) {
                    Some(next) if is_line_break(next) => {
                        let len = self
                            .match_any_at(self.pos + 1, self.index().end_of_line())
                            .unwrap_or(1);
                        content.extend(&self.text[self.pos + 1..self.pos + 1 + len]);
                        self.advance_line(1 + len);
                    }
                    Some(next) => {
                        content.push(translate_escape(next));
                        self.advance(2);
                    }
                    None => self.advance(1),
                }
                continue;
            }

            if let Some(len) = self.match_any(ends) {
                let raw = self.slice(interior_start, self.pos);
                let end = self.slice(self.pos, self.pos + len);
                self.advance_marker(len);
                return Ok(RawCapture { raw, content, end });
            }

            if let Some(len) = self.match_any(self.index().end_of_line()) {
                content.extend(&self.text[self.pos..self.pos + len]);
                self.advance_line(len);
                continue;
            }

            content.push(ch);
            self.advance(1);
        }
    }
}

/// The result of capturing a raw section interior.
struct RawCapture {
    /// Interior text as it appeared in the input.
    raw: String,
    /// Interior text with escapes decoded.
    content: String,
    end: String,
}
