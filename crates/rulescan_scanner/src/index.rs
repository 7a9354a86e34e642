//! Lookup structures built once from a frozen rule list.

use crate::char_codes::is_line_break;
use crate::rule::{CharClass, Rule, RuleId};
use rulescan_core::collections::{FxHashSet, MultiMap};

/// A literal text the scanner may match at the cursor: a literal rule's text
/// or a section's begin marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LiteralCandidate {
    pub rule: RuleId,
    pub text: Vec<char>,
    pub end_of_line: bool,
}

/// The precomputed match index of a tokenizer.
#[derive(Debug, Clone, Default)]
pub(crate) struct MatchIndex {
    /// Character-run rules in declaration order.
    runs: Vec<(RuleId, CharClass)>,
    escapes: FxHashSet<char>,
    /// End-of-line literal texts, longest first.
    end_of_line: Vec<Vec<char>>,
    /// Literal candidates grouped by leading char, longest first within a group.
    literals: MultiMap<char, LiteralCandidate>,
    /// Section end markers by rule index, longest first. Empty for non-sections.
    section_ends: Vec<Vec<Vec<char>>>,
}

impl MatchIndex {
    pub fn build<T>(rules: &[Rule<T>]) -> Self {
        let mut index = MatchIndex {
            section_ends: vec![Vec::new(); rules.len()],
            ..MatchIndex::default()
        };

        for (i, rule) in rules.iter().enumerate() {
            let id = RuleId(i);
            match rule {
                Rule::CharacterRun { class, .. } => index.runs.push((id, *class)),
                Rule::Literal { text, .. } => {
                    let text: Vec<char> = text.chars().collect();
                    let end_of_line = text.iter().all(|&c| is_line_break(c));
                    if end_of_line && !index.end_of_line.contains(&text) {
                        index.end_of_line.push(text.clone());
                    }
                    index.add_literal(id, text, end_of_line);
                }
                Rule::Section { begin, end, .. } => {
                    index.add_literal(id, begin.chars().collect(), false);
                    let mut ends: Vec<Vec<char>> = end.iter().map(|e| e.chars().collect()).collect();
                    ends.sort_by(|a, b| b.len().cmp(&a.len()));
                    index.section_ends[i] = ends;
                }
                Rule::Escape { escape } => {
                    index.escapes.insert(*escape);
                }
            }
        }

        index.end_of_line.sort_by(|a, b| b.len().cmp(&a.len()));
        index
            .literals
            .sort_groups_by(|a, b| b.text.len().cmp(&a.text.len()));
        index
    }

    fn add_literal(&mut self, rule: RuleId, text: Vec<char>, end_of_line: bool) {
        if let Some(&first) = text.first() {
            self.literals.insert(
                first,
                LiteralCandidate {
                    rule,
                    text,
                    end_of_line,
                },
            );
        }
    }

    /// The first character-run rule whose class accepts `ch`.
    #[inline]
    pub fn run_for(&self, ch: char) -> Option<RuleId> {
        self.runs
            .iter()
            .find(|(_, class)| class.accepts(ch))
            .map(|(id, _)| *id)
    }

    #[inline]
    pub fn is_escape(&self, ch: char) -> bool {
        self.escapes.contains(&ch)
    }

    /// Literal candidates starting with `ch`, longest first.
    #[inline]
    pub fn literals_starting_with(&self, ch: char) -> &[LiteralCandidate] {
        self.literals.get(&ch).unwrap_or(&[])
    }

    pub fn end_of_line(&self) -> &[Vec<char>] {
        &self.end_of_line
    }

    pub fn section_ends(&self, rule: RuleId) -> &[Vec<char>] {
        &self.section_ends[rule.0]
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn literal_count(&self) -> usize {
        self.literals.value_count()
    }

    pub fn escape_count(&self) -> usize {
        self.escapes.len()
    }
}
