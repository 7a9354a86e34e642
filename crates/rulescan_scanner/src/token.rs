//! Tokens produced by the scanner and the consumer-facing token list.

use rulescan_core::text::{LinePos, TextRange};
use rulescan_diagnostics::{ScanError, ScanResult};
use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

/// Delimiters and captured interior of a section token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionParts {
    /// The begin marker as it appeared in the input.
    pub begin: String,
    /// The end marker that closed the section.
    pub end: String,
    /// The escape-decoded interior of a raw section; `None` for nested sections.
    pub content: Option<String>,
}

/// One emitted token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<T> {
    /// The kind of the rule that produced this token.
    pub kind: T,
    /// The token's text as it appeared in the input. For a nested section this
    /// is only its begin and end markers; the interior lives in `nested`.
    pub text: String,
    /// Tokens of a recursively tokenized section's interior.
    pub nested: TokenList<T>,
    /// Set for tokens produced by section rules.
    pub section: Option<SectionParts>,
    /// Line and column of the token's first char.
    pub position: LinePos,
    /// Char offsets of the whole token in the input, nested interior included.
    pub range: TextRange,
}

impl<T> Token<T> {
    pub fn new(kind: T, text: String, position: LinePos, range: TextRange) -> Self {
        Self {
            kind,
            text,
            nested: TokenList::new(),
            section: None,
            position,
            range,
        }
    }

    pub fn with_section(mut self, section: SectionParts) -> Self {
        self.section = Some(section);
        self
    }

    pub fn with_nested(mut self, nested: TokenList<T>) -> Self {
        self.nested = nested;
        self
    }

    /// The decoded interior of a raw section, or the token text for anything else.
    pub fn content(&self) -> &str {
        match &self.section {
            Some(SectionParts {
                content: Some(content),
                ..
            }) => content,
            _ => &self.text,
        }
    }

    pub fn is_section(&self) -> bool {
        self.section.is_some()
    }

    /// Append this token's source text to `out`.
    fn render_into(&self, out: &mut String) {
        match &self.section {
            Some(SectionParts {
                begin,
                end,
                content: None,
            }) => {
                out.push_str(begin);
                self.nested.render_into(out);
                out.push_str(end);
            }
            _ => out.push_str(&self.text),
        }
    }
}

/// An ordered sequence of tokens.
#[derive(Clone, PartialEq)]
pub struct TokenList<T> {
    tokens: VecDeque<Token<T>>,
}

impl<T> TokenList<T> {
    pub fn new() -> Self {
        Self {
            tokens: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn push(&mut self, token: Token<T>) {
        self.tokens.push_back(token);
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Token<T>> {
        self.tokens.iter()
    }

    pub fn first(&self) -> Option<&Token<T>> {
        self.tokens.front()
    }

    pub fn last(&self) -> Option<&Token<T>> {
        self.tokens.back()
    }

    pub fn get(&self, index: usize) -> Option<&Token<T>> {
        self.tokens.get(index)
    }

    /// The token the next [`consume`](TokenList::consume) would return.
    pub fn peek(&self) -> Option<&Token<T>> {
        self.first()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &T> {
        self.tokens.iter().map(|t| &t.kind)
    }

    /// Reconstruct the source text that produced these tokens.
    ///
    /// Discarded text is not part of any token, so the result equals the
    /// input only when the rule set has no discard rules.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        for token in &self.tokens {
            token.render_into(out);
        }
    }
}

impl<T: Clone + PartialEq + fmt::Debug> TokenList<T> {
    /// Partition into consecutive sub-lists separated by tokens of kind `sentinel`.
    ///
    /// Separators are dropped. The result always holds at least one list; an
    /// empty token list yields one empty sub-list.
    pub fn split(&self, sentinel: &T) -> Vec<TokenList<T>> {
        let mut groups = vec![TokenList::new()];
        for token in &self.tokens {
            if token.kind == *sentinel {
                groups.push(TokenList::new());
            } else if let Some(current) = groups.last_mut() {
                current.push(token.clone());
            }
        }
        groups
    }

    /// Remove leading and trailing tokens whose kind is in `kinds`.
    pub fn trim(&mut self, kinds: &[T]) -> &mut Self {
        while self.tokens.front().is_some_and(|t| kinds.contains(&t.kind)) {
            self.tokens.pop_front();
        }
        while self.tokens.back().is_some_and(|t| kinds.contains(&t.kind)) {
            self.tokens.pop_back();
        }
        self
    }

    /// Pop the first token, checking its kind against `allowed`.
    ///
    /// An empty allow-list accepts any kind. Returns `Ok(None)` once the list is empty.
    pub fn consume(&mut self, allowed: &[T]) -> ScanResult<Option<Token<T>>> {
        match self.tokens.pop_front() {
            Some(token) if allowed.is_empty() || allowed.contains(&token.kind) => Ok(Some(token)),
            Some(token) => Err(ScanError::IllegalToken {
                kind: format!("{:?}", token.kind),
                text: token.text,
            }),
            None => Ok(None),
        }
    }

    /// A lazy sequence of [`consume`](TokenList::consume) calls.
    ///
    /// Ends when the list is empty or after the first illegal token.
    pub fn consume_all<'a>(&'a mut self, allowed: &'a [T]) -> ConsumeAll<'a, T> {
        ConsumeAll {
            list: self,
            allowed,
            done: false,
        }
    }
}

impl<T> Default for TokenList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for TokenList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tokens.iter()).finish()
    }
}

impl<T> Index<usize> for TokenList<T> {
    type Output = Token<T>;

    fn index(&self, index: usize) -> &Token<T> {
        &self.tokens[index]
    }
}

impl<T> FromIterator<Token<T>> for TokenList<T> {
    fn from_iter<I: IntoIterator<Item = Token<T>>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for TokenList<T> {
    type Item = Token<T>;
    type IntoIter = std::collections::vec_deque::IntoIter<Token<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a TokenList<T> {
    type Item = &'a Token<T>;
    type IntoIter = std::collections::vec_deque::Iter<'a, Token<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Iterator returned by [`TokenList::consume_all`].
pub struct ConsumeAll<'a, T> {
    list: &'a mut TokenList<T>,
    allowed: &'a [T],
    done: bool,
}

impl<T: Clone + PartialEq + fmt::Debug> Iterator for ConsumeAll<'_, T> {
    type Item = ScanResult<Token<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.list.consume(self.allowed) {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<T: Clone + PartialEq + fmt::Debug> FusedIterator for ConsumeAll<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Kind {
        Text,
        Comma,
        Space,
        Equal,
    }

    fn token(kind: Kind, text: &str) -> Token<Kind> {
        Token::new(kind, text.to_string(), LinePos::START, TextRange::default())
    }

    fn list(tokens: &[(Kind, &str)]) -> TokenList<Kind> {
        tokens.iter().map(|&(k, t)| token(k, t)).collect()
    }

    fn texts(list: &TokenList<Kind>) -> Vec<&str> {
        list.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_split_keeps_empty_groups() {
        let tokens = list(&[
            (Kind::Text, "a"),
            (Kind::Comma, ","),
            (Kind::Text, "b"),
            (Kind::Comma, ","),
            (Kind::Comma, ","),
            (Kind::Text, "c"),
        ]);
        let groups = tokens.split(&Kind::Comma);
        assert_eq!(groups.len(), 4);
        assert_eq!(texts(&groups[0]), vec!["a"]);
        assert_eq!(texts(&groups[1]), vec!["b"]);
        assert!(groups[2].is_empty());
        assert_eq!(texts(&groups[3]), vec!["c"]);
    }

    #[test]
    fn test_split_empty_list() {
        let groups = TokenList::<Kind>::new().split(&Kind::Comma);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_empty());
    }

    #[test]
    fn test_trim_only_boundaries() {
        let mut tokens = list(&[
            (Kind::Space, " "),
            (Kind::Text, "a"),
            (Kind::Space, " "),
            (Kind::Text, "b"),
            (Kind::Space, " "),
            (Kind::Space, "\t"),
        ]);
        tokens.trim(&[Kind::Space]);
        assert_eq!(texts(&tokens), vec!["a", " ", "b"]);

        let mut spaces = list(&[(Kind::Space, " ")]);
        assert!(spaces.trim(&[Kind::Space]).is_empty());
    }

    #[test]
    fn test_consume() {
        let mut tokens = list(&[(Kind::Text, "key"), (Kind::Equal, "=")]);
        let first = tokens.consume(&[Kind::Text]).unwrap().unwrap();
        assert_eq!(first.text, "key");
        assert_eq!(
            tokens.consume(&[Kind::Text]),
            Err(ScanError::IllegalToken {
                kind: "Equal".to_string(),
                text: "=".to_string(),
            })
        );
        assert_eq!(tokens.consume(&[Kind::Text]), Ok(None));
    }

    #[test]
    fn test_consume_empty_allow_list_accepts_any() {
        let mut tokens = list(&[(Kind::Equal, "=")]);
        assert_eq!(tokens.consume(&[]).unwrap().unwrap().kind, Kind::Equal);
    }

    #[test]
    fn test_consume_all_stops_after_error() {
        let mut tokens = list(&[
            (Kind::Text, "a"),
            (Kind::Text, "b"),
            (Kind::Equal, "="),
            (Kind::Text, "c"),
        ]);
        let allowed = [Kind::Text];
        let mut seq = tokens.consume_all(&allowed);
        assert_eq!(seq.next().unwrap().unwrap().text, "a");
        assert_eq!(seq.next().unwrap().unwrap().text, "b");
        assert!(seq.next().unwrap().is_err());
        assert!(seq.next().is_none());
        assert!(seq.next().is_none());
        assert_eq!(texts(&tokens), vec!["c"]);
    }

    #[test]
    fn test_consume_all_drains() {
        let mut tokens = list(&[(Kind::Text, "a"), (Kind::Text, "b")]);
        let consumed: Result<Vec<_>, _> = tokens.consume_all(&[Kind::Text]).collect();
        assert_eq!(consumed.unwrap().len(), 2);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_render_nested_section() {
        let inner = list(&[(Kind::Text, "a"), (Kind::Comma, ","), (Kind::Text, "b")]);
        let section = token(Kind::Text, "()")
            .with_nested(inner)
            .with_section(SectionParts {
                begin: "(".to_string(),
                end: ")".to_string(),
                content: None,
            });
        let tokens: TokenList<Kind> = vec![token(Kind::Text, "f"), section].into_iter().collect();
        assert_eq!(tokens.render(), "f(a,b)");
    }

    #[test]
    fn test_content_of_raw_section() {
        let quoted = token(Kind::Text, "\"b\\\"c\"").with_section(SectionParts {
            begin: "\"".to_string(),
            end: "\"".to_string(),
            content: Some("b\"c".to_string()),
        });
        assert_eq!(quoted.content(), "b\"c");
        assert!(quoted.is_section());
        assert_eq!(token(Kind::Text, "x").content(), "x");
        let tokens: TokenList<Kind> = std::iter::once(quoted).collect();
        assert_eq!(tokens.render(), "\"b\\\"c\"");
    }
}
