use std::fmt::Display;

use miette::SourceSpan;
use tracing::trace;

/// A run of non-blank characters in an input line, with the byte offset it
/// starts at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'de> {
    pub literal: &'de str,
    pub byte: usize,
}

impl Token<'_> {
    pub fn span(&self) -> SourceSpan {
        SourceSpan::from(self.byte..self.byte + self.literal.len())
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        write!(f, "WORD {lit} {}..{}", self.byte, self.byte + lit.len())
    }
}

pub struct Lexer<'de> {
    rest: &'de str,
    pub byte: usize,
}

impl<'de> Lexer<'de> {
    pub fn new(input: &'de str) -> Self {
        Lexer {
            rest: input,
            byte: 0,
        }
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Token<'de>;

    fn next(&mut self) -> Option<Self::Item> {
        let trimmed = self.rest.trim_start_matches(is_blank);
        self.byte += self.rest.len() - trimmed.len();
        self.rest = trimmed;
        if self.rest.is_empty() {
            return None;
        }

        let end = self.rest.find(is_blank).unwrap_or(self.rest.len());
        let token = Token {
            literal: &self.rest[..end],
            byte: self.byte,
        };
        self.byte += end;
        self.rest = &self.rest[end..];

        trace!(%token, "lexed");
        Some(token)
    }
}

// Only space and tab separate words; anything else stays inside the token.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

pub fn split(line: &str) -> Vec<Token<'_>> {
    Lexer::new(line).collect()
}
