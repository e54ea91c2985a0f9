// shaderpp - a preprocessor for HLSL-style shader source.
// Copyright (C) 2026 The shaderpp authors.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

//! Byte-level scanning.
//!
//! A [SourceState] is one active translation unit: a source buffer, a cursor,
//! and the bookkeeping the preprocessor keeps per unit (line number,
//! conditional stack, whether the unit came from the include resolver).
//! [SourceState::lex] classifies the next lexeme and advances the cursor past
//! it, so the scanner and the include stack share one notion of position.
//!
//! Lexemes are labeled with [Token] tags.  White space other than new-line is
//! skipped silently; a new-line is itself a token, because directive handlers
//! in [`crate::preprocessor`] need to see the end of a directive line.
//! Comments are skipped like white space, except that a `/*` comment still
//! open at end of input is reported as [Token::IncompleteComment].

use std::sync::Arc;

use smallvec::SmallVec;

use crate::preprocessor::Conditional;
use crate::token::Token;

/// One active translation unit on the include stack.
pub struct SourceState {
    /// Interned file name, or `None` for an anonymous root unit.
    pub(crate) filename: Option<Arc<str>>,

    /// True if this unit was produced by the include resolver and its buffer
    /// must be returned to the resolver when the unit is popped.
    pub(crate) included: bool,

    /// The unit's source bytes.
    pub(crate) source: String,

    /// Byte offset of the cursor, just past the most recent lexeme.
    pub(crate) pos: usize,

    /// Byte offset of the first byte of the most recent lexeme.
    pub(crate) token_start: usize,

    /// 1-based line number, incremented once per `\n` consumed.
    pub(crate) line: u32,

    /// Open `#if...` groups in this unit, innermost last.
    pub(crate) conditionals: SmallVec<[Conditional; 8]>,
}

impl SourceState {
    /// Creates a state scanning `source` from the beginning.
    pub fn new(filename: Option<Arc<str>>, source: String) -> Self {
        Self {
            filename,
            included: false,
            source,
            pos: 0,
            token_start: 0,
            line: 1,
            conditionals: SmallVec::new(),
        }
    }

    /// The text of the most recent lexeme.
    pub fn lexeme(&self) -> &str {
        &self.source[self.token_start..self.pos]
    }

    /// Bytes not yet consumed.
    pub fn bytes_left(&self) -> usize {
        self.source.len() - self.pos
    }

    /// The unit's file name, if it has one.
    pub fn filename(&self) -> Option<&Arc<str>> {
        self.filename.as_ref()
    }

    /// Current 1-based line number.
    pub fn line(&self) -> u32 {
        self.line
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + n).copied()
    }

    /// Consumes one byte, counting lines.
    fn bump(&mut self) {
        if self.peek() == Some(b'\n') {
            self.line += 1;
        }
        self.pos += 1;
    }

    /// Classifies the lexeme at the cursor, advances past it, and returns its
    /// tag.  `token_start` is left on the lexeme's first byte.  Once the
    /// buffer is exhausted this returns [Token::Eoi] indefinitely.
    pub fn lex(&mut self) -> Token {
        loop {
            self.token_start = self.pos;
            let Some(b) = self.peek() else {
                return Token::Eoi;
            };
            match b {
                b'\n' => {
                    self.bump();
                    return Token::Newline;
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => {
                    self.bump();
                }
                b'/' if self.peek_at(1) == Some(b'/') => {
                    // Line comment.  The terminating new-line is left for the
                    // next call, so it still shows up as a token.
                    self.pos += 2;
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                b'/' if self.peek_at(1) == Some(b'*') => {
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            None => return Token::IncompleteComment,
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.bump(),
                        }
                    }
                }
                b'#' if self.at_line_start() => {
                    if let Some(token) = self.lex_directive() {
                        return token;
                    }
                    return self.lex_punct();
                }
                b'A'..=b'Z' | b'a'..=b'z' | b'_' => return self.lex_identifier(),
                b'0'..=b'9' => return self.lex_number(),
                b'.' if matches!(self.peek_at(1), Some(b'0'..=b'9')) => return self.lex_number(),
                b'"' => return self.lex_string(),
                _ => return self.lex_punct(),
            }
        }
    }

    /// True if nothing but blanks precedes the cursor on its line.
    fn at_line_start(&self) -> bool {
        self.source.as_bytes()[..self.pos]
            .iter()
            .rev()
            .find(|&&b| !matches!(b, b' ' | b'\t' | b'\r' | 0x0b | 0x0c))
            .is_none_or(|&b| b == b'\n')
    }

    /// Tries to read `#name` as a directive.  On success the lexeme spans the
    /// `#` through the name; otherwise the cursor is rewound to the `#` so it
    /// can be scanned as punctuation.
    fn lex_directive(&mut self) -> Option<Token> {
        self.pos += 1; // '#'
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
        let name_start = self.pos;
        if matches!(self.peek(), Some(b'A'..=b'Z' | b'a'..=b'z' | b'_')) {
            while matches!(self.peek(), Some(b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_')) {
                self.pos += 1;
            }
            let name = &self.source[name_start..self.pos];
            Some(Token::directive(name).unwrap_or(Token::Unknown))
        } else {
            self.pos = self.token_start;
            None
        }
    }

    fn lex_identifier(&mut self) -> Token {
        while matches!(self.peek(), Some(b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_')) {
            self.pos += 1;
        }
        Token::Identifier
    }

    fn lex_number(&mut self) -> Token {
        if self.peek() == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x' | b'X'))
            && self.peek_at(2).is_some_and(|b| b.is_ascii_hexdigit())
        {
            self.pos += 2;
            while self.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            self.lex_int_suffix();
            return Token::IntLiteral;
        }

        self.skip_digits();
        let mut float = false;
        if self.peek() == Some(b'.') {
            // `1.`, `1.5`, and `.5` are all floating-point; the caller
            // guarantees a digit on at least one side of the dot.
            float = true;
            self.pos += 1;
            self.skip_digits();
        }
        if self.lex_exponent() {
            float = true;
        }
        if float {
            if matches!(self.peek(), Some(b'f' | b'F')) {
                self.pos += 1;
            }
            Token::FloatLiteral
        } else {
            self.lex_int_suffix();
            Token::IntLiteral
        }
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    fn lex_int_suffix(&mut self) {
        while matches!(self.peek(), Some(b'u' | b'U' | b'l' | b'L')) {
            self.pos += 1;
        }
    }

    /// Consumes `[eE][+-]?[0-9]+` if the whole pattern is present.  A lone
    /// `e` stays put so that `1e` scans as an integer followed by an
    /// identifier.
    fn lex_exponent(&mut self) -> bool {
        if !matches!(self.peek(), Some(b'e' | b'E')) {
            return false;
        }
        let digits_at = match self.peek_at(1) {
            Some(b'0'..=b'9') => 1,
            Some(b'+' | b'-') if matches!(self.peek_at(2), Some(b'0'..=b'9')) => 2,
            _ => return false,
        };
        self.pos += digits_at;
        self.skip_digits();
        true
    }

    fn lex_string(&mut self) -> Token {
        self.pos += 1; // '"'
        loop {
            match self.peek() {
                None | Some(b'\n') => return Token::BadChars,
                Some(b'\\') if self.peek_at(1).is_some_and(|b| b != b'\n') => {
                    self.pos += 1;
                    self.bump();
                }
                Some(b'"') => {
                    self.pos += 1;
                    return Token::StringLiteral;
                }
                Some(_) => self.bump(),
            }
        }
    }

    fn lex_punct(&mut self) -> Token {
        let b = self.peek().unwrap();
        self.pos += 1;
        let pair = |state: &mut Self, token| {
            state.pos += 1;
            token
        };
        match (b, self.peek()) {
            (b'+', Some(b'=')) => pair(self, Token::AddAssign),
            (b'+', Some(b'+')) => pair(self, Token::Increment),
            (b'-', Some(b'=')) => pair(self, Token::SubAssign),
            (b'-', Some(b'-')) => pair(self, Token::Decrement),
            (b'*', Some(b'=')) => pair(self, Token::MultAssign),
            (b'/', Some(b'=')) => pair(self, Token::DivAssign),
            (b'%', Some(b'=')) => pair(self, Token::ModAssign),
            (b'^', Some(b'=')) => pair(self, Token::XorAssign),
            (b'&', Some(b'=')) => pair(self, Token::AndAssign),
            (b'&', Some(b'&')) => pair(self, Token::AndAnd),
            (b'|', Some(b'=')) => pair(self, Token::OrAssign),
            (b'|', Some(b'|')) => pair(self, Token::OrOr),
            (b'<', Some(b'<')) => pair(self, Token::LShift),
            (b'<', Some(b'=')) => pair(self, Token::Leq),
            (b'>', Some(b'>')) => pair(self, Token::RShift),
            (b'>', Some(b'=')) => pair(self, Token::Geq),
            (b'=', Some(b'=')) => pair(self, Token::Eql),
            (b'!', Some(b'=')) => pair(self, Token::Neq),
            (b'#', Some(b'#')) => pair(self, Token::HashHash),
            _ if b.is_ascii_graphic() => Token::Char(b),
            _ if b.is_ascii() => Token::BadChars,
            _ => {
                // Keep the lexeme on a character boundary.
                while matches!(self.peek(), Some(c) if c & 0xc0 == 0x80) {
                    self.pos += 1;
                }
                Token::BadChars
            }
        }
    }

    /// Consumes raw bytes up to and including the `>` of a system include.
    /// Returns false, leaving the cursor wherever it stopped, if the line or
    /// the buffer ends first.
    pub(crate) fn scan_system_include(&mut self) -> bool {
        loop {
            match self.peek() {
                None | Some(b'\r') | Some(b'\n') => return false,
                Some(b'>') => {
                    self.pos += 1;
                    return true;
                }
                Some(_) => self.pos += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests;
