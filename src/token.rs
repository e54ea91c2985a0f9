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

//! Token tags produced by the scanner.
//!
//! A token carries no text of its own.  The scanner records the byte range of
//! the most recent lexeme in its [SourceState](crate::scan::SourceState), and
//! the preprocessor hands that text out alongside the tag, so a tag is just a
//! small label for what the bytes mean.

/// The tag attached to a lexeme.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A `#directive` whose name is not recognized.
    Unknown,

    /// Identifier, `[A-Za-z_][A-Za-z0-9_]*`.
    Identifier,

    /// Decimal, hexadecimal, or octal integer literal, with optional
    /// `[uUlL]` suffixes.
    IntLiteral,

    /// Floating-point literal, distinguished from [Token::IntLiteral] by a
    /// `.` or an exponent.
    FloatLiteral,

    /// Double-quoted string literal, including its quotes.
    StringLiteral,

    /// `+=`.
    AddAssign,

    /// `-=`.
    SubAssign,

    /// `*=`.
    MultAssign,

    /// `/=`.
    DivAssign,

    /// `%=`.
    ModAssign,

    /// `^=`.
    XorAssign,

    /// `&=`.
    AndAssign,

    /// `|=`.
    OrAssign,

    /// `++`.
    Increment,

    /// `--`.
    Decrement,

    /// `>>`.
    RShift,

    /// `<<`.
    LShift,

    /// `&&`.
    AndAnd,

    /// `||`.
    OrOr,

    /// `<=`.
    Leq,

    /// `>=`.
    Geq,

    /// `==`.
    Eql,

    /// `!=`.
    Neq,

    /// `##`.
    HashHash,

    /// `#include`.
    PpInclude,

    /// `#line`.
    PpLine,

    /// `#define`.
    PpDefine,

    /// `#undef`.
    PpUndef,

    /// `#if`.
    PpIf,

    /// `#ifdef`.
    PpIfdef,

    /// `#ifndef`.
    PpIfndef,

    /// `#else`.
    PpElse,

    /// `#elif`.
    PpElif,

    /// `#endif`.
    PpEndif,

    /// `#error`.
    PpError,

    /// A `/*` comment still open at end of input.
    IncompleteComment,

    /// Bytes that cannot begin any token, or an unterminated string literal.
    BadChars,

    /// End of input.  Returned indefinitely once the cursor is exhausted.
    Eoi,

    /// A pending error delivered in the token stream.  The lexeme is the
    /// error message.
    PreprocessingError,

    /// A new-line.
    Newline,

    /// Any other single byte of punctuation, carried as its own tag.
    Char(u8),
}

impl Token {
    /// Returns the directive token named by `name`, the identifier following
    /// a line-leading `#`.
    pub fn directive(name: &str) -> Option<Token> {
        match name {
            "include" => Some(Token::PpInclude),
            "line" => Some(Token::PpLine),
            "define" => Some(Token::PpDefine),
            "undef" => Some(Token::PpUndef),
            "if" => Some(Token::PpIf),
            "ifdef" => Some(Token::PpIfdef),
            "ifndef" => Some(Token::PpIfndef),
            "else" => Some(Token::PpElse),
            "elif" => Some(Token::PpElif),
            "endif" => Some(Token::PpEndif),
            "error" => Some(Token::PpError),
            _ => None,
        }
    }

    /// True for the `#keyword` tokens the scanner recognizes.
    pub fn is_directive(&self) -> bool {
        matches!(
            self,
            Token::PpInclude
                | Token::PpLine
                | Token::PpDefine
                | Token::PpUndef
                | Token::PpIf
                | Token::PpIfdef
                | Token::PpIfndef
                | Token::PpElse
                | Token::PpElif
                | Token::PpEndif
                | Token::PpError
        )
    }
}
