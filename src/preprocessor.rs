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

//! The preprocessor proper.
//!
//! A [Preprocessor] wraps the scanner with everything that gives the token
//! stream its meaning: the stack of active translation units, the macro
//! definition table, the per-unit conditional stacks, and the directive
//! handlers that tie them together.  Pulling [Preprocessor::next_token]
//! yields the tokens that survive preprocessing, in source order, with
//! included units fully consumed between an `#include` line and the next
//! token of the including unit.
//!
//! Errors do not stop the stream.  A directive handler that fails leaves a
//! single pending error; the next pull delivers it as a
//! [Token::PreprocessingError] lexeme and scanning picks up where it left
//! off, so one run reports as many problems as practical.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::Range,
    sync::Arc,
};

use crate::{
    defines::DefineTable,
    error::PreprocessorError,
    include::{FileResolver, IncludeKind, IncludeResolver},
    scan::SourceState,
    token::Token,
};

/// Capacity of the failure buffer that renders pending errors, one byte of
/// which is reserved for a terminator.
const FAILSTR_LEN: usize = 256;

/// What kind of directive opened (or re-opened, for `#else`) a conditional.
///
/// `If` and `Elif` complete the conditional vocabulary but are never pushed
/// onto a stack: `#if` and `#elif` are rejected as unsupported without
/// opening a group, so live frames only ever carry `Ifdef`, `Ifndef`, or
/// `Else`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConditionalKind {
    If,
    Ifdef,
    Ifndef,
    Else,
    Elif,
}

impl ConditionalKind {
    fn name(&self) -> &'static str {
        match self {
            ConditionalKind::If => "if",
            ConditionalKind::Ifdef => "ifdef",
            ConditionalKind::Ifndef => "ifndef",
            ConditionalKind::Else => "else",
            ConditionalKind::Elif => "elif",
        }
    }
}

impl Display for ConditionalKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// One open `#if...` group.
#[derive(Copy, Clone, Debug)]
pub struct Conditional {
    /// The directive that currently governs the group.
    pub kind: ConditionalKind,

    /// Line the group was opened on.
    pub line: u32,

    /// True while tokens in the current arm are being discarded.
    pub skipping: bool,

    /// True once any arm of the group has been selected.
    pub chosen: bool,
}

/// File names deduplicated so that byte-equal names share one allocation and
/// compare equal by pointer identity.
#[derive(Default)]
struct Filenames(Vec<Arc<str>>);

impl Filenames {
    fn intern(&mut self, name: &str) -> Arc<str> {
        if let Some(existing) = self.0.iter().find(|interned| interned.as_ref() == name) {
            return Arc::clone(existing);
        }
        let interned: Arc<str> = Arc::from(name);
        self.0.push(Arc::clone(&interned));
        interned
    }
}

/// A preprocessing run over one root translation unit.
pub struct Preprocessor<R = FileResolver>
where
    R: IncludeResolver,
{
    resolver: R,
    defines: DefineTable,
    filenames: Filenames,
    include_stack: Vec<SourceState>,
    pending: Option<PreprocessorError>,
    failstr: String,
}

impl Preprocessor {
    /// Starts preprocessing `source`, resolving includes through a default
    /// [FileResolver].  `filename` names the root unit in positions and
    /// diagnostics.  Each `(name, definition)` pair in `predefines` is bound
    /// before scanning begins; a duplicate name fails the whole start, as a
    /// later `#define` of it would.
    pub fn new(
        filename: Option<&str>,
        source: impl Into<String>,
        predefines: &[(&str, &str)],
    ) -> Result<Self, PreprocessorError> {
        Self::with_resolver(filename, source, predefines, FileResolver::new())
    }
}

impl<R> Preprocessor<R>
where
    R: IncludeResolver,
{
    /// Like [Preprocessor::new] with a caller-supplied include resolver.
    pub fn with_resolver(
        filename: Option<&str>,
        source: impl Into<String>,
        predefines: &[(&str, &str)],
        resolver: R,
    ) -> Result<Self, PreprocessorError> {
        let mut preprocessor = Self {
            resolver,
            defines: DefineTable::new(),
            filenames: Filenames::default(),
            include_stack: Vec::new(),
            pending: None,
            failstr: String::new(),
        };
        for &(name, definition) in predefines {
            preprocessor.defines.add(name, definition)?;
        }
        preprocessor.push_source(filename, source.into(), false);
        Ok(preprocessor)
    }

    /// Pulls the next surviving token.  Returns the lexeme's text and tag;
    /// the text stays valid until the next call.  `None` means the whole
    /// input, includes and all, has been consumed.
    pub fn next_token(&mut self) -> Option<(&str, Token)> {
        enum Pulled {
            Error,
            Lexeme(Token),
        }

        let pulled = loop {
            if let Some(error) = self.pending.take() {
                self.failstr = truncated(error.to_string());
                break Pulled::Error;
            }

            let Some(state) = self.include_stack.last_mut() else {
                return None;
            };
            let skipping = state.conditionals.last().is_some_and(|c| c.skipping);

            let token = state.lex();
            let result = match token {
                Token::Eoi => {
                    debug_assert_eq!(state.bytes_left(), 0);
                    match state.conditionals.pop() {
                        // Report one unterminated group per pull until the
                        // unit's stack is drained, then pop the unit.
                        Some(conditional) => {
                            Err(PreprocessorError::Unterminated(conditional.kind))
                        }
                        None => {
                            self.pop_source();
                            Ok(())
                        }
                    }
                }
                Token::IncompleteComment => Err(PreprocessorError::IncompleteComment),
                Token::PpIfdef => self.handle_ifdef(ConditionalKind::Ifdef),
                Token::PpIfndef => self.handle_ifdef(ConditionalKind::Ifndef),
                Token::PpEndif => self.handle_endif(),
                Token::PpElse => self.handle_else(),
                // The conditional directives above run even while skipping;
                // everything else in a skipped arm is discarded.
                _ if skipping => Ok(()),
                Token::PpInclude => self.handle_include(),
                Token::PpLine => self.handle_line(),
                Token::PpError => self.handle_error(),
                Token::PpUndef => self.handle_undef(),
                Token::PpDefine => self.handle_define(),
                Token::PpIf => self.handle_unsupported("if"),
                Token::PpElif => self.handle_unsupported("elif"),
                _ => break Pulled::Lexeme(token),
            };
            if let Err(error) = result {
                self.pending = Some(error);
            }
        };

        let (text, token) = match pulled {
            Pulled::Error => (self.failstr.as_str(), Token::PreprocessingError),
            Pulled::Lexeme(token) => {
                let state = self.include_stack.last().unwrap();
                (state.lexeme(), token)
            }
        };
        log::trace!("token {token:?} {text:?}");
        Some((text, token))
    }

    /// The position the scanner is at: the top unit's file name and line, or
    /// `(None, 0)` once the stack is empty.
    pub fn source_position(&self) -> (Option<Arc<str>>, u32) {
        match self.include_stack.last() {
            Some(state) => (state.filename.clone(), state.line),
            None => (None, 0),
        }
    }

    fn push_source(&mut self, filename: Option<&str>, source: String, included: bool) {
        let filename = filename.map(|filename| self.filenames.intern(filename));
        let mut state = SourceState::new(filename, source);
        state.included = included;
        self.include_stack.push(state);
    }

    fn pop_source(&mut self) {
        if let Some(state) = self.include_stack.pop() {
            if state.included {
                self.resolver.close(state.source);
            }
        }
    }

    fn handle_include(&mut self) -> Result<(), PreprocessorError> {
        let state = self.include_stack.last_mut().unwrap();
        let kind = match state.lex() {
            Token::StringLiteral => IncludeKind::Local,
            Token::Char(b'<') => {
                // Every byte up to the closing `>` belongs to the file name,
                // so the scanner cannot be used for it.
                if !state.scan_system_include() {
                    return Err(PreprocessorError::InvalidDirective("include"));
                }
                IncludeKind::System
            }
            _ => return Err(PreprocessorError::InvalidDirective("include")),
        };
        let raw = state.lexeme();
        let filename = String::from(&raw[1..raw.len() - 1]);
        if !require_newline(state) {
            return Err(PreprocessorError::InvalidDirective("include"));
        }
        let parent = state.filename.clone();
        let Some(source) = self.resolver.open(kind, &filename, parent.as_deref()) else {
            return Err(PreprocessorError::IncludeCallbackFailed);
        };
        self.push_source(Some(&filename), source, true);
        Ok(())
    }

    fn handle_line(&mut self) -> Result<(), PreprocessorError> {
        let state = self.include_stack.last_mut().unwrap();
        if state.lex() != Token::IntLiteral {
            return Err(PreprocessorError::InvalidDirective("line"));
        }
        let line = leading_decimal(state.lexeme());
        if state.lex() != Token::StringLiteral {
            return Err(PreprocessorError::InvalidDirective("line"));
        }
        let raw = state.lexeme();
        let filename = String::from(&raw[1..raw.len() - 1]);
        if !require_newline(state) {
            return Err(PreprocessorError::InvalidDirective("line"));
        }
        state.filename = Some(self.filenames.intern(&filename));
        state.line = line;
        Ok(())
    }

    fn handle_error(&mut self) -> Result<(), PreprocessorError> {
        let state = self.include_stack.last_mut().unwrap();
        let message = rest_of_line(state);
        let message = String::from(&state.source[message]);
        Err(PreprocessorError::UserError(message))
    }

    fn handle_undef(&mut self) -> Result<(), PreprocessorError> {
        let state = self.include_stack.last_mut().unwrap();
        if state.lex() != Token::Identifier {
            return Err(PreprocessorError::InvalidDirective("undef"));
        }
        let name = String::from(state.lexeme());
        if !require_newline(state) {
            return Err(PreprocessorError::InvalidDirective("undef"));
        }
        // Removing an unknown name is not an error.
        self.defines.remove(&name);
        Ok(())
    }

    fn handle_define(&mut self) -> Result<(), PreprocessorError> {
        let state = self.include_stack.last_mut().unwrap();
        if state.lex() != Token::Identifier {
            return Err(PreprocessorError::InvalidDirective("define"));
        }
        let name = String::from(state.lexeme());
        let definition = rest_of_line(state);
        let definition = String::from(&state.source[definition]);
        self.defines.add(&name, &definition)
    }

    fn handle_ifdef(&mut self, kind: ConditionalKind) -> Result<(), PreprocessorError> {
        let directive = kind.name();
        let state = self.include_stack.last_mut().unwrap();
        if state.lex() != Token::Identifier {
            return Err(PreprocessorError::InvalidDirective(directive));
        }
        let name = String::from(state.lexeme());
        if !require_newline(state) {
            return Err(PreprocessorError::InvalidDirective(directive));
        }
        let skipping = match state.conditionals.last() {
            // A skipping outer group dominates the inner predicate.
            Some(outer) if outer.skipping => true,
            _ => {
                let found = self.defines.find(&name).is_some();
                match kind {
                    ConditionalKind::Ifndef => found,
                    _ => !found,
                }
            }
        };
        let conditional = Conditional {
            kind,
            line: state.line,
            skipping,
            chosen: !skipping,
        };
        state.conditionals.push(conditional);
        Ok(())
    }

    fn handle_else(&mut self) -> Result<(), PreprocessorError> {
        let state = self.include_stack.last_mut().unwrap();
        if !require_newline(state) {
            return Err(PreprocessorError::InvalidDirective("else"));
        }
        let Some(conditional) = state.conditionals.last_mut() else {
            return Err(PreprocessorError::ElseWithoutIf);
        };
        if conditional.kind == ConditionalKind::Else {
            return Err(PreprocessorError::ElseAfterElse);
        }
        // The else arm runs only if no earlier arm did.
        conditional.kind = ConditionalKind::Else;
        conditional.skipping = conditional.chosen;
        conditional.chosen = true;
        Ok(())
    }

    fn handle_endif(&mut self) -> Result<(), PreprocessorError> {
        let state = self.include_stack.last_mut().unwrap();
        if !require_newline(state) {
            return Err(PreprocessorError::InvalidDirective("endif"));
        }
        match state.conditionals.pop() {
            Some(_) => Ok(()),
            None => Err(PreprocessorError::UnmatchedEndif),
        }
    }

    /// `#if` and `#elif` need an expression evaluator this preprocessor does
    /// not have.  The condition is discarded with the rest of the line.
    fn handle_unsupported(&mut self, name: &'static str) -> Result<(), PreprocessorError> {
        let state = self.include_stack.last_mut().unwrap();
        rest_of_line(state);
        Err(PreprocessorError::Unsupported(name))
    }
}

impl<R> Drop for Preprocessor<R>
where
    R: IncludeResolver,
{
    fn drop(&mut self) {
        // Included units must be handed back to the resolver even when the
        // caller walks away mid-stream.
        while !self.include_stack.is_empty() {
            self.pop_source();
        }
    }
}

/// Peeks at the next lexeme without consuming it and reports whether the
/// directive being parsed ends here.  An incomplete comment counts as an end
/// of line.
fn require_newline(state: &mut SourceState) -> bool {
    let (pos, token_start, line) = (state.pos, state.token_start, state.line);
    let token = state.lex();
    state.pos = pos;
    state.token_start = token_start;
    state.line = line;
    matches!(
        token,
        Token::Newline | Token::Eoi | Token::IncompleteComment
    )
}

/// Consumes the remainder of a directive line, leaving the terminator to be
/// lexed again, and returns the byte range from the first consumed token
/// through the last (empty if the line held nothing more).
fn rest_of_line(state: &mut SourceState) -> Range<usize> {
    let mut start = None;
    loop {
        let (pos, token_start, line) = (state.pos, state.token_start, state.line);
        match state.lex() {
            Token::Newline | Token::Eoi | Token::IncompleteComment => {
                state.pos = pos;
                state.token_start = token_start;
                state.line = line;
                break;
            }
            _ => {
                if start.is_none() {
                    start = Some(state.token_start);
                }
            }
        }
    }
    match start {
        Some(start) => start..state.pos,
        None => state.pos..state.pos,
    }
}

/// `atoi`: the value of the leading decimal digits, if any.
fn leading_decimal(text: &str) -> u32 {
    text.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |value, digit| {
            value
                .saturating_mul(10)
                .saturating_add(u32::from(digit - b'0'))
        })
}

/// Renders at most `FAILSTR_LEN - 1` bytes of `message`, respecting
/// character boundaries.
fn truncated(mut message: String) -> String {
    let limit = FAILSTR_LEN - 1;
    if message.len() > limit {
        let mut end = limit;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
    }
    message
}
