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

//! Flattening the token stream back into text.
//!
//! [preprocess] pulls a whole [Preprocessor] stream and reformats it into a
//! single buffer.  The input's token spacing is not preserved: raw new-line
//! tokens are dropped, and new-lines and indentation are re-inserted around
//! braces and semicolons so the result stays readable as a stream of tokens.
//! Errors met along the way come back as [Diagnostic]s in arrival order
//! rather than as text in the buffer.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::Arc,
};

use crate::{
    include::{FileResolver, IncludeResolver},
    preprocessor::Preprocessor,
    token::Token,
};

#[cfg(windows)]
const ENDLINE: &str = "\r\n";
#[cfg(not(windows))]
const ENDLINE: &str = "\n";

const INDENT: &str = "    ";

const CHUNK_LEN: usize = 64 * 1024;

/// An append-only byte buffer built from fixed-size chunks, so that growing
/// output never recopies what has already been written.
pub struct Buffer {
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            total_bytes: 0,
        }
    }

    /// Total bytes appended so far.
    pub fn len(&self) -> usize {
        self.total_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.total_bytes == 0
    }

    pub fn push_str(&mut self, data: &str) {
        let mut data = data.as_bytes();
        self.total_bytes += data.len();
        while !data.is_empty() {
            match self.chunks.last_mut().filter(|tail| tail.len() < CHUNK_LEN) {
                Some(tail) => {
                    let take = data.len().min(CHUNK_LEN - tail.len());
                    let (head, rest) = data.split_at(take);
                    tail.extend_from_slice(head);
                    data = rest;
                }
                None => self.chunks.push(Vec::with_capacity(CHUNK_LEN)),
            }
        }
    }

    /// Appends indentation for a token: `levels` indent units at the start of
    /// a line, a single separating space anywhere else.
    fn indent(&mut self, levels: usize, fresh_line: bool) {
        if fresh_line {
            for _ in 0..levels {
                self.push_str(INDENT);
            }
        } else {
            self.push_str(" ");
        }
    }

    /// Concatenates the chunks into one contiguous string of exactly
    /// [len](Buffer::len) bytes.
    pub fn flatten(&self) -> String {
        let mut output = Vec::with_capacity(self.total_bytes + 1);
        for chunk in &self.chunks {
            output.extend_from_slice(chunk);
        }
        debug_assert_eq!(output.len(), self.total_bytes);
        // Chunks only ever split UTF-8 strings byte-wise, and flattening
        // reassembles every byte in order.
        String::from_utf8(output).unwrap()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

/// One collected preprocessing error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The error message.
    pub text: String,

    /// File being scanned when the error surfaced, if known.
    pub file_name: Option<Arc<str>>,

    /// 1-based line number in that file.
    pub line: u32,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.file_name {
            Some(file_name) => write!(f, "{}:{}: {}", file_name, self.line, self.text),
            None => write!(f, "{}: {}", self.line, self.text),
        }
    }
}

/// The result of [preprocess]: reformatted source plus every error met while
/// producing it, in the order the errors surfaced.
#[derive(Debug)]
pub struct PreprocessOutput {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Preprocesses `source`, resolving includes through a default
/// [FileResolver].
pub fn preprocess(
    filename: Option<&str>,
    source: impl Into<String>,
    predefines: &[(&str, &str)],
) -> PreprocessOutput {
    preprocess_with(filename, source, predefines, FileResolver::new())
}

/// Like [preprocess] with a caller-supplied include resolver.
pub fn preprocess_with<R>(
    filename: Option<&str>,
    source: impl Into<String>,
    predefines: &[(&str, &str)],
    resolver: R,
) -> PreprocessOutput
where
    R: IncludeResolver,
{
    let mut preprocessor =
        match Preprocessor::with_resolver(filename, source, predefines, resolver) {
            Ok(preprocessor) => preprocessor,
            Err(error) => {
                return PreprocessOutput {
                    output: String::new(),
                    diagnostics: vec![Diagnostic {
                        text: error.to_string(),
                        file_name: filename.map(Arc::from),
                        line: 0,
                    }],
                }
            }
        };

    let mut buffer = Buffer::new();
    let mut diagnostics = Vec::new();
    let mut fresh_line = true;
    let mut indent = 0usize;

    while let Some((text, token)) = preprocessor.next_token() {
        let mut starts_line = false;
        match token {
            // Raw new-lines vanish; whether we are at the start of a line
            // carries over from the last printing token.
            Token::Newline => starts_line = fresh_line,
            Token::Char(b'}') | Token::Char(b';') => {
                if token == Token::Char(b'}') && indent > 0 {
                    indent -= 1;
                }
                buffer.indent(indent, fresh_line);
                buffer.push_str(text);
                buffer.push_str(ENDLINE);
                starts_line = true;
            }
            Token::Char(b'{') => {
                buffer.push_str(ENDLINE);
                buffer.indent(indent, true);
                buffer.push_str("{");
                buffer.push_str(ENDLINE);
                indent += 1;
                starts_line = true;
            }
            Token::PreprocessingError => {
                let text = String::from(text);
                let (file_name, line) = preprocessor.source_position();
                diagnostics.push(Diagnostic {
                    text,
                    file_name,
                    line,
                });
            }
            _ => {
                buffer.indent(indent, fresh_line);
                buffer.push_str(text);
            }
        }
        fresh_line = starts_line;
    }

    PreprocessOutput {
        output: buffer.flatten(),
        diagnostics,
    }
}
