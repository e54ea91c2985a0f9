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

use thiserror::Error as ThisError;

use crate::preprocessor::ConditionalKind;

/// An error raised while preprocessing.
///
/// The preprocessor holds at most one pending error at a time.  A pending
/// error is delivered on the next pull from the token stream as a
/// [Token::PreprocessingError](crate::token::Token::PreprocessingError)
/// lexeme whose text is this error's rendering, truncated to the failure
/// buffer, and then tokenization continues.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PreprocessorError {
    /// Redefinition of a macro, from `#define` or a caller predefine.
    #[error("'{0}' already defined")]
    AlreadyDefined(String),

    /// A directive with malformed arguments or a missing trailing new-line.
    #[error("Invalid #{0} directive")]
    InvalidDirective(&'static str),

    /// The include resolver could not produce the requested source.
    #[error("Include callback failed")]
    IncludeCallbackFailed,

    /// A `/*` comment still open at end of input.
    #[error("Incomplete multiline comment")]
    IncompleteComment,

    /// `#endif` with no open conditional.
    #[error("Unmatched #endif")]
    UnmatchedEndif,

    /// `#else` with no open conditional.
    #[error("#else without #if")]
    ElseWithoutIf,

    /// A second `#else` for the same conditional.
    #[error("#else after #else")]
    ElseAfterElse,

    /// A conditional still open at the end of its translation unit.
    #[error("Unterminated #{0}")]
    Unterminated(ConditionalKind),

    /// A directive this preprocessor deliberately does not implement.
    #[error("#{0} directives are not supported")]
    Unsupported(&'static str),

    /// `#error`, carrying the raw message bytes from the directive line.
    #[error("#error {0}")]
    UserError(String),
}

#[cfg(test)]
mod test {
    use super::PreprocessorError;
    use crate::preprocessor::ConditionalKind;

    #[test]
    fn rendering() {
        assert_eq!(
            PreprocessorError::AlreadyDefined(String::from("FOO")).to_string(),
            "'FOO' already defined"
        );
        assert_eq!(
            PreprocessorError::InvalidDirective("include").to_string(),
            "Invalid #include directive"
        );
        assert_eq!(
            PreprocessorError::Unterminated(ConditionalKind::Ifdef).to_string(),
            "Unterminated #ifdef"
        );
        assert_eq!(
            PreprocessorError::UserError(String::from("bad thing")).to_string(),
            "#error bad thing"
        );
    }
}
