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

use crate::token::Token;

use super::SourceState;

fn scan(input: &str) -> (Vec<(Token, String)>, SourceState) {
    let mut state = SourceState::new(None, String::from(input));
    let mut lexemes = Vec::new();
    loop {
        let token = state.lex();
        if token == Token::Eoi {
            break;
        }
        lexemes.push((token, String::from(state.lexeme())));
    }
    (lexemes, state)
}

#[track_caller]
fn check_scan(input: &str, expected: &[(Token, &str)]) {
    let (lexemes, state) = scan(input);
    let lexemes = lexemes
        .iter()
        .map(|(token, text)| (*token, text.as_str()))
        .collect::<Vec<_>>();

    if lexemes != expected {
        eprintln!("lexemes for {input:?} differ from expected:");
        for result in diff::slice(expected, &lexemes) {
            match result {
                diff::Result::Left(left) => eprintln!("-{left:?}"),
                diff::Result::Both(left, _right) => eprintln!(" {left:?}"),
                diff::Result::Right(right) => eprintln!("+{right:?}"),
            }
        }
        panic!();
    }

    // Totality: every byte is consumed, and `Eoi` repeats.
    assert_eq!(state.bytes_left(), 0);
    let mut state = state;
    assert_eq!(state.lex(), Token::Eoi);
    assert_eq!(state.lex(), Token::Eoi);
    assert_eq!(state.lexeme(), "");
}

#[test]
fn identifiers() {
    check_scan(
        "a abc _x x9 _9 Mixed_Case_10",
        &[
            (Token::Identifier, "a"),
            (Token::Identifier, "abc"),
            (Token::Identifier, "_x"),
            (Token::Identifier, "x9"),
            (Token::Identifier, "_9"),
            (Token::Identifier, "Mixed_Case_10"),
        ],
    );
}

#[test]
fn integer_literals() {
    check_scan(
        "0 123 010 0x1f 0XABCu 42u 42UL 9ll",
        &[
            (Token::IntLiteral, "0"),
            (Token::IntLiteral, "123"),
            (Token::IntLiteral, "010"),
            (Token::IntLiteral, "0x1f"),
            (Token::IntLiteral, "0XABCu"),
            (Token::IntLiteral, "42u"),
            (Token::IntLiteral, "42UL"),
            (Token::IntLiteral, "9ll"),
        ],
    );

    // `0x` without hex digits is not a hex literal.
    check_scan(
        "0x",
        &[(Token::IntLiteral, "0"), (Token::Identifier, "x")],
    );
}

#[test]
fn float_literals() {
    check_scan(
        "1.0 1. .5 1.5f 2e10 2E-3 6.02e+23f 1.e9",
        &[
            (Token::FloatLiteral, "1.0"),
            (Token::FloatLiteral, "1."),
            (Token::FloatLiteral, ".5"),
            (Token::FloatLiteral, "1.5f"),
            (Token::FloatLiteral, "2e10"),
            (Token::FloatLiteral, "2E-3"),
            (Token::FloatLiteral, "6.02e+23f"),
            (Token::FloatLiteral, "1.e9"),
        ],
    );

    // A dangling exponent marker belongs to the next token.
    check_scan(
        "1e 2e+",
        &[
            (Token::IntLiteral, "1"),
            (Token::Identifier, "e"),
            (Token::IntLiteral, "2"),
            (Token::Identifier, "e"),
            (Token::Char(b'+'), "+"),
        ],
    );
}

#[test]
fn string_literals() {
    check_scan(r#""hello""#, &[(Token::StringLiteral, r#""hello""#)]);
    check_scan(
        r#""a \"quoted\" word""#,
        &[(Token::StringLiteral, r#""a \"quoted\" word""#)],
    );
    check_scan(r#""""#, &[(Token::StringLiteral, r#""""#)]);
}

#[test]
fn unterminated_string() {
    check_scan(
        "\"oops\nnext",
        &[
            (Token::BadChars, "\"oops"),
            (Token::Newline, "\n"),
            (Token::Identifier, "next"),
        ],
    );
    check_scan("\"eof", &[(Token::BadChars, "\"eof")]);
    check_scan("\"trailing\\", &[(Token::BadChars, "\"trailing\\")]);
}

#[test]
fn operators() {
    check_scan(
        "+= -= *= /= %= ^= &= |= ++ -- >> << && || <= >= == != ##",
        &[
            (Token::AddAssign, "+="),
            (Token::SubAssign, "-="),
            (Token::MultAssign, "*="),
            (Token::DivAssign, "/="),
            (Token::ModAssign, "%="),
            (Token::XorAssign, "^="),
            (Token::AndAssign, "&="),
            (Token::OrAssign, "|="),
            (Token::Increment, "++"),
            (Token::Decrement, "--"),
            (Token::RShift, ">>"),
            (Token::LShift, "<<"),
            (Token::AndAnd, "&&"),
            (Token::OrOr, "||"),
            (Token::Leq, "<="),
            (Token::Geq, ">="),
            (Token::Eql, "=="),
            (Token::Neq, "!="),
            (Token::HashHash, "##"),
        ],
    );
}

#[test]
fn maximal_munch_stops_at_listed_operators() {
    // `<<=` is not an operator here: it scans as `<<` then `=`.
    check_scan(
        "a <<= b",
        &[
            (Token::Identifier, "a"),
            (Token::LShift, "<<"),
            (Token::Char(b'='), "="),
            (Token::Identifier, "b"),
        ],
    );
    check_scan(
        "x+++y",
        &[
            (Token::Identifier, "x"),
            (Token::Increment, "++"),
            (Token::Char(b'+'), "+"),
            (Token::Identifier, "y"),
        ],
    );
}

#[test]
fn single_chars() {
    let punctuation = "()[]{},;:?~.<>=!+-*/%^&|";
    let expected = punctuation
        .split("")
        .filter(|s| !s.is_empty())
        .map(|s| (Token::Char(s.as_bytes()[0]), s))
        .collect::<Vec<_>>();
    let spaced = punctuation
        .chars()
        .flat_map(|c| [c, ' '])
        .collect::<String>();
    check_scan(&spaced, &expected);
}

#[test]
fn comments() {
    check_scan(
        "a // comment\nb",
        &[
            (Token::Identifier, "a"),
            (Token::Newline, "\n"),
            (Token::Identifier, "b"),
        ],
    );
    check_scan(
        "a /* one\ntwo */ b",
        &[(Token::Identifier, "a"), (Token::Identifier, "b")],
    );
    check_scan("// eof comment", &[]);
    check_scan("a /* unfinished", &[
        (Token::Identifier, "a"),
        (Token::IncompleteComment, "/* unfinished"),
    ]);
    // `/*/` does not close itself.
    check_scan("/*/", &[(Token::IncompleteComment, "/*/")]);
    check_scan("/**/", &[]);
}

#[test]
fn line_counting() {
    let mut state = SourceState::new(None, String::from("a\nb /* x\ny */\nc \"s\n"));
    assert_eq!(state.lex(), Token::Identifier);
    assert_eq!(state.line(), 1);
    assert_eq!(state.lex(), Token::Newline);
    assert_eq!(state.line(), 2);
    assert_eq!(state.lex(), Token::Identifier); // b
    assert_eq!(state.lex(), Token::Newline); // comment spans a line first
    assert_eq!(state.line(), 4);
    assert_eq!(state.lex(), Token::Identifier); // c
    assert_eq!(state.lex(), Token::BadChars); // unterminated string stops at '\n'
    assert_eq!(state.line(), 4);
    assert_eq!(state.lex(), Token::Newline);
    assert_eq!(state.line(), 5);
    assert_eq!(state.lex(), Token::Eoi);
}

#[test]
fn directives() {
    for (name, token) in [
        ("include", Token::PpInclude),
        ("line", Token::PpLine),
        ("define", Token::PpDefine),
        ("undef", Token::PpUndef),
        ("if", Token::PpIf),
        ("ifdef", Token::PpIfdef),
        ("ifndef", Token::PpIfndef),
        ("else", Token::PpElse),
        ("elif", Token::PpElif),
        ("endif", Token::PpEndif),
        ("error", Token::PpError),
    ] {
        let input = format!("#{name}");
        check_scan(&input, &[(token, input.as_str())]);
    }
}

#[test]
fn directive_recognition() {
    // Blanks may separate the `#` from the keyword, and the lexeme keeps
    // them.
    check_scan("#  define", &[(Token::PpDefine, "#  define")]);
    check_scan("  #endif", &[(Token::PpEndif, "#endif")]);
    check_scan("#pragma", &[(Token::Unknown, "#pragma")]);

    // Only a line-leading `#` starts a directive.
    check_scan(
        "a #define",
        &[
            (Token::Identifier, "a"),
            (Token::Char(b'#'), "#"),
            (Token::Identifier, "define"),
        ],
    );
    check_scan(
        "x\n#undef",
        &[
            (Token::Identifier, "x"),
            (Token::Newline, "\n"),
            (Token::PpUndef, "#undef"),
        ],
    );

    // A `#` with no name is plain punctuation, even at line start.
    check_scan("#\n", &[(Token::Char(b'#'), "#"), (Token::Newline, "\n")]);
    check_scan("## x", &[(Token::HashHash, "##"), (Token::Identifier, "x")]);
}

#[test]
fn bad_chars() {
    check_scan("@", &[(Token::Char(b'@'), "@")]);
    check_scan("\x01", &[(Token::BadChars, "\x01")]);
    check_scan(
        "a\u{e9}b",
        &[
            (Token::Identifier, "a"),
            (Token::BadChars, "\u{e9}"),
            (Token::Identifier, "b"),
        ],
    );
}

#[test]
fn crlf_newlines() {
    check_scan(
        "a\r\nb\r\n",
        &[
            (Token::Identifier, "a"),
            (Token::Newline, "\n"),
            (Token::Identifier, "b"),
            (Token::Newline, "\n"),
        ],
    );
}

#[test]
fn system_include_scan() {
    let mut state = SourceState::new(None, String::from("<sys/thing.h> tail"));
    assert_eq!(state.lex(), Token::Char(b'<'));
    assert!(state.scan_system_include());
    assert_eq!(state.lexeme(), "<sys/thing.h>");
    assert_eq!(state.lex(), Token::Identifier);
    assert_eq!(state.lexeme(), "tail");

    let mut state = SourceState::new(None, String::from("<unclosed\n"));
    assert_eq!(state.lex(), Token::Char(b'<'));
    assert!(!state.scan_system_include());
}
