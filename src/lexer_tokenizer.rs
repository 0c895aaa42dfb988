//lexical analysis,
//breaks the source text into tokens that the parser consumes,
//the token table is generated by logos, line tracking and recovery live in `Lexer`

use logos::Logos;
use std::fmt::{self, Display, Formatter, Write as _};
use std::ops::Range;
use tracing::debug;

fn newline(lex: &mut logos::Lexer<TokenKind>) -> logos::Skip {
    lex.extras += lex.slice().len();
    logos::Skip
}

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[logos(extras = usize)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    // Keywords
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("let")]
    Let,
    #[token("loop")]
    Loop,
    #[token("fn")]
    Fn,
    #[token("mut")]
    Mut,
    #[token("pub")]
    Pub,
    #[token("ref")]
    Ref,
    #[token("in")]
    In,
    #[token("struct")]
    Struct,
    #[token("type")]
    Type,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("where")]
    Where,
    #[token("write")]
    Write,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LCurly,
    #[token("}")]
    RCurly,
    #[token("[")]
    LSquare,
    #[token("]")]
    RSquare,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("=")]
    Assign,

    // Logic and comparisons
    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Mod,

    // never produced, the callback bumps the line counter and skips
    #[regex(r"\n+", newline)]
    Newline,

    // Names
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    // Integer values, range checked by `Lexer`
    #[regex(r"[0-9]+")]
    Number,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Let => "LET",
            TokenKind::Loop => "LOOP",
            TokenKind::Fn => "FN",
            TokenKind::Mut => "MUT",
            TokenKind::Pub => "PUB",
            TokenKind::Ref => "REF",
            TokenKind::In => "IN",
            TokenKind::Struct => "STRUCT",
            TokenKind::Type => "TYPE",
            TokenKind::Return => "RETURN",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Where => "WHERE",
            TokenKind::Write => "WRITE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LCurly => "LCURLY",
            TokenKind::RCurly => "RCURLY",
            TokenKind::LSquare => "LSQR",
            TokenKind::RSquare => "RSQR",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Equal => "EQUALS",
            TokenKind::NotEqual => "NEQ",
            TokenKind::LessEqual => "LEQ",
            TokenKind::GreaterEqual => "GEQ",
            TokenKind::Less => "LT",
            TokenKind::Greater => "GT",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Mod => "MOD",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
        }
    }

    pub fn is_closing_bracket(self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RCurly | TokenKind::RSquare)
    }

    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Mod
                | TokenKind::Equal
                | TokenKind::NotEqual
                | TokenKind::LessEqual
                | TokenKind::GreaterEqual
                | TokenKind::Less
                | TokenKind::Greater
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Token with its text, line and byte position in source
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub line: usize,
    pub span: Range<usize>,
}

impl Token<'_> {
    pub fn number(&self) -> Option<i64> {
        match self.kind {
            TokenKind::Number => self.text.parse().ok(),
            _ => None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Illegal character '{character}'")]
    IllegalCharacter { line: usize, character: char },
    #[error("Integer literal '{literal}' does not fit in 64 bits")]
    NumberOutOfRange { line: usize, literal: String },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::IllegalCharacter { line, .. } | LexError::NumberOutOfRange { line, .. } => *line,
        }
    }
}

// illegal characters are recorded and skipped one at a time,
// `next_token` only returns `None` at the end of input
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, TokenKind>,
    // byte offset of `inner`'s input inside `source`
    offset: usize,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: TokenKind::lexer_with_extras(source, 1),
            offset: 0,
            errors: Vec::new(),
        }
    }

    pub fn line(&self) -> usize {
        self.inner.extras
    }

    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    pub fn next_token(&mut self) -> Option<Token<'src>> {
        loop {
            match self.inner.next()? {
                Ok(kind) => {
                    let text = self.inner.slice();
                    let line = self.inner.extras;
                    let span = self.inner.span();
                    if kind == TokenKind::Number && text.parse::<i64>().is_err() {
                        self.report(LexError::NumberOutOfRange {
                            line,
                            literal: text.to_string(),
                        });
                        continue;
                    }
                    return Some(Token {
                        kind,
                        text,
                        line,
                        span: span.start + self.offset..span.end + self.offset,
                    });
                }
                Err(()) => self.skip_illegal(),
            }
        }
    }

    // reports the first character of the failed match and resumes right after it
    fn skip_illegal(&mut self) {
        let line = self.inner.extras;
        let start = self.offset + self.inner.span().start;
        let slice = self.inner.slice();
        let Some(character) = slice.chars().next() else {
            return;
        };
        self.report(LexError::IllegalCharacter { line, character });

        let consumed = character.len_utf8();
        if slice.len() > consumed {
            let restart = start + consumed;
            self.inner = TokenKind::lexer_with_extras(&self.source[restart..], line);
            self.offset = restart;
        }
    }

    fn report(&mut self, error: LexError) {
        // callers decide how lexical errors are shown
        debug!(line = error.line(), "{error}");
        self.errors.push(error);
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

// Lexing function, returns all tokens plus the lexical errors met on the way
pub fn tokenize(source: &str) -> (Vec<Token<'_>>, Vec<LexError>) {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.by_ref().collect();
    (tokens, lexer.take_errors())
}

// token table: header, 27 dash rule, one row per token
pub fn dump_tokens(source: &str) -> (String, Vec<LexError>) {
    let (tokens, errors) = tokenize(source);
    let mut out = String::new();
    let _ = writeln!(out, "{:4} {:15} {}", "Line", "Token", "Value");
    let _ = writeln!(out, "{}", "-".repeat(27));
    for token in &tokens {
        match token.number() {
            Some(n) => {
                let _ = writeln!(out, "{:4} {:15} {}", token.line, token.kind.name(), n);
            }
            None => {
                let _ = writeln!(out, "{:4} {:15} {}", token.line, token.kind.name(), token.text);
            }
        }
    }
    (out, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("fn main iffy if write_x write"),
            vec![
                TokenKind::Fn,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::If,
                TokenKind::Identifier,
                TokenKind::Write,
            ]
        );
    }

    #[test]
    fn type_names_are_identifiers() {
        assert_eq!(
            kinds("int float char boolean"),
            vec![TokenKind::Identifier; 4]
        );
    }

    #[test]
    fn operators_use_longest_match() {
        assert_eq!(
            kinds("= == != <= < >= > + - * / %"),
            vec![
                TokenKind::Assign,
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::LessEqual,
                TokenKind::Less,
                TokenKind::GreaterEqual,
                TokenKind::Greater,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Mod,
            ]
        );
    }

    #[test]
    fn newline_runs_count_every_line() {
        let (tokens, errors) = tokenize("a\n\n\nb\r\n  c");
        assert!(errors.is_empty());
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 4, 5]);
    }

    #[test]
    fn comments_are_discarded() {
        let (tokens, _) = tokenize("let x = 1; // trailing / comment\nwrite x;");
        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens[5].kind, TokenKind::Write);
        assert_eq!(tokens[5].line, 2);
    }

    #[test]
    fn illegal_character_skips_exactly_one() {
        let (tokens, errors) = tokenize("a @b !c");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(
            errors,
            vec![
                LexError::IllegalCharacter { line: 1, character: '@' },
                LexError::IllegalCharacter { line: 1, character: '!' },
            ]
        );
    }

    #[test]
    fn illegal_multibyte_character() {
        let (tokens, errors) = tokenize("x\n\u{e9}y");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "y");
        assert_eq!(tokens[1].line, 2);
        assert_eq!(errors, vec![LexError::IllegalCharacter { line: 2, character: '\u{e9}' }]);
    }

    #[test]
    fn spans_point_into_source() {
        let source = "let $ value = 42;";
        let (tokens, _) = tokenize(source);
        for token in &tokens {
            assert_eq!(&source[token.span.clone()], token.text);
        }
    }

    #[test]
    fn oversized_number_is_reported() {
        let (tokens, errors) = tokenize("99999999999999999999 1");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].number(), Some(1));
        assert!(matches!(errors[0], LexError::NumberOutOfRange { line: 1, .. }));
    }

    #[test]
    fn token_dump_layout() {
        let (dump, errors) = dump_tokens("let x = 007;");
        assert!(errors.is_empty());
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "Line Token           Value");
        assert_eq!(lines[1], "-".repeat(27));
        assert_eq!(lines[2], "   1 LET             let");
        assert_eq!(lines[5], "   1 NUMBER          7");
        assert_eq!(lines.len(), 7);
    }
}
