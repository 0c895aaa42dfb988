//diagnostics collected during a parse,
//each one is rendered as `Error at line <n>: <message>` and printed by main.rs

use crate::lexer_tokenizer::{LexError, Token, TokenKind};
use crate::semantic::{FatalError, SemanticError};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub hint: Option<String>,
    pub severity: Severity,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: String, line: usize, hint: Option<String>, severity: Severity) -> Self {
        ParseError {
            kind,
            message,
            line,
            hint,
            severity,
        }
    }

    pub fn semantic(line: usize, error: &SemanticError) -> Self {
        ParseError::new(ErrorKind::Semantic, error.to_string(), line, None, Severity::Error)
    }

    // the source keeps going after an illegal character, so these only warn
    pub fn lexical(error: &LexError) -> Self {
        ParseError::new(
            ErrorKind::Lexical,
            error.to_string(),
            error.line(),
            None,
            Severity::Warning,
        )
    }

    /// Syntax error at `found`, or at the end of input when it is `None`.
    pub fn unexpected(found: Option<&Token<'_>>, eof_line: usize) -> Self {
        match found {
            Some(token) => ParseError::new(
                ErrorKind::Syntax,
                format!("Syntax error at '{}'", token.text),
                token.line,
                Some(hint_for(token.kind).to_string()),
                Severity::Error,
            ),
            None => ParseError::new(
                ErrorKind::Syntax,
                "Syntax error at EOF".to_string(),
                eof_line,
                Some("Check for incomplete code or unclosed blocks.".to_string()),
                Severity::Error,
            ),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

fn hint_for(kind: TokenKind) -> &'static str {
    if kind.is_closing_bracket() {
        "Check for a missing operand or mismatched parentheses/braces."
    } else if kind.is_operator() {
        "Check for missing operands around the operator."
    } else if kind == TokenKind::Identifier {
        "Verify variable or function declarations."
    } else {
        "Check syntax around this token."
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "Error at line {}: {}", self.line, self.message),
            Severity::Warning => write!(f, "Warning at line {}: {}", self.line, self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseFailure {
    // recovered from by the enclosing block or declaration loop
    Syntax(ParseError),
    Fatal(FatalError),
}

impl From<FatalError> for ParseFailure {
    fn from(error: FatalError) -> Self {
        ParseFailure::Fatal(error)
    }
}

impl From<ParseError> for ParseFailure {
    fn from(error: ParseError) -> Self {
        ParseFailure::Syntax(error)
    }
}

#[derive(Debug, Clone)]
pub struct ParseResult<T> {
    pub result: Option<T>,
    pub errors: Vec<ParseError>,
}

impl<T> ParseResult<T> {
    /// Keeps `result` only when no error-severity diagnostic was collected.
    pub fn finish(result: T, errors: Vec<ParseError>) -> Self {
        let result = if errors.iter().any(ParseError::is_error) {
            None
        } else {
            Some(result)
        };
        ParseResult { result, errors }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .filter(|e| e.is_error())
            .map(ToString::to_string)
            .collect()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter().filter(|e| !e.is_error())
    }
}
