//parser state, token navigation and panic-mode recovery,
//the grammar itself lives in parser_statement.rs and parser_expression.rs

use crate::ast::*;
use crate::config::ParserConfig;
use crate::lexer_tokenizer::{Token, TokenKind};
use crate::parser::parser_error::{ParseError, ParseFailure, ParseResult};
use crate::semantic::{Context, FatalError, SemanticError};
use tracing::debug;

pub struct Parser<'src, 'ctx> {
    pub tokens: Vec<Token<'src>>,
    pub pos: usize,
    pub ctx: &'ctx mut Context,
    pub config: ParserConfig,
    errors: Vec<ParseError>,
    depth: usize,
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    pub fn new(tokens: Vec<Token<'src>>, ctx: &'ctx mut Context, config: ParserConfig) -> Self {
        Self {
            tokens,
            pos: 0,
            ctx,
            config,
            errors: Vec::new(),
            depth: 0,
        }
    }

    pub fn with_errors(mut self, errors: Vec<ParseError>) -> Self {
        self.errors = errors;
        self
    }

    pub fn current(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos)
    }

    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    pub fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    pub fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub fn match_token(&mut self, expected: TokenKind) -> bool {
        if self.check(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    pub fn expect(&mut self, expected: TokenKind) -> Result<Token<'src>, ParseFailure> {
        match self.current() {
            Some(token) if token.kind == expected => {
                let token = token.clone();
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Line of the current token, or of the last one once input is exhausted.
    pub fn line(&self) -> usize {
        self.current()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    pub fn unexpected(&self) -> ParseFailure {
        ParseFailure::Syntax(ParseError::unexpected(self.current(), self.line()))
    }

    pub fn record(&mut self, error: ParseError) {
        debug!(line = error.line, "{}", error.message);
        self.errors.push(error);
    }

    pub fn record_semantic(&mut self, line: usize, error: SemanticError) {
        self.record(ParseError::semantic(line, &error));
    }

    // guards recursion through nested blocks and parentheses
    pub fn enter(&mut self) -> Result<(), ParseFailure> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(ParseFailure::Fatal(FatalError::Internal {
                line: self.line(),
                message: format!("nesting exceeds {} levels", self.config.max_depth),
            }));
        }
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // drop tokens through the next `;`, or up to the `}` closing the block
    pub fn synchronize_statement(&mut self) {
        while let Some(kind) = self.current_kind() {
            match kind {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RCurly => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // drop tokens until the next `fn` or `struct`
    pub fn synchronize_declaration(&mut self) {
        self.advance();
        while let Some(kind) = self.current_kind() {
            if matches!(kind, TokenKind::Fn | TokenKind::Struct) {
                return;
            }
            self.advance();
        }
    }

    pub fn parse_braced<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseFailure>,
    ) -> Result<Vec<T>, ParseFailure> {
        self.expect(TokenKind::LCurly)?;
        self.enter()?;
        let items = self.braced_items(&mut item);
        self.leave();
        items
    }

    fn braced_items<T>(
        &mut self,
        item: &mut impl FnMut(&mut Self) -> Result<T, ParseFailure>,
    ) -> Result<Vec<T>, ParseFailure> {
        let mut items = Vec::new();
        let mut recovered = false;
        while let Some(kind) = self.current_kind() {
            if kind == TokenKind::RCurly {
                break;
            }
            match item(self) {
                Ok(parsed) => items.push(parsed),
                Err(ParseFailure::Syntax(error)) => {
                    self.record(error);
                    self.synchronize_statement();
                    recovered = true;
                }
                Err(fatal) => return Err(fatal),
            }
        }
        if items.is_empty() && !recovered && self.check(TokenKind::RCurly) {
            // the grammar wants at least one item
            let error = ParseError::unexpected(self.current(), self.line());
            self.record(error);
        }
        self.expect(TokenKind::RCurly)?;
        Ok(items)
    }

    pub fn parse_program(mut self) -> Result<ParseResult<Program>, FatalError> {
        if self.config.forward_references {
            self.prescan_signatures();
        }
        if self.tokens.is_empty() {
            let error = ParseError::unexpected(None, 1);
            self.record(error);
        }

        let mut declarations = Vec::new();
        while self.current().is_some() {
            match self.parse_declaration() {
                Ok(declaration) => declarations.push(declaration),
                Err(ParseFailure::Syntax(error)) => {
                    self.record(error);
                    self.synchronize_declaration();
                }
                Err(ParseFailure::Fatal(fatal)) => {
                    debug!(line = fatal.line(), diagnostics = self.errors.len(), "parse aborted");
                    return Err(fatal);
                }
            }
        }

        debug!(
            declarations = declarations.len(),
            variables = self.ctx.variable_count(),
            functions = self.ctx.function_count(),
            diagnostics = self.errors.len(),
            "parse finished"
        );
        Ok(ParseResult::finish(Program { declarations }, self.errors))
    }

    // registers every top-level `fn` header without touching anything else
    fn prescan_signatures(&mut self) {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(kind) = self.current_kind() {
            match kind {
                TokenKind::LCurly => depth += 1,
                TokenKind::RCurly => depth = depth.saturating_sub(1),
                TokenKind::Fn if depth == 0 => {
                    self.advance();
                    if let Ok(header) = self.parse_signature() {
                        self.ctx.register_function(&header.name, header.signature);
                    }
                    continue;
                }
                _ => {}
            }
            self.advance();
        }
        self.pos = start;
    }
}
