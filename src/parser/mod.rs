//entry points of the fused parser/evaluator

pub mod parser_error;
pub mod parser_expression;
pub mod parser_kernel;
pub mod parser_statement;

use crate::ast::Program;
use crate::config::ParserConfig;
use crate::lexer_tokenizer::{LexError, Token, tokenize};
use crate::semantic::{Context, FatalError};
use parser_error::{ParseError, ParseResult};
use parser_kernel::Parser;

/// Parses and evaluates `source` with a fresh context and default options.
///
/// `Ok` carries the program (only when no error was collected) together with
/// every diagnostic; `Err` means the parse was aborted.
pub fn parse(source: &str) -> Result<ParseResult<Program>, FatalError> {
    parse_with_config(source, &ParserConfig::default())
}

pub fn parse_with_config(source: &str, config: &ParserConfig) -> Result<ParseResult<Program>, FatalError> {
    let mut ctx = Context::new();
    parse_with_context(source, &mut ctx, config)
}

/// Like [`parse_with_config`], but bindings and functions go into `ctx` and
/// stay there, so a later call sees what earlier ones declared.
pub fn parse_with_context(
    source: &str,
    ctx: &mut Context,
    config: &ParserConfig,
) -> Result<ParseResult<Program>, FatalError> {
    let (tokens, lex_errors) = tokenize(source);
    parse_tokens(tokens, &lex_errors, ctx, config)
}

// for callers that already ran the lexer, its errors become leading warnings
pub fn parse_tokens<'src>(
    tokens: Vec<Token<'src>>,
    lex_errors: &[LexError],
    ctx: &mut Context,
    config: &ParserConfig,
) -> Result<ParseResult<Program>, FatalError> {
    let warnings = lex_errors.iter().map(ParseError::lexical).collect();
    Parser::new(tokens, ctx, config.clone())
        .with_errors(warnings)
        .parse_program()
}
