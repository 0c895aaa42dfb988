//Quartz front-end: tokenizer, fused parser/evaluator and diagnostics

pub mod ast;
pub mod ast_dump;
pub mod config;
pub mod lexer_tokenizer;
pub mod parser;
pub mod semantic;

pub use ast::Program;
pub use ast_dump::dump_tree;
pub use config::ParserConfig;
pub use lexer_tokenizer::{LexError, Lexer, Token, TokenKind, dump_tokens, tokenize};
pub use parser::parser_error::{ErrorKind, ParseError, ParseResult, Severity};
pub use parser::{parse, parse_tokens, parse_with_config, parse_with_context};
pub use semantic::{Context, FatalError, SemanticError, Value};
