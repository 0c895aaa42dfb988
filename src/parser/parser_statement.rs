//declarations and statements,
//let bindings and assignments write into the context as soon as they are reduced

use crate::ast::*;
use crate::lexer_tokenizer::TokenKind;
use crate::parser::{parser_error::ParseFailure, parser_kernel::Parser};
use crate::semantic::{FunctionSignature, Value, semantic_eval};
use tracing::trace;

pub struct FunctionHeader {
    pub name: String,
    pub signature: FunctionSignature,
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    pub fn parse_declaration(&mut self) -> Result<Declaration, ParseFailure> {
        match self.current_kind() {
            Some(TokenKind::Fn) => self.parse_function().map(Declaration::Function),
            Some(TokenKind::Struct) => self.parse_struct().map(Declaration::Struct),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_function(&mut self) -> Result<Function, ParseFailure> {
        self.expect(TokenKind::Fn)?;
        let header = self.parse_signature()?;
        let FunctionHeader { name, signature } = header;

        // registered before the body so the function can call itself
        self.ctx.register_function(&name, signature.clone());
        for param in &signature.params {
            self.ctx.bind(&param.name, Some(Value::Opaque(param.ty.clone())));
        }

        let body = self.parse_braced(Self::parse_statement)?;
        Ok(Function {
            name,
            params: signature.params,
            return_type: signature.return_type,
            body,
            line: signature.line,
        })
    }

    /// `IDENT ( params ) return_type?`, stopping in front of the body.
    pub fn parse_signature(&mut self) -> Result<FunctionHeader, ParseFailure> {
        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let param = self.expect(TokenKind::Identifier)?;
                let ty = self.parse_type()?;
                params.push(Parameter {
                    name: param.text.to_string(),
                    ty,
                });
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let return_type = if self.check(TokenKind::Identifier) {
            Some(self.parse_type()?)
        } else {
            None
        };
        Ok(FunctionHeader {
            name: name.text.to_string(),
            signature: FunctionSignature {
                params,
                return_type,
                line: name.line,
            },
        })
    }

    fn parse_type(&mut self) -> Result<TypeName, ParseFailure> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(TypeName::from_identifier(token.text))
    }

    fn parse_struct(&mut self) -> Result<Struct, ParseFailure> {
        self.expect(TokenKind::Struct)?;
        let name = self.expect(TokenKind::Identifier)?;
        let fields = self.parse_braced(|parser| {
            if parser.check(TokenKind::Let) {
                parser.parse_let()
            } else {
                Err(parser.unexpected())
            }
        })?;
        Ok(Struct {
            name: name.text.to_string(),
            fields,
            line: name.line,
        })
    }

    pub fn parse_statement(&mut self) -> Result<Statement, ParseFailure> {
        match self.current_kind() {
            Some(TokenKind::Let) => self.parse_let().map(Statement::Let),
            Some(TokenKind::If) => self.parse_if().map(Statement::If),
            Some(TokenKind::While) => self.parse_while().map(Statement::While),
            Some(TokenKind::Return | TokenKind::Write | TokenKind::Where | TokenKind::Loop) => {
                self.parse_action().map(Statement::Action)
            }
            Some(TokenKind::Identifier) => match self.peek_kind(1) {
                Some(TokenKind::Assign) => self.parse_assignment().map(Statement::Assign),
                Some(TokenKind::LParen) => self.parse_call_statement().map(Statement::Call),
                _ => {
                    self.advance();
                    Err(self.unexpected())
                }
            },
            _ => Err(self.unexpected()),
        }
    }

    pub fn parse_let(&mut self) -> Result<LetBinding, ParseFailure> {
        let keyword = self.expect(TokenKind::Let)?;
        let mode = if self.match_token(TokenKind::Mut) {
            BindingMode::Mut
        } else if self.match_token(TokenKind::Ref) {
            BindingMode::Ref
        } else {
            BindingMode::Plain
        };
        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;

        self.ctx.bind(name.text, value.value.clone());
        Ok(LetBinding {
            mode,
            name: name.text.to_string(),
            value,
            line: keyword.line,
        })
    }

    fn parse_assignment(&mut self) -> Result<Assignment, ParseFailure> {
        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;

        self.ctx.bind(name.text, value.value.clone());
        Ok(Assignment {
            name: name.text.to_string(),
            value,
            line: name.line,
        })
    }

    fn parse_condition(&mut self, construct: &'static str) -> Result<Expr, ParseFailure> {
        let condition = self.parse_expr()?;
        if self.config.boolean_conditions {
            if let Err(error) = semantic_eval::check_condition(construct, condition.value.as_ref()) {
                self.record_semantic(condition.line, error);
            }
        }
        Ok(condition)
    }

    fn parse_if(&mut self) -> Result<IfStatement, ParseFailure> {
        self.expect(TokenKind::If)?;
        let condition = self.parse_condition("if")?;
        let then_block = self.parse_braced(Self::parse_statement)?;
        let else_clause = self.parse_else()?;
        Ok(IfStatement {
            condition,
            then_block,
            else_clause,
        })
    }

    fn parse_else(&mut self) -> Result<Option<ElseClause>, ParseFailure> {
        if !self.match_token(TokenKind::Else) {
            return Ok(None);
        }
        if self.match_token(TokenKind::If) {
            // every link of an else-if chain nests one level deeper
            self.enter()?;
            let clause = self.parse_else_if();
            self.leave();
            return clause.map(Some);
        }
        let body = self.parse_braced(Self::parse_statement)?;
        Ok(Some(ElseClause::Else(body)))
    }

    fn parse_else_if(&mut self) -> Result<ElseClause, ParseFailure> {
        let condition = self.parse_condition("if")?;
        let body = self.parse_braced(Self::parse_statement)?;
        let else_clause = self.parse_else()?.map(Box::new);
        Ok(ElseClause::ElseIf {
            condition,
            body,
            else_clause,
        })
    }

    fn parse_while(&mut self) -> Result<WhileStatement, ParseFailure> {
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_condition("while")?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_braced(Self::parse_statement)?;
        Ok(WhileStatement { condition, body })
    }

    fn parse_action(&mut self) -> Result<Action, ParseFailure> {
        let kind = match self.current_kind() {
            Some(TokenKind::Return) => ActionKind::Return,
            Some(TokenKind::Write) => ActionKind::Write,
            Some(TokenKind::Where) => ActionKind::Where,
            Some(TokenKind::Loop) => ActionKind::Loop,
            _ => return Err(self.unexpected()),
        };
        self.advance();
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        trace!(action = kind.name(), value = ?expr.value, "action");
        Ok(Action { kind, expr })
    }

    fn parse_call_statement(&mut self) -> Result<Call, ParseFailure> {
        let name = self.expect(TokenKind::Identifier)?;
        let (call, _) = self.parse_call(name)?;
        // the grammar has no `;` after a call statement, one is tolerated
        self.match_token(TokenKind::Semicolon);
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::config::ParserConfig;
    use crate::parser::{parse, parse_with_config};
    use crate::semantic::{FatalError, Value};

    fn program(source: &str) -> Program {
        let result = parse(source).expect("no fatal error");
        assert!(result.errors.is_empty(), "unexpected diagnostics: {:?}", result.messages());
        result.result.expect("program")
    }

    fn body(program: &Program, name: &str) -> Vec<Statement> {
        program.function(name).expect("function").body.clone()
    }

    #[test]
    fn function_header_shapes() {
        let program = program(
            "fn add(a int, b float, p Point) int { return a; }\n\
             fn main() { write 1; }",
        );
        let add = program.function("add").unwrap();
        assert_eq!(
            add.params,
            vec![
                Parameter { name: "a".into(), ty: TypeName::Int },
                Parameter { name: "b".into(), ty: TypeName::Float },
                Parameter { name: "p".into(), ty: TypeName::Named("Point".into()) },
            ]
        );
        assert_eq!(add.return_type, Some(TypeName::Int));
        assert_eq!(program.function("main").unwrap().return_type, None);
    }

    #[test]
    fn let_modes_are_recorded() {
        let statements = body(
            &program("fn main() { let a = 1; let mut b = 2; let ref c = 3; }"),
            "main",
        );
        let modes: Vec<BindingMode> = statements
            .iter()
            .map(|s| match s {
                Statement::Let(binding) => binding.mode,
                other => panic!("expected let, got {other:?}"),
            })
            .collect();
        assert_eq!(modes, vec![BindingMode::Plain, BindingMode::Mut, BindingMode::Ref]);
    }

    #[test]
    fn struct_fields_are_let_bindings() {
        let program = program("struct Point { let x = 0; let y = 1; } fn main() { write y; }");
        match &program.declarations[0] {
            Declaration::Struct(s) => {
                assert_eq!(s.name, "Point");
                assert_eq!(s.fields.len(), 2);
                assert_eq!(s.fields[1].value.value, Some(Value::Integer(1)));
            }
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn else_if_chains_nest() {
        let statements = body(
            &program(
                "fn main() { let x = 1;\n\
                 if x < 0 { write 0; } else if x == 1 { write 1; } else { write 2; } }",
            ),
            "main",
        );
        let Statement::If(stmt) = &statements[1] else {
            panic!("expected if");
        };
        match &stmt.else_clause {
            Some(ElseClause::ElseIf { condition, else_clause, .. }) => {
                assert_eq!(condition.value, Some(Value::Boolean(true)));
                assert!(matches!(else_clause.as_deref(), Some(ElseClause::Else(_))));
            }
            other => panic!("expected else-if, got {other:?}"),
        }
    }

    fn else_if_chain(links: usize) -> String {
        format!(
            "fn main() {{ if true {{ write 1; }}{} else {{ write 0; }} }}",
            " else if false { write 2; }".repeat(links)
        )
    }

    #[test]
    fn long_else_if_chain_within_the_limit() {
        let program = program(&else_if_chain(100));
        let Statement::If(stmt) = &body(&program, "main")[0] else {
            panic!("expected if");
        };
        let mut links = 0;
        let mut clause = stmt.else_clause.as_ref();
        while let Some(ElseClause::ElseIf { else_clause, .. }) = clause {
            links += 1;
            clause = else_clause.as_deref();
        }
        assert_eq!(links, 100);
        assert!(matches!(clause, Some(ElseClause::Else(_))));
    }

    #[test]
    fn else_if_chain_past_the_limit_is_fatal() {
        let error = parse(&else_if_chain(1000)).unwrap_err();
        assert!(matches!(error, FatalError::Internal { line: 1, .. }), "{error}");

        let config = ParserConfig {
            max_depth: 8,
            ..ParserConfig::default()
        };
        let error = parse_with_config(&else_if_chain(10), &config).unwrap_err();
        assert_eq!(error.to_string(), "Fatal parsing error at line 1: nesting exceeds 8 levels");
    }

    #[test]
    fn while_and_actions() {
        let statements = body(
            &program("fn main() { let i = 0; while (i < 3) { i = i + 1; loop i; where i; } return i; }"),
            "main",
        );
        let Statement::While(w) = &statements[1] else {
            panic!("expected while");
        };
        assert_eq!(w.body.len(), 3);
        assert!(matches!(
            &w.body[1],
            Statement::Action(Action { kind: ActionKind::Loop, .. })
        ));
        assert!(matches!(
            &statements[2],
            Statement::Action(Action { kind: ActionKind::Return, .. })
        ));
    }

    #[test]
    fn call_statements_take_an_optional_semicolon() {
        let statements = body(
            &program("fn log(v int) { write v; } fn main() { log(1) log(2); write 3; }"),
            "main",
        );
        assert_eq!(statements.len(), 3);
        assert!(matches!(&statements[0], Statement::Call(call) if call.name == "log"));
        assert!(matches!(&statements[1], Statement::Call(_)));
    }

    #[test]
    fn recursion_sees_its_own_signature() {
        let program = program("fn count(n int) int { return count(n - 1); }");
        assert_eq!(program.declarations.len(), 1);
    }

    #[test]
    fn parameters_are_bound_as_opaque_values() {
        let program = program("fn double(n int) int { let d = n * 2; return d; }");
        let Statement::Let(binding) = &body(&program, "double")[0] else {
            panic!("expected let");
        };
        assert_eq!(binding.value.value, Some(Value::Opaque(TypeName::Int)));
    }

    #[test]
    fn forward_reference_needs_the_option() {
        let source = "fn main() { helper(); } fn helper() { write 1; }";
        assert_eq!(
            parse(source).unwrap_err(),
            FatalError::UndefinedFunction { name: "helper".into(), line: 1 }
        );
        let config = ParserConfig {
            forward_references: true,
            ..ParserConfig::default()
        };
        let result = parse_with_config(source, &config).expect("no fatal error");
        assert!(result.is_ok(), "{:?}", result.messages());
    }

    #[test]
    fn syntax_error_recovers_at_next_statement() {
        let result = parse("fn main() { let = 1; write 2 + ; let z = 1 / 0; }").unwrap();
        assert!(result.result.is_none());
        assert_eq!(
            result.messages(),
            vec![
                "Error at line 1: Syntax error at '='",
                "Error at line 1: Syntax error at ';'",
                "Error at line 1: Division by zero",
            ]
        );
    }

    #[test]
    fn syntax_error_recovers_at_next_declaration() {
        let result = parse("fn 1() { write 1; } fn main() { write 0 / 0; }").unwrap();
        assert_eq!(
            result.messages(),
            vec![
                "Error at line 1: Syntax error at '1'",
                "Error at line 1: Division by zero",
            ]
        );
    }

    #[test]
    fn missing_closing_brace_reports_eof() {
        let result = parse("fn main() {\n write 1;\n").unwrap();
        assert_eq!(result.messages(), vec!["Error at line 2: Syntax error at EOF"]);
        assert_eq!(
            result.errors[0].hint.as_deref(),
            Some("Check for incomplete code or unclosed blocks.")
        );
    }

    #[test]
    fn empty_block_is_a_syntax_error() {
        let result = parse("fn main() { }").unwrap();
        assert_eq!(result.messages(), vec!["Error at line 1: Syntax error at '}'"]);
    }

    #[test]
    fn stray_identifier_statement() {
        let result = parse("fn main() { x + 1; }").unwrap();
        assert_eq!(result.messages(), vec!["Error at line 1: Syntax error at '+'"]);
        assert_eq!(
            result.errors[0].hint.as_deref(),
            Some("Check for missing operands around the operator.")
        );
    }
}
