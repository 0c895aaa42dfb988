//human readable dump of the AST,
//every node prints `<tag>:` and its children four spaces deeper,
//lists are flattened at the level of their container's children

use crate::ast::*;
use std::fmt::Write as _;

const INDENT: &str = "    ";

pub fn dump_tree(program: &Program) -> String {
    let mut writer = TreeWriter::default();
    writer.node(0, "program");
    for declaration in &program.declarations {
        writer.declaration(1, declaration);
    }
    writer.out
}

#[derive(Default)]
struct TreeWriter {
    out: String,
}

impl TreeWriter {
    fn node(&mut self, depth: usize, tag: &str) {
        let _ = writeln!(self.out, "{}{}:", INDENT.repeat(depth), tag);
    }

    fn leaf(&mut self, depth: usize, text: impl std::fmt::Display) {
        let _ = writeln!(self.out, "{}{}", INDENT.repeat(depth), text);
    }

    fn declaration(&mut self, depth: usize, declaration: &Declaration) {
        match declaration {
            Declaration::Function(function) => {
                self.node(depth, "function");
                self.leaf(depth + 1, &function.name);
                for param in &function.params {
                    self.node(depth + 1, "param");
                    self.leaf(depth + 2, &param.name);
                    self.leaf(depth + 2, &param.ty);
                }
                match &function.return_type {
                    Some(ty) => self.leaf(depth + 1, ty),
                    None => self.leaf(depth + 1, "none"),
                }
                self.statements(depth + 1, &function.body);
            }
            Declaration::Struct(s) => {
                self.node(depth, "struct");
                self.leaf(depth + 1, &s.name);
                for field in &s.fields {
                    self.let_binding(depth + 1, field);
                }
            }
        }
    }

    fn statements(&mut self, depth: usize, statements: &[Statement]) {
        for statement in statements {
            self.statement(depth, statement);
        }
    }

    fn let_binding(&mut self, depth: usize, binding: &LetBinding) {
        self.node(depth, "let");
        self.leaf(depth + 1, binding.mode.name());
        self.leaf(depth + 1, &binding.name);
        self.expr(depth + 1, &binding.value);
    }

    fn statement(&mut self, depth: usize, statement: &Statement) {
        match statement {
            Statement::Let(binding) => self.let_binding(depth, binding),
            Statement::Assign(assignment) => {
                self.node(depth, "assign");
                self.leaf(depth + 1, &assignment.name);
                self.expr(depth + 1, &assignment.value);
            }
            Statement::If(stmt) => {
                self.node(depth, "if");
                self.expr(depth + 1, &stmt.condition);
                self.statements(depth + 1, &stmt.then_block);
                if let Some(clause) = &stmt.else_clause {
                    self.else_clause(depth + 1, clause);
                }
            }
            Statement::While(stmt) => {
                self.node(depth, "while");
                self.expr(depth + 1, &stmt.condition);
                self.statements(depth + 1, &stmt.body);
            }
            Statement::Action(action) => {
                self.node(depth, action.kind.name());
                self.expr(depth + 1, &action.expr);
            }
            Statement::Call(call) => self.call(depth, call),
        }
    }

    fn else_clause(&mut self, depth: usize, clause: &ElseClause) {
        match clause {
            ElseClause::Else(body) => {
                self.node(depth, "else");
                self.statements(depth + 1, body);
            }
            ElseClause::ElseIf {
                condition,
                body,
                else_clause,
            } => {
                self.node(depth, "else_if");
                self.expr(depth + 1, condition);
                self.statements(depth + 1, body);
                if let Some(clause) = else_clause {
                    self.else_clause(depth + 1, clause);
                }
            }
        }
    }

    fn call(&mut self, depth: usize, call: &Call) {
        self.node(depth, "call");
        self.leaf(depth + 1, &call.name);
        for arg in &call.args {
            self.expr(depth + 1, arg);
        }
    }

    fn expr(&mut self, depth: usize, expr: &Expr) {
        match &expr.kind {
            ExprKind::Number(n) => {
                self.node(depth, "number");
                self.leaf(depth + 1, n);
                return;
            }
            ExprKind::Boolean(b) => {
                self.node(depth, "boolean");
                self.leaf(depth + 1, b);
                return;
            }
            ExprKind::Identifier(name) => {
                self.node(depth, "identifier");
                self.leaf(depth + 1, name);
            }
            ExprKind::Binary { op, left, right } => {
                self.node(depth, "binary");
                self.leaf(depth + 1, op);
                self.expr(depth + 1, left);
                self.expr(depth + 1, right);
            }
            ExprKind::Grouping(inner) => {
                self.node(depth, "grouping");
                self.expr(depth + 1, inner);
            }
            ExprKind::Call(call) => self.call(depth, call),
        }
        if let Some(value) = &expr.value {
            self.leaf(depth + 1, format_args!("=> {value}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn dump_layout() {
        let result = parse("fn main() { let x = 3 + 4; write x; }").unwrap();
        let dump = dump_tree(&result.result.unwrap());
        let expected = "\
program:
    function:
        main
        none
        let:
            plain
            x
            binary:
                +
                number:
                    3
                number:
                    4
                => 7
        write:
            identifier:
                x
                => 7
";
        assert_eq!(dump, expected);
    }

    #[test]
    fn params_struct_and_else() {
        let source = "struct P { let a = 1; }\n\
                      fn f(n int) boolean { if n > 0 { return true; } else { return false; } }";
        let dump = dump_tree(&parse(source).unwrap().result.unwrap());
        assert!(dump.contains("    struct:\n        P\n        let:\n"));
        assert!(dump.contains("        param:\n            n\n            int\n        boolean\n"));
        assert!(dump.contains("            else:\n                return:\n"));
    }
}
