//AST (abstract syntax tree) is what the source turns into after parsing,
//expression nodes also carry the value computed while they were parsed

use crate::semantic::Value;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Int,
    Float,
    Char,
    Boolean,
    // any other identifier names a struct
    Named(String),
}

impl TypeName {
    pub fn from_identifier(name: &str) -> Self {
        match name {
            "int" => TypeName::Int,
            "float" => TypeName::Float,
            "char" => TypeName::Char,
            "boolean" => TypeName::Boolean,
            other => TypeName::Named(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::Char => "char",
            TypeName::Boolean => "boolean",
            TypeName::Named(name) => name,
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Function(function) => Some(function),
            Declaration::Struct(_) => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions().find(|function| function.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Function(Function),
    Struct(Struct),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: Option<TypeName>,
    pub body: Vec<Statement>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: String,
    pub fields: Vec<LetBinding>,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    Plain,
    Mut,
    Ref,
}

impl BindingMode {
    pub fn name(self) -> &'static str {
        match self {
            BindingMode::Plain => "plain",
            BindingMode::Mut => "mut",
            BindingMode::Ref => "ref",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub mode: BindingMode,
    pub name: String,
    pub value: Expr,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub value: Expr,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expr,
    pub then_block: Vec<Statement>,
    pub else_clause: Option<ElseClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseClause {
    Else(Vec<Statement>),
    ElseIf {
        condition: Expr,
        body: Vec<Statement>,
        else_clause: Option<Box<ElseClause>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expr,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Return,
    Write,
    Where,
    Loop,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Return => "return",
            ActionKind::Write => "write",
            ActionKind::Where => "where",
            ActionKind::Loop => "loop",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetBinding),
    Assign(Assignment),
    If(IfStatement),
    While(WhileStatement),
    Action(Action),
    Call(Call),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, Operator::Equal | Operator::NotEqual)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Less
                | Operator::LessEqual
                | Operator::Greater
                | Operator::GreaterEqual
                | Operator::Equal
                | Operator::NotEqual
        )
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Identifier(String),
    Number(i64),
    Boolean(bool),
    Binary {
        op: Operator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Grouping(Box<Expr>),
    Call(Call),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: usize,
    /// Value computed when the node was reduced; `None` when evaluation
    /// failed or the expression has no value.
    pub value: Option<Value>,
}

impl Expr {
    pub fn new(kind: ExprKind, line: usize, value: Option<Value>) -> Self {
        Self { kind, line, value }
    }
}
