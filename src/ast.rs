//! Structs and enums that make up a JMESPath expression syntax tree.
//!
//! An [`Expression`] is exactly one grammar production. Compound productions
//! own their children, and every child was parsed from a strictly smaller
//! range of the input than its parent.

use std::fmt;

use lazy_static::lazy_static;
use serde_json::Value;

use crate::{env::Env, errors::JMESPathError, parser::Parser};

lazy_static! {
    static ref PARSER: Parser = Parser::new(Env::standard());
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    SubExpression(Box<SubExpression>),
    IndexExpression(Box<IndexExpression>),
    NotExpression(Box<NotExpression>),
    AndExpression(Box<AndExpression>),
    OrExpression(Box<OrExpression>),
    ComparatorExpression(Box<ComparatorExpression>),
    PipeExpression(Box<PipeExpression>),
    Identifier(String),
    ParenExpression(Box<ParenExpression>),
    WildcardExpression,
    MultiSelectList(MultiSelectList),
    MultiSelectHash(MultiSelectHash),
    Literal(Literal),
    FunctionExpression(FunctionExpression),
    RawString(String),
    CurrentNode,
}

impl Expression {
    /// Parse `expr` with the standard parser.
    pub fn standard(expr: &str) -> Result<Self, JMESPathError> {
        PARSER.parse(expr)
    }

    pub fn sub_expression(expression: SubExpression) -> Self {
        Expression::SubExpression(Box::new(expression))
    }

    pub fn index_expression(expression: IndexExpression) -> Self {
        Expression::IndexExpression(Box::new(expression))
    }

    pub fn not_expression(expression: NotExpression) -> Self {
        Expression::NotExpression(Box::new(expression))
    }

    pub fn and_expression(expression: AndExpression) -> Self {
        Expression::AndExpression(Box::new(expression))
    }

    pub fn or_expression(expression: OrExpression) -> Self {
        Expression::OrExpression(Box::new(expression))
    }

    pub fn comparator_expression(expression: ComparatorExpression) -> Self {
        Expression::ComparatorExpression(Box::new(expression))
    }

    pub fn pipe_expression(expression: PipeExpression) -> Self {
        Expression::PipeExpression(Box::new(expression))
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    pub fn paren_expression(expression: ParenExpression) -> Self {
        Expression::ParenExpression(Box::new(expression))
    }

    pub fn wildcard_expression(_: WildcardExpression) -> Self {
        Expression::WildcardExpression
    }

    pub fn multi_select_list(list: MultiSelectList) -> Self {
        Expression::MultiSelectList(list)
    }

    pub fn multi_select_hash(hash: MultiSelectHash) -> Self {
        Expression::MultiSelectHash(hash)
    }

    pub fn literal(literal: Literal) -> Self {
        Expression::Literal(literal)
    }

    pub fn function_expression(function: FunctionExpression) -> Self {
        Expression::FunctionExpression(function)
    }

    pub fn raw_string(value: impl Into<String>) -> Self {
        Expression::RawString(value.into())
    }

    pub fn current_node(_: CurrentNode) -> Self {
        Expression::CurrentNode
    }
}

/// `expression "." right`
#[derive(Debug, Clone, PartialEq)]
pub struct SubExpression {
    pub left: Expression,
    pub right: SubExpressionRight,
}

/// The terminal productions allowed after a `.`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubExpressionRight {
    Identifier(String),
    MultiSelectList(MultiSelectList),
    MultiSelectHash(MultiSelectHash),
    FunctionExpression(FunctionExpression),
    WildcardExpression,
}

impl SubExpressionRight {
    pub fn identifier(name: impl Into<String>) -> Self {
        SubExpressionRight::Identifier(name.into())
    }

    pub fn multi_select_list(list: MultiSelectList) -> Self {
        SubExpressionRight::MultiSelectList(list)
    }

    pub fn multi_select_hash(hash: MultiSelectHash) -> Self {
        SubExpressionRight::MultiSelectHash(hash)
    }

    pub fn function_expression(function: FunctionExpression) -> Self {
        SubExpressionRight::FunctionExpression(function)
    }

    pub fn wildcard_expression(_: WildcardExpression) -> Self {
        SubExpressionRight::WildcardExpression
    }
}

/// `expression bracket-specifier` or a bare `bracket-specifier`, in which
/// case `left` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub left: Option<Expression>,
    pub bracket: BracketSpecifier,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BracketSpecifier {
    /// `[]`
    WithoutContents,
    Number(i32),
    Wildcard,
    Slice(SliceExpression),
    /// `[?expression]`
    QuestionMark(Box<Expression>),
}

impl BracketSpecifier {
    pub fn number(n: i32) -> Self {
        BracketSpecifier::Number(n)
    }

    pub fn wildcard(_: WildcardExpression) -> Self {
        BracketSpecifier::Wildcard
    }

    pub fn slice(slice: SliceExpression) -> Self {
        BracketSpecifier::Slice(slice)
    }

    pub fn question_mark(expression: Expression) -> Self {
        BracketSpecifier::QuestionMark(Box::new(expression))
    }
}

/// `[start] ":" [stop] [ ":" [step] ]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceExpression {
    pub start: Option<i32>,
    pub stop: Option<i32>,
    pub step: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparatorExpression {
    pub left: Expression,
    pub comparator: Comparator,
    pub right: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    LessThanOrEqual,
    Equal,
    GreaterThanOrEqual,
    NotEqual,
    LessThan,
    GreaterThan,
}

impl Comparator {
    /// Search order for comparator tokens. Two character tokens come before
    /// `<` and `>` so a shorter token never claims the prefix of a longer one.
    pub const ALL: [Comparator; 6] = [
        Comparator::LessThanOrEqual,
        Comparator::Equal,
        Comparator::GreaterThanOrEqual,
        Comparator::NotEqual,
        Comparator::LessThan,
        Comparator::GreaterThan,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::LessThanOrEqual => "<=",
            Comparator::Equal => "==",
            Comparator::GreaterThanOrEqual => ">=",
            Comparator::NotEqual => "!=",
            Comparator::LessThan => "<",
            Comparator::GreaterThan => ">",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AndExpression {
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrExpression {
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipeExpression {
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotExpression {
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpression {
    pub expression: Expression,
}

/// `*`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WildcardExpression;

/// `@`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentNode;

#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelectList {
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelectHash {
    pub entries: Vec<KeyValueExpression>,
}

/// `identifier ":" expression`. Keys are not required to be unique.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueExpression {
    pub key: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    pub name: String,
    pub args: Vec<FunctionArg>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArg {
    Expression(Expression),
    /// `&expression`, evaluated lazily by the function it is passed to.
    ExpressionType(Expression),
}

impl FunctionArg {
    pub fn expression(expression: Expression) -> Self {
        FunctionArg::Expression(expression)
    }

    pub fn expression_type(expression: Expression) -> Self {
        FunctionArg::ExpressionType(expression)
    }
}

/// A JSON value from between a pair of backticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
}
