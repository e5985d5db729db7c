//! Visiting a parsed [`Expression`].
//!
//! Implement [`Visitor`] and call [`Expression::accept`] to dispatch on the
//! kind of node. The visitor decides whether, and in which order, to descend
//! into child expressions.

use crate::ast::{
    AndExpression, ComparatorExpression, Expression, FunctionExpression, IndexExpression,
    Literal, MultiSelectHash, MultiSelectList, NotExpression, OrExpression, ParenExpression,
    PipeExpression, SubExpression,
};

pub trait Visitor {
    type Output;

    fn visit_sub_expression(&mut self, expression: &SubExpression) -> Self::Output;
    fn visit_index_expression(&mut self, expression: &IndexExpression) -> Self::Output;
    fn visit_not_expression(&mut self, expression: &NotExpression) -> Self::Output;
    fn visit_and_expression(&mut self, expression: &AndExpression) -> Self::Output;
    fn visit_or_expression(&mut self, expression: &OrExpression) -> Self::Output;
    fn visit_comparator_expression(&mut self, expression: &ComparatorExpression)
        -> Self::Output;
    fn visit_pipe_expression(&mut self, expression: &PipeExpression) -> Self::Output;
    fn visit_identifier(&mut self, name: &str) -> Self::Output;
    fn visit_paren_expression(&mut self, expression: &ParenExpression) -> Self::Output;
    fn visit_wildcard_expression(&mut self) -> Self::Output;
    fn visit_multi_select_list(&mut self, list: &MultiSelectList) -> Self::Output;
    fn visit_multi_select_hash(&mut self, hash: &MultiSelectHash) -> Self::Output;
    fn visit_literal(&mut self, literal: &Literal) -> Self::Output;
    fn visit_function_expression(&mut self, function: &FunctionExpression) -> Self::Output;
    fn visit_raw_string(&mut self, value: &str) -> Self::Output;
    fn visit_current_node(&mut self) -> Self::Output;
}

impl Expression {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expression::SubExpression(e) => visitor.visit_sub_expression(e),
            Expression::IndexExpression(e) => visitor.visit_index_expression(e),
            Expression::NotExpression(e) => visitor.visit_not_expression(e),
            Expression::AndExpression(e) => visitor.visit_and_expression(e),
            Expression::OrExpression(e) => visitor.visit_or_expression(e),
            Expression::ComparatorExpression(e) => visitor.visit_comparator_expression(e),
            Expression::PipeExpression(e) => visitor.visit_pipe_expression(e),
            Expression::Identifier(name) => visitor.visit_identifier(name),
            Expression::ParenExpression(e) => visitor.visit_paren_expression(e),
            Expression::WildcardExpression => visitor.visit_wildcard_expression(),
            Expression::MultiSelectList(list) => visitor.visit_multi_select_list(list),
            Expression::MultiSelectHash(hash) => visitor.visit_multi_select_hash(hash),
            Expression::Literal(literal) => visitor.visit_literal(literal),
            Expression::FunctionExpression(function) => visitor.visit_function_expression(function),
            Expression::RawString(value) => visitor.visit_raw_string(value),
            Expression::CurrentNode => visitor.visit_current_node(),
        }
    }
}
