//! A JMESPath expression parser, producing an evaluator agnostic abstract
//! syntax tree.
//!
//! ## Standard parsing
//!
//! To parse a JMESPath expression with the default configuration, use
//! [`Expression::standard`] or the free function [`parse`].
//!
//! ```
//! use rust_jmespath::{errors::JMESPathError, Expression};
//!
//! fn main() -> Result<(), JMESPathError> {
//!     let e = Expression::standard("foo.bar")?;
//!     println!("{:#?}", e);
//!     Ok(())
//! }
//! ```
//!
//! Debug output from the example above shows this syntax tree:
//!
//! ```text
//! SubExpression(
//!     SubExpression {
//!         left: Identifier(
//!             "foo",
//!         ),
//!         right: Identifier(
//!             "bar",
//!         ),
//!     },
//! )
//! ```
//!
//! ## Configuring a parser
//!
//! A [`Parser`] is built from an [`Env`]. Memoization of already attempted
//! ranges is on by default and can be turned off without changing results.
//!
//! ```
//! use rust_jmespath::{errors::JMESPathError, Env, Parser};
//!
//! fn main() -> Result<(), JMESPathError> {
//!     let parser = Parser::new(Env::without_memoization());
//!     let e = parser.parse("people[?age > `20`].name | sort(@)")?;
//!     println!("{:?}", e);
//!     Ok(())
//! }
//! ```
//!
//! An expression that does not reduce to exactly one production gives a
//! [`JMESPathError`] with `kind` set to [`JMESPathErrorType::SyntaxError`]
//! and a span covering the whole input.
//!
//! ```text
//! Error: JMESPathError { kind: SyntaxError, msg: "failed to parse expression", span: (0, 7) }
//! ```
//!
//! Walk a tree by implementing [`Visitor`] and calling [`Expression::accept`].
pub mod ast;
mod choice;
pub mod env;
pub mod errors;
pub mod parser;
mod text;
pub mod visitor;

pub use ast::Expression;
pub use env::Env;
pub use errors::JMESPathError;
pub use errors::JMESPathErrorType;
pub use parser::Parser;
pub use visitor::Visitor;

/// Parse `expr` with the standard parser.
pub fn parse(expr: &str) -> Result<Expression, JMESPathError> {
    Expression::standard(expr)
}
