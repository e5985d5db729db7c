//! Ordered choice over alternative productions.
//!
//! ```text
//! OrderedChoice::new("expression", span)
//!     .or_try(|s| parser.parse_pipe_expression(s), Expression::pipe_expression)
//!     .or_try(|s| parser.parse_identifier(s), Expression::identifier)
//!     .finish()
//! ```
//!
//! Alternatives are attempted in the order they are chained. The first one to
//! succeed is adapted into the common result type and every later alternative
//! is skipped without being run.

use crate::{
    errors::{reject, FailureKind, ParseFailure, Parsed},
    text::Span,
};

pub struct OrderedChoice<T> {
    production: &'static str,
    span: Span,
    outcome: Option<T>,
}

impl<T> OrderedChoice<T> {
    pub fn new(production: &'static str, span: Span) -> Self {
        OrderedChoice {
            production,
            span,
            outcome: None,
        }
    }

    /// Try `parse` against the span unless an earlier alternative matched.
    pub fn or_try<U>(
        mut self,
        parse: impl FnOnce(Span) -> Parsed<U>,
        adapt: impl FnOnce(U) -> T,
    ) -> Self {
        if self.outcome.is_none() {
            if let Ok(value) = parse(self.span) {
                self.outcome = Some(adapt(value));
            }
        }
        self
    }

    pub fn finish(self) -> Parsed<T> {
        match self.outcome {
            Some(value) => Ok(value),
            None => Err(self.rejected()),
        }
    }

    fn rejected(&self) -> ParseFailure {
        reject(
            self.production,
            FailureKind::Mismatch,
            self.span.start,
            "no alternative matched",
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn fails(span: Span) -> Parsed<u8> {
        Err(ParseFailure::mismatch(span.start))
    }

    #[test]
    fn first_success_wins() {
        let rv = OrderedChoice::new("test", Span::new(0, 1))
            .or_try(fails, |v| v as i32)
            .or_try(|_| Ok("two"), |_| 2)
            .or_try(|_| Ok(3_i64), |v| v as i32)
            .finish();
        assert_eq!(rv, Ok(2));
    }

    #[test]
    fn later_alternatives_are_not_run() {
        let calls = Cell::new(0);
        let rv = OrderedChoice::new("test", Span::new(0, 1))
            .or_try(|_| Ok(1), |v: i32| v)
            .or_try(
                |_| {
                    calls.set(calls.get() + 1);
                    Ok(2)
                },
                |v: i32| v,
            )
            .finish();
        assert_eq!(rv, Ok(1));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn all_alternatives_fail() {
        let rv = OrderedChoice::new("test", Span::new(4, 9))
            .or_try(fails, |v| v)
            .or_try(fails, |v| v)
            .finish();
        assert_eq!(rv, Err(ParseFailure::mismatch(4)));
    }
}
