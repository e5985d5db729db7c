/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Env {
    /// Remember the outcome of every `(start, end)` expression parse for the
    /// duration of a single call to [`Parser::parse`](crate::Parser::parse).
    /// Results are the same either way, only the amount of re-parsing changes.
    ///
    /// Without memoization the cost can grow exponentially with nesting. Each
    /// bracket in a chain like `a[0][1][2]` roughly doubles the work, because
    /// every candidate split re-parses the same left-hand ranges.
    pub memoize: bool,
}

impl Env {
    pub fn standard() -> Self {
        Env { memoize: true }
    }

    pub fn without_memoization() -> Self {
        Env { memoize: false }
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::standard()
    }
}
