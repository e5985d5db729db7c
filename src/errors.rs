use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JMESPathErrorType {
    SyntaxError,
}

/// The error returned when an expression can not be parsed.
///
/// Only the final outcome of a parse is reported. Rejected alternatives are
/// logged at `debug`/`trace` level and then discarded.
#[derive(Debug)]
pub struct JMESPathError {
    pub kind: JMESPathErrorType,
    pub msg: String,
    pub span: (usize, usize),
}

impl JMESPathError {
    pub fn new(error: JMESPathErrorType, msg: String, span: (usize, usize)) -> Self {
        Self {
            kind: error,
            msg,
            span,
        }
    }

    pub fn syntax(msg: String, span: (usize, usize)) -> Self {
        Self {
            kind: JMESPathErrorType::SyntaxError,
            msg,
            span,
        }
    }
}

impl fmt::Display for JMESPathErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JMESPathErrorType::SyntaxError => f.write_str("syntax error:"),
        }
    }
}

impl std::error::Error for JMESPathError {}

impl fmt::Display for JMESPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}..{})",
            self.kind, self.msg, self.span.0, self.span.1
        )
    }
}

/// Why a production rejected a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The span does not have the shape of this production.
    Mismatch,
    InvalidEscape,
    InvalidJson,
    InvalidNumber,
    UnescapedDelimiter,
    UnexpectedCharacter,
    /// A required separator is absent, such as the `:` of a slice.
    MissingDelimiter,
    NoValidEntry,
    AmbiguousSeparation,
}

impl FailureKind {
    /// Fatal failures matched a production's delimiters but found invalid
    /// content. They still only reject the production, not the whole parse.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FailureKind::Mismatch)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Mismatch => f.write_str("no match"),
            FailureKind::InvalidEscape => f.write_str("invalid escape sequence"),
            FailureKind::InvalidJson => f.write_str("invalid JSON"),
            FailureKind::InvalidNumber => f.write_str("invalid number"),
            FailureKind::UnescapedDelimiter => f.write_str("unescaped delimiter"),
            FailureKind::UnexpectedCharacter => f.write_str("unexpected character"),
            FailureKind::MissingDelimiter => f.write_str("missing delimiter"),
            FailureKind::NoValidEntry => f.write_str("no valid first entry"),
            FailureKind::AmbiguousSeparation => f.write_str("ambiguous separation"),
        }
    }
}

/// A rejected production. Cheap to create and freely discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFailure {
    pub kind: FailureKind,
    pub position: usize,
}

impl ParseFailure {
    pub fn mismatch(position: usize) -> Self {
        Self {
            kind: FailureKind::Mismatch,
            position,
        }
    }
}

pub type Parsed<T> = Result<T, ParseFailure>;

/// Log a rejection of `production` and return it as a failure value.
pub(crate) fn reject(
    production: &str,
    kind: FailureKind,
    position: usize,
    message: impl fmt::Display,
) -> ParseFailure {
    if kind.is_fatal() {
        log::debug!("{} at {}: {} ({})", production, position, message, kind);
    } else {
        log::trace!("{} at {}: {}", production, position, message);
    }
    ParseFailure { kind, position }
}
