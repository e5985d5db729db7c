use std::{cell::RefCell, collections::HashMap};

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::{
    ast::{
        AndExpression, BracketSpecifier, Comparator, ComparatorExpression, CurrentNode,
        Expression, FunctionArg, FunctionExpression, IndexExpression, KeyValueExpression, Literal,
        MultiSelectHash, MultiSelectList, NotExpression, OrExpression, ParenExpression,
        PipeExpression, SliceExpression, SubExpression, SubExpressionRight, WildcardExpression,
    },
    choice::OrderedChoice,
    env::Env,
    errors::{reject, FailureKind, JMESPathError, Parsed},
    text::{Span, Text},
};

use FailureKind::*;

lazy_static! {
    static ref UNQUOTED_STRING: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref NUMBER: Regex = Regex::new(r"^-?[0-9]+$").unwrap();
}

/// A reusable JMESPath parser.
///
/// Parsing borrows nothing from the parser beyond its [`Env`], so one parser
/// can be shared between threads.
pub struct Parser {
    env: Env,
}

impl Parser {
    pub fn new(env: Env) -> Self {
        Parser { env }
    }

    pub fn standard() -> Self {
        Parser::new(Env::standard())
    }

    /// Parse a complete expression. The whole of `expr`, less surrounding
    /// spaces, must reduce to a single expression.
    pub fn parse(&self, expr: &str) -> Result<Expression, JMESPathError> {
        let span = (0, expr.len());

        if expr.trim_matches(' ').is_empty() {
            return Err(JMESPathError::syntax(String::from("empty expression"), span));
        }

        let parser = RangeParser::new(expr, &self.env);
        parser.parse_expression(parser.text.full()).map_err(|failure| {
            log::debug!(
                "failed to parse {:?}, last rejection at {} ({})",
                expr,
                failure.position,
                failure.kind
            );
            JMESPathError::syntax(String::from("failed to parse expression"), span)
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::standard()
    }
}

/// The state of a single parse: the input and, optionally, a table of
/// already attempted expression spans.
struct RangeParser<'q> {
    text: Text<'q>,
    memo: Option<RefCell<HashMap<Span, Parsed<Expression>>>>,
}

impl<'q> RangeParser<'q> {
    fn new(query: &'q str, env: &Env) -> Self {
        RangeParser {
            text: Text::new(query),
            memo: env.memoize.then(|| RefCell::new(HashMap::new())),
        }
    }

    /// expression = sub-expression / index-expression / comparator-expression
    ///            / or-expression / identifier / and-expression / not-expression
    ///            / paren-expression / "*" / multi-select-list / multi-select-hash
    ///            / literal / function-expression / pipe-expression / raw-string
    ///            / current-node
    fn parse_expression(&self, span: Span) -> Parsed<Expression> {
        let span = self.text.trim(span);

        if span.is_empty() {
            return Err(reject("expression", Mismatch, span.start, "empty range"));
        }

        if let Some(memo) = &self.memo {
            if let Some(rv) = memo.borrow().get(&span) {
                return rv.clone();
            }
        }

        // Operators that bind loosest come first, so the first split that
        // parses on both sides is the outermost operator.
        let rv = OrderedChoice::new("expression", span)
            .or_try(|s| self.parse_pipe_expression(s), Expression::pipe_expression)
            .or_try(|s| self.parse_or_expression(s), Expression::or_expression)
            .or_try(|s| self.parse_and_expression(s), Expression::and_expression)
            .or_try(
                |s| self.parse_comparator_expression(s),
                Expression::comparator_expression,
            )
            .or_try(|s| self.parse_not_expression(s), Expression::not_expression)
            .or_try(|s| self.parse_sub_expression(s), Expression::sub_expression)
            .or_try(|s| self.parse_index_expression(s), Expression::index_expression)
            .or_try(|s| self.parse_identifier(s), Expression::identifier)
            .or_try(|s| self.parse_paren_expression(s), Expression::paren_expression)
            .or_try(|s| self.parse_wildcard(s), Expression::wildcard_expression)
            .or_try(|s| self.parse_multi_select_list(s), Expression::multi_select_list)
            .or_try(|s| self.parse_multi_select_hash(s), Expression::multi_select_hash)
            .or_try(|s| self.parse_literal(s), Expression::literal)
            .or_try(
                |s| self.parse_function_expression(s),
                Expression::function_expression,
            )
            .or_try(|s| self.parse_raw_string(s), Expression::raw_string)
            .or_try(|s| self.parse_current_node(s), Expression::current_node)
            .finish();

        if let Some(memo) = &self.memo {
            memo.borrow_mut().insert(span, rv.clone());
        }

        rv
    }

    /// sub-expression = expression "." ( identifier / multi-select-list
    ///                / multi-select-hash / function-expression / "*" )
    fn parse_sub_expression(&self, span: Span) -> Parsed<SubExpression> {
        let span = self.text.trim(span);

        for position in self.text.find_all(span.inner(), ".") {
            let right = match self.parse_sub_expression_right(Span::new(position + 1, span.end)) {
                Ok(right) => right,
                Err(_) => continue,
            };

            let left = match self.parse_expression(Span::new(span.start, position)) {
                Ok(left) => left,
                Err(_) => continue,
            };

            return Ok(SubExpression { left, right });
        }

        Err(reject(
            "sub-expression",
            Mismatch,
            span.start,
            "invalid sub-expression",
        ))
    }

    fn parse_sub_expression_right(&self, span: Span) -> Parsed<SubExpressionRight> {
        OrderedChoice::new("sub-expression", span)
            .or_try(|s| self.parse_identifier(s), SubExpressionRight::identifier)
            .or_try(
                |s| self.parse_multi_select_list(s),
                SubExpressionRight::multi_select_list,
            )
            .or_try(
                |s| self.parse_multi_select_hash(s),
                SubExpressionRight::multi_select_hash,
            )
            .or_try(
                |s| self.parse_function_expression(s),
                SubExpressionRight::function_expression,
            )
            .or_try(
                |s| self.parse_wildcard(s),
                SubExpressionRight::wildcard_expression,
            )
            .finish()
    }

    /// pipe-expression = expression "|" expression
    fn parse_pipe_expression(&self, span: Span) -> Parsed<PipeExpression> {
        self.parse_binary_expression("pipe-expression", span, "|", |left, right| {
            PipeExpression { left, right }
        })
    }

    /// or-expression = expression "||" expression
    fn parse_or_expression(&self, span: Span) -> Parsed<OrExpression> {
        self.parse_binary_expression("or-expression", span, "||", |left, right| {
            OrExpression { left, right }
        })
    }

    /// and-expression = expression "&&" expression
    fn parse_and_expression(&self, span: Span) -> Parsed<AndExpression> {
        self.parse_binary_expression("and-expression", span, "&&", |left, right| {
            AndExpression { left, right }
        })
    }

    /// Split `span` at the first `delimiter` that has a valid expression on
    /// both sides.
    fn parse_binary_expression<T>(
        &self,
        production: &'static str,
        span: Span,
        delimiter: &str,
        build: impl Fn(Expression, Expression) -> T,
    ) -> Parsed<T> {
        let span = self.text.trim(span);

        for position in self.text.find_all(span.inner(), delimiter) {
            let left = match self.parse_expression(Span::new(span.start, position)) {
                Ok(left) => left,
                Err(_) => continue,
            };

            let right =
                match self.parse_expression(Span::new(position + delimiter.len(), span.end)) {
                    Ok(right) => right,
                    Err(_) => continue,
                };

            return Ok(build(left, right));
        }

        Err(reject(production, Mismatch, span.start, "no valid split"))
    }

    /// not-expression = "!" expression
    fn parse_not_expression(&self, span: Span) -> Parsed<NotExpression> {
        let span = self.text.trim(span);

        if !self.text.starts_with(span, b'!') {
            return Err(reject("not-expression", Mismatch, span.start, "expected '!'"));
        }

        self.parse_expression(Span::new(span.start + 1, span.end))
            .map(|expression| NotExpression { expression })
    }

    /// paren-expression = "(" expression ")"
    fn parse_paren_expression(&self, span: Span) -> Parsed<ParenExpression> {
        let span = self.text.trim(span);

        if !self.text.starts_and_ends_with(span, b'(', b')') {
            return Err(reject(
                "paren-expression",
                Mismatch,
                span.start,
                "expected '(' and ')'",
            ));
        }

        self.parse_expression(span.inner())
            .map(|expression| ParenExpression { expression })
    }

    /// comparator-expression = expression comparator expression
    fn parse_comparator_expression(&self, span: Span) -> Parsed<ComparatorExpression> {
        let span = self.text.trim(span);

        for comparator in Comparator::ALL {
            let symbol = comparator.symbol();

            for position in self.text.find_all(span, symbol) {
                let left = match self.parse_expression(Span::new(span.start, position)) {
                    Ok(left) => left,
                    Err(_) => continue,
                };

                let right =
                    match self.parse_expression(Span::new(position + symbol.len(), span.end)) {
                        Ok(right) => right,
                        Err(_) => continue,
                    };

                return Ok(ComparatorExpression {
                    left,
                    comparator,
                    right,
                });
            }
        }

        Err(reject(
            "comparator-expression",
            Mismatch,
            span.start,
            "invalid comparator expression",
        ))
    }

    /// index-expression = expression bracket-specifier / bracket-specifier
    fn parse_index_expression(&self, span: Span) -> Parsed<IndexExpression> {
        let span = self.text.trim(span);

        OrderedChoice::new("index-expression", span)
            .or_try(|s| self.parse_index_expression_with_left(s), |e| e)
            .or_try(
                |s| self.parse_bracket_specifier(s),
                |bracket| IndexExpression {
                    left: None,
                    bracket,
                },
            )
            .finish()
    }

    fn parse_index_expression_with_left(&self, span: Span) -> Parsed<IndexExpression> {
        let span = self.text.trim(span);

        for position in self.text.find_all(span.inner(), "[") {
            let left = match self.parse_expression(Span::new(span.start, position)) {
                Ok(left) => left,
                Err(_) => continue,
            };

            let bracket = match self.parse_bracket_specifier(Span::new(position, span.end)) {
                Ok(bracket) => bracket,
                Err(_) => continue,
            };

            return Ok(IndexExpression {
                left: Some(left),
                bracket,
            });
        }

        Err(reject(
            "index-expression",
            Mismatch,
            span.start,
            "invalid index-expression with left-hand side",
        ))
    }

    /// bracket-specifier = "[" (number / "*" / slice-expression) "]" / "[]"
    ///                   / "[?" expression "]"
    fn parse_bracket_specifier(&self, span: Span) -> Parsed<BracketSpecifier> {
        let span = self.text.trim(span);

        if !self.text.starts_and_ends_with(span, b'[', b']') {
            return Err(reject(
                "bracket-specifier",
                Mismatch,
                span.start,
                "expected '[' and ']'",
            ));
        }

        if span.len() == 2 {
            return Ok(BracketSpecifier::WithoutContents);
        }

        if self.text.byte_at(span.start + 1) == Some(b'?') {
            return self
                .parse_expression(Span::new(span.start + 2, span.end - 1))
                .map(BracketSpecifier::question_mark);
        }

        OrderedChoice::new("bracket-specifier", span.inner())
            .or_try(|s| self.parse_number(s), BracketSpecifier::number)
            .or_try(|s| self.parse_wildcard(s), BracketSpecifier::wildcard)
            .or_try(|s| self.parse_slice_expression(s), BracketSpecifier::slice)
            .finish()
    }

    /// slice-expression = [number] ":" [number] [ ":" [number] ]
    fn parse_slice_expression(&self, span: Span) -> Parsed<SliceExpression> {
        let span = self.text.trim(span);

        let first_colon = self.text.find(span, b':').ok_or_else(|| {
            reject(
                "slice-expression",
                MissingDelimiter,
                span.start,
                "expected ':'",
            )
        })?;

        let second_colon = self.text.find(Span::new(first_colon + 1, span.end), b':');

        let start = self.parse_optional_number(Span::new(span.start, first_colon))?;
        let stop = self.parse_optional_number(Span::new(
            first_colon + 1,
            second_colon.unwrap_or(span.end),
        ))?;
        let step = match second_colon {
            Some(second_colon) => {
                self.parse_optional_number(Span::new(second_colon + 1, span.end))?
            }
            None => None,
        };

        Ok(SliceExpression { start, stop, step })
    }

    fn parse_optional_number(&self, span: Span) -> Parsed<Option<i32>> {
        if span.is_empty() {
            return Ok(None);
        }
        self.parse_number(span).map(Some)
    }

    /// number = ["-"]1*digit
    fn parse_number(&self, span: Span) -> Parsed<i32> {
        let span = self.text.trim(span);

        let value = match self.text.slice(span) {
            Some(value) if NUMBER.is_match(value) => value,
            _ => return Err(reject("number", Mismatch, span.start, "expected number")),
        };

        value.parse::<i32>().map_err(|_| {
            reject(
                "number",
                InvalidNumber,
                span.start,
                "number out of range for a 32-bit integer",
            )
        })
    }

    /// multi-select-list = "[" ( expression *( "," expression ) ) "]"
    fn parse_multi_select_list(&self, span: Span) -> Parsed<MultiSelectList> {
        self.parse_delimited("multi-select-list", span, b'[', b']', |s| {
            self.parse_expression(s)
        })
        .map(|expressions| MultiSelectList { expressions })
    }

    /// multi-select-hash = "{" ( keyval-expr *( "," keyval-expr ) ) "}"
    fn parse_multi_select_hash(&self, span: Span) -> Parsed<MultiSelectHash> {
        self.parse_delimited("multi-select-hash", span, b'{', b'}', |s| {
            self.parse_key_value_expression(s)
        })
        .map(|entries| MultiSelectHash { entries })
    }

    /// keyval-expr = identifier ":" expression
    fn parse_key_value_expression(&self, span: Span) -> Parsed<KeyValueExpression> {
        let span = self.text.trim(span);

        for position in self.text.find_all(span.inner(), ":") {
            let key = match self.parse_identifier(Span::new(span.start, position)) {
                Ok(key) => key,
                Err(_) => continue,
            };

            let value = match self.parse_expression(Span::new(position + 1, span.end)) {
                Ok(value) => value,
                Err(_) => continue,
            };

            return Ok(KeyValueExpression { key, value });
        }

        Err(reject("keyval-expr", Mismatch, span.start, "invalid keyval-expr"))
    }

    /// `open ( entry *( "," entry ) ) close`
    fn parse_delimited<T>(
        &self,
        production: &'static str,
        span: Span,
        open: u8,
        close: u8,
        entry: impl Fn(Span) -> Parsed<T>,
    ) -> Parsed<Vec<T>> {
        let span = self.text.trim(span);

        if !self.text.starts_and_ends_with(span, open, close) {
            return Err(reject(
                production,
                Mismatch,
                span.start,
                "expected opening and closing delimiters",
            ));
        }

        let inner = span.inner();
        let commas = self.text.find_all(inner, ",");

        if commas.is_empty() {
            return entry(inner).map(|value| vec![value]);
        }

        split_entries(production, inner, &commas, entry)
    }

    /// function-expression = unquoted-string ( no-args / one-or-more-args )
    fn parse_function_expression(&self, span: Span) -> Parsed<FunctionExpression> {
        let span = self.text.trim(span);

        let open_paren = self.text.find(span, b'(').ok_or_else(|| {
            reject(
                "function-expression",
                Mismatch,
                span.start,
                "expected function",
            )
        })?;

        let name = self.parse_unquoted_string(Span::new(span.start, open_paren))?;

        let args = OrderedChoice::new("function-expression", Span::new(open_paren, span.end))
            .or_try(|s| self.parse_no_args(s), |args| args)
            .or_try(
                |s| {
                    self.parse_delimited("function-args", s, b'(', b')', |s| {
                        self.parse_function_arg(s)
                    })
                },
                |args| args,
            )
            .finish()?;

        Ok(FunctionExpression { name, args })
    }

    /// no-args = "(" ")"
    fn parse_no_args(&self, span: Span) -> Parsed<Vec<FunctionArg>> {
        let span = self.text.trim(span);

        if !self.text.starts_and_ends_with(span, b'(', b')') {
            return Err(reject("no-args", Mismatch, span.start, "expected '(' and ')'"));
        }

        match self.text.slice(span.inner()) {
            Some(inner) if inner.trim_matches(' ').is_empty() => Ok(Vec::new()),
            _ => Err(reject("no-args", Mismatch, span.start + 1, "expected ')'")),
        }
    }

    /// function-arg = expression / expression-type
    fn parse_function_arg(&self, span: Span) -> Parsed<FunctionArg> {
        OrderedChoice::new("function-arg", span)
            .or_try(|s| self.parse_expression(s), FunctionArg::expression)
            .or_try(|s| self.parse_expression_type(s), FunctionArg::expression_type)
            .finish()
    }

    /// expression-type = "&" expression
    fn parse_expression_type(&self, span: Span) -> Parsed<Expression> {
        let span = self.text.trim(span);

        if !self.text.starts_with(span, b'&') {
            return Err(reject("expression-type", Mismatch, span.start, "expected '&'"));
        }

        self.parse_expression(Span::new(span.start + 1, span.end))
    }

    /// current-node = "@"
    fn parse_current_node(&self, span: Span) -> Parsed<CurrentNode> {
        self.parse_token("current-node", span, b'@')
            .map(|_| CurrentNode)
    }

    fn parse_wildcard(&self, span: Span) -> Parsed<WildcardExpression> {
        self.parse_token("wildcard", span, b'*')
            .map(|_| WildcardExpression)
    }

    /// A single character token that must make up the whole span.
    fn parse_token(&self, production: &'static str, span: Span, token: u8) -> Parsed<()> {
        let span = self.text.trim(span);

        if !self.text.starts_with(span, token) {
            return Err(reject(
                production,
                Mismatch,
                span.start,
                "unexpected token",
            ));
        }

        if span.len() != 1 {
            return Err(reject(
                production,
                UnexpectedCharacter,
                span.start + 1,
                "unexpected character after token",
            ));
        }

        Ok(())
    }

    /// identifier = unquoted-string / quoted-string
    fn parse_identifier(&self, span: Span) -> Parsed<String> {
        OrderedChoice::new("identifier", span)
            .or_try(|s| self.parse_unquoted_string(s), |name| name)
            .or_try(|s| self.parse_quoted_string(s), |name| name)
            .finish()
    }

    /// unquoted-string = (%x41-5A / %x61-7A / %x5F) *(%x30-39 / %x41-5A / %x5F / %x61-7A)
    fn parse_unquoted_string(&self, span: Span) -> Parsed<String> {
        let span = self.text.trim(span);

        match self.text.slice(span) {
            Some(value) if UNQUOTED_STRING.is_match(value) => Ok(value.to_owned()),
            _ => Err(reject(
                "unquoted-string",
                Mismatch,
                span.start,
                "expected [A-Za-z_][A-Za-z0-9_]*",
            )),
        }
    }

    /// quoted-string = quote 1*(unescaped-char / escaped-char) quote
    fn parse_quoted_string(&self, span: Span) -> Parsed<String> {
        let span = self.text.trim(span);

        if !self.text.starts_and_ends_with(span, b'"', b'"') {
            return Err(reject(
                "quoted-string",
                Mismatch,
                span.start,
                "expected opening and closing '\"'",
            ));
        }

        let inner = span.inner();
        let value = match self.text.slice(inner) {
            Some(value) if !value.is_empty() => value,
            _ => {
                return Err(reject(
                    "quoted-string",
                    Mismatch,
                    span.start,
                    "empty quoted-string",
                ))
            }
        };

        unescape_quoted(value, inner.start)
    }

    /// raw-string = "'" *raw-string-char "'"
    fn parse_raw_string(&self, span: Span) -> Parsed<String> {
        let span = self.text.trim(span);

        if !self.text.starts_and_ends_with(span, b'\'', b'\'') {
            return Err(reject(
                "raw-string",
                Mismatch,
                span.start,
                "expected opening and closing \"'\"",
            ));
        }

        let inner = span.inner();
        match self.text.slice(inner) {
            Some(value) => unescape_raw(value, inner.start),
            None => Err(reject("raw-string", Mismatch, span.start, "invalid bounds")),
        }
    }

    /// literal = "`" json-value "`"
    fn parse_literal(&self, span: Span) -> Parsed<Literal> {
        let span = self.text.trim(span);

        if !self.text.starts_and_ends_with(span, b'`', b'`') {
            return Err(reject(
                "literal",
                Mismatch,
                span.start,
                "expected opening and closing '`'",
            ));
        }

        let inner = span.inner();
        let content = self
            .text
            .slice(inner)
            .ok_or_else(|| reject("literal", Mismatch, span.start, "invalid bounds"))?;

        let mut json = String::with_capacity(content.len());

        for (offset, ch) in content.char_indices() {
            if ch != '`' {
                json.push(ch);
                continue;
            }

            let escapes = content[..offset]
                .bytes()
                .rev()
                .take_while(|&b| b == b'\\')
                .count();

            if escapes % 2 == 0 {
                return Err(reject(
                    "literal",
                    UnescapedDelimiter,
                    inner.start + offset,
                    "unescaped '`'",
                ));
            }

            json.pop(); // escape
            json.push('`');
        }

        serde_json::from_str::<Value>(&json)
            .map(|value| Literal { value })
            .map_err(|err| {
                reject(
                    "literal",
                    InvalidJson,
                    span.start,
                    format_args!("invalid JSON: {}", err),
                )
            })
    }
}

/// Split the comma separated entries of `inner`. The first entry must end at
/// exactly one of `commas`; each later entry ends at the first comma that
/// gives a valid entry, and the last runs to the end of `inner`.
fn split_entries<T>(
    production: &'static str,
    inner: Span,
    commas: &[usize],
    entry: impl Fn(Span) -> Parsed<T>,
) -> Parsed<Vec<T>> {
    let mut first: Option<(T, usize)> = None;

    for &comma in commas {
        if let Ok(value) = entry(Span::new(inner.start, comma)) {
            if first.is_some() {
                return Err(reject(
                    production,
                    AmbiguousSeparation,
                    inner.start,
                    "first entry can end at more than one comma",
                ));
            }
            first = Some((value, comma + 1));
        }
    }

    let (value, mut position) = first.ok_or_else(|| {
        reject(production, NoValidEntry, inner.start, "no valid first entry")
    })?;

    let mut entries = vec![value];

    for &comma in commas {
        if comma < position {
            continue;
        }

        if let Ok(value) = entry(Span::new(position, comma)) {
            entries.push(value);
            position = comma + 1;
        }
    }

    match entry(Span::new(position, inner.end)) {
        Ok(value) => entries.push(value),
        Err(_) => {
            return Err(reject(
                production,
                AmbiguousSeparation,
                position,
                "invalid last entry",
            ))
        }
    }

    Ok(entries)
}

/// unescaped-char = %x20-21 / %x23-5B / %x5D-10FFFF
fn is_unescaped_char(ch: char) -> bool {
    matches!(ch, '\u{20}'..='\u{21}' | '\u{23}'..='\u{5B}' | '\u{5D}'..='\u{10FFFF}')
}

/// raw-string-char = %x20-26 / %x28-5B / %x5D-10FFFF
fn is_raw_string_char(ch: char) -> bool {
    matches!(ch, '\u{20}'..='\u{26}' | '\u{28}'..='\u{5B}' | '\u{5D}'..='\u{10FFFF}')
}

fn is_high_surrogate(code_point: u32) -> bool {
    (0xD800..=0xDBFF).contains(&code_point)
}

fn is_low_surrogate(code_point: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&code_point)
}

/// Decode the content of a quoted string. `offset` is the byte position of
/// `value` in the input, for diagnostics.
fn unescape_quoted(value: &str, offset: usize) -> Parsed<String> {
    let chars = value.char_indices().collect::<Vec<(usize, char)>>();
    let length = chars.len();
    let mut rv = String::with_capacity(value.len());
    let mut index: usize = 0;

    while index < length {
        let (position, ch) = chars[index];
        let position = offset + position;

        if ch != '\\' {
            if !is_unescaped_char(ch) {
                return Err(reject(
                    "quoted-string",
                    UnexpectedCharacter,
                    position,
                    "unexpected character",
                ));
            }
            rv.push(ch);
            index += 1;
            continue;
        }

        let escaped = match chars.get(index + 1) {
            Some(&(_, escaped)) => escaped,
            None => {
                return Err(reject(
                    "quoted-string",
                    InvalidEscape,
                    position,
                    "incomplete escape sequence",
                ))
            }
        };

        match escaped {
            '"' => rv.push('"'),
            '\\' => rv.push('\\'),
            '/' => rv.push('/'),
            'b' => rv.push('\x08'),
            'f' => rv.push('\x0C'),
            'n' => rv.push('\n'),
            'r' => rv.push('\r'),
            't' => rv.push('\t'),
            'u' => {
                let (ch, consumed) = decode_unicode_escape(&chars, index, position)?;
                rv.push(ch);
                index += consumed;
                continue;
            }
            _ => {
                return Err(reject(
                    "quoted-string",
                    InvalidEscape,
                    position,
                    "unsupported escape sequence",
                ))
            }
        }

        index += 2;
    }

    Ok(rv)
}

/// Decode `\uXXXX`, or a `\uXXXX\uXXXX` surrogate pair, starting at the
/// backslash at `chars[index]`. Returns the character and the number of
/// chars consumed.
fn decode_unicode_escape(
    chars: &[(usize, char)],
    index: usize,
    position: usize,
) -> Parsed<(char, usize)> {
    let invalid = |msg: &str| reject("quoted-string", InvalidEscape, position, msg);

    let mut code_point =
        parse_hex_digits(chars, index + 2).ok_or_else(|| invalid("invalid \\uXXXX escape"))?;

    if is_low_surrogate(code_point) {
        return Err(invalid("unexpected low surrogate code point"));
    }

    let mut consumed = 6;

    if is_high_surrogate(code_point) {
        let followed_by_escape = matches!(
            (chars.get(index + 6), chars.get(index + 7)),
            (Some((_, '\\')), Some((_, 'u')))
        );

        let low_surrogate = if followed_by_escape {
            parse_hex_digits(chars, index + 8)
        } else {
            None
        };

        match low_surrogate {
            Some(low) if is_low_surrogate(low) => {
                code_point = 0x10000 + (((code_point & 0x03FF) << 10) | (low & 0x03FF));
                consumed = 12;
            }
            _ => return Err(invalid("unpaired high surrogate")),
        }
    }

    char::from_u32(code_point)
        .map(|ch| (ch, consumed))
        .ok_or_else(|| invalid("invalid code point"))
}

fn parse_hex_digits(chars: &[(usize, char)], start: usize) -> Option<u32> {
    let digits = chars.get(start..start + 4)?;
    digits
        .iter()
        .try_fold(0_u32, |acc, &(_, ch)| Some(acc * 16 + ch.to_digit(16)?))
}

/// Decode the content of a raw string. `\'` and `\\` are escapes, a
/// backslash before any other raw string character is kept as is.
fn unescape_raw(value: &str, offset: usize) -> Parsed<String> {
    let mut rv = String::with_capacity(value.len());
    let mut chars = value.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        if ch != '\\' {
            if !is_raw_string_char(ch) {
                return Err(reject(
                    "raw-string",
                    UnexpectedCharacter,
                    offset + position,
                    "unexpected character",
                ));
            }
            rv.push(ch);
            continue;
        }

        match chars.next() {
            Some((_, escaped @ ('\'' | '\\'))) => rv.push(escaped),
            Some((_, preserved)) if is_raw_string_char(preserved) => {
                rv.push('\\');
                rv.push(preserved);
            }
            _ => {
                return Err(reject(
                    "raw-string",
                    UnexpectedCharacter,
                    offset + position,
                    "invalid escape",
                ))
            }
        }
    }

    Ok(rv)
}
