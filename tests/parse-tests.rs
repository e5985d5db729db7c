use lazy_static::lazy_static;
use rust_jmespath::ast::{
    AndExpression, BracketSpecifier, Comparator, ComparatorExpression, CurrentNode, FunctionArg,
    FunctionExpression, IndexExpression, KeyValueExpression, Literal, MultiSelectHash,
    MultiSelectList, NotExpression, OrExpression, ParenExpression, PipeExpression,
    SliceExpression, SubExpression, SubExpressionRight, WildcardExpression,
};
use rust_jmespath::{errors::JMESPathError, Env, Expression, Parser};
use serde_json::json;

lazy_static! {
    static ref PARSER: Parser = Parser::new(Env::standard());
    static ref UNMEMOIZED: Parser = Parser::new(Env::without_memoization());
}

macro_rules! parse_tests {
    ($($name:ident: $value:expr,)*) => {
    mod parse {
        use super::*;
        $(
            #[test]
            fn $name() -> Result<(), JMESPathError> {
                let (input, expected) = $value;
                assert_eq!(PARSER.parse(input)?, expected);
                assert_eq!(UNMEMOIZED.parse(input)?, expected);
                Ok(())
            }
        )*
        }
    }
}

fn id(name: &str) -> Expression {
    Expression::identifier(name)
}

fn sub(left: Expression, right: SubExpressionRight) -> Expression {
    Expression::sub_expression(SubExpression { left, right })
}

fn dot(left: Expression, name: &str) -> Expression {
    sub(left, SubExpressionRight::identifier(name))
}

fn index(left: Option<Expression>, bracket: BracketSpecifier) -> Expression {
    Expression::index_expression(IndexExpression { left, bracket })
}

fn slice(start: Option<i32>, stop: Option<i32>, step: Option<i32>) -> Expression {
    index(None, BracketSpecifier::slice(SliceExpression { start, stop, step }))
}

fn compare(left: Expression, comparator: Comparator, right: Expression) -> Expression {
    Expression::comparator_expression(ComparatorExpression {
        left,
        comparator,
        right,
    })
}

fn and(left: Expression, right: Expression) -> Expression {
    Expression::and_expression(AndExpression { left, right })
}

fn or(left: Expression, right: Expression) -> Expression {
    Expression::or_expression(OrExpression { left, right })
}

fn pipe(left: Expression, right: Expression) -> Expression {
    Expression::pipe_expression(PipeExpression { left, right })
}

fn not(expression: Expression) -> Expression {
    Expression::not_expression(NotExpression { expression })
}

fn paren(expression: Expression) -> Expression {
    Expression::paren_expression(ParenExpression { expression })
}

fn list(expressions: Vec<Expression>) -> MultiSelectList {
    MultiSelectList { expressions }
}

fn hash(entries: Vec<(&str, Expression)>) -> MultiSelectHash {
    MultiSelectHash {
        entries: entries
            .into_iter()
            .map(|(key, value)| KeyValueExpression {
                key: key.to_owned(),
                value,
            })
            .collect(),
    }
}

fn function(name: &str, args: Vec<FunctionArg>) -> FunctionExpression {
    FunctionExpression {
        name: name.to_owned(),
        args,
    }
}

fn literal(value: serde_json::Value) -> Expression {
    Expression::literal(Literal { value })
}

parse_tests! {
    identifier: ("foo", id("foo")),
    identifier_with_spaces: ("  foo  ", id("foo")),
    sub_expression: ("foo.bar", dot(id("foo"), "bar")),
    sub_expression_left_associative: ("a.b.c", dot(dot(id("a"), "b"), "c")),
    sub_expression_with_spaces: (" foo . bar ", dot(id("foo"), "bar")),
    sub_expression_multi_select_list: (
        "foo.[bar]",
        sub(id("foo"), SubExpressionRight::multi_select_list(list(vec![id("bar")])))
    ),
    sub_expression_multi_select_hash: (
        "foo.{bar : baz}",
        sub(
            id("foo"),
            SubExpressionRight::multi_select_hash(hash(vec![("bar", id("baz"))]))
        )
    ),
    sub_expression_function: (
        "foo.length()",
        sub(id("foo"), SubExpressionRight::function_expression(function("length", vec![])))
    ),
    sub_expression_wildcard: (
        "foo.*",
        sub(id("foo"), SubExpressionRight::wildcard_expression(WildcardExpression))
    ),
    pipe_expression: ("foo | bar", pipe(id("foo"), id("bar"))),
    or_expression: ("foo || bar", or(id("foo"), id("bar"))),
    and_expression: ("foo && bar", and(id("foo"), id("bar"))),
    not_expression: ("!foo", not(id("foo"))),
    paren_expression: ("(foo)", paren(id("foo"))),
    wildcard: ("*", Expression::wildcard_expression(WildcardExpression)),
    current_node: ("@", Expression::current_node(CurrentNode)),
    flatten: ("[]", index(None, BracketSpecifier::WithoutContents)),
    bare_index: ("[10]", index(None, BracketSpecifier::number(10))),
    negative_index: ("[-10]", index(None, BracketSpecifier::number(-10))),
    bracketed_wildcard: ("[*]", index(None, BracketSpecifier::wildcard(WildcardExpression))),
    bare_filter: ("[?foo]", index(None, BracketSpecifier::question_mark(id("foo")))),
    index_with_left: ("foo[0]", index(Some(id("foo")), BracketSpecifier::number(0))),
    flatten_with_left: ("foo[]", index(Some(id("foo")), BracketSpecifier::WithoutContents)),
    index_then_sub_expression: (
        "foo[0].bar",
        dot(index(Some(id("foo")), BracketSpecifier::number(0)), "bar")
    ),
    sub_expression_then_index: (
        "foo.bar[0]",
        index(Some(dot(id("foo"), "bar")), BracketSpecifier::number(0))
    ),
    filter_with_comparator: (
        "foo[?bar == `1`].baz",
        dot(
            index(
                Some(id("foo")),
                BracketSpecifier::question_mark(compare(id("bar"), Comparator::Equal, literal(json!(1))))
            ),
            "baz"
        )
    ),
    slice_with_step: ("[1:5:2]", slice(Some(1), Some(5), Some(2))),
    slice_without_start: ("[:5]", slice(None, Some(5), None)),
    slice_without_stop: ("[1:]", slice(Some(1), None, None)),
    slice_empty: ("[::]", slice(None, None, None)),
    slice_negative_step: ("[::-1]", slice(None, None, Some(-1))),
    multi_select_list: ("[foo, bar]", Expression::multi_select_list(list(vec![id("foo"), id("bar")]))),
    multi_select_list_three: (
        "[a, b, c]",
        Expression::multi_select_list(list(vec![id("a"), id("b"), id("c")]))
    ),
    multi_select_list_nested: (
        "[foo, [bar, baz]]",
        Expression::multi_select_list(list(vec![
            id("foo"),
            Expression::multi_select_list(list(vec![id("bar"), id("baz")])),
        ]))
    ),
    multi_select_list_single: ("[foo]", Expression::multi_select_list(list(vec![id("foo")]))),
    multi_select_hash: (
        "{foo: bar, baz: bam}",
        Expression::multi_select_hash(hash(vec![("foo", id("bar")), ("baz", id("bam"))]))
    ),
    multi_select_hash_literals: (
        "{a: `1`, b: `2`}",
        Expression::multi_select_hash(hash(vec![("a", literal(json!(1))), ("b", literal(json!(2)))]))
    ),
    multi_select_hash_comma_in_function: (
        "{a: f(b, c), d: e}",
        Expression::multi_select_hash(hash(vec![
            (
                "a",
                Expression::function_expression(function(
                    "f",
                    vec![FunctionArg::expression(id("b")), FunctionArg::expression(id("c"))]
                ))
            ),
            ("d", id("e")),
        ]))
    ),
    multi_select_hash_quoted_key: (
        "{\"a b\": c}",
        Expression::multi_select_hash(hash(vec![("a b", id("c"))]))
    ),
    compare_eq: ("foo == bar", compare(id("foo"), Comparator::Equal, id("bar"))),
    compare_ne: ("foo != bar", compare(id("foo"), Comparator::NotEqual, id("bar"))),
    compare_lt: ("foo < bar", compare(id("foo"), Comparator::LessThan, id("bar"))),
    compare_le: ("foo <= bar", compare(id("foo"), Comparator::LessThanOrEqual, id("bar"))),
    compare_gt: ("foo > bar", compare(id("foo"), Comparator::GreaterThan, id("bar"))),
    compare_ge: ("foo >= bar", compare(id("foo"), Comparator::GreaterThanOrEqual, id("bar"))),
    or_binds_looser_than_and: ("a || b && c", or(id("a"), and(id("b"), id("c")))),
    and_then_or: ("a && b || c", or(and(id("a"), id("b")), id("c"))),
    pipe_binds_loosest: ("a | b || c", pipe(id("a"), or(id("b"), id("c")))),
    not_binds_tighter_than_and: ("!a && b", and(not(id("a")), id("b"))),
    grouped: ("(a || b) && c", and(paren(or(id("a"), id("b"))), id("c"))),
    function_no_args: ("foo()", Expression::function_expression(function("foo", vec![]))),
    function_current_node: (
        "length(@)",
        Expression::function_expression(function(
            "length",
            vec![FunctionArg::expression(Expression::current_node(CurrentNode))]
        ))
    ),
    function_expression_type: (
        "max_by(people, &age)",
        Expression::function_expression(function(
            "max_by",
            vec![FunctionArg::expression(id("people")), FunctionArg::expression_type(id("age"))]
        ))
    ),
    function_nested: (
        "sort(keys(@))",
        Expression::function_expression(function(
            "sort",
            vec![FunctionArg::expression(Expression::function_expression(function(
                "keys",
                vec![FunctionArg::expression(Expression::current_node(CurrentNode))]
            )))]
        ))
    ),
    quoted_identifier: ("\"foo\"", id("foo")),
    quoted_identifier_with_space: ("\"foo bar\"", id("foo bar")),
    quoted_identifier_escaped_quote: ("\"foo\\\"bar\"", id("foo\"bar")),
    quoted_identifier_escaped_newline: ("\"foo\\nbar\"", id("foo\nbar")),
    quoted_identifier_unicode_escape: ("\"\\u0041b\"", id("Ab")),
    raw_string: ("'foo'", Expression::raw_string("foo")),
    raw_string_empty: ("''", Expression::raw_string("")),
    raw_string_escaped_quote: ("'foo\\'bar'", Expression::raw_string("foo'bar")),
    raw_string_escaped_backslash: ("'foo\\\\bar'", Expression::raw_string("foo\\bar")),
    raw_string_preserved_backslash: ("'foo\\bar'", Expression::raw_string("foo\\bar")),
    literal_object: ("`{\"a\": 1}`", literal(json!({"a": 1}))),
    literal_array: ("`[1, 2]`", literal(json!([1, 2]))),
    literal_string: ("`\"foo\"`", literal(json!("foo"))),
    literal_true: ("`true`", literal(json!(true))),
    literal_escaped_backtick: ("`\"a\\`b\"`", literal(json!("a`b"))),
}

mod properties {
    use super::*;

    #[test]
    fn parsing_is_idempotent() -> Result<(), JMESPathError> {
        let query = "people[?age > `20`].{name: name, tags: tags[*]} | sort_by(@, &name)";
        assert_eq!(PARSER.parse(query)?, PARSER.parse(query)?);
        Ok(())
    }

    #[test]
    fn free_function_uses_standard_parser() -> Result<(), JMESPathError> {
        assert_eq!(rust_jmespath::parse("a.b")?, Expression::standard("a.b")?);
        Ok(())
    }

    #[test]
    fn default_parser_memoizes() {
        assert_eq!(Env::default(), Env::standard());
        assert!(Env::default().memoize);
    }

    #[test]
    fn comparator_symbols() {
        let symbols: Vec<String> = Comparator::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(symbols, vec!["<=", "==", ">=", "!=", "<", ">"]);
    }
}
