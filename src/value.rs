//! Literal value parser.
//!
//! Reads exactly one DSL literal starting at a byte offset. Priority order:
//! quoted string, `-> { ... }` callable, `{...}` hash, `[...]` array, then a
//! bare token classified as number, keyword or symbol. No match is not an
//! error; callers stop consuming at that point.

use crate::ast::{Keyword, Value};
use crate::config::ParserOptions;
use crate::lexer::{Cursor, balanced_end};
use crate::options::{array_items, hash_entries};

/// A parsed literal and the offset just past it.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
    pub end: usize,
}

/// Parse the literal at `pos` in `src`, skipping leading whitespace.
pub fn parse_value(src: &str, pos: usize, options: &ParserOptions) -> Option<Literal> {
    parse_value_at(src, pos, 0, options)
}

pub(crate) fn parse_value_at(
    src: &str,
    pos: usize,
    depth: usize,
    options: &ParserOptions,
) -> Option<Literal> {
    let mut cursor = Cursor::at(src, pos);
    cursor.skip_whitespace();

    let value = match cursor.peek()? {
        '"' | '\'' => read_string(&mut cursor)?,
        '-' if cursor.rest().starts_with("->") => read_callable(&mut cursor)?,
        '{' | '[' => read_nested(&mut cursor, depth, options)?,
        _ => read_bare(&mut cursor)?,
    };

    Some(Literal {
        value,
        end: cursor.pos(),
    })
}

/// Quoted string. Escapes are not interpreted; the first matching quote
/// closes the literal.
fn read_string(cursor: &mut Cursor<'_>) -> Option<Value> {
    let quote = cursor.bump()?;
    let content = cursor.eat_while(|c| c != quote);
    if !cursor.eat_char(quote) {
        return None;
    }
    Some(Value::Str(content.to_string()))
}

fn read_callable(cursor: &mut Cursor<'_>) -> Option<Value> {
    let start = cursor.pos();
    cursor.eat("->");
    cursor.skip_whitespace();
    if cursor.peek() != Some('{') {
        return None;
    }
    let end = balanced_end(cursor.src(), cursor.pos())?;
    *cursor = Cursor::at(cursor.src(), end);
    Some(Value::Callable(cursor.src()[start..end].to_string()))
}

fn read_nested(cursor: &mut Cursor<'_>, depth: usize, options: &ParserOptions) -> Option<Value> {
    if depth >= options.max_depth {
        return None;
    }
    let src = cursor.src();
    let open = cursor.pos();
    let end = balanced_end(src, open)?;
    let inner = &src[open + 1..end - 1];

    let value = if src[open..].starts_with('{') {
        Value::Hash(hash_entries(inner, depth + 1, options))
    } else {
        Value::Array(array_items(inner, depth + 1, options))
    };
    *cursor = Cursor::at(src, end);
    Some(value)
}

fn is_token_char(c: char) -> bool {
    !(c.is_whitespace() || matches!(c, '"' | ',' | '{' | '}' | '[' | ']' | ':'))
}

fn read_bare(cursor: &mut Cursor<'_>) -> Option<Value> {
    let symbol_prefix = cursor.eat_char(':');
    let token = cursor.eat_while(is_token_char);
    if token.is_empty() {
        return None;
    }

    if let Some(keyword) = Keyword::from_ident(token) {
        return Some(Value::Keyword(keyword));
    }
    if !symbol_prefix && is_numeric(token) {
        return Some(Value::Numeric(normalize_numeric(token)));
    }
    Some(Value::Symbol(token.to_string()))
}

/// `-?\d*\.?\d+`
fn is_numeric(token: &str) -> bool {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    match unsigned.split_once('.') {
        Some((int, frac)) => all_digits(int) && !frac.is_empty() && all_digits(frac),
        None => !unsigned.is_empty() && all_digits(unsigned),
    }
}

fn normalize_numeric(token: &str) -> String {
    if let Some(rest) = token.strip_prefix("-.") {
        format!("-0.{}", rest)
    } else if token.starts_with('.') {
        format!("0{}", token)
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ValueKind;

    fn parse(src: &str) -> Option<Literal> {
        parse_value(src, 0, &ParserOptions::default())
    }

    fn value(src: &str) -> Value {
        parse(src).unwrap().value
    }

    #[test]
    fn test_strings() {
        assert_eq!(value(r#""hello world""#), Value::Str("hello world".into()));
        assert_eq!(value("'single'"), Value::Str("single".into()));
        assert_eq!(value(r#""""#), Value::Str(String::new()));
        assert_eq!(parse(r#""open"#), None);
    }

    #[test]
    fn test_string_end_offset() {
        let lit = parse(r#"  "a", b"#).unwrap();
        assert_eq!(lit.end, 5);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(value("42"), Value::Numeric("42".into()));
        assert_eq!(value("3.14"), Value::Numeric("3.14".into()));
        assert_eq!(value(".5"), Value::Numeric("0.5".into()));
        assert_eq!(value("-1"), Value::Numeric("-1".into()));
        assert_eq!(value("-.25"), Value::Numeric("-0.25".into()));
        assert_eq!(value("1."), Value::Symbol("1.".into()));
    }

    #[test]
    fn test_keywords_and_symbols() {
        assert_eq!(value("true"), Value::Keyword(Keyword::True));
        assert_eq!(value("false"), Value::Keyword(Keyword::False));
        assert_eq!(value("nil"), Value::Keyword(Keyword::Nil));
        assert_eq!(value(":cascade"), Value::Symbol("cascade".into()));
        assert_eq!(value("uuid"), Value::Symbol("uuid".into()));
        assert_eq!(value(":true"), Value::Keyword(Keyword::True));
        assert_eq!(value(":1").kind(), ValueKind::Symbol);
    }

    #[test]
    fn test_control_chars_stay_in_token() {
        assert_eq!(value("a\u{8}b, c"), Value::Symbol("a\u{8}b".into()));
    }

    #[test]
    fn test_callable_kept_raw() {
        let lit = parse(r#"-> { "CURRENT_TIMESTAMP" }, null: false"#).unwrap();
        assert_eq!(lit.value, Value::Callable(r#"-> { "CURRENT_TIMESTAMP" }"#.into()));
        assert_eq!(lit.value.kind(), ValueKind::Callable);
    }

    #[test]
    fn test_nested_three_levels() {
        let v = value("{a: [1, {b: [2, 3]}], c: {d: {e: :f}}}");
        let hash = v.as_hash().unwrap();
        assert_eq!(hash.len(), 2);
        assert_eq!(v.to_string(), "{a: [1, {b: [2, 3]}], c: {d: {e: f}}}");
    }

    #[test]
    fn test_depth_budget() {
        let opts = ParserOptions {
            max_depth: 1,
            ..Default::default()
        };
        let lit = parse_value("[[1]]", 0, &opts).unwrap();
        // the inner array exceeds the budget, so the outer list stops before it
        assert_eq!(lit.value, Value::Array(vec![]));
        assert_eq!(lit.end, 5);

        let none = ParserOptions {
            max_depth: 0,
            ..Default::default()
        };
        assert_eq!(parse_value("[1]", 0, &none), None);
    }

    #[test]
    fn test_no_literal() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("]"), None);
        assert_eq!(parse("[1, 2"), None);
    }
}
