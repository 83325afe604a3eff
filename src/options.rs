//! Option lists: positional arrays and key/value hashes.
//!
//! Both parsers consume literals left to right and stop at the first
//! position that does not parse. Whatever follows is dropped without error.

use crate::ast::{Options, Value};
use crate::config::{ArrayFilter, ParserOptions};
use crate::lexer::{Cursor, is_word_char};
use crate::value::parse_value_at;

/// Parse `[a, b, ...]` (brackets optional) into its elements.
pub fn parse_array(text: &str, options: &ParserOptions) -> Vec<Value> {
    let raw = text.trim();
    let inner = match raw.strip_prefix('[') {
        Some(rest) => rest.strip_suffix(']').unwrap_or(rest),
        None => raw,
    };
    array_items(inner, 0, options)
}

/// Parse `key: value, "key" => value, :key => value` (braces optional).
pub fn parse_hash(text: &str, options: &ParserOptions) -> Options {
    let raw = text.trim();
    let inner = match raw.strip_prefix('{') {
        Some(rest) => rest.strip_suffix('}').unwrap_or(rest),
        None => raw,
    };
    hash_entries(inner, 0, options)
}

fn skip_separators(cursor: &mut Cursor<'_>) {
    cursor.eat_while(|c| c.is_whitespace() || c == ',');
}

pub(crate) fn array_items(inner: &str, depth: usize, options: &ParserOptions) -> Vec<Value> {
    let mut items = Vec::new();
    let mut cursor = Cursor::new(inner);

    loop {
        skip_separators(&mut cursor);
        if cursor.is_eof() {
            break;
        }
        let Some(literal) = parse_value_at(inner, cursor.pos(), depth, options) else {
            tracing::debug!(rest = cursor.rest(), "array truncated at unparsable element");
            break;
        };
        cursor = Cursor::at(inner, literal.end);

        let keep = match options.array_filter {
            ArrayFilter::Present => true,
            ArrayFilter::LegacyTruthy => literal.value.is_legacy_truthy(),
        };
        if keep {
            items.push(literal.value);
        }
    }
    items
}

pub(crate) fn hash_entries(inner: &str, depth: usize, options: &ParserOptions) -> Options {
    let mut entries = Options::new();
    let mut cursor = Cursor::new(inner);

    loop {
        skip_separators(&mut cursor);
        if cursor.is_eof() {
            break;
        }
        let Some(key) = hash_key(&mut cursor) else {
            tracing::debug!(rest = cursor.rest(), "option hash truncated at unparsable key");
            break;
        };
        let Some(literal) = parse_value_at(inner, cursor.pos(), depth, options) else {
            tracing::debug!(key, rest = cursor.rest(), "option hash truncated at unparsable value");
            break;
        };
        entries.insert(key.to_string(), literal.value);
        cursor = Cursor::at(inner, literal.end);
    }
    entries
}

/// `"name" =>`, `'name' =>`, `:name =>` or `name:`. On success the cursor
/// sits at the start of the value.
fn hash_key<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    let start = *cursor;
    let key = match cursor.peek()? {
        quote @ ('"' | '\'') => {
            cursor.bump();
            let name = cursor.eat_while(|c| c != quote);
            (cursor.eat_char(quote) && rocket(cursor)).then_some(name)
        }
        ':' => {
            cursor.bump();
            let name = cursor.eat_while(is_word_char);
            (!name.is_empty() && rocket(cursor)).then_some(name)
        }
        _ => {
            let name = cursor.eat_while(is_word_char);
            let labelled = !name.is_empty() && cursor.eat_char(':') && cursor.peek() != Some(':');
            labelled.then(|| {
                cursor.skip_whitespace();
                name
            })
        }
    };
    if key.is_none() {
        *cursor = start;
    }
    key
}

/// `\s*=>\s*`
fn rocket(cursor: &mut Cursor<'_>) -> bool {
    cursor.skip_whitespace();
    if !cursor.eat("=>") {
        return false;
    }
    cursor.skip_whitespace();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Keyword;

    fn num(s: &str) -> Value {
        Value::Numeric(s.into())
    }

    fn hash(text: &str) -> Options {
        parse_hash(text, &ParserOptions::default())
    }

    #[test]
    fn test_parse_hash_mixed_values() {
        let h = hash(r#"a: 1, b: "two", c: [1, 2, 3]"#);
        assert_eq!(h.len(), 3);
        assert_eq!(h["a"], num("1"));
        assert_eq!(h["b"], Value::Str("two".into()));
        assert_eq!(h["c"], Value::Array(vec![num("1"), num("2"), num("3")]));
        let keys: Vec<&str> = h.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_hash_key_syntaxes() {
        let h = hash(r#"{"name" => "idx", :unique => true, 'where' => "x > 1", order: { a: :desc }}"#);
        assert_eq!(h["name"], Value::Str("idx".into()));
        assert_eq!(h["unique"], Value::Keyword(Keyword::True));
        assert_eq!(h["where"], Value::Str("x > 1".into()));
        assert_eq!(h["order"].to_string(), "{a: desc}");
    }

    #[test]
    fn test_parse_hash_truncates_at_first_failure() {
        let h = hash("limit: 8, # trailing comment, null: false");
        assert_eq!(h.len(), 1);
        assert_eq!(h["limit"], num("8"));

        let h = hash("a: 1, b: , c: 3");
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_parse_hash_keeps_falsy_values() {
        let h = hash(r#"default: "", null: false, precision: 0, other: nil"#);
        assert_eq!(h.len(), 4);
        assert_eq!(h["default"], Value::Str(String::new()));
        assert_eq!(h["other"], Value::Keyword(Keyword::Nil));
    }

    #[test]
    fn test_parse_hash_duplicate_key_keeps_position() {
        let h = hash("a: 1, b: 2, a: 3");
        let keys: Vec<&str> = h.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(h["a"], num("3"));
    }

    #[test]
    fn test_parse_hash_empty() {
        assert!(hash("").is_empty());
        assert!(hash("   ").is_empty());
        assert!(hash("{}").is_empty());
    }

    #[test]
    fn test_symbol_value_after_label() {
        let h = hash("force: :cascade, id: :uuid");
        assert_eq!(h["force"], Value::Symbol("cascade".into()));
        assert_eq!(h["id"], Value::Symbol("uuid".into()));
    }

    #[test]
    fn test_parse_array() {
        let opts = ParserOptions::default();
        assert_eq!(
            parse_array(r#"["user_id", "created_at"]"#, &opts),
            vec![Value::Str("user_id".into()), Value::Str("created_at".into())]
        );
        assert_eq!(parse_array("1, 2", &opts), vec![num("1"), num("2")]);
        assert_eq!(
            parse_array("[[1, 2], [3]]", &opts),
            vec![
                Value::Array(vec![num("1"), num("2")]),
                Value::Array(vec![num("3")]),
            ]
        );
    }

    #[test]
    fn test_parse_array_present_vs_legacy() {
        let text = r#"["", 0, false, nil, "a"]"#;
        let present = parse_array(text, &ParserOptions::default());
        assert_eq!(present.len(), 5);

        let legacy = ParserOptions {
            array_filter: ArrayFilter::LegacyTruthy,
            ..Default::default()
        };
        assert_eq!(parse_array(text, &legacy), vec![Value::Str("a".into())]);
    }

    #[test]
    fn test_parse_array_stops_at_unparsable() {
        let opts = ParserOptions::default();
        assert_eq!(parse_array(r#"["a", "b, "#, &opts).len(), 1);
    }
}
