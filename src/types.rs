//! Rails column type to display type mapping.

use crate::ast::FieldDefinition;

/// MySQL-flavoured type string for a field, e.g. `varchar(255)` or
/// `int(11) unsigned`.
pub fn display_type(field: &FieldDefinition) -> String {
    match field.typ.as_str() {
        "integer" | "float" | "decimal" | "text" | "string" => sized_type(field),
        "boolean" => "tinyint(1)".to_string(),
        "primary_key" => "bigint(20)".to_string(),
        other => other.to_string(),
    }
}

fn sized_type(field: &FieldDefinition) -> String {
    let base = if field.typ == "string" { "varchar" } else { field.typ.as_str() };
    let bytes = field
        .option("limit")
        .and_then(|v| leading_int(&v.to_string()))
        .filter(|n| *n != 0)
        .or((field.typ == "string").then_some(255));
    let size = field.option("size").map(|v| v.to_string()).unwrap_or_default();
    let unsigned = field.option("unsigned").is_some_and(|v| v.is_truthy());

    let mut out = format!("{}{}", size, base);
    if let Some(bytes) = bytes {
        out.push_str(&format!("({})", bytes));
    }
    if unsigned {
        out.push_str(" unsigned");
    }
    out
}

/// Integer prefix of `s` after optional whitespace and sign, like `parseInt`.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
