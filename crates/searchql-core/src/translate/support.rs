//! Rendering helpers shared by every dialect: parameter bookkeeping,
//! parenthesisation, and the Lucene-wildcard-to-dialect-pattern mappings.

use serde_json::Value;

use crate::ast::AstNode;
use crate::schema::FieldType;

/// Pushes `value` onto the parameter buffers, tagging it with the source
/// field's type, and returns its 1-based position (used by PG for `$N`;
/// MySQL/SQLite ignore the position and always emit `?`).
pub(super) fn push_param(
    parameters: &mut Vec<Value>,
    parameter_types: &mut Vec<String>,
    value: impl Into<String>,
    field_type: FieldType,
) -> usize {
    parameters.push(Value::String(value.into()));
    parameter_types.push(field_type.as_str().to_string());
    parameters.len()
}

/// `*` -> `%`, `?` -> `_`, for `LIKE`-family clauses.
pub(super) fn wildcard_to_like(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '*' => '%',
            '?' => '_',
            other => other,
        })
        .collect()
}

/// `*` -> `.*`, `?` -> `.`, other regex metacharacters escaped, anchored
/// with `^…$` (spec.md §4.4, scenario 7: `13*` -> `^13.*$`).
pub(super) fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('^');
    for c in pattern.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            other => out.push(other),
        }
    }
    out.push('$');
    out
}

/// True when `node`, rendered as the operand of a `BinaryOp`, must be
/// wrapped in parentheses. A `GroupQuery`/`RequiredQuery` is transparent
/// for this purpose: parentheses come from what it wraps, not from the
/// wrapper itself.
pub(super) fn needs_parens(node: &AstNode) -> bool {
    match node {
        AstNode::BinaryOp { .. } => true,
        AstNode::GroupQuery { query, .. } | AstNode::RequiredQuery { query, .. } => {
            needs_parens(query)
        }
        _ => false,
    }
}
