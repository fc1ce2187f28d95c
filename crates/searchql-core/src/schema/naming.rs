//! Deterministic mapping from a logical field name to a physical column
//! when the schema declares no explicit `column` override.

use serde::{Deserialize, Serialize};

/// How a logical field name is turned into a physical column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingConvention {
    SnakeCase,
    CamelCase,
    PascalCase,
    None,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::SnakeCase
    }
}

/// Converts `name` to a physical column name under `convention`.
///
/// Runs of uppercase letters are treated as a single word boundary
/// ("HTTPServer" -> "http_server"), digit runs are preserved as their own
/// word, and repeated separators (`-`, `_`, space) collapse to one
/// boundary.
#[must_use]
pub fn convert(name: &str, convention: NamingConvention) -> String {
    if convention == NamingConvention::None {
        return name.to_string();
    }
    let words = split_words(name);
    match convention {
        NamingConvention::SnakeCase => words
            .iter()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join("_"),
        NamingConvention::CamelCase => words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
            .collect::<Vec<_>>()
            .join(""),
        NamingConvention::PascalCase => {
            words.iter().map(|w| capitalize(w)).collect::<Vec<_>>().join("")
        }
        NamingConvention::None => unreachable!(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

/// Splits a logical name into words on separators and on case/digit
/// transitions.
fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let n = chars.len();
    let mut words = Vec::new();
    let mut current = String::new();

    for i in 0..n {
        let c = chars[i];
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if i > 0 && !current.is_empty() {
            let prev = chars[i - 1];
            if is_boundary(prev, c, chars.get(i + 1).copied()) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// True when a word boundary belongs between `prev` and `current`.
fn is_boundary(prev: char, current: char, next: Option<char>) -> bool {
    // lower/digit -> upper: "fooBar" | "foo2Bar"
    if (prev.is_ascii_lowercase() || prev.is_ascii_digit()) && current.is_ascii_uppercase() {
        return true;
    }
    // acronym run followed by a new titlecase word: "HTTPServer" -> "HTTP" | "Server"
    if prev.is_ascii_uppercase()
        && current.is_ascii_uppercase()
        && next.is_some_and(|n| n.is_ascii_lowercase())
    {
        return true;
    }
    // letter <-> digit transitions, either direction
    if prev.is_ascii_alphabetic() && current.is_ascii_digit() {
        return true;
    }
    if prev.is_ascii_digit() && current.is_ascii_alphabetic() {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_handles_acronym_runs() {
        assert_eq!(convert("HTTPServer", NamingConvention::SnakeCase), "http_server");
    }

    #[test]
    fn snake_case_preserves_digits() {
        assert_eq!(convert("field2Name", NamingConvention::SnakeCase), "field_2_name");
        assert_eq!(convert("rodLength", NamingConvention::SnakeCase), "rod_length");
    }

    #[test]
    fn snake_case_collapses_repeated_separators() {
        assert_eq!(convert("foo--bar__baz", NamingConvention::SnakeCase), "foo_bar_baz");
        assert_eq!(convert("foo  bar", NamingConvention::SnakeCase), "foo_bar");
    }

    #[test]
    fn camel_case_lowercases_first_word_only() {
        assert_eq!(convert("product_code", NamingConvention::CamelCase), "productCode");
    }

    #[test]
    fn pascal_case_capitalizes_every_word() {
        assert_eq!(convert("product_code", NamingConvention::PascalCase), "ProductCode");
    }

    #[test]
    fn none_passes_through_verbatim() {
        assert_eq!(convert("Weird_Name", NamingConvention::None), "Weird_Name");
    }

    #[test]
    fn already_snake_case_is_unchanged() {
        assert_eq!(convert("product_code", NamingConvention::SnakeCase), "product_code");
    }
}
