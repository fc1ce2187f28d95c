//! Value nodes: the narrower AST kind appearing as the value side of a
//! field query or a range bound.

/// The value side of a `FieldQuery` or the bound of a `RangeQuery`.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    /// A bare term, e.g. the `active` in `status:active`.
    Term(String),
    /// A quoted phrase.
    Phrase(String),
    /// A pattern containing `*`/`?`.
    Wildcard(String),
    /// A `/.../ ` regular expression (slashes already stripped).
    Regex(String),
    /// A numeric literal, kept as the original text.
    Number(String),
}

impl ValueNode {
    /// The raw source text carried by this value, regardless of kind.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Term(s) | Self::Phrase(s) | Self::Wildcard(s) | Self::Regex(s) | Self::Number(s) => {
                s
            }
        }
    }

    /// The sentinel open bound used in ranges and comparison operators.
    #[must_use]
    pub fn open() -> Self {
        Self::Term("*".to_string())
    }

    /// True for the `*` open-bound sentinel, whichever variant carries it
    /// — a bare `*` lexes as a `WILDCARD` token, not a plain term, so this
    /// checks the underlying value text rather than matching on `Term`.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.value() == "*"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_extracts_raw_text() {
        assert_eq!(ValueNode::Term("x".into()).value(), "x");
        assert_eq!(ValueNode::Wildcard("x*".into()).value(), "x*");
    }

    #[test]
    fn open_sentinel_round_trips() {
        assert!(ValueNode::open().is_open());
        assert!(!ValueNode::Term("y".into()).is_open());
    }
}
