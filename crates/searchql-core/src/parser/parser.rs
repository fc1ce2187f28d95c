//! Recursive-descent parser, one function per precedence tier.

use super::error::ParseError;
use super::pratt::starts_expression;
use crate::ast::{AstNode, BooleanOp, UnaryOp, ValueNode};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::position::Position;

/// Parses one query string into a best-effort [`AstNode`] plus whatever
/// [`ParseError`]s it collected along the way. Never panics on malformed
/// input; a token the grammar doesn't expect is reported and skipped.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let mut errors = Vec::new();
        let current = Self::pull(&mut lexer, &mut errors);
        Self {
            lexer,
            current,
            errors,
        }
    }

    /// Parses the whole input. Always returns a tree, even for completely
    /// empty or garbage input, alongside any errors accumulated.
    pub fn parse(mut self) -> (AstNode, Vec<ParseError>) {
        let node = self.parse_or();
        if self.current.kind != TokenKind::Eof {
            let message = format!("unexpected trailing input {:?}", self.current.lexeme);
            self.push_error(message, self.current.position);
        }
        (node, self.errors)
    }

    fn pull(lexer: &mut Lexer<'a>, errors: &mut Vec<ParseError>) -> Token {
        match lexer.next_token_checked() {
            Ok(token) => token,
            Err(err) => {
                errors.push(ParseError::new(err.message, err.position));
                Token::new(TokenKind::Illegal, "", err.position)
            }
        }
    }

    fn advance(&mut self) -> Token {
        let next = Self::pull(&mut self.lexer, &mut self.errors);
        std::mem::replace(&mut self.current, next)
    }

    fn push_error(&mut self, message: impl Into<String>, position: Position) {
        self.errors.push(ParseError::new(message, position));
    }

    // Tier 1 (lowest): `OR`, plus the implicit `OR` between adjacent
    // clauses with no explicit operator between them.
    fn parse_or(&mut self) -> AstNode {
        let mut left = self.parse_and();
        loop {
            if self.current.kind == TokenKind::Or {
                let position = self.current.position;
                self.advance();
                let right = self.parse_and();
                left = AstNode::BinaryOp {
                    op: BooleanOp::Or,
                    left: Box::new(left),
                    right: Box::new(right),
                    position,
                };
            } else if starts_expression(&self.current.kind) {
                let position = self.current.position;
                let right = self.parse_and();
                left = AstNode::BinaryOp {
                    op: BooleanOp::Or,
                    left: Box::new(left),
                    right: Box::new(right),
                    position,
                };
            } else {
                break;
            }
        }
        left
    }

    // Tier 2: `AND`.
    fn parse_and(&mut self) -> AstNode {
        let mut left = self.parse_not();
        while self.current.kind == TokenKind::And {
            let position = self.current.position;
            self.advance();
            let right = self.parse_not();
            left = AstNode::BinaryOp {
                op: BooleanOp::And,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        left
    }

    // Tier 3: prefix `NOT` / `!`.
    fn parse_not(&mut self) -> AstNode {
        if self.current.kind == TokenKind::Not {
            let position = self.current.position;
            self.advance();
            let operand = self.parse_not();
            return AstNode::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                position,
            };
        }
        self.parse_required_prohibited()
    }

    // Tier 4: prefix `+` / `-`.
    fn parse_required_prohibited(&mut self) -> AstNode {
        match self.current.kind {
            TokenKind::Plus => {
                let position = self.current.position;
                self.advance();
                let query = Box::new(self.parse_required_prohibited());
                AstNode::RequiredQuery { query, position }
            }
            TokenKind::Minus => {
                let position = self.current.position;
                self.advance();
                let query = Box::new(self.parse_required_prohibited());
                AstNode::ProhibitedQuery { query, position }
            }
            _ => self.parse_field_level(),
        }
    }

    // Tier 5/6: a primary, then any trailing `:value`, `~N`, `^N` suffixes.
    fn parse_field_level(&mut self) -> AstNode {
        let node = self.parse_primary();
        self.parse_suffixes(node)
    }

    fn parse_primary(&mut self) -> AstNode {
        match self.current.kind {
            TokenKind::LParen => self.parse_group(),
            TokenKind::LBracket | TokenKind::LBrace => self.parse_range_tail(None),
            TokenKind::Exists => self.parse_exists(),
            TokenKind::QuotedString => self.parse_phrase(),
            TokenKind::Number => self.parse_bare_number(),
            TokenKind::Wildcard => self.parse_bare_wildcard(),
            TokenKind::String => self.parse_string_primary(),
            _ => self.parse_error_primary(),
        }
    }

    fn parse_group(&mut self) -> AstNode {
        let position = self.current.position;
        self.advance(); // '('
        let inner = self.parse_or();
        self.expect(TokenKind::RParen, "expected ')'");
        AstNode::GroupQuery {
            query: Box::new(inner),
            position,
        }
    }

    fn parse_exists(&mut self) -> AstNode {
        let position = self.current.position;
        self.advance(); // '_exists_'
        self.expect(TokenKind::Colon, "expected ':' after _exists_");
        let field = self.expect_field_name();
        AstNode::ExistsQuery { field, position }
    }

    fn parse_phrase(&mut self) -> AstNode {
        let position = self.current.position;
        let phrase = self.current.lexeme.clone();
        self.advance();
        AstNode::PhraseQuery { phrase, position }
    }

    fn parse_bare_number(&mut self) -> AstNode {
        let position = self.current.position;
        let term = self.current.lexeme.clone();
        self.advance();
        AstNode::TermQuery { term, position }
    }

    fn parse_bare_wildcard(&mut self) -> AstNode {
        let position = self.current.position;
        let pattern = self.current.lexeme.clone();
        self.advance();
        AstNode::WildcardQuery { pattern, position }
    }

    fn parse_string_primary(&mut self) -> AstNode {
        let position = self.current.position;
        let text = self.current.lexeme.clone();
        self.advance();
        if self.current.kind == TokenKind::Colon {
            self.advance(); // ':'
            return self.parse_field_tail(text, position);
        }
        AstNode::TermQuery {
            term: text,
            position,
        }
    }

    fn parse_field_tail(&mut self, field: String, position: Position) -> AstNode {
        match self.current.kind {
            TokenKind::LParen => self.parse_field_group(field, position),
            TokenKind::LBracket | TokenKind::LBrace => self.parse_range_tail(Some(field)),
            TokenKind::Gt | TokenKind::Gte | TokenKind::Lt | TokenKind::Lte => {
                self.parse_comparison(Some(field), position)
            }
            _ => {
                let value = self.parse_value_node();
                AstNode::FieldQuery {
                    field,
                    value,
                    position,
                }
            }
        }
    }

    fn parse_field_group(&mut self, field: String, position: Position) -> AstNode {
        self.advance(); // '('
        let queries = if self.current.kind == TokenKind::RParen {
            Vec::new()
        } else {
            flatten_or(self.parse_or())
        };
        self.expect(TokenKind::RParen, "expected ')' to close field group");
        AstNode::FieldGroupQuery {
            field,
            queries,
            position,
        }
    }

    fn parse_comparison(&mut self, field: Option<String>, position: Position) -> AstNode {
        let op = self.current.kind.clone();
        self.advance();
        let bound = self.parse_value_node();
        let (start, end, inclusive_start, inclusive_end) = match op {
            TokenKind::Gt => (bound, ValueNode::open(), false, false),
            TokenKind::Gte => (bound, ValueNode::open(), true, false),
            TokenKind::Lt => (ValueNode::open(), bound, false, false),
            TokenKind::Lte => (ValueNode::open(), bound, false, true),
            _ => unreachable!("caller only dispatches comparison tokens"),
        };
        AstNode::RangeQuery {
            field,
            start,
            end,
            inclusive_start,
            inclusive_end,
            position,
        }
    }

    fn parse_range_tail(&mut self, field: Option<String>) -> AstNode {
        let position = self.current.position;
        let inclusive_start = self.current.kind == TokenKind::LBracket;
        self.advance(); // '[' or '{'
        let start = self.parse_value_node();
        if self.current.kind == TokenKind::To {
            self.advance();
        } else {
            self.push_error("expected TO in range", self.current.position);
        }
        let end = self.parse_value_node();
        let inclusive_end = match self.current.kind {
            TokenKind::RBracket => {
                self.advance();
                true
            }
            TokenKind::RBrace => {
                self.advance();
                false
            }
            _ => {
                self.push_error("expected ']' or '}' to close range", self.current.position);
                false
            }
        };
        AstNode::RangeQuery {
            field,
            start,
            end,
            inclusive_start,
            inclusive_end,
            position,
        }
    }

    fn parse_value_node(&mut self) -> ValueNode {
        let token = self.current.clone();
        match token.kind {
            TokenKind::QuotedString => {
                self.advance();
                ValueNode::Phrase(token.lexeme)
            }
            TokenKind::Wildcard => {
                self.advance();
                ValueNode::Wildcard(token.lexeme)
            }
            TokenKind::Regex => {
                self.advance();
                ValueNode::Regex(token.lexeme)
            }
            TokenKind::Number => {
                self.advance();
                ValueNode::Number(token.lexeme)
            }
            TokenKind::String => {
                self.advance();
                ValueNode::Term(token.lexeme)
            }
            _ => {
                self.push_error("expected a value", token.position);
                ValueNode::Term(String::new())
            }
        }
    }

    fn parse_suffixes(&mut self, node: AstNode) -> AstNode {
        match self.current.kind {
            TokenKind::Tilde => {
                let node = self.apply_fuzzy_or_proximity(node);
                if self.current.kind == TokenKind::Caret {
                    self.push_error(
                        "a boost cannot follow a fuzzy/proximity suffix on the same clause",
                        self.current.position,
                    );
                    self.skip_suffix();
                }
                node
            }
            TokenKind::Caret => {
                let node = self.apply_boost(node);
                if self.current.kind == TokenKind::Tilde {
                    self.push_error(
                        "a fuzzy/proximity suffix cannot follow a boost on the same clause",
                        self.current.position,
                    );
                    self.skip_suffix();
                }
                node
            }
            _ => node,
        }
    }

    /// Error recovery after rejecting a stacked `^`/`~` suffix: consume the
    /// operator and its numeric argument (if any) so parsing can continue
    /// past the malformed clause.
    fn skip_suffix(&mut self) {
        self.advance(); // '^' or '~'
        if self.current.kind == TokenKind::Number {
            self.advance();
        }
    }

    fn apply_fuzzy_or_proximity(&mut self, node: AstNode) -> AstNode {
        let position = self.current.position;
        self.advance(); // '~'
        let distance = if self.current.kind == TokenKind::Number {
            let parsed = self.current.lexeme.parse().unwrap_or(2);
            self.advance();
            parsed
        } else {
            2
        };
        match node {
            AstNode::TermQuery { term, .. } => AstNode::FuzzyQuery {
                field: None,
                term,
                distance,
                position,
            },
            AstNode::PhraseQuery { phrase, .. } => AstNode::ProximityQuery {
                field: None,
                phrase,
                distance,
                position,
            },
            AstNode::FieldQuery {
                field,
                value,
                position: field_position,
            } => match value {
                ValueNode::Term(term) => AstNode::FuzzyQuery {
                    field: Some(field),
                    term,
                    distance,
                    position: field_position,
                },
                ValueNode::Phrase(phrase) => AstNode::ProximityQuery {
                    field: Some(field),
                    phrase,
                    distance,
                    position: field_position,
                },
                other => {
                    self.push_error(
                        "fuzzy/proximity requires a term or phrase value",
                        field_position,
                    );
                    AstNode::FieldQuery {
                        field,
                        value: other,
                        position: field_position,
                    }
                }
            },
            other => {
                self.push_error(
                    "'~' can only follow a term, phrase, or field value",
                    position,
                );
                other
            }
        }
    }

    fn apply_boost(&mut self, node: AstNode) -> AstNode {
        let position = self.current.position;
        self.advance(); // '^'
        let boost = if self.current.kind == TokenKind::Number {
            let parsed = self.current.lexeme.parse().unwrap_or(1.0);
            self.advance();
            parsed
        } else {
            self.push_error("expected a number after '^'", position);
            1.0
        };
        AstNode::BoostQuery {
            query: Box::new(node),
            boost,
            position,
        }
    }

    fn parse_error_primary(&mut self) -> AstNode {
        let position = self.current.position;
        let message = format!("unexpected token {:?}", self.current.lexeme);
        self.push_error(message, position);
        if self.current.kind != TokenKind::Eof {
            self.advance();
        }
        AstNode::TermQuery {
            term: String::new(),
            position,
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) {
        if self.current.kind == kind {
            self.advance();
        } else {
            self.push_error(message, self.current.position);
        }
    }

    fn expect_field_name(&mut self) -> String {
        if self.current.kind == TokenKind::String {
            let name = self.current.lexeme.clone();
            self.advance();
            name
        } else {
            self.push_error("expected a field name", self.current.position);
            String::new()
        }
    }
}

/// Flattens a chain of top-level `OR` nodes into a flat list, leaving any
/// non-`OR` node (including a nested `AND` chain) as a single entry. See
/// `FieldGroupQuery` construction notes.
fn flatten_or(node: AstNode) -> Vec<AstNode> {
    match node {
        AstNode::BinaryOp {
            op: BooleanOp::Or,
            left,
            right,
            ..
        } => {
            let mut out = flatten_or(*left);
            out.extend(flatten_or(*right));
            out
        }
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> (AstNode, Vec<ParseError>) {
        Parser::new(input).parse()
    }

    #[test]
    fn bare_term_targets_default_field() {
        let (node, errors) = parse("laptop");
        assert!(errors.is_empty());
        assert!(matches!(node, AstNode::TermQuery { term, .. } if term == "laptop"));
    }

    #[test]
    fn field_query() {
        let (node, errors) = parse("status:active");
        assert!(errors.is_empty());
        match node {
            AstNode::FieldQuery { field, value, .. } => {
                assert_eq!(field, "status");
                assert_eq!(value, ValueNode::Term("active".into()));
            }
            other => panic!("expected FieldQuery, got {other:?}"),
        }
    }

    #[test]
    fn implicit_or_joins_adjacent_clauses() {
        let (node, errors) = parse("laptop \"gaming pc\"");
        assert!(errors.is_empty());
        match node {
            AstNode::BinaryOp { op, left, right, .. } => {
                assert_eq!(op, BooleanOp::Or);
                assert!(matches!(*left, AstNode::TermQuery { .. }));
                assert!(matches!(*right, AstNode::PhraseQuery { .. }));
            }
            other => panic!("expected implicit OR, got {other:?}"),
        }
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let (node, errors) = parse("a OR b AND c");
        assert!(errors.is_empty());
        match node {
            AstNode::BinaryOp {
                op: BooleanOp::Or,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, AstNode::TermQuery { .. }));
                assert!(matches!(*right, AstNode::BinaryOp { op: BooleanOp::And, .. }));
            }
            other => panic!("expected top-level OR, got {other:?}"),
        }
    }

    #[test]
    fn required_and_prohibited_join_by_implicit_or_without_explicit_operator() {
        let (node, errors) = parse("+a -b");
        assert!(errors.is_empty());
        match node {
            AstNode::BinaryOp { op: BooleanOp::Or, left, right, .. } => {
                assert!(matches!(*left, AstNode::RequiredQuery { .. }));
                assert!(matches!(*right, AstNode::ProhibitedQuery { .. }));
            }
            other => panic!("expected implicit OR of +/-, got {other:?}"),
        }
    }

    #[test]
    fn not_prefix() {
        let (node, errors) = parse("NOT active");
        assert!(errors.is_empty());
        assert!(matches!(node, AstNode::UnaryOp { op: UnaryOp::Not, .. }));
    }

    #[test]
    fn range_inclusive_and_exclusive() {
        let (node, errors) = parse("price:[50 TO 500]");
        assert!(errors.is_empty());
        match node {
            AstNode::RangeQuery {
                field,
                inclusive_start,
                inclusive_end,
                ..
            } => {
                assert_eq!(field.as_deref(), Some("price"));
                assert!(inclusive_start);
                assert!(inclusive_end);
            }
            other => panic!("expected RangeQuery, got {other:?}"),
        }

        let (node, _) = parse("price:{50 TO 500}");
        match node {
            AstNode::RangeQuery {
                inclusive_start,
                inclusive_end,
                ..
            } => {
                assert!(!inclusive_start);
                assert!(!inclusive_end);
            }
            other => panic!("expected RangeQuery, got {other:?}"),
        }
    }

    #[test]
    fn standalone_range_has_no_field() {
        let (node, errors) = parse("[50 TO 500]");
        assert!(errors.is_empty());
        assert!(matches!(node, AstNode::RangeQuery { field: None, .. }));
    }

    #[test]
    fn comparison_operators_synthesise_open_ranges() {
        let (node, errors) = parse("price:>100");
        assert!(errors.is_empty());
        match node {
            AstNode::RangeQuery {
                start,
                end,
                inclusive_start,
                ..
            } => {
                assert_eq!(start, ValueNode::Number("100".into()));
                assert!(!inclusive_start);
                assert!(end.is_open());
            }
            other => panic!("expected RangeQuery, got {other:?}"),
        }
    }

    #[test]
    fn fuzzy_and_proximity_suffixes() {
        let (node, errors) = parse("laptop~2");
        assert!(errors.is_empty());
        assert!(matches!(node, AstNode::FuzzyQuery { distance: 2, .. }));

        let (node, errors) = parse("\"gaming pc\"~3");
        assert!(errors.is_empty());
        assert!(matches!(node, AstNode::ProximityQuery { distance: 3, .. }));
    }

    #[test]
    fn fuzzy_without_distance_defaults_to_two() {
        let (node, errors) = parse("laptop~");
        assert!(errors.is_empty());
        assert!(matches!(node, AstNode::FuzzyQuery { distance: 2, .. }));
    }

    #[test]
    fn boost_suffix() {
        let (node, errors) = parse("laptop^2.5");
        assert!(errors.is_empty());
        match node {
            AstNode::BoostQuery { boost, .. } => assert!((boost - 2.5).abs() < f64::EPSILON),
            other => panic!("expected BoostQuery, got {other:?}"),
        }
    }

    #[test]
    fn boost_after_fuzzy_is_rejected() {
        let (node, errors) = parse("laptop~2^3");
        assert!(!errors.is_empty());
        assert!(matches!(node, AstNode::FuzzyQuery { .. }));
    }

    #[test]
    fn exists_query() {
        let (node, errors) = parse("_exists_:email");
        assert!(errors.is_empty());
        assert!(matches!(node, AstNode::ExistsQuery { field, .. } if field == "email"));
    }

    #[test]
    fn field_group_flattens_or_but_keeps_and_nested() {
        let (node, errors) = parse("status:(active OR pending)");
        assert!(errors.is_empty());
        match node {
            AstNode::FieldGroupQuery { queries, .. } => assert_eq!(queries.len(), 2),
            other => panic!("expected FieldGroupQuery, got {other:?}"),
        }

        let (node, errors) = parse("status:(a AND b OR c)");
        assert!(errors.is_empty());
        match node {
            AstNode::FieldGroupQuery { queries, .. } => {
                assert_eq!(queries.len(), 2);
                assert!(queries[0].is_binary_op());
            }
            other => panic!("expected FieldGroupQuery, got {other:?}"),
        }
    }

    #[test]
    fn grouped_expression() {
        let (node, errors) = parse("(a OR b) AND c");
        assert!(errors.is_empty());
        match node {
            AstNode::BinaryOp { op: BooleanOp::And, left, .. } => {
                assert!(matches!(*left, AstNode::GroupQuery { .. }));
            }
            other => panic!("expected top-level AND, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_group_is_reported_but_tree_still_returned() {
        let (_, errors) = parse("(a OR b");
        assert!(!errors.is_empty());
    }

    #[test]
    fn illegal_token_is_skipped_and_reported() {
        let (_, errors) = parse("a ; b");
        assert!(!errors.is_empty());
    }

    #[test]
    fn empty_input_reports_an_error() {
        let (_, errors) = parse("");
        assert!(!errors.is_empty());
    }
}
