//! The query abstract syntax tree.

use super::value::ValueNode;
use crate::position::Position;

/// `AND`/`OR` as produced by [`AstNode::BinaryOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
}

impl BooleanOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// The operator carried by [`AstNode::UnaryOp`].
///
/// `+`/`-` prefixes are modeled by the dedicated `RequiredQuery` /
/// `ProhibitedQuery` variants rather than by this operator, so in practice
/// the parser only ever constructs `UnaryOp { op: UnaryOp::Not, .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

impl UnaryOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Not => "NOT",
        }
    }
}

/// A node in the query AST. Every variant carries the [`Position`] of the
/// token that introduced it, for diagnostics only.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// A bare term targeting the schema's default field.
    TermQuery { term: String, position: Position },
    /// A bare quoted phrase targeting the default field.
    PhraseQuery { phrase: String, position: Position },
    /// A bare wildcard targeting the default field.
    WildcardQuery { pattern: String, position: Position },
    /// `field:value`.
    FieldQuery {
        field: String,
        value: ValueNode,
        position: Position,
    },
    /// `field:(a OR b ...)`.
    FieldGroupQuery {
        field: String,
        queries: Vec<AstNode>,
        position: Position,
    },
    /// A bracketed range, or a comparison operator encoded with an open
    /// (`*`) bound on one side. `field` is `None` for a standalone range
    /// (`[50 TO 500]` with no preceding `field:`).
    RangeQuery {
        field: Option<String>,
        start: ValueNode,
        end: ValueNode,
        inclusive_start: bool,
        inclusive_end: bool,
        position: Position,
    },
    /// `term~N`.
    FuzzyQuery {
        field: Option<String>,
        term: String,
        distance: u32,
        position: Position,
    },
    /// `"phrase"~N`.
    ProximityQuery {
        field: Option<String>,
        phrase: String,
        distance: u32,
        position: Position,
    },
    /// `_exists_:field`.
    ExistsQuery { field: String, position: Position },
    /// `expr^N`.
    BoostQuery {
        query: Box<AstNode>,
        boost: f64,
        position: Position,
    },
    /// A parenthesized grouping.
    GroupQuery {
        query: Box<AstNode>,
        position: Position,
    },
    /// `+expr`.
    RequiredQuery {
        query: Box<AstNode>,
        position: Position,
    },
    /// `-expr`.
    ProhibitedQuery {
        query: Box<AstNode>,
        position: Position,
    },
    /// `left AND right` / `left OR right`.
    BinaryOp {
        op: BooleanOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        position: Position,
    },
    /// `NOT operand` / `!operand`.
    UnaryOp {
        op: UnaryOp,
        operand: Box<AstNode>,
        position: Position,
    },
}

impl AstNode {
    /// The source position this node was built from.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::TermQuery { position, .. }
            | Self::PhraseQuery { position, .. }
            | Self::WildcardQuery { position, .. }
            | Self::FieldQuery { position, .. }
            | Self::FieldGroupQuery { position, .. }
            | Self::RangeQuery { position, .. }
            | Self::FuzzyQuery { position, .. }
            | Self::ProximityQuery { position, .. }
            | Self::ExistsQuery { position, .. }
            | Self::BoostQuery { position, .. }
            | Self::GroupQuery { position, .. }
            | Self::RequiredQuery { position, .. }
            | Self::ProhibitedQuery { position, .. }
            | Self::BinaryOp { position, .. }
            | Self::UnaryOp { position, .. } => *position,
        }
    }

    /// A short, stable name for the node variant, used in boost metadata
    /// (`snake_case(inner.type)` in the spec's vocabulary).
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::TermQuery { .. } => "term_query",
            Self::PhraseQuery { .. } => "phrase_query",
            Self::WildcardQuery { .. } => "wildcard_query",
            Self::FieldQuery { .. } => "field_query",
            Self::FieldGroupQuery { .. } => "field_group_query",
            Self::RangeQuery { .. } => "range_query",
            Self::FuzzyQuery { .. } => "fuzzy_query",
            Self::ProximityQuery { .. } => "proximity_query",
            Self::ExistsQuery { .. } => "exists_query",
            Self::BoostQuery { .. } => "boost_query",
            Self::GroupQuery { .. } => "group_query",
            Self::RequiredQuery { .. } => "required_query",
            Self::ProhibitedQuery { .. } => "prohibited_query",
            Self::BinaryOp { .. } => "binary_op",
            Self::UnaryOp { .. } => "unary_op",
        }
    }

    /// True for nodes the translators must wrap in parentheses when they
    /// appear as a child of another `BinaryOp` (spec §6: parentheses appear
    /// only around nested binary operands).
    #[must_use]
    pub fn is_binary_op(&self) -> bool {
        matches!(self, Self::BinaryOp { .. })
    }
}
