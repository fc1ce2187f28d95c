//! AST-to-dialect translators (spec.md §4.4).

mod document;
mod error;
mod mysql;
mod postgres;
pub mod registry;
mod sqlite;
mod support;

pub use document::DocumentTranslator;
pub use error::TranslationError;
pub use mysql::MySqlTranslator;
pub use postgres::PostgresTranslator;
pub use registry::{RegistryError, TranslatorRegistry};
pub use sqlite::SqliteTranslator;

use serde::Serialize;
use serde_json::Value;

use crate::ast::AstNode;
use crate::schema::Schema;

/// One entry in `TranslatorOutput::metadata.boosts` (spec.md §3, §4.4).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoostEntry {
    pub query: String,
    pub boost: f64,
}

/// `TranslatorOutput::metadata` (spec.md §3).
///
/// `fuzzy_distance`/`proximity_distance` are populated only by
/// [`DocumentTranslator`] (spec.md §9: the document store records these but
/// does not bound matches by them — an observable quirk of the source,
/// preserved rather than tightened). If a query contains more than one such
/// node, the field reflects whichever was translated last; see DESIGN.md.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub boosts: Vec<BoostEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_distance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity_distance: Option<u32>,
}

/// The discriminant of a [`TranslatorOutput`] (spec.md §3: `type:"sql"|"document"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Sql,
    Document,
}

/// The result of one `Translator::translate` call. SQL dialects populate
/// `where_clause`/`parameters`/`parameter_types`; the document dialect
/// populates `filter`. The two halves are mutually exclusive at the value
/// level, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatorOutput {
    #[serde(rename = "type")]
    pub kind: OutputKind,
    pub where_clause: Option<String>,
    pub parameters: Vec<Value>,
    pub parameter_types: Vec<String>,
    pub filter: Option<Value>,
    pub metadata: Metadata,
}

/// Translates one AST into one dialect's output.
///
/// Implementations hold short-lived mutable accumulators (a parameter
/// counter, parameter/type buffers, a boost list) that are reset at the
/// top of every `translate` call (spec.md §4.4, §5). A single instance
/// must not be invoked concurrently on two queries; callers that want
/// concurrent translation should obtain a fresh instance per call, e.g.
/// via [`TranslatorRegistry`]'s factories.
pub trait Translator: Send {
    fn database_type(&self) -> &'static str;

    fn translate(
        &mut self,
        ast: &AstNode,
        schema: &Schema,
    ) -> Result<TranslatorOutput, TranslationError>;
}
