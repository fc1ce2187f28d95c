//! Translation-time errors.

/// Raised while rendering an AST against a schema and dialect.
///
/// Translators stop at the first error and return it; they never emit a
/// partial clause (spec.md §7).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslationError {
    #[error("field {field:?} is not defined in schema {schema:?}")]
    FieldNotFound { schema: String, field: String },

    #[error("schema {schema:?} has no default_field configured")]
    DefaultFieldMissing { schema: String },

    #[error("{feature} is not enabled for schema {schema:?}")]
    FeatureDisabled {
        schema: String,
        feature: &'static str,
    },

    #[error("{dialect} cannot translate a {node} node")]
    UnsupportedNode {
        dialect: &'static str,
        node: &'static str,
        hint: Option<String>,
    },
}
