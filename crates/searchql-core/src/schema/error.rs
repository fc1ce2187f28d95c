//! Schema construction errors.

/// Raised by [`super::Schema::build`] when the declared fields/options
/// violate one of the schema invariants. Never raised by `resolve` — a
/// resolution miss is reported by the translator layer as
/// `TranslationError::FieldNotFound`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("field {field:?} has an invalid column override {column:?}")]
    InvalidColumnName { field: String, column: String },

    #[error("alias {alias:?} is declared on more than one field ({first:?} and {second:?})")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("alias {alias:?} on field {field:?} collides with another field's name")]
    AliasCollidesWithFieldName { field: String, alias: String },

    #[error("default_field {0:?} is not a declared field or alias")]
    UnknownDefaultField(String),
}
