//! Field type tags and per-field metadata.

use serde::{Deserialize, Serialize};

/// The closed set of field type tags a schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
    Datetime,
    Date,
    Time,
    Json,
    Array,
}

impl FieldType {
    /// The tag as it is recorded in `TranslatorOutput::parameter_types`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Datetime => "datetime",
            Self::Date => "date",
            Self::Time => "time",
            Self::Json => "json",
            Self::Array => "array",
        }
    }

    /// Whether this field type is backed by a JSON column (affects
    /// `ExistsQuery` rendering per dialect).
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// A single logical field declared in a [`super::Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// The field's type tag.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Physical column override. When absent, the column is derived from
    /// the logical field name via the schema's naming convention.
    #[serde(default)]
    pub column: Option<String>,
    /// Alternative logical names that also resolve to this field.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Whether the backing column is indexed. Advisory only; the core does
    /// not use this to alter generated output.
    #[serde(default)]
    pub indexed: bool,
}

impl Field {
    /// Creates a field with no aliases, not indexed, and no column override.
    #[must_use]
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            column: None,
            aliases: Vec::new(),
            indexed: false,
        }
    }

    /// Builder method: sets an explicit physical column.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Builder method: adds an alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Builder method: marks the field as indexed.
    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }
}
