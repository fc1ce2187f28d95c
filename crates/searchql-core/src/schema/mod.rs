//! The per-tenant schema model: logical fields, physical column mapping,
//! and field resolution.

mod error;
mod field;
mod naming;
mod registry;

pub use error::SchemaError;
pub use field::{Field, FieldType};
pub use naming::NamingConvention;
pub use registry::SchemaRegistry;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

fn column_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
}

/// Feature flags a schema may enable for its translators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledFeatures {
    #[serde(default)]
    pub fuzzy: bool,
    #[serde(default)]
    pub proximity: bool,
    #[serde(default)]
    pub regex: bool,
}

/// Schema-wide options (spec.md §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaOptions {
    #[serde(default)]
    pub naming_convention: NamingConvention,
    #[serde(default)]
    pub strict_field_names: bool,
    #[serde(default)]
    pub default_field: Option<String>,
    #[serde(default)]
    pub enabled_features: EnabledFeatures,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            naming_convention: NamingConvention::SnakeCase,
            strict_field_names: false,
            default_field: None,
            enabled_features: EnabledFeatures::default(),
        }
    }
}

/// An immutable, per-tenant schema: the logical fields a query may
/// reference, how they map to physical columns, and the naming/feature
/// options that govern resolution and translation.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    options: SchemaOptions,
    fields: HashMap<String, Arc<Field>>,
    lowercase_fields: HashMap<String, String>,
    aliases: HashMap<String, String>,
    lowercase_aliases: HashMap<String, String>,
}

impl Schema {
    /// Validates `fields`/`options` against the schema invariants (spec.md
    /// §3) and builds the case-insensitive lookup tables eagerly, so that
    /// [`Self::resolve`] is O(1) with no further validation.
    pub fn build(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (String, Field)>,
        options: SchemaOptions,
    ) -> Result<Self, SchemaError> {
        let mut field_map = HashMap::new();
        let mut lowercase_fields = HashMap::new();
        let mut aliases = HashMap::new();
        let mut lowercase_aliases = HashMap::new();

        for (logical_name, field) in fields {
            if let Some(column) = &field.column {
                if !column_pattern().is_match(column) {
                    return Err(SchemaError::InvalidColumnName {
                        field: logical_name,
                        column: column.clone(),
                    });
                }
            }

            lowercase_fields.insert(logical_name.to_lowercase(), logical_name.clone());

            for alias in &field.aliases {
                if field_map.contains_key(alias) || lowercase_fields.contains_key(&alias.to_lowercase())
                {
                    return Err(SchemaError::AliasCollidesWithFieldName {
                        field: logical_name,
                        alias: alias.clone(),
                    });
                }
                if let Some(existing) = aliases.insert(alias.clone(), logical_name.clone()) {
                    return Err(SchemaError::DuplicateAlias {
                        alias: alias.clone(),
                        first: existing,
                        second: logical_name,
                    });
                }
                lowercase_aliases.insert(alias.to_lowercase(), logical_name.clone());
            }

            field_map.insert(logical_name, Arc::new(field));
        }

        // A field name and another field's alias must also be disjoint.
        for logical_name in field_map.keys() {
            if aliases.contains_key(logical_name) {
                return Err(SchemaError::AliasCollidesWithFieldName {
                    field: logical_name.clone(),
                    alias: logical_name.clone(),
                });
            }
        }

        if let Some(default_field) = &options.default_field {
            let exists = field_map.contains_key(default_field) || aliases.contains_key(default_field);
            if !exists {
                return Err(SchemaError::UnknownDefaultField(default_field.clone()));
            }
        }

        Ok(Self {
            name: name.into(),
            options,
            fields: field_map,
            lowercase_fields,
            aliases,
            lowercase_aliases,
        })
    }

    /// The schema's name, as registered in a [`SchemaRegistry`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema-wide options.
    #[must_use]
    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// Resolves a logical field name to its physical column and field
    /// metadata, trying in order: (1) exact logical name; (2)
    /// case-insensitive logical name, iff `strict_field_names` is false;
    /// (3) exact alias; (4) case-insensitive alias, iff
    /// `strict_field_names` is false.
    #[must_use]
    pub fn resolve(&self, field_name: &str) -> Option<(String, Arc<Field>)> {
        if let Some(field) = self.fields.get(field_name) {
            return Some((self.column_for(field_name, field), Arc::clone(field)));
        }

        if !self.options.strict_field_names {
            if let Some(canonical) = self.lowercase_fields.get(&field_name.to_lowercase()) {
                let field = &self.fields[canonical];
                return Some((self.column_for(canonical, field), Arc::clone(field)));
            }
        }

        if let Some(canonical) = self.aliases.get(field_name) {
            let field = &self.fields[canonical];
            return Some((self.column_for(canonical, field), Arc::clone(field)));
        }

        if !self.options.strict_field_names {
            if let Some(canonical) = self.lowercase_aliases.get(&field_name.to_lowercase()) {
                let field = &self.fields[canonical];
                return Some((self.column_for(canonical, field), Arc::clone(field)));
            }
        }

        None
    }

    /// Resolves the schema's configured default field, for bare
    /// term/phrase/wildcard queries.
    #[must_use]
    pub fn default_field(&self) -> Option<(String, Arc<Field>)> {
        let name = self.options.default_field.as_deref()?;
        self.resolve(name)
    }

    fn column_for(&self, logical_name: &str, field: &Field) -> String {
        field
            .column
            .clone()
            .unwrap_or_else(|| naming::convert(logical_name, self.options.naming_convention))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products_schema() -> Schema {
        Schema::build(
            "products",
            [
                ("productCode".to_string(), Field::new(FieldType::Text)),
                ("region".to_string(), Field::new(FieldType::Text)),
                ("price".to_string(), Field::new(FieldType::Float)),
                ("status".to_string(), Field::new(FieldType::Text)),
                ("rodLength".to_string(), Field::new(FieldType::Integer)),
            ],
            SchemaOptions {
                naming_convention: NamingConvention::SnakeCase,
                strict_field_names: false,
                default_field: Some("productCode".to_string()),
                enabled_features: EnabledFeatures::default(),
            },
        )
        .unwrap()
    }

    #[test]
    fn resolve_derives_column_from_naming_convention() {
        let schema = products_schema();
        let (column, field) = schema.resolve("productCode").unwrap();
        assert_eq!(column, "product_code");
        assert_eq!(field.field_type, FieldType::Text);
    }

    #[test]
    fn resolve_is_case_insensitive_unless_strict() {
        let schema = products_schema();
        assert_eq!(schema.resolve("PRODUCTCODE").unwrap().0, "product_code");
    }

    #[test]
    fn strict_schema_rejects_case_mismatch() {
        let schema = Schema::build(
            "strict",
            [("productCode".to_string(), Field::new(FieldType::Text))],
            SchemaOptions {
                strict_field_names: true,
                ..SchemaOptions::default()
            },
        )
        .unwrap();
        assert!(schema.resolve("PRODUCTCODE").is_none());
        assert!(schema.resolve("productCode").is_some());
    }

    #[test]
    fn resolve_follows_aliases() {
        let schema = Schema::build(
            "aliased",
            [(
                "product_code".to_string(),
                Field::new(FieldType::Text).with_alias("sku"),
            )],
            SchemaOptions::default(),
        )
        .unwrap();
        let (column, _) = schema.resolve("sku").unwrap();
        assert_eq!(column, "product_code");
    }

    #[test]
    fn unknown_field_is_none() {
        let schema = products_schema();
        assert!(schema.resolve("does_not_exist").is_none());
    }

    #[test]
    fn explicit_column_override_wins() {
        let schema = Schema::build(
            "override",
            [(
                "productCode".to_string(),
                Field::new(FieldType::Text).with_column("sku_code"),
            )],
            SchemaOptions::default(),
        )
        .unwrap();
        assert_eq!(schema.resolve("productCode").unwrap().0, "sku_code");
    }

    #[test]
    fn invalid_column_override_is_rejected() {
        let err = Schema::build(
            "bad",
            [(
                "x".to_string(),
                Field::new(FieldType::Text).with_column("not valid!"),
            )],
            SchemaOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidColumnName { .. }));
    }

    #[test]
    fn duplicate_alias_is_rejected() {
        let err = Schema::build(
            "dup",
            [
                ("a".to_string(), Field::new(FieldType::Text).with_alias("shared")),
                ("b".to_string(), Field::new(FieldType::Text).with_alias("shared")),
            ],
            SchemaOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateAlias { .. }));
    }

    #[test]
    fn unknown_default_field_is_rejected() {
        let err = Schema::build(
            "bad_default",
            [("a".to_string(), Field::new(FieldType::Text))],
            SchemaOptions {
                default_field: Some("nope".to_string()),
                ..SchemaOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownDefaultField(_)));
    }
}
