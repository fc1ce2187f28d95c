//! Document-store dialect: translates into a nested MongoDB-style filter
//! document instead of a SQL clause. No parameters/placeholders — values
//! are embedded directly in the returned [`serde_json::Value`] tree.

use std::sync::Arc;

use serde_json::{json, Value};

use super::error::TranslationError;
use super::support::wildcard_to_regex;
use super::{BoostEntry, Metadata, OutputKind, Translator, TranslatorOutput};
use crate::ast::{AstNode, ValueNode};
use crate::schema::{Field, FieldType, Schema};

#[derive(Debug, Default)]
pub struct DocumentTranslator {
    boosts: Vec<BoostEntry>,
    fuzzy_distance: Option<u32>,
    proximity_distance: Option<u32>,
}

impl DocumentTranslator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn default_field(&self, schema: &Schema) -> Result<(String, Arc<Field>), TranslationError> {
        schema
            .default_field()
            .ok_or_else(|| TranslationError::DefaultFieldMissing {
                schema: schema.name().to_string(),
            })
    }

    fn resolve(&self, schema: &Schema, field: &str) -> Result<(String, Arc<Field>), TranslationError> {
        schema
            .resolve(field)
            .ok_or_else(|| TranslationError::FieldNotFound {
                schema: schema.name().to_string(),
                field: field.to_string(),
            })
    }

    fn value_doc(column: &str, value: &ValueNode) -> Value {
        match value {
            ValueNode::Term(text) | ValueNode::Number(text) | ValueNode::Phrase(text) => {
                json!({ column: text })
            }
            ValueNode::Wildcard(pattern) => {
                json!({ column: { "$regex": wildcard_to_regex(pattern) } })
            }
            ValueNode::Regex(pattern) => {
                json!({ column: { "$regex": pattern, "$options": "" } })
            }
        }
    }

    fn render(&mut self, node: &AstNode, schema: &Schema) -> Result<Value, TranslationError> {
        match node {
            AstNode::TermQuery { term, .. } => {
                let (column, _) = self.default_field(schema)?;
                Ok(json!({ column: term }))
            }
            AstNode::PhraseQuery { phrase, .. } => {
                let (column, _) = self.default_field(schema)?;
                Ok(json!({ column: phrase }))
            }
            AstNode::WildcardQuery { pattern, .. } => {
                let (column, _) = self.default_field(schema)?;
                Ok(json!({ column: { "$regex": wildcard_to_regex(pattern) } }))
            }
            AstNode::FieldQuery { field, value, .. } => {
                let (column, _) = self.resolve(schema, field)?;
                Ok(Self::value_doc(&column, value))
            }
            AstNode::FieldGroupQuery { field, queries, .. } => {
                let (column, field_info) = self.resolve(schema, field)?;
                let mut rendered = Vec::with_capacity(queries.len());
                for query in queries {
                    rendered.push(self.render_field_group_child(query, &column, &field_info, schema)?);
                }
                Ok(if rendered.len() == 1 {
                    rendered.remove(0)
                } else {
                    json!({ "$or": rendered })
                })
            }
            AstNode::RangeQuery {
                field,
                start,
                end,
                inclusive_start,
                inclusive_end,
                ..
            } => {
                let (column, _) = match field {
                    Some(name) => self.resolve(schema, name)?,
                    None => self.default_field(schema)?,
                };
                let mut bounds = serde_json::Map::new();
                if !start.is_open() {
                    let key = if *inclusive_start { "$gte" } else { "$gt" };
                    bounds.insert(key.to_string(), Value::String(start.value().to_string()));
                }
                if !end.is_open() {
                    let key = if *inclusive_end { "$lte" } else { "$lt" };
                    bounds.insert(key.to_string(), Value::String(end.value().to_string()));
                }
                Ok(json!({ column: Value::Object(bounds) }))
            }
            AstNode::FuzzyQuery { field, term, distance, .. } => {
                if !schema.options().enabled_features.fuzzy {
                    return Err(TranslationError::FeatureDisabled {
                        schema: schema.name().to_string(),
                        feature: "fuzzy",
                    });
                }
                self.resolve_or_default(schema, field)?;
                self.fuzzy_distance = Some(*distance);
                Ok(json!({ "$text": { "$search": term } }))
            }
            AstNode::ProximityQuery {
                field,
                phrase,
                distance,
                ..
            } => {
                if !schema.options().enabled_features.proximity {
                    return Err(TranslationError::FeatureDisabled {
                        schema: schema.name().to_string(),
                        feature: "proximity",
                    });
                }
                self.resolve_or_default(schema, field)?;
                self.proximity_distance = Some(*distance);
                Ok(json!({ "$text": { "$search": phrase } }))
            }
            AstNode::ExistsQuery { field, .. } => {
                let (column, _) = self.resolve(schema, field)?;
                Ok(json!({ column: { "$exists": true, "$ne": Value::Null } }))
            }
            AstNode::BoostQuery { query, boost, .. } => {
                let rendered = self.render(query, schema)?;
                self.boosts.push(BoostEntry {
                    query: query.variant_name().to_string(),
                    boost: *boost,
                });
                Ok(rendered)
            }
            AstNode::GroupQuery { query, .. } | AstNode::RequiredQuery { query, .. } => {
                self.render(query, schema)
            }
            AstNode::ProhibitedQuery { query, .. } => self.render_not(query, schema),
            AstNode::BinaryOp { op, left, right, .. } => {
                let l = self.render(left, schema)?;
                let r = self.render(right, schema)?;
                Ok(json!({ format!("${}", op.as_str().to_lowercase()): [l, r] }))
            }
            AstNode::UnaryOp { operand, .. } => self.render_not(operand, schema),
        }
    }

    fn resolve_or_default(
        &self,
        schema: &Schema,
        field: &Option<String>,
    ) -> Result<(String, Arc<Field>), TranslationError> {
        match field {
            Some(name) => self.resolve(schema, name),
            None => self.default_field(schema),
        }
    }

    fn render_not(&mut self, node: &AstNode, schema: &Schema) -> Result<Value, TranslationError> {
        let rendered = self.render(node, schema)?;
        if let Value::Object(map) = &rendered {
            if map.len() == 1 {
                let (key, value) = map.iter().next().expect("checked len == 1");
                if !matches!(value, Value::Object(_)) {
                    return Ok(json!({ key.clone(): { "$ne": value.clone() } }));
                }
            }
        }
        Ok(json!({ "$nor": [rendered] }))
    }

    fn render_field_group_child(
        &mut self,
        node: &AstNode,
        column: &str,
        field: &Field,
        schema: &Schema,
    ) -> Result<Value, TranslationError> {
        match node {
            AstNode::TermQuery { term, .. } => Ok(json!({ column: term })),
            AstNode::WildcardQuery { pattern, .. } => {
                Ok(json!({ column: { "$regex": wildcard_to_regex(pattern) } }))
            }
            AstNode::BinaryOp { op, left, right, .. } => {
                let l = self.render_field_group_child(left, column, field, schema)?;
                let r = self.render_field_group_child(right, column, field, schema)?;
                Ok(json!({ format!("${}", op.as_str().to_lowercase()): [l, r] }))
            }
            other => self.render(other, schema),
        }
    }
}

impl Translator for DocumentTranslator {
    fn database_type(&self) -> &'static str {
        "document"
    }

    fn translate(&mut self, ast: &AstNode, schema: &Schema) -> Result<TranslatorOutput, TranslationError> {
        self.boosts.clear();
        self.fuzzy_distance = None;
        self.proximity_distance = None;

        let filter = self.render(ast, schema)?;
        tracing::trace!(dialect = "document", "translated ast");

        Ok(TranslatorOutput {
            kind: OutputKind::Document,
            where_clause: None,
            parameters: Vec::new(),
            parameter_types: Vec::new(),
            filter: Some(filter),
            metadata: Metadata {
                boosts: std::mem::take(&mut self.boosts),
                fuzzy_distance: self.fuzzy_distance.take(),
                proximity_distance: self.proximity_distance.take(),
            },
        })
    }
}
