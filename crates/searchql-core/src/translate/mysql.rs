//! MySQL dialect: `?` placeholders, `REGEXP`, `SOUNDEX`/`MATCH ... AGAINST`
//! for fuzzy/proximity.

use std::sync::Arc;

use serde_json::Value;

use super::error::TranslationError;
use super::support::{needs_parens, push_param, wildcard_to_like};
use super::{BoostEntry, Metadata, OutputKind, Translator, TranslatorOutput};
use crate::ast::{AstNode, ValueNode};
use crate::schema::{Field, FieldType, Schema};

#[derive(Debug, Default)]
pub struct MySqlTranslator {
    param_counter: usize,
    parameters: Vec<Value>,
    parameter_types: Vec<String>,
    boosts: Vec<BoostEntry>,
}

impl MySqlTranslator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, value: impl Into<String>, field_type: FieldType) -> String {
        self.param_counter += 1;
        push_param(&mut self.parameters, &mut self.parameter_types, value, field_type);
        "?".to_string()
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

    fn render_value_clause(&mut self, column: &str, value: &ValueNode, field_type: FieldType) -> String {
        match value {
            ValueNode::Term(text) | ValueNode::Number(text) | ValueNode::Phrase(text) => {
                format!("{column} = {}", self.push(text.clone(), field_type))
            }
            ValueNode::Wildcard(pattern) => {
                format!("{column} LIKE {}", self.push(wildcard_to_like(pattern), field_type))
            }
            ValueNode::Regex(pattern) => {
                format!("{column} REGEXP {}", self.push(pattern.clone(), field_type))
            }
        }
    }

    fn render(&mut self, node: &AstNode, schema: &Schema) -> Result<String, TranslationError> {
        match node {
            AstNode::TermQuery { term, .. } => {
                let (column, field) = self.default_field(schema)?;
                Ok(format!("{column} = {}", self.push(term.clone(), field.field_type)))
            }
            AstNode::PhraseQuery { phrase, .. } => {
                let (column, field) = self.default_field(schema)?;
                Ok(format!("{column} = {}", self.push(phrase.clone(), field.field_type)))
            }
            AstNode::WildcardQuery { pattern, .. } => {
                let (column, field) = self.default_field(schema)?;
                Ok(format!(
                    "{column} LIKE {}",
                    self.push(wildcard_to_like(pattern), field.field_type)
                ))
            }
            AstNode::FieldQuery { field, value, .. } => {
                let (column, field_info) = self.resolve(schema, field)?;
                Ok(self.render_value_clause(&column, value, field_info.field_type))
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
                    format!("({})", rendered.join(" OR "))
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
                let (column, field_info) = self.resolve_or_default(schema, field)?;
                self.render_range(&column, field_info.field_type, start, end, *inclusive_start, *inclusive_end)
            }
            AstNode::FuzzyQuery { field, term, .. } => {
                if !schema.options().enabled_features.fuzzy {
                    return Err(TranslationError::FeatureDisabled {
                        schema: schema.name().to_string(),
                        feature: "fuzzy",
                    });
                }
                let (column, field_info) = self.resolve_or_default(schema, field)?;
                let ph = self.push(term.clone(), field_info.field_type);
                Ok(format!("SOUNDEX({column}) = SOUNDEX({ph})"))
            }
            AstNode::ProximityQuery { field, phrase, .. } => {
                if !schema.options().enabled_features.proximity {
                    return Err(TranslationError::FeatureDisabled {
                        schema: schema.name().to_string(),
                        feature: "proximity",
                    });
                }
                let (column, field_info) = self.resolve_or_default(schema, field)?;
                let ph = self.push(phrase.clone(), field_info.field_type);
                Ok(format!("MATCH({column}) AGAINST({ph} IN BOOLEAN MODE)"))
            }
            AstNode::ExistsQuery { field, .. } => {
                let (column, field_info) = self.resolve(schema, field)?;
                Ok(if field_info.field_type == FieldType::Json {
                    format!("{column} IS NOT NULL AND JSON_TYPE({column}) != 'NULL'")
                } else {
                    format!("{column} IS NOT NULL")
                })
            }
            AstNode::BoostQuery { query, boost, .. } => {
                let rendered = self.render(query, schema)?;
                self.boosts.push(BoostEntry {
                    query: query.variant_name().to_string(),
                    boost: *boost,
                });
                Ok(rendered)
            }
            AstNode::GroupQuery { query, .. } => self.render(query, schema),
            AstNode::RequiredQuery { query, .. } => self.render(query, schema),
            AstNode::ProhibitedQuery { query, .. } => self.render_not(query, schema),
            AstNode::BinaryOp { op, left, right, .. } => {
                let l = self.render_operand(left, schema)?;
                let r = self.render_operand(right, schema)?;
                Ok(format!("{l} {} {r}", op.as_str()))
            }
            AstNode::UnaryOp { operand, .. } => self.render_not(operand, schema),
        }
    }

    fn render_operand(&mut self, node: &AstNode, schema: &Schema) -> Result<String, TranslationError> {
        let rendered = self.render(node, schema)?;
        Ok(if needs_parens(node) {
            format!("({rendered})")
        } else {
            rendered
        })
    }

    fn render_not(&mut self, node: &AstNode, schema: &Schema) -> Result<String, TranslationError> {
        let rendered = self.render(node, schema)?;
        let wrap = node.is_binary_op() || rendered.contains(" AND ") || rendered.contains(" OR ");
        Ok(if wrap {
            format!("NOT ({rendered})")
        } else {
            format!("NOT {rendered}")
        })
    }

    fn render_field_group_child(
        &mut self,
        node: &AstNode,
        column: &str,
        field: &Field,
        schema: &Schema,
    ) -> Result<String, TranslationError> {
        match node {
            AstNode::TermQuery { term, .. } => {
                Ok(format!("{column} = {}", self.push(term.clone(), field.field_type)))
            }
            AstNode::WildcardQuery { pattern, .. } => Ok(format!(
                "{column} LIKE {}",
                self.push(wildcard_to_like(pattern), field.field_type)
            )),
            AstNode::BinaryOp { op, left, right, .. } => {
                let l = self.render_field_group_child(left, column, field, schema)?;
                let r = self.render_field_group_child(right, column, field, schema)?;
                Ok(format!("{l} {} {r}", op.as_str()))
            }
            other => self.render(other, schema),
        }
    }

    fn render_range(
        &mut self,
        column: &str,
        field_type: FieldType,
        start: &ValueNode,
        end: &ValueNode,
        inclusive_start: bool,
        inclusive_end: bool,
    ) -> Result<String, TranslationError> {
        if inclusive_start && inclusive_end && !start.is_open() && !end.is_open() {
            let a = self.push(start.value().to_string(), field_type);
            let b = self.push(end.value().to_string(), field_type);
            return Ok(format!("{column} BETWEEN {a} AND {b}"));
        }

        let mut clauses = Vec::new();
        if !start.is_open() {
            let op = if inclusive_start { ">=" } else { ">" };
            let ph = self.push(start.value().to_string(), field_type);
            clauses.push(format!("{column} {op} {ph}"));
        }
        if !end.is_open() {
            let op = if inclusive_end { "<=" } else { "<" };
            let ph = self.push(end.value().to_string(), field_type);
            clauses.push(format!("{column} {op} {ph}"));
        }
        Ok(if clauses.is_empty() {
            format!("{column} IS NOT NULL")
        } else {
            clauses.join(" AND ")
        })
    }
}

impl Translator for MySqlTranslator {
    fn database_type(&self) -> &'static str {
        "mysql"
    }

    fn translate(&mut self, ast: &AstNode, schema: &Schema) -> Result<TranslatorOutput, TranslationError> {
        self.param_counter = 0;
        self.parameters.clear();
        self.parameter_types.clear();
        self.boosts.clear();

        let where_clause = self.render(ast, schema)?;
        tracing::trace!(dialect = "mysql", clause = %where_clause, "translated ast");

        Ok(TranslatorOutput {
            kind: OutputKind::Sql,
            where_clause: Some(where_clause),
            parameters: std::mem::take(&mut self.parameters),
            parameter_types: std::mem::take(&mut self.parameter_types),
            filter: None,
            metadata: Metadata {
                boosts: std::mem::take(&mut self.boosts),
                ..Metadata::default()
            },
        })
    }
}
