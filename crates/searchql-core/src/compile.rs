//! Top-level convenience entry point: lex + parse + translate in one call
//! (spec.md §6 "External interfaces").

use thiserror::Error;

use crate::parser::{ParseError, Parser};
use crate::schema::Schema;
use crate::translate::{Translator, TranslatorOutput, TranslationError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("{} parse error(s), first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Parse(Vec<ParseError>),
    #[error(transparent)]
    Translate(#[from] TranslationError),
}

impl From<Vec<ParseError>> for CompileError {
    fn from(errors: Vec<ParseError>) -> Self {
        Self::Parse(errors)
    }
}

/// Parses `query` and translates it against `schema` with `translator`.
///
/// Parse errors (lex errors included) are never partially reported: if the
/// parser accumulated any, compilation stops there and they are returned
/// wholesale rather than attempting a best-effort translation of a
/// partially-malformed tree. This mirrors the translator's own
/// stop-at-first-error contract (spec.md §7).
pub fn compile(
    query: &str,
    schema: &Schema,
    translator: &mut dyn Translator,
) -> Result<TranslatorOutput, CompileError> {
    let (ast, errors) = Parser::new(query).parse();
    if !errors.is_empty() {
        return Err(CompileError::Parse(errors));
    }
    Ok(translator.translate(&ast, schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EnabledFeatures, Field, FieldType, NamingConvention, SchemaOptions};
    use crate::translate::PostgresTranslator;

    fn products_schema() -> Schema {
        Schema::build(
            "products",
            [
                ("product_code".to_string(), Field::new(FieldType::Text)),
                ("region".to_string(), Field::new(FieldType::Text)),
            ],
            SchemaOptions {
                naming_convention: NamingConvention::SnakeCase,
                strict_field_names: false,
                default_field: Some("product_code".to_string()),
                enabled_features: EnabledFeatures::default(),
            },
        )
        .unwrap()
    }

    #[test]
    fn compiles_a_valid_query() {
        let schema = products_schema();
        let mut translator = PostgresTranslator::new();
        let output = compile("product_code:13w42 AND region:ca", &schema, &mut translator).unwrap();
        assert_eq!(output.where_clause.as_deref(), Some("product_code = $1 AND region = $2"));
    }

    #[test]
    fn parse_errors_short_circuit_translation() {
        let schema = products_schema();
        let mut translator = PostgresTranslator::new();
        let err = compile("product_code:(unterminated", &schema, &mut translator).unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn translation_errors_propagate() {
        let schema = products_schema();
        let mut translator = PostgresTranslator::new();
        let err = compile("missing_field:foo", &schema, &mut translator).unwrap_err();
        assert!(matches!(err, CompileError::Translate(TranslationError::FieldNotFound { .. })));
    }
}
