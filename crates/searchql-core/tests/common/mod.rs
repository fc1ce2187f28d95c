//! Shared fixtures for integration tests.

use searchql_core::schema::{EnabledFeatures, Field, FieldType, NamingConvention, Schema, SchemaOptions};
use searchql_core::translate::{Translator, TranslatorOutput};

/// The `products` schema used by every end-to-end scenario in spec.md §8:
/// snake_case naming, fields `product_code:text`, `region:text`,
/// `price:float`, `status:text`, `rod_length:integer`.
pub fn products_schema() -> Schema {
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
            enabled_features: EnabledFeatures {
                fuzzy: true,
                proximity: true,
                regex: true,
            },
        },
    )
    .unwrap()
}

pub fn translate(query: &str, translator: &mut dyn Translator) -> TranslatorOutput {
    let (ast, errors) = searchql_core::parser::Parser::new(query).parse();
    assert!(errors.is_empty(), "unexpected parse errors for {query:?}: {errors:?}");
    translator.translate(&ast, &products_schema()).expect("translation should succeed")
}
