//! Quantified invariants and boundary behaviours (spec.md §8).

mod common;

use common::{products_schema, translate};
use searchql_core::parser::Parser;
use searchql_core::translate::{PostgresTranslator, SqliteTranslator, TranslationError, Translator};

#[test]
fn placeholder_count_matches_parameter_count() {
    let out = translate(
        "productCode:a AND region:b AND status:c",
        &mut PostgresTranslator::new(),
    );
    let clause = out.where_clause.unwrap();
    let placeholders = clause.matches('$').count();
    assert_eq!(placeholders, out.parameters.len());
    assert_eq!(out.parameters.len(), out.parameter_types.len());
}

#[test]
fn binary_op_children_are_parenthesised_exactly_once() {
    let out = translate(
        "(productCode:a AND region:b) OR (status:c AND status:d)",
        &mut PostgresTranslator::new(),
    );
    let clause = out.where_clause.unwrap();
    assert_eq!(clause, "(product_code = $1 AND region = $2) OR (status = $3 AND status = $4)");
}

#[test]
fn parse_is_deterministic() {
    let query = "productCode:13w42 AND (region:ca OR status:active)";
    let (first, first_errors) = Parser::new(query).parse();
    let (second, second_errors) = Parser::new(query).parse();
    assert_eq!(first, second);
    assert_eq!(first_errors, second_errors);
}

#[test]
fn value_text_never_leaks_into_the_clause_unquoted() {
    let out = translate("productCode:super-secret-value", &mut PostgresTranslator::new());
    let clause = out.where_clause.unwrap();
    assert!(!clause.contains("super-secret-value"));
}

#[test]
fn keywords_are_recognised_only_uppercase() {
    // Lowercase "and" is not the AND keyword: it lexes as a bare STRING
    // term, so the three clauses only ever join through implicit OR.
    let schema = products_schema();
    let mut translator = PostgresTranslator::new();

    let (ast, errors) = Parser::new("productCode:a and region:b").parse();
    assert!(errors.is_empty());
    let out = translator.translate(&ast, &schema).unwrap();
    let clause = out.where_clause.unwrap();
    assert!(!clause.contains(" AND "));
    assert_eq!(clause.matches(" OR ").count(), 2);
    assert!(out.parameters.contains(&serde_json::Value::String("and".into())));
}

#[test]
fn resolve_field_is_case_insensitive_unless_strict() {
    let schema = products_schema();
    assert_eq!(schema.resolve("productCode").unwrap().0, schema.resolve("PRODUCTCODE").unwrap().0);
}

#[test]
fn translating_the_same_ast_twice_yields_byte_equal_output() {
    let (ast, errors) = Parser::new("productCode:a AND region:b").parse();
    assert!(errors.is_empty());
    let schema = products_schema();
    let mut translator = PostgresTranslator::new();
    let first = translator.translate(&ast, &schema).unwrap();
    let second = translator.translate(&ast, &schema).unwrap();
    assert_eq!(first, second);
}

#[test]
fn and_binds_tighter_than_or_and_the_and_child_is_parenthesised() {
    // spec.md §8: rendering parse("a AND b OR c") equals rendering of the
    // AST BinaryOp(OR, BinaryOp(AND, a, b), c); the BinaryOp child of a
    // BinaryOp is enclosed in exactly one pair of parentheses.
    let (a, errors_a) = Parser::new("a AND b OR c").parse();
    assert!(errors_a.is_empty());
    let schema = products_schema();
    let mut translator = PostgresTranslator::new();
    let rendered = translator.translate(&a, &schema).unwrap();
    assert_eq!(
        rendered.where_clause.as_deref(),
        Some("(product_code = $1 AND product_code = $2) OR product_code = $3")
    );
}

#[test]
fn range_with_both_inclusive_endpoints_uses_between() {
    let out = translate("rodLength:[1 TO 10]", &mut PostgresTranslator::new());
    assert!(out.where_clause.unwrap().contains("BETWEEN"));
}

#[test]
fn range_with_an_exclusive_endpoint_uses_comparisons_not_between() {
    let out = translate("rodLength:[1 TO 10}", &mut PostgresTranslator::new());
    let clause = out.where_clause.unwrap();
    assert!(!clause.contains("BETWEEN"));
    assert!(clause.contains(">=") && clause.contains('<'));
}

#[test]
fn fuzzy_without_the_feature_flag_is_feature_disabled() {
    let schema = searchql_core::schema::Schema::build(
        "no_fuzzy",
        [("productCode".to_string(), searchql_core::schema::Field::new(searchql_core::schema::FieldType::Text))],
        searchql_core::schema::SchemaOptions {
            default_field: Some("productCode".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    let (ast, errors) = Parser::new("productCode:foo~2").parse();
    assert!(errors.is_empty());
    let err = PostgresTranslator::new().translate(&ast, &schema).unwrap_err();
    assert!(matches!(err, TranslationError::FeatureDisabled { .. }));
}

#[test]
fn sqlite_fuzzy_is_unsupported_regardless_of_the_feature_flag() {
    let schema = products_schema();
    assert!(schema.options().enabled_features.fuzzy);
    let (ast, errors) = Parser::new("productCode:foo~2").parse();
    assert!(errors.is_empty());
    let err = SqliteTranslator::new().translate(&ast, &schema).unwrap_err();
    assert!(matches!(err, TranslationError::UnsupportedNode { dialect: "sqlite", .. }));
}
