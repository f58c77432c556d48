//! Error taxonomy: syntax, unsupported feature, not found.

mod common;

use common::*;
use snomed_query_engine::{Concept, Feature, QueryEngine, QueryError};
use snomed_query_ecl::EclError;
use snomed_query_index::MemoryConceptIndex;

fn evaluate_err(query: &str) -> QueryError {
    let index = clinical_index();
    let engine = QueryEngine::new(&index);
    engine.evaluate(query).unwrap_err()
}

// ============================================================================
// Unsupported Features
// ============================================================================

#[test]
fn test_unsupported_features_are_named() {
    let cases = [
        ("^ 700043003", Feature::MemberOf),
        ("73211009^700043003", Feature::MemberOf),
        ("<999999999:363698007 AND 116676008=2", Feature::ConjunctionAttributeSet),
        ("< 404684003 AND < 64572001", Feature::CompoundExpression),
        ("< 404684003 OR < 64572001", Feature::CompoundExpression),
        ("< 404684003 MINUS < 64572001", Feature::CompoundExpression),
        ("< 1 : 2 = 3 AND 4 = 5", Feature::ConjunctionAttributeSet),
        ("< 1 : 2 = 3 OR 4 = 5", Feature::DisjunctionAttributeSet),
        ("< 1 : { 2 = 3 }, { 4 = 5 }", Feature::ConjunctionRefinementSet),
        ("< 1 : { 2 = 3 } OR { 4 = 5 }", Feature::DisjunctionRefinementSet),
        ("< 1 : { 2 = 3 }", Feature::AttributeGroup),
        (r#"< 1 : 2 = "tablet""#, Feature::StringComparisonOperator),
        ("< 1 : 2 >= #10", Feature::NumericComparisonOperator),
        ("< 1 : * = 3", Feature::WildcardAttributeName),
        ("< 1 : 2 = << 3", Feature::ExpressionAttributeValue),
        ("< *", Feature::WildcardHierarchyOperator),
    ];

    for (query, feature) in cases {
        assert_eq!(
            evaluate_err(query),
            QueryError::UnsupportedFeature(feature),
            "{}",
            query
        );
    }
}

#[test]
fn test_unsupported_checked_before_lookup() {
    // Concept 1 does not exist, but the query is rejected first
    assert_eq!(
        evaluate_err("^ 1"),
        QueryError::UnsupportedFeature(Feature::MemberOf)
    );
}

#[test]
fn test_unsupported_messages() {
    assert_eq!(
        evaluate_err("< 1 : 2 = 3 OR 4 = 5").to_string(),
        "disjunctionAttributeSet is not currently supported."
    );
    assert_eq!(
        evaluate_err("< 1 AND < 2").to_string(),
        "This expression is not currently supported, please use a simpleExpressionConstraint."
    );
}

// ============================================================================
// Syntax Errors
// ============================================================================

#[test]
fn test_not_a_number() {
    let err = evaluate_err("not-a-number");
    assert!(matches!(
        err,
        QueryError::Syntax(EclError::ParseError { position: 0, .. })
    ));
}

#[test]
fn test_trailing_garbage() {
    let err = evaluate_err("404684003 garbage");
    assert!(matches!(
        err,
        QueryError::Syntax(EclError::ParseError { position: 10, .. })
    ));
}

#[test]
fn test_overflowing_id() {
    let err = evaluate_err("<< 99999999999999999999999");
    assert!(matches!(
        err,
        QueryError::Syntax(EclError::InvalidConceptId(_))
    ));
}

#[test]
fn test_deep_nesting_is_syntax_error() {
    let query = format!("{}73211009{}", "(".repeat(10_000), ")".repeat(10_000));
    assert!(matches!(
        evaluate_err(&query),
        QueryError::Syntax(EclError::NestingTooDeep { limit: 64, .. })
    ));
}

#[test]
fn test_moderate_nesting_is_compound() {
    let query = format!("{}73211009{}", "(".repeat(50), ")".repeat(50));
    assert_eq!(
        evaluate_err(&query),
        QueryError::UnsupportedFeature(Feature::CompoundExpression)
    );
}

#[test]
fn test_parse_blank_is_error() {
    let index = clinical_index();
    let engine = QueryEngine::new(&index);

    assert!(engine.evaluate("   ").unwrap().is_empty());
    assert_eq!(
        engine.parse("   "),
        Err(QueryError::Syntax(EclError::EmptyExpression))
    );
}

// ============================================================================
// Not Found
// ============================================================================

#[test]
fn test_unknown_focus() {
    for query in ["1234", "< 1234", "<< 1234", "> 1234", ">> 1234"] {
        assert_eq!(evaluate_err(query), QueryError::NotFound(1234), "{}", query);
    }
    assert_eq!(
        evaluate_err("< 1234").to_string(),
        "Concept with id 1234 could not be found."
    );
}

#[test]
fn test_unknown_ancestor_fails_whole_query() {
    let index = MemoryConceptIndex::from_concepts([
        Concept::new(ROOT, "SNOMED CT Concept (SNOMED RT+CTV3)"),
        Concept::new(DIABETES, "Diabetes mellitus (disorder)").with_ancestors([DISEASE, ROOT]),
    ])
    .unwrap();
    let engine = QueryEngine::new(&index);

    assert_eq!(engine.evaluate(">> 73211009"), Err(QueryError::NotFound(DISEASE)));
    assert_eq!(engine.evaluate("< 138875005").unwrap().len(), 1);

    // Membership checks agree with evaluation
    assert_eq!(engine.matches(ROOT, ">> 73211009"), Err(QueryError::NotFound(DISEASE)));
    assert_eq!(engine.matches(DIABETES, ">> 73211009"), Err(QueryError::NotFound(DISEASE)));
    assert_eq!(engine.matches(DIABETES, "< 138875005"), Ok(true));
}
