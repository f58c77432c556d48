//! Attribute refinement semantics.

mod common;

use common::*;
use snomed_query_engine::{ConceptResult, EngineConfig, QueryEngine, SctId};

fn ids(results: &[ConceptResult]) -> Vec<SctId> {
    results.iter().map(|r| r.id).collect()
}

fn evaluate(query: &str) -> Vec<SctId> {
    let index = clinical_index();
    let engine = QueryEngine::new(&index);
    ids(&engine.evaluate(query).unwrap())
}

// ============================================================================
// Equals
// ============================================================================

#[test]
fn test_equals_selects_holders_of_value() {
    assert_eq!(
        evaluate("< 64572001 : 363698007 = 113331007"),
        vec![DIABETES, TYPE_1_DIABETES, TYPE_2_DIABETES]
    );
}

#[test]
fn test_equals_matches_any_of_several_values() {
    // Type 2 diabetes holds both 113331007 and 80891009
    assert_eq!(
        evaluate("< 404684003 : 363698007 = 80891009"),
        vec![TYPE_2_DIABETES, HEART_DISEASE]
    );
}

#[test]
fn test_equals_excludes_concepts_without_attribute() {
    let results = evaluate("<< 404684003 : 363698007 = 113331007");
    assert!(!results.contains(&FEVER));
    assert!(!results.contains(&CLINICAL_FINDING));
}

#[test]
fn test_value_with_leading_zeros() {
    assert_eq!(
        evaluate("< 404684003 : 363698007 = 080891009"),
        evaluate("< 404684003 : 363698007 = 80891009")
    );
}

// ============================================================================
// Not Equals
// ============================================================================

#[test]
fn test_not_equals_some_value_differs() {
    // Type 2 diabetes passes through its second value
    assert_eq!(
        evaluate("< 64572001 : 363698007 != 113331007"),
        vec![TYPE_2_DIABETES, HEART_DISEASE, PULMONIC_STENOSIS]
    );
}

#[test]
fn test_not_equals_excludes_concepts_without_attribute() {
    let results = evaluate("< 404684003 : 363698007 != 1");
    assert_eq!(
        results,
        vec![
            DIABETES,
            TYPE_1_DIABETES,
            TYPE_2_DIABETES,
            HEART_DISEASE,
            PULMONIC_STENOSIS
        ]
    );
    assert!(!results.contains(&FEVER));
    assert!(!results.contains(&DISEASE));
}

// ============================================================================
// Refinement With Other Relations
// ============================================================================

#[test]
fn test_refined_self() {
    assert!(evaluate("73211009 : 363698007 = 80891009").is_empty());
    assert_eq!(
        evaluate("73211009 : 363698007 = 113331007"),
        vec![DIABETES]
    );
}

#[test]
fn test_refined_ancestors() {
    assert_eq!(
        evaluate(">> 46635009 : 363698007 = 113331007"),
        vec![TYPE_1_DIABETES, DIABETES]
    );
}

#[test]
fn test_refined_wildcard() {
    assert_eq!(
        evaluate("* : 363698007 = 39057004"),
        vec![PULMONIC_STENOSIS]
    );
}

#[test]
fn test_nested_single_attribute() {
    assert_eq!(
        evaluate("< 404684003 : (363698007 = 39057004)"),
        vec![PULMONIC_STENOSIS]
    );
}

#[test]
fn test_parallel_config_same_results() {
    let index = clinical_index();
    let sequential = QueryEngine::new(&index);
    let parallel =
        QueryEngine::with_config(&index, EngineConfig::builder().with_parallel(true).build());

    for query in [
        "* : 363698007 = 80891009",
        "< 404684003 : 363698007 != 113331007",
        "<< 64572001 : 363698007 = 113331007",
    ] {
        assert_eq!(
            sequential.evaluate(query).unwrap(),
            parallel.evaluate(query).unwrap(),
            "{}",
            query
        );
    }
}

#[test]
fn test_execute_reports_candidates() {
    let index = clinical_index();
    let engine = QueryEngine::new(&index);

    let result = engine.execute("< 64572001 : 363698007 = 39057004").unwrap();
    assert_eq!(result.ids(), vec![PULMONIC_STENOSIS]);
    assert_eq!(result.stats.candidates_examined, 5);
}
