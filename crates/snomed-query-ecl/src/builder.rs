//! Turns a parsed [`EclExpression`] into a [`StructuredQuery`].
//!
//! The builder is a single pre-order fold over the syntax tree. Each node is
//! checked before its children and the first unsupported construct ends the
//! walk with [`EclError::UnsupportedFeature`]. Nothing is approximated: a
//! query that would need a second refinement, a set operation or a
//! reference set lookup is rejected rather than partially evaluated.

use crate::ast::{
    Attribute, AttributeName, AttributeSet, Comparison, ConceptReference, ConstraintOperator,
    EclExpression, ExpressionComparisonOperator, Focus, Refinement, SubExpression,
};
use crate::error::{EclError, EclResult, Feature};
use crate::parser::parse;
use crate::query::{AttributeRefinement, Relation, RefinementOperator, StructuredQuery};
use crate::SctId;

/// Builds [`StructuredQuery`] values from syntax trees.
///
/// # Examples
///
/// ```rust
/// use snomed_query_ecl::{parse, QueryBuilder, Relation};
///
/// let expr = parse("< 404684003 : 363698007 = 39057004").unwrap();
/// let query = QueryBuilder::build(&expr).unwrap();
/// assert_eq!(query.focus_id(), Some(404684003));
/// assert_eq!(query.relation(), Relation::DescendantOf);
/// assert!(query.refinement().is_some());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    /// Folds the tree into a query, or returns the first rejection.
    pub fn build(expr: &EclExpression) -> EclResult<StructuredQuery> {
        let result = expression(expr);
        match &result {
            Ok(query) => tracing::debug!(query = %query, "built structured query"),
            Err(err) => tracing::debug!(error = %err, "query rejected"),
        }
        result
    }
}

/// Parses and builds in one step.
///
/// ```rust
/// use snomed_query_ecl::{parse_query, EclError, Feature};
///
/// assert!(parse_query("<< 73211009").is_ok());
/// assert_eq!(
///     parse_query("^ 700043003"),
///     Err(EclError::unsupported(Feature::MemberOf))
/// );
/// ```
pub fn parse_query(input: &str) -> EclResult<StructuredQuery> {
    let expr = parse(input)?;
    QueryBuilder::build(&expr)
}

fn expression(expr: &EclExpression) -> EclResult<StructuredQuery> {
    match expr {
        EclExpression::Simple(sub) => focus(sub),
        EclExpression::Refined {
            focus: sub,
            refinement: refinement_tree,
        } => {
            let query = focus(sub)?;
            let refinement = refinement(refinement_tree)?;
            Ok(query.with_refinement(refinement))
        }
        EclExpression::And(..) | EclExpression::Or(..) | EclExpression::Minus(..) => {
            Err(EclError::unsupported(Feature::CompoundExpression))
        }
        EclExpression::MemberOf(..) => Err(EclError::unsupported(Feature::MemberOf)),
    }
}

fn focus(sub: &SubExpression) -> EclResult<StructuredQuery> {
    if sub.member_of {
        return Err(EclError::unsupported(Feature::MemberOf));
    }

    match &sub.focus {
        Focus::Wildcard => match sub.operator {
            // Every one of these denotes the whole hierarchy
            None
            | Some(ConstraintOperator::DescendantOrSelfOf)
            | Some(ConstraintOperator::AncestorOrSelfOf) => Ok(StructuredQuery::wildcard()),
            Some(ConstraintOperator::DescendantOf) | Some(ConstraintOperator::AncestorOf) => {
                Err(EclError::unsupported(Feature::WildcardHierarchyOperator))
            }
        },
        Focus::Concept(reference) => Ok(StructuredQuery::concept(
            concept_id(reference)?,
            relation(sub.operator),
        )),
        Focus::Nested(_) => Err(EclError::unsupported(Feature::CompoundExpression)),
    }
}

fn relation(operator: Option<ConstraintOperator>) -> Relation {
    match operator {
        None => Relation::SelfOnly,
        Some(ConstraintOperator::DescendantOf) => Relation::DescendantOf,
        Some(ConstraintOperator::DescendantOrSelfOf) => Relation::DescendantOrSelfOf,
        Some(ConstraintOperator::AncestorOf) => Relation::AncestorOf,
        Some(ConstraintOperator::AncestorOrSelfOf) => Relation::AncestorOrSelfOf,
    }
}

fn concept_id(reference: &ConceptReference) -> EclResult<SctId> {
    reference
        .concept_id
        .parse::<SctId>()
        .map_err(|_| EclError::InvalidConceptId(reference.concept_id.clone()))
}

fn refinement(refinement: &Refinement) -> EclResult<AttributeRefinement> {
    match refinement {
        Refinement::Attributes(set) => attribute_set(set),
        Refinement::Nested(inner) => self::refinement(inner),
        Refinement::Group(_) => Err(EclError::unsupported(Feature::AttributeGroup)),
        Refinement::Conjunction(_) => Err(EclError::unsupported(Feature::ConjunctionRefinementSet)),
        Refinement::Disjunction(_) => Err(EclError::unsupported(Feature::DisjunctionRefinementSet)),
    }
}

fn attribute_set(set: &AttributeSet) -> EclResult<AttributeRefinement> {
    match set {
        AttributeSet::Attribute(attr) => attribute(attr),
        AttributeSet::Nested(inner) => attribute_set(inner),
        AttributeSet::Name(name) => Err(EclError::MissingComparison(name.to_string())),
        AttributeSet::Conjunction(_) => Err(EclError::unsupported(Feature::ConjunctionAttributeSet)),
        AttributeSet::Disjunction(_) => Err(EclError::unsupported(Feature::DisjunctionAttributeSet)),
    }
}

fn attribute(attr: &Attribute) -> EclResult<AttributeRefinement> {
    let name = match &attr.name {
        AttributeName::Concept(reference) => concept_id(reference)?,
        AttributeName::Wildcard => {
            return Err(EclError::unsupported(Feature::WildcardAttributeName))
        }
    };

    match &attr.comparison {
        Comparison::Expression { operator, value } => Ok(AttributeRefinement::new(
            name,
            refinement_operator(*operator),
            attribute_value(value)?,
        )),
        Comparison::String { .. } => Err(EclError::unsupported(Feature::StringComparisonOperator)),
        Comparison::Numeric { .. } => {
            Err(EclError::unsupported(Feature::NumericComparisonOperator))
        }
    }
}

fn refinement_operator(operator: ExpressionComparisonOperator) -> RefinementOperator {
    match operator {
        ExpressionComparisonOperator::Equal => RefinementOperator::Equals,
        ExpressionComparisonOperator::NotEqual => RefinementOperator::NotEquals,
    }
}

/// Only a bare concept id is a supported value.
fn attribute_value(value: &SubExpression) -> EclResult<SctId> {
    if value.member_of {
        return Err(EclError::unsupported(Feature::MemberOf));
    }
    match (&value.operator, &value.focus) {
        (None, Focus::Concept(reference)) => concept_id(reference),
        _ => Err(EclError::unsupported(Feature::ExpressionAttributeValue)),
    }
}
