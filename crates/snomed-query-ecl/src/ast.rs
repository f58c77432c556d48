//! Syntax tree types for ECL expression constraints.
//!
//! The tree covers the supported subset of ECL plus every construct the
//! query builder needs to recognise in order to reject it by name
//! (compound constraints, attribute sets, groups, member-of, string and
//! numeric comparisons). Concept ids are kept as the literal digit string
//! from the input; conversion to [`SctId`](crate::SctId) happens in the
//! builder so that out-of-range literals are reported precisely.

use std::fmt;

// =============================================================================
// Focus
// =============================================================================

/// A concept reference: `404684003 |Clinical finding|`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConceptReference {
    /// The concept id digits as written.
    pub concept_id: String,
    /// Optional term between pipes, trimmed.
    pub term: Option<String>,
}

impl ConceptReference {
    /// Creates a reference without a term.
    pub fn new(concept_id: impl Into<String>) -> Self {
        Self {
            concept_id: concept_id.into(),
            term: None,
        }
    }

    /// Creates a reference with a term.
    pub fn with_term(concept_id: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            concept_id: concept_id.into(),
            term: Some(term.into()),
        }
    }
}

impl fmt::Display for ConceptReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.term {
            Some(term) => write!(f, "{} |{}|", self.concept_id, term),
            None => write!(f, "{}", self.concept_id),
        }
    }
}

/// Hierarchy operators that may prefix a focus concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::enum_variant_names)]
pub enum ConstraintOperator {
    /// `<`
    DescendantOf,
    /// `<<`
    DescendantOrSelfOf,
    /// `>`
    AncestorOf,
    /// `>>`
    AncestorOrSelfOf,
}

impl ConstraintOperator {
    /// The operator symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            ConstraintOperator::DescendantOf => "<",
            ConstraintOperator::DescendantOrSelfOf => "<<",
            ConstraintOperator::AncestorOf => ">",
            ConstraintOperator::AncestorOrSelfOf => ">>",
        }
    }
}

impl fmt::Display for ConstraintOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The focus of a sub-expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Focus {
    /// A single concept.
    Concept(ConceptReference),
    /// `*`
    Wildcard,
    /// A parenthesised expression constraint: `( ... )`.
    Nested(Box<EclExpression>),
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Focus::Concept(concept) => write!(f, "{}", concept),
            Focus::Wildcard => write!(f, "*"),
            Focus::Nested(inner) => write!(f, "({})", inner),
        }
    }
}

/// `[constraintOperator] [^] focus`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubExpression {
    /// Optional hierarchy operator.
    pub operator: Option<ConstraintOperator>,
    /// Whether the focus is prefixed with the member-of operator `^`.
    pub member_of: bool,
    /// The focus.
    pub focus: Focus,
}

impl SubExpression {
    /// A bare focus concept with no operators.
    pub fn concept(reference: ConceptReference) -> Self {
        Self {
            operator: None,
            member_of: false,
            focus: Focus::Concept(reference),
        }
    }
}

impl fmt::Display for SubExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(op) = self.operator {
            write!(f, "{} ", op)?;
        }
        if self.member_of {
            write!(f, "^ ")?;
        }
        write!(f, "{}", self.focus)
    }
}

// =============================================================================
// Refinement
// =============================================================================

/// `=` or `!=` in an expression or string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpressionComparisonOperator {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
}

impl fmt::Display for ExpressionComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionComparisonOperator::Equal => write!(f, "="),
            ExpressionComparisonOperator::NotEqual => write!(f, "!="),
        }
    }
}

/// Comparison operators for numeric concrete values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericComparisonOperator {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
}

impl fmt::Display for NumericComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericComparisonOperator::Equal => write!(f, "="),
            NumericComparisonOperator::NotEqual => write!(f, "!="),
            NumericComparisonOperator::LessThan => write!(f, "<"),
            NumericComparisonOperator::LessThanOrEqual => write!(f, "<="),
            NumericComparisonOperator::GreaterThan => write!(f, ">"),
            NumericComparisonOperator::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// The comparison half of an attribute: operator plus value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparison {
    /// `= 39057004`, `!= << 39057004`
    Expression {
        /// The operator.
        operator: ExpressionComparisonOperator,
        /// The value constraint.
        value: SubExpression,
    },
    /// `= "text"`
    String {
        /// The operator.
        operator: ExpressionComparisonOperator,
        /// The unquoted string.
        value: String,
    },
    /// `>= #10`
    Numeric {
        /// The operator.
        operator: NumericComparisonOperator,
        /// The number as written (without `#`).
        value: String,
    },
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Expression { operator, value } => write!(f, "{} {}", operator, value),
            Comparison::String { operator, value } => write!(f, "{} \"{}\"", operator, value),
            Comparison::Numeric { operator, value } => write!(f, "{} #{}", operator, value),
        }
    }
}

/// Attribute name: a concept or `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeName {
    /// A relationship type concept.
    Concept(ConceptReference),
    /// `*`
    Wildcard,
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeName::Concept(concept) => write!(f, "{}", concept),
            AttributeName::Wildcard => write!(f, "*"),
        }
    }
}

/// A single attribute constraint.
///
/// Example: `363698007 |Finding site| = 39057004 |Pulmonary valve|`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    /// The attribute (relationship type).
    pub name: AttributeName,
    /// The comparison applied to its values.
    pub comparison: Comparison,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.comparison)
    }
}

/// One or more attributes joined by a single kind of connective.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeSet {
    /// A single attribute.
    Attribute(Attribute),
    /// An attribute name with no comparison, as in `a AND b = c`. Only
    /// parsed as a member of a conjunction or disjunction.
    Name(AttributeName),
    /// `( attributeSet )`
    Nested(Box<AttributeSet>),
    /// `a, b` or `a AND b`
    Conjunction(Vec<AttributeSet>),
    /// `a OR b`
    Disjunction(Vec<AttributeSet>),
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeSet::Attribute(attribute) => write!(f, "{}", attribute),
            AttributeSet::Name(name) => write!(f, "{}", name),
            AttributeSet::Nested(inner) => write!(f, "({})", inner),
            AttributeSet::Conjunction(items) => write_joined(f, items, ", "),
            AttributeSet::Disjunction(items) => write_joined(f, items, " OR "),
        }
    }
}

/// The refinement clause after `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Refinement {
    /// Ungrouped attributes.
    Attributes(AttributeSet),
    /// `{ attributeSet }`
    Group(AttributeSet),
    /// `( refinement )`
    Nested(Box<Refinement>),
    /// Sub-refinements joined by `,` or `AND`.
    Conjunction(Vec<Refinement>),
    /// Sub-refinements joined by `OR`.
    Disjunction(Vec<Refinement>),
}

impl fmt::Display for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refinement::Attributes(set) => write!(f, "{}", set),
            Refinement::Group(set) => write!(f, "{{ {} }}", set),
            Refinement::Nested(inner) => write!(f, "({})", inner),
            Refinement::Conjunction(items) => write_joined(f, items, ", "),
            Refinement::Disjunction(items) => write_joined(f, items, " OR "),
        }
    }
}

// =============================================================================
// Expression constraint
// =============================================================================

/// A parsed ECL expression constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EclExpression {
    /// `[operator] focus`
    Simple(SubExpression),
    /// `[operator] focus : refinement`
    Refined {
        /// The constrained focus.
        focus: SubExpression,
        /// The refinement clause.
        refinement: Refinement,
    },
    /// `left AND right` (also `left, right`)
    And(Box<EclExpression>, Box<EclExpression>),
    /// `left OR right`
    Or(Box<EclExpression>, Box<EclExpression>),
    /// `left MINUS right`
    Minus(Box<EclExpression>, Box<EclExpression>),
    /// `left ^ right`
    MemberOf(Box<EclExpression>, Box<EclExpression>),
}

impl EclExpression {
    /// True for `And`, `Or` and `Minus`.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            EclExpression::And(..) | EclExpression::Or(..) | EclExpression::Minus(..)
        )
    }
}

impl fmt::Display for EclExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EclExpression::Simple(sub) => write!(f, "{}", sub),
            EclExpression::Refined { focus, refinement } => {
                write!(f, "{} : {}", focus, refinement)
            }
            EclExpression::And(left, right) => write!(f, "{} AND {}", left, right),
            EclExpression::Or(left, right) => write!(f, "{} OR {}", left, right),
            EclExpression::Minus(left, right) => write!(f, "{} MINUS {}", left, right),
            EclExpression::MemberOf(left, right) => write!(f, "{} ^ {}", left, right),
        }
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
