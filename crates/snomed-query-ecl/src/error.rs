//! Error types for ECL parsing and query building.

use thiserror::Error;

/// ECL constructs that are recognised by the parser but rejected by the
/// query builder.
///
/// The [`Display`](std::fmt::Display) form is the grammar name of the
/// construct, e.g. `conjunctionAttributeSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Feature {
    /// Compound (`AND`/`OR`/`MINUS`) or nested expression constraints.
    CompoundExpression,
    /// Reference set membership: `^ 700043003`.
    MemberOf,
    /// Refinements joined by a conjunction: `{ a = b }, { c = d }`.
    ConjunctionRefinementSet,
    /// Refinements joined by a disjunction: `{ a = b } OR { c = d }`.
    DisjunctionRefinementSet,
    /// Attributes joined by a conjunction: `a = b, c = d`.
    ConjunctionAttributeSet,
    /// Attributes joined by a disjunction: `a = b OR c = d`.
    DisjunctionAttributeSet,
    /// Grouped attributes: `{ a = b }`.
    AttributeGroup,
    /// String comparison: `a = "text"`.
    StringComparisonOperator,
    /// Numeric comparison: `a >= #10`.
    NumericComparisonOperator,
    /// Wildcard attribute name: `* = b`.
    WildcardAttributeName,
    /// Attribute value that is not a single concept: `a = *`, `a = << b`.
    ExpressionAttributeValue,
    /// Strict hierarchy operator applied to the wildcard: `< *`, `> *`.
    WildcardHierarchyOperator,
}

impl Feature {
    /// Grammar name of the construct.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::CompoundExpression => "compoundExpressionConstraint",
            Feature::MemberOf => "memberOf",
            Feature::ConjunctionRefinementSet => "conjunctionRefinementSet",
            Feature::DisjunctionRefinementSet => "disjunctionRefinementSet",
            Feature::ConjunctionAttributeSet => "conjunctionAttributeSet",
            Feature::DisjunctionAttributeSet => "disjunctionAttributeSet",
            Feature::AttributeGroup => "attributeGroup",
            Feature::StringComparisonOperator => "stringComparisonOperator",
            Feature::NumericComparisonOperator => "numericComparisonOperator",
            Feature::WildcardAttributeName => "wildcardAttributeName",
            Feature::ExpressionAttributeValue => "expressionConstraintValue",
            Feature::WildcardHierarchyOperator => "wildcardHierarchyOperator",
        }
    }

    /// Human readable rejection message.
    pub fn message(&self) -> String {
        match self {
            Feature::CompoundExpression => {
                "This expression is not currently supported, please use a simpleExpressionConstraint."
                    .to_string()
            }
            other => format!("{} is not currently supported.", other.name()),
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur during ECL parsing and query building.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EclError {
    /// Parse error at a specific position in the input.
    #[error("parse error at position {position}: {message}")]
    ParseError {
        /// Position in the input where the error occurred.
        position: usize,
        /// Description of the error, including the offending fragment.
        message: String,
    },

    /// Brackets nested deeper than the parser accepts.
    #[error("expression nested deeper than {limit} levels at position {position}")]
    NestingTooDeep {
        /// Position of the bracket that exceeded the limit.
        position: usize,
        /// The nesting limit.
        limit: usize,
    },

    /// Attribute name with no comparison outside an attribute set.
    #[error("attribute {0} has no comparison")]
    MissingComparison(String),

    /// Well-formed ECL that uses a construct outside the supported subset.
    #[error("unsupported ECL feature: {}", feature.message())]
    UnsupportedFeature {
        /// The rejected construct.
        feature: Feature,
    },

    /// Empty input provided.
    #[error("empty ECL expression")]
    EmptyExpression,

    /// Concept ID literal that does not fit a 64-bit identifier.
    #[error("invalid concept ID: {0}")]
    InvalidConceptId(String),
}

impl EclError {
    /// Shorthand for an [`EclError::UnsupportedFeature`].
    pub fn unsupported(feature: Feature) -> Self {
        Self::UnsupportedFeature { feature }
    }

    /// True for the malformed-input variants (everything except
    /// [`EclError::UnsupportedFeature`]).
    pub fn is_syntax_error(&self) -> bool {
        !matches!(self, EclError::UnsupportedFeature { .. })
    }
}

/// Result type for ECL operations.
pub type EclResult<T> = std::result::Result<T, EclError>;
