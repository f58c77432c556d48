//! The validated, structured form of a supported ECL query.

use std::fmt;

use crate::SctId;

/// Hierarchy relation between the focus concept and the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    /// No prefix: the focus concept itself.
    SelfOnly,
    /// `<`
    DescendantOf,
    /// `<<`
    DescendantOrSelfOf,
    /// `>`
    AncestorOf,
    /// `>>`
    AncestorOrSelfOf,
}

impl Relation {
    /// Whether the focus concept itself is part of the result.
    pub fn includes_self(&self) -> bool {
        matches!(
            self,
            Relation::SelfOnly | Relation::DescendantOrSelfOf | Relation::AncestorOrSelfOf
        )
    }

    /// The ECL prefix for this relation (empty for [`Relation::SelfOnly`]).
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::SelfOnly => "",
            Relation::DescendantOf => "<",
            Relation::DescendantOrSelfOf => "<<",
            Relation::AncestorOf => ">",
            Relation::AncestorOrSelfOf => ">>",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// What the query is anchored on.
///
/// The wildcard carries no relation: it always means "the hierarchy root and
/// everything below it".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryFocus {
    /// A specific concept.
    Concept {
        /// Focus concept id.
        id: SctId,
        /// Relation applied to the focus.
        relation: Relation,
    },
    /// `*`
    Wildcard,
}

/// `=` or `!=` in a refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefinementOperator {
    /// At least one stored value equals the refinement value.
    Equals,
    /// At least one stored value differs from the refinement value.
    NotEquals,
}

impl fmt::Display for RefinementOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefinementOperator::Equals => write!(f, "="),
            RefinementOperator::NotEquals => write!(f, "!="),
        }
    }
}

/// A single `attribute operator value` filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeRefinement {
    /// Attribute (relationship type) concept id.
    pub attribute: SctId,
    /// Comparison operator.
    pub operator: RefinementOperator,
    /// Value to compare stored attribute values against, in canonical
    /// decimal form.
    pub value: String,
}

impl AttributeRefinement {
    /// Creates a refinement against a concept value.
    pub fn new(attribute: SctId, operator: RefinementOperator, value: SctId) -> Self {
        Self {
            attribute,
            operator,
            value: value.to_string(),
        }
    }

    /// Applies the operator to a concept's stored values for the attribute.
    ///
    /// A concept with no values never matches, whatever the operator.
    pub fn accepts<S: AsRef<str>>(&self, values: &[S]) -> bool {
        match self.operator {
            RefinementOperator::Equals => values.iter().any(|v| v.as_ref() == self.value),
            RefinementOperator::NotEquals => values.iter().any(|v| v.as_ref() != self.value),
        }
    }
}

impl fmt::Display for AttributeRefinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.operator, self.value)
    }
}

/// A validated query: focus, relation and at most one refinement.
///
/// Produced by [`QueryBuilder`](crate::QueryBuilder); immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructuredQuery {
    focus: QueryFocus,
    refinement: Option<AttributeRefinement>,
}

impl StructuredQuery {
    /// A query anchored on a concept.
    pub fn concept(id: SctId, relation: Relation) -> Self {
        Self {
            focus: QueryFocus::Concept { id, relation },
            refinement: None,
        }
    }

    /// The wildcard query (every concept under the root).
    pub fn wildcard() -> Self {
        Self {
            focus: QueryFocus::Wildcard,
            refinement: None,
        }
    }

    /// Adds the refinement filter.
    pub fn with_refinement(mut self, refinement: AttributeRefinement) -> Self {
        self.refinement = Some(refinement);
        self
    }

    /// The focus.
    pub fn focus(&self) -> &QueryFocus {
        &self.focus
    }

    /// The focus concept id, or `None` for the wildcard.
    pub fn focus_id(&self) -> Option<SctId> {
        match self.focus {
            QueryFocus::Concept { id, .. } => Some(id),
            QueryFocus::Wildcard => None,
        }
    }

    /// The relation. Always [`Relation::DescendantOrSelfOf`] for the wildcard.
    pub fn relation(&self) -> Relation {
        match self.focus {
            QueryFocus::Concept { relation, .. } => relation,
            QueryFocus::Wildcard => Relation::DescendantOrSelfOf,
        }
    }

    /// True for the wildcard focus.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.focus, QueryFocus::Wildcard)
    }

    /// The refinement, if any.
    pub fn refinement(&self) -> Option<&AttributeRefinement> {
        self.refinement.as_ref()
    }
}

impl fmt::Display for StructuredQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.focus {
            QueryFocus::Wildcard => write!(f, "*")?,
            QueryFocus::Concept { id, relation } => match relation {
                Relation::SelfOnly => write!(f, "{}", id)?,
                other => write!(f, "{} {}", other, id)?,
            },
        }
        if let Some(refinement) = &self.refinement {
            write!(f, " : {}", refinement)?;
        }
        Ok(())
    }
}
