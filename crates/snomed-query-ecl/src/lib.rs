//! # snomed-query-ecl
//!
//! Parser and query builder for the subset of SNOMED CT Expression
//! Constraint Language (ECL) understood by the query engine.
//!
//! This crate provides:
//! - **ECL Parser**: Parse ECL text into a syntax tree ([`EclExpression`])
//! - **Query Builder**: Fold the tree into a validated [`StructuredQuery`],
//!   rejecting unsupported constructs by name
//!
//! The parser accepts a wider grammar than the builder. Compound
//! constraints, attribute sets, groups, member-of and concrete value
//! comparisons all parse, so that malformed input ([`EclError::ParseError`])
//! is reported differently from well-formed input the engine cannot answer
//! ([`EclError::UnsupportedFeature`]).
//!
//! ## Usage
//!
//! ```rust
//! use snomed_query_ecl::{parse_query, EclError, Feature, Relation};
//!
//! let query = parse_query("<< 404684003 |Clinical finding|").unwrap();
//! assert_eq!(query.focus_id(), Some(404684003));
//! assert_eq!(query.relation(), Relation::DescendantOrSelfOf);
//!
//! let err = parse_query("< 19829001 AND < 301867009").unwrap_err();
//! assert_eq!(err, EclError::unsupported(Feature::CompoundExpression));
//! ```
//!
//! ## Supported Syntax
//!
//! | Query | Meaning |
//! |-------|---------|
//! | `404684003` | The concept itself |
//! | `< 404684003` | Descendants of |
//! | `<< 404684003` | Descendants or self of |
//! | `> 404684003` | Ancestors of |
//! | `>> 404684003` | Ancestors or self of |
//! | `*` | Every concept under the root |
//! | `< 404684003 : 363698007 = 39057004` | Descendants with a matching attribute value |
//! | `< 404684003 : 363698007 != 39057004` | Descendants with some other attribute value |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ast;
mod builder;
mod error;
mod parser;
mod query;

pub use ast::{
    Attribute, AttributeName, AttributeSet, Comparison, ConceptReference, ConstraintOperator,
    EclExpression, ExpressionComparisonOperator, Focus, NumericComparisonOperator, Refinement,
    SubExpression,
};
pub use builder::{parse_query, QueryBuilder};
pub use error::{EclError, EclResult, Feature};
pub use parser::{parse, MAX_NESTING_DEPTH};
pub use query::{AttributeRefinement, QueryFocus, RefinementOperator, Relation, StructuredQuery};

/// SNOMED CT Identifier type (64-bit unsigned integer).
pub type SctId = u64;
