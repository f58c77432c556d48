//! Query result types.

use std::time::Duration;

use snomed_query_ecl::SctId;

use crate::projection::ConceptResult;

/// Result of a query execution.
///
/// Contains the matching concepts, in evaluation order, and execution
/// statistics.
///
/// # Example
///
/// ```ignore
/// let result = engine.execute("<< 73211009")?;
///
/// println!("Found {} concepts", result.count());
///
/// if result.contains(46635009) {
///     println!("Type 2 diabetes is included");
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Matching concepts, focus first where it is included.
    pub concepts: Vec<ConceptResult>,
    /// Execution statistics.
    pub stats: ExecutionStats,
}

impl QueryResult {
    /// Creates a new QueryResult.
    pub fn new(concepts: Vec<ConceptResult>, stats: ExecutionStats) -> Self {
        Self { concepts, stats }
    }

    /// Creates an empty QueryResult.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of matching concepts.
    pub fn count(&self) -> usize {
        self.concepts.len()
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Checks if a specific concept is in the result set.
    pub fn contains(&self, concept_id: SctId) -> bool {
        self.concepts.iter().any(|c| c.id == concept_id)
    }

    /// Returns an iterator over matching concepts.
    pub fn iter(&self) -> std::slice::Iter<'_, ConceptResult> {
        self.concepts.iter()
    }

    /// Matching concept ids, in result order.
    pub fn ids(&self) -> Vec<SctId> {
        self.concepts.iter().map(|c| c.id).collect()
    }
}

impl IntoIterator for QueryResult {
    type Item = ConceptResult;
    type IntoIter = std::vec::IntoIter<ConceptResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.concepts.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a ConceptResult;
    type IntoIter = std::slice::Iter<'a, ConceptResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.concepts.iter()
    }
}

/// Statistics from query execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Total execution duration, parsing included.
    pub duration: Duration,
    /// Concepts considered before the refinement filter.
    pub candidates_examined: usize,
    /// Whether the parsed query came from the parse cache.
    pub parse_cache_hit: bool,
}

impl ExecutionStats {
    /// Creates new execution stats.
    pub fn new(duration: Duration, candidates_examined: usize, parse_cache_hit: bool) -> Self {
        Self {
            duration,
            candidates_examined,
            parse_cache_hit,
        }
    }
}
