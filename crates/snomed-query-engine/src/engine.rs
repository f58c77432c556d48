//! The query engine: parse, evaluate and project.

use std::time::Instant;

use snomed_query_ecl::{parse_query, Relation, SctId, StructuredQuery};
use snomed_query_index::ConceptIndex;
use tracing::instrument;

use crate::cache::{normalize_cache_key, ParseCache};
use crate::config::EngineConfig;
use crate::error::{EngineResult, QueryError};
use crate::evaluator::{Evaluation, Evaluator};
use crate::projection::{project, ConceptResult};
use crate::result::{ExecutionStats, QueryResult};

/// Evaluates ECL query strings against a [`ConceptIndex`].
///
/// The engine borrows the index and never mutates it, so one index can back
/// any number of engines across threads.
///
/// # Example
///
/// ```rust
/// use snomed_query_engine::QueryEngine;
/// use snomed_query_index::ConceptIndexBuilder;
///
/// let mut builder = ConceptIndexBuilder::new();
/// builder
///     .add_concept(138875005, "SNOMED CT Concept (SNOMED RT+CTV3)")
///     .add_concept(404684003, "Clinical finding (finding)")
///     .add_is_a(404684003, 138875005);
/// let index = builder.build().unwrap();
///
/// let engine = QueryEngine::new(&index);
/// let results = engine.evaluate("<< 138875005").unwrap();
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[1].fsn, "Clinical finding (finding)");
/// ```
pub struct QueryEngine<'a> {
    index: &'a dyn ConceptIndex,
    config: EngineConfig,
    cache: Option<ParseCache>,
}

impl<'a> QueryEngine<'a> {
    /// Creates an engine with the default configuration.
    pub fn new(index: &'a dyn ConceptIndex) -> Self {
        Self::with_config(index, EngineConfig::default())
    }

    /// Creates an engine with a custom configuration.
    pub fn with_config(index: &'a dyn ConceptIndex, config: EngineConfig) -> Self {
        let cache = config.parse_cache.clone().map(ParseCache::new);
        Self {
            index,
            config,
            cache,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the parse cache, if enabled.
    pub fn cache(&self) -> Option<&ParseCache> {
        self.cache.as_ref()
    }

    /// Evaluates a query string and returns the matching concepts.
    ///
    /// A blank query yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Syntax`] for malformed input
    /// - [`QueryError::UnsupportedFeature`] for ECL the engine does not evaluate
    /// - [`QueryError::NotFound`] if the focus or one of its ancestors is missing
    /// - [`QueryError::ResultTooLarge`] if `max_results` is exceeded
    pub fn evaluate(&self, query: &str) -> EngineResult<Vec<ConceptResult>> {
        self.execute(query).map(|result| result.concepts)
    }

    /// Like [`evaluate`](Self::evaluate), with execution statistics.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&self, query: &str) -> EngineResult<QueryResult> {
        let start = Instant::now();
        if query.trim().is_empty() {
            tracing::debug!("blank query");
            return Ok(QueryResult::empty());
        }

        let (structured, cache_hit) = self.parse_cached(query)?;
        let evaluation = self.run(&structured)?;

        let stats = ExecutionStats::new(start.elapsed(), evaluation.candidates_examined, cache_hit);
        Ok(QueryResult::new(project(evaluation.concepts), stats))
    }

    /// Evaluates an already built query.
    pub fn evaluate_structured(&self, query: &StructuredQuery) -> EngineResult<Vec<ConceptResult>> {
        self.run(query).map(|evaluation| project(evaluation.concepts))
    }

    /// Parses and validates a query without evaluating it.
    ///
    /// Uses the parse cache when enabled.
    pub fn parse(&self, query: &str) -> EngineResult<StructuredQuery> {
        self.parse_cached(query).map(|(structured, _)| structured)
    }

    /// Checks whether a concept satisfies a query.
    ///
    /// Cheaper than evaluating: only the focus, its ancestors and the
    /// candidate are examined. An unknown `concept_id` does not match; an
    /// unknown focus or dangling focus ancestor is still
    /// [`QueryError::NotFound`].
    #[instrument(level = "debug", skip(self))]
    pub fn matches(&self, concept_id: SctId, query: &str) -> EngineResult<bool> {
        let (structured, _) = self.parse_cached(query)?;
        self.evaluator()
            .matches(concept_id, &structured)
            .inspect_err(|e| warn_failed(query, e))
    }

    /// Number of concepts in the index.
    pub fn count_concepts(&self) -> usize {
        self.index.concept_count()
    }

    /// Looks up a single concept.
    pub fn retrieve_concept(&self, id: SctId) -> EngineResult<ConceptResult> {
        self.index
            .concept(id)
            .map(ConceptResult::from)
            .ok_or(QueryError::NotFound(id))
    }

    /// All ancestors of a concept, nearest first.
    pub fn retrieve_ancestors(&self, id: SctId) -> EngineResult<Vec<ConceptResult>> {
        self.evaluate_structured(&StructuredQuery::concept(id, Relation::AncestorOf))
    }

    /// All strict descendants of a concept.
    ///
    /// An id that is not in the index has no descendants.
    pub fn retrieve_descendants(&self, id: SctId) -> Vec<ConceptResult> {
        project(self.index.concepts_with_ancestor(id))
    }

    /// The first `limit` concept ids, in index order.
    pub fn list_concepts(&self, limit: usize) -> Vec<SctId> {
        self.index.concept_ids().take(limit).collect()
    }

    fn evaluator(&self) -> Evaluator<'a> {
        Evaluator::new(self.index, self.config.root_concept).with_parallel(self.config.parallel)
    }

    fn parse_cached(&self, query: &str) -> EngineResult<(StructuredQuery, bool)> {
        let Some(cache) = &self.cache else {
            return parse_checked(query).map(|structured| (structured, false));
        };

        let key = normalize_cache_key(query);
        if let Some(structured) = cache.get(&key) {
            tracing::debug!(query = %key, "parse cache hit");
            return Ok((structured, true));
        }

        let structured = parse_checked(query)?;
        cache.set(key, structured.clone());
        Ok((structured, false))
    }

    fn run(&self, query: &StructuredQuery) -> EngineResult<Evaluation<'a>> {
        let evaluation = self
            .evaluator()
            .evaluate(query)
            .inspect_err(|e| warn_failed(&query.to_string(), e))?;

        if let Some(limit) = self.config.max_results {
            let count = evaluation.concepts.len();
            if count > limit {
                tracing::warn!(query = %query, count, limit, "result set too large");
                return Err(QueryError::ResultTooLarge { count, limit });
            }
        }
        Ok(evaluation)
    }
}

impl std::fmt::Debug for QueryEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("concept_count", &self.index.concept_count())
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}

fn parse_checked(query: &str) -> EngineResult<StructuredQuery> {
    parse_query(query).map_err(|e| {
        let err = QueryError::from(e);
        warn_failed(query, &err);
        err
    })
}

fn warn_failed(query: &str, err: &QueryError) {
    match err {
        QueryError::UnsupportedFeature(feature) => {
            tracing::warn!(query, %feature, "unsupported ECL feature");
        }
        QueryError::NotFound(id) => {
            tracing::warn!(query, concept = id, "concept not found");
        }
        QueryError::Syntax(e) => {
            tracing::debug!(query, error = %e, "invalid query");
        }
        QueryError::ResultTooLarge { .. } => {}
    }
}
