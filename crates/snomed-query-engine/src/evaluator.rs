//! Evaluation of structured queries against a concept index.
//!
//! Evaluation is a fixed pipeline:
//!
//! 1. Resolve the focus (the wildcard resolves to the configured root).
//! 2. Collect candidates for the relation using only point lookups and the
//!    index's exact-match ancestor lookup.
//! 3. Keep the candidates that pass the refinement, if there is one.
//!
//! Nothing here walks the hierarchy: every concept already carries its
//! ancestor closure.

use snomed_query_ecl::{AttributeRefinement, QueryFocus, Relation, SctId, StructuredQuery};
use snomed_query_index::{Concept, ConceptIndex};

use crate::error::{EngineResult, QueryError};

/// Candidate sets smaller than this are always filtered sequentially.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 4096;

/// Concepts selected by a query, before projection.
#[derive(Debug, Clone)]
pub struct Evaluation<'a> {
    /// Selected concepts, focus first where it is included.
    pub concepts: Vec<&'a Concept>,
    /// Concepts considered before the refinement filter.
    pub candidates_examined: usize,
}

/// Evaluates [`StructuredQuery`] values against a [`ConceptIndex`].
#[derive(Clone, Copy)]
pub struct Evaluator<'a> {
    index: &'a dyn ConceptIndex,
    root: SctId,
    parallel: bool,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator that anchors `*` on `root`.
    pub fn new(index: &'a dyn ConceptIndex, root: SctId) -> Self {
        Self {
            index,
            root,
            parallel: false,
        }
    }

    /// Enables parallel refinement filtering for large candidate sets.
    ///
    /// Has no effect unless the `parallel` feature is enabled.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Runs a query.
    ///
    /// Fails with [`QueryError::NotFound`] if the focus (or, for `>`/`>>`,
    /// any id in its ancestor closure) is not in the index.
    pub fn evaluate(&self, query: &StructuredQuery) -> EngineResult<Evaluation<'a>> {
        let (focus_id, relation) = self.resolve(query);
        let focus = self.lookup(focus_id)?;

        let mut candidates: Vec<&'a Concept> = Vec::new();
        if relation.includes_self() {
            candidates.push(focus);
        }

        match relation {
            Relation::SelfOnly => {}
            Relation::DescendantOf | Relation::DescendantOrSelfOf => {
                candidates.extend(self.index.concepts_with_ancestor(focus_id));
            }
            Relation::AncestorOf | Relation::AncestorOrSelfOf => {
                candidates.reserve(focus.ancestors.len());
                for &ancestor in &focus.ancestors {
                    candidates.push(self.lookup(ancestor)?);
                }
            }
        }

        let candidates_examined = candidates.len();
        let concepts = match query.refinement() {
            Some(refinement) => self.filter(candidates, refinement),
            None => candidates,
        };

        tracing::debug!(
            focus = focus_id,
            relation = %relation,
            candidates = candidates_examined,
            results = concepts.len(),
            "evaluated query"
        );

        Ok(Evaluation {
            concepts,
            candidates_examined,
        })
    }

    /// Checks whether one concept satisfies a query without collecting the
    /// whole result set.
    ///
    /// Fails exactly when [`evaluate`](Self::evaluate) would: the focus
    /// must exist and, for the ancestor relations, so must every ancestor
    /// it lists. An unknown `concept_id` simply does not match.
    pub fn matches(&self, concept_id: SctId, query: &StructuredQuery) -> EngineResult<bool> {
        let (focus_id, relation) = self.resolve(query);
        let focus = self.lookup(focus_id)?;
        if matches!(relation, Relation::AncestorOf | Relation::AncestorOrSelfOf) {
            for &ancestor in &focus.ancestors {
                self.lookup(ancestor)?;
            }
        }

        let Some(candidate) = self.index.concept(concept_id) else {
            return Ok(false);
        };

        let related = match relation {
            Relation::SelfOnly => concept_id == focus_id,
            Relation::DescendantOf => candidate.has_ancestor(focus_id),
            Relation::DescendantOrSelfOf => {
                concept_id == focus_id || candidate.has_ancestor(focus_id)
            }
            Relation::AncestorOf => focus.has_ancestor(concept_id),
            Relation::AncestorOrSelfOf => concept_id == focus_id || focus.has_ancestor(concept_id),
        };

        Ok(related && query.refinement().map_or(true, |r| passes(r, candidate)))
    }

    fn resolve(&self, query: &StructuredQuery) -> (SctId, Relation) {
        match *query.focus() {
            QueryFocus::Concept { id, relation } => (id, relation),
            QueryFocus::Wildcard => (self.root, Relation::DescendantOrSelfOf),
        }
    }

    fn lookup(&self, id: SctId) -> EngineResult<&'a Concept> {
        self.index.concept(id).ok_or(QueryError::NotFound(id))
    }

    #[cfg(feature = "parallel")]
    fn filter(
        &self,
        candidates: Vec<&'a Concept>,
        refinement: &AttributeRefinement,
    ) -> Vec<&'a Concept> {
        use rayon::prelude::*;

        if self.parallel && candidates.len() >= PARALLEL_THRESHOLD {
            return candidates
                .into_par_iter()
                .filter(|c| passes(refinement, c))
                .collect();
        }
        candidates
            .into_iter()
            .filter(|c| passes(refinement, c))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn filter(
        &self,
        candidates: Vec<&'a Concept>,
        refinement: &AttributeRefinement,
    ) -> Vec<&'a Concept> {
        candidates
            .into_iter()
            .filter(|c| passes(refinement, c))
            .collect()
    }
}

impl std::fmt::Debug for Evaluator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("concept_count", &self.index.concept_count())
            .field("root", &self.root)
            .field("parallel", &self.parallel)
            .finish()
    }
}

fn passes(refinement: &AttributeRefinement, concept: &Concept) -> bool {
    refinement.accepts(concept.attribute_values(refinement.attribute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snomed_query_ecl::{parse_query, RefinementOperator};
    use snomed_query_index::{ConceptIndexBuilder, MemoryConceptIndex};

    const ROOT: SctId = 1;
    const ATTR: SctId = 900;

    /// ```text
    /// 1
    /// ├── 10
    /// │   ├── 11  (900 = 50)
    /// │   └── 12  (900 = 50, 900 = 60)
    /// └── 20
    ///     └── 21  (900 = 60)
    /// ```
    fn create_test_index() -> MemoryConceptIndex {
        let mut builder = ConceptIndexBuilder::new();
        builder
            .add_concept(1, "Root")
            .add_concept(10, "Left")
            .add_concept(11, "Left one")
            .add_concept(12, "Left two")
            .add_concept(20, "Right")
            .add_concept(21, "Right one")
            .add_is_a(10, 1)
            .add_is_a(11, 10)
            .add_is_a(12, 10)
            .add_is_a(20, 1)
            .add_is_a(21, 20)
            .add_attribute(11, ATTR, "50")
            .add_attribute(12, ATTR, "50")
            .add_attribute(12, ATTR, "60")
            .add_attribute(21, ATTR, "60");
        builder.build().unwrap()
    }

    fn ids(evaluation: &Evaluation<'_>) -> Vec<SctId> {
        evaluation.concepts.iter().map(|c| c.id).collect()
    }

    fn run(index: &MemoryConceptIndex, ecl: &str) -> EngineResult<Vec<SctId>> {
        let query = parse_query(ecl).unwrap();
        Evaluator::new(index, ROOT)
            .evaluate(&query)
            .map(|e| ids(&e))
    }

    mod relations {
        use super::*;

        #[test]
        fn test_self() {
            let index = create_test_index();
            assert_eq!(run(&index, "10").unwrap(), vec![10]);
        }

        #[test]
        fn test_descendant_of_excludes_focus() {
            let index = create_test_index();
            assert_eq!(run(&index, "< 10").unwrap(), vec![11, 12]);
        }

        #[test]
        fn test_descendant_or_self_puts_focus_first() {
            let index = create_test_index();
            assert_eq!(run(&index, "<< 10").unwrap(), vec![10, 11, 12]);
        }

        #[test]
        fn test_ancestor_of_nearest_first() {
            let index = create_test_index();
            assert_eq!(run(&index, "> 11").unwrap(), vec![10, 1]);
            assert_eq!(run(&index, ">> 11").unwrap(), vec![11, 10, 1]);
        }

        #[test]
        fn test_root_has_no_ancestors() {
            let index = create_test_index();
            assert!(run(&index, "> 1").unwrap().is_empty());
        }

        #[test]
        fn test_leaf_has_no_descendants() {
            let index = create_test_index();
            assert!(run(&index, "< 21").unwrap().is_empty());
        }

        #[test]
        fn test_wildcard_is_everything_under_root() {
            let index = create_test_index();
            let all = run(&index, "*").unwrap();
            assert_eq!(all.len(), index.concept_count());
            assert_eq!(all[0], ROOT);
        }
    }

    mod refinements {
        use super::*;

        #[test]
        fn test_equals() {
            let index = create_test_index();
            assert_eq!(run(&index, "< 1 : 900 = 50").unwrap(), vec![11, 12]);
        }

        #[test]
        fn test_not_equals_any_value_differs() {
            let index = create_test_index();
            // 12 holds {50, 60} so it passes; concepts without 900 never do.
            assert_eq!(run(&index, "< 1 : 900 != 50").unwrap(), vec![12, 21]);
        }

        #[test]
        fn test_refinement_applies_to_focus() {
            let index = create_test_index();
            assert!(run(&index, "10 : 900 = 50").unwrap().is_empty());
            assert_eq!(run(&index, "11 : 900 = 50").unwrap(), vec![11]);
        }

        #[test]
        fn test_candidates_counted_before_filter() {
            let index = create_test_index();
            let query = parse_query("< 1 : 900 = 60").unwrap();
            let evaluation = Evaluator::new(&index, ROOT).evaluate(&query).unwrap();

            assert_eq!(evaluation.candidates_examined, 5);
            assert_eq!(ids(&evaluation), vec![12, 21]);
        }

        #[test]
        fn test_parallel_flag_same_result() {
            let index = create_test_index();
            let query = StructuredQuery::wildcard().with_refinement(AttributeRefinement::new(
                ATTR,
                RefinementOperator::Equals,
                60,
            ));
            let evaluation = Evaluator::new(&index, ROOT)
                .with_parallel(true)
                .evaluate(&query)
                .unwrap();
            assert_eq!(ids(&evaluation), vec![12, 21]);
        }
    }

    mod not_found {
        use super::*;

        #[test]
        fn test_unknown_focus() {
            let index = create_test_index();
            assert_eq!(run(&index, "<< 999"), Err(QueryError::NotFound(999)));
        }

        #[test]
        fn test_unknown_root_for_wildcard() {
            let index = create_test_index();
            let evaluator = Evaluator::new(&index, 424242);
            let result = evaluator.evaluate(&StructuredQuery::wildcard());
            assert!(matches!(result, Err(QueryError::NotFound(424242))));
        }

        #[test]
        fn test_dangling_ancestor() {
            let index = MemoryConceptIndex::from_concepts([
                Concept::new(1, "Root"),
                Concept::new(2, "Child").with_ancestors([1, 77]),
            ])
            .unwrap();

            assert_eq!(run(&index, "> 2"), Err(QueryError::NotFound(77)));
            assert_eq!(run(&index, "< 1").unwrap(), vec![2]);
        }
    }

    mod matching {
        use super::*;

        fn check(index: &MemoryConceptIndex, ecl: &str, id: SctId) -> bool {
            let query = parse_query(ecl).unwrap();
            Evaluator::new(index, ROOT).matches(id, &query).unwrap()
        }

        #[test]
        fn test_matches_agrees_with_evaluate() {
            let index = create_test_index();
            let queries = [
                "10", "< 10", "<< 10", "> 11", ">> 11", "*", "< 1 : 900 = 50", "< 1 : 900 != 50",
            ];

            for ecl in queries {
                let selected = run(&index, ecl).unwrap();
                for id in index.concept_ids() {
                    assert_eq!(
                        check(&index, ecl, id),
                        selected.contains(&id),
                        "{} / {}",
                        ecl,
                        id
                    );
                }
            }
        }

        #[test]
        fn test_unknown_candidate_does_not_match() {
            let index = create_test_index();
            assert!(!check(&index, "<< 1", 555));
        }

        #[test]
        fn test_unknown_focus_is_error() {
            let index = create_test_index();
            let query = parse_query("< 999").unwrap();
            let result = Evaluator::new(&index, ROOT).matches(11, &query);
            assert_eq!(result, Err(QueryError::NotFound(999)));
        }

        #[test]
        fn test_dangling_ancestor_is_error() {
            let index = MemoryConceptIndex::from_concepts([
                Concept::new(1, "Root"),
                Concept::new(2, "Child").with_ancestors([1, 77]),
            ])
            .unwrap();
            let evaluator = Evaluator::new(&index, 1);

            for ecl in ["> 2", ">> 2"] {
                let query = parse_query(ecl).unwrap();
                assert_eq!(run(&index, ecl), Err(QueryError::NotFound(77)), "{}", ecl);
                for id in [1, 2, 555] {
                    assert_eq!(
                        evaluator.matches(id, &query),
                        Err(QueryError::NotFound(77)),
                        "{} / {}",
                        ecl,
                        id
                    );
                }
            }

            // Descendant relations never read the focus ancestors
            assert!(check(&index, "< 1", 2));
        }
    }
}
