//! In-memory concept index backed by roaring posting lists.
//!
//! Concepts are stored in a dense `Vec` addressed through a
//! [`ConceptIdRegistry`]. For every concept that appears in some ancestor
//! closure there is one [`RoaringBitmap`] of the dense indices of the
//! concepts whose closure contains it. "Descendants of X" is then a single
//! map lookup followed by iterating one bitmap.
//!
//! # Example
//!
//! ```rust
//! use snomed_query_index::{Concept, ConceptIndex, MemoryConceptIndex};
//!
//! let index = MemoryConceptIndex::from_concepts(vec![
//!     Concept::new(138875005, "SNOMED CT Concept (SNOMED RT+CTV3)"),
//!     Concept::new(404684003, "Clinical finding (finding)").with_ancestors([138875005]),
//! ])
//! .unwrap();
//!
//! assert_eq!(index.concept_count(), 2);
//! assert_eq!(index.concepts_with_ancestor(138875005).len(), 1);
//! ```

mod registry;
mod stats;

pub use registry::{ConceptIdRegistry, MAX_CONCEPTS};
pub use stats::IndexStats;

use roaring::RoaringBitmap;
use snomed_query_ecl::SctId;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::concept::Concept;
use crate::error::IndexResult;
use crate::traits::ConceptIndex;

/// Immutable in-memory [`ConceptIndex`].
#[derive(Default)]
pub struct MemoryConceptIndex {
    registry: ConceptIdRegistry,
    /// Records in dense index order.
    concepts: Vec<Concept>,
    /// Ancestor id -> dense indices of concepts that have it in their closure.
    descendants: HashMap<SctId, RoaringBitmap>,
    stats: IndexStats,
}

impl MemoryConceptIndex {
    /// Builds an index from records whose ancestor closures are already
    /// materialised.
    ///
    /// Index order is the iteration order of `concepts`. A concept listed in
    /// its own closure, or an ancestor listed twice, is dropped from the
    /// closure. Ancestor ids need not exist in the index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateConcept`](crate::IndexError::DuplicateConcept)
    /// if an id appears twice and
    /// [`IndexError::TooManyConcepts`](crate::IndexError::TooManyConcepts)
    /// past [`MAX_CONCEPTS`] records.
    pub fn from_concepts<I>(concepts: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = Concept>,
    {
        let start = Instant::now();
        let concepts = concepts.into_iter();

        let mut registry = ConceptIdRegistry::with_capacity(concepts.size_hint().0);
        let mut records = Vec::with_capacity(concepts.size_hint().0);

        // Register each record and invert its closure into posting lists
        let mut descendants: HashMap<SctId, RoaringBitmap> = HashMap::new();
        for mut concept in concepts {
            let idx = registry.register(concept.id)?;
            normalise_ancestors(&mut concept);
            for &ancestor in &concept.ancestors {
                descendants.entry(ancestor).or_default().insert(idx);
            }
            records.push(concept);
        }

        let stats = Self::compute_stats(&registry, &records, &descendants, start);
        tracing::info!(
            concepts = stats.concept_count,
            posting_lists = stats.posting_lists,
            build_time_ms = stats.build_time_ms,
            "concept index ready"
        );

        Ok(Self {
            registry,
            concepts: records,
            descendants,
            stats,
        })
    }

    fn compute_stats(
        registry: &ConceptIdRegistry,
        records: &[Concept],
        descendants: &HashMap<SctId, RoaringBitmap>,
        start: Instant,
    ) -> IndexStats {
        let concept_count = records.len();
        let ancestor_links: usize = records.iter().map(|c| c.ancestors.len()).sum();
        let max_ancestors = records.iter().map(|c| c.ancestors.len()).max().unwrap_or(0);
        let attribute_values = records
            .iter()
            .flat_map(|c| c.attributes.values())
            .map(Vec::len)
            .sum();
        let bitmap_bytes: usize = descendants.values().map(|b| b.serialized_size()).sum();

        IndexStats {
            concept_count,
            ancestor_links,
            max_ancestors,
            avg_ancestors: if concept_count > 0 {
                ancestor_links as f64 / concept_count as f64
            } else {
                0.0
            },
            attribute_values,
            posting_lists: descendants.len(),
            build_time_ms: start.elapsed().as_millis() as u64,
            memory_estimate_bytes: registry.memory_size()
                + ancestor_links * 8
                + descendants.len() * 48
                + bitmap_bytes,
        }
    }

    /// Build statistics.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// All records, in index order.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> + '_ {
        self.concepts.iter()
    }

    /// Number of concepts that have `ancestor` in their closure.
    pub fn descendant_count(&self, ancestor: SctId) -> u64 {
        self.descendants.get(&ancestor).map_or(0, RoaringBitmap::len)
    }

    /// Returns true if `ancestor` is in the closure of `descendant`.
    pub fn is_descendant_of(&self, descendant: SctId, ancestor: SctId) -> bool {
        match (self.registry.get_index(descendant), self.descendants.get(&ancestor)) {
            (Some(idx), Some(bitmap)) => bitmap.contains(idx),
            _ => false,
        }
    }
}

fn normalise_ancestors(concept: &mut Concept) {
    let id = concept.id;
    let mut seen = HashSet::with_capacity(concept.ancestors.len());
    concept.ancestors.retain(|&a| a != id && seen.insert(a));
}

impl ConceptIndex for MemoryConceptIndex {
    fn concept(&self, id: SctId) -> Option<&Concept> {
        self.registry
            .get_index(id)
            .and_then(|idx| self.concepts.get(idx as usize))
    }

    fn concepts_with_ancestor(&self, ancestor: SctId) -> Vec<&Concept> {
        match self.descendants.get(&ancestor) {
            Some(bitmap) => bitmap
                .iter()
                .filter_map(|idx| self.concepts.get(idx as usize))
                .collect(),
            None => Vec::new(),
        }
    }

    fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    fn concept_ids(&self) -> Box<dyn Iterator<Item = SctId> + '_> {
        Box::new(self.registry.concept_ids())
    }
}

impl std::fmt::Debug for MemoryConceptIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryConceptIndex")
            .field("concepts", &self.concepts.len())
            .field("posting_lists", &self.descendants.len())
            .finish()
    }
}
