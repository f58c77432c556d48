//! Builds a [`MemoryConceptIndex`] from concepts and direct is-a edges.
//!
//! The transitive closure is computed once, here, by a breadth-first walk up
//! the parent edges of every concept. Queries never traverse the graph.
//!
//! # Example
//!
//! ```rust
//! use snomed_query_index::{ConceptIndex, ConceptIndexBuilder};
//!
//! let mut builder = ConceptIndexBuilder::new();
//! builder
//!     .add_concept(138875005, "SNOMED CT Concept (SNOMED RT+CTV3)")
//!     .add_concept(404684003, "Clinical finding (finding)")
//!     .add_concept(64572001, "Disease (disorder)")
//!     .add_is_a(404684003, 138875005)
//!     .add_is_a(64572001, 404684003);
//!
//! let index = builder.build().unwrap();
//! let disease = index.concept(64572001).unwrap();
//! assert_eq!(disease.ancestors, vec![404684003, 138875005]);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use snomed_query_ecl::SctId;

use crate::concept::Concept;
use crate::error::{IndexError, IndexResult};
use crate::memory::MemoryConceptIndex;

/// Accumulates concepts, is-a edges and attribute values.
///
/// Validation happens in [`build`](Self::build): the first duplicate id or
/// dangling reference is reported there.
#[derive(Debug, Default)]
pub struct ConceptIndexBuilder {
    /// (id, name) in insertion order.
    concepts: Vec<(SctId, Option<String>)>,
    known: HashSet<SctId>,
    duplicate: Option<SctId>,
    /// Direct parents for each concept.
    parents: HashMap<SctId, Vec<SctId>>,
    attributes: HashMap<SctId, BTreeMap<SctId, Vec<String>>>,
    edge_count: usize,
}

impl ConceptIndexBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a concept with its fully specified name.
    pub fn add_concept(&mut self, id: SctId, fully_specified_name: impl Into<String>) -> &mut Self {
        self.insert(id, Some(fully_specified_name.into()))
    }

    /// Adds a concept without a name.
    pub fn add_unnamed_concept(&mut self, id: SctId) -> &mut Self {
        self.insert(id, None)
    }

    fn insert(&mut self, id: SctId, name: Option<String>) -> &mut Self {
        if !self.known.insert(id) {
            self.duplicate.get_or_insert(id);
        } else {
            self.concepts.push((id, name));
        }
        self
    }

    /// Adds a direct is-a edge. Repeated edges are ignored.
    pub fn add_is_a(&mut self, child: SctId, parent: SctId) -> &mut Self {
        let parents = self.parents.entry(child).or_default();
        if !parents.contains(&parent) {
            parents.push(parent);
            self.edge_count += 1;
        }
        self
    }

    /// Adds an attribute value to a concept.
    pub fn add_attribute(
        &mut self,
        id: SctId,
        attribute: SctId,
        value: impl Into<String>,
    ) -> &mut Self {
        self.attributes
            .entry(id)
            .or_default()
            .entry(attribute)
            .or_default()
            .push(value.into());
        self
    }

    /// Number of concepts added so far.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Returns true if no concepts were added.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Validates the input, materialises every ancestor closure and builds
    /// the index.
    ///
    /// # Errors
    ///
    /// - [`IndexError::DuplicateConcept`] if an id was added twice
    /// - [`IndexError::UnknownConcept`] if an edge or attribute names an
    ///   unknown child
    /// - [`IndexError::UnknownParent`] if an edge names an unknown parent
    pub fn build(self) -> IndexResult<MemoryConceptIndex> {
        if let Some(id) = self.duplicate {
            return Err(IndexError::DuplicateConcept(id));
        }
        self.validate()?;

        let mut max_depth = 0;
        let mut concepts = Vec::with_capacity(self.concepts.len());
        let mut attributes = self.attributes;

        for (id, name) in self.concepts {
            let (ancestors, depth) = compute_ancestors(id, &self.parents);
            max_depth = max_depth.max(depth);

            concepts.push(Concept {
                id,
                fully_specified_name: name,
                ancestors,
                attributes: attributes.remove(&id).unwrap_or_default(),
            });
        }

        tracing::info!(
            concepts = concepts.len(),
            is_a_edges = self.edge_count,
            max_depth,
            "materialised ancestor closure"
        );

        MemoryConceptIndex::from_concepts(concepts)
    }

    fn validate(&self) -> IndexResult<()> {
        for (&child, parents) in &self.parents {
            if !self.known.contains(&child) {
                return Err(IndexError::UnknownConcept(child));
            }
            if let Some(&parent) = parents.iter().find(|p| !self.known.contains(*p)) {
                return Err(IndexError::UnknownParent { child, parent });
            }
        }
        if let Some(&id) = self.attributes.keys().find(|id| !self.known.contains(*id)) {
            return Err(IndexError::UnknownConcept(id));
        }
        Ok(())
    }
}

/// Computes all ancestors of a concept using BFS.
///
/// Returns the ancestors nearest first, and the number of levels walked.
/// Cycles terminate because each concept is visited once; the concept
/// itself is never part of its own closure.
fn compute_ancestors(concept_id: SctId, parents: &HashMap<SctId, Vec<SctId>>) -> (Vec<SctId>, usize) {
    let mut seen = HashSet::new();
    seen.insert(concept_id);

    let mut result = Vec::new();
    let mut queue = VecDeque::new();
    let mut depth = 0;

    if let Some(direct_parents) = parents.get(&concept_id) {
        for &parent_id in direct_parents {
            if seen.insert(parent_id) {
                result.push(parent_id);
                queue.push_back((parent_id, 1));
            }
        }
    }

    while let Some((current, level)) = queue.pop_front() {
        depth = depth.max(level);
        if let Some(current_parents) = parents.get(&current) {
            for &parent_id in current_parents {
                if seen.insert(parent_id) {
                    result.push(parent_id);
                    queue.push_back((parent_id, level + 1));
                }
            }
        }
    }

    (result, depth)
}
