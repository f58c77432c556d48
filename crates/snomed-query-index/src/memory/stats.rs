//! Statistics about an in-memory concept index.

/// Summary of a built [`MemoryConceptIndex`](super::MemoryConceptIndex).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexStats {
    /// Number of concepts in the index.
    pub concept_count: usize,
    /// Total entries across all ancestor closures.
    pub ancestor_links: usize,
    /// Largest single ancestor closure.
    pub max_ancestors: usize,
    /// Average number of ancestors per concept.
    pub avg_ancestors: f64,
    /// Total attribute values across all concepts.
    pub attribute_values: usize,
    /// Number of ancestor posting lists (concepts with at least one descendant).
    pub posting_lists: usize,
    /// Time taken to build the index in milliseconds.
    pub build_time_ms: u64,
    /// Estimated memory usage in bytes.
    pub memory_estimate_bytes: usize,
}

impl IndexStats {
    /// Returns estimated memory usage in megabytes.
    pub fn memory_mb(&self) -> f64 {
        self.memory_estimate_bytes as f64 / (1024.0 * 1024.0)
    }
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Concept Index Statistics:")?;
        writeln!(f, "  Concepts:         {}", self.concept_count)?;
        writeln!(f, "  Ancestor links:   {}", self.ancestor_links)?;
        writeln!(f, "  Max ancestors:    {}", self.max_ancestors)?;
        writeln!(f, "  Avg ancestors:    {:.1}", self.avg_ancestors)?;
        writeln!(f, "  Attribute values: {}", self.attribute_values)?;
        writeln!(f, "  Posting lists:    {}", self.posting_lists)?;
        writeln!(f, "  Build time:       {}ms", self.build_time_ms)?;
        writeln!(f, "  Memory estimate:  {:.1} MB", self.memory_mb())?;
        Ok(())
    }
}
