//! The concept record held by an index.

use std::collections::BTreeMap;

use snomed_query_ecl::SctId;

/// A concept with its materialised ancestor closure.
///
/// Records are frozen once they are in an index. `ancestors` holds every
/// transitive is-a parent (never the concept itself), so descendant and
/// ancestor queries never walk the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Concept {
    /// SNOMED CT concept id.
    pub id: SctId,
    /// Fully specified name, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fully_specified_name: Option<String>,
    /// Transitive is-a closure, nearest ancestors first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ancestors: Vec<SctId>,
    /// Attribute (relationship type) id to its values.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: BTreeMap<SctId, Vec<String>>,
}

impl Concept {
    /// Creates a concept with a name and no ancestors or attributes.
    pub fn new(id: SctId, fully_specified_name: impl Into<String>) -> Self {
        Self {
            id,
            fully_specified_name: Some(fully_specified_name.into()),
            ancestors: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Creates a concept without a name.
    pub fn unnamed(id: SctId) -> Self {
        Self {
            id,
            fully_specified_name: None,
            ancestors: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the ancestor closure.
    pub fn with_ancestors(mut self, ancestors: impl IntoIterator<Item = SctId>) -> Self {
        self.ancestors = ancestors.into_iter().collect();
        self
    }

    /// Adds one attribute value.
    pub fn with_attribute(mut self, attribute: SctId, value: impl Into<String>) -> Self {
        self.attributes
            .entry(attribute)
            .or_default()
            .push(value.into());
        self
    }

    /// The name, or `""` when none was recorded.
    pub fn fsn(&self) -> &str {
        self.fully_specified_name.as_deref().unwrap_or("")
    }

    /// True if `ancestor` is in this concept's closure.
    pub fn has_ancestor(&self, ancestor: SctId) -> bool {
        self.ancestors.contains(&ancestor)
    }

    /// Values stored for an attribute; empty if the concept has none.
    pub fn attribute_values(&self, attribute: SctId) -> &[String] {
        self.attributes
            .get(&attribute)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
