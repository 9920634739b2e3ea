//! Type-based visibility. Always recomputed in full from the element set and
//! the enabled type sets, never patched incrementally.

use std::collections::HashSet;

use super::elements::ElementSet;

/// Ids of the elements to hide. Node and edge ids live in separate sets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HiddenSet {
	pub nodes: HashSet<String>,
	pub edges: HashSet<String>,
}

impl HiddenSet {
	pub fn hides_node(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}

	pub fn hides_edge(&self, id: &str) -> bool {
		self.edges.contains(id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}
}

/// A node is hidden iff its type is disabled; an edge iff its type is
/// disabled or either endpoint is hidden.
pub fn compute_hidden(
	elements: &ElementSet,
	enabled_node_types: &HashSet<String>,
	enabled_rel_types: &HashSet<String>,
) -> HiddenSet {
	let nodes: HashSet<String> = elements
		.nodes()
		.iter()
		.filter(|node| !enabled_node_types.contains(&node.resolved_type))
		.map(|node| node.id.clone())
		.collect();
	let edges = elements
		.edges()
		.iter()
		.filter(|edge| {
			!enabled_rel_types.contains(&edge.resolved_type)
				|| nodes.contains(&edge.source_id)
				|| nodes.contains(&edge.target_id)
		})
		.map(|edge| edge.id.clone())
		.collect();
	HiddenSet { nodes, edges }
}

/// The enabled node and relationship type sets behind the filter checkboxes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeFilter {
	pub node_types: HashSet<String>,
	pub relationship_types: HashSet<String>,
}

impl TypeFilter {
	/// Every discovered type enabled except `hidden_node_types`.
	pub fn with_defaults(elements: &ElementSet, hidden_node_types: &[String]) -> Self {
		let mut filter = Self::all(elements);
		for ty in hidden_node_types {
			filter.node_types.remove(ty);
		}
		filter
	}

	/// Every discovered type enabled.
	pub fn all(elements: &ElementSet) -> Self {
		Self {
			node_types: elements.node_types().into_iter().collect(),
			relationship_types: elements.relationship_types().into_iter().collect(),
		}
	}

	pub fn set_node_type(&mut self, node_type: &str, enabled: bool) {
		toggle(&mut self.node_types, node_type, enabled);
	}

	pub fn set_relationship_type(&mut self, rel_type: &str, enabled: bool) {
		toggle(&mut self.relationship_types, rel_type, enabled);
	}

	pub fn hidden(&self, elements: &ElementSet) -> HiddenSet {
		compute_hidden(elements, &self.node_types, &self.relationship_types)
	}
}

fn toggle(set: &mut HashSet<String>, ty: &str, enabled: bool) {
	if enabled {
		set.insert(ty.to_owned());
	} else {
		set.remove(ty);
	}
}
