//! Normalized visual elements and the read-only queries the UI runs over them.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct VisualNode {
	pub id: String,
	pub display_name: String,
	pub resolved_type: String,
	pub labels: Vec<String>,
	pub is_embedded: bool,
	pub is_placeholder: bool,
	/// Containing top-level node for embedded elements.
	pub parent_id: Option<String>,
	pub properties: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualEdge {
	pub id: String,
	pub source_id: String,
	pub target_id: String,
	pub resolved_type: String,
	pub is_embedded: bool,
	pub is_placeholder: bool,
	pub parent_id: Option<String>,
	pub properties: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VisualElement {
	Node(VisualNode),
	Edge(VisualEdge),
}

impl VisualElement {
	pub fn id(&self) -> &str {
		match self {
			VisualElement::Node(node) => &node.id,
			VisualElement::Edge(edge) => &edge.id,
		}
	}
}

/// Element list with id and adjacency indexes. Built once per load.
#[derive(Clone, Debug, Default)]
pub struct ElementSet {
	nodes: Vec<VisualNode>,
	edges: Vec<VisualEdge>,
	node_index: HashMap<String, usize>,
	incoming: HashMap<String, Vec<usize>>,
	outgoing: HashMap<String, Vec<usize>>,
}

impl FromIterator<VisualElement> for ElementSet {
	fn from_iter<I: IntoIterator<Item = VisualElement>>(elements: I) -> Self {
		let mut set = ElementSet::default();
		for element in elements {
			match element {
				VisualElement::Node(node) => {
					set.node_index.insert(node.id.clone(), set.nodes.len());
					set.nodes.push(node);
				}
				VisualElement::Edge(edge) => {
					let idx = set.edges.len();
					set.outgoing
						.entry(edge.source_id.clone())
						.or_default()
						.push(idx);
					set.incoming
						.entry(edge.target_id.clone())
						.or_default()
						.push(idx);
					set.edges.push(edge);
				}
			}
		}
		set
	}
}

impl ElementSet {
	pub fn nodes(&self) -> &[VisualNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[VisualEdge] {
		&self.edges
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&VisualNode> {
		self.node_index.get(id).map(|&idx| &self.nodes[idx])
	}

	pub fn incoming(&self, id: &str) -> impl Iterator<Item = &VisualEdge> {
		self.edge_refs(self.incoming.get(id))
	}

	pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &VisualEdge> {
		self.edge_refs(self.outgoing.get(id))
	}

	fn edge_refs<'a>(&'a self, indices: Option<&'a Vec<usize>>) -> impl Iterator<Item = &'a VisualEdge> {
		indices
			.into_iter()
			.flatten()
			.map(move |&idx| &self.edges[idx])
	}

	/// Incoming and outgoing edges; a self-loop appears once.
	pub fn connected_edges(&self, id: &str) -> Vec<&VisualEdge> {
		let mut seen = HashSet::new();
		self.incoming(id)
			.chain(self.outgoing(id))
			.filter(|edge| seen.insert(edge.id.as_str()))
			.collect()
	}

	/// Nodes at the other end of any connected edge, excluding `id` itself.
	pub fn neighbors(&self, id: &str) -> Vec<&VisualNode> {
		let mut seen = HashSet::new();
		self.connected_edges(id)
			.into_iter()
			.map(|edge| {
				if edge.source_id == id {
					edge.target_id.as_str()
				} else {
					edge.source_id.as_str()
				}
			})
			.filter(|other| *other != id && seen.insert(*other))
			.filter_map(|other| self.node(other))
			.collect()
	}

	/// Node types in first-seen order.
	pub fn node_types(&self) -> Vec<String> {
		distinct(self.nodes.iter().map(|n| n.resolved_type.as_str()))
	}

	/// Relationship types in first-seen order.
	pub fn relationship_types(&self) -> Vec<String> {
		distinct(self.edges.iter().map(|e| e.resolved_type.as_str()))
	}
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
	let mut seen = HashSet::new();
	items
		.filter(|item| seen.insert(*item))
		.map(str::to_owned)
		.collect()
}
