//! The single owned application state: loaded elements, active filters,
//! highlighting and the open detail panel. UI events call one method each;
//! every method runs to completion and leaves the state consistent.

use std::collections::HashSet;
use std::sync::Arc;

use log::info;

use crate::config::ExplorerConfig;
use crate::graph::{
	ElementSet, GraphDocument, HiddenSet, NodeDetail, StyleRegistry, TypeFilter, describe_node,
	normalize, search,
};

/// Visual emphasis on top of visibility.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlight {
	/// Node marked `highlighted-node`.
	pub focused: Option<String>,
	/// Everything outside the focused node's neighbourhood.
	pub faded_nodes: HashSet<String>,
	pub faded_edges: HashSet<String>,
	pub search_matches: HashSet<String>,
}

impl Highlight {
	pub fn is_empty(&self) -> bool {
		self.focused.is_none() && self.search_matches.is_empty()
	}
}

/// Per-element visual classes handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementClasses {
	pub hidden: HiddenSet,
	pub highlight: Highlight,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
	EmptyQuery,
	NoMatches,
	Matches(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct Explorer {
	elements: Arc<ElementSet>,
	filter: TypeFilter,
	hidden: HiddenSet,
	highlight: Highlight,
	selection: Option<NodeDetail>,
}

impl Explorer {
	/// Normalize `doc` and apply the first-load filter policy.
	pub fn new(doc: &GraphDocument, registry: &StyleRegistry, config: &ExplorerConfig) -> Self {
		let elements: ElementSet = normalize(doc, registry).into_iter().collect();
		info!(
			"Graph contains {} nodes and {} edges",
			elements.nodes().len(),
			elements.edges().len()
		);
		let filter = TypeFilter::with_defaults(&elements, &config.hidden_node_types);
		let hidden = filter.hidden(&elements);
		Self {
			elements: Arc::new(elements),
			filter,
			hidden,
			highlight: Highlight::default(),
			selection: None,
		}
	}

	pub fn elements(&self) -> &Arc<ElementSet> {
		&self.elements
	}

	pub fn filter(&self) -> &TypeFilter {
		&self.filter
	}

	pub fn hidden(&self) -> &HiddenSet {
		&self.hidden
	}

	pub fn highlight(&self) -> &Highlight {
		&self.highlight
	}

	pub fn selection(&self) -> Option<&NodeDetail> {
		self.selection.as_ref()
	}

	pub fn classes(&self) -> ElementClasses {
		ElementClasses {
			hidden: self.hidden.clone(),
			highlight: self.highlight.clone(),
		}
	}

	pub fn node_types(&self) -> Vec<String> {
		self.elements.node_types()
	}

	pub fn relationship_types(&self) -> Vec<String> {
		self.elements.relationship_types()
	}

	pub fn set_node_type_enabled(&mut self, node_type: &str, enabled: bool) {
		self.filter.set_node_type(node_type, enabled);
		self.refilter();
	}

	pub fn set_relationship_type_enabled(&mut self, rel_type: &str, enabled: bool) {
		self.filter.set_relationship_type(rel_type, enabled);
		self.refilter();
	}

	/// Enable every discovered type.
	pub fn reset_filters(&mut self) {
		self.filter = TypeFilter::all(&self.elements);
		self.refilter();
	}

	fn refilter(&mut self) {
		self.hidden = self.filter.hidden(&self.elements);
	}

	/// Mark matching nodes. A single match also opens its details.
	pub fn search(&mut self, query: &str) -> SearchOutcome {
		if query.is_empty() {
			return SearchOutcome::EmptyQuery;
		}
		self.reset_highlighting();
		let matches = search(&self.elements, query);
		if matches.is_empty() {
			return SearchOutcome::NoMatches;
		}
		self.highlight.search_matches = matches.iter().cloned().collect();
		if let [only] = matches.as_slice() {
			self.selection = describe_node(&self.elements, only);
		}
		SearchOutcome::Matches(matches)
	}

	/// Open the detail panel and highlight the node with its neighbourhood.
	pub fn select_node(&mut self, id: &str) -> Option<&NodeDetail> {
		self.selection = Some(describe_node(&self.elements, id)?);
		self.highlight_node(id);
		self.selection.as_ref()
	}

	fn highlight_node(&mut self, id: &str) {
		let connected_edges: HashSet<&str> = self
			.elements
			.connected_edges(id)
			.into_iter()
			.map(|edge| edge.id.as_str())
			.collect();
		let neighbors: HashSet<&str> = self
			.elements
			.neighbors(id)
			.into_iter()
			.map(|node| node.id.as_str())
			.collect();

		self.highlight.focused = Some(id.to_owned());
		self.highlight.faded_nodes = self
			.elements
			.nodes()
			.iter()
			.filter(|node| node.id != id && !neighbors.contains(node.id.as_str()))
			.map(|node| node.id.clone())
			.collect();
		self.highlight.faded_edges = self
			.elements
			.edges()
			.iter()
			.filter(|edge| !connected_edges.contains(edge.id.as_str()))
			.map(|edge| edge.id.clone())
			.collect();
	}

	/// Close button: hide the panel, keep highlighting.
	pub fn close_details(&mut self) {
		self.selection = None;
	}

	/// Tap on empty canvas: hide the panel and clear highlighting.
	pub fn clear_selection(&mut self) {
		self.selection = None;
		self.reset_highlighting();
	}

	pub fn reset_highlighting(&mut self) {
		self.highlight = Highlight::default();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn explorer() -> Explorer {
		let doc = GraphDocument::from_json(
			r#"{"nodes":[
				{"id":1,"name":"CLI Tool","labels":["Component"]},
				{"id":2,"name":"Command Handler","labels":["Module"]},
				{"id":3,"name":"Standup","labels":["Episodic"]},
				{"id":4,"name":"Stray","labels":[]}
			],"relationships":[
				{"id":1,"source":1,"target":2,"type":"CONTAINS"},
				{"id":2,"source":3,"target":1,"type":"MENTIONS"}
			]}"#,
		)
		.unwrap();
		Explorer::new(&doc, &StyleRegistry::default(), &ExplorerConfig::default())
	}

	#[test]
	fn first_load_hides_episodic_and_unknown() {
		let explorer = explorer();
		assert!(explorer.hidden().hides_node("3"));
		assert!(explorer.hidden().hides_node("4"));
		assert!(explorer.hidden().hides_edge("edge-2"));
		assert!(!explorer.hidden().hides_node("1"));
	}

	#[test]
	fn reset_filters_shows_everything() {
		let mut explorer = explorer();
		explorer.set_node_type_enabled("Component", false);
		assert!(explorer.hidden().hides_edge("edge-1"));
		explorer.reset_filters();
		assert!(explorer.hidden().is_empty());
	}

	#[test]
	fn single_search_match_opens_details() {
		let mut explorer = explorer();
		let outcome = explorer.search("handler");
		assert_eq!(outcome, SearchOutcome::Matches(vec!["2".to_owned()]));
		assert_eq!(explorer.selection().map(|d| d.name.as_str()), Some("Command Handler"));
		assert!(explorer.highlight().search_matches.contains("2"));
	}

	#[test]
	fn failed_search_resets_highlighting() {
		let mut explorer = explorer();
		explorer.select_node("1");
		assert!(!explorer.highlight().is_empty());
		assert_eq!(explorer.search("nothing like this"), SearchOutcome::NoMatches);
		assert_eq!(explorer.highlight(), &Highlight::default());
		assert_eq!(explorer.search(""), SearchOutcome::EmptyQuery);
	}

	#[test]
	fn selecting_fades_everything_outside_neighbourhood() {
		let mut explorer = explorer();
		let detail = explorer.select_node("2").unwrap();
		assert_eq!(detail.incoming.len(), 1);

		let highlight = explorer.highlight();
		assert_eq!(highlight.focused.as_deref(), Some("2"));
		assert!(!highlight.faded_nodes.contains("1"));
		assert!(highlight.faded_nodes.contains("3"));
		assert!(highlight.faded_nodes.contains("4"));
		assert!(!highlight.faded_edges.contains("edge-1"));
		assert!(highlight.faded_edges.contains("edge-2"));
	}

	#[test]
	fn close_keeps_highlight_but_canvas_tap_clears() {
		let mut explorer = explorer();
		explorer.select_node("1");
		explorer.close_details();
		assert!(explorer.selection().is_none());
		assert!(explorer.highlight().focused.is_some());

		explorer.select_node("1");
		explorer.clear_selection();
		assert!(explorer.selection().is_none());
		assert!(explorer.highlight().is_empty());
	}

	#[test]
	fn selecting_unknown_node_changes_nothing() {
		let mut explorer = explorer();
		assert!(explorer.select_node("99").is_none());
		assert!(explorer.highlight().is_empty());
	}
}
