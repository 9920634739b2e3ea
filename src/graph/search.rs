//! Case-insensitive substring search over node names and string properties.

use serde_json::Value;

use super::elements::{ElementSet, VisualNode};

/// Ids of matching nodes in element order. An empty query matches nothing.
pub fn search(elements: &ElementSet, query: &str) -> Vec<String> {
	if query.is_empty() {
		return Vec::new();
	}
	let needle = query.to_lowercase();
	elements
		.nodes()
		.iter()
		.filter(|node| matches(node, &needle))
		.map(|node| node.id.clone())
		.collect()
}

fn matches(node: &VisualNode, needle: &str) -> bool {
	node.display_name.to_lowercase().contains(needle)
		|| node.properties.values().any(|value| match value {
			Value::String(s) => s.to_lowercase().contains(needle),
			_ => false,
		})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{GraphDocument, StyleRegistry, normalize};

	fn sample() -> ElementSet {
		let doc = GraphDocument::from_json(
			r#"{"nodes":[
				{"id":1,"name":"MCP Server","description":"Implements the protocol","labels":["Component"]},
				{"id":2,"name":"Neo4j Database","meta":{"note":"server-side"},"labels":["Resource"]},
				{"id":3,"name":"Command Handler","port":8080,"labels":["Module"]}
			],"relationships":[]}"#,
		)
		.unwrap();
		normalize(&doc, &StyleRegistry::default()).into_iter().collect()
	}

	#[test]
	fn matches_names_case_insensitively() {
		assert_eq!(search(&sample(), "server"), vec!["1".to_owned()]);
		assert_eq!(search(&sample(), "NEO4J"), vec!["2".to_owned()]);
	}

	#[test]
	fn falls_back_to_string_properties() {
		assert_eq!(search(&sample(), "protocol"), vec!["1".to_owned()]);
	}

	#[test]
	fn ignores_nested_and_non_string_values() {
		assert!(search(&sample(), "server-side").is_empty());
		assert!(search(&sample(), "8080").is_empty());
	}

	#[test]
	fn empty_query_and_no_match_are_empty() {
		assert!(search(&sample(), "").is_empty());
		assert!(search(&sample(), "zzz").is_empty());
		assert!(search(&ElementSet::default(), "server").is_empty());
	}
}
