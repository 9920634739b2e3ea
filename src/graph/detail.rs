//! Read-only projection of one rendered node for the detail panel.

use serde_json::Value;

use super::elements::ElementSet;

/// Bookkeeping keys never shown in the property table.
const HIDDEN_PROPERTIES: &[&str] = &["id", "labels", "name", "group_id"];

/// One relationship as listed in the detail panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedNode {
	pub rel_type: String,
	pub node_name: String,
	pub node_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDetail {
	pub id: String,
	pub name: String,
	pub node_type: String,
	/// Scalar properties as display text, in key order.
	pub properties: Vec<(String, String)>,
	pub incoming: Vec<RelatedNode>,
	pub outgoing: Vec<RelatedNode>,
}

fn display_value(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}

pub fn describe_node(elements: &ElementSet, id: &str) -> Option<NodeDetail> {
	let node = elements.node(id)?;
	let name_of = |other: &str| {
		elements
			.node(other)
			.map(|n| n.display_name.clone())
			.unwrap_or_else(|| other.to_owned())
	};

	let mut properties: Vec<(String, String)> = node
		.properties
		.iter()
		.filter(|(key, _)| !HIDDEN_PROPERTIES.contains(&key.as_str()))
		.filter_map(|(key, value)| display_value(value).map(|v| (key.clone(), v)))
		.collect();
	properties.sort_by(|a, b| a.0.cmp(&b.0));
	let incoming = elements
		.incoming(id)
		.map(|edge| RelatedNode {
			rel_type: edge.resolved_type.clone(),
			node_name: name_of(&edge.source_id),
			node_id: edge.source_id.clone(),
		})
		.collect();
	let outgoing = elements
		.outgoing(id)
		.map(|edge| RelatedNode {
			rel_type: edge.resolved_type.clone(),
			node_name: name_of(&edge.target_id),
			node_id: edge.target_id.clone(),
		})
		.collect();

	Some(NodeDetail {
		id: node.id.clone(),
		name: node.display_name.clone(),
		node_type: node.resolved_type.clone(),
		properties,
		incoming,
		outgoing,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{GraphDocument, StyleRegistry, normalize};

	fn sample() -> ElementSet {
		let doc = GraphDocument::from_json(
			r#"{"nodes":[
				{"id":1,"name":"CLI Tool","labels":["Component"],"group_id":"g","status":"active",
				 "version":2,"stable":true,"tags":["a"],"owner":{"team":"core"},"retired":null},
				{"id":2,"name":"Command Handler","labels":["Module"]},
				{"id":3,"name":"Knowledge Graph","labels":["Concept"]}
			],"relationships":[
				{"id":1,"source":1,"target":2,"type":"CONTAINS"},
				{"id":2,"source":3,"target":1,"type":"RELATED_TO"}
			]}"#,
		)
		.unwrap();
		normalize(&doc, &StyleRegistry::default()).into_iter().collect()
	}

	#[test]
	fn filters_bookkeeping_and_nested_properties() {
		let detail = describe_node(&sample(), "1").unwrap();
		assert_eq!(detail.name, "CLI Tool");
		assert_eq!(detail.node_type, "Component");
		assert_eq!(
			detail.properties,
			vec![
				("stable".to_owned(), "true".to_owned()),
				("status".to_owned(), "active".to_owned()),
				("version".to_owned(), "2".to_owned()),
			]
		);
	}

	#[test]
	fn lists_relationships_both_ways() {
		let detail = describe_node(&sample(), "1").unwrap();
		assert_eq!(
			detail.outgoing,
			vec![RelatedNode {
				rel_type: "CONTAINS".to_owned(),
				node_name: "Command Handler".to_owned(),
				node_id: "2".to_owned(),
			}]
		);
		assert_eq!(detail.incoming.len(), 1);
		assert_eq!(detail.incoming[0].node_name, "Knowledge Graph");
		assert_eq!(detail.incoming[0].rel_type, "RELATED_TO");
	}

	#[test]
	fn unknown_node_has_no_detail() {
		assert!(describe_node(&sample(), "42").is_none());
	}
}
