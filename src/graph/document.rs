//! Raw graph document as it arrives over the wire.
//!
//! Records are decoded from plain JSON objects so the untouched object can be
//! kept as the element's raw properties. Ambiguous fields are resolved once,
//! here, in a fixed priority order:
//!
//! - node identifier: `id`, then `uuid`
//! - embedded edge list: `edges`, then `relationships`
//! - embedded node labels: `labels`, then `[entity_type]`
//! - identifiers: JSON strings or numbers; empty strings count as absent

use serde::Deserialize;
use serde_json::{Map, Value};

/// Top-level parsed input. Replaced wholesale on reload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphDocument {
	pub nodes: Vec<NodeRecord>,
	pub relationships: Vec<EdgeRecord>,
	#[serde(default)]
	pub metadata: Option<Map<String, Value>>,
}

impl GraphDocument {
	/// Parse a document from its JSON text.
	pub fn from_json(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}
}

/// Render a JSON string or number as an identifier.
pub fn record_id(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::String(s) if !s.is_empty() => Some(s.clone()),
		// integral floats print the way the browser prints them: 1.0 -> "1"
		Value::Number(n) => Some(match n.as_f64() {
			Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
			_ => n.to_string(),
		}),
		_ => None,
	}
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
	map.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
	let items = value?.as_array()?;
	Some(
		items
			.iter()
			.filter_map(|item| record_id(Some(item)))
			.collect(),
	)
}

/// A node as received.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct NodeRecord {
	/// `id` if present, else `uuid`.
	pub id: Option<String>,
	pub name: Option<String>,
	pub labels: Vec<String>,
	/// Stringified embedded subgraph, decoded during normalization.
	pub content: Option<String>,
	pub entity_edges: Vec<String>,
	pub properties: Map<String, Value>,
}

impl From<Map<String, Value>> for NodeRecord {
	fn from(properties: Map<String, Value>) -> Self {
		Self {
			id: record_id(properties.get("id")).or_else(|| record_id(properties.get("uuid"))),
			name: string_field(&properties, "name").filter(|n| !n.is_empty()),
			labels: string_list(properties.get("labels")).unwrap_or_default(),
			content: string_field(&properties, "content"),
			entity_edges: string_list(properties.get("entity_edges")).unwrap_or_default(),
			properties,
		}
	}
}

/// A top-level relationship as received.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct EdgeRecord {
	pub id: Option<String>,
	pub source: Option<String>,
	pub target: Option<String>,
	pub rel_type: Option<String>,
	pub properties: Map<String, Value>,
}

impl From<Map<String, Value>> for EdgeRecord {
	fn from(properties: Map<String, Value>) -> Self {
		Self {
			id: record_id(properties.get("id")),
			source: record_id(properties.get("source")),
			target: record_id(properties.get("target")),
			rel_type: string_field(&properties, "type"),
			properties,
		}
	}
}

/// A nested graph carried inside a node's `content` string.
///
/// Lists are decoded entry by entry: a `null` list counts as absent and an
/// entry that is not an object is set aside in `rejected` without losing
/// its siblings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "RawEmbeddedGraph")]
pub struct EmbeddedGraph {
	nodes: Vec<EmbeddedNode>,
	edges: Vec<EmbeddedEdge>,
	/// One description per skipped list entry.
	pub rejected: Vec<String>,
}

#[derive(Deserialize)]
struct RawEmbeddedGraph {
	#[serde(default)]
	nodes: Option<Vec<Value>>,
	#[serde(default)]
	edges: Option<Vec<Value>>,
	#[serde(default)]
	relationships: Option<Vec<Value>>,
}

fn objects<T: From<Map<String, Value>>>(
	list: Option<Vec<Value>>,
	kind: &str,
	rejected: &mut Vec<String>,
) -> Vec<T> {
	let mut out = Vec::new();
	for (i, entry) in list.unwrap_or_default().into_iter().enumerate() {
		match entry {
			Value::Object(map) => out.push(T::from(map)),
			other => rejected.push(format!("{kind} entry {i} is not an object: {other}")),
		}
	}
	out
}

impl From<RawEmbeddedGraph> for EmbeddedGraph {
	fn from(raw: RawEmbeddedGraph) -> Self {
		let mut rejected = Vec::new();
		let nodes = objects(raw.nodes, "nodes", &mut rejected);
		let edges = match raw.edges {
			Some(edges) => objects(Some(edges), "edges", &mut rejected),
			None => objects(raw.relationships, "relationships", &mut rejected),
		};
		Self {
			nodes,
			edges,
			rejected,
		}
	}
}

/// Why a `content` string yielded no embedded graph.
#[derive(Debug)]
pub enum ContentError {
	/// Plain text, not an attempt at JSON.
	NotJson,
	/// Looked like JSON but did not parse.
	Malformed(serde_json::Error),
}

impl EmbeddedGraph {
	/// Decode a `content` payload, tolerating the escaped-quote encoding.
	pub fn decode(content: &str) -> Result<Self, ContentError> {
		if content.starts_with("{\\\"") {
			let unescaped = content.replace("\\\"", "\"");
			serde_json::from_str(&unescaped).map_err(ContentError::Malformed)
		} else if content.starts_with('{') {
			serde_json::from_str(content).map_err(ContentError::Malformed)
		} else {
			Err(ContentError::NotJson)
		}
	}

	pub fn nodes(&self) -> &[EmbeddedNode] {
		&self.nodes
	}

	/// Edges from `edges`, falling back to `relationships`.
	pub fn edges(&self) -> &[EmbeddedEdge] {
		&self.edges
	}
}

/// A node inside an embedded graph.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct EmbeddedNode {
	pub uuid: Option<String>,
	pub labels: Vec<String>,
	pub name: Option<String>,
	pub properties: Map<String, Value>,
}

impl From<Map<String, Value>> for EmbeddedNode {
	fn from(properties: Map<String, Value>) -> Self {
		let labels = string_list(properties.get("labels"))
			.or_else(|| string_field(&properties, "entity_type").map(|t| vec![t]))
			.unwrap_or_else(|| vec!["Unknown".to_owned()]);
		let name = properties
			.get("properties")
			.and_then(Value::as_object)
			.and_then(|inner| string_field(inner, "name"))
			.filter(|n| !n.is_empty());
		Self {
			uuid: record_id(properties.get("uuid")),
			labels,
			name,
			properties,
		}
	}
}

/// An edge inside an embedded graph.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct EmbeddedEdge {
	pub uuid: Option<String>,
	pub source_uuid: Option<String>,
	pub target_uuid: Option<String>,
	pub relationship_type: Option<String>,
	pub properties: Map<String, Value>,
}

impl From<Map<String, Value>> for EmbeddedEdge {
	fn from(properties: Map<String, Value>) -> Self {
		Self {
			uuid: record_id(properties.get("uuid")),
			source_uuid: record_id(properties.get("source_uuid")),
			target_uuid: record_id(properties.get("target_uuid")),
			relationship_type: string_field(&properties, "relationship_type"),
			properties,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_prefers_id_over_uuid() {
		let doc = GraphDocument::from_json(
			r#"{"nodes":[{"id":7,"uuid":"u-7"},{"uuid":"u-8"},{"name":"orphan"}],"relationships":[]}"#,
		)
		.unwrap();
		assert_eq!(doc.nodes[0].id.as_deref(), Some("7"));
		assert_eq!(doc.nodes[1].id.as_deref(), Some("u-8"));
		assert_eq!(doc.nodes[2].id, None);
	}

	#[test]
	fn missing_relationships_is_a_parse_error() {
		assert!(GraphDocument::from_json(r#"{"nodes":[]}"#).is_err());
		assert!(GraphDocument::from_json(r#"{"nodes":{},"relationships":[]}"#).is_err());
	}

	#[test]
	fn decodes_escaped_content() {
		let content = r#"{\"nodes\":[{\"uuid\":\"e1\",\"entity_type\":\"Entity\"}],\"edges\":[]}"#;
		let graph = EmbeddedGraph::decode(content).unwrap();
		assert_eq!(graph.nodes().len(), 1);
		assert_eq!(graph.nodes()[0].uuid.as_deref(), Some("e1"));
		assert_eq!(graph.nodes()[0].labels, vec!["Entity".to_owned()]);
	}

	#[test]
	fn edges_take_priority_over_relationships() {
		let graph = EmbeddedGraph::decode(
			r#"{"edges":[],"relationships":[{"source_uuid":"a","target_uuid":"b"}]}"#,
		)
		.unwrap();
		assert!(graph.edges().is_empty());

		let graph =
			EmbeddedGraph::decode(r#"{"relationships":[{"source_uuid":"a","target_uuid":"b"}]}"#)
				.unwrap();
		assert_eq!(graph.edges().len(), 1);
	}

	#[test]
	fn plain_text_content_is_not_json() {
		assert!(matches!(
			EmbeddedGraph::decode("just some notes"),
			Err(ContentError::NotJson)
		));
		assert!(matches!(
			EmbeddedGraph::decode("{broken"),
			Err(ContentError::Malformed(_))
		));
	}

	#[test]
	fn null_node_list_keeps_edges() {
		let graph = EmbeddedGraph::decode(
			r#"{"nodes":null,"edges":[{"source_uuid":"mod-a","target_uuid":"mod-b"}]}"#,
		)
		.unwrap();
		assert!(graph.nodes().is_empty());
		assert_eq!(graph.edges().len(), 1);

		let graph = EmbeddedGraph::decode(
			r#"{"edges":null,"relationships":[{"source_uuid":"a","target_uuid":"b"}]}"#,
		)
		.unwrap();
		assert_eq!(graph.edges().len(), 1);
	}

	#[test]
	fn non_object_entries_are_set_aside() {
		let graph = EmbeddedGraph::decode(r#"{"nodes":[{"uuid":"e1"},7],"edges":[null]}"#).unwrap();
		assert_eq!(graph.nodes().len(), 1);
		assert_eq!(graph.nodes()[0].uuid.as_deref(), Some("e1"));
		assert!(graph.edges().is_empty());
		assert_eq!(
			graph.rejected,
			vec![
				"nodes entry 1 is not an object: 7".to_owned(),
				"edges entry 0 is not an object: null".to_owned(),
			]
		);
	}

	#[test]
	fn integral_float_ids_print_as_integers() {
		assert_eq!(record_id(Some(&serde_json::json!(1.0))), Some("1".to_owned()));
		assert_eq!(record_id(Some(&serde_json::json!(12))), Some("12".to_owned()));
		assert_eq!(record_id(Some(&serde_json::json!(1.5))), Some("1.5".to_owned()));
		assert_eq!(record_id(Some(&serde_json::json!(""))), None);
	}
}
