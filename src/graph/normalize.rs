//! Turns a raw [`GraphDocument`] into a flat, deduplicated element list.
//!
//! Every identifier is first-seen-wins: later duplicates are dropped, never
//! merged. Edges never dangle; unresolved embedded endpoints and
//! `entity_edges` references get placeholder nodes, and a relationship whose
//! endpoint is missing or undefined is dropped with a warning.

use std::collections::HashSet;

use log::{debug, info, warn};
use serde_json::{Map, Value, json};

use super::document::{ContentError, EdgeRecord, EmbeddedGraph, GraphDocument, NodeRecord};
use super::elements::{VisualEdge, VisualElement, VisualNode};
use super::style::StyleRegistry;
use crate::error::{NormalizeWarning, ReferenceWarning};

/// Output of one normalization pass.
#[derive(Clone, Debug, Default)]
pub struct Normalized {
	pub elements: Vec<VisualElement>,
	pub warnings: Vec<NormalizeWarning>,
}

/// Normalize a document, logging and discarding the warnings.
pub fn normalize(doc: &GraphDocument, registry: &StyleRegistry) -> Vec<VisualElement> {
	normalize_with_report(doc, registry).elements
}

pub fn normalize_with_report(doc: &GraphDocument, registry: &StyleRegistry) -> Normalized {
	let mut normalizer = Normalizer::new(registry);
	for node in &doc.nodes {
		normalizer.node(node);
	}
	for rel in &doc.relationships {
		normalizer.relationship(rel);
	}
	let out = normalizer.finish();
	info!(
		"Normalized graph: {} elements, {} warnings",
		out.elements.len(),
		out.warnings.len()
	);
	out
}

/// Type guessed from an identifier prefix, as in `mod-foo` -> `mod`.
pub fn placeholder_type(id: &str) -> String {
	match id.split('-').next() {
		Some(prefix) if !prefix.is_empty() => prefix.to_owned(),
		_ => "Unknown".to_owned(),
	}
}

/// Readable name for a synthesized node, as in `mod-foo-bar` -> `Foo bar`.
pub fn placeholder_name(id: &str) -> String {
	let stripped = match id.find('-') {
		Some(pos) if pos > 0 && id[..pos].bytes().all(|b| b.is_ascii_lowercase()) => {
			&id[pos + 1..]
		}
		_ => id,
	};
	let spaced = stripped.replace('-', " ");
	let mut chars = spaced.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn uuid_only(uuid: &str) -> Map<String, Value> {
	match json!({ "uuid": uuid }) {
		Value::Object(map) => map,
		_ => Map::new(),
	}
}

struct Normalizer<'a> {
	registry: &'a StyleRegistry,
	seen_nodes: HashSet<String>,
	seen_edges: HashSet<String>,
	out: Normalized,
}

impl<'a> Normalizer<'a> {
	fn new(registry: &'a StyleRegistry) -> Self {
		Self {
			registry,
			seen_nodes: HashSet::new(),
			seen_edges: HashSet::new(),
			out: Normalized::default(),
		}
	}

	fn finish(self) -> Normalized {
		self.out
	}

	fn warn(&mut self, warning: impl Into<NormalizeWarning>) {
		let warning = warning.into();
		warn!("{warning}");
		self.out.warnings.push(warning);
	}

	fn push_node(&mut self, node: VisualNode) {
		if self.seen_nodes.insert(node.id.clone()) {
			self.out.elements.push(VisualElement::Node(node));
		}
	}

	fn push_edge(&mut self, edge: VisualEdge) {
		if self.seen_edges.insert(edge.id.clone()) {
			self.out.elements.push(VisualElement::Edge(edge));
		}
	}

	fn node(&mut self, record: &NodeRecord) {
		if let Some(id) = &record.id {
			if !self.seen_nodes.contains(id) {
				self.push_node(VisualNode {
					id: id.clone(),
					display_name: record
						.name
						.clone()
						.unwrap_or_else(|| format!("Node {id}")),
					resolved_type: self.registry.resolve_type(&record.labels),
					labels: record.labels.clone(),
					is_embedded: false,
					is_placeholder: false,
					parent_id: None,
					properties: record.properties.clone(),
				});
			}
		} else {
			debug!("Skipping node without id or uuid: {:?}", record.name);
		}

		if let Some(content) = &record.content {
			self.embedded_content(record, content);
		}
		for edge_uuid in &record.entity_edges {
			self.entity_edge(record, edge_uuid);
		}
	}

	fn container_label(record: &NodeRecord) -> String {
		record
			.name
			.clone()
			.or_else(|| record.id.clone())
			.unwrap_or_else(|| "<unnamed>".to_owned())
	}

	fn embedded_content(&mut self, record: &NodeRecord, content: &str) {
		let graph = match EmbeddedGraph::decode(content) {
			Ok(graph) => graph,
			Err(ContentError::NotJson) => {
				debug!(
					"Content of node {} is not JSON, no embedded subgraph",
					Self::container_label(record)
				);
				return;
			}
			Err(ContentError::Malformed(err)) => {
				self.warn(NormalizeWarning::EmbeddedContent {
					node: Self::container_label(record),
					reason: err.to_string(),
				});
				return;
			}
		};
		debug!(
			"Processing embedded subgraph in node {}: {} nodes, {} edges",
			Self::container_label(record),
			graph.nodes().len(),
			graph.edges().len()
		);

		for reason in &graph.rejected {
			self.warn(NormalizeWarning::EmbeddedEntry {
				node: Self::container_label(record),
				reason: reason.clone(),
			});
		}

		let parent = record.id.clone();
		for embedded in graph.nodes() {
			let Some(uuid) = &embedded.uuid else {
				self.warn(ReferenceWarning::UnidentifiedEmbeddedNode {
					container: Self::container_label(record),
				});
				continue;
			};
			if self.seen_nodes.contains(uuid) {
				continue;
			}
			self.push_node(VisualNode {
				id: uuid.clone(),
				display_name: embedded.name.clone().unwrap_or_else(|| uuid.clone()),
				resolved_type: self.registry.resolve_type(&embedded.labels),
				labels: embedded.labels.clone(),
				is_embedded: true,
				is_placeholder: false,
				parent_id: parent.clone(),
				properties: embedded.properties.clone(),
			});
		}

		for edge in graph.edges() {
			let (Some(source), Some(target)) = (&edge.source_uuid, &edge.target_uuid) else {
				self.warn(ReferenceWarning::MissingEndpoint {
					edge: edge.uuid.clone().unwrap_or_else(|| {
						format!(
							"edge-{}-{}",
							edge.source_uuid.as_deref().unwrap_or("?"),
							edge.target_uuid.as_deref().unwrap_or("?")
						)
					}),
				});
				continue;
			};
			let edge_id = edge
				.uuid
				.clone()
				.unwrap_or_else(|| format!("edge-{source}-{target}"));

			self.placeholder_endpoint(source, &parent);
			self.placeholder_endpoint(target, &parent);

			self.push_edge(VisualEdge {
				id: edge_id,
				source_id: source.clone(),
				target_id: target.clone(),
				resolved_type: edge
					.relationship_type
					.clone()
					.unwrap_or_else(|| "Unknown".to_owned()),
				is_embedded: true,
				is_placeholder: false,
				parent_id: parent.clone(),
				properties: edge.properties.clone(),
			});
		}
	}

	fn placeholder_endpoint(&mut self, id: &str, parent: &Option<String>) {
		if self.seen_nodes.contains(id) {
			return;
		}
		debug!("Creating placeholder node for {id}");
		let node_type = placeholder_type(id);
		self.push_node(VisualNode {
			id: id.to_owned(),
			display_name: placeholder_name(id),
			labels: vec![node_type.clone()],
			resolved_type: node_type,
			is_embedded: true,
			is_placeholder: true,
			parent_id: parent.clone(),
			properties: uuid_only(id),
		});
	}

	fn entity_edge(&mut self, record: &NodeRecord, edge_uuid: &str) {
		let edge_id = format!("entity-edge-{edge_uuid}");
		if self.seen_edges.contains(&edge_id) {
			return;
		}
		let short: String = edge_uuid.chars().take(8).collect();
		let dummy_id = format!("dummy-target-{short}");
		if !self.seen_nodes.contains(&dummy_id) {
			debug!("Adding placeholder for entity edge {edge_uuid}");
			self.push_node(VisualNode {
				id: dummy_id.clone(),
				display_name: format!("Referenced Entity ({short})"),
				resolved_type: "Unknown".to_owned(),
				labels: vec!["Referenced".to_owned()],
				is_embedded: false,
				is_placeholder: true,
				parent_id: None,
				properties: uuid_only(edge_uuid),
			});
		}

		let Some(source) = &record.id else {
			self.warn(ReferenceWarning::UnanchoredReference {
				edge_uuid: edge_uuid.to_owned(),
			});
			return;
		};
		self.push_edge(VisualEdge {
			id: edge_id,
			source_id: source.clone(),
			target_id: dummy_id,
			resolved_type: "REFERENCES".to_owned(),
			is_embedded: false,
			is_placeholder: true,
			parent_id: None,
			properties: uuid_only(edge_uuid),
		});
	}

	fn relationship(&mut self, rel: &EdgeRecord) {
		let (Some(source), Some(target)) = (&rel.source, &rel.target) else {
			self.warn(ReferenceWarning::MissingEndpoint {
				edge: Value::Object(rel.properties.clone()).to_string(),
			});
			return;
		};
		let edge_id = match &rel.id {
			Some(id) => format!("edge-{id}"),
			None => format!("edge-{source}-{target}"),
		};
		if let Some(endpoint) = [source, target]
			.into_iter()
			.find(|id| !self.seen_nodes.contains(*id))
		{
			self.warn(ReferenceWarning::UnknownEndpoint {
				edge: edge_id,
				endpoint: endpoint.clone(),
			});
			return;
		}
		self.push_edge(VisualEdge {
			id: edge_id,
			source_id: source.clone(),
			target_id: target.clone(),
			resolved_type: rel.rel_type.clone().unwrap_or_else(|| "Unknown".to_owned()),
			is_embedded: false,
			is_placeholder: false,
			parent_id: None,
			properties: rel.properties.clone(),
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::elements::ElementSet;

	fn run(json: &str) -> Normalized {
		let doc = GraphDocument::from_json(json).unwrap();
		normalize_with_report(&doc, &StyleRegistry::default())
	}

	fn set(json: &str) -> ElementSet {
		run(json).elements.into_iter().collect()
	}

	#[test]
	fn placeholder_names_and_types() {
		assert_eq!(placeholder_type("mod-foo"), "mod");
		assert_eq!(placeholder_name("mod-foo"), "Foo");
		assert_eq!(placeholder_name("feat-user-login"), "User login");
		assert_eq!(placeholder_type("plain"), "plain");
		assert_eq!(placeholder_name("plain"), "Plain");
		assert_eq!(placeholder_type("-odd"), "Unknown");
		assert_eq!(placeholder_name("Mod-foo"), "Mod foo");
	}

	#[test]
	fn duplicate_ids_keep_first() {
		let elements = set(
			r#"{"nodes":[
				{"id":1,"name":"First","labels":["Component"]},
				{"id":1,"name":"Second","labels":["Module"]},
				{"uuid":"1","name":"Third"}
			],"relationships":[
				{"id":9,"source":1,"target":1,"type":"CONTAINS"},
				{"id":9,"source":1,"target":1,"type":"EXTENDS"}
			]}"#,
		);
		assert_eq!(elements.nodes().len(), 1);
		assert_eq!(elements.nodes()[0].display_name, "First");
		assert_eq!(elements.nodes()[0].resolved_type, "Component");
		assert_eq!(elements.edges().len(), 1);
		assert_eq!(elements.edges()[0].resolved_type, "CONTAINS");
	}

	#[test]
	fn unnamed_node_gets_synthesized_label() {
		let elements = set(r#"{"nodes":[{"uuid":"abc","labels":[]}],"relationships":[]}"#);
		assert_eq!(elements.nodes()[0].display_name, "Node abc");
		assert_eq!(elements.nodes()[0].resolved_type, "Unknown");
	}

	#[test]
	fn node_without_identifier_is_skipped() {
		let elements = set(r#"{"nodes":[{"name":"ghost","labels":["Concept"]}],"relationships":[]}"#);
		assert!(elements.is_empty());
	}

	#[test]
	fn malformed_content_keeps_node() {
		let out = run(
			r#"{"nodes":[
				{"id":1,"name":"Broken","content":"{not json"},
				{"id":2,"name":"After"}
			],"relationships":[]}"#,
		);
		let elements: ElementSet = out.elements.into_iter().collect();
		assert_eq!(elements.nodes().len(), 2);
		assert!(matches!(
			out.warnings.as_slice(),
			[NormalizeWarning::EmbeddedContent { node, .. }] if node == "Broken"
		));
	}

	#[test]
	fn plain_text_content_is_silent() {
		let out = run(r#"{"nodes":[{"id":1,"content":"meeting notes"}],"relationships":[]}"#);
		assert_eq!(out.elements.len(), 1);
		assert!(out.warnings.is_empty());
	}

	#[test]
	fn embedded_nodes_carry_parent_and_flags() {
		let elements = set(
			r#"{"nodes":[{"id":10,"name":"Cluster","labels":["Community"],
				"content":"{\"nodes\":[{\"uuid\":\"n1\",\"labels\":[\"Foo\",\"Entity\"],\"properties\":{\"name\":\"Inner\"}},{\"uuid\":\"n2\"}],\"relationships\":[{\"uuid\":\"r1\",\"source_uuid\":\"n1\",\"target_uuid\":\"n2\",\"relationship_type\":\"MENTIONS\"}]}"
			}],"relationships":[]}"#,
		);
		let inner = elements.node("n1").unwrap();
		assert!(inner.is_embedded);
		assert!(!inner.is_placeholder);
		assert_eq!(inner.parent_id.as_deref(), Some("10"));
		assert_eq!(inner.display_name, "Inner");
		assert_eq!(inner.resolved_type, "Entity");

		let bare = elements.node("n2").unwrap();
		assert_eq!(bare.display_name, "n2");
		assert_eq!(bare.resolved_type, "Unknown");

		let edge = &elements.edges()[0];
		assert_eq!(edge.id, "r1");
		assert_eq!(edge.resolved_type, "MENTIONS");
		assert!(edge.is_embedded);
		assert_eq!(edge.parent_id.as_deref(), Some("10"));
	}

	#[test]
	fn embedded_edge_synthesizes_endpoints() {
		let elements = set(
			r#"{"nodes":[{"id":1,"content":"{\"edges\":[{\"source_uuid\":\"mod-foo\",\"target_uuid\":\"if-bar-baz\",\"relationship_type\":\"EXPOSES\"}]}"}],
			"relationships":[]}"#,
		);
		let source = elements.node("mod-foo").unwrap();
		assert!(source.is_placeholder && source.is_embedded);
		assert_eq!(source.display_name, "Foo");
		assert_eq!(source.resolved_type, "mod");

		let target = elements.node("if-bar-baz").unwrap();
		assert_eq!(target.display_name, "Bar baz");
		assert_eq!(target.resolved_type, "if");

		assert_eq!(elements.edges()[0].id, "edge-mod-foo-if-bar-baz");
	}

	#[test]
	fn embedded_edge_without_endpoint_is_dropped() {
		let out = run(
			r#"{"nodes":[{"id":1,"content":"{\"edges\":[{\"uuid\":\"x\",\"target_uuid\":\"t\"}]}"}],
			"relationships":[]}"#,
		);
		let elements: ElementSet = out.elements.into_iter().collect();
		assert!(elements.edges().is_empty());
		assert!(elements.node("t").is_none());
		assert_eq!(
			out.warnings,
			vec![NormalizeWarning::Reference(ReferenceWarning::MissingEndpoint {
				edge: "x".to_owned()
			})]
		);
	}

	#[test]
	fn entity_edges_create_reference_placeholders() {
		let elements = set(
			r#"{"nodes":[{"id":"n","entity_edges":["0123456789abcdef","0123456789abcdef"]}],
			"relationships":[]}"#,
		);
		let dummy = elements.node("dummy-target-01234567").unwrap();
		assert!(dummy.is_placeholder);
		assert_eq!(dummy.resolved_type, "Unknown");
		assert_eq!(dummy.labels, vec!["Referenced".to_owned()]);
		assert_eq!(dummy.display_name, "Referenced Entity (01234567)");

		assert_eq!(elements.edges().len(), 1);
		let edge = &elements.edges()[0];
		assert_eq!(edge.id, "entity-edge-0123456789abcdef");
		assert_eq!(edge.source_id, "n");
		assert_eq!(edge.resolved_type, "REFERENCES");
		assert!(edge.is_placeholder);
	}

	#[test]
	fn unanchored_entity_edge_warns() {
		let out = run(r#"{"nodes":[{"name":"anon","entity_edges":["abc"]}],"relationships":[]}"#);
		let elements: ElementSet = out.elements.into_iter().collect();
		assert!(elements.node("dummy-target-abc").is_some());
		assert!(elements.edges().is_empty());
		assert_eq!(
			out.warnings,
			vec![NormalizeWarning::Reference(ReferenceWarning::UnanchoredReference {
				edge_uuid: "abc".to_owned()
			})]
		);
	}

	#[test]
	fn relationship_without_target_is_dropped() {
		let out = run(
			r#"{"nodes":[{"id":1}],"relationships":[{"id":1,"source":1,"type":"CONTAINS"}]}"#,
		);
		assert_eq!(out.elements.len(), 1);
		assert_eq!(out.warnings.len(), 1);
	}

	#[test]
	fn relationship_to_undefined_node_is_dropped() {
		let out = run(
			r#"{"nodes":[{"id":1}],"relationships":[{"id":7,"source":1,"target":9,"type":"CONTAINS"}]}"#,
		);
		assert_eq!(out.elements.len(), 1);
		assert_eq!(
			out.warnings,
			vec![NormalizeWarning::Reference(ReferenceWarning::UnknownEndpoint {
				edge: "edge-7".to_owned(),
				endpoint: "9".to_owned(),
			})]
		);
	}

	#[test]
	fn null_embedded_nodes_still_yield_edges() {
		let elements = set(
			r#"{"nodes":[{"id":"c","content":"{\"nodes\":null,\"edges\":[{\"source_uuid\":\"mod-a\",\"target_uuid\":\"mod-b\"}]}"}],"relationships":[]}"#,
		);
		assert_eq!(elements.nodes().len(), 3);
		assert_eq!(elements.edges().len(), 1);
		assert_eq!(elements.edges()[0].id, "edge-mod-a-mod-b");
		assert!(elements.node("mod-a").is_some_and(|n| n.is_placeholder));
	}

	#[test]
	fn bad_embedded_entry_keeps_its_siblings() {
		let out = run(
			r#"{"nodes":[{"id":"c","content":"{\"nodes\":[{\"uuid\":\"e1\"}],\"edges\":[null]}"}],"relationships":[]}"#,
		);
		let ids: Vec<&str> = out.elements.iter().map(VisualElement::id).collect();
		assert_eq!(ids, vec!["c", "e1"]);
		assert!(matches!(
			out.warnings.as_slice(),
			[NormalizeWarning::EmbeddedEntry { node, .. }] if node == "c"
		));
	}

	#[test]
	fn float_and_integer_ids_meet() {
		let elements = set(
			r#"{"nodes":[{"id":1.0},{"id":2}],"relationships":[{"id":1,"source":1,"target":2.0}]}"#,
		);
		assert!(elements.node("1").is_some());
		assert_eq!(elements.edges().len(), 1);
	}
}
