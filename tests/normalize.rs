use std::collections::HashSet;

use knowledge_graph_explorer::graph::{
	ElementSet, GraphDocument, StyleRegistry, TypeFilter, VisualElement, compute_hidden, normalize,
	search,
};

fn elements(json: &str) -> ElementSet {
	let doc = GraphDocument::from_json(json).unwrap();
	normalize(&doc, &StyleRegistry::default()).into_iter().collect()
}

/// Everything the normalizer has to cope with at once.
const MIXED: &str = r#"{
	"nodes": [
		{"id": 1, "name": "CLI Tool", "labels": ["Component"], "entity_edges": ["0123456789abcdef"]},
		{"id": 1, "name": "CLI Tool (dup)", "labels": ["Module"]},
		{"uuid": "mod-parser", "name": "Parser", "labels": ["Episodic"],
		 "content": "{\"nodes\":[{\"uuid\":\"e1\",\"entity_type\":\"Entity\"}],\"edges\":[{\"source_uuid\":\"e1\",\"target_uuid\":\"if-token-stream\",\"relationship_type\":\"EXPOSES\"}]}"},
		{"name": "orphan", "entity_edges": ["ffffffff00000000"]},
		{"id": "x", "content": "{not json"}
	],
	"relationships": [
		{"id": 1, "source": 1, "target": "mod-parser", "type": "CONTAINS"},
		{"id": 1, "source": "mod-parser", "target": 1, "type": "CONTAINS"},
		{"id": 2, "source": 1, "type": "CONTAINS"},
		{"id": 3, "source": 1, "target": "nowhere", "type": "CONTAINS"}
	]
}"#;

#[test]
fn two_nodes_and_a_relationship() {
	let set = elements(
		r#"{"nodes":[
			{"id":1,"name":"A","labels":["Component"]},
			{"id":2,"name":"B","labels":["Module"]}
		],"relationships":[{"id":1,"source":1,"target":2,"type":"CONTAINS"}]}"#,
	);
	assert_eq!(set.nodes().len(), 2);
	assert_eq!(set.edges().len(), 1);
	let edge = &set.edges()[0];
	assert_eq!(edge.id, "edge-1");
	assert_eq!(edge.source_id, "1");
	assert_eq!(edge.target_id, "2");
}

#[test]
fn escaped_content_yields_embedded_node() {
	let set = elements(
		r#"{"nodes":[{"id":"c","content":"{\\\"nodes\\\":[{\\\"uuid\\\":\\\"e1\\\",\\\"entity_type\\\":\\\"Entity\\\"}],\\\"edges\\\":[]}"}],"relationships":[]}"#,
	);
	let embedded = set.node("e1").unwrap();
	assert!(embedded.is_embedded);
	assert_eq!(embedded.resolved_type, "Entity");
	assert_eq!(embedded.parent_id.as_deref(), Some("c"));
}

#[test]
fn embedded_edge_endpoint_becomes_placeholder() {
	let set = elements(
		r#"{"nodes":[{"id":"c","content":"{\"nodes\":[],\"edges\":[{\"source_uuid\":\"mod-foo\",\"target_uuid\":\"c\",\"relationship_type\":\"CONTAINS\"}]}"}],"relationships":[]}"#,
	);
	let placeholder = set.node("mod-foo").unwrap();
	assert!(placeholder.is_placeholder);
	assert_eq!(placeholder.display_name, "Foo");
	assert_eq!(placeholder.resolved_type, "mod");
}

#[test]
fn identifiers_are_unique() {
	let elements: Vec<VisualElement> = normalize(
		&GraphDocument::from_json(MIXED).unwrap(),
		&StyleRegistry::default(),
	);
	let mut node_ids = HashSet::new();
	let mut edge_ids = HashSet::new();
	for element in &elements {
		let fresh = match element {
			VisualElement::Node(node) => node_ids.insert(node.id.clone()),
			VisualElement::Edge(edge) => edge_ids.insert(edge.id.clone()),
		};
		assert!(fresh, "duplicate id {}", element.id());
	}
}

#[test]
fn every_edge_resolves_to_nodes() {
	let set = elements(MIXED);
	for edge in set.edges() {
		assert!(set.node(&edge.source_id).is_some(), "dangling source in {}", edge.id);
		assert!(set.node(&edge.target_id).is_some(), "dangling target in {}", edge.id);
	}
	assert_eq!(set.node("1").map(|n| n.display_name.as_str()), Some("CLI Tool"));
	assert!(set.node("dummy-target-ffffffff").is_some());
	assert!(set.edges().iter().all(|e| e.id != "entity-edge-ffffffff00000000"));
	assert!(set.node("x").is_some());
}

#[test]
fn full_filter_hides_nothing_and_empty_filter_hides_all() {
	let set = elements(MIXED);
	assert!(TypeFilter::all(&set).hidden(&set).is_empty());

	let hidden = compute_hidden(&set, &HashSet::new(), &set.relationship_types().into_iter().collect());
	assert_eq!(hidden.nodes.len(), set.nodes().len());
	assert_eq!(hidden.edges.len(), set.edges().len());
}

#[test]
fn search_reaches_names_and_properties() {
	let set = elements(MIXED);
	assert_eq!(search(&set, "cli"), vec!["1".to_owned()]);
	assert!(search(&set, "no such thing").is_empty());
}
