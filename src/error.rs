//! Error and warning types for loading and normalizing graph documents.

use thiserror::Error;

use crate::graph::style::LayoutError;

/// Failures that end a load attempt or a layout request.
#[derive(Error, Debug)]
pub enum ExplorerError {
	/// The transport failed or answered with a non-success status.
	#[error("failed to fetch {url}: {reason}")]
	Fetch { url: String, reason: String },

	/// The response body is not a valid graph document.
	#[error("invalid graph document: {0}")]
	Parse(#[from] serde_json::Error),

	#[error(transparent)]
	Layout(#[from] LayoutError),
}

/// Shorthand used across the loader and the renderer.
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// A dangling or unanchorable reference found during normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceWarning {
	/// An edge lacks its source or its target and was dropped.
	#[error("skipping edge {edge} with missing source or target")]
	MissingEndpoint { edge: String },

	/// A relationship points at a node the document never defines.
	#[error("skipping edge {edge}: unknown endpoint {endpoint}")]
	UnknownEndpoint { edge: String, endpoint: String },

	/// An `entity_edges` reference sits on a node with no identifier.
	#[error("cannot create edge for entity edge {edge_uuid}: source node has no id or uuid")]
	UnanchoredReference { edge_uuid: String },

	/// An embedded node has no `uuid` and cannot be addressed.
	#[error("skipping embedded node without uuid inside {container}")]
	UnidentifiedEmbeddedNode { container: String },
}

/// Anything normalization recovered from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeWarning {
	#[error(transparent)]
	Reference(#[from] ReferenceWarning),

	/// A node's `content` looked like JSON but did not parse.
	#[error("error parsing content of node {node} as JSON: {reason}")]
	EmbeddedContent { node: String, reason: String },

	/// One entry of an embedded list was skipped; the rest were kept.
	#[error("skipping embedded entry in node {node}: {reason}")]
	EmbeddedEntry { node: String, reason: String },
}
