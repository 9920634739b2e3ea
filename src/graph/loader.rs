//! Fetches the graph document over HTTP with the browser's fetch API.

use log::info;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::document::GraphDocument;
use crate::error::{ExplorerError, Result};

/// Fetch and parse the document at `url`. Callers add cache busting.
pub async fn load(url: &str) -> Result<GraphDocument> {
	let fetch_error = |reason: String| ExplorerError::Fetch {
		url: url.to_owned(),
		reason,
	};

	let window = web_sys::window().ok_or_else(|| fetch_error("no window".to_owned()))?;
	let resp_value = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| fetch_error(format!("{:?}", e)))?;
	let resp: Response = resp_value
		.dyn_into()
		.map_err(|_| fetch_error("response is not a Response".to_owned()))?;

	if !resp.ok() {
		return Err(fetch_error(format!("HTTP error! Status: {}", resp.status())));
	}

	let text = JsFuture::from(resp.text().map_err(|e| fetch_error(format!("{:?}", e)))?)
		.await
		.map_err(|e| fetch_error(format!("{:?}", e)))?
		.as_string()
		.unwrap_or_default();

	let doc = GraphDocument::from_json(&text)?;
	info!(
		"Graph data loaded: {} nodes, {} relationships",
		doc.nodes.len(),
		doc.relationships.len()
	);
	Ok(doc)
}

/// Milliseconds since the epoch, from the JS clock.
pub fn now_ms() -> u64 {
	js_sys::Date::now() as u64
}
