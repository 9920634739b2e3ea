//! Static explorer settings.

/// Where the graph comes from and how it is first shown.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplorerConfig {
	pub data_url: String,
	pub default_layout: String,
	/// Tried in order when the default layout fails.
	pub fallback_layouts: Vec<String>,
	/// Node types unchecked on first load.
	pub hidden_node_types: Vec<String>,
	/// Append a timestamp to `data_url` so caches never serve a stale document.
	pub cache_bust: bool,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			data_url: "data/knowledge-graph-cleaned.json".to_owned(),
			default_layout: "force".to_owned(),
			fallback_layouts: vec!["force-compact".to_owned(), "circle".to_owned()],
			hidden_node_types: vec!["Episodic".to_owned(), "Unknown".to_owned()],
			cache_bust: true,
		}
	}
}

impl ExplorerConfig {
	/// The URL to fetch, with `t=<now_ms>` appended when cache busting is on.
	pub fn request_url(&self, now_ms: u64) -> String {
		if !self.cache_bust {
			return self.data_url.clone();
		}
		let sep = if self.data_url.contains('?') { '&' } else { '?' };
		format!("{}{}t={}", self.data_url, sep, now_ms)
	}

	/// Default layout followed by the fallbacks.
	pub fn layout_chain(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.default_layout.as_str())
			.chain(self.fallback_layouts.iter().map(String::as_str))
	}
}
