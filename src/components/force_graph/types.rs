/// One-shot requests from the page to the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasCommand {
	/// Rebuild positions with a named layout, falling back on failure.
	ApplyLayout(String),
	/// Zoom and pan so that all listed nodes are in view.
	Fit(Vec<String>),
	Center(String),
}

/// Outcome of a pointer press that did not turn into a drag or pan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tap {
	Node(String),
	Background,
}
