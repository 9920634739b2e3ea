//! Graph document model and everything computed from it.

pub mod detail;
pub mod document;
pub mod elements;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod search;
pub mod style;

pub use detail::{NodeDetail, RelatedNode, describe_node};
pub use document::GraphDocument;
pub use elements::{ElementSet, VisualEdge, VisualElement, VisualNode};
pub use filter::{HiddenSet, TypeFilter, compute_hidden};
pub use normalize::{Normalized, normalize, normalize_with_report};
pub use search::search;
pub use style::StyleRegistry;
