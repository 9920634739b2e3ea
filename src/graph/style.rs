//! Static visual configuration: node and relationship styles plus the named
//! layout parameter bags.

use std::f64::consts::PI;

use thiserror::Error;

/// Node outline drawn by the canvas painter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shape {
	#[default]
	Ellipse,
	RoundRectangle,
	Diamond,
	Hexagon,
	Octagon,
	Tag,
}

/// Stroke pattern for an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineStyle {
	#[default]
	Solid,
	Dashed,
	Dotted,
}

/// Arrowhead at the target end of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Arrow {
	#[default]
	Triangle,
	None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeStyle {
	pub color: &'static str,
	pub shape: Shape,
	pub size: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RelationshipStyle {
	pub color: &'static str,
	pub line: LineStyle,
	pub width: f64,
	pub arrow: Arrow,
}

/// Overlay colors for embedded and placeholder elements.
pub const EMBEDDED_BORDER: &str = "#3F51B5";
pub const PLACEHOLDER_BORDER: &str = "#FF9800";
pub const PLACEHOLDER_FILL: &str = "#FFECB3";

const DEFAULT_NODE: NodeStyle = NodeStyle {
	color: "#666666",
	shape: Shape::Ellipse,
	size: 30.0,
};

const DEFAULT_RELATIONSHIP: RelationshipStyle = RelationshipStyle {
	color: "#999999",
	line: LineStyle::Solid,
	width: 1.0,
	arrow: Arrow::Triangle,
};

const fn node(color: &'static str, shape: Shape, size: f64) -> NodeStyle {
	NodeStyle { color, shape, size }
}

const fn rel(color: &'static str, line: LineStyle, width: f64, arrow: Arrow) -> RelationshipStyle {
	RelationshipStyle {
		color,
		line,
		width,
		arrow,
	}
}

const NODE_TYPES: &[(&str, NodeStyle)] = &[
	("Component", node("#4285F4", Shape::Ellipse, 40.0)),
	("Module", node("#34A853", Shape::RoundRectangle, 35.0)),
	("Interface", node("#FBBC05", Shape::Diamond, 35.0)),
	("Feature", node("#EA4335", Shape::Hexagon, 35.0)),
	("Resource", node("#9C27B0", Shape::Octagon, 35.0)),
	("Concept", node("#00ACC1", Shape::Tag, 35.0)),
	// embedded subgraphs
	("Episodic", node("#795548", Shape::RoundRectangle, 45.0)),
	("Entity", node("#3F51B5", Shape::Ellipse, 35.0)),
	("Community", node("#009688", Shape::RoundRectangle, 40.0)),
	("Unknown", node("#9E9E9E", Shape::Ellipse, 30.0)),
	("Referenced", node("#FF9800", Shape::RoundRectangle, 25.0)),
	// identifier prefixes of placeholder nodes
	("mod", node("#2196F3", Shape::RoundRectangle, 35.0)),
	("if", node("#FFEB3B", Shape::Diamond, 35.0)),
	("res", node("#9C27B0", Shape::Octagon, 35.0)),
	("feat", node("#F44336", Shape::Hexagon, 35.0)),
	("con", node("#00BCD4", Shape::Tag, 35.0)),
];

const RELATIONSHIP_TYPES: &[(&str, RelationshipStyle)] = &[
	("IMPLEMENTS", rel("#4285F4", LineStyle::Solid, 2.0, Arrow::Triangle)),
	("EXPOSES", rel("#FBBC05", LineStyle::Solid, 2.0, Arrow::Triangle)),
	("CONSUMES", rel("#34A853", LineStyle::Solid, 2.0, Arrow::Triangle)),
	("CONTAINS", rel("#9C27B0", LineStyle::Dashed, 2.0, Arrow::Triangle)),
	("RELATED_TO", rel("#00ACC1", LineStyle::Dotted, 1.0, Arrow::None)),
	("EXTENDS", rel("#FF5722", LineStyle::Solid, 2.0, Arrow::Triangle)),
	("LOCATED_IN", rel("#607D8B", LineStyle::Dashed, 1.0, Arrow::Triangle)),
	("MENTIONS", rel("#8BC34A", LineStyle::Dotted, 1.0, Arrow::None)),
	("RELATES_TO", rel("#FF9800", LineStyle::Dotted, 1.0, Arrow::None)),
	("HAS_MEMBER", rel("#9C27B0", LineStyle::Dashed, 1.0, Arrow::Triangle)),
	("REFERENCES", rel("#FF9800", LineStyle::Dashed, 1.0, Arrow::Triangle)),
	("DEPENDS_ON", rel("#F44336", LineStyle::Solid, 2.0, Arrow::Triangle)),
];

/// Parameter bag for one named layout.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutOptions {
	/// Seeded on a circle, then left to the force simulation.
	Force {
		charge: f32,
		spring: f32,
		max_force: f32,
		node_speed: f32,
		damping: f32,
	},
	Circle {
		padding: f64,
	},
	Grid {
		padding: f64,
		avoid_overlap: bool,
	},
	Concentric {
		padding: f64,
		min_node_spacing: f64,
		start_angle: f64,
		clockwise: bool,
	},
	Breadthfirst {
		padding: f64,
		spacing_factor: f64,
		directed: bool,
	},
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
	#[error("unknown layout: {0}")]
	Unknown(String),

	#[error("layout {layout} has an invalid {parameter}")]
	InvalidParameter { layout: String, parameter: &'static str },
}

impl LayoutOptions {
	/// Reject non-finite or out-of-range parameters before the renderer sees them.
	pub fn validate(&self, layout: &str) -> Result<(), LayoutError> {
		let invalid = |parameter| LayoutError::InvalidParameter {
			layout: layout.to_owned(),
			parameter,
		};
		let positive = |value: f64, parameter| {
			if value.is_finite() && value > 0.0 {
				Ok(())
			} else {
				Err(invalid(parameter))
			}
		};
		let non_negative = |value: f64, parameter| {
			if value.is_finite() && value >= 0.0 {
				Ok(())
			} else {
				Err(invalid(parameter))
			}
		};
		match *self {
			LayoutOptions::Force {
				charge,
				spring,
				max_force,
				node_speed,
				damping,
			} => {
				positive(charge as f64, "charge")?;
				positive(spring as f64, "spring")?;
				positive(max_force as f64, "max_force")?;
				positive(node_speed as f64, "node_speed")?;
				if !(damping > 0.0 && damping < 1.0) {
					return Err(invalid("damping"));
				}
				Ok(())
			}
			LayoutOptions::Circle { padding } | LayoutOptions::Grid { padding, .. } => {
				non_negative(padding, "padding")
			}
			LayoutOptions::Concentric {
				padding,
				min_node_spacing,
				start_angle,
				..
			} => {
				non_negative(padding, "padding")?;
				non_negative(min_node_spacing, "min_node_spacing")?;
				if !start_angle.is_finite() {
					return Err(invalid("start_angle"));
				}
				Ok(())
			}
			LayoutOptions::Breadthfirst {
				padding,
				spacing_factor,
				..
			} => {
				non_negative(padding, "padding")?;
				positive(spacing_factor, "spacing_factor")
			}
		}
	}

	/// Whether nodes are pinned in place after seeding.
	pub fn is_static(&self) -> bool {
		!matches!(self, LayoutOptions::Force { .. })
	}
}

/// The trivial deterministic layout at the end of every fallback chain.
pub const LAST_RESORT_LAYOUT: LayoutOptions = LayoutOptions::Circle { padding: 30.0 };

/// Type name to style lookup plus the layout table.
#[derive(Clone, Debug)]
pub struct StyleRegistry {
	layouts: Vec<(String, LayoutOptions)>,
}

impl Default for StyleRegistry {
	fn default() -> Self {
		let layouts = vec![
			(
				"force".to_owned(),
				LayoutOptions::Force {
					charge: 150.0,
					spring: 0.05,
					max_force: 100.0,
					node_speed: 3000.0,
					damping: 0.9,
				},
			),
			(
				"force-compact".to_owned(),
				LayoutOptions::Force {
					charge: 60.0,
					spring: 0.1,
					max_force: 60.0,
					node_speed: 2000.0,
					damping: 0.85,
				},
			),
			(
				"breadthfirst".to_owned(),
				LayoutOptions::Breadthfirst {
					padding: 30.0,
					spacing_factor: 1.2,
					directed: true,
				},
			),
			("circle".to_owned(), LAST_RESORT_LAYOUT),
			(
				"grid".to_owned(),
				LayoutOptions::Grid {
					padding: 30.0,
					avoid_overlap: true,
				},
			),
			(
				"concentric".to_owned(),
				LayoutOptions::Concentric {
					padding: 30.0,
					min_node_spacing: 10.0,
					start_angle: 3.0 / 2.0 * PI,
					clockwise: true,
				},
			),
		];
		Self { layouts }
	}
}

impl StyleRegistry {
	pub fn node_style(&self, node_type: &str) -> NodeStyle {
		NODE_TYPES
			.iter()
			.find(|(name, _)| *name == node_type)
			.map(|(_, style)| *style)
			.unwrap_or(DEFAULT_NODE)
	}

	pub fn relationship_style(&self, rel_type: &str) -> RelationshipStyle {
		RELATIONSHIP_TYPES
			.iter()
			.find(|(name, _)| *name == rel_type)
			.map(|(_, style)| *style)
			.unwrap_or(DEFAULT_RELATIONSHIP)
	}

	pub fn is_known_node_type(&self, node_type: &str) -> bool {
		NODE_TYPES.iter().any(|(name, _)| *name == node_type)
	}

	/// All registered node types, in table order.
	pub fn node_types(&self) -> impl Iterator<Item = (&'static str, NodeStyle)> {
		NODE_TYPES.iter().copied()
	}

	pub fn relationship_types(&self) -> impl Iterator<Item = (&'static str, RelationshipStyle)> {
		RELATIONSHIP_TYPES.iter().copied()
	}

	/// First label known to the registry, else the first label, else `"Unknown"`.
	pub fn resolve_type(&self, labels: &[String]) -> String {
		labels
			.iter()
			.find(|label| self.is_known_node_type(label))
			.or_else(|| labels.first())
			.cloned()
			.unwrap_or_else(|| "Unknown".to_owned())
	}

	pub fn layout_names(&self) -> impl Iterator<Item = &str> {
		self.layouts.iter().map(|(name, _)| name.as_str())
	}

	/// Look up and validate a named layout.
	pub fn layout(&self, name: &str) -> Result<&LayoutOptions, LayoutError> {
		let (_, options) = self
			.layouts
			.iter()
			.find(|(n, _)| n == name)
			.ok_or_else(|| LayoutError::Unknown(name.to_owned()))?;
		options.validate(name)?;
		Ok(options)
	}

	/// Register or replace a layout bag.
	pub fn set_layout(&mut self, name: impl Into<String>, options: LayoutOptions) {
		let name = name.into();
		match self.layouts.iter_mut().find(|(n, _)| *n == name) {
			Some((_, existing)) => *existing = options,
			None => self.layouts.push((name, options)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn labels(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn known_label_wins_over_position() {
		let registry = StyleRegistry::default();
		assert_eq!(registry.resolve_type(&labels(&["Foo", "Component"])), "Component");
		assert_eq!(registry.resolve_type(&labels(&["Module", "Component"])), "Module");
	}

	#[test]
	fn unknown_labels_fall_back_to_first() {
		let registry = StyleRegistry::default();
		assert_eq!(registry.resolve_type(&labels(&["Foo"])), "Foo");
		assert_eq!(registry.resolve_type(&labels(&["Foo", "Bar"])), "Foo");
		assert_eq!(registry.resolve_type(&[]), "Unknown");
	}

	#[test]
	fn unregistered_types_get_default_styles() {
		let registry = StyleRegistry::default();
		assert_eq!(registry.node_style("Nope"), DEFAULT_NODE);
		assert_eq!(registry.relationship_style("NOPE"), DEFAULT_RELATIONSHIP);
		assert_eq!(registry.node_style("Interface").shape, Shape::Diamond);
		assert_eq!(registry.relationship_style("CONTAINS").line, LineStyle::Dashed);
	}

	#[test]
	fn layout_lookup_validates() {
		let mut registry = StyleRegistry::default();
		assert!(registry.layout("force").is_ok());
		assert_eq!(
			registry.layout("cola"),
			Err(LayoutError::Unknown("cola".to_owned()))
		);

		registry.set_layout("circle", LayoutOptions::Circle { padding: f64::NAN });
		assert!(matches!(
			registry.layout("circle"),
			Err(LayoutError::InvalidParameter { parameter: "padding", .. })
		));
	}
}
