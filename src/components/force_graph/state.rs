use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{info, warn};

use super::layout::place;
use super::types::Tap;
use crate::explorer::{ElementClasses, Highlight};
use crate::graph::ElementSet;
use crate::graph::style::{
	LAST_RESORT_LAYOUT, LayoutError, LayoutOptions, NodeStyle, RelationshipStyle, StyleRegistry,
};

/// World-space radius per unit of registry node size.
const SIZE_TO_RADIUS: f64 = 0.25;
/// World-space slack around a node for hit testing.
const HIT_SLACK: f64 = 4.0;
/// Pointer travel in pixels below which a press is a tap.
const TAP_TOLERANCE: f64 = 3.0;
const FIT_PADDING: f64 = 50.0;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 3.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub style: NodeStyle,
	pub radius: f64,
	pub embedded: bool,
	pub placeholder: bool,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub id: String,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: String,
	pub style: RelationshipStyle,
	pub embedded: bool,
	pub placeholder: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Option<DefaultNodeIdx>,
	pub classes: ElementClasses,
	/// Eased 0..1 strength of the focus highlight.
	pub highlight_t: f64,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	pub layout: String,
	/// Highlight kept on screen while it fades out.
	fading: Option<Highlight>,
	edges: Vec<EdgeInfo>,
	elements: Arc<ElementSet>,
}

fn simulation(options: &LayoutOptions) -> SimulationParameters {
	match *options {
		LayoutOptions::Force {
			charge,
			spring,
			max_force,
			node_speed,
			damping,
		} => SimulationParameters {
			force_charge: charge,
			force_spring: spring,
			force_max: max_force,
			node_speed,
			damping_factor: damping,
		},
		_ => SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		},
	}
}

impl ForceGraphState {
	/// Build the renderer state, trying each layout of `layouts` in turn.
	pub fn new(
		elements: Arc<ElementSet>,
		registry: &StyleRegistry,
		layouts: &[String],
		classes: ElementClasses,
		width: f64,
		height: f64,
	) -> Self {
		let mut state = Self {
			graph: ForceGraph::new(simulation(&LAST_RESORT_LAYOUT)),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			classes,
			highlight_t: 0.0,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			layout: String::new(),
			fading: None,
			edges: Vec::new(),
			elements,
		};
		state.apply_layout_chain(registry, layouts.iter().map(String::as_str));
		state
	}

	/// First layout that succeeds wins; the circle layout catches the rest.
	pub fn apply_layout_chain<'a>(
		&mut self,
		registry: &StyleRegistry,
		layouts: impl IntoIterator<Item = &'a str>,
	) {
		for name in layouts {
			match self.apply_layout(registry, name) {
				Ok(()) => return,
				Err(err) => warn!("Error applying {name} layout: {err}"),
			}
		}
		warn!("Falling back to circle layout");
		self.rebuild(registry, &LAST_RESORT_LAYOUT, "circle");
	}

	pub fn apply_layout(&mut self, registry: &StyleRegistry, name: &str) -> Result<(), LayoutError> {
		let options = registry.layout(name)?.clone();
		self.rebuild(registry, &options, name);
		info!("Applied {name} layout");
		Ok(())
	}

	fn rebuild(&mut self, registry: &StyleRegistry, options: &LayoutOptions, name: &str) {
		let elements = Arc::clone(&self.elements);
		let nodes = elements.nodes();
		let index_of: HashMap<&str, usize> = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.as_str(), i))
			.collect();
		let pairs: Vec<(usize, usize)> = elements
			.edges()
			.iter()
			.filter_map(|edge| {
				Some((
					*index_of.get(edge.source_id.as_str())?,
					*index_of.get(edge.target_id.as_str())?,
				))
			})
			.collect();
		let placement = place(options, nodes.len(), &pairs, self.width, self.height);

		let mut graph = ForceGraph::new(simulation(options));
		let mut id_to_idx = HashMap::new();
		for (node, &(x, y)) in nodes.iter().zip(&placement.positions) {
			let style = registry.node_style(&node.resolved_type);
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: placement.anchored,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.display_name.clone(),
					style,
					radius: style.size * SIZE_TO_RADIUS,
					embedded: node.is_embedded,
					placeholder: node.is_placeholder,
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		let mut edges = Vec::new();
		for edge in elements.edges() {
			let (Some(&source), Some(&target)) = (
				id_to_idx.get(edge.source_id.as_str()),
				id_to_idx.get(edge.target_id.as_str()),
			) else {
				continue;
			};
			// self-loops are drawn but kept out of the spring simulation
			if source != target {
				graph.add_edge(source, target, EdgeData::default());
			}
			edges.push(EdgeInfo {
				id: edge.id.clone(),
				source,
				target,
				label: edge.resolved_type.clone(),
				style: registry.relationship_style(&edge.resolved_type),
				embedded: edge.is_embedded,
				placeholder: edge.is_placeholder,
			});
		}

		self.graph = graph;
		self.edges = edges;
		self.layout = name.to_owned();
		self.hover = None;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.animation_running = true;
		if placement.anchored {
			let all: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
			self.fit(&all);
		} else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
		}
	}

	pub fn edges(&self) -> &[EdgeInfo] {
		&self.edges
	}

	pub fn set_classes(&mut self, classes: ElementClasses) {
		let had_focus = self.classes.highlight.focused.is_some();
		let has_focus = classes.highlight.focused.is_some();
		if had_focus && !has_focus {
			self.fading = Some(std::mem::take(&mut self.classes.highlight));
		} else if has_focus {
			self.fading = None;
		}
		self.classes = classes;
	}

	/// Focus highlight currently on screen, including one fading out.
	pub fn active_highlight(&self) -> &Highlight {
		match &self.fading {
			Some(fading) if self.classes.highlight.focused.is_none() => fading,
			_ => &self.classes.highlight,
		}
	}

	pub fn has_active_highlight(&self) -> bool {
		self.active_highlight().focused.is_some()
	}

	pub fn node_positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn node_radii(&self) -> HashMap<DefaultNodeIdx, f64> {
		let mut radii = HashMap::new();
		self.graph.visit_nodes(|node| {
			radii.insert(node.index(), node.data.user_data.radius);
		});
		radii
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost visible node under the pointer.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			if self.classes.hidden.hides_node(&info.id) {
				return;
			}
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < info.radius + HIT_SLACK {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.hover = node;
	}

	/// Record pointer travel; small jitter still counts as a tap.
	pub fn track_pointer(&mut self, x: f64, y: f64) {
		let moved = |sx: f64, sy: f64| ((x - sx).powi(2) + (y - sy).powi(2)).sqrt() > TAP_TOLERANCE;
		if self.drag.active && moved(self.drag.start_x, self.drag.start_y) {
			self.drag.moved = true;
		}
		if self.pan.active && moved(self.pan.start_x, self.pan.start_y) {
			self.pan.moved = true;
		}
	}

	/// End a press, reporting a tap when the pointer barely moved.
	pub fn release_pointer(&mut self) -> Option<Tap> {
		let tap = if self.drag.active && !self.drag.moved {
			self.drag.node_idx.and_then(|idx| self.node_id(idx)).map(Tap::Node)
		} else if self.pan.active && !self.pan.moved {
			Some(Tap::Background)
		} else {
			None
		};
		self.drag = DragState::default();
		self.pan = PanState::default();
		tap
	}

	/// Zoom and pan so the listed nodes fill the viewport.
	pub fn fit(&mut self, ids: &[String]) {
		let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			if !wanted.contains(info.id.as_str()) {
				return;
			}
			let (x, y, r) = (node.x() as f64, node.y() as f64, info.radius);
			bounds = Some(match bounds {
				Some((x0, y0, x1, y1)) => (x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)),
				None => (x - r, y - r, x + r, y + r),
			});
		});
		let Some((x0, y0, x1, y1)) = bounds else {
			return;
		};
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = ((self.width - 2.0 * FIT_PADDING) / bw)
			.min((self.height - 2.0 * FIT_PADDING) / bh)
			.clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn center(&mut self, id: &str) {
		let mut target = None;
		self.graph.visit_nodes(|node| {
			if node.data.user_data.id == id {
				target = Some((node.x() as f64, node.y() as f64));
			}
		});
		if let Some((x, y)) = target {
			self.transform.x = self.width / 2.0 - x * self.transform.k;
			self.transform.y = self.height / 2.0 - y * self.transform.k;
		}
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let focused = self.classes.highlight.focused.is_some();
		let (target, speed) = if focused { (1.0, 1.8) } else { (0.0, 1.26) };
		self.highlight_t += (target - self.highlight_t) * speed * dt as f64;
		if !focused && self.highlight_t < 0.01 {
			self.highlight_t = 0.0;
			self.fading = None;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
