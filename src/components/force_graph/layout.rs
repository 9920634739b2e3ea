//! Initial node placement for each layout kind.
//!
//! Positions are in graph space centred on the origin. Static layouts pin
//! their nodes; force layouts only seed the simulation.

use std::collections::VecDeque;
use std::f64::consts::PI;

use crate::graph::style::LayoutOptions;

/// Smallest gap kept between neighbouring node centres.
const MIN_SPACING: f64 = 30.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
	pub positions: Vec<(f32, f32)>,
	pub anchored: bool,
}

/// Place `count` nodes connected by `edges` (index pairs) in a `width` x `height` viewport.
pub fn place(
	options: &LayoutOptions,
	count: usize,
	edges: &[(usize, usize)],
	width: f64,
	height: f64,
) -> Placement {
	let positions = match *options {
		LayoutOptions::Force { .. } => ring(count, 100.0, 0.0, 1.0),
		LayoutOptions::Circle { padding } => {
			let fit = (width.min(height) / 2.0 - padding).max(MIN_SPACING);
			let spread = count as f64 * MIN_SPACING / (2.0 * PI);
			ring(count, fit.max(spread), 0.0, 1.0)
		}
		LayoutOptions::Grid {
			padding,
			avoid_overlap,
		} => grid(count, width, height, padding, avoid_overlap),
		LayoutOptions::Concentric {
			min_node_spacing,
			start_angle,
			clockwise,
			..
		} => concentric(count, edges, min_node_spacing, start_angle, clockwise),
		LayoutOptions::Breadthfirst {
			padding,
			spacing_factor,
			directed,
		} => breadthfirst(count, edges, width, height, padding, spacing_factor, directed),
	};
	Placement {
		positions,
		anchored: options.is_static(),
	}
}

fn ring(count: usize, radius: f64, start_angle: f64, direction: f64) -> Vec<(f32, f32)> {
	if count == 1 {
		return vec![(0.0, 0.0)];
	}
	(0..count)
		.map(|i| {
			let angle = start_angle + direction * (i as f64) * 2.0 * PI / count as f64;
			((radius * angle.cos()) as f32, (radius * angle.sin()) as f32)
		})
		.collect()
}

fn grid(count: usize, width: f64, height: f64, padding: f64, avoid_overlap: bool) -> Vec<(f32, f32)> {
	if count == 0 {
		return Vec::new();
	}
	let aspect = (width / height.max(1.0)).max(0.1);
	let cols = ((count as f64 * aspect).sqrt().ceil() as usize).clamp(1, count);
	let rows = count.div_ceil(cols);
	let mut cell_w = ((width - 2.0 * padding) / cols as f64).max(1.0);
	let mut cell_h = ((height - 2.0 * padding) / rows as f64).max(1.0);
	if avoid_overlap {
		cell_w = cell_w.max(MIN_SPACING);
		cell_h = cell_h.max(MIN_SPACING);
	}
	let (total_w, total_h) = (cell_w * cols as f64, cell_h * rows as f64);
	(0..count)
		.map(|i| {
			let (col, row) = (i % cols, i / cols);
			(
				(-total_w / 2.0 + (col as f64 + 0.5) * cell_w) as f32,
				(-total_h / 2.0 + (row as f64 + 0.5) * cell_h) as f32,
			)
		})
		.collect()
}

fn degrees(count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
	let mut degree = vec![0; count];
	for &(a, b) in edges {
		degree[a] += 1;
		degree[b] += 1;
	}
	degree
}

/// Highest degree in the centre, one ring per distinct degree.
fn concentric(
	count: usize,
	edges: &[(usize, usize)],
	min_node_spacing: f64,
	start_angle: f64,
	clockwise: bool,
) -> Vec<(f32, f32)> {
	let degree = degrees(count, edges);
	let mut order: Vec<usize> = (0..count).collect();
	order.sort_by(|a, b| degree[*b].cmp(&degree[*a]));

	let mut levels: Vec<Vec<usize>> = Vec::new();
	for idx in order {
		let same_level = levels
			.last()
			.is_some_and(|level| degree[level[0]] == degree[idx]);
		if same_level {
			if let Some(level) = levels.last_mut() {
				level.push(idx);
			}
		} else {
			levels.push(vec![idx]);
		}
	}

	let gap = min_node_spacing + MIN_SPACING;
	let direction = if clockwise { 1.0 } else { -1.0 };
	let mut positions = vec![(0.0, 0.0); count];
	let mut radius = 0.0;
	for (depth, level) in levels.iter().enumerate() {
		if depth > 0 || level.len() > 1 {
			// ring must be long enough to hold the level
			let needed = level.len() as f64 * gap / (2.0 * PI);
			radius = (radius + gap).max(needed);
		}
		let placed = ring(level.len(), radius, start_angle, direction);
		for (&idx, pos) in level.iter().zip(placed) {
			positions[idx] = pos;
		}
	}
	positions
}

/// Rows by BFS depth from the roots.
fn breadthfirst(
	count: usize,
	edges: &[(usize, usize)],
	width: f64,
	height: f64,
	padding: f64,
	spacing_factor: f64,
	directed: bool,
) -> Vec<(f32, f32)> {
	let mut adjacency = vec![Vec::new(); count];
	let mut indegree = vec![0; count];
	for &(a, b) in edges {
		adjacency[a].push(b);
		indegree[b] += 1;
		if !directed {
			adjacency[b].push(a);
		}
	}

	let mut depth: Vec<Option<usize>> = vec![None; count];
	let mut queue = VecDeque::new();
	let roots = (0..count).filter(|&i| indegree[i] == 0).chain(0..count);
	for root in roots {
		if depth[root].is_some() {
			continue;
		}
		depth[root] = Some(0);
		queue.push_back(root);
		while let Some(current) = queue.pop_front() {
			let next = depth[current].unwrap_or(0) + 1;
			for &neighbor in &adjacency[current] {
				if depth[neighbor].is_none() {
					depth[neighbor] = Some(next);
					queue.push_back(neighbor);
				}
			}
		}
	}

	let levels = depth.iter().flatten().max().map_or(0, |d| d + 1);
	let mut rows: Vec<Vec<usize>> = vec![Vec::new(); levels];
	for (idx, d) in depth.iter().enumerate() {
		rows[d.unwrap_or(0)].push(idx);
	}

	let row_gap = ((height - 2.0 * padding) / levels.max(1) as f64).max(MIN_SPACING * 2.0) * spacing_factor;
	let total_h = row_gap * (levels.max(1) - 1) as f64;
	let mut positions = vec![(0.0, 0.0); count];
	for (level, row) in rows.iter().enumerate() {
		let col_gap = ((width - 2.0 * padding) / row.len().max(1) as f64).max(MIN_SPACING) * spacing_factor;
		let total_w = col_gap * (row.len().max(1) - 1) as f64;
		for (col, &idx) in row.iter().enumerate() {
			positions[idx] = (
				(-total_w / 2.0 + col as f64 * col_gap) as f32,
				(-total_h / 2.0 + level as f64 * row_gap) as f32,
			);
		}
	}
	positions
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::StyleRegistry;

	fn options(name: &str) -> LayoutOptions {
		StyleRegistry::default().layout(name).unwrap().clone()
	}

	#[test]
	fn force_seeds_without_pinning() {
		let placement = place(&options("force"), 4, &[], 800.0, 600.0);
		assert_eq!(placement.positions.len(), 4);
		assert!(!placement.anchored);
	}

	#[test]
	fn circle_is_equidistant_and_pinned() {
		let placement = place(&options("circle"), 6, &[], 800.0, 600.0);
		assert!(placement.anchored);
		let radii: Vec<f32> = placement
			.positions
			.iter()
			.map(|(x, y)| (x * x + y * y).sqrt())
			.collect();
		for r in &radii {
			assert!((r - radii[0]).abs() < 0.01);
		}
	}

	#[test]
	fn grid_positions_are_distinct() {
		let placement = place(&options("grid"), 7, &[], 800.0, 600.0);
		for (i, a) in placement.positions.iter().enumerate() {
			for b in &placement.positions[i + 1..] {
				assert_ne!(a, b);
			}
		}
	}

	#[test]
	fn concentric_puts_hub_in_centre() {
		let edges = [(0, 1), (0, 2), (0, 3)];
		let placement = place(&options("concentric"), 4, &edges, 800.0, 600.0);
		assert_eq!(placement.positions[0], (0.0, 0.0));
		assert_ne!(placement.positions[1], (0.0, 0.0));
	}

	#[test]
	fn breadthfirst_places_children_below_roots() {
		let edges = [(0, 1), (1, 2)];
		let placement = place(&options("breadthfirst"), 4, &edges, 800.0, 600.0);
		let y = |i: usize| placement.positions[i].1;
		assert!(y(0) < y(1));
		assert!(y(1) < y(2));
		// node 3 is its own root
		assert_eq!(y(3), y(0));
	}

	#[test]
	fn empty_graph_places_nothing() {
		for name in ["force", "circle", "grid", "concentric", "breadthfirst"] {
			assert!(place(&options(name), 0, &[], 800.0, 600.0).positions.is_empty());
		}
	}
}
