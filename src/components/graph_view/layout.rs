//! Layout adapter: the boundary to the force simulation.
//!
//! The view never moves nodes itself. It hands the current node and link sets
//! to a [`LayoutAdapter`], pins nodes through `set_fixed`, and reads positions
//! back after each tick. [`ForceLayout`] is the default adapter, backed by the
//! `force_graph` simulation.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::state::Point;
use super::types::{LinkKey, NodeKey};

/// A node as submitted to the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
	/// Node identity.
	pub key: NodeKey,
	/// Starting position for nodes the layout has not seen yet.
	pub hint: Option<Point>,
	/// Pinned in place for the coming run.
	pub fixed: bool,
}

/// Emitted once per simulation step while a run is active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutTick {
	/// Remaining run energy; the run stops once it cools below a threshold.
	pub alpha: f64,
}

/// Boundary to a force simulation. Positions are in graph space.
pub trait LayoutAdapter {
	/// Sets the preferred link length, the node radius kept clear around each
	/// node and the canvas size used to seed unhinted nodes.
	fn configure(&mut self, link_distance: f64, node_radius: f64, size: (f64, f64));
	/// Replaces the node set. Known keys keep their positions.
	fn set_nodes(&mut self, nodes: &[LayoutNode]);
	/// Replaces the link set. Must follow `set_nodes`.
	fn set_links(&mut self, links: &[LinkKey]);
	/// (Re)starts a physics run.
	fn start(&mut self);
	/// Advances the run by `dt` seconds, returning a tick if it is still active.
	fn advance(&mut self, dt: f64) -> Option<LayoutTick>;
	/// Whether the current run still has energy.
	fn is_running(&self) -> bool;
	/// Current position of `key`, if the layout knows it.
	fn position(&self, key: &str) -> Option<Point>;
	/// Fixed nodes are not moved by the simulation.
	fn set_fixed(&mut self, key: &str, fixed: bool);
	/// Anchors `key` under the pointer until `drag_end`.
	fn drag_start(&mut self, key: &str);
	/// Moves a dragged node by a graph-space delta and reheats the run.
	fn drag_by(&mut self, key: &str, delta: Point);
	/// Releases the drag anchor; the node keeps its `fixed` state.
	fn drag_end(&mut self, key: &str);
}

const NODE_MASS: f32 = 10.0;
const ALPHA_MIN: f64 = 0.005;
const ALPHA_DECAY: f64 = 0.99;
const DRAG_ALPHA: f64 = 0.1;
const LINK_STRENGTH: f64 = 0.5;
const SEPARATION_PASSES: usize = 8;
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Pushes apart every pair of points closer than `min_dist`, splitting the
/// overlap between free points. Anchored points (`.2`) never move. Coincident
/// pairs are split along a direction derived from their index.
fn separate(points: &mut [(f64, f64, bool)], min_dist: f64) -> bool {
	let mut moved = false;
	for i in 0..points.len() {
		for j in (i + 1)..points.len() {
			let (ax, ay, a_anchor) = points[i];
			let (bx, by, b_anchor) = points[j];
			if a_anchor && b_anchor {
				continue;
			}
			let (dx, dy) = (bx - ax, by - ay);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist >= min_dist {
				continue;
			}
			let (ux, uy) = if dist < 1e-6 {
				let angle = j as f64 * GOLDEN_ANGLE;
				(angle.cos(), angle.sin())
			} else {
				(dx / dist, dy / dist)
			};
			let overlap = min_dist - dist;
			let (a_share, b_share) = match (a_anchor, b_anchor) {
				(true, _) => (0.0, overlap),
				(_, true) => (overlap, 0.0),
				_ => (overlap / 2.0, overlap / 2.0),
			};
			points[i].0 -= ux * a_share;
			points[i].1 -= uy * a_share;
			points[j].0 += ux * b_share;
			points[j].1 += uy * b_share;
			moved = true;
		}
	}
	moved
}

fn simulation() -> ForceGraph<NodeKey, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

/// `force_graph`-backed layout. The simulation is rebuilt on every node-set
/// change with positions carried over from the previous run.
pub struct ForceLayout {
	graph: ForceGraph<NodeKey, ()>,
	links: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	indices: HashMap<NodeKey, DefaultNodeIdx>,
	positions: HashMap<NodeKey, Point>,
	fixed: HashSet<NodeKey>,
	dragged: Option<NodeKey>,
	link_distance: f64,
	node_radius: f64,
	width: f64,
	height: f64,
	alpha: f64,
}

impl Default for ForceLayout {
	fn default() -> Self {
		Self {
			graph: simulation(),
			links: Vec::new(),
			indices: HashMap::new(),
			positions: HashMap::new(),
			fixed: HashSet::new(),
			dragged: None,
			link_distance: 100.0,
			node_radius: 7.5,
			width: 800.0,
			height: 600.0,
			alpha: 0.0,
		}
	}
}

impl ForceLayout {
	/// Idle layout with default distances and an 800x600 seeding area.
	pub fn new() -> Self {
		Self::default()
	}

	fn ring_position(&self, i: usize, count: usize) -> Point {
		let angle = (i as f64) * 2.0 * PI / count.max(1) as f64;
		Point::new(
			self.width / 2.0 + self.link_distance * angle.cos(),
			self.height / 2.0 + self.link_distance * angle.sin(),
		)
	}

	fn is_anchored(&self, key: &str) -> bool {
		self.fixed.contains(key) || self.dragged.as_deref() == Some(key)
	}

	fn set_anchor(&mut self, key: &str) {
		let anchored = self.is_anchored(key);
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data == key {
				node.data.is_anchor = anchored;
			}
		});
	}

	fn refresh_positions(&mut self) {
		let positions = &mut self.positions;
		positions.clear();
		self.graph.visit_nodes(|node| {
			positions.insert(
				node.data.user_data.clone(),
				Point::new(node.x() as f64, node.y() as f64),
			);
		});
	}

	/// Pulls linked nodes toward `link_distance`, scaled by the run's alpha.
	fn relax_links(&mut self) {
		if self.links.is_empty() {
			return;
		}
		let mut current = HashMap::with_capacity(self.indices.len());
		self.graph.visit_nodes(|node| {
			current.insert(node.index(), (node.x(), node.y(), node.data.is_anchor));
		});

		let strength = (LINK_STRENGTH * self.alpha) as f32;
		let target = self.link_distance as f32;
		let mut shift: HashMap<DefaultNodeIdx, (f32, f32)> = HashMap::new();
		for &(a, b) in &self.links {
			let (Some(&(ax, ay, a_fixed)), Some(&(bx, by, b_fixed))) =
				(current.get(&a), current.get(&b))
			else {
				continue;
			};
			let (dx, dy) = (bx - ax, by - ay);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < 0.001 {
				continue;
			}
			let k = (dist - target) / dist * strength * 0.5;
			if !a_fixed {
				let s = shift.entry(a).or_insert((0.0, 0.0));
				s.0 += dx * k;
				s.1 += dy * k;
			}
			if !b_fixed {
				let s = shift.entry(b).or_insert((0.0, 0.0));
				s.0 -= dx * k;
				s.1 -= dy * k;
			}
		}

		self.graph.visit_nodes_mut(|node| {
			if let Some(&(sx, sy)) = shift.get(&node.index()) {
				node.data.x += sx;
				node.data.y += sy;
			}
		});
	}

	/// Keeps node discs from overlapping after a simulation step.
	fn avoid_overlaps(&mut self) {
		let mut order = Vec::with_capacity(self.indices.len());
		let mut points = Vec::with_capacity(self.indices.len());
		self.graph.visit_nodes(|node| {
			order.push(node.index());
			points.push((node.x() as f64, node.y() as f64, node.data.is_anchor));
		});
		if !separate(&mut points, 2.0 * self.node_radius) {
			return;
		}
		let moved: HashMap<DefaultNodeIdx, (f64, f64, bool)> =
			order.into_iter().zip(points).collect();
		self.graph.visit_nodes_mut(|node| {
			if let Some(&(x, y, _)) = moved.get(&node.index()) {
				node.data.x = x as f32;
				node.data.y = y as f32;
			}
		});
	}
}

impl LayoutAdapter for ForceLayout {
	fn configure(&mut self, link_distance: f64, node_radius: f64, size: (f64, f64)) {
		self.link_distance = link_distance;
		self.node_radius = node_radius;
		(self.width, self.height) = size;
	}

	fn set_nodes(&mut self, nodes: &[LayoutNode]) {
		self.fixed = nodes
			.iter()
			.filter(|n| n.fixed)
			.map(|n| n.key.clone())
			.collect();
		if let Some(dragged) = &self.dragged {
			if !nodes.iter().any(|n| &n.key == dragged) {
				self.dragged = None;
			}
		}

		// Known nodes hold their place; only newcomers are spread out.
		let mut seeds: Vec<(f64, f64, bool)> = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| match self.positions.get(&node.key) {
				Some(p) => (p.x, p.y, true),
				None => {
					let at = node
						.hint
						.unwrap_or_else(|| self.ring_position(i, nodes.len()));
					(at.x, at.y, self.is_anchored(&node.key))
				}
			})
			.collect();
		for _ in 0..SEPARATION_PASSES {
			if !separate(&mut seeds, 2.0 * self.node_radius) {
				break;
			}
		}

		let mut graph = simulation();
		let mut indices = HashMap::with_capacity(nodes.len());
		for (node, &(x, y, _)) in nodes.iter().zip(&seeds) {
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: NODE_MASS,
				is_anchor: self.is_anchored(&node.key),
				user_data: node.key.clone(),
			});
			indices.insert(node.key.clone(), idx);
		}

		self.graph = graph;
		self.indices = indices;
		self.links.clear();
		self.refresh_positions();
	}

	fn set_links(&mut self, links: &[LinkKey]) {
		for link in links {
			if let (Some(&src), Some(&tgt)) =
				(self.indices.get(&link.source), self.indices.get(&link.target))
			{
				self.graph.add_edge(src, tgt, EdgeData::default());
				self.links.push((src, tgt));
			}
		}
	}

	fn start(&mut self) {
		self.alpha = 1.0;
	}

	fn advance(&mut self, dt: f64) -> Option<LayoutTick> {
		if !self.is_running() {
			return None;
		}
		self.graph.update(dt as f32);
		self.relax_links();
		self.avoid_overlaps();
		self.refresh_positions();
		self.alpha *= ALPHA_DECAY;
		Some(LayoutTick { alpha: self.alpha })
	}

	fn is_running(&self) -> bool {
		self.alpha >= ALPHA_MIN
	}

	fn position(&self, key: &str) -> Option<Point> {
		self.positions.get(key).copied()
	}

	fn set_fixed(&mut self, key: &str, fixed: bool) {
		if fixed {
			self.fixed.insert(key.to_string());
		} else {
			self.fixed.remove(key);
		}
		self.set_anchor(key);
	}

	fn drag_start(&mut self, key: &str) {
		self.dragged = Some(key.to_string());
		self.set_anchor(key);
	}

	fn drag_by(&mut self, key: &str, delta: Point) {
		let (dx, dy) = (delta.x as f32, delta.y as f32);
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data == key {
				node.data.x += dx;
				node.data.y += dy;
			}
		});
		self.refresh_positions();
		self.alpha = self.alpha.max(DRAG_ALPHA);
	}

	fn drag_end(&mut self, key: &str) {
		if self.dragged.as_deref() == Some(key) {
			self.dragged = None;
		}
		self.set_anchor(key);
	}
}
