//! Keyed reconciliation of the graph model onto visual elements.
//!
//! Nodes bind by key and links by their ordered `(source, target)` pair. A
//! pass splits entities into enter / update / exit: entering elements grow in
//! from zero, exiting ones fade out and are dropped once their transition
//! completes. An exiting element whose key comes back is revived in place.

use std::collections::{HashMap, HashSet};

use super::config::ViewConfig;
use super::state::Point;
use super::style::NodeStyle;
use super::transition::Tween;
use super::types::{GraphData, GraphNode, LinkKey, NodeKey};

/// Lifecycle of a visual element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Bound, still animating in.
	Entering,
	/// Steady state; position follows layout ticks.
	Present,
	/// Unbound, animating out.
	Exiting,
}

/// Rendered circle bound to one model node.
#[derive(Clone, Debug)]
pub struct NodeElement {
	/// Model key this element is bound to.
	pub key: NodeKey,
	/// Copied from the model node.
	pub root: bool,
	/// Graph-space position from the latest layout tick.
	pub center: Point,
	/// Grows from zero on enter, shrinks to zero on exit.
	pub radius: Tween,
	/// Fades in on enter and out on exit.
	pub opacity: Tween,
	/// Current fill and stroke.
	pub style: NodeStyle,
	/// Where the element is in its lifecycle.
	pub phase: Phase,
}

impl NodeElement {
	/// False once the element is exiting.
	pub fn is_bound(&self) -> bool {
		self.phase != Phase::Exiting
	}
}

/// Rendered line bound to one model link.
#[derive(Clone, Debug)]
pub struct LinkElement {
	/// Ordered endpoint pair.
	pub key: LinkKey,
	/// Source endpoint in graph space.
	pub from: Point,
	/// Target endpoint in graph space.
	pub to: Point,
	/// Stroke width; animates like a node's radius.
	pub width: Tween,
	/// Fades in on enter and out on exit.
	pub opacity: Tween,
	/// Where the element is in its lifecycle.
	pub phase: Phase,
}

impl LinkElement {
	/// False once the element is exiting.
	pub fn is_bound(&self) -> bool {
		self.phase != Phase::Exiting
	}
}

/// What a reconciliation pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciliation {
	/// Keys that got a fresh (or revived) element.
	pub entered: Vec<NodeKey>,
	/// Keys whose element was already bound.
	pub updated: Vec<NodeKey>,
	/// Keys whose element started exiting.
	pub exited: Vec<NodeKey>,
	/// Links that got a fresh element.
	pub links_entered: usize,
	/// Links whose element started exiting.
	pub links_exited: usize,
	/// Links naming a node key the model does not contain.
	pub dangling: Vec<LinkKey>,
	/// Bound node keys in model order.
	pub nodes: Vec<NodeKey>,
	/// Bound links in model order.
	pub links: Vec<LinkKey>,
}

/// All live visual elements, in binding order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	nodes: Vec<NodeElement>,
	links: Vec<LinkElement>,
}

/// Model nodes deduplicated by key. The last occurrence supplies the data,
/// the first fixes the order.
fn unique_nodes(data: &GraphData) -> Vec<&GraphNode> {
	let mut latest: HashMap<&str, &GraphNode> = HashMap::new();
	for node in &data.nodes {
		latest.insert(node.key.as_str(), node);
	}
	let mut seen = HashSet::new();
	data.nodes
		.iter()
		.filter(|n| seen.insert(n.key.as_str()))
		.filter_map(|n| latest.get(n.key.as_str()).copied())
		.collect()
}

impl Scene {
	/// Empty scene.
	pub fn new() -> Self {
		Self::default()
	}

	/// Node elements, exiting ones included.
	pub fn nodes(&self) -> &[NodeElement] {
		&self.nodes
	}

	/// Link elements, exiting ones included.
	pub fn links(&self) -> &[LinkElement] {
		&self.links
	}

	/// Node elements for in-place updates such as tick positions.
	pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut NodeElement> {
		self.nodes.iter_mut()
	}

	pub fn links_mut(&mut self) -> impl Iterator<Item = &mut LinkElement> {
		self.links.iter_mut()
	}

	/// Element for a node key.
	pub fn node(&self, key: &str) -> Option<&NodeElement> {
		self.nodes.iter().find(|n| n.key == key)
	}

	/// Element for a link key.
	pub fn link(&self, key: &LinkKey) -> Option<&LinkElement> {
		self.links.iter().find(|l| &l.key == key)
	}

	/// Node elements that are not exiting.
	pub fn bound_nodes(&self) -> impl Iterator<Item = &NodeElement> {
		self.nodes.iter().filter(|n| n.is_bound())
	}

	/// Diffs `data` against the current elements and schedules transitions
	/// starting at `now`.
	pub fn reconcile(
		&mut self,
		data: &GraphData,
		now: f64,
		config: &ViewConfig,
		entering_style: NodeStyle,
	) -> Reconciliation {
		let duration = config.transition_ms;
		let mut report = Reconciliation::default();

		let wanted = unique_nodes(data);
		let wanted_keys: HashSet<&str> = wanted.iter().map(|n| n.key.as_str()).collect();
		let existing: HashMap<NodeKey, usize> = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.key.clone(), i))
			.collect();

		for node in &wanted {
			match existing.get(&node.key) {
				Some(&i) => {
					let element = &mut self.nodes[i];
					element.root = node.root;
					if element.is_bound() {
						report.updated.push(node.key.clone());
					} else {
						element.phase = Phase::Entering;
						element.radius.retarget(now, config.node_radius, duration);
						element.opacity.retarget(now, 1.0, duration);
						report.entered.push(node.key.clone());
					}
				}
				None => {
					self.nodes.push(NodeElement {
						key: node.key.clone(),
						root: node.root,
						center: Point::new(node.x.unwrap_or(0.0), node.y.unwrap_or(0.0)),
						radius: Tween::animate(0.0, config.node_radius, now, duration),
						opacity: Tween::settled(1.0),
						style: entering_style,
						phase: Phase::Entering,
					});
					report.entered.push(node.key.clone());
				}
			}
			report.nodes.push(node.key.clone());
		}

		for element in &mut self.nodes {
			if element.is_bound() && !wanted_keys.contains(element.key.as_str()) {
				element.phase = Phase::Exiting;
				element.radius.retarget(now, 0.0, duration);
				element.opacity.retarget(now, 0.0, duration);
				report.exited.push(element.key.clone());
			}
		}

		let mut wanted_links: Vec<LinkKey> = Vec::new();
		let mut seen_links = HashSet::new();
		for link in &data.links {
			let key = link.key();
			if !wanted_keys.contains(key.source.as_str())
				|| !wanted_keys.contains(key.target.as_str())
			{
				report.dangling.push(key);
				continue;
			}
			if seen_links.insert(key.clone()) {
				wanted_links.push(key);
			}
		}

		let existing_links: HashMap<LinkKey, usize> = self
			.links
			.iter()
			.enumerate()
			.map(|(i, l)| (l.key.clone(), i))
			.collect();
		for key in &wanted_links {
			match existing_links.get(key) {
				Some(&i) => {
					let element = &mut self.links[i];
					if !element.is_bound() {
						element.phase = Phase::Entering;
						element.width.retarget(now, 1.0, duration);
						element.opacity.retarget(now, 1.0, duration);
						report.links_entered += 1;
					}
				}
				None => {
					self.links.push(LinkElement {
						key: key.clone(),
						from: Point::default(),
						to: Point::default(),
						width: Tween::animate(0.0, 1.0, now, duration),
						opacity: Tween::settled(1.0),
						phase: Phase::Entering,
					});
					report.links_entered += 1;
				}
			}
		}

		let wanted_link_set: HashSet<&LinkKey> = wanted_links.iter().collect();
		for element in &mut self.links {
			if element.is_bound() && !wanted_link_set.contains(&element.key) {
				element.phase = Phase::Exiting;
				element.width.retarget(now, 0.0, duration);
				element.opacity.retarget(now, 0.0, duration);
				report.links_exited += 1;
			}
		}
		report.links = wanted_links;

		report
	}

	/// Settles finished enter transitions and drops finished exits. Returns
	/// true while any transition is still running.
	pub fn advance(&mut self, now: f64) -> bool {
		let mut animating = false;

		self.nodes.retain_mut(|n| {
			let done = n.radius.is_finished(now) && n.opacity.is_finished(now);
			match n.phase {
				Phase::Exiting if done => return false,
				Phase::Entering if done => n.phase = Phase::Present,
				_ => {}
			}
			animating |= !done;
			true
		});

		self.links.retain_mut(|l| {
			let done = l.width.is_finished(now) && l.opacity.is_finished(now);
			match l.phase {
				Phase::Exiting if done => return false,
				Phase::Entering if done => l.phase = Phase::Present,
				_ => {}
			}
			animating |= !done;
			true
		});

		animating
	}

	/// Topmost bound node whose current circle contains the graph point `p`.
	pub fn node_at(&self, p: Point, now: f64) -> Option<&NodeElement> {
		self.nodes
			.iter()
			.rev()
			.filter(|n| n.is_bound())
			.find(|n| n.center.distance(p) < n.radius.value(now))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::theme::StylePalette;
	use crate::components::graph_view::types::GraphLink;

	fn data(nodes: &[&str], links: &[(&str, &str)]) -> GraphData {
		GraphData {
			nodes: nodes.iter().map(|k| GraphNode::new(*k)).collect(),
			links: links.iter().map(|(a, b)| GraphLink::new(*a, *b)).collect(),
		}
	}

	fn pass(scene: &mut Scene, d: &GraphData, now: f64) -> Reconciliation {
		let config = ViewConfig::default();
		scene.reconcile(d, now, &config, NodeStyle::plain(&StylePalette::default()))
	}

	fn keys(scene: &Scene) -> Vec<&str> {
		scene.nodes().iter().map(|n| n.key.as_str()).collect()
	}

	#[test]
	fn enter_update_exit() {
		let mut scene = Scene::new();
		let r = pass(&mut scene, &data(&["a", "b"], &[("a", "b")]), 0.0);
		assert_eq!(r.entered, ["a", "b"]);
		assert_eq!(r.links_entered, 1);
		assert_eq!(scene.node("a").unwrap().radius.value(0.0), 0.0);

		let r = pass(&mut scene, &data(&["a", "c"], &[]), 1000.0);
		assert_eq!(r.updated, ["a"]);
		assert_eq!(r.entered, ["c"]);
		assert_eq!(r.exited, ["b"]);
		assert_eq!(r.links_exited, 1);
		assert_eq!(r.nodes, ["a", "c"]);
		assert_eq!(scene.node("b").unwrap().phase, Phase::Exiting);

		assert!(scene.advance(1200.0));
		assert_eq!(keys(&scene), ["a", "b", "c"]);
		assert!(!scene.advance(1500.0));
		assert_eq!(keys(&scene), ["a", "c"]);
		assert!(scene.links().is_empty());
		assert_eq!(scene.node("c").unwrap().phase, Phase::Present);
	}

	#[test]
	fn entering_nodes_grow_to_configured_radius() {
		let mut scene = Scene::new();
		pass(&mut scene, &data(&["a"], &[]), 0.0);
		let a = scene.node("a").unwrap();
		assert!(a.radius.value(250.0) > 0.0);
		assert_eq!(a.radius.value(500.0), ViewConfig::default().node_radius);
		assert_eq!(a.phase, Phase::Entering);
	}

	#[test]
	fn exiting_node_is_revived_when_key_returns() {
		let mut scene = Scene::new();
		pass(&mut scene, &data(&["a", "b"], &[]), 0.0);
		scene.advance(500.0);
		pass(&mut scene, &data(&["a"], &[]), 600.0);
		let r = pass(&mut scene, &data(&["a", "b"], &[]), 700.0);
		assert_eq!(r.entered, ["b"]);
		assert_eq!(scene.nodes().len(), 2);
		scene.advance(1300.0);
		let b = scene.node("b").unwrap();
		assert_eq!(b.phase, Phase::Present);
		assert_eq!(b.opacity.value(1300.0), 1.0);
	}

	#[test]
	fn duplicate_keys_bind_once_with_last_data() {
		let mut scene = Scene::new();
		let mut d = data(&["a", "b"], &[("a", "b"), ("a", "b")]);
		d.nodes.push(GraphNode::new("a").root());
		let r = pass(&mut scene, &d, 0.0);
		assert_eq!(r.nodes, ["a", "b"]);
		assert_eq!(scene.nodes().len(), 2);
		assert!(scene.node("a").unwrap().root);
		assert_eq!(scene.links().len(), 1);
	}

	#[test]
	fn reversed_link_is_a_distinct_element() {
		let mut scene = Scene::new();
		pass(&mut scene, &data(&["a", "b"], &[("a", "b"), ("b", "a")]), 0.0);
		assert_eq!(scene.links().len(), 2);
	}

	#[test]
	fn dangling_links_are_reported_not_bound() {
		let mut scene = Scene::new();
		let r = pass(&mut scene, &data(&["a"], &[("a", "ghost")]), 0.0);
		assert_eq!(r.dangling.len(), 1);
		assert!(scene.links().is_empty());
	}

	#[test]
	fn hit_test_ignores_exiting_and_uses_current_radius() {
		let mut scene = Scene::new();
		let mut d = data(&[], &[]);
		d.nodes.push(GraphNode::new("a").at(10.0, 10.0));
		pass(&mut scene, &d, 0.0);
		assert!(scene.node_at(Point::new(10.0, 10.0), 0.0).is_none());
		assert_eq!(
			scene.node_at(Point::new(14.0, 10.0), 600.0).map(|n| n.key.as_str()),
			Some("a")
		);
		pass(&mut scene, &data(&[], &[]), 700.0);
		assert!(scene.node_at(Point::new(10.0, 10.0), 700.0).is_none());
	}
}
