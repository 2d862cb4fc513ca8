//! Browser-independent core of the graph view.
//!
//! [`GraphView`] owns the scene, the layout adapter, the selection and the
//! view transform, and exposes everything the host needs as plain method
//! calls: model updates, per-frame advancement and pointer input. The Leptos
//! component forwards DOM events here and renders the resulting scene.

use log::{debug, trace, warn};

use super::config::ViewConfig;
use super::error::ViewError;
use super::gesture::{
	BrushRect, GestureCoordinator, GestureEffect, Modifiers, PointerButton, PressTarget,
};
use super::layout::{ForceLayout, LayoutAdapter, LayoutNode};
use super::scene::{Reconciliation, Scene};
use super::schedule::RenderScheduler;
use super::selection::{SelectionEvent, SelectionStore};
use super::state::{Point, ViewStateTable, ViewTransform};
use super::style::{self, NodeStyle};
use super::sync;
use super::types::{GraphData, NodeKey};

/// The graph view: scene, layout, selection and view transform behind one
/// owner. Generic over the layout so tests can substitute a static one.
pub struct GraphView<L: LayoutAdapter = ForceLayout> {
	config: ViewConfig,
	width: f64,
	height: f64,
	model: GraphData,
	scheduler: RenderScheduler,
	scene: Scene,
	layout: L,
	selection: SelectionStore,
	node_state: ViewStateTable,
	transform: ViewTransform,
	gestures: GestureCoordinator,
	brush: Option<BrushRect>,
	release_at: Option<f64>,
	/// Something visible changed outside of transitions and layout ticks.
	repaint: bool,
}

impl GraphView<ForceLayout> {
	/// View backed by the default `force_graph` layout.
	pub fn new(config: ViewConfig, width: f64, height: f64) -> Result<Self, ViewError> {
		Self::with_layout(config, ForceLayout::new(), width, height)
	}
}

impl<L: LayoutAdapter> GraphView<L> {
	/// Validates `config` and the canvas size, then configures `layout`.
	pub fn with_layout(
		config: ViewConfig,
		mut layout: L,
		width: f64,
		height: f64,
	) -> Result<Self, ViewError> {
		config.validate()?;
		if !(width > 0.0 && height > 0.0) {
			return Err(ViewError::CanvasSize { width, height });
		}
		layout.configure(config.link_distance, config.node_radius, (width, height));

		Ok(Self {
			scheduler: RenderScheduler::new(config.debounce_ms),
			gestures: GestureCoordinator::new(config.zoom_sensitivity),
			config,
			width,
			height,
			model: GraphData::default(),
			scene: Scene::new(),
			layout,
			selection: SelectionStore::new(),
			node_state: ViewStateTable::default(),
			transform: ViewTransform::default(),
			brush: None,
			release_at: None,
			repaint: true,
		})
	}

	/// Validated configuration the view was built with.
	pub fn config(&self) -> &ViewConfig {
		&self.config
	}

	/// Canvas size in screen pixels.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Visual elements, including ones still fading out.
	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// The layout adapter.
	pub fn layout(&self) -> &L {
		&self.layout
	}

	/// Mutable layout adapter, e.g. to tweak the simulation directly.
	pub fn layout_mut(&mut self) -> &mut L {
		&mut self.layout
	}

	/// Current selection and focus.
	pub fn selection(&self) -> &SelectionStore {
		&self.selection
	}

	/// Graph-to-screen transform set by pan and zoom.
	pub fn transform(&self) -> &ViewTransform {
		&self.transform
	}

	/// Brush selector rectangle in screen space, while one is shown.
	pub fn brush_overlay(&self) -> Option<BrushRect> {
		self.brush
	}

	/// Whether the node's `selected` flag is set.
	pub fn is_selected(&self, key: &str) -> bool {
		self.node_state.is_selected(key)
	}

	/// Whether the node is pinned while a reconciliation settles.
	pub fn is_fixed(&self, key: &str) -> bool {
		self.node_state.get(key).fixed
	}

	/// Adopts a new canvas size. Non-positive sizes are ignored.
	pub fn resize(&mut self, width: f64, height: f64) {
		if width > 0.0 && height > 0.0 {
			self.width = width;
			self.height = height;
			self.layout.configure(
				self.config.link_distance,
				self.config.node_radius,
				(width, height),
			);
			self.repaint = true;
		}
	}

	/// Records a model change. Reconciliation happens on the first frame
	/// after the debounce window closes. A model equal to the current one is
	/// not a change.
	pub fn set_model(&mut self, data: GraphData, now: f64) {
		if data == self.model {
			return;
		}
		self.model = data;
		self.scheduler.mark_dirty(now);
	}

	/// Reconciles immediately if a model change is pending.
	pub fn flush(&mut self, now: f64) {
		if self.scheduler.take_pending() {
			self.reconcile(now);
		}
	}

	/// One animation frame: pending reconciliation, pin release, layout step,
	/// tick synchronisation and transition bookkeeping. Returns true when the
	/// scene needs painting: something is moving or input changed it.
	pub fn frame(&mut self, now: f64) -> bool {
		if self.scheduler.take_due(now) {
			self.reconcile(now);
		}
		if self.release_at.is_some_and(|at| now >= at) {
			self.release_at = None;
			for key in self.node_state.release_fixed() {
				self.layout.set_fixed(&key, false);
			}
		}
		if let Some(tick) = self.layout.advance(self.config.layout_step) {
			trace!("layout tick, alpha {:.3}", tick.alpha);
			sync::synchronize(&mut self.scene, &self.layout);
		}
		let animating = self.scene.advance(now);
		let repaint = std::mem::take(&mut self.repaint);
		animating || repaint || self.layout.is_running() || self.scheduler.is_dirty()
	}

	/// Diffs the current model against the scene and resubmits the full node
	/// and link sets to the layout.
	pub fn reconcile(&mut self, now: f64) -> Reconciliation {
		self.repaint = true;
		let entering = NodeStyle::plain(&self.config.theme.palette);
		let plan = self
			.scene
			.reconcile(&self.model, now, &self.config, entering);

		for link in &plan.dangling {
			warn!("skipping link {link}: endpoint not in model");
		}
		for key in &plan.updated {
			self.node_state.entry(key).fixed = true;
		}
		for key in &plan.entered {
			self.node_state.entry(key);
		}
		for key in &plan.exited {
			self.selection.remove(key);
			self.node_state.remove(key);
		}

		let hints = |key: &NodeKey| {
			self.model
				.nodes
				.iter()
				.rev()
				.find(|n| &n.key == key)
				.and_then(|n| n.x.zip(n.y))
				.map(|(x, y)| Point::new(x, y))
		};
		let layout_nodes: Vec<LayoutNode> = plan
			.nodes
			.iter()
			.map(|key| LayoutNode {
				key: key.clone(),
				hint: hints(key),
				fixed: self.node_state.get(key).fixed,
			})
			.collect();
		self.layout.set_nodes(&layout_nodes);
		self.layout.set_links(&plan.links);
		self.layout.start();
		sync::synchronize(&mut self.scene, &self.layout);

		self.restyle_nodes();
		self.release_at = Some(now + self.config.release_delay());

		debug!(
			"reconciled: {} entered, {} updated, {} exited; links +{} -{}",
			plan.entered.len(),
			plan.updated.len(),
			plan.exited.len(),
			plan.links_entered,
			plan.links_exited
		);
		plan
	}

	/// Reapplies fill and stroke to every bound node.
	fn restyle_nodes(&mut self) {
		self.repaint = true;
		let palette = &self.config.theme.palette;
		let focused = self.selection.focused();
		for node in self.scene.nodes_mut().filter(|n| n.is_bound()) {
			let selected = self.node_state.is_selected(&node.key);
			node.style = style::resolve(&node.key, node.root, selected, focused, palette);
		}
	}

	fn clear_selection(&mut self) {
		self.node_state.clear_selected();
		self.selection.clear();
	}

	fn set_selected(&mut self, key: &str, selected: bool) {
		self.node_state.entry(key).selected = selected;
		if selected {
			self.selection.add(key);
		} else {
			self.selection.remove(key);
		}
	}

	/// Moves focus to `key`, selecting it. No-op for keys that are not bound.
	pub fn focus(&mut self, key: &str) {
		if self.scene.node(key).is_none_or(|n| !n.is_bound()) {
			return;
		}
		self.set_selected(key, true);
		self.selection.focus_key(key);
		self.restyle_nodes();
	}

	/// Selection semantics of a click on a bound node.
	pub fn click_node(&mut self, key: &str, modifiers: Modifiers) {
		if self.scene.node(key).is_none_or(|n| !n.is_bound()) {
			return;
		}
		let selected = if modifiers.shift {
			!self.node_state.is_selected(key)
		} else if modifiers.ctrl {
			self.selection.add(key);
			self.selection.focus_key(key);
			true
		} else {
			self.clear_selection();
			true
		};
		self.set_selected(key, selected);
		self.restyle_nodes();
	}

	/// Selects every bound node strictly inside the screen-space `rect`.
	fn select_within(&mut self, rect: BrushRect) {
		let (a, b) = rect.corners();
		let graph_rect =
			BrushRect::spanning(self.transform.to_graph(a), self.transform.to_graph(b));
		let inside: Vec<NodeKey> = self
			.scene
			.bound_nodes()
			.filter_map(|n| {
				let p = self.layout.position(&n.key)?;
				graph_rect.contains_strictly(p).then(|| n.key.clone())
			})
			.collect();
		debug!("brush selected {} nodes", inside.len());
		for key in &inside {
			self.set_selected(key, true);
		}
		self.restyle_nodes();
	}

	/// Press at the screen point `at`; starts whichever gesture the target and
	/// button select.
	pub fn pointer_down(&mut self, at: Point, button: PointerButton, modifiers: Modifiers, now: f64) {
		let target = match self.scene.node_at(self.transform.to_graph(at), now) {
			Some(node) => PressTarget::Node(node.key.clone()),
			None => PressTarget::Surface,
		};
		if let Some(effect) = self.gestures.press(target, button, modifiers, at) {
			self.apply(effect);
		}
	}

	/// Pointer moved to the screen point `at`.
	pub fn pointer_move(&mut self, at: Point) {
		if let Some(effect) = self.gestures.motion(at) {
			self.apply(effect);
		}
	}

	/// Ends the active gesture. Idempotent.
	pub fn pointer_up(&mut self, modifiers: Modifiers) {
		for effect in self.gestures.release(modifiers) {
			self.apply(effect);
		}
	}

	/// Wheel zoom anchored at the pointer.
	pub fn wheel(&mut self, at: Point, delta_y: f64) {
		let step = self.config.wheel_zoom_step;
		let factor = if delta_y > 0.0 { 1.0 / step } else { step };
		self.transform
			.zoom(factor, at, self.config.min_scale, self.config.max_scale);
		self.repaint = true;
	}

	fn apply(&mut self, effect: GestureEffect) {
		self.repaint = true;
		match effect {
			GestureEffect::BrushStart { additive } => {
				if !additive {
					self.clear_selection();
					self.restyle_nodes();
				}
			}
			GestureEffect::BrushResize(rect) => self.brush = Some(rect),
			GestureEffect::BrushEnd { rect, overlay } => {
				if overlay {
					self.brush = None;
				}
				self.select_within(rect);
			}
			GestureEffect::Pan { dx, dy } => self.transform.pan(dx, dy),
			GestureEffect::Zoom { factor, anchor } => self.transform.zoom(
				factor,
				anchor,
				self.config.min_scale,
				self.config.max_scale,
			),
			GestureEffect::DragStart(key) => {
				debug!("drag start {key}");
				self.layout.drag_start(&key);
			}
			GestureEffect::DragMove { key, dx, dy } => {
				let delta = Point::new(dx / self.transform.scale_x, dy / self.transform.scale_y);
				self.layout.drag_by(&key, delta);
				sync::synchronize(&mut self.scene, &self.layout);
			}
			GestureEffect::DragEnd(key) => self.layout.drag_end(&key),
			GestureEffect::Click { key, modifiers } => self.click_node(&key, modifiers),
		}
	}

	/// Selection notifications since the last call.
	pub fn take_selection_events(&mut self) -> Vec<SelectionEvent> {
		self.selection.drain_events()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::{HashMap, HashSet};

	use super::*;
	use crate::components::graph_view::gesture::Gesture;
	use crate::components::graph_view::layout::LayoutTick;
	use crate::components::graph_view::types::{GraphLink, GraphNode, LinkKey};

	/// Layout double: nodes sit where they are put and tick only on demand.
	#[derive(Default)]
	struct StaticLayout {
		positions: HashMap<NodeKey, Point>,
		fixed: HashSet<NodeKey>,
		dragged: Option<NodeKey>,
		links: Vec<LinkKey>,
		starts: usize,
		pending_tick: bool,
	}

	impl StaticLayout {
		fn place(&mut self, key: &str, p: Point) {
			self.positions.insert(key.into(), p);
			self.pending_tick = true;
		}
	}

	impl LayoutAdapter for StaticLayout {
		fn configure(&mut self, _link_distance: f64, _node_radius: f64, _size: (f64, f64)) {}

		fn set_nodes(&mut self, nodes: &[LayoutNode]) {
			let mut next = HashMap::new();
			for n in nodes {
				let p = self
					.positions
					.get(&n.key)
					.copied()
					.or(n.hint)
					.unwrap_or_default();
				next.insert(n.key.clone(), p);
			}
			self.positions = next;
			self.fixed = nodes
				.iter()
				.filter(|n| n.fixed)
				.map(|n| n.key.clone())
				.collect();
		}

		fn set_links(&mut self, links: &[LinkKey]) {
			self.links = links.to_vec();
		}

		fn start(&mut self) {
			self.starts += 1;
		}

		fn advance(&mut self, _dt: f64) -> Option<LayoutTick> {
			std::mem::take(&mut self.pending_tick).then_some(LayoutTick { alpha: 1.0 })
		}

		fn is_running(&self) -> bool {
			self.pending_tick
		}

		fn position(&self, key: &str) -> Option<Point> {
			self.positions.get(key).copied()
		}

		fn set_fixed(&mut self, key: &str, fixed: bool) {
			if fixed {
				self.fixed.insert(key.into());
			} else {
				self.fixed.remove(key);
			}
		}

		fn drag_start(&mut self, key: &str) {
			self.dragged = Some(key.into());
		}

		fn drag_by(&mut self, key: &str, delta: Point) {
			if let Some(p) = self.positions.get_mut(key) {
				p.x += delta.x;
				p.y += delta.y;
			}
		}

		fn drag_end(&mut self, _key: &str) {
			self.dragged = None;
		}
	}

	const SETTLED: f64 = 10_000.0;

	fn view() -> GraphView<StaticLayout> {
		GraphView::with_layout(ViewConfig::default(), StaticLayout::default(), 800.0, 600.0)
			.unwrap()
	}

	fn graph(nodes: &[(&str, f64, f64)], links: &[(&str, &str)]) -> GraphData {
		GraphData {
			nodes: nodes
				.iter()
				.map(|&(k, x, y)| GraphNode::new(k).at(x, y))
				.collect(),
			links: links.iter().map(|&(a, b)| GraphLink::new(a, b)).collect(),
		}
	}

	/// View showing `data`, with all enter transitions finished.
	fn settled(data: GraphData) -> GraphView<StaticLayout> {
		let mut v = view();
		v.set_model(data, 0.0);
		v.flush(0.0);
		v.frame(SETTLED);
		v
	}

	fn rendered_keys(v: &GraphView<StaticLayout>) -> Vec<&str> {
		v.scene().nodes().iter().map(|n| n.key.as_str()).collect()
	}

	fn selection(v: &GraphView<StaticLayout>) -> Vec<&str> {
		v.selection().items().iter().map(String::as_str).collect()
	}

	fn click(v: &mut GraphView<StaticLayout>, at: (f64, f64), modifiers: Modifiers) {
		v.pointer_down(Point::new(at.0, at.1), PointerButton::Left, modifiers, SETTLED);
		v.pointer_up(modifiers);
	}

	#[test]
	fn rejects_bad_construction() {
		let err = GraphView::with_layout(ViewConfig::default(), StaticLayout::default(), 0.0, 10.0);
		assert!(matches!(err, Err(ViewError::CanvasSize { .. })));
		let config = ViewConfig {
			transition_ms: -1.0,
			..ViewConfig::default()
		};
		let err = GraphView::with_layout(config, StaticLayout::default(), 10.0, 10.0);
		assert!(matches!(err, Err(ViewError::Config(_))));
	}

	#[test]
	fn model_bursts_are_debounced() {
		let mut v = view();
		v.set_model(graph(&[("a", 0.0, 0.0)], &[]), 0.0);
		v.frame(50.0);
		v.set_model(graph(&[("a", 0.0, 0.0), ("b", 1.0, 1.0)], &[]), 60.0);
		v.frame(120.0);
		assert!(v.scene().nodes().is_empty());
		v.frame(160.0);
		assert_eq!(rendered_keys(&v), ["a", "b"]);
		assert_eq!(v.layout().starts, 1);
	}

	#[test]
	fn removed_node_element_is_gone_after_exit_transition() {
		let mut v = settled(graph(&[("a", 0.0, 0.0), ("b", 5.0, 5.0)], &[("a", "b")]));
		v.set_model(graph(&[("a", 0.0, 0.0)], &[]), SETTLED);
		v.frame(SETTLED + 100.0);
		assert_eq!(rendered_keys(&v), ["a", "b"]);
		v.frame(SETTLED + 100.0 + 500.0);
		assert_eq!(rendered_keys(&v), ["a"]);
		assert!(v.scene().links().is_empty());
	}

	#[test]
	fn identical_model_is_not_reconciled_again() {
		let data = graph(&[("a", 0.0, 0.0), ("b", 50.0, 50.0)], &[("a", "b")]);
		let mut v = settled(data.clone());
		v.set_model(data, SETTLED);
		assert!(!v.frame(SETTLED + 200.0));
		assert!(!v.is_fixed("a"));
		assert!(v.layout().fixed.is_empty());
		assert_eq!(v.layout().starts, 1);
	}

	#[test]
	fn input_is_painted_once_on_the_next_frame() {
		let mut v = settled(graph(&[("a", 10.0, 10.0)], &[]));
		assert!(!v.frame(SETTLED + 1.0));
		v.pointer_down(Point::new(100.0, 100.0), PointerButton::Left, Modifiers::NONE, SETTLED);
		v.pointer_move(Point::new(150.0, 150.0));
		assert!(v.frame(SETTLED + 2.0));
		assert!(!v.frame(SETTLED + 3.0));
		// Released outside the canvas: the overlay must still be cleared.
		v.pointer_up(Modifiers::NONE);
		assert!(v.brush_overlay().is_none());
		assert!(v.frame(SETTLED + 4.0));
		assert!(!v.frame(SETTLED + 5.0));
		v.wheel(Point::new(0.0, 0.0), -1.0);
		assert!(v.frame(SETTLED + 6.0));
	}

	#[test]
	fn removed_node_leaves_the_selection() {
		let mut v = settled(graph(&[("a", 0.0, 0.0), ("b", 100.0, 100.0)], &[]));
		click(&mut v, (100.0, 100.0), Modifiers::CTRL);
		assert_eq!(selection(&v), ["b"]);
		assert_eq!(v.selection().focused(), Some("b"));

		v.set_model(graph(&[("a", 0.0, 0.0)], &[]), SETTLED);
		v.flush(SETTLED);
		assert!(selection(&v).is_empty());
		assert_eq!(v.selection().focused(), None);
		assert!(!v.is_selected("b"));
	}

	#[test]
	fn plain_click_selects_only_the_clicked_node() {
		let mut v = settled(graph(&[("a", 10.0, 10.0), ("b", 100.0, 100.0)], &[]));
		click(&mut v, (100.0, 100.0), Modifiers::NONE);
		click(&mut v, (10.0, 10.0), Modifiers::NONE);
		assert_eq!(selection(&v), ["a"]);
		click(&mut v, (10.0, 10.0), Modifiers::NONE);
		assert_eq!(selection(&v), ["a"]);
		assert!(v.is_selected("a"));
		assert!(!v.is_selected("b"));
		assert_eq!(v.scene().node("a").unwrap().style.stroke_width, 2.0);
		assert_eq!(v.scene().node("b").unwrap().style.stroke_width, 0.0);
	}

	#[test]
	fn shift_click_toggles_membership() {
		let mut v = settled(graph(&[("a", 10.0, 10.0)], &[]));
		click(&mut v, (10.0, 10.0), Modifiers::SHIFT);
		assert_eq!(selection(&v), ["a"]);
		click(&mut v, (10.0, 10.0), Modifiers::SHIFT);
		assert!(selection(&v).is_empty());
		assert!(!v.is_selected("a"));
	}

	#[test]
	fn ctrl_click_always_focuses() {
		let mut v = settled(graph(&[("a", 10.0, 10.0), ("b", 100.0, 100.0)], &[]));
		click(&mut v, (10.0, 10.0), Modifiers::NONE);
		click(&mut v, (100.0, 100.0), Modifiers::CTRL);
		assert_eq!(selection(&v), ["a", "b"]);
		assert_eq!(v.selection().focused(), Some("b"));
		let palette = &v.config().theme.palette;
		assert_eq!(v.scene().node("b").unwrap().style.fill, palette.focused);
		assert_eq!(v.scene().node("a").unwrap().style.fill, palette.plain);

		click(&mut v, (10.0, 10.0), Modifiers::CTRL);
		assert_eq!(v.selection().focused(), Some("a"));
		assert_eq!(selection(&v), ["a", "b"]);
	}

	#[test]
	fn click_after_drag_is_suppressed() {
		let mut v = settled(graph(&[("a", 10.0, 10.0)], &[]));
		v.pointer_down(Point::new(10.0, 10.0), PointerButton::Left, Modifiers::NONE, SETTLED);
		assert_eq!(v.layout().dragged.as_deref(), Some("a"));
		v.pointer_move(Point::new(30.0, 10.0));
		v.pointer_up(Modifiers::NONE);
		assert!(selection(&v).is_empty());
		assert_eq!(v.layout().dragged, None);
		assert_eq!(v.layout().position("a"), Some(Point::new(30.0, 10.0)));
		assert_eq!(v.scene().node("a").unwrap().center, Point::new(30.0, 10.0));
	}

	#[test]
	fn drag_delta_is_scaled_into_graph_space() {
		let mut v = settled(graph(&[("a", 10.0, 10.0)], &[]));
		v.transform.zoom(2.0, Point::new(0.0, 0.0), 0.1, 10.0);
		v.pointer_down(Point::new(20.0, 20.0), PointerButton::Left, Modifiers::NONE, SETTLED);
		v.pointer_move(Point::new(40.0, 20.0));
		v.pointer_up(Modifiers::NONE);
		assert_eq!(v.layout().position("a"), Some(Point::new(20.0, 10.0)));
	}

	#[test]
	fn brush_selects_nodes_strictly_inside() {
		let mut v = settled(graph(&[("a", 10.0, 10.0), ("b", 100.0, 100.0)], &[]));
		v.pointer_down(Point::new(0.0, 0.0), PointerButton::Left, Modifiers::NONE, SETTLED);
		v.pointer_move(Point::new(50.0, 50.0));
		assert!(v.brush_overlay().is_some());
		v.pointer_up(Modifiers::NONE);
		assert_eq!(selection(&v), ["a"]);
		assert!(v.brush_overlay().is_none());
	}

	#[test]
	fn brush_clears_previous_selection_unless_shift() {
		let mut v = settled(graph(&[("a", 10.0, 10.0), ("b", 100.0, 100.0)], &[]));
		click(&mut v, (100.0, 100.0), Modifiers::NONE);

		v.pointer_down(Point::new(0.0, 0.0), PointerButton::Left, Modifiers::SHIFT, SETTLED);
		v.pointer_move(Point::new(50.0, 50.0));
		v.pointer_up(Modifiers::NONE);
		assert_eq!(selection(&v), ["b", "a"]);

		v.pointer_down(Point::new(60.0, 60.0), PointerButton::Left, Modifiers::NONE, SETTLED);
		assert!(selection(&v).is_empty());
		v.pointer_move(Point::new(200.0, 200.0));
		v.pointer_up(Modifiers::NONE);
		assert_eq!(selection(&v), ["b"]);
		assert!(!v.is_selected("a"));
	}

	#[test]
	fn brush_respects_pan_and_zoom() {
		let mut v = settled(graph(&[("a", 10.0, 10.0)], &[]));
		v.pointer_down(Point::new(0.0, 0.0), PointerButton::Middle, Modifiers::NONE, SETTLED);
		v.pointer_move(Point::new(100.0, 100.0));
		v.pointer_up(Modifiers::NONE);
		// a is drawn at (110, 110) now.
		v.pointer_down(Point::new(0.0, 0.0), PointerButton::Left, Modifiers::NONE, SETTLED);
		v.pointer_move(Point::new(50.0, 50.0));
		v.pointer_up(Modifiers::NONE);
		assert!(selection(&v).is_empty());
		v.pointer_down(Point::new(100.0, 100.0), PointerButton::Left, Modifiers::NONE, SETTLED);
		v.pointer_move(Point::new(120.0, 120.0));
		v.pointer_up(Modifiers::NONE);
		assert_eq!(selection(&v), ["a"]);
	}

	#[test]
	fn links_track_live_node_positions() {
		let mut v = settled(
			graph(&[("a", 0.0, 0.0), ("b", 50.0, 0.0), ("c", 0.0, 50.0)], &[("a", "b"), ("c", "a")]),
		);
		v.layout_mut().place("a", Point::new(7.0, 9.0));
		v.frame(SETTLED + 16.0);

		let moved = Point::new(7.0, 9.0);
		let scene = v.scene();
		assert_eq!(scene.node("a").unwrap().center, moved);
		let ab = scene.link(&GraphLink::new("a", "b").key()).unwrap();
		assert_eq!((ab.from, ab.to), (moved, Point::new(50.0, 0.0)));
		let ca = scene.link(&GraphLink::new("c", "a").key()).unwrap();
		assert_eq!(ca.to, moved);
	}

	#[test]
	fn pan_and_zoom_gestures_update_the_transform() {
		let mut v = settled(graph(&[("a", 10.0, 10.0)], &[]));
		v.pointer_down(Point::new(300.0, 300.0), PointerButton::Middle, Modifiers::NONE, SETTLED);
		v.pointer_move(Point::new(320.0, 310.0));
		v.pointer_up(Modifiers::NONE);
		assert_eq!(v.transform().matrix(), [1.0, 0.0, 0.0, 1.0, 20.0, 10.0]);

		let node_screen = v.transform().to_screen(Point::new(10.0, 10.0));
		// Right presses on a node are swallowed, so zoom from empty surface.
		let anchor = Point::new(node_screen.x + 50.0, node_screen.y);
		let anchored_graph = v.transform().to_graph(anchor);
		v.pointer_down(anchor, PointerButton::Right, Modifiers::NONE, SETTLED);
		v.pointer_move(Point::new(anchor.x, anchor.y - 25.0));
		v.pointer_up(Modifiers::NONE);
		assert_eq!(v.transform().scale_x, 1.25);
		let back = v.transform().to_screen(anchored_graph);
		assert!(back.distance(anchor) < 1e-9);
		assert!(v.gestures.is_idle());
	}

	#[test]
	fn presses_on_nodes_with_other_buttons_are_swallowed() {
		let mut v = settled(graph(&[("a", 10.0, 10.0)], &[]));
		v.pointer_down(Point::new(10.0, 10.0), PointerButton::Middle, Modifiers::NONE, SETTLED);
		assert_eq!(v.gestures.gesture(), &Gesture::Idle);
		v.pointer_move(Point::new(50.0, 50.0));
		assert_eq!(*v.transform(), ViewTransform::default());
	}

	#[test]
	fn transform_survives_reconciliation() {
		let mut v = settled(graph(&[("a", 10.0, 10.0)], &[]));
		v.wheel(Point::new(0.0, 0.0), -1.0);
		let before = *v.transform();
		v.set_model(graph(&[("b", 1.0, 1.0)], &[]), SETTLED);
		v.flush(SETTLED);
		assert_eq!(*v.transform(), before);
		assert!((before.scale_x - 1.1).abs() < 1e-12);
	}

	#[test]
	fn updated_nodes_are_pinned_until_transitions_finish() {
		let mut v = settled(graph(&[("a", 0.0, 0.0)], &[]));
		v.set_model(graph(&[("a", 0.0, 0.0), ("b", 1.0, 1.0)], &[]), SETTLED);
		v.flush(SETTLED);
		assert!(v.is_fixed("a"));
		assert!(!v.is_fixed("b"));
		assert!(v.layout().fixed.contains("a"));
		v.frame(SETTLED + 504.0);
		assert!(v.is_fixed("a"));
		v.frame(SETTLED + 505.0);
		assert!(!v.is_fixed("a"));
		assert!(v.layout().fixed.is_empty());
	}

	#[test]
	fn focus_survives_reconciliation_styles() {
		let mut v = settled(graph(&[("a", 10.0, 10.0)], &[]));
		v.focus("a");
		v.set_model(graph(&[("a", 10.0, 10.0), ("b", 1.0, 1.0)], &[]), SETTLED);
		v.flush(SETTLED);
		let palette = &v.config().theme.palette;
		assert_eq!(v.scene().node("a").unwrap().style.fill, palette.focused);
		assert_eq!(v.scene().node("a").unwrap().style.stroke_width, 2.0);
		assert_eq!(v.scene().node("b").unwrap().style.fill, palette.plain);
		assert!(
			v.take_selection_events()
				.contains(&SelectionEvent::Focused(Some("a".into())))
		);
	}

	#[test]
	fn root_nodes_use_the_root_fill() {
		let mut data = graph(&[], &[]);
		data.nodes.push(GraphNode::new("r").root());
		let v = settled(data);
		assert_eq!(
			v.scene().node("r").unwrap().style.fill,
			v.config().theme.palette.root
		);
	}

	#[test]
	fn selection_is_always_a_subset_of_rendered_nodes() {
		let mut v = settled(graph(&[("a", 10.0, 10.0), ("b", 20.0, 20.0)], &[]));
		v.pointer_down(Point::new(0.0, 0.0), PointerButton::Left, Modifiers::NONE, SETTLED);
		v.pointer_move(Point::new(50.0, 50.0));
		v.pointer_up(Modifiers::NONE);
		v.set_model(graph(&[("b", 20.0, 20.0)], &[]), SETTLED);
		v.flush(SETTLED);
		for key in v.selection().items() {
			assert!(v.scene().node(key).is_some_and(|n| n.is_bound()));
		}
		assert_eq!(selection(&v), ["b"]);
	}
}
