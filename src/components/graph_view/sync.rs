//! Copies layout positions onto bound visual elements after each tick.

use super::layout::LayoutAdapter;
use super::scene::Scene;

/// Moves every bound node to its layout position and recomputes each bound
/// link's endpoints from its endpoints' live positions. Exiting elements keep
/// their last position while they fade.
pub fn synchronize<L: LayoutAdapter + ?Sized>(scene: &mut Scene, layout: &L) {
	for node in scene.nodes_mut().filter(|n| n.is_bound()) {
		if let Some(p) = layout.position(&node.key) {
			node.center = p;
		}
	}
	for link in scene.links_mut().filter(|l| l.is_bound()) {
		if let (Some(from), Some(to)) = (
			layout.position(&link.key.source),
			layout.position(&link.key.target),
		) {
			link.from = from;
			link.to = to;
		}
	}
}
