//! force-graph-view: interactive force-directed graph view for the browser.
//!
//! This crate provides a WASM graph visualization that keeps a canvas scene in
//! step with a changing graph model, animating additions and removals, and
//! supports pan, zoom, node dragging and brush/click selection.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::HtmlScriptElement;

pub mod components;

pub use components::graph_view::{
	ConfigError, GraphCanvas, GraphData, GraphLink, GraphNode, GraphView, Theme, ViewConfig,
	ViewError,
};

/// Window event the host page dispatches after rewriting `#graph-data`.
pub const DATA_CHANGE_EVENT: &str = "graphdatachange";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("force-graph-view: logging initialized");
}

fn script_text(id: &str) -> Option<String> {
	let document = web_sys::window()?.document()?;
	let script: HtmlScriptElement = document.get_element_by_id(id)?.dyn_into().ok()?;
	script.text().ok()
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
pub fn load_graph_data() -> Option<GraphData> {
	let json_text = script_text("graph-data")?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"force-graph-view: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("force-graph-view: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Load view configuration from a script element with id="graph-config",
/// falling back to defaults when it is absent or invalid.
pub fn load_view_config() -> ViewConfig {
	let Some(json_text) = script_text("graph-config") else {
		return ViewConfig::default();
	};
	ViewConfig::from_json(&json_text).unwrap_or_else(|e| {
		warn!("force-graph-view: ignoring graph config: {}", e);
		ViewConfig::default()
	})
}

/// Reloads `graph` from the DOM every time the page signals a data change.
fn watch_graph_data(graph: RwSignal<GraphData>) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let on_change = Closure::<dyn FnMut()>::new(move || {
		if let Some(data) = load_graph_data() {
			graph.set(data);
		}
	});
	match window
		.add_event_listener_with_callback(DATA_CHANGE_EVENT, on_change.as_ref().unchecked_ref())
	{
		// Listener lives as long as the page.
		Ok(()) => on_change.forget(),
		Err(e) => warn!("force-graph-view: graph data reloads not tracked: {e:?}"),
	}
}

/// Main application component.
/// Loads graph data and configuration from the DOM and renders the view.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph = RwSignal::new(load_graph_data().unwrap_or_default());
	watch_graph_data(graph);
	let focused = RwSignal::new(None::<String>);

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Graph View" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<GraphCanvas
				data=graph
				config=load_view_config()
				fullscreen=true
				on_focus={move |key: Option<String>| focused.set(key)}
			/>
			<div class="graph-overlay">
				<p class="subtitle">
					"Click to select, shift-click to toggle, ctrl-click to focus. "
					"Drag empty space to brush-select. Middle-drag pans, right-drag or scroll zooms."
				</p>
				<p class="focused">
					{move || focused.get().map(|key| format!("Focused: {key}"))}
				</p>
			</div>
		</div>
	}
}
