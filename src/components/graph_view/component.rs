//! Leptos component hosting the graph view on a canvas.
//!
//! The component owns a [`GraphView`] and forwards canvas mouse events to it.
//! A `requestAnimationFrame` loop advances the view (debounced reconciliation,
//! layout ticks, transitions) and repaints whenever something changed. Pointer
//! releases are also caught at document level so a gesture never outlives the
//! button that started it.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::ViewConfig;
use super::gesture::{Modifiers, PointerButton};
use super::render;
use super::selection::SelectionEvent;
use super::state::Point;
use super::types::{GraphData, NodeKey};
use super::view::GraphView;

/// Milliseconds on the same clock as `requestAnimationFrame` timestamps.
fn now() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or_else(js_sys::Date::now)
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, h))
}

/// Pointer position relative to the canvas' top-left corner.
fn surface_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn modifiers(ev: &MouseEvent) -> Modifiers {
	Modifiers {
		shift: ev.shift_key(),
		ctrl: ev.ctrl_key(),
	}
}

type Shared<T> = Rc<RefCell<Option<T>>>;

/// Interactive force-directed graph on a canvas.
///
/// The view reconciles against `data` whenever the signal changes. By default
/// the canvas sizes itself to its parent; `fullscreen` fills the viewport and
/// follows window resizes, and explicit `width`/`height` override both.
/// `on_focus` is called with the focused node key whenever focus changes.
#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: ViewConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_focus: Option<Callback<Option<NodeKey>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let view: Shared<GraphView> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut(f64)>> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let release_cb: Shared<Closure<dyn FnMut(MouseEvent)>> = Rc::new(RefCell::new(None));

	let view_init = view.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if view_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = match (fullscreen, width, height) {
			(true, _, _) => viewport_size(&window).unwrap_or((800.0, 600.0)),
			(false, w, h) => (
				w.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				h.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			),
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("graph view: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				error!("graph view: canvas has no 2d context");
				return;
			}
		};

		let mut graph_view = match GraphView::new(config.clone(), w, h) {
			Ok(v) => v,
			Err(e) => {
				error!("graph view: {e}");
				return;
			}
		};
		let started = now();
		graph_view.set_model(data.get_untracked(), started);
		graph_view.flush(started);
		*view_init.borrow_mut() = Some(graph_view);

		if let Some(document) = window.document() {
			let view_release = view_init.clone();
			*release_cb.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
				if let Some(v) = view_release.borrow_mut().as_mut() {
					v.pointer_up(modifiers(&ev));
				}
			}));
			if let Some(cb) = release_cb.borrow().as_ref() {
				if let Err(e) =
					document.add_event_listener_with_callback("mouseup", cb.as_ref().unchecked_ref())
				{
					warn!("graph view: no document mouseup fallback: {e:?}");
				}
			}
		}

		if fullscreen {
			let (view_resize, canvas_resize) = (view_init.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(v) = view_resize.borrow_mut().as_mut() {
					v.resize(nw, nh);
				}
			}));
			if let Some(cb) = resize_cb.borrow().as_ref() {
				if let Err(e) =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
				{
					warn!("graph view: window resize not tracked: {e:?}");
				}
			}
		}

		let (view_anim, animate_inner) = (view_init.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			let mut focus_changes = Vec::new();
			if let Some(v) = view_anim.borrow_mut().as_mut() {
				if v.frame(timestamp) {
					render::render(v, &ctx, timestamp);
				}
				for event in v.take_selection_events() {
					if let SelectionEvent::Focused(key) = event {
						focus_changes.push(key);
					}
				}
			}
			for key in focus_changes {
				debug!("focus changed: {key:?}");
				if let Some(cb) = on_focus {
					cb.run(key);
				}
			}
			if let Some(cb) = animate_inner.borrow().as_ref() {
				if let Some(window) = web_sys::window() {
					if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
						warn!("graph view: animation loop stopped: {e:?}");
					}
				}
			}
		}));
		if let Some(cb) = animate.borrow().as_ref() {
			if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				error!("graph view: animation loop not started: {e:?}");
			}
		}
	});

	let view_data = view.clone();
	Effect::new(move |_| {
		let model = data.get();
		if let Some(v) = view_data.borrow_mut().as_mut() {
			v.set_model(model, now());
		}
	});

	let view_md = view.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let at = surface_point(&canvas, &ev);
		if let Some(v) = view_md.borrow_mut().as_mut() {
			v.pointer_down(at, PointerButton::from_dom(ev.button()), modifiers(&ev), now());
		}
	};

	let view_mm = view.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let at = surface_point(&canvas, &ev);
		if let Some(v) = view_mm.borrow_mut().as_mut() {
			v.pointer_move(at);
		}
	};

	let view_mu = view.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some(v) = view_mu.borrow_mut().as_mut() {
			v.pointer_up(modifiers(&ev));
		}
	};

	let view_wh = view;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let at = surface_point(&canvas, &ev);
		if let Some(v) = view_wh.borrow_mut().as_mut() {
			v.wheel(at, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-view-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:wheel=on_wheel
			on:contextmenu=|ev: MouseEvent| ev.prevent_default()
			style="display: block; cursor: default;"
		/>
	}
}
