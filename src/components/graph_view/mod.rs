//! Interactive force-directed graph view.
//!
//! Keeps a canvas scene in step with a graph model that changes over time:
//! - Keyed enter/update/exit reconciliation with animated transitions
//! - Layout through a pluggable [`LayoutAdapter`] (default: `force_graph`)
//! - Pan, zoom, node drag and brush selection on one pointer stream
//! - Click, shift-click and ctrl-click selection with a focused node
//!
//! Everything except [`GraphCanvas`] and the renderer is independent of the
//! browser, so [`GraphView`] can be driven directly from tests.
//!
//! # Example
//!
//! ```ignore
//! use force_graph_view::{GraphCanvas, GraphData, GraphLink, GraphNode};
//!
//! let data = GraphData {
//!     nodes: vec![GraphNode::new("a").root(), GraphNode::new("b")],
//!     links: vec![GraphLink::new("a", "b")],
//! };
//!
//! view! { <GraphCanvas data=Signal::stored(data) fullscreen=true /> }
//! ```

mod component;
pub mod config;
pub mod error;
pub mod gesture;
pub mod layout;
mod render;
pub mod scene;
pub mod schedule;
pub mod selection;
pub mod state;
pub mod style;
pub mod sync;
pub mod theme;
pub mod transition;
pub mod types;
pub mod view;

pub use component::GraphCanvas;
pub use config::ViewConfig;
pub use error::{ConfigError, ViewError};
pub use layout::{ForceLayout, LayoutAdapter};
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode, NodeKey};
pub use view::GraphView;
