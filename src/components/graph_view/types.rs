//! Graph model structures consumed by the view.

use std::fmt;

use serde::Deserialize;

/// Unique node identifier as supplied by the graph model.
pub type NodeKey = String;

/// A node in the graph model.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphNode {
	/// Unique key. Links refer to nodes by this value.
	#[serde(alias = "id")]
	pub key: NodeKey,
	/// Semantic entry-point flag; root nodes get their own fill colour.
	#[serde(default)]
	pub root: bool,
	/// Optional initial x position for the layout.
	#[serde(default)]
	pub x: Option<f64>,
	/// Optional initial y position for the layout.
	#[serde(default)]
	pub y: Option<f64>,
}

impl GraphNode {
	/// Non-root node without a position hint.
	pub fn new(key: impl Into<NodeKey>) -> Self {
		Self {
			key: key.into(),
			..Self::default()
		}
	}

	/// Marks the node as a root.
	pub fn root(mut self) -> Self {
		self.root = true;
		self
	}

	/// Sets the initial position hint.
	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.x = Some(x);
		self.y = Some(y);
		self
	}
}

/// A directed link between two nodes, referenced by key.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphLink {
	/// Key of the node the link starts at.
	pub source: NodeKey,
	/// Key of the node the link ends at.
	pub target: NodeKey,
}

impl GraphLink {
	/// Link from `source` to `target`.
	pub fn new(source: impl Into<NodeKey>, target: impl Into<NodeKey>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}

	/// Identity of this link.
	pub fn key(&self) -> LinkKey {
		LinkKey {
			source: self.source.clone(),
			target: self.target.clone(),
		}
	}
}

/// Complete graph model: ordered nodes and links.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphData {
	/// Nodes in display order.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Links between nodes of this model.
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

/// Identity of a rendered link: the ordered `(source, target)` key pair.
///
/// `a -> b` and `b -> a` are distinct links.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
	/// Source node key.
	pub source: NodeKey,
	/// Target node key.
	pub target: NodeKey,
}

impl fmt::Display for LinkKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		// Serialized as a JSON pair so keys containing separators stay unambiguous.
		match serde_json::to_string(&[&self.source, &self.target]) {
			Ok(s) => f.write_str(&s),
			Err(_) => Err(fmt::Error),
		}
	}
}
