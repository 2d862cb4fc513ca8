//! Observable set of selected node keys with one optional focused key.

use super::types::NodeKey;

/// Change notifications produced by [`SelectionStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
	/// Key joined the selection.
	Added(NodeKey),
	/// Key left the selection.
	Removed(NodeKey),
	/// The focused key changed (`None` when focus was dropped).
	Focused(Option<NodeKey>),
}

/// Insertion-ordered selection. The focused key, when set, is always a member.
#[derive(Clone, Debug, Default)]
pub struct SelectionStore {
	items: Vec<NodeKey>,
	focused: Option<NodeKey>,
	events: Vec<SelectionEvent>,
}

impl SelectionStore {
	/// Empty selection without focus.
	pub fn new() -> Self {
		Self::default()
	}

	/// Selected keys in insertion order.
	pub fn items(&self) -> &[NodeKey] {
		&self.items
	}

	/// Whether `key` is selected.
	pub fn contains(&self, key: &str) -> bool {
		self.items.iter().any(|k| k == key)
	}

	/// Number of selected keys.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// The focused key, if any.
	pub fn focused(&self) -> Option<&str> {
		self.focused.as_deref()
	}

	/// Adds `key`; returns false if it was already selected.
	pub fn add(&mut self, key: &str) -> bool {
		if self.contains(key) {
			return false;
		}
		self.items.push(key.to_string());
		self.events.push(SelectionEvent::Added(key.to_string()));
		true
	}

	/// Removes `key`, dropping focus with it.
	pub fn remove(&mut self, key: &str) -> bool {
		let Some(pos) = self.items.iter().position(|k| k == key) else {
			return false;
		};
		let removed = self.items.remove(pos);
		if self.focused.as_deref() == Some(key) {
			self.focused = None;
			self.events.push(SelectionEvent::Focused(None));
		}
		self.events.push(SelectionEvent::Removed(removed));
		true
	}

	/// Removes every key, emitting one event per key.
	pub fn clear(&mut self) {
		for key in self.items.clone() {
			self.remove(&key);
		}
	}

	/// Moves focus to `key`, selecting it first if needed.
	pub fn focus_key(&mut self, key: &str) -> bool {
		self.add(key);
		if self.focused.as_deref() == Some(key) {
			return false;
		}
		self.focused = Some(key.to_string());
		self.events.push(SelectionEvent::Focused(self.focused.clone()));
		true
	}

	/// Takes the notifications accumulated since the last drain.
	pub fn drain_events(&mut self) -> Vec<SelectionEvent> {
		std::mem::take(&mut self.events)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_and_remove_are_idempotent() {
		let mut s = SelectionStore::new();
		assert!(s.add("a"));
		assert!(!s.add("a"));
		assert_eq!(s.items(), ["a"]);
		assert!(s.remove("a"));
		assert!(!s.remove("a"));
		assert!(s.is_empty());
		assert_eq!(
			s.drain_events(),
			vec![
				SelectionEvent::Added("a".into()),
				SelectionEvent::Removed("a".into()),
			]
		);
	}

	#[test]
	fn focus_implies_membership() {
		let mut s = SelectionStore::new();
		assert!(s.focus_key("b"));
		assert!(s.contains("b"));
		assert_eq!(s.focused(), Some("b"));
		assert!(!s.focus_key("b"));
	}

	#[test]
	fn removing_focused_key_unsets_focus() {
		let mut s = SelectionStore::new();
		s.add("a");
		s.focus_key("b");
		s.drain_events();
		s.remove("b");
		assert_eq!(s.focused(), None);
		assert_eq!(
			s.drain_events(),
			vec![
				SelectionEvent::Focused(None),
				SelectionEvent::Removed("b".into()),
			]
		);
		assert_eq!(s.items(), ["a"]);
	}

	#[test]
	fn clear_empties_everything() {
		let mut s = SelectionStore::new();
		s.add("a");
		s.focus_key("b");
		s.clear();
		assert!(s.is_empty());
		assert_eq!(s.focused(), None);
	}
}
