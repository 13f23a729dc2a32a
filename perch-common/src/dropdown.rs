//! Dropdown state machine
//!
//! Maps a caller-chosen trigger key to the anchor position captured when its
//! dropdown opened. A key is present if and only if its dropdown is open.
//! Positions are frozen at open time and never track scroll or resize.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Anchor point in viewport pixels (left edge, bottom edge of the trigger)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Viewport-relative bounding box of a rendered element
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingRect {
    /// Point directly beneath the box's left edge.
    pub fn anchor(&self) -> Position {
        Position::new(self.left, self.bottom)
    }
}

/// Transition requests for a dropdown
#[derive(Debug, Clone, PartialEq)]
pub enum DropdownMsg<K> {
    Open(K, Position),
    Close(K),
}

/// Open dropdowns and their anchor positions.
///
/// Key uniqueness across simultaneously rendered dropdowns is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownState<K: Eq + Hash> {
    open: HashMap<K, Position>,
}

impl<K: Eq + Hash> Default for DropdownState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> DropdownState<K> {
    pub fn new() -> Self {
        Self {
            open: HashMap::new(),
        }
    }

    pub fn update(&mut self, msg: DropdownMsg<K>) {
        match msg {
            DropdownMsg::Open(key, position) => {
                debug!(x = position.x, y = position.y, "Dropdown opened");
                self.open.insert(key, position);
            }
            DropdownMsg::Close(key) => {
                if self.open.remove(&key).is_some() {
                    debug!("Dropdown closed");
                }
            }
        }
    }

    /// Open `key` at `position` if closed, close it otherwise.
    ///
    /// `position` is ignored when closing.
    pub fn toggle(&mut self, key: K, position: Position) {
        let msg = if self.is_open(&key) {
            DropdownMsg::Close(key)
        } else {
            DropdownMsg::Open(key, position)
        };
        self.update(msg);
    }

    pub fn is_open(&self, key: &K) -> bool {
        self.open.contains_key(key)
    }

    pub fn position(&self, key: &K) -> Option<Position> {
        self.open.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Keys of open dropdowns, in no particular order.
    pub fn open_keys(&self) -> impl Iterator<Item = &K> {
        self.open.keys()
    }
}

/// Message for a click on a trigger.
///
/// Closing needs no geometry. Opening needs the trigger's bounding box read at
/// click time; when it can't be read the click produces nothing.
pub fn click_message<K>(
    key: K,
    is_open: bool,
    rect: Option<BoundingRect>,
) -> Option<DropdownMsg<K>> {
    if is_open {
        return Some(DropdownMsg::Close(key));
    }
    match rect {
        Some(rect) => Some(DropdownMsg::Open(key, rect.anchor())),
        None => {
            warn!("Trigger geometry unavailable, ignoring click");
            None
        }
    }
}

/// Inline style placing overlay content at a fixed viewport position.
pub fn overlay_style(position: Position) -> String {
    format!(
        "position: fixed; left: {}px; top: {}px;",
        position.x, position.y
    )
}

pub fn placeholder_id(prefix: &str, key: impl Display) -> String {
    format!("{prefix}{key}")
}

/// Placeholder ids in the order the keys were given.
pub fn placeholder_ids<I>(prefix: &str, keys: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Display,
{
    keys.into_iter()
        .map(|key| placeholder_id(prefix, key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: f64, bottom: f64) -> BoundingRect {
        BoundingRect {
            left,
            top: bottom - 20.0,
            right: left + 80.0,
            bottom,
        }
    }

    #[test]
    fn test_new_state_is_empty() {
        let state: DropdownState<&str> = DropdownState::new();
        assert!(state.is_empty());
        assert!(!state.is_open(&"never"));
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let closed: DropdownState<&str> = DropdownState::new();
        let mut state = closed.clone();
        state.toggle("a", Position::new(1.0, 2.0));
        assert!(state.is_open(&"a"));
        state.toggle("a", Position::new(99.0, 99.0));
        assert_eq!(state, closed);
    }

    #[test]
    fn test_open_then_close() {
        let mut state = DropdownState::new();
        state.update(DropdownMsg::Open(7u32, Position::new(3.0, 4.0)));
        assert!(state.is_open(&7));
        assert_eq!(state.position(&7), Some(Position::new(3.0, 4.0)));
        state.update(DropdownMsg::Close(7));
        assert!(!state.is_open(&7));
        assert_eq!(state.position(&7), None);
    }

    #[test]
    fn test_close_ignores_position() {
        let mut state = DropdownState::new();
        state.toggle("a", Position::new(1.0, 1.0));
        state.toggle("a", Position::new(5.0, 5.0));
        assert!(!state.is_open(&"a"));
        state.toggle("a", Position::new(6.0, 6.0));
        assert_eq!(state.position(&"a"), Some(Position::new(6.0, 6.0)));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut state = DropdownState::new();
        state.update(DropdownMsg::Open("a", Position::new(10.0, 20.0)));
        state.update(DropdownMsg::Open("b", Position::new(30.0, 40.0)));
        assert_eq!(state.len(), 2);
        assert_eq!(state.position(&"a"), Some(Position::new(10.0, 20.0)));

        state.update(DropdownMsg::Close("a"));
        assert_eq!(state.len(), 1);
        assert!(!state.is_open(&"a"));
        assert_eq!(state.position(&"b"), Some(Position::new(30.0, 40.0)));
        assert!(!state.is_open(&"c"));
    }

    #[test]
    fn test_close_unknown_key_is_noop() {
        let mut state = DropdownState::new();
        state.update(DropdownMsg::Open("a", Position::new(1.0, 2.0)));
        state.update(DropdownMsg::Close("z"));
        assert_eq!(state.open_keys().collect::<Vec<_>>(), vec![&"a"]);
    }

    #[test]
    fn test_click_when_closed_reads_left_bottom_exactly() {
        match click_message("menu", false, Some(rect(120.5, 48.0))) {
            Some(DropdownMsg::Open(key, pos)) => {
                assert_eq!(key, "menu");
                assert_eq!(pos.x, 120.5);
                assert_eq!(pos.y, 48.0);
            }
            other => panic!("Expected Open, got {other:?}"),
        }
    }

    #[test]
    fn test_click_when_open_closes_without_geometry() {
        assert_eq!(
            click_message("menu", true, None),
            Some(DropdownMsg::Close("menu"))
        );
    }

    #[test]
    fn test_click_without_geometry_is_ignored() {
        assert_eq!(click_message("menu", false, None), None);
    }

    #[test]
    fn test_click_drives_state() {
        let mut state = DropdownState::new();
        let msg = click_message("a", state.is_open(&"a"), Some(rect(120.5, 48.0))).unwrap();
        state.update(msg);
        assert_eq!(state.position(&"a"), Some(Position::new(120.5, 48.0)));
        let msg = click_message("a", state.is_open(&"a"), None).unwrap();
        state.update(msg);
        assert!(state.is_empty());
    }

    #[test]
    fn test_overlay_style_formatting() {
        assert_eq!(
            overlay_style(Position::new(120.5, 48.0)),
            "position: fixed; left: 120.5px; top: 48px;"
        );
    }

    #[test]
    fn test_placeholder_ids_keep_order() {
        assert_eq!(
            placeholder_ids("p_", ["b", "a", "c"]),
            vec!["p_b", "p_a", "p_c"]
        );
        assert_eq!(placeholder_id("p_", 42), "p_42");
        assert!(placeholder_ids::<Vec<&str>>("p_", vec![]).is_empty());
    }
}
