//! Edge windows
//!
//! The top window of a layout spans the whole frame width, has nothing
//! above it and something below it. Bottom, left and right are the same
//! test rotated. Requiring a window on the inner side means a frame with a
//! single window has no edge windows at all.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::host::{Direction, WindowId, WindowTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// Direction pointing out of the frame through this edge.
    pub fn outward(self) -> Direction {
        match self {
            Self::Top => Direction::Above,
            Self::Bottom => Direction::Below,
            Self::Left => Direction::Left,
            Self::Right => Direction::Right,
        }
    }

    /// The two directions along this edge.
    fn along(self) -> [Direction; 2] {
        match self {
            Self::Top | Self::Bottom => [Direction::Left, Direction::Right],
            Self::Left | Self::Right => [Direction::Above, Direction::Below],
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Whether `window` is the `edge` window of `tree`.
pub fn is_edge_window<T: WindowTree + ?Sized>(tree: &T, window: WindowId, edge: Edge) -> bool {
    let outward = edge.outward();
    edge.along()
        .iter()
        .all(|d| tree.neighbor(window, *d).is_none())
        && tree.neighbor(window, outward).is_none()
        && tree.neighbor(window, outward.opposite()).is_some()
}

/// Find the `edge` window of `tree`.
///
/// Every leaf is tested in [`WindowTree::leaves`] order. A well-formed
/// tiling has at most one match; if a host reports several, the last one
/// in that order is returned.
pub fn edge_window<T: WindowTree + ?Sized>(tree: &T, edge: Edge) -> Option<WindowId> {
    let mut found = None;
    for window in tree.leaves() {
        if is_edge_window(tree, window, edge) {
            trace!(%window, %edge, "edge window candidate");
            found = Some(window);
        }
    }
    found
}

pub fn top_window<T: WindowTree + ?Sized>(tree: &T) -> Option<WindowId> {
    edge_window(tree, Edge::Top)
}

pub fn bottom_window<T: WindowTree + ?Sized>(tree: &T) -> Option<WindowId> {
    edge_window(tree, Edge::Bottom)
}

pub fn left_window<T: WindowTree + ?Sized>(tree: &T) -> Option<WindowId> {
    edge_window(tree, Edge::Left)
}

pub fn right_window<T: WindowTree + ?Sized>(tree: &T) -> Option<WindowId> {
    edge_window(tree, Edge::Right)
}
