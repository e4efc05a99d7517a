//! Layout tree for window splits.
//!
//! The `Layout` enum is a binary tree: leaves are windows, internal nodes
//! split their area between two children. Areas are derived on demand from
//! the frame rectangle, each split giving its first child the lower half.

use serde::{Deserialize, Serialize};

use crate::host::{Direction, WindowId};

/// Axis-aligned rectangle in frame cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge, clamped at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge, clamped at `u32::MAX`.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Non-empty and fully addressable without overflow.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some()
            && self.y.checked_add(self.height).is_some()
    }

    /// Split into (first, second) halves along `direction`.
    pub fn split(&self, direction: SplitDirection) -> (Rect, Rect) {
        match direction {
            SplitDirection::Horizontal => {
                let left = self.width / 2;
                (
                    Rect::new(self.x, self.y, left, self.height),
                    Rect::new(self.x.saturating_add(left), self.y, self.width - left, self.height),
                )
            }
            SplitDirection::Vertical => {
                let top = self.height / 2;
                (
                    Rect::new(self.x, self.y, self.width, top),
                    Rect::new(self.x, self.y.saturating_add(top), self.width, self.height - top),
                )
            }
        }
    }
}

/// Direction of a split.
///
/// `Horizontal` lays children side by side (first on the left), `Vertical`
/// stacks them (first on top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

/// Layout tree for window arrangement.
///
/// ```text
/// Layout::Split
/// ├── first: Layout::Single(WindowId(1))
/// └── second: Layout::Split
///     ├── first: Layout::Single(WindowId(2))
///     └── second: Layout::Single(WindowId(3))
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Single(WindowId),
    Split {
        direction: SplitDirection,
        first: Box<Layout>,
        second: Box<Layout>,
    },
}

impl Layout {
    pub fn single(window: WindowId) -> Self {
        Layout::Single(window)
    }

    /// First on the left, second on the right.
    pub fn side_by_side(first: Layout, second: Layout) -> Self {
        Layout::Split {
            direction: SplitDirection::Horizontal,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// First on top, second below.
    pub fn stacked(first: Layout, second: Layout) -> Self {
        Layout::Split {
            direction: SplitDirection::Vertical,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// All windows, first child before second child.
    pub fn windows(&self) -> Vec<WindowId> {
        match self {
            Layout::Single(id) => vec![*id],
            Layout::Split { first, second, .. } => {
                let mut windows = first.windows();
                windows.extend(second.windows());
                windows
            }
        }
    }

    pub fn contains(&self, window: WindowId) -> bool {
        match self {
            Layout::Single(id) => *id == window,
            Layout::Split { first, second, .. } => {
                first.contains(window) || second.contains(window)
            }
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Layout::Single(_) => 1,
            Layout::Split { first, second, .. } => first.count() + second.count(),
        }
    }

    /// Replaces a window with a new layout (for splitting). Returns true if replaced.
    pub fn replace(&mut self, target: WindowId, new_layout: Layout) -> bool {
        match self {
            Layout::Single(id) if *id == target => {
                *self = new_layout;
                true
            }
            Layout::Single(_) => false,
            Layout::Split { first, second, .. } => {
                first.replace(target, new_layout.clone()) || second.replace(target, new_layout)
            }
        }
    }

    /// Removes a window, collapsing its split into the sibling.
    /// Returns None if removing would leave no windows.
    pub fn remove(&self, target: WindowId) -> Option<Layout> {
        match self {
            Layout::Single(id) if *id == target => None,
            Layout::Single(_) => Some(self.clone()),
            Layout::Split {
                direction,
                first,
                second,
            } => match (first.remove(target), second.remove(target)) {
                (None, None) => None,
                (Some(layout), None) | (None, Some(layout)) => Some(layout),
                (Some(f), Some(s)) => Some(Layout::Split {
                    direction: *direction,
                    first: Box::new(f),
                    second: Box::new(s),
                }),
            },
        }
    }

    /// Area of every window when the whole layout occupies `area`.
    pub fn compute_areas(&self, area: Rect) -> Vec<(WindowId, Rect)> {
        match self {
            Layout::Single(id) => vec![(*id, area)],
            Layout::Split {
                direction,
                first,
                second,
            } => {
                let (first_area, second_area) = area.split(*direction);
                let mut areas = first.compute_areas(first_area);
                areas.extend(second.compute_areas(second_area));
                areas
            }
        }
    }

    /// The window sharing an edge with `current` on its `direction` side.
    ///
    /// Among several adjacent windows the one with the largest overlap along
    /// the shared edge wins, the earliest in layout order on ties. There is
    /// no wrap-around: a window on the frame edge has no neighbor past it.
    pub fn neighbor(&self, area: Rect, current: WindowId, direction: Direction) -> Option<WindowId> {
        let areas = self.compute_areas(area);
        let current_rect = areas.iter().find(|(w, _)| *w == current)?.1;

        let mut best: Option<(WindowId, u32)> = None;
        for (window, rect) in &areas {
            if *window == current || !is_adjacent(current_rect, *rect, direction) {
                continue;
            }
            let overlap = compute_overlap(current_rect, *rect, direction);
            if overlap == 0 {
                continue;
            }
            if best.map_or(true, |(_, o)| overlap > o) {
                best = Some((*window, overlap));
            }
        }
        best.map(|(w, _)| w)
    }
}

/// Checks if `candidate` touches `current` on its `direction` side.
fn is_adjacent(current: Rect, candidate: Rect, direction: Direction) -> bool {
    match direction {
        Direction::Left => candidate.right() == current.x,
        Direction::Right => candidate.x == current.right(),
        Direction::Above => candidate.bottom() == current.y,
        Direction::Below => candidate.y == current.bottom(),
    }
}

/// Computes perpendicular overlap between two rects for a given direction.
///
/// For left/right this is the vertical overlap, for above/below the
/// horizontal one.
fn compute_overlap(current: Rect, candidate: Rect, direction: Direction) -> u32 {
    match direction {
        Direction::Left | Direction::Right => {
            let start = current.y.max(candidate.y);
            let end = current.bottom().min(candidate.bottom());
            end.saturating_sub(start)
        }
        Direction::Above | Direction::Below => {
            let start = current.x.max(candidate.x);
            let end = current.right().min(candidate.right());
            end.saturating_sub(start)
        }
    }
}
