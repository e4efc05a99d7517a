//! Host interface
//!
//! The purpose engine never owns buffers or windows. It reads and mutates
//! them through these traits, implemented by the embedding editor or by the
//! in-memory [`Session`](crate::session::Session).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::symbol::ModeTag;

/// Root mode most buffers derive from.
pub const FUNDAMENTAL_MODE: &str = "fundamental-mode";

/// Handle to a host buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BufferId(pub u32);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Handle to a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Screen direction relative to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Above, Self::Below, Self::Left, Self::Right];

    pub fn opposite(self) -> Self {
        match self {
            Self::Above => Self::Below,
            Self::Below => Self::Above,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Boolean window-local parameters the engine stores on host windows.
///
/// The two dedication flags are unrelated: the purpose flag pins a window to
/// its purpose, the buffer flag is the host's own pin to a single buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowFlag {
    PurposeDedicated,
    BufferDedicated,
}

/// Buffer enumeration and accessors.
pub trait Buffers {
    /// All live buffers, in the host's buffer-list order.
    fn buffers(&self) -> Vec<BufferId>;

    /// Name of a live buffer, `None` if the buffer is gone.
    fn buffer_name(&self, id: BufferId) -> Option<&str>;

    /// Major mode of a live buffer, `None` if the buffer is gone.
    fn buffer_mode(&self, id: BufferId) -> Option<ModeTag>;

    /// Look a live buffer up by its exact name.
    fn find_buffer(&self, name: &str) -> Option<BufferId>;

    /// Create a buffer. Hosts return the existing buffer if `name` is taken.
    fn create_buffer(&mut self, name: &str, mode: ModeTag) -> Result<BufferId>;

    /// Mode that `mode` directly derives from, if any.
    fn parent_mode(&self, mode: ModeTag) -> Option<ModeTag>;
}

/// Window enumeration, window-buffer access and window-local parameters.
pub trait Windows {
    /// All live windows of the frame, minibuffer windows included.
    fn windows(&self) -> Vec<WindowId>;

    fn is_minibuffer(&self, window: WindowId) -> bool;

    fn window_buffer(&self, window: WindowId) -> Result<BufferId>;

    fn set_window_buffer(&mut self, window: WindowId, buffer: BufferId) -> Result<()>;

    /// Read a window-local flag. Unset flags read as `false`.
    fn window_flag(&self, window: WindowId, flag: WindowFlag) -> Result<bool>;

    fn set_window_flag(&mut self, window: WindowId, flag: WindowFlag, value: bool) -> Result<()>;

    /// Ask the host to redraw any indicator showing window state.
    fn refresh_indicators(&mut self);
}

/// Read-only view of a frame's split layout.
pub trait WindowTree {
    /// Every leaf window of the layout, in depth-first order (first child
    /// before second child). Minibuffer windows are not part of the tree.
    fn leaves(&self) -> Vec<WindowId>;

    /// The window directly adjacent to `window` in `direction`, if any.
    fn neighbor(&self, window: WindowId, direction: Direction) -> Option<WindowId>;
}

/// Resolve a buffer name to a handle at the API boundary.
pub fn resolve_buffer<H: Buffers + ?Sized>(host: &H, name: &str) -> Result<BufferId> {
    host.find_buffer(name)
        .ok_or_else(|| crate::error::PurposeError::BufferNotFound {
            name: name.to_string(),
        })
}
