//! In-memory host
//!
//! A single frame with a buffer list, a mode parent table, a split layout of
//! windows and a minibuffer window outside the layout. Embedders with a real
//! UI implement the host traits themselves; `Session` backs the CLI and the
//! tests.

use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::error::{PurposeError, Result};
use crate::host::{
    BufferId, Buffers, Direction, WindowFlag, WindowId, WindowTree, Windows, FUNDAMENTAL_MODE,
};
use crate::layout::{Layout, Rect, SplitDirection};
use crate::symbol::ModeTag;

/// Name of the buffer shown in the minibuffer window.
pub const MINIBUFFER_NAME: &str = " *Minibuf-0*";
const MINIBUFFER_MODE: &str = "minibuffer-inactive-mode";

/// Frame size used unless one is given.
pub const DEFAULT_AREA: Rect = Rect::new(0, 0, 240, 80);

#[derive(Debug, Clone)]
struct BufferEntry {
    id: BufferId,
    name: String,
    mode: ModeTag,
}

/// Per-window state. Dropped together with the window.
#[derive(Debug, Clone)]
struct WindowState {
    buffer: BufferId,
    purpose_dedicated: bool,
    buffer_dedicated: bool,
}

impl WindowState {
    fn showing(buffer: BufferId) -> Self {
        Self {
            buffer,
            purpose_dedicated: false,
            buffer_dedicated: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    area: Rect,
    buffers: Vec<BufferEntry>,
    next_buffer: u32,
    parents: HashMap<ModeTag, ModeTag>,
    layout: Layout,
    windows: BTreeMap<WindowId, WindowState>,
    minibuffer: WindowId,
    next_window: u32,
    refreshes: u64,
}

impl Session {
    /// A frame with one window showing a fresh buffer `name` in `mode`.
    pub fn new(name: &str, mode: ModeTag) -> Self {
        Self::with_area(DEFAULT_AREA, name, mode)
    }

    pub fn with_area(area: Rect, name: &str, mode: ModeTag) -> Self {
        let minibuffer_buffer = BufferId(0);
        let first_buffer = BufferId(1);
        let minibuffer = WindowId(0);
        let first_window = WindowId(1);

        let mut windows = BTreeMap::new();
        windows.insert(minibuffer, WindowState::showing(minibuffer_buffer));
        windows.insert(first_window, WindowState::showing(first_buffer));

        Self {
            area,
            buffers: vec![
                BufferEntry {
                    id: first_buffer,
                    name: name.to_string(),
                    mode,
                },
                BufferEntry {
                    id: minibuffer_buffer,
                    name: MINIBUFFER_NAME.to_string(),
                    mode: ModeTag::new(MINIBUFFER_MODE),
                },
            ],
            next_buffer: 2,
            parents: HashMap::new(),
            layout: Layout::single(first_window),
            windows,
            minibuffer,
            next_window: 2,
            refreshes: 0,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn minibuffer_window(&self) -> WindowId {
        self.minibuffer
    }

    /// Declare that `mode` derives directly from `parent`.
    pub fn set_parent_mode(&mut self, mode: ModeTag, parent: ModeTag) {
        self.parents.insert(mode, parent);
    }

    /// Every declared mode -> parent pair, sorted by mode name.
    pub fn parent_modes(&self) -> Vec<(ModeTag, ModeTag)> {
        let mut parents: Vec<_> = self.parents.iter().map(|(m, p)| (*m, *p)).collect();
        parents.sort();
        parents
    }

    /// How many times the host was asked to refresh indicators.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    /// Split `window` in two. The window keeps the first half, a new window
    /// showing the same buffer takes the second. Flags are not inherited.
    pub fn split_window(&mut self, window: WindowId, direction: SplitDirection) -> Result<WindowId> {
        let buffer = self.state(window)?.buffer;
        if !self.layout.contains(window) {
            return Err(PurposeError::WindowNotFound { id: window });
        }

        let new_window = WindowId(self.next_window);
        self.next_window += 1;

        let split = Layout::Split {
            direction,
            first: Box::new(Layout::single(window)),
            second: Box::new(Layout::single(new_window)),
        };
        self.layout.replace(window, split);
        self.windows.insert(new_window, WindowState::showing(buffer));
        trace!(%window, %new_window, ?direction, "split window");
        Ok(new_window)
    }

    /// Delete a window and all of its window-local state.
    pub fn delete_window(&mut self, window: WindowId) -> Result<()> {
        if !self.layout.contains(window) {
            return Err(PurposeError::WindowNotFound { id: window });
        }
        let layout = self
            .layout
            .remove(window)
            .ok_or(PurposeError::CannotDeleteLastWindow)?;
        self.layout = layout;
        self.windows.remove(&window);
        Ok(())
    }

    /// Kill a buffer. Windows showing it switch to the first other buffer in
    /// the list, or to a new `*scratch*` when nothing else is left.
    pub fn kill_buffer(&mut self, buffer: BufferId) -> Result<()> {
        let index = self
            .buffers
            .iter()
            .position(|b| b.id == buffer && b.id != self.minibuffer_buffer())
            .ok_or(PurposeError::DeadBuffer { id: buffer })?;
        self.buffers.remove(index);

        let minibuffer_buffer = self.minibuffer_buffer();
        let other = self
            .buffers
            .iter()
            .find(|b| b.id != minibuffer_buffer)
            .map(|b| b.id);
        let replacement = match other {
            Some(id) => id,
            None => self.create_buffer("*scratch*", ModeTag::new(FUNDAMENTAL_MODE))?,
        };
        for state in self.windows.values_mut() {
            if state.buffer == buffer {
                state.buffer = replacement;
            }
        }
        Ok(())
    }

    fn minibuffer_buffer(&self) -> BufferId {
        self.windows
            .get(&self.minibuffer)
            .map(|s| s.buffer)
            .unwrap_or(BufferId(0))
    }

    fn state(&self, window: WindowId) -> Result<&WindowState> {
        self.windows
            .get(&window)
            .ok_or(PurposeError::WindowNotFound { id: window })
    }

    fn state_mut(&mut self, window: WindowId) -> Result<&mut WindowState> {
        self.windows
            .get_mut(&window)
            .ok_or(PurposeError::WindowNotFound { id: window })
    }

    fn entry(&self, id: BufferId) -> Option<&BufferEntry> {
        self.buffers.iter().find(|b| b.id == id)
    }
}

impl Buffers for Session {
    fn buffers(&self) -> Vec<BufferId> {
        self.buffers.iter().map(|b| b.id).collect()
    }

    fn buffer_name(&self, id: BufferId) -> Option<&str> {
        self.entry(id).map(|b| b.name.as_str())
    }

    fn buffer_mode(&self, id: BufferId) -> Option<ModeTag> {
        self.entry(id).map(|b| b.mode)
    }

    fn find_buffer(&self, name: &str) -> Option<BufferId> {
        self.buffers.iter().find(|b| b.name == name).map(|b| b.id)
    }

    fn create_buffer(&mut self, name: &str, mode: ModeTag) -> Result<BufferId> {
        if let Some(id) = self.find_buffer(name) {
            return Ok(id);
        }
        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        self.buffers.push(BufferEntry {
            id,
            name: name.to_string(),
            mode,
        });
        Ok(id)
    }

    fn parent_mode(&self, mode: ModeTag) -> Option<ModeTag> {
        self.parents.get(&mode).copied()
    }
}

impl Windows for Session {
    fn windows(&self) -> Vec<WindowId> {
        let mut windows = self.layout.windows();
        windows.push(self.minibuffer);
        windows
    }

    fn is_minibuffer(&self, window: WindowId) -> bool {
        window == self.minibuffer
    }

    fn window_buffer(&self, window: WindowId) -> Result<BufferId> {
        Ok(self.state(window)?.buffer)
    }

    fn set_window_buffer(&mut self, window: WindowId, buffer: BufferId) -> Result<()> {
        if self.entry(buffer).is_none() {
            return Err(PurposeError::DeadBuffer { id: buffer });
        }
        self.state_mut(window)?.buffer = buffer;
        Ok(())
    }

    fn window_flag(&self, window: WindowId, flag: WindowFlag) -> Result<bool> {
        let state = self.state(window)?;
        Ok(match flag {
            WindowFlag::PurposeDedicated => state.purpose_dedicated,
            WindowFlag::BufferDedicated => state.buffer_dedicated,
        })
    }

    fn set_window_flag(&mut self, window: WindowId, flag: WindowFlag, value: bool) -> Result<()> {
        let state = self.state_mut(window)?;
        match flag {
            WindowFlag::PurposeDedicated => state.purpose_dedicated = value,
            WindowFlag::BufferDedicated => state.buffer_dedicated = value,
        }
        Ok(())
    }

    fn refresh_indicators(&mut self) {
        self.refreshes += 1;
    }
}

impl WindowTree for Session {
    fn leaves(&self) -> Vec<WindowId> {
        self.layout.windows()
    }

    fn neighbor(&self, window: WindowId, direction: Direction) -> Option<WindowId> {
        self.layout.neighbor(self.area, window, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("*scratch*", ModeTag::new("fundamental-mode"))
    }

    #[test]
    fn test_new_session_has_one_window_and_minibuffer() {
        let session = session();
        assert_eq!(session.leaves(), vec![WindowId(1)]);
        assert_eq!(session.windows(), vec![WindowId(1), WindowId(0)]);
        assert!(session.is_minibuffer(WindowId(0)));
        assert!(!session.is_minibuffer(WindowId(1)));

        let shown = session.window_buffer(WindowId(1)).unwrap();
        assert_eq!(session.buffer_name(shown), Some("*scratch*"));
    }

    #[test]
    fn test_create_buffer_reuses_name() {
        let mut session = session();
        let a = session.create_buffer("a.txt", ModeTag::new("text-mode")).unwrap();
        let again = session.create_buffer("a.txt", ModeTag::new("prog-mode")).unwrap();
        assert_eq!(a, again);
        assert_eq!(session.buffer_mode(a), Some(ModeTag::new("text-mode")));
    }

    #[test]
    fn test_split_shows_same_buffer_without_flags() {
        let mut session = session();
        session
            .set_window_flag(WindowId(1), WindowFlag::PurposeDedicated, true)
            .unwrap();
        let new = session.split_window(WindowId(1), SplitDirection::Vertical).unwrap();

        assert_eq!(session.leaves(), vec![WindowId(1), new]);
        assert_eq!(
            session.window_buffer(new).unwrap(),
            session.window_buffer(WindowId(1)).unwrap()
        );
        assert!(!session.window_flag(new, WindowFlag::PurposeDedicated).unwrap());
        assert_eq!(session.neighbor(WindowId(1), Direction::Below), Some(new));
    }

    #[test]
    fn test_cannot_split_minibuffer() {
        let mut session = session();
        let err = session
            .split_window(WindowId(0), SplitDirection::Horizontal)
            .unwrap_err();
        assert!(matches!(err, PurposeError::WindowNotFound { .. }));
    }

    #[test]
    fn test_delete_window_drops_its_state() {
        let mut session = session();
        let new = session.split_window(WindowId(1), SplitDirection::Horizontal).unwrap();
        session
            .set_window_flag(new, WindowFlag::PurposeDedicated, true)
            .unwrap();

        session.delete_window(new).unwrap();
        assert_eq!(session.leaves(), vec![WindowId(1)]);
        assert!(matches!(
            session.window_flag(new, WindowFlag::PurposeDedicated),
            Err(PurposeError::WindowNotFound { .. })
        ));
    }

    #[test]
    fn test_cannot_delete_last_window() {
        let mut session = session();
        assert!(matches!(
            session.delete_window(WindowId(1)),
            Err(PurposeError::CannotDeleteLastWindow)
        ));
    }

    #[test]
    fn test_kill_buffer_switches_windows() {
        let mut session = session();
        let scratch = session.find_buffer("*scratch*").unwrap();
        let notes = session.create_buffer("notes", ModeTag::new("text-mode")).unwrap();
        session.set_window_buffer(WindowId(1), notes).unwrap();

        session.kill_buffer(notes).unwrap();
        assert_eq!(session.buffer_name(notes), None);
        assert_eq!(session.window_buffer(WindowId(1)).unwrap(), scratch);
    }

    #[test]
    fn test_kill_last_buffer_recreates_scratch() {
        let mut session = Session::new("only", ModeTag::new("text-mode"));
        let only = session.find_buffer("only").unwrap();
        session.kill_buffer(only).unwrap();

        let shown = session.window_buffer(WindowId(1)).unwrap();
        assert_eq!(session.buffer_name(shown), Some("*scratch*"));
    }

    #[test]
    fn test_set_window_buffer_rejects_dead_buffer() {
        let mut session = session();
        assert!(matches!(
            session.set_window_buffer(WindowId(1), BufferId(42)),
            Err(PurposeError::DeadBuffer { .. })
        ));
    }
}
