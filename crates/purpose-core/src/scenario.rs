//! Scenario files
//!
//! A TOML description of a frame: buffers, mode parents and a split layout.
//!
//! ```toml
//! [modes]
//! python-mode = "prog-mode"
//!
//! [[buffers]]
//! name = "main.py"
//! mode = "python-mode"
//!
//! [[buffers]]
//! name = "*shell*"
//! mode = "shell-mode"
//!
//! [layout]
//! split = "vertical"
//! first = { buffer = "main.py" }
//! second = { buffer = "*shell*", dedicated = true }
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PurposeError, Result};
use crate::host::{Buffers, WindowFlag, WindowId, Windows, FUNDAMENTAL_MODE};
use crate::layout::{Layout, Rect, SplitDirection};
use crate::session::{Session, DEFAULT_AREA};
use crate::symbol::ModeTag;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Frame size, defaults to [`DEFAULT_AREA`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Rect>,

    /// Mode -> parent mode.
    #[serde(default)]
    pub modes: IndexMap<ModeTag, ModeTag>,

    /// Buffers in buffer-list order. At least one is required.
    #[serde(default)]
    pub buffers: Vec<BufferSpec>,

    pub layout: LayoutSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferSpec {
    pub name: String,
    #[serde(default = "default_mode")]
    pub mode: ModeTag,
}

fn default_mode() -> ModeTag {
    ModeTag::new(FUNDAMENTAL_MODE)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutSpec {
    Window {
        buffer: String,
        #[serde(default)]
        dedicated: bool,
        #[serde(default)]
        buffer_dedicated: bool,
    },
    Split {
        split: SplitDirection,
        first: Box<LayoutSpec>,
        second: Box<LayoutSpec>,
    },
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PurposeError::InvalidScenario {
            message: e.to_string(),
        })
    }

    /// Describe the current state of `session`, minibuffer excluded.
    ///
    /// Building the result gives back the same buffers, mode parents, split
    /// tree and window flags.
    pub fn from_session(session: &Session) -> Result<Self> {
        let minibuffer = session.window_buffer(session.minibuffer_window())?;
        let buffers = session
            .buffers()
            .into_iter()
            .filter(|id| *id != minibuffer)
            .filter_map(|id| {
                Some(BufferSpec {
                    name: session.buffer_name(id)?.to_string(),
                    mode: session.buffer_mode(id)?,
                })
            })
            .collect();

        Ok(Self {
            area: Some(session.area()),
            modes: session.parent_modes().into_iter().collect(),
            buffers,
            layout: describe(session, session.layout())?,
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Build the described frame.
    pub fn build(&self) -> Result<Session> {
        let area = self.area.unwrap_or(DEFAULT_AREA);
        if !area.is_valid() {
            return Err(PurposeError::InvalidScenario {
                message: format!(
                    "area {}x{} at ({}, {}) is empty or exceeds the coordinate range",
                    area.width, area.height, area.x, area.y
                ),
            });
        }

        let (first, rest) = self
            .buffers
            .split_first()
            .ok_or_else(|| PurposeError::InvalidScenario {
                message: "at least one buffer is required".to_string(),
            })?;

        let mut session = Session::with_area(area, &first.name, first.mode);
        for buffer in rest {
            session.create_buffer(&buffer.name, buffer.mode)?;
        }
        for (mode, parent) in &self.modes {
            session.set_parent_mode(*mode, *parent);
        }

        let root = session.layout().windows()[0];
        place(&mut session, root, &self.layout)?;
        Ok(session)
    }
}

fn place(session: &mut Session, window: WindowId, spec: &LayoutSpec) -> Result<()> {
    match spec {
        LayoutSpec::Window {
            buffer,
            dedicated,
            buffer_dedicated,
        } => {
            let id = session
                .find_buffer(buffer)
                .ok_or_else(|| PurposeError::InvalidScenario {
                    message: format!("layout shows undeclared buffer '{buffer}'"),
                })?;
            session.set_window_buffer(window, id)?;
            session.set_window_flag(window, WindowFlag::PurposeDedicated, *dedicated)?;
            session.set_window_flag(window, WindowFlag::BufferDedicated, *buffer_dedicated)?;
        }
        LayoutSpec::Split {
            split,
            first,
            second,
        } => {
            let new_window = session.split_window(window, *split)?;
            place(session, window, first)?;
            place(session, new_window, second)?;
        }
    }
    Ok(())
}

fn describe(session: &Session, layout: &Layout) -> Result<LayoutSpec> {
    Ok(match layout {
        Layout::Single(window) => {
            let buffer = session.window_buffer(*window)?;
            LayoutSpec::Window {
                buffer: session
                    .buffer_name(buffer)
                    .ok_or(PurposeError::DeadBuffer { id: buffer })?
                    .to_string(),
                dedicated: session.window_flag(*window, WindowFlag::PurposeDedicated)?,
                buffer_dedicated: session.window_flag(*window, WindowFlag::BufferDedicated)?,
            }
        }
        Layout::Split {
            direction,
            first,
            second,
        } => LayoutSpec::Split {
            split: *direction,
            first: Box::new(describe(session, first)?),
            second: Box::new(describe(session, second)?),
        },
    })
}
