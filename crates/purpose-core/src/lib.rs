pub mod classifier;
pub mod config;
pub mod dedication;
pub mod dummy;
pub mod edge;
pub mod error;
pub mod host;
pub mod layout;
pub mod registry;
pub mod scenario;
pub mod session;
pub mod symbol;
pub mod tables;
pub mod window;

pub use classifier::{derives_from, Classification, MatchedRule, PurposeClassifier};
pub use config::{PurposeConfig, DEFAULT_PURPOSE};
pub use dedication::{
    is_buffer_dedicated, is_dedicated, set_dedicated, toggle_buffer_dedicated, toggle_dedicated,
};
pub use edge::{bottom_window, edge_window, left_window, right_window, top_window, Edge};
pub use error::{PurposeError, Result};
pub use host::{
    resolve_buffer, BufferId, Buffers, Direction, WindowFlag, WindowId, WindowTree, Windows,
    FUNDAMENTAL_MODE,
};
pub use layout::{Layout, Rect, SplitDirection};
pub use scenario::{BufferSpec, LayoutSpec, Scenario};
pub use session::Session;
pub use symbol::{ModeTag, Purpose};
pub use tables::PurposeTables;
pub use window::{buffers_with_purpose, set_window_purpose, window_purpose, windows_with_purpose};
