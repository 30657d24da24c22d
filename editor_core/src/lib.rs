//! Editor Core - text storage for the editor.
//!
//! Open files are held as a [`Buffer`] of [`Line`]s, each line a [`Zipper`]
//! of UTF-16 code units with a movable edit point. Buffers load from disk by
//! memory-mapping the file and save by atomically replacing it. Scripts reach
//! buffers and lines through the borrowed handles in [`handle`].

pub mod buffer;
pub mod config;
pub mod error;
pub mod handle;
pub mod line;
pub mod workspace;
pub mod zipper;

pub use buffer::Buffer;
pub use config::{BufferConfig, DEFAULT_TAB_WIDTH};
pub use error::{Error, Result};
pub use handle::{BufferHandle, LineHandle};
pub use line::{Line, Token};
pub use workspace::{BufferId, BufferInfo, Workspace};
pub use zipper::Zipper;
