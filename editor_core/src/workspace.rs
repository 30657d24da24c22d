//! The set of buffers open in the editor.

use crate::buffer::Buffer;
use crate::config::BufferConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Stable identifier for an open buffer. Ids are never reused.
pub type BufferId = usize;

/// Name of the buffer the editor starts with.
pub const SCRATCH_NAME: &str = "*temp*";

/// Summary of an open buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferInfo {
    pub id: BufferId,
    pub name: String,
    pub path: Option<PathBuf>,
    /// Whether the buffer has unpersisted changes.
    pub is_dirty: bool,
}

/// Owns every open buffer and tracks which one is active.
#[derive(Debug, Default)]
pub struct Workspace {
    /// Slots indexed by BufferId; closed buffers leave `None` behind so
    /// existing ids stay valid.
    buffers: Vec<Option<Buffer>>,
    /// Open buffer ids in display order.
    order: Vec<BufferId>,
    active: Option<BufferId>,
    config: BufferConfig,
}

impl Workspace {
    /// Creates a workspace with no buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workspace whose buffers use `config`.
    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates the scratch buffer and makes it active.
    pub fn scratch(&mut self) -> BufferId {
        let id = self.new_buffer(SCRATCH_NAME);
        self.active = Some(id);
        id
    }

    /// Adds an empty buffer. The first buffer added becomes active.
    pub fn new_buffer(&mut self, name: impl Into<String>) -> BufferId {
        self.push(Buffer::with_config(name, self.config))
    }

    /// Opens `path` in a new buffer and makes it active.
    ///
    /// If a buffer already holds `path` it is activated instead.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> Result<BufferId> {
        let path = path.as_ref();
        if let Some(id) = self.find_by_path(path) {
            self.active = Some(id);
            return Ok(id);
        }
        let mut buffer = Buffer::with_config(path.display().to_string(), self.config);
        buffer.open_file(path)?;
        let id = self.push(buffer);
        self.active = Some(id);
        Ok(id)
    }

    fn push(&mut self, buffer: Buffer) -> BufferId {
        let id = self.buffers.len();
        self.buffers.push(Some(buffer));
        self.order.push(id);
        if self.active.is_none() {
            self.active = Some(id);
        }
        id
    }

    fn find_by_path(&self, path: &Path) -> Option<BufferId> {
        let wanted = canonical(path);
        self.order.iter().copied().find(|&id| {
            self.get(id)
                .ok()
                .and_then(Buffer::file_path)
                .map_or(false, |open| canonical(open) == wanted)
        })
    }

    pub fn get(&self, id: BufferId) -> Result<&Buffer> {
        self.buffers
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(Error::NoSuchBuffer(id))
    }

    pub fn get_mut(&mut self, id: BufferId) -> Result<&mut Buffer> {
        self.buffers
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(Error::NoSuchBuffer(id))
    }

    pub fn active_id(&self) -> Option<BufferId> {
        self.active
    }

    pub fn active(&self) -> Option<&Buffer> {
        self.active.and_then(|id| self.get(id).ok())
    }

    pub fn active_mut(&mut self) -> Option<&mut Buffer> {
        let id = self.active?;
        self.get_mut(id).ok()
    }

    /// Makes `id` the active buffer.
    pub fn set_active(&mut self, id: BufferId) -> Result<()> {
        self.get(id)?;
        self.active = Some(id);
        Ok(())
    }

    /// Activates the next buffer in display order, wrapping around.
    pub fn next(&mut self) {
        self.step(1);
    }

    /// Activates the previous buffer in display order, wrapping around.
    pub fn prev(&mut self) {
        self.step(self.order.len().saturating_sub(1));
    }

    fn step(&mut self, by: usize) {
        let count = self.order.len();
        if count <= 1 {
            return;
        }
        if let Some(pos) = self
            .active
            .and_then(|active| self.order.iter().position(|&id| id == active))
        {
            self.active = Some(self.order[(pos + by) % count]);
        }
    }

    /// Closes a buffer, dropping all of its lines. Does not check for unsaved
    /// changes.
    pub fn close_buffer(&mut self, id: BufferId) -> Result<Buffer> {
        let buffer = self
            .buffers
            .get_mut(id)
            .and_then(Option::take)
            .ok_or(Error::NoSuchBuffer(id))?;
        self.order.retain(|&open| open != id);
        if self.active == Some(id) {
            self.active = self.order.first().copied();
        }
        log::debug!("Workspace::close_buffer() closed \"{}\"", buffer.name());
        Ok(buffer)
    }

    /// Returns one entry per open buffer, in display order.
    pub fn buffers(&self) -> Vec<BufferInfo> {
        self.order
            .iter()
            .filter_map(|&id| {
                self.get(id).ok().map(|buffer| BufferInfo {
                    id,
                    name: buffer.name().to_string(),
                    path: buffer.file_path().map(Path::to_path_buf),
                    is_dirty: buffer.is_dirty(),
                })
            })
            .collect()
    }

    /// Number of open buffers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns true if any open buffer has unpersisted changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.order
            .iter()
            .any(|&id| self.get(id).map(Buffer::is_dirty).unwrap_or(false))
    }

    /// Saves the active buffer to its backing file.
    pub fn save_active(&mut self) -> Result<()> {
        let id = self.active.ok_or(Error::NoActiveBuffer)?;
        self.get_mut(id)?.save()
    }
}

/// Resolves `path` for comparison; falls back to the literal path when it
/// cannot be resolved (e.g. the file does not exist yet).
fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
