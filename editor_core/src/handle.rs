//! Borrowed handles exposed to the scripting layer.
//!
//! A handle is a thin pass-through over a [`Buffer`] or [`Line`] it borrows
//! mutably, so it can never outlive what it points at. Every error comes back
//! as a [`Result`] for the caller to turn into a script exception.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::line::Line;
use std::path::Path;

/// Script-facing view of a buffer.
#[derive(Debug)]
pub struct BufferHandle<'a> {
    buffer: &'a mut Buffer,
}

impl<'a> BufferHandle<'a> {
    pub fn new(buffer: &'a mut Buffer) -> Self {
        Self { buffer }
    }

    /// Adds a line at `offset`, empty when `text` is `None`.
    pub fn add_line(&mut self, offset: usize, text: Option<&str>) -> Result<LineHandle<'_>> {
        let line = self.buffer.insert(offset, text.unwrap_or_default())?;
        Ok(LineHandle::new(line))
    }

    /// Removes the line at `offset`.
    pub fn delete_line(&mut self, offset: usize) -> Result<bool> {
        self.buffer.erase(offset)?;
        Ok(true)
    }

    pub fn get_line(&mut self, offset: usize) -> Result<LineHandle<'_>> {
        Ok(LineHandle::new(self.buffer.line_mut(offset)?))
    }

    /// Returns every line as a string.
    pub fn get_contents(&self) -> Vec<String> {
        self.buffer.contents()
    }

    pub fn get_name(&self) -> &str {
        self.buffer.name()
    }

    /// Returns the backing file path, if any.
    pub fn get_file(&self) -> Option<&Path> {
        self.buffer.file_path()
    }

    /// Loads `path` into the buffer. Blocks until the file is read.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.buffer.open_file(path)
    }

    /// Writes the buffer to `path`. Blocks until the data is on disk.
    pub fn persist<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.buffer.persist(path)
    }

    /// Number of lines.
    pub fn length(&self) -> usize {
        self.buffer.len()
    }
}

/// Script-facing view of a line.
///
/// Mutating calls return the resulting text without moving the focus, so a
/// script typing at one spot keeps the cheap path.
#[derive(Debug)]
pub struct LineHandle<'a> {
    line: &'a mut Line,
}

impl<'a> LineHandle<'a> {
    pub fn new(line: &'a mut Line) -> Self {
        Self { line }
    }

    pub fn append(&mut self, text: &str) -> String {
        self.line.append_str(text);
        self.line.value()
    }

    /// Truncates at `offset` and returns the removed tail.
    pub fn chop(&mut self, offset: usize) -> Result<String> {
        let units = self.line.to_utf16();
        let tail = units
            .get(offset..)
            .map(String::from_utf16_lossy)
            .unwrap_or_default();
        self.line.chop(offset)?;
        Ok(tail)
    }

    pub fn erase(&mut self, offset: usize, count: usize) -> Result<String> {
        self.line.erase(offset, count)?;
        Ok(self.line.value())
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<String> {
        self.line.insert_str(offset, text)?;
        Ok(self.line.value())
    }

    /// Returns the text. Refocuses unless `refocus` is `Some(false)`.
    pub fn value(&mut self, refocus: Option<bool>) -> String {
        if refocus.unwrap_or(true) {
            self.line.materialize()
        } else {
            self.line.value()
        }
    }

    pub fn length(&self) -> usize {
        self.line.len()
    }

    /// Same as [`LineHandle::chop`], without returning the tail.
    pub fn set_length(&mut self, len: usize) -> Result<()> {
        self.line.chop(len)
    }
}
