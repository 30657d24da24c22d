//! Line-oriented text buffer with file loading and atomic saves.

use crate::config::BufferConfig;
use crate::error::{Error, Result};
use crate::line::Line;
use memmap2::Mmap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Prefix and suffix of the temporary file written next to the target.
const TEMP_PREFIX: &str = ".e-";
const TEMP_SUFFIX: &str = "~";

/// An ordered collection of lines, optionally backed by a file.
///
/// A buffer always holds at least one line.
#[derive(Debug, Clone)]
pub struct Buffer {
    lines: Vec<Line>,
    name: String,
    file_path: Option<PathBuf>,
    config: BufferConfig,
    /// Structural changes (line insert/erase). Line edits are tracked per line.
    dirty: bool,
}

impl Buffer {
    /// Creates a buffer holding one empty line.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, BufferConfig::default())
    }

    /// Creates a buffer holding one empty line, using `config`.
    pub fn with_config(name: impl Into<String>, config: BufferConfig) -> Self {
        Self {
            lines: vec![Line::new()],
            name: name.into(),
            file_path: None,
            config,
            dirty: false,
        }
    }

    /// Creates a buffer backed by `path`. A missing file is created empty.
    pub fn open<P: AsRef<Path>>(name: impl Into<String>, path: P) -> Result<Self> {
        Self::open_with(name, path, BufferConfig::default())
    }

    /// Creates a buffer backed by `path`, using `config`.
    pub fn open_with<P: AsRef<Path>>(
        name: impl Into<String>,
        path: P,
        config: BufferConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        let loaded = load_lines(path, &config)?;
        Ok(Self {
            lines: loaded.lines,
            name: name.into(),
            file_path: Some(path.to_path_buf()),
            config,
            dirty: loaded.lossy,
        })
    }

    /// Replaces the buffer contents with the file at `path`.
    ///
    /// A missing file is created empty. On failure the buffer is left exactly
    /// as it was. On success the buffer takes the path as its name. A file
    /// that is not valid UTF-8 loads with replacement characters and leaves
    /// the buffer dirty, since saving it would change the bytes on disk.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let loaded = load_lines(path, &self.config)?;
        self.lines = loaded.lines;
        self.file_path = Some(path.to_path_buf());
        self.name = path.display().to_string();
        self.dirty = loaded.lossy;
        Ok(())
    }

    /// Writes every line followed by a line feed to `path`, atomically.
    ///
    /// The content goes to a fresh temporary file in the same directory, is
    /// synced to disk, then renamed over `path`. Either the old or the new
    /// content is visible at `path`, never a mix. Clears the dirty state on
    /// success.
    pub fn persist<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        match self.write_atomic(path) {
            Ok(bytes) => {
                log::info!(
                    "Buffer::persist() wrote {} bytes ({} lines) to \"{}\"",
                    bytes,
                    self.lines.len(),
                    path.display()
                );
                self.dirty = false;
                for line in &mut self.lines {
                    line.clear_modified();
                }
                Ok(())
            }
            Err(source) => {
                log::warn!("Buffer::persist() failed for \"{}\": {}", path.display(), source);
                Err(Error::Persist {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Persists to the backing file.
    pub fn save(&mut self) -> Result<()> {
        let path = self.file_path.clone().ok_or(Error::NoFilePath)?;
        self.persist(path)
    }

    fn write_atomic(&self, path: &Path) -> io::Result<usize> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        log::debug!("Buffer::persist() staging in \"{}\"", temp.path().display());

        // Keep the mode of the file being replaced.
        if let Ok(metadata) = fs::metadata(path) {
            if metadata.is_file() {
                temp.as_file().set_permissions(metadata.permissions())?;
            }
        }

        let mut written = 0;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            for line in &self.lines {
                let text = line.value();
                writer.write_all(text.as_bytes())?;
                writer.write_all(b"\n")?;
                written += text.len() + 1;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|err| err.error)?;

        if let Err(err) = sync_dir(dir) {
            log::warn!("Buffer::persist() could not sync \"{}\": {}", dir.display(), err);
        }
        Ok(written)
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false: a buffer has at least one line.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the line at `offset`.
    pub fn line(&self, offset: usize) -> Result<&Line> {
        self.lines
            .get(offset)
            .ok_or_else(|| Error::out_of_range(offset, self.lines.len()))
    }

    /// Returns the line at `offset` for editing.
    pub fn line_mut(&mut self, offset: usize) -> Result<&mut Line> {
        let len = self.lines.len();
        self.lines
            .get_mut(offset)
            .ok_or_else(|| Error::out_of_range(offset, len))
    }

    /// Iterates over the lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.lines.iter()
    }

    /// Inserts a new line built from `text` at `offset`.
    ///
    /// `offset == len()` appends. Tabs are expanded per the buffer config.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<&mut Line> {
        if offset > self.lines.len() {
            return Err(Error::out_of_range(offset, self.lines.len()));
        }
        self.lines.insert(offset, Line::from_str_with(text, &self.config));
        self.dirty = true;
        Ok(&mut self.lines[offset])
    }

    /// Removes and returns the line at `offset`.
    ///
    /// Removing the only line leaves a single empty line behind.
    pub fn erase(&mut self, offset: usize) -> Result<Line> {
        if offset >= self.lines.len() {
            return Err(Error::out_of_range(offset, self.lines.len()));
        }
        let line = self.lines.remove(offset);
        if self.lines.is_empty() {
            self.lines.push(Line::new());
        }
        self.dirty = true;
        Ok(line)
    }

    /// Returns every line as a string, without moving any line's focus.
    pub fn contents(&self) -> Vec<String> {
        self.lines.iter().map(Line::value).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the backing file path, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Returns true if the buffer changed since it was created, loaded or
    /// last persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.lines.iter().any(Line::is_modified)
    }

    /// Flags the buffer as changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

/// Lines read from a file.
struct Loaded {
    lines: Vec<Line>,
    /// Some bytes were not valid UTF-8 and were replaced.
    lossy: bool,
}

impl Loaded {
    fn blank() -> Self {
        Self {
            lines: vec![Line::new()],
            lossy: false,
        }
    }
}

/// Reads `path` into lines, creating it empty if it does not exist.
fn load_lines(path: &Path, config: &BufferConfig) -> Result<Loaded> {
    let unreadable = |source: io::Error| Error::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            create_empty(path)?;
            return Ok(Loaded::blank());
        }
        Err(err) => {
            log::warn!("Buffer::open_file() cannot open \"{}\": {}", path.display(), err);
            return Err(unreadable(err));
        }
    };

    let metadata = file.metadata().map_err(unreadable)?;
    if metadata.is_dir() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "is a directory",
        )));
    }
    if metadata.len() == 0 {
        log::info!("Buffer::open_file() \"{}\" is empty", path.display());
        return Ok(Loaded::blank());
    }

    // SAFETY: another process may modify or truncate the file while it is
    // mapped, which can change the bytes under us or fault on access. The
    // mapping only lives for this call and every line copies its bytes out
    // right away, so the window for that is the duration of one scan.
    let mapping = unsafe { Mmap::map(&file) }.map_err(|err| {
        log::warn!("Buffer::open_file() cannot map \"{}\": {}", path.display(), err);
        unreadable(err)
    })?;
    let lossy = std::str::from_utf8(&mapping).is_err();
    if lossy {
        log::warn!(
            "Buffer::open_file() \"{}\" is not valid UTF-8; invalid bytes were replaced",
            path.display()
        );
    }
    let lines = split_lines(&mapping, config);
    log::info!(
        "Buffer::open_file() mmap'ed {} bytes ({} lines) for file \"{}\"",
        mapping.len(),
        lines.len(),
        path.display()
    );
    Ok(Loaded { lines, lossy })
}

fn create_empty(path: &Path) -> Result<()> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| Error::Create {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Buffer::open_file() created empty file \"{}\"", path.display());
    Ok(())
}

/// Splits on line feeds. A trailing line feed ends the last line rather than
/// starting a new one; a final run without one is still its own line.
fn split_lines(bytes: &[u8], config: &BufferConfig) -> Vec<Line> {
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    body.split(|&byte| byte == b'\n')
        .map(|raw| Line::from_bytes(raw, config))
        .collect()
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
