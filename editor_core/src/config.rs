//! Buffer configuration.

/// Number of spaces a tab expands to unless configured otherwise.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Settings applied when text enters a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Spaces substituted for each tab character on load, insert and replace.
    pub tab_width: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl BufferConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tab width.
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }
}
