//! A single line of text.
//!
//! Lines hold UTF-16 code units in a [`Zipper`], so typing or deleting
//! consecutive characters costs amortized O(1) while jumping the edit point
//! across the line is linear in the distance. Tabs are expanded to spaces when
//! text is loaded or replaced; everything else is stored as-is.

use crate::config::BufferConfig;
use crate::error::Result;
use crate::zipper::Zipper;

const TAB: u16 = b'\t' as u16;
const SPACE: u16 = b' ' as u16;

/// Highlighting span attached to a line. Stored, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    pub start: usize,
    pub len: usize,
    pub kind: u16,
}

/// One editable line of text.
#[derive(Debug, Clone, Default)]
pub struct Line {
    text: Zipper<u16>,
    indentation: u16,
    tokens: Vec<Token>,
    /// Set by every content mutation, cleared when the owning buffer persists.
    modified: bool,
}

impl Line {
    /// Creates an empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a line from text, expanding tabs with the default width.
    pub fn from_str(text: &str) -> Self {
        Self::from_str_with(text, &BufferConfig::default())
    }

    /// Creates a line from text, expanding tabs per `config`.
    pub fn from_str_with(text: &str, config: &BufferConfig) -> Self {
        Self {
            text: expand_tabs(text, config.tab_width).into(),
            ..Self::default()
        }
    }

    /// Creates a line from raw file bytes. Invalid UTF-8 is replaced.
    pub(crate) fn from_bytes(bytes: &[u8], config: &BufferConfig) -> Self {
        Self::from_str_with(&String::from_utf8_lossy(bytes), config)
    }

    /// Replaces the whole line, expanding tabs with the default width.
    pub fn replace(&mut self, text: &str) {
        self.replace_with(text, &BufferConfig::default());
    }

    /// Replaces the whole line, expanding tabs per `config`.
    pub fn replace_with(&mut self, text: &str, config: &BufferConfig) {
        self.text = expand_tabs(text, config.tab_width).into();
        self.modified = true;
    }

    /// Returns the length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the code unit at `offset`.
    pub fn at(&self, offset: usize) -> Result<u16> {
        self.text.at(offset)
    }

    /// Inserts a single code unit at `position`.
    pub fn insert_char(&mut self, position: usize, value: u16) -> Result<()> {
        self.text.insert(position, value)?;
        self.modified = true;
        Ok(())
    }

    /// Inserts text at `position`. Tabs are inserted verbatim.
    pub fn insert_str(&mut self, position: usize, text: &str) -> Result<()> {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.text.insert_slice(position, &units)?;
        if !units.is_empty() {
            self.modified = true;
        }
        Ok(())
    }

    /// Erases `count` code units starting at `position`.
    pub fn erase(&mut self, position: usize, count: usize) -> Result<()> {
        self.text.erase(position, count)?;
        if count > 0 {
            self.modified = true;
        }
        Ok(())
    }

    /// Truncates the line to `new_len` code units.
    pub fn chop(&mut self, new_len: usize) -> Result<()> {
        let old_len = self.len();
        self.text.chop(new_len)?;
        if new_len != old_len {
            self.modified = true;
        }
        Ok(())
    }

    /// Appends code units at the end of the line.
    pub fn append(&mut self, values: &[u16]) {
        self.text.append(values);
        if !values.is_empty() {
            self.modified = true;
        }
    }

    /// Appends text at the end of the line. Tabs are appended verbatim.
    pub fn append_str(&mut self, text: &str) {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.append(&units);
    }

    /// Returns the line as UTF-8, moving the focus to the end of the line.
    ///
    /// Use [`Line::value`] when an edit position held elsewhere must survive.
    pub fn materialize(&mut self) -> String {
        let mut units = Vec::with_capacity(self.len());
        self.text.flatten_into(&mut units);
        String::from_utf16_lossy(&units)
    }

    /// Returns the line as UTF-8 without moving the focus.
    pub fn value(&self) -> String {
        String::from_utf16_lossy(&self.text.to_vec())
    }

    /// Returns the raw code units without moving the focus.
    pub fn to_utf16(&self) -> Vec<u16> {
        self.text.to_vec()
    }

    pub fn indentation(&self) -> u16 {
        self.indentation
    }

    pub fn set_indentation(&mut self, indentation: u16) {
        self.indentation = indentation;
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn set_tokens(&mut self, tokens: Vec<Token>) {
        self.tokens = tokens;
    }

    /// Returns true if the text changed since creation or the last persist.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn clear_modified(&mut self) {
        self.modified = false;
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Self::from_str(text)
    }
}

fn expand_tabs(text: &str, tab_width: usize) -> Vec<u16> {
    let mut units = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        if unit == TAB {
            units.extend(std::iter::repeat(SPACE).take(tab_width));
        } else {
            units.push(unit);
        }
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(line: &mut Line, expected: &str) {
        assert_eq!(line.materialize(), expected);
        assert_eq!(line.len(), expected.encode_utf16().count());
    }

    #[test]
    fn test_insert_char() {
        let mut line = Line::new();
        check(&mut line, "");
        line.insert_char(0, 'f' as u16).unwrap();
        line.insert_char(1, 'o' as u16).unwrap();
        line.insert_char(2, 'o' as u16).unwrap();
        check(&mut line, "foo");
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn test_erase() {
        let mut line = Line::from_str("foobar");
        line.erase(3, 3).unwrap();
        check(&mut line, "foo");
        line.erase(0, 0).unwrap();
        check(&mut line, "foo");
        line.erase(0, 3).unwrap();
        check(&mut line, "");
    }

    #[test]
    fn test_chop() {
        let mut line = Line::from_str("foobar");
        line.chop(3).unwrap();
        check(&mut line, "foo");
        line.chop(0).unwrap();
        check(&mut line, "");
        assert!(line.chop(1).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_append() {
        let mut line = Line::new();
        line.append(&[b'f' as u16, b'o' as u16, b'o' as u16]);
        check(&mut line, "foo");
        line.append_str("bar");
        check(&mut line, "foobar");
    }

    #[test]
    fn test_replace() {
        let mut line = Line::from_str("foobar");
        line.replace("lol");
        check(&mut line, "lol");
        line.replace("\tx");
        check(&mut line, "    x");
    }

    #[test]
    fn test_tab_expansion() {
        let line = Line::from_str("a\tb");
        assert_eq!(line.len(), 6);
        assert_eq!(line.value(), "a    b");

        let config = BufferConfig::new().with_tab_width(2);
        assert_eq!(Line::from_str_with("\t\t", &config).value(), "    ");
        let config = BufferConfig::new().with_tab_width(0);
        assert_eq!(Line::from_str_with("a\tb", &config).value(), "ab");
    }

    #[test]
    fn test_insert_str_keeps_tabs() {
        let mut line = Line::from_str("ac");
        line.insert_str(1, "\tb").unwrap();
        assert_eq!(line.value(), "a\tbc");
        assert!(line.insert_str(9, "x").unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_value_is_non_destructive() {
        let mut line = Line::from_str("hello");
        line.insert_char(2, 'X' as u16).unwrap();
        let first = line.value();
        let second = line.value();
        assert_eq!(first, second);
        assert_eq!(first, "heXllo");
        // the focus stays after the inserted character
        line.insert_char(3, 'Y' as u16).unwrap();
        assert_eq!(line.value(), "heXYllo");
        assert_eq!(line.materialize(), "heXYllo");
    }

    #[test]
    fn test_non_ascii_round_trip() {
        let mut line = Line::from_str("naïve 🦀");
        assert_eq!(line.len(), "naïve 🦀".encode_utf16().count());
        assert_eq!(line.materialize(), "naïve 🦀");
        assert_eq!(Line::from_bytes(b"caf\xc3\xa9", &BufferConfig::default()).value(), "café");
    }

    #[test]
    fn test_modified_tracking() {
        let mut line = Line::from_str("abc");
        assert!(!line.is_modified());
        line.erase(0, 0).unwrap();
        line.chop(3).unwrap();
        line.append(&[]);
        line.append_str("");
        line.insert_str(0, "").unwrap();
        line.insert_str(3, "").unwrap();
        line.set_indentation(2);
        line.set_tokens(vec![Token { start: 0, len: 1, kind: 3 }]);
        assert!(!line.is_modified());
        assert_eq!(line.indentation(), 2);
        assert_eq!(line.tokens().len(), 1);

        line.insert_char(0, 'x' as u16).unwrap();
        assert!(line.is_modified());
        line.clear_modified();
        assert!(!line.is_modified());
    }
}
