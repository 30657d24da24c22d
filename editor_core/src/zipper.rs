//! Array zipper: an editable sequence with a movable focus.
//!
//! The elements before the focus live in `front` in logical order, the
//! elements after it live in `back` in reverse order, so the element right
//! after the focus is always `back.last()`. Inserting or deleting at the focus
//! is a push or pop. Moving the focus costs time linear in the distance moved,
//! which keeps edits clustered around one position (typing, backspacing)
//! amortized O(1). With growable vectors the storage overhead stays within
//! about twice the content size.

use crate::error::{Error, Result};

/// A focus-based editable sequence of `Copy` elements.
#[derive(Debug, Clone)]
pub struct Zipper<T> {
    /// Elements before the focus, in order.
    front: Vec<T>,
    /// Elements after the focus, reversed.
    back: Vec<T>,
}

impl<T> Default for Zipper<T> {
    fn default() -> Self {
        Self {
            front: Vec::new(),
            back: Vec::new(),
        }
    }
}

impl<T: Copy> Zipper<T> {
    /// Creates an empty zipper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }

    /// Returns true if the zipper holds no elements.
    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }

    /// Returns the current focus position.
    pub fn focus(&self) -> usize {
        self.front.len()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.front.clear();
        self.back.clear();
    }

    /// Inserts one element at `position`.
    pub fn insert(&mut self, position: usize, value: T) -> Result<()> {
        self.refocus(position)?;
        self.front.push(value);
        Ok(())
    }

    /// Inserts `values` at `position`, keeping their order.
    pub fn insert_slice(&mut self, position: usize, values: &[T]) -> Result<()> {
        self.refocus(position)?;
        self.front.extend_from_slice(values);
        Ok(())
    }

    /// Appends `values` at the end.
    pub fn append(&mut self, values: &[T]) {
        let end = self.len();
        self.refocus_unchecked(end);
        self.front.extend_from_slice(values);
    }

    /// Removes `count` elements starting at `position`.
    pub fn erase(&mut self, position: usize, count: usize) -> Result<()> {
        let end = position
            .checked_add(count)
            .ok_or_else(|| Error::out_of_range(position, self.len()))?;
        self.refocus(end)?;
        self.front.truncate(position);
        Ok(())
    }

    /// Truncates the zipper to `new_len` elements.
    pub fn chop(&mut self, new_len: usize) -> Result<()> {
        let len = self.len();
        if new_len > len {
            return Err(Error::out_of_range(new_len, len));
        }
        self.refocus_unchecked(len);
        self.front.truncate(new_len);
        Ok(())
    }

    /// Returns the element at `offset`.
    pub fn at(&self, offset: usize) -> Result<T> {
        if offset >= self.len() {
            return Err(Error::out_of_range(offset, self.len()));
        }
        let front_len = self.front.len();
        if offset < front_len {
            Ok(self.front[offset])
        } else {
            // index from the far end of back
            Ok(self.back[self.back.len() - 1 - (offset - front_len)])
        }
    }

    /// Iterates over the elements in logical order without moving the focus.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.front.iter().chain(self.back.iter().rev())
    }

    /// Appends the full contents to `out` without touching the focus.
    ///
    /// The part after the focus is copied out in reverse, so this costs an
    /// extra pass over `back` but leaves `&self` untouched.
    pub fn write_to(&self, out: &mut Vec<T>) {
        out.reserve(self.len());
        out.extend_from_slice(&self.front);
        out.extend(self.back.iter().rev().copied());
    }

    /// Moves the focus to the end, then appends the contents to `out` in one
    /// copy.
    pub fn flatten_into(&mut self, out: &mut Vec<T>) {
        let end = self.len();
        self.refocus_unchecked(end);
        out.extend_from_slice(&self.front);
    }

    /// Returns the contents as a vector without touching the focus.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        self.write_to(&mut out);
        out
    }

    /// Moves the focus to `position`.
    pub fn refocus(&mut self, position: usize) -> Result<()> {
        if position > self.len() {
            return Err(Error::out_of_range(position, self.len()));
        }
        self.refocus_unchecked(position);
        Ok(())
    }

    fn refocus_unchecked(&mut self, position: usize) {
        let current = self.front.len();
        if current > position {
            // drain yields in order, back wants the nearest element last
            let moved = self.front.drain(position..).rev();
            self.back.extend(moved);
        } else if current < position {
            let split = self.back.len() - (position - current);
            let moved = self.back.drain(split..).rev();
            self.front.extend(moved);
        }
        debug_assert_eq!(self.front.len(), position);
    }
}

impl<T: Copy + PartialEq> PartialEq for Zipper<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Copy + Eq> Eq for Zipper<T> {}

impl<T> From<Vec<T>> for Zipper<T> {
    fn from(front: Vec<T>) -> Self {
        Self {
            front,
            back: Vec::new(),
        }
    }
}

impl<T> FromIterator<T> for Zipper<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zipper(s: &str) -> Zipper<u8> {
        s.bytes().collect()
    }

    fn contents(z: &Zipper<u8>) -> String {
        String::from_utf8(z.to_vec()).unwrap()
    }

    #[test]
    fn test_new_zipper() {
        let z: Zipper<u8> = Zipper::new();
        assert!(z.is_empty());
        assert_eq!(z.len(), 0);
        assert_eq!(z.focus(), 0);
    }

    #[test]
    fn test_insert_moves_focus() {
        let mut z = zipper("held");
        z.insert(3, b'l').unwrap();
        assert_eq!(z.focus(), 4);
        z.insert(4, b'o').unwrap();
        assert_eq!(contents(&z), "hellod");
        assert_eq!(z.focus(), 5);
        z.insert(0, b'>').unwrap();
        assert_eq!(contents(&z), ">hellod");
        assert_eq!(z.focus(), 1);
    }

    #[test]
    fn test_insert_slice_and_append() {
        let mut z = zipper("ad");
        z.insert_slice(1, b"bc").unwrap();
        assert_eq!(contents(&z), "abcd");
        z.refocus(0).unwrap();
        z.append(b"ef");
        assert_eq!(contents(&z), "abcdef");
        assert_eq!(z.focus(), 6);
    }

    #[test]
    fn test_erase() {
        let mut z = zipper("foobar");
        z.erase(1, 2).unwrap();
        assert_eq!(contents(&z), "fbar");
        z.erase(0, 0).unwrap();
        assert_eq!(contents(&z), "fbar");
        z.erase(3, 1).unwrap();
        assert_eq!(contents(&z), "fba");
        z.erase(0, 3).unwrap();
        assert!(z.is_empty());
    }

    #[test]
    fn test_chop() {
        let mut z = zipper("foobar");
        z.refocus(1).unwrap();
        z.chop(3).unwrap();
        assert_eq!(contents(&z), "foo");
        z.chop(3).unwrap();
        assert_eq!(contents(&z), "foo");
        z.chop(0).unwrap();
        assert_eq!(z.len(), 0);
    }

    #[test]
    fn test_out_of_range() {
        let mut z = zipper("abc");
        assert!(z.insert(4, b'x').unwrap_err().is_out_of_range());
        assert!(z.erase(2, 2).unwrap_err().is_out_of_range());
        assert!(z.erase(usize::MAX, 2).unwrap_err().is_out_of_range());
        assert!(z.chop(4).unwrap_err().is_out_of_range());
        assert!(z.at(3).unwrap_err().is_out_of_range());
        assert!(z.refocus(4).unwrap_err().is_out_of_range());
        // failed calls leave the contents alone
        assert_eq!(contents(&z), "abc");
    }

    #[test]
    fn test_at_on_both_sides_of_focus() {
        let mut z = zipper("abcdef");
        for focus in 0..=6 {
            z.refocus(focus).unwrap();
            let seen: Vec<u8> = (0..6).map(|i| z.at(i).unwrap()).collect();
            assert_eq!(seen, b"abcdef");
        }
    }

    #[test]
    fn test_size_independent_of_refocus() {
        let mut z: Zipper<u16> = Zipper::new();
        let mut expected = 0usize;
        for i in 0..50u16 {
            let pos = (i as usize * 7) % (z.len() + 1);
            z.insert(pos, i).unwrap();
            expected += 1;
            if i % 3 == 0 {
                let pos = (i as usize * 5) % z.len();
                z.erase(pos, 1).unwrap();
                expected -= 1;
            }
            if i % 10 == 9 {
                z.append(&[1, 2, 3]);
                expected += 3;
            }
        }
        assert_eq!(z.len(), expected);
        z.chop(expected / 2).unwrap();
        assert_eq!(z.len(), expected / 2);
    }

    #[test]
    fn test_non_destructive_read() {
        let mut z = zipper("hello world");
        z.refocus(5).unwrap();

        let mut first = Vec::new();
        z.write_to(&mut first);
        let mut second = Vec::new();
        z.write_to(&mut second);
        assert_eq!(first, second);
        assert_eq!(first, b"hello world");
        assert_eq!(z.focus(), 5);
        assert_eq!(z.len(), 11);

        let mut flat = Vec::new();
        z.flatten_into(&mut flat);
        assert_eq!(flat, first);
        assert_eq!(z.focus(), 11);
    }

    #[test]
    fn test_equality_ignores_focus() {
        let mut a = zipper("abc");
        let b = zipper("abc");
        a.refocus(1).unwrap();
        assert_eq!(a, b);
        a.insert(0, b'x').unwrap();
        assert_ne!(a, b);
    }
}
