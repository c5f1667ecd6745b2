//! Byte offset → line number lookup
//!
//! [`LineIndex`] records the offset of every `\n` in the source. Line `i`
//! (0-based) is terminated by the newline at `offsets[i]`; the final line is
//! whatever follows the last newline and may be empty.

use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    offsets: Vec<usize>,
    source_len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let offsets = source
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| i)
            .collect();

        Self {
            offsets,
            source_len: source.len(),
        }
    }

    /// Number of recorded newlines.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Number of logical lines, counting the (possibly empty) last one.
    pub fn line_count(&self) -> usize {
        self.offsets.len() + 1
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Line owning `offset`. A newline belongs to the line it terminates.
    ///
    /// Valid for every offset in `0..=source.len()`.
    pub fn line_of(&self, offset: usize) -> usize {
        debug_assert!(
            offset <= self.source_len,
            "offset {} past end of source ({})",
            offset,
            self.source_len
        );
        let offset = offset.min(self.source_len);
        self.offsets.partition_point(|&newline| newline < offset)
    }

    /// Byte offset of `offset` from the start of its line.
    pub fn column_of(&self, offset: usize) -> usize {
        let line = self.line_of(offset);
        offset.min(self.source_len) - self.line_start(line)
    }

    /// Byte range of `line`, excluding its terminating newline.
    pub fn line_span(&self, line: usize) -> Option<Range<usize>> {
        if line >= self.line_count() {
            return None;
        }
        let end = self.offsets.get(line).copied().unwrap_or(self.source_len);
        Some(self.line_start(line)..end)
    }

    /// Text of `line` without its line terminator (`\n` or `\r\n`).
    pub fn line_text<'s>(&self, source: &'s str, line: usize) -> Option<&'s str> {
        let span = self.line_span(line)?;
        let text = source.get(span)?;
        Some(text.strip_suffix('\r').unwrap_or(text))
    }

    fn line_start(&self, line: usize) -> usize {
        match line {
            0 => 0,
            n => self.offsets[n - 1] + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source() {
        let index = LineIndex::new("");
        assert!(index.is_empty());
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_text("", 0), Some(""));
        assert_eq!(index.line_text("", 1), None);
    }

    #[test]
    fn test_offsets_are_newlines() {
        let source = "a\nbc\n\nd";
        let index = LineIndex::new(source);
        assert_eq!(index.offsets(), &[1, 4, 5]);
        assert_eq!(index.line_count(), 4);
    }

    #[test]
    fn test_line_of_boundaries() {
        let source = "// comment\nint x;";
        let index = LineIndex::new(source);
        assert_eq!(index.line_of(0), 0);
        // The newline itself still belongs to line 0.
        assert_eq!(index.line_of(10), 0);
        assert_eq!(index.line_of(11), 1);
        assert_eq!(index.line_of(source.find('x').unwrap()), 1);
        assert_eq!(index.line_of(source.len()), 1);
    }

    #[test]
    fn test_line_of_is_monotonic() {
        let source = "one\n\ntwo\nthree\n";
        let index = LineIndex::new(source);
        let mut last = 0;
        for offset in 0..=source.len() {
            let line = index.line_of(offset);
            assert!(line >= last);
            last = line;
        }
        assert_eq!(last, 4);
    }

    #[test]
    fn test_line_text() {
        let source = "first\r\nsecond\n\nlast";
        let index = LineIndex::new(source);
        assert_eq!(index.line_text(source, 0), Some("first"));
        assert_eq!(index.line_text(source, 1), Some("second"));
        assert_eq!(index.line_text(source, 2), Some(""));
        assert_eq!(index.line_text(source, 3), Some("last"));
        assert_eq!(index.line_text(source, 4), None);
    }

    #[test]
    fn test_trailing_newline_leaves_empty_last_line() {
        let source = "x\n";
        let index = LineIndex::new(source);
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_text(source, 1), Some(""));
        assert_eq!(index.line_of(2), 1);
    }

    #[test]
    fn test_column_of() {
        let source = "ab\ncde";
        let index = LineIndex::new(source);
        assert_eq!(index.column_of(0), 0);
        assert_eq!(index.column_of(2), 2);
        assert_eq!(index.column_of(3), 0);
        assert_eq!(index.column_of(5), 2);
    }
}
