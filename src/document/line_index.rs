//! Byte offset <-> LSP position conversion.
//!
//! LSP positions are 0-based lines with UTF-16 character offsets; the syntax
//! tree works in byte offsets.

use lsp_types::{Position, Range};

#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Convert a byte offset to a position. Offsets past the end clamp to the end.
    pub fn position(&self, source: &str, offset: usize) -> Position {
        let offset = clamp_to_char_boundary(source, offset.min(self.len));
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        let character: u32 = source[line_start..offset]
            .chars()
            .map(|c| c.len_utf16() as u32)
            .sum();
        Position::new(line as u32, character)
    }

    /// Convert a position to a byte offset. Characters past the line end clamp to it.
    pub fn offset(&self, source: &str, position: Position) -> Option<usize> {
        let line_start = *self.line_starts.get(position.line as usize)?;
        let line_end = self
            .line_starts
            .get(position.line as usize + 1)
            .map(|next| next - 1)
            .unwrap_or(self.len);
        let line_text = &source[line_start..line_end];

        let mut utf16 = 0u32;
        for (byte_offset, c) in line_text.char_indices() {
            if utf16 >= position.character {
                return Some(line_start + byte_offset);
            }
            utf16 += c.len_utf16() as u32;
        }
        Some(line_end)
    }

    pub fn range(&self, source: &str, start: usize, end: usize) -> Range {
        Range::new(self.position(source, start), self.position(source, end))
    }
}

fn clamp_to_char_boundary(source: &str, mut offset: usize) -> usize {
    while offset > 0 && !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
