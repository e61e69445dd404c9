//! Conversion between raw hex pane text offsets and byte/nibble positions.

use super::{GridError, GridLayout, GridPosition, Nibble};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressingModel {
    layout: GridLayout,
}

impl AddressingModel {
    pub const fn new(layout: GridLayout) -> Self {
        Self { layout }
    }

    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Resolve a caret offset in the hex pane text to the cell under it.
    ///
    /// Returns `None` on separators, the mid-line gap, newlines, padding of a
    /// short last line, and anything at or past the end of the text.
    pub fn position_from_text_offset(&self, hex_text: &str, raw_offset: usize) -> Option<GridPosition> {
        let bytes = hex_text.as_bytes();
        if raw_offset >= bytes.len() {
            return None;
        }

        let mut line = 0;
        let mut line_start = 0;
        for (i, &b) in bytes[..raw_offset].iter().enumerate() {
            if b == b'\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        let col = raw_offset - line_start;

        (0..self.layout.bytes_per_line()).find_map(|i| {
            let cell = self.layout.column_of(i);
            let nibble = if col == cell {
                Nibble::High
            } else if col == cell + 1 {
                Nibble::Low
            } else {
                return None;
            };

            // パディング（短い最終行）はセルとして扱わない
            let digit = *bytes.get(line_start + cell + nibble.column_offset())?;
            if !digit.is_ascii_hexdigit() {
                return None;
            }

            Some(GridPosition::new(line * self.layout.bytes_per_line() + i, nibble))
        })
    }

    /// Like [`Self::position_from_text_offset`] but as an error for callers that
    /// need to propagate "no cell here"
    pub fn resolve(&self, hex_text: &str, raw_offset: usize) -> Result<GridPosition, GridError> {
        self.position_from_text_offset(hex_text, raw_offset)
            .ok_or(GridError::PositionNotFound { offset: raw_offset })
    }

    /// Hex pane offset of the first character of `line`
    pub const fn line_start(&self, line: usize) -> usize {
        self.layout.hex_line_start(line)
    }

    /// Caret offset in the hex pane for a cell position
    pub const fn text_offset_from_position(&self, position: GridPosition) -> usize {
        let line = self.layout.line_of(position.byte_index);
        let byte_in_line = self.layout.byte_in_line(position.byte_index);
        self.line_start(line) + self.layout.column_of(byte_in_line) + position.nibble.column_offset()
    }

    /// Caret position after typing one digit at `position`.
    ///
    /// High moves to Low of the same byte, Low moves to High of the next byte.
    /// No wraparound: `None` once the buffer end is passed.
    pub fn next_position(&self, position: GridPosition, buffer_len: usize) -> Option<GridPosition> {
        let next = match position.nibble {
            Nibble::High => GridPosition::low(position.byte_index),
            Nibble::Low => GridPosition::high(position.byte_index.checked_add(1)?),
        };
        (next.byte_index < buffer_len).then_some(next)
    }

    /// Inverse of [`Self::next_position`]; `None` before the first digit
    pub fn previous_position(&self, position: GridPosition, buffer_len: usize) -> Option<GridPosition> {
        if position.byte_index >= buffer_len {
            return None;
        }
        match position.nibble {
            Nibble::Low => Some(GridPosition::high(position.byte_index)),
            Nibble::High => position.byte_index.checked_sub(1).map(GridPosition::low),
        }
    }

    /// Same nibble one display line up
    pub fn position_above(&self, position: GridPosition, buffer_len: usize) -> Option<GridPosition> {
        if position.byte_index >= buffer_len {
            return None;
        }
        let index = position.byte_index.checked_sub(self.layout.bytes_per_line())?;
        Some(GridPosition::new(index, position.nibble))
    }

    /// Same nibble one display line down
    pub fn position_below(&self, position: GridPosition, buffer_len: usize) -> Option<GridPosition> {
        let index = position.byte_index.checked_add(self.layout.bytes_per_line())?;
        (index < buffer_len).then_some(GridPosition::new(index, position.nibble))
    }

    /// Cell for `nibble` of byte `byte_index`, checked against the buffer
    pub fn position_of_byte(
        &self,
        byte_index: usize,
        nibble: Nibble,
        buffer_len: usize,
    ) -> Result<GridPosition, GridError> {
        if byte_index >= buffer_len {
            return Err(GridError::OutOfRange {
                index: byte_index,
                len: buffer_len,
            });
        }
        Ok(GridPosition::new(byte_index, nibble))
    }

    /// Caret offset for placing the cursor on byte `byte_index` (high nibble)
    pub fn goto_byte_offset(&self, byte_index: usize, buffer_len: usize) -> Result<usize, GridError> {
        if byte_index >= buffer_len {
            return Err(GridError::OutOfRange {
                index: byte_index,
                len: buffer_len,
            });
        }
        Ok(self.text_offset_from_position(GridPosition::high(byte_index)))
    }
}
