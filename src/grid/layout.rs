//! Grid layout arithmetic.
//!
//! Hex pane line: `XX ` per byte, one extra space after the gap byte, then `\n`.
//! A short last line is padded with spaces so every hex line has the same length.
//! Ascii pane line: one character per byte, then `\n`.
//! Address pane line: `%08X`, then `\n`.

use super::GridError;

/// Width of an address column entry
pub const ADDRESS_WIDTH: usize = 8;

/// Per-line geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConstants {
    pub bytes_per_line: usize,
    /// One extra separator column is inserted before byte `mid_line_gap_after`
    pub mid_line_gap_after: usize,
}

impl LayoutConstants {
    pub const STANDARD: Self = Self {
        bytes_per_line: 16,
        mid_line_gap_after: 8,
    };
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Pure mapping between byte indices and grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    constants: LayoutConstants,
}

impl GridLayout {
    pub const STANDARD: Self = Self {
        constants: LayoutConstants::STANDARD,
    };

    pub fn new(constants: LayoutConstants) -> Result<Self, GridError> {
        let LayoutConstants {
            bytes_per_line,
            mid_line_gap_after,
        } = constants;
        if bytes_per_line == 0 || mid_line_gap_after == 0 || mid_line_gap_after >= bytes_per_line {
            return Err(GridError::InvalidLayout {
                bytes_per_line,
                mid_line_gap_after,
            });
        }
        Ok(Self { constants })
    }

    pub const fn constants(&self) -> LayoutConstants {
        self.constants
    }

    pub const fn bytes_per_line(&self) -> usize {
        self.constants.bytes_per_line
    }

    pub const fn mid_line_gap_after(&self) -> usize {
        self.constants.mid_line_gap_after
    }

    /// Hex pane column of the first digit of byte `byte_in_line`
    pub const fn column_of(&self, byte_in_line: usize) -> usize {
        let gap = if byte_in_line >= self.constants.mid_line_gap_after {
            1
        } else {
            0
        };
        byte_in_line * 3 + gap
    }

    pub const fn line_of(&self, byte_index: usize) -> usize {
        byte_index / self.constants.bytes_per_line
    }

    pub const fn byte_in_line(&self, byte_index: usize) -> usize {
        byte_index % self.constants.bytes_per_line
    }

    /// Number of display lines for a buffer of `len` bytes
    pub const fn line_count(&self, len: usize) -> usize {
        len.div_ceil(self.constants.bytes_per_line)
    }

    /// 3 columns per byte + mid-line gap + newline
    pub const fn hex_line_text_length(&self) -> usize {
        self.constants.bytes_per_line * 3 + 1 + 1
    }

    /// 1 column per byte + newline
    pub const fn ascii_line_text_length(&self) -> usize {
        self.constants.bytes_per_line + 1
    }

    /// Fixed-width address + newline
    pub const fn offset_line_text_length(&self) -> usize {
        ADDRESS_WIDTH + 1
    }

    /// Hex pane offset of the first character of `line`
    pub const fn hex_line_start(&self, line: usize) -> usize {
        line * self.hex_line_text_length()
    }

    /// Ascii pane offset of the first character of `line`
    pub const fn ascii_line_start(&self, line: usize) -> usize {
        line * self.ascii_line_text_length()
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_applies_from_byte_eight() {
        let layout = GridLayout::STANDARD;
        assert_eq!(layout.column_of(0), 0);
        assert_eq!(layout.column_of(7), 21);
        assert_eq!(layout.column_of(8), 25);
        assert_eq!(layout.column_of(15), 46);
    }

    #[test]
    fn line_lengths_agree_with_columns() {
        let layout = GridLayout::STANDARD;
        assert_eq!(layout.hex_line_text_length(), 50);
        assert_eq!(layout.ascii_line_text_length(), 17);
        assert_eq!(layout.offset_line_text_length(), 9);
        // 最終バイトのセル + 区切り + 改行で行末
        let last = layout.column_of(layout.bytes_per_line() - 1);
        assert_eq!(last + 2 + 1 + 1, layout.hex_line_text_length());
    }

    #[test]
    fn line_and_byte_in_line() {
        let layout = GridLayout::STANDARD;
        assert_eq!(layout.line_of(0), 0);
        assert_eq!(layout.line_of(15), 0);
        assert_eq!(layout.line_of(16), 1);
        assert_eq!(layout.byte_in_line(17), 1);
        assert_eq!(layout.line_count(0), 0);
        assert_eq!(layout.line_count(16), 1);
        assert_eq!(layout.line_count(17), 2);
    }

    #[test]
    fn custom_layout_is_consistent() {
        let layout = GridLayout::new(LayoutConstants {
            bytes_per_line: 8,
            mid_line_gap_after: 4,
        })
        .unwrap();
        assert_eq!(layout.column_of(3), 9);
        assert_eq!(layout.column_of(4), 13);
        assert_eq!(layout.hex_line_text_length(), 26);
        let last = layout.column_of(7);
        assert_eq!(last + 4, layout.hex_line_text_length());
    }

    #[test]
    fn rejects_inconsistent_constants() {
        for (bytes_per_line, mid_line_gap_after) in [(0, 0), (16, 0), (16, 16), (4, 9)] {
            let err = GridLayout::new(LayoutConstants {
                bytes_per_line,
                mid_line_gap_after,
            })
            .unwrap_err();
            assert!(matches!(err, GridError::InvalidLayout { .. }));
        }
    }
}
