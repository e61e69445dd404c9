//! Grid engine: the mapping between a flat byte buffer and the three text panes
//! (address, hex, ascii), nibble editing, incremental re-rendering and byte search.
//!
//! Everything here is synchronous and display-free. A caller owns the buffer and
//! the pane texts; the engine only computes positions, text and byte mutations.

pub mod addressing;
pub mod edit;
pub mod hex_format;
pub mod layout;
pub mod render;
pub mod search;

pub use addressing::AddressingModel;
pub use edit::{NibbleEdit, apply_nibble};
pub use layout::{GridLayout, LayoutConstants};
pub use render::{ByteSpans, GridRenderer, GridText};

use thiserror::Error;

/// Engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Odd number of hex digits after whitespace removal
    #[error("Hex string must have even length ({digits} digits)")]
    MalformedLength { digits: usize },

    /// Non-hex character (index counts characters after whitespace removal)
    #[error("Invalid hex character: '{ch}' at position {index}")]
    InvalidDigit { index: usize, ch: char },

    /// Text offset does not land on a byte/nibble cell
    #[error("No byte cell at text offset {offset}")]
    PositionNotFound { offset: usize },

    /// Byte index outside the current buffer
    #[error("Offset 0x{index:X} is outside the buffer (length 0x{len:X})")]
    OutOfRange { index: usize, len: usize },

    /// Go-to input that is not a hexadecimal address
    #[error("Invalid hexadecimal offset: {0:?}")]
    InvalidAddress(String),

    /// Layout constants that cannot produce a consistent grid
    #[error("Invalid layout: {bytes_per_line} bytes per line, gap after {mid_line_gap_after}")]
    InvalidLayout {
        bytes_per_line: usize,
        mid_line_gap_after: usize,
    },

    /// Edit attempted on a read-only document
    #[error("Buffer is read-only")]
    ReadOnly,
}

/// Which half of a byte a cell position refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nibble {
    /// Most significant 4 bits (first digit)
    High,
    /// Least significant 4 bits (second digit)
    Low,
}

impl Nibble {
    /// Column offset of this digit inside a 2-character hex cell
    pub const fn column_offset(self) -> usize {
        match self {
            Nibble::High => 0,
            Nibble::Low => 1,
        }
    }
}

/// A byte/nibble position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub byte_index: usize,
    pub nibble: Nibble,
}

impl GridPosition {
    pub const fn new(byte_index: usize, nibble: Nibble) -> Self {
        Self { byte_index, nibble }
    }

    pub const fn high(byte_index: usize) -> Self {
        Self::new(byte_index, Nibble::High)
    }

    pub const fn low(byte_index: usize) -> Self {
        Self::new(byte_index, Nibble::Low)
    }
}

/// One of the three text panes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Address,
    Hex,
    Ascii,
}

/// A fixed-width text replacement inside one pane.
///
/// Always covers a single cell (2 characters in the hex pane, 1 in the ascii
/// pane) and never crosses a line boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSpan {
    pub pane: Pane,
    pub start: usize,
    pub len: usize,
    pub text: String,
}

impl RenderSpan {
    /// Text range replaced by this span
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}
