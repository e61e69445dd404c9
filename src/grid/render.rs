//! Text rendering of the address, hex and ascii panes.

use std::fmt::Write as _;

use super::{GridLayout, Pane, RenderSpan};

/// The three pane texts, rendered in lockstep (one line per `bytes_per_line` bytes)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridText {
    pub offsets: String,
    pub hex: String,
    pub ascii: String,
}

impl GridText {
    /// Patch one pane in place.
    ///
    /// Spans outside the current text are ignored (the caller re-renders in full
    /// after a buffer reload anyway).
    pub fn apply(&mut self, span: &RenderSpan) {
        let text = match span.pane {
            Pane::Address => &mut self.offsets,
            Pane::Hex => &mut self.hex,
            Pane::Ascii => &mut self.ascii,
        };
        let range = span.range();
        if range.end <= text.len() && text.is_char_boundary(range.start) && text.is_char_boundary(range.end) {
            text.replace_range(range, &span.text);
        }
    }

    /// Apply both cell updates for one byte
    pub fn apply_byte(&mut self, spans: &ByteSpans) {
        self.apply(&spans.hex);
        self.apply(&spans.ascii);
    }
}

/// Hex and ascii cell updates for a single byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteSpans {
    pub hex: RenderSpan,
    pub ascii: RenderSpan,
}

/// Display character for the ascii pane
pub fn ascii_char(byte: u8) -> char {
    if (32..=126).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridRenderer {
    layout: GridLayout,
}

impl GridRenderer {
    pub const fn new(layout: GridLayout) -> Self {
        Self { layout }
    }

    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Render all three panes. O(n): only for loads and full reformats.
    pub fn render_full(&self, data: &[u8]) -> GridText {
        let bytes_per_line = self.layout.bytes_per_line();
        let lines = self.layout.line_count(data.len());

        let mut offsets = String::with_capacity(lines * self.layout.offset_line_text_length());
        let mut hex = String::with_capacity(lines * self.layout.hex_line_text_length());
        let mut ascii = String::with_capacity(lines * self.layout.ascii_line_text_length());

        for (line, chunk) in data.chunks(bytes_per_line).enumerate() {
            let _ = writeln!(offsets, "{:08X}", line * bytes_per_line);

            for j in 0..bytes_per_line {
                match chunk.get(j) {
                    Some(byte) => {
                        let _ = write!(hex, "{:02X} ", byte);
                    }
                    None => hex.push_str("   "),
                }
                if j + 1 == self.layout.mid_line_gap_after() {
                    hex.push(' ');
                }
            }
            hex.push('\n');

            ascii.extend(chunk.iter().map(|&b| ascii_char(b)));
            ascii.push('\n');
        }

        GridText { offsets, hex, ascii }
    }

    /// Recompute the hex and ascii cells of one byte.
    ///
    /// Returns `None` when `byte_index` is outside `data`.
    pub fn render_byte_span(&self, data: &[u8], byte_index: usize) -> Option<ByteSpans> {
        let byte = *data.get(byte_index)?;
        let line = self.layout.line_of(byte_index);
        let byte_in_line = self.layout.byte_in_line(byte_index);

        let hex = RenderSpan {
            pane: Pane::Hex,
            start: self.layout.hex_line_start(line) + self.layout.column_of(byte_in_line),
            len: 2,
            text: format!("{:02X}", byte),
        };
        let ascii = RenderSpan {
            pane: Pane::Ascii,
            start: self.layout.ascii_line_start(line) + byte_in_line,
            len: 1,
            text: ascii_char(byte).to_string(),
        };
        Some(ByteSpans { hex, ascii })
    }
}
