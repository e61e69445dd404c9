//! Nibble editing.

use tracing::debug;

use super::hex_format::digit_value;
use super::{AddressingModel, ByteSpans, GridError, GridPosition, GridRenderer, Nibble};

/// Result of one nibble edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NibbleEdit {
    pub position: GridPosition,
    pub old_value: u8,
    pub new_value: u8,
    /// Cells to redraw instead of reformatting the whole buffer
    pub spans: ByteSpans,
    /// Where the caret goes next; `None` at the end of the buffer (caret stays)
    pub next: Option<GridPosition>,
}

/// Replace one nibble of `data[position.byte_index]` with `digit`.
///
/// Input is validated before the buffer is touched. The other nibble is kept.
pub fn apply_nibble(
    renderer: &GridRenderer,
    data: &mut [u8],
    position: GridPosition,
    digit: char,
) -> Result<NibbleEdit, GridError> {
    let value = digit_value(digit).ok_or(GridError::InvalidDigit { index: 0, ch: digit })?;
    let len = data.len();
    let old_value = *data.get(position.byte_index).ok_or(GridError::OutOfRange {
        index: position.byte_index,
        len,
    })?;

    let new_value = match position.nibble {
        Nibble::High => (value << 4) | (old_value & 0x0F),
        Nibble::Low => (old_value & 0xF0) | value,
    };
    data[position.byte_index] = new_value;
    debug!(
        index = position.byte_index,
        nibble = ?position.nibble,
        old = old_value,
        new = new_value,
        "nibble edit"
    );

    let spans = renderer
        .render_byte_span(data, position.byte_index)
        .ok_or(GridError::OutOfRange {
            index: position.byte_index,
            len,
        })?;
    let next = AddressingModel::new(*renderer.layout()).next_position(position, len);

    Ok(NibbleEdit {
        position,
        old_value,
        new_value,
        spans,
        next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pane;

    fn edit(data: &mut [u8], position: GridPosition, digit: char) -> Result<NibbleEdit, GridError> {
        apply_nibble(&GridRenderer::default(), data, position, digit)
    }

    #[test]
    fn high_nibble_keeps_low() {
        let mut data = [0x12, 0x34];
        let e = edit(&mut data, GridPosition::high(1), 'a').unwrap();
        assert_eq!(data, [0x12, 0xA4]);
        assert_eq!((e.old_value, e.new_value), (0x34, 0xA4));
        assert_eq!(e.next, Some(GridPosition::low(1)));
    }

    #[test]
    fn low_nibble_keeps_high() {
        let mut data = [0x12, 0x34];
        let e = edit(&mut data, GridPosition::low(0), 'F').unwrap();
        assert_eq!(data, [0x1F, 0x34]);
        assert_eq!(e.next, Some(GridPosition::high(1)));
    }

    #[test]
    fn spans_cover_one_cell_per_pane() {
        let mut data = vec![0u8; 20];
        let e = edit(&mut data, GridPosition::high(17), '4').unwrap();
        assert_eq!(e.spans.hex.pane, Pane::Hex);
        assert_eq!((e.spans.hex.start, e.spans.hex.len), (53, 2));
        assert_eq!(e.spans.hex.text, "40");
        assert_eq!(e.spans.ascii.pane, Pane::Ascii);
        assert_eq!((e.spans.ascii.start, e.spans.ascii.len), (18, 1));
        assert_eq!(e.spans.ascii.text, "@");
    }

    #[test]
    fn last_nibble_has_no_next() {
        let mut data = [0u8; 3];
        let e = edit(&mut data, GridPosition::low(2), '1').unwrap();
        assert_eq!(e.next, None);
    }

    #[test]
    fn same_digit_twice_is_idempotent() {
        let mut once = [0x5Au8; 4];
        let mut twice = once;
        edit(&mut once, GridPosition::high(2), 'c').unwrap();
        edit(&mut twice, GridPosition::high(2), 'c').unwrap();
        let e = edit(&mut twice, GridPosition::high(2), 'c').unwrap();
        assert_eq!(once, twice);
        assert_eq!(e.old_value, e.new_value);
    }

    #[test]
    fn invalid_digit_leaves_buffer_untouched() {
        let mut data = [0x12u8];
        assert_eq!(
            edit(&mut data, GridPosition::high(0), 'g'),
            Err(GridError::InvalidDigit { index: 0, ch: 'g' })
        );
        assert_eq!(data, [0x12]);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut data = [0u8; 2];
        assert_eq!(
            edit(&mut data, GridPosition::high(2), '1'),
            Err(GridError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            edit(&mut [], GridPosition::low(0), '1'),
            Err(GridError::OutOfRange { index: 0, len: 0 })
        );
    }
}
