// Grid engine properties over the public API

use hexgrid::app::Session;
use hexgrid::buffer::Document;
use hexgrid::grid::{
    AddressingModel, GridError, GridLayout, GridPosition, GridRenderer, LayoutConstants, Nibble, apply_nibble,
    hex_format, search,
};

/// Deterministic test data of varying lengths (covers empty, short last line, exact lines)
fn sample_buffers() -> Vec<Vec<u8>> {
    [0usize, 1, 7, 8, 9, 15, 16, 17, 31, 32, 33, 100]
        .iter()
        .map(|&len| (0..len).map(|i| (i as u8).wrapping_mul(37).wrapping_add(11)).collect())
        .collect()
}

#[test]
fn test_position_round_trip() {
    let renderer = GridRenderer::default();
    let model = AddressingModel::default();

    for data in sample_buffers() {
        let hex = renderer.render_full(&data).hex;
        for i in 0..data.len() {
            for nibble in [Nibble::High, Nibble::Low] {
                let position = GridPosition::new(i, nibble);
                let offset = model.text_offset_from_position(position);
                assert_eq!(
                    model.position_from_text_offset(&hex, offset),
                    Some(position),
                    "len={} index={} {:?}",
                    data.len(),
                    i,
                    nibble
                );
            }
        }
    }
}

#[test]
fn test_every_offset_maps_to_at_most_one_cell() {
    let renderer = GridRenderer::default();
    let model = AddressingModel::default();
    let data: Vec<u8> = (0..40).collect();
    let hex = renderer.render_full(&data).hex;

    let mut hits = 0;
    for offset in 0..hex.len() + 4 {
        if let Some(position) = model.position_from_text_offset(&hex, offset) {
            assert!(position.byte_index < data.len());
            assert_eq!(model.text_offset_from_position(position), offset);
            hits += 1;
        }
    }
    assert_eq!(hits, data.len() * 2);
}

#[test]
fn test_incremental_matches_full_render() {
    let renderer = GridRenderer::default();

    for mut data in sample_buffers() {
        for i in 0..data.len() {
            let mut text = renderer.render_full(&data);
            data[i] = data[i].wrapping_add(0x5D);
            let spans = renderer.render_byte_span(&data, i).unwrap();
            text.apply_byte(&spans);
            assert_eq!(text, renderer.render_full(&data), "len={} index={}", data.len(), i);
        }
    }
}

#[test]
fn test_edit_spans_match_full_render() {
    let renderer = GridRenderer::default();
    let mut data: Vec<u8> = (0..50).collect();
    let mut text = renderer.render_full(&data);

    for (i, digit) in "0123456789abcdefABCDEF".chars().enumerate() {
        let position = GridPosition::new(i * 2, if i % 2 == 0 { Nibble::High } else { Nibble::Low });
        let edit = apply_nibble(&renderer, &mut data, position, digit).unwrap();
        text.apply_byte(&edit.spans);
    }
    assert_eq!(text, renderer.render_full(&data));
}

#[test]
fn test_apply_nibble_idempotent() {
    let renderer = GridRenderer::default();
    for data in sample_buffers().into_iter().filter(|d| !d.is_empty()) {
        for nibble in [Nibble::High, Nibble::Low] {
            for digit in ['0', '7', 'a', 'F'] {
                let position = GridPosition::new(data.len() / 2, nibble);
                let mut once = data.clone();
                let mut twice = data.clone();
                apply_nibble(&renderer, &mut once, position, digit).unwrap();
                apply_nibble(&renderer, &mut twice, position, digit).unwrap();
                apply_nibble(&renderer, &mut twice, position, digit).unwrap();
                assert_eq!(once, twice);
            }
        }
    }
}

#[test]
fn test_parse_known_inputs() {
    assert_eq!(hex_format::parse(" DE AD BE EF ").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(hex_format::parse("ABC"), Err(GridError::MalformedLength { digits: 3 }));
    assert_eq!(hex_format::parse("ZZ"), Err(GridError::InvalidDigit { index: 0, ch: 'Z' }));
}

#[test]
fn test_find_known_inputs() {
    let buf = [0x48, 0x65, 0x6C, 0x6C, 0x6F];
    assert_eq!(search::find(&buf, &[0x6C, 0x6C]), Some(2));
    assert_eq!(search::find(&buf, &[]), Some(0));
    assert_eq!(search::find(&[], &[0x01]), None);
}

#[test]
fn test_boundaries() {
    let layout = GridLayout::STANDARD;
    assert_eq!(layout.column_of(7), 21);
    assert_eq!(layout.column_of(8), 25);

    let model = AddressingModel::default();
    let len = 10;
    assert_eq!(model.next_position(GridPosition::low(len - 1), len), None);
}

#[test]
fn test_hello_world_hex_text() {
    let data = [0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x20, 0x57, 0x6F, 0x72, 0x6C, 0x64, 0x21];
    let text = GridRenderer::default().render_full(&data);
    assert!(text.hex.starts_with("48 65 6C 6C 6F 20 57 6F  72 6C 64 21"));
    assert!(text.offsets.starts_with("00000000\n"));
    assert!(text.ascii.starts_with("Hello World!"));
}

#[test]
fn test_custom_layout_round_trip() {
    let layout = GridLayout::new(LayoutConstants {
        bytes_per_line: 8,
        mid_line_gap_after: 4,
    })
    .unwrap();
    let renderer = GridRenderer::new(layout);
    let model = AddressingModel::new(layout);
    let data: Vec<u8> = (0..21).collect();
    let text = renderer.render_full(&data);

    assert!(text.hex.starts_with("00 01 02 03  04 05 06 07 \n08"));
    for i in 0..data.len() {
        let position = GridPosition::low(i);
        let offset = model.text_offset_from_position(position);
        assert_eq!(model.position_from_text_offset(&text.hex, offset), Some(position));
    }
}

#[test]
fn test_session_search_then_edit() {
    let mut session = Session::new(Document::from_bytes(b"Hello World!".to_vec()));
    assert_eq!(session.find("57 6F"), Ok(Some(6)));
    session.input_hex('7').unwrap();
    session.input_hex('7').unwrap();
    assert_eq!(session.document().data(), b"Hello world!");
    assert!(session.document().is_modified());

    let fresh = GridRenderer::default().render_full(session.document().data());
    assert_eq!(session.grid(), &fresh);
}

#[test]
fn test_session_edit_at_end_keeps_caret() {
    let mut session = Session::new(Document::from_bytes(vec![0xFF; 17]));
    session.goto_byte(16).unwrap();
    for digit in "0123".chars() {
        session.input_hex(digit).unwrap();
    }
    assert_eq!(session.document().data()[16], 0x03);
    assert_eq!(session.caret_position(), Some(GridPosition::low(16)));
}
