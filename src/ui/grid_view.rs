use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::Colors;
use crate::grid::layout::ADDRESS_WIDTH;
use crate::grid::{GridLayout, GridPosition, GridText, Nibble};

/// アドレス列とHEX列の間の空白
const PANE_GAP: u16 = 2;

/// 3ペイン（アドレス / HEX / ASCII）表示ウィジェット
///
/// 描画済みのペインテキストをそのまま行単位で切り出して表示する
pub struct GridView<'a> {
    /// 描画済みテキスト
    text: &'a GridText,
    /// 色分け用の元データ
    data: &'a [u8],
    layout: GridLayout,
    /// 表示先頭行
    top_line: usize,
    /// キャレット位置
    caret: Option<GridPosition>,
}

impl<'a> GridView<'a> {
    pub fn new(text: &'a GridText, data: &'a [u8]) -> Self {
        Self {
            text,
            data,
            layout: GridLayout::STANDARD,
            top_line: 0,
            caret: None,
        }
    }

    pub fn layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn top_line(mut self, line: usize) -> Self {
        self.top_line = line;
        self
    }

    pub fn caret(mut self, caret: Option<GridPosition>) -> Self {
        self.caret = caret;
        self
    }

    /// バイト値に応じた色を取得
    fn byte_style(byte: u8) -> Style {
        let color = match byte {
            0x00 => Colors::HEX_ZERO,
            0xFF => Colors::HEX_HIGH,
            0x20..=0x7E => Colors::HEX_PRINTABLE,
            _ => Colors::HEX_NORMAL,
        };
        Style::default().fg(color)
    }

    fn hex_x(&self, area: Rect) -> u16 {
        area.x + ADDRESS_WIDTH as u16 + PANE_GAP
    }

    fn ascii_x(&self, area: Rect) -> u16 {
        // HEX行（改行を除く）+ 1桁
        self.hex_x(area) + self.layout.hex_line_text_length() as u16
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Colors::HEADER).add_modifier(Modifier::BOLD);
        buf.set_string(area.x, area.y, "Offset", style);

        let hex_x = self.hex_x(area);
        for i in 0..self.layout.bytes_per_line() {
            let x = hex_x + self.layout.column_of(i) as u16;
            if x >= area.right() {
                break;
            }
            buf.set_string(x, area.y, format!("{:02X}", i), style);
        }

        let ascii_x = self.ascii_x(area);
        if ascii_x < area.right() {
            buf.set_string(ascii_x, area.y, "ASCII", style);
        }
    }

    /// 1行分を描画
    fn render_line(&self, line: usize, y: u16, area: Rect, buf: &mut Buffer) {
        let bytes_per_line = self.layout.bytes_per_line();
        let row_start = line * bytes_per_line;
        let row_len = bytes_per_line.min(self.data.len() - row_start);

        // アドレス
        let addr_start = line * self.layout.offset_line_text_length();
        if let Some(addr) = self.text.offsets.get(addr_start..addr_start + ADDRESS_WIDTH) {
            buf.set_string(area.x, y, addr, Style::default().fg(Colors::ADDR));
        }

        // HEX（セル単位で色分け）
        let hex_x = self.hex_x(area);
        let line_start = self.layout.hex_line_start(line);
        for i in 0..row_len {
            let column = self.layout.column_of(i);
            let x = hex_x + column as u16;
            if x + 1 >= area.right() {
                break;
            }
            let Some(cell) = self.text.hex.get(line_start + column..line_start + column + 2) else {
                break;
            };
            let index = row_start + i;
            let style = Self::byte_style(self.data[index]);

            match self.caret {
                Some(caret) if caret.byte_index == index => {
                    let cursor = Style::default().fg(Colors::CURSOR).bg(Colors::CURSOR_BG);
                    let other = style.bg(Colors::CELL_BG);
                    let (high, low) = cell.split_at(1);
                    let (high_style, low_style) = match caret.nibble {
                        Nibble::High => (cursor, other),
                        Nibble::Low => (other, cursor),
                    };
                    buf.set_string(x, y, high, high_style);
                    buf.set_string(x + 1, y, low, low_style);
                }
                _ => {
                    buf.set_string(x, y, cell, style);
                }
            }
        }

        // ASCII
        let ascii_x = self.ascii_x(area);
        if ascii_x >= area.right() {
            return;
        }
        let ascii_start = self.layout.ascii_line_start(line);
        if let Some(chars) = self.text.ascii.get(ascii_start..ascii_start + row_len) {
            buf.set_string(ascii_x, y, chars, Style::default().fg(Colors::ASCII_NORMAL));
        }
        if let Some(caret) = self.caret {
            let offset = caret.byte_index.wrapping_sub(row_start);
            if offset < row_len && ascii_x + (offset as u16) < area.right() {
                if let Some(ch) = self.text.ascii.get(ascii_start + offset..ascii_start + offset + 1) {
                    buf.set_string(
                        ascii_x + offset as u16,
                        y,
                        ch,
                        Style::default().fg(Colors::CURSOR).bg(Colors::CELL_BG),
                    );
                }
            }
        }
    }
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        self.render_header(area, buf);

        let line_count = self.layout.line_count(self.data.len());
        let visible_rows = (area.height as usize).saturating_sub(1); // ヘッダー分を引く
        for row in 0..visible_rows {
            let line = self.top_line + row;
            if line >= line_count {
                break;
            }
            self.render_line(line, area.y + 1 + row as u16, area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridRenderer;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
    }

    #[test]
    fn renders_three_panes() {
        let data = b"Hello World!".to_vec();
        let text = GridRenderer::default().render_full(&data);
        let area = Rect::new(0, 0, 80, 3);
        let mut buf = Buffer::empty(area);
        GridView::new(&text, &data)
            .caret(Some(GridPosition::high(0)))
            .render(area, &mut buf);

        let header = row_text(&buf, 0);
        assert!(header.starts_with("Offset"));
        assert!(header.contains("07  08"));

        let row = row_text(&buf, 1);
        assert!(row.starts_with("00000000  48 65 6C 6C 6F 20 57 6F  72 6C 64 21"));
        assert!(row.contains("Hello World!"));
        assert_eq!(buf[(10, 1)].bg, Colors::CURSOR_BG);
    }

    #[test]
    fn skips_lines_past_end() {
        let data = vec![0u8; 20];
        let text = GridRenderer::default().render_full(&data);
        let area = Rect::new(0, 0, 80, 5);
        let mut buf = Buffer::empty(area);
        GridView::new(&text, &data).top_line(1).render(area, &mut buf);

        assert!(row_text(&buf, 1).starts_with("00000010  00 00 00 00"));
        assert_eq!(row_text(&buf, 2).trim(), "");
    }
}
