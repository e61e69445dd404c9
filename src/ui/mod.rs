//! 端末描画（ratatui）

mod grid_view;

pub use grid_view::GridView;

use ratatui::style::Color;

/// 表示色
pub struct Colors;

impl Colors {
    pub const HEADER: Color = Color::Cyan;
    pub const ADDR: Color = Color::DarkGray;
    pub const HEX_ZERO: Color = Color::DarkGray;
    pub const HEX_HIGH: Color = Color::Yellow;
    pub const HEX_PRINTABLE: Color = Color::Green;
    pub const HEX_NORMAL: Color = Color::White;
    pub const ASCII_NORMAL: Color = Color::Gray;
    pub const CURSOR: Color = Color::Black;
    pub const CURSOR_BG: Color = Color::White;
    /// 編集対象でない方のニブル・ASCIIペインの対応文字
    pub const CELL_BG: Color = Color::DarkGray;
}
