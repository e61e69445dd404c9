use std::path::PathBuf;

use tracing::{debug, info};

use crate::buffer::{BufferError, Document};
use crate::grid::{
    AddressingModel, GridError, GridLayout, GridPosition, GridRenderer, GridText, Nibble, NibbleEdit,
    hex_format, search,
};

/// スクロール位置とキャレット位置（全体再描画後に復元する）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewAnchor {
    /// 先頭に表示している行
    pub top_line: usize,
    /// HEXペイン内のキャレットオフセット
    pub caret_offset: usize,
}

/// 編集セッション
///
/// ドキュメントと3ペインのテキストを保持し、キー入力を
/// 位置解決 → ニブル編集 → 部分再描画 → キャレット移動 の順に処理する。
/// 端末には依存しないので単体でテストできる。
#[derive(Debug)]
pub struct Session {
    /// 編集中のドキュメント
    document: Document,
    addressing: AddressingModel,
    renderer: GridRenderer,
    /// 描画済みのペインテキスト
    grid: GridText,
    /// HEXペイン内のキャレットオフセット
    caret: usize,
    /// 表示先頭行
    top_line: usize,
    /// 前回の検索パターン（次を検索用）
    last_pattern: Option<Vec<u8>>,
}

impl Session {
    pub fn new(document: Document) -> Self {
        Self::with_layout(document, GridLayout::STANDARD)
    }

    pub fn with_layout(document: Document, layout: GridLayout) -> Self {
        let renderer = GridRenderer::new(layout);
        let grid = renderer.render_full(document.data());
        Self {
            document,
            addressing: AddressingModel::new(layout),
            renderer,
            grid,
            caret: 0,
            top_line: 0,
            last_pattern: None,
        }
    }

    /// ドキュメントを差し替えて全体を再描画
    pub fn load(&mut self, document: Document) {
        info!(bytes = document.len(), "buffer loaded");
        self.grid = self.renderer.render_full(document.data());
        self.document = document;
        self.caret = 0;
        self.top_line = 0;
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn grid(&self) -> &GridText {
        &self.grid
    }

    pub fn layout(&self) -> &GridLayout {
        self.addressing.layout()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn anchor(&self) -> ViewAnchor {
        ViewAnchor {
            top_line: self.top_line,
            caret_offset: self.caret,
        }
    }

    /// キャレット下のセル
    pub fn caret_position(&self) -> Option<GridPosition> {
        self.addressing.position_from_text_offset(&self.grid.hex, self.caret)
    }

    /// HEX入力: キャレット位置のニブルを書き換える
    pub fn input_hex(&mut self, digit: char) -> Result<NibbleEdit, GridError> {
        let position = self.addressing.resolve(&self.grid.hex, self.caret)?;
        let edit = self.document.apply_nibble(&self.renderer, position, digit)?;
        self.grid.apply_byte(&edit.spans);
        // 末尾ではキャレットは動かない
        if let Some(next) = edit.next {
            self.caret = self.addressing.text_offset_from_position(next);
        }
        Ok(edit)
    }

    /// HEX文字列を検索して最初の一致位置へ移動
    pub fn find(&mut self, query: &str) -> Result<Option<usize>, GridError> {
        let pattern = hex_format::parse(query)?;
        let found = search::find(self.document.data(), &pattern);
        self.last_pattern = Some(pattern);
        self.jump_to_match(found);
        Ok(found)
    }

    /// 前回のパターンでキャレットの次のバイトから検索（末尾まで無ければ先頭から）
    pub fn find_next(&mut self) -> Option<usize> {
        let pattern = self.last_pattern.as_deref()?;
        let data = self.document.data();
        let start = self.caret_position().map_or(0, |p| p.byte_index + 1);

        // 空パターンはバッファ末尾の次には一致させない
        let found = search::find_from(data, pattern, start)
            .filter(|&pos| pos < data.len() || data.is_empty())
            .or_else(|| search::find(data, pattern).filter(|&pos| pos < start));
        self.jump_to_match(found);
        found
    }

    pub fn last_pattern(&self) -> Option<&[u8]> {
        self.last_pattern.as_deref()
    }

    fn jump_to_match(&mut self, found: Option<usize>) {
        match found {
            Some(pos) => {
                info!(offset = pos, "pattern found");
                // 空バッファで空パターンが一致した場合は移動先がない
                if let Err(e) = self.goto_byte(pos) {
                    debug!(error = %e, "match not reachable");
                }
            }
            None => debug!("pattern not found"),
        }
    }

    /// 指定バイトの上位ニブルへ移動し、その行を先頭に表示
    pub fn goto_byte(&mut self, byte_index: usize) -> Result<(), GridError> {
        self.caret = self.addressing.goto_byte_offset(byte_index, self.document.len())?;
        self.top_line = self.layout().line_of(byte_index);
        debug!(byte_index, caret = self.caret, "goto");
        Ok(())
    }

    fn move_to(&mut self, target: Option<GridPosition>) -> bool {
        match target {
            Some(position) => {
                self.caret = self.addressing.text_offset_from_position(position);
                true
            }
            None => false,
        }
    }

    /// 次のニブルへ
    pub fn move_right(&mut self) -> bool {
        let len = self.document.len();
        let target = self
            .caret_position()
            .and_then(|p| self.addressing.next_position(p, len));
        self.move_to(target)
    }

    /// 前のニブルへ
    pub fn move_left(&mut self) -> bool {
        let len = self.document.len();
        let target = self
            .caret_position()
            .and_then(|p| self.addressing.previous_position(p, len));
        self.move_to(target)
    }

    pub fn move_up(&mut self) -> bool {
        let len = self.document.len();
        let target = self
            .caret_position()
            .and_then(|p| self.addressing.position_above(p, len));
        self.move_to(target)
    }

    pub fn move_down(&mut self) -> bool {
        let len = self.document.len();
        let target = self
            .caret_position()
            .and_then(|p| self.addressing.position_below(p, len));
        self.move_to(target)
    }

    /// 行頭バイトの上位ニブルへ
    pub fn move_line_start(&mut self) -> bool {
        let bytes_per_line = self.layout().bytes_per_line();
        let len = self.document.len();
        let target = self.caret_position().and_then(|p| {
            let line_start = p.byte_index - p.byte_index % bytes_per_line;
            self.addressing.position_of_byte(line_start, Nibble::High, len).ok()
        });
        self.move_to(target)
    }

    /// 行末バイトの下位ニブルへ（短い最終行では最終バイト）
    pub fn move_line_end(&mut self) -> bool {
        let bytes_per_line = self.layout().bytes_per_line();
        let len = self.document.len();
        let target = self.caret_position().and_then(|p| {
            let line_end = p.byte_index - p.byte_index % bytes_per_line + bytes_per_line - 1;
            self.addressing
                .position_of_byte(line_end.min(len.saturating_sub(1)), Nibble::Low, len)
                .ok()
        });
        self.move_to(target)
    }

    /// `rows` 行分上へ（先頭で止まる）
    pub fn page_up(&mut self, rows: usize) -> bool {
        let step = rows.max(1) * self.layout().bytes_per_line();
        let len = self.document.len();
        let target = self.caret_position().and_then(|p| {
            self.addressing
                .position_of_byte(p.byte_index.saturating_sub(step), p.nibble, len)
                .ok()
        });
        self.top_line = self.top_line.saturating_sub(rows.max(1));
        self.move_to(target)
    }

    /// `rows` 行分下へ（最終バイトで止まる）
    pub fn page_down(&mut self, rows: usize) -> bool {
        let step = rows.max(1) * self.layout().bytes_per_line();
        let len = self.document.len();
        let target = self.caret_position().and_then(|p| {
            let index = p.byte_index.saturating_add(step).min(len.saturating_sub(1));
            self.addressing.position_of_byte(index, p.nibble, len).ok()
        });
        self.move_to(target)
    }

    /// 先頭バイトへ（空バッファでは何もしない）
    pub fn goto_start(&mut self) -> bool {
        self.goto_byte(0).is_ok()
    }

    pub fn goto_end(&mut self) -> bool {
        match self.document.len().checked_sub(1) {
            Some(last) => self.goto_byte(last).is_ok(),
            None => false,
        }
    }

    /// キャレット行が表示範囲に入るようにスクロール
    pub fn ensure_caret_visible(&mut self, visible_rows: usize) {
        let rows = visible_rows.max(1);
        let line = self.caret / self.layout().hex_line_text_length();
        let last_line = self.layout().line_count(self.document.len()).saturating_sub(1);

        if line < self.top_line {
            self.top_line = line;
        } else if line >= self.top_line + rows {
            self.top_line = line + 1 - rows;
        }
        self.top_line = self.top_line.min(last_line);
    }

    /// 全体を再描画し、スクロール位置とキャレットを復元
    pub fn refresh(&mut self) {
        let anchor = self.anchor();
        self.grid = self.renderer.render_full(self.document.data());
        self.restore(anchor);
    }

    /// アンカーを復元（キャレットはテキスト長以内の場合のみ）
    pub fn restore(&mut self, anchor: ViewAnchor) {
        let last_line = self.layout().line_count(self.document.len()).saturating_sub(1);
        self.top_line = anchor.top_line.min(last_line);
        if anchor.caret_offset <= self.grid.hex.len() {
            self.caret = anchor.caret_offset;
        }
    }

    pub fn save(&mut self) -> Result<(), BufferError> {
        self.document.save()
    }

    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), BufferError> {
        self.document.save_as(path)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Document::new())
    }
}
