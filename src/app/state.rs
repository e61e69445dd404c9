use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
};
use tracing::{debug, warn};

use super::{Action, KeyMod, PrefixKey, Session};
use crate::buffer::Document;
use crate::grid::{GridError, hex_format};
use crate::ui::GridView;

/// プロンプト入力モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    #[default]
    Off,
    /// 検索パターン（HEX）入力中
    Find,
    /// ジャンプ先オフセット（HEX）入力中
    GotoOffset,
    /// 保存先パス入力中
    SaveAs,
}

/// アプリケーション状態
pub struct App {
    /// 編集セッション
    session: Session,
    /// 表示可能な行数
    visible_rows: usize,
    /// プレフィックスキー状態（C-x等）
    prefix_key: PrefixKey,
    /// プロンプト入力モード
    prompt_mode: PromptMode,
    /// プロンプト入力内容
    prompt_input: String,
    /// 未保存終了の確認中
    confirm_quit: bool,
    /// 保存先入力後に終了する
    quit_after_save: bool,
    /// 終了フラグ
    should_quit: bool,
    /// ステータスメッセージ
    status_message: Option<String>,
}

impl App {
    /// 新しいアプリケーションを作成
    pub fn new() -> Self {
        Self {
            session: Session::default(),
            visible_rows: 24,
            prefix_key: PrefixKey::None,
            prompt_mode: PromptMode::Off,
            prompt_input: String::new(),
            confirm_quit: false,
            quit_after_save: false,
            should_quit: false,
            status_message: None,
        }
    }

    /// ファイルを開く
    pub fn open(&mut self, path: impl Into<PathBuf>, readonly: bool) -> Result<()> {
        let path = path.into();
        let mut document = Document::open(&path)?;
        document.set_readonly(readonly);
        self.status_message = Some(format!("Loaded: {} ({} bytes)", path.display(), document.len()));
        self.session.load(document);
        Ok(())
    }

    /// バイト列から読み込み（標準入力用）
    pub fn load_bytes(&mut self, data: Vec<u8>, readonly: bool) {
        let mut document = Document::from_bytes(data);
        document.set_readonly(readonly);
        self.session.load(document);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 終了すべきかどうか
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// ファイル名を取得
    pub fn filename(&self) -> Option<&str> {
        self.session.document().filename()
    }

    /// 変更されているかどうか
    pub fn is_modified(&self) -> bool {
        self.session.document().is_modified()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// 表示可能行数を設定
    pub fn set_visible_rows(&mut self, rows: usize) {
        // ステータスバーとヘッダー分
        self.visible_rows = rows.saturating_sub(2).max(1);
    }

    /// キー入力文字をHEX桁に正規化（全角→半角）
    /// HEX桁以外はNoneを返す
    fn normalize_hex_char(ch: char) -> Option<char> {
        let cp = ch as u32;
        // 全角英数記号（U+FF01〜U+FF5E）を半角に
        let ch = if (0xFF01..=0xFF5E).contains(&cp) {
            char::from_u32(cp - 0xFF00 + 0x20).unwrap_or(ch)
        } else {
            ch
        };
        hex_format::is_hex_digit(ch).then_some(ch)
    }

    /// HEX入力処理
    fn input_hex(&mut self, ch: char) {
        let Some(digit) = Self::normalize_hex_char(ch) else {
            return;
        };
        match self.session.input_hex(digit) {
            Ok(_) => {}
            Err(GridError::ReadOnly) => {
                self.status_message = Some("Buffer is read-only".to_string());
            }
            // セル外・範囲外は何もしない
            Err(e) => debug!(error = %e, "edit ignored"),
        }
    }

    /// 検索を実行
    fn find(&mut self, query: &str) {
        match self.session.find(query) {
            Ok(Some(pos)) => {
                self.status_message = Some(format!("Found at offset: 0x{:X}", pos));
            }
            Ok(None) => {
                self.status_message = Some("Not found".to_string());
            }
            Err(e) => {
                self.status_message = Some(format!("Invalid hex string: {}", e));
            }
        }
    }

    /// 前回のパターンで次を検索
    fn find_next(&mut self) {
        let Some(pattern) = self.session.last_pattern() else {
            self.status_message = Some("No previous search".to_string());
            return;
        };
        let pattern = hex_format::encode(pattern);
        self.status_message = Some(match self.session.find_next() {
            Some(pos) => format!("Found {} at offset: 0x{:X}", pattern, pos),
            None => "Not found".to_string(),
        });
    }

    /// オフセットへジャンプ
    fn goto_offset(&mut self, input: &str) {
        let addr = match hex_format::parse_address(input) {
            Ok(addr) => addr,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };
        match self.session.goto_byte(addr) {
            Ok(()) => self.status_message = Some(format!("Jumped to {:08X}", addr)),
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    /// 保存（パス未設定なら保存先を尋ねる）
    fn save(&mut self) {
        if self.session.document().path().is_none() {
            self.start_prompt(PromptMode::SaveAs);
            return;
        }
        match self.session.save() {
            Ok(()) => {
                self.status_message = Some(format!("Saved {}", self.filename().unwrap_or("")));
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                self.status_message = Some(format!("Save failed: {}", e));
            }
        }
    }

    /// 名前を付けて保存
    fn save_as(&mut self, input: &str) {
        let path = input.trim();
        if path.is_empty() {
            self.quit_after_save = false;
            self.status_message = Some("No file name given".to_string());
            return;
        }
        match self.session.save_as(path) {
            Ok(()) => {
                self.status_message = Some(format!("Saved {}", path));
                if std::mem::take(&mut self.quit_after_save) {
                    self.should_quit = true;
                }
            }
            Err(e) => {
                warn!(error = %e, path, "save failed");
                self.quit_after_save = false;
                self.status_message = Some(format!("Save failed: {}", e));
            }
        }
    }

    fn start_prompt(&mut self, mode: PromptMode) {
        self.prompt_mode = mode;
        self.prompt_input.clear();
    }

    /// アクションを実行
    pub fn execute(&mut self, action: Action) {
        // ステータスメッセージをクリア（C-x 待ちを除く）
        if !matches!(action, Action::EnterCtrlX) {
            self.status_message = None;
        }

        match action {
            Action::Quit => {
                if self.is_modified() {
                    self.confirm_quit = true;
                } else {
                    self.should_quit = true;
                }
            }
            Action::Save => self.save(),
            Action::SaveAs => self.start_prompt(PromptMode::SaveAs),
            Action::CursorUp => {
                self.session.move_up();
            }
            Action::CursorDown => {
                self.session.move_down();
            }
            Action::CursorLeft => {
                self.session.move_left();
            }
            Action::CursorRight => {
                self.session.move_right();
            }
            Action::CursorHome => {
                self.session.move_line_start();
            }
            Action::CursorEnd => {
                self.session.move_line_end();
            }
            Action::PageUp => {
                self.session.page_up(self.visible_rows);
            }
            Action::PageDown => {
                self.session.page_down(self.visible_rows);
            }
            Action::GotoBeginning => {
                self.session.goto_start();
            }
            Action::GotoEnd => {
                self.session.goto_end();
            }
            Action::InputHex(ch) => self.input_hex(ch),
            Action::StartSearch => self.start_prompt(PromptMode::Find),
            Action::SearchNext => self.find_next(),
            Action::StartGoto => self.start_prompt(PromptMode::GotoOffset),
            Action::EnterCtrlX => {
                self.prefix_key = PrefixKey::CtrlX;
                self.status_message = Some("C-x-".to_string());
            }
            Action::Cancel => {
                self.prefix_key = PrefixKey::None;
                self.status_message = Some("Quit".to_string());
            }
            Action::None => {}
        }

        self.session.ensure_caret_visible(self.visible_rows);
    }

    /// イベントを処理
    pub fn handle_event(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                // ペーストイベント（プロンプト入力中のみ受け付ける）
                Event::Paste(content) => {
                    if self.prompt_mode != PromptMode::Off {
                        self.prompt_input.push_str(&content);
                    }
                }
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
                // その他のイベントは無視
                _ => {}
            }
        }
        Ok(())
    }

    /// キー入力を処理
    pub fn handle_key(&mut self, key: KeyEvent) {
        // 確認モード中は特別な処理
        if self.confirm_quit {
            self.handle_confirm_key(key);
            return;
        }

        // プロンプトモード中は特別な処理
        if self.prompt_mode != PromptMode::Off {
            self.handle_prompt_key(key);
            return;
        }

        let mods = KeyMod {
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            shift: key.modifiers.contains(KeyModifiers::SHIFT),
            alt: key.modifiers.contains(KeyModifiers::ALT),
        };

        // プレフィックスキー状態に応じて処理を分岐
        let action = match self.prefix_key {
            PrefixKey::None => Action::from_key(key.code, mods),
            PrefixKey::CtrlX => {
                self.prefix_key = PrefixKey::None;
                Action::from_key_after_ctrl_x(key.code, mods)
            }
        };

        if action != Action::None {
            self.execute(action);
        } else if let KeyCode::Char(ch) = key.code {
            // 修飾キーがなければHEX入力
            if !mods.ctrl && !mods.alt {
                self.execute(Action::InputHex(ch));
            }
        }
    }

    /// プロンプト入力中のキー処理
    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.cancel_prompt(),
            KeyCode::Char('g') if ctrl => self.cancel_prompt(),
            // C-s を空のプロンプトで押すと前回の検索を繰り返す
            KeyCode::Char('s') if ctrl && self.prompt_mode == PromptMode::Find => {
                if self.prompt_input.trim().is_empty() {
                    self.prompt_mode = PromptMode::Off;
                    self.execute(Action::SearchNext);
                }
            }
            KeyCode::Enter => self.execute_prompt(),
            KeyCode::Backspace => {
                self.prompt_input.pop();
            }
            KeyCode::Char(ch) if !ctrl => self.prompt_input.push(ch),
            _ => {}
        }
    }

    fn cancel_prompt(&mut self) {
        self.prompt_mode = PromptMode::Off;
        self.quit_after_save = false;
        self.prompt_input.clear();
        self.status_message = Some("Quit".to_string());
    }

    /// プロンプトの内容を実行
    fn execute_prompt(&mut self) {
        let mode = std::mem::take(&mut self.prompt_mode);
        let input = std::mem::take(&mut self.prompt_input);
        self.status_message = None;
        match mode {
            PromptMode::Find => self.find(&input),
            PromptMode::GotoOffset => self.goto_offset(&input),
            PromptMode::SaveAs => self.save_as(&input),
            PromptMode::Off => {}
        }
        self.session.ensure_caret_visible(self.visible_rows);
    }

    /// 確認中のキー処理（y: 保存して終了 / n: 破棄して終了 / c: キャンセル）
    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.confirm_quit = false;
                self.save();
                if self.prompt_mode == PromptMode::SaveAs {
                    // 保存先の入力が終わってから終了
                    self.quit_after_save = true;
                } else if !self.is_modified() {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.confirm_quit = false;
                self.should_quit = true;
            }
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Esc => {
                self.confirm_quit = false;
                self.status_message = Some("Quit".to_string());
            }
            KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.confirm_quit = false;
                self.status_message = Some("Quit".to_string());
            }
            _ => {}
        }
    }

    /// ステータス行の文字列
    fn status_line(&self) -> String {
        let document = self.session.document();
        let filename = document.filename().unwrap_or("[New]");
        let modified = if document.is_modified() { "[+]" } else { "" };
        let readonly = if document.is_readonly() { " [RO]" } else { "" };

        match self.prompt_mode {
            PromptMode::Find => return format!("Find hex: {}_", self.prompt_input),
            PromptMode::GotoOffset => return format!("Go to offset (hex): {}_", self.prompt_input),
            PromptMode::SaveAs => return format!("Write file: {}_", self.prompt_input),
            PromptMode::Off => {}
        }
        if self.confirm_quit {
            return "Save changes? (y)es (n)o (c)ancel".to_string();
        }
        if let Some(ref msg) = self.status_message {
            return format!(" {}{}{} | {}", filename, modified, readonly, msg);
        }

        let cursor = self
            .session
            .caret_position()
            .map_or(0, |p| p.byte_index);
        format!(
            " {}{}{} | {:08X}/{:08X}",
            filename,
            modified,
            readonly,
            cursor,
            document.len(),
        )
    }

    /// UIを描画
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();
        self.set_visible_rows(size.height as usize);
        self.session.ensure_caret_visible(self.visible_rows);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // メイン
                Constraint::Length(1), // ステータス
            ])
            .split(size);

        let grid_view = GridView::new(self.session.grid(), self.session.document().data())
            .layout(*self.session.layout())
            .top_line(self.session.top_line())
            .caret(self.session.caret_position());
        frame.render_widget(grid_view, layout[0]);

        let status_widget =
            Paragraph::new(self.status_line()).style(Style::default().bg(Color::DarkGray).fg(Color::White));
        frame.render_widget(status_widget, layout[1]);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
