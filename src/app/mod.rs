mod session;
mod state;

pub use session::{Session, ViewAnchor};
pub use state::App;

use crossterm::event::KeyCode;

/// プレフィックスキー状態（Emacs 2ストローク用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixKey {
    #[default]
    None,
    /// C-x を押した状態
    CtrlX,
}

/// アプリケーションアクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Save,
    SaveAs,

    // カーソル移動（ニブル単位）
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    PageUp,
    PageDown,
    GotoBeginning, // M-< バッファ先頭
    GotoEnd,       // M-> 最終バイト

    // 編集
    InputHex(char),

    // 検索・ジャンプ
    StartSearch, // C-s: 検索プロンプト
    SearchNext,  // F3: 次を検索
    StartGoto,   // M-g: オフセット入力

    // プレフィックスキー
    EnterCtrlX, // C-x を押した
    Cancel,     // C-g でキャンセル

    None,
}

/// キー修飾子
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMod {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Action {
    /// キーコードからアクションに変換（Emacsキーバインド）
    pub fn from_key(key: KeyCode, mods: KeyMod) -> Self {
        let KeyMod { ctrl, alt, .. } = mods;

        match (key, ctrl, alt) {
            // C-x: プレフィックスキーモードへ
            (KeyCode::Char('x'), true, false) => Action::EnterCtrlX,

            // C-g: キャンセル
            (KeyCode::Char('g'), true, false) => Action::Cancel,
            (KeyCode::Esc, _, _) => Action::Cancel,

            // === Emacsカーソル移動 ===
            (KeyCode::Char('f'), true, false) => Action::CursorRight,
            (KeyCode::Char('b'), true, false) => Action::CursorLeft,
            (KeyCode::Char('n'), true, false) => Action::CursorDown,
            (KeyCode::Char('p'), true, false) => Action::CursorUp,
            (KeyCode::Char('a'), true, false) => Action::CursorHome,
            (KeyCode::Char('e'), true, false) => Action::CursorEnd,
            (KeyCode::Char('v'), true, false) => Action::PageDown,
            (KeyCode::Char('v'), false, true) => Action::PageUp,
            (KeyCode::Char('<'), false, true) => Action::GotoBeginning,
            (KeyCode::Char('>'), false, true) => Action::GotoEnd,

            (KeyCode::Up, false, false) => Action::CursorUp,
            (KeyCode::Down, false, false) => Action::CursorDown,
            (KeyCode::Left, false, false) => Action::CursorLeft,
            (KeyCode::Right, false, false) => Action::CursorRight,
            (KeyCode::Home, _, _) => Action::CursorHome,
            (KeyCode::End, _, _) => Action::CursorEnd,
            (KeyCode::PageUp, _, _) => Action::PageUp,
            (KeyCode::PageDown, _, _) => Action::PageDown,

            // 検索: C-s、次を検索: F3
            (KeyCode::Char('s'), true, false) => Action::StartSearch,
            (KeyCode::F(3), false, false) => Action::SearchNext,

            // M-g: オフセットへジャンプ
            (KeyCode::Char('g'), false, true) => Action::StartGoto,

            _ => Action::None,
        }
    }

    /// C-x の後のキーを処理
    pub fn from_key_after_ctrl_x(key: KeyCode, mods: KeyMod) -> Self {
        match (key, mods.ctrl) {
            // C-x C-c: 終了
            (KeyCode::Char('c'), true) => Action::Quit,
            // C-x C-s: 保存
            (KeyCode::Char('s'), true) => Action::Save,
            // C-x C-w: 名前を付けて保存
            (KeyCode::Char('w'), true) => Action::SaveAs,
            // その他は無効
            _ => Action::Cancel,
        }
    }
}
