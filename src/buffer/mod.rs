//! ファイルI/Oとセッション所有のバイトバッファ

mod document;

pub use document::Document;

use thiserror::Error;

/// ドキュメント操作のエラー
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 保存先パスが未設定（標準入力から読み込んだバッファ等）
    #[error("No file path set")]
    NoPath,
}
