use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

use tracing::{info, warn};

use super::BufferError;
use crate::grid::{GridError, GridPosition, GridRenderer, NibbleEdit, apply_nibble};

/// バイナリドキュメントを表す構造体
///
/// 長さは読み込み時に固定され、編集はニブル単位の上書きのみ
#[derive(Debug, Default)]
pub struct Document {
    /// ファイルパス
    path: Option<PathBuf>,
    /// バッファデータ
    data: Vec<u8>,
    /// 変更フラグ
    modified: bool,
    /// 読み取り専用フラグ
    readonly: bool,
}

impl Document {
    /// 空のドキュメントを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// バイト列から作成
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// ファイルから読み込み
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, BufferError> {
        let path = path.into();
        let mut file = File::open(&path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        info!(path = %path.display(), bytes = data.len(), "loaded");

        Ok(Self {
            path: Some(path),
            data,
            ..Self::default()
        })
    }

    /// ファイルに保存
    pub fn save(&mut self) -> Result<(), BufferError> {
        let Some(ref path) = self.path else {
            return Err(BufferError::NoPath);
        };
        let mut file = File::create(path)?;
        file.write_all(&self.data)?;
        self.modified = false;
        info!(path = %path.display(), bytes = self.data.len(), "saved");
        Ok(())
    }

    /// 別名で保存
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), BufferError> {
        self.path = Some(path.into());
        self.save()
    }

    /// ニブルを書き換えて変更フラグを立てる
    ///
    /// 読み取り専用の場合はバッファに触れずに `ReadOnly` を返す
    pub fn apply_nibble(
        &mut self,
        renderer: &GridRenderer,
        position: GridPosition,
        digit: char,
    ) -> Result<NibbleEdit, GridError> {
        if self.readonly {
            warn!(index = position.byte_index, "edit rejected: read-only");
            return Err(GridError::ReadOnly);
        }
        let edit = apply_nibble(renderer, &mut self.data, position, digit)?;
        self.modified = true;
        Ok(edit)
    }

    /// データの長さを取得
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// データが空かどうか
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 変更されているかどうか
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// 読み取り専用かどうか
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// 読み取り専用フラグを設定
    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    /// ファイルパスを取得
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// ファイル名を取得
    pub fn filename(&self) -> Option<&str> {
        self.path.as_ref().and_then(|p| p.file_name()).and_then(|s| s.to_str())
    }

    /// 生データへの参照を取得
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
