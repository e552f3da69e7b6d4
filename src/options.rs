use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::emitter::HistoryMode;
use crate::error::{Error, Result};

pub const DEFAULT_PAGE_DIR: &str = "src/pages";

/// プラグインの設定
///
/// JSON の部分的なオブジェクトを受け取り、指定のないキーは既定値で埋める。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// ページが置かれたディレクトリ (プロジェクトルートからの相対パス)
    pub page_dir: PathBuf,
    /// ルーターの履歴モード
    pub history: HistoryMode,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            page_dir: PathBuf::from(DEFAULT_PAGE_DIR),
            history: HistoryMode::default(),
        }
    }
}

impl Options {
    /// JSON の設定ファイルを読み込む
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&raw).map_err(|source| Error::Options {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_page_dir(mut self, page_dir: impl Into<PathBuf>) -> Self {
        self.page_dir = page_dir.into();
        self
    }

    pub fn with_history(mut self, history: HistoryMode) -> Self {
        self.history = history;
        self
    }
}
