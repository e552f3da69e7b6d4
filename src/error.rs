use std::path::PathBuf;
use thiserror::Error;

/// ルート生成とエントリ変換で発生しうるエラー
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("page directory not found: {path}")]
    PageDirMissing { path: PathBuf },

    /// サイドカーの `*.meta.json` が壊れている (ビルド全体を止める)
    #[error("invalid route metadata in {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid options file {path}: {source}")]
    Options {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Parse error in file {file} (line {line}): {message}")]
    Parse {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("failed to emit code for {file}: {source}")]
    Emit {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bootstrap call `createApp(App)` not found in {file}")]
    BootstrapNotFound { file: PathBuf },

    /// 仮想モジュール以外から `router` が束縛されていて、import を注入できない
    #[error("`router` is already declared in {file} and does not come from the routes module")]
    RouterBindingConflict { file: PathBuf },

    #[error("routes were already generated for this build session")]
    AlreadyResolved,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
