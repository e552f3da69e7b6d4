//! ビルドツール (ホスト) から呼ばれるフック
//!
//! 1. `config_resolved` でルーティングモジュールを生成してキャッシュする
//! 2. `resolve_id` / `load` で仮想モジュールとして返す
//! 3. `transform` でエントリファイル (`src/main.ts`) に router を組み込む

use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::emitter::render_routes_module;
use crate::error::{Error, Result};
use crate::model::RouteNode;
use crate::options::Options;
use crate::paths::strip_nested_separators;
use crate::scanner::build_route_tree;
use crate::transform::{VIRTUAL_MODULE_ID, transform_entry};

/// ホストのモジュール解決で使う内部 ID
pub const RESOLVED_VIRTUAL_MODULE_ID: &str = "\0virtual:convention-import-routes";

/// router を組み込むエントリファイル (プロジェクトルートからの相対パス)
pub const ENTRY_FILE: &str = "src/main.ts";

/// 1 回のビルドセッションに対応するプラグインインスタンス
///
/// 生成したモジュールのテキストはこのインスタンスが保持し、一度だけ書き込まれる。
#[derive(Debug, Default)]
pub struct ConventionRoutes {
    options: Options,
    session: OnceLock<Session>,
}

/// `config_resolved` で確定する状態
#[derive(Debug)]
struct Session {
    root: PathBuf,
    routes_module: Option<String>,
}

impl ConventionRoutes {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            session: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        "vite-plugin-vue-convention-routes"
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// 設定確定時のフック。ルーティングモジュールを生成してキャッシュする。
    pub fn config_resolved(&self, root: &Path) -> Result<()> {
        if self.session.get().is_some() {
            return Err(Error::AlreadyResolved);
        }

        let routes_module = generate_routes_module(root, &self.options)?;
        self.session
            .set(Session {
                root: root.to_path_buf(),
                routes_module,
            })
            .map_err(|_| Error::AlreadyResolved)
    }

    pub fn resolve_id(&self, id: &str) -> Option<&'static str> {
        (id == VIRTUAL_MODULE_ID).then_some(RESOLVED_VIRTUAL_MODULE_ID)
    }

    /// 仮想モジュールの中身を返す。生成前や対象外の ID なら `None`。
    pub fn load(&self, id: &str) -> Option<&str> {
        if id != RESOLVED_VIRTUAL_MODULE_ID {
            return None;
        }
        self.session.get()?.routes_module.as_deref()
    }

    /// エントリファイルだけを変換する。それ以外のファイルは `None`。
    pub fn transform(&self, code: &str, id: &str) -> Result<Option<String>> {
        let Some(session) = self.session.get() else {
            return Ok(None);
        };
        if !is_entry_file(&session.root, id) {
            return Ok(None);
        }

        transform_entry(code, Path::new(strip_query(id))).map(Some)
    }
}

/// ページディレクトリからルートツリーを作り、入れ子の `/` を整える
pub fn build_routes(root: &Path, options: &Options) -> Result<Vec<RouteNode>> {
    let page_dir = root
        .join(&options.page_dir)
        .absolutize()
        .map_err(|e| Error::io(&options.page_dir, e))?
        .to_path_buf();

    let mut routes = build_route_tree(&page_dir)?;
    strip_nested_separators(&mut routes);

    info!(page_dir = %page_dir.display(), routes = routes.len(), "ルートを生成しました");
    Ok(routes)
}

/// 仮想モジュールのソースを生成する。`pageDir` が空なら何も生成しない。
pub fn generate_routes_module(root: &Path, options: &Options) -> Result<Option<String>> {
    if options.page_dir.as_os_str().is_empty() {
        warn!("pageDir が空のため、ルート生成をスキップします");
        return Ok(None);
    }

    let routes = build_routes(root, options)?;
    Ok(Some(render_routes_module(&routes, options.history)))
}

fn strip_query(id: &str) -> &str {
    id.split_once('?').map_or(id, |(path, _)| path)
}

fn is_entry_file(root: &Path, id: &str) -> bool {
    Path::new(strip_query(id)) == root.join(ENTRY_FILE)
}
