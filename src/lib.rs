//! ページディレクトリの規約から vue-router のルーティングテーブルを生成し、
//! アプリのエントリファイルに組み込むビルド時ジェネレータ。

pub mod emitter;
pub mod error;
pub mod model;
pub mod naming;
pub mod options;
pub mod parser;
pub mod paths;
pub mod plugin;
pub mod scanner;
pub mod transform;

pub use emitter::{HistoryMode, render_routes_module};
pub use error::{Error, Result};
pub use model::{LazyComponent, RouteNode};
pub use options::Options;
pub use plugin::{ConventionRoutes, RESOLVED_VIRTUAL_MODULE_ID, build_routes, generate_routes_module};
pub use transform::{VIRTUAL_MODULE_ID, transform_entry};
