// src/model.rs
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 遅延ロードされるページコンポーネント (ページファイルの絶対パス)
///
/// 生成コードでは `() => import('<path>')` として出力される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LazyComponent(PathBuf);

impl LazyComponent {
    pub fn new(page_file: impl Into<PathBuf>) -> Self {
        LazyComponent(page_file.into())
    }

    pub fn page_file(&self) -> &Path {
        &self.0
    }

    /// 呼び出し可能な動的 import 式として描画する
    pub fn to_import_expr(&self) -> String {
        let escaped = self
            .page_file()
            .to_string_lossy()
            .replace('\\', "\\\\")
            .replace('\'', "\\'");
        format!("() => import('{escaped}')")
    }
}

/// ルートツリーの 1 ノード
///
/// 不変条件はコンストラクタで保証する:
/// - ファイルから作ったノードは `children` を持たない
/// - フォルダのノードは、直下に index ページがある場合だけ `component` を持つ
/// - `path` が空で、親と同じ `component` を持つ子は冗長なので取り除かれる
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteNode {
    /// ルートのパス (例: "/about", ":id", "" など)
    pub(crate) path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) component: Option<LazyComponent>,

    /// ディレクトリの列挙順を保つ
    pub(crate) children: Vec<RouteNode>,

    /// サイドカー `<name>.meta.json` の内容
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) meta: Option<serde_json::Value>,
}

impl RouteNode {
    /// ページファイルから作るノード
    pub fn page(
        path: impl Into<String>,
        component: LazyComponent,
        meta: Option<serde_json::Value>,
    ) -> Self {
        RouteNode {
            path: path.into(),
            component: Some(component),
            children: Vec::new(),
            meta,
        }
    }

    /// フォルダから作るノード。冗長な子はここで取り除く。
    pub fn folder(
        path: impl Into<String>,
        component: Option<LazyComponent>,
        children: Vec<RouteNode>,
        meta: Option<serde_json::Value>,
    ) -> Self {
        let children = children
            .into_iter()
            .filter(|child| !(child.path.is_empty() && child.component == component))
            .collect();

        RouteNode {
            path: path.into(),
            component,
            children,
            meta,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn component(&self) -> Option<&LazyComponent> {
        self.component.as_ref()
    }

    pub fn children(&self) -> &[RouteNode] {
        &self.children
    }

    pub fn meta(&self) -> Option<&serde_json::Value> {
        self.meta.as_ref()
    }
}
