use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::model::RouteNode;

/// 生成コードが import するルーターライブラリ
pub const ROUTER_LIBRARY: &str = "vue-router";

const INDENT: &str = "  ";

/// ルーターの履歴モード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// HTML5 History API (`createWebHistory`)
    #[default]
    History,
    /// URL ハッシュ (`createWebHashHistory`)
    Hash,
}

impl HistoryMode {
    pub fn factory(self) -> &'static str {
        match self {
            HistoryMode::History => "createWebHistory",
            HistoryMode::Hash => "createWebHashHistory",
        }
    }
}

/// ルートツリーから仮想モジュールのソースを生成する
pub fn render_routes_module(routes: &[RouteNode], history: HistoryMode) -> String {
    let factory = history.factory();
    let mut routes_src = String::new();
    write_routes(&mut routes_src, routes, 0);

    format!(
        "import {{ createRouter, {factory} }} from '{ROUTER_LIBRARY}'

const router = createRouter({{
  history: {factory}(),
  routes: {routes_src}
}})

export default router
"
    )
}

/// ルート配列を 2 スペースインデントの JSON 風に書き出す
///
/// `component` だけは文字列にせず、呼び出し可能な `() => import(...)` のまま出力する。
fn write_routes(out: &mut String, routes: &[RouteNode], depth: usize) {
    if routes.is_empty() {
        out.push_str("[]");
        return;
    }

    let inner = INDENT.repeat(depth + 1);
    let field = INDENT.repeat(depth + 2);

    out.push_str("[\n");
    for (i, route) in routes.iter().enumerate() {
        out.push_str(&inner);
        out.push_str("{\n");

        out.push_str(&format!("{field}\"path\": {}", json_string(route.path())));
        if let Some(component) = route.component() {
            out.push_str(&format!(",\n{field}\"component\": {}", component.to_import_expr()));
        }
        out.push_str(&format!(",\n{field}\"children\": "));
        write_routes(out, route.children(), depth + 2);
        if let Some(meta) = route.meta() {
            out.push_str(&format!(",\n{field}\"meta\": {}", reindent(&pretty_json(meta), &field)));
        }

        out.push('\n');
        out.push_str(&inner);
        out.push('}');
        if i + 1 < routes.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&INDENT.repeat(depth));
    out.push(']');
}

fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// 2 行目以降に現在のインデントを付け足す
fn reindent(text: &str, indent: &str) -> String {
    text.replace('\n', &format!("\n{indent}"))
}
