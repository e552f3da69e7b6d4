use crate::model::RouteNode;

/// 2 階層目以降のルートから先頭の `/` を 1 つ取り除く
///
/// vue-router では入れ子のルートは相対パスで書く必要がある。
/// トップレベルのノードはそのまま残す。ツリーが確定した後に一度だけ呼ぶこと。
pub fn strip_nested_separators(routes: &mut [RouteNode]) {
    for route in routes {
        strip_recursively(&mut route.children);
    }
}

fn strip_recursively(routes: &mut [RouteNode]) {
    for route in routes {
        if let Some(stripped) = route.path.strip_prefix('/') {
            route.path = stripped.to_string();
        }
        strip_recursively(&mut route.children);
    }
}
