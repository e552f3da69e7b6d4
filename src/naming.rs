use regex::Regex;
use std::sync::LazyLock;

/// フォルダ自身を表すページ名
pub const INDEX_NAME: &str = "index";

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("Invalid camel case regex"));

static DYNAMIC_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]*)\]").expect("Invalid dynamic segment regex"));

/// ファイル名 / フォルダ名 (拡張子なし) をルートのセグメント名に変換する
///
/// 小文字の直後に大文字が続く位置に `-` を挟み、全体を小文字化する。
/// 例: `UserProfile` → `user-profile`
pub fn normalize_segment_name(stem: &str) -> String {
    CAMEL_BOUNDARY.replace_all(stem, "$1-$2").to_lowercase()
}

/// `[id]` のような動的セグメントを含む名前を、先頭 `/` 付きのパスに書き換える
///
/// 各 `[x]` は `:x` になり、周囲のリテラルはそのまま左から順に残る。
/// パラメータが連続する場合だけ `/` で区切る。
///
/// - `[id]`      → `/:id`
/// - `user-[id]` → `/user-:id`
/// - `[a][b]`    → `/:a/:b`
///
/// 動的セグメントを含まなければ `None`。
pub fn dynamic_route_path(name: &str) -> Option<String> {
    if !DYNAMIC_GROUP.is_match(name) {
        return None;
    }

    let mut path = String::from("/");
    let mut last = 0;
    for group in DYNAMIC_GROUP.find_iter(name) {
        let literal = &name[last..group.start()];
        if literal.is_empty() && last > 0 {
            path.push('/');
        }
        path.push_str(literal);
        path.push(':');
        path.push_str(&name[group.start() + 1..group.end() - 1]);
        last = group.end();
    }
    path.push_str(&name[last..]);

    Some(path)
}

/// 正規化済みの名前からルートパスを求める (index は空文字)
pub fn route_path(name: &str) -> String {
    if let Some(dynamic) = dynamic_route_path(name) {
        return dynamic;
    }
    if name == INDEX_NAME {
        String::new()
    } else {
        format!("/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_camel_case_and_lowercases() {
        assert_eq!(normalize_segment_name("UserProfile"), "user-profile");
        assert_eq!(normalize_segment_name("aboutUs"), "about-us");
        assert_eq!(normalize_segment_name("ABC"), "abc");
        assert_eq!(normalize_segment_name("index"), "index");
    }

    #[test]
    fn normalization_is_idempotent() {
        for name in ["UserProfile", "myHTTPServer", "[userId]", "already-done", "Index", "aBcD"] {
            let once = normalize_segment_name(name);
            assert_eq!(normalize_segment_name(&once), once, "input: {name}");
        }
    }

    #[test]
    fn dynamic_groups_become_params() {
        assert_eq!(dynamic_route_path("[id]").as_deref(), Some("/:id"));
        assert_eq!(dynamic_route_path("user-[id]").as_deref(), Some("/user-:id"));
        assert_eq!(dynamic_route_path("[a][b]").as_deref(), Some("/:a/:b"));
        assert_eq!(dynamic_route_path("post-[slug]-edit").as_deref(), Some("/post-:slug-edit"));
        assert_eq!(dynamic_route_path("about"), None);
    }

    #[test]
    fn index_collapses_to_empty_path() {
        assert_eq!(route_path("index"), "");
        assert_eq!(route_path("about"), "/about");
        assert_eq!(route_path("[id]"), "/:id");
    }
}
