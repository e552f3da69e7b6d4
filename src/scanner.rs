use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::model::{LazyComponent, RouteNode};
use crate::naming::{INDEX_NAME, normalize_segment_name, route_path};

/// ページファイルの拡張子
pub const PAGE_EXTENSION: &str = "vue";

/// サイドカーのメタ情報ファイルの接尾辞
pub const META_SUFFIX: &str = ".meta.json";

/// 1 つのディレクトリを走査した結果
struct Listing {
    routes: Vec<RouteNode>,
    /// 直下の index ページ (あれば)
    index_page: Option<PathBuf>,
}

/// ページディレクトリを再帰的に走査してルートツリーを作る
///
/// 戻り値の各ノードは、まだ先頭の `/` を保持している。
/// 入れ子の `/` は [`crate::paths::strip_nested_separators`] で後から取り除く。
pub fn build_route_tree(page_dir: &Path) -> Result<Vec<RouteNode>> {
    if !page_dir.is_dir() {
        return Err(Error::PageDirMissing {
            path: page_dir.to_path_buf(),
        });
    }
    Ok(scan_dir(page_dir)?.routes)
}

fn scan_dir(dir: &Path) -> Result<Listing> {
    let mut listing = Listing {
        routes: Vec::new(),
        index_page: None,
    };

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| Error::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) else {
                warn!(dir = %path.display(), "UTF-8 でないフォルダ名のためスキップします");
                continue;
            };
            let name = normalize_segment_name(dir_name);
            let nested = scan_dir(path)?;
            let meta = read_sidecar(dir, &name)?;
            let component = nested.index_page.map(LazyComponent::new);

            debug!(dir = %path.display(), route = %name, has_index = component.is_some(), "フォルダルート");
            listing
                .routes
                .push(RouteNode::folder(route_path(&name), component, nested.routes, meta));
        } else if is_page_file(path) {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(file = %path.display(), "UTF-8 でないファイル名のためスキップします");
                continue;
            };
            let name = normalize_segment_name(stem);
            let meta = read_sidecar(dir, &name)?;

            if name == INDEX_NAME {
                listing.index_page = Some(path.to_path_buf());
            }

            debug!(file = %path.display(), route = %name, "ページルート");
            listing.routes.push(RouteNode::page(
                route_path(&name),
                LazyComponent::new(path),
                meta,
            ));
        }
    }

    Ok(listing)
}

fn is_page_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == PAGE_EXTENSION)
}

/// `<dir>/<name>.meta.json` があれば読み込む (壊れていればエラー)
fn read_sidecar(dir: &Path, name: &str) -> Result<Option<serde_json::Value>> {
    let meta_path = dir.join(format!("{name}{META_SUFFIX}"));
    if !meta_path.is_file() {
        return Ok(None);
    }

    let raw = fs::read_to_string(&meta_path).map_err(|e| Error::io(&meta_path, e))?;
    let value = serde_json::from_str(&raw).map_err(|source| Error::Metadata {
        path: meta_path.clone(),
        source,
    })?;
    debug!(file = %meta_path.display(), "メタ情報を読み込みました");
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn folder_with_only_index_collapses() {
        let tmp = TempDir::new().unwrap();
        let index = touch(tmp.path(), "about/index.vue", "");

        let routes = build_route_tree(tmp.path()).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path(), "/about");
        assert_eq!(routes[0].component(), Some(&LazyComponent::new(index)));
        assert!(routes[0].children().is_empty());
    }

    #[test]
    fn index_folder_at_root_has_empty_path() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "index/index.vue", "");

        let routes = build_route_tree(tmp.path()).unwrap();
        assert_eq!(routes[0].path(), "");
        assert!(routes[0].component().is_some());
        assert!(routes[0].children().is_empty());
    }

    #[test]
    fn folder_without_index_is_a_path_container() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "admin/settings.vue", "");

        let routes = build_route_tree(tmp.path()).unwrap();
        assert_eq!(routes[0].component(), None);
        assert_eq!(routes[0].children().len(), 1);
        assert_eq!(routes[0].children()[0].path(), "/settings");
    }

    #[test]
    fn non_page_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "home.vue", "");
        touch(tmp.path(), "helpers.ts", "");
        touch(tmp.path(), "README.md", "");

        let routes = build_route_tree(tmp.path()).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path(), "/home");
    }

    #[test]
    fn names_are_normalized_and_meta_uses_normalized_name() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "UserProfile.vue", "");
        touch(tmp.path(), "user-profile.meta.json", r#"{"title":"Profile"}"#);

        let routes = build_route_tree(tmp.path()).unwrap();
        assert_eq!(routes[0].path(), "/user-profile");
        assert_eq!(routes[0].meta(), Some(&json!({ "title": "Profile" })));
    }

    #[test]
    fn meta_keys_keep_file_order() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "about.vue", "");
        touch(tmp.path(), "about.meta.json", r#"{"title":"About","auth":true,"layout":"wide"}"#);

        let routes = build_route_tree(tmp.path()).unwrap();
        let keys: Vec<_> = routes[0]
            .meta()
            .and_then(|meta| meta.as_object())
            .map(|meta| meta.keys().cloned().collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["title", "auth", "layout"]);

        let module = crate::emitter::render_routes_module(&routes, Default::default());
        let title = module.find("\"title\"").unwrap();
        let auth = module.find("\"auth\"").unwrap();
        let layout = module.find("\"layout\"").unwrap();
        assert!(title < auth && auth < layout, "{module}");
    }

    #[test]
    fn folder_meta_is_read_from_parent_directory() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "users/index.vue", "");
        touch(tmp.path(), "users.meta.json", r#"{"requiresAuth":true}"#);
        touch(tmp.path(), "users/users.meta.json", r#"{"wrong":true}"#);

        let routes = build_route_tree(tmp.path()).unwrap();
        assert_eq!(routes[0].meta(), Some(&json!({ "requiresAuth": true })));
    }

    #[test]
    fn dynamic_folder_and_file_names() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "[id].vue", "");
        touch(tmp.path(), "[org]/index.vue", "");

        let routes = build_route_tree(tmp.path()).unwrap();
        let paths: Vec<_> = routes.iter().map(RouteNode::path).collect();
        assert_eq!(paths, vec!["/:id", "/:org"]);
    }

    #[test]
    fn malformed_meta_fails_the_build() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "about.vue", "");
        let meta = touch(tmp.path(), "about.meta.json", "{ title: ");

        match build_route_tree(tmp.path()) {
            Err(Error::Metadata { path, .. }) => assert_eq!(path, meta),
            other => panic!("expected metadata error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "home.vue", "");
        fs::write(tmp.path().join(OsStr::from_bytes(b"caf\xff.vue")), "").unwrap();
        let bad_dir = tmp.path().join(OsStr::from_bytes(b"d\xfei"));
        fs::create_dir(&bad_dir).unwrap();
        fs::write(bad_dir.join("index.vue"), "").unwrap();

        let routes = build_route_tree(tmp.path()).unwrap();
        let paths: Vec<_> = routes.iter().map(RouteNode::path).collect();
        assert_eq!(paths, vec!["/home"]);
    }

    #[test]
    fn missing_page_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            build_route_tree(&missing),
            Err(Error::PageDirMissing { .. })
        ));
    }
}
