//! Hashed file name → logical name mapping.

use std::sync::LazyLock;

use regex::Regex;

use super::AssetCategory;

/// `<stem>-<hash><ext>` where the hash is at least eight ASCII alphanumerics
/// directly before the final extension.
static HASHED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<stem>.+)-[A-Za-z0-9]{8,}(?P<ext>\.[^.]+)$").unwrap());

/// Strip the content hash from a file name.
///
/// Names without a hash segment are returned unchanged.
///
/// ```
/// # use bootkit::manifest::logical_file_name;
/// assert_eq!(logical_file_name("index-ab12cd34.js"), "index.js");
/// assert_eq!(logical_file_name("index.js"), "index.js");
/// ```
pub fn logical_file_name(name: &str) -> String {
    match HASHED_NAME.captures(name) {
        Some(caps) => format!("{}{}", &caps["stem"], &caps["ext"]),
        None => name.to_string(),
    }
}

/// Whether a file at `web_path` gets its hash stripped.
///
/// Only JS and CSS qualify, and only under an `assets/` directory, with a
/// `workbox` prefix, or at the output root.
pub fn is_hash_scoped(web_path: &str) -> bool {
    if !AssetCategory::from_path(web_path).is_some_and(AssetCategory::is_code) {
        return false;
    }

    let trimmed = web_path.trim_start_matches('/');
    let (dir, name) = match trimmed.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, trimmed),
    };

    match dir {
        None => true,
        Some(dir) => name.starts_with("workbox") || dir.split('/').any(|seg| seg == "assets"),
    }
}

/// Logical web path of an emitted file.
pub fn logical_path(web_path: &str) -> String {
    if !is_hash_scoped(web_path) {
        return web_path.to_string();
    }
    match web_path.rsplit_once('/') {
        Some((dir, name)) => format!("{dir}/{}", logical_file_name(name)),
        None => logical_file_name(web_path),
    }
}

/// Web path (`/a/b.js`) of a path relative to the output root.
pub fn web_path(relative: &str) -> String {
    let normalized = relative.replace('\\', "/");
    format!("/{}", normalized.trim_start_matches('/'))
}
