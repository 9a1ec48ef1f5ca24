//! Asset manifest data types.

use std::path::Path;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::utils::size::saved_ratio;

/// Extensions that land in the `assets` bucket.
const ASSET_EXTENSIONS: &[&str] = &[
    "png",
    "jpg",
    "jpeg",
    "gif",
    "svg",
    "webp",
    "ico",
    "woff",
    "woff2",
    "ttf",
    "eot",
    "json",
    "webmanifest",
    "txt",
    "html",
];

/// Manifest bucket of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    Css,
    Js,
    Asset,
}

impl AssetCategory {
    /// Classify by extension (case-insensitive). `None` for files the manifest
    /// does not list.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "css" => Some(Self::Css),
            "js" => Some(Self::Js),
            e if ASSET_EXTENSIONS.contains(&e) => Some(Self::Asset),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Css => "CSS",
            Self::Js => "JS",
            Self::Asset => "Asset",
        }
    }

    pub const fn is_code(self) -> bool {
        matches!(self, Self::Css | Self::Js)
    }
}

// ============================================================================
// AssetRecord
// ============================================================================

/// One physical file of the build output.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Web path of the file as emitted (possibly hashed).
    pub original: String,
    /// Stable path clients request.
    pub logical: String,
    /// Web path of the `.gz` sibling, if any.
    pub gzipped: Option<String>,
    pub size: u64,
    /// Zero without a gzip sibling.
    pub gzip_size: u64,
    /// Percent saved by the gzip sibling, one decimal. Zero without one.
    pub compression_ratio: f64,
}

impl AssetRecord {
    pub fn new(original: String, logical: String, size: u64, gzip_size: Option<u64>) -> Self {
        let gzipped = gzip_size.map(|_| format!("{original}.gz"));
        let compression_ratio = gzip_size.map_or(0.0, |gz| saved_ratio(size, gz));
        Self {
            original,
            logical,
            gzipped,
            size,
            gzip_size: gzip_size.unwrap_or(0),
            compression_ratio,
        }
    }

    pub fn has_gzip(&self) -> bool {
        self.gzipped.is_some()
    }
}

// ============================================================================
// BuildInfo
// ============================================================================

/// Extra build metadata recorded by the bundler plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMeta {
    pub app_name: String,
    pub compression_enabled: bool,
    pub chunks_generated: usize,
    pub plugin: String,
}

/// Build-wide statistics.
///
/// Totals only grow through [`BuildInfo::record`]; the aggregate compression
/// ratio is always derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildInfo {
    pub timestamp: u64,
    pub version: String,
    total_original_size: u64,
    total_compressed_size: u64,
    pub meta: Option<BuildMeta>,
}

impl BuildInfo {
    pub fn new(timestamp: u64, version: impl Into<String>) -> Self {
        Self {
            timestamp,
            version: version.into(),
            total_original_size: 0,
            total_compressed_size: 0,
            meta: None,
        }
    }

    /// Account for one physical file.
    pub fn record(&mut self, size: u64, gzip_size: Option<u64>) {
        self.total_original_size += size;
        self.total_compressed_size += gzip_size.unwrap_or(size);
    }

    pub const fn total_original_size(&self) -> u64 {
        self.total_original_size
    }

    pub const fn total_compressed_size(&self) -> u64 {
        self.total_compressed_size
    }

    /// Bytes saved across the whole build.
    pub const fn space_saved(&self) -> u64 {
        self.total_original_size
            .saturating_sub(self.total_compressed_size)
    }

    pub fn compression_ratio(&self) -> f64 {
        saved_ratio(self.total_original_size, self.total_compressed_size)
    }
}

impl Serialize for BuildInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.meta.is_some() { 9 } else { 5 };
        let mut s = serializer.serialize_struct("BuildInfo", len)?;
        s.serialize_field("timestamp", &self.timestamp)?;
        s.serialize_field("version", &self.version)?;
        s.serialize_field("compressionRatio", &self.compression_ratio())?;
        s.serialize_field("totalOriginalSize", &self.total_original_size)?;
        s.serialize_field("totalCompressedSize", &self.total_compressed_size)?;
        if let Some(meta) = &self.meta {
            s.serialize_field("appName", &meta.app_name)?;
            s.serialize_field("compressionEnabled", &meta.compression_enabled)?;
            s.serialize_field("chunksGenerated", &meta.chunks_generated)?;
            s.serialize_field("plugin", &meta.plugin)?;
        }
        s.end()
    }
}

// ============================================================================
// Plugin metadata
// ============================================================================

/// Hints for an SPA-aware static file handler.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaHandlerInfo {
    pub root_path: String,
    pub fallback_file: String,
    pub enable_compression: bool,
    pub enable_caching: bool,
    /// Seconds.
    pub cache_max_age: u64,
    /// Generated files that are not application assets.
    pub system_files: Vec<String>,
}

/// Names of the PWA files of this build.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PwaInfo {
    pub enabled: bool,
    pub manifest_file: String,
    pub service_worker_file: String,
    pub workbox_file: String,
}

// ============================================================================
// AssetManifest
// ============================================================================

/// Logical keys of CSS and JS in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoadingSequence {
    pub css: Vec<String>,
    pub js: Vec<String>,
}

/// Logical path → record maps for one build.
///
/// Produced once by [`super::ManifestBuilder`] and read-only afterwards.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
    pub(super) css: IndexMap<String, AssetRecord>,
    pub(super) js: IndexMap<String, AssetRecord>,
    pub(super) assets: IndexMap<String, AssetRecord>,
    pub(super) loading_sequence: LoadingSequence,
    pub(super) build_info: BuildInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) spa_handler: Option<SpaHandlerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) pwa: Option<PwaInfo>,
}

impl AssetManifest {
    pub const fn css(&self) -> &IndexMap<String, AssetRecord> {
        &self.css
    }

    pub const fn js(&self) -> &IndexMap<String, AssetRecord> {
        &self.js
    }

    pub const fn assets(&self) -> &IndexMap<String, AssetRecord> {
        &self.assets
    }

    pub const fn loading_sequence(&self) -> &LoadingSequence {
        &self.loading_sequence
    }

    pub const fn build_info(&self) -> &BuildInfo {
        &self.build_info
    }

    pub const fn spa_handler(&self) -> Option<&SpaHandlerInfo> {
        self.spa_handler.as_ref()
    }

    pub const fn pwa(&self) -> Option<&PwaInfo> {
        self.pwa.as_ref()
    }

    /// Look a logical path up in css, js, then assets.
    pub fn get(&self, path: &str) -> Option<&AssetRecord> {
        self.css
            .get(path)
            .or_else(|| self.js.get(path))
            .or_else(|| self.assets.get(path))
    }

    /// Emitted path for a logical path; unknown paths map to themselves.
    pub fn actual_path<'a>(&'a self, path: &'a str) -> &'a str {
        self.get(path).map_or(path, |r| r.original.as_str())
    }

    pub fn gzipped_path(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|r| r.gzipped.as_deref())
    }

    pub fn has_gzip_version(&self, path: &str) -> bool {
        self.get(path).is_some_and(AssetRecord::has_gzip)
    }

    /// All records in bucket order (css, js, assets).
    pub fn records(&self) -> impl Iterator<Item = (AssetCategory, &AssetRecord)> {
        let css = self.css.values().map(|r| (AssetCategory::Css, r));
        let js = self.js.values().map(|r| (AssetCategory::Js, r));
        let assets = self.assets.values().map(|r| (AssetCategory::Asset, r));
        css.chain(js).chain(assets)
    }

    pub fn total_files(&self) -> usize {
        self.css.len() + self.js.len() + self.assets.len()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_path() {
        assert_eq!(AssetCategory::from_path("a/b.CSS"), Some(AssetCategory::Css));
        assert_eq!(AssetCategory::from_path("main.js"), Some(AssetCategory::Js));
        assert_eq!(AssetCategory::from_path("logo.svg"), Some(AssetCategory::Asset));
        assert_eq!(
            AssetCategory::from_path("site.webmanifest"),
            Some(AssetCategory::Asset)
        );
        assert_eq!(AssetCategory::from_path("main.js.map"), None);
        assert_eq!(AssetCategory::from_path("LICENSE"), None);
    }

    #[test]
    fn test_record_ratio() {
        let rec = AssetRecord::new("/a.js".into(), "/a.js".into(), 10_000, Some(4_000));
        assert_eq!(rec.compression_ratio, 60.0);
        assert_eq!(rec.gzipped.as_deref(), Some("/a.js.gz"));

        let plain = AssetRecord::new("/b.js".into(), "/b.js".into(), 10_000, None);
        assert_eq!(plain.compression_ratio, 0.0);
        assert_eq!(plain.gzip_size, 0);
        assert!(!plain.has_gzip());
    }

    #[test]
    fn test_ratio_of_incompressible_file_is_negative() {
        let rec = AssetRecord::new("/x.png".into(), "/x.png".into(), 100, Some(120));
        assert_eq!(rec.compression_ratio, -20.0);
    }

    #[test]
    fn test_aggregate_ratio_uses_totals() {
        let mut info = BuildInfo::new(0, "1.0.0");
        // 90% saved on a small file, 0% on a large one
        info.record(100, Some(10));
        info.record(900, None);

        // average of per-file ratios would be 45.0
        assert_eq!(info.total_original_size(), 1000);
        assert_eq!(info.total_compressed_size(), 910);
        assert_eq!(info.compression_ratio(), 9.0);
        assert_eq!(info.space_saved(), 90);
    }

    #[test]
    fn test_build_info_serialization() {
        let mut info = BuildInfo::new(42, "1.0.0");
        info.record(200, Some(50));
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["compressionRatio"], 75.0);
        assert_eq!(json["totalOriginalSize"], 200);
        assert_eq!(json["totalCompressedSize"], 50);
        assert!(json.get("appName").is_none());

        info.meta = Some(BuildMeta {
            app_name: "Demo".into(),
            compression_enabled: true,
            chunks_generated: 3,
            plugin: "bootkit".into(),
        });
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["appName"], "Demo");
        assert_eq!(json["chunksGenerated"], 3);
    }
}
