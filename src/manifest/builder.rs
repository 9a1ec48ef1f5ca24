//! Manifest construction from a build output directory or an in-memory bundle.

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use jwalk::WalkDir;
use rustc_hash::FxHashSet;
use thiserror::Error;

use super::{
    AssetCategory, AssetManifest, AssetRecord, BuildInfo, BuildMeta, LoadingSequence, PriorityTable,
    PwaInfo, SpaHandlerInfo, logical_path, web_path,
};
use crate::{log, utils::date::now_millis, utils::size::format_size};

/// Manifest version written into `buildInfo`.
pub const MANIFEST_VERSION: &str = "1.0.0";

const GZIP_SUFFIX: &str = ".gz";

/// Errors while building a manifest from disk.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("build directory not found: {0}")]
    BuildDirNotFound(PathBuf),

    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to walk build directory: {0}")]
    Walk(#[from] jwalk::Error),
}

/// Accumulates physical files into an [`AssetManifest`].
///
/// Both the directory scanner and the bundler plugin feed this through
/// [`ManifestBuilder::add_file`], so the two producers share one set of rules.
#[derive(Debug)]
pub struct ManifestBuilder {
    priorities: PriorityTable,
    css: IndexMap<String, AssetRecord>,
    js: IndexMap<String, AssetRecord>,
    assets: IndexMap<String, AssetRecord>,
    info: BuildInfo,
    spa_handler: Option<SpaHandlerInfo>,
    pwa: Option<PwaInfo>,
    quiet: bool,
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            priorities: PriorityTable::default(),
            css: IndexMap::new(),
            js: IndexMap::new(),
            assets: IndexMap::new(),
            info: BuildInfo::new(now_millis(), MANIFEST_VERSION),
            spa_handler: None,
            pwa: None,
            quiet: false,
        }
    }

    pub fn with_priorities(mut self, priorities: PriorityTable) -> Self {
        self.priorities = priorities;
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.info.timestamp = timestamp;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.info.version = version.into();
        self
    }

    /// Suppress per-file progress lines.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn set_meta(&mut self, meta: BuildMeta) {
        self.info.meta = Some(meta);
    }

    pub fn set_spa_handler(&mut self, info: SpaHandlerInfo) {
        self.spa_handler = Some(info);
    }

    pub fn set_pwa(&mut self, info: PwaInfo) {
        self.pwa = Some(info);
    }

    /// Account for one physical file.
    ///
    /// `web_path` is the emitted path (`/assets/index-ab12cd34.js`) and
    /// `gzip_size` the size of its `.gz` sibling, if one exists. Every file
    /// counts towards the totals; the returned category is `None` when the
    /// file is not listed in any bucket.
    pub fn add_file(
        &mut self,
        web_path: &str,
        size: u64,
        gzip_size: Option<u64>,
    ) -> Option<AssetCategory> {
        self.info.record(size, gzip_size);

        let category = AssetCategory::from_path(web_path)?;
        let logical = logical_path(web_path);
        let record = AssetRecord::new(web_path.to_string(), logical.clone(), size, gzip_size);

        if !self.quiet {
            let sizes = match gzip_size {
                Some(gz) => format!("{} -> {}", format_size(size), format_size(gz)),
                None => format_size(size),
            };
            if category.is_code() {
                log!("manifest"; "{}: {} -> {} ({})", category.label(), logical, web_path, sizes);
            } else {
                log!("manifest"; "{}: {} ({})", category.label(), logical, sizes);
            }
        }

        if let Some(previous) = self.bucket_mut(category).insert(logical, record) {
            crate::debug!("manifest"; "{} replaces {}", web_path, previous.original);
        }
        Some(category)
    }

    /// Insert a record without accounting for it in the totals.
    ///
    /// For entries that do not correspond to an emitted file, such as the
    /// dev-server module entry.
    pub fn insert_record(&mut self, category: AssetCategory, record: AssetRecord) {
        self.bucket_mut(category)
            .insert(record.logical.clone(), record);
    }

    /// Scan `dir` recursively in sorted order.
    ///
    /// `.gz` files are only consulted as siblings. Paths in `exclude` (such as
    /// a previously generated manifest script) are skipped entirely. Returns
    /// the number of files accounted for.
    pub fn scan_dir(&mut self, dir: &Path, exclude: &[PathBuf]) -> Result<usize, ManifestError> {
        if !dir.is_dir() {
            return Err(ManifestError::BuildDirNotFound(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort(true) {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        let present: FxHashSet<&Path> = files.iter().map(PathBuf::as_path).collect();
        let excluded: FxHashSet<&Path> = exclude.iter().map(PathBuf::as_path).collect();

        let mut count = 0;
        for path in &files {
            if is_gzip(path) || excluded.contains(path.as_path()) {
                continue;
            }

            let size = file_size(path)?;
            let gz_path = gzip_sibling(path);
            let gzip_size = if present.contains(gz_path.as_path()) {
                Some(file_size(&gz_path)?)
            } else {
                None
            };

            let relative = path.strip_prefix(dir).unwrap_or(path);
            self.add_file(&web_path(&relative.to_string_lossy()), size, gzip_size);
            count += 1;
        }
        Ok(count)
    }

    fn bucket_mut(&mut self, category: AssetCategory) -> &mut IndexMap<String, AssetRecord> {
        match category {
            AssetCategory::Css => &mut self.css,
            AssetCategory::Js => &mut self.js,
            AssetCategory::Asset => &mut self.assets,
        }
    }

    pub fn build(self) -> AssetManifest {
        let mut css: Vec<String> = self.css.keys().cloned().collect();
        let mut js: Vec<String> = self.js.keys().cloned().collect();
        self.priorities.sort(&mut css);
        self.priorities.sort(&mut js);

        AssetManifest {
            css: self.css,
            js: self.js,
            assets: self.assets,
            loading_sequence: LoadingSequence { css, js },
            build_info: self.info,
            spa_handler: self.spa_handler,
            pwa: self.pwa,
        }
    }
}

/// Build a manifest for the output directory `dir`.
pub fn build_from_dir(
    dir: &Path,
    priorities: PriorityTable,
    exclude: &[PathBuf],
) -> Result<AssetManifest, ManifestError> {
    let mut builder = ManifestBuilder::new().with_priorities(priorities);
    builder.scan_dir(dir, exclude)?;
    Ok(builder.build())
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

fn gzip_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(GZIP_SUFFIX);
    PathBuf::from(name)
}

fn file_size(path: &Path) -> Result<u64, ManifestError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|err| ManifestError::Io(path.to_path_buf(), err))
}
