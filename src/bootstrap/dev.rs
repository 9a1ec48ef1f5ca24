//! Dev-server files.
//!
//! During development the bundler serves sources directly, so there is no
//! build output to scan. A minimal manifest pointing at the module entry is
//! written into the public directory together with a loader for it.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::generate_bootstrap;
use crate::{
    config::{BootstrapOptions, ReadinessConfig},
    log,
    manifest::{
        AssetCategory, AssetManifest, AssetRecord, BuildMeta, MANIFEST_SCRIPT, ManifestBuilder,
        render_manifest_script,
    },
};

pub const DEV_MANIFEST_VERSION: &str = "1.0.0-dev";

/// Manifest with a single JS entry served by the dev server.
pub fn dev_manifest(opts: &BootstrapOptions, entry: &str) -> AssetManifest {
    let mut builder = ManifestBuilder::new()
        .quiet(true)
        .with_version(DEV_MANIFEST_VERSION);
    builder.insert_record(
        AssetCategory::Js,
        AssetRecord::new(entry.to_string(), "/main.js".to_string(), 0, None),
    );
    builder.set_meta(BuildMeta {
        app_name: opts.app_name.clone(),
        compression_enabled: false,
        chunks_generated: 1,
        plugin: format!("{}-dev", env!("CARGO_PKG_NAME")),
    });
    builder.build()
}

/// Write `asset-manifest.js` and the loader into `public_dir`.
pub fn generate_dev_files(
    opts: &BootstrapOptions,
    readiness: &ReadinessConfig,
    public_dir: &Path,
    entry: &str,
) -> Result<()> {
    let manifest = dev_manifest(opts, entry);

    fs::create_dir_all(public_dir)
        .with_context(|| format!("failed to create {}", public_dir.display()))?;

    let manifest_path = public_dir.join(MANIFEST_SCRIPT);
    fs::write(&manifest_path, render_manifest_script(&manifest)?)
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    let bootstrap_path = public_dir.join(&opts.bootstrap_file_name);
    fs::write(&bootstrap_path, generate_bootstrap(&manifest, opts, readiness)?)
        .with_context(|| format!("failed to write {}", bootstrap_path.display()))?;

    crate::debug!("build"; "dev files: {}, {}", MANIFEST_SCRIPT, opts.bootstrap_file_name);
    if opts.debug {
        log!("build"; "generated development files in {}", public_dir.display());
    }
    Ok(())
}
