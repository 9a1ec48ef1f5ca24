//! `asset-manifest.js` rendering.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::AssetManifest;
use crate::{
    embed::manifest::{ASSET_MANIFEST_JS, ManifestVars},
    utils::date::rfc3339_from_millis,
};

/// File name of the manifest script in the build output.
pub const MANIFEST_SCRIPT: &str = "asset-manifest.js";

/// Render the browser-loadable manifest script.
pub fn render_manifest_script(manifest: &AssetManifest) -> Result<String> {
    let manifest_json = manifest
        .to_json_pretty()
        .context("failed to serialize asset manifest")?;
    Ok(ASSET_MANIFEST_JS.render(&ManifestVars {
        manifest_json,
        generated_at: rfc3339_from_millis(manifest.build_info().timestamp),
    }))
}

/// Render and write the manifest script to `output`.
pub fn write_manifest_script(manifest: &AssetManifest, output: &Path) -> Result<()> {
    let script = render_manifest_script(manifest)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(output, script).with_context(|| format!("failed to write {}", output.display()))
}
