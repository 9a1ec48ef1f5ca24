//! `bootkit build`: run the bootstrap plugin over finished bundler output.
//!
//! Phases:
//! - **Config** - resolve output naming through the plugin's `config` hook
//! - **Load** - read every file under the output directory into a bundle
//! - **Generate** - manifest, loader and PWA files via `generate_bundle`
//! - **Write** - emitted files, then the rewritten `index.html`

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};

use crate::{
    config::BootkitConfig,
    debug, log,
    manifest::{AssetManifest, print_stats},
    plugin::{BootstrapPlugin, BuildConfig, Bundle, BundlerPlugin},
};

const INDEX_HTML: &str = "index.html";

/// What a build run produced.
#[derive(Debug)]
pub struct BuildReport {
    pub manifest: Arc<AssetManifest>,
    /// Generated files, in emission order.
    pub written: Vec<PathBuf>,
    /// Whether `index.html` was rewritten.
    pub html_updated: bool,
}

/// Generate the loader files for the output directory `dist`.
pub fn build_output(config: BootkitConfig, dist: &Path) -> Result<BuildReport> {
    if !dist.is_dir() {
        bail!("build directory not found: {}", dist.display());
    }

    let mut plugin = BootstrapPlugin::new(config);

    let mut build_config = BuildConfig::default();
    plugin.config(&mut build_config);
    debug!(
        "build";
        "entries {}, chunks {}, manual chunks: {}",
        build_config.entry_file_names,
        build_config.chunk_file_names,
        build_config.manual_chunks.keys().cloned().collect::<Vec<_>>().join(", ")
    );

    let mut bundle = Bundle::from_dir(dist)?;
    log!("build"; "{} files in {}", bundle.len(), dist.display());

    plugin
        .generate_bundle(&mut bundle)
        .with_context(|| format!("plugin `{}` failed", plugin.name()))?;
    let written = bundle.write_emitted(dist)?;

    let html_updated = rewrite_index(&plugin, dist)?;

    let Some(manifest) = plugin.manifest() else {
        bail!("plugin `{}` produced no manifest", plugin.name());
    };
    print_stats(&manifest);

    Ok(BuildReport {
        manifest,
        written,
        html_updated,
    })
}

/// Run `transform_index_html` over `dist/index.html`, writing only on change.
fn rewrite_index(plugin: &BootstrapPlugin, dist: &Path) -> Result<bool> {
    let path = dist.join(INDEX_HTML);
    if !path.is_file() {
        log!("build"; "no {} in {}, skipping html injection", INDEX_HTML, dist.display());
        return Ok(false);
    }

    let html =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let transformed = plugin.transform_index_html(&html);
    if transformed == html {
        debug!("build"; "{} unchanged", INDEX_HTML);
        return Ok(false);
    }

    fs::write(&path, transformed).with_context(|| format!("failed to write {}", path.display()))?;
    log!("build"; "updated {}", INDEX_HTML);
    Ok(true)
}
