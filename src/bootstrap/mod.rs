//! Bootstrap loader generation.
//!
//! The loader is a self-contained classic script. It publishes the runtime
//! globals, shows the loading overlay, loads the manifest's CSS then JS in
//! priority order (gzip variant first when enabled, bounded retries, then the
//! uncompressed fallback) and flips the ready flag once application content
//! appears or the fallback timer fires.

mod dev;
mod options;
mod theme;

pub use dev::{DEV_MANIFEST_VERSION, dev_manifest, generate_dev_files};
pub use options::{FetchPolicy, LoaderOptions, ReadinessOptions};
pub use theme::{
    LOADING_SCREEN_ID, LOADING_TEXT_ID, RETRY_BUTTON_ID, error_markup, loading_markup,
};

use std::path::Path;

use anyhow::{Context, Result};

use crate::{
    config::{BootstrapOptions, ReadinessConfig},
    embed::{
        bootstrap::{BOOTSTRAP_JS, BootstrapVars},
        json_literal,
    },
    manifest::AssetManifest,
};

/// Render the loader script for `manifest`.
///
/// With `opts.minify` the output goes through the JS minifier; the readable
/// script is kept if that fails.
pub fn generate_bootstrap(
    manifest: &AssetManifest,
    opts: &BootstrapOptions,
    readiness: &ReadinessConfig,
) -> Result<String> {
    let manifest_json =
        serde_json::to_string(manifest).context("failed to serialize asset manifest")?;

    let script = BOOTSTRAP_JS.render(&BootstrapVars {
        manifest_json,
        options_json: json_literal(&LoaderOptions::from_options(opts)),
        readiness_json: json_literal(&ReadinessOptions::from_config(readiness)),
    });

    Ok(crate::asset::minify::minify_or_raw(
        Path::new(&opts.bootstrap_file_name),
        script,
        opts.minify,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestBuilder;

    fn manifest() -> AssetManifest {
        let mut builder = ManifestBuilder::new().quiet(true);
        builder.add_file("/assets/vendor-ab12cd34.js", 100, Some(40));
        builder.add_file("/assets/index-ab12cd34.css", 50, None);
        builder.build()
    }

    #[test]
    fn test_generate_embeds_manifest_and_options() {
        let mut opts = BootstrapOptions::default();
        opts.app_name = "Demo".into();
        let js = generate_bootstrap(&manifest(), &opts, &ReadinessConfig::default()).unwrap();

        assert!(js.contains("\"/assets/vendor.js\""));
        assert!(js.contains("\"appName\":\"Demo\""));
        assert!(js.contains("\"rootId\":\"root\""));
        assert!(js.contains("window.APP_BOOTSTRAP_READY"));
        assert!(js.contains("loading:complete"));
    }

    #[test]
    fn test_loader_honours_external_readiness() {
        let js = generate_bootstrap(
            &manifest(),
            &BootstrapOptions::default(),
            &ReadinessConfig::default(),
        )
        .unwrap();

        // a flag set by the host page survives loader start-up
        assert!(js.contains("window.APP_BOOTSTRAP_READY = window.APP_BOOTSTRAP_READY === true;"));
        assert!(!js.contains("window.APP_BOOTSTRAP_READY = false;"));

        assert!(js.contains("events.on(\"loading:complete\", function () { complete("));
        assert!(js.contains("events.on(\"loading:error\", function (payload) {"));
        assert!(js.contains("Unknown loading error"));
    }

    #[test]
    fn test_timed_out_node_is_removed() {
        let js = generate_bootstrap(
            &manifest(),
            &BootstrapOptions::default(),
            &ReadinessConfig::default(),
        )
        .unwrap();
        let timeout = js.find("new Error(\"timeout loading \"").unwrap();
        let handler = &js[..timeout];
        let handler = &handler[handler.rfind("setTimeout(").unwrap()..];
        assert!(handler.contains("node.parentNode.removeChild(node);"));
    }

    #[test]
    fn test_custom_theme_with_placeholder_text() {
        let mut opts = BootstrapOptions::default();
        opts.custom_theme = "<p>__READINESS__</p>".into();
        let js = generate_bootstrap(&manifest(), &opts, &ReadinessConfig::default()).unwrap();

        assert!(js.contains("\"customTheme\":\"<p>__READINESS__</p>\""));
        assert!(js.contains("var READINESS = {"));
    }

    #[test]
    fn test_minified_output_is_smaller() {
        let mut opts = BootstrapOptions::default();
        let readable = generate_bootstrap(&manifest(), &opts, &ReadinessConfig::default()).unwrap();
        opts.minify = true;
        let minified = generate_bootstrap(&manifest(), &opts, &ReadinessConfig::default()).unwrap();

        assert!(minified.len() < readable.len());
        assert!(minified.contains("APP_BOOTSTRAP_EVENTS"));
    }
}
