//! The bootstrap plugin.

use std::{path::Path, sync::Arc};

use anyhow::Result;
use rustc_hash::FxHashMap;

use super::{AssetFileNames, BuildConfig, Bundle, BundlerPlugin, HeadTag, html};
use crate::{
    asset::minify::minify_or_raw,
    bootstrap::generate_bootstrap,
    config::{BootkitConfig, PrecacheEntry},
    debug, log,
    logger::is_verbose,
    manifest::{
        AssetManifest, BuildMeta, MANIFEST_SCRIPT, ManifestBuilder, PriorityTable, PwaInfo,
        SpaHandlerInfo, render_manifest_script, web_path,
    },
    pwa::{
        REGISTER_SW_FILE, SERVICE_WORKER_FILE, UNIFIED_MANIFEST_FILE, UnifiedManifest,
        WEB_MANIFEST_FILE, WORKBOX_FILE_PATTERN, render_register_script, render_service_worker,
        render_web_manifest,
    },
    utils::hash::revision,
};

/// Name reported by the plugin and recorded in `buildInfo.plugin`.
pub const PLUGIN_NAME: &str = env!("CARGO_PKG_NAME");

const DEFAULT_VENDOR_CHUNK: [&str; 2] = ["react", "react-dom"];
const INDEX_HTML: &str = "index.html";
/// Seconds an SPA handler may cache assets for.
const SPA_CACHE_MAX_AGE: u64 = 86_400;

/// Fingerprints build output into an asset manifest and emits the loader,
/// plus the PWA files when enabled.
#[derive(Debug, Clone)]
pub struct BootstrapPlugin {
    config: BootkitConfig,
    manifest: Option<Arc<AssetManifest>>,
}

impl BootstrapPlugin {
    pub fn new(config: BootkitConfig) -> Self {
        Self {
            config,
            manifest: None,
        }
    }

    pub const fn settings(&self) -> &BootkitConfig {
        &self.config
    }

    /// Manifest of the last `generate_bundle` run.
    pub fn manifest(&self) -> Option<Arc<AssetManifest>> {
        self.manifest.clone()
    }

    /// Loader, manifest script and (when enabled) the unified manifest.
    fn core_files(&self) -> Vec<String> {
        let mut files = vec![
            self.config.bootstrap.bootstrap_file_name.clone(),
            MANIFEST_SCRIPT.to_string(),
        ];
        if self.config.integration.unified_manifest {
            files.push(UNIFIED_MANIFEST_FILE.to_string());
        }
        files
    }

    /// Every file this plugin writes under the current configuration.
    pub fn generated_files(&self) -> Vec<String> {
        let mut files = self.core_files();
        if self.config.pwa.enable {
            files.push(WEB_MANIFEST_FILE.to_string());
        }
        if self.config.emits_service_worker() {
            files.push(SERVICE_WORKER_FILE.to_string());
        }
        if self.config.registers_service_worker() {
            files.push(REGISTER_SW_FILE.to_string());
        }
        files
    }

    fn head_tags(&self) -> Vec<HeadTag> {
        let opts = &self.config.bootstrap;
        let mut tags = vec![HeadTag::script(
            opts.public_path(&opts.bootstrap_file_name),
        )];
        if self.config.pwa.enable {
            tags.push(HeadTag::manifest_link(format!("/{WEB_MANIFEST_FILE}")));
        }
        if self.config.registers_service_worker() {
            tags.push(HeadTag::script(format!("/{REGISTER_SW_FILE}")));
        }
        tags
    }

    /// Feed the bundle through the shared manifest builder.
    ///
    /// Files this plugin generates are left out, so running over an output
    /// directory that already contains them gives the same manifest.
    fn build_manifest(&self, bundle: &Bundle) -> AssetManifest {
        let opts = &self.config.bootstrap;
        let generated = self.generated_files();

        let mut builder = ManifestBuilder::new()
            .with_priorities(PriorityTable::with_overrides(&opts.priorities))
            .quiet(!is_verbose());

        let mut names: Vec<&str> = bundle
            .files()
            .map(|f| f.file_name.as_str())
            .filter(|name| !name.ends_with(".gz") && !generated.iter().any(|g| g == name))
            .collect();
        names.sort_unstable();

        for name in names {
            let Some(file) = bundle.get(name) else {
                continue;
            };
            let gzip_size = bundle.get(&format!("{name}.gz")).map(|gz| gz.size());
            builder.add_file(&web_path(name), file.size(), gzip_size);
        }

        let system_files = self.generated_files();
        let chunks_generated = bundle
            .files()
            .filter(|f| f.kind == super::OutputKind::Chunk && !system_files.contains(&f.file_name))
            .count();
        builder.set_meta(BuildMeta {
            app_name: opts.app_name.clone(),
            compression_enabled: opts.prefers_gzip(),
            chunks_generated,
            plugin: PLUGIN_NAME.to_string(),
        });
        builder.set_spa_handler(SpaHandlerInfo {
            root_path: "/".into(),
            fallback_file: INDEX_HTML.into(),
            enable_compression: opts.prefers_gzip(),
            enable_caching: true,
            cache_max_age: SPA_CACHE_MAX_AGE,
            system_files,
        });
        builder.set_pwa(PwaInfo {
            enabled: self.config.pwa.enable,
            manifest_file: WEB_MANIFEST_FILE.into(),
            service_worker_file: SERVICE_WORKER_FILE.into(),
            workbox_file: WORKBOX_FILE_PATTERN.into(),
        });
        builder.build()
    }

    /// Precache list of the service worker.
    fn precache_entries(
        &self,
        manifest: &AssetManifest,
        bundle: &Bundle,
        revisions: &FxHashMap<String, String>,
    ) -> Vec<PrecacheEntry> {
        let entry = |url: String| {
            let rev = revisions.get(&url).cloned();
            PrecacheEntry::new(url, rev)
        };

        let mut entries: Vec<PrecacheEntry> = manifest
            .css()
            .values()
            .chain(manifest.js().values())
            .map(|rec| entry(rec.original.clone()))
            .collect();

        if bundle.contains(INDEX_HTML) {
            entries.push(entry(format!("/{INDEX_HTML}")));
        }
        let mut extra = vec![
            self.config.bootstrap.bootstrap_file_name.clone(),
            MANIFEST_SCRIPT.to_string(),
        ];
        if self.config.pwa.enable {
            extra.push(WEB_MANIFEST_FILE.to_string());
        }
        entries.extend(extra.iter().map(|f| entry(format!("/{f}"))));
        entries.extend(self.config.integration.custom_entries.iter().cloned());
        entries
    }
}

/// Web path → content revision for every non-`.gz` file in the bundle.
fn content_revisions(bundle: &Bundle) -> FxHashMap<String, String> {
    bundle
        .files()
        .filter(|f| !f.file_name.ends_with(".gz"))
        .map(|f| (web_path(&f.file_name), revision(&f.content)))
        .collect()
}

impl BundlerPlugin for BootstrapPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn config(&self, config: &mut BuildConfig) {
        config.css_code_split = true;
        config.entry_file_names = "[name].js".into();
        config.chunk_file_names = "[name].js".into();
        config.asset_file_names = AssetFileNames {
            css: "assets/[name].[ext]".into(),
            other: "[name].[ext]".into(),
        };

        config.manual_chunks.insert(
            "vendor".into(),
            DEFAULT_VENDOR_CHUNK.iter().map(|m| m.to_string()).collect(),
        );
        for (name, modules) in &self.config.bootstrap.chunks {
            config.manual_chunks.insert(name.clone(), modules.clone());
        }

        debug!("plugin"; "app: {}, theme: {}", self.config.bootstrap.app_name, self.config.bootstrap.loading_theme.as_str());
    }

    fn transform_index_html(&self, html: &str) -> String {
        let html = html::strip_dev_entries(html);
        html::inject_head_tags(&html, &self.head_tags())
    }

    fn generate_bundle(&mut self, bundle: &mut Bundle) -> Result<()> {
        let opts = &self.config.bootstrap;
        let manifest = Arc::new(self.build_manifest(bundle));

        let manifest_js = render_manifest_script(&manifest)?;
        bundle.emit(
            MANIFEST_SCRIPT,
            minify_or_raw(Path::new(MANIFEST_SCRIPT), manifest_js, opts.minify),
        );
        bundle.emit(
            &opts.bootstrap_file_name,
            generate_bootstrap(&manifest, opts, &self.config.readiness)?,
        );

        if self.config.pwa.enable {
            bundle.emit(WEB_MANIFEST_FILE, render_web_manifest(&self.config.pwa.manifest)?);
        }

        if self.config.emits_service_worker() {
            let revisions = content_revisions(bundle);
            let precache = self.precache_entries(&manifest, bundle, &revisions);
            let sw = render_service_worker(
                &self.config.workbox,
                &self.config.pwa.service_worker,
                &precache,
                opts.minify,
            )?;
            bundle.emit(SERVICE_WORKER_FILE, sw);
        }

        if self.config.registers_service_worker() {
            bundle.emit(
                REGISTER_SW_FILE,
                render_register_script(&self.config.pwa.service_worker, opts.minify),
            );
        }

        if self.config.integration.unified_manifest {
            let unified = UnifiedManifest::build(
                &manifest,
                &self.core_files(),
                &self.config.integration,
                &content_revisions(bundle),
            );
            bundle.emit(UNIFIED_MANIFEST_FILE, unified.to_json_pretty()?);
        }

        let counts = manifest.counts();
        log!(
            "plugin";
            "{} css, {} js, {} assets; emitted {}",
            counts.css,
            counts.js,
            counts.assets,
            bundle
                .emitted()
                .map(|f| f.file_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        self.manifest = Some(manifest);
        Ok(())
    }
}
