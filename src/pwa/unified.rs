//! `unified-manifest.json`: one precache list for SPA handlers and workers.

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::{PwaError, REGISTER_SW_FILE, SERVICE_WORKER_FILE, WEB_MANIFEST_FILE};
use crate::{
    config::{IntegrationConfig, PrecacheEntry},
    manifest::AssetManifest,
};

/// File name of the unified manifest in the build output.
pub const UNIFIED_MANIFEST_FILE: &str = "unified-manifest.json";

/// Version of the unified manifest format.
pub const UNIFIED_MANIFEST_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedMetadata {
    pub total_files: usize,
    pub spa_handler_compatible: bool,
    pub pwa_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedManifest {
    pub version: &'static str,
    pub timestamp: u64,
    pub entries: Vec<PrecacheEntry>,
    pub metadata: UnifiedMetadata,
}

impl UnifiedManifest {
    /// Collect entries in order: JS, CSS, system files, PWA files, caller
    /// entries.
    ///
    /// `revisions` maps a URL to its content revision when known.
    pub fn build(
        manifest: &AssetManifest,
        system_files: &[String],
        integration: &IntegrationConfig,
        revisions: &FxHashMap<String, String>,
    ) -> Self {
        let entry = |url: String| {
            let revision = revisions.get(&url).cloned();
            PrecacheEntry::new(url, revision)
        };

        let mut entries: Vec<PrecacheEntry> = manifest
            .js()
            .values()
            .chain(manifest.css().values())
            .map(|rec| entry(rec.original.clone()))
            .collect();

        entries.extend(system_files.iter().map(|f| entry(format!("/{f}"))));

        if integration.include_pwa {
            entries.push(entry(format!("/{WEB_MANIFEST_FILE}")));
        }
        if integration.include_sw {
            entries.push(entry(format!("/{SERVICE_WORKER_FILE}")));
            entries.push(entry(format!("/{REGISTER_SW_FILE}")));
        }
        entries.extend(integration.custom_entries.iter().cloned());

        Self {
            version: UNIFIED_MANIFEST_VERSION,
            timestamp: manifest.build_info().timestamp,
            metadata: UnifiedMetadata {
                total_files: entries.len(),
                spa_handler_compatible: true,
                pwa_enabled: integration.include_pwa,
            },
            entries,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, PwaError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| PwaError::Serialize(UNIFIED_MANIFEST_FILE, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestBuilder;

    #[test]
    fn test_entry_order_and_metadata() {
        let mut builder = ManifestBuilder::new().quiet(true).with_timestamp(7);
        builder.add_file("/assets/app-ab12cd34.css", 10, None);
        builder.add_file("/index-ab12cd34.js", 10, None);
        let manifest = builder.build();

        let integration = IntegrationConfig {
            unified_manifest: true,
            include_pwa: true,
            include_sw: false,
            custom_entries: vec![PrecacheEntry::new("/offline.html", Some("v1".into()))],
        };
        let mut revisions = FxHashMap::default();
        revisions.insert("/index-ab12cd34.js".to_string(), "abc".to_string());

        let unified = UnifiedManifest::build(
            &manifest,
            &["AppBootstrap.js".to_string(), "asset-manifest.js".to_string()],
            &integration,
            &revisions,
        );

        let urls: Vec<&str> = unified.entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "/index-ab12cd34.js",
                "/assets/app-ab12cd34.css",
                "/AppBootstrap.js",
                "/asset-manifest.js",
                "/manifest.webmanifest",
                "/offline.html",
            ]
        );
        assert_eq!(unified.entries[0].revision.as_deref(), Some("abc"));
        assert_eq!(unified.entries[1].revision, None);
        assert_eq!(unified.metadata.total_files, 6);
        assert!(unified.metadata.pwa_enabled);
        assert_eq!(unified.timestamp, 7);

        let json: serde_json::Value =
            serde_json::from_str(&unified.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["metadata"]["spaHandlerCompatible"], true);
        assert_eq!(json["metadata"]["totalFiles"], 6);
    }
}
