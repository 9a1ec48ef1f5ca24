//! `sw.js` generation.

use std::path::Path;

use serde::Serialize;

use super::PwaError;
use crate::{
    asset::minify::minify_or_raw,
    config::{PrecacheEntry, ServiceWorkerConfig, WorkboxOptions},
    embed::pwa::{SW_JS, ServiceWorkerVars},
    utils::hash::revision,
};

/// File name of the service worker in the build output.
pub const SERVICE_WORKER_FILE: &str = "sw.js";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExpirationLiteral {
    max_entries: u32,
    max_age_seconds: u64,
}

#[derive(Serialize)]
struct StrategyLiteral {
    js: &'static str,
    css: &'static str,
    images: &'static str,
    html: &'static str,
    api: &'static str,
}

/// Render the service worker.
///
/// `precache` is embedded only when `workbox.precache` is set. The cache
/// version is derived from the precache list, so a changed asset set yields
/// a changed worker and triggers the browser's update flow.
pub fn render_service_worker(
    workbox: &WorkboxOptions,
    sw: &ServiceWorkerConfig,
    precache: &[PrecacheEntry],
    minify: bool,
) -> Result<String, PwaError> {
    let precache = if workbox.precache { precache } else { &[] };
    let precache_json = serde_json::to_string(precache)
        .map_err(|err| PwaError::Serialize(SERVICE_WORKER_FILE, err))?;

    let s = &workbox.strategies;
    let strategies = StrategyLiteral {
        js: s.js.as_str(),
        css: s.css.as_str(),
        images: s.images.as_str(),
        html: s.html.as_str(),
        api: s.api.as_str(),
    };
    let expiration = ExpirationLiteral {
        max_entries: workbox.expiration.max_entries,
        max_age_seconds: workbox.expiration.max_age_seconds,
    };

    let script = SW_JS.render(&ServiceWorkerVars {
        cache_prefix: workbox.cache_name_prefix.clone(),
        cache_version: revision(&precache_json),
        strategies_json: serde_json::to_string(&strategies)
            .map_err(|err| PwaError::Serialize(SERVICE_WORKER_FILE, err))?,
        expiration_json: serde_json::to_string(&expiration)
            .map_err(|err| PwaError::Serialize(SERVICE_WORKER_FILE, err))?,
        precache_json,
        skip_waiting: sw.skip_waiting,
        clients_claim: sw.clients_claim,
        background_sync: workbox.background_sync,
    });

    Ok(minify_or_raw(Path::new(SERVICE_WORKER_FILE), script, minify))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheStrategy;

    fn entries() -> Vec<PrecacheEntry> {
        vec![
            PrecacheEntry::new("/assets/index-ab12cd34.js", Some("0123456789abcdef".into())),
            PrecacheEntry::new("/index.html", None),
        ]
    }

    #[test]
    fn test_render_defaults() {
        let js = render_service_worker(
            &WorkboxOptions::default(),
            &ServiceWorkerConfig::default(),
            &entries(),
            false,
        )
        .unwrap();

        assert!(js.contains("var CACHE_PREFIX = \"app-bootstrap\";"));
        assert!(js.contains("\"js\":\"stale-while-revalidate\""));
        assert!(js.contains("\"images\":\"cache-first\""));
        assert!(js.contains("\"api\":\"network-first\""));
        assert!(js.contains("\"maxEntries\":60"));
        assert!(js.contains("\"maxAgeSeconds\":2592000"));
        assert!(js.contains("/assets/index-ab12cd34.js"));
        assert!(js.contains("var SKIP_WAITING = true;"));
        assert!(js.contains("var BACKGROUND_SYNC = false;"));
    }

    #[test]
    fn test_precache_can_be_disabled() {
        let mut workbox = WorkboxOptions::default();
        workbox.precache = false;
        workbox.strategies.html = CacheStrategy::CacheFirst;
        let js =
            render_service_worker(&workbox, &ServiceWorkerConfig::default(), &entries(), false)
                .unwrap();
        assert!(js.contains("var PRECACHE = [];"));
        assert!(js.contains("\"html\":\"cache-first\""));
    }

    #[test]
    fn test_cache_version_follows_precache() {
        let workbox = WorkboxOptions::default();
        let sw = ServiceWorkerConfig::default();
        let a = render_service_worker(&workbox, &sw, &entries(), false).unwrap();
        let b = render_service_worker(&workbox, &sw, &entries()[..1], false).unwrap();
        let c = render_service_worker(&workbox, &sw, &entries(), false).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, c);
    }
}
