//! Embedded browser-side resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `manifest` - `asset-manifest.js`
//! - `bootstrap` - bootstrap loader script and loading-screen stylesheet
//! - `pwa` - service worker and registration script
//!
//! Placeholders are `__NAME__` tokens. Values are substituted as JSON
//! literals, so every template stays valid JavaScript after rendering.
//!
//! # Usage
//!
//! ```ignore
//! use embed::pwa::{REGISTER_SW_JS, RegisterVars};
//!
//! let js = REGISTER_SW_JS.render(&RegisterVars { src: "/sw.js".into(), .. });
//! ```

mod template;

pub use template::{Template, TemplateVars, json_literal};

/// Crate version stamped into generated headers.
const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod manifest {
    use super::{Template, TemplateVars, VERSION};

    /// Variables for `asset-manifest.js`.
    pub struct ManifestVars {
        /// Pretty JSON of the manifest.
        pub manifest_json: String,
        /// RFC 3339 generation time.
        pub generated_at: String,
    }

    impl TemplateVars for ManifestVars {
        fn pairs(&self) -> Vec<(&'static str, String)> {
            vec![
                ("__VERSION__", VERSION.to_string()),
                ("__GENERATED_AT__", self.generated_at.clone()),
                ("__MANIFEST__", self.manifest_json.clone()),
            ]
        }
    }

    /// Manifest script with lookup helpers.
    pub const ASSET_MANIFEST_JS: Template<ManifestVars> =
        Template::new(include_str!("runtime/asset-manifest.js"));
}

pub mod bootstrap {
    use super::{Template, TemplateVars, VERSION, json_literal};

    /// Loading-screen stylesheet shared by the loader script and the cache
    /// manager markup.
    pub const LOADING_CSS: &str = include_str!("runtime/loading.css");

    /// Variables for the bootstrap loader.
    pub struct BootstrapVars {
        /// JSON of the asset manifest.
        pub manifest_json: String,
        /// JSON of the loader options.
        pub options_json: String,
        /// JSON of the readiness settings.
        pub readiness_json: String,
    }

    impl TemplateVars for BootstrapVars {
        fn pairs(&self) -> Vec<(&'static str, String)> {
            vec![
                ("__VERSION__", VERSION.to_string()),
                ("__OPTIONS__", self.options_json.clone()),
                ("__READINESS__", self.readiness_json.clone()),
                ("__LOADING_CSS__", json_literal(LOADING_CSS)),
                // last: the manifest may contain placeholder-like text
                ("__MANIFEST__", self.manifest_json.clone()),
            ]
        }
    }

    /// Bootstrap loader template.
    pub const BOOTSTRAP_JS: Template<BootstrapVars> =
        Template::new(include_str!("runtime/bootstrap.js"));
}

pub mod pwa {
    use super::{Template, TemplateVars, VERSION, json_literal};

    /// Variables for `sw.js`. JSON fields are rendered literals.
    pub struct ServiceWorkerVars {
        pub cache_prefix: String,
        pub cache_version: String,
        pub precache_json: String,
        pub strategies_json: String,
        pub expiration_json: String,
        pub skip_waiting: bool,
        pub clients_claim: bool,
        pub background_sync: bool,
    }

    impl TemplateVars for ServiceWorkerVars {
        fn pairs(&self) -> Vec<(&'static str, String)> {
            vec![
                ("__VERSION__", VERSION.to_string()),
                ("__CACHE_PREFIX__", json_literal(&self.cache_prefix)),
                ("__CACHE_VERSION__", json_literal(&self.cache_version)),
                ("__STRATEGIES__", self.strategies_json.clone()),
                ("__EXPIRATION__", self.expiration_json.clone()),
                ("__SKIP_WAITING__", self.skip_waiting.to_string()),
                ("__CLIENTS_CLAIM__", self.clients_claim.to_string()),
                ("__BACKGROUND_SYNC__", self.background_sync.to_string()),
                ("__PRECACHE__", self.precache_json.clone()),
            ]
        }
    }

    /// Service worker template.
    pub const SW_JS: Template<ServiceWorkerVars> = Template::new(include_str!("runtime/sw.js"));

    /// Variables for `registerSW.js`.
    pub struct RegisterVars {
        pub src: String,
        pub scope: String,
        pub update_via_cache: &'static str,
    }

    impl TemplateVars for RegisterVars {
        fn pairs(&self) -> Vec<(&'static str, String)> {
            vec![
                ("__VERSION__", VERSION.to_string()),
                ("__SW_SRC__", json_literal(&self.src)),
                ("__SW_SCOPE__", json_literal(&self.scope)),
                ("__UPDATE_VIA_CACHE__", json_literal(self.update_via_cache)),
            ]
        }
    }

    /// Service worker registration template.
    pub const REGISTER_SW_JS: Template<RegisterVars> =
        Template::new(include_str!("runtime/register-sw.js"));
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDERS: &[&str] = &[
        "__VERSION__",
        "__GENERATED_AT__",
        "__MANIFEST__",
        "__OPTIONS__",
        "__READINESS__",
        "__LOADING_CSS__",
        "__SW_SRC__",
        "__SW_SCOPE__",
        "__UPDATE_VIA_CACHE__",
    ];

    fn assert_no_placeholders(rendered: &str) {
        for placeholder in PLACEHOLDERS {
            assert!(!rendered.contains(placeholder), "unrendered {placeholder}");
        }
    }

    #[test]
    fn test_manifest_template() {
        let js = manifest::ASSET_MANIFEST_JS.render(&manifest::ManifestVars {
            manifest_json: "{\"css\":{}}".into(),
            generated_at: "2024-01-01T00:00:00Z".into(),
        });
        assert!(js.contains("window.ASSET_MANIFEST = {\"css\":{}};"));
        assert!(js.contains("window.getGzippedPath"));
        assert!(js.contains("2024-01-01T00:00:00Z"));
        assert_no_placeholders(&js);
    }

    #[test]
    fn test_bootstrap_template() {
        let js = bootstrap::BOOTSTRAP_JS.render(&bootstrap::BootstrapVars {
            manifest_json: "{}".into(),
            options_json: "{\"debug\":false}".into(),
            readiness_json: "{\"rootId\":\"root\"}".into(),
        });
        assert!(js.contains("var OPTIONS = {\"debug\":false};"));
        assert!(js.contains("#loading-screen"));
        assert!(js.contains("APP_BOOTSTRAP_EVENTS"));
        assert_no_placeholders(&js);
    }

    #[test]
    fn test_register_template() {
        let js = pwa::REGISTER_SW_JS.render(&pwa::RegisterVars {
            src: "/sw.js".into(),
            scope: "/".into(),
            update_via_cache: "imports",
        });
        assert!(js.contains("var SRC = \"/sw.js\";"));
        assert!(js.contains("var UPDATE_VIA_CACHE = \"imports\";"));
        assert_no_placeholders(&js);
    }
}
