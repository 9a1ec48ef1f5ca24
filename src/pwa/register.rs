//! `registerSW.js` generation.

use std::path::Path;

use crate::{
    asset::minify::minify_or_raw,
    config::ServiceWorkerConfig,
    embed::pwa::{REGISTER_SW_JS, RegisterVars},
};

/// File name of the registration script in the build output.
pub const REGISTER_SW_FILE: &str = "registerSW.js";

/// Render the registration script.
///
/// Registration failures are logged in the browser, never thrown.
pub fn render_register_script(sw: &ServiceWorkerConfig, minify: bool) -> String {
    let script = REGISTER_SW_JS.render(&RegisterVars {
        src: sw.src.clone(),
        scope: sw.scope.clone(),
        update_via_cache: sw.update_strategy.update_via_cache(),
    });
    minify_or_raw(Path::new(REGISTER_SW_FILE), script, minify)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpdateStrategy;

    #[test]
    fn test_update_strategy_mapping() {
        let mut sw = ServiceWorkerConfig::default();
        for (strategy, expected) in [
            (UpdateStrategy::All, "all"),
            (UpdateStrategy::Hierarchical, "imports"),
            (UpdateStrategy::Minimal, "none"),
        ] {
            sw.update_strategy = strategy;
            let js = render_register_script(&sw, false);
            assert!(js.contains(&format!("var UPDATE_VIA_CACHE = \"{expected}\";")));
        }
    }

    #[test]
    fn test_src_and_scope() {
        let mut sw = ServiceWorkerConfig::default();
        sw.src = "/app/sw.js".into();
        sw.scope = "/app/".into();
        let js = render_register_script(&sw, false);
        assert!(js.contains("var SRC = \"/app/sw.js\";"));
        assert!(js.contains("var SCOPE = \"/app/\";"));
        assert!(js.contains("updateViaCache: UPDATE_VIA_CACHE"));
        assert!(js.contains("navigator.serviceWorker.controller"));
    }
}
