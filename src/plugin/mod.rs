//! Bundler integration.
//!
//! The bundler is modelled by three hooks, called in this order:
//!
//! 1. [`BundlerPlugin::config`] before the build, to adjust output naming;
//! 2. [`BundlerPlugin::transform_index_html`] for the HTML entry;
//! 3. [`BundlerPlugin::generate_bundle`] once all output files exist.
//!
//! [`BootstrapPlugin`] is the one implementation. The CLI `build` command
//! drives it over an existing output directory.

mod bootstrap;
mod build_config;
mod bundle;
mod html;

pub use bootstrap::{BootstrapPlugin, PLUGIN_NAME};
pub use build_config::{AssetFileNames, BuildConfig};
pub use bundle::{Bundle, OutputFile, OutputKind};
pub use html::{HeadTag, inject_head_tags, strip_dev_entries};

use anyhow::Result;

pub trait BundlerPlugin {
    fn name(&self) -> &str;

    /// Adjust build options before bundling.
    fn config(&self, _config: &mut BuildConfig) {}

    /// Rewrite the HTML entry.
    fn transform_index_html(&self, html: &str) -> String {
        html.to_string()
    }

    /// Inspect the finished output and emit extra files into it.
    fn generate_bundle(&mut self, bundle: &mut Bundle) -> Result<()>;
}
