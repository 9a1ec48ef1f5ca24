//! Bundler build options touched by the `config` hook.

use indexmap::IndexMap;

/// Output file name patterns for non-chunk assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFileNames {
    /// Pattern for stylesheets.
    pub css: String,
    /// Pattern for everything else.
    pub other: String,
}

impl Default for AssetFileNames {
    fn default() -> Self {
        Self {
            css: "assets/[name]-[hash].[ext]".into(),
            other: "assets/[name]-[hash].[ext]".into(),
        }
    }
}

impl AssetFileNames {
    pub fn pattern_for(&self, name: &str) -> &str {
        if name.ends_with(".css") {
            &self.css
        } else {
            &self.other
        }
    }

    /// Output file name of the asset `name` (`[hash]` is left to the bundler).
    pub fn resolve(&self, name: &str) -> String {
        let (stem, ext) = name.rsplit_once('.').unwrap_or((name, ""));
        self.pattern_for(name)
            .replace("[name]", stem)
            .replace("[ext]", ext)
    }
}

/// The slice of bundler configuration the plugin adjusts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub css_code_split: bool,
    pub entry_file_names: String,
    pub chunk_file_names: String,
    pub asset_file_names: AssetFileNames,
    /// Chunk name → module ids.
    pub manual_chunks: IndexMap<String, Vec<String>>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            css_code_split: false,
            entry_file_names: "assets/[name]-[hash].js".into(),
            chunk_file_names: "assets/[name]-[hash].js".into(),
            asset_file_names: AssetFileNames::default(),
            manual_chunks: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_asset_name() {
        let names = AssetFileNames {
            css: "assets/[name].[ext]".into(),
            other: "[name].[ext]".into(),
        };
        assert_eq!(names.resolve("index.css"), "assets/index.css");
        assert_eq!(names.resolve("logo.svg"), "logo.svg");
    }
}
