//! Build statistics summary.

use super::AssetManifest;
use crate::{log, utils::size::format_size};

/// Counts by bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileCounts {
    pub css: usize,
    pub js: usize,
    pub assets: usize,
}

impl FileCounts {
    pub const fn total(self) -> usize {
        self.css + self.js + self.assets
    }
}

impl AssetManifest {
    pub fn counts(&self) -> FileCounts {
        FileCounts {
            css: self.css.len(),
            js: self.js.len(),
            assets: self.assets.len(),
        }
    }
}

/// Summary lines in display order.
pub fn summary_lines(manifest: &AssetManifest) -> Vec<String> {
    let info = manifest.build_info();
    let counts = manifest.counts();
    vec![
        format!("original size:    {}", format_size(info.total_original_size())),
        format!("compressed size:  {}", format_size(info.total_compressed_size())),
        format!("compression:      {}%", info.compression_ratio()),
        format!("space saved:      {}", format_size(info.space_saved())),
        format!(
            "files:            {} css, {} js, {} assets ({} total)",
            counts.css,
            counts.js,
            counts.assets,
            counts.total()
        ),
    ]
}

/// Print the statistics summary.
pub fn print_stats(manifest: &AssetManifest) {
    for line in summary_lines(manifest) {
        log!("manifest"; "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestBuilder;

    #[test]
    fn test_summary() {
        let mut builder = ManifestBuilder::new().quiet(true);
        builder.add_file("/a.js", 2048, Some(1024));
        builder.add_file("/b.css", 1024, None);
        builder.add_file("/c.png", 1024, None);
        let manifest = builder.build();

        let lines = summary_lines(&manifest);
        assert_eq!(lines[0], "original size:    4 KB");
        assert_eq!(lines[1], "compressed size:  3 KB");
        assert_eq!(lines[2], "compression:      25%");
        assert_eq!(lines[3], "space saved:      1 KB");
        assert!(lines[4].contains("1 css, 1 js, 1 assets (3 total)"));
    }
}
