//! `bootkit manifest`: scan an output directory into `asset-manifest.js`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    config::BootkitConfig,
    log,
    manifest::{
        AssetManifest, MANIFEST_SCRIPT, PriorityTable, build_from_dir, print_stats,
        write_manifest_script,
    },
};

/// Where the manifest script goes when no output path is given.
pub fn default_output(dist: &Path) -> PathBuf {
    dist.join(MANIFEST_SCRIPT)
}

/// Scan `dist`, write the manifest script and print the statistics.
pub fn generate_manifest(
    config: &BootkitConfig,
    dist: &Path,
    output: Option<&Path>,
) -> Result<AssetManifest> {
    let output = output.map_or_else(|| default_output(dist), Path::to_path_buf);
    log!("manifest"; "scanning {}", dist.display());

    // a previous run's script must not list itself
    let exclude = [output.clone()];
    let priorities = PriorityTable::with_overrides(&config.bootstrap.priorities);
    let manifest = build_from_dir(dist, priorities, &exclude)
        .with_context(|| format!("failed to build manifest for {}", dist.display()))?;

    write_manifest_script(&manifest, &output)?;
    log!("manifest"; "wrote {}", output.display());
    print_stats(&manifest);
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_into_dist() {
        let dir = TempDir::new().unwrap();
        let dist = dir.path();
        fs::create_dir_all(dist.join("assets")).unwrap();
        fs::write(dist.join("assets/index-1a2b3c4d.js"), "console.log(1)").unwrap();
        fs::write(dist.join("assets/index-1a2b3c4d.css"), "body{}").unwrap();
        fs::write(dist.join("vendor-deadbeef.js"), "var v").unwrap();

        let manifest = generate_manifest(&BootkitConfig::default(), dist, None).unwrap();
        assert_eq!(manifest.loading_sequence().js, ["/vendor.js", "/assets/index.js"]);

        let script = fs::read_to_string(dist.join(MANIFEST_SCRIPT)).unwrap();
        assert!(script.contains("/assets/index-1a2b3c4d.js"));

        // rerun does not pick the script up as an asset
        let again = generate_manifest(&BootkitConfig::default(), dist, None).unwrap();
        assert_eq!(again.total_files(), manifest.total_files());
    }

    #[test]
    fn test_custom_output_path() {
        let dir = TempDir::new().unwrap();
        let dist = dir.path().join("dist");
        fs::create_dir_all(&dist).unwrap();
        fs::write(dist.join("app.js"), "1").unwrap();
        let output = dir.path().join("public/manifest.js");

        generate_manifest(&BootkitConfig::default(), &dist, Some(&output)).unwrap();
        assert!(output.exists());
        assert!(!dist.join(MANIFEST_SCRIPT).exists());
    }

    #[test]
    fn test_missing_dist_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = generate_manifest(&BootkitConfig::default(), &dir.path().join("nope"), None)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ManifestError>(),
            Some(ManifestError::BuildDirNotFound(_))
        ));
    }
}
