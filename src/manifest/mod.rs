//! Asset manifest construction.
//!
//! # Module Structure
//!
//! ```text
//! manifest/
//! ├── record.rs    # AssetRecord, BuildInfo, AssetManifest
//! ├── logical.rs   # hashed name → logical name
//! ├── sequence.rs  # priority ordering of the loading sequence
//! ├── builder.rs   # ManifestBuilder (directory scan, bundle entries)
//! ├── script.rs    # asset-manifest.js
//! └── stats.rs     # statistics summary
//! ```
//!
//! A manifest maps the stable *logical* path of every CSS, JS and static
//! asset (`/assets/index.js`) to the file the bundler actually emitted
//! (`/assets/index-ab12cd34.js`), together with its size and the size of a
//! precompressed `.gz` sibling.

mod builder;
mod logical;
mod record;
mod script;
mod sequence;
mod stats;

pub use builder::{MANIFEST_VERSION, ManifestBuilder, ManifestError, build_from_dir};
pub use logical::{is_hash_scoped, logical_file_name, logical_path, web_path};
pub use record::{
    AssetCategory, AssetManifest, AssetRecord, BuildInfo, BuildMeta, LoadingSequence, PwaInfo,
    SpaHandlerInfo,
};
pub use script::{MANIFEST_SCRIPT, render_manifest_script, write_manifest_script};
pub use sequence::{DEFAULT_PRIORITY, PriorityTable};
pub use stats::{FileCounts, print_stats, summary_lines};
