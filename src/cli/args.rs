//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Asset manifests, bootstrap loaders and PWA files for single-page app builds
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (optional, default: bootkit.toml)
    #[arg(short = 'C', long, global = true, default_value = "bootkit.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate asset-manifest.js for a build output directory
    #[command(visible_alias = "m")]
    Manifest {
        /// Build output directory
        #[arg(default_value = "./dist", value_hint = clap::ValueHint::DirPath)]
        dist: PathBuf,

        /// Manifest script path (default: <DIST>/asset-manifest.js)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Run the bootstrap plugin over a build output directory
    #[command(visible_alias = "b")]
    Build {
        /// Build output directory
        #[arg(default_value = "./dist", value_hint = clap::ValueHint::DirPath)]
        dist: PathBuf,

        /// Minify generated scripts
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,

        /// Enable PWA output (web manifest, service worker)
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        pwa: Option<bool>,
    },

    /// Write a dev-server manifest and loader into the public directory
    #[command(visible_alias = "d")]
    Dev {
        /// Directory served as-is by the dev server
        #[arg(default_value = "public", value_hint = clap::ValueHint::DirPath)]
        public: PathBuf,

        /// Module entry served by the dev server
        #[arg(short, long, default_value = "/src/main.tsx")]
        entry: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_and_verbose_flags() {
        let err = Cli::try_parse_from(["bootkit", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let cli = Cli::try_parse_from(["bootkit", "build", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_manifest_defaults() {
        let cli = Cli::try_parse_from(["bootkit", "manifest"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("bootkit.toml"));
        assert!(!cli.verbose);
        match cli.command {
            Commands::Manifest { dist, output } => {
                assert_eq!(dist, PathBuf::from("./dist"));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_manifest_positional_args() {
        let cli = Cli::try_parse_from(["bootkit", "-v", "manifest", "out", "out/m.js"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Manifest { dist, output } => {
                assert_eq!(dist, PathBuf::from("out"));
                assert_eq!(output, Some(PathBuf::from("out/m.js")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_build_flags() {
        let cli = Cli::try_parse_from(["bootkit", "build", "web", "--pwa", "-C", "x.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        match cli.command {
            Commands::Build { dist, minify, pwa } => {
                assert_eq!(dist, PathBuf::from("web"));
                assert_eq!(minify, None);
                assert_eq!(pwa, Some(true));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_dev_defaults() {
        let cli = Cli::try_parse_from(["bootkit", "dev"]).unwrap();
        match cli.command {
            Commands::Dev { public, entry } => {
                assert_eq!(public, PathBuf::from("public"));
                assert_eq!(entry, "/src/main.tsx");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
