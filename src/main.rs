//! bootkit - asset manifests, bootstrap loaders and PWA files for SPA builds.

use std::process::ExitCode;

use anyhow::Result;
use bootkit::{
    bootstrap::generate_dev_files,
    cli::{Cli, Commands, build::build_output, manifest::generate_manifest},
    config::BootkitConfig,
    logger,
};
use clap::{ColorChoice, Parser};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger::error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = BootkitConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Manifest { dist, output } => {
            generate_manifest(&config, dist, output.as_deref()).map(|_| ())
        }
        Commands::Build { dist, minify, pwa } => {
            BootkitConfig::update_option(&mut config.bootstrap.minify, minify.as_ref());
            BootkitConfig::update_option(&mut config.pwa.enable, pwa.as_ref());
            config.validate()?;
            build_output(config, dist).map(|_| ())
        }
        Commands::Dev { public, entry } => {
            generate_dev_files(&config.bootstrap, &config.readiness, public, entry)
        }
    }
}
