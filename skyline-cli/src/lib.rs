//! Command-line interface for Skyline's offline tooling.
#![forbid(unsafe_code)]

mod combine;
mod error;
mod extract;
mod manifest;

use camino::Utf8Path;
use clap::{Parser, Subcommand};

pub use error::CliError;

const ARG_MANIFEST_REGION_ID: &str = "region-id";
const ARG_MANIFEST_DB: &str = "db";
const ARG_MANIFEST_PBF: &str = "pbf";
const ARG_MANIFEST_OUTPUT: &str = "output";
const ARG_MANIFEST_OSMIUM_BIN: &str = "osmium-bin";
const ARG_COMBINE_INPUT_GLOB: &str = "input-glob";
const ARG_COMBINE_OUTPUT: &str = "output";
const ARG_COMBINE_UPDATED_AT: &str = "updated-at";
const ARG_EXTRACT_PBF: &str = "pbf";
const ARG_EXTRACT_OUTPUT: &str = "output";

const ENV_MANIFEST_REGION_ID: &str = "SKYLINE_CMDS_MANIFEST_REGION_ID";
const ENV_MANIFEST_DB: &str = "SKYLINE_CMDS_MANIFEST_DB";
const ENV_MANIFEST_PBF: &str = "SKYLINE_CMDS_MANIFEST_PBF";
const ENV_MANIFEST_OUTPUT: &str = "SKYLINE_CMDS_MANIFEST_OUTPUT";
const ENV_COMBINE_OUTPUT: &str = "SKYLINE_CMDS_COMBINE_OUTPUT";
const ENV_EXTRACT_PBF: &str = "SKYLINE_CMDS_EXTRACT_PBF";
const ENV_EXTRACT_OUTPUT: &str = "SKYLINE_CMDS_EXTRACT_OUTPUT";

/// Run the Skyline CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Manifest(args) => manifest::run_manifest(args),
        Command::Combine(args) => combine::run_combine(args),
        Command::Extract(args) => {
            let mut stdout = std::io::stdout().lock();
            extract::run_extract_with(args, &mut stdout)
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "skyline",
    about = "Offline data preparation utilities for the Skyline viewer",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the JSON manifest for a prepared region database.
    Manifest(manifest::ManifestArgs),
    /// Combine per-region manifests into one document.
    Combine(combine::CombineArgs),
    /// Extract skyline features from an OSM PBF into a region database.
    Extract(extract::ExtractArgs),
}

/// Check that a source path exists and is a regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match skyline_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
