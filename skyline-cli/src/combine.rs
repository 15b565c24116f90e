//! Combine command implementation for the Skyline CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use skyline_data::{combine_manifests, write_combined_manifest};

use crate::{
    ARG_COMBINE_INPUT_GLOB, ARG_COMBINE_OUTPUT, ARG_COMBINE_UPDATED_AT, CliError,
    ENV_COMBINE_OUTPUT,
};

/// Glob used when no `--input-glob` is supplied.
const DEFAULT_INPUT_GLOB: &str = "manifests/**/manifest.json";

/// CLI arguments for the `combine` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Combine every per-region manifest matched by the glob into \
                 one document, ordered by the lexicographic order of the \
                 matched paths, and stamp it with a UTC timestamp (or the \
                 supplied override, verbatim).",
    about = "Combine per-region manifests into one document"
)]
#[ortho_config(prefix = "SKYLINE")]
pub(crate) struct CombineArgs {
    /// Glob for input manifest files.
    #[arg(long = ARG_COMBINE_INPUT_GLOB, value_name = "glob")]
    #[serde(default)]
    pub(crate) input_glob: Option<String>,
    /// Where to write the combined manifest.
    #[arg(long = ARG_COMBINE_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Override the updated_at timestamp (defaults to current UTC).
    #[arg(long = ARG_COMBINE_UPDATED_AT, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) updated_at: Option<String>,
}

impl CombineArgs {
    pub(crate) fn into_config(self) -> Result<CombineConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CombineConfig::try_from(merged)
    }
}

/// Resolved `combine` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CombineConfig {
    pub(crate) input_glob: String,
    pub(crate) output: Utf8PathBuf,
    pub(crate) updated_at: Option<String>,
}

impl TryFrom<CombineArgs> for CombineConfig {
    type Error = CliError;

    fn try_from(args: CombineArgs) -> Result<Self, Self::Error> {
        let output = args.output.ok_or(CliError::MissingArgument {
            field: ARG_COMBINE_OUTPUT,
            env: ENV_COMBINE_OUTPUT,
        })?;
        let input_glob = args
            .input_glob
            .unwrap_or_else(|| DEFAULT_INPUT_GLOB.to_owned());
        Ok(Self {
            input_glob,
            output,
            updated_at: args.updated_at,
        })
    }
}

pub(super) fn run_combine(args: CombineArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_with_config(&config)
}

pub(crate) fn run_with_config(config: &CombineConfig) -> Result<(), CliError> {
    let combined = combine_manifests(&config.input_glob, config.updated_at.as_deref())?;
    write_combined_manifest(&combined, &config.output)?;
    Ok(())
}
