//! External bounding-box probe for OSM PBF headers.
//!
//! The header-inspection tool is an external collaborator: given a PBF path
//! it prints the file's bounding box as four comma-separated decimals on
//! stdout and exits non-zero on failure. One invocation per call; transient
//! failures are surfaced, never retried.

use std::process::{Command, ExitStatus};

use camino::Utf8Path;
use log::debug;
use skyline_core::{Bbox, BboxParseError};
use thiserror::Error;

/// Default header-inspection command, resolved on the search path.
pub const DEFAULT_OSMIUM_BIN: &str = "osmium";

/// Errors produced while probing a PBF header for its bounding box.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProbeError {
    /// The probe command could not be launched at all.
    #[error("failed to launch {command}: {source}")]
    Launch {
        /// The configured executable.
        command: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },
    /// The probe command ran but exited non-zero.
    #[error("failed to read bbox via {command} ({status}): {stderr}")]
    Failed {
        /// The configured executable.
        command: String,
        /// Exit status reported by the process.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// The probe output was not a valid bounding-box line.
    #[error(transparent)]
    Bounds(#[from] BboxParseError),
}

/// Header-inspection command used to read PBF bounding boxes.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use skyline_data::HeaderProbe;
///
/// # fn main() -> Result<(), skyline_data::ProbeError> {
/// let probe = HeaderProbe::default();
/// let bbox = probe.read_bounds(Utf8Path::new("uk.osm.pbf"))?;
/// println!("western edge: {}", bbox.min_lon);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HeaderProbe {
    command: String,
}

impl Default for HeaderProbe {
    fn default() -> Self {
        Self::new(DEFAULT_OSMIUM_BIN)
    }
}

impl HeaderProbe {
    /// Use `command` as the header-inspection executable.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The executable this probe invokes.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Read the bounding box from the header of the PBF at `path`.
    ///
    /// Blocks until the external command exits; no deadline is applied.
    pub fn read_bounds(&self, path: &Utf8Path) -> Result<Bbox, ProbeError> {
        debug!("reading header bounds of {path} via {}", self.command);
        let output = Command::new(&self.command)
            .args(["fileinfo", "--get", "header.bounds"])
            .arg(path.as_str())
            .output()
            .map_err(|source| ProbeError::Launch {
                command: self.command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(ProbeError::Failed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.trim().parse()?)
    }
}
