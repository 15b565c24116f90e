//! Combining per-region manifests into one document.
//!
//! The combiner only ever reads its inputs: each matched file is parsed as
//! JSON and embedded as-is, with no shape validation, so the published
//! combined manifest reproduces whatever the per-region generators wrote.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use log::debug;
use skyline_core::{CombinedManifest, to_json_payload};
use thiserror::Error;

/// Errors produced while combining or writing manifests.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CombineError {
    /// The supplied glob pattern was not valid.
    #[error("invalid manifest glob {pattern:?}: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying pattern error.
        #[source]
        source: glob::PatternError,
    },
    /// Enumerating a matched path failed.
    #[error("failed to enumerate manifests for {pattern:?}: {source}")]
    Enumerate {
        /// The pattern being expanded.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::GlobError,
    },
    /// A matched path was not valid UTF-8.
    #[error("matched manifest path {path:?} is not valid UTF-8")]
    NonUtf8Path {
        /// The offending path.
        path: std::path::PathBuf,
    },
    /// No manifest files matched the glob.
    #[error("no manifests matched glob: {pattern}")]
    NoMatches {
        /// The pattern that matched nothing.
        pattern: String,
    },
    /// Reading a matched manifest failed.
    #[error("failed to read manifest {path}: {source}")]
    Read {
        /// The unreadable manifest.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A matched manifest was not valid JSON.
    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        /// The malformed manifest.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Serialising the combined document failed.
    #[error("failed to serialise combined manifest: {0}")]
    Serialise(#[source] serde_json::Error),
    /// Creating the output's parent directories failed.
    #[error("failed to create parent directory for {path}: {source}")]
    CreateDirectory {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Writing the combined manifest failed.
    #[error("failed to write combined manifest to {path}: {source}")]
    Write {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Expand `pattern` (recursive wildcards supported) and combine every
/// matching manifest document.
///
/// Matches are ordered by the lexicographic order of their path strings,
/// independent of filesystem enumeration order; this is the sole ordering
/// guarantee for the `regions` sequence. Zero matches is a hard failure, never an
/// empty document. `updated_at` is reproduced verbatim when supplied;
/// otherwise the current UTC time is truncated to whole seconds and given a
/// literal `Z` suffix.
pub fn combine_manifests(
    pattern: &str,
    updated_at: Option<&str>,
) -> Result<CombinedManifest, CombineError> {
    let paths = matched_paths(pattern)?;
    debug!("combining {} manifests matched by {pattern}", paths.len());

    let mut regions = Vec::with_capacity(paths.len());
    for path in &paths {
        let text = skyline_fs::read_to_string(path).map_err(|source| CombineError::Read {
            path: path.clone(),
            source,
        })?;
        let document = serde_json::from_str(&text).map_err(|source| CombineError::Parse {
            path: path.clone(),
            source,
        })?;
        regions.push(document);
    }

    Ok(CombinedManifest {
        updated_at: updated_at.map_or_else(default_timestamp, str::to_owned),
        regions,
    })
}

/// Write the combined document to `output`, creating any missing parent
/// directories first.
pub fn write_combined_manifest(
    combined: &CombinedManifest,
    output: &Utf8Path,
) -> Result<(), CombineError> {
    let payload = to_json_payload(combined).map_err(CombineError::Serialise)?;
    skyline_fs::ensure_parent_dir(output).map_err(|source| CombineError::CreateDirectory {
        path: output.to_path_buf(),
        source,
    })?;
    skyline_fs::write_file(output, payload).map_err(|source| CombineError::Write {
        path: output.to_path_buf(),
        source,
    })
}

fn matched_paths(pattern: &str) -> Result<Vec<Utf8PathBuf>, CombineError> {
    let matches = glob::glob(pattern).map_err(|source| CombineError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in matches {
        let path = entry.map_err(|source| CombineError::Enumerate {
            pattern: pattern.to_owned(),
            source,
        })?;
        let path =
            Utf8PathBuf::from_path_buf(path).map_err(|path| CombineError::NonUtf8Path { path })?;
        paths.push(path);
    }
    paths.sort();

    if paths.is_empty() {
        return Err(CombineError::NoMatches {
            pattern: pattern.to_owned(),
        });
    }
    Ok(paths)
}

/// Current UTC time truncated to whole seconds with a literal `Z` suffix.
fn default_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn write_manifest(dir: &TempDir, relative: &str, body: &str) {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create manifest dirs");
        }
        fs::write(path, body).expect("write manifest");
    }

    fn pattern(dir: &TempDir, suffix: &str) -> String {
        format!("{}/{suffix}", dir.path().display())
    }

    #[rstest]
    fn orders_regions_by_path(temp_dir: TempDir) {
        // Write in reverse order so enumeration order cannot mask a missing sort.
        write_manifest(&temp_dir, "b.json", r#"{"region": "b"}"#);
        write_manifest(&temp_dir, "a.json", r#"{"region": "a"}"#);

        let combined = combine_manifests(&pattern(&temp_dir, "*.json"), None).expect("combine");

        assert_eq!(combined.regions.len(), 2);
        assert_eq!(combined.regions[0]["region"], "a");
        assert_eq!(combined.regions[1]["region"], "b");
    }

    #[rstest]
    fn expands_recursive_patterns(temp_dir: TempDir) {
        write_manifest(&temp_dir, "manifests/uk/manifest.json", r#"{"region": "uk"}"#);
        write_manifest(&temp_dir, "manifests/de/manifest.json", r#"{"region": "de"}"#);

        let combined = combine_manifests(&pattern(&temp_dir, "manifests/**/manifest.json"), None)
            .expect("combine");

        assert_eq!(combined.regions[0]["region"], "de");
        assert_eq!(combined.regions[1]["region"], "uk");
    }

    #[rstest]
    fn zero_matches_is_a_hard_failure(temp_dir: TempDir) {
        let err = combine_manifests(&pattern(&temp_dir, "*.json"), None)
            .expect_err("empty match should fail");
        assert!(matches!(err, CombineError::NoMatches { .. }));
    }

    #[rstest]
    fn malformed_json_names_the_offending_path(temp_dir: TempDir) {
        write_manifest(&temp_dir, "a.json", r#"{"region": "a"}"#);
        write_manifest(&temp_dir, "broken.json", "{not json");

        let err = combine_manifests(&pattern(&temp_dir, "*.json"), None)
            .expect_err("malformed input should fail");
        match err {
            CombineError::Parse { path, .. } => {
                assert_eq!(path.file_name(), Some("broken.json"));
            }
            other => panic!("expected Parse, found {other:?}"),
        }
    }

    #[rstest]
    fn override_timestamp_is_verbatim(temp_dir: TempDir) {
        write_manifest(&temp_dir, "a.json", "{}");

        let combined = combine_manifests(&pattern(&temp_dir, "*.json"), Some("yesterday-ish"))
            .expect("combine");
        assert_eq!(combined.updated_at, "yesterday-ish");
    }

    #[rstest]
    fn default_timestamp_is_utc_whole_seconds(temp_dir: TempDir) {
        write_manifest(&temp_dir, "a.json", "{}");

        let combined = combine_manifests(&pattern(&temp_dir, "*.json"), None).expect("combine");

        let stamp = &combined.updated_at;
        assert!(stamp.ends_with('Z'));
        NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%SZ")
            .expect("timestamp should be second-precision UTC");
    }

    #[rstest]
    fn embeds_documents_without_reordering_keys(temp_dir: TempDir) {
        write_manifest(&temp_dir, "a.json", r#"{"zulu": 1, "alpha": 2}"#);

        let combined = combine_manifests(&pattern(&temp_dir, "*.json"), Some("t")).expect("combine");
        let payload = to_json_payload(&combined).expect("serialise combined manifest");

        let zulu = payload.find("\"zulu\"").expect("zulu present");
        let alpha = payload.find("\"alpha\"").expect("alpha present");
        assert!(zulu < alpha, "input key order should be preserved");
    }

    #[rstest]
    fn accepts_any_json_value(temp_dir: TempDir) {
        write_manifest(&temp_dir, "a.json", "[1, 2, 3]");

        let combined = combine_manifests(&pattern(&temp_dir, "*.json"), Some("t")).expect("combine");
        assert_eq!(combined.regions[0], serde_json::json!([1, 2, 3]));
    }

    #[rstest]
    fn writes_into_created_parent_directories(temp_dir: TempDir) {
        write_manifest(&temp_dir, "a.json", "{}");
        let output = Utf8PathBuf::from_path_buf(temp_dir.path().join("out/nested/combined.json"))
            .expect("utf-8 path");

        let combined =
            combine_manifests(&pattern(&temp_dir, "*.json"), Some("t")).expect("combine");
        write_combined_manifest(&combined, &output).expect("write combined manifest");

        let written = fs::read_to_string(output.as_std_path()).expect("read combined back");
        assert!(written.ends_with("}\n"));
        let parsed: CombinedManifest =
            serde_json::from_str(&written).expect("combined should round-trip");
        assert_eq!(parsed, combined);
    }
}
