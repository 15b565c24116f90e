//! Feature extraction from OSM PBF extracts.
//!
//! Mirrors the two-pass shape of the region build: a parallel scan collects
//! node features (peaks, masts, towers) and tall-building candidates, then
//! a sequential pass over the same file resolves building anchor
//! coordinates the first pass could not see. Buildings are anchored at
//! their first way node, matching what the viewer renders.

mod accumulator;
mod sqlite;
mod tags;

use camino::{Utf8Path, Utf8PathBuf};
use geo::{Coord, Rect};
use log::warn;
use osmpbf::{Element, ElementReader};
use skyline_core::Feature;
use thiserror::Error;

use accumulator::FeatureAccumulator;
pub use sqlite::{PersistFeaturesError, persist_features_to_sqlite};

/// Summary of raw OSM elements scanned during extraction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractSummary {
    /// Number of nodes scanned, including dense-node entries.
    pub nodes: u64,
    /// Number of ways scanned.
    pub ways: u64,
    /// Number of relations scanned.
    pub relations: u64,
    /// Bounding box covering all node coordinates, if any nodes were present.
    /// Coordinates are WGS84 with `x = longitude`, `y = latitude`.
    pub bounds: Option<Rect<f64>>,
}

impl ExtractSummary {
    fn combine(mut self, other: Self) -> Self {
        self.nodes += other.nodes;
        self.ways += other.ways;
        self.relations += other.relations;
        if let Some(bounds) = other.bounds {
            self.include_bounds(bounds);
        }
        self
    }

    fn include_bounds(&mut self, bounds: Rect<f64>) {
        match &mut self.bounds {
            Some(existing) => {
                let min = Coord {
                    x: existing.min().x.min(bounds.min().x),
                    y: existing.min().y.min(bounds.min().y),
                };
                let max = Coord {
                    x: existing.max().x.max(bounds.max().x),
                    y: existing.max().y.max(bounds.max().y),
                };
                *existing = Rect::new(min, max);
            }
            None => self.bounds = Some(bounds),
        }
    }

    fn record_node(&mut self, lon: f64, lat: f64) {
        self.nodes += 1;
        if let Some(location) = validated_coord(lon, lat) {
            self.include_bounds(Rect::new(location, location));
        }
    }

    fn record_way(&mut self) {
        self.ways += 1;
    }

    fn record_relation(&mut self) {
        self.relations += 1;
    }
}

/// Detailed report of an extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractReport {
    /// Element counts and bounding box information.
    pub summary: ExtractSummary,
    /// Skyline features derived from relevant elements, ordered by their
    /// source element identifiers.
    pub features: Vec<Feature>,
}

/// Errors returned when scanning an OSM PBF file.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be opened as a PBF.
    #[error("failed to open OSM PBF file at {path}")]
    Open {
        /// Underlying decoder error.
        #[source]
        source: osmpbf::Error,
        /// The unreadable file.
        path: Utf8PathBuf,
    },
    /// The PBF stream could not be decoded.
    #[error("failed to decode OSM PBF data at {path}")]
    Decode {
        /// Underlying decoder error.
        #[source]
        source: osmpbf::Error,
        /// The file being decoded.
        path: Utf8PathBuf,
    },
}

/// Scan the PBF at `path` for skyline features.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use skyline_data::extract_features;
///
/// # fn main() -> Result<(), skyline_data::ExtractError> {
/// let report = extract_features(Utf8Path::new("uk.osm.pbf"))?;
/// println!("found {} features", report.features.len());
/// # Ok(())
/// # }
/// ```
pub fn extract_features(path: &Utf8Path) -> Result<ExtractReport, ExtractError> {
    let reader =
        ElementReader::from_path(path.as_std_path()).map_err(|source| ExtractError::Open {
            source,
            path: path.to_path_buf(),
        })?;

    let mut accumulator = reader
        .par_map_reduce(
            |element| {
                let mut accumulator = FeatureAccumulator::default();
                accumulator.process_element(element);
                accumulator
            },
            FeatureAccumulator::default,
            FeatureAccumulator::combine,
        )
        .map_err(|source| ExtractError::Decode {
            source,
            path: path.to_path_buf(),
        })?;

    if accumulator.has_pending_anchors() {
        let resolver =
            ElementReader::from_path(path.as_std_path()).map_err(|source| ExtractError::Open {
                source,
                path: path.to_path_buf(),
            })?;
        {
            let accumulator_ref = &mut accumulator;
            resolver
                .for_each(|element| match element {
                    Element::Node(node) => {
                        accumulator_ref.resolve_pending_anchor(node.id(), node.lon(), node.lat());
                    }
                    Element::DenseNode(node) => {
                        accumulator_ref.resolve_pending_anchor(node.id(), node.lon(), node.lat());
                    }
                    Element::Way(_) | Element::Relation(_) => {}
                })
                .map_err(|source| ExtractError::Decode {
                    source,
                    path: path.to_path_buf(),
                })?;
        }
        if accumulator.has_pending_anchors() {
            warn!(
                "Skipped {} building anchors without coordinates",
                accumulator.pending_anchor_count()
            );
        }
    }

    Ok(accumulator.into_report())
}

pub(crate) fn validated_coord(lon: f64, lat: f64) -> Option<Coord<f64>> {
    (lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat))
    .then_some(Coord { x: lon, y: lat })
}
