//! Tag predicates for skyline feature selection.
//!
//! Classifies raw OSM tag sets into the feature categories the viewer
//! renders: tall buildings from ways, peaks and man-made masts or towers
//! from nodes. Everything else is ignored.

use skyline_core::{FeatureKind, parse_height};

/// Buildings need more levels than this to count as tall.
const TALL_LEVELS: i64 = 5;
/// Buildings taller than this many metres count as tall regardless of levels.
const TALL_HEIGHT_METRES: f64 = 30.0;

/// Metadata captured from a tall-building way ahead of anchor resolution.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct BuildingMeta {
    pub(super) name: String,
    pub(super) height: f64,
    pub(super) levels: i64,
    pub(super) address: String,
}

/// A feature carried entirely by a single node's tags.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct NodeFeature {
    pub(super) kind: FeatureKind,
    pub(super) name: String,
    pub(super) height: f64,
}

/// Classify a way's tags as a tall building, capturing its metadata.
///
/// A way qualifies when it carries any `building` tag and is either more
/// than five levels or more than thirty metres tall.
pub(super) fn building_meta<'a, T>(tags: T) -> Option<BuildingMeta>
where
    T: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut is_building = false;
    let mut levels = 0_i64;
    let mut height = 0.0_f64;
    let mut name = String::new();
    let mut housenumber = String::new();
    let mut street = String::new();
    let mut city = String::new();

    for (key, value) in tags {
        match key {
            "building" => is_building = !value.is_empty(),
            "building:levels" => levels = value.parse().unwrap_or(0),
            "height" => height = parse_height(value),
            "name" => name = value.to_owned(),
            "addr:housenumber" => housenumber = value.to_owned(),
            "addr:street" => street = value.to_owned(),
            "addr:city" => city = value.to_owned(),
            _ => {}
        }
    }

    (is_building && (levels > TALL_LEVELS || height > TALL_HEIGHT_METRES)).then(|| BuildingMeta {
        name,
        height,
        levels,
        address: join_address(&housenumber, &street, &city),
    })
}

/// Classify a node's tags into direct skyline features.
///
/// A single node can yield more than one feature: a peak that also carries
/// a mast tag produces both.
pub(super) fn node_features<'a, T>(tags: T) -> Vec<NodeFeature>
where
    T: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut name = String::new();
    let mut natural = String::new();
    let mut man_made = String::new();
    let mut elevation = String::new();
    let mut height = String::new();

    for (key, value) in tags {
        match key {
            "name" => name = value.to_owned(),
            "natural" => natural = value.to_owned(),
            "man_made" => man_made = value.to_owned(),
            "ele" => elevation = value.to_owned(),
            "height" => height = value.to_owned(),
            _ => {}
        }
    }

    let mut features = Vec::new();
    if natural == "peak" {
        features.push(NodeFeature {
            kind: FeatureKind::Peak,
            name: name.clone(),
            height: parse_height(&elevation),
        });
    }
    let man_made_kind = match man_made.as_str() {
        "mast" => Some(FeatureKind::Mast),
        "tower" => Some(FeatureKind::Tower),
        _ => None,
    };
    if let Some(kind) = man_made_kind {
        features.push(NodeFeature {
            kind,
            name,
            height: parse_height(&height),
        });
    }
    features
}

fn join_address(housenumber: &str, street: &str, city: &str) -> String {
    [housenumber, street, city]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
