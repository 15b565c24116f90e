//! Internal accumulator for the PBF feature scan.
//!
//! Collects node features, tall-building candidates, and pending anchor
//! references while building the scan summary. Chunks are processed in
//! parallel, so a way may be seen before or after its anchor node; anchors
//! that stay unresolved after merging are filled in by the sequential
//! second pass.

use std::collections::{HashMap, HashSet};

use geo::Coord;
use osmpbf::Element;
use skyline_core::{Feature, FeatureKind};

use super::tags::{BuildingMeta, building_meta, node_features};
use super::{ExtractReport, ExtractSummary, validated_coord};

#[derive(Debug, Default)]
pub(super) struct FeatureAccumulator {
    summary: ExtractSummary,
    /// Features keyed by their source element id for deterministic output.
    features: Vec<(i64, Feature)>,
    anchors: HashMap<i64, Coord<f64>>,
    pending_anchors: HashSet<i64>,
    building_candidates: Vec<BuildingCandidate>,
}

#[derive(Debug)]
struct BuildingCandidate {
    way_id: i64,
    anchor: i64,
    meta: BuildingMeta,
}

impl FeatureAccumulator {
    pub(super) fn process_element(&mut self, element: Element<'_>) {
        match element {
            Element::Node(node) => {
                self.record_node(node.id(), node.lon(), node.lat(), node.tags());
            }
            Element::DenseNode(node) => {
                self.record_node(node.id(), node.lon(), node.lat(), node.tags());
            }
            Element::Way(way) => self.record_way(way.id(), way.refs(), way.tags()),
            Element::Relation(_) => self.summary.record_relation(),
        }
    }

    pub(super) fn record_node<'a, T>(&mut self, id: i64, lon: f64, lat: f64, tags: T)
    where
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.summary.record_node(lon, lat);
        let Some(location) = validated_coord(lon, lat) else {
            self.pending_anchors.remove(&id);
            return;
        };
        if self.pending_anchors.remove(&id) {
            self.anchors.insert(id, location);
        }
        for feature in node_features(tags) {
            self.features.push((
                id,
                Feature {
                    name: feature.name,
                    kind: feature.kind,
                    height: feature.height,
                    levels: 0,
                    address: String::new(),
                    location,
                },
            ));
        }
    }

    pub(super) fn record_way<'a, T, R>(&mut self, id: i64, refs: R, tags: T)
    where
        T: IntoIterator<Item = (&'a str, &'a str)>,
        R: IntoIterator<Item = i64>,
    {
        self.summary.record_way();
        let Some(meta) = building_meta(tags) else {
            return;
        };
        // Buildings are anchored at their first way node.
        let Some(anchor) = refs.into_iter().next() else {
            return;
        };
        if !self.anchors.contains_key(&anchor) {
            self.pending_anchors.insert(anchor);
        }
        self.building_candidates.push(BuildingCandidate {
            way_id: id,
            anchor,
            meta,
        });
    }

    pub(super) fn combine(mut self, other: Self) -> Self {
        self.summary = self.summary.combine(other.summary);
        for (id, coord) in other.anchors {
            self.anchors.entry(id).or_insert(coord);
        }
        self.features.extend(other.features);
        self.building_candidates.extend(other.building_candidates);
        self.pending_anchors.extend(other.pending_anchors);
        self.pending_anchors
            .retain(|id| !self.anchors.contains_key(id));
        self
    }

    pub(super) fn has_pending_anchors(&self) -> bool {
        !self.pending_anchors.is_empty()
    }

    pub(super) fn pending_anchor_count(&self) -> usize {
        self.pending_anchors.len()
    }

    pub(super) fn resolve_pending_anchor(&mut self, id: i64, lon: f64, lat: f64) {
        if !self.pending_anchors.remove(&id) {
            return;
        }
        if let Some(location) = validated_coord(lon, lat) {
            self.anchors.insert(id, location);
        }
    }

    pub(super) fn into_report(self) -> ExtractReport {
        let mut features = self.features;
        for candidate in self.building_candidates {
            if let Some(location) = self.anchors.get(&candidate.anchor).copied() {
                features.push((
                    candidate.way_id,
                    Feature {
                        name: candidate.meta.name,
                        kind: FeatureKind::Building,
                        height: candidate.meta.height,
                        levels: candidate.meta.levels,
                        address: candidate.meta.address,
                        location,
                    },
                ));
            }
        }
        features.sort_by_key(|(id, _)| *id);
        ExtractReport {
            summary: self.summary,
            features: features.into_iter().map(|(_, feature)| feature).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NO_TAGS: [(&str, &str); 0] = [];

    fn tall_building_tags() -> Vec<(&'static str, &'static str)> {
        vec![
            ("building", "yes"),
            ("building:levels", "10"),
            ("name", "Beetham Tower"),
        ]
    }

    #[rstest]
    fn node_features_carry_their_own_coordinates() {
        let mut accumulator = FeatureAccumulator::default();
        accumulator.record_node(1, -3.0, 54.5, vec![("natural", "peak"), ("ele", "978")]);

        let report = accumulator.into_report();
        assert_eq!(report.features.len(), 1);
        assert_eq!(report.features[0].kind, FeatureKind::Peak);
        assert_eq!(report.features[0].height, 978.0);
        assert_eq!(report.features[0].location, Coord { x: -3.0, y: 54.5 });
    }

    #[rstest]
    fn anchors_resolve_when_the_node_follows_the_way() {
        let mut accumulator = FeatureAccumulator::default();
        accumulator.record_way(100, vec![7, 8, 9], tall_building_tags());
        assert!(accumulator.has_pending_anchors());
        accumulator.record_node(7, -2.24, 53.47, NO_TAGS);
        assert!(!accumulator.has_pending_anchors());

        let report = accumulator.into_report();
        assert_eq!(report.features.len(), 1);
        let building = &report.features[0];
        assert_eq!(building.kind, FeatureKind::Building);
        assert_eq!(building.name, "Beetham Tower");
        assert_eq!(building.levels, 10);
        assert_eq!(building.location, Coord { x: -2.24, y: 53.47 });
    }

    #[rstest]
    fn anchors_resolve_in_the_second_pass_when_the_node_came_first() {
        let mut accumulator = FeatureAccumulator::default();
        // First pass: the untagged node is seen before its way, so its
        // coordinate is not retained.
        accumulator.record_node(7, -2.24, 53.47, NO_TAGS);
        accumulator.record_way(100, vec![7], tall_building_tags());
        assert!(accumulator.has_pending_anchors());

        // Second pass over the file resolves the anchor.
        accumulator.resolve_pending_anchor(7, -2.24, 53.47);
        assert!(!accumulator.has_pending_anchors());

        let report = accumulator.into_report();
        assert_eq!(report.features.len(), 1);
        assert_eq!(report.features[0].location, Coord { x: -2.24, y: 53.47 });
    }

    #[rstest]
    fn ways_without_nodes_are_dropped() {
        let mut accumulator = FeatureAccumulator::default();
        accumulator.record_way(100, Vec::new(), tall_building_tags());
        assert!(!accumulator.has_pending_anchors());
        assert!(accumulator.into_report().features.is_empty());
    }

    #[rstest]
    fn invalid_anchor_coordinates_drop_the_candidate() {
        let mut accumulator = FeatureAccumulator::default();
        accumulator.record_way(100, vec![7], tall_building_tags());
        accumulator.resolve_pending_anchor(7, -2.24, 91.0);

        assert!(!accumulator.has_pending_anchors());
        assert!(accumulator.into_report().features.is_empty());
    }

    #[rstest]
    fn combine_merges_chunks_processed_in_parallel() {
        let mut ways = FeatureAccumulator::default();
        ways.record_way(100, vec![7], tall_building_tags());

        let mut nodes = FeatureAccumulator::default();
        nodes.record_node(3, -3.0, 54.5, vec![("natural", "peak"), ("ele", "978")]);

        let mut merged = ways.combine(nodes);
        assert_eq!(merged.pending_anchor_count(), 1);
        merged.resolve_pending_anchor(7, -2.24, 53.47);

        let report = merged.into_report();
        assert_eq!(report.summary.nodes, 1);
        assert_eq!(report.summary.ways, 1);
        assert_eq!(report.features.len(), 2);
    }

    #[rstest]
    fn features_are_ordered_by_source_element_id() {
        let mut accumulator = FeatureAccumulator::default();
        accumulator.record_node(50, -3.0, 54.5, vec![("natural", "peak")]);
        accumulator.record_way(20, vec![7], tall_building_tags());
        accumulator.record_node(2, -1.5, 52.0, vec![("man_made", "tower")]);
        accumulator.resolve_pending_anchor(7, -2.24, 53.47);

        let report = accumulator.into_report();
        let kinds: Vec<FeatureKind> = report.features.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FeatureKind::Tower, FeatureKind::Building, FeatureKind::Peak]
        );
    }

    #[rstest]
    fn summary_accumulates_bounds_over_valid_nodes() {
        let mut accumulator = FeatureAccumulator::default();
        accumulator.record_node(1, -8.65, 49.86, NO_TAGS);
        accumulator.record_node(2, 1.76, 60.86, NO_TAGS);
        accumulator.record_node(3, f64::NAN, 200.0, NO_TAGS);

        let report = accumulator.into_report();
        assert_eq!(report.summary.nodes, 3);
        let bounds = report.summary.bounds.expect("bounds should be present");
        assert_eq!(bounds.min().x, -8.65);
        assert_eq!(bounds.max().y, 60.86);
    }
}
