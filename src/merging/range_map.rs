//! Disjoint m/z range map used to route signals to consensus clusters.
//!
//! Clusters live in an arena; an ordered map keyed by each routed range's
//! lower endpoint locates the range covering an m/z. Ranges never overlap,
//! and every member of a routed cluster lies inside its cluster's range.

use std::collections::BTreeMap;

use log::debug;
use ordered_float::OrderedFloat;

use crate::spectrum::IndexedPoint;
use crate::tolerance::{BoundType, MzRange, MzTolerance};

/// One consensus cluster: its routing range and its members keyed by source
#[derive(Debug, Clone)]
pub(super) struct Cluster {
    pub(super) range: MzRange,
    pub(super) seed_mz: f64,
    pub(super) members: BTreeMap<usize, IndexedPoint>,
}

impl Cluster {
    fn seeded(range: MzRange, point: IndexedPoint) -> Self {
        let mut members = BTreeMap::new();
        members.insert(point.source_index, point);
        Self {
            range,
            seed_mz: point.mz,
            members,
        }
    }
}

#[derive(Debug, Default)]
pub(super) struct ClusterMap {
    clusters: Vec<Cluster>,
    routes: BTreeMap<OrderedFloat<f64>, usize>,
    detached: usize,
}

impl ClusterMap {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Route one point. Points must arrive in descending intensity order so
    /// that the most intense signal of a neighborhood seeds its range.
    pub(super) fn insert(&mut self, point: IndexedPoint, tolerance: &MzTolerance) {
        match self.find(point.mz) {
            None => self.open_cluster(point, tolerance),
            Some(id) if self.clusters[id].members.contains_key(&point.source_index) => {
                self.split_cluster(id, point, tolerance)
            }
            Some(id) => {
                self.clusters[id].members.insert(point.source_index, point);
            }
        }
    }

    /// Index of the cluster whose range covers `mz`
    pub(super) fn find(&self, mz: f64) -> Option<usize> {
        // an open range starting exactly at `mz` sorts last but does not
        // contain it, so the range before it has to be checked as well
        self.routes
            .range(..=OrderedFloat(mz))
            .rev()
            .take(2)
            .map(|(_, &id)| id)
            .find(|&id| self.clusters[id].range.contains(mz))
    }

    fn lower_neighbor(&self, mz: f64) -> Option<&MzRange> {
        self.routes
            .range(..=OrderedFloat(mz))
            .rev()
            .map(|(_, &id)| &self.clusters[id].range)
            .find(|range| range.is_below(mz))
    }

    fn upper_neighbor(&self, mz: f64) -> Option<&MzRange> {
        self.routes
            .range(OrderedFloat(mz)..)
            .map(|(_, &id)| &self.clusters[id].range)
            .find(|range| range.is_above(mz))
    }

    /// Tolerance window of `mz` clipped against the adjacent ranges
    fn clipped_window(&self, mz: f64, tolerance: &MzTolerance) -> MzRange {
        let proposed = tolerance.tolerance_range(mz);

        let (lower, lower_bound) = match self.lower_neighbor(mz) {
            Some(n) if n.upper >= proposed.lower => (n.upper, n.upper_bound.complement()),
            _ => (proposed.lower, BoundType::Closed),
        };
        let (upper, upper_bound) = match self.upper_neighbor(mz) {
            Some(n) if n.lower <= proposed.upper => (n.lower, n.lower_bound.complement()),
            _ => (proposed.upper, BoundType::Closed),
        };

        MzRange::new(lower, lower_bound, upper, upper_bound)
    }

    fn open_cluster(&mut self, point: IndexedPoint, tolerance: &MzTolerance) {
        let range = self.clipped_window(point.mz, tolerance);
        self.push_routed(Cluster::seeded(range, point));
    }

    /// A second signal of the same source landed in an occupied range: carve
    /// a fresh range for it at the midpoint between the seed and the signal.
    ///
    /// Members of the old cluster that fall on the carved side move with it.
    /// The one member sharing the signal's source cannot join the carved
    /// cluster and is routed again, which splits the carved range in turn.
    fn split_cluster(&mut self, id: usize, point: IndexedPoint, tolerance: &MzTolerance) {
        let existing = self.clusters[id].range;
        let seed = self.clusters[id].seed_mz;
        let mid = seed + (point.mz - seed) / 2.0;

        let (kept, carved) = if point.mz > seed {
            (
                MzRange::new(existing.lower, existing.lower_bound, mid, BoundType::Open),
                MzRange::new(mid, BoundType::Closed, existing.upper, existing.upper_bound),
            )
        } else {
            (
                MzRange::new(mid, BoundType::Open, existing.upper, existing.upper_bound),
                MzRange::new(existing.lower, existing.lower_bound, mid, BoundType::Closed),
            )
        };

        if !kept.contains(seed) || !carved.contains(point.mz) {
            debug!(
                "Detached cluster for m/z {} (source {}): range cannot be split further",
                point.mz, point.source_index
            );
            self.detached += 1;
            self.clusters
                .push(Cluster::seeded(MzRange::closed(point.mz, point.mz), point));
            return;
        }

        let moving: Vec<usize> = self.clusters[id]
            .members
            .values()
            .filter(|m| carved.contains(m.mz))
            .map(|m| m.source_index)
            .collect();

        let mut carved_cluster = Cluster::seeded(carved, point);
        let mut displaced = None;
        for source_index in moving {
            if let Some(member) = self.clusters[id].members.remove(&source_index) {
                if source_index == point.source_index {
                    displaced = Some(member);
                } else {
                    carved_cluster.members.insert(source_index, member);
                }
            }
        }

        self.routes.remove(&OrderedFloat(existing.lower));
        self.clusters[id].range = kept;
        self.routes.insert(OrderedFloat(kept.lower), id);
        self.push_routed(carved_cluster);

        if let Some(member) = displaced {
            self.insert(member, tolerance);
        }
    }

    fn push_routed(&mut self, cluster: Cluster) {
        let id = self.clusters.len();
        self.routes.insert(OrderedFloat(cluster.range.lower), id);
        self.clusters.push(cluster);
    }

    /// Number of clusters that could not be given a routed range
    pub(super) fn detached_count(&self) -> usize {
        self.detached
    }

    /// All clusters, routed ones in ascending range order
    pub(super) fn into_clusters(self) -> Vec<Cluster> {
        let mut clusters = self.clusters;
        clusters.sort_by(|a, b| a.range.lower.total_cmp(&b.range.lower));
        clusters
    }

    #[cfg(test)]
    pub(super) fn ranges(&self) -> Vec<MzRange> {
        self.routes
            .values()
            .map(|&id| self.clusters[id].range)
            .collect()
    }
}
