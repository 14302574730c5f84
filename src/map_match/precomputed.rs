use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use super::SpatialMetrics;
use crate::error::{MatchingError, MatchingResult, MetricKind};
use crate::types::{Identified, RouteLength};

/// Write-once store of externally computed spatial metrics
///
/// # Lifecycle
/// - Populate every key that scoring will query (`add_*`), once per key
/// - Hand a shared reference to the probability model; reads never mutate
/// - Use a fresh cache for each matching run
///
/// Keys are the ids of road positions `S` and measurements `O`. Inserting a
/// key twice fails with `DuplicateKey`; reading a key that was never inserted
/// fails with `MissingKey`. An `Unreachable` route length is a stored value
/// and is returned as-is.
///
/// # Usage
/// ```no_run
/// use offline_map_matching::map_match::{PrecomputedSpatialMetrics, SpatialMetrics};
/// use offline_map_matching::types::{GpsMeasurement, RoadPosition, RouteLength};
///
/// # fn run(rp1: RoadPosition, rp2: RoadPosition, gps: GpsMeasurement)
/// #     -> offline_map_matching::MatchingResult<()> {
/// let mut metrics = PrecomputedSpatialMetrics::<RoadPosition, GpsMeasurement>::new();
/// metrics.add_measurement_distance(&rp1, &gps, 4.2)?;
/// metrics.add_route_length(&rp1, &rp2, RouteLength::Unreachable)?;
///
/// assert_eq!(metrics.route_length(&rp1, &rp2)?, RouteLength::Unreachable);
/// # Ok(())
/// # }
/// ```
pub struct PrecomputedSpatialMetrics<S: Identified, O: Identified> {
    measurement_distances: HashMap<(S::Id, O::Id), f64>,
    linear_distances: HashMap<(O::Id, O::Id), f64>,
    route_lengths: HashMap<(S::Id, S::Id), RouteLength>,
}

impl<S: Identified, O: Identified> PrecomputedSpatialMetrics<S, O> {
    pub fn new() -> Self {
        PrecomputedSpatialMetrics {
            measurement_distances: HashMap::new(),
            linear_distances: HashMap::new(),
            route_lengths: HashMap::new(),
        }
    }

    /// Store the distance between `road_position` and `measurement`
    pub fn add_measurement_distance(
        &mut self,
        road_position: &S,
        measurement: &O,
        distance: f64,
    ) -> MatchingResult<()> {
        check_distance(MetricKind::MeasurementDistance, distance)?;
        insert_once(
            &mut self.measurement_distances,
            MetricKind::MeasurementDistance,
            (road_position.id(), measurement.id()),
            distance,
        )
    }

    /// Store the straight-line distance from `former` to `later`
    pub fn add_linear_distance(&mut self, former: &O, later: &O, distance: f64) -> MatchingResult<()> {
        check_distance(MetricKind::LinearDistance, distance)?;
        insert_once(
            &mut self.linear_distances,
            MetricKind::LinearDistance,
            (former.id(), later.id()),
            distance,
        )
    }

    /// Store the route length from `source` to `target`, `Unreachable` if there is no route
    pub fn add_route_length(&mut self, source: &S, target: &S, route_length: RouteLength) -> MatchingResult<()> {
        if let RouteLength::Reachable(meters) = route_length {
            check_distance(MetricKind::RouteLength, meters)?;
        }
        insert_once(
            &mut self.route_lengths,
            MetricKind::RouteLength,
            (source.id(), target.id()),
            route_length,
        )
    }

    /// Total entries across all three tables
    pub fn len(&self) -> usize {
        self.measurement_distances.len() + self.linear_distances.len() + self.route_lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: Identified, O: Identified> Default for PrecomputedSpatialMetrics<S, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Identified, O: Identified> SpatialMetrics<S, O> for PrecomputedSpatialMetrics<S, O> {
    fn measurement_distance(&self, road_position: &S, measurement: &O) -> MatchingResult<f64> {
        lookup(
            &self.measurement_distances,
            MetricKind::MeasurementDistance,
            (road_position.id(), measurement.id()),
        )
    }

    fn linear_distance(&self, former: &O, later: &O) -> MatchingResult<f64> {
        lookup(
            &self.linear_distances,
            MetricKind::LinearDistance,
            (former.id(), later.id()),
        )
    }

    fn route_length(&self, source: &S, target: &S) -> MatchingResult<RouteLength> {
        lookup(
            &self.route_lengths,
            MetricKind::RouteLength,
            (source.id(), target.id()),
        )
    }
}

fn check_distance(kind: MetricKind, value: f64) -> MatchingResult<()> {
    // Rejects NaN as well as negative values
    if value >= 0.0 {
        Ok(())
    } else {
        Err(MatchingError::InvalidDistance { kind, value })
    }
}

fn insert_once<K, V>(table: &mut HashMap<K, V>, kind: MetricKind, key: K, value: V) -> MatchingResult<()>
where
    K: Eq + Hash + Debug,
{
    match table.entry(key) {
        Entry::Occupied(entry) => Err(MatchingError::DuplicateKey {
            kind,
            key: format!("{:?}", entry.key()),
        }),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}

fn lookup<K, V>(table: &HashMap<K, V>, kind: MetricKind, key: K) -> MatchingResult<V>
where
    K: Eq + Hash + Debug,
    V: Copy,
{
    table.get(&key).copied().ok_or_else(|| MatchingError::MissingKey {
        kind,
        key: format!("{:?}", key),
    })
}
