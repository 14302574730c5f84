use geo::EuclideanDistance;

use super::{PrecomputedSpatialMetrics, SpatialMetrics};
use crate::error::{MatchingError, MatchingResult, MetricKind};
use crate::types::{GpsMeasurement, RoadPosition, RouteLength};

/// Spatial metrics with planar Euclidean distances
///
/// Measurement and linear distances are computed from coordinates on demand,
/// so adding them is rejected with `NotApplicable`. Route lengths cannot be
/// derived from coordinates and are stored with the same write-once semantics
/// as [`PrecomputedSpatialMetrics`].
///
/// Meant for planar test scenarios; real traces need great-circle distances
/// and router-provided route lengths.
#[derive(Default)]
pub struct EuclideanSpatialMetrics {
    route_lengths: PrecomputedSpatialMetrics<RoadPosition, GpsMeasurement>,
}

impl EuclideanSpatialMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_measurement_distance(
        &mut self,
        _road_position: &RoadPosition,
        _measurement: &GpsMeasurement,
        _distance: f64,
    ) -> MatchingResult<()> {
        Err(MatchingError::NotApplicable(MetricKind::MeasurementDistance))
    }

    pub fn add_linear_distance(
        &mut self,
        _former: &GpsMeasurement,
        _later: &GpsMeasurement,
        _distance: f64,
    ) -> MatchingResult<()> {
        Err(MatchingError::NotApplicable(MetricKind::LinearDistance))
    }

    pub fn add_route_length(
        &mut self,
        source: &RoadPosition,
        target: &RoadPosition,
        route_length: RouteLength,
    ) -> MatchingResult<()> {
        self.route_lengths.add_route_length(source, target, route_length)
    }
}

impl SpatialMetrics<RoadPosition, GpsMeasurement> for EuclideanSpatialMetrics {
    fn measurement_distance(&self, road_position: &RoadPosition, measurement: &GpsMeasurement) -> MatchingResult<f64> {
        Ok(road_position.position().euclidean_distance(&measurement.position()))
    }

    fn linear_distance(&self, former: &GpsMeasurement, later: &GpsMeasurement) -> MatchingResult<f64> {
        Ok(former.position().euclidean_distance(&later.position()))
    }

    fn route_length(&self, source: &RoadPosition, target: &RoadPosition) -> MatchingResult<RouteLength> {
        self.route_lengths.route_length(source, target)
    }
}
