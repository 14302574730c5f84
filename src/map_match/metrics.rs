use crate::error::MatchingResult;
use crate::types::{GpsMeasurement, RouteLength};

/// Spatial metrics needed to score road positions `S` against measurements `O`
///
/// Implementations either compute metrics on demand or look up values that
/// were computed elsewhere (e.g. by a router). Lookup failures are fatal and
/// surface as errors.
pub trait SpatialMetrics<S, O> {
    /// Distance between a road position and the measurement it was derived from
    fn measurement_distance(&self, road_position: &S, measurement: &O) -> MatchingResult<f64>;

    /// Straight-line distance between two measurements, `former` preceding `later`
    fn linear_distance(&self, former: &O, later: &O) -> MatchingResult<f64>;

    /// Shortest route length on the road network from `source` to `target`
    fn route_length(&self, source: &S, target: &S) -> MatchingResult<RouteLength>;
}

/// Temporal metrics between measurements `O`
pub trait TemporalMetrics<O> {
    /// Seconds elapsed from `former` to `later`
    ///
    /// Negative if `later` was measured first; callers validate the sign.
    fn time_difference(&self, former: &O, later: &O) -> f64;
}

/// Temporal metrics from [`GpsMeasurement`] timestamps, millisecond resolution
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTemporalMetrics;

impl TemporalMetrics<GpsMeasurement> for DefaultTemporalMetrics {
    fn time_difference(&self, former: &GpsMeasurement, later: &GpsMeasurement) -> f64 {
        (later.time() - former.time()).num_milliseconds() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeasurementId;
    use chrono::{TimeZone, Utc};

    fn measurement(id: u32, millis: i64) -> GpsMeasurement {
        let time = Utc.timestamp_millis_opt(1_391_212_800_000 + millis).unwrap();
        GpsMeasurement::from_xy(MeasurementId(id), time, 0.0, 0.0).unwrap()
    }

    #[test]
    fn test_time_difference_seconds() {
        let m1 = measurement(1, 0);
        let m2 = measurement(2, 1_500);

        assert_eq!(DefaultTemporalMetrics.time_difference(&m1, &m2), 1.5);
    }

    #[test]
    fn test_time_difference_is_signed() {
        let m1 = measurement(1, 0);
        let m2 = measurement(2, 60_000);

        assert_eq!(DefaultTemporalMetrics.time_difference(&m2, &m1), -60.0);
        assert_eq!(DefaultTemporalMetrics.time_difference(&m1, &m1), 0.0);
    }
}
