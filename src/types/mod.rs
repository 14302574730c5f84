//! Value types for map matching: planar points, timestamped GPS
//! measurements, candidate road positions and route lengths.
//!
//! Measurements and road positions carry explicit ids assigned by the caller.
//! Caches and indexes key on these ids rather than on coordinates, so copies
//! of a value always resolve to the same entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use crate::error::{MatchingError, MatchingResult};

/// 2-D coordinate in a planar (metric) reference frame
pub type Point = geo::Point<f64>;

/// Values that expose a stable key for caching and indexing
pub trait Identified {
    type Id: Copy + Eq + Hash + Debug;

    fn id(&self) -> Self::Id;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeasurementId(pub u32);

impl Display for MeasurementId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "gps_{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub u32);

impl Display for CandidateId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "candidate_{}", self.0)
    }
}

fn finite_point(position: Point) -> MatchingResult<Point> {
    if position.x().is_finite() && position.y().is_finite() {
        Ok(position)
    } else {
        Err(MatchingError::NonFiniteCoordinate {
            x: position.x(),
            y: position.y(),
        })
    }
}

/// Location measurement taken at a point in time
#[derive(Clone, Debug, PartialEq)]
pub struct GpsMeasurement {
    id: MeasurementId,
    time: DateTime<Utc>,
    position: Point,
}

impl GpsMeasurement {
    pub fn new(id: MeasurementId, time: DateTime<Utc>, position: Point) -> MatchingResult<Self> {
        Ok(GpsMeasurement {
            id,
            time,
            position: finite_point(position)?,
        })
    }

    pub fn from_xy(id: MeasurementId, time: DateTime<Utc>, x: f64, y: f64) -> MatchingResult<Self> {
        Self::new(id, time, Point::new(x, y))
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

impl Identified for GpsMeasurement {
    type Id = MeasurementId;

    fn id(&self) -> MeasurementId {
        self.id
    }
}

/// Position of a vehicle on the road network
///
/// # Fields
/// - `edge_id`: edge the vehicle is positioned on
/// - `fraction`: position along the edge from its start, in [0, 1]
/// - `position`: the same location as a planar point
#[derive(Clone, Debug, PartialEq)]
pub struct RoadPosition {
    id: CandidateId,
    edge_id: u64,
    fraction: f64,
    position: Point,
}

impl RoadPosition {
    /// Create a road position
    ///
    /// # Errors
    /// - `InvalidFraction` if `fraction` is outside [0, 1] or NaN
    /// - `NonFiniteCoordinate` if `position` is not finite
    pub fn new(id: CandidateId, edge_id: u64, fraction: f64, position: Point) -> MatchingResult<Self> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(MatchingError::InvalidFraction(fraction));
        }

        Ok(RoadPosition {
            id,
            edge_id,
            fraction,
            position: finite_point(position)?,
        })
    }

    pub fn from_xy(id: CandidateId, edge_id: u64, fraction: f64, x: f64, y: f64) -> MatchingResult<Self> {
        Self::new(id, edge_id, fraction, Point::new(x, y))
    }

    pub fn edge_id(&self) -> u64 {
        self.edge_id
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

impl Identified for RoadPosition {
    type Id = CandidateId;

    fn id(&self) -> CandidateId {
        self.id
    }
}

/// Shortest route length between two road positions
///
/// `Unreachable` is a valid result of routing, distinct from a route of
/// length zero and from a value that was never computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RouteLength {
    Reachable(f64),
    Unreachable,
}

impl RouteLength {
    /// Route length in meters, `None` if unreachable
    pub fn meters(self) -> Option<f64> {
        match self {
            RouteLength::Reachable(meters) => Some(meters),
            RouteLength::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, RouteLength::Reachable(_))
    }
}

impl From<Option<f64>> for RouteLength {
    fn from(meters: Option<f64>) -> Self {
        meters.map_or(RouteLength::Unreachable, RouteLength::Reachable)
    }
}
