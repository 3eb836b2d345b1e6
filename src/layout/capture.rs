//! Point capture: grid snapping, angle locking, and loop closure.
//!
//! The in-progress drawing is a plain owned [`Drawing`] value. Every capture
//! call consumes it and hands back the next state, so the caller always holds
//! the only copy.

use serde::{Deserialize, Serialize};

use crate::geom::{Point2, Tolerance};

/// Below this distance a candidate has no meaningful direction and angle
/// snapping is skipped.
pub const ANGLE_SNAP_MIN_LENGTH: f64 = 1.01;

/// Round each coordinate to the nearest multiple of `grid_size`.
#[must_use]
pub fn snap_point(raw: Point2, grid_size: f64) -> Point2 {
    if !grid_size.is_finite() || grid_size <= 0.0 {
        return raw;
    }
    Point2::new(snap_to_grid(raw.x, grid_size), snap_to_grid(raw.z, grid_size))
}

fn snap_to_grid(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Lock the direction `prev -> candidate` to the nearest multiple of
/// `angle_step` (radians), keeping the original length.
#[must_use]
pub fn snap_angle(prev: Point2, candidate: Point2, angle_step: f64) -> Point2 {
    if !angle_step.is_finite() || angle_step <= 0.0 {
        return candidate;
    }
    let length = prev.distance(candidate);
    if !length.is_finite() || length < ANGLE_SNAP_MIN_LENGTH {
        return candidate;
    }
    let angle = prev.angle_to(candidate);
    let snapped = (angle / angle_step).round() * angle_step;
    prev.offset_polar(snapped, length)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingParams {
    pub grid_size: f64,
    pub snap_to_grid: bool,
    pub angle_lock: bool,
    /// Angle increment in radians.
    pub angle_step: f64,
    /// Closing distance to the first point; `None` means half a grid cell.
    pub closure_tolerance: Option<f64>,
}

impl Default for DrawingParams {
    fn default() -> Self {
        Self {
            grid_size: 1.0,
            snap_to_grid: true,
            angle_lock: true,
            angle_step: 45_f64.to_radians(),
            closure_tolerance: None,
        }
    }
}

impl DrawingParams {
    #[must_use]
    pub fn closure_tolerance(&self) -> f64 {
        self.closure_tolerance.unwrap_or(self.grid_size * 0.5)
    }
}

/// An ordered polyline on the ground plane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    points: Vec<Point2>,
}

/// A straight piece between two consecutive boundary points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2,
    pub end: Point2,
}

impl Segment {
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    #[must_use]
    pub fn angle(&self) -> f64 {
        self.start.angle_to(self.end)
    }

    #[must_use]
    pub fn point_at(&self, distance: f64) -> Point2 {
        let length = self.length();
        if length <= Tolerance::ZERO_LENGTH.eps {
            return self.start;
        }
        self.start.lerp(self.end, distance / length)
    }
}

impl Boundary {
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed when there are at least three points and the last coincides with the first.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 2 => {
                Tolerance::LENGTH.approx_eq_point2(*first, *last)
            }
            _ => false,
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|pair| Segment {
            start: pair[0],
            end: pair[1],
        })
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.segments().map(|segment| segment.length()).sum()
    }
}

/// Result of feeding one point into a [`Drawing`].
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureStep {
    /// Drawing state to use for the next point. Empty after a closure.
    pub drawing: Drawing,
    /// The finished boundary, when this point closed the loop.
    pub closed: Option<Boundary>,
}

/// The boundary currently being drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    points: Vec<Point2>,
}

impl Drawing {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<Point2> {
        self.points.last().copied()
    }

    /// Apply grid snapping and, against the last point, angle locking.
    #[must_use]
    pub fn resolve(&self, raw: Point2, params: &DrawingParams) -> Point2 {
        let mut point = if params.snap_to_grid {
            snap_point(raw, params.grid_size)
        } else {
            raw
        };
        if params.angle_lock {
            if let Some(last) = self.last() {
                point = snap_angle(last, point, params.angle_step);
            }
        }
        point
    }

    /// Where the next point would land, without committing it.
    #[must_use]
    pub fn preview(&self, raw: Point2, params: &DrawingParams) -> Option<Point2> {
        raw.is_finite().then(|| self.resolve(raw, params))
    }

    /// Commit a point. Closes the loop when it lands near the first point.
    #[must_use]
    pub fn push(mut self, raw: Point2, params: &DrawingParams) -> CaptureStep {
        if !raw.is_finite() {
            log::warn!("ignoring non-finite drawing point {raw:?}");
            return CaptureStep {
                drawing: self,
                closed: None,
            };
        }

        let point = self.resolve(raw, params);

        if self.points.len() > 1 {
            let first = self.points[0];
            if point.distance(first) < params.closure_tolerance() {
                self.points.push(first);
                let boundary = Boundary::new(self.points);
                log::debug!(
                    "boundary closed with {} segments, perimeter {:.3}",
                    boundary.segment_count(),
                    boundary.perimeter()
                );
                return CaptureStep {
                    drawing: Drawing::new(),
                    closed: Some(boundary),
                };
            }
        }

        self.points.push(point);
        CaptureStep {
            drawing: self,
            closed: None,
        }
    }

    /// The open boundary drawn so far.
    #[must_use]
    pub fn to_boundary(&self) -> Boundary {
        Boundary::new(self.points.clone())
    }
}
