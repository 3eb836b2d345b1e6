use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::geom::Tolerance;

use super::capture::Segment;

/// Magnitude of the turn between two directions, in `[0, π]`.
#[must_use]
pub fn turn_angle(angle_a: f64, angle_b: f64) -> f64 {
    let delta = (angle_b - angle_a).rem_euclid(TAU);
    if delta > PI { TAU - delta } else { delta }
}

/// A joint is square when the turn is a right angle within `tolerance`.
#[must_use]
pub fn is_square_joint(angle_a: f64, angle_b: f64, tolerance: f64) -> bool {
    (turn_angle(angle_a, angle_b) - FRAC_PI_2).abs() <= tolerance
}

/// Hide the shared post unless the joint is square.
#[must_use]
pub fn should_hide_post(angle_a: f64, angle_b: f64, tolerance: f64) -> bool {
    !is_square_joint(angle_a, angle_b, tolerance)
}

/// Post suppression for the two ends of one segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CornerPosts {
    /// Previous segment ends here at an oblique angle.
    pub hide_start: bool,
    /// Next segment starts here at an oblique angle.
    pub hide_end: bool,
}

/// Evaluate corner suppression for every segment of a polyline.
///
/// Zero-length segments have no direction; they neither suppress nor get
/// suppressed, and neighbours look past them to the nearest real segment.
#[must_use]
pub fn corner_posts(segments: &[Segment], tolerance: f64) -> Vec<CornerPosts> {
    let angles: Vec<Option<f64>> = segments
        .iter()
        .map(|segment| (segment.length() > Tolerance::LENGTH.eps).then(|| segment.angle()))
        .collect();

    (0..segments.len())
        .map(|index| {
            let Some(current) = angles[index] else {
                return CornerPosts::default();
            };
            let previous = angles[..index].iter().rev().find_map(|angle| *angle);
            let next = angles[index + 1..].iter().find_map(|angle| *angle);
            CornerPosts {
                hide_start: previous
                    .is_some_and(|previous| should_hide_post(current, previous, tolerance)),
                hide_end: next.is_some_and(|next| should_hide_post(current, next, tolerance)),
            }
        })
        .collect()
}
