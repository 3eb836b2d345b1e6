use serde::Serialize;

use crate::geom::Tolerance;

use super::config::MIN_PANEL_WIDTH;

/// One fence unit along a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub index: usize,
    /// Distance from the segment start to the panel start, in meters.
    pub start: f64,
    pub width: f64,
    /// Position of the panel origin along the segment, as a fraction of its
    /// length. The last panel is shifted by half of the remainder it carries.
    pub start_fraction: f64,
    pub show_start_post: bool,
    pub show_end_post: bool,
}

impl Panel {
    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    #[must_use]
    pub fn center(&self) -> f64 {
        self.start + self.width * 0.5
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Whole panels that fit before any remainder handling.
    pub full_panels: usize,
    /// Leftover length after the whole panels, before any merge.
    pub remainder: f64,
    /// Whether a short remainder was folded into the last full panel.
    pub merged: bool,
    pub panels: Vec<Panel>,
}

impl Decomposition {
    fn empty() -> Self {
        Self {
            full_panels: 0,
            remainder: 0.0,
            merged: false,
            panels: Vec::new(),
        }
    }

    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.panels.iter().map(|panel| panel.width).sum()
    }
}

#[must_use]
pub fn decompose_segment(length: f64, panel_width: f64) -> Decomposition {
    decompose_segment_with_min(length, panel_width, MIN_PANEL_WIDTH, Tolerance::LENGTH)
}

/// Split `length` into panels of `panel_width`.
///
/// A remainder shorter than `min_panel_width` widens the last full panel
/// instead of becoming a sliver. Panel widths always sum to `length`.
#[must_use]
pub fn decompose_segment_with_min(
    length: f64,
    panel_width: f64,
    min_panel_width: f64,
    tol: Tolerance,
) -> Decomposition {
    if !length.is_finite() || !panel_width.is_finite() || panel_width <= 0.0 {
        return Decomposition::empty();
    }
    if length <= tol.eps {
        return Decomposition::empty();
    }

    // Nudge by epsilon so 2.0 / 0.2 style quotients do not lose a panel.
    let full_panels = ((length + tol.eps) / panel_width).floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let full_count = full_panels as usize;
    let mut remainder = length - full_panels * panel_width;
    if tol.is_zero(remainder) {
        remainder = 0.0;
    }

    let mut widths: Vec<f64> = vec![panel_width; full_count];
    let mut merged = false;
    // Remainder carried by the last panel; a merge folds in the last full panel.
    let mut last_remainder = 0.0;
    if remainder > 0.0 {
        if remainder < min_panel_width && full_count > 0 {
            if let Some(last) = widths.last_mut() {
                *last += remainder;
            }
            merged = true;
            last_remainder = remainder + panel_width;
        } else {
            widths.push(remainder);
            last_remainder = remainder;
        }
    }

    // Absorb rounding drift into the last panel so the sum is exact.
    let drift = length - widths.iter().sum::<f64>();
    if let Some(last) = widths.last_mut() {
        *last += drift;
    }

    let last_index = widths.len().saturating_sub(1);
    let mut panels = Vec::with_capacity(widths.len());
    let mut start = 0.0;
    for (index, width) in widths.into_iter().enumerate() {
        let shift = if index == last_index {
            last_remainder * 0.5
        } else {
            0.0
        };
        panels.push(Panel {
            index,
            start,
            width,
            start_fraction: (start + shift) / length,
            show_start_post: true,
            show_end_post: true,
        });
        start += width;
    }

    Decomposition {
        full_panels: full_count,
        remainder,
        merged,
        panels,
    }
}
