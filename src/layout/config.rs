//! Sizing configuration and validation for the layout engine.
//!
//! User-facing sizes (`PanelSpec`) are expressed in centimeters, the unit of the
//! configurator sliders. Everything the engine emits is in meters.

use serde::{Deserialize, Serialize};

use super::interior::InteriorLayoutPolicy;

/// Centimeters per meter, used to convert slider values into engine lengths.
pub const CM_PER_METER: f64 = 100.0;

/// Panels narrower than this (in meters) are merged into their neighbour.
///
/// Provisional value carried over from the product prototype.
pub const MIN_PANEL_WIDTH: f64 = 0.5;

/// Allowed deviation from a right angle (radians) for a joint to count as square.
///
/// Provisional value carried over from the product prototype.
pub const CORNER_TOLERANCE: f64 = 0.01;

/// Minimum distance (meters) between a fill bar and either end of its section.
pub const FILL_CLEARANCE: f64 = 0.05;

/// Fill bars per meter used by the density policy when nothing else is configured.
pub const DEFAULT_BARS_PER_METER: f64 = 4.5;

/// Heights (meters) of the two horizontal bars of a panel, top first.
pub const BAR_HEIGHTS: [f64; 2] = [1.1, 0.1];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LayoutError {
    #[error("layout parameters must be finite")]
    NonFinite,
    #[error("panel width must be positive (got {width})")]
    InvalidPanelWidth { width: f64 },
    #[error("post gap must be positive (got {gap})")]
    InvalidPostGap { gap: f64 },
    #[error("post gap {gap} exceeds panel width {width}")]
    GapExceedsWidth { gap: f64, width: f64 },
    #[error("panel count must be at least 1")]
    InvalidPanelCount,
    #[error("fill bar density must be positive (got {density})")]
    InvalidDensity { density: f64 },
}

/// Panel sizing as set by the user controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSpec {
    /// Panel width in centimeters.
    pub panel_width: f64,
    /// Distance between inner posts in centimeters.
    pub post_gap: f64,
    /// Number of panels in single-line mode.
    pub panel_count: u32,
}

impl Default for PanelSpec {
    fn default() -> Self {
        Self {
            panel_width: 200.0,
            post_gap: 20.0,
            panel_count: 1,
        }
    }
}

impl PanelSpec {
    #[must_use]
    pub const fn new(panel_width: f64, post_gap: f64, panel_count: u32) -> Self {
        Self {
            panel_width,
            post_gap,
            panel_count,
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.panel_width.is_finite() || !self.post_gap.is_finite() {
            return Err(LayoutError::NonFinite);
        }
        if self.panel_width <= 0.0 {
            return Err(LayoutError::InvalidPanelWidth {
                width: self.panel_width,
            });
        }
        if self.post_gap <= 0.0 {
            return Err(LayoutError::InvalidPostGap { gap: self.post_gap });
        }
        if self.post_gap > self.panel_width {
            return Err(LayoutError::GapExceedsWidth {
                gap: self.post_gap,
                width: self.panel_width,
            });
        }
        if self.panel_count == 0 {
            return Err(LayoutError::InvalidPanelCount);
        }
        Ok(())
    }

    #[must_use]
    pub fn panel_width_m(&self) -> f64 {
        self.panel_width / CM_PER_METER
    }

    #[must_use]
    pub fn post_gap_m(&self) -> f64 {
        self.post_gap / CM_PER_METER
    }
}

/// Which interior policy boundary layouts use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoundaryInterior {
    /// Inner posts at the panel spec's post gap.
    FixedGap,
    /// Fill bars at a target density (bars per meter).
    Density {
        #[serde(rename = "barsPerMeter")]
        bars_per_meter: f64,
    },
}

impl Default for BoundaryInterior {
    fn default() -> Self {
        Self::Density {
            bars_per_meter: DEFAULT_BARS_PER_METER,
        }
    }
}

/// Tunables that are not part of the user's panel spec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub interior: BoundaryInterior,
    /// Whether the very first and very last side posts of a boundary are shown.
    pub show_terminal_posts: bool,
    pub corner_tolerance: f64,
    pub min_panel_width: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            interior: BoundaryInterior::default(),
            show_terminal_posts: true,
            corner_tolerance: CORNER_TOLERANCE,
            min_panel_width: MIN_PANEL_WIDTH,
        }
    }
}

impl LayoutOptions {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.corner_tolerance.is_finite() || !self.min_panel_width.is_finite() {
            return Err(LayoutError::NonFinite);
        }
        if let BoundaryInterior::Density { bars_per_meter } = self.interior {
            if !bars_per_meter.is_finite() || bars_per_meter <= 0.0 {
                return Err(LayoutError::InvalidDensity {
                    density: bars_per_meter,
                });
            }
        }
        Ok(())
    }

    /// Resolve the interior policy for a spec, converting the post gap to meters.
    #[must_use]
    pub fn interior_policy(&self, spec: &PanelSpec) -> InteriorLayoutPolicy {
        match self.interior {
            BoundaryInterior::FixedGap => InteriorLayoutPolicy::FixedGap {
                post_gap: spec.post_gap_m(),
            },
            BoundaryInterior::Density { bars_per_meter } => {
                InteriorLayoutPolicy::Density { bars_per_meter }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundaryInterior, LayoutError, LayoutOptions, PanelSpec};

    #[test]
    fn default_spec_is_valid() {
        assert_eq!(PanelSpec::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_gap_wider_than_panel() {
        let spec = PanelSpec::new(150.0, 200.0, 1);
        assert_eq!(
            spec.validate(),
            Err(LayoutError::GapExceedsWidth {
                gap: 200.0,
                width: 150.0
            })
        );
    }

    #[test]
    fn rejects_non_positive_sizes() {
        assert!(matches!(
            PanelSpec::new(0.0, 20.0, 1).validate(),
            Err(LayoutError::InvalidPanelWidth { .. })
        ));
        assert!(matches!(
            PanelSpec::new(200.0, -1.0, 1).validate(),
            Err(LayoutError::InvalidPostGap { .. })
        ));
        assert_eq!(
            PanelSpec::new(200.0, 20.0, 0).validate(),
            Err(LayoutError::InvalidPanelCount)
        );
        assert_eq!(
            PanelSpec::new(f64::NAN, 20.0, 1).validate(),
            Err(LayoutError::NonFinite)
        );
    }

    #[test]
    fn rejects_zero_density() {
        let options = LayoutOptions {
            interior: BoundaryInterior::Density {
                bars_per_meter: 0.0,
            },
            ..LayoutOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(LayoutError::InvalidDensity { .. })
        ));
    }
}
