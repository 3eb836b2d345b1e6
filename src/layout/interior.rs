//! Inner post and fill bar placement inside a single panel, plus horizontal
//! bar stretching.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geom::Tolerance;

use super::config::FILL_CLEARANCE;

/// Structural element kinds a placement can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    SidePost,
    InnerPost,
    HorizontalBar,
}

impl ElementKind {
    pub const ALL: &'static [Self] = &[Self::SidePost, Self::InnerPost, Self::HorizontalBar];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SidePost => "sidePost",
            Self::InnerPost => "innerPost",
            Self::HorizontalBar => "horizontalBar",
        }
    }

    /// Accepts the camelCase name or the mesh node name of the fence model.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "sidePost" | "post_side" => Some(Self::SidePost),
            "innerPost" | "post_inner" => Some(Self::InnerPost),
            "horizontalBar" | "post_horizontal" => Some(Self::HorizontalBar),
            _ => None,
        }
    }
}

/// Unscaled horizontal extent of each structural model.
pub trait ExtentSource {
    fn extent(&self, kind: ElementKind) -> Option<f64>;
}

/// No asset information at all; every lookup falls back.
impl ExtentSource for () {
    fn extent(&self, _kind: ElementKind) -> Option<f64> {
        None
    }
}

/// Extents measured by the renderer from the loaded model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelExtents {
    extents: BTreeMap<ElementKind, f64>,
}

impl ModelExtents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: ElementKind, extent: f64) {
        self.extents.insert(kind, extent);
    }

    #[must_use]
    pub fn with(mut self, kind: ElementKind, extent: f64) -> Self {
        self.set(kind, extent);
        self
    }
}

impl ExtentSource for ModelExtents {
    fn extent(&self, kind: ElementKind) -> Option<f64> {
        self.extents.get(&kind).copied()
    }
}

/// Extent used when the model cannot tell us its size.
pub const FALLBACK_EXTENT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarScale {
    pub scale: f64,
    pub fallback_used: bool,
}

/// Stretch factor that makes the horizontal bar model span `desired_width`.
#[must_use]
pub fn bar_scale(desired_width: f64, extents: &dyn ExtentSource) -> BarScale {
    let (original, fallback_used) = match extents.extent(ElementKind::HorizontalBar) {
        Some(extent) if extent.is_finite() && extent > 0.0 => (extent, false),
        other => {
            log::debug!("horizontal bar extent unavailable ({other:?}), using {FALLBACK_EXTENT}");
            (FALLBACK_EXTENT, true)
        }
    };
    BarScale {
        scale: (desired_width / original).max(0.0),
        fallback_used,
    }
}

/// How the inside of a panel is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteriorLayoutPolicy {
    /// Inner posts every `post_gap` meters from the panel start.
    FixedGap { post_gap: f64 },
    /// Evenly spread fill bars at roughly `bars_per_meter`.
    Density { bars_per_meter: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelInterior {
    /// Offsets from the panel center, ascending.
    pub posts: Vec<f64>,
    pub bar_scale: f64,
    pub fallback_used: bool,
}

#[must_use]
pub fn layout_panel(
    panel_width: f64,
    policy: InteriorLayoutPolicy,
    extents: &dyn ExtentSource,
) -> PanelInterior {
    let posts = interior_positions(panel_width, policy, Tolerance::LENGTH);
    let scale = bar_scale(panel_width.max(0.0), extents);
    PanelInterior {
        posts,
        bar_scale: scale.scale,
        fallback_used: scale.fallback_used,
    }
}

/// Interior positions as offsets from the panel center.
#[must_use]
pub fn interior_positions(
    panel_width: f64,
    policy: InteriorLayoutPolicy,
    tol: Tolerance,
) -> Vec<f64> {
    if !panel_width.is_finite() || panel_width <= tol.eps {
        return Vec::new();
    }
    let start = -panel_width * 0.5;
    let end = panel_width * 0.5;

    match policy {
        InteriorLayoutPolicy::FixedGap { post_gap } => {
            fixed_gap_positions(start, end, post_gap, tol)
        }
        InteriorLayoutPolicy::Density { bars_per_meter } => {
            density_positions(start, end, bars_per_meter)
        }
    }
}

fn fixed_gap_positions(start: f64, end: f64, post_gap: f64, tol: Tolerance) -> Vec<f64> {
    if !post_gap.is_finite() || post_gap <= 0.0 {
        return Vec::new();
    }
    let available = end - start;
    let count = ((available + tol.eps) / post_gap).floor().max(1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = count as usize;

    (0..count)
        .map(|i| start + (i + 1) as f64 * post_gap)
        .take_while(|x| *x < end - tol.eps)
        .collect()
}

fn density_positions(start: f64, end: f64, bars_per_meter: f64) -> Vec<f64> {
    if !bars_per_meter.is_finite() || bars_per_meter <= 0.0 {
        return Vec::new();
    }
    let width = end - start;
    let target = (width * bars_per_meter).round().max(1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let target = target as usize;
    let spacing = width / (target + 1) as f64;

    (1..=target)
        .map(|j| start + j as f64 * spacing)
        .filter(|x| *x > start + FILL_CLEARANCE && *x < end - FILL_CLEARANCE)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ElementKind, ModelExtents, bar_scale};

    #[test]
    fn kind_names_round_trip_through_mesh_names() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(
            ElementKind::from_name("post_horizontal"),
            Some(ElementKind::HorizontalBar)
        );
        assert_eq!(ElementKind::from_name("gate"), None);
    }

    #[test]
    fn bar_scale_uses_measured_extent() {
        let extents = ModelExtents::new().with(ElementKind::HorizontalBar, 0.5);
        let scale = bar_scale(2.0, &extents);
        assert!((scale.scale - 4.0).abs() < 1e-12);
        assert!(!scale.fallback_used);
    }

    #[test]
    fn bar_scale_falls_back_on_bad_extent() {
        let extents = ModelExtents::new().with(ElementKind::HorizontalBar, 0.0);
        let scale = bar_scale(2.5, &extents);
        assert!((scale.scale - 2.5).abs() < 1e-12);
        assert!(scale.fallback_used);

        let scale = bar_scale(2.5, &());
        assert!(scale.fallback_used);
    }
}
