//! The fence layout engine.
//!
//! Data flows one way: capture → decomposition → corner suppression →
//! interior layout → emission. Nothing here keeps state between calls.

mod assembly;
mod capture;
mod config;
mod corner;
mod decompose;
mod interior;

pub use assembly::{
    Assembly, EXTENT_FALLBACK_WARNING, LayoutDiagnostics, LayoutMode, LayoutRequest, PlacedPanel,
    Placement, layout, layout_boundary, layout_single_line,
};
pub use capture::{
    ANGLE_SNAP_MIN_LENGTH, Boundary, CaptureStep, Drawing, DrawingParams, Segment, snap_angle,
    snap_point,
};
pub use config::{
    BAR_HEIGHTS, BoundaryInterior, CM_PER_METER, CORNER_TOLERANCE, DEFAULT_BARS_PER_METER,
    FILL_CLEARANCE, LayoutError, LayoutOptions, MIN_PANEL_WIDTH, PanelSpec,
};
pub use corner::{CornerPosts, corner_posts, is_square_joint, should_hide_post, turn_angle};
pub use decompose::{Decomposition, Panel, decompose_segment, decompose_segment_with_min};
pub use interior::{
    BarScale, ElementKind, ExtentSource, FALLBACK_EXTENT, InteriorLayoutPolicy, ModelExtents,
    PanelInterior, bar_scale, interior_positions, layout_panel,
};

#[cfg(test)]
mod tests;
