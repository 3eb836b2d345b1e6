//! Turns a boundary or a single straight run into an ordered list of
//! placements for the renderer.
//!
//! Per panel the order is always: side posts (start, end), horizontal bars
//! (top, bottom), interior posts or fill bars (ascending along the panel).

use serde::Serialize;

use crate::geom::{Point2, Tolerance, Vec2};

use super::capture::{Boundary, Segment};
use super::config::{BAR_HEIGHTS, LayoutError, LayoutOptions, PanelSpec};
use super::corner::{CornerPosts, corner_posts};
use super::decompose::{Panel, decompose_segment_with_min};
use super::interior::{
    ElementKind, ExtentSource, FALLBACK_EXTENT, InteriorLayoutPolicy, layout_panel,
};

/// One structural element to render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub kind: ElementKind,
    pub position: [f64; 3],
    /// Yaw around the vertical axis; local +x maps to `(cos, sin)` on the ground plane.
    pub rotation: f64,
    /// Stretch along the local x axis. Always 1 for posts.
    pub scale_x: f64,
    pub visible: bool,
}

/// A panel together with the segment it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedPanel {
    pub segment: usize,
    #[serde(flatten)]
    pub panel: Panel,
    pub center: [f64; 3],
    pub rotation: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDiagnostics {
    pub segment_count: usize,
    pub degenerate_segment_count: usize,
    pub panel_count: usize,
    pub hidden_post_count: usize,
    pub merged_remainder_count: usize,
    pub extent_fallback_used: bool,
    /// Indices of the zero-length segments that were skipped.
    pub degenerate_segments: Vec<usize>,
    pub warnings: Vec<String>,
}

/// Recorded once per assembly when the bar model has no usable extent.
pub const EXTENT_FALLBACK_WARNING: &str = "horizontal bar extent unknown, scaled against 1";

fn skipped_segment_warning(index: usize) -> String {
    format!("segment {index} has zero length and was skipped")
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assembly {
    pub placements: Vec<Placement>,
    pub panels: Vec<PlacedPanel>,
    pub diagnostics: LayoutDiagnostics,
}

impl Assembly {
    pub fn placements_of(&self, kind: ElementKind) -> impl Iterator<Item = &Placement> + '_ {
        self.placements.iter().filter(move |p| p.kind == kind)
    }

    #[must_use]
    pub fn count(&self, kind: ElementKind) -> usize {
        self.placements_of(kind).count()
    }

    #[must_use]
    pub fn visible_count(&self, kind: ElementKind) -> usize {
        self.placements_of(kind).filter(|p| p.visible).count()
    }

    /// Concatenate another layout, renumbering its segments after ours.
    pub fn append(&mut self, other: Assembly) {
        let offset = self.diagnostics.segment_count;
        self.placements.extend(other.placements);
        self.panels.extend(other.panels.into_iter().map(|mut placed| {
            placed.segment += offset;
            placed
        }));

        let theirs = other.diagnostics;
        let ours = &mut self.diagnostics;
        ours.segment_count += theirs.segment_count;
        ours.degenerate_segment_count += theirs.degenerate_segment_count;
        ours.panel_count += theirs.panel_count;
        ours.hidden_post_count += theirs.hidden_post_count;
        ours.merged_remainder_count += theirs.merged_remainder_count;
        for warning in theirs.warnings {
            if warning == EXTENT_FALLBACK_WARNING {
                if !ours.warnings.iter().any(|w| w == EXTENT_FALLBACK_WARNING) {
                    ours.warnings.push(warning);
                }
                continue;
            }
            let skipped = theirs
                .degenerate_segments
                .iter()
                .find(|index| skipped_segment_warning(**index) == warning);
            match skipped {
                Some(index) => ours.warnings.push(skipped_segment_warning(index + offset)),
                None => ours.warnings.push(warning),
            }
        }
        ours.degenerate_segments.extend(
            theirs
                .degenerate_segments
                .iter()
                .map(|index| index + offset),
        );
        ours.extent_fallback_used |= theirs.extent_fallback_used;
    }
}

/// Which layout the configurator is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// `panel_count` panels in a straight line along x.
    SingleLine,
    /// Panels following drawn boundaries. The configurator starts here.
    #[default]
    Boundary,
}

/// Everything a layout run needs besides the options and extents.
#[derive(Debug, Clone, Copy)]
pub enum LayoutRequest<'a> {
    SingleLine(&'a PanelSpec),
    Boundary(&'a PanelSpec, &'a Boundary),
}

/// Validate and dispatch. Configuration errors are raised before any layout work.
pub fn layout(
    request: LayoutRequest<'_>,
    options: &LayoutOptions,
    extents: &dyn ExtentSource,
) -> Result<Assembly, LayoutError> {
    match request {
        LayoutRequest::SingleLine(spec) => layout_single_line(spec, extents),
        LayoutRequest::Boundary(spec, boundary) => {
            layout_boundary(boundary, spec, options, extents)
        }
    }
}

/// `panel_count` panels side by side, panel `i` centered at `x = i * width`.
pub fn layout_single_line(
    spec: &PanelSpec,
    extents: &dyn ExtentSource,
) -> Result<Assembly, LayoutError> {
    spec.validate()?;

    let width = spec.panel_width_m();
    let policy = InteriorLayoutPolicy::FixedGap {
        post_gap: spec.post_gap_m(),
    };
    let mut emitter = Emitter::new(extents);
    emitter.diagnostics.segment_count = 1;

    // Panel `start` is measured along x, so the first panel starts at `-width / 2`.
    let half = width * 0.5;
    for index in 0..spec.panel_count as usize {
        let panel = Panel {
            index,
            start: index as f64 * width - half,
            width,
            start_fraction: index as f64 / f64::from(spec.panel_count),
            show_start_post: true,
            show_end_post: true,
        };
        let center = Point2::new(index as f64 * width, 0.0);
        emitter.emit_panel(0, panel, center, 0.0, policy);
    }

    crate::debug_log!(
        "single line layout: {} panels, {} placements",
        spec.panel_count,
        emitter.placements.len()
    );
    Ok(emitter.finish())
}

/// Panels along every segment of `boundary`.
pub fn layout_boundary(
    boundary: &Boundary,
    spec: &PanelSpec,
    options: &LayoutOptions,
    extents: &dyn ExtentSource,
) -> Result<Assembly, LayoutError> {
    spec.validate()?;
    options.validate()?;

    let segments: Vec<Segment> = boundary.segments().collect();
    let mut emitter = Emitter::new(extents);
    emitter.diagnostics.segment_count = segments.len();
    if segments.is_empty() {
        return Ok(emitter.finish());
    }

    let corners = corner_posts(&segments, options.corner_tolerance);
    let policy = options.interior_policy(spec);
    let panel_width = spec.panel_width_m();
    let last_segment = segments.len() - 1;

    for (index, segment) in segments.iter().enumerate() {
        let length = segment.length();
        if !length.is_finite() || length <= Tolerance::LENGTH.eps {
            let diagnostics = &mut emitter.diagnostics;
            diagnostics.degenerate_segment_count += 1;
            diagnostics.degenerate_segments.push(index);
            diagnostics.warnings.push(skipped_segment_warning(index));
            continue;
        }

        let decomposition = decompose_segment_with_min(
            length,
            panel_width,
            options.min_panel_width,
            Tolerance::LENGTH,
        );
        if decomposition.merged {
            emitter.diagnostics.merged_remainder_count += 1;
        }

        let angle = segment.angle();
        let panel_total = decomposition.panels.len();
        for panel in decomposition.panels {
            let panel = apply_corner_rules(
                panel,
                panel_total,
                corners[index],
                index == 0,
                index == last_segment,
                options.show_terminal_posts,
            );
            let center = segment.point_at(panel.center());
            emitter.emit_panel(index, panel, center, angle, policy);
        }
    }

    log::debug!(
        "boundary layout: {} segments, {} panels, {} hidden posts",
        emitter.diagnostics.segment_count,
        emitter.diagnostics.panel_count,
        emitter.diagnostics.hidden_post_count
    );
    Ok(emitter.finish())
}

fn apply_corner_rules(
    mut panel: Panel,
    panel_total: usize,
    corner: CornerPosts,
    first_segment: bool,
    last_segment: bool,
    show_terminal_posts: bool,
) -> Panel {
    if panel.index == 0 {
        panel.show_start_post = if first_segment {
            show_terminal_posts
        } else {
            !corner.hide_start
        };
    }
    if panel.index + 1 == panel_total {
        panel.show_end_post = if last_segment {
            show_terminal_posts
        } else {
            !corner.hide_end
        };
    }
    panel
}

struct Emitter<'a> {
    extents: &'a dyn ExtentSource,
    placements: Vec<Placement>,
    panels: Vec<PlacedPanel>,
    diagnostics: LayoutDiagnostics,
}

impl<'a> Emitter<'a> {
    fn new(extents: &'a dyn ExtentSource) -> Self {
        Self {
            extents,
            placements: Vec::new(),
            panels: Vec::new(),
            diagnostics: LayoutDiagnostics::default(),
        }
    }

    fn emit_panel(
        &mut self,
        segment: usize,
        panel: Panel,
        center: Point2,
        rotation: f64,
        policy: InteriorLayoutPolicy,
    ) {
        let axis = Vec2::from_angle(rotation);
        let at = |offset: f64, height: f64| -> [f64; 3] {
            (center + axis * offset).at_height(height).to_array()
        };
        let half = panel.width * 0.5;

        for (offset, visible) in [(-half, panel.show_start_post), (half, panel.show_end_post)] {
            if !visible {
                self.diagnostics.hidden_post_count += 1;
            }
            self.placements.push(Placement {
                kind: ElementKind::SidePost,
                position: at(offset, 0.0),
                rotation,
                scale_x: 1.0,
                visible,
            });
        }

        let interior = layout_panel(panel.width, policy, self.extents);
        if interior.fallback_used && !self.diagnostics.extent_fallback_used {
            log::warn!("horizontal bar extent unknown, falling back to {FALLBACK_EXTENT}");
            self.diagnostics.extent_fallback_used = true;
            self.diagnostics
                .warnings
                .push(EXTENT_FALLBACK_WARNING.to_owned());
        }

        for height in BAR_HEIGHTS {
            self.placements.push(Placement {
                kind: ElementKind::HorizontalBar,
                position: at(0.0, height),
                rotation,
                scale_x: interior.bar_scale,
                visible: true,
            });
        }

        for offset in interior.posts {
            self.placements.push(Placement {
                kind: ElementKind::InnerPost,
                position: at(offset, 0.0),
                rotation,
                scale_x: 1.0,
                visible: true,
            });
        }

        self.diagnostics.panel_count += 1;
        self.panels.push(PlacedPanel {
            segment,
            panel,
            center: center.at_height(0.0).to_array(),
            rotation,
        });
    }

    fn finish(self) -> Assembly {
        Assembly {
            placements: self.placements,
            panels: self.panels,
            diagnostics: self.diagnostics,
        }
    }
}
