//! Application-side configuration state: mode, slider values, the drawing in
//! progress, finished boundaries, and model extents.
//!
//! The layout engine itself is stateless; this is the one place that owns
//! values across calls and feeds them to it.

use serde::Serialize;

use crate::geom::Point2;
use crate::layout::{
    Assembly, Boundary, Drawing, DrawingParams, ElementKind, LayoutError, LayoutMode,
    LayoutOptions, LayoutRequest, ModelExtents, PanelSpec, layout,
};

pub const FENCE_COUNT: &str = "fenceCount";
pub const FENCE_WIDTH: &str = "fenceWidth";
pub const POST_GAP: &str = "postGap";

const FENCE_COUNT_RANGE: (f64, f64) = (1.0, 10.0);
const FENCE_WIDTH_RANGE: (f64, f64) = (150.0, 300.0);
const POST_GAP_RANGE: (f64, f64) = (15.0, 30.0);

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    #[error("unknown mode `{0}`")]
    UnknownMode(String),
    #[error("unknown element kind `{0}`")]
    UnknownElement(String),
    #[error("parameter value must be a finite number")]
    NonFinite,
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Slider description for UI generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterState {
    pub id: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

/// Round `width` to a whole number of `gap`s (at least one).
#[must_use]
pub fn align_width_to_gap(width: f64, gap: f64) -> f64 {
    if !gap.is_finite() || gap <= 0.0 {
        return width;
    }
    (width / gap).round().max(1.0) * gap
}

/// Gap-aligned width, stepped back inside the slider range when rounding
/// pushed it out.
fn aligned_width_in_range(width: f64, gap: f64) -> f64 {
    let (min, max) = FENCE_WIDTH_RANGE;
    let mut aligned = align_width_to_gap(clamp(width, min, max), gap);
    while aligned > max && aligned - gap >= min {
        aligned -= gap;
    }
    while aligned < min && aligned + gap <= max {
        aligned += gap;
    }
    aligned
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

fn parse_mode(name: &str) -> Option<LayoutMode> {
    match name.trim().to_lowercase().as_str() {
        "2d" | "boundary" => Some(LayoutMode::Boundary),
        "3d" | "singleline" | "single_line" => Some(LayoutMode::SingleLine),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Configurator {
    mode: LayoutMode,
    fence_count: u32,
    fence_width: f64,
    post_gap: f64,
    drawing_params: DrawingParams,
    layout_options: LayoutOptions,
    drawing: Drawing,
    drawings: Vec<Boundary>,
    extents: ModelExtents,
}

impl Default for Configurator {
    fn default() -> Self {
        let spec = PanelSpec::default();
        Self {
            mode: LayoutMode::Boundary,
            fence_count: spec.panel_count,
            fence_width: spec.panel_width,
            post_gap: spec.post_gap,
            drawing_params: DrawingParams::default(),
            layout_options: LayoutOptions::default(),
            drawing: Drawing::new(),
            drawings: Vec::new(),
            extents: ModelExtents::new(),
        }
    }
}

impl Configurator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LayoutMode) {
        self.mode = mode;
    }

    pub fn set_mode_name(&mut self, name: &str) -> Result<LayoutMode, ConfigError> {
        let mode = parse_mode(name).ok_or_else(|| ConfigError::UnknownMode(name.to_owned()))?;
        self.mode = mode;
        Ok(mode)
    }

    #[must_use]
    pub fn spec(&self) -> PanelSpec {
        PanelSpec::new(self.fence_width, self.post_gap, self.fence_count)
    }

    /// Apply a slider change. Returns the value actually stored after
    /// clamping and stepping.
    pub fn set_parameter(&mut self, id: &str, value: f64) -> Result<f64, ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NonFinite);
        }

        match id.trim() {
            FENCE_COUNT => {
                let (min, max) = FENCE_COUNT_RANGE;
                let count = clamp(value.round(), min, max);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    self.fence_count = count as u32;
                }
                Ok(count)
            }
            FENCE_WIDTH => {
                self.fence_width = aligned_width_in_range(value, self.post_gap);
                Ok(self.fence_width)
            }
            POST_GAP => {
                let (min, max) = POST_GAP_RANGE;
                self.post_gap = clamp(value.round(), min, max);
                self.fence_width = aligned_width_in_range(self.fence_width, self.post_gap);
                log::debug!(
                    "post gap {} realigned fence width to {}",
                    self.post_gap,
                    self.fence_width
                );
                Ok(self.post_gap)
            }
            other => Err(ConfigError::UnknownParameter(other.to_owned())),
        }
    }

    #[must_use]
    pub fn parameters(&self) -> Vec<ParameterState> {
        vec![
            ParameterState {
                id: FENCE_COUNT,
                min: FENCE_COUNT_RANGE.0,
                max: FENCE_COUNT_RANGE.1,
                step: 1.0,
                value: f64::from(self.fence_count),
            },
            ParameterState {
                id: FENCE_WIDTH,
                min: FENCE_WIDTH_RANGE.0,
                max: FENCE_WIDTH_RANGE.1,
                step: self.post_gap,
                value: self.fence_width,
            },
            ParameterState {
                id: POST_GAP,
                min: POST_GAP_RANGE.0,
                max: POST_GAP_RANGE.1,
                step: 1.0,
                value: self.post_gap,
            },
        ]
    }

    #[must_use]
    pub fn drawing_params(&self) -> &DrawingParams {
        &self.drawing_params
    }

    pub fn set_drawing_params(&mut self, params: DrawingParams) {
        self.drawing_params = params;
    }

    #[must_use]
    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout_options
    }

    pub fn set_layout_options(&mut self, options: LayoutOptions) -> Result<(), ConfigError> {
        options.validate()?;
        self.layout_options = options;
        Ok(())
    }

    /// Record the unscaled width the renderer measured for a model node.
    pub fn set_extent(&mut self, kind: &str, extent: f64) -> Result<(), ConfigError> {
        let kind = ElementKind::from_name(kind)
            .ok_or_else(|| ConfigError::UnknownElement(kind.to_owned()))?;
        self.extents.set(kind, extent);
        Ok(())
    }

    #[must_use]
    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    #[must_use]
    pub fn drawings(&self) -> &[Boundary] {
        &self.drawings
    }

    pub fn clear_drawings(&mut self) {
        self.drawing = Drawing::new();
        self.drawings.clear();
    }

    /// Snapped position for a hover preview.
    #[must_use]
    pub fn pointer_move(&self, x: f64, z: f64) -> Option<Point2> {
        self.drawing.preview(Point2::new(x, z), &self.drawing_params)
    }

    /// Commit a click. Returns the boundary when the click closed it.
    pub fn click(&mut self, x: f64, z: f64) -> Option<&Boundary> {
        let drawing = std::mem::take(&mut self.drawing);
        let step = drawing.push(Point2::new(x, z), &self.drawing_params);
        self.drawing = step.drawing;
        let boundary = step.closed?;
        self.drawings.push(boundary);
        self.drawings.last()
    }

    /// Recompute the layout for the current mode from scratch.
    pub fn compute_layout(&self) -> Result<Assembly, ConfigError> {
        let spec = self.spec();
        match self.mode {
            LayoutMode::SingleLine => Ok(layout(
                LayoutRequest::SingleLine(&spec),
                &self.layout_options,
                &self.extents,
            )?),
            LayoutMode::Boundary => {
                spec.validate()?;
                let mut assembly = Assembly::default();
                for boundary in &self.drawings {
                    let part = layout(
                        LayoutRequest::Boundary(&spec, boundary),
                        &self.layout_options,
                        &self.extents,
                    )?;
                    assembly.append(part);
                }
                Ok(assembly)
            }
        }
    }
}
