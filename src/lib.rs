#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod configurator;
pub mod geom;
pub mod layout;

use std::fmt;

use configurator::Configurator;
use layout::{DrawingParams, LayoutOptions};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClickResult<'a> {
    closed: bool,
    points: &'a [geom::Point2],
}

/// Public entry point for the web front end.
#[wasm_bindgen]
pub struct FenceEngine {
    initialized: bool,
    configurator: Configurator,
}

impl Default for FenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl FenceEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FenceEngine {
        FenceEngine {
            initialized: true,
            configurator: Configurator::new(),
        }
    }

    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Switch between `"2D"` (drawn boundaries) and `"3D"` (single line).
    #[wasm_bindgen]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        self.configurator.set_mode_name(mode).map_err(to_js_error)?;
        Ok(())
    }

    /// Set a slider value by id; returns the value after clamping.
    #[wasm_bindgen]
    pub fn set_parameter(&mut self, id: &str, value: f64) -> Result<f64, JsValue> {
        self.configurator.set_parameter(id, value).map_err(to_js_error)
    }

    /// Slider descriptors for UI generation.
    #[wasm_bindgen]
    pub fn get_parameters(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.configurator.parameters())
    }

    /// Report the unscaled width of a model node (`post_horizontal`, ...).
    #[wasm_bindgen]
    pub fn set_extent(&mut self, kind: &str, extent: f64) -> Result<(), JsValue> {
        self.configurator.set_extent(kind, extent).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_drawing_params(&mut self, params: JsValue) -> Result<(), JsValue> {
        let params: DrawingParams = serde_wasm_bindgen::from_value(params)
            .map_err(|err| JsError::new(&err.to_string()))?;
        self.configurator.set_drawing_params(params);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_layout_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: LayoutOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|err| JsError::new(&err.to_string()))?;
        self.configurator
            .set_layout_options(options)
            .map_err(to_js_error)
    }

    /// Snapped hover position, or `null` for unusable input.
    #[wasm_bindgen]
    pub fn pointer_move(&self, x: f64, z: f64) -> Result<JsValue, JsValue> {
        to_js_value(&self.configurator.pointer_move(x, z))
    }

    /// Commit a click; reports whether it closed the boundary.
    #[wasm_bindgen]
    pub fn click(&mut self, x: f64, z: f64) -> Result<JsValue, JsValue> {
        let closed = self.configurator.click(x, z).is_some();
        let points = if closed {
            self.configurator
                .drawings()
                .last()
                .map(layout::Boundary::points)
                .unwrap_or_default()
        } else {
            self.configurator.drawing().points()
        };
        to_js_value(&ClickResult { closed, points })
    }

    /// Points of the boundary currently being drawn.
    #[wasm_bindgen]
    pub fn get_drawing(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.configurator.drawing().points())
    }

    /// All finished boundaries.
    #[wasm_bindgen]
    pub fn get_drawings(&self) -> Result<JsValue, JsValue> {
        let drawings: Vec<&[geom::Point2]> = self
            .configurator
            .drawings()
            .iter()
            .map(layout::Boundary::points)
            .collect();
        to_js_value(&drawings)
    }

    #[wasm_bindgen]
    pub fn clear_drawings(&mut self) {
        self.configurator.clear_drawings();
    }

    /// Recompute placements for the current mode.
    #[wasm_bindgen]
    pub fn compute_layout(&self) -> Result<JsValue, JsValue> {
        let assembly = self.configurator.compute_layout().map_err(to_js_error)?;
        to_js_value(&assembly)
    }
}

impl FenceEngine {
    #[must_use]
    pub fn configurator(&self) -> &Configurator {
        &self.configurator
    }

    pub fn configurator_mut(&mut self) -> &mut Configurator {
        &mut self.configurator
    }
}

fn to_js_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsError::new(&err.to_string()).into())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
