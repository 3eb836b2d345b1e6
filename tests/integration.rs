use fence_engine::FenceEngine;
use fence_engine::configurator::{ConfigError, Configurator, FENCE_COUNT, FENCE_WIDTH, POST_GAP};
use fence_engine::layout::{ElementKind, LayoutError, LayoutMode};

fn draw_square(configurator: &mut Configurator, side: f64) {
    for (x, z) in [(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)] {
        assert!(configurator.click(x, z).is_none());
    }
    assert!(configurator.click(0.2, -0.1).is_some(), "square should close");
}

#[test]
fn engine_initializes() {
    let engine = FenceEngine::new();
    assert!(engine.is_initialized());
    assert_eq!(engine.configurator().mode(), LayoutMode::Boundary);
}

#[test]
fn single_line_layout_with_default_sliders() {
    let mut configurator = Configurator::new();
    configurator.set_mode_name("3D").expect("mode");
    let assembly = configurator.compute_layout().expect("layout");

    assert_eq!(assembly.panels.len(), 1);
    assert_eq!(assembly.count(ElementKind::SidePost), 2);
    assert_eq!(assembly.count(ElementKind::HorizontalBar), 2);
    assert_eq!(assembly.count(ElementKind::InnerPost), 9);
    // No extent reported by the renderer yet.
    assert!(assembly.diagnostics.extent_fallback_used);
}

#[test]
fn sliders_drive_single_line_layout() {
    let mut configurator = Configurator::new();
    configurator.set_mode(LayoutMode::SingleLine);
    configurator.set_parameter(POST_GAP, 25.0).expect("gap");
    configurator.set_parameter(FENCE_WIDTH, 250.0).expect("width");
    configurator.set_parameter(FENCE_COUNT, 3.0).expect("count");
    configurator.set_extent("post_horizontal", 2.5).expect("extent");

    let assembly = configurator.compute_layout().expect("layout");
    assert_eq!(assembly.panels.len(), 3);
    for (index, placed) in assembly.panels.iter().enumerate() {
        assert!((placed.center[0] - index as f64 * 2.5).abs() < 1e-9);
    }
    assert_eq!(assembly.count(ElementKind::SidePost), 6);
    for bar in assembly.placements_of(ElementKind::HorizontalBar) {
        assert!((bar.scale_x - 1.0).abs() < 1e-12);
    }
    assert!(!assembly.diagnostics.extent_fallback_used);
}

#[test]
fn boundary_mode_lays_out_closed_drawings() {
    let mut configurator = Configurator::new();
    assert_eq!(configurator.mode(), LayoutMode::Boundary);
    configurator.set_extent("horizontalBar", 1.0).expect("extent");

    // Nothing drawn yet: empty, not an error.
    let empty = configurator.compute_layout().expect("layout");
    assert!(empty.placements.is_empty());

    draw_square(&mut configurator, 5.0);
    assert!(configurator.drawing().is_empty());
    assert_eq!(configurator.drawings().len(), 1);
    assert!((configurator.drawings()[0].perimeter() - 20.0).abs() < 1e-9);

    let assembly = configurator.compute_layout().expect("layout");
    assert_eq!(assembly.diagnostics.segment_count, 4);
    // 5 m sides with 2 m panels: 2 full panels plus a 1 m remainder panel.
    assert_eq!(assembly.diagnostics.panel_count, 12);
    assert_eq!(assembly.diagnostics.hidden_post_count, 0);

    let total: f64 = assembly.panels.iter().map(|p| p.panel.width).sum();
    assert!((total - 20.0).abs() < 1e-9);
}

#[test]
fn multiple_drawings_are_numbered_consecutively() {
    let mut configurator = Configurator::new();
    configurator.set_mode(LayoutMode::Boundary);
    draw_square(&mut configurator, 4.0);
    draw_square(&mut configurator, 2.0);

    let assembly = configurator.compute_layout().expect("layout");
    assert_eq!(assembly.diagnostics.segment_count, 8);
    let max_segment = assembly.panels.iter().map(|p| p.segment).max();
    assert_eq!(max_segment, Some(7));
    assert_eq!(assembly.diagnostics.warnings.len(), 1);

    configurator.clear_drawings();
    assert!(configurator.drawings().is_empty());
}

#[test]
fn pointer_preview_snaps_without_committing() {
    let mut configurator = Configurator::new();
    assert!(configurator.click(0.1, 0.1).is_none());
    let preview = configurator.pointer_move(3.2, 2.9).expect("preview");
    assert!((preview.x - 3.0).abs() < 1e-9);
    assert!((preview.z - 3.0).abs() < 1e-9);
    assert_eq!(configurator.drawing().points().len(), 1);
}

#[test]
fn invalid_inputs_are_reported() {
    let mut configurator = Configurator::new();
    assert!(matches!(
        configurator.set_parameter("height", 2.0),
        Err(ConfigError::UnknownParameter(_))
    ));
    assert_eq!(
        configurator.set_parameter(POST_GAP, f64::NAN),
        Err(ConfigError::NonFinite)
    );
    assert!(matches!(
        configurator.set_mode_name("4D"),
        Err(ConfigError::UnknownMode(_))
    ));
    assert!(matches!(
        configurator.set_extent("gate", 1.0),
        Err(ConfigError::UnknownElement(_))
    ));
}

#[test]
fn invalid_layout_options_are_rejected() {
    let mut configurator = Configurator::new();
    let mut options = *configurator.layout_options();
    options.corner_tolerance = f64::INFINITY;
    assert_eq!(
        configurator.set_layout_options(options),
        Err(ConfigError::Layout(LayoutError::NonFinite))
    );
}

#[test]
fn slider_descriptors_reflect_gap_step() {
    let mut configurator = Configurator::new();
    configurator.set_parameter(POST_GAP, 25.0).expect("gap");
    let params = configurator.parameters();
    let width = params.iter().find(|p| p.id == FENCE_WIDTH).expect("width slider");
    assert!((width.step - 25.0).abs() < 1e-12);
    assert!((width.value % 25.0).abs() < 1e-9);
}

#[test]
fn assembly_serializes_with_camel_case_kinds() {
    let mut configurator = Configurator::new();
    configurator.set_mode(LayoutMode::SingleLine);
    let assembly = configurator.compute_layout().expect("layout");
    let json = serde_json::to_value(&assembly).expect("json");
    let first = &json["placements"][0];
    assert_eq!(first["kind"], "sidePost");
    assert!(first.get("scaleX").is_some());
    assert!(json["diagnostics"].get("panelCount").is_some());
}
