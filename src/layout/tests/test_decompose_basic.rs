use crate::geom::Tolerance;
use crate::layout::{MIN_PANEL_WIDTH, decompose_segment, decompose_segment_with_min};

fn assert_sum_matches(length: f64, panel_width: f64) {
    let decomposition = decompose_segment(length, panel_width);
    let total = decomposition.total_width();
    assert!(
        (total - length).abs() < 1e-9,
        "length {length} / width {panel_width}: panels sum to {total}"
    );

    let mut cursor = 0.0;
    for panel in &decomposition.panels {
        assert!((panel.start - cursor).abs() < 1e-9, "gap or overlap at {cursor}");
        assert!(panel.width > 0.0);
        cursor = panel.end();
    }
}

#[test]
fn exact_multiple_produces_whole_panels() {
    let decomposition = decompose_segment(10.0, 2.5);
    assert_eq!(decomposition.full_panels, 4);
    assert_eq!(decomposition.panels.len(), 4);
    assert!(decomposition.remainder.abs() < 1e-9);
    assert!(!decomposition.merged);
    for panel in &decomposition.panels {
        assert!((panel.width - 2.5).abs() < 1e-9);
    }
}

#[test]
fn float_quotients_do_not_lose_a_panel() {
    let decomposition = decompose_segment(2.0, 0.2);
    assert_eq!(decomposition.full_panels, 10);
    assert_eq!(decomposition.panels.len(), 10);
}

#[test]
fn wide_remainder_becomes_its_own_panel() {
    let decomposition = decompose_segment(7.0, 2.0);
    assert_eq!(decomposition.full_panels, 3);
    assert_eq!(decomposition.panels.len(), 4);
    assert!(!decomposition.merged);
    let last = decomposition.panels.last().expect("panels");
    assert!((last.width - 1.0).abs() < 1e-9);
    assert!((last.start - 6.0).abs() < 1e-9);
    // Last panel is offset by half of its 1 m remainder.
    assert!((last.start_fraction - 6.5 / 7.0).abs() < 1e-9);
    assert!((decomposition.panels[2].start_fraction - 4.0 / 7.0).abs() < 1e-9);
}

#[test]
fn short_remainder_merges_into_last_panel() {
    let decomposition = decompose_segment(6.3, 2.0);
    assert_eq!(decomposition.full_panels, 3);
    assert!((decomposition.remainder - 0.3).abs() < 1e-9);
    assert!(decomposition.merged);
    assert_eq!(decomposition.panels.len(), 3);
    let last = decomposition.panels.last().expect("panels");
    assert!((last.width - 2.3).abs() < 1e-9);
    // Merged remainder is 0.3 + 2.0, so the last panel shifts by 1.15.
    assert!((last.start_fraction - 5.15 / 6.3).abs() < 1e-9);
    assert!((decomposition.panels[1].start_fraction - 2.0 / 6.3).abs() < 1e-9);
}

#[test]
fn exact_multiple_keeps_plain_start_fractions() {
    let decomposition = decompose_segment(10.0, 2.5);
    for panel in &decomposition.panels {
        assert!((panel.start_fraction - panel.start / 10.0).abs() < 1e-9);
    }
}

#[test]
fn single_short_panel_is_offset_to_its_middle() {
    let decomposition = decompose_segment(1.7, 2.0);
    assert_eq!(decomposition.panels.len(), 1);
    assert!((decomposition.panels[0].start_fraction - 0.5).abs() < 1e-9);
}

#[test]
fn panel_widths_always_sum_to_length() {
    for &(length, width) in &[
        (10.0, 2.5),
        (6.3, 2.0),
        (7.0, 2.0),
        (1.7, 2.0),
        (0.2, 2.0),
        (12.345, 1.5),
        (5.0_f64.hypot(5.0), 2.0),
        (3.999_9, 2.0),
    ] {
        assert_sum_matches(length, width);
    }
}

#[test]
fn no_panel_narrower_than_minimum_unless_segment_is() {
    for &(length, width) in &[(6.3, 2.0), (4.1, 2.0), (2.49, 2.0), (9.05, 3.0), (1.7, 2.0)] {
        let decomposition = decompose_segment(length, width);
        for panel in &decomposition.panels {
            assert!(
                panel.width >= MIN_PANEL_WIDTH - 1e-9,
                "length {length}: panel width {}",
                panel.width
            );
        }
    }

    let tiny = decompose_segment(0.3, 2.0);
    assert_eq!(tiny.panels.len(), 1);
    assert!((tiny.panels[0].width - 0.3).abs() < 1e-9);
}

#[test]
fn degenerate_inputs_yield_no_panels() {
    assert!(decompose_segment(0.0, 2.0).panels.is_empty());
    assert!(decompose_segment(0.000_5, 2.0).panels.is_empty());
    assert!(decompose_segment(f64::NAN, 2.0).panels.is_empty());
    assert!(decompose_segment(5.0, 0.0).panels.is_empty());
}

#[test]
fn custom_minimum_controls_merging() {
    let decomposition = decompose_segment_with_min(6.3, 2.0, 0.2, Tolerance::LENGTH);
    assert!(!decomposition.merged);
    assert_eq!(decomposition.panels.len(), 4);
}
