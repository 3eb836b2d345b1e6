use crate::geom::Tolerance;
use crate::layout::{
    ElementKind, FILL_CLEARANCE, InteriorLayoutPolicy, ModelExtents, interior_positions,
    layout_panel,
};

#[test]
fn fixed_gap_200cm_20cm_gives_nine_posts() {
    let interior = layout_panel(2.0, InteriorLayoutPolicy::FixedGap { post_gap: 0.2 }, &());
    assert_eq!(interior.posts.len(), 9);

    assert!((interior.posts[0] - (-0.8)).abs() < 1e-9);
    for pair in interior.posts.windows(2) {
        assert!((pair[1] - pair[0] - 0.2).abs() < 1e-9);
    }
    assert!(*interior.posts.last().expect("posts") < 1.0);
}

#[test]
fn fixed_gap_never_places_posts_past_the_panel() {
    for &(width, gap) in &[(2.5, 0.2), (1.5, 0.15), (3.0, 0.3), (2.0, 0.3), (0.6, 0.25)] {
        let policy = InteriorLayoutPolicy::FixedGap { post_gap: gap };
        let posts = interior_positions(width, policy, Tolerance::LENGTH);
        for x in &posts {
            assert!(*x > -width / 2.0 && *x < width / 2.0, "post {x} outside panel {width}");
        }
    }
}

#[test]
fn fixed_gap_equal_to_width_has_no_inner_posts() {
    let posts = interior_positions(
        2.0,
        InteriorLayoutPolicy::FixedGap { post_gap: 2.0 },
        Tolerance::LENGTH,
    );
    assert!(posts.is_empty());
}

#[test]
fn density_spreads_bars_evenly() {
    let posts = interior_positions(
        2.5,
        InteriorLayoutPolicy::Density { bars_per_meter: 4.5 },
        Tolerance::LENGTH,
    );
    assert_eq!(posts.len(), 11);
    let spacing = 2.5 / 12.0;
    assert!((posts[0] - (-1.25 + spacing)).abs() < 1e-9);
    for pair in posts.windows(2) {
        assert!((pair[1] - pair[0] - spacing).abs() < 1e-9);
    }
}

#[test]
fn density_keeps_at_least_one_bar() {
    let posts = interior_positions(
        0.2,
        InteriorLayoutPolicy::Density { bars_per_meter: 1.0 },
        Tolerance::LENGTH,
    );
    assert_eq!(posts, vec![0.0]);
}

#[test]
fn density_drops_bars_inside_clearance() {
    // 0.09 m wide: one bar in the middle, 0.045 m from each end.
    let posts = interior_positions(
        0.09,
        InteriorLayoutPolicy::Density { bars_per_meter: 4.5 },
        Tolerance::LENGTH,
    );
    assert!(posts.is_empty());

    let posts = interior_positions(
        0.3,
        InteriorLayoutPolicy::Density { bars_per_meter: 4.5 },
        Tolerance::LENGTH,
    );
    for x in posts {
        assert!(x > -0.15 + FILL_CLEARANCE && x < 0.15 - FILL_CLEARANCE);
    }
}

#[test]
fn bar_scale_tracks_panel_width() {
    let extents = ModelExtents::new().with(ElementKind::HorizontalBar, 2.0);
    let interior = layout_panel(2.5, InteriorLayoutPolicy::FixedGap { post_gap: 0.2 }, &extents);
    assert!((interior.bar_scale - 1.25).abs() < 1e-12);
    assert!(!interior.fallback_used);

    let interior = layout_panel(2.5, InteriorLayoutPolicy::FixedGap { post_gap: 0.2 }, &());
    assert!((interior.bar_scale - 2.5).abs() < 1e-12);
    assert!(interior.fallback_used);
}
