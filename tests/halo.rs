//! End-to-end halo-mode scenarios against a recording surface.

use glam::DVec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use marks_wasm::app::{App, Mode};
use marks_wasm::color::Rgb;
use marks_wasm::surface::RecordingSurface;

const WIDTH: f64 = 400.0;
const HEIGHT: f64 = 300.0;

fn halo_app() -> App {
    App::with_rng(WIDTH, HEIGHT, Mode::Halo, SmallRng::seed_from_u64(1))
}

/// Hairline strokes are the chopped centerlines; halo strokes use weight 1.
fn centerlines(surface: &RecordingSurface) -> Vec<(DVec2, DVec2, f64)> {
    surface
        .lines()
        .filter(|(_, _, _, weight)| *weight < 0.01)
        .map(|(from, to, color, _)| (from, to, color.alpha))
        .collect()
}

#[test]
fn center_click_without_image_draws_full_span_centerlines() {
    let mut app = halo_app();
    app.pointer_pressed(WIDTH / 2.0, HEIGHT / 2.0);

    assert_eq!(app.seed_points().len(), 1);
    assert_eq!(app.seed_points()[0].color, Rgb::FALLBACK);

    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut layer = RecordingSurface::new(WIDTH, HEIGHT);
    app.frame(&mut surface, &mut layer);

    let lines = centerlines(&surface);
    assert!(!lines.is_empty());

    // vertical centerline segments sit on x = 200 and together span the
    // full canvas height
    let vertical: Vec<_> = lines
        .iter()
        .filter(|(from, to, _)| from.x == to.x && from.x == WIDTH / 2.0)
        .collect();
    let min_y = vertical
        .iter()
        .map(|(from, _, _)| from.y)
        .fold(f64::INFINITY, f64::min);
    let max_y = vertical
        .iter()
        .map(|(_, to, _)| to.y)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(min_y, 0.0);
    assert_eq!(max_y, HEIGHT);

    // horizontal centerline spans the full width
    let horizontal: Vec<_> = lines
        .iter()
        .filter(|(from, to, _)| from.y == to.y && from.y == HEIGHT / 2.0)
        .collect();
    let min_x = horizontal
        .iter()
        .map(|(from, _, _)| from.x)
        .fold(f64::INFINITY, f64::min);
    let max_x = horizontal
        .iter()
        .map(|(_, to, _)| to.x)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(min_x, 0.0);
    assert_eq!(max_x, WIDTH);

    // every centerline segment sits between the floor fraction and 60% of
    // full opacity
    for (_, _, alpha) in &lines {
        assert!(*alpha <= 255.0 * 0.6 + 1e-9);
        assert!(*alpha >= 255.0 * 0.6 * 0.12 - 1e-9);
    }
}

#[test]
fn two_points_on_a_row_chop_each_other() {
    let mut app = halo_app();
    app.pointer_pressed(100.0, 100.0);
    app.pointer_released();
    app.pointer_pressed(300.0, 100.0);
    app.pointer_released();

    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut layer = RecordingSurface::new(WIDTH, HEIGHT);
    app.frame(&mut surface, &mut layer);

    // horizontal centerline segments for the first point live on y = 100
    // and are chopped at x = 100 and x = 300 plus the canvas edges
    let spans: Vec<_> = centerlines(&surface)
        .into_iter()
        .filter(|(from, to, _)| from.y == 100.0 && to.y == 100.0)
        .collect();
    // two owners, three grid cells each, minus any segment dim enough to skip
    assert!(spans.len() >= 4);

    let boundaries: Vec<f64> = spans
        .iter()
        .flat_map(|(from, to, _)| [from.x, to.x])
        .collect();
    for edge in [0.0, 100.0, 300.0, WIDTH] {
        assert!(
            boundaries.iter().any(|&b| (b - edge).abs() < 1e-9),
            "expected a span boundary at {edge}"
        );
    }

    // alpha falls off along the line: for one owner, the nearest span is
    // measurably brighter than the farthest
    let first_owner: Vec<_> = spans
        .iter()
        .filter(|(from, _, _)| from.x < 300.0)
        .collect();
    let brightest = first_owner
        .iter()
        .map(|(_, _, a)| *a)
        .fold(f64::NEG_INFINITY, f64::max);
    let dimmest = first_owner
        .iter()
        .map(|(_, _, a)| *a)
        .fold(f64::INFINITY, f64::min);
    assert!(brightest > dimmest + 1.0);
}

#[test]
fn every_stroke_alpha_is_a_valid_byte_value() {
    let mut app = halo_app();
    app.pointer_pressed(37.0, 41.0);
    app.pointer_dragged(220.0, 180.0);
    app.pointer_released();

    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut layer = RecordingSurface::new(WIDTH, HEIGHT);
    app.frame(&mut surface, &mut layer);

    for (_, _, color, _) in surface.lines() {
        assert!(
            (0.0..=255.0).contains(&color.alpha),
            "alpha out of range: {}",
            color.alpha
        );
    }
}
