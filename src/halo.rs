//! Grid-cross halo rendering. Every seed point owns a vertical and a
//! horizontal line across the canvas; around each line a family of offset
//! strokes fades outward, and the lines themselves are chopped at every
//! grid crossing so brightness falls off along the line as well.
//!
//! All points' coordinates partition the canvas for every point's chopping,
//! so one point's color leaks into segments near another point's crossings.
//! That weave is the intended look, not an ownership bug.

use std::collections::BTreeSet;

use glam::DVec2;

use crate::config::HaloConfig;
use crate::input::SeedPoint;
use crate::surface::Surface;

/// Fraction of full alpha used for centerlines and as the halo's inner edge.
const CENTER_ALPHA_FRACTION: f64 = 0.6;
/// Chopped centerline segments dimmer than this are skipped entirely.
const MIN_VISIBLE_ALPHA: f64 = 0.5;

pub struct HaloLineRenderer {
    cfg: HaloConfig,
}

impl HaloLineRenderer {
    pub fn new(cfg: HaloConfig) -> Self {
        Self { cfg }
    }

    /// Base opacity of a halo stroke at offset `d` from its line: linear from
    /// 60% of full scale at the line down to 0 at `max_spread`.
    pub fn base_alpha(&self, d: f64) -> f64 {
        let t = 1.0 - d / self.cfg.max_spread;
        (255.0 * CENTER_ALPHA_FRACTION * t).max(0.0)
    }

    /// Along-line opacity multiplier for a segment whose midpoint sits
    /// `dist_along` pixels from the owning point, measured along the line.
    /// Sub-linear exponent keeps the center saturated; the floor keeps color
    /// from vanishing while still inside spread range.
    pub fn along_factor(&self, dist_along: f64) -> f64 {
        let t = (1.0 - dist_along / self.cfg.max_spread).clamp(0.0, 1.0);
        let floor = self.cfg.min_alpha_factor;
        floor + (1.0 - floor) * t.powf(self.cfg.along_exponent)
    }

    /// Sorted distinct rounded coordinates of all points on one axis,
    /// extended with the two canvas edges. The returned list partitions the
    /// canvas into grid cells.
    pub fn grid_coords(values: impl Iterator<Item = f64>, extent: f64) -> Vec<f64> {
        let interior: BTreeSet<i64> = values
            .map(|v| v.round() as i64)
            .filter(|&v| v > 0 && (v as f64) < extent)
            .collect();
        let mut coords = Vec::with_capacity(interior.len() + 2);
        coords.push(0.0);
        coords.extend(interior.into_iter().map(|v| v as f64));
        coords.push(extent);
        coords
    }

    /// Draws the full halo pattern for the current seed-point set: offset
    /// gradient strokes, then chopped centerlines, then the seed dots.
    /// Later points draw over earlier ones.
    pub fn render<S: Surface>(&self, surface: &mut S, points: &[SeedPoint]) {
        if points.is_empty() {
            return;
        }
        let width = surface.width();
        let height = surface.height();
        let xs = Self::grid_coords(points.iter().map(|p| p.pos.x), width);
        let ys = Self::grid_coords(points.iter().map(|p| p.pos.y), height);

        for p in points {
            self.render_halo_strokes(surface, p, &xs, &ys);
        }
        for p in points {
            self.render_centerlines(surface, p, &xs, &ys);
        }
        for p in points {
            surface.fill_circle(p.pos, self.cfg.dot_diameter, p.color.with_alpha(255.0));
        }
    }

    fn render_halo_strokes<S: Surface>(
        &self,
        surface: &mut S,
        p: &SeedPoint,
        xs: &[f64],
        ys: &[f64],
    ) {
        let width = surface.width();
        let height = surface.height();
        let mut d = self.cfg.spread_step;
        while d <= self.cfg.max_spread {
            let base = self.base_alpha(d);

            // vertical strokes offset either side of the point's x, chopped
            // at every horizontal grid line
            for cell in ys.windows(2) {
                let (y0, y1) = (cell[0], cell[1]);
                let mid = (y0 + y1) / 2.0;
                let alpha = base * self.along_factor((mid - p.pos.y).abs());
                for x in [p.pos.x + d, p.pos.x - d] {
                    if (0.0..=width).contains(&x) {
                        surface.line(
                            DVec2::new(x, y0),
                            DVec2::new(x, y1),
                            p.color.with_alpha(alpha),
                            1.0,
                        );
                    }
                }
            }

            // horizontal strokes offset either side of the point's y
            for cell in xs.windows(2) {
                let (x0, x1) = (cell[0], cell[1]);
                let mid = (x0 + x1) / 2.0;
                let alpha = base * self.along_factor((mid - p.pos.x).abs());
                for y in [p.pos.y + d, p.pos.y - d] {
                    if (0.0..=height).contains(&y) {
                        surface.line(
                            DVec2::new(x0, y),
                            DVec2::new(x1, y),
                            p.color.with_alpha(alpha),
                            1.0,
                        );
                    }
                }
            }

            d += self.cfg.spread_step;
        }
    }

    fn render_centerlines<S: Surface>(
        &self,
        surface: &mut S,
        p: &SeedPoint,
        xs: &[f64],
        ys: &[f64],
    ) {
        let full = 255.0 * CENTER_ALPHA_FRACTION;

        // vertical centerline, one segment per horizontal grid cell
        for cell in ys.windows(2) {
            let (y0, y1) = (cell[0], cell[1]);
            let mid = (y0 + y1) / 2.0;
            let alpha = full * self.along_factor((mid - p.pos.y).abs());
            if alpha > MIN_VISIBLE_ALPHA {
                surface.line(
                    DVec2::new(p.pos.x, y0),
                    DVec2::new(p.pos.x, y1),
                    p.color.with_alpha(alpha),
                    self.cfg.main_weight,
                );
            }
        }

        // horizontal centerline, one segment per vertical grid cell
        for cell in xs.windows(2) {
            let (x0, x1) = (cell[0], cell[1]);
            let mid = (x0 + x1) / 2.0;
            let alpha = full * self.along_factor((mid - p.pos.x).abs());
            if alpha > MIN_VISIBLE_ALPHA {
                surface.line(
                    DVec2::new(x0, p.pos.y),
                    DVec2::new(x1, p.pos.y),
                    p.color.with_alpha(alpha),
                    self.cfg.main_weight,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn renderer() -> HaloLineRenderer {
        HaloLineRenderer::new(HaloConfig::default())
    }

    #[test]
    fn base_alpha_is_linear_and_bounded() {
        let r = renderer();
        let max = HaloConfig::default().max_spread;
        assert!((r.base_alpha(0.0) - 255.0 * 0.6).abs() < 1e-9);
        assert!(r.base_alpha(max).abs() < 1e-9);
        let mut prev = f64::INFINITY;
        let mut d = 0.0;
        while d <= max {
            let a = r.base_alpha(d);
            assert!(a <= prev, "base alpha must be non-increasing");
            prev = a;
            d += 1.0;
        }
    }

    #[test]
    fn along_factor_monotone_within_floor_and_one() {
        let r = renderer();
        let cfg = HaloConfig::default();
        let mut prev = f64::INFINITY;
        let mut dist = 0.0;
        while dist <= cfg.max_spread * 1.5 {
            let f = r.along_factor(dist);
            assert!(f <= prev + 1e-12, "along factor must not increase");
            assert!(f >= cfg.min_alpha_factor - 1e-12);
            assert!(f <= 1.0 + 1e-12);
            prev = f;
            dist += 2.5;
        }
        assert!((r.along_factor(0.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn grid_coords_dedupes_rounds_and_adds_edges() {
        let coords =
            HaloLineRenderer::grid_coords([100.2, 99.8, 300.0, -5.0, 900.0].into_iter(), 400.0);
        assert_eq!(coords, vec![0.0, 100.0, 300.0, 400.0]);
    }

    #[test]
    fn two_points_same_row_produce_three_horizontal_spans() {
        // points at (100,100) and (300,100) on a 400-wide canvas
        let coords = HaloLineRenderer::grid_coords([100.0, 300.0].into_iter(), 400.0);
        assert_eq!(coords, vec![0.0, 100.0, 300.0, 400.0]);
        let r = renderer();
        let p = DVec2::new(100.0, 100.0);
        let factors: Vec<f64> = coords
            .windows(2)
            .map(|cell| r.along_factor(((cell[0] + cell[1]) / 2.0 - p.x).abs()))
            .collect();
        assert_eq!(factors.len(), 3);
        // the span nearest the owner is measurably brighter than the far one
        assert!(factors[0] > factors[2] + 0.01);
    }

    #[test]
    fn all_emitted_alphas_stay_in_byte_range() {
        use crate::surface::RecordingSurface;
        let mut surface = RecordingSurface::new(320.0, 240.0);
        let points = vec![
            SeedPoint {
                pos: DVec2::new(60.0, 60.0),
                color: Rgb::new(10, 200, 30),
            },
            SeedPoint {
                pos: DVec2::new(250.0, 120.0),
                color: Rgb::new(200, 10, 30),
            },
        ];
        renderer().render(&mut surface, &points);
        for (_, _, color, _) in surface.lines() {
            assert!((0.0..=255.0).contains(&color.alpha));
        }
    }
}
