//! Cloud brush pre-rendering. Each cloud gets one grayscale opacity mask
//! built at spawn time; hue is applied later by tinting, so a single mask
//! geometry serves any color.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::config::CloudConfig;

/// Per-speckle positional jitter: Gaussian with a 1.2 px spread, so speckle
/// centers smear slightly off their radial positions.
fn jitter(rng: &mut impl Rng) -> f64 {
    let n: f64 = StandardNormal.sample(rng);
    n * 1.2
}

/// A square raster of per-pixel opacities in [0, 1], immutable once built.
#[derive(Debug, Clone)]
pub struct AlphaMask {
    size: usize,
    data: Vec<f32>,
}

impl AlphaMask {
    fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    /// Side length in pixels.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Opacity at (x, y); out-of-bounds reads as fully transparent.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x >= self.size || y >= self.size {
            return 0.0;
        }
        self.data[y * self.size + x]
    }

    /// Raw opacity values, row-major.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Composites a filled circle of the given opacity, "over" the existing
    /// content so overlapping speckles build up density.
    fn stamp_circle(&mut self, cx: f64, cy: f64, diameter: f64, opacity: f64) {
        let radius = diameter * 0.5;
        if radius <= 0.0 || opacity <= 0.0 {
            return;
        }
        let opacity = opacity.min(1.0) as f32;
        let x0 = ((cx - radius).floor().max(0.0)) as usize;
        let y0 = ((cy - radius).floor().max(0.0)) as usize;
        let x1 = ((cx + radius).ceil().min(self.size as f64 - 1.0)).max(0.0) as usize;
        let y1 = ((cy + radius).ceil().min(self.size as f64 - 1.0)).max(0.0) as usize;
        let r2 = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    let m = &mut self.data[y * self.size + x];
                    *m += opacity * (1.0 - *m);
                }
            }
        }
    }

    /// Separable box blur, run twice to approximate a Gaussian soften.
    fn blur(&mut self, radius: usize) {
        if radius == 0 {
            return;
        }
        for _ in 0..2 {
            self.box_pass_horizontal(radius);
            self.box_pass_vertical(radius);
        }
    }

    fn box_pass_horizontal(&mut self, radius: usize) {
        let n = self.size;
        let window = (2 * radius + 1) as f32;
        let mut row = vec![0.0f32; n];
        for y in 0..n {
            let base = y * n;
            let mut acc: f32 = 0.0;
            // prime the window for x = 0
            for x in 0..=radius.min(n - 1) {
                acc += self.data[base + x];
            }
            for x in 0..n {
                row[x] = acc / window;
                let leaving = x as isize - radius as isize;
                if leaving >= 0 {
                    acc -= self.data[base + leaving as usize];
                }
                let entering = x + radius + 1;
                if entering < n {
                    acc += self.data[base + entering];
                }
            }
            self.data[base..base + n].copy_from_slice(&row);
        }
    }

    fn box_pass_vertical(&mut self, radius: usize) {
        let n = self.size;
        let window = (2 * radius + 1) as f32;
        let mut col = vec![0.0f32; n];
        for x in 0..n {
            let mut acc: f32 = 0.0;
            for y in 0..=radius.min(n - 1) {
                acc += self.data[y * n + x];
            }
            for y in 0..n {
                col[y] = acc / window;
                let leaving = y as isize - radius as isize;
                if leaving >= 0 {
                    acc -= self.data[leaving as usize * n + x];
                }
                let entering = y + radius + 1;
                if entering < n {
                    acc += self.data[entering * n + x];
                }
            }
            for y in 0..n {
                self.data[y * n + x] = col[y];
            }
        }
    }
}

/// Builds soft cloud masks. Stateless beyond its config.
#[derive(Debug, Clone, Copy)]
pub struct CloudStampFactory {
    cfg: CloudConfig,
}

impl CloudStampFactory {
    pub fn new(cfg: CloudConfig) -> Self {
        Self { cfg }
    }

    /// Scatters speckles into a fresh mask and softens it.
    ///
    /// Speckle radius uses `sqrt(u01) * spray_radius` so density stays uniform
    /// by area instead of clumping at the center; size and opacity both fall
    /// off linearly with radius, with a [0.7, 1.0] multiplier for texture.
    pub fn create_stamp(&self, rng: &mut impl Rng) -> AlphaMask {
        let cfg = &self.cfg;
        let spray = cfg.spray_radius;
        let size = (spray * 2.0).round() as usize;
        let mut mask = AlphaMask::new(size.max(1));

        for _ in 0..cfg.particles {
            let r = rng.gen::<f64>().sqrt() * spray;
            let angle = rng.gen::<f64>() * std::f64::consts::TAU;
            let px = spray + angle.cos() * r + jitter(rng);
            let py = spray + angle.sin() * r + jitter(rng);
            let falloff = 1.0 - r / spray;
            let sz = (cfg.speckle_size_min
                + (cfg.speckle_size_max - cfg.speckle_size_min) * falloff)
                * rng.gen_range(0.7..=1.0);
            let opacity =
                (8.0 + (220.0 - 8.0) * falloff) / 255.0 * rng.gen_range(0.7..=1.0);
            mask.stamp_circle(px, py, sz, opacity);
        }

        if cfg.blur_radius == 0 {
            // Accepted degradation: many overlapping speckles still read soft.
            log::warn!("stamp softening disabled; using unblurred speckle mask");
        } else {
            mask.blur(cfg.blur_radius);
        }
        mask
    }
}
