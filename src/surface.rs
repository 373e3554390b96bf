//! Drawing seam between the simulation core and whatever actually rasterizes.
//! The wasm layer implements this on a 2-D canvas context; tests implement it
//! with a call recorder so render logic is checkable without a browser.

use glam::DVec2;

use crate::color::{Rgb, Rgba};
use crate::stamp::AlphaMask;

/// Primitive draw operations the renderer needs from its backend.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    /// Strokes a line segment. `weight` may be sub-pixel (hairline).
    fn line(&mut self, from: DVec2, to: DVec2, color: Rgba, weight: f64);

    /// Fills a circle of the given diameter.
    fn fill_circle(&mut self, center: DVec2, diameter: f64, color: Rgba);

    /// Composites a grayscale opacity mask centered at `center`, multiplied by
    /// `tint` and a base `alpha` in [0, 255], over the existing content.
    fn blit_mask(&mut self, mask: &AlphaMask, center: DVec2, tint: Rgb, alpha: f64);

    /// Wipes the surface to transparent/background.
    fn clear(&mut self);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line {
        from: DVec2,
        to: DVec2,
        color: Rgba,
        weight: f64,
    },
    Circle {
        center: DVec2,
        diameter: f64,
        color: Rgba,
    },
    Blit {
        center: DVec2,
        tint: Rgb,
        alpha: f64,
    },
    Clear,
}

/// Surface double that records every call for assertions.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = (DVec2, DVec2, Rgba, f64)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Line {
                from,
                to,
                color,
                weight,
            } => Some((*from, *to, *color, *weight)),
            _ => None,
        })
    }

    pub fn blits(&self) -> impl Iterator<Item = (DVec2, Rgb, f64)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Blit {
                center,
                tint,
                alpha,
            } => Some((*center, *tint, *alpha)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn line(&mut self, from: DVec2, to: DVec2, color: Rgba, weight: f64) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            weight,
        });
    }

    fn fill_circle(&mut self, center: DVec2, diameter: f64, color: Rgba) {
        self.ops.push(DrawOp::Circle {
            center,
            diameter,
            color,
        });
    }

    fn blit_mask(&mut self, _mask: &AlphaMask, center: DVec2, tint: Rgb, alpha: f64) {
        self.ops.push(DrawOp::Blit {
            center,
            tint,
            alpha,
        });
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }
}
