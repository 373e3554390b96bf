//! Reference-image color sampling. The image itself is loaded by the host
//! environment; the core sees only an RGBA pixel buffer plus the cover-fit
//! transform that maps canvas coordinates back into it.

use crate::color::Rgb;

/// A decoded reference image: dimensions plus tightly packed RGBA bytes.
#[derive(Debug, Clone)]
pub struct RefImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl RefImage {
    /// Returns `None` when the buffer does not match the stated dimensions,
    /// so a half-loaded image degrades to "no image" rather than panicking.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || rgba.len() != (width * height * 4) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples the pixel at image coordinates, clamping to bounds.
    pub fn sample(&self, x: f64, y: f64) -> Rgb {
        let ix = (x.floor().max(0.0) as u32).min(self.width - 1);
        let iy = (y.floor().max(0.0) as u32).min(self.height - 1);
        let i = ((iy * self.width + ix) * 4) as usize;
        Rgb::new(self.rgba[i], self.rgba[i + 1], self.rgba[i + 2])
    }
}

/// Scale-and-offset mapping that fills the canvas with the image while
/// preserving aspect ratio (overflow is cropped). Recomputed on resize.
#[derive(Debug, Clone, Copy)]
pub struct CoverFit {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl CoverFit {
    pub fn compute(canvas_w: f64, canvas_h: f64, image_w: f64, image_h: f64) -> Option<Self> {
        if image_w <= 0.0 || image_h <= 0.0 || canvas_w <= 0.0 || canvas_h <= 0.0 {
            return None;
        }
        let scale = (canvas_w / image_w).max(canvas_h / image_h);
        let display_w = image_w * scale;
        let display_h = image_h * scale;
        Some(Self {
            scale,
            offset_x: (canvas_w - display_w) / 2.0,
            offset_y: (canvas_h - display_h) / 2.0,
        })
    }

    /// Maps a canvas coordinate into image space (unclamped).
    pub fn canvas_to_image(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.offset_x) / self.scale,
            (y - self.offset_y) / self.scale,
        )
    }
}

/// The sampling capability the input layer actually consumes.
#[derive(Debug, Clone, Default)]
pub struct ColorSource {
    image: Option<(RefImage, CoverFit)>,
}

impl ColorSource {
    pub fn empty() -> Self {
        Self { image: None }
    }

    pub fn with_image(image: RefImage, fit: CoverFit) -> Self {
        Self {
            image: Some((image, fit)),
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Re-derives the cover-fit transform for new canvas bounds.
    pub fn resize(&mut self, canvas_w: f64, canvas_h: f64) {
        if let Some((image, fit)) = self.image.as_mut() {
            if let Some(new_fit) = CoverFit::compute(
                canvas_w,
                canvas_h,
                image.width() as f64,
                image.height() as f64,
            ) {
                *fit = new_fit;
            }
        }
    }

    /// Samples the color under a canvas coordinate; fallback when no image.
    pub fn sample_canvas(&self, x: f64, y: f64) -> Rgb {
        match &self.image {
            Some((image, fit)) => {
                let (ix, iy) = fit.canvas_to_image(x, y);
                let ix = ix.clamp(0.0, image.width() as f64 - 1.0);
                let iy = iy.clamp(0.0, image.height() as f64 - 1.0);
                image.sample(ix, iy)
            }
            None => Rgb::FALLBACK,
        }
    }
}
