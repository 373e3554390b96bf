//! Color values as the renderer passes them around: 8-bit channels for
//! stored colors, floating alpha for in-flight stroke opacities.

/// An opaque 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color used for seed points when no reference image is loaded.
    pub const FALLBACK: Rgb = Rgb::new(255, 0, 0);

    /// Adds a signed offset to each channel, clamping to [0, 255].
    pub fn offset(self, dr: f64, dg: f64, db: f64) -> Rgb {
        Rgb {
            r: clamp_channel(self.r as f64 + dr),
            g: clamp_channel(self.g as f64 + dg),
            b: clamp_channel(self.b as f64 + db),
        }
    }

    /// Combines with an alpha in [0, 255] into a stroke color.
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 255.0),
        }
    }
}

/// An RGB color plus a stroke alpha in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

/// Clamps a floating channel value to the valid 8-bit range.
pub fn clamp_channel(v: f64) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}
