//! Tunables for both rendering modes. Defaults reproduce the look the
//! sketch was designed around; everything here is adjustable per-instance.

/// Halo (grid-cross) mode parameters.
#[derive(Debug, Clone, Copy)]
pub struct HaloConfig {
    /// How many pixels the gradient spreads either side of a line.
    pub max_spread: f64,
    /// Offset step between consecutive gradient lines. Smaller = smoother.
    pub spread_step: f64,
    /// Exponent for the along-line falloff. < 1 keeps the center saturated
    /// longer before the drop.
    pub along_exponent: f64,
    /// Minimum fraction of alpha kept while inside spread range.
    pub min_alpha_factor: f64,
    /// Centerline stroke weight. Sub-pixel values render hairline-thin.
    pub main_weight: f64,
    /// Diameter of the dot drawn at each seed point.
    pub dot_diameter: f64,
}

impl Default for HaloConfig {
    fn default() -> Self {
        Self {
            max_spread: 160.0,
            spread_step: 1.0,
            along_exponent: 0.5,
            min_alpha_factor: 0.12,
            main_weight: 0.001,
            dot_diameter: 6.0,
        }
    }
}

/// Drift (cloud) mode parameters.
#[derive(Debug, Clone, Copy)]
pub struct CloudConfig {
    /// Stamp radius in pixels; the mask is a square of side `2 * radius`.
    pub spray_radius: f64,
    /// Speckles scattered into each stamp.
    pub particles: usize,
    pub speckle_size_min: f64,
    pub speckle_size_max: f64,
    /// Box-blur radius applied to the finished mask. 0 disables softening
    /// (degraded but acceptable output).
    pub blur_radius: usize,
    pub drift_scale_min: f64,
    pub drift_scale_max: f64,
    pub hue_jitter_min: f64,
    pub hue_jitter_max: f64,
    /// Base tint alpha when compositing a cloud, in [0, 255].
    pub base_alpha: f64,
    /// Per-frame advance of the noise-field time coordinate.
    pub time_rate: f64,
    /// Active-cloud ceiling; the oldest clouds past this are baked into the
    /// static paint layer instead of being simulated forever.
    pub max_active: usize,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            spray_radius: 120.0,
            particles: 400,
            speckle_size_min: 1.0,
            speckle_size_max: 16.0,
            blur_radius: 12,
            drift_scale_min: 0.08,
            drift_scale_max: 0.26,
            hue_jitter_min: 0.008,
            hue_jitter_max: 0.01,
            base_alpha: 255.0,
            time_rate: 0.002,
            max_active: 64,
        }
    }
}

/// Keypoint repulsion parameters.
#[derive(Debug, Clone, Copy)]
pub struct RepulsionConfig {
    /// Distance within which clouds are pushed away from a keypoint.
    pub radius: f64,
    /// Push strength at distance zero.
    pub force: f64,
    /// Keypoints at or below this confidence are ignored.
    pub confidence_threshold: f64,
}

impl Default for RepulsionConfig {
    fn default() -> Self {
        Self {
            radius: 80.0,
            force: 3.5,
            confidence_threshold: 0.3,
        }
    }
}

/// Pointer sampling parameters.
#[derive(Debug, Clone, Copy)]
pub struct InputConfig {
    /// Spacing between drag samples in pixels. Smaller = smoother path,
    /// more points.
    pub sample_spacing: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { sample_spacing: 6.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let halo = HaloConfig::default();
        assert!(halo.max_spread > 0.0);
        assert!(halo.min_alpha_factor > 0.0 && halo.min_alpha_factor < 1.0);
        assert!(halo.along_exponent > 0.0 && halo.along_exponent <= 1.0);

        let cloud = CloudConfig::default();
        assert!(cloud.drift_scale_min <= cloud.drift_scale_max);
        assert!(cloud.speckle_size_min <= cloud.speckle_size_max);
        assert!(cloud.max_active > 0);

        let rep = RepulsionConfig::default();
        assert!(rep.radius > 0.0 && rep.force > 0.0);
    }
}
