//! Drifting-cloud simulation: soft pre-rendered brushes that wander on a
//! slow noise field, get pushed away from detected body keypoints, and
//! fluctuate gently in hue. Clouds persist until an explicit clear; past the
//! active ceiling the oldest are baked into the static paint layer.

use glam::DVec2;
use rand::Rng;

use crate::color::Rgb;
use crate::config::{CloudConfig, RepulsionConfig};
use crate::noise_field::NoiseField;
use crate::pose::PoseSnapshot;
use crate::stamp::{AlphaMask, CloudStampFactory};
use crate::surface::Surface;

/// Phase offset decorrelating the y drift axis from the x axis.
const DRIFT_PHASE_OFFSET: f64 = 437.1;
/// Extra multiplier on the noise-to-displacement mapping.
const DRIFT_MULTIPLIER: f64 = 1.2;
/// Color jitter amplitude per channel, in channel units.
const HUE_JITTER_RANGE: f64 = 12.0;
/// Below this distance a keypoint sits on the cloud center; the push
/// direction is degenerate, so use the full force along +x.
const DEGENERATE_DIST: f64 = 1e-6;

/// One live brush. Stamp geometry and particle count are fixed at creation;
/// only position and tint animate.
#[derive(Debug, Clone)]
pub struct Cloud {
    pub pos: DVec2,
    pub stamp: AlphaMask,
    pub base_color: Rgb,
    pub current_color: Rgb,
    noise_seed_x: f64,
    noise_seed_y: f64,
    drift_scale: f64,
    hue_jitter_speed: f64,
}

/// Summed repulsion from all confident keypoints in a snapshot. Keypoint x
/// is mirrored because the detector and the canvas face each other. Forces
/// from multiple close keypoints add; nothing caps or normalizes the sum.
pub fn repulsion(
    pos: DVec2,
    snapshot: &PoseSnapshot,
    canvas_width: f64,
    cfg: &RepulsionConfig,
) -> DVec2 {
    let mut total = DVec2::ZERO;
    for kp in snapshot.confident_keypoints(cfg.confidence_threshold) {
        let mirrored = DVec2::new(canvas_width - kp.x, kp.y);
        let delta = pos - mirrored;
        let dist = delta.length();
        if dist >= cfg.radius {
            continue;
        }
        if dist < DEGENERATE_DIST {
            total += DVec2::new(cfg.force, 0.0);
        } else {
            total += delta / dist * (cfg.force * (1.0 - dist / cfg.radius));
        }
    }
    total
}

pub struct CloudSimulator {
    cfg: CloudConfig,
    repulsion_cfg: RepulsionConfig,
    factory: CloudStampFactory,
    noise: NoiseField,
    clouds: Vec<Cloud>,
    frame: u64,
}

impl CloudSimulator {
    pub fn new(cfg: CloudConfig, repulsion_cfg: RepulsionConfig, noise: NoiseField) -> Self {
        Self {
            cfg,
            repulsion_cfg,
            factory: CloudStampFactory::new(cfg),
            noise,
            clouds: Vec::new(),
            frame: 0,
        }
    }

    pub fn active_count(&self) -> usize {
        self.clouds.len()
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    /// Builds a stamp and appends a new cloud. Noise seeds come from a wide
    /// range so drift phases decorrelate across clouds.
    pub fn spawn(&mut self, pos: DVec2, base_color: Rgb, rng: &mut impl Rng) {
        let stamp = self.factory.create_stamp(rng);
        self.clouds.push(Cloud {
            pos,
            stamp,
            base_color,
            current_color: base_color,
            noise_seed_x: rng.gen_range(0.0..10_000.0),
            noise_seed_y: rng.gen_range(0.0..10_000.0),
            drift_scale: rng.gen_range(self.cfg.drift_scale_min..=self.cfg.drift_scale_max),
            hue_jitter_speed: rng.gen_range(self.cfg.hue_jitter_min..=self.cfg.hue_jitter_max),
        });
    }

    /// Advances every cloud one frame: noise drift plus keypoint repulsion,
    /// then color jitter. Returns the clouds evicted by the active-count
    /// ceiling, oldest first; the caller bakes them into the paint layer.
    pub fn advance(&mut self, snapshot: &PoseSnapshot, canvas_width: f64) -> Vec<Cloud> {
        let t = self.frame as f64 * self.cfg.time_rate;
        self.frame += 1;

        for cloud in &mut self.clouds {
            let half = cloud.drift_scale * DRIFT_MULTIPLIER;
            let drift = DVec2::new(
                self.noise.sample_signed(cloud.noise_seed_x + t, half),
                self.noise
                    .sample_signed(cloud.noise_seed_y + t + DRIFT_PHASE_OFFSET, half),
            );
            let push = repulsion(cloud.pos, snapshot, canvas_width, &self.repulsion_cfg);
            cloud.pos += drift + push;

            let jt = t * cloud.hue_jitter_speed;
            cloud.current_color = cloud.base_color.offset(
                self.noise
                    .sample_signed(cloud.noise_seed_x + jt, HUE_JITTER_RANGE),
                self.noise
                    .sample_signed(cloud.noise_seed_x + 100.0 + jt, HUE_JITTER_RANGE),
                self.noise
                    .sample_signed(cloud.noise_seed_y + 200.0 + jt, HUE_JITTER_RANGE),
            );
        }

        if self.clouds.len() > self.cfg.max_active {
            let overflow = self.clouds.len() - self.cfg.max_active;
            self.clouds.drain(0..overflow).collect()
        } else {
            Vec::new()
        }
    }

    /// Composites every active cloud in creation order; later clouds draw
    /// over earlier ones.
    pub fn render<S: Surface>(&self, surface: &mut S) {
        for cloud in &self.clouds {
            Self::composite(surface, cloud, self.cfg.base_alpha);
        }
    }

    /// Draws one cloud's tinted stamp; also used to bake evicted clouds.
    pub fn composite<S: Surface>(surface: &mut S, cloud: &Cloud, alpha: f64) {
        surface.blit_mask(&cloud.stamp, cloud.pos, cloud.current_color, alpha);
    }

    pub fn base_alpha(&self) -> f64 {
        self.cfg.base_alpha
    }

    /// Drops every cloud and wipes the persistent paint layer. Total and
    /// synchronous; safe to call repeatedly.
    pub fn clear<S: Surface>(&mut self, paint_layer: &mut S) {
        self.clouds.clear();
        paint_layer.clear();
    }
}
