//! Application state: one owned object holding the seed points, the cloud
//! simulator, the pose mailbox and the input sampler, driven explicitly by
//! the host's event and frame callbacks. No free-standing globals.

use glam::DVec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::cloud::CloudSimulator;
use crate::config::{CloudConfig, HaloConfig, InputConfig, RepulsionConfig};
use crate::halo::HaloLineRenderer;
use crate::image::{ColorSource, CoverFit, RefImage};
use crate::input::{Bounds, InputSampler, SeedPoint};
use crate::noise_field::NoiseField;
use crate::pose::{PoseMailbox, PoseSnapshot};
use crate::surface::Surface;

/// Which renderer consumes the seed points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Static grid-cross halos ("Resting").
    Halo,
    /// Drifting particle clouds ("Drifting").
    Drift,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Halo => Mode::Drift,
            Mode::Drift => Mode::Halo,
        }
    }
}

pub struct App {
    mode: Mode,
    bounds: Bounds,
    colors: ColorSource,
    sampler: InputSampler,
    points: Vec<SeedPoint>,
    halo: HaloLineRenderer,
    clouds: CloudSimulator,
    mailbox: PoseMailbox,
    rng: SmallRng,
}

impl App {
    pub fn new(width: f64, height: f64, mode: Mode) -> Self {
        Self::with_rng(width, height, mode, SmallRng::from_entropy())
    }

    /// Deterministic constructor for tests.
    pub fn with_rng(width: f64, height: f64, mode: Mode, rng: SmallRng) -> Self {
        Self {
            mode,
            bounds: Bounds { width, height },
            colors: ColorSource::empty(),
            sampler: InputSampler::new(InputConfig::default()),
            points: Vec::new(),
            halo: HaloLineRenderer::new(HaloConfig::default()),
            clouds: CloudSimulator::new(
                CloudConfig::default(),
                RepulsionConfig::default(),
                NoiseField::new(0),
            ),
            mailbox: PoseMailbox::new(),
            rng,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn seed_points(&self) -> &[SeedPoint] {
        &self.points
    }

    pub fn cloud_count(&self) -> usize {
        self.clouds.active_count()
    }

    /// Installs the reference image used for color sampling.
    pub fn set_reference_image(&mut self, image: RefImage) {
        if let Some(fit) = CoverFit::compute(
            self.bounds.width,
            self.bounds.height,
            image.width() as f64,
            image.height() as f64,
        ) {
            self.colors = ColorSource::with_image(image, fit);
        }
    }

    /// New canvas bounds: re-derives the cover-fit transform.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = Bounds { width, height };
        self.colors.resize(width, height);
    }

    pub fn pointer_pressed(&mut self, x: f64, y: f64) {
        let emitted = self
            .sampler
            .on_press(DVec2::new(x, y), self.bounds, &self.colors);
        self.absorb(emitted);
    }

    pub fn pointer_dragged(&mut self, x: f64, y: f64) {
        let emitted = self
            .sampler
            .on_drag(DVec2::new(x, y), self.bounds, &self.colors);
        self.absorb(emitted);
    }

    pub fn pointer_released(&mut self) {
        self.sampler.on_release();
    }

    fn absorb(&mut self, emitted: Vec<SeedPoint>) {
        for point in emitted {
            if self.mode == Mode::Drift {
                self.clouds.spawn(point.pos, point.color, &mut self.rng);
            }
            self.points.push(point);
        }
    }

    /// Latest detection result replaces whatever was in the mailbox.
    pub fn on_pose_update(&mut self, snapshot: PoseSnapshot) {
        self.mailbox.publish(snapshot);
    }

    /// Drops all marks and wipes the persistent paint layer.
    pub fn clear<S: Surface>(&mut self, paint_layer: &mut S) {
        self.points.clear();
        self.clouds.clear(paint_layer);
    }

    /// Runs one frame. The host draws its own background (webcam or blank)
    /// and composites `paint_layer` under `surface` beforehand.
    pub fn frame<S: Surface>(&mut self, surface: &mut S, paint_layer: &mut S) {
        match self.mode {
            Mode::Halo => {
                self.halo.render(surface, &self.points);
            }
            Mode::Drift => {
                let baked = self
                    .clouds
                    .advance(self.mailbox.latest(), self.bounds.width);
                let alpha = self.clouds.base_alpha();
                for cloud in &baked {
                    CloudSimulator::composite(paint_layer, cloud, alpha);
                }
                self.clouds.render(surface);
            }
        }
    }
}
