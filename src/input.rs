//! Pointer sampling: presses and drags become seed points at fixed spatial
//! spacing, each colored from the reference image. Modeled as an explicit
//! {Idle, Dragging} state machine with a pure transition function so the
//! sampling rules are testable without an event loop.

use glam::DVec2;

use crate::color::Rgb;
use crate::config::InputConfig;
use crate::image::ColorSource;

/// A user-placed anchor: position plus the color sampled under it.
/// Immutable once emitted; lives until a clear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPoint {
    pub pos: DVec2,
    pub color: Rgb,
}

/// Pointer events the sampler understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(DVec2),
    Move(DVec2),
    Release,
}

/// Sampler state between events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// `last` is the most recent emitted sample position; drag distance
    /// accumulates against it so slow motion still reaches the spacing.
    Dragging { last: DVec2 },
}

/// Canvas bounds the sampler clamps against.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// Pure transition: `(state, event) -> (state, emitted sample positions)`.
/// Color lookup happens in the caller; this layer decides only *where*
/// samples land.
pub fn transition(
    state: DragState,
    event: PointerEvent,
    bounds: Bounds,
    spacing: f64,
) -> (DragState, Vec<DVec2>) {
    match (state, event) {
        (DragState::Idle, PointerEvent::Press(p)) => {
            if bounds.contains(p) {
                (DragState::Dragging { last: p }, vec![p])
            } else {
                // out-of-bounds press starts no drag
                (DragState::Idle, Vec::new())
            }
        }
        (DragState::Dragging { last }, PointerEvent::Move(p)) => {
            let dist = last.distance(p);
            if dist < spacing {
                return (DragState::Dragging { last }, Vec::new());
            }
            let steps = (dist / spacing).floor().max(1.0) as usize;
            let mut emitted = Vec::with_capacity(steps);
            for i in 1..=steps {
                let t = i as f64 / steps as f64;
                let sample = last.lerp(p, t);
                if bounds.contains(sample) {
                    emitted.push(sample);
                }
            }
            (DragState::Dragging { last: p }, emitted)
        }
        (_, PointerEvent::Release) => (DragState::Idle, Vec::new()),
        // moves while idle, double presses: no-ops
        (state, _) => (state, Vec::new()),
    }
}

/// Stateful wrapper the app drives; attaches colors to emitted positions.
#[derive(Debug)]
pub struct InputSampler {
    cfg: InputConfig,
    state: DragState,
}

impl InputSampler {
    pub fn new(cfg: InputConfig) -> Self {
        Self {
            cfg,
            state: DragState::Idle,
        }
    }

    pub fn on_press(&mut self, p: DVec2, bounds: Bounds, colors: &ColorSource) -> Vec<SeedPoint> {
        self.apply(PointerEvent::Press(p), bounds, colors)
    }

    pub fn on_drag(&mut self, p: DVec2, bounds: Bounds, colors: &ColorSource) -> Vec<SeedPoint> {
        self.apply(PointerEvent::Move(p), bounds, colors)
    }

    pub fn on_release(&mut self) {
        self.state = DragState::Idle;
    }

    fn apply(
        &mut self,
        event: PointerEvent,
        bounds: Bounds,
        colors: &ColorSource,
    ) -> Vec<SeedPoint> {
        let (next, positions) = transition(self.state, event, bounds, self.cfg.sample_spacing);
        self.state = next;
        positions
            .into_iter()
            .map(|pos| SeedPoint {
                pos,
                color: colors.sample_canvas(pos.x, pos.y),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        width: 400.0,
        height: 300.0,
    };

    #[test]
    fn press_inside_emits_one_sample_and_starts_drag() {
        let (state, emitted) = transition(
            DragState::Idle,
            PointerEvent::Press(DVec2::new(10.0, 10.0)),
            BOUNDS,
            6.0,
        );
        assert_eq!(emitted, vec![DVec2::new(10.0, 10.0)]);
        assert!(matches!(state, DragState::Dragging { .. }));
    }

    #[test]
    fn press_outside_is_ignored() {
        let (state, emitted) = transition(
            DragState::Idle,
            PointerEvent::Press(DVec2::new(-1.0, 10.0)),
            BOUNDS,
            6.0,
        );
        assert!(emitted.is_empty());
        assert_eq!(state, DragState::Idle);
    }

    #[test]
    fn fast_drag_interpolates_without_gaps() {
        let start = DVec2::new(0.0, 0.0);
        let (state, _) = transition(DragState::Idle, PointerEvent::Press(start), BOUNDS, 6.0);
        let (_, emitted) = transition(state, PointerEvent::Move(DVec2::new(60.0, 0.0)), BOUNDS, 6.0);
        // 60 px / 6 px spacing = 10 interpolated samples, last at the pointer
        assert_eq!(emitted.len(), 10);
        assert_eq!(*emitted.last().unwrap(), DVec2::new(60.0, 0.0));
        for pair in emitted.windows(2) {
            assert!((pair[0].distance(pair[1]) - 6.0).abs() < 1e-9);
        }
    }

    #[test]
    fn short_moves_accumulate_until_spacing() {
        let state = DragState::Dragging {
            last: DVec2::new(0.0, 0.0),
        };
        let (state, emitted) =
            transition(state, PointerEvent::Move(DVec2::new(2.0, 0.0)), BOUNDS, 6.0);
        assert!(emitted.is_empty());
        // last sample unchanged, so the next move measures from the origin
        let (_, emitted) =
            transition(state, PointerEvent::Move(DVec2::new(7.0, 0.0)), BOUNDS, 6.0);
        assert_eq!(emitted.len(), 1);
    }

    #[test]
    fn samples_leaving_canvas_are_dropped() {
        let state = DragState::Dragging {
            last: DVec2::new(395.0, 10.0),
        };
        let (_, emitted) =
            transition(state, PointerEvent::Move(DVec2::new(425.0, 10.0)), BOUNDS, 6.0);
        assert!(emitted.iter().all(|p| BOUNDS.contains(*p)));
        assert!(emitted.len() < 5);
    }

    #[test]
    fn moves_while_idle_are_no_ops() {
        let (state, emitted) = transition(
            DragState::Idle,
            PointerEvent::Move(DVec2::new(50.0, 50.0)),
            BOUNDS,
            6.0,
        );
        assert!(emitted.is_empty());
        assert_eq!(state, DragState::Idle);
    }

    #[test]
    fn sampler_uses_fallback_color_without_image() {
        let mut sampler = InputSampler::new(InputConfig::default());
        let colors = ColorSource::empty();
        let points = sampler.on_press(DVec2::new(5.0, 5.0), BOUNDS, &colors);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].color, Rgb::FALLBACK);
    }

    #[test]
    fn release_ends_the_drag() {
        let mut sampler = InputSampler::new(InputConfig::default());
        let colors = ColorSource::empty();
        sampler.on_press(DVec2::new(5.0, 5.0), BOUNDS, &colors);
        sampler.on_release();
        let points = sampler.on_drag(DVec2::new(50.0, 50.0), BOUNDS, &colors);
        assert!(points.is_empty());
    }
}
