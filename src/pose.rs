//! Bridge for the asynchronous body-keypoint stream. Detections arrive on
//! their own cadence; the frame loop only ever reads the latest snapshot, so
//! the handoff is a single-slot mailbox with overwrite semantics. No history,
//! no interpolation: a silent stream keeps serving the stale snapshot.

/// One detected keypoint in detector coordinates (horizontally mirrored
/// relative to the canvas).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

/// One detected body. A malformed detection parses as an empty keypoint
/// list and simply contributes nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
}

/// The whole detector output for one instant, replaced wholesale on arrival.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseSnapshot {
    pub poses: Vec<Pose>,
}

impl PoseSnapshot {
    /// Keypoints above the confidence threshold, across all poses.
    pub fn confident_keypoints(&self, threshold: f64) -> impl Iterator<Item = &Keypoint> {
        self.poses
            .iter()
            .flat_map(|pose| pose.keypoints.iter())
            .filter(move |kp| kp.confidence > threshold)
    }
}

/// Latest-value mailbox between the detection callback and the frame loop.
#[derive(Debug, Default)]
pub struct PoseMailbox {
    latest: PoseSnapshot,
}

impl PoseMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot. Older values are dropped, never queued.
    pub fn publish(&mut self, snapshot: PoseSnapshot) {
        self.latest = snapshot;
    }

    /// The most recent snapshot; stale if the stream has gone quiet.
    pub fn latest(&self) -> &PoseSnapshot {
        &self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(confidences: &[f64]) -> PoseSnapshot {
        PoseSnapshot {
            poses: vec![Pose {
                keypoints: confidences
                    .iter()
                    .map(|&c| Keypoint {
                        x: 1.0,
                        y: 2.0,
                        confidence: c,
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn publish_overwrites_previous_snapshot() {
        let mut mailbox = PoseMailbox::new();
        mailbox.publish(snap(&[0.9]));
        mailbox.publish(snap(&[0.1, 0.2]));
        assert_eq!(mailbox.latest().poses[0].keypoints.len(), 2);
    }

    #[test]
    fn stale_snapshot_persists_across_silent_frames() {
        let mut mailbox = PoseMailbox::new();
        mailbox.publish(snap(&[0.8]));
        // stream silent: every frame keeps seeing the same value
        for _ in 0..10 {
            assert_eq!(mailbox.latest(), &snap(&[0.8]));
        }
    }

    #[test]
    fn confidence_filter_is_strict() {
        let snapshot = snap(&[0.3, 0.31, 0.9]);
        let kept: Vec<_> = snapshot.confident_keypoints(0.3).collect();
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn empty_pose_contributes_nothing() {
        let snapshot = PoseSnapshot {
            poses: vec![Pose::default(), Pose::default()],
        };
        assert_eq!(snapshot.confident_keypoints(0.0).count(), 0);
    }
}
