use glam::Mat4;

use crate::Scene;

/// Maximum per-element difference below which two matrices are considered
/// equal.
const TOLERANCE: f32 = 0.0025;

/// Detects camera motion by comparing view-projection matrices across frames,
/// so that zooming counts as motion as well.
///
/// The tracker lags one frame behind on purpose: `curr` holds the matrix seen
/// during the previous [`Self::advance()`], so that it can be compared
/// against the live one before being replaced.
#[derive(Clone, Debug, Default)]
pub struct CameraMotionTracker {
    /// Matrix recorded by the advance before the most recent one; kept for
    /// inspection only, motion is detected against `curr`.
    last: Option<Mat4>,
    curr: Option<Mat4>,
}

impl CameraMotionTracker {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns whether the scene's camera has moved since the last call to
    /// [`Self::advance()`].
    ///
    /// No scene or no camera means no motion; a camera appearing for the
    /// first time counts as motion.
    pub fn has_moved(&self, scene: Option<&Scene>) -> bool {
        let Some(live) = Self::live(scene) else {
            return false;
        };

        match self.curr {
            Some(curr) => !curr.abs_diff_eq(live, TOLERANCE),
            None => true,
        }
    }

    /// Records the live matrix; called once per frame, after the decision
    /// has been made.
    pub fn advance(&mut self, scene: Option<&Scene>) {
        let Some(live) = Self::live(scene) else {
            return;
        };

        self.last = Some(self.curr.unwrap_or(live));
        self.curr = Some(live);
    }

    /// Forgets the history, adopting the scene's current matrix as both the
    /// last and the current one.
    pub fn reset(&mut self, scene: Option<&Scene>) {
        let live = Self::live(scene);

        self.last = live;
        self.curr = live;
    }

    /// Matrix the camera had one frame before [`Self::curr()`].
    pub fn last(&self) -> Option<Mat4> {
        self.last
    }

    pub fn curr(&self) -> Option<Mat4> {
        self.curr
    }

    fn live(scene: Option<&Scene>) -> Option<Mat4> {
        scene?.camera.map(|camera| camera.view_projection())
    }
}
