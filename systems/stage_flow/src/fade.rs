//! Screen fade used to gate phase transitions.

/// Alpha at which a settled fade counts as fully covering the screen.
const OPAQUE_THRESHOLD: f32 = 0.99;

/// Linear fade between a transparent (0.0) and an opaque (1.0) overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    alpha: f32,
    target: f32,
    speed: f32,
}

impl Default for Fade {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            target: 0.0,
            speed: 0.0,
        }
    }
}

impl Fade {
    /// Starts moving toward `target` by `speed` per frame.
    pub fn to(&mut self, target: f32, speed: f32) {
        self.target = target.clamp(0.0, 1.0);
        self.speed = speed.abs();
    }

    /// Advances the fade by one frame.
    pub fn update(&mut self) {
        let remaining = self.target - self.alpha;
        if remaining.abs() <= self.speed {
            self.alpha = self.target;
        } else {
            self.alpha += self.speed.copysign(remaining);
        }
    }

    /// Current overlay opacity.
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Reports whether the fade is still moving.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.alpha != self.target
    }

    /// Reports whether the fade has settled on an opaque screen.
    #[must_use]
    pub fn is_covered(&self) -> bool {
        !self.is_active() && self.alpha >= OPAQUE_THRESHOLD
    }
}
