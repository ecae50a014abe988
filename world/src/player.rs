//! Player movement, trail recording and the decorative bystanders.

use std::collections::VecDeque;

use glam::Vec2;
use sanctuary_core::{
    tuning::PlayerTuning, Arena, BystanderSnapshot, Facing, MoveIntent, PlayerSnapshot, Rect,
};

const INTENT_DEADZONE: f32 = 0.01;
const FACING_THRESHOLD: f32 = 0.01;

/// Player-controlled survivor leading the follow column.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    position: Vec2,
    facing: Facing,
    trail: VecDeque<Vec2>,
    zombified: bool,
    speed_factor: f32,
}

impl Player {
    /// Creates a player whose whole trail sits on the spawn position.
    pub(crate) fn new(position: Vec2, trail_length: usize, speed_factor: f32) -> Self {
        Self {
            position,
            facing: Facing::Right,
            trail: std::iter::repeat(position)
                .take(trail_length.max(1))
                .collect(),
            zombified: false,
            speed_factor,
        }
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn is_zombified(&self) -> bool {
        self.zombified
    }

    pub(crate) fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    /// Trail entry at `index`, saturating at the oldest entry.
    pub(crate) fn trail_point(&self, index: usize) -> Vec2 {
        let clamped = index.min(self.trail.len().saturating_sub(1));
        self.trail.get(clamped).copied().unwrap_or(self.position)
    }

    /// Advances the player by one tick.
    pub(crate) fn integrate(
        &mut self,
        intent: MoveIntent,
        controllable: bool,
        obstacles: &[Rect],
        arena: &Arena,
        tuning: &PlayerTuning,
    ) {
        let requested = intent.vector();
        if controllable && !self.zombified && requested.length() > INTENT_DEADZONE {
            let direction = if requested.length() > 1.0 {
                requested.normalize()
            } else {
                requested
            };
            let step = direction * tuning.speed * self.speed_factor;
            self.position = slide(self.position, step, tuning.radius, obstacles);
            self.facing = Facing::from_dx(step.x, FACING_THRESHOLD, self.facing);
        }

        self.position = arena.clamp_circle(self.position, tuning.radius);

        if !self.zombified {
            self.trail.push_front(self.position);
            self.trail.truncate(tuning.trail_length.max(1));
        }
    }

    /// Moves toward `target_x` by at most `speed`, facing right.
    pub(crate) fn march_toward(&mut self, target_x: f32, speed: f32) {
        if self.position.x < target_x {
            self.position.x += speed.min(target_x - self.position.x);
        }
        self.facing = Facing::Right;
    }

    /// Points every trail entry at the current position.
    pub(crate) fn collapse_trail(&mut self) {
        let position = self.position;
        self.trail.iter_mut().for_each(|entry| *entry = position);
    }

    /// Turns the player, returning whether the flag changed.
    pub(crate) fn zombify(&mut self) -> bool {
        let changed = !self.zombified;
        self.zombified = true;
        changed
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            facing: self.facing,
            zombified: self.zombified,
        }
    }

    #[cfg(test)]
    pub(crate) fn trail_len(&self) -> usize {
        self.trail.len()
    }
}

/// Resolves a step against the first obstacle it collides with, sliding
/// along whichever axis remains free.
fn slide(from: Vec2, step: Vec2, radius: f32, obstacles: &[Rect]) -> Vec2 {
    let full = from + step;
    let Some(obstacle) = obstacles
        .iter()
        .find(|obstacle| obstacle.collides_circle(full, radius))
    else {
        return full;
    };

    let vertical = Vec2::new(from.x, full.y);
    if !obstacle.collides_circle(vertical, radius) {
        return vertical;
    }
    let horizontal = Vec2::new(full.x, from.y);
    if !obstacle.collides_circle(horizontal, radius) {
        return horizontal;
    }
    from
}

/// Survivor waiting inside the sanctuary on the final stage.
#[derive(Clone, Debug)]
pub(crate) struct Bystander {
    position: Vec2,
    zombified: bool,
}

impl Bystander {
    pub(crate) fn new(position: Vec2) -> Self {
        Self {
            position,
            zombified: false,
        }
    }

    pub(crate) fn zombify(&mut self) {
        self.zombified = true;
    }

    pub(crate) fn snapshot(&self) -> BystanderSnapshot {
        BystanderSnapshot {
            position: self.position,
            facing: Facing::Left,
            zombified: self.zombified,
        }
    }
}
