//! Zombie steering, capture detection and column following.

use glam::Vec2;
use rand::Rng;
use sanctuary_core::{
    tuning::ZombieTuning, Arena, Facing, FollowSlot, Rect, ZombieId, ZombieSnapshot, ZombieState,
};

use crate::player::Player;

const FOLLOW_FACING_THRESHOLD: f32 = 0.1;

/// Shared inputs needed to advance zombies for one tick.
pub(crate) struct Surroundings<'a> {
    pub(crate) player: &'a Player,
    pub(crate) player_radius: f32,
    pub(crate) obstacles: &'a [Rect],
    pub(crate) arena: &'a Arena,
    pub(crate) tuning: &'a ZombieTuning,
}

/// Autonomous zombie roaming the arena.
#[derive(Clone, Debug)]
pub(crate) struct Zombie {
    id: ZombieId,
    position: Vec2,
    velocity: Vec2,
    facing: Facing,
    state: ZombieState,
    speed_factor: f32,
    slot: Option<FollowSlot>,
}

impl Zombie {
    pub(crate) fn new(id: ZombieId, position: Vec2, velocity: Vec2, speed_factor: f32) -> Self {
        Self {
            id,
            position,
            velocity,
            facing: Facing::Right,
            state: ZombieState::Wander,
            speed_factor,
            slot: None,
        }
    }

    pub(crate) fn id(&self) -> ZombieId {
        self.id
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn is_captured(&self) -> bool {
        self.state == ZombieState::Captured
    }

    pub(crate) fn assign_slot(&mut self, slot: FollowSlot) {
        self.slot = Some(slot);
    }

    /// Advances the zombie by one tick, returning `true` when it was captured
    /// during this call.
    pub(crate) fn update<R: Rng>(&mut self, surroundings: &Surroundings<'_>, rng: &mut R) -> bool {
        let tuning = surroundings.tuning;
        let player = surroundings.player;

        if self.is_captured() {
            self.follow_column(surroundings);
            return false;
        }

        let to_player = player.position() - self.position;
        let distance = to_player.length();

        if !player.is_zombified() && distance < surroundings.player_radius + tuning.radius {
            self.state = ZombieState::Captured;
            self.velocity = Vec2::ZERO;
            return true;
        }

        if !player.is_zombified() {
            if distance < tuning.follow_radius {
                self.state = ZombieState::Follow;
                if distance > 0.0 {
                    self.velocity += to_player / distance * tuning.follow_acceleration;
                }
            } else {
                self.state = ZombieState::Wander;
                if rng.gen_bool(turn_chance(tuning.wander_turn_chance)) {
                    let bound = tuning.wander_speed.abs();
                    self.velocity = Vec2::new(
                        rng.gen_range(-bound..=bound),
                        rng.gen_range(-bound..=bound),
                    );
                }
            }
        }

        let max_speed = tuning.max_speed * self.speed_factor;
        let speed = self.velocity.length();
        if speed > max_speed && speed != 0.0 {
            self.velocity *= max_speed / speed;
        }

        let mut next = self.position + self.velocity;
        let blocked = surroundings
            .obstacles
            .iter()
            .any(|obstacle| obstacle.collides_circle(next, tuning.radius));

        let boundary = surroundings.arena.sanctuary_boundary() - tuning.radius;
        if next.x > boundary {
            if self.position.x <= boundary {
                self.velocity.x = 0.0;
            }
            next.x = self.position.x;
        }

        if !blocked {
            self.position = next;
        }

        self.facing = Facing::from_dx(self.velocity.x, 0.0, self.facing);
        self.position = surroundings
            .arena
            .clamp_circle(self.position, tuning.radius);
        false
    }

    fn follow_column(&mut self, surroundings: &Surroundings<'_>) {
        let tuning = surroundings.tuning;
        let slot = self.slot.map_or(0, |slot| slot.get());
        let target = surroundings
            .player
            .trail_point((slot + 1) * tuning.follow_distance);

        let offset = target - self.position;
        let distance = offset.length();
        if distance > tuning.snap_distance {
            let step = (tuning.max_speed * self.speed_factor).min(distance);
            self.velocity = offset / distance * step;
            self.position += self.velocity;
        } else {
            self.velocity = Vec2::ZERO;
        }

        self.facing = Facing::from_dx(self.velocity.x, FOLLOW_FACING_THRESHOLD, self.facing);
        self.position = surroundings
            .arena
            .clamp_circle(self.position, tuning.radius);
    }

    /// Moves toward `target_x` by at most `speed`, facing right.
    pub(crate) fn march_toward(&mut self, target_x: f32, speed: f32) {
        if self.position.x < target_x {
            self.position.x += speed.min(target_x - self.position.x);
        }
        self.facing = Facing::Right;
    }

    pub(crate) fn snapshot(&self) -> ZombieSnapshot {
        ZombieSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            facing: self.facing,
            state: self.state,
            slot: self.slot,
            speed_factor: self.speed_factor,
        }
    }
}

/// Wander turn probability usable by `gen_bool`; NaN never turns.
fn turn_chance(chance: f64) -> f64 {
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}
