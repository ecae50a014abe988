//! Deterministic controller standing in for a human at the keyboard.

use glam::Vec2;
use sanctuary_core::{Phase, ZombieState};
use sanctuary_rendering::FrameInput;
use sanctuary_world::{query, World};

const STUCK_EPSILON: f32 = 0.05;
const STUCK_FRAMES: u32 = 3;
const DETOUR_FRAMES: u32 = 30;

/// Confirms every waiting screen and chases the nearest free zombie.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    last_position: Option<Vec2>,
    stuck_frames: u32,
    detour_frames: u32,
    detour_sign: f32,
}

impl Autopilot {
    pub(crate) fn new() -> Self {
        Self {
            detour_sign: 1.0,
            ..Self::default()
        }
    }

    /// Chooses the input for the next frame.
    pub(crate) fn decide(&mut self, world: &World, phase: Phase) -> FrameInput {
        match phase {
            Phase::Title | Phase::Tutorial => FrameInput::new(Vec2::ZERO, true),
            Phase::Playing => FrameInput::new(self.steer(world), false),
            _ => {
                self.last_position = None;
                FrameInput::idle()
            }
        }
    }

    fn steer(&mut self, world: &World) -> Vec2 {
        let Some(player) = query::player(world) else {
            return Vec2::ZERO;
        };
        let position = player.position;

        let nearest = query::zombie_view(world)
            .iter()
            .filter(|zombie| zombie.state != ZombieState::Captured)
            .map(|zombie| zombie.position)
            .min_by(|a, b| a.distance(position).total_cmp(&b.distance(position)));
        let Some(target) = nearest else {
            self.last_position = Some(position);
            return Vec2::ZERO;
        };

        let barely_moved = self
            .last_position
            .is_some_and(|last| last.distance(position) < STUCK_EPSILON);
        self.last_position = Some(position);
        self.stuck_frames = if barely_moved { self.stuck_frames + 1 } else { 0 };

        if self.stuck_frames >= STUCK_FRAMES && self.detour_frames == 0 {
            self.detour_frames = DETOUR_FRAMES;
            self.detour_sign = -self.detour_sign;
            self.stuck_frames = 0;
        }

        let heading = (target - position).normalize_or_zero();
        if self.detour_frames > 0 {
            self.detour_frames -= 1;
            return heading.perp() * self.detour_sign;
        }
        heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctuary_core::{Command, Tuning};

    #[test]
    fn confirms_on_waiting_screens_only() {
        let world = World::new(Tuning::default(), 1);
        let mut autopilot = Autopilot::new();

        assert!(autopilot.decide(&world, Phase::Title).confirm);
        assert!(autopilot.decide(&world, Phase::Tutorial).confirm);
        assert!(!autopilot.decide(&world, Phase::Playing).confirm);
        assert_eq!(
            autopilot.decide(&world, Phase::GoToSanctuary),
            FrameInput::idle()
        );
    }

    #[test]
    fn heads_for_the_nearest_free_zombie() {
        let mut world = World::new(Tuning::default(), 8);
        let mut events = Vec::new();
        let layout = sanctuary_core::StageLayout {
            stage: sanctuary_core::StageNumber::new(1),
            zombie_count: 4,
            obstacle_count: 0,
            zombie_speed_multiplier: 1.0,
            player_speed_factor: 1.0,
            bystanders: false,
        };
        sanctuary_world::apply(&mut world, Command::SpawnStage { layout }, &mut events);

        let player = query::player(&world).expect("player spawned").position;
        let nearest = query::zombie_view(&world)
            .iter()
            .map(|zombie| zombie.position)
            .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)))
            .expect("zombies spawned");

        let input = Autopilot::new().decide(&world, Phase::Playing);
        let expected = (nearest - player).normalize_or_zero();
        assert!(input.movement.distance(expected) < 1e-5);
    }
}
