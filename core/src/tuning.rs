//! Tunable constants that govern the simulation.
//!
//! Every section deserialises with defaults, so a configuration file only
//! needs to name the values it overrides. The defaults form the canonical
//! parameter set.

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Arena;

/// Complete tuning surface for a simulation run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed number of simulation ticks per second.
    pub tick_rate: u32,
    /// Playfield dimensions.
    pub arena: ArenaTuning,
    /// Player movement and trail parameters.
    pub player: PlayerTuning,
    /// Zombie behaviour parameters.
    pub zombie: ZombieTuning,
    /// Stage composition and scaling.
    pub stage: StageTuning,
    /// Time budgets and scripted sequence durations.
    pub timing: TimingTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            arena: ArenaTuning::default(),
            player: PlayerTuning::default(),
            zombie: ZombieTuning::default(),
            stage: StageTuning::default(),
            timing: TimingTuning::default(),
        }
    }
}

impl Tuning {
    /// Builds the arena description from the tuning values.
    #[must_use]
    pub fn arena(&self) -> Arena {
        Arena::new(
            self.arena.width,
            self.arena.height,
            self.arena.ui_height,
            self.arena.sanctuary_width,
        )
    }

    /// Checks the tuning for values the simulation cannot operate with.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.tick_rate == 0 {
            return Err(TuningError::ZeroTickRate);
        }
        if self.arena.width <= 0.0 || self.arena.height <= self.arena.ui_height {
            return Err(TuningError::DegenerateArena {
                width: self.arena.width,
                height: self.arena.height,
            });
        }
        if self.arena.sanctuary_width <= 0.0 || self.arena.sanctuary_width >= self.arena.width {
            return Err(TuningError::SanctuaryOutOfRange {
                sanctuary_width: self.arena.sanctuary_width,
                arena_width: self.arena.width,
            });
        }
        if self.player.trail_length == 0 {
            return Err(TuningError::EmptyTrail);
        }
        if self.player.radius <= 0.0 || self.zombie.radius <= 0.0 {
            return Err(TuningError::NonPositiveRadius);
        }
        if self.zombie.speed_classes.is_empty() {
            return Err(TuningError::NoSpeedClasses);
        }
        if self.stage.playable_stages == 0 {
            return Err(TuningError::NoPlayableStages);
        }
        let chance = self.zombie.wander_turn_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(TuningError::WanderChanceOutOfRange { chance });
        }
        if !(self.timing.credits_speed > 0.0) {
            return Err(TuningError::StalledCredits {
                credits_speed: self.timing.credits_speed,
            });
        }
        if self.timing.transform_frames == 0 {
            return Err(TuningError::ZeroTransformFrames);
        }
        let multiplier = self.stage.loop_zombie_multiplier;
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(TuningError::InvalidLoopZombieMultiplier { multiplier });
        }
        if let Some(&limit) = self
            .stage
            .loop_time_limits
            .iter()
            .find(|limit| !(limit.is_finite() && **limit > 0.0))
        {
            return Err(TuningError::InvalidLoopTimeLimit { limit });
        }
        Ok(())
    }
}

/// Reasons a [`Tuning`] may be rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TuningError {
    /// Time conversion divides by the tick rate.
    #[error("tick_rate must be positive")]
    ZeroTickRate,
    /// The arena leaves no playable area below the UI band.
    #[error("arena {width}x{height} leaves no playable area")]
    DegenerateArena {
        /// Configured arena width.
        width: f32,
        /// Configured arena height.
        height: f32,
    },
    /// The sanctuary must be a strip strictly narrower than the arena.
    #[error("sanctuary width {sanctuary_width} must be within (0, {arena_width})")]
    SanctuaryOutOfRange {
        /// Configured sanctuary width.
        sanctuary_width: f32,
        /// Configured arena width.
        arena_width: f32,
    },
    /// Followers sample the trail, so it must hold at least one entry.
    #[error("player trail_length must be at least 1")]
    EmptyTrail,
    /// Collision radii must be positive.
    #[error("collision radii must be positive")]
    NonPositiveRadius,
    /// Zombie spawning draws from the speed class list.
    #[error("zombie speed_classes must not be empty")]
    NoSpeedClasses,
    /// At least one regular stage must precede the final stage.
    #[error("stage playable_stages must be at least 1")]
    NoPlayableStages,
    /// The wander turn chance is a probability.
    #[error("zombie wander_turn_chance must lie in [0, 1] (received {chance})")]
    WanderChanceOutOfRange {
        /// Configured chance.
        chance: f64,
    },
    /// The credits never reach their end unless they scroll.
    #[error("timing credits_speed must be positive (received {credits_speed})")]
    StalledCredits {
        /// Configured scroll speed.
        credits_speed: f32,
    },
    /// The bystanders transform on a frame of the ending, which starts at 1.
    #[error("timing transform_frames must be at least 1")]
    ZeroTransformFrames,
    /// Loop scaling of the zombie count must be a positive factor.
    #[error("stage loop_zombie_multiplier must be finite and positive (received {multiplier})")]
    InvalidLoopZombieMultiplier {
        /// Configured multiplier.
        multiplier: f32,
    },
    /// Every loop time limit must be a positive number of seconds.
    #[error("stage loop_time_limits entries must be finite and positive (received {limit})")]
    InvalidLoopTimeLimit {
        /// Offending entry.
        limit: f32,
    },
}

/// Playfield dimensions.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    /// Arena width in world units.
    pub width: f32,
    /// Arena height in world units, including the UI band.
    pub height: f32,
    /// Height of the band reserved for the HUD.
    pub ui_height: f32,
    /// Width of the sanctuary strip on the right edge.
    pub sanctuary_width: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 160.0,
            height: 120.0,
            ui_height: 20.0,
            sanctuary_width: 16.0,
        }
    }
}

/// Player movement and trail parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Distance covered per tick at full input.
    pub speed: f32,
    /// Collision radius.
    pub radius: f32,
    /// Number of past positions retained for followers.
    pub trail_length: usize,
    /// Preferred spawn position.
    pub spawn: [f32; 2],
    /// Extra clearance around the spawn point that must be free of obstacles.
    pub spawn_clearance: f32,
    /// Attempts made to relocate the spawn point away from obstacles.
    pub spawn_attempts: u32,
    /// Multiple of the base speed used while marching to the sanctuary.
    pub march_speed_multiplier: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 1.7,
            radius: 5.0,
            trail_length: 200,
            spawn: [40.0, 60.0],
            spawn_clearance: 2.0,
            spawn_attempts: 40,
            march_speed_multiplier: 1.5,
        }
    }
}

/// Zombie behaviour parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZombieTuning {
    /// Collision radius.
    pub radius: f32,
    /// Distance below which a zombie starts following the player.
    pub follow_radius: f32,
    /// Fraction of the unit offset toward the player added each tick while following.
    pub follow_acceleration: f32,
    /// Per-tick probability that a wandering zombie picks a new heading.
    pub wander_turn_chance: f64,
    /// Bound of each velocity component picked while wandering.
    pub wander_speed: f32,
    /// Bound of each velocity component assigned at spawn.
    pub initial_speed: f32,
    /// Speed limit before the per-unit speed factor is applied.
    pub max_speed: f32,
    /// Trail entries between consecutive followers in the column.
    pub follow_distance: usize,
    /// Distance to the column slot below which a follower stops.
    pub snap_distance: f32,
    /// Per-unit speed classes drawn at spawn.
    pub speed_classes: Vec<f32>,
    /// Minimum spawn distance from the player.
    pub spawn_min_player_distance: f32,
    /// Margin kept between spawns and the sanctuary boundary.
    pub spawn_margin: f32,
    /// Rejection sampling attempts before a spawn position is accepted anyway.
    pub spawn_attempts: u32,
}

impl Default for ZombieTuning {
    fn default() -> Self {
        Self {
            radius: 4.0,
            follow_radius: 45.0,
            follow_acceleration: 0.1,
            wander_turn_chance: 0.02,
            wander_speed: 0.5,
            initial_speed: 0.4,
            max_speed: 1.0,
            follow_distance: 12,
            snap_distance: 1.0,
            speed_classes: vec![0.8, 1.0, 1.3],
            spawn_min_player_distance: 32.0,
            spawn_margin: 6.0,
            spawn_attempts: 64,
        }
    }
}

/// Stage composition and difficulty scaling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StageTuning {
    /// Number of regular stages before the final stage.
    pub playable_stages: u32,
    /// Zombie count on stage 1.
    pub base_zombies: usize,
    /// Additional zombies per subsequent stage.
    pub zombies_per_stage: usize,
    /// Zombie count on the final stage.
    pub final_zombies: usize,
    /// Whether obstacles are placed at all.
    pub obstacles_enabled: bool,
    /// Obstacle count before the per-stage increment.
    pub base_obstacles: usize,
    /// Additional obstacles per stage number.
    pub obstacles_per_stage: usize,
    /// Obstacle count on the final stage.
    pub final_obstacles: usize,
    /// Speed multiplier increment per completed loop.
    pub loop_speed_step: f32,
    /// Whether the loop multiplier also scales the player.
    pub scale_player_with_loop: bool,
    /// Factor applied to zombie counts once per completed loop.
    pub loop_zombie_multiplier: f32,
    /// Upper bound on the zombie count of any stage.
    pub max_zombies: usize,
    /// Time budget caps in seconds for loops 1, 2, and so on; the last entry
    /// covers every later loop. Empty disables the caps.
    pub loop_time_limits: Vec<f32>,
}

impl Default for StageTuning {
    fn default() -> Self {
        Self {
            playable_stages: 5,
            base_zombies: 6,
            zombies_per_stage: 2,
            final_zombies: 30,
            obstacles_enabled: true,
            base_obstacles: 3,
            obstacles_per_stage: 1,
            final_obstacles: 13,
            loop_speed_step: 0.2,
            scale_player_with_loop: false,
            loop_zombie_multiplier: 1.0,
            max_zombies: 800,
            loop_time_limits: Vec::new(),
        }
    }
}

/// Time budgets and scripted sequence durations.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    /// Time budget for stage 1 of a fresh run, in seconds.
    pub base_time_limit: f32,
    /// Minimum time budget for the final stage, in seconds.
    pub final_time_floor: f32,
    /// Seconds added to the carried time whenever a regular stage is cleared.
    pub stage_clear_bonus: f32,
    /// Seconds added to the carried time when the final stage is cleared.
    pub final_clear_bonus: f32,
    /// Frames the time-up screen is held before fading to the title.
    pub game_over_hold_frames: u32,
    /// Frames of the bystander transformation sequence.
    pub transform_frames: u32,
    /// Frames held after the transformation before the credits roll.
    pub ending_hold_frames: u32,
    /// Credits scroll distance per frame.
    pub credits_speed: f32,
    /// Total height of the credits content.
    pub credits_height: f32,
    /// Extra scroll distance before the final score is revealed.
    pub score_reveal_offset: f32,
    /// Extra scroll distance before the credits fade out.
    pub credits_tail: f32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            base_time_limit: 45.0,
            final_time_floor: 20.0,
            stage_clear_bonus: 0.0,
            final_clear_bonus: 10.0,
            game_over_hold_frames: 120,
            transform_frames: 180,
            ending_hold_frames: 90,
            credits_speed: 0.5,
            credits_height: 364.0,
            score_reveal_offset: 10.0,
            credits_tail: 90.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let tuning = Tuning::default();
        assert_eq!(tuning.tick_rate, 60);
        assert_eq!(tuning.validate(), Ok(()));
    }

    #[test]
    fn partial_toml_keeps_unnamed_defaults() {
        let tuning: Tuning = toml::from_str(
            r#"
            [player]
            speed = 2.5

            [stage]
            obstacles_enabled = false
            "#,
        )
        .expect("partial tuning parses");

        assert_eq!(tuning.player.speed, 2.5);
        assert_eq!(tuning.player.trail_length, 200);
        assert!(!tuning.stage.obstacles_enabled);
        assert_eq!(tuning.stage.final_zombies, 30);
        assert_eq!(tuning.tick_rate, 60);
    }

    #[test]
    fn validation_rejects_unusable_values() {
        let mut tuning = Tuning::default();
        tuning.tick_rate = 0;
        assert_eq!(tuning.validate(), Err(TuningError::ZeroTickRate));

        let mut tuning = Tuning::default();
        tuning.player.trail_length = 0;
        assert_eq!(tuning.validate(), Err(TuningError::EmptyTrail));

        let mut tuning = Tuning::default();
        tuning.zombie.speed_classes.clear();
        assert_eq!(tuning.validate(), Err(TuningError::NoSpeedClasses));

        let mut tuning = Tuning::default();
        tuning.timing.credits_speed = 0.0;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::StalledCredits { credits_speed: 0.0 })
        );

        let mut tuning = Tuning::default();
        tuning.timing.transform_frames = 0;
        assert_eq!(tuning.validate(), Err(TuningError::ZeroTransformFrames));

        let mut tuning = Tuning::default();
        tuning.stage.loop_zombie_multiplier = 0.0;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::InvalidLoopZombieMultiplier { multiplier: 0.0 })
        );

        let mut tuning = Tuning::default();
        tuning.stage.loop_time_limits = vec![20.0, -5.0];
        assert_eq!(
            tuning.validate(),
            Err(TuningError::InvalidLoopTimeLimit { limit: -5.0 })
        );

        let mut tuning = Tuning::default();
        tuning.arena.sanctuary_width = 200.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::SanctuaryOutOfRange { .. })
        ));
    }

    #[test]
    fn wander_chance_must_be_a_probability() {
        let tuning: Tuning = toml::from_str("[zombie]\nwander_turn_chance = nan")
            .expect("toml accepts nan floats");
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::WanderChanceOutOfRange { chance }) if chance.is_nan()
        ));

        let mut tuning = Tuning::default();
        tuning.zombie.wander_turn_chance = 1.5;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::WanderChanceOutOfRange { chance: 1.5 })
        );
    }

    #[test]
    fn loop_scaling_parses_from_toml() {
        let tuning: Tuning = toml::from_str(
            r#"
            [stage]
            loop_zombie_multiplier = 1.8
            loop_time_limits = [20.0, 15.0, 10.0]
            "#,
        )
        .expect("loop scaling parses");

        assert_eq!(tuning.stage.loop_time_limits, vec![20.0, 15.0, 10.0]);
        assert_eq!(tuning.stage.max_zombies, 800);
        assert_eq!(tuning.validate(), Ok(()));
    }
}
