#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sanctuary simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event batches, query immutable
//! snapshots, and respond exclusively with new command batches.

pub mod geometry;
pub mod tuning;

use glam::Vec2;

pub use geometry::{Arena, Rect};
pub use tuning::{Tuning, TuningError};

/// Screen or gameplay phase the session is currently in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Title screen waiting for confirmation.
    #[default]
    Title,
    /// Instructions shown before the first stage.
    Tutorial,
    /// Player-controlled stage with a running clock.
    Playing,
    /// The clock ran out and the player turned.
    TimeUp,
    /// The column is marching into the sanctuary.
    GoToSanctuary,
    /// Scripted sequence after the final stage.
    Ending,
    /// Scrolling credits with the final score.
    CreditsRoll,
}

impl Phase {
    /// Reports whether entities are simulated during the phase.
    #[must_use]
    pub const fn simulates_entities(self) -> bool {
        matches!(self, Self::Playing | Self::GoToSanctuary | Self::TimeUp)
    }

    /// Reports whether the player responds to movement input during the phase.
    #[must_use]
    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Horizontal direction a sprite faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Facing toward decreasing x.
    Left,
    /// Facing toward increasing x.
    #[default]
    Right,
}

impl Facing {
    /// Derives a facing from a horizontal displacement, keeping `current`
    /// when the displacement does not exceed `threshold`.
    #[must_use]
    pub fn from_dx(dx: f32, threshold: f32, current: Self) -> Self {
        if dx > threshold {
            Self::Right
        } else if dx < -threshold {
            Self::Left
        } else {
            current
        }
    }
}

/// Unique identifier assigned to a zombie within a stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZombieId(u32);

impl ZombieId {
    /// Creates a new zombie identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Zero-based position of a captured zombie in the follow column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FollowSlot(usize);

impl FollowSlot {
    /// Creates a slot with the provided index.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based slot index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// One-based stage number. The stage after the last playable one is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageNumber(u32);

impl StageNumber {
    /// Creates a stage number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric stage value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether this is the final stage given the number of playable stages.
    #[must_use]
    pub const fn is_final(&self, playable_stages: u32) -> bool {
        self.0 > playable_stages
    }
}

/// Behavioural state of a zombie.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ZombieState {
    /// Drifting randomly.
    #[default]
    Wander,
    /// Accelerating toward the nearby player.
    Follow,
    /// Walking in the follow column behind the player.
    Captured,
}

/// Player movement request for a single tick, each component within `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveIntent(Vec2);

impl MoveIntent {
    /// Creates an intent, clamping each component into `[-1, 1]`.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        Self(Vec2::new(clamp(x), clamp(y)))
    }

    /// Intent that requests no movement.
    #[must_use]
    pub const fn idle() -> Self {
        Self(Vec2::ZERO)
    }

    /// Requested direction vector.
    #[must_use]
    pub const fn vector(&self) -> Vec2 {
        self.0
    }
}

/// Composition of a stage handed to the world when it is spawned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageLayout {
    /// Stage being spawned.
    pub stage: StageNumber,
    /// Number of zombies to place.
    pub zombie_count: usize,
    /// Number of obstacles to place.
    pub obstacle_count: usize,
    /// Multiplier applied to every zombie's speed class.
    pub zombie_speed_multiplier: f32,
    /// Multiplier applied to the player's speed.
    pub player_speed_factor: f32,
    /// Whether bystanders wait inside the sanctuary.
    pub bystanders: bool,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests that the world record a new phase.
    SetPhase {
        /// Phase to activate.
        phase: Phase,
    },
    /// Replaces every entity with a freshly generated stage.
    SpawnStage {
        /// Composition of the stage.
        layout: StageLayout,
    },
    /// Advances the simulation by one fixed tick.
    Tick {
        /// Movement requested by the player for this tick.
        intent: MoveIntent,
    },
    /// Turns the player into a zombie.
    ZombifyPlayer,
    /// Moves the player and the follow column one step toward the sanctuary.
    MarchStep,
    /// Stops the march once the column has arrived.
    HaltMarch,
    /// Transforms the bystanders waiting in the sanctuary.
    ZombifyBystanders,
    /// Removes every entity of the current stage.
    TearDownStage,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the world entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Confirms that a stage was generated.
    StageSpawned {
        /// Stage that was spawned.
        stage: StageNumber,
        /// Number of zombies placed.
        zombie_count: usize,
        /// Number of obstacles placed.
        obstacle_count: usize,
    },
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// Reports that a zombie joined the follow column.
    ZombieCaptured {
        /// Zombie that was captured.
        zombie: ZombieId,
        /// Column slot assigned to the zombie.
        slot: FollowSlot,
    },
    /// Reports that the player turned into a zombie.
    PlayerZombified,
    /// Reports the outcome of a march step.
    MarchAdvanced {
        /// Whether the player and every captured zombie stand in the sanctuary.
        all_in_sanctuary: bool,
    },
    /// Confirms that the march stopped.
    MarchHalted,
    /// Reports that the bystanders transformed.
    BystandersZombified,
    /// Confirms that every stage entity was removed.
    StageTornDown,
}

/// Read-only view of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current position.
    pub position: Vec2,
    /// Direction the player faces.
    pub facing: Facing,
    /// Whether the player has turned.
    pub zombified: bool,
}

/// Read-only view of a single zombie.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieSnapshot {
    /// Identifier of the zombie.
    pub id: ZombieId,
    /// Current position.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Direction the zombie faces.
    pub facing: Facing,
    /// Behavioural state.
    pub state: ZombieState,
    /// Column slot when captured.
    pub slot: Option<FollowSlot>,
    /// Speed class multiplied by the loop multiplier.
    pub speed_factor: f32,
}

/// Collection of zombie snapshots ordered by identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZombieView {
    snapshots: Vec<ZombieSnapshot>,
}

impl ZombieView {
    /// Creates a view from unsorted snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ZombieSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterates over the snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ZombieSnapshot> {
        self.snapshots.iter()
    }

    /// Number of zombies in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no zombies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Read-only view of a bystander waiting in the sanctuary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BystanderSnapshot {
    /// Fixed position inside the sanctuary.
    pub position: Vec2,
    /// Direction the bystander faces.
    pub facing: Facing,
    /// Whether the bystander has transformed.
    pub zombified: bool,
}

/// Number of zombies captured out of the stage total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CaptureProgress {
    /// Zombies in the follow column.
    pub captured: usize,
    /// Zombies spawned for the stage.
    pub total: usize,
}

impl CaptureProgress {
    /// Reports whether every zombie of a non-empty stage was captured.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.total > 0 && self.captured == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_intent_clamps_components() {
        let intent = MoveIntent::new(3.0, -7.5);
        assert_eq!(intent.vector(), Vec2::new(1.0, -1.0));
        assert_eq!(MoveIntent::new(f32::NAN, 0.5).vector(), Vec2::new(0.0, 0.5));
    }

    #[test]
    fn facing_follows_displacement_beyond_threshold() {
        assert_eq!(Facing::from_dx(0.5, 0.1, Facing::Left), Facing::Right);
        assert_eq!(Facing::from_dx(-0.5, 0.1, Facing::Right), Facing::Left);
        assert_eq!(Facing::from_dx(0.05, 0.1, Facing::Left), Facing::Left);
    }

    #[test]
    fn stage_after_playable_range_is_final() {
        assert!(!StageNumber::new(5).is_final(5));
        assert!(StageNumber::new(6).is_final(5));
    }

    #[test]
    fn zombie_view_sorts_by_identifier() {
        let snapshot = |id| ZombieSnapshot {
            id: ZombieId::new(id),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            state: ZombieState::Wander,
            slot: None,
            speed_factor: 1.0,
        };
        let view = ZombieView::from_snapshots(vec![snapshot(3), snapshot(1), snapshot(2)]);
        let ids: Vec<u32> = view.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn empty_stage_is_never_complete() {
        assert!(!CaptureProgress::default().is_complete());
        assert!(CaptureProgress {
            captured: 4,
            total: 4
        }
        .is_complete());
    }

    #[test]
    fn only_playing_accepts_input() {
        assert!(Phase::Playing.accepts_input());
        assert!(!Phase::GoToSanctuary.accepts_input());
        assert!(Phase::TimeUp.simulates_entities());
        assert!(!Phase::Ending.simulates_entities());
    }
}
