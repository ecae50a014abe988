#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Sanctuary adapters.
//!
//! Scenes are plain data assembled by adapters from world queries and the
//! stage controller. Backends decide how to present them.

use anyhow::Result as AnyResult;
use glam::Vec2;
use sanctuary_core::{Facing, Phase, Rect, StageNumber};
use std::{error::Error, fmt};

/// Seconds left below which the clock is drawn as a warning.
pub const LOW_TIME_THRESHOLD: f32 = 10.0;

/// Input snapshot gathered by adapters before stepping the session.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Requested movement direction; components are expected in -1.0..=1.0.
    pub movement: Vec2,
    /// Whether the adapter detected a confirm press on this frame.
    pub confirm: bool,
}

impl FrameInput {
    /// Creates a new frame input.
    #[must_use]
    pub const fn new(movement: Vec2, confirm: bool) -> Self {
        Self { movement, confirm }
    }

    /// Input that neither moves nor confirms.
    #[must_use]
    pub const fn idle() -> Self {
        Self::new(Vec2::ZERO, false)
    }
}

/// Kind of sprite an entity is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The player-controlled survivor.
    Player,
    /// A wandering, following or captured zombie.
    Zombie,
    /// A survivor waiting inside the sanctuary.
    Bystander,
}

/// Visual variant applied on top of the entity kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualState {
    /// A living survivor.
    Human,
    /// A survivor who has turned.
    Zombified,
    /// A zombie drifting aimlessly.
    Wandering,
    /// A zombie chasing the player.
    Following,
    /// A zombie walking in the follow column.
    Captured,
}

/// Entity drawn in the play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEntity {
    /// Sprite family of the entity.
    pub kind: EntityKind,
    /// Centre of the entity in arena units.
    pub position: Vec2,
    /// Horizontal direction the sprite faces.
    pub facing: Facing,
    /// Visual variant of the sprite.
    pub state: VisualState,
}

impl SceneEntity {
    /// Creates a new entity descriptor.
    #[must_use]
    pub const fn new(kind: EntityKind, position: Vec2, facing: Facing, state: VisualState) -> Self {
        Self {
            kind,
            position,
            facing,
            state,
        }
    }
}

/// Heads-up display drawn in the UI band during a stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Stage being played.
    pub stage: StageNumber,
    /// Number of regular stages before the final one.
    pub playable_stages: u32,
    /// Zombies currently in the follow column.
    pub captured: usize,
    /// Zombies spawned for the stage.
    pub total: usize,
    /// Seconds left on the stage clock.
    pub time_left: f32,
    /// Whether the clock already ran out.
    pub timed_out: bool,
    /// Number of completed loops.
    pub loop_level: u32,
}

impl Hud {
    /// Label naming the current stage.
    #[must_use]
    pub fn stage_label(&self) -> String {
        if self.stage.is_final(self.playable_stages) {
            String::from("Stage: FINAL")
        } else {
            format!("Stage: {}/{}", self.stage.get(), self.playable_stages)
        }
    }

    /// Label with the capture count.
    #[must_use]
    pub fn captured_label(&self) -> String {
        format!("Captured: {}/{}", self.captured, self.total)
    }

    /// Label with the remaining time rounded to a tenth of a second.
    #[must_use]
    pub fn time_label(&self) -> String {
        format!("Time: {:.1}s", self.time_left.max(0.0))
    }

    /// Reports whether the clock should be drawn in the warning colour.
    #[must_use]
    pub fn low_time(&self) -> bool {
        self.timed_out || self.time_left < LOW_TIME_THRESHOLD
    }
}

/// Centred message overlaid on the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prompt {
    /// The stage is clear and the column should walk to safety.
    GoToSanctuary,
    /// The clock ran out.
    TimeUp,
    /// A screen waiting for the confirm button.
    PressConfirm,
}

impl Prompt {
    /// Lines of text shown for the prompt, top to bottom.
    #[must_use]
    pub const fn lines(self) -> &'static [&'static str] {
        match self {
            Self::GoToSanctuary => &["GO TO SANCTUARY!"],
            Self::TimeUp => &["TIME UP!", "GAME OVER"],
            Self::PressConfirm => &["- PRESS ENTER TO BEGIN -"],
        }
    }

    /// Prompt shown by default for a phase.
    #[must_use]
    pub const fn for_phase(phase: Phase) -> Option<Self> {
        match phase {
            Phase::Title | Phase::Tutorial => Some(Self::PressConfirm),
            Phase::GoToSanctuary => Some(Self::GoToSanctuary),
            Phase::TimeUp => Some(Self::TimeUp),
            Phase::Playing | Phase::Ending | Phase::CreditsRoll => None,
        }
    }
}

/// Scene description combining entities, obstacles and overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Entities in painter's order, back to front.
    pub entities: Vec<SceneEntity>,
    /// Obstacles placed in the play area.
    pub obstacles: Vec<Rect>,
    /// Stage information, present while a stage is loaded.
    pub hud: Option<Hud>,
    /// Centred message, if any.
    pub prompt: Option<Prompt>,
    /// Phase the session is in.
    pub phase: Phase,
    /// Opacity of the full-screen fade overlay.
    pub fade_alpha: f32,
}

impl Scene {
    /// Creates a new scene, ordering entities by their vertical position.
    ///
    /// Returns an error when the fade opacity lies outside `0.0..=1.0`.
    pub fn new(
        mut entities: Vec<SceneEntity>,
        obstacles: Vec<Rect>,
        hud: Option<Hud>,
        phase: Phase,
        fade_alpha: f32,
    ) -> Result<Self, RenderingError> {
        if !(0.0..=1.0).contains(&fade_alpha) {
            return Err(RenderingError::InvalidFadeAlpha { fade_alpha });
        }
        entities.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));

        Ok(Self {
            entities,
            obstacles,
            hud,
            prompt: Prompt::for_phase(phase),
            phase,
            fade_alpha,
        })
    }

    /// Number of entities drawn with the given kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities
            .iter()
            .filter(|entity| entity.kind == kind)
            .count()
    }
}

/// Rendering backend capable of presenting Sanctuary scenes.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Headless backend that reports phase and prompt changes through `tracing`.
#[derive(Debug, Default)]
pub struct LogBackend {
    frames: u64,
    phase: Option<Phase>,
    prompt: Option<Prompt>,
    announcements: u64,
}

impl LogBackend {
    /// Creates a backend that has not presented anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of prompt changes reported so far.
    #[must_use]
    pub const fn announcements(&self) -> u64 {
        self.announcements
    }
}

impl RenderingBackend for LogBackend {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.frames += 1;

        if self.phase != Some(scene.phase) {
            tracing::debug!(frame = self.frames, phase = ?scene.phase, "phase presented");
            self.phase = Some(scene.phase);
        }

        if self.prompt != scene.prompt {
            if let Some(prompt) = scene.prompt {
                tracing::info!(frame = self.frames, text = %prompt.lines().join(" "), "prompt");
            }
            self.prompt = scene.prompt;
            self.announcements += 1;
        }

        if let Some(hud) = scene.hud.filter(|hud| hud.low_time()) {
            tracing::trace!(time_left = hud.time_left, "low time");
        }

        Ok(())
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The fade overlay opacity must stay within `0.0..=1.0`.
    InvalidFadeAlpha {
        /// Provided opacity that failed validation.
        fade_alpha: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFadeAlpha { fade_alpha } => {
                write!(f, "fade alpha must lie in 0.0..=1.0 (received {fade_alpha})")
            }
        }
    }
}

impl Error for RenderingError {}
