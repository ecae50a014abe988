#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stage controller driving the screen flow, stage timers and time carryover.
//!
//! The controller is a pure system: it consumes the events the world emits
//! each tick together with the edge-triggered confirm signal, and answers with
//! commands. Every timer is measured in frames derived from
//! [`Event::TimeAdvanced`], so identical inputs always replay identically.

mod fade;
mod schedule;

pub use fade::Fade;
pub use schedule::{loop_time_cap, stage_parameters};

use sanctuary_core::{
    tuning::{StageTuning, TimingTuning},
    Command, Event, Phase, StageNumber, Tuning,
};

const SCREEN_FADE_SPEED: f32 = 0.06;
const STAGE_FADE_IN_SPEED: f32 = 0.08;
const SANCTUARY_FADE_OUT_SPEED: f32 = 0.01;
const CREDITS_FADE_SPEED: f32 = 0.015;

/// Configuration parameters required to construct the stage controller.
#[derive(Clone, Debug)]
pub struct Config {
    stage: StageTuning,
    timing: TimingTuning,
    tick_rate: u32,
    arena_height: f32,
}

impl Config {
    /// Creates a configuration from explicit tuning sections.
    #[must_use]
    pub const fn new(
        stage: StageTuning,
        timing: TimingTuning,
        tick_rate: u32,
        arena_height: f32,
    ) -> Self {
        Self {
            stage,
            timing,
            tick_rate,
            arena_height,
        }
    }

    /// Extracts the sections the controller needs from a complete tuning.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.stage.clone(),
            tuning.timing.clone(),
            tuning.tick_rate,
            tuning.arena.height,
        )
    }
}

/// Work scheduled to run once the current fade-out covers the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FadeOutThen {
    EnterTutorial,
    StartRun,
    ReturnToTitle,
    LeaveSanctuary,
    RestartRun,
}

/// Pure system that owns the phase machine and every stage timer.
#[derive(Debug)]
pub struct StageFlow {
    config: Config,
    phase: Phase,
    fade: Fade,
    pending: Option<FadeOutThen>,
    frame: u64,
    stage: u32,
    loop_level: u32,
    stage_start_frame: u64,
    stage_time_limit: f32,
    time_left: f32,
    time_remaining_next_stage: f32,
    run_start_frame: u64,
    captured: usize,
    total: usize,
    hold_start_frame: u64,
    ending_timer: u32,
    credits_y: f32,
    total_clear_time: f32,
    last_stage_remaining_time: f32,
}

impl StageFlow {
    /// Creates a controller waiting on the title screen.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let base_time = config.timing.base_time_limit;
        let credits_y = config.arena_height;
        Self {
            config,
            phase: Phase::Title,
            fade: Fade::default(),
            pending: None,
            frame: 0,
            stage: 0,
            loop_level: 0,
            stage_start_frame: 0,
            stage_time_limit: base_time,
            time_left: base_time,
            time_remaining_next_stage: base_time,
            run_start_frame: 0,
            captured: 0,
            total: 0,
            hold_start_frame: 0,
            ending_timer: 0,
            credits_y,
            total_clear_time: 0.0,
            last_stage_remaining_time: 0.0,
        }
    }

    /// Consumes a batch of world events and emits the resulting commands.
    ///
    /// Transitions are evaluated once for every [`Event::TimeAdvanced`] in the
    /// batch; other events only update bookkeeping.
    pub fn handle(&mut self, events: &[Event], confirm: bool, out: &mut Vec<Command>) {
        let mut arrived = false;
        let mut ticks = Vec::new();

        for event in events {
            match event {
                Event::TimeAdvanced { tick } => ticks.push(*tick),
                Event::StageSpawned { zombie_count, .. } => {
                    self.total = *zombie_count;
                    self.captured = 0;
                }
                Event::ZombieCaptured { .. } => {
                    self.captured = self.captured.saturating_add(1);
                }
                Event::MarchAdvanced { all_in_sanctuary } => arrived |= *all_in_sanctuary,
                _ => {}
            }
        }

        for tick in ticks {
            self.frame = tick;
            self.fade.update();
            self.evaluate(confirm, arrived, out);
        }
    }

    fn evaluate(&mut self, confirm: bool, arrived: bool, out: &mut Vec<Command>) {
        match self.phase {
            Phase::Title => self.on_title(confirm, out),
            Phase::Tutorial => self.on_tutorial(confirm, out),
            Phase::Playing => self.on_playing(out),
            Phase::TimeUp => self.on_time_up(out),
            Phase::GoToSanctuary => self.on_go_to_sanctuary(arrived, out),
            Phase::Ending => self.on_ending(out),
            Phase::CreditsRoll => self.on_credits(out),
        }
    }

    fn on_title(&mut self, confirm: bool, out: &mut Vec<Command>) {
        match self.pending {
            None if confirm => self.fade_out(FadeOutThen::EnterTutorial, SCREEN_FADE_SPEED),
            Some(FadeOutThen::EnterTutorial) if self.fade.is_covered() => {
                self.pending = None;
                self.enter(Phase::Tutorial, out);
                self.fade.to(0.0, SCREEN_FADE_SPEED);
            }
            _ => {}
        }
    }

    fn on_tutorial(&mut self, confirm: bool, out: &mut Vec<Command>) {
        match self.pending {
            None if confirm => self.fade_out(FadeOutThen::StartRun, SCREEN_FADE_SPEED),
            Some(FadeOutThen::StartRun) if self.fade.is_covered() => {
                self.pending = None;
                self.time_remaining_next_stage = self.config.timing.base_time_limit;
                self.stage = 0;
                self.spawn_stage(out);
            }
            _ => {}
        }
    }

    fn on_playing(&mut self, out: &mut Vec<Command>) {
        let elapsed = self.seconds_since(self.stage_start_frame);
        self.time_left = (self.stage_time_limit - elapsed).max(0.0);

        if self.total > 0 && self.captured >= self.total {
            self.time_remaining_next_stage = self.time_left + self.config.timing.stage_clear_bonus;
            tracing::info!(
                stage = self.stage,
                carried = self.time_remaining_next_stage,
                "stage cleared"
            );
            self.enter(Phase::GoToSanctuary, out);
        } else if self.time_left <= 0.0 {
            tracing::info!(
                stage = self.stage,
                captured = self.captured,
                total = self.total,
                "time up"
            );
            out.push(Command::ZombifyPlayer);
            self.hold_start_frame = self.frame;
            self.enter(Phase::TimeUp, out);
        }
    }

    fn on_time_up(&mut self, out: &mut Vec<Command>) {
        match self.pending {
            None => {
                let held = self.frame.saturating_sub(self.hold_start_frame);
                if held > u64::from(self.config.timing.game_over_hold_frames) {
                    self.fade_out(FadeOutThen::ReturnToTitle, SCREEN_FADE_SPEED);
                }
            }
            Some(FadeOutThen::ReturnToTitle) if self.fade.is_covered() => {
                self.pending = None;
                self.stage = 0;
                self.time_remaining_next_stage = self.config.timing.base_time_limit;
                out.push(Command::TearDownStage);
                self.enter(Phase::Title, out);
                self.fade.to(0.0, SCREEN_FADE_SPEED);
            }
            _ => {}
        }
    }

    fn on_go_to_sanctuary(&mut self, arrived: bool, out: &mut Vec<Command>) {
        match self.pending {
            None if arrived => {
                out.push(Command::HaltMarch);
                self.fade_out(FadeOutThen::LeaveSanctuary, SANCTUARY_FADE_OUT_SPEED);
            }
            Some(FadeOutThen::LeaveSanctuary) if self.fade.is_covered() => {
                self.pending = None;
                if self.is_final_stage() {
                    self.start_ending(out);
                } else {
                    self.spawn_stage(out);
                }
            }
            _ => {}
        }
    }

    fn on_ending(&mut self, out: &mut Vec<Command>) {
        if self.ending_timer == 0 {
            self.fade.to(0.0, STAGE_FADE_IN_SPEED);
        }
        self.ending_timer = self.ending_timer.saturating_add(1);

        let transform = self.config.timing.transform_frames;
        if self.ending_timer == transform {
            out.push(Command::ZombifyBystanders);
        }
        if self.ending_timer > transform.saturating_add(self.config.timing.ending_hold_frames) {
            self.credits_y = self.config.arena_height;
            self.enter(Phase::CreditsRoll, out);
            self.fade.to(0.0, CREDITS_FADE_SPEED);
        }
    }

    fn on_credits(&mut self, out: &mut Vec<Command>) {
        self.credits_y -= self.config.timing.credits_speed;

        match self.pending {
            None => {
                let end = -self.config.timing.credits_height - self.config.timing.credits_tail;
                if self.credits_y < end {
                    self.fade_out(FadeOutThen::RestartRun, CREDITS_FADE_SPEED);
                }
            }
            Some(FadeOutThen::RestartRun) if self.fade.is_covered() => {
                self.pending = None;
                self.stage = 0;
                self.spawn_stage(out);
                self.fade.to(0.0, SCREEN_FADE_SPEED);
            }
            _ => {}
        }
    }

    fn spawn_stage(&mut self, out: &mut Vec<Command>) {
        self.stage += 1;
        if self.stage > self.config.stage.playable_stages + 1 {
            self.stage = 1;
        }
        if self.stage == 1 {
            self.run_start_frame = self.frame;
        }

        let stage = StageNumber::new(self.stage);
        let carried = loop_time_cap(self.loop_level, &self.config.stage)
            .map_or(self.time_remaining_next_stage, |cap| {
                self.time_remaining_next_stage.min(cap)
            });
        self.stage_time_limit = if self.is_final_stage() {
            self.config.timing.final_time_floor.max(carried)
        } else {
            carried
        };
        self.time_left = self.stage_time_limit;

        let layout = stage_parameters(stage, self.loop_level, &self.config.stage);
        self.total = layout.zombie_count;
        self.captured = 0;
        tracing::info!(
            stage = self.stage,
            loop_level = self.loop_level,
            zombies = layout.zombie_count,
            time_limit = self.stage_time_limit,
            "spawning stage"
        );

        out.push(Command::SpawnStage { layout });
        self.stage_start_frame = self.frame;
        self.enter(Phase::Playing, out);
        self.fade.to(0.0, STAGE_FADE_IN_SPEED);
    }

    fn start_ending(&mut self, out: &mut Vec<Command>) {
        self.total_clear_time = self.seconds_since(self.run_start_frame);
        self.last_stage_remaining_time = self.time_remaining_next_stage;
        self.time_remaining_next_stage += self.config.timing.final_clear_bonus;
        self.loop_level = self.loop_level.saturating_add(1);
        self.ending_timer = 0;
        tracing::info!(
            clear_time = self.total_clear_time,
            loop_level = self.loop_level,
            "final stage cleared"
        );
        self.enter(Phase::Ending, out);
    }

    fn enter(&mut self, phase: Phase, out: &mut Vec<Command>) {
        tracing::debug!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
        out.push(Command::SetPhase { phase });
    }

    fn fade_out(&mut self, then: FadeOutThen, speed: f32) {
        self.pending = Some(then);
        self.fade.to(1.0, speed);
    }

    fn seconds_since(&self, start: u64) -> f32 {
        if self.config.tick_rate == 0 {
            return 0.0;
        }
        self.frame.saturating_sub(start) as f32 / self.config.tick_rate as f32
    }

    /// Phase the controller is currently in.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Stage being played, or `None` before the first spawn of a run.
    #[must_use]
    pub const fn stage(&self) -> Option<StageNumber> {
        if self.stage == 0 {
            None
        } else {
            Some(StageNumber::new(self.stage))
        }
    }

    /// Reports whether the current stage is the final one.
    #[must_use]
    pub const fn is_final_stage(&self) -> bool {
        StageNumber::new(self.stage).is_final(self.config.stage.playable_stages)
    }

    /// Number of times the final stage has been cleared.
    #[must_use]
    pub const fn loop_level(&self) -> u32 {
        self.loop_level
    }

    /// Seconds left on the current stage clock.
    #[must_use]
    pub const fn time_left(&self) -> f32 {
        self.time_left
    }

    /// Time budget of the current stage in seconds.
    #[must_use]
    pub const fn stage_time_limit(&self) -> f32 {
        self.stage_time_limit
    }

    /// Seconds carried into the next stage.
    #[must_use]
    pub const fn carried_time(&self) -> f32 {
        self.time_remaining_next_stage
    }

    /// Current screen fade opacity.
    #[must_use]
    pub const fn fade_alpha(&self) -> f32 {
        self.fade.alpha()
    }

    /// Run duration recorded when the final stage was cleared.
    #[must_use]
    pub const fn total_clear_time(&self) -> f32 {
        self.total_clear_time
    }

    /// Time that remained when the final stage was cleared.
    #[must_use]
    pub const fn last_stage_remaining_time(&self) -> f32 {
        self.last_stage_remaining_time
    }

    /// Vertical offset of the credits content.
    #[must_use]
    pub const fn credits_offset(&self) -> f32 {
        self.credits_y
    }

    /// Reports whether the credits have scrolled far enough to reveal the score.
    #[must_use]
    pub fn final_score_visible(&self) -> bool {
        self.phase == Phase::CreditsRoll
            && self.credits_y
                < -self.config.timing.credits_height + self.config.timing.score_reveal_offset
    }
}
