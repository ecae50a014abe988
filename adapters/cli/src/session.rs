//! Headless session wiring the world to the march and stage flow systems.

use sanctuary_core::{Command, Event, MoveIntent, Phase, Tuning, ZombieState};
use sanctuary_rendering::{
    EntityKind, FrameInput, Hud, RenderingError, Scene, SceneEntity, VisualState,
};
use sanctuary_system_march::March;
use sanctuary_system_stage_flow::{Config, StageFlow};
use sanctuary_world::{self as world, query, World};
use tracing::info;

/// Outcome of a session reported when the run stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) phase: Phase,
    pub(crate) stage: u32,
    pub(crate) loop_level: u32,
    pub(crate) clears: u32,
    pub(crate) carried_time: f32,
    pub(crate) total_clear_time: f32,
}

/// Owns the world and the systems driving it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    flow: StageFlow,
    march: March,
    clears: u32,
}

impl Session {
    pub(crate) fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            flow: StageFlow::new(Config::from_tuning(&tuning)),
            world: World::new(tuning, seed),
            march: March::new(),
            clears: 0,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn phase(&self) -> Phase {
        self.flow.phase()
    }

    /// Stages cleared since the session started.
    pub(crate) fn clears(&self) -> u32 {
        self.clears
    }

    /// Runs one tick: the world advances, the march and the stage flow
    /// react, then follow-up commands are pumped until the world goes quiet.
    pub(crate) fn step(&mut self, input: FrameInput) {
        let intent = MoveIntent::new(input.movement.x, input.movement.y);
        let mut events = self.apply(vec![Command::Tick { intent }]);

        let mut commands = Vec::new();
        self.march.handle(&events, &mut commands);
        events.extend(self.apply(commands));

        let mut commands = Vec::new();
        self.flow.handle(&events, input.confirm, &mut commands);
        let mut pending = self.apply(commands);

        while !pending.is_empty() {
            let mut commands = Vec::new();
            self.march.handle(&pending, &mut commands);
            self.flow.handle(&pending, false, &mut commands);
            pending = self.apply(commands);
        }
    }

    fn apply(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        for event in &events {
            match event {
                Event::PhaseChanged { phase } => {
                    if *phase == Phase::GoToSanctuary {
                        self.clears += 1;
                    }
                    info!(
                        tick = query::tick_index(&self.world),
                        phase = ?phase,
                        "phase changed"
                    );
                }
                Event::StageSpawned {
                    stage,
                    zombie_count,
                    obstacle_count,
                } => info!(
                    stage = stage.get(),
                    zombies = zombie_count,
                    obstacles = obstacle_count,
                    "stage ready"
                ),
                _ => {}
            }
        }
        events
    }

    /// Assembles the scene for the current frame.
    pub(crate) fn scene(&self) -> Result<Scene, RenderingError> {
        let mut entities = Vec::new();

        if let Some(player) = query::player(&self.world) {
            entities.push(SceneEntity::new(
                EntityKind::Player,
                player.position,
                player.facing,
                survivor_state(player.zombified),
            ));
        }
        for zombie in query::zombie_view(&self.world).iter() {
            let state = match zombie.state {
                ZombieState::Wander => VisualState::Wandering,
                ZombieState::Follow => VisualState::Following,
                ZombieState::Captured => VisualState::Captured,
            };
            entities.push(SceneEntity::new(
                EntityKind::Zombie,
                zombie.position,
                zombie.facing,
                state,
            ));
        }
        for bystander in query::bystanders(&self.world) {
            entities.push(SceneEntity::new(
                EntityKind::Bystander,
                bystander.position,
                bystander.facing,
                survivor_state(bystander.zombified),
            ));
        }

        let phase = self.flow.phase();
        let hud = query::stage(&self.world)
            .filter(|_| phase.simulates_entities())
            .map(|stage| {
                let progress = query::capture_progress(&self.world);
                Hud {
                    stage,
                    playable_stages: query::tuning(&self.world).stage.playable_stages,
                    captured: progress.captured,
                    total: progress.total,
                    time_left: self.flow.time_left(),
                    timed_out: phase == Phase::TimeUp,
                    loop_level: self.flow.loop_level(),
                }
            });

        Scene::new(
            entities,
            query::obstacles(&self.world).to_vec(),
            hud,
            phase,
            self.flow.fade_alpha(),
        )
    }

    pub(crate) fn summary(&self) -> Summary {
        Summary {
            ticks: query::tick_index(&self.world),
            phase: self.flow.phase(),
            stage: self.flow.stage().map_or(0, |stage| stage.get()),
            loop_level: self.flow.loop_level(),
            clears: self.clears,
            carried_time: self.flow.carried_time(),
            total_clear_time: self.flow.total_clear_time(),
        }
    }
}

fn survivor_state(zombified: bool) -> VisualState {
    if zombified {
        VisualState::Zombified
    } else {
        VisualState::Human
    }
}
