#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Sanctuary.

mod capture;
mod player;
mod spawn;
mod zombie;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sanctuary_core::{
    Arena, Command, Event, MoveIntent, Phase, Rect, StageLayout, StageNumber, Tuning,
};

use crate::{
    capture::CaptureQueue,
    player::{Bystander, Player},
    zombie::{Surroundings, Zombie},
};

/// Represents the authoritative Sanctuary world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    arena: Arena,
    rng: ChaCha8Rng,
    phase: Phase,
    stage: Option<StageNumber>,
    player: Option<Player>,
    zombies: Vec<Zombie>,
    obstacles: Vec<Rect>,
    bystanders: Vec<Bystander>,
    captures: CaptureQueue,
    tick_index: u64,
}

impl World {
    /// Creates an empty world whose procedural generation is driven by `seed`.
    #[must_use]
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            arena: tuning.arena(),
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: Phase::Title,
            stage: None,
            player: None,
            zombies: Vec::new(),
            obstacles: Vec::new(),
            bystanders: Vec::new(),
            captures: CaptureQueue::default(),
            tick_index: 0,
        }
    }

    fn spawn_stage(&mut self, layout: &StageLayout) {
        let population = spawn::populate(layout, &self.tuning, &mut self.rng);
        self.stage = Some(layout.stage);
        self.obstacles = population.obstacles;
        self.player = Some(population.player);
        self.zombies = population.zombies;
        self.bystanders = population.bystanders;
        self.captures.clear();
    }

    fn tear_down(&mut self) {
        self.stage = None;
        self.player = None;
        self.zombies.clear();
        self.obstacles.clear();
        self.bystanders.clear();
        self.captures.clear();
    }

    fn advance_entities(&mut self, intent: MoveIntent, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.integrate(
            intent,
            self.phase.accepts_input(),
            &self.obstacles,
            &self.arena,
            &self.tuning.player,
        );

        let surroundings = Surroundings {
            player,
            player_radius: self.tuning.player.radius,
            obstacles: &self.obstacles,
            arena: &self.arena,
            tuning: &self.tuning.zombie,
        };
        for zombie in self.zombies.iter_mut() {
            if zombie.update(&surroundings, &mut self.rng) {
                let slot = self.captures.on_capture(zombie.id());
                zombie.assign_slot(slot);
                out_events.push(Event::ZombieCaptured {
                    zombie: zombie.id(),
                    slot,
                });
            }
        }
    }

    fn march_step(&mut self, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let target_x = self.arena.march_target_x();
        let speed = self.tuning.player.speed
            * self.tuning.player.march_speed_multiplier
            * player.speed_factor();

        player.march_toward(target_x, speed);
        player.collapse_trail();

        for id in self.captures.iter() {
            if let Some(zombie) = self.zombies.iter_mut().find(|zombie| zombie.id() == id) {
                zombie.march_toward(target_x, speed);
            }
        }

        out_events.push(Event::MarchAdvanced {
            all_in_sanctuary: self.all_in_sanctuary(),
        });
    }

    fn all_in_sanctuary(&self) -> bool {
        let boundary = self.arena.sanctuary_boundary();
        let Some(player) = self.player.as_ref() else {
            return false;
        };
        player.position().x >= boundary
            && self
                .zombies
                .iter()
                .filter(|zombie| zombie.is_captured())
                .all(|zombie| zombie.position().x >= boundary)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetPhase { phase } => {
            world.phase = phase;
            out_events.push(Event::PhaseChanged { phase });
        }
        Command::SpawnStage { layout } => {
            world.spawn_stage(&layout);
            out_events.push(Event::StageSpawned {
                stage: layout.stage,
                zombie_count: world.zombies.len(),
                obstacle_count: world.obstacles.len(),
            });
        }
        Command::Tick { intent } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
            if world.phase.simulates_entities() {
                world.advance_entities(intent, out_events);
            }
        }
        Command::ZombifyPlayer => {
            if let Some(player) = world.player.as_mut() {
                if player.zombify() {
                    out_events.push(Event::PlayerZombified);
                }
            }
        }
        Command::MarchStep => world.march_step(out_events),
        Command::HaltMarch => out_events.push(Event::MarchHalted),
        Command::ZombifyBystanders => {
            world.bystanders.iter_mut().for_each(Bystander::zombify);
            out_events.push(Event::BystandersZombified);
        }
        Command::TearDownStage => {
            world.tear_down();
            out_events.push(Event::StageTornDown);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use sanctuary_core::{
        Arena, BystanderSnapshot, CaptureProgress, Phase, PlayerSnapshot, Rect, StageNumber,
        Tuning, ZombieId, ZombieView,
    };

    use super::World;

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Phase most recently recorded by the world.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Stage currently populating the world, if any.
    #[must_use]
    pub fn stage(world: &World) -> Option<StageNumber> {
        world.stage
    }

    /// Snapshot of the player when a stage is active.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world.player.as_ref().map(|player| player.snapshot())
    }

    /// Captures a read-only view of every zombie ordered by identifier.
    #[must_use]
    pub fn zombie_view(world: &World) -> ZombieView {
        ZombieView::from_snapshots(world.zombies.iter().map(|zombie| zombie.snapshot()).collect())
    }

    /// Obstacles placed on the current stage.
    #[must_use]
    pub fn obstacles(world: &World) -> &[Rect] {
        &world.obstacles
    }

    /// Snapshots of the bystanders waiting in the sanctuary.
    #[must_use]
    pub fn bystanders(world: &World) -> Vec<BystanderSnapshot> {
        world
            .bystanders
            .iter()
            .map(|bystander| bystander.snapshot())
            .collect()
    }

    /// Identifiers of captured zombies in column order.
    #[must_use]
    pub fn capture_order(world: &World) -> Vec<ZombieId> {
        world.captures.iter().collect()
    }

    /// Number of captured zombies out of the stage total.
    #[must_use]
    pub fn capture_progress(world: &World) -> CaptureProgress {
        CaptureProgress {
            captured: world.captures.len(),
            total: world.zombies.len(),
        }
    }

    /// Playfield dimensions.
    #[must_use]
    pub fn arena(world: &World) -> Arena {
        world.arena
    }

    /// Number of ticks processed since creation.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether the player and the whole column stand in the sanctuary.
    #[must_use]
    pub fn all_in_sanctuary(world: &World) -> bool {
        world.all_in_sanctuary()
    }
}
