use sanctuary_core::{
    Command, Event, FollowSlot, Phase, StageLayout, StageNumber, Tuning, ZombieId,
};
use sanctuary_system_stage_flow::{Config, StageFlow};
use sanctuary_world::{self as world, query, World};

const FRAME_LIMIT: u64 = 10_000;

struct Driver {
    flow: StageFlow,
    frame: u64,
    log: Vec<Command>,
}

impl Driver {
    fn new() -> Self {
        Self {
            flow: StageFlow::new(Config::from_tuning(&Tuning::default())),
            frame: 0,
            log: Vec::new(),
        }
    }

    fn tick_with(&mut self, extra: Vec<Event>, confirm: bool) -> Vec<Command> {
        self.frame += 1;
        let mut events = vec![Event::TimeAdvanced { tick: self.frame }];
        events.extend(extra);
        let mut out = Vec::new();
        self.flow.handle(&events, confirm, &mut out);
        self.log.extend(out.iter().cloned());
        out
    }

    fn tick(&mut self) -> Vec<Command> {
        self.tick_with(Vec::new(), false)
    }

    fn run_until(&mut self, phase: Phase) -> Vec<Command> {
        let mut emitted = Vec::new();
        let start = self.frame;
        while self.flow.phase() != phase {
            assert!(
                self.frame - start < FRAME_LIMIT,
                "never reached {phase:?}, stuck in {:?}",
                self.flow.phase()
            );
            emitted.extend(self.tick());
        }
        emitted
    }

    fn start_run(&mut self) -> StageLayout {
        let _ = self.tick_with(Vec::new(), true);
        let _ = self.run_until(Phase::Tutorial);
        let _ = self.tick_with(Vec::new(), true);
        last_layout(&self.run_until(Phase::Playing))
    }

    fn capture_all(&mut self, count: usize) -> Vec<Command> {
        self.tick_with(captures(0, count), false)
    }

    fn arrive(&mut self) -> Vec<Command> {
        self.tick_with(
            vec![Event::MarchAdvanced {
                all_in_sanctuary: true,
            }],
            false,
        )
    }
}

fn captures(first: usize, count: usize) -> Vec<Event> {
    (first..first + count)
        .map(|index| Event::ZombieCaptured {
            zombie: ZombieId::new(index as u32),
            slot: FollowSlot::new(index),
        })
        .collect()
}

fn last_layout(commands: &[Command]) -> StageLayout {
    commands
        .iter()
        .rev()
        .find_map(|command| match command {
            Command::SpawnStage { layout } => Some(*layout),
            _ => None,
        })
        .expect("stage spawned")
}

#[test]
fn tutorial_confirm_spawns_stage_one_with_base_budget() {
    let mut driver = Driver::new();
    let layout = driver.start_run();

    assert_eq!(layout.stage, StageNumber::new(1));
    assert_eq!(layout.zombie_count, 6);
    assert_eq!(driver.flow.stage_time_limit(), 45.0);
    assert_eq!(driver.flow.loop_level(), 0);

    let tail = &driver.log[driver.log.len() - 2..];
    assert_eq!(
        tail,
        &[
            Command::SpawnStage { layout },
            Command::SetPhase {
                phase: Phase::Playing
            }
        ]
    );
}

#[test]
fn clearing_with_thirty_seconds_left_carries_thirty() {
    let mut driver = Driver::new();
    let layout = driver.start_run();

    for _ in 0..899 {
        let _ = driver.tick();
    }
    let emitted = driver.capture_all(layout.zombie_count);

    assert_eq!(
        emitted,
        vec![Command::SetPhase {
            phase: Phase::GoToSanctuary
        }]
    );
    assert_eq!(driver.flow.carried_time(), 30.0);
}

#[test]
fn carried_time_becomes_next_stage_budget() {
    let mut driver = Driver::new();
    let layout = driver.start_run();

    for _ in 0..599 {
        let _ = driver.tick();
    }
    let _ = driver.capture_all(layout.zombie_count);
    let carried = driver.flow.carried_time();
    assert_eq!(carried, 35.0);

    assert_eq!(driver.arrive(), vec![Command::HaltMarch]);
    let emitted = driver.run_until(Phase::Playing);

    assert_eq!(last_layout(&emitted).stage, StageNumber::new(2));
    assert_eq!(driver.flow.stage_time_limit(), carried);
    assert_eq!(driver.flow.time_left(), carried);
}

#[test]
fn time_left_never_increases_or_goes_negative() {
    let mut driver = Driver::new();
    let _ = driver.start_run();

    let mut previous = driver.flow.time_left();
    while driver.flow.phase() == Phase::Playing {
        let _ = driver.tick();
        let now = driver.flow.time_left();
        assert!(now >= 0.0);
        assert!(now <= previous);
        previous = now;
    }
    assert_eq!(driver.flow.phase(), Phase::TimeUp);
    assert_eq!(previous, 0.0);
}

#[test]
fn time_up_zombifies_once_then_returns_to_title() {
    let mut driver = Driver::new();
    let layout = driver.start_run();
    let _ = driver.tick_with(captures(0, layout.zombie_count - 2), false);

    let _ = driver.run_until(Phase::TimeUp);
    let time_up_frame = driver.frame;
    let emitted = driver.run_until(Phase::Title);

    let zombify_count = driver
        .log
        .iter()
        .filter(|command| **command == Command::ZombifyPlayer)
        .count();
    assert_eq!(zombify_count, 1);
    assert!(driver.frame - time_up_frame >= 120);
    assert_eq!(
        emitted,
        vec![
            Command::TearDownStage,
            Command::SetPhase {
                phase: Phase::Title
            }
        ]
    );
    assert_eq!(driver.flow.stage(), None);
    assert_eq!(driver.flow.carried_time(), 45.0);
}

#[test]
fn last_capture_on_expiring_tick_counts_as_clear() {
    let mut driver = Driver::new();
    let layout = driver.start_run();

    for _ in 0..2699 {
        let _ = driver.tick();
    }
    assert_eq!(driver.flow.phase(), Phase::Playing);
    let emitted = driver.capture_all(layout.zombie_count);

    assert_eq!(
        emitted,
        vec![Command::SetPhase {
            phase: Phase::GoToSanctuary
        }]
    );
    assert_eq!(driver.flow.carried_time(), 0.0);
}

#[test]
fn full_loop_raises_level_and_speeds_up_stage_one() {
    let mut driver = Driver::new();
    let first_layout = driver.start_run();
    let mut layout = first_layout;

    for _ in 0..5 {
        let _ = driver.capture_all(layout.zombie_count);
        let _ = driver.arrive();
        layout = last_layout(&driver.run_until(Phase::Playing));
    }
    assert_eq!(layout.stage, StageNumber::new(6));
    assert!(layout.bystanders);
    assert_eq!(layout.zombie_count, 30);
    assert!(driver.flow.is_final_stage());

    let _ = driver.capture_all(layout.zombie_count);
    let carried_before_bonus = driver.flow.carried_time();
    let _ = driver.arrive();
    let _ = driver.run_until(Phase::Ending);
    assert_eq!(driver.flow.loop_level(), 1);
    assert_eq!(driver.flow.carried_time(), carried_before_bonus + 10.0);
    assert_eq!(driver.flow.last_stage_remaining_time(), carried_before_bonus);

    let ending_start = driver.frame;
    let ending = driver.run_until(Phase::CreditsRoll);
    assert!(ending.contains(&Command::ZombifyBystanders));
    assert_eq!(driver.frame - ending_start, 271);

    assert!(!driver.flow.final_score_visible());
    let restart = driver.run_until(Phase::Playing);
    let looped = last_layout(&restart);

    assert_eq!(looped.stage, StageNumber::new(1));
    assert!(looped.zombie_speed_multiplier > first_layout.zombie_speed_multiplier);
    assert_eq!(driver.flow.stage_time_limit(), carried_before_bonus + 10.0);

    let speed_factors = |layout: StageLayout| {
        let mut world = World::new(Tuning::default(), 77);
        let mut events = Vec::new();
        world::apply(&mut world, Command::SpawnStage { layout }, &mut events);
        query::zombie_view(&world)
            .iter()
            .map(|zombie| zombie.speed_factor)
            .collect::<Vec<_>>()
    };
    let base = speed_factors(first_layout);
    let faster = speed_factors(looped);
    assert_eq!(base.len(), faster.len());
    for (slow, fast) in base.iter().zip(&faster) {
        assert!(fast > slow);
    }
}

#[test]
fn credits_reveal_score_before_fading_out() {
    let mut driver = Driver::new();
    let mut layout = driver.start_run();
    for _ in 0..6 {
        let _ = driver.capture_all(layout.zombie_count);
        let _ = driver.arrive();
        let commands = driver.run_until(if driver.flow.is_final_stage() {
            Phase::Ending
        } else {
            Phase::Playing
        });
        if let Some(next) = commands.iter().find_map(|command| match command {
            Command::SpawnStage { layout } => Some(*layout),
            _ => None,
        }) {
            layout = next;
        }
    }
    let _ = driver.run_until(Phase::CreditsRoll);

    let mut revealed_at = None;
    while driver.flow.phase() == Phase::CreditsRoll {
        let _ = driver.tick();
        if revealed_at.is_none() && driver.flow.final_score_visible() {
            revealed_at = Some(driver.flow.credits_offset());
        }
    }

    let revealed_at = revealed_at.expect("score revealed");
    assert!(revealed_at < -354.0);
    assert!(revealed_at > -360.0);
}
