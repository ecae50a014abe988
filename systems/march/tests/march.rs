use glam::Vec2;
use sanctuary_core::{
    Command, Event, MoveIntent, Phase, StageLayout, StageNumber, Tuning, ZombieState,
};
use sanctuary_system_march::March;
use sanctuary_world::{self as world, query, World};

fn layout() -> StageLayout {
    StageLayout {
        stage: StageNumber::new(1),
        zombie_count: 4,
        obstacle_count: 0,
        zombie_speed_multiplier: 1.0,
        player_speed_factor: 1.0,
        bystanders: false,
    }
}

fn apply(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn steer(world: &mut World, toward: Vec2) {
    let player = query::player(world).expect("player").position;
    let delta = toward - player;
    let _ = apply(
        world,
        vec![Command::Tick {
            intent: MoveIntent::new(delta.x, delta.y),
        }],
    );
}

fn gather_column(world: &mut World, wanted: usize) {
    for _ in 0..5_000 {
        if query::capture_progress(world).captured >= wanted {
            break;
        }
        let player = query::player(world).expect("player").position;
        let nearest = query::zombie_view(world)
            .iter()
            .filter(|zombie| zombie.state != ZombieState::Captured)
            .map(|zombie| zombie.position)
            .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)))
            .unwrap_or(player);
        steer(world, nearest);
    }
    assert!(query::capture_progress(world).captured >= wanted);

    for _ in 0..120 {
        steer(world, Vec2::new(60.0, 70.0));
    }
}

fn captured_xs(world: &World) -> Vec<f32> {
    query::zombie_view(world)
        .iter()
        .filter(|zombie| zombie.state == ZombieState::Captured)
        .map(|zombie| zombie.position.x)
        .collect()
}

#[test]
fn column_walks_into_the_sanctuary_and_halts() {
    let mut world = World::new(Tuning::default(), 11);
    let mut march = March::new();
    let arena = query::arena(&world);
    let (boundary, target_x) = (arena.sanctuary_boundary(), arena.march_target_x());

    let _ = apply(
        &mut world,
        vec![
            Command::SpawnStage { layout: layout() },
            Command::SetPhase {
                phase: Phase::Playing,
            },
        ],
    );
    gather_column(&mut world, 2);
    let column_size = captured_xs(&world).len();
    assert!(column_size >= 2);

    let events = apply(
        &mut world,
        vec![Command::SetPhase {
            phase: Phase::GoToSanctuary,
        }],
    );
    let mut commands = Vec::new();
    march.handle(&events, &mut commands);
    assert!(march.is_marching());
    assert!(commands.is_empty());

    let mut steps = 0;
    let mut previous_x = query::player(&world).expect("player").position.x;
    loop {
        let events = apply(
            &mut world,
            vec![Command::Tick {
                intent: MoveIntent::idle(),
            }],
        );
        let mut commands = Vec::new();
        march.handle(&events, &mut commands);
        assert_eq!(commands, vec![Command::MarchStep]);
        let advanced = apply(&mut world, commands);
        steps += 1;

        let x = query::player(&world).expect("player").position.x;
        assert!(x >= previous_x);
        assert!(x <= target_x);
        previous_x = x;

        let column = captured_xs(&world);
        assert!(column.len() >= column_size);
        assert!(column.iter().all(|&zombie_x| zombie_x <= target_x));

        let everyone_in =
            x >= boundary && column.iter().all(|&zombie_x| zombie_x >= boundary);
        let arrived = advanced.contains(&Event::MarchAdvanced {
            all_in_sanctuary: true,
        });
        assert_eq!(arrived, everyone_in);
        if arrived {
            break;
        }
        assert!(steps < 1_000, "column never reached the sanctuary");
    }

    let halted = apply(&mut world, vec![Command::HaltMarch]);
    let mut commands = Vec::new();
    march.handle(&halted, &mut commands);
    assert!(!march.is_marching());

    let events = apply(
        &mut world,
        vec![Command::Tick {
            intent: MoveIntent::idle(),
        }],
    );
    march.handle(&events, &mut commands);
    assert!(commands.is_empty());
}
