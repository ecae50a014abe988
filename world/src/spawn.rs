//! Procedural stage generation.

use glam::Vec2;
use rand::Rng;
use sanctuary_core::{Arena, Rect, StageLayout, Tuning, ZombieId};

use crate::{
    player::{Bystander, Player},
    zombie::Zombie,
};

const OBSTACLE_WIDTH: (i32, i32) = (8, 22);
const OBSTACLE_HEIGHT: (i32, i32) = (6, 14);
const OBSTACLE_MARGIN: i32 = 6;
const PLAYER_RELOCATION_MARGIN: f32 = 4.0;

/// Every entity that makes up a freshly spawned stage.
#[derive(Debug)]
pub(crate) struct Population {
    pub(crate) obstacles: Vec<Rect>,
    pub(crate) player: Player,
    pub(crate) zombies: Vec<Zombie>,
    pub(crate) bystanders: Vec<Bystander>,
}

/// Generates obstacles, the player, zombies and bystanders for `layout`.
pub(crate) fn populate<R: Rng>(layout: &StageLayout, tuning: &Tuning, rng: &mut R) -> Population {
    let arena = tuning.arena();
    let obstacles = place_obstacles(layout.obstacle_count, &arena, rng);
    let spawn = player_spawn(&obstacles, &arena, tuning, rng);
    let player = Player::new(spawn, tuning.player.trail_length, layout.player_speed_factor);

    let zombies = (0..layout.zombie_count)
        .map(|index| {
            let id = ZombieId::new(index as u32);
            let position = zombie_position(spawn, &obstacles, &arena, tuning, rng);
            spawn_zombie(id, position, layout.zombie_speed_multiplier, tuning, rng)
        })
        .collect();

    let bystanders = if layout.bystanders {
        bystander_positions(&arena)
            .into_iter()
            .map(Bystander::new)
            .collect()
    } else {
        Vec::new()
    };

    Population {
        obstacles,
        player,
        zombies,
        bystanders,
    }
}

fn place_obstacles<R: Rng>(count: usize, arena: &Arena, rng: &mut R) -> Vec<Rect> {
    let width = arena.width() as i32;
    let height = arena.height() as i32;
    let sanctuary = arena.sanctuary_width() as i32;
    let ui = arena.ui_height() as i32;

    (0..count)
        .map(|_| {
            let w = integer_in(rng, OBSTACLE_WIDTH.0, OBSTACLE_WIDTH.1);
            let h = integer_in(rng, OBSTACLE_HEIGHT.0, OBSTACLE_HEIGHT.1);
            let x = integer_in(
                rng,
                OBSTACLE_MARGIN,
                width - sanctuary - w - OBSTACLE_MARGIN,
            );
            let y = integer_in(rng, ui + OBSTACLE_MARGIN, height - h - OBSTACLE_MARGIN);
            Rect::new(x as f32, y as f32, w as f32, h as f32)
        })
        .collect()
}

fn player_spawn<R: Rng>(obstacles: &[Rect], arena: &Arena, tuning: &Tuning, rng: &mut R) -> Vec2 {
    let radius = tuning.player.radius;
    let clearance = radius + tuning.player.spawn_clearance;
    let mut spawn = Vec2::from(tuning.player.spawn);

    let min_x = (radius + PLAYER_RELOCATION_MARGIN) as i32;
    let max_x = (arena.sanctuary_boundary() - radius - PLAYER_RELOCATION_MARGIN) as i32;
    let min_y = (arena.ui_height() + radius + PLAYER_RELOCATION_MARGIN) as i32;
    let max_y = (arena.height() - radius - PLAYER_RELOCATION_MARGIN) as i32;

    for _ in 0..tuning.player.spawn_attempts {
        if !overlaps_any(obstacles, spawn, clearance) {
            break;
        }
        spawn = Vec2::new(
            integer_in(rng, min_x, max_x) as f32,
            integer_in(rng, min_y, max_y) as f32,
        );
    }
    spawn
}

fn zombie_position<R: Rng>(
    player_spawn: Vec2,
    obstacles: &[Rect],
    arena: &Arena,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec2 {
    let zombie = &tuning.zombie;
    let max_x = (arena.sanctuary_boundary() - zombie.spawn_margin) as i32;
    let min_y = arena.ui_height() as i32;
    let max_y = arena.height() as i32 - 1;

    let mut candidate = player_spawn;
    for _ in 0..=zombie.spawn_attempts {
        candidate = Vec2::new(
            integer_in(rng, 0, max_x) as f32,
            integer_in(rng, min_y, max_y) as f32,
        );
        if candidate.distance(player_spawn) > zombie.spawn_min_player_distance
            && !overlaps_any(obstacles, candidate, zombie.radius)
        {
            break;
        }
    }
    candidate
}

fn spawn_zombie<R: Rng>(
    id: ZombieId,
    position: Vec2,
    speed_multiplier: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> Zombie {
    let zombie = &tuning.zombie;
    let bound = zombie.initial_speed.abs();
    let velocity = Vec2::new(
        rng.gen_range(-bound..=bound),
        rng.gen_range(-bound..=bound),
    );
    let class = if zombie.speed_classes.is_empty() {
        1.0
    } else {
        zombie.speed_classes[rng.gen_range(0..zombie.speed_classes.len())]
    };
    Zombie::new(id, position, velocity, class * speed_multiplier)
}

/// Fixed bystander placement inside the sanctuary.
pub(crate) fn bystander_positions(arena: &Arena) -> [Vec2; 3] {
    let left = arena.sanctuary_boundary() + 8.0;
    let middle = arena.height() / 2.0;
    [
        Vec2::new(left, middle - 20.0),
        Vec2::new(left + 5.0, middle),
        Vec2::new(left, middle + 20.0),
    ]
}

fn overlaps_any(obstacles: &[Rect], center: Vec2, radius: f32) -> bool {
    obstacles
        .iter()
        .any(|obstacle| obstacle.collides_circle(center, radius))
}

/// Uniform integer in `[low, high]`; collapses to `low` when the range is empty.
fn integer_in<R: Rng>(rng: &mut R, low: i32, high: i32) -> i32 {
    if high <= low {
        low
    } else {
        rng.gen_range(low..=high)
    }
}
