//! Stage composition as a function of stage number and loop level.

use sanctuary_core::{tuning::StageTuning, StageLayout, StageNumber};

/// Derives the layout of `stage` for the given loop level.
#[must_use]
pub fn stage_parameters(stage: StageNumber, loop_level: u32, tuning: &StageTuning) -> StageLayout {
    let is_final = stage.is_final(tuning.playable_stages);
    let index = stage.get().max(1) as usize;

    let stage_zombies = if is_final {
        tuning.final_zombies
    } else {
        tuning.base_zombies + (index - 1) * tuning.zombies_per_stage
    };
    let exponent = i32::try_from(loop_level).unwrap_or(i32::MAX);
    let scale = f64::from(tuning.loop_zombie_multiplier).powi(exponent);
    let zombie_count =
        ((stage_zombies as f64 * scale).floor() as usize).min(tuning.max_zombies);

    let obstacle_count = match (tuning.obstacles_enabled, is_final) {
        (false, _) => 0,
        (true, true) => tuning.final_obstacles,
        (true, false) => tuning.base_obstacles + index * tuning.obstacles_per_stage,
    };

    let zombie_speed_multiplier = 1.0 + tuning.loop_speed_step * loop_level as f32;
    let player_speed_factor = if tuning.scale_player_with_loop {
        zombie_speed_multiplier
    } else {
        1.0
    };

    StageLayout {
        stage,
        zombie_count,
        obstacle_count,
        zombie_speed_multiplier,
        player_speed_factor,
        bystanders: is_final,
    }
}

/// Cap on the carried time budget for the given loop, if the tuning sets one.
///
/// The first loop has no cap. Loops past the end of `loop_time_limits` reuse
/// its last entry.
#[must_use]
pub fn loop_time_cap(loop_level: u32, tuning: &StageTuning) -> Option<f32> {
    let index = usize::try_from(loop_level.checked_sub(1)?).ok()?;
    let last = tuning.loop_time_limits.len().checked_sub(1)?;
    tuning.loop_time_limits.get(index.min(last)).copied()
}
