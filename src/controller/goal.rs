use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of placement steps drawn per horizontal axis.
pub const PLACEMENT_STEPS: u32 = 48;
const STEPS_PER_UNIT: f32 = 12.0;

/// Inclusive box test: every axis of `head` within `half_extent` of `goal`.
pub fn reached(head: Vec3, goal: Vec3, half_extent: f32) -> bool {
    head.x >= goal.x - half_extent
        && head.x <= goal.x + half_extent
        && head.y >= goal.y - half_extent
        && head.y <= goal.y + half_extent
        && head.z >= goal.z - half_extent
        && head.z <= goal.z + half_extent
}

/// One horizontal coordinate from a sign draw and a step in `0..PLACEMENT_STEPS`.
///
/// Negative draws land in [-6, -2), positive ones in [1, 5).
pub fn placement_axis(negative: bool, step: u32) -> f32 {
    let along = step as f32 / STEPS_PER_UNIT;
    if negative {
        along - 6.0
    } else {
        along + 1.0
    }
}

/// Cube position for the given draws, at height `z`.
pub fn placement_from_draws(negative_x: bool, step_x: u32, negative_y: bool, step_y: u32, z: f32) -> Vec3 {
    Vec3::new(placement_axis(negative_x, step_x), placement_axis(negative_y, step_y), z)
}

/// Draws both signs, then both steps, and builds the new cube position.
pub fn random_cube_position<R: Rng + ?Sized>(rng: &mut R, z: f32) -> Vec3 {
    let negative_x = rng.gen::<bool>();
    let negative_y = rng.gen::<bool>();
    let step_x = rng.gen_range(0..PLACEMENT_STEPS);
    let step_y = rng.gen_range(0..PLACEMENT_STEPS);
    placement_from_draws(negative_x, step_x, negative_y, step_y, z)
}

/// Placement generator, seeded or drawn from OS entropy.
pub fn placement_rng(seed: Option<u64>) -> StdRng {
    tracing::debug!(?seed, "cube placement rng");
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}
