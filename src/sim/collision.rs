//! Sphere vs cube collision detection
//!
//! The avatar is a sphere and obstacles are axis-aligned cubes. The test is a
//! cheap approximation: reject on center distance, then probe the point on
//! the sphere's surface nearest the cube center and check it against the cube.

use std::f32::consts::SQRT_2;

use super::avatar::Avatar;
use super::obstacles::Obstacle;
use crate::{inside_cube, surface_point_toward};

/// Broad phase: can these two shapes possibly overlap?
#[inline]
pub fn within_reach(avatar: &Avatar, obstacle: &Obstacle) -> bool {
    let reach = avatar.radius + SQRT_2 * obstacle.half_extent;
    avatar.position.distance_squared(obstacle.position) <= reach * reach
}

/// Check whether the avatar hits an obstacle
///
/// Deterministic: identical inputs always give the same answer.
pub fn collides(avatar: &Avatar, obstacle: &Obstacle) -> bool {
    debug_assert!(obstacle.half_extent > 0.0, "obstacle half extent must be positive");

    if !within_reach(avatar, obstacle) {
        return false;
    }

    let probe = surface_point_toward(avatar.position, avatar.radius, obstacle.position);
    inside_cube(probe, obstacle.position, obstacle.half_extent)
}

/// First obstacle (in slice order) the avatar hits
pub fn first_hit<'a>(avatar: &Avatar, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles.iter().find(|o| collides(avatar, o))
}
