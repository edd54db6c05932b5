//! Cube Dodge - a dodge-the-falling-cubes arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (avatar, obstacles, collisions, round state)
//! - `config`: Data-driven game balance and difficulty presets

pub mod config;
pub mod sim;

pub use config::{ConfigError, DifficultyPreset, SimConfig};

use glam::Vec3;

/// World-space coordinate (x lateral, y height, z depth; +z points at the player)
pub type Position = Vec3;

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Slack when comparing the round clock against a scheduled time
    pub const TIME_EPSILON: f32 = 1e-4;
}

/// Point on a sphere's surface nearest to `target`.
///
/// Coincident centers have no direction, so the sphere center is returned.
#[inline]
pub fn surface_point_toward(center: Vec3, radius: f32, target: Vec3) -> Vec3 {
    center + (target - center).normalize_or_zero() * radius
}

/// Strict containment test against an axis-aligned cube
#[inline]
pub fn inside_cube(point: Vec3, center: Vec3, half_extent: f32) -> bool {
    let d = (point - center).abs();
    d.x < half_extent && d.y < half_extent && d.z < half_extent
}

/// Clamp a host-supplied frame delta to something the simulation can consume.
///
/// Debug builds treat a negative or non-finite delta as a host bug.
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    debug_assert!(dt.is_finite(), "frame delta must be finite, got {dt}");
    debug_assert!(dt >= 0.0, "frame delta must be non-negative, got {dt}");
    if dt.is_finite() { dt.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_point_toward() {
        let p = surface_point_toward(Vec3::ZERO, 2.0, Vec3::new(10.0, 0.0, 0.0));
        assert!((p - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_surface_point_coincident_centers() {
        let c = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(surface_point_toward(c, 1.0, c), c);
    }

    #[test]
    fn test_inside_cube_is_strict() {
        let center = Vec3::ZERO;
        assert!(inside_cube(Vec3::new(0.5, -0.5, 0.9), center, 1.0));
        assert!(!inside_cube(Vec3::new(1.0, 0.0, 0.0), center, 1.0));
        assert!(!inside_cube(Vec3::new(0.0, 0.0, -1.5), center, 1.0));
    }

    #[test]
    fn test_sanitize_dt_passes_valid() {
        assert_eq!(sanitize_dt(0.0), 0.0);
        assert_eq!(sanitize_dt(0.25), 0.25);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "non-negative")]
    fn test_sanitize_dt_panics_on_negative_in_debug() {
        sanitize_dt(-0.1);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_sanitize_dt_clamps_in_release() {
        assert_eq!(sanitize_dt(-0.1), 0.0);
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
    }
}
