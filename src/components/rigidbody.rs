//! Kinematic body component with named acceleration forces.
//!
//! The [`RigidBody`] component stores velocity and a set of named
//! acceleration forces. Gravity is one such force; each force can be toggled
//! independently. The `frozen` flag makes the movement system skip the body.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;

/// Name of the downward force added to every character.
pub const GRAVITY: &str = "gravity";

/// A named acceleration force that can be toggled on/off.
#[derive(Clone, Copy, Debug)]
pub struct AccelerationForce {
    /// The acceleration vector in world units per second squared.
    pub value: Vector2,
    /// Whether this force is currently active.
    pub enabled: bool,
}

impl AccelerationForce {
    pub fn new(value: Vector2) -> Self {
        Self {
            value,
            enabled: true,
        }
    }
}

/// Velocity plus the forces that accelerate it.
///
/// The horizontal component of `velocity` is owned by the intent controller
/// (set outright every tick, no inertia); the vertical component accumulates
/// acceleration in the movement system.
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::new();
/// rb.add_force(GRAVITY, Vector2 { x: 0.0, y: 200.0 });
/// rb.set_force_enabled(GRAVITY, false);
/// ```
#[derive(Component, Clone, Debug)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: Vector2,
    /// Named acceleration forces. The total acceleration is the sum of all enabled forces.
    pub forces: FxHashMap<String, AccelerationForce>,
    /// When true, the movement system leaves the body alone.
    pub frozen: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Create a RigidBody with zero velocity and no forces.
    pub fn new() -> Self {
        Self {
            velocity: Vector2 { x: 0.0, y: 0.0 },
            forces: FxHashMap::default(),
            frozen: false,
        }
    }

    /// Body pulled down by `gravity` world units per second squared.
    pub fn with_gravity(gravity: f32) -> Self {
        let mut rb = Self::new();
        rb.add_force(GRAVITY, Vector2 { x: 0.0, y: gravity });
        rb
    }

    /// Add or update a named acceleration force (enabled by default).
    pub fn add_force(&mut self, name: &str, value: Vector2) {
        self.forces
            .insert(name.to_string(), AccelerationForce::new(value));
    }

    /// Enable or disable a specific force by name.
    /// Returns false if the force doesn't exist.
    pub fn set_force_enabled(&mut self, name: &str, enabled: bool) -> bool {
        if let Some(force) = self.forces.get_mut(name) {
            force.enabled = enabled;
            true
        } else {
            false
        }
    }

    pub fn is_force_enabled(&self, name: &str) -> bool {
        self.forces.get(name).map(|f| f.enabled).unwrap_or(false)
    }

    /// Calculate the total acceleration from all enabled forces.
    pub fn total_acceleration(&self) -> Vector2 {
        let mut total = Vector2 { x: 0.0, y: 0.0 };
        for force in self.forces.values() {
            if force.enabled {
                total += force.value;
            }
        }
        total
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn vec_approx_eq(a: Vector2, b: Vector2) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn test_rigidbody_new() {
        let rb = RigidBody::new();
        assert!(vec_approx_eq(rb.velocity, Vector2 { x: 0.0, y: 0.0 }));
        assert!(rb.forces.is_empty());
        assert!(!rb.frozen);
    }

    #[test]
    fn test_with_gravity() {
        let rb = RigidBody::with_gravity(200.0);
        assert!(rb.is_force_enabled(GRAVITY));
        assert!(vec_approx_eq(
            rb.total_acceleration(),
            Vector2 { x: 0.0, y: 200.0 }
        ));
    }

    #[test]
    fn test_add_force_overwrites() {
        let mut rb = RigidBody::new();
        rb.add_force(GRAVITY, Vector2 { x: 0.0, y: 100.0 });
        rb.add_force(GRAVITY, Vector2 { x: 0.0, y: 200.0 });
        assert_eq!(rb.forces.len(), 1);
        assert!(vec_approx_eq(
            rb.total_acceleration(),
            Vector2 { x: 0.0, y: 200.0 }
        ));
    }

    #[test]
    fn test_disabled_forces_excluded() {
        let mut rb = RigidBody::with_gravity(100.0);
        rb.add_force("wind", Vector2 { x: 50.0, y: 0.0 });
        assert!(rb.set_force_enabled("wind", false));
        assert!(vec_approx_eq(
            rb.total_acceleration(),
            Vector2 { x: 0.0, y: 100.0 }
        ));
        assert!(!rb.set_force_enabled("missing", true));
    }

    #[test]
    fn test_freeze() {
        let mut rb = RigidBody::new();
        assert!(!rb.frozen);
        rb.freeze();
        assert!(rb.frozen);
    }
}
