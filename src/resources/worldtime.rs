use bevy_ecs::prelude::Resource;

/// Nominal simulation rate.
pub const DEFAULT_TICK_RATE: u32 = 50;

/// Simulated clock. Every tick advances by the same `delta`, whatever the
/// real frame interval was.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Simulated seconds since start.
    pub elapsed: f64,
    /// Length of one tick in seconds.
    pub delta: f64,
    /// Ticks simulated so far.
    pub tick: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        Self::fixed(DEFAULT_TICK_RATE)
    }
}

impl WorldTime {
    /// Clock stepping at `tick_rate` ticks per simulated second.
    pub fn fixed(tick_rate: u32) -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 1.0 / tick_rate.max(1) as f64,
            tick: 0,
        }
    }

    /// Tick length as `f32`, for position math.
    pub fn delta_f32(&self) -> f32 {
        self.delta as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delta() {
        let t = WorldTime::fixed(50);
        assert_eq!(t.delta, 0.02);
        assert_eq!(t.tick, 0);
    }

    #[test]
    fn test_zero_rate_does_not_divide_by_zero() {
        let t = WorldTime::fixed(0);
        assert_eq!(t.delta, 1.0);
    }
}
