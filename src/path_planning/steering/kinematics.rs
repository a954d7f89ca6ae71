//! Kinematic parameters of the steering motion model
//!
//! Conversions between grid cells and world units and the constant-curvature
//! (bicycle) relation between steering angle and turning radius.

use crate::path_planning::steering::config::SteeringConfig;

/// Conversion between grid cells and world units
pub trait GridScale {
    /// World units [m] per cell
    fn resolution(&self) -> f64;

    fn cells_to_world(&self, cells: f64) -> f64 {
        cells * self.resolution()
    }

    fn world_to_cells(&self, world: f64) -> f64 {
        world / self.resolution()
    }
}

/// Stepping constants derived from a [`SteeringConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicParams {
    resolution: f64,
    distance_cells: f64,
    look_ahead_m: f64,
}

impl KinematicParams {
    pub fn new(config: &SteeringConfig) -> Self {
        Self {
            resolution: config.resolution,
            distance_cells: config.distance as f64,
            look_ahead_m: config.look_ahead_m(),
        }
    }

    /// Edge length of one action [cells]
    pub fn distance_step_cells(&self) -> f64 {
        self.distance_cells
    }

    /// Edge length of one action [m]
    pub fn distance_step_world(&self) -> f64 {
        self.cells_to_world(self.distance_cells)
    }

    /// Look-ahead length [m]
    pub fn look_ahead_world(&self) -> f64 {
        self.look_ahead_m
    }

    /// Look-ahead length [cells]
    pub fn look_ahead_cells(&self) -> f64 {
        self.world_to_cells(self.look_ahead_m)
    }

    /// Signed turning radius [m] for a steering angle in degrees,
    /// `None` when driving straight.
    pub fn turning_radius_world(&self, steering_deg: i32) -> Option<f64> {
        if steering_deg == 0 {
            return None;
        }
        Some(self.look_ahead_m / (steering_deg as f64).to_radians().tan())
    }
}

impl GridScale for KinematicParams {
    fn resolution(&self) -> f64 {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_conversions() {
        let params = KinematicParams::new(&SteeringConfig::default());
        assert_relative_eq!(params.distance_step_cells(), 10.0);
        assert_relative_eq!(params.distance_step_world(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(params.look_ahead_world(), 2.5);
        assert_relative_eq!(params.look_ahead_cells(), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_turning_radius() {
        let params = KinematicParams::new(&SteeringConfig::default());
        assert!(params.turning_radius_world(0).is_none());

        let left = params.turning_radius_world(45).unwrap();
        let right = params.turning_radius_world(-45).unwrap();
        assert_relative_eq!(left, 2.5, epsilon = 1e-9);
        assert_relative_eq!(right, -2.5, epsilon = 1e-9);
    }
}
