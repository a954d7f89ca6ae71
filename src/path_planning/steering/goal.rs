//! Tolerant goal test of the steering lattice

use std::f64::consts::PI;

use log::warn;
use nalgebra::Vector2;

use crate::common::{NodeStore, SteeringNode};
use crate::path_planning::steering::kinematics::GridScale;
use crate::path_planning::steering::neighborhood::SteeringNeighborhood;

/// Maximum heading difference to the goal [rad]
pub const GOAL_ANGLE_THRESHOLD: f64 = PI / 8.0;
/// Acceptance radius around the goal point [m]
pub const GOAL_POINT_TOLERANCE: f64 = 0.05;
/// Acceptance distance between goal and the last travelled segment [m]
pub const GOAL_SEGMENT_TOLERANCE: f64 = 0.1;

/// Squared segment length [m^2] below which the segment counts as a point
const DEGENERATE_SEGMENT_SQ: f64 = 0.0001;

impl SteeringNeighborhood {
    /// Whether `reference` is an acceptable end node for `goal`.
    ///
    /// Accepts nodes close to the goal point, or whose last edge (from its
    /// predecessor) passes close to it, with a matching heading.
    pub fn is_goal<S>(&self, store: &S, goal: &SteeringNode, reference: &SteeringNode) -> bool
    where
        S: NodeStore + ?Sized,
    {
        let delta = goal.theta - reference.theta;
        let delta_rot = delta.sin().atan2(delta.cos());
        if delta_rot.abs() > GOAL_ANGLE_THRESHOLD {
            return false;
        }

        let mut eff_gx = goal.x;
        let mut eff_gy = goal.y;

        if self.config.reversed {
            if reference.custom > 0 {
                return false;
            }
            // the physical trajectory starts with a straight reverse lead-in
            if !reference.forward {
                let la_cells = self.params.look_ahead_cells();
                eff_gx -= goal.theta.cos() * la_cells;
                eff_gy -= goal.theta.sin() * la_cells;
            }
        }

        let window = 4.0 * self.params.distance_step_cells();
        if (eff_gx - reference.x).abs() > window || (eff_gy - reference.y).abs() > window {
            return false;
        }

        let cell_dist = (eff_gx - reference.x).hypot(eff_gy - reference.y);
        if self.params.cells_to_world(cell_dist) < GOAL_POINT_TOLERANCE {
            return true;
        }

        let prev = match reference.prev {
            Some(id) => match store.node(id) {
                Some(prev) => prev,
                None => {
                    warn!("[Steering] goal test: predecessor {} missing", id);
                    return false;
                }
            },
            None => return false,
        };

        let res = self.params.resolution();
        let p = Vector2::new(prev.x, prev.y) * res;
        let r = Vector2::new(reference.x, reference.y) * res;
        let g = Vector2::new(eff_gx, eff_gy) * res;

        let l2 = (p - r).norm_squared();
        let line_distance = if l2 <= DEGENERATE_SEGMENT_SQ {
            (g - p).norm()
        } else {
            let t = ((g - p).dot(&(r - p)) / l2).max(0.0).min(1.0);
            let projection = p + (r - p) * t;
            (g - projection).norm()
        };
        line_distance < GOAL_SEGMENT_TOLERANCE
    }
}
