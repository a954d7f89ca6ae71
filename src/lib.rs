//! steering_planner - neighbor expansion for car-like lattice search
//!
//! This crate provides the motion model, neighbor generator and goal test of
//! a grid-based heuristic search for non-holonomic vehicles, together with a
//! reference occupancy grid, node repository and best-first search driver.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Pose2D, NodeId, SteeringNode, CandidatePose};
pub use common::{NodeStore, SteeringMap, SearchDriver, ProcessResult};
pub use common::{PlannerError, PlannerResult};
