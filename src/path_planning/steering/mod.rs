//! Steering Lattice Module
//!
//! This module implements the neighbor expansion of a grid-based search for
//! a car-like, non-holonomic vehicle. Every expansion advances a node by one
//! discretized steering/driving action along a constant-curvature arc, shapes
//! the cost of reversing and of switching the driving direction, and forces a
//! straight run-in around every direction switch.
//!
//! # Components
//!
//! - `config`: Steering configuration and cost penalties
//! - `kinematics`: Cell/world conversions and the bicycle curvature model
//! - `action`: The six discretized actions
//! - `motion_model`: Advancing a node by one action
//! - `neighborhood`: Neighbor iteration against a map and a search driver
//! - `goal`: Tolerant goal test
//! - `lattice_map`: Reference node repository on an occupancy grid
//! - `search`: Reference best-first search driver
//!
//! # Example
//!
//! ```no_run
//! use steering_planner::common::Pose2D;
//! use steering_planner::path_planning::steering::{
//!     LatticeMap, SearchConfig, SteeringNeighborhood, SteeringSearch,
//! };
//! use steering_planner::utils::{CellState, OccupancyGrid};
//!
//! let grid = OccupancyGrid::new(200, 200, 0.1, CellState::Free);
//! let mut map = LatticeMap::new(grid);
//! let neighborhood = SteeringNeighborhood::with_defaults().unwrap();
//! let mut search = SteeringSearch::new(neighborhood, SearchConfig::default());
//!
//! let path = search.plan(
//!     &mut map,
//!     Pose2D::new(20.5, 100.5, 0.0),
//!     Pose2D::new(160.5, 100.5, 0.0),
//! );
//! ```

pub mod config;
pub mod kinematics;
pub mod action;
pub mod motion_model;
pub mod neighborhood;
pub mod goal;
pub mod lattice_map;
pub mod search;

// Re-exports
pub use config::{AllowedMoves, SteeringConfig, PENALTY_BACKWARD, PENALTY_TURN};
pub use kinematics::{GridScale, KinematicParams};
pub use action::{Action, SteerChange};
pub use motion_model::{Advance, Candidate, Rejection, RunInCheck};
pub use neighborhood::{ExpansionSummary, SteeringNeighborhood};
pub use goal::{GOAL_ANGLE_THRESHOLD, GOAL_POINT_TOLERANCE, GOAL_SEGMENT_TOLERANCE};
pub use lattice_map::{LatticeKey, LatticeMap, DEFAULT_HEADING_BINS};
pub use search::{extract_path, PathPose, SearchConfig, SearchFrontier, SteeringPath, SteeringSearch};
