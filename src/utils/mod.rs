//! Utility modules for steering_planner

pub mod grid_map;

pub use grid_map::*;
