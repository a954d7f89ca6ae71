//! Common types, traits, and error definitions for steering_planner
//!
//! This module provides the node entity and the collaborator interfaces
//! shared by the motion model, the reference map and the search driver.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
