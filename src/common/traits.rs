//! Common traits defining the collaborators of the steering planner

use crate::common::types::{NodeId, SteeringNode};

/// Read access to the nodes of one search
pub trait NodeStore {
    /// Node for an id, `None` if the repository does not know it
    fn node(&self, id: NodeId) -> Option<&SteeringNode>;
}

/// Continuous pose produced by one motion primitive, to be resolved to a
/// canonical node by the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    /// Steering angle [deg]
    pub steering_angle: i32,
    pub forward: bool,
}

/// Map and node repository queried during neighbor expansion.
///
/// Coordinates are in grid cells.
pub trait SteeringMap: NodeStore {
    /// Whether the point lies inside the map
    fn contains(&self, x: f64, y: f64) -> bool;

    /// Whether the straight segment between two points is not confirmed occupied
    fn is_free_or_unknown(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> bool;

    /// Canonical node for a pose, created on first request.
    ///
    /// Returns `None` when the pose cannot be represented, e.g. occupied.
    fn lookup(&mut self, pose: &CandidatePose) -> Option<NodeId>;

    /// Mutable access to a node
    fn node_mut(&mut self, id: NodeId) -> Option<&mut SteeringNode>;

    /// Map units per cell
    fn resolution(&self) -> f64;

    /// Map rotation [rad]
    fn rotation(&self) -> f64;
}

/// Verdict of the search driver on one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// The child was (re)inserted into the open list through this edge
    AddedToOpenList,
    /// The edge did not improve the child
    Other,
}

/// Best-first search driver receiving the edges found during expansion
pub trait SearchDriver<M: SteeringMap> {
    /// Relax the edge `parent -> child` with the given cost
    fn process_neighbor(&mut self, map: &mut M, parent: NodeId, child: NodeId, cost: f64)
        -> ProcessResult;
}

impl NodeStore for [SteeringNode] {
    fn node(&self, id: NodeId) -> Option<&SteeringNode> {
        self.get(id.index())
    }
}

impl NodeStore for Vec<SteeringNode> {
    fn node(&self, id: NodeId) -> Option<&SteeringNode> {
        self.get(id.index())
    }
}
