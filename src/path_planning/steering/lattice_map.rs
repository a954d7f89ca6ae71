//! Node repository of the steering lattice on top of an occupancy grid.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::common::{normalize_angle, CandidatePose, NodeId, NodeStore, SteeringMap, SteeringNode};
use crate::utils::OccupancyGrid;

/// Default number of heading bins of the discretization
pub const DEFAULT_HEADING_BINS: u32 = 72;

/// Discretized pose identifying a canonical node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LatticeKey {
    pub x: i64,
    pub y: i64,
    pub heading: u32,
    pub steering_angle: i32,
    pub forward: bool,
}

/// Occupancy grid plus the canonical nodes of one search
#[derive(Debug, Clone)]
pub struct LatticeMap {
    grid: OccupancyGrid,
    nodes: Vec<SteeringNode>,
    index: HashMap<LatticeKey, NodeId>,
    heading_bins: u32,
}

impl LatticeMap {
    pub fn new(grid: OccupancyGrid) -> Self {
        Self::with_heading_bins(grid, DEFAULT_HEADING_BINS)
    }

    pub fn with_heading_bins(grid: OccupancyGrid, heading_bins: u32) -> Self {
        Self {
            grid,
            nodes: Vec::new(),
            index: HashMap::new(),
            heading_bins: heading_bins.max(1),
        }
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn nodes(&self) -> &[SteeringNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop all nodes, keeping the grid
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }

    pub fn key(&self, x: f64, y: f64, theta: f64, steering_angle: i32, forward: bool) -> LatticeKey {
        let bin_width = 2.0 * PI / self.heading_bins as f64;
        let heading = ((normalize_angle(theta) + PI) / bin_width).floor() as u32 % self.heading_bins;
        LatticeKey {
            x: x.floor() as i64,
            y: y.floor() as i64,
            heading,
            steering_angle,
            forward,
        }
    }

    /// Register the search root, reusing the canonical node of its pose
    pub fn insert_root(&mut self, root: SteeringNode) -> NodeId {
        let key = self.key(root.x, root.y, root.theta, root.steering_angle, root.forward);
        if let Some(&id) = self.index.get(&key) {
            self.nodes[id.index()] = root;
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(root);
        self.index.insert(key, id);
        id
    }
}

impl NodeStore for LatticeMap {
    fn node(&self, id: NodeId) -> Option<&SteeringNode> {
        self.nodes.get(id.index())
    }
}

impl SteeringMap for LatticeMap {
    fn contains(&self, x: f64, y: f64) -> bool {
        self.grid.contains(x, y)
    }

    fn is_free_or_unknown(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
        self.grid.is_free_or_unknown(x0, y0, x1, y1)
    }

    fn lookup(&mut self, pose: &CandidatePose) -> Option<NodeId> {
        if !self.grid.contains(pose.x, pose.y) || self.grid.is_occupied(pose.x, pose.y) {
            return None;
        }
        let key = self.key(pose.x, pose.y, pose.theta, pose.steering_angle, pose.forward);
        if let Some(&id) = self.index.get(&key) {
            return Some(id);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(SteeringNode::new(
            pose.x,
            pose.y,
            pose.theta,
            pose.steering_angle,
            pose.forward,
        ));
        self.index.insert(key, id);
        Some(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SteeringNode> {
        self.nodes.get_mut(id.index())
    }

    fn resolution(&self) -> f64 {
        self.grid.resolution()
    }

    fn rotation(&self) -> f64 {
        self.grid.rotation()
    }
}
