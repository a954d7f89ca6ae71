//! Common types used throughout steering_planner

use std::f64::consts::PI;
use std::fmt;

/// 2D pose (position + orientation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }
}

/// Normalize angle to (-PI, PI]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Identifier of a node inside the node repository
///
/// Used as the non-owning back-reference between search nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One discretized vehicle pose in the search graph.
///
/// Positions are in grid cells with sub-cell precision, `theta` in radians.
/// The pose-derived fields are written once, when the node is first
/// discovered through a winning edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringNode {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    /// Steering angle [deg]
    pub steering_angle: i32,
    /// Driving direction of the edge that produced this node
    pub forward: bool,
    /// Remaining mandatory straight steps after a direction switch
    pub custom: u32,
    /// Search depth, 0 for the root
    pub depth: u32,
    /// Predecessor on the best known path
    pub prev: Option<NodeId>,
    /// Best known path cost, maintained by the search driver
    pub cost: f64,
}

impl SteeringNode {
    /// Fresh node at a pose, not yet reached by any edge
    pub fn new(x: f64, y: f64, theta: f64, steering_angle: i32, forward: bool) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
            steering_angle,
            forward,
            custom: 0,
            depth: 0,
            prev: None,
            cost: f64::INFINITY,
        }
    }

    /// Search root: straight wheels, driving forward, zero cost
    pub fn root(x: f64, y: f64, theta: f64) -> Self {
        Self {
            cost: 0.0,
            ..Self::new(x, y, theta, 0, true)
        }
    }

    pub fn is_initial(&self) -> bool {
        self.depth < 1
    }
}
