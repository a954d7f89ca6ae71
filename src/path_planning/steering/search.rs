//! Best-first search over the steering lattice
//!
//! A reference driver for [`SteeringNeighborhood`]: it owns the open and
//! closed sets, relaxes the edges the neighborhood reports, and stops at the
//! first node accepted by the goal test.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use log::{debug, trace};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::common::{
    NodeId, NodeStore, PlannerError, PlannerResult, Pose2D, ProcessResult, SearchDriver,
    SteeringMap, SteeringNode,
};
use crate::path_planning::steering::lattice_map::LatticeMap;
use crate::path_planning::steering::neighborhood::SteeringNeighborhood;

/// Configuration for the steering search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of node expansions
    pub max_expansions: usize,
    /// Weight of the euclidean heuristic (0.0 = uniform cost search)
    pub heuristic_weight: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: 200_000,
            heuristic_weight: 1.0,
        }
    }
}

/// Node with priority for the open set (min-heap)
#[derive(Debug, PartialEq, Eq)]
struct PriorityNode {
    priority: OrderedFloat<f64>,
    id: NodeId,
}

impl Ord for PriorityNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for PriorityNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Open and closed sets of one search
#[derive(Debug, Default)]
pub struct SearchFrontier {
    open: BinaryHeap<PriorityNode>,
    closed: HashSet<NodeId>,
    heuristic_weight: f64,
    goal: (f64, f64),
}

impl SearchFrontier {
    pub fn new(heuristic_weight: f64, goal_x: f64, goal_y: f64) -> Self {
        Self {
            open: BinaryHeap::new(),
            closed: HashSet::new(),
            heuristic_weight,
            goal: (goal_x, goal_y),
        }
    }

    fn heuristic(&self, node: &SteeringNode) -> f64 {
        self.heuristic_weight * (node.x - self.goal.0).hypot(node.y - self.goal.1)
    }

    pub fn push(&mut self, id: NodeId, node: &SteeringNode) {
        let priority = node.cost + self.heuristic(node);
        self.open.push(PriorityNode {
            priority: OrderedFloat(priority),
            id,
        });
    }

    /// Next node that has not been closed yet, closing it
    pub fn pop(&mut self) -> Option<NodeId> {
        while let Some(PriorityNode { id, .. }) = self.open.pop() {
            if self.closed.insert(id) {
                return Some(id);
            }
        }
        None
    }

    pub fn is_closed(&self, id: NodeId) -> bool {
        self.closed.contains(&id)
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }
}

impl<M: SteeringMap> SearchDriver<M> for SearchFrontier {
    fn process_neighbor(&mut self, map: &mut M, parent: NodeId, child: NodeId, cost: f64) -> ProcessResult {
        if self.closed.contains(&child) {
            return ProcessResult::Other;
        }
        let parent_cost = match map.node(parent) {
            Some(node) => node.cost,
            None => return ProcessResult::Other,
        };
        let new_cost = parent_cost + cost;

        let node = match map.node_mut(child) {
            Some(node) => node,
            None => return ProcessResult::Other,
        };
        if new_cost >= node.cost {
            return ProcessResult::Other;
        }
        node.cost = new_cost;
        node.prev = Some(parent);
        let node = *node;

        self.push(child, &node);
        ProcessResult::AddedToOpenList
    }
}

/// One pose of a planned path, in grid cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    /// Steering angle [deg]
    pub steering_angle: i32,
    pub forward: bool,
}

impl From<&SteeringNode> for PathPose {
    fn from(node: &SteeringNode) -> Self {
        Self {
            x: node.x,
            y: node.y,
            theta: node.theta,
            steering_angle: node.steering_angle,
            forward: node.forward,
        }
    }
}

/// Path returned by the steering search, root first
#[derive(Debug, Clone, Default)]
pub struct SteeringPath {
    pub poses: Vec<PathPose>,
    pub cost: f64,
}

impl SteeringPath {
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Sum of the straight distances between consecutive poses [cells]
    pub fn total_length(&self) -> f64 {
        self.poses
            .windows(2)
            .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
            .sum()
    }

    /// Number of driving direction changes along the path
    pub fn direction_switches(&self) -> usize {
        self.poses
            .windows(2)
            .skip(1)
            .filter(|w| w[0].forward != w[1].forward)
            .count()
    }

    /// Poses in world units for a given resolution [m/cell]
    pub fn to_world(&self, resolution: f64) -> Vec<Pose2D> {
        self.poses
            .iter()
            .map(|p| Pose2D::new(p.x * resolution, p.y * resolution, p.theta))
            .collect()
    }
}

/// Steering lattice planner
pub struct SteeringSearch {
    neighborhood: SteeringNeighborhood,
    config: SearchConfig,
    expansions: usize,
}

impl SteeringSearch {
    pub fn new(neighborhood: SteeringNeighborhood, config: SearchConfig) -> Self {
        Self {
            neighborhood,
            config,
            expansions: 0,
        }
    }

    /// Node expansions of the last call to [`SteeringSearch::plan`]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Plan from `start` to `goal`, both in grid cells.
    ///
    /// `map` is cleared and reused as node repository of this search.
    pub fn plan(&mut self, map: &mut LatticeMap, start: Pose2D, goal: Pose2D) -> PlannerResult<SteeringPath> {
        self.expansions = 0;
        self.neighborhood.check_map_resolution(&*map)?;
        map.clear();

        if !map.contains(start.x, start.y) || map.grid().is_occupied(start.x, start.y) {
            return Err(PlannerError::PlanningError(format!(
                "start ({:.2},{:.2}) is outside the map or blocked",
                start.x, start.y
            )));
        }

        let goal_node = SteeringNode::new(goal.x, goal.y, goal.yaw, 0, true);
        let root = map.insert_root(SteeringNode::root(start.x, start.y, start.yaw));
        let mut frontier = SearchFrontier::new(self.config.heuristic_weight, goal.x, goal.y);
        let root_node = *map
            .node(root)
            .ok_or_else(|| PlannerError::corrupted(root, "root missing after insertion"))?;
        frontier.push(root, &root_node);

        debug!(
            "[SteeringSearch] plan: start=({:.2},{:.2},{:.3}) goal=({:.2},{:.2},{:.3})",
            start.x, start.y, start.yaw, goal.x, goal.y, goal.yaw
        );

        while let Some(current) = frontier.pop() {
            let node = *map
                .node(current)
                .ok_or_else(|| PlannerError::corrupted(current, "open node is not in the map"))?;

            if self.neighborhood.is_goal(&*map, &goal_node, &node) {
                debug!(
                    "[SteeringSearch] goal reached after {} expansions, cost={:.2}, nodes={}",
                    self.expansions,
                    node.cost,
                    map.len()
                );
                return extract_path(&*map, current);
            }

            if self.expansions >= self.config.max_expansions {
                debug!(
                    "[SteeringSearch] FAILED: expansion budget of {} exhausted",
                    self.config.max_expansions
                );
                return Err(PlannerError::PlanningError(format!(
                    "expansion budget of {} exhausted",
                    self.config.max_expansions
                )));
            }
            self.expansions += 1;

            trace!(
                "[SteeringSearch] pop {} cost={:.2} open={} closed={}",
                current,
                node.cost,
                frontier.open_len(),
                frontier.closed_len()
            );
            self.neighborhood
                .iterate_free_neighbors(&mut frontier, map, current)?;
        }

        debug!(
            "[SteeringSearch] FAILED: open set empty after {} expansions",
            self.expansions
        );
        Err(PlannerError::PlanningError("No path found".to_string()))
    }
}

/// Follow the predecessor chain from `end` back to the root
pub fn extract_path<S>(store: &S, end: NodeId) -> PlannerResult<SteeringPath>
where
    S: NodeStore + ?Sized,
{
    let end_node = store
        .node(end)
        .ok_or_else(|| PlannerError::corrupted(end, "path end is not in the map"))?;
    let mut poses = vec![PathPose::from(end_node)];
    let mut visited = HashSet::new();
    visited.insert(end);

    let mut current = end_node.prev;
    while let Some(id) = current {
        if !visited.insert(id) {
            return Err(PlannerError::corrupted(id, "predecessor chain contains a cycle"));
        }
        let node = store
            .node(id)
            .ok_or_else(|| PlannerError::corrupted(id, "predecessor is not in the map"))?;
        poses.push(PathPose::from(node));
        current = node.prev;
    }

    poses.reverse();
    Ok(SteeringPath {
        poses,
        cost: end_node.cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CandidatePose;
    use crate::utils::{CellState, OccupancyGrid};

    fn open_map() -> LatticeMap {
        LatticeMap::new(OccupancyGrid::new(100, 100, 0.1, CellState::Free))
    }

    fn candidate(x: f64) -> CandidatePose {
        CandidatePose {
            x,
            y: 5.0,
            theta: 0.0,
            steering_angle: 0,
            forward: true,
        }
    }

    #[test]
    fn test_priority_node_min_heap() {
        let mut heap = BinaryHeap::new();
        heap.push(PriorityNode { priority: OrderedFloat(3.0), id: NodeId(0) });
        heap.push(PriorityNode { priority: OrderedFloat(1.0), id: NodeId(1) });
        heap.push(PriorityNode { priority: OrderedFloat(2.0), id: NodeId(2) });
        assert_eq!(heap.pop().unwrap().id, NodeId(1));
        assert_eq!(heap.pop().unwrap().id, NodeId(2));
    }

    #[test]
    fn test_relaxation() {
        let mut map = open_map();
        let root = map.insert_root(SteeringNode::root(5.0, 5.0, 0.0));
        let child = map.lookup(&candidate(15.0)).unwrap();
        let mut frontier = SearchFrontier::new(0.0, 50.0, 5.0);

        assert_eq!(
            frontier.process_neighbor(&mut map, root, child, 10.0),
            ProcessResult::AddedToOpenList
        );
        assert_eq!(map.node(child).unwrap().prev, Some(root));
        assert_eq!(map.node(child).unwrap().cost, 10.0);

        // equal or worse edges do not touch the node
        assert_eq!(
            frontier.process_neighbor(&mut map, root, child, 10.0),
            ProcessResult::Other
        );
        assert_eq!(
            frontier.process_neighbor(&mut map, root, child, 25.0),
            ProcessResult::Other
        );

        // a better edge re-inserts it
        assert_eq!(
            frontier.process_neighbor(&mut map, root, child, 4.0),
            ProcessResult::AddedToOpenList
        );
        assert_eq!(map.node(child).unwrap().cost, 4.0);

        assert_eq!(frontier.pop(), Some(child));
        assert!(frontier.is_closed(child));
        assert_eq!(
            frontier.process_neighbor(&mut map, root, child, 1.0),
            ProcessResult::Other
        );
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_extract_path_and_cycle_detection() {
        let mut nodes = vec![SteeringNode::root(0.0, 0.0, 0.0)];
        for i in 1..4 {
            let mut node = SteeringNode::new(10.0 * i as f64, 0.0, 0.0, 0, i != 3);
            node.prev = Some(NodeId(i - 1));
            node.cost = 10.0 * i as f64;
            nodes.push(node);
        }
        let path = extract_path(&nodes, NodeId(3)).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.cost, 30.0);
        assert!((path.total_length() - 30.0).abs() < 1e-9);
        assert_eq!(path.direction_switches(), 1);
        assert!((path.to_world(0.1)[3].x - 3.0).abs() < 1e-9);

        nodes[0].prev = Some(NodeId(2));
        assert!(matches!(
            extract_path(&nodes, NodeId(3)),
            Err(PlannerError::CorruptedGraph { .. })
        ));
    }

    #[test]
    fn test_plan_straight_ahead() {
        let mut map = open_map();
        let mut search = SteeringSearch::new(
            SteeringNeighborhood::with_defaults().unwrap(),
            SearchConfig::default(),
        );
        let path = search
            .plan(&mut map, Pose2D::new(10.5, 50.5, 0.0), Pose2D::new(50.5, 50.5, 0.0))
            .unwrap();
        assert_eq!(path.len(), 5);
        assert!((path.cost - 40.0).abs() < 1e-9);
        assert!(path.poses.iter().all(|p| p.forward && p.steering_angle == 0));
    }

    #[test]
    fn test_plan_rejects_blocked_start() {
        let mut grid = OccupancyGrid::new(20, 20, 0.1, CellState::Free);
        grid.set_cell(2, 2, crate::utils::OCCUPIED);
        let mut map = LatticeMap::new(grid);
        let mut search = SteeringSearch::new(
            SteeringNeighborhood::with_defaults().unwrap(),
            SearchConfig::default(),
        );
        assert!(matches!(
            search.plan(&mut map, Pose2D::new(2.5, 2.5, 0.0), Pose2D::new(10.0, 10.0, 0.0)),
            Err(PlannerError::PlanningError(_))
        ));
    }

    #[test]
    fn test_plan_rejects_resolution_mismatch() {
        let mut map = LatticeMap::new(OccupancyGrid::new(100, 100, 0.2, CellState::Free));
        let mut search = SteeringSearch::new(
            SteeringNeighborhood::with_defaults().unwrap(),
            SearchConfig::default(),
        );
        let result = search.plan(&mut map, Pose2D::new(10.5, 50.5, 0.0), Pose2D::new(50.5, 50.5, 0.0));
        assert!(matches!(result, Err(PlannerError::InvalidParameter(_))));
        assert_eq!(search.expansions(), 0);
    }

    #[test]
    fn test_plan_budget_exhausted() {
        let mut map = open_map();
        let mut search = SteeringSearch::new(
            SteeringNeighborhood::with_defaults().unwrap(),
            SearchConfig {
                max_expansions: 2,
                ..Default::default()
            },
        );
        let result = search.plan(&mut map, Pose2D::new(10.5, 50.5, 0.0), Pose2D::new(90.5, 50.5, 0.0));
        assert!(matches!(result, Err(PlannerError::PlanningError(_))));
        assert_eq!(search.expansions(), 2);
    }
}
