//! Neighbor expansion for the steering lattice.
//!
//! Enumerates every (action, steering step) pair of a node, filters the
//! resulting motions against the map and reports the surviving edges to the
//! search driver.

use itertools::iproduct;
use log::{debug, trace};

use crate::common::{
    NodeId, NodeStore, PlannerError, PlannerResult, ProcessResult, SearchDriver, SteeringMap,
};
use crate::path_planning::steering::action::Action;
use crate::path_planning::steering::config::SteeringConfig;
use crate::path_planning::steering::kinematics::{GridScale, KinematicParams};
use crate::path_planning::steering::motion_model::Advance;

/// Relative tolerance when comparing the map resolution with the configured one
const RESOLUTION_TOLERANCE: f64 = 1e-9;

/// Motion model, neighbor generator and goal test of a car-like vehicle.
///
/// Holds no search state; every call works on the nodes owned by the map.
#[derive(Debug, Clone)]
pub struct SteeringNeighborhood {
    pub(crate) config: SteeringConfig,
    pub(crate) params: KinematicParams,
    pub(crate) straight_dir_switch: u32,
}

/// Counters of one expansion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionSummary {
    /// Motions rejected by the motion model
    pub rejected: usize,
    /// Motions leaving the map, colliding, or without canonical node
    pub blocked: usize,
    /// Edges handed to the search driver
    pub forwarded: usize,
    /// Edges the driver inserted into its open list
    pub added: usize,
}

impl SteeringNeighborhood {
    pub fn new(config: SteeringConfig) -> PlannerResult<Self> {
        config.validate()?;
        let params = KinematicParams::new(&config);
        let straight_dir_switch = config.straight_dir_switch();
        Ok(Self {
            config,
            params,
            straight_dir_switch,
        })
    }

    pub fn with_defaults() -> PlannerResult<Self> {
        Self::new(SteeringConfig::default())
    }

    /// Straight steps required around a direction switch
    pub fn straight_dir_switch(&self) -> u32 {
        self.straight_dir_switch
    }

    /// Fail unless `map` uses the cell size the motion model was configured with
    pub fn check_map_resolution<M>(&self, map: &M) -> PlannerResult<()>
    where
        M: SteeringMap + ?Sized,
    {
        let expected = self.params.resolution();
        let actual = map.resolution();
        if (actual - expected).abs() > RESOLUTION_TOLERANCE * expected {
            return Err(PlannerError::InvalidParameter(format!(
                "map resolution {} m/cell does not match configured resolution {} m/cell",
                actual, expected
            )));
        }
        Ok(())
    }

    /// Expand `reference`: forward every admissible edge to `driver` and
    /// write the child fields for the edges the driver accepts.
    pub fn iterate_free_neighbors<M, D>(
        &self,
        driver: &mut D,
        map: &mut M,
        reference: NodeId,
    ) -> PlannerResult<ExpansionSummary>
    where
        M: SteeringMap,
        D: SearchDriver<M>,
    {
        self.check_map_resolution(&*map)?;
        let parent = *map
            .node(reference)
            .ok_or_else(|| PlannerError::corrupted(reference, "expanded node is not in the map"))?;
        let mut summary = ExpansionSummary::default();

        trace!(
            "[Steering] expand {} at ({:.2},{:.2},{:.3}) steer={} rotation={:.3}",
            reference,
            parent.x,
            parent.y,
            parent.theta,
            parent.steering_angle,
            map.rotation()
        );

        let actions = Action::all(self.config.moves);
        for (&action, step) in iproduct!(actions.iter(), 0..self.config.steer_steps) {
            let candidate = match self.advance(&*map, &parent, action, step)? {
                Advance::Accepted(candidate) => candidate,
                Advance::Rejected(reason) => {
                    trace!("[Steering] {:?}/{} rejected: {:?}", action, step, reason);
                    summary.rejected += 1;
                    continue;
                }
            };
            let pose = candidate.pose;

            if !map.contains(pose.x, pose.y)
                || !map.is_free_or_unknown(parent.x, parent.y, pose.x, pose.y)
            {
                trace!("[Steering] {:?}/{} blocked at ({:.2},{:.2})", action, step, pose.x, pose.y);
                summary.blocked += 1;
                continue;
            }

            let child = match map.lookup(&pose) {
                Some(child) => child,
                None => {
                    summary.blocked += 1;
                    continue;
                }
            };

            summary.forwarded += 1;
            if driver.process_neighbor(map, reference, child, candidate.cost)
                == ProcessResult::AddedToOpenList
            {
                let node = map
                    .node_mut(child)
                    .ok_or_else(|| PlannerError::corrupted(child, "lookup returned unknown node"))?;
                node.custom = candidate.custom;
                node.depth = parent.depth + 1;
                node.steering_angle = pose.steering_angle;
                node.x = pose.x;
                node.y = pose.y;
                node.theta = pose.theta;
                node.forward = pose.forward;
                summary.added += 1;
            }
        }

        debug!(
            "[Steering] expanded {}: forwarded={} added={} rejected={} blocked={}",
            reference, summary.forwarded, summary.added, summary.rejected, summary.blocked
        );
        Ok(summary)
    }
}
