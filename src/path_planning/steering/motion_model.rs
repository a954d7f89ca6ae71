//! Motion model of the steering lattice
//!
//! Advances a node by one discretized action along a constant-curvature arc
//! and enforces the straight run-in around direction switches.

use crate::common::{normalize_angle, CandidatePose, NodeId, NodeStore, PlannerError, PlannerResult, SteeringNode};
use crate::path_planning::steering::action::{Action, SteerChange};
use crate::path_planning::steering::config::{PENALTY_BACKWARD, PENALTY_TURN};
use crate::path_planning::steering::kinematics::GridScale;
use crate::path_planning::steering::neighborhood::SteeringNeighborhood;

/// Largest steering magnitude [deg] that still counts as driving straight
const MAX_STEER_ANGLE_FOR_STRAIGHT: i32 = 0;

/// Why the motion model refused an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Action index is outside the configured move set
    Unavailable,
    /// Root node only allows its reserved actions
    InitialAction,
    /// Node is inside a mandatory straight run
    StraightLocked,
    /// Keep actions need step 0, turning actions need step > 0, and every
    /// step stays below `steer_steps`
    StepMismatch,
    /// Steering is already at the limit in the requested direction
    SteeringSaturated,
    /// Direction switch requested inside a straight run
    SwitchWhileLocked,
    /// Direction switch requested with non-zero steering
    SwitchWhileSteering,
    /// Not enough straight predecessors before a direction switch
    InsufficientHistory,
}

/// Child state computed for one accepted action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub pose: CandidatePose,
    /// Straight-lock counter of the child
    pub custom: u32,
    /// Non-negative edge cost
    pub cost: f64,
    pub direction_switch: bool,
}

/// Outcome of [`SteeringNeighborhood::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    Accepted(Candidate),
    Rejected(Rejection),
}

/// Result of walking the straight run-in before a direction switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunInCheck {
    /// Every required predecessor drives straight
    Clear,
    /// The predecessor chain is shorter than the run-in
    InsufficientHistory,
    /// A predecessor inside the run-in is steering
    CurvedHistory,
    /// A back-reference points to a node the repository does not know
    Corrupted(NodeId),
}

impl SteeringNeighborhood {
    /// Whether `action` is one of the two reserved actions of a root node
    pub fn is_initial_action(&self, action: Action) -> bool {
        action == Action::KeepForward || action == self.lead_in_action()
    }

    /// Root action slot carrying the straight reverse lead-in
    fn lead_in_action(&self) -> Action {
        if self.config.reversed {
            Action::LeftBackward
        } else {
            Action::KeepBackward
        }
    }

    /// Advance `reference` by one action with `step` steering increments.
    ///
    /// `store` resolves the predecessor chain of `reference`; a dangling
    /// back-reference inside the run-in is a fatal [`PlannerError::CorruptedGraph`].
    pub fn advance<S>(
        &self,
        store: &S,
        reference: &SteeringNode,
        action: Action,
        step: u32,
    ) -> PlannerResult<Advance>
    where
        S: NodeStore + ?Sized,
    {
        if !action.is_available(self.config.moves) {
            return Ok(Advance::Rejected(Rejection::Unavailable));
        }

        let initial = reference.is_initial();
        if initial && !self.is_initial_action(action) {
            return Ok(Advance::Rejected(Rejection::InitialAction));
        }

        if reference.custom > 0 && reference.steering_angle.abs() > MAX_STEER_ANGLE_FOR_STRAIGHT {
            return Ok(Advance::Rejected(Rejection::StraightLocked));
        }

        if initial && action == self.lead_in_action() {
            if step != 0 {
                return Ok(Advance::Rejected(Rejection::StepMismatch));
            }
            return Ok(Advance::Accepted(self.lead_in(reference)));
        }

        if step >= self.config.steer_steps {
            return Ok(Advance::Rejected(Rejection::StepMismatch));
        }
        let max_steer = self.config.max_steer;
        let delta = self.config.steer_step_deg * step as i32;
        let steering_angle = match action.steer_change() {
            SteerChange::Keep => {
                if step > 0 {
                    return Ok(Advance::Rejected(Rejection::StepMismatch));
                }
                reference.steering_angle
            }
            SteerChange::Right => {
                if step == 0 {
                    return Ok(Advance::Rejected(Rejection::StepMismatch));
                }
                if reference.steering_angle <= -max_steer {
                    return Ok(Advance::Rejected(Rejection::SteeringSaturated));
                }
                reference.steering_angle - delta
            }
            SteerChange::Left => {
                if step == 0 {
                    return Ok(Advance::Rejected(Rejection::StepMismatch));
                }
                if reference.steering_angle >= max_steer {
                    return Ok(Advance::Rejected(Rejection::SteeringSaturated));
                }
                reference.steering_angle + delta
            }
        };
        let steering_angle = steering_angle.max(-max_steer).min(max_steer);

        if reference.custom > 0 && steering_angle.abs() > MAX_STEER_ANGLE_FOR_STRAIGHT {
            return Ok(Advance::Rejected(Rejection::StraightLocked));
        }

        let forward = action.is_forward();
        let mut dir = if forward { 1.0 } else { -1.0 };
        if self.config.reversed {
            dir *= -1.0;
        }

        let direction_switch = reference.forward != forward;
        let custom = if direction_switch {
            if reference.custom > 0 {
                return Ok(Advance::Rejected(Rejection::SwitchWhileLocked));
            }
            if steering_angle.abs() > MAX_STEER_ANGLE_FOR_STRAIGHT {
                return Ok(Advance::Rejected(Rejection::SwitchWhileSteering));
            }
            match self.check_run_in(store, reference) {
                RunInCheck::Clear => {}
                RunInCheck::InsufficientHistory | RunInCheck::CurvedHistory => {
                    return Ok(Advance::Rejected(Rejection::InsufficientHistory));
                }
                RunInCheck::Corrupted(missing) => {
                    log::warn!("[Steering] predecessor {} missing during run-in walk", missing);
                    return Err(PlannerError::corrupted(
                        missing,
                        "predecessor chain references an unknown node",
                    ));
                }
            }
            self.straight_dir_switch - 1
        } else {
            reference.custom.saturating_sub(1)
        };

        let ds_map = self.params.distance_step_cells() * dir;
        let (dx, dy, dtheta) = match self.params.turning_radius_world(steering_angle) {
            None => (
                ds_map * reference.theta.cos(),
                ds_map * reference.theta.sin(),
                0.0,
            ),
            Some(r_world) => {
                let ds_world = self.params.distance_step_world() * dir;
                let r_map = self.params.world_to_cells(r_world);
                let dtheta = ds_world / r_world;
                let t = reference.theta + dtheta;
                (
                    r_map * (t.sin() - reference.theta.sin()),
                    r_map * (-t.cos() + reference.theta.cos()),
                    dtheta,
                )
            }
        };

        let mut cost = self.params.distance_step_cells();
        if !forward {
            cost *= PENALTY_BACKWARD;
        }
        if direction_switch {
            cost *= PENALTY_TURN;
        }

        Ok(Advance::Accepted(Candidate {
            pose: CandidatePose {
                x: reference.x + dx,
                y: reference.y + dy,
                theta: normalize_angle(reference.theta + dtheta),
                steering_angle,
                forward,
            },
            custom,
            cost,
            direction_switch,
        }))
    }

    /// Straight reverse segment of one look-ahead length out of the root.
    ///
    /// A reversed search grows from the goal, so the segment is laid out
    /// ahead of the root heading.
    fn lead_in(&self, reference: &SteeringNode) -> Candidate {
        let mut ds_map = -self.params.look_ahead_cells();
        if self.config.reversed {
            ds_map = -ds_map;
        }
        Candidate {
            pose: CandidatePose {
                x: reference.x + ds_map * reference.theta.cos(),
                y: reference.y + ds_map * reference.theta.sin(),
                theta: normalize_angle(reference.theta),
                steering_angle: 0,
                forward: false,
            },
            custom: 0,
            cost: ds_map.abs() * PENALTY_BACKWARD,
            direction_switch: false,
        }
    }

    /// Walk `straight_dir_switch - 1` predecessors of `reference` and check
    /// that all of them drive straight.
    pub fn check_run_in<S>(&self, store: &S, reference: &SteeringNode) -> RunInCheck
    where
        S: NodeStore + ?Sized,
    {
        let mut test = reference;
        for _ in 1..self.straight_dir_switch {
            let prev = match test.prev {
                Some(prev) => prev,
                None => return RunInCheck::InsufficientHistory,
            };
            test = match store.node(prev) {
                Some(node) => node,
                None => return RunInCheck::Corrupted(prev),
            };
            if test.steering_angle.abs() > MAX_STEER_ANGLE_FOR_STRAIGHT {
                return RunInCheck::CurvedHistory;
            }
        }
        RunInCheck::Clear
    }
}
