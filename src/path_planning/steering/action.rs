//! Discretized steering/driving actions

use crate::path_planning::steering::config::AllowedMoves;

/// Change applied to the steering angle by an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteerChange {
    Keep,
    Right,
    Left,
}

/// One motion primitive family, indexed like the expansion loop visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    KeepForward,
    RightForward,
    LeftForward,
    KeepBackward,
    RightBackward,
    LeftBackward,
}

const ALL_ACTIONS: [Action; 6] = [
    Action::KeepForward,
    Action::RightForward,
    Action::LeftForward,
    Action::KeepBackward,
    Action::RightBackward,
    Action::LeftBackward,
];

impl Action {
    /// Actions available for a move set, in index order
    pub fn all(moves: AllowedMoves) -> &'static [Action] {
        &ALL_ACTIONS[..moves.size()]
    }

    pub fn index(self) -> usize {
        match self {
            Action::KeepForward => 0,
            Action::RightForward => 1,
            Action::LeftForward => 2,
            Action::KeepBackward => 3,
            Action::RightBackward => 4,
            Action::LeftBackward => 5,
        }
    }

    pub fn is_forward(self) -> bool {
        self.index() < 3
    }

    pub fn steer_change(self) -> SteerChange {
        match self {
            Action::KeepForward | Action::KeepBackward => SteerChange::Keep,
            Action::RightForward | Action::RightBackward => SteerChange::Right,
            Action::LeftForward | Action::LeftBackward => SteerChange::Left,
        }
    }

    pub fn is_available(self, moves: AllowedMoves) -> bool {
        self.index() < moves.size()
    }
}
