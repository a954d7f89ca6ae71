//! Steering neighborhood configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{PlannerError, PlannerResult};

/// Cost multiplier for driving backwards
pub const PENALTY_BACKWARD: f64 = 2.5;
/// Cost multiplier for an edge that switches the driving direction
pub const PENALTY_TURN: f64 = 4.0;

/// Default location for the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "configs/steering.yaml";

/// Set of motion primitives available per expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllowedMoves {
    /// keep / right / left, forward only
    Forward,
    /// keep / right / left in both directions
    ForwardBackward,
}

impl AllowedMoves {
    /// Number of action indices
    pub fn size(self) -> usize {
        match self {
            AllowedMoves::Forward => 3,
            AllowedMoves::ForwardBackward => 6,
        }
    }
}

/// Configuration of the steering motion model.
///
/// Distances are given in grid cells unless noted otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Edge length of one action [cells]
    pub distance: u32,
    /// Number of steering discretization levels per action
    pub steer_steps: u32,
    /// Steering change per discretization level [deg]
    pub steer_step_deg: i32,
    /// Maximum steering magnitude [deg]
    pub max_steer: i32,
    /// Look-ahead / wheelbase length [cm]
    pub look_ahead: u32,
    pub moves: AllowedMoves,
    /// Search runs from the goal towards the start
    pub reversed: bool,
    /// Straight steps required around a direction switch.
    /// Derived from `look_ahead / distance` when absent.
    pub straight_dir_switch: Option<u32>,
    /// Map resolution [m/cell]
    pub resolution: f64,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            distance: 10,
            steer_steps: 3,
            steer_step_deg: 5,
            max_steer: 30,
            look_ahead: 250,
            moves: AllowedMoves::ForwardBackward,
            reversed: false,
            straight_dir_switch: None,
            resolution: 0.1,
        }
    }
}

impl SteeringConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> PlannerResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from the default config path, falling back to defaults
    pub fn load_default() -> PlannerResult<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> PlannerResult<Self> {
        let config: SteeringConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Look-ahead length [m]
    pub fn look_ahead_m(&self) -> f64 {
        self.look_ahead as f64 / 100.0
    }

    /// Straight steps required around a direction switch
    pub fn straight_dir_switch(&self) -> u32 {
        self.straight_dir_switch.unwrap_or_else(|| {
            (self.look_ahead as f64 / self.distance.max(1) as f64).round() as u32
        })
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if self.distance == 0 {
            return Err(PlannerError::InvalidParameter(
                "distance must be at least one cell".to_string(),
            ));
        }
        if self.steer_steps == 0 {
            return Err(PlannerError::InvalidParameter(
                "steer_steps must be positive".to_string(),
            ));
        }
        if self.steer_step_deg <= 0 {
            return Err(PlannerError::InvalidParameter(format!(
                "steer_step_deg must be positive, got {}",
                self.steer_step_deg
            )));
        }
        if self.max_steer <= 0 || self.max_steer >= 90 {
            return Err(PlannerError::InvalidParameter(format!(
                "max_steer must lie in (0, 90) degrees, got {}",
                self.max_steer
            )));
        }
        // bounds steer_steps below max_steer, so every step fits an i32
        let max_delta = i64::from(self.steer_step_deg).checked_mul(i64::from(self.steer_steps));
        if max_delta.map_or(true, |delta| delta > i64::from(self.max_steer)) {
            return Err(PlannerError::InvalidParameter(format!(
                "max steer is too small: {} steps of {} deg exceed {} deg",
                self.steer_steps, self.steer_step_deg, self.max_steer
            )));
        }
        if self.look_ahead == 0 {
            return Err(PlannerError::InvalidParameter(
                "look_ahead must be positive".to_string(),
            ));
        }
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        if self.straight_dir_switch() < 1 {
            return Err(PlannerError::InvalidParameter(format!(
                "straight_dir_switch must be at least 1 (look_ahead {} / distance {})",
                self.look_ahead, self.distance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SteeringConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.straight_dir_switch(), 25);
        assert!((config.look_ahead_m() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_max_steer_too_small() {
        let config = SteeringConfig {
            steer_steps: 4,
            steer_step_deg: 10,
            max_steer: 30,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PlannerError::InvalidParameter(_)));
    }

    #[test]
    fn test_steering_product_may_equal_max() {
        let config = SteeringConfig {
            steer_steps: 6,
            steer_step_deg: 5,
            max_steer: 30,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_straight_dir_switch_override() {
        let config = SteeringConfig {
            straight_dir_switch: Some(3),
            ..Default::default()
        };
        assert_eq!(config.straight_dir_switch(), 3);
    }

    #[test]
    fn test_zero_straight_dir_switch_rejected() {
        let config = SteeringConfig {
            look_ahead: 4,
            ..Default::default()
        };
        assert_eq!(config.straight_dir_switch(), 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_resolution() {
        let config = SteeringConfig {
            resolution: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = "distance: 5\nmoves: FORWARD\nreversed: true\n";
        let config = SteeringConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.distance, 5);
        assert_eq!(config.moves, AllowedMoves::Forward);
        assert!(config.reversed);
        assert_eq!(config.steer_steps, 3);
        assert_eq!(config.straight_dir_switch(), 50);
    }

    #[test]
    fn test_from_yaml_rejects_invalid() {
        let yaml = "steer_steps: 10\nsteer_step_deg: 5\nmax_steer: 30\n";
        assert!(matches!(
            SteeringConfig::from_yaml(yaml),
            Err(PlannerError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_yaml_rejects_huge_steer_steps() {
        let yaml = "steer_steps: 4294967295\nsteer_step_deg: 5\nmax_steer: 30\n";
        assert!(matches!(
            SteeringConfig::from_yaml(yaml),
            Err(PlannerError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_yaml_rejects_huge_steer_step() {
        let yaml = "steer_steps: 2\nsteer_step_deg: 2000000000\nmax_steer: 30\n";
        assert!(matches!(
            SteeringConfig::from_yaml(yaml),
            Err(PlannerError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_zero_steer_step_rejected() {
        let config = SteeringConfig {
            steer_step_deg: 0,
            steer_steps: 1000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml_parse_error() {
        assert!(matches!(
            SteeringConfig::from_yaml("distance: [1, 2"),
            Err(PlannerError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_moves_size() {
        assert_eq!(AllowedMoves::Forward.size(), 3);
        assert_eq!(AllowedMoves::ForwardBackward.size(), 6);
    }
}
