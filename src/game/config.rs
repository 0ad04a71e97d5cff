//! Locomotion Configuration
//!
//! Per-actor tuning, fixed for the controller's lifetime. Loadable from
//! JSON; every field is optional and falls back to the defaults below.
//!
//! ```json
//! {
//!   "jump_force": 5.0,
//!   "move_speed": 5.0,
//!   "gravity": 15.0,
//!   "fall_speed_limit": null,
//!   "init_fall_speed": 2.0,
//!   "turn_smooth_time": 0.1,
//!   "ray_length": 1.0,
//!   "ray_offset": 0.0,
//!   "ground_mask": 4294967295,
//!   "landing_policy": "snap_overrides_jump"
//! }
//! ```
//!
//! `"fall_speed_limit": null` means unlimited.

use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::game::collision::LayerMask;
use crate::game::error::{LocomotionError, Result};

/// What happens when a jump and a landing edge land in the same step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingPolicy {
    /// Landing snap wins: the jump impulse is replaced by `-init_fall_speed`.
    #[default]
    SnapOverridesJump,
    /// A jump drained this step survives the landing edge.
    KeepSameStepJump,
}

/// Locomotion tuning for one actor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Upward velocity set by a jump
    pub jump_force: f32,
    /// Horizontal speed at full stick deflection
    pub move_speed: f32,
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Terminal fall speed magnitude (infinite = unlimited)
    #[serde(with = "unbounded")]
    pub fall_speed_limit: f32,
    /// Downward speed snapped to on landing
    pub init_fall_speed: f32,
    /// Turn smoothing time constant (seconds)
    pub turn_smooth_time: f32,
    /// Ground probe length
    pub ray_length: f32,
    /// Ground probe origin height above the actor's position
    pub ray_offset: f32,
    /// Layers the ground probe can hit
    pub ground_mask: LayerMask,
    /// Jump vs. landing resolution
    pub landing_policy: LandingPolicy,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            jump_force: 5.0,
            move_speed: 5.0,
            gravity: 15.0,
            fall_speed_limit: 10.0,
            init_fall_speed: 2.0,
            turn_smooth_time: 0.1,
            ray_length: 1.0,
            ray_offset: 0.0,
            ground_mask: LayerMask::ALL,
            landing_policy: LandingPolicy::SnapOverridesJump,
        }
    }
}

impl LocomotionConfig {
    /// Parse from a JSON string and validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file and validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<()> {
        non_negative("jump_force", self.jump_force)?;
        non_negative("move_speed", self.move_speed)?;
        non_negative("gravity", self.gravity)?;
        non_negative("init_fall_speed", self.init_fall_speed)?;
        non_negative("turn_smooth_time", self.turn_smooth_time)?;

        if self.fall_speed_limit.is_nan() || self.fall_speed_limit < 0.0 {
            return Err(invalid("fall_speed_limit", self.fall_speed_limit, "must be >= 0 or unlimited"));
        }
        if !self.ray_length.is_finite() || self.ray_length <= 0.0 {
            return Err(invalid("ray_length", self.ray_length, "must be finite and > 0"));
        }
        if !self.ray_offset.is_finite() {
            return Err(invalid("ray_offset", self.ray_offset, "must be finite"));
        }
        Ok(())
    }

    /// True when the fall speed is unlimited.
    pub fn fall_speed_unlimited(&self) -> bool {
        self.fall_speed_limit.is_infinite()
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, value, "must be finite and >= 0"));
    }
    Ok(())
}

fn invalid(field: &'static str, value: f32, rule: &str) -> LocomotionError {
    LocomotionError::InvalidConfig {
        field,
        reason: format!("{} (got {})", rule, value),
    }
}

/// JSON has no infinity; an unlimited value travels as `null`.
mod unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() && *value > 0.0 {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::INFINITY))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LocomotionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.jump_force, 5.0);
        assert_eq!(config.gravity, 15.0);
        assert_eq!(config.fall_speed_limit, 10.0);
        assert_eq!(config.init_fall_speed, 2.0);
        assert_eq!(config.turn_smooth_time, 0.1);
        assert_eq!(config.landing_policy, LandingPolicy::SnapOverridesJump);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LocomotionConfig::from_json_str(r#"{ "move_speed": 8.0, "ground_mask": 8 }"#).unwrap();
        assert_eq!(config.move_speed, 8.0);
        assert_eq!(config.ground_mask, LayerMask::layer(3));
        assert_eq!(config.jump_force, 5.0);
    }

    #[test]
    fn test_null_fall_limit_is_unlimited() {
        let config = LocomotionConfig::from_json_str(r#"{ "fall_speed_limit": null }"#).unwrap();
        assert!(config.fall_speed_unlimited());

        let json = config.to_json_pretty().unwrap();
        assert!(json.contains("\"fall_speed_limit\": null"));

        let back = LocomotionConfig::from_json_str(&json).unwrap();
        assert!(back.fall_speed_unlimited());
    }

    #[test]
    fn test_landing_policy_json() {
        let config = LocomotionConfig::from_json_str(r#"{ "landing_policy": "keep_same_step_jump" }"#).unwrap();
        assert_eq!(config.landing_policy, LandingPolicy::KeepSameStepJump);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = LocomotionConfig { gravity: -1.0, ..Default::default() };
        assert!(matches!(
            bad.validate(),
            Err(LocomotionError::InvalidConfig { field: "gravity", .. })
        ));

        let bad = LocomotionConfig { ray_length: 0.0, ..Default::default() };
        assert!(matches!(
            bad.validate(),
            Err(LocomotionError::InvalidConfig { field: "ray_length", .. })
        ));

        let bad = LocomotionConfig { move_speed: f32::NAN, ..Default::default() };
        assert!(bad.validate().is_err());

        let bad = LocomotionConfig { fall_speed_limit: -3.0, ..Default::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = LocomotionConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, LocomotionError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = LocomotionConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LocomotionError::Io(_)));
    }
}
