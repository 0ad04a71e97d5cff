//! Animation Parameters
//!
//! Reference [`AnimationDriver`] that keeps named animator parameters, the
//! way an animation state machine would read them.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::game::collision::AnimationDriver;

/// Float parameter carrying the locomotion speed.
pub const SPEED_PARAM: &str = "Speed";

/// Bool parameter carrying the airborne flag.
pub const AIRBORNE_PARAM: &str = "isJump";

/// One animator parameter value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AnimParam {
    /// Float parameter
    Float(f32),
    /// Bool parameter
    Bool(bool),
}

/// Named animator parameters plus a write counter.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnimatorParameters {
    params: BTreeMap<String, AnimParam>,
    writes: u64,
}

impl AnimatorParameters {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a float parameter.
    pub fn set_float(&mut self, name: &str, value: f32) {
        self.params.insert(name.to_owned(), AnimParam::Float(value));
        self.writes += 1;
    }

    /// Set a bool parameter.
    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.params.insert(name.to_owned(), AnimParam::Bool(value));
        self.writes += 1;
    }

    /// Float parameter, if set as a float.
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.params.get(name) {
            Some(AnimParam::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Bool parameter, if set as a bool.
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.params.get(name) {
            Some(AnimParam::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Current speed, 0 if never set.
    pub fn speed(&self) -> f32 {
        self.float(SPEED_PARAM).unwrap_or(0.0)
    }

    /// Current airborne flag, false if never set.
    pub fn airborne(&self) -> bool {
        self.bool(AIRBORNE_PARAM).unwrap_or(false)
    }

    /// Total parameter writes.
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

impl AnimationDriver for AnimatorParameters {
    fn set_speed(&mut self, speed: f32) {
        self.set_float(SPEED_PARAM, speed);
    }

    fn set_airborne(&mut self, airborne: bool) {
        self.set_bool(AIRBORNE_PARAM, airborne);
    }
}

// =============================================================================
// TESTS
// =============================================================================
