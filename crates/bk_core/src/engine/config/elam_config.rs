//! Sudden-target (Elam) ending

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ElamConfig {
    /// Turn the clock off late in the final period and play to a target score
    pub enabled: bool,
    /// Minutes left in the final period when the target is set (기본: 4.0)
    pub minutes: f64,
    /// Points added to the leading score to form the target (기본: 8)
    pub points: u32,
    /// Also play overtime periods to a target from the opening tip
    pub overtime: bool,
}

impl Default for ElamConfig {
    fn default() -> Self {
        Self { enabled: false, minutes: 4.0, points: 8, overtime: false }
    }
}
