//! Controller lifecycle states.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where a controller version is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Setup is running or has not started yet.
    #[default]
    Installing,
    /// Setup finished; waiting to be activated.
    Waiting,
    /// Old stores are being removed.
    Activating,
    /// Intercepting requests.
    Active,
    /// Failed setup or superseded by a newer version.
    Redundant,
}

impl LifecycleState {
    /// Only an active controller intercepts requests.
    pub fn intercepts(self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Installing => "installing",
            Self::Waiting => "waiting",
            Self::Activating => "activating",
            Self::Active => "active",
            Self::Redundant => "redundant",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
