use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Autopilot (SAS) modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AutopilotMode {
    #[default]
    Off,
    Assist,
    Stabilize,
    Hover,
    Land,
}

impl AutopilotMode {
    /// Indexed by the selector digit.
    pub const ALL: [AutopilotMode; 5] = [
        AutopilotMode::Off,
        AutopilotMode::Assist,
        AutopilotMode::Stabilize,
        AutopilotMode::Hover,
        AutopilotMode::Land,
    ];

    pub fn from_digit(digit: u8) -> Option<Self> {
        Self::ALL.get(digit as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            AutopilotMode::Off => "OFF",
            AutopilotMode::Assist => "assist",
            AutopilotMode::Stabilize => "stabilize",
            AutopilotMode::Hover => "hover",
            AutopilotMode::Land => "land",
        }
    }

    /// Modes running the shared attitude law. Manual input is boosted in
    /// these so the operator keeps authority over the automation.
    pub fn is_assisted(self) -> bool {
        matches!(
            self,
            AutopilotMode::Stabilize | AutopilotMode::Hover | AutopilotMode::Land
        )
    }
}

impl fmt::Display for AutopilotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown autopilot mode '{0}'")]
pub struct ParseModeError(pub String);

impl FromStr for AutopilotMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTrigger {
    /// Operator or harness selected a mode.
    Select(AutopilotMode),
    /// Landing law reports the vehicle is within the near-ground band.
    NearGround,
}

pub fn transition(mode: AutopilotMode, trigger: ModeTrigger) -> AutopilotMode {
    use AutopilotMode::*;
    match (mode, trigger) {
        (_, ModeTrigger::Select(next)) => next,
        (Land, ModeTrigger::NearGround) => Off,
        (current, ModeTrigger::NearGround) => current,
    }
}
