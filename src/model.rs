//! Core data model for attack scenarios and execution results.
//!
//! `ScenarioMetadata` is the immutable descriptive record stored in the
//! registry; `AttackResult` is the uniform record produced once per
//! execution by the wrapper in [`crate::attack`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Auxiliary key/value data attached to an attempt or result.
pub type DetailMap = HashMap<String, serde_json::Value>;

/// Broad category of an attack scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tactic {
    Reconnaissance,
    ProtocolTampering,
    DenialOfService,
    Injection,
    Exfiltration,
    FirmwareAttacks,
}

impl Tactic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tactic::Reconnaissance => "reconnaissance",
            Tactic::ProtocolTampering => "protocol_tampering",
            Tactic::DenialOfService => "denial_of_service",
            Tactic::Injection => "injection",
            Tactic::Exfiltration => "exfiltration",
            Tactic::FirmwareAttacks => "firmware_attacks",
        }
    }

    /// All tactics, in catalogue order
    pub fn all() -> [Tactic; 6] {
        [
            Tactic::Reconnaissance,
            Tactic::ProtocolTampering,
            Tactic::DenialOfService,
            Tactic::Injection,
            Tactic::Exfiltration,
            Tactic::FirmwareAttacks,
        ]
    }
}

impl std::fmt::Display for Tactic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Drone operational phase that gates which scenarios are applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightState {
    PreFlight,
    Takeoff,
    AutopilotFlight,
    ManualFlight,
    EmergencyRtl,
    PostFlight,
}

impl FlightState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightState::PreFlight => "pre_flight",
            FlightState::Takeoff => "takeoff",
            FlightState::AutopilotFlight => "autopilot_flight",
            FlightState::ManualFlight => "manual_flight",
            FlightState::EmergencyRtl => "emergency_rtl",
            FlightState::PostFlight => "post_flight",
        }
    }

    /// All flight states, in mission order
    pub fn all() -> [FlightState; 6] {
        [
            FlightState::PreFlight,
            FlightState::Takeoff,
            FlightState::AutopilotFlight,
            FlightState::ManualFlight,
            FlightState::EmergencyRtl,
            FlightState::PostFlight,
        ]
    }
}

impl std::fmt::Display for FlightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scenario difficulty rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

/// Immutable descriptive record for one attack scenario.
///
/// Stored in the registry alongside the scenario's constructor and never
/// mutated after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMetadata {
    /// Human-readable scenario title
    pub name: String,
    pub tactic: Tactic,
    pub description: String,
    /// Flight states under which the scenario is applicable (duplicate-free)
    pub required_states: Vec<FlightState>,
    pub difficulty: Difficulty,
    /// Descriptive only, not enforced
    pub prerequisites: Vec<String>,
    /// e.g. "flight_controller", "companion_computer", "gcs"
    pub targets: Vec<String>,
    /// Informational estimate, seconds
    pub estimated_duration: f64,
    /// Conventionally one of low/medium/high/critical
    pub stealth_level: String,
    pub impact_level: String,
}

impl ScenarioMetadata {
    /// Whether the scenario applies in the given flight state
    pub fn applies_in(&self, state: FlightState) -> bool {
        self.required_states.contains(&state)
    }
}

/// Terminal status of one attack execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackStatus {
    Success,
    Failed,
    Detected,
    Partial,
}

impl std::fmt::Display for AttackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttackStatus::Success => write!(f, "success"),
            AttackStatus::Failed => write!(f, "failed"),
            AttackStatus::Detected => write!(f, "detected"),
            AttackStatus::Partial => write!(f, "partial"),
        }
    }
}

/// Record of one completed attack execution.
///
/// Built exclusively by [`crate::attack::execute`] and never mutated after
/// return. Identifier collisions within the same second are tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackResult {
    /// Unit name + epoch seconds
    pub attack_id: String,
    pub attack_name: String,
    pub attack_type: Tactic,
    pub status: AttackStatus,
    /// In [0, 1]
    pub success_rate: f64,
    /// Wall-clock duration of the attempt, seconds
    pub response_time: f64,
    /// Unix epoch seconds at completion
    pub timestamp: f64,
    /// IP or identifier the attack ran against
    pub target: String,
    /// Free-form "TYPE:value" tokens
    pub iocs: Vec<String>,
    /// Carries "success_rate" when available and "error" on failed attempts
    pub details: DetailMap,
}

impl AttackResult {
    pub fn succeeded(&self) -> bool {
        self.status == AttackStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tactic_round_trip() {
        for tactic in Tactic::all() {
            let json = serde_json::to_string(&tactic).unwrap();
            let back: Tactic = serde_json::from_str(&json).unwrap();
            assert_eq!(tactic, back);
            assert_eq!(json.trim_matches('"'), tactic.as_str());
        }
    }

    #[test]
    fn test_scenario_applies_in() {
        let scenario = ScenarioMetadata {
            name: "Test".to_string(),
            tactic: Tactic::Reconnaissance,
            description: String::new(),
            required_states: vec![FlightState::PreFlight, FlightState::PostFlight],
            difficulty: Difficulty::Beginner,
            prerequisites: vec![],
            targets: vec![],
            estimated_duration: 1.0,
            stealth_level: "low".to_string(),
            impact_level: "low".to_string(),
        };
        assert!(scenario.applies_in(FlightState::PreFlight));
        assert!(!scenario.applies_in(FlightState::Takeoff));
    }
}
