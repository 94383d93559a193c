//! Injection scenarios: shell command injection on the companion computer
//! and mission/parameter injection on the autopilot.

use crate::attack::{Attempt, AttackContext, AttackError, AttackUnit};
use crate::model::{DetailMap, Difficulty, FlightState, ScenarioMetadata, Tactic};
use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use tokio::time::{sleep, Duration};

/// Inject shell commands through the companion computer's web endpoint.
pub struct CommandInjection {
    ctx: AttackContext,
}

impl CommandInjection {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Command Injection".to_string(),
            tactic: Tactic::Injection,
            description: "Smuggle shell commands through an unsanitized companion-computer API parameter".to_string(),
            required_states: vec![FlightState::PreFlight, FlightState::PostFlight],
            difficulty: Difficulty::Intermediate,
            prerequisites: vec!["companion computer web API reachable".to_string()],
            targets: vec!["companion_computer".to_string()],
            estimated_duration: 3.0,
            stealth_level: "medium".to_string(),
            impact_level: "critical".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for CommandInjection {
    fn name(&self) -> &'static str {
        "CommandInjection"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::Injection
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(2000..4000))).await;

        let injected = self.ctx.rng.gen_bool(0.7);
        let mut iocs = Vec::new();
        if injected {
            iocs.push("COMMAND_INJECTED:id".to_string());
            if self.ctx.rng.gen_bool(0.6) {
                iocs.push("COMMAND_INJECTED:cat /etc/passwd".to_string());
            }
            iocs.push(format!("SHELL_UID:{}", if self.ctx.rng.gen_bool(0.4) { 0 } else { 1000 }));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.7));
        details.insert("payload_reflected".to_string(), json!(injected));

        Ok(Attempt {
            success: injected,
            iocs,
            details,
        })
    }
}

/// Rewrite the autopilot mission with attacker waypoints.
pub struct WaypointInjection {
    ctx: AttackContext,
}

impl WaypointInjection {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Waypoint Injection".to_string(),
            tactic: Tactic::Injection,
            description: "Upload a rogue mission item list that reroutes the autopilot mid-flight"
                .to_string(),
            required_states: vec![FlightState::AutopilotFlight],
            difficulty: Difficulty::Advanced,
            prerequisites: vec![
                "MAVLink endpoint identified".to_string(),
                "mission protocol unauthenticated".to_string(),
            ],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 3.5,
            stealth_level: "medium".to_string(),
            impact_level: "critical".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for WaypointInjection {
    fn name(&self) -> &'static str {
        "WaypointInjection"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::Injection
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(2500..4500))).await;

        let accepted = self.ctx.rng.gen_bool(0.6);
        let mut iocs = Vec::new();
        if accepted {
            let count = self.ctx.rng.gen_range(1..=6);
            for _ in 0..count {
                let lat = 47.0 + self.ctx.rng.gen_range(-0.2..0.2);
                let lon = 8.0 + self.ctx.rng.gen_range(-0.2..0.2);
                iocs.push(format!("WAYPOINT_INJECTED:{lat:.4},{lon:.4}"));
            }
            iocs.push(format!("MISSION_COUNT:{count}"));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.6));
        details.insert("mission_ack".to_string(), json!(accepted));

        Ok(Attempt {
            success: accepted,
            iocs,
            details,
        })
    }
}

/// Silently flip safety-critical autopilot parameters.
pub struct ParameterInjection {
    ctx: AttackContext,
}

impl ParameterInjection {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Parameter Injection".to_string(),
            tactic: Tactic::Injection,
            description: "Use PARAM_SET to disable failsafes and geofence checks without operator notice".to_string(),
            required_states: vec![FlightState::PreFlight, FlightState::AutopilotFlight],
            difficulty: Difficulty::Intermediate,
            prerequisites: vec!["MAVLink endpoint identified".to_string()],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 2.5,
            stealth_level: "high".to_string(),
            impact_level: "high".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for ParameterInjection {
    fn name(&self) -> &'static str {
        "ParameterInjection"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::Injection
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(2000..3500))).await;

        let written = self.ctx.rng.gen_bool(0.75);
        let mut iocs = Vec::new();
        if written {
            iocs.push("PARAM_SET:FS_THR_ENABLE=0".to_string());
            if self.ctx.rng.gen_bool(0.5) {
                iocs.push("PARAM_SET:FENCE_ENABLE=0".to_string());
            }
            if self.ctx.rng.gen_bool(0.3) {
                iocs.push("PARAM_SET:GPS_TYPE=0".to_string());
            }
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.75));
        details.insert("params_written".to_string(), json!(iocs.len()));

        Ok(Attempt {
            success: written,
            iocs,
            details,
        })
    }
}
