//! Protocol tampering scenarios: MAVLink injection, GPS spoofing and RC
//! link takeover.

use crate::attack::{Attempt, AttackContext, AttackError, AttackUnit};
use crate::model::{DetailMap, Difficulty, FlightState, ScenarioMetadata, Tactic};
use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use tokio::time::{sleep, Duration};

/// Inject forged MAVLink messages into the telemetry link.
pub struct MavlinkPacketInjection {
    ctx: AttackContext,
}

impl MavlinkPacketInjection {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "MAVLink Packet Injection".to_string(),
            tactic: Tactic::ProtocolTampering,
            description: "Forge unsigned MAVLink messages with a spoofed system ID to alter autopilot state".to_string(),
            required_states: vec![
                FlightState::Takeoff,
                FlightState::AutopilotFlight,
                FlightState::ManualFlight,
            ],
            difficulty: Difficulty::Intermediate,
            prerequisites: vec![
                "MAVLink endpoint identified".to_string(),
                "message signing disabled on target".to_string(),
            ],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 3.5,
            stealth_level: "medium".to_string(),
            impact_level: "high".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for MavlinkPacketInjection {
    fn name(&self) -> &'static str {
        "MavlinkPacketInjection"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::ProtocolTampering
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(2500..4500))).await;

        let accepted = self.ctx.rng.gen_bool(0.7);
        let mut iocs = Vec::new();
        if accepted {
            for msg in ["HEARTBEAT", "SET_MODE", "COMMAND_LONG"] {
                if self.ctx.rng.gen_bool(0.8) {
                    iocs.push(format!("MAVLINK_INJECTED:{msg}"));
                }
            }
            iocs.push(format!("MAVLINK_SEQ_GAP:{}", self.ctx.rng.gen_range(2..40)));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.7));
        details.insert("spoofed_sysid".to_string(), json!(self.ctx.rng.gen_range(1..=255)));
        details.insert("signing_enforced".to_string(), json!(!accepted));

        Ok(Attempt {
            success: accepted && !iocs.is_empty(),
            iocs,
            details,
        })
    }
}

/// Feed counterfeit GPS coordinates to drag the drone off course.
pub struct GpsSpoofing {
    ctx: AttackContext,
}

impl GpsSpoofing {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "GPS Spoofing".to_string(),
            tactic: Tactic::ProtocolTampering,
            description: "Broadcast counterfeit GNSS signals to displace the drone's position estimate".to_string(),
            required_states: vec![
                FlightState::AutopilotFlight,
                FlightState::EmergencyRtl,
            ],
            difficulty: Difficulty::Advanced,
            prerequisites: vec![
                "SDR transmitter in range".to_string(),
                "clear view of target flight path".to_string(),
            ],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 4.0,
            stealth_level: "low".to_string(),
            impact_level: "critical".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for GpsSpoofing {
    fn name(&self) -> &'static str {
        "GpsSpoofing"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::ProtocolTampering
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(3000..5000))).await;

        let locked = self.ctx.rng.gen_bool(0.65);
        let mut iocs = Vec::new();
        if locked {
            let lat = 47.0 + self.ctx.rng.gen_range(-0.5..0.5);
            let lon = 8.0 + self.ctx.rng.gen_range(-0.5..0.5);
            iocs.push(format!("GPS_SPOOF:TARGET_{lat:.4},{lon:.4}"));
            iocs.push(format!("GPS_DRIFT_M:{}", self.ctx.rng.gen_range(50..800)));
            iocs.push(format!("GPS_SAT_COUNT:{}", self.ctx.rng.gen_range(8..=14)));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.65));
        details.insert("ekf_rejected".to_string(), json!(!locked));

        Ok(Attempt {
            success: locked,
            iocs,
            details,
        })
    }
}

/// Take over the 2.4 GHz RC control link.
pub struct RcLinkHijack {
    ctx: AttackContext,
}

impl RcLinkHijack {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "RC Link Hijack".to_string(),
            tactic: Tactic::ProtocolTampering,
            description: "Lock onto the RC frequency-hopping pattern and override stick inputs"
                .to_string(),
            required_states: vec![FlightState::ManualFlight],
            difficulty: Difficulty::Advanced,
            prerequisites: vec!["RC protocol identified".to_string()],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 3.5,
            stealth_level: "low".to_string(),
            impact_level: "critical".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for RcLinkHijack {
    fn name(&self) -> &'static str {
        "RcLinkHijack"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::ProtocolTampering
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(2500..4000))).await;

        let locked = self.ctx.rng.gen_bool(0.55);
        let mut iocs = Vec::new();
        if locked {
            iocs.push("RC_LINK:frequency_hop_locked".to_string());
            iocs.push("RC_OVERRIDE:channels_1_4".to_string());
            iocs.push(format!("RC_PROTOCOL:{}", ["DSMX", "FrSky_D16", "ELRS"][self.ctx.rng.gen_range(0..3)]));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.55));
        details.insert("hop_pattern_synced".to_string(), json!(locked));

        Ok(Attempt {
            success: locked,
            iocs,
            details,
        })
    }
}
