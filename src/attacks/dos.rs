//! Denial-of-service scenarios against the telemetry link, Wi-Fi control
//! channel and onboard resources.

use crate::attack::{Attempt, AttackContext, AttackError, AttackUnit};
use crate::model::{DetailMap, Difficulty, FlightState, ScenarioMetadata, Tactic};
use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use tokio::time::{sleep, Duration};

/// Saturate the MAVLink telemetry port with junk traffic.
pub struct TelemetryFlood {
    ctx: AttackContext,
}

impl TelemetryFlood {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Telemetry Flood".to_string(),
            tactic: Tactic::DenialOfService,
            description: "Flood the ground-station telemetry port until legitimate packets drop"
                .to_string(),
            required_states: vec![
                FlightState::Takeoff,
                FlightState::AutopilotFlight,
                FlightState::ManualFlight,
            ],
            difficulty: Difficulty::Beginner,
            prerequisites: vec!["MAVLink endpoint identified".to_string()],
            targets: vec!["flight_controller".to_string(), "gcs".to_string()],
            estimated_duration: 4.5,
            stealth_level: "low".to_string(),
            impact_level: "high".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for TelemetryFlood {
    fn name(&self) -> &'static str {
        "TelemetryFlood"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::DenialOfService
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(3000..5500))).await;

        let degraded = self.ctx.rng.gen_bool(0.8);
        let mut iocs = Vec::new();
        if degraded {
            iocs.push(format!("FLOOD_PPS:{}", self.ctx.rng.gen_range(5_000..50_000)));
            iocs.push(format!("FLOOD_TARGET:{}:14550", self.ctx.target));
            iocs.push(format!("TELEMETRY_LOSS_PCT:{}", self.ctx.rng.gen_range(40..=100)));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.8));
        details.insert("link_saturated".to_string(), json!(degraded));

        Ok(Attempt {
            success: degraded,
            iocs,
            details,
        })
    }
}

/// Kick the ground station off the drone's access point.
pub struct WifiDeauth {
    ctx: AttackContext,
}

impl WifiDeauth {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Wi-Fi Deauthentication".to_string(),
            tactic: Tactic::DenialOfService,
            description: "Send forged 802.11 deauth frames to sever the controller's Wi-Fi session".to_string(),
            required_states: vec![
                FlightState::Takeoff,
                FlightState::AutopilotFlight,
                FlightState::ManualFlight,
            ],
            difficulty: Difficulty::Beginner,
            prerequisites: vec![
                "wireless adapter in monitor mode".to_string(),
                "drone BSSID known".to_string(),
            ],
            targets: vec!["companion_computer".to_string(), "gcs".to_string()],
            estimated_duration: 3.0,
            stealth_level: "low".to_string(),
            impact_level: "high".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for WifiDeauth {
    fn name(&self) -> &'static str {
        "WifiDeauth"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::DenialOfService
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(2000..3500))).await;

        let dropped = self.ctx.rng.gen_bool(0.85);
        let mut iocs = Vec::new();
        if dropped {
            iocs.push(format!("DEAUTH_FRAMES:{}", self.ctx.rng.gen_range(64..=512)));
            iocs.push(format!(
                "DEAUTH_BSSID:a0:14:3d:{:02x}:{:02x}:{:02x}",
                self.ctx.rng.gen::<u8>(),
                self.ctx.rng.gen::<u8>(),
                self.ctx.rng.gen::<u8>(),
            ));
            iocs.push("CLIENT_DROPPED:gcs".to_string());
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.85));
        details.insert("reconnect_observed".to_string(), json!(dropped && self.ctx.rng.gen_bool(0.7)));

        Ok(Attempt {
            success: dropped,
            iocs,
            details,
        })
    }
}

/// Force continuous high-load maneuvers to exhaust the battery early.
pub struct BatteryDrainAttack {
    ctx: AttackContext,
}

impl BatteryDrainAttack {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Battery Drain Attack".to_string(),
            tactic: Tactic::DenialOfService,
            description: "Trigger repeated loiter corrections that spike motor load and drain the pack".to_string(),
            required_states: vec![FlightState::AutopilotFlight],
            difficulty: Difficulty::Intermediate,
            prerequisites: vec!["command channel access".to_string()],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 5.0,
            stealth_level: "medium".to_string(),
            impact_level: "medium".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for BatteryDrainAttack {
    fn name(&self) -> &'static str {
        "BatteryDrainAttack"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::DenialOfService
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(4000..6000))).await;

        let draining = self.ctx.rng.gen_bool(0.6);
        let mut iocs = Vec::new();
        if draining {
            iocs.push("BATTERY_DRAIN:motor_load_spike".to_string());
            iocs.push(format!("PWR_DRAW_W:{}", self.ctx.rng.gen_range(180..420)));
            iocs.push(format!("BATTERY_PCT_LOST:{}", self.ctx.rng.gen_range(5..25)));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.6));
        details.insert("failsafe_triggered".to_string(), json!(draining && self.ctx.rng.gen_bool(0.3)));

        Ok(Attempt {
            success: draining,
            iocs,
            details,
        })
    }
}

/// Starve the autopilot's estimator tasks of CPU time.
pub struct CpuExhaustion {
    ctx: AttackContext,
}

impl CpuExhaustion {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "CPU Exhaustion".to_string(),
            tactic: Tactic::DenialOfService,
            description: "Hammer the companion computer's exposed services until estimator tasks starve".to_string(),
            required_states: vec![
                FlightState::PreFlight,
                FlightState::AutopilotFlight,
            ],
            difficulty: Difficulty::Intermediate,
            prerequisites: vec!["companion computer service reachable".to_string()],
            targets: vec!["companion_computer".to_string()],
            estimated_duration: 4.0,
            stealth_level: "medium".to_string(),
            impact_level: "high".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for CpuExhaustion {
    fn name(&self) -> &'static str {
        "CpuExhaustion"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::DenialOfService
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(3000..5000))).await;

        let load: u8 = self.ctx.rng.gen_range(40..=100);
        let starved = load > 85;
        let mut iocs = Vec::new();
        if starved {
            iocs.push(format!("CPU_LOAD_PCT:{load}"));
            iocs.push("PROC_STARVED:ekf2".to_string());
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.5));
        details.insert("peak_load_pct".to_string(), json!(load));

        Ok(Attempt {
            success: starved,
            iocs,
            details,
        })
    }
}
