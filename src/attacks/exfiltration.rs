//! Exfiltration scenarios: flight logs, live video and telemetry capture.

use crate::attack::{Attempt, AttackContext, AttackError, AttackUnit};
use crate::model::{DetailMap, Difficulty, FlightState, ScenarioMetadata, Tactic};
use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use tokio::time::{sleep, Duration};

/// Pull dataflash logs off the flight controller.
pub struct FlightLogExtraction {
    ctx: AttackContext,
}

impl FlightLogExtraction {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Flight Log Extraction".to_string(),
            tactic: Tactic::Exfiltration,
            description: "Download dataflash logs over the log-transfer protocol, exposing home location and mission history".to_string(),
            required_states: vec![FlightState::PreFlight, FlightState::PostFlight],
            difficulty: Difficulty::Intermediate,
            prerequisites: vec!["MAVLink endpoint identified".to_string()],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 4.0,
            stealth_level: "medium".to_string(),
            impact_level: "medium".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for FlightLogExtraction {
    fn name(&self) -> &'static str {
        "FlightLogExtraction"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::Exfiltration
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(3000..5000))).await;

        let logs = if self.ctx.rng.gen_bool(0.8) {
            self.ctx.rng.gen_range(1..=5)
        } else {
            0
        };

        let mut iocs = Vec::new();
        for n in 0..logs {
            iocs.push(format!("LOG_FILE:log_{:03}.bin", n + 1));
        }
        if logs > 0 {
            iocs.push(format!("LOG_BYTES:{}", self.ctx.rng.gen_range(100_000..8_000_000)));
            let lat = 47.0 + self.ctx.rng.gen_range(-0.5..0.5);
            let lon = 8.0 + self.ctx.rng.gen_range(-0.5..0.5);
            iocs.push(format!("HOME_COORD:{lat:.4},{lon:.4}"));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.8));
        details.insert("logs_extracted".to_string(), json!(logs));

        Ok(Attempt {
            success: logs > 0,
            iocs,
            details,
        })
    }
}

/// Tap the live FPV feed.
pub struct VideoFeedInterception {
    ctx: AttackContext,
}

impl VideoFeedInterception {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Video Feed Interception".to_string(),
            tactic: Tactic::Exfiltration,
            description: "Attach to the unencrypted RTSP feed and record frames in transit"
                .to_string(),
            required_states: vec![
                FlightState::Takeoff,
                FlightState::AutopilotFlight,
                FlightState::ManualFlight,
            ],
            difficulty: Difficulty::Beginner,
            prerequisites: vec!["camera stream endpoint known".to_string()],
            targets: vec!["companion_computer".to_string()],
            estimated_duration: 3.0,
            stealth_level: "high".to_string(),
            impact_level: "medium".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for VideoFeedInterception {
    fn name(&self) -> &'static str {
        "VideoFeedInterception"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::Exfiltration
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(2500..4000))).await;

        let attached = self.ctx.rng.gen_bool(0.75);
        let mut iocs = Vec::new();
        if attached {
            iocs.push(format!("VIDEO_FEED:rtsp://{}:8554/live", self.ctx.target));
            iocs.push(format!("FRAMES_CAPTURED:{}", self.ctx.rng.gen_range(100..3000)));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.75));
        details.insert("stream_encrypted".to_string(), json!(!attached));

        Ok(Attempt {
            success: attached,
            iocs,
            details,
        })
    }
}

/// Record the position/attitude telemetry stream.
pub struct TelemetryExfiltration {
    ctx: AttackContext,
}

impl TelemetryExfiltration {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Telemetry Exfiltration".to_string(),
            tactic: Tactic::Exfiltration,
            description: "Passively record the broadcast MAVLink stream to reconstruct the flight track".to_string(),
            required_states: vec![
                FlightState::Takeoff,
                FlightState::AutopilotFlight,
                FlightState::ManualFlight,
                FlightState::EmergencyRtl,
            ],
            difficulty: Difficulty::Beginner,
            prerequisites: vec!["network access to drone subnet".to_string()],
            targets: vec!["flight_controller".to_string(), "gcs".to_string()],
            estimated_duration: 3.0,
            stealth_level: "high".to_string(),
            impact_level: "low".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for TelemetryExfiltration {
    fn name(&self) -> &'static str {
        "TelemetryExfiltration"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::Exfiltration
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(2000..4000))).await;

        let points = if self.ctx.rng.gen_bool(0.85) {
            self.ctx.rng.gen_range(50..2000)
        } else {
            0
        };

        let mut iocs = Vec::new();
        if points > 0 {
            iocs.push("TELEMETRY_STREAM:mavlink_udp_broadcast".to_string());
            iocs.push(format!("GPS_TRACK_POINTS:{points}"));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.85));
        details.insert("track_points".to_string(), json!(points));

        Ok(Attempt {
            success: points > 0,
            iocs,
            details,
        })
    }
}
