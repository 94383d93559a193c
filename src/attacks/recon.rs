//! Reconnaissance scenarios.
//!
//! Passive and active discovery against the simulated drone: Wi-Fi
//! enumeration, MAVLink service probing and camera stream discovery.

use crate::attack::{Attempt, AttackContext, AttackError, AttackUnit};
use crate::model::{DetailMap, Difficulty, FlightState, ScenarioMetadata, Tactic};
use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use tokio::time::{sleep, Duration};

/// Enumerate drone Wi-Fi networks in range.
pub struct WifiNetworkDiscovery {
    ctx: AttackContext,
}

impl WifiNetworkDiscovery {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Wi-Fi Network Discovery".to_string(),
            tactic: Tactic::Reconnaissance,
            description: "Scan for drone access points and open Wi-Fi networks in range"
                .to_string(),
            required_states: FlightState::all().to_vec(),
            difficulty: Difficulty::Beginner,
            prerequisites: vec!["wireless adapter in monitor mode".to_string()],
            targets: vec!["companion_computer".to_string(), "gcs".to_string()],
            estimated_duration: 3.0,
            stealth_level: "high".to_string(),
            impact_level: "low".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for WifiNetworkDiscovery {
    fn name(&self) -> &'static str {
        "WifiNetworkDiscovery"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::Reconnaissance
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(2200..3400))).await;

        let networks = if self.ctx.rng.gen_bool(0.9) {
            self.ctx.rng.gen_range(1..=4)
        } else {
            0
        };

        let mut iocs = Vec::new();
        for n in 0..networks {
            let channel: u8 = self.ctx.rng.gen_range(1..=11);
            iocs.push(format!("WIFI_SSID:Drone_WiFi_{:04X}", self.ctx.rng.gen::<u16>()));
            iocs.push(format!(
                "WIFI_BSSID:a0:14:3d:{:02x}:{:02x}:{:02x}",
                self.ctx.rng.gen::<u8>(),
                self.ctx.rng.gen::<u8>(),
                n as u8,
            ));
            iocs.push(format!("WIFI_CHANNEL:{channel}"));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.9));
        details.insert("networks_found".to_string(), json!(networks));
        details.insert("open_auth".to_string(), json!(networks > 0 && self.ctx.rng.gen_bool(0.6)));

        Ok(Attempt {
            success: networks > 0,
            iocs,
            details,
        })
    }
}

/// Locate the drone itself on the network and fingerprint it.
pub struct DroneDiscovery {
    ctx: AttackContext,
}

impl DroneDiscovery {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Drone Discovery".to_string(),
            tactic: Tactic::Reconnaissance,
            description: "Sweep the target subnet for live drone hosts and fingerprint autopilot services".to_string(),
            required_states: FlightState::all().to_vec(),
            difficulty: Difficulty::Beginner,
            prerequisites: vec!["network access to drone subnet".to_string()],
            targets: vec!["flight_controller".to_string(), "companion_computer".to_string()],
            estimated_duration: 2.5,
            stealth_level: "medium".to_string(),
            impact_level: "low".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for DroneDiscovery {
    fn name(&self) -> &'static str {
        "DroneDiscovery"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::Reconnaissance
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(1500..3000))).await;

        let found = self.ctx.rng.gen_bool(0.85);
        let mut iocs = Vec::new();
        if found {
            iocs.push(format!("DRONE_IP:{}", self.ctx.target));
            iocs.push("MAVLINK_PORT:14550".to_string());
            let drone_type = ["ArduCopter", "PX4", "ArduPlane"][self.ctx.rng.gen_range(0..3)];
            iocs.push(format!("DRONE_TYPE:{drone_type}"));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.85));
        details.insert("hosts_swept".to_string(), json!(self.ctx.rng.gen_range(32..=254)));

        Ok(Attempt {
            success: found,
            iocs,
            details,
        })
    }
}

/// Enumerate exposed MAVLink endpoints and their dialect.
pub struct MavlinkServiceEnumeration {
    ctx: AttackContext,
}

impl MavlinkServiceEnumeration {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "MAVLink Service Enumeration".to_string(),
            tactic: Tactic::Reconnaissance,
            description: "Probe UDP/TCP MAVLink endpoints, system IDs and protocol version"
                .to_string(),
            required_states: FlightState::all().to_vec(),
            difficulty: Difficulty::Intermediate,
            prerequisites: vec![
                "network access to drone subnet".to_string(),
                "drone host identified".to_string(),
            ],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 3.0,
            stealth_level: "medium".to_string(),
            impact_level: "low".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for MavlinkServiceEnumeration {
    fn name(&self) -> &'static str {
        "MavlinkServiceEnumeration"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::Reconnaissance
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(2000..4000))).await;

        let endpoints = if self.ctx.rng.gen_bool(0.8) {
            self.ctx.rng.gen_range(1..=3)
        } else {
            0
        };

        let mut iocs = Vec::new();
        for _ in 0..endpoints {
            let port = [14550u16, 14551, 5760][self.ctx.rng.gen_range(0..3)];
            iocs.push(format!("MAVLINK_SERVICE:{}:udp/{port}", self.ctx.target));
        }
        if endpoints > 0 {
            iocs.push("MAVLINK_VERSION:2.0".to_string());
            iocs.push(format!("MAVLINK_SYSID:{}", self.ctx.rng.gen_range(1..=255)));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.8));
        details.insert("endpoints_found".to_string(), json!(endpoints));
        details.insert("heartbeat_observed".to_string(), json!(endpoints > 0));

        Ok(Attempt {
            success: endpoints > 0,
            iocs,
            details,
        })
    }
}

/// Find unauthenticated FPV/companion camera streams.
pub struct CameraStreamDiscovery {
    ctx: AttackContext,
}

impl CameraStreamDiscovery {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Camera Stream Discovery".to_string(),
            tactic: Tactic::Reconnaissance,
            description: "Locate RTSP/HTTP video endpoints exposed by the camera gimbal or companion computer".to_string(),
            required_states: vec![
                FlightState::Takeoff,
                FlightState::AutopilotFlight,
                FlightState::ManualFlight,
            ],
            difficulty: Difficulty::Beginner,
            prerequisites: vec!["network access to drone subnet".to_string()],
            targets: vec!["companion_computer".to_string()],
            estimated_duration: 2.5,
            stealth_level: "high".to_string(),
            impact_level: "low".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for CameraStreamDiscovery {
    fn name(&self) -> &'static str {
        "CameraStreamDiscovery"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::Reconnaissance
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(1800..3200))).await;

        let found = self.ctx.rng.gen_bool(0.75);
        let mut iocs = Vec::new();
        if found {
            iocs.push(format!("RTSP_STREAM:rtsp://{}:8554/live", self.ctx.target));
            let codec = ["h264", "h265", "mjpeg"][self.ctx.rng.gen_range(0..3)];
            iocs.push(format!("STREAM_CODEC:{codec}"));
            if self.ctx.rng.gen_bool(0.5) {
                iocs.push(format!("HTTP_SNAPSHOT:http://{}:8080/snapshot", self.ctx.target));
            }
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.75));
        details.insert("auth_required".to_string(), json!(!found));

        Ok(Attempt {
            success: found,
            iocs,
            details,
        })
    }
}
