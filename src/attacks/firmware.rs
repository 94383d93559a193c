//! Firmware attack scenarios: image extraction, malicious uploads and
//! bootloader exploitation.

use crate::attack::{Attempt, AttackContext, AttackError, AttackUnit};
use crate::model::{DetailMap, Difficulty, FlightState, ScenarioMetadata, Tactic};
use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use tokio::time::{sleep, Duration};

/// Dump the installed autopilot firmware image.
pub struct FirmwareExtraction {
    ctx: AttackContext,
}

impl FirmwareExtraction {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Firmware Extraction".to_string(),
            tactic: Tactic::FirmwareAttacks,
            description: "Read back the installed autopilot image over the maintenance interface for offline analysis".to_string(),
            required_states: vec![FlightState::PreFlight, FlightState::PostFlight],
            difficulty: Difficulty::Advanced,
            prerequisites: vec!["physical or maintenance-port access".to_string()],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 5.0,
            stealth_level: "medium".to_string(),
            impact_level: "medium".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for FirmwareExtraction {
    fn name(&self) -> &'static str {
        "FirmwareExtraction"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::FirmwareAttacks
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(4000..6000))).await;

        let dumped = self.ctx.rng.gen_bool(0.6);
        let mut iocs = Vec::new();
        if dumped {
            let minor = self.ctx.rng.gen_range(0..=6);
            iocs.push(format!("FIRMWARE_IMAGE:arducopter_4.{minor}.px4"));
            iocs.push(format!("FIRMWARE_BYTES:{}", self.ctx.rng.gen_range(800_000..2_000_000)));
            iocs.push(format!("BOARD_ID:{}", self.ctx.rng.gen_range(9..=140)));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.6));
        details.insert("readback_protected".to_string(), json!(!dumped));

        Ok(Attempt {
            success: dumped,
            iocs,
            details,
        })
    }
}

/// Flash a tampered image past signature checks.
pub struct MaliciousFirmwareUpload {
    ctx: AttackContext,
}

impl MaliciousFirmwareUpload {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Malicious Firmware Upload".to_string(),
            tactic: Tactic::FirmwareAttacks,
            description: "Flash a patched image onto a controller that skips signature verification".to_string(),
            required_states: vec![FlightState::PreFlight],
            difficulty: Difficulty::Advanced,
            prerequisites: vec![
                "firmware image extracted".to_string(),
                "unsigned boot path confirmed".to_string(),
            ],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 5.0,
            stealth_level: "low".to_string(),
            impact_level: "critical".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for MaliciousFirmwareUpload {
    fn name(&self) -> &'static str {
        "MaliciousFirmwareUpload"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::FirmwareAttacks
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(4000..6000))).await;

        let flashed = self.ctx.rng.gen_bool(0.45);
        let mut iocs = Vec::new();
        if flashed {
            iocs.push("FIRMWARE_UPLOADED:patched_image".to_string());
            iocs.push("BOOT_VERIFY:skipped".to_string());
            iocs.push(format!(
                "FIRMWARE_CRC:{:08x}",
                self.ctx.rng.gen::<u32>()
            ));
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.45));
        details.insert("signature_enforced".to_string(), json!(!flashed));

        Ok(Attempt {
            success: flashed,
            iocs,
            details,
        })
    }
}

/// Drop the controller into DFU mode and unlock the bootloader.
pub struct BootloaderExploit {
    ctx: AttackContext,
}

impl BootloaderExploit {
    pub fn create(ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Self { ctx })
    }

    pub fn scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Bootloader Exploit".to_string(),
            tactic: Tactic::FirmwareAttacks,
            description: "Force DFU mode through a crafted reboot sequence and unlock flash write access".to_string(),
            required_states: vec![FlightState::PreFlight, FlightState::PostFlight],
            difficulty: Difficulty::Advanced,
            prerequisites: vec![
                "physical or maintenance-port access".to_string(),
                "vulnerable bootloader revision".to_string(),
            ],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 4.5,
            stealth_level: "low".to_string(),
            impact_level: "critical".to_string(),
        }
    }
}

#[async_trait]
impl AttackUnit for BootloaderExploit {
    fn name(&self) -> &'static str {
        "BootloaderExploit"
    }

    fn attack_kind(&self) -> Tactic {
        Tactic::FirmwareAttacks
    }

    async fn attempt(&mut self) -> Result<Attempt, AttackError> {
        sleep(Duration::from_millis(self.ctx.rng.gen_range(3000..5500))).await;

        let unlocked = self.ctx.rng.gen_bool(0.4);
        let mut iocs = Vec::new();
        if unlocked {
            iocs.push("DFU_MODE:entered".to_string());
            iocs.push("BOOTLOADER:unlocked".to_string());
        }

        let mut details = DetailMap::new();
        details.insert("success_rate".to_string(), json!(0.4));
        details.insert(
            "bootloader_rev".to_string(),
            json!(format!("v{}", self.ctx.rng.gen_range(2..=5))),
        );

        Ok(Attempt {
            success: unlocked,
            iocs,
            details,
        })
    }
}
