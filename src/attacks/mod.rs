//! Curated attack scenario catalogue, organised by tactic.
//!
//! Every scenario is registered explicitly in [`register_builtin`]; there
//! is no runtime discovery.

pub mod dos;
pub mod exfiltration;
pub mod firmware;
pub mod injection;
pub mod recon;
pub mod tampering;

use crate::registry::AttackRegistry;

/// Register the full curated catalogue into `registry`.
pub fn register_builtin(registry: &mut AttackRegistry) {
    // Reconnaissance
    registry.register(
        "wifi_network_discovery",
        recon::WifiNetworkDiscovery::create,
        recon::WifiNetworkDiscovery::scenario(),
    );
    registry.register(
        "drone_discovery",
        recon::DroneDiscovery::create,
        recon::DroneDiscovery::scenario(),
    );
    registry.register(
        "mavlink_service_enumeration",
        recon::MavlinkServiceEnumeration::create,
        recon::MavlinkServiceEnumeration::scenario(),
    );
    registry.register(
        "camera_stream_discovery",
        recon::CameraStreamDiscovery::create,
        recon::CameraStreamDiscovery::scenario(),
    );

    // Protocol tampering
    registry.register(
        "mavlink_packet_injection",
        tampering::MavlinkPacketInjection::create,
        tampering::MavlinkPacketInjection::scenario(),
    );
    registry.register(
        "gps_spoofing",
        tampering::GpsSpoofing::create,
        tampering::GpsSpoofing::scenario(),
    );
    registry.register(
        "rc_link_hijack",
        tampering::RcLinkHijack::create,
        tampering::RcLinkHijack::scenario(),
    );

    // Denial of service
    registry.register(
        "telemetry_flood",
        dos::TelemetryFlood::create,
        dos::TelemetryFlood::scenario(),
    );
    registry.register(
        "wifi_deauth",
        dos::WifiDeauth::create,
        dos::WifiDeauth::scenario(),
    );
    registry.register(
        "battery_drain_attack",
        dos::BatteryDrainAttack::create,
        dos::BatteryDrainAttack::scenario(),
    );
    registry.register(
        "cpu_exhaustion",
        dos::CpuExhaustion::create,
        dos::CpuExhaustion::scenario(),
    );

    // Injection
    registry.register(
        "command_injection",
        injection::CommandInjection::create,
        injection::CommandInjection::scenario(),
    );
    registry.register(
        "waypoint_injection",
        injection::WaypointInjection::create,
        injection::WaypointInjection::scenario(),
    );
    registry.register(
        "parameter_injection",
        injection::ParameterInjection::create,
        injection::ParameterInjection::scenario(),
    );

    // Exfiltration
    registry.register(
        "flight_log_extraction",
        exfiltration::FlightLogExtraction::create,
        exfiltration::FlightLogExtraction::scenario(),
    );
    registry.register(
        "video_feed_interception",
        exfiltration::VideoFeedInterception::create,
        exfiltration::VideoFeedInterception::scenario(),
    );
    registry.register(
        "telemetry_exfiltration",
        exfiltration::TelemetryExfiltration::create,
        exfiltration::TelemetryExfiltration::scenario(),
    );

    // Firmware attacks
    registry.register(
        "firmware_extraction",
        firmware::FirmwareExtraction::create,
        firmware::FirmwareExtraction::scenario(),
    );
    registry.register(
        "malicious_firmware_upload",
        firmware::MaliciousFirmwareUpload::create,
        firmware::MaliciousFirmwareUpload::scenario(),
    );
    registry.register(
        "bootloader_exploit",
        firmware::BootloaderExploit::create,
        firmware::BootloaderExploit::scenario(),
    );
}
