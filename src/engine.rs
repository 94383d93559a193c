//! DvdLite - the attack execution engine.
//!
//! Ties the curated registry, the execution wrapper, an optional CTI sink
//! and the result log together behind one entry point. Name resolution is
//! two-tier: the curated registry is consulted first, then the ad-hoc map
//! of attacks registered at runtime.

use crate::attack::{self, AttackConstructor, AttackContext};
use crate::config::EngineConfig;
use crate::cti::CtiCollector;
use crate::errors::{DvdError, DvdResult};
use crate::model::AttackResult;
use crate::registry::AttackRegistry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::collections::HashMap;
use tokio::time::{sleep, Duration};

/// Single entry point for running attacks and collecting results.
pub struct DvdLite {
    registry: AttackRegistry,
    adhoc: HashMap<String, AttackConstructor>,
    results: Vec<AttackResult>,
    cti: Option<CtiCollector>,
    config: EngineConfig,
    rng: StdRng,
}

impl DvdLite {
    /// Engine with an entropy-seeded RNG, unless the config pins a seed.
    pub fn new(registry: AttackRegistry, config: EngineConfig) -> Self {
        let rng = match config.attacks.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            registry,
            adhoc: HashMap::new(),
            results: Vec::new(),
            cti: None,
            config,
            rng,
        }
    }

    /// Engine with a fixed seed for reproducible outcomes.
    pub fn with_seed(registry: AttackRegistry, config: EngineConfig, seed: u64) -> Self {
        let mut engine = Self::new(registry, config);
        engine.rng = StdRng::seed_from_u64(seed);
        engine
    }

    /// Register an ad-hoc attack outside the curated catalogue. Consulted
    /// after the curated registry during name resolution.
    pub fn register_attack(&mut self, name: &str, constructor: AttackConstructor) {
        log::debug!("registering ad-hoc attack '{name}'");
        self.adhoc.insert(name.to_string(), constructor);
    }

    /// Register the single CTI sink; replaces any previous collector.
    pub fn register_cti_collector(&mut self, collector: CtiCollector) {
        if self.cti.is_some() {
            log::warn!("replacing previously registered CTI collector");
        }
        self.cti = Some(collector);
    }

    pub fn cti_collector(&self) -> Option<&CtiCollector> {
        self.cti.as_ref()
    }

    pub fn registry(&self) -> &AttackRegistry {
        &self.registry
    }

    /// Completed results, in execution order
    pub fn results(&self) -> &[AttackResult] {
        &self.results
    }

    /// Union of curated and ad-hoc attack names, sorted and de-duplicated.
    pub fn list_attacks(&self) -> Vec<String> {
        let mut names = self.registry.list_names();
        names.extend(self.adhoc.keys().cloned());
        names.sort();
        names.dedup();
        names
    }

    /// Scenario details for one attack. Prefers curated metadata; falls
    /// back to introspecting the ad-hoc constructor via a probe instance.
    /// Unknown names yield an empty map.
    pub fn get_attack_info(&self, name: &str) -> serde_json::Value {
        if let Some(scenario) = self.registry.scenario(name) {
            return json!({
                "name": name,
                "source": "curated",
                "scenario": scenario,
            });
        }
        if let Some(constructor) = self.adhoc.get(name) {
            let probe = constructor(AttackContext::new("probe", 0));
            return json!({
                "name": name,
                "source": "ad-hoc",
                "class": probe.name(),
                "tactic": probe.attack_kind(),
            });
        }
        json!({})
    }

    /// Run one attack against the configured target.
    pub async fn run_attack(&mut self, name: &str) -> DvdResult<AttackResult> {
        let target = self.config.target.ip.clone();
        self.run_attack_on(name, &target).await
    }

    /// Run one attack against an explicit target, overriding the config.
    ///
    /// Lookup failures return an error enumerating the available names and
    /// append nothing to the result log. CTI ingestion failures are logged
    /// and never affect the returned result.
    pub async fn run_attack_on(&mut self, name: &str, target: &str) -> DvdResult<AttackResult> {
        let constructor = self
            .registry
            .constructor(name)
            .or_else(|| self.adhoc.get(name).copied())
            .ok_or_else(|| DvdError::UnknownAttack {
                name: name.to_string(),
                available: self.list_attacks(),
            })?;

        log::info!("running '{name}' against {target}");
        let mut unit = constructor(AttackContext::new(target, self.rng.gen()));
        let result = attack::execute(unit.as_mut(), target).await;
        log::info!(
            "'{name}' finished: {} in {:.2}s ({} IOCs)",
            result.status,
            result.response_time,
            result.iocs.len()
        );

        self.results.push(result.clone());

        if let Some(cti) = self.cti.as_mut() {
            if let Err(err) = cti.collect_from_result(&result).await {
                log::warn!("CTI ingestion failed for {}: {err}", result.attack_id);
            }
        }

        Ok(result)
    }

    /// Run a batch sequentially with the configured inter-attack delay.
    /// Individual failures (including lookup failures) are logged and
    /// skipped; the batch always continues.
    pub async fn run_multiple_attacks<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<AttackResult> {
        let delay = Duration::from_secs_f64(self.config.attacks.delay_between.max(0.0));
        let mut results = Vec::with_capacity(names.len());

        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if i > 0 {
                sleep(delay).await;
            }
            match self.run_attack(name).await {
                Ok(result) => results.push(result),
                Err(err) => log::warn!("skipping '{name}': {err}"),
            }
        }

        results
    }

    /// Aggregate view over the result log.
    pub fn get_summary(&self) -> serde_json::Value {
        if self.results.is_empty() {
            return json!({ "message": "no attacks executed yet" });
        }

        let total = self.results.len();
        let successful = self.results.iter().filter(|r| r.succeeded()).count();
        let avg_response: f64 =
            self.results.iter().map(|r| r.response_time).sum::<f64>() / total as f64;

        json!({
            "total_attacks": total,
            "successful_attacks": successful,
            "success_rate": format!("{:.1}%", successful as f64 / total as f64 * 100.0),
            "avg_response_time": format!("{avg_response:.2}s"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::{Attempt, AttackError, AttackUnit};
    use crate::model::{AttackStatus, DetailMap, Tactic};
    use async_trait::async_trait;

    struct AlwaysSucceeds;

    #[async_trait]
    impl AttackUnit for AlwaysSucceeds {
        fn name(&self) -> &'static str {
            "AlwaysSucceeds"
        }

        fn attack_kind(&self) -> Tactic {
            Tactic::Reconnaissance
        }

        async fn attempt(&mut self) -> Result<Attempt, AttackError> {
            let mut details = DetailMap::new();
            details.insert("success_rate".to_string(), json!(1.0));
            Ok(Attempt {
                success: true,
                iocs: vec!["PROBE:ok".to_string()],
                details,
            })
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl AttackUnit for AlwaysFails {
        fn name(&self) -> &'static str {
            "AlwaysFails"
        }

        fn attack_kind(&self) -> Tactic {
            Tactic::Injection
        }

        async fn attempt(&mut self) -> Result<Attempt, AttackError> {
            Ok(Attempt::default())
        }
    }

    fn succeeds(_ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(AlwaysSucceeds)
    }

    fn fails(_ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(AlwaysFails)
    }

    fn engine() -> DvdLite {
        DvdLite::with_seed(AttackRegistry::builtin(), EngineConfig::default(), 7)
    }

    #[tokio::test(start_paused = true)]
    async fn test_wifi_discovery_end_to_end() {
        let mut engine = engine();
        let result = engine.run_attack("wifi_network_discovery").await.unwrap();

        assert_eq!(result.attack_name, "WifiNetworkDiscovery");
        assert_eq!(result.target, "10.13.0.2");
        assert!(
            result.response_time >= 2.0 && result.response_time <= 4.0,
            "simulated delay out of range: {}",
            result.response_time
        );
        if result.status == AttackStatus::Success {
            assert!(!result.iocs.is_empty());
        }
        assert_eq!(engine.results().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_name_fails_and_logs_nothing() {
        let mut engine = engine();
        let err = engine.run_attack("does_not_exist").await.unwrap_err();
        match err {
            DvdError::UnknownAttack { name, available } => {
                assert_eq!(name, "does_not_exist");
                assert!(available.contains(&"gps_spoofing".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(engine.results().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_preserves_order() {
        let mut engine = engine();
        let results = engine
            .run_multiple_attacks(&["wifi_network_discovery", "gps_spoofing"])
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].attack_name, "WifiNetworkDiscovery");
        assert_eq!(results[1].attack_name, "GpsSpoofing");
        for result in &results {
            assert!(result.response_time >= 0.0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_skips_unknown_names() {
        let mut engine = engine();
        let results = engine
            .run_multiple_attacks(&["bogus", "wifi_network_discovery"])
            .await;
        assert_eq!(results.len(), 1);
        assert_eq!(engine.results().len(), 1);
    }

    #[tokio::test]
    async fn test_summary_formats_success_rate() {
        let mut engine = engine();
        engine.register_attack("ok", succeeds);
        engine.register_attack("ko", fails);

        for name in ["ok", "ok", "ok", "ko"] {
            engine.run_attack(name).await.unwrap();
        }

        let summary = engine.get_summary();
        assert_eq!(summary["total_attacks"], json!(4));
        assert_eq!(summary["successful_attacks"], json!(3));
        assert_eq!(summary["success_rate"], json!("75.0%"));
        assert!(summary["avg_response_time"].as_str().unwrap().ends_with('s'));
    }

    #[tokio::test]
    async fn test_empty_summary_has_message() {
        let engine = engine();
        let summary = engine.get_summary();
        assert!(summary["message"].is_string());
    }

    #[tokio::test]
    async fn test_adhoc_resolution_after_curated() {
        let mut engine = engine();
        engine.register_attack("custom_probe", succeeds);

        assert!(engine.list_attacks().contains(&"custom_probe".to_string()));
        let result = engine.run_attack("custom_probe").await.unwrap();
        assert_eq!(result.attack_name, "AlwaysSucceeds");

        let info = engine.get_attack_info("custom_probe");
        assert_eq!(info["source"], json!("ad-hoc"));
        assert_eq!(info["class"], json!("AlwaysSucceeds"));
    }

    #[tokio::test]
    async fn test_attack_info_prefers_curated() {
        let engine = engine();
        let info = engine.get_attack_info("gps_spoofing");
        assert_eq!(info["source"], json!("curated"));
        assert_eq!(info["scenario"]["name"], json!("GPS Spoofing"));

        let missing = engine.get_attack_info("nope");
        assert_eq!(missing, json!({}));
    }

    #[tokio::test]
    async fn test_cti_collector_receives_results() {
        let mut engine = engine();
        engine.register_cti_collector(CtiCollector::new());
        engine.register_attack("ok", succeeds);

        engine.run_attack("ok").await.unwrap();

        let collector = engine.cti_collector().unwrap();
        // "PROBE:ok" on success: 70 + 15 = 85, stored
        assert_eq!(collector.indicator_count(), 1);
        let summary = collector.get_summary();
        assert_eq!(summary["statistics"]["by_attack_type"]["reconnaissance"], json!(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_target_override() {
        let mut engine = engine();
        let result = engine
            .run_attack_on("drone_discovery", "192.168.13.1")
            .await
            .unwrap();
        assert_eq!(result.target, "192.168.13.1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeded_engines_reproduce_outcomes() {
        let mut first = DvdLite::with_seed(AttackRegistry::builtin(), EngineConfig::default(), 99);
        let mut second = DvdLite::with_seed(AttackRegistry::builtin(), EngineConfig::default(), 99);

        let a = first.run_attack("telemetry_flood").await.unwrap();
        let b = second.run_attack("telemetry_flood").await.unwrap();
        assert_eq!(a.status, b.status);
        assert_eq!(a.iocs, b.iocs);
    }
}
