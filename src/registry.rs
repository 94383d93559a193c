//! Curated attack catalogue.
//!
//! Maps registry name -> (constructor, scenario metadata) and keeps a
//! per-tactic index. Every query degrades to `None` or an empty list for
//! unknown keys; the registry itself never fails.

use crate::attack::AttackConstructor;
use crate::model::{Difficulty, FlightState, ScenarioMetadata, Tactic};
use std::collections::HashMap;

/// One registered scenario: its constructor plus immutable metadata.
pub struct RegisteredAttack {
    pub constructor: AttackConstructor,
    pub scenario: ScenarioMetadata,
}

/// Central name -> implementation catalogue with query helpers.
#[derive(Default)]
pub struct AttackRegistry {
    attacks: HashMap<String, RegisteredAttack>,
    tactic_index: HashMap<Tactic, Vec<String>>,
}

impl AttackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the full curated scenario catalogue.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::attacks::register_builtin(&mut registry);
        log::debug!("builtin registry populated with {} scenarios", registry.len());
        registry
    }

    /// Insert or overwrite a scenario. The tactic index stays consistent
    /// when a name is re-registered under a different tactic.
    ///
    /// Returns true for well-formed input; this operation has no failure
    /// mode beyond an internal index inconsistency.
    pub fn register(
        &mut self,
        name: &str,
        constructor: AttackConstructor,
        scenario: ScenarioMetadata,
    ) -> bool {
        if let Some(previous) = self.attacks.get(name) {
            let old_tactic = previous.scenario.tactic;
            if let Some(names) = self.tactic_index.get_mut(&old_tactic) {
                names.retain(|n| n != name);
            }
        }

        self.tactic_index
            .entry(scenario.tactic)
            .or_default()
            .push(name.to_string());
        self.attacks.insert(
            name.to_string(),
            RegisteredAttack {
                constructor,
                scenario,
            },
        );
        true
    }

    pub fn constructor(&self, name: &str) -> Option<AttackConstructor> {
        self.attacks.get(name).map(|entry| entry.constructor)
    }

    pub fn scenario(&self, name: &str) -> Option<&ScenarioMetadata> {
        self.attacks.get(name).map(|entry| &entry.scenario)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attacks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    /// All registered names, sorted for stable output
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attacks.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn by_tactic(&self, tactic: Tactic) -> Vec<String> {
        let mut names = self.tactic_index.get(&tactic).cloned().unwrap_or_default();
        names.sort();
        names
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<String> {
        let mut names: Vec<String> = self
            .attacks
            .iter()
            .filter(|(_, entry)| entry.scenario.difficulty == difficulty)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn by_flight_state(&self, state: FlightState) -> Vec<String> {
        let mut names: Vec<String> = self
            .attacks
            .iter()
            .filter(|(_, entry)| entry.scenario.applies_in(state))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::{Attempt, AttackContext, AttackError, AttackUnit};
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl AttackUnit for Noop {
        fn name(&self) -> &'static str {
            "Noop"
        }

        fn attack_kind(&self) -> Tactic {
            Tactic::Reconnaissance
        }

        async fn attempt(&mut self) -> Result<Attempt, AttackError> {
            Ok(Attempt::default())
        }
    }

    fn noop_constructor(_ctx: AttackContext) -> Box<dyn AttackUnit> {
        Box::new(Noop)
    }

    fn scenario(tactic: Tactic, difficulty: Difficulty, states: Vec<FlightState>) -> ScenarioMetadata {
        ScenarioMetadata {
            name: "Test Scenario".to_string(),
            tactic,
            description: String::new(),
            required_states: states,
            difficulty,
            prerequisites: vec![],
            targets: vec!["flight_controller".to_string()],
            estimated_duration: 2.0,
            stealth_level: "low".to_string(),
            impact_level: "low".to_string(),
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = AttackRegistry::new();
        assert!(registry.register(
            "noop",
            noop_constructor,
            scenario(Tactic::Reconnaissance, Difficulty::Beginner, vec![FlightState::PreFlight]),
        ));
        assert!(registry.contains("noop"));
        assert!(registry.constructor("noop").is_some());
        assert!(registry.scenario("noop").is_some());
        assert!(registry.constructor("missing").is_none());
        assert!(registry.scenario("missing").is_none());
    }

    #[test]
    fn test_scenario_lookup_is_idempotent() {
        let mut registry = AttackRegistry::new();
        registry.register(
            "noop",
            noop_constructor,
            scenario(Tactic::Reconnaissance, Difficulty::Beginner, vec![FlightState::PreFlight]),
        );
        let first = registry.scenario("noop").unwrap().clone();
        let second = registry.scenario("noop").unwrap();
        assert_eq!(first.name, second.name);
        assert_eq!(first.tactic, second.tactic);
        assert_eq!(first.required_states, second.required_states);
    }

    #[test]
    fn test_reregister_moves_tactic_index() {
        let mut registry = AttackRegistry::new();
        registry.register(
            "noop",
            noop_constructor,
            scenario(Tactic::Reconnaissance, Difficulty::Beginner, vec![FlightState::PreFlight]),
        );
        registry.register(
            "noop",
            noop_constructor,
            scenario(Tactic::Injection, Difficulty::Advanced, vec![FlightState::PreFlight]),
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.by_tactic(Tactic::Reconnaissance).is_empty());
        assert_eq!(registry.by_tactic(Tactic::Injection), vec!["noop".to_string()]);
    }

    #[test]
    fn test_queries_never_fail_on_unknown_keys() {
        let registry = AttackRegistry::new();
        assert!(registry.by_tactic(Tactic::Exfiltration).is_empty());
        assert!(registry.by_difficulty(Difficulty::Advanced).is_empty());
        assert!(registry.by_flight_state(FlightState::EmergencyRtl).is_empty());
        assert!(registry.list_names().is_empty());
    }

    #[test]
    fn test_query_helpers() {
        let mut registry = AttackRegistry::new();
        registry.register(
            "recon_one",
            noop_constructor,
            scenario(Tactic::Reconnaissance, Difficulty::Beginner, vec![FlightState::PreFlight]),
        );
        registry.register(
            "dos_one",
            noop_constructor,
            scenario(
                Tactic::DenialOfService,
                Difficulty::Advanced,
                vec![FlightState::AutopilotFlight, FlightState::ManualFlight],
            ),
        );

        assert_eq!(registry.by_tactic(Tactic::Reconnaissance), vec!["recon_one".to_string()]);
        assert_eq!(registry.by_difficulty(Difficulty::Advanced), vec!["dos_one".to_string()]);
        assert_eq!(
            registry.by_flight_state(FlightState::ManualFlight),
            vec!["dos_one".to_string()]
        );
        assert_eq!(registry.list_names(), vec!["dos_one".to_string(), "recon_one".to_string()]);
    }

    #[test]
    fn test_builtin_catalogue_is_populated() {
        let registry = AttackRegistry::builtin();
        assert!(registry.len() >= 20);
        assert!(registry.contains("wifi_network_discovery"));
        assert!(registry.contains("gps_spoofing"));
        for tactic in Tactic::all() {
            assert!(
                !registry.by_tactic(tactic).is_empty(),
                "no scenarios registered for {tactic}"
            );
        }
    }
}
