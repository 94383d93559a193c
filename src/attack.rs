//! Attack unit contract and execution wrapper.
//!
//! Every scenario implements [`AttackUnit`] with exactly two operations:
//! `attempt` (the scenario-specific simulation) and `attack_kind` (static
//! classification). [`execute`] wraps an attempt with timing, identifier
//! generation and uniform result construction, and is the sole recovery
//! boundary for attempt errors.

use crate::model::{AttackResult, AttackStatus, DetailMap, Tactic};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Error type attempts may fail with. Any error is contained by [`execute`].
pub type AttackError = Box<dyn std::error::Error + Send + Sync>;

/// Raw outcome of one scenario-specific attempt.
#[derive(Debug, Default)]
pub struct Attempt {
    /// Whether any simulated finding occurred
    pub success: bool,
    /// Zero or more "TYPE:value" tokens
    pub iocs: Vec<String>,
    /// Scenario-specific auxiliary data; includes "success_rate"
    pub details: DetailMap,
}

/// Per-execution state handed to every unit constructor: the target
/// identifier and a seedable pseudo-random source, so that outcomes are
/// reproducible under a fixed engine seed.
pub struct AttackContext {
    pub target: String,
    pub rng: StdRng,
}

impl AttackContext {
    pub fn new(target: impl Into<String>, seed: u64) -> Self {
        Self {
            target: target.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

/// Constructor registered for each scenario.
pub type AttackConstructor = fn(AttackContext) -> Box<dyn AttackUnit>;

/// A polymorphic executable attack scenario.
#[async_trait]
pub trait AttackUnit: Send {
    /// Class identity, used for `attack_id` and `attack_name`
    fn name(&self) -> &'static str;

    /// Static tactic classification
    fn attack_kind(&self) -> Tactic;

    /// The only scenario-specific logic. May be slow (simulated delay) but
    /// must not block the runtime; self-contained, no real side effects.
    async fn attempt(&mut self) -> Result<Attempt, AttackError>;
}

/// Run one attempt to completion and build the uniform [`AttackResult`].
///
/// Attempt errors are converted into a `Failed` result carrying the
/// stringified error under `details["error"]`; they never propagate past
/// this function. A single attempt is authoritative, no retries.
pub async fn execute(unit: &mut dyn AttackUnit, target: &str) -> AttackResult {
    let started = tokio::time::Instant::now();
    let attack_id = format!("{}_{}", unit.name(), Utc::now().timestamp());
    log::debug!("executing {} against {}", attack_id, target);

    let (status, success_rate, iocs, details) = match unit.attempt().await {
        Ok(attempt) => {
            let success_rate = attempt
                .details
                .get("success_rate")
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(if attempt.success { 0.7 } else { 0.0 });
            let status = if attempt.success {
                AttackStatus::Success
            } else {
                AttackStatus::Failed
            };
            (status, success_rate, attempt.iocs, attempt.details)
        }
        Err(err) => {
            log::warn!("attempt {} failed: {}", attack_id, err);
            let mut details = DetailMap::new();
            details.insert("error".to_string(), serde_json::Value::String(err.to_string()));
            (AttackStatus::Failed, 0.0, Vec::new(), details)
        }
    };

    AttackResult {
        attack_id,
        attack_name: unit.name().to_string(),
        attack_type: unit.attack_kind(),
        status,
        success_rate,
        response_time: started.elapsed().as_secs_f64(),
        timestamp: Utc::now().timestamp_millis() as f64 / 1000.0,
        target: target.to_string(),
        iocs,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedOutcome {
        success: bool,
    }

    #[async_trait]
    impl AttackUnit for FixedOutcome {
        fn name(&self) -> &'static str {
            "FixedOutcome"
        }

        fn attack_kind(&self) -> Tactic {
            Tactic::Reconnaissance
        }

        async fn attempt(&mut self) -> Result<Attempt, AttackError> {
            let mut details = DetailMap::new();
            details.insert("success_rate".to_string(), json!(0.9));
            Ok(Attempt {
                success: self.success,
                iocs: vec!["TEST:token".to_string()],
                details,
            })
        }
    }

    struct AlwaysErrors;

    #[async_trait]
    impl AttackUnit for AlwaysErrors {
        fn name(&self) -> &'static str {
            "AlwaysErrors"
        }

        fn attack_kind(&self) -> Tactic {
            Tactic::Injection
        }

        async fn attempt(&mut self) -> Result<Attempt, AttackError> {
            Err("simulated connection refused".into())
        }
    }

    #[tokio::test]
    async fn test_execute_success_path() {
        let mut unit = FixedOutcome { success: true };
        let result = execute(&mut unit, "10.13.0.2").await;
        assert_eq!(result.status, AttackStatus::Success);
        assert_eq!(result.attack_name, "FixedOutcome");
        assert!(result.attack_id.starts_with("FixedOutcome_"));
        assert_eq!(result.target, "10.13.0.2");
        assert!((result.success_rate - 0.9).abs() < f64::EPSILON);
        assert!(result.response_time >= 0.0);
        assert_eq!(result.iocs, vec!["TEST:token".to_string()]);
    }

    #[tokio::test]
    async fn test_execute_failure_keeps_details() {
        let mut unit = FixedOutcome { success: false };
        let result = execute(&mut unit, "10.13.0.2").await;
        // success_rate comes from details even on failure
        assert_eq!(result.status, AttackStatus::Failed);
        assert!((result.success_rate - 0.9).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_execute_contains_attempt_errors() {
        let mut unit = AlwaysErrors;
        let result = execute(&mut unit, "10.13.0.2").await;
        assert_eq!(result.status, AttackStatus::Failed);
        assert_eq!(result.success_rate, 0.0);
        assert!(result.iocs.is_empty());
        assert_eq!(
            result.details.get("error").and_then(|v| v.as_str()),
            Some("simulated connection refused")
        );
    }
}
