//! CTI collector: derives confidence-scored threat indicators from raw
//! attack IOC strings and exports the accumulated intelligence.
//!
//! Indicators below the configured confidence threshold are discarded at
//! ingestion time. Malformed IOC tokens are skipped silently; export I/O
//! failures are the only errors surfaced to the caller.

use crate::errors::{DvdError, DvdResult};
use crate::model::{AttackResult, AttackStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Constant source tag stamped on every derived indicator.
pub const INDICATOR_SOURCE: &str = "dvdlite";

const BASE_CONFIDENCE: i32 = 70;
const SUCCESS_BONUS: i32 = 15;
const FAILURE_PENALTY: i32 = 20;

/// Fixed per-type bonus for known drone IOC families. First matching
/// keyword wins; matched by substring against the lowercased type.
const TYPE_BONUS: &[(&str, i32)] = &[
    ("gps", 25),
    ("command_injected", 20),
    ("firmware", 15),
    ("bootloader", 15),
    ("mavlink", 15),
    ("waypoint", 15),
    ("param", 10),
    ("deauth", 10),
    ("telemetry", 10),
    ("rc_", 10),
    ("video", 5),
    ("wifi", 5),
];

/// A confidence-scored indicator derived from one raw IOC string.
#[derive(Debug, Clone, Serialize)]
pub struct ThreatIndicator {
    /// Lowercased prefix before the first ':', or "unknown"
    pub ioc_type: String,
    pub value: String,
    /// In [10, 100]
    pub confidence: u8,
    pub attack_type: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

/// Last-seen execution profile per attack, keyed `{attack_type}_{attack_name}`.
#[derive(Debug, Clone, Serialize)]
pub struct AttackPattern {
    pub success_rate: f64,
    pub timestamp: DateTime<Utc>,
    pub ioc_count: usize,
}

#[derive(Debug, Default, Serialize)]
struct CtiStats {
    by_attack_type: HashMap<String, u64>,
    high_confidence: u64,
    medium_confidence: u64,
    low_confidence: u64,
}

/// Accumulates indicators and per-attack-type statistics across results.
pub struct CtiCollector {
    indicators: Vec<ThreatIndicator>,
    attack_patterns: HashMap<String, AttackPattern>,
    stats: CtiStats,
    min_confidence: u8,
    results_dir: PathBuf,
}

impl CtiCollector {
    pub fn new() -> Self {
        Self {
            indicators: Vec::new(),
            attack_patterns: HashMap::new(),
            stats: CtiStats::default(),
            min_confidence: 60,
            results_dir: PathBuf::from("cti_results"),
        }
    }

    /// Override the minimum confidence below which indicators are dropped
    pub fn with_threshold(mut self, min_confidence: u8) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Override the directory used for default export paths
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    pub fn indicators(&self) -> &[ThreatIndicator] {
        &self.indicators
    }

    pub fn indicator_count(&self) -> usize {
        self.indicators.len()
    }

    /// Derive and store indicators from one completed result.
    ///
    /// Returns the number of indicators that survived the confidence
    /// threshold. Malformed IOC tokens are skipped, never an error.
    pub async fn collect_from_result(&mut self, result: &AttackResult) -> DvdResult<usize> {
        let attack_type = result.attack_type.as_str().to_string();
        let mut stored = 0usize;

        for raw in &result.iocs {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let (ioc_type, value) = match raw.split_once(':') {
                Some((prefix, rest)) if !prefix.is_empty() && !rest.is_empty() => {
                    (prefix.to_lowercase(), rest.to_string())
                }
                Some(_) => continue,
                None => ("unknown".to_string(), raw.to_string()),
            };

            let confidence = self.score(&ioc_type, result.status);
            if confidence < self.min_confidence {
                log::debug!(
                    "dropping {ioc_type} indicator below threshold ({confidence} < {})",
                    self.min_confidence
                );
                continue;
            }

            match confidence {
                80.. => self.stats.high_confidence += 1,
                60..=79 => self.stats.medium_confidence += 1,
                _ => self.stats.low_confidence += 1,
            }
            *self.stats.by_attack_type.entry(attack_type.clone()).or_insert(0) += 1;

            self.indicators.push(ThreatIndicator {
                ioc_type,
                value,
                confidence,
                attack_type: attack_type.clone(),
                timestamp: Utc::now(),
                source: INDICATOR_SOURCE.to_string(),
            });
            stored += 1;
        }

        // Last-seen profile per attack, overwritten on repeat runs
        self.attack_patterns.insert(
            format!("{}_{}", attack_type, result.attack_name),
            AttackPattern {
                success_rate: result.success_rate,
                timestamp: Utc::now(),
                ioc_count: result.iocs.len(),
            },
        );

        log::debug!(
            "collected {stored}/{} indicators from {}",
            result.iocs.len(),
            result.attack_id
        );
        Ok(stored)
    }

    /// Confidence = base 70, +15 on success / -20 otherwise, plus a fixed
    /// per-type bonus, clamped to [10, 100].
    fn score(&self, ioc_type: &str, status: AttackStatus) -> u8 {
        let mut confidence = BASE_CONFIDENCE;
        confidence += if status == AttackStatus::Success {
            SUCCESS_BONUS
        } else {
            -FAILURE_PENALTY
        };
        if let Some((_, bonus)) = TYPE_BONUS.iter().find(|(kw, _)| ioc_type.contains(kw)) {
            confidence += bonus;
        }
        confidence.clamp(10, 100) as u8
    }

    /// Aggregate view: totals, statistics block and the 5 most recent
    /// indicators with truncated values.
    pub fn get_summary(&self) -> serde_json::Value {
        let recent: Vec<serde_json::Value> = self
            .indicators
            .iter()
            .rev()
            .take(5)
            .map(|ind| {
                let mut value = ind.value.clone();
                if value.len() > 40 {
                    value.truncate(40);
                    value.push_str("...");
                }
                json!({
                    "ioc_type": &ind.ioc_type,
                    "value": value,
                    "confidence": ind.confidence,
                    "attack_type": &ind.attack_type,
                })
            })
            .collect();

        json!({
            "total_indicators": self.indicators.len(),
            "total_patterns": self.attack_patterns.len(),
            "statistics": {
                "by_attack_type": &self.stats.by_attack_type,
                "by_confidence": {
                    "high": self.stats.high_confidence,
                    "medium": self.stats.medium_confidence,
                    "low": self.stats.low_confidence,
                },
            },
            "recent_indicators": recent,
        })
    }

    /// Write all accumulated intelligence as pretty JSON.
    ///
    /// Without an explicit path, writes a timestamped file under the
    /// results directory. I/O failures propagate.
    pub fn export_json(&self, path: Option<&Path>) -> DvdResult<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self.default_export_path("json")?,
        };

        let document = json!({
            "metadata": {
                "generated_at": Utc::now(),
                "source": INDICATOR_SOURCE,
                "indicator_count": self.indicators.len(),
                "min_confidence": self.min_confidence,
            },
            "statistics": {
                "by_attack_type": &self.stats.by_attack_type,
                "by_confidence": {
                    "high": self.stats.high_confidence,
                    "medium": self.stats.medium_confidence,
                    "low": self.stats.low_confidence,
                },
            },
            "indicators": &self.indicators,
            "attack_patterns": &self.attack_patterns,
        });

        let body = serde_json::to_string_pretty(&document)?;
        std::fs::write(&path, body).map_err(|e| DvdError::io(e, Some(path.clone())))?;
        log::info!("exported {} indicators to {:?}", self.indicators.len(), path);
        Ok(path)
    }

    /// Write one row per indicator. Fields containing commas, quotes or
    /// newlines are quoted. I/O failures propagate.
    pub fn export_csv(&self, path: Option<&Path>) -> DvdResult<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self.default_export_path("csv")?,
        };

        let mut body = String::from("IOC_Type,Value,Confidence,Attack_Type,Timestamp,Source\n");
        for ind in &self.indicators {
            let row = [
                csv_field(&ind.ioc_type),
                csv_field(&ind.value),
                ind.confidence.to_string(),
                csv_field(&ind.attack_type),
                ind.timestamp.to_rfc3339(),
                csv_field(&ind.source),
            ];
            body.push_str(&row.join(","));
            body.push('\n');
        }

        std::fs::write(&path, body).map_err(|e| DvdError::io(e, Some(path.clone())))?;
        log::info!("exported {} indicators to {:?}", self.indicators.len(), path);
        Ok(path)
    }

    fn default_export_path(&self, extension: &str) -> DvdResult<PathBuf> {
        std::fs::create_dir_all(&self.results_dir)
            .map_err(|e| DvdError::io(e, Some(self.results_dir.clone())))?;
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        Ok(self.results_dir.join(format!("cti_export_{stamp}.{extension}")))
    }
}

impl Default for CtiCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DetailMap, Tactic};

    fn result_with_iocs(status: AttackStatus, iocs: Vec<&str>) -> AttackResult {
        AttackResult {
            attack_id: "GpsSpoofing_1700000000".to_string(),
            attack_name: "GpsSpoofing".to_string(),
            attack_type: Tactic::ProtocolTampering,
            status,
            success_rate: 0.65,
            response_time: 3.2,
            timestamp: 1_700_000_000.0,
            target: "10.13.0.2".to_string(),
            iocs: iocs.into_iter().map(String::from).collect(),
            details: DetailMap::new(),
        }
    }

    #[tokio::test]
    async fn test_collect_derives_scored_indicators() {
        let mut collector = CtiCollector::new();
        let result = result_with_iocs(
            AttackStatus::Success,
            vec!["GPS_SPOOF:TARGET_1.2,3.4", "GPS_DRIFT_M:120"],
        );
        let stored = collector.collect_from_result(&result).await.unwrap();
        assert_eq!(stored, 2);

        let first = &collector.indicators()[0];
        assert_eq!(first.ioc_type, "gps_spoof");
        assert_eq!(first.value, "TARGET_1.2,3.4");
        // 70 + 15 + 25, clamped to 100
        assert_eq!(first.confidence, 100);
        assert_eq!(first.attack_type, "protocol_tampering");
        assert_eq!(first.source, INDICATOR_SOURCE);

        let summary = collector.get_summary();
        assert_eq!(
            summary["statistics"]["by_attack_type"]["protocol_tampering"],
            json!(2)
        );
    }

    #[tokio::test]
    async fn test_confidence_bounds_and_threshold() {
        let mut collector = CtiCollector::new();
        // failed result, no type bonus: 70 - 20 = 50 < 60, discarded
        let result = result_with_iocs(AttackStatus::Failed, vec!["NOISE:artifact"]);
        let stored = collector.collect_from_result(&result).await.unwrap();
        assert_eq!(stored, 0);
        assert_eq!(collector.indicator_count(), 0);

        // with a lower threshold the same indicator is kept
        let mut permissive = CtiCollector::new().with_threshold(10);
        let result = result_with_iocs(AttackStatus::Failed, vec!["NOISE:artifact"]);
        permissive.collect_from_result(&result).await.unwrap();
        assert_eq!(permissive.indicator_count(), 1);
        let confidence = permissive.indicators()[0].confidence;
        assert!((10..=100).contains(&confidence));
        assert_eq!(confidence, 50);
    }

    #[tokio::test]
    async fn test_malformed_iocs_skipped_silently() {
        let mut collector = CtiCollector::new().with_threshold(10);
        let result = result_with_iocs(
            AttackStatus::Success,
            vec!["", "   ", ":", "orphan_token", "OK:fine"],
        );
        let stored = collector.collect_from_result(&result).await.unwrap();
        // "orphan_token" becomes unknown-typed, "OK:fine" parses, rest skipped
        assert_eq!(stored, 2);
        assert_eq!(collector.indicators()[0].ioc_type, "unknown");
        assert_eq!(collector.indicators()[0].value, "orphan_token");
    }

    #[tokio::test]
    async fn test_patterns_overwritten_on_repeat() {
        let mut collector = CtiCollector::new();
        let result = result_with_iocs(AttackStatus::Success, vec!["GPS_SPOOF:a"]);
        collector.collect_from_result(&result).await.unwrap();
        collector.collect_from_result(&result).await.unwrap();

        let summary = collector.get_summary();
        assert_eq!(summary["total_patterns"], json!(1));
        assert_eq!(summary["total_indicators"], json!(2));
    }

    #[tokio::test]
    async fn test_export_json_round_trip() {
        let mut collector = CtiCollector::new();
        let result = result_with_iocs(
            AttackStatus::Success,
            vec!["GPS_SPOOF:TARGET_1.2,3.4", "MAVLINK_SEQ_GAP:17"],
        );
        collector.collect_from_result(&result).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let written = collector.export_json(Some(&path)).unwrap();
        assert_eq!(written, path);

        let body = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        let indicators = parsed["indicators"].as_array().unwrap();
        assert_eq!(indicators.len(), collector.indicator_count());
        for (parsed_ind, original) in indicators.iter().zip(collector.indicators()) {
            assert_eq!(parsed_ind["ioc_type"], original.ioc_type.as_str());
            assert_eq!(parsed_ind["value"], original.value.as_str());
            assert_eq!(parsed_ind["confidence"], json!(original.confidence));
            assert_eq!(parsed_ind["attack_type"], original.attack_type.as_str());
            assert_eq!(parsed_ind["source"], original.source.as_str());
        }
        assert!(parsed["attack_patterns"]["protocol_tampering_GpsSpoofing"].is_object());
    }

    #[tokio::test]
    async fn test_export_csv_quotes_commas() {
        let mut collector = CtiCollector::new();
        let result = result_with_iocs(AttackStatus::Success, vec!["GPS_SPOOF:TARGET_1.2,3.4"]);
        collector.collect_from_result(&result).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        collector.export_csv(Some(&path)).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let mut lines = body.lines();
        assert_eq!(
            lines.next().unwrap(),
            "IOC_Type,Value,Confidence,Attack_Type,Timestamp,Source"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("gps_spoof,\"TARGET_1.2,3.4\",100,protocol_tampering,"));
    }

    #[tokio::test]
    async fn test_export_failure_propagates() {
        let collector = CtiCollector::new();
        let err = collector
            .export_json(Some(Path::new("/nonexistent_dir/export.json")))
            .unwrap_err();
        assert!(matches!(err, DvdError::Io { .. }));
    }
}
