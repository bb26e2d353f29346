use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MAX_CONCURRENCY: usize = 64;
const MAX_PRIMARY_TIMEOUT_MS: u64 = 60_000;

/// Engine settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub resolver: ResolverConfig,
    pub scoring: ScoringConfig,
}

/// Data-source chain settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Infer codes from the compound name when the database lists none.
    pub infer_from_compound_name: bool,
    /// Upper bound on ingredients resolved at once (concurrent scoring only).
    pub max_concurrency: usize,
    /// Per-call limit for the chemical database.
    pub primary_timeout_ms: u64,
    /// Per-call limit for the AI estimator.
    pub fallback_timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            infer_from_compound_name: true,
            max_concurrency: 6,
            primary_timeout_ms: 12_000,
            fallback_timeout_ms: 8_000,
        }
    }
}

impl ResolverConfig {
    pub fn primary_timeout(&self) -> Duration {
        Duration::from_millis(self.primary_timeout_ms)
    }

    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub formula: AggregationFormula,
}

/// Product-level aggregation formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationFormula {
    /// Average ingredient score minus category penalties, then safety
    /// ceilings and floors.
    #[default]
    CeilingFloor,
    /// Deprecated: 100 minus the sum of each ingredient's worst weighted
    /// hazard, capped by the single worst hazard.
    WeightSum,
}

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<EngineConfig, ScanError> {
    let content = std::fs::read_to_string(path).map_err(|e| ScanError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: EngineConfig =
        serde_json::from_str(&content).map_err(|e| ScanError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<EngineConfig, ScanError> {
    let config: EngineConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Check value ranges serde cannot express.
pub fn validate_config(config: &EngineConfig) -> Result<(), ScanError> {
    let resolver = &config.resolver;

    if resolver.max_concurrency == 0 || resolver.max_concurrency > MAX_CONCURRENCY {
        return Err(ScanError::ConfigInvalid(format!(
            "resolver.max_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, resolver.max_concurrency
        )));
    }

    if resolver.primary_timeout_ms == 0 || resolver.primary_timeout_ms > MAX_PRIMARY_TIMEOUT_MS {
        return Err(ScanError::ConfigInvalid(format!(
            "resolver.primary_timeout_ms must be between 1 and {}, got {}",
            MAX_PRIMARY_TIMEOUT_MS, resolver.primary_timeout_ms
        )));
    }

    if resolver.fallback_timeout_ms == 0 {
        return Err(ScanError::ConfigInvalid(
            "resolver.fallback_timeout_ms must be positive".into(),
        ));
    }

    if resolver.fallback_timeout_ms > resolver.primary_timeout_ms {
        tracing::warn!(
            primary_ms = resolver.primary_timeout_ms,
            fallback_ms = resolver.fallback_timeout_ms,
            "fallback timeout is longer than the primary timeout"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_is_default() {
        let config = parse_config_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.resolver.infer_from_compound_name);
        assert_eq!(config.resolver.max_concurrency, 6);
        assert_eq!(config.resolver.primary_timeout(), Duration::from_secs(12));
        assert_eq!(config.resolver.fallback_timeout(), Duration::from_secs(8));
        assert_eq!(config.scoring.formula, AggregationFormula::CeilingFloor);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{
            "resolver": { "max_concurrency": 4 },
            "scoring": { "formula": "weight_sum" }
        }"#;
        let config = parse_config_str(json).unwrap();
        assert_eq!(config.resolver.max_concurrency, 4);
        assert_eq!(config.resolver.primary_timeout_ms, 12_000);
        assert_eq!(config.scoring.formula, AggregationFormula::WeightSum);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let json = r#"{ "resolver": { "max_concurrency": 0 } }"#;
        assert!(matches!(
            parse_config_str(json),
            Err(ScanError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_excessive_timeout_rejected() {
        let json = r#"{ "resolver": { "primary_timeout_ms": 600000 } }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{ "resolver": { "workers": 4 } }"#;
        assert!(matches!(parse_config_str(json), Err(ScanError::Json(_))));
    }

    #[test]
    fn test_unknown_formula_rejected() {
        let json = r#"{ "scoring": { "formula": "average" } }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "resolver": {{ "fallback_timeout_ms": 3000 }} }}"#).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.resolver.fallback_timeout_ms, 3000);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/beautyscan.json")).unwrap_err();
        assert!(matches!(err, ScanError::ConfigLoad { .. }));
    }
}
