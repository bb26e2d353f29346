use beautyscan_core::config::{load_config, AggregationFormula, EngineConfig};
use beautyscan_core::error::ScanError;
use std::path::Path;

use crate::output;

pub fn show(path: Option<&Path>) -> Result<(), ScanError> {
    let config = match path {
        Some(p) => load_config(p)?,
        None => EngineConfig::default(),
    };
    output::json::print(&config)
}

pub fn validate(path: &Path) -> Result<(), ScanError> {
    let config = load_config(path)?;
    let r = &config.resolver;

    println!("Config is valid: {}", path.display());
    println!("  Compound-name inference: {}", if r.infer_from_compound_name { "on" } else { "off" });
    println!("  Concurrency:             {}", r.max_concurrency);
    println!(
        "  Timeouts:                {} ms (database), {} ms (estimator)",
        r.primary_timeout_ms, r.fallback_timeout_ms
    );
    let formula = match config.scoring.formula {
        AggregationFormula::CeilingFloor => "ceiling_floor",
        AggregationFormula::WeightSum => "weight_sum (deprecated)",
    };
    println!("  Formula:                 {formula}");
    Ok(())
}
