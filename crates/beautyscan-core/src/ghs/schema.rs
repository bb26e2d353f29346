use serde::Deserialize;
use std::collections::BTreeMap;

/// One hazard statement as published in the source table.
#[derive(Debug, Clone, Deserialize)]
pub struct HazardCodeDef {
    /// GHS hazard class (e.g., "Cancérogénicité", "Liquides inflammables")
    pub class: String,
    /// GHS category as written in the table (e.g., "1", "2", "4")
    pub category: String,
    pub description: String,
    /// Signed label weight as published (e.g., -40). Only the magnitude is kept.
    pub weight: i32,
}

/// Weights and categories used when a source supplies a bare code.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringProfileDef {
    /// Base weight for codes missing from `weights`.
    pub default_weight: u32,
    /// Curated base weights for the hazards that matter most in cosmetics.
    #[serde(default)]
    pub weights: BTreeMap<String, u32>,
    /// Category for codes missing from `categories`.
    pub default_category: String,
    /// Static code → category map applied when the source gives no category.
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

/// Top-level hazard catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct HazardCatalogDef {
    pub version: String,
    pub description: String,
    /// H-code → hazard statement.
    pub codes: BTreeMap<String, HazardCodeDef>,
    pub scoring: ScoringProfileDef,
}
