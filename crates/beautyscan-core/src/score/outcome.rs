use crate::config::AggregationFormula;
use crate::ghs::HazardCode;
use crate::model::{DataSource, HazardBucket, HazardCategory, IngredientRisk, RiskLabel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resolved hazard code ready for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardEntry {
    /// Normalized hazard code (e.g., "H350").
    pub code: String,
    /// Severity magnitude, from the source or the catalog.
    pub base_weight: Decimal,
    /// Category from the source, or the static fallback map.
    pub category: HazardCategory,
}

/// How one hazard code contributed to its ingredient's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBreakdown {
    pub code: String,
    pub base_weight: Decimal,
    pub class_factor: Decimal,
    pub category_factor: Decimal,
    /// base_weight × class_factor × category_factor
    pub weighted: Decimal,
}

/// Result of scoring one ingredient's hazard codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientScore {
    /// `max(0, 100 − max_weighted_severity)`, one decimal.
    pub ingredient_score: Decimal,
    /// The largest weighted penalty among the codes, 0 if none.
    pub max_weighted_severity: Decimal,
    pub breakdown: Vec<CodeBreakdown>,
}

/// Recoverable problem met while resolving an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionWarning {
    /// Code not in the catalog; kept with a fallback weight and category.
    UnknownHazardCode { code: String },
    /// A data source errored or timed out and was skipped.
    SourceFailed { source: DataSource, reason: String },
    /// A source reported an implausible weight; the catalog weight was used.
    WeightOutOfRange { code: String, weight: f64 },
    /// Scoring was cancelled before this ingredient was resolved.
    Cancelled,
}

impl std::fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionWarning::UnknownHazardCode { code } => {
                write!(f, "unknown hazard code {code}, scored as category 2")
            }
            ResolutionWarning::SourceFailed { source, reason } => {
                write!(f, "{source} unavailable: {reason}")
            }
            ResolutionWarning::WeightOutOfRange { code, weight } => {
                write!(f, "reported weight {weight} for {code} out of range, catalog weight used")
            }
            ResolutionWarning::Cancelled => write!(f, "not resolved (cancelled)"),
        }
    }
}

/// Hazard assessment of a single ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientHazardAssessment {
    /// Name as supplied by the caller.
    pub ingredient_name: String,
    pub hazard_codes: Vec<HazardEntry>,
    pub source: DataSource,
    pub ingredient_score: Decimal,
    pub max_weighted_severity: Decimal,
    pub breakdown: Vec<CodeBreakdown>,
    /// Coarse level for display next to the ingredient.
    pub risk: IngredientRisk,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ResolutionWarning>,
}

/// Hazard-code counts across all ingredients of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Categories 1, 1A and 1B.
    pub category_1_count: u32,
    pub category_2_count: u32,
    pub category_3_count: u32,
    pub total_dangerous_codes: u32,
    /// `H3*` codes.
    pub health_h_codes: u32,
    /// `H2*` codes.
    pub physical_h_codes: u32,
    /// `H4*` codes.
    pub environment_h_codes: u32,
}

/// How the product score was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub formula: AggregationFormula,
    pub base_score: Decimal,
    pub counts: SeverityCounts,
    pub penalty: Decimal,
    /// Upper bound of the ceiling rule that matched, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<Decimal>,
    /// Lower bound of the floor rule that matched, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<Decimal>,
    /// Final score before rounding.
    pub unrounded_score: Decimal,
    /// Human-readable explanation of the arithmetic.
    pub reason: String,
}

/// One display bucket (Health, Physical or Environmental).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSummary {
    /// Number of code occurrences in the bucket.
    pub count: u32,
    /// Codes in order of occurrence, duplicates kept.
    pub codes: Vec<String>,
    /// Catalog details, one per distinct known code.
    pub details: Vec<HazardCode>,
}

/// Product-level scoring result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductScoreResult {
    /// In input order.
    pub ingredient_assessments: Vec<IngredientHazardAssessment>,
    pub product_score: Decimal,
    pub risk_label: RiskLabel,
    /// Informational only; never feeds back into the score.
    pub hazard_category_summary: BTreeMap<HazardBucket, BucketSummary>,
    pub breakdown: ScoreBreakdown,
}

impl ProductScoreResult {
    /// Assessments that ended with no hazard data.
    pub fn unresolved(&self) -> impl Iterator<Item = &IngredientHazardAssessment> {
        self.ingredient_assessments
            .iter()
            .filter(|a| a.source == DataSource::NoData)
    }
}
