use super::outcome::{
    CodeBreakdown, HazardEntry, IngredientHazardAssessment, IngredientScore, ResolutionWarning,
};
use crate::model::{DataSource, HazardBucket, IngredientRisk};
use rust_decimal::Decimal;

/// Score one ingredient from its hazard codes.
///
/// Each code is weighted as `base_weight × class_factor × category_factor`.
/// The ingredient is penalized by its single worst code rather than the sum,
/// so many mild hazards never outweigh one severe hazard.
/// Codes with a zero weight are skipped.
pub fn score_ingredient(entries: &[HazardEntry]) -> IngredientScore {
    let mut breakdown = Vec::with_capacity(entries.len());
    let mut max_weighted = Decimal::ZERO;

    for entry in entries {
        if entry.code.is_empty() || entry.base_weight.is_zero() {
            continue;
        }

        let class_factor = HazardBucket::class_factor(HazardBucket::from_code(&entry.code));
        let category_factor = entry.category.factor();
        let weighted = entry
            .base_weight
            .saturating_mul(class_factor)
            .saturating_mul(category_factor);

        breakdown.push(CodeBreakdown {
            code: entry.code.clone(),
            base_weight: entry.base_weight,
            class_factor,
            category_factor,
            weighted,
        });

        max_weighted = max_weighted.max(weighted);
    }

    let ingredient_score = (Decimal::ONE_HUNDRED - max_weighted)
        .max(Decimal::ZERO)
        .round_dp(1);

    IngredientScore {
        ingredient_score,
        max_weighted_severity: max_weighted,
        breakdown,
    }
}

impl IngredientHazardAssessment {
    /// Score the resolved codes of an ingredient.
    pub fn new(
        ingredient_name: &str,
        source: DataSource,
        hazard_codes: Vec<HazardEntry>,
        warnings: Vec<ResolutionWarning>,
    ) -> Self {
        let scored = score_ingredient(&hazard_codes);
        let risk = IngredientRisk::from_codes(hazard_codes.iter().map(|e| e.code.as_str()));

        tracing::debug!(
            ingredient = ingredient_name,
            %source,
            codes = hazard_codes.len(),
            score = %scored.ingredient_score,
            max_weighted = %scored.max_weighted_severity,
            "scored ingredient"
        );

        Self {
            ingredient_name: ingredient_name.to_string(),
            hazard_codes,
            source,
            ingredient_score: scored.ingredient_score,
            max_weighted_severity: scored.max_weighted_severity,
            breakdown: scored.breakdown,
            risk,
            warnings,
        }
    }

    /// An ingredient no source could tell anything about.
    pub fn unresolved(ingredient_name: &str, warnings: Vec<ResolutionWarning>) -> Self {
        Self::new(ingredient_name, DataSource::NoData, Vec::new(), warnings)
    }
}
