use super::grouping::group_codes;
use super::outcome::{
    IngredientHazardAssessment, ProductScoreResult, ScoreBreakdown, SeverityCounts,
};
use crate::config::AggregationFormula;
use crate::ghs::HazardCodeCatalog;
use crate::model::{HazardBucket, RiskLabel};
use rust_decimal::Decimal;
use std::sync::Arc;

const PENALTY_CATEGORY_1: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const PENALTY_CATEGORY_2: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
const PENALTY_CATEGORY_3: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
const PENALTY_ACCUMULATION: Decimal = Decimal::ONE;
const PENALTY_HEALTH: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
/// Dangerous codes tolerated before the accumulation penalty starts.
const ACCUMULATION_THRESHOLD: u32 = 8;

/// Combines per-ingredient assessments into a product score.
#[derive(Debug, Clone)]
pub struct ProductScoreAggregator {
    catalog: Arc<HazardCodeCatalog>,
    formula: AggregationFormula,
}

impl ProductScoreAggregator {
    pub fn new(catalog: Arc<HazardCodeCatalog>, formula: AggregationFormula) -> Self {
        Self { catalog, formula }
    }

    pub fn formula(&self) -> AggregationFormula {
        self.formula
    }

    /// Score a product from its ingredient assessments (kept in input order).
    pub fn aggregate(&self, assessments: Vec<IngredientHazardAssessment>) -> ProductScoreResult {
        let breakdown = match self.formula {
            AggregationFormula::CeilingFloor => ceiling_floor_score(&assessments),
            AggregationFormula::WeightSum => weight_sum_score(&assessments),
        };

        let product_score = breakdown.unrounded_score.round_dp(1);
        let risk_label = RiskLabel::from_score(product_score);

        let hazard_category_summary = group_codes(
            assessments
                .iter()
                .flat_map(|a| a.hazard_codes.iter().map(|e| e.code.as_str())),
            &self.catalog,
        );

        tracing::info!(
            ingredients = assessments.len(),
            score = %product_score,
            label = %risk_label,
            category_1 = breakdown.counts.category_1_count,
            category_2 = breakdown.counts.category_2_count,
            "scored product"
        );

        ProductScoreResult {
            ingredient_assessments: assessments,
            product_score,
            risk_label,
            hazard_category_summary,
            breakdown,
        }
    }
}

/// Count every hazard code of every ingredient by severity tier and band.
pub fn count_severities(assessments: &[IngredientHazardAssessment]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();

    for entry in assessments.iter().flat_map(|a| &a.hazard_codes) {
        match entry.category.severity_tier() {
            Some(1) => counts.category_1_count += 1,
            Some(2) => counts.category_2_count += 1,
            Some(3) => counts.category_3_count += 1,
            _ => {}
        }
        match HazardBucket::from_code(&entry.code) {
            Some(HazardBucket::Health) => counts.health_h_codes += 1,
            Some(HazardBucket::Physical) => counts.physical_h_codes += 1,
            Some(HazardBucket::Environmental) => counts.environment_h_codes += 1,
            None => {}
        }
    }

    counts.total_dangerous_codes =
        counts.category_1_count + counts.category_2_count + counts.category_3_count;
    counts
}

/// Penalty for the hazard profile of the whole product.
pub fn category_penalty(counts: &SeverityCounts) -> Decimal {
    let accumulated = counts
        .total_dangerous_codes
        .saturating_sub(ACCUMULATION_THRESHOLD);

    PENALTY_CATEGORY_1 * Decimal::from(counts.category_1_count)
        + PENALTY_CATEGORY_2 * Decimal::from(counts.category_2_count)
        + PENALTY_CATEGORY_3 * Decimal::from(counts.category_3_count)
        + PENALTY_ACCUMULATION * Decimal::from(accumulated)
        + PENALTY_HEALTH * Decimal::from(counts.health_h_codes)
}

/// Average ingredient score minus penalties, clamped by safety ceilings and floors.
///
/// The clamps keep ordinary products off the extremes while letting products
/// with several category-1 hazards sink toward the bottom of the scale.
fn ceiling_floor_score(assessments: &[IngredientHazardAssessment]) -> ScoreBreakdown {
    let base_score = if assessments.is_empty() {
        Decimal::ONE_HUNDRED
    } else {
        let total: Decimal = assessments.iter().map(|a| a.ingredient_score).sum();
        total / Decimal::from(assessments.len())
    };

    let counts = count_severities(assessments);
    let penalty = category_penalty(&counts);
    let mut score = (base_score - penalty).max(Decimal::ZERO);
    let mut steps = vec![format!(
        "base {} − penalty {} = {}",
        base_score.round_dp(2),
        penalty,
        score.round_dp(2)
    )];

    // First match wins.
    let ceiling = if counts.category_1_count > 1 {
        Some((Decimal::from(60), "several category-1 hazards"))
    } else if counts.category_1_count == 1 {
        Some((Decimal::from(75), "one category-1 hazard"))
    } else if counts.category_2_count > 8 {
        Some((Decimal::from(80), "more than 8 category-2 hazards"))
    } else if counts.total_dangerous_codes > 20 {
        Some((Decimal::from(85), "more than 20 dangerous hazards"))
    } else {
        None
    };
    if let Some((cap, why)) = ceiling {
        if score > cap {
            steps.push(format!("capped at {} ({})", cap, why));
        }
        score = score.min(cap);
    }

    let (floor, why) = if counts.category_1_count > 1 {
        (Decimal::from(10), "several category-1 hazards")
    } else if counts.category_1_count == 1 {
        (Decimal::from(25), "one category-1 hazard")
    } else {
        (Decimal::from(40), "no category-1 hazard")
    };
    if score < floor {
        steps.push(format!("raised to {} ({})", floor, why));
    }
    score = score.max(floor);

    ScoreBreakdown {
        formula: AggregationFormula::CeilingFloor,
        base_score,
        counts,
        penalty,
        ceiling: ceiling.map(|(cap, _)| cap),
        floor: Some(floor),
        unrounded_score: score,
        reason: steps.join("; "),
    }
}

/// Deprecated sum-of-worst-weights formula, kept for comparison with older scores.
fn weight_sum_score(assessments: &[IngredientHazardAssessment]) -> ScoreBreakdown {
    let total_weight = assessments
        .iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a.max_weighted_severity));
    let max_weight = assessments
        .iter()
        .map(|a| a.max_weighted_severity)
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut score = (Decimal::ONE_HUNDRED - total_weight).max(Decimal::ZERO);
    let mut steps = vec![format!("100 − total weight {} = {}", total_weight, score)];

    let ceiling = if max_weight >= Decimal::from(50) {
        Some(Decimal::from(25))
    } else if max_weight >= Decimal::from(25) {
        Some(Decimal::from(50))
    } else {
        None
    };
    if let Some(cap) = ceiling {
        if score > cap {
            steps.push(format!("capped at {} (worst weighted hazard {})", cap, max_weight));
        }
        score = score.min(cap);
    }

    ScoreBreakdown {
        formula: AggregationFormula::WeightSum,
        base_score: Decimal::ONE_HUNDRED,
        counts: count_severities(assessments),
        penalty: total_weight,
        ceiling,
        floor: None,
        unrounded_score: score,
        reason: steps.join("; "),
    }
}
