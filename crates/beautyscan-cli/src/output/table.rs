use beautyscan_core::config::AggregationFormula;
use beautyscan_core::score::{IngredientHazardAssessment, ProductScoreResult};
use rust_decimal::Decimal;

pub fn print(result: &ProductScoreResult, verbose: bool) {
    println!(
        "Product score: {} / 100 ({}, {})\n",
        one_dp(result.product_score),
        result.risk_label,
        result.risk_label.display_fr()
    );

    print_ingredients(&result.ingredient_assessments, verbose);

    if !result.hazard_category_summary.is_empty() {
        println!("Hazards by category:");
        for (bucket, summary) in &result.hazard_category_summary {
            println!(
                "  {:<14} {:>3}  {}",
                bucket.display_fr(),
                summary.count,
                summary.codes.join(", ")
            );
            if verbose {
                for hc in &summary.details {
                    println!("      {} (cat. {}) {}", hc.code, hc.category, hc.description);
                }
            }
        }
        println!();
    }

    let b = &result.breakdown;
    if verbose {
        let formula = match b.formula {
            AggregationFormula::CeilingFloor => "ceiling/floor",
            AggregationFormula::WeightSum => "weight sum (legacy)",
        };
        println!("Aggregation ({formula}):");
        println!(
            "  category 1: {}  category 2: {}  category 3: {}  total: {}",
            b.counts.category_1_count,
            b.counts.category_2_count,
            b.counts.category_3_count,
            b.counts.total_dangerous_codes
        );
        println!(
            "  health: {}  physical: {}  environmental: {}",
            b.counts.health_h_codes, b.counts.physical_h_codes, b.counts.environment_h_codes
        );
        println!("  {}", b.reason);
        println!();
    }

    let unresolved = result.unresolved().count();
    if unresolved > 0 {
        println!(
            "  {} of {} ingredient(s) had no hazard data",
            unresolved,
            result.ingredient_assessments.len()
        );
    }
}

fn print_ingredients(assessments: &[IngredientHazardAssessment], verbose: bool) {
    if assessments.is_empty() {
        println!("  (no ingredients)\n");
        return;
    }

    let width = assessments
        .iter()
        .map(|a| a.ingredient_name.chars().count())
        .max()
        .unwrap_or(10)
        .max("Ingredient".len());

    println!(
        "  {:<width$}  {:>5}  {:<6}  {:<17}  Codes",
        "Ingredient", "Score", "Risk", "Source"
    );
    for a in assessments {
        let codes: Vec<&str> = a.hazard_codes.iter().map(|e| e.code.as_str()).collect();
        println!(
            "  {:<width$}  {:>5}  {:<6}  {:<17}  {}",
            a.ingredient_name,
            one_dp(a.ingredient_score),
            a.risk.to_string(),
            a.source.to_string(),
            codes.join(", ")
        );

        if verbose {
            for c in &a.breakdown {
                println!(
                    "      {}: {} × {} × {} = {}",
                    c.code, c.base_weight, c.class_factor, c.category_factor, c.weighted
                );
            }
        }
        for w in &a.warnings {
            println!("      warning: {w}");
        }
    }
    println!();
}

fn one_dp(value: Decimal) -> String {
    format!("{:.1}", value)
}
