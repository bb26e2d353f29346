//! Integration tests for the ScoringEngine end-to-end pipeline.
//!
//! Uses mock collaborators that answer from in-memory maps, so no chemical
//! database or estimator service is needed.

use beautyscan_core::config::{AggregationFormula, EngineConfig};
use beautyscan_core::error::ScanError;
use beautyscan_core::ghs::HazardCodeCatalog;
use beautyscan_core::model::{DataSource, HazardBucket, HazardCategory, RiskLabel};
use beautyscan_core::resolve::{
    CancelToken, ChemicalCompoundLookup, CompoundRecord, HazardEstimator, RawHazardCode,
    SourceOutcome,
};
use beautyscan_core::score::ResolutionWarning;
use beautyscan_core::ScoringEngine;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct MockLookup {
    records: HashMap<String, SourceOutcome<CompoundRecord>>,
}

impl MockLookup {
    fn with(mut self, name: &str, codes: &[&str]) -> Self {
        let record = CompoundRecord {
            name: name.into(),
            synonyms: vec![],
            hazard_codes: codes.iter().map(|c| RawHazardCode::new(c)).collect(),
        };
        self.records
            .insert(name.to_lowercase(), SourceOutcome::Found(record));
        self
    }

    fn failing(mut self, name: &str, reason: &str) -> Self {
        self.records.insert(
            name.to_lowercase(),
            SourceOutcome::Failed {
                reason: reason.into(),
            },
        );
        self
    }
}

impl ChemicalCompoundLookup for MockLookup {
    fn search(&self, ingredient_name: &str) -> SourceOutcome<CompoundRecord> {
        self.records
            .get(&ingredient_name.to_lowercase())
            .cloned()
            .unwrap_or(SourceOutcome::Empty)
    }

    fn backend_name(&self) -> &str {
        "mock-db"
    }
}

#[derive(Default)]
struct MockEstimator {
    estimates: HashMap<String, SourceOutcome<Vec<RawHazardCode>>>,
}

impl MockEstimator {
    fn with(mut self, name: &str, codes: &[(&str, f64, &str)]) -> Self {
        let codes = codes
            .iter()
            .map(|(code, weight, category)| RawHazardCode {
                code: code.to_string(),
                weight: Some(*weight),
                category: Some(category.to_string()),
            })
            .collect();
        self.estimates
            .insert(name.to_lowercase(), SourceOutcome::Found(codes));
        self
    }
}

impl HazardEstimator for MockEstimator {
    fn estimate(&self, ingredient_name: &str) -> SourceOutcome<Vec<RawHazardCode>> {
        self.estimates
            .get(&ingredient_name.to_lowercase())
            .cloned()
            .unwrap_or(SourceOutcome::Empty)
    }

    fn backend_name(&self) -> &str {
        "mock-ai"
    }
}

struct FailingEstimator;

impl HazardEstimator for FailingEstimator {
    fn estimate(&self, _ingredient_name: &str) -> SourceOutcome<Vec<RawHazardCode>> {
        SourceOutcome::Failed {
            reason: "service unavailable".into(),
        }
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

fn engine(lookup: MockLookup, estimator: impl HazardEstimator + 'static) -> ScoringEngine {
    engine_with(lookup, estimator, EngineConfig::default())
}

fn engine_with(
    lookup: MockLookup,
    estimator: impl HazardEstimator + 'static,
    config: EngineConfig,
) -> ScoringEngine {
    ScoringEngine::new(
        Arc::new(HazardCodeCatalog::builtin().unwrap()),
        Arc::new(lookup),
        Arc::new(estimator),
        config,
    )
}

// ---------------------------------------------------------------------------
// Pinned scenarios
// ---------------------------------------------------------------------------
#[test]
fn water_with_no_data_is_excellent() {
    let e = engine(MockLookup::default(), MockEstimator::default());
    let result = e.score_product(&["Water"]);

    let water = &result.ingredient_assessments[0];
    assert_eq!(water.source, DataSource::NoData);
    assert_eq!(water.ingredient_score, dec!(100));
    assert_eq!(result.product_score, dec!(100));
    assert_eq!(result.risk_label, RiskLabel::Excellent);
    assert!(result.hazard_category_summary.is_empty());
}

#[test]
fn empty_product_is_excellent() {
    let e = engine(MockLookup::default(), MockEstimator::default());
    let result = e.score_product::<&str>(&[]);
    assert_eq!(result.product_score, dec!(100));
    assert_eq!(result.risk_label, RiskLabel::Excellent);
}

#[test]
fn single_carcinogen_scores_25() {
    let e = engine(
        MockLookup::default().with("Formaldehyde", &["H350"]),
        MockEstimator::default(),
    );
    let result = e.score_product(&["Formaldehyde"]);

    let a = &result.ingredient_assessments[0];
    assert_eq!(a.hazard_codes[0].category, HazardCategory::OneA);
    assert_eq!(a.breakdown[0].class_factor, dec!(2));
    assert_eq!(a.breakdown[0].category_factor, dec!(3));
    assert_eq!(a.max_weighted_severity, dec!(90));
    assert_eq!(a.ingredient_score, dec!(10));

    // base 10 − penalty 3.5 = 6.5 → ceiling 75 → floor 25
    assert_eq!(result.breakdown.penalty, dec!(3.5));
    assert_eq!(result.product_score, dec!(25.0));
    assert_eq!(result.risk_label, RiskLabel::Mediocre);
}

#[test]
fn three_category_2_ingredients() {
    let e = engine(
        MockLookup::default()
            .with("Sodium Lauryl Sulfate", &["H315"])
            .with("Citric Acid", &["H319"])
            .with("Zinc Pyrithione", &["H400"]),
        MockEstimator::default(),
    );
    let result = e.score_product(&["Sodium Lauryl Sulfate", "Citric Acid", "Zinc Pyrithione"]);

    let scores: Vec<Decimal> = result
        .ingredient_assessments
        .iter()
        .map(|a| a.ingredient_score)
        .collect();
    assert_eq!(scores, vec![dec!(80), dec!(88), dec!(92)]);
    assert_eq!(result.breakdown.counts.category_1_count, 0);
    assert_eq!(result.breakdown.counts.category_2_count, 3);
    assert_eq!(result.product_score, dec!(81.2));
    assert!(result.product_score >= dec!(40));

    let summary = &result.hazard_category_summary;
    assert_eq!(summary[&HazardBucket::Health].count, 2);
    assert_eq!(summary[&HazardBucket::Environmental].codes, vec!["H400"]);
}

// ---------------------------------------------------------------------------
// Source chain
// ---------------------------------------------------------------------------
#[test]
fn estimator_used_when_database_empty() {
    let e = engine(
        MockLookup::default(),
        MockEstimator::default().with("Limonene", &[("H317", 4.0, "1B"), ("H411", -4.0, "2")]),
    );
    let result = e.score_product(&["Limonene"]);
    let a = &result.ingredient_assessments[0];
    assert_eq!(a.source, DataSource::AiEstimate);
    // H317: 4 × 2 × 3 = 24 → 76
    assert_eq!(a.ingredient_score, dec!(76));
    assert_eq!(a.hazard_codes[1].base_weight, dec!(4));
}

#[test]
fn cleaned_name_is_queried_but_original_kept() {
    let e = engine(
        MockLookup::default().with("Water", &["H319"]),
        MockEstimator::default(),
    );
    let result = e.score_product(&["Aqua/Water*"]);
    let a = &result.ingredient_assessments[0];
    assert_eq!(a.ingredient_name, "Aqua/Water*");
    assert_eq!(a.source, DataSource::ChemicalDatabase);
}

#[test]
fn outage_degrades_every_ingredient() {
    let e = engine(
        MockLookup::default()
            .failing("Glycerin", "HTTP 500")
            .failing("Parfum", "HTTP 500"),
        FailingEstimator,
    );
    let result = e.score_product(&["Glycerin", "Parfum"]);

    assert_eq!(result.unresolved().count(), 2);
    for a in &result.ingredient_assessments {
        assert_eq!(a.warnings.len(), 2);
    }
    assert_eq!(result.product_score, dec!(100));
}

#[test]
fn unknown_code_scored_as_category_2() {
    let e = engine(
        MockLookup::default().with("Mystery Extract", &["H399"]),
        MockEstimator::default(),
    );
    let result = e.score_product(&["Mystery Extract"]);
    let a = &result.ingredient_assessments[0];

    assert_eq!(a.hazard_codes[0].category, HazardCategory::Two);
    assert_eq!(
        a.warnings,
        vec![ResolutionWarning::UnknownHazardCode {
            code: "H399".into()
        }]
    );
    // default weight 5 × 2 × 2 = 20
    assert_eq!(a.ingredient_score, dec!(80));
    assert_eq!(result.breakdown.counts.category_2_count, 1);
}

#[test]
fn oversized_weight_uses_catalog_weight() {
    let e = engine(
        MockLookup::default(),
        MockEstimator::default().with("Mystery", &[("H350", 2.0e28, "1A")]),
    );
    let result = e.score_product(&["Mystery"]);
    let a = &result.ingredient_assessments[0];

    assert_eq!(a.source, DataSource::AiEstimate);
    assert_eq!(a.hazard_codes[0].base_weight, dec!(15));
    // 15 × 2 × 3 = 90
    assert_eq!(a.ingredient_score, dec!(10));
    assert_eq!(
        a.warnings,
        vec![ResolutionWarning::WeightOutOfRange {
            code: "H350".into(),
            weight: 2.0e28
        }]
    );
    assert_eq!(result.product_score, dec!(25));
}

#[test]
fn solvent_word_kept_in_compound_name() {
    let e = engine(
        MockLookup::default()
            .with("Eau de Parfum", &["H317"])
            .with("Parfum", &["H350"]),
        MockEstimator::default(),
    );
    let result = e.score_product(&["Eau de Parfum"]);
    assert_eq!(result.ingredient_assessments[0].hazard_codes[0].code, "H317");
}

// ---------------------------------------------------------------------------
// Engine surface
// ---------------------------------------------------------------------------
#[test]
fn missing_ingredient_list_is_an_error() {
    let e = engine(MockLookup::default(), MockEstimator::default());
    assert!(matches!(
        e.score_ingredient_text(None),
        Err(ScanError::EmptyIngredientList)
    ));

    let result = e.score_ingredient_text(Some("")).unwrap();
    assert_eq!(result.product_score, dec!(100));
}

#[test]
fn ingredient_text_is_split_and_deduplicated() {
    let e = engine(
        MockLookup::default().with("Formaldehyde", &["H350"]),
        MockEstimator::default(),
    );
    let result = e
        .score_ingredient_text(Some("Aqua, Formaldehyde, aqua , "))
        .unwrap();
    let names: Vec<_> = result
        .ingredient_assessments
        .iter()
        .map(|a| a.ingredient_name.as_str())
        .collect();
    assert_eq!(names, vec!["Aqua", "Formaldehyde"]);
}

#[test]
fn lookup_hazard_code_independent_of_scoring() {
    let e = engine(MockLookup::default(), MockEstimator::default());
    let h350 = e.lookup_hazard_code("h350").unwrap();
    assert_eq!(h350.description, "Peut provoquer le cancer");
    assert!(e.lookup_hazard_code("H999").is_none());
}

#[test]
fn scoring_is_idempotent() {
    let e = engine(
        MockLookup::default()
            .with("Formaldehyde", &["H350", "H314", "H317"])
            .with("Ethanol", &["H225", "H319"]),
        MockEstimator::default().with("Parfum", &[("H317", 4.0, "1")]),
    );
    let names = ["Formaldehyde", "Ethanol", "Parfum", "Aqua"];
    assert_eq!(e.score_product(&names), e.score_product(&names));
}

#[test]
fn legacy_formula_from_config() {
    let mut config = EngineConfig::default();
    config.scoring.formula = AggregationFormula::WeightSum;
    let e = engine_with(
        MockLookup::default().with("Sodium Lauryl Sulfate", &["H315"]),
        MockEstimator::default(),
        config,
    );
    let result = e.score_product(&["Sodium Lauryl Sulfate"]);
    assert_eq!(result.breakdown.formula, AggregationFormula::WeightSum);
    assert_eq!(result.product_score, dec!(80));
}

#[test]
fn compound_inference_follows_config() {
    let lookup = || MockLookup::default().with("Cetyl Alcohol", &[]);

    let e = engine(lookup(), MockEstimator::default());
    let a = &e.score_product(&["Cetyl Alcohol"]).ingredient_assessments[0];
    assert_eq!(a.source, DataSource::ChemicalDatabase);

    let mut config = EngineConfig::default();
    config.resolver.infer_from_compound_name = false;
    let e = engine_with(lookup(), MockEstimator::default(), config);
    let a = &e.score_product(&["Cetyl Alcohol"]).ingredient_assessments[0];
    assert_eq!(a.source, DataSource::NoData);
}

// ---------------------------------------------------------------------------
// Bounds and clamps over many products
// ---------------------------------------------------------------------------
#[test]
fn score_bounds_and_clamps_hold() {
    let codes = [
        "H350", "H340", "H360", "H372", "H314", "H315", "H319", "H317", "H225", "H400", "H410",
        "H336",
    ];
    let mut lookup = MockLookup::default();
    for (i, code) in codes.iter().enumerate() {
        lookup = lookup.with(&format!("Compound {i}"), &[*code]);
    }
    let e = engine(lookup, MockEstimator::default());

    // Every window of consecutive compounds, plus a clean filler
    for start in 0..codes.len() {
        for len in 1..=codes.len() - start {
            let mut names: Vec<String> = (start..start + len)
                .map(|i| format!("Compound {i}"))
                .collect();
            names.push("Aqua".into());

            let result = e.score_product(&names);
            let counts = &result.breakdown.counts;
            assert!(result.product_score >= dec!(0) && result.product_score <= dec!(100));
            assert_eq!(result.risk_label, RiskLabel::from_score(result.product_score));
            if counts.category_1_count > 1 {
                assert!(result.product_score <= dec!(60), "{names:?}");
            }
            if counts.category_1_count == 0 {
                assert!(result.product_score >= dec!(40), "{names:?}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Concurrent path
// ---------------------------------------------------------------------------
#[tokio::test]
async fn concurrent_matches_sequential() {
    let e = engine(
        MockLookup::default()
            .with("Formaldehyde", &["H350"])
            .with("Ethanol", &["H225", "H319"]),
        MockEstimator::default()
            .with("Parfum", &[("H317", 4.0, "1")])
            .with("Mystery", &[("H350", 2.0e28, "1A")]),
    );
    let names = ["Formaldehyde", "Aqua", "Ethanol", "Parfum", "Mystery", " * "];

    let sequential = e.score_product(&names);
    let concurrent = e
        .concurrent()
        .score_product(&names, &CancelToken::new())
        .await;
    assert_eq!(sequential, concurrent);
}
