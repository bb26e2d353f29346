pub mod config;
pub mod error;
pub mod ghs;
pub mod ingredients;
pub mod model;
pub mod resolve;
pub mod score;

use config::EngineConfig;
use error::ScanError;
use ghs::{HazardCode, HazardCodeCatalog};
use resolve::{ChemicalCompoundLookup, ConcurrentScorer, HazardEstimator, IngredientRiskResolver};
use score::{ProductScoreAggregator, ProductScoreResult};
use std::sync::Arc;

/// Main API entry point: resolves ingredient names against the injected data
/// sources and scores products.
///
/// The engine holds no mutable state; one instance can serve any number of
/// scoring calls.
pub struct ScoringEngine {
    catalog: Arc<HazardCodeCatalog>,
    resolver: Arc<IngredientRiskResolver>,
    aggregator: ProductScoreAggregator,
    config: EngineConfig,
}

impl ScoringEngine {
    pub fn new(
        catalog: Arc<HazardCodeCatalog>,
        lookup: Arc<dyn ChemicalCompoundLookup>,
        estimator: Arc<dyn HazardEstimator>,
        config: EngineConfig,
    ) -> Self {
        let resolver = IngredientRiskResolver::new(catalog.clone(), lookup, estimator)
            .with_compound_inference(config.resolver.infer_from_compound_name);
        let aggregator = ProductScoreAggregator::new(catalog.clone(), config.scoring.formula);

        Self {
            catalog,
            resolver: Arc::new(resolver),
            aggregator,
            config,
        }
    }

    /// Score an ordered list of ingredient names, resolving them one by one.
    ///
    /// An empty list is valid and scores 100.
    pub fn score_product<S: AsRef<str>>(&self, ingredient_names: &[S]) -> ProductScoreResult {
        let assessments = ingredient_names
            .iter()
            .map(|name| self.resolver.resolve(name.as_ref()))
            .collect();
        self.aggregator.aggregate(assessments)
    }

    /// Score a raw comma-separated ingredient list. A missing list is an
    /// error; an empty one is not.
    pub fn score_ingredient_text(&self, text: Option<&str>) -> Result<ProductScoreResult, ScanError> {
        let text = text.ok_or(ScanError::EmptyIngredientList)?;
        let names = ingredients::parse_ingredient_list(text);
        Ok(self.score_product(&names))
    }

    /// Catalog entry for a hazard code, independent of any scoring run.
    pub fn lookup_hazard_code(&self, code: &str) -> Option<&HazardCode> {
        self.catalog.lookup(code)
    }

    /// Concurrent scorer sharing this engine's resolver and settings.
    pub fn concurrent(&self) -> ConcurrentScorer {
        ConcurrentScorer::new(
            self.resolver.clone(),
            self.aggregator.clone(),
            &self.config.resolver,
        )
    }

    pub fn catalog(&self) -> &HazardCodeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
