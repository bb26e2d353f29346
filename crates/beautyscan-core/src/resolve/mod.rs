pub mod concurrent;
pub mod inference;
pub mod table;

use crate::ghs::{normalize_code, HazardCodeCatalog};
use crate::ingredients::clean_ingredient_name;
use crate::model::{DataSource, HazardCategory};
use crate::score::{HazardEntry, IngredientHazardAssessment, ResolutionWarning};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use concurrent::{CancelToken, ConcurrentScorer};
pub use table::{NoSource, StaticCompoundLookup, StaticHazardEstimator};

/// What a data source returned for one query.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome<T> {
    Found(T),
    /// The source answered but knows nothing useful.
    Empty,
    /// The source could not answer (network, parse, timeout ...).
    Failed { reason: String },
}

/// A hazard code as reported by a source, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHazardCode {
    pub code: String,
    /// Signed or unsigned severity; the magnitude is used.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Free-form category ("1A", "Cat. 2", "category 1B" ...).
    #[serde(default)]
    pub category: Option<String>,
}

impl RawHazardCode {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            weight: None,
            category: None,
        }
    }
}

/// A compound found in a chemical database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub hazard_codes: Vec<RawHazardCode>,
}

/// Chemical-database client (primary source).
///
/// Implementations report errors and timeouts as [`SourceOutcome::Failed`]
/// instead of panicking.
pub trait ChemicalCompoundLookup: Send + Sync {
    fn search(&self, ingredient_name: &str) -> SourceOutcome<CompoundRecord>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Estimator consulted when the database has no hazard codes (fallback source).
pub trait HazardEstimator: Send + Sync {
    fn estimate(&self, ingredient_name: &str) -> SourceOutcome<Vec<RawHazardCode>>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Validated hazard entries from one source, with data-quality warnings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceAttempt {
    pub entries: Vec<HazardEntry>,
    pub warnings: Vec<ResolutionWarning>,
}

/// Resolves an ingredient name to hazard codes through the source chain
/// (chemical database, then estimator, then nothing).
pub struct IngredientRiskResolver {
    catalog: Arc<HazardCodeCatalog>,
    lookup: Arc<dyn ChemicalCompoundLookup>,
    estimator: Arc<dyn HazardEstimator>,
    infer_from_compound_name: bool,
}

impl IngredientRiskResolver {
    pub fn new(
        catalog: Arc<HazardCodeCatalog>,
        lookup: Arc<dyn ChemicalCompoundLookup>,
        estimator: Arc<dyn HazardEstimator>,
    ) -> Self {
        Self {
            catalog,
            lookup,
            estimator,
            infer_from_compound_name: true,
        }
    }

    /// Enable or disable name-based inference for database hits without codes.
    pub fn with_compound_inference(mut self, enabled: bool) -> Self {
        self.infer_from_compound_name = enabled;
        self
    }

    pub fn catalog(&self) -> &HazardCodeCatalog {
        &self.catalog
    }

    /// Resolve and score one ingredient. Never fails: source errors degrade
    /// to the next source and finally to `source = none`.
    pub fn resolve(&self, ingredient_name: &str) -> IngredientHazardAssessment {
        let mut chain = match self.begin(ingredient_name) {
            Ok(chain) => chain,
            Err(unresolved) => return unresolved,
        };

        while let Some(source) = chain.next_source() {
            let outcome = self.query_source(source, chain.query());
            if let Some(assessment) = chain.record(source, outcome) {
                return assessment;
            }
        }

        chain.finish()
    }

    /// Clean the name and start walking the source chain. A name that cleans
    /// to nothing is returned as unresolved without asking any source.
    pub(crate) fn begin<'a>(
        &'a self,
        ingredient_name: &'a str,
    ) -> Result<SourceChain<'a>, IngredientHazardAssessment> {
        let query = clean_ingredient_name(ingredient_name);
        if query.is_empty() {
            tracing::debug!(ingredient = ingredient_name, "nothing to look up");
            return Err(IngredientHazardAssessment::unresolved(
                ingredient_name,
                Vec::new(),
            ));
        }

        Ok(SourceChain {
            resolver: self,
            ingredient_name,
            query,
            next: 0,
            warnings: Vec::new(),
        })
    }

    /// Query one source of the chain.
    pub fn query_source(&self, source: DataSource, query: &str) -> SourceOutcome<SourceAttempt> {
        match source {
            DataSource::ChemicalDatabase => self.query_database(query),
            DataSource::AiEstimate => self.query_estimator(query),
            DataSource::NoData => SourceOutcome::Empty,
        }
    }

    /// Ask the chemical database, inferring codes from the compound name
    /// when the record carries none.
    pub fn query_database(&self, query: &str) -> SourceOutcome<SourceAttempt> {
        let record = match self.lookup.search(query) {
            SourceOutcome::Found(record) => record,
            SourceOutcome::Empty => return SourceOutcome::Empty,
            SourceOutcome::Failed { reason } => return SourceOutcome::Failed { reason },
        };

        let mut raw = record.hazard_codes;
        if self.infer_from_compound_name && raw.iter().all(|c| c.code.trim().is_empty()) {
            let name = if record.name.trim().is_empty() {
                query
            } else {
                record.name.as_str()
            };
            raw = inference::infer_codes(name);
            if !raw.is_empty() {
                tracing::debug!(compound = name, codes = raw.len(), "inferred codes from compound name");
            }
        }

        self.validated(raw)
    }

    /// Ask the hazard estimator.
    pub fn query_estimator(&self, query: &str) -> SourceOutcome<SourceAttempt> {
        match self.estimator.estimate(query) {
            SourceOutcome::Found(raw) => self.validated(raw),
            SourceOutcome::Empty => SourceOutcome::Empty,
            SourceOutcome::Failed { reason } => SourceOutcome::Failed { reason },
        }
    }

    fn validated(&self, raw: Vec<RawHazardCode>) -> SourceOutcome<SourceAttempt> {
        let attempt = self.normalize_entries(raw);
        if attempt.entries.is_empty() {
            SourceOutcome::Empty
        } else {
            SourceOutcome::Found(attempt)
        }
    }

    /// Validate raw codes: drop blanks and duplicates, take weight magnitudes
    /// (catalog weight when missing, zero or above [`MAX_REPORTED_WEIGHT`]) and
    /// parse categories (static map when missing or unparseable).
    pub fn normalize_entries(&self, raw: Vec<RawHazardCode>) -> SourceAttempt {
        let mut attempt = SourceAttempt::default();

        for r in raw {
            let code = normalize_code(&r.code);
            if code.is_empty() || attempt.entries.iter().any(|e| e.code == code) {
                continue;
            }

            if self.catalog.lookup(&code).is_none() {
                tracing::warn!(code = %code, "hazard code not in catalog");
                attempt
                    .warnings
                    .push(ResolutionWarning::UnknownHazardCode { code: code.clone() });
            }

            let base_weight = match r.weight {
                Some(w) if w.abs() > MAX_REPORTED_WEIGHT => {
                    tracing::warn!(code = %code, weight = w, "reported weight out of range");
                    attempt.warnings.push(ResolutionWarning::WeightOutOfRange {
                        code: code.clone(),
                        weight: w,
                    });
                    self.catalog.base_weight_for(&code)
                }
                Some(w) => weight_magnitude(w)
                    .unwrap_or_else(|| self.catalog.base_weight_for(&code)),
                None => self.catalog.base_weight_for(&code),
            };
            let category = r
                .category
                .as_deref()
                .and_then(HazardCategory::from_str_loose)
                .unwrap_or_else(|| self.catalog.inferred_category(&code));

            attempt.entries.push(HazardEntry {
                code,
                base_weight,
                category,
            });
        }

        attempt
    }

    /// Turn one source's outcome into an assessment, or record why it gave
    /// nothing and return `None` so the chain moves on.
    fn settle(
        &self,
        ingredient_name: &str,
        source: DataSource,
        outcome: SourceOutcome<SourceAttempt>,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Option<IngredientHazardAssessment> {
        match outcome {
            SourceOutcome::Found(attempt) => {
                tracing::debug!(
                    ingredient = ingredient_name,
                    %source,
                    codes = attempt.entries.len(),
                    "resolved hazard codes"
                );
                warnings.extend(attempt.warnings);
                Some(IngredientHazardAssessment::new(
                    ingredient_name,
                    source,
                    attempt.entries,
                    std::mem::take(warnings),
                ))
            }
            SourceOutcome::Empty => {
                tracing::debug!(ingredient = ingredient_name, %source, "no hazard codes");
                None
            }
            SourceOutcome::Failed { reason } => {
                tracing::warn!(ingredient = ingredient_name, %source, %reason, "source failed");
                warnings.push(ResolutionWarning::SourceFailed { source, reason });
                None
            }
        }
    }
}

/// One ingredient's walk through the source chain (database, then
/// estimator). Callers run each query themselves, so the sequential and
/// concurrent paths share the chain's order and bookkeeping.
pub(crate) struct SourceChain<'a> {
    resolver: &'a IngredientRiskResolver,
    ingredient_name: &'a str,
    query: String,
    next: usize,
    warnings: Vec<ResolutionWarning>,
}

const SOURCE_ORDER: [DataSource; 2] = [DataSource::ChemicalDatabase, DataSource::AiEstimate];

impl SourceChain<'_> {
    /// The cleaned name sent to sources.
    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn next_source(&mut self) -> Option<DataSource> {
        let source = SOURCE_ORDER.get(self.next).copied();
        self.next += 1;
        source
    }

    /// Record a source's outcome. Returns the assessment once a source has
    /// hazard codes.
    pub(crate) fn record(
        &mut self,
        source: DataSource,
        outcome: SourceOutcome<SourceAttempt>,
    ) -> Option<IngredientHazardAssessment> {
        self.resolver
            .settle(self.ingredient_name, source, outcome, &mut self.warnings)
    }

    /// Stop early; the ingredient counts as unresolved.
    pub(crate) fn cancelled(mut self) -> IngredientHazardAssessment {
        self.warnings.push(ResolutionWarning::Cancelled);
        self.finish()
    }

    /// No source had codes.
    pub(crate) fn finish(self) -> IngredientHazardAssessment {
        IngredientHazardAssessment::unresolved(self.ingredient_name, self.warnings)
    }
}

/// Largest weight magnitude accepted from a source. Curated weights stay
/// below 50; anything past this is a source error.
pub const MAX_REPORTED_WEIGHT: f64 = 1000.0;

/// Non-zero magnitude of a reported weight, to four decimals.
fn weight_magnitude(weight: f64) -> Option<Decimal> {
    if !weight.is_finite() || weight.abs() > MAX_REPORTED_WEIGHT {
        return None;
    }
    Decimal::from_f64_retain(weight.abs())
        .map(|d| d.round_dp(4).normalize())
        .filter(|d| !d.is_zero())
}
