use beautyscan_core::config::{load_config, EngineConfig};
use beautyscan_core::error::ScanError;
use beautyscan_core::ghs::HazardCodeCatalog;
use beautyscan_core::ingredients::parse_ingredient_list;
use beautyscan_core::resolve::{
    CancelToken, ChemicalCompoundLookup, HazardEstimator, NoSource, StaticCompoundLookup,
    StaticHazardEstimator,
};
use beautyscan_core::ScoringEngine;
use std::path::PathBuf;
use std::sync::Arc;

use crate::output;

pub struct ScoreArgs {
    pub ingredients: Vec<String>,
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub compounds: Option<PathBuf>,
    pub estimates: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub concurrent: bool,
    pub output_format: String,
    pub verbose: bool,
}

pub fn run(args: ScoreArgs) -> Result<(), ScanError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    // Absent tables mean a source that never answers
    let lookup: Arc<dyn ChemicalCompoundLookup> = match &args.compounds {
        Some(path) => Arc::new(StaticCompoundLookup::load(path)?),
        None => Arc::new(NoSource),
    };
    let estimator: Arc<dyn HazardEstimator> = match &args.estimates {
        Some(path) => Arc::new(StaticHazardEstimator::load(path)?),
        None => Arc::new(NoSource),
    };

    let catalog = Arc::new(HazardCodeCatalog::builtin()?);
    let engine = ScoringEngine::new(catalog, lookup, estimator, config);

    let text = ingredient_text(&args)?.ok_or(ScanError::EmptyIngredientList)?;
    let names = parse_ingredient_list(&text);

    let result = if args.concurrent {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let scorer = engine.concurrent();
        runtime.block_on(scorer.score_product(&names, &CancelToken::new()))
    } else {
        engine.score_product(&names)
    };

    match args.output_format.as_str() {
        "json" => output::json::print(&result)?,
        _ => output::table::print(&result, args.verbose),
    }

    Ok(())
}

/// Join every ingredient input into one comma-separated list. `None` when no
/// input was given at all.
fn ingredient_text(args: &ScoreArgs) -> Result<Option<String>, ScanError> {
    if args.ingredients.is_empty() && args.text.is_none() && args.file.is_none() {
        return Ok(None);
    }

    let mut parts = args.ingredients.clone();
    if let Some(text) = &args.text {
        parts.push(text.clone());
    }
    if let Some(path) = &args.file {
        // One ingredient per line works as well as a comma-separated list
        parts.push(std::fs::read_to_string(path)?.replace(['\n', '\r'], ","));
    }

    Ok(Some(parts.join(", ")))
}
