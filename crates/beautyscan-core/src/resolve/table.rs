use super::{
    ChemicalCompoundLookup, CompoundRecord, HazardEstimator, RawHazardCode, SourceOutcome,
};
use crate::error::ScanError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A source that never knows anything. Stands in for an absent backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl ChemicalCompoundLookup for NoSource {
    fn search(&self, _ingredient_name: &str) -> SourceOutcome<CompoundRecord> {
        SourceOutcome::Empty
    }

    fn backend_name(&self) -> &str {
        "none"
    }
}

impl HazardEstimator for NoSource {
    fn estimate(&self, _ingredient_name: &str) -> SourceOutcome<Vec<RawHazardCode>> {
        SourceOutcome::Empty
    }

    fn backend_name(&self) -> &str {
        "none"
    }
}

#[derive(Debug, Deserialize)]
struct CompoundTableDef {
    compounds: Vec<CompoundRecord>,
}

/// Compound database backed by a JSON table.
///
/// ```json
/// { "compounds": [
///     { "name": "Formaldehyde", "synonyms": ["Formalin"],
///       "hazard_codes": [{ "code": "H350", "category": "1B" }] }
/// ] }
/// ```
///
/// Names and synonyms match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticCompoundLookup {
    compounds: Vec<CompoundRecord>,
    index: HashMap<String, usize>,
}

impl StaticCompoundLookup {
    pub fn new(compounds: Vec<CompoundRecord>) -> Self {
        let mut index = HashMap::new();
        for (i, compound) in compounds.iter().enumerate() {
            for key in std::iter::once(&compound.name).chain(&compound.synonyms) {
                index.entry(key.trim().to_lowercase()).or_insert(i);
            }
        }
        Self { compounds, index }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScanError> {
        let def: CompoundTableDef = serde_json::from_str(json)?;
        Ok(Self::new(def.compounds))
    }

    pub fn load(path: &Path) -> Result<Self, ScanError> {
        read_table(path).and_then(|json| {
            Self::from_json_str(&json).map_err(|e| ScanError::CollaboratorLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })
    }

    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }
}

impl ChemicalCompoundLookup for StaticCompoundLookup {
    fn search(&self, ingredient_name: &str) -> SourceOutcome<CompoundRecord> {
        match self.index.get(&ingredient_name.trim().to_lowercase()) {
            Some(&i) => SourceOutcome::Found(self.compounds[i].clone()),
            None => SourceOutcome::Empty,
        }
    }

    fn backend_name(&self) -> &str {
        "static-compounds"
    }
}

#[derive(Debug, Deserialize)]
struct EstimateTableDef {
    #[serde(default)]
    estimates: HashMap<String, Vec<RawHazardCode>>,
    #[serde(default)]
    default: Vec<RawHazardCode>,
}

/// Hazard estimator backed by a JSON table of per-ingredient estimates,
/// with an optional default for ingredients not listed.
///
/// ```json
/// { "estimates": { "Limonene": [{ "code": "H317", "weight": 4 }] },
///   "default": [{ "code": "H315" }, { "code": "H319" }] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticHazardEstimator {
    estimates: HashMap<String, Vec<RawHazardCode>>,
    default: Vec<RawHazardCode>,
}

impl StaticHazardEstimator {
    pub fn new(
        estimates: impl IntoIterator<Item = (String, Vec<RawHazardCode>)>,
        default: Vec<RawHazardCode>,
    ) -> Self {
        Self {
            estimates: estimates
                .into_iter()
                .map(|(name, codes)| (name.trim().to_lowercase(), codes))
                .collect(),
            default,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScanError> {
        let def: EstimateTableDef = serde_json::from_str(json)?;
        Ok(Self::new(def.estimates, def.default))
    }

    pub fn load(path: &Path) -> Result<Self, ScanError> {
        read_table(path).and_then(|json| {
            Self::from_json_str(&json).map_err(|e| ScanError::CollaboratorLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })
    }
}

impl HazardEstimator for StaticHazardEstimator {
    fn estimate(&self, ingredient_name: &str) -> SourceOutcome<Vec<RawHazardCode>> {
        let codes = self
            .estimates
            .get(&ingredient_name.trim().to_lowercase())
            .unwrap_or(&self.default);
        if codes.is_empty() {
            SourceOutcome::Empty
        } else {
            SourceOutcome::Found(codes.clone())
        }
    }

    fn backend_name(&self) -> &str {
        "static-estimates"
    }
}

fn read_table(path: &Path) -> Result<String, ScanError> {
    std::fs::read_to_string(path).map_err(|e| ScanError::CollaboratorLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
