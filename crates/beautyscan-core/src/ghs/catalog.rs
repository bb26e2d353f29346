use super::schema::HazardCatalogDef;
use crate::error::ScanError;
use crate::model::{HazardBucket, HazardCategory};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

const GHS_HAZARD_CODES_JSON: &str = include_str!("../../data/ghs-hazard-codes.json");

/// A catalog entry for one hazard statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardCode {
    /// Hazard statement code (e.g., "H350").
    pub code: String,
    /// GHS hazard class name (e.g., "Cancérogénicité").
    pub hazard_class: String,
    /// GHS category as published in the table.
    pub category: HazardCategory,
    pub description: String,
    /// Severity magnitude used for scoring when a source gives no weight.
    pub base_weight: Decimal,
    /// Magnitude of the published label weight (5–50), for display.
    pub label_weight: Decimal,
}

impl HazardCode {
    pub fn bucket(&self) -> Option<HazardBucket> {
        HazardBucket::from_code(&self.code)
    }
}

/// Immutable GHS hazard-code reference table plus the scoring profile.
///
/// Built once and shared by reference; there is no global instance.
#[derive(Debug, Clone)]
pub struct HazardCodeCatalog {
    version: String,
    codes: BTreeMap<String, HazardCode>,
    default_weight: Decimal,
    default_category: HazardCategory,
    inferred_categories: BTreeMap<String, HazardCategory>,
}

impl HazardCodeCatalog {
    /// The embedded GHS table.
    pub fn builtin() -> Result<Self, ScanError> {
        Self::from_json_str(GHS_HAZARD_CODES_JSON)
    }

    /// Parse and validate a catalog file.
    pub fn from_json_str(json: &str) -> Result<Self, ScanError> {
        let def: HazardCatalogDef = serde_json::from_str(json)?;
        Self::from_def(def)
    }

    /// Build the catalog, flipping published negative weights to magnitudes.
    pub fn from_def(def: HazardCatalogDef) -> Result<Self, ScanError> {
        if def.codes.is_empty() {
            return Err(ScanError::CatalogInvalid("codes must not be empty".into()));
        }
        if def.scoring.default_weight == 0 {
            return Err(ScanError::CatalogInvalid(
                "scoring.default_weight must be positive".into(),
            ));
        }

        let default_category = parse_category(&def.scoring.default_category, "scoring")?;

        let mut inferred_categories = BTreeMap::new();
        for (code, category) in &def.scoring.categories {
            check_code_format(code)?;
            inferred_categories.insert(normalize_code(code), parse_category(category, code)?);
        }

        let mut scoring_weights = BTreeMap::new();
        for (code, weight) in &def.scoring.weights {
            check_code_format(code)?;
            if *weight == 0 {
                return Err(ScanError::CatalogInvalid(format!(
                    "scoring weight for '{}' must be positive",
                    code
                )));
            }
            scoring_weights.insert(normalize_code(code), Decimal::from(*weight));
        }

        let default_weight = Decimal::from(def.scoring.default_weight);
        let mut codes = BTreeMap::new();
        for (code, entry) in def.codes {
            check_code_format(&code)?;
            if entry.class.trim().is_empty() || entry.description.trim().is_empty() {
                return Err(ScanError::CatalogInvalid(format!(
                    "'{}' must have a class and a description",
                    code
                )));
            }
            if entry.weight == 0 {
                return Err(ScanError::CatalogInvalid(format!(
                    "'{}' has a zero label weight",
                    code
                )));
            }
            let code = normalize_code(&code);
            let category = parse_category(&entry.category, &code)?;
            let base_weight = scoring_weights
                .get(&code)
                .copied()
                .unwrap_or(default_weight);
            codes.insert(
                code.clone(),
                HazardCode {
                    code,
                    hazard_class: entry.class,
                    category,
                    description: entry.description,
                    base_weight,
                    label_weight: Decimal::from(entry.weight.unsigned_abs()),
                },
            );
        }

        Ok(Self {
            version: def.version,
            codes,
            default_weight,
            default_category,
            inferred_categories,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Look up a hazard code. Suffixed variants ("H350i", "H360FD") fall back
    /// to their base code.
    pub fn lookup(&self, code: &str) -> Option<&HazardCode> {
        let code = normalize_code(code);
        self.codes
            .get(&code)
            .or_else(|| base_code(&code).and_then(|base| self.codes.get(base)))
    }

    /// Like [`lookup`](Self::lookup), but an unknown code is an error.
    pub fn require(&self, code: &str) -> Result<&HazardCode, ScanError> {
        self.lookup(code)
            .ok_or_else(|| ScanError::UnknownHazardCode(normalize_code(code)))
    }

    /// Display bucket from the code's leading digit; `None` for anything else.
    pub fn category_bucket_for(&self, code: &str) -> Option<HazardBucket> {
        HazardBucket::from_code(&normalize_code(code))
    }

    /// Scoring base weight for a code, or the profile default when unknown.
    pub fn base_weight_for(&self, code: &str) -> Decimal {
        self.lookup(code)
            .map(|hc| hc.base_weight)
            .unwrap_or(self.default_weight)
    }

    /// Category from the static map, used when a source gives none.
    pub fn inferred_category(&self, code: &str) -> HazardCategory {
        let code = normalize_code(code);
        self.inferred_categories
            .get(&code)
            .or_else(|| base_code(&code).and_then(|base| self.inferred_categories.get(base)))
            .copied()
            .unwrap_or(self.default_category)
    }

    /// All entries in code order.
    pub fn codes(&self) -> impl Iterator<Item = &HazardCode> {
        self.codes.values()
    }

    pub fn codes_in_bucket(&self, bucket: HazardBucket) -> impl Iterator<Item = &HazardCode> {
        self.codes
            .values()
            .filter(move |hc| hc.bucket() == Some(bucket))
    }
}

/// Trim, upper-case and drop inner whitespace ("h 350" → "H350").
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// "H350I" → "H350". `None` when the code is already a base code or malformed.
fn base_code(code: &str) -> Option<&str> {
    if code.len() > 4 && code.is_char_boundary(4) && is_base_code(&code[..4]) {
        Some(&code[..4])
    } else {
        None
    }
}

fn is_base_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 4 && bytes[0] == b'H' && bytes[1..].iter().all(u8::is_ascii_digit)
}

fn check_code_format(code: &str) -> Result<(), ScanError> {
    if is_base_code(&normalize_code(code)) {
        Ok(())
    } else {
        Err(ScanError::CatalogInvalid(format!(
            "'{}' is not a hazard code (expected H followed by three digits)",
            code
        )))
    }
}

fn parse_category(raw: &str, context: &str) -> Result<HazardCategory, ScanError> {
    HazardCategory::from_str_loose(raw).ok_or_else(|| {
        ScanError::CatalogInvalid(format!("'{}' has invalid category '{}'", context, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog() -> HazardCodeCatalog {
        HazardCodeCatalog::builtin().unwrap()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let cat = catalog();
        assert_eq!(cat.len(), 69);
        assert!(cat.lookup("H200").is_some());
        assert!(cat.lookup("H413").is_some());
    }

    #[test]
    fn test_lookup_carcinogen() {
        let hc = catalog().lookup("H350").cloned().unwrap();
        assert_eq!(hc.hazard_class, "Cancérogénicité");
        assert_eq!(hc.category, HazardCategory::One);
        assert_eq!(hc.description, "Peut provoquer le cancer");
        assert_eq!(hc.base_weight, dec!(15));
        assert_eq!(hc.label_weight, dec!(40));
    }

    #[test]
    fn test_label_weights_are_magnitudes() {
        let cat = catalog();
        assert!(cat.codes().all(|hc| hc.label_weight > Decimal::ZERO));
        assert!(cat
            .codes()
            .all(|hc| hc.label_weight >= dec!(5) && hc.label_weight <= dec!(50)));
    }

    #[test]
    fn test_uncurated_code_gets_default_weight() {
        let cat = catalog();
        assert_eq!(cat.lookup("H302").unwrap().base_weight, dec!(5));
        assert_eq!(cat.base_weight_for("H999"), dec!(5));
    }

    #[test]
    fn test_lookup_normalizes_and_strips_suffix() {
        let cat = catalog();
        assert_eq!(cat.lookup(" h350 ").unwrap().code, "H350");
        assert_eq!(cat.lookup("H350i").unwrap().code, "H350");
        assert_eq!(cat.lookup("H360FD").unwrap().code, "H360");
        assert!(cat.lookup("H999").is_none());
        assert!(cat.lookup("EUH066").is_none());
        assert!(cat.lookup("").is_none());
    }

    #[test]
    fn test_require_unknown_code_errors() {
        let err = catalog().require("H999").unwrap_err();
        assert!(matches!(err, ScanError::UnknownHazardCode(ref c) if c == "H999"));
    }

    #[test]
    fn test_inferred_categories() {
        let cat = catalog();
        assert_eq!(cat.inferred_category("H350"), HazardCategory::OneA);
        assert_eq!(cat.inferred_category("H360FD"), HazardCategory::OneA);
        assert_eq!(cat.inferred_category("H372"), HazardCategory::OneB);
        assert_eq!(cat.inferred_category("H318"), HazardCategory::OneB);
        assert_eq!(cat.inferred_category("H315"), HazardCategory::Two);
        assert_eq!(cat.inferred_category("H400"), HazardCategory::Two);
        assert_eq!(cat.inferred_category("H302"), HazardCategory::Two);
        assert_eq!(cat.inferred_category("XYZ"), HazardCategory::Two);
    }

    #[test]
    fn test_category_bucket_for() {
        let cat = catalog();
        assert_eq!(cat.category_bucket_for("h225"), Some(HazardBucket::Physical));
        assert_eq!(cat.category_bucket_for("H336"), Some(HazardBucket::Health));
        assert_eq!(
            cat.category_bucket_for("H412"),
            Some(HazardBucket::Environmental)
        );
        assert_eq!(cat.category_bucket_for("EUH208"), None);
    }

    #[test]
    fn test_codes_in_bucket_spans_bands() {
        let cat = catalog();
        assert!(cat
            .codes_in_bucket(HazardBucket::Physical)
            .all(|hc| hc.code.starts_with("H2")));
        assert_eq!(cat.codes_in_bucket(HazardBucket::Environmental).count(), 7);
        let total: usize = [
            HazardBucket::Health,
            HazardBucket::Physical,
            HazardBucket::Environmental,
        ]
        .iter()
        .map(|b| cat.codes_in_bucket(*b).count())
        .sum();
        assert_eq!(total, cat.len());
    }

    #[test]
    fn test_invalid_code_rejected() {
        let json = r#"{
            "version": "1",
            "description": "bad",
            "codes": { "X350": { "class": "C", "category": "1", "description": "d", "weight": -10 } },
            "scoring": { "default_weight": 5, "default_category": "2" }
        }"#;
        assert!(HazardCodeCatalog::from_json_str(json).is_err());
    }

    #[test]
    fn test_zero_weight_rejected() {
        let json = r#"{
            "version": "1",
            "description": "bad",
            "codes": { "H350": { "class": "C", "category": "1", "description": "d", "weight": 0 } },
            "scoring": { "default_weight": 5, "default_category": "2" }
        }"#;
        assert!(HazardCodeCatalog::from_json_str(json).is_err());
    }

    #[test]
    fn test_invalid_category_rejected() {
        let json = r#"{
            "version": "1",
            "description": "bad",
            "codes": { "H350": { "class": "C", "category": "severe", "description": "d", "weight": -10 } },
            "scoring": { "default_weight": 5, "default_category": "2" }
        }"#;
        assert!(HazardCodeCatalog::from_json_str(json).is_err());
    }

    #[test]
    fn test_custom_catalog() {
        let json = r#"{
            "version": "test",
            "description": "two codes",
            "codes": {
                "H315": { "class": "Irritation", "category": "2", "description": "Irritant", "weight": -10 },
                "H400": { "class": "Aquatique", "category": "1", "description": "Toxique", "weight": -20 }
            },
            "scoring": { "default_weight": 7, "weights": { "H400": 9 }, "default_category": "3" }
        }"#;
        let cat = HazardCodeCatalog::from_json_str(json).unwrap();
        assert_eq!(cat.version(), "test");
        assert_eq!(cat.lookup("H315").unwrap().base_weight, dec!(7));
        assert_eq!(cat.lookup("H400").unwrap().base_weight, dec!(9));
        assert_eq!(cat.inferred_category("H400"), HazardCategory::Three);
    }
}
