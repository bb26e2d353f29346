use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

const FACTOR_SEVERE: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const FACTOR_HEALTH: Decimal = Decimal::from_parts(2, 0, 0, false, 0);
const FACTOR_PHYSICAL: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
const FACTOR_ENVIRONMENT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// GHS severity tier attached to a hazard statement. Lower numbers are more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardCategory {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "1A")]
    OneA,
    #[serde(rename = "1B")]
    OneB,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "unspecified")]
    Unspecified,
}

impl HazardCategory {
    /// Parse a category label as upstream sources write it
    /// ("1A", "Cat. 2", "category 1B", "Catégorie 3").
    ///
    /// Returns `None` for anything that is not a recognizable GHS tier.
    pub fn from_str_loose(s: &str) -> Option<HazardCategory> {
        let mut rest = s.trim().to_lowercase();
        for prefix in ["catégorie", "categorie", "category", "cat."] {
            if let Some(stripped) = rest.strip_prefix(prefix) {
                rest = stripped.trim().to_string();
                break;
            }
        }
        match rest.to_uppercase().as_str() {
            "1" => Some(HazardCategory::One),
            "1A" => Some(HazardCategory::OneA),
            "1B" => Some(HazardCategory::OneB),
            "2" => Some(HazardCategory::Two),
            "3" => Some(HazardCategory::Three),
            "4" => Some(HazardCategory::Four),
            _ => None,
        }
    }

    /// Multiplier applied to a hazard's base weight.
    pub fn factor(&self) -> Decimal {
        match self {
            HazardCategory::One | HazardCategory::OneA | HazardCategory::OneB => FACTOR_SEVERE,
            HazardCategory::Two => FACTOR_HEALTH,
            HazardCategory::Three | HazardCategory::Four | HazardCategory::Unspecified => {
                Decimal::ONE
            }
        }
    }

    /// Severity bucket used for product-level counting: 1 (incl. 1A/1B), 2 or 3.
    ///
    /// Category 4 and unspecified hazards are not counted.
    pub fn severity_tier(&self) -> Option<u8> {
        match self {
            HazardCategory::One | HazardCategory::OneA | HazardCategory::OneB => Some(1),
            HazardCategory::Two => Some(2),
            HazardCategory::Three => Some(3),
            HazardCategory::Four | HazardCategory::Unspecified => None,
        }
    }
}

impl fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HazardCategory::One => "1",
            HazardCategory::OneA => "1A",
            HazardCategory::OneB => "1B",
            HazardCategory::Two => "2",
            HazardCategory::Three => "3",
            HazardCategory::Four => "4",
            HazardCategory::Unspecified => "unspecified",
        };
        write!(f, "{s}")
    }
}

/// Display bucket derived from the leading digit of a hazard code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardBucket {
    Health,
    Physical,
    Environmental,
}

impl HazardBucket {
    /// `H2*` → Physical, `H3*` → Health, `H4*` → Environmental.
    pub fn from_code(code: &str) -> Option<HazardBucket> {
        let code = code.trim();
        let mut chars = code.chars();
        if !matches!(chars.next(), Some('H' | 'h')) {
            return None;
        }
        match chars.next() {
            Some('2') => Some(HazardBucket::Physical),
            Some('3') => Some(HazardBucket::Health),
            Some('4') => Some(HazardBucket::Environmental),
            _ => None,
        }
    }

    pub fn from_str_loose(s: &str) -> Option<HazardBucket> {
        match s.trim().to_lowercase().as_str() {
            "health" | "santé" | "sante" => Some(HazardBucket::Health),
            "physical" | "physique" => Some(HazardBucket::Physical),
            "environmental" | "environment" | "environnement" => Some(HazardBucket::Environmental),
            _ => None,
        }
    }

    /// Multiplier applied to a hazard's base weight by hazard class.
    pub fn class_factor(bucket: Option<HazardBucket>) -> Decimal {
        match bucket {
            Some(HazardBucket::Health) => FACTOR_HEALTH,
            Some(HazardBucket::Physical) => FACTOR_PHYSICAL,
            Some(HazardBucket::Environmental) => FACTOR_ENVIRONMENT,
            None => Decimal::ONE,
        }
    }

    pub fn display_fr(&self) -> &'static str {
        match self {
            HazardBucket::Health => "Santé",
            HazardBucket::Physical => "Physique",
            HazardBucket::Environmental => "Environnement",
        }
    }
}

impl fmt::Display for HazardBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HazardBucket::Health => write!(f, "Health"),
            HazardBucket::Physical => write!(f, "Physical"),
            HazardBucket::Environmental => write!(f, "Environmental"),
        }
    }
}

/// Where an ingredient's hazard codes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    ChemicalDatabase,
    AiEstimate,
    #[serde(rename = "none")]
    NoData,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::ChemicalDatabase => write!(f, "chemical database"),
            DataSource::AiEstimate => write!(f, "AI estimate"),
            DataSource::NoData => write!(f, "no data"),
        }
    }
}

/// Qualitative label for a product score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Excellent,
    Good,
    Mediocre,
    Bad,
}

impl RiskLabel {
    /// `≥ 75` Excellent, `≥ 50` Good, `≥ 25` Mediocre, otherwise Bad.
    pub fn from_score(score: Decimal) -> RiskLabel {
        if score >= Decimal::from(75) {
            RiskLabel::Excellent
        } else if score >= Decimal::from(50) {
            RiskLabel::Good
        } else if score >= Decimal::from(25) {
            RiskLabel::Mediocre
        } else {
            RiskLabel::Bad
        }
    }

    pub fn display_fr(&self) -> &'static str {
        match self {
            RiskLabel::Excellent => "Excellent",
            RiskLabel::Good => "Bon",
            RiskLabel::Mediocre => "Médiocre",
            RiskLabel::Bad => "Mauvais",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLabel::Excellent => write!(f, "Excellent"),
            RiskLabel::Good => write!(f, "Good"),
            RiskLabel::Mediocre => write!(f, "Mediocre"),
            RiskLabel::Bad => write!(f, "Bad"),
        }
    }
}

/// Coarse per-ingredient risk level for display next to each ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientRisk {
    High,
    Medium,
    Low,
    None,
}

const HIGH_RISK_CODES: &[&str] = &[
    "H300", "H301", "H310", "H311", "H330", "H331", "H340", "H350", "H360",
];
const MEDIUM_RISK_CODES: &[&str] = &["H315", "H319", "H335", "H336", "H400", "H410", "H411"];

impl IngredientRisk {
    /// The worst level any of the codes reaches.
    pub fn from_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> IngredientRisk {
        let mut level = IngredientRisk::None;
        for code in codes {
            if HIGH_RISK_CODES.contains(&code) {
                return IngredientRisk::High;
            }
            if MEDIUM_RISK_CODES.contains(&code) {
                level = IngredientRisk::Medium;
            } else if level == IngredientRisk::None {
                level = IngredientRisk::Low;
            }
        }
        level
    }
}

impl fmt::Display for IngredientRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngredientRisk::High => write!(f, "high"),
            IngredientRisk::Medium => write!(f, "medium"),
            IngredientRisk::Low => write!(f, "low"),
            IngredientRisk::None => write!(f, "none"),
        }
    }
}
