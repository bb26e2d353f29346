use super::RawHazardCode;

/// Compound families with well-known hazard codes. First match wins.
const COMPOUND_FAMILIES: &[(&str, &[&str])] = &[
    ("paraben", &["H315", "H319"]),
    ("alcohol", &["H225", "H319"]),
    ("sulfate", &["H315", "H319"]),
    ("formaldehyde", &["H350", "H314", "H317"]),
];

/// Hazard codes implied by a compound's name, for database hits that carry
/// no hazard data of their own. Weights and categories are left to the catalog.
pub fn infer_codes(compound_name: &str) -> Vec<RawHazardCode> {
    let name = compound_name.to_lowercase();

    COMPOUND_FAMILIES
        .iter()
        .find(|(family, _)| name.contains(family))
        .map(|(_, codes)| codes.iter().map(|c| RawHazardCode::new(c)).collect())
        .unwrap_or_default()
}
