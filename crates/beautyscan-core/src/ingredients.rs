use std::collections::HashSet;

/// Split a comma-separated ingredient list into unique names.
///
/// Entries are trimmed and empties dropped. Duplicates are detected
/// case-insensitively; the first occurrence keeps its original casing.
pub fn parse_ingredient_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ingredients = Vec::new();

    for raw in text.split(',') {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.to_lowercase()) {
            ingredients.push(name.to_string());
        }
    }

    ingredients
}

const MARKERS: &[char] = &['*', '†', '‡', '®', '™'];
const SOLVENT_PREFIXES: &[&str] = &["aqua", "water", "eau"];

/// Clean an ingredient name before querying data sources.
///
/// Strips footnote and trademark markers, and a leading "Aqua"/"Water"/"Eau"
/// when it only labels the solvent of a compound name ("Aqua/Water",
/// "Eau (Water)", "Aqua Water"). A lone "Water" is left as is, and so is a
/// name that merely starts with the word ("Eau de Parfum").
pub fn clean_ingredient_name(raw: &str) -> String {
    let mut name: String = raw.chars().filter(|c| !MARKERS.contains(c)).collect();
    name = name.trim().to_string();

    for prefix in SOLVENT_PREFIXES {
        let Some(rest) = strip_word(&name, prefix) else {
            continue;
        };
        if !labels_solvent(rest) {
            continue;
        }
        let stripped = rest
            .trim_start_matches(|c: char| c == '/' || c == '(' || c.is_whitespace())
            .trim_end_matches(')')
            .trim();
        if !stripped.is_empty() {
            name = stripped.to_string();
        }
        break;
    }

    name
}

/// What follows `word` at the start of `name` (ASCII case-insensitive).
fn strip_word<'a>(name: &'a str, word: &str) -> Option<&'a str> {
    let head = name.get(..word.len())?;
    head.eq_ignore_ascii_case(word).then(|| &name[word.len()..])
}

/// Whether the text after a solvent word continues a solvent label: a `/`
/// or `(` separator, or another solvent word.
fn labels_solvent(rest: &str) -> bool {
    if rest.starts_with(['/', '(']) {
        return true;
    }
    let after = rest.trim_start();
    if after.len() == rest.len() {
        return false;
    }
    after.starts_with(['/', '('])
        || SOLVENT_PREFIXES.iter().any(|w| {
            strip_word(after, w)
                .is_some_and(|tail| !tail.starts_with(|c: char| c.is_alphanumeric()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_and_trims() {
        let list = parse_ingredient_list(" Aqua, Glycerin ,Parfum ");
        assert_eq!(list, vec!["Aqua", "Glycerin", "Parfum"]);
    }

    #[test]
    fn test_parse_dedups_case_insensitively() {
        let list = parse_ingredient_list("Glycerin, GLYCERIN, glycerin, Parfum");
        assert_eq!(list, vec!["Glycerin", "Parfum"]);
    }

    #[test]
    fn test_parse_drops_empty_entries() {
        assert!(parse_ingredient_list("").is_empty());
        assert!(parse_ingredient_list(" , ,, ").is_empty());
        assert_eq!(parse_ingredient_list("Water,,"), vec!["Water"]);
    }

    #[test]
    fn test_clean_strips_markers() {
        assert_eq!(clean_ingredient_name("Parfum*"), "Parfum");
        assert_eq!(clean_ingredient_name(" Argan Oil® "), "Argan Oil");
        assert_eq!(clean_ingredient_name("Limonene†‡"), "Limonene");
    }

    #[test]
    fn test_clean_solvent_prefix() {
        assert_eq!(clean_ingredient_name("Aqua/Water"), "Water");
        assert_eq!(clean_ingredient_name("Eau (Water)"), "Water");
        assert_eq!(clean_ingredient_name("Aqua / Water / Eau"), "Water / Eau");
        assert_eq!(clean_ingredient_name("Aqua Water"), "Water");
        assert_eq!(clean_ingredient_name("AQUA (EAU)"), "EAU");
    }

    #[test]
    fn test_clean_keeps_names_starting_with_solvent_word() {
        assert_eq!(clean_ingredient_name("Eau de Parfum"), "Eau de Parfum");
        assert_eq!(clean_ingredient_name("Water Lily Extract"), "Water Lily Extract");
        assert_eq!(clean_ingredient_name("Aqua Waterlily"), "Aqua Waterlily");
    }

    #[test]
    fn test_clean_keeps_plain_water() {
        assert_eq!(clean_ingredient_name("Water"), "Water");
        assert_eq!(clean_ingredient_name("Aqua"), "Aqua");
        assert_eq!(clean_ingredient_name("Waterlily Extract"), "Waterlily Extract");
    }

    #[test]
    fn test_clean_marker_only_is_empty() {
        assert_eq!(clean_ingredient_name(" ** "), "");
    }
}
