use beautyscan_core::error::ScanError;
use beautyscan_core::ghs::{HazardCode, HazardCodeCatalog};
use beautyscan_core::model::HazardBucket;
use beautyscan_core::score::group_codes;

pub fn list(bucket: Option<HazardBucket>) -> Result<(), ScanError> {
    let catalog = HazardCodeCatalog::builtin()?;

    let codes: Vec<&HazardCode> = match bucket {
        Some(b) => catalog.codes_in_bucket(b).collect(),
        None => catalog.codes().collect(),
    };

    println!("GHS hazard codes (catalog v{}):\n", catalog.version());
    for hc in &codes {
        println!(
            "  {}  cat. {:<4} w {:>3}  {}",
            hc.code,
            hc.category.to_string(),
            hc.base_weight,
            hc.description
        );
    }
    println!("\n  {} code(s)", codes.len());
    Ok(())
}

pub fn show(code: &str) -> Result<(), ScanError> {
    let catalog = HazardCodeCatalog::builtin()?;
    let hc = catalog.require(code)?;

    println!("{}: {}\n", hc.code, hc.description);
    println!("  Class:        {}", hc.hazard_class);
    println!("  Category:     {}", hc.category);
    match hc.bucket() {
        Some(bucket) => println!("  Bucket:       {} ({})", bucket, bucket.display_fr()),
        None => println!("  Bucket:       -"),
    }
    println!("  Base weight:  {}", hc.base_weight);
    println!("  Label weight: {}", hc.label_weight);
    println!(
        "  Static category when a source gives none: {}",
        catalog.inferred_category(&hc.code)
    );
    Ok(())
}

pub fn group(codes: &[String]) -> Result<(), ScanError> {
    let catalog = HazardCodeCatalog::builtin()?;
    let groups = group_codes(codes.iter().map(String::as_str), &catalog);

    if groups.is_empty() {
        println!("No H2xx/H3xx/H4xx codes given.");
        return Ok(());
    }

    for (bucket, summary) in &groups {
        println!("{} ({}): {}", bucket.display_fr(), bucket, summary.count);
        for hc in &summary.details {
            println!("  {}  {}", hc.code, hc.description);
        }
        let unknown: Vec<&str> = summary
            .codes
            .iter()
            .filter(|c| !summary.details.iter().any(|d| &d.code == *c))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            println!("  not in catalog: {}", unknown.join(", "));
        }
        println!();
    }
    Ok(())
}
