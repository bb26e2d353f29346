use super::outcome::BucketSummary;
use crate::ghs::{normalize_code, HazardCodeCatalog};
use crate::model::HazardBucket;
use std::collections::BTreeMap;

/// Group hazard codes into Health / Physical / Environmental buckets for display.
///
/// Every occurrence is counted. Codes outside the H2/H3/H4 bands are left out,
/// and so are buckets with no members. Catalog details are attached once per
/// distinct known code.
pub fn group_codes<'a>(
    codes: impl IntoIterator<Item = &'a str>,
    catalog: &HazardCodeCatalog,
) -> BTreeMap<HazardBucket, BucketSummary> {
    let mut groups: BTreeMap<HazardBucket, BucketSummary> = BTreeMap::new();

    for raw in codes {
        let code = normalize_code(raw);
        let Some(bucket) = HazardBucket::from_code(&code) else {
            continue;
        };

        let summary = groups.entry(bucket).or_insert_with(|| BucketSummary {
            count: 0,
            codes: Vec::new(),
            details: Vec::new(),
        });
        summary.count += 1;

        if let Some(hc) = catalog.lookup(&code) {
            if !summary.details.iter().any(|d| d.code == hc.code) {
                summary.details.push(hc.clone());
            }
        }
        summary.codes.push(code);
    }

    groups
}
