pub mod grouping;
pub mod ingredient;
pub mod outcome;
pub mod product;

pub use grouping::group_codes;
pub use ingredient::score_ingredient;
pub use outcome::{
    BucketSummary, CodeBreakdown, HazardEntry, IngredientHazardAssessment, IngredientScore,
    ProductScoreResult, ResolutionWarning, ScoreBreakdown, SeverityCounts,
};
pub use product::ProductScoreAggregator;
