pub mod catalog;
pub mod schema;

pub use catalog::{normalize_code, HazardCode, HazardCodeCatalog};
