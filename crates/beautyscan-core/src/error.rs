use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("no ingredient list was provided")]
    EmptyIngredientList,

    #[error("unknown hazard code '{0}'. Run `beautyscan codes list` to see the catalog")]
    UnknownHazardCode(String),

    #[error("invalid hazard catalog: {0}")]
    CatalogInvalid(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("failed to load data source from {path}: {reason}")]
    CollaboratorLoad { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
