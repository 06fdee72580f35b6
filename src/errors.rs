use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Initialization error: {0}")]
    InitializationError(String),

    #[error("Unknown {kind} profile: {id}")]
    UnknownProfile { kind: &'static str, id: String },

    #[error("Config error: {0}")]
    ConfigError(#[from] serde_yaml::Error),

    #[error("Persistence error: {0}")]
    PersistenceError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
