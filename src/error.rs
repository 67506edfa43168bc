use thiserror::Error;

/// Errors raised while configuring or running a simulation
#[derive(Debug, Error)]
pub enum DlaError {
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidArgument { name: &'static str, value: String },

    #[error("Grid Size must be odd, got {0}")]
    EvenGridSize(usize),

    #[error("Grid Size must be positive")]
    EmptyGrid,

    #[error("Worker count must be at least 1")]
    InvalidWorkers,

    #[error("Unknown {kind} '{value}'")]
    UnknownOption { kind: &'static str, value: String },

    #[error("No launch point found after {attempts} attempts (radius {radius})")]
    Saturated { attempts: u64, radius: usize },

    #[error("Failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, DlaError>;
