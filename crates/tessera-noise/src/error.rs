use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoiseError {
    #[error("coordinate ({x}, {y}) is outside the safe domain (|c| < {limit})")]
    OutOfDomain { x: i64, y: i64, limit: i64 },
    #[error("invalid noise settings: {0}")]
    InvalidSettings(String),
}
