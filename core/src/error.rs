use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Seed must be non-zero modulo 2^31-1")]
    ZeroSeed,

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
