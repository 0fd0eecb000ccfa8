use thiserror::Error;

pub type Result<T> = std::result::Result<T, BalloonError>;

#[derive(Error, Debug)]
pub enum BalloonError {
    #[error("unsupported collector pair: {young} / {old}")]
    UnsupportedCollector { young: String, old: String },

    #[error("failed to open stats log: {0}")]
    LogOpen(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
