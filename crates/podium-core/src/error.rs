use thiserror::Error;

/// Errors from transcript segmentation.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("no opening/Q&A separator phrase found in transcript")]
    SeparatorNotFound,
}

/// Errors from reference classifier providers.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classifier init failed: {0}")]
    Init(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from market data providers.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("market provider init failed: {0}")]
    Init(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from historical archive analysis.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive io error: {0}")]
    Io(#[from] std::io::Error),
}
