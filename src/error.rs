use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

/// Caller errors and collaborator failures raised by a query.
///
/// Empty results (no matching population, fewer than k matches) are not
/// errors; they come back as a [`crate::query::QueryOutcome`].
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid dataset: {0}")]
    InvalidDataset(i32),

    #[error("invalid range percentage: {0}")]
    InvalidRangePercentage(i32),

    #[error("invalid coordinates: lat {latitude}, lon {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("address not found: {0}")]
    AddressNotFound(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl QueryError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDataset(_) => "INVALID_DATASET",
            Self::InvalidRangePercentage(_) => "INVALID_RANGE_PERCENTAGE",
            Self::InvalidCoordinates { .. } => "INVALID_COORDINATES",
            Self::InvalidFilter(_) => "INVALID_FILTER",
            Self::AddressNotFound(_) => "ADDRESS_NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// True for errors caused by the query input rather than the store.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
