/// Errors raised when building or mutating chart definitions.
///
/// Drawing itself never fails; invalid data encountered while painting is skipped.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// Subplot weights must be at least 1.
    #[error("subplot weight must be >= 1, got {0}")]
    InvalidWeight(u32),
    /// An argument was outside its accepted domain.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    /// A range with `lower > upper` (or a non-finite bound).
    #[error("invalid range: lower {lower} > upper {upper}")]
    InvalidRange { lower: f64, upper: f64 },
    /// No subplot exists at the given index.
    #[error("no subplot at index {0}")]
    SubplotNotFound(usize),
    /// The key is not present in the dataset.
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    /// No dataset exists at the given index.
    #[error("no dataset at index {0}")]
    DatasetIndex(usize),
    /// Chart definition (de)serialization failed.
    #[error("chart definition JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChartError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
