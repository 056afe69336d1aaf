use thiserror::Error;

/// Client-detected form failures. Never transmitted to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("rate must be between 0 and 10, got {rate}")]
    RateOutOfRange { rate: i32 },
}

/// The core's failure taxonomy. Everything except `Load`/`Mutation` is
/// detected client-side and short-circuits before any gateway call.
///
/// `Clone` is load-bearing: a deduplicated in-flight load fans its outcome
/// out to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid creator reference '{raw}': expected a positive integer id")]
    InvalidReference { raw: String },
    #[error("creator {creator_id} is not present in the current creator set")]
    DanglingReference { creator_id: i64 },
    #[error("creator {creator_id} has {count} blacklist entries; remove them before deleting")]
    DependentEntries { creator_id: i64, count: usize },
    #[error("load failed: {message}")]
    Load { message: String },
    #[error("mutation failed: {message}")]
    Mutation { message: String },
}

impl CoreError {
    pub(crate) fn load(err: shared::error::ApiError) -> Self {
        Self::Load {
            message: err.message,
        }
    }

    pub(crate) fn mutation(err: shared::error::ApiError) -> Self {
        Self::Mutation {
            message: err.message,
        }
    }
}
