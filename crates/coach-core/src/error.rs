use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("no API credential configured: run 'coach key set <KEY>'")]
    NotConfigured,

    #[error("no active plan: run 'coach generate' first")]
    NoActivePlan,

    #[error("task not found in active plan: {0}")]
    TaskNotFound(String),

    #[error("prayer not found in active plan: {0}")]
    PrayerNotFound(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("prayer count {0} out of range: must be 0-5")]
    PrayerCountOutOfRange(u32),

    #[error("a plan generation is already in progress")]
    GenerationInProgress,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoachError>;
