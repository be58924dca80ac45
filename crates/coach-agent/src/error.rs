use thiserror::Error;

/// Longest slice of raw model output kept in an [`AgentError::InvalidPlan`].
pub const RAW_EXCERPT_LEN: usize = 2000;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no API credential configured: run 'coach key set <KEY>'")]
    MissingCredential,

    #[error("plan generator error: {status} {body}")]
    Upstream { status: u16, body: String },

    #[error("no content returned by the plan generator")]
    EmptyResponse,

    #[error("unparsable response from the plan generator: {0}")]
    MalformedResponse(String),

    #[error("model did not return a valid plan: {source}\n  raw: {raw}")]
    InvalidPlan {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("client configuration error: {0}")]
    Config(String),
}

// The request URL carries the API key as a query parameter, so it is dropped
// before the error can be displayed.
impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        AgentError::Http(e.without_url())
    }
}

impl AgentError {
    pub(crate) fn invalid_plan(text: &str, source: serde_json::Error) -> Self {
        let raw: String = text.chars().take(RAW_EXCERPT_LEN).collect();
        AgentError::InvalidPlan { raw, source }
    }

    /// The service was reached but answered with something unusable.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AgentError::Upstream { .. }
                | AgentError::EmptyResponse
                | AgentError::MalformedResponse(_)
                | AgentError::InvalidPlan { .. }
        )
    }
}
