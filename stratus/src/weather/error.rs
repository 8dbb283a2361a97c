use thiserror::Error;

/// Classified upstream failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The provider has no such resource for the given city.
    #[error("upstream resource not found: {message}")]
    NotFound { status: Option<u16>, message: String },

    /// The provider answered, but with an error.
    #[error("upstream unavailable (status {status:?}): {message}")]
    Unavailable { status: Option<u16>, message: String },

    /// No usable answer at all, e.g. a transport or store failure.
    #[error("upstream request failed: {message}")]
    Unknown { status: Option<u16>, message: String },
}

impl UpstreamError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { status, .. }
            | Self::Unavailable { status, .. }
            | Self::Unknown { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message, .. }
            | Self::Unavailable { message, .. }
            | Self::Unknown { message, .. } => message,
        }
    }

    /// Message safe to show to API clients.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "City not found. Please check the city name.",
            Self::Unavailable { .. } => "Weather service is unavailable. Please try again later.",
            Self::Unknown { .. } => {
                "Failed to fetch data from external API. Please try again later."
            }
        }
    }
}

impl From<shared::Error> for UpstreamError {
    fn from(err: shared::Error) -> Self {
        Self::Unknown {
            status: None,
            message: err.to_string(),
        }
    }
}

/// Raw outcome of a failed upstream call, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The provider responded with a status we cannot use.
    Response { status: u16, message: String },
    /// No response was received.
    Transport { message: String },
}

/// 404 means the city does not exist upstream; any other response is an
/// upstream outage; no response at all is unknown.
pub fn classify_failure(raw: FetchFailure) -> UpstreamError {
    match raw {
        FetchFailure::Response { status: 404, message } => UpstreamError::NotFound {
            status: Some(404),
            message,
        },
        FetchFailure::Response { status, message } => UpstreamError::Unavailable {
            status: Some(status),
            message,
        },
        FetchFailure::Transport { message } => UpstreamError::Unknown {
            status: None,
            message,
        },
    }
}
