/// Errors from building track geometry.
///
/// These are configuration errors and should surface at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    #[error("invalid track parameters: {0}")]
    InvalidTrackParameters(String),
}

impl TrackError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidTrackParameters(reason.into())
    }
}
