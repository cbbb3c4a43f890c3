use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Device not present: {0}")]
    NotPresent(String),

    #[error("{subsystem} unavailable: {reason}")]
    SubsystemUnavailable {
        subsystem: &'static str,
        reason: String,
    },

    #[error("Instance identifier is empty")]
    EmptyInstanceId,

    #[error("Platform not supported: {0}")]
    PlatformNotSupported(String),

    /// The disable half of a refresh went through but the enable did not
    #[error("{instance_id} was disabled but could not be re-enabled")]
    ReenableFailed {
        instance_id: String,
        #[source]
        source: Box<DeviceError>,
    },
}

impl DeviceError {
    /// Shorthand for a subsystem failure with a formatted cause
    pub fn unavailable(subsystem: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::SubsystemUnavailable {
            subsystem,
            reason: reason.to_string(),
        }
    }

    /// Whether the error means "nothing matched" rather than "could not look"
    pub fn is_not_present(&self) -> bool {
        matches!(self, Self::NotPresent(_) | Self::EmptyInstanceId)
    }
}
