use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Typed view of the service's test matrix state string.
///
/// Parsing never fails: values this crate does not know yet are kept
/// verbatim in [`MatrixState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatrixState {
    Unspecified,
    Validating,
    Pending,
    Running,
    Finished,
    Error,
    UnsupportedEnvironment,
    IncompatibleEnvironment,
    IncompatibleArchitecture,
    Cancelled,
    Invalid,
    Other(String),
}

impl MatrixState {
    pub fn parse(value: &str) -> Self {
        match value {
            "TEST_STATE_UNSPECIFIED" => Self::Unspecified,
            "VALIDATING" => Self::Validating,
            "PENDING" => Self::Pending,
            "RUNNING" => Self::Running,
            "FINISHED" => Self::Finished,
            "ERROR" => Self::Error,
            "UNSUPPORTED_ENVIRONMENT" => Self::UnsupportedEnvironment,
            "INCOMPATIBLE_ENVIRONMENT" => Self::IncompatibleEnvironment,
            "INCOMPATIBLE_ARCHITECTURE" => Self::IncompatibleArchitecture,
            "CANCELLED" => Self::Cancelled,
            "INVALID" => Self::Invalid,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unspecified => "TEST_STATE_UNSPECIFIED",
            Self::Validating => "VALIDATING",
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Finished => "FINISHED",
            Self::Error => "ERROR",
            Self::UnsupportedEnvironment => "UNSUPPORTED_ENVIRONMENT",
            Self::IncompatibleEnvironment => "INCOMPATIBLE_ENVIRONMENT",
            Self::IncompatibleArchitecture => "INCOMPATIBLE_ARCHITECTURE",
            Self::Cancelled => "CANCELLED",
            Self::Invalid => "INVALID",
            Self::Other(value) => value,
        }
    }

    /// True once the service will no longer change the matrix.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finished
                | Self::Error
                | Self::UnsupportedEnvironment
                | Self::IncompatibleEnvironment
                | Self::IncompatibleArchitecture
                | Self::Cancelled
                | Self::Invalid
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl FromStr for MatrixState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for MatrixState {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<MatrixState> for String {
    fn from(state: MatrixState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for MatrixState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
