pub mod artifacts;
pub mod config;
pub mod error;
pub mod json;
pub mod matrix;
pub mod state;
pub mod types;

pub use artifacts::{ArtifactMatcher, ObjectPath, TEST_RESULT_PATTERN};
pub use config::CodecConfig;
pub use error::{ModelError, ModelResult};
pub use json::{JsonRecord, UnknownFields};
pub use matrix::TestMatrix;
pub use state::MatrixState;
pub use types::{
    AndroidDevice, AndroidDeviceList, AndroidMatrix, ClientInfo, ClientInfoDetail,
    EnvironmentMatrix, GoogleCloudStorage, IosDevice, IosDeviceList, ResultStorage, TestDetails,
    TestExecution, TestSpecification, ToolResultsExecution, ToolResultsHistory, ToolResultsStep,
};

pub mod prelude {
    pub use crate::artifacts::*;
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::json::{JsonRecord, UnknownFields};
    pub use crate::matrix::*;
    pub use crate::state::*;
    pub use crate::types::*;
}
