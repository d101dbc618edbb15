//! The test matrix resource.
//!
//! A test matrix is the cross-product of device, OS and locale axes; the
//! service expands it into one [`TestExecution`] per combination. Callers
//! fill in the environment, result storage and test specification; the
//! remaining fields are owned by the service and only read back.

use crate::error::{ModelError, ModelResult};
use crate::json::store::UnknownStore;
use crate::json::{decode_field, JsonRecord, UnknownFields};
use crate::state::MatrixState;
use crate::types::{
    ClientInfo, EnvironmentMatrix, ResultStorage, TestExecution, TestSpecification,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestMatrix {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_info: Option<ClientInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    environment_matrix: Option<EnvironmentMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    invalid_matrix_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result_storage: Option<ResultStorage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_executions: Option<Vec<TestExecution>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_matrix_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_specification: Option<TestSpecification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(flatten)]
    unknown_fields: UnknownFields,
}

impl TestMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// A request body with the three fields the service requires.
    pub fn request(
        environment_matrix: EnvironmentMatrix,
        result_storage: ResultStorage,
        test_specification: TestSpecification,
    ) -> Self {
        Self::new()
            .with_environment_matrix(environment_matrix)
            .with_result_storage(result_storage)
            .with_test_specification(test_specification)
    }

    /// Information about the client which invoked the test. Optional.
    pub fn client_info(&self) -> Option<&ClientInfo> {
        self.client_info.as_ref()
    }

    pub fn set_client_info(&mut self, client_info: Option<ClientInfo>) -> &mut Self {
        self.client_info = client_info;
        self
    }

    pub fn with_client_info(mut self, client_info: ClientInfo) -> Self {
        self.client_info = Some(client_info);
        self
    }

    /// How the host machine(s) are configured. Required.
    pub fn environment_matrix(&self) -> Option<&EnvironmentMatrix> {
        self.environment_matrix.as_ref()
    }

    pub fn set_environment_matrix(
        &mut self,
        environment_matrix: Option<EnvironmentMatrix>,
    ) -> &mut Self {
        self.environment_matrix = environment_matrix;
        self
    }

    pub fn with_environment_matrix(mut self, environment_matrix: EnvironmentMatrix) -> Self {
        self.environment_matrix = Some(environment_matrix);
        self
    }

    /// Why the matrix is considered invalid. Output only.
    pub fn invalid_matrix_details(&self) -> Option<&str> {
        self.invalid_matrix_details.as_deref()
    }

    pub fn set_invalid_matrix_details(&mut self, details: Option<String>) -> &mut Self {
        self.invalid_matrix_details = details;
        self
    }

    pub fn with_invalid_matrix_details(mut self, details: impl Into<String>) -> Self {
        self.invalid_matrix_details = Some(details.into());
        self
    }

    /// The cloud project that owns the matrix. Output only.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn set_project_id(&mut self, project_id: Option<String>) -> &mut Self {
        self.project_id = project_id;
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Where the results for the matrix are written. Required.
    pub fn result_storage(&self) -> Option<&ResultStorage> {
        self.result_storage.as_ref()
    }

    pub fn set_result_storage(&mut self, result_storage: Option<ResultStorage>) -> &mut Self {
        self.result_storage = result_storage;
        self
    }

    pub fn with_result_storage(mut self, result_storage: ResultStorage) -> Self {
        self.result_storage = Some(result_storage);
        self
    }

    /// Current progress of the matrix as sent by the service. Output only.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn set_state(&mut self, state: Option<String>) -> &mut Self {
        self.state = state;
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Executions the service created for this matrix. Output only.
    pub fn test_executions(&self) -> Option<&[TestExecution]> {
        self.test_executions.as_deref()
    }

    pub fn set_test_executions(&mut self, executions: Option<Vec<TestExecution>>) -> &mut Self {
        self.test_executions = executions;
        self
    }

    pub fn with_test_executions(mut self, executions: Vec<TestExecution>) -> Self {
        self.test_executions = Some(executions);
        self
    }

    /// Unique id set by the service. Output only.
    pub fn test_matrix_id(&self) -> Option<&str> {
        self.test_matrix_id.as_deref()
    }

    pub fn set_test_matrix_id(&mut self, test_matrix_id: Option<String>) -> &mut Self {
        self.test_matrix_id = test_matrix_id;
        self
    }

    pub fn with_test_matrix_id(mut self, test_matrix_id: impl Into<String>) -> Self {
        self.test_matrix_id = Some(test_matrix_id.into());
        self
    }

    /// How to run the test. Required.
    pub fn test_specification(&self) -> Option<&TestSpecification> {
        self.test_specification.as_ref()
    }

    pub fn set_test_specification(
        &mut self,
        test_specification: Option<TestSpecification>,
    ) -> &mut Self {
        self.test_specification = test_specification;
        self
    }

    pub fn with_test_specification(mut self, test_specification: TestSpecification) -> Self {
        self.test_specification = Some(test_specification);
        self
    }

    /// Creation time as an RFC 3339 string. Output only.
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn set_timestamp(&mut self, timestamp: Option<String>) -> &mut Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn matrix_state(&self) -> Option<MatrixState> {
        self.state.as_deref().map(MatrixState::parse)
    }

    pub fn is_invalid(&self) -> bool {
        self.matrix_state() == Some(MatrixState::Invalid)
    }

    /// The invalid-matrix details, only when the state says INVALID.
    pub fn invalid_reason(&self) -> Option<&str> {
        if self.is_invalid() {
            return self.invalid_matrix_details.as_deref();
        }

        if self.invalid_matrix_details.is_some() {
            warn!(
                test_matrix_id = self.test_matrix_id.as_deref().unwrap_or_default(),
                state = self.state.as_deref().unwrap_or_default(),
                "invalid matrix details present on a matrix that is not INVALID"
            );
        }
        None
    }

    /// Parses `timestamp`. The stored string is left untouched.
    pub fn created_at(&self) -> ModelResult<Option<DateTime<Utc>>> {
        let Some(timestamp) = self.timestamp.as_deref() else {
            return Ok(None);
        };

        DateTime::parse_from_rfc3339(timestamp)
            .map(|parsed| Some(parsed.with_timezone(&Utc)))
            .map_err(|e| ModelError::InvalidTimestamp {
                value: timestamp.to_string(),
                message: e.to_string(),
            })
    }
}

impl JsonRecord for TestMatrix {
    const KIND: &'static str = "TestMatrix";

    const KNOWN_FIELDS: &'static [&'static str] = &[
        "clientInfo",
        "environmentMatrix",
        "invalidMatrixDetails",
        "projectId",
        "resultStorage",
        "state",
        "testExecutions",
        "testMatrixId",
        "testSpecification",
        "timestamp",
    ];

    const OUTPUT_ONLY_FIELDS: &'static [&'static str] = &[
        "invalidMatrixDetails",
        "projectId",
        "state",
        "testExecutions",
        "testMatrixId",
        "timestamp",
    ];

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn set_known(&mut self, name: &str, value: Value) -> ModelResult<()> {
        match name {
            "clientInfo" => self.client_info = decode_field(name, value)?,
            "environmentMatrix" => self.environment_matrix = decode_field(name, value)?,
            "invalidMatrixDetails" => self.invalid_matrix_details = decode_field(name, value)?,
            "projectId" => self.project_id = decode_field(name, value)?,
            "resultStorage" => self.result_storage = decode_field(name, value)?,
            "state" => self.state = decode_field(name, value)?,
            "testExecutions" => self.test_executions = decode_field(name, value)?,
            "testMatrixId" => self.test_matrix_id = decode_field(name, value)?,
            "testSpecification" => self.test_specification = decode_field(name, value)?,
            "timestamp" => self.timestamp = decode_field(name, value)?,
            _ => {
                self.unknown_fields.insert(name.to_string(), value);
            }
        }
        Ok(())
    }
}

impl UnknownStore for TestMatrix {
    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use serde_json::json;

    fn finished_matrix() -> TestMatrix {
        TestMatrix::request(
            EnvironmentMatrix::default(),
            ResultStorage::gcs("gs://bucket/run"),
            TestSpecification::default().with_test_timeout("900s"),
        )
        .with_project_id("proj-1")
        .with_test_matrix_id("matrix-abc")
        .with_state("FINISHED")
        .with_timestamp("2024-03-01T12:30:00.123Z")
        .with_test_executions(vec![TestExecution::default()])
    }

    #[test]
    fn test_new_matrix_is_empty() {
        let matrix = TestMatrix::new();
        assert_eq!(matrix.client_info(), None);
        assert_eq!(matrix.state(), None);
        assert_eq!(matrix.test_executions(), None);
        assert!(matrix.unknown_fields().is_empty());
        assert_eq!(matrix.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_setters_chain() {
        let mut matrix = TestMatrix::new();
        matrix
            .set_project_id(Some("proj-1".to_string()))
            .set_state(Some("RUNNING".to_string()))
            .set_client_info(Some(ClientInfo::new("flank")));

        assert_eq!(matrix.project_id(), Some("proj-1"));
        assert_eq!(matrix.state(), Some("RUNNING"));
        assert_eq!(matrix.client_info().unwrap().name.as_deref(), Some("flank"));

        matrix.set_project_id(None);
        assert_eq!(matrix.project_id(), None);
    }

    #[test]
    fn test_invalid_matrix_example() {
        let json = r#"{"state": "INVALID", "invalidMatrixDetails": "bad env config", "projectId": "proj-1"}"#;
        let matrix = TestMatrix::from_json(json).unwrap();

        assert_eq!(matrix.state(), Some("INVALID"));
        assert_eq!(matrix.invalid_matrix_details(), Some("bad env config"));
        assert_eq!(matrix.project_id(), Some("proj-1"));
        assert!(matrix.is_invalid());
        assert_eq!(matrix.invalid_reason(), Some("bad env config"));
    }

    #[test]
    fn test_invalid_reason_requires_invalid_state() {
        let matrix = TestMatrix::new()
            .with_state("FINISHED")
            .with_invalid_matrix_details("stale");

        assert!(!matrix.is_invalid());
        assert_eq!(matrix.invalid_reason(), None);
        assert_eq!(matrix.invalid_matrix_details(), Some("stale"));
    }

    #[test]
    fn test_dynamic_set_routes_to_typed_fields() {
        let mut matrix = TestMatrix::new();
        matrix
            .set("projectId", json!("proj-2"))
            .unwrap()
            .set("resultStorage", json!({"googleCloudStorage": {"gcsPath": "gs://b/p"}}))
            .unwrap()
            .set("unknownKey", json!(123))
            .unwrap();

        assert_eq!(matrix.project_id(), Some("proj-2"));
        assert_eq!(matrix.result_storage().unwrap().gcs_path(), Some("gs://b/p"));
        assert_eq!(matrix.unknown_fields().len(), 1);
        assert_eq!(matrix.get("unknownKey"), Some(json!(123)));
        assert_eq!(matrix.get("projectId"), Some(json!("proj-2")));
    }

    #[test]
    fn test_declared_names_never_reach_unknown_fields() {
        let mut matrix = TestMatrix::new().with_project_id("typed");

        for field in TestMatrix::KNOWN_FIELDS {
            matrix.set(field, Value::Null).unwrap();
            assert!(!matrix.unknown_fields().contains_key(*field), "{field}");
        }
        matrix.set("projectId", json!("shadow")).unwrap();

        assert!(matrix.unknown_fields().is_empty());
        assert_eq!(matrix.project_id(), Some("shadow"));
        assert_eq!(matrix.get("projectId"), Some(json!("shadow")));
        assert_eq!(matrix.to_value().unwrap(), json!({"projectId": "shadow"}));

        let decoded = TestMatrix::from_json(&matrix.to_json().unwrap()).unwrap();
        assert_eq!(decoded, matrix);
        assert!(decoded.unknown_fields().is_empty());
    }

    #[test]
    fn test_dynamic_set_null_clears_field() {
        let mut matrix = TestMatrix::new().with_state("PENDING");
        matrix.set("state", Value::Null).unwrap();

        assert_eq!(matrix.state(), None);
        assert_eq!(matrix.get("state"), None);
        assert!(matrix.unknown_fields().is_empty());
    }

    #[test]
    fn test_dynamic_set_type_mismatch() {
        let mut matrix = TestMatrix::new().with_project_id("proj-1");
        let err = matrix.set("projectId", json!({"nested": true})).unwrap_err();

        assert!(matches!(err, ModelError::TypeMismatch { ref field, .. } if field == "projectId"));
        assert_eq!(matrix.project_id(), Some("proj-1"));

        let err = matrix.set("testExecutions", json!("not a list")).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { .. }));
        assert_eq!(matrix.test_executions(), None);
    }

    #[test]
    fn test_null_and_absent_serialize_the_same() {
        let from_null = TestMatrix::from_json(r#"{"projectId": null, "state": "RUNNING"}"#).unwrap();
        let from_absent = TestMatrix::from_json(r#"{"state": "RUNNING"}"#).unwrap();

        assert_eq!(from_null, from_absent);
        assert_eq!(from_null.to_json().unwrap(), r#"{"state":"RUNNING"}"#);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = finished_matrix();
        let mut copy = original.clone();

        copy.set_state(Some("CANCELLED".to_string()));
        copy.set("extra", json!(true)).unwrap();

        assert_eq!(original.state(), Some("FINISHED"));
        assert!(original.unknown_fields().is_empty());
        assert_eq!(copy.state(), Some("CANCELLED"));
    }

    #[test]
    fn test_strip_output_only_fields() {
        let mut matrix = finished_matrix().with_client_info(ClientInfo::new("flank"));
        matrix.set("labels", json!({"team": "mobile"})).unwrap();

        let json = matrix.to_json_with(&CodecConfig::request()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();

        for field in TestMatrix::OUTPUT_ONLY_FIELDS {
            assert!(!object.contains_key(*field), "{field} should be stripped");
        }
        assert!(object.contains_key("clientInfo"));
        assert!(object.contains_key("environmentMatrix"));
        assert!(object.contains_key("resultStorage"));
        assert!(object.contains_key("testSpecification"));
        assert_eq!(object["labels"], json!({"team": "mobile"}));
    }

    #[test]
    fn test_matrix_state_and_timestamp() {
        let matrix = finished_matrix();
        assert_eq!(matrix.matrix_state(), Some(MatrixState::Finished));
        assert!(matrix.matrix_state().unwrap().is_terminal());

        let created = matrix.created_at().unwrap().unwrap();
        assert_eq!(created.to_rfc3339(), "2024-03-01T12:30:00.123+00:00");
        assert_eq!(matrix.timestamp(), Some("2024-03-01T12:30:00.123Z"));

        assert_eq!(TestMatrix::new().created_at().unwrap(), None);

        let bad = TestMatrix::new().with_timestamp("yesterday");
        assert!(matches!(
            bad.created_at(),
            Err(ModelError::InvalidTimestamp { ref value, .. }) if value == "yesterday"
        ));
    }
}
