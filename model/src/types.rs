//! Records referenced by [`TestMatrix`](crate::TestMatrix).
//!
//! Every record keeps the keys it does not declare in `unknown_fields`, so
//! nested objects survive a decode/encode cycle as faithfully as the matrix
//! itself.
//!
//! The `unknown_fields` members are public like every other field here, so
//! callers editing them directly must not insert a declared wire name (for
//! example `"gcsPath"` on [`GoogleCloudStorage`]); such an entry replaces
//! the typed value on encode. [`JsonRecord::set`](crate::JsonRecord::set)
//! routes declared names to the typed field and is the safe way in.

use crate::json::{json_record, UnknownFields};
use serde::{Deserialize, Serialize};

/// Information about the client which invoked the test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_info_details: Option<Vec<ClientInfoDetail>>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl ClientInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.client_info_details
            .get_or_insert_with(Vec::new)
            .push(ClientInfoDetail::new(key, value));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfoDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl ClientInfoDetail {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
            unknown_fields: UnknownFields::new(),
        }
    }
}

/// How the host machine(s) are configured.
///
/// Exactly one of the three axes is expected to be set; the service rejects
/// anything else, this type does not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentMatrix {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_matrix: Option<AndroidMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_device_list: Option<AndroidDeviceList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios_device_list: Option<IosDeviceList>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl EnvironmentMatrix {
    pub fn android_devices(devices: Vec<AndroidDevice>) -> Self {
        Self {
            android_device_list: Some(AndroidDeviceList {
                android_devices: Some(devices),
                unknown_fields: UnknownFields::new(),
            }),
            ..Self::default()
        }
    }

    pub fn ios_devices(devices: Vec<IosDevice>) -> Self {
        Self {
            ios_device_list: Some(IosDeviceList {
                ios_devices: Some(devices),
                unknown_fields: UnknownFields::new(),
            }),
            ..Self::default()
        }
    }
}

/// Cross-product of Android models, versions, locales and orientations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidMatrix {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_model_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_version_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientations: Option<Vec<String>>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidDeviceList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_devices: Option<Vec<AndroidDevice>>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl AndroidDevice {
    pub fn new(
        model_id: impl Into<String>,
        version_id: impl Into<String>,
        locale: impl Into<String>,
        orientation: impl Into<String>,
    ) -> Self {
        Self {
            android_model_id: Some(model_id.into()),
            android_version_id: Some(version_id.into()),
            locale: Some(locale.into()),
            orientation: Some(orientation.into()),
            unknown_fields: UnknownFields::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosDeviceList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios_devices: Option<Vec<IosDevice>>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios_version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

/// Where the results for a matrix are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultStorage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_cloud_storage: Option<GoogleCloudStorage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_results_history: Option<ToolResultsHistory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_results_execution: Option<ToolResultsExecution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_url: Option<String>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl ResultStorage {
    pub fn gcs(gcs_path: impl Into<String>) -> Self {
        Self {
            google_cloud_storage: Some(GoogleCloudStorage {
                gcs_path: Some(gcs_path.into()),
                unknown_fields: UnknownFields::new(),
            }),
            ..Self::default()
        }
    }

    pub fn gcs_path(&self) -> Option<&str> {
        self.google_cloud_storage
            .as_ref()
            .and_then(|gcs| gcs.gcs_path.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCloudStorage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcs_path: Option<String>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultsHistory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_id: Option<String>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultsExecution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

/// How to run the test.
///
/// Only the platform-neutral settings are typed; test setup and the
/// platform-specific test variants are carried in `unknown_fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSpecification {
    /// Max time a run may execute before it is cancelled, e.g. `"900s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_video_recording: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_performance_metrics: Option<bool>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl TestSpecification {
    pub fn with_test_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.test_timeout = Some(timeout.into());
        self
    }

    pub fn with_video_recording(mut self, enabled: bool) -> Self {
        self.disable_video_recording = Some(!enabled);
        self
    }

    pub fn with_performance_metrics(mut self, enabled: bool) -> Self {
        self.disable_performance_metrics = Some(!enabled);
        self
    }
}

/// A single test executed in a single environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestExecution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_details: Option<TestDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_results_step: Option<ToolResultsStep>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_messages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultsStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

json_record!(ClientInfo, "ClientInfo", ["name", "clientInfoDetails"]);
json_record!(ClientInfoDetail, "ClientInfoDetail", ["key", "value"]);
json_record!(
    EnvironmentMatrix,
    "EnvironmentMatrix",
    ["androidMatrix", "androidDeviceList", "iosDeviceList"]
);
json_record!(
    AndroidMatrix,
    "AndroidMatrix",
    ["androidModelIds", "androidVersionIds", "locales", "orientations"]
);
json_record!(AndroidDeviceList, "AndroidDeviceList", ["androidDevices"]);
json_record!(
    AndroidDevice,
    "AndroidDevice",
    ["androidModelId", "androidVersionId", "locale", "orientation"]
);
json_record!(IosDeviceList, "IosDeviceList", ["iosDevices"]);
json_record!(
    IosDevice,
    "IosDevice",
    ["iosModelId", "iosVersionId", "locale", "orientation"]
);
json_record!(
    ResultStorage,
    "ResultStorage",
    [
        "googleCloudStorage",
        "toolResultsHistory",
        "toolResultsExecution",
        "resultsUrl"
    ]
);
json_record!(GoogleCloudStorage, "GoogleCloudStorage", ["gcsPath"]);
json_record!(ToolResultsHistory, "ToolResultsHistory", ["projectId", "historyId"]);
json_record!(
    ToolResultsExecution,
    "ToolResultsExecution",
    ["projectId", "historyId", "executionId"]
);
json_record!(
    TestSpecification,
    "TestSpecification",
    ["testTimeout", "disableVideoRecording", "disablePerformanceMetrics"]
);
json_record!(
    TestExecution,
    "TestExecution",
    [
        "id",
        "matrixId",
        "projectId",
        "state",
        "timestamp",
        "testDetails",
        "toolResultsStep"
    ]
);
json_record!(TestDetails, "TestDetails", ["progressMessages", "errorMessage"]);
json_record!(
    ToolResultsStep,
    "ToolResultsStep",
    ["projectId", "historyId", "executionId", "stepId"]
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonRecord;
    use serde_json::json;

    #[test]
    fn test_client_info_builder() {
        let info = ClientInfo::new("flank").with_detail("version", "4.0");

        assert_eq!(info.name.as_deref(), Some("flank"));
        let details = info.client_info_details.as_ref().unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].key.as_deref(), Some("version"));
        assert_eq!(details[0].value.as_deref(), Some("4.0"));
    }

    #[test]
    fn test_result_storage_gcs_path() {
        let storage = ResultStorage::gcs("gs://bucket/2024-01-01_run");
        assert_eq!(storage.gcs_path(), Some("gs://bucket/2024-01-01_run"));
        assert_eq!(ResultStorage::default().gcs_path(), None);

        let value = storage.to_value().unwrap();
        assert_eq!(
            value,
            json!({"googleCloudStorage": {"gcsPath": "gs://bucket/2024-01-01_run"}})
        );
    }

    #[test]
    fn test_environment_matrix_wire_names() {
        let env = EnvironmentMatrix::android_devices(vec![AndroidDevice::new(
            "NexusLowRes",
            "28",
            "en",
            "portrait",
        )]);

        let value = env.to_value().unwrap();
        assert_eq!(
            value,
            json!({
                "androidDeviceList": {
                    "androidDevices": [{
                        "androidModelId": "NexusLowRes",
                        "androidVersionId": "28",
                        "locale": "en",
                        "orientation": "portrait"
                    }]
                }
            })
        );
    }

    #[test]
    fn test_test_specification_keeps_platform_variant() {
        let json = r#"{
            "testTimeout": "900s",
            "disableVideoRecording": true,
            "androidInstrumentationTest": {"testPackageId": "com.example.test"}
        }"#;

        let spec = TestSpecification::from_json(json).unwrap();
        assert_eq!(spec.test_timeout.as_deref(), Some("900s"));
        assert_eq!(spec.disable_video_recording, Some(true));
        assert_eq!(spec.disable_performance_metrics, None);
        assert_eq!(
            spec.get("androidInstrumentationTest"),
            Some(json!({"testPackageId": "com.example.test"}))
        );

        let reparsed = TestSpecification::from_json(&spec.to_json().unwrap()).unwrap();
        assert_eq!(spec, reparsed);
    }

    #[test]
    fn test_test_specification_builder() {
        let spec = TestSpecification::default()
            .with_test_timeout("600s")
            .with_video_recording(false)
            .with_performance_metrics(true);

        assert_eq!(spec.test_timeout.as_deref(), Some("600s"));
        assert_eq!(spec.disable_video_recording, Some(true));
        assert_eq!(spec.disable_performance_metrics, Some(false));
    }

    #[test]
    fn test_nested_unknown_fields_survive() {
        let json = r#"{
            "id": "matrix-1_execution-0",
            "state": "FINISHED",
            "testDetails": {"progressMessages": ["Done"], "videoRecordingDisabled": false},
            "toolResultsStep": {"stepId": "s1", "extra": [1, 2]},
            "environment": {"androidDevice": {"androidModelId": "Pixel2"}}
        }"#;

        let execution = TestExecution::from_json(json).unwrap();
        let details = execution.test_details.as_ref().unwrap();
        assert_eq!(details.progress_messages.as_deref(), Some(&["Done".to_string()][..]));
        assert_eq!(
            details.unknown_fields.get("videoRecordingDisabled"),
            Some(&json!(false))
        );
        assert_eq!(
            execution.tool_results_step.as_ref().unwrap().unknown_fields["extra"],
            json!([1, 2])
        );
        assert!(execution.unknown_fields.contains_key("environment"));

        let original: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(execution.to_value().unwrap(), original);
    }

    #[test]
    fn test_set_declared_name_updates_typed_field() {
        let mut storage = GoogleCloudStorage::default();
        storage.set("gcsPath", json!("gs://bucket/a")).unwrap();

        assert_eq!(storage.gcs_path.as_deref(), Some("gs://bucket/a"));
        assert!(storage.unknown_fields.is_empty());
        assert_eq!(storage.to_value().unwrap(), json!({"gcsPath": "gs://bucket/a"}));
    }

    #[test]
    fn test_default_set_known_on_nested_record() {
        let mut execution = TestExecution::default();
        execution
            .set("testDetails", json!({"errorMessage": "boom"}))
            .unwrap()
            .set("state", json!("ERROR"))
            .unwrap();

        assert_eq!(execution.state.as_deref(), Some("ERROR"));
        assert_eq!(
            execution.test_details.unwrap().error_message.as_deref(),
            Some("boom")
        );
    }
}
