//! JSON envelope shared by every `/combine` outcome.

use serde::Serialize;

/// Response body for `/combine` and for every error path.
///
/// Optional fields are omitted from the JSON when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Successful combine.
    pub fn combined(output_file: impl Into<String>, preset_used: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some("Files combined successfully".into()),
            output_file: Some(output_file.into()),
            preset_used: Some(preset_used.into()),
            format: Some(cm_av::OUTPUT_FORMAT.into()),
            error: None,
        }
    }

    /// Failure carrying only an error string.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Failure carrying a summary message and error detail.
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
