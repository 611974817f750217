// file: src/knowledge/models.rs
// description: wire types for the knowledge service file and collection endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of `POST /api/v1/files/`. Only the identifier is used.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    #[serde(default)]
    pub id: Option<Value>,
}

impl UploadedFile {
    pub fn file_id(&self) -> Option<String> {
        match &self.id {
            Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Request body of `POST /api/v1/knowledge/{collection}/file/add`.
#[derive(Debug, Serialize)]
pub struct AddFileRequest<'a> {
    pub file_id: &'a str,
}

/// What happened to one file during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Registered { file_id: String },
    UploadFailed,
    RegistrationFailed { file_id: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Registered { .. })
    }
}
