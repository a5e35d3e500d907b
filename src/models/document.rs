use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Document returned by the fetch endpoint. Nothing is stored; the id is
/// echoed back with synthesized content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Document {
    pub id: i32,
    pub content: String,
}

impl Document {
    pub fn synthesize(id: i32) -> Self {
        Self {
            id,
            content: format!("Content of the {id} document."),
        }
    }
}

/// Body returned by a successful upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpsertedDocument {
    pub id: i32,
}

/// Upsert request body. Documented for clients; the service never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DocumentPayload {
    pub content: String,
}

impl DocumentPayload {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
