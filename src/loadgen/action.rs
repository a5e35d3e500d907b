use rand::Rng;

use crate::models::DocumentPayload;

/// Content sent with every generated upsert
pub const UPSERT_CONTENT: &str = "Some document";

/// Work a VU performs on each iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch a document with an id drawn uniformly from `[min_id, max_id]`
    GetDocument { min_id: i32, max_id: i32 },
    /// Upsert a fixed document
    PutDocument,
}

/// A single request ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedRequest {
    Get { document_id: i32 },
    Put { payload: DocumentPayload },
}

impl Action {
    pub fn get_document(min_id: i32, max_id: i32) -> Self {
        Action::GetDocument { min_id, max_id }
    }

    pub fn put_document() -> Self {
        Action::PutDocument
    }

    pub fn next_request<R: Rng>(&self, rng: &mut R) -> PlannedRequest {
        match self {
            Action::GetDocument { min_id, max_id } => PlannedRequest::Get {
                document_id: rng.gen_range(*min_id..=(*max_id).max(*min_id)),
            },
            Action::PutDocument => PlannedRequest::Put {
                payload: DocumentPayload::new(UPSERT_CONTENT),
            },
        }
    }
}
