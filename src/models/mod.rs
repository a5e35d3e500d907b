pub mod document;

pub use document::{Document, DocumentPayload, UpsertedDocument};
