use super::quote::QuoteDraft;
use serde::Serialize;

/// Body of a `PUT` against a single quote. Absent parts are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePatch {
    #[serde(flatten)]
    pub fields: Option<QuoteDraft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negocio_fechado: Option<bool>,
}

impl QuotePatch {
    pub fn from_draft(fields: QuoteDraft) -> Self {
        Self {
            fields: Some(fields),
            negocio_fechado: None,
        }
    }

    /// Partial payload that only flips the closed flag, so concurrent edits to
    /// other columns on the server are not overwritten.
    pub fn closed(value: bool) -> Self {
        Self {
            fields: None,
            negocio_fechado: Some(value),
        }
    }
}
