use crate::domain::Quote;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    /// Remote changes from another operator were pulled in.
    DataUpdated,
}

/// Transient message for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn data_updated() -> Self {
        Self {
            kind: NoticeKind::DataUpdated,
            message: "Dados atualizados".to_string(),
        }
    }
}

/// Presentation layer hook. Called synchronously right after the store changes.
pub trait StateObserver: Send + Sync {
    /// Store contents in insertion order; the presenter applies filters and display order.
    fn render(&self, quotes: &[Quote]);

    fn notify(&self, notice: Notice);

    /// Called when the liveness probe flips between online and offline.
    fn connection_changed(&self, online: bool);
}
