use crate::application::ports::{Notice, NoticeKind, StateObserver};
use crate::domain::Quote;

/// Presenter for headless runs: every state change becomes a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StateObserver for TracingObserver {
    fn render(&self, quotes: &[Quote]) {
        let closed = quotes.iter().filter(|quote| quote.negocio_fechado).count();
        let pending = quotes.iter().filter(|quote| quote.is_provisional()).count();
        tracing::info!(
            total = quotes.len(),
            closed,
            pending,
            "Quote list rendered"
        );
    }

    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => tracing::warn!("{}", notice.message),
            NoticeKind::Success | NoticeKind::Info | NoticeKind::DataUpdated => {
                tracing::info!("{}", notice.message)
            }
        }
    }

    fn connection_changed(&self, online: bool) {
        tracing::info!("Connection status: {}", if online { "Online" } else { "Offline" });
    }
}
