use super::sync_context::SyncContext;
use crate::application::ports::{Notice, NoticeKind, QuoteRemote, StateObserver};
use crate::domain::{Quote, QuoteDraft, QuoteId, QuotePatch};
use crate::infrastructure::storage::MemoryQuoteCache;
use crate::shared::error::AppError;
use async_trait::async_trait;
use mockall::mock;
use std::sync::{Arc, Mutex};

mock! {
    pub Remote {}

    #[async_trait]
    impl QuoteRemote for Remote {
        async fn list(&self) -> Result<Vec<Quote>, AppError>;
        async fn create(&self, draft: &QuoteDraft) -> Result<Quote, AppError>;
        async fn update(&self, id: &QuoteId, patch: &QuotePatch) -> Result<Quote, AppError>;
        async fn delete(&self, id: &QuoteId) -> Result<(), AppError>;
        async fn health(&self) -> Result<(), AppError>;
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    renders: Mutex<Vec<Vec<Quote>>>,
    notices: Mutex<Vec<Notice>>,
    connection: Mutex<Vec<bool>>,
}

impl RecordingObserver {
    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }

    pub fn last_render(&self) -> Vec<Quote> {
        self.renders.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self, kind: NoticeKind) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|notice| notice.kind == kind)
            .map(|notice| notice.message)
            .collect()
    }

    pub fn connection_changes(&self) -> Vec<bool> {
        self.connection.lock().unwrap().clone()
    }
}

impl StateObserver for RecordingObserver {
    fn render(&self, quotes: &[Quote]) {
        self.renders.lock().unwrap().push(quotes.to_vec());
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn connection_changed(&self, online: bool) {
        self.connection.lock().unwrap().push(online);
    }
}

pub struct Harness {
    pub ctx: SyncContext,
    pub cache: Arc<MemoryQuoteCache>,
    pub observer: Arc<RecordingObserver>,
}

impl Harness {
    pub async fn with_quotes(quotes: Vec<Quote>) -> Self {
        let cache = Arc::new(MemoryQuoteCache::new());
        let observer = Arc::new(RecordingObserver::default());
        let ctx = SyncContext::new(cache.clone(), observer.clone());
        ctx.store.write().await.replace_all(quotes);
        Self {
            ctx,
            cache,
            observer,
        }
    }

    pub async fn store_quotes(&self) -> Vec<Quote> {
        self.ctx.snapshot().await
    }
}

pub fn draft(transportadora: &str, valor_frete: f64) -> QuoteDraft {
    QuoteDraft {
        responsavel_cotacao: "Ana".into(),
        transportadora: transportadora.into(),
        destino: "Curitiba".into(),
        valor_frete,
        data_cotacao: "2024-03-01".into(),
        ..Default::default()
    }
}

pub fn committed(id: &str, fields: QuoteDraft) -> Quote {
    let mut quote = Quote::provisional(fields);
    quote.id = QuoteId::new(id.into()).unwrap();
    quote.timestamp = Some("2024-03-01T12:00:00.000Z".into());
    quote
}

pub fn id(value: &str) -> QuoteId {
    QuoteId::new(value.into()).unwrap()
}
