use super::sync_context::{SubmitGuard, SyncContext};
use crate::application::ports::{Notice, QuoteRemote};
use crate::domain::{Quote, QuoteDraft, QuoteFilter, QuoteId, QuotePatch};
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, info, warn};

const MSG_CREATED: &str = "Cotação registrada!";
const MSG_UPDATED: &str = "Cotação atualizada!";
const MSG_CLOSED: &str = "Negócio fechado!";
const MSG_REOPENED: &str = "Marcação removida!";
const MSG_DELETED: &str = "Cotação excluída!";
const MSG_CREATE_FAILED: &str = "Erro ao salvar. Registro removido.";
const MSG_UPDATE_FAILED: &str = "Erro ao atualizar. Alterações revertidas.";
const MSG_TOGGLE_FAILED: &str = "Erro ao atualizar. Status revertido.";
const MSG_DELETE_FAILED: &str = "Erro ao excluir. Registro restaurado.";
const MSG_OFFLINE: &str = "Modo offline ativo";

/// How a mutation settled once its remote call (if any) resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The remote store confirmed the change; carries its representation.
    Committed(Quote),
    Deleted,
    /// Offline or still provisional: applied and cached locally only.
    LocalOnly(Quote),
    LocalOnlyDeleted,
    /// The remote call failed and the local change was undone.
    RolledBack { reason: AppError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Cache,
}

pub struct QuoteService {
    ctx: SyncContext,
    remote: Arc<dyn QuoteRemote>,
}

impl QuoteService {
    pub fn new(ctx: SyncContext, remote: Arc<dyn QuoteRemote>) -> Self {
        Self { ctx, remote }
    }

    pub fn context(&self) -> &SyncContext {
        &self.ctx
    }

    pub async fn check_server_status(&self) -> bool {
        self.ctx.refresh_connectivity(self.remote.as_ref()).await
    }

    /// Fills the store at startup: remote collection when reachable, else the local cache.
    pub async fn load(&self) -> LoadSource {
        let remote = if self.check_server_status().await {
            match self.remote.list().await {
                Ok(quotes) => Some(quotes),
                Err(e) => {
                    warn!("Failed to fetch quotes, falling back to cache: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let mut store = self.ctx.store.write().await;
        match remote {
            Some(quotes) => {
                store.replace_all(quotes);
                let count = store.len();
                self.ctx.publish(store).await;
                info!("Loaded {} quotes from remote store", count);
                LoadSource::Remote
            }
            None => {
                let cached = self.ctx.load_cached().await;
                store.replace_all(cached);
                self.ctx.observer.render(store.get_all());
                drop(store);
                self.ctx.observer.notify(Notice::info(MSG_OFFLINE));
                info!("Loaded quotes from local cache");
                LoadSource::Cache
            }
        }
    }

    pub async fn create(&self, draft: QuoteDraft) -> Result<MutationOutcome, AppError> {
        let draft = draft.normalized();
        draft.validate().map_err(AppError::ValidationError)?;
        let _submit = self.begin_submit()?;
        let _mutation = self.ctx.flags.begin_mutation();

        let provisional = Quote::provisional(draft.clone());
        let temp_id = provisional.id.clone();
        {
            let mut store = self.ctx.store.write().await;
            store.insert_front(provisional.clone());
            self.ctx.publish(store).await;
        }
        self.ctx.observer.notify(Notice::success(MSG_CREATED));

        if !self.check_server_status().await {
            info!("Offline, quote {} kept locally", temp_id);
            return Ok(MutationOutcome::LocalOnly(provisional));
        }

        let result = self.remote.create(&draft).await.and_then(|quote| {
            QuoteId::committed(quote.id.to_string()).map_err(AppError::MalformedResponse)?;
            Ok(quote)
        });
        let quote = match result {
            Ok(quote) => quote,
            Err(reason) => {
                warn!("Failed to create quote: {}", reason);
                let mut store = self.ctx.store.write().await;
                store.remove(&temp_id);
                self.ctx.publish(store).await;
                self.ctx.observer.notify(Notice::error(MSG_CREATE_FAILED));
                return Ok(MutationOutcome::RolledBack { reason });
            }
        };
        info!("Quote {} committed as {}", temp_id, quote.id);

        // The placeholder may have been toggled or deleted while the POST was pending.
        let mut store = self.ctx.store.write().await;
        let Some(closed) = store.find_by_id(&temp_id).ok().map(|local| local.negocio_fechado) else {
            drop(store);
            return Ok(self.delete_abandoned(quote).await);
        };
        let mut settled = quote.clone();
        settled.negocio_fechado = closed;
        store.replace_id(&temp_id, settled);
        self.ctx.publish(store).await;

        if closed == quote.negocio_fechado {
            return Ok(MutationOutcome::Committed(quote));
        }
        Ok(self.push_closed_flag(quote, closed).await)
    }

    pub async fn update(
        &self,
        id: &QuoteId,
        draft: QuoteDraft,
    ) -> Result<MutationOutcome, AppError> {
        let draft = draft.normalized();
        draft.validate().map_err(AppError::ValidationError)?;
        let _submit = self.begin_submit()?;
        let _mutation = self.ctx.flags.begin_mutation();

        let (snapshot, updated) = {
            let mut store = self.ctx.store.write().await;
            let quote = store.find_by_id_mut(id)?;
            let snapshot = quote.clone();
            quote.apply_draft(draft.clone());
            let updated = quote.clone();
            self.ctx.publish(store).await;
            (snapshot, updated)
        };
        self.ctx.observer.notify(Notice::success(MSG_UPDATED));

        if !self.remote_reachable_for(id).await {
            return Ok(MutationOutcome::LocalOnly(updated));
        }

        let result = self
            .remote
            .update(id, &QuotePatch::from_draft(draft))
            .await;

        let mut store = self.ctx.store.write().await;
        match result {
            Ok(quote) => {
                if !store.replace_id(id, quote.clone()) {
                    debug!("Quote {} left the store before the update settled", id);
                }
                self.ctx.publish(store).await;
                Ok(MutationOutcome::Committed(quote))
            }
            Err(reason) => {
                warn!("Failed to update quote {}: {}", id, reason);
                match store.find_by_id_mut(id) {
                    Ok(quote) => *quote = snapshot,
                    Err(_) => debug!("Quote {} left the store before rollback", id),
                }
                self.ctx.publish(store).await;
                self.ctx.observer.notify(Notice::error(MSG_UPDATE_FAILED));
                Ok(MutationOutcome::RolledBack { reason })
            }
        }
    }

    pub async fn toggle_closed(&self, id: &QuoteId) -> Result<MutationOutcome, AppError> {
        let _mutation = self.ctx.flags.begin_mutation();

        let (previous, toggled) = {
            let mut store = self.ctx.store.write().await;
            let quote = store.find_by_id_mut(id)?;
            let previous = quote.negocio_fechado;
            quote.negocio_fechado = !previous;
            let toggled = quote.clone();
            self.ctx.publish(store).await;
            (previous, toggled)
        };
        self.ctx.observer.notify(Notice::success(if toggled.negocio_fechado {
            MSG_CLOSED
        } else {
            MSG_REOPENED
        }));

        if !self.remote_reachable_for(id).await {
            return Ok(MutationOutcome::LocalOnly(toggled));
        }

        let result = self
            .remote
            .update(id, &QuotePatch::closed(toggled.negocio_fechado))
            .await;

        let mut store = self.ctx.store.write().await;
        match result {
            Ok(quote) => {
                store.replace_id(id, quote.clone());
                self.ctx.publish(store).await;
                Ok(MutationOutcome::Committed(quote))
            }
            Err(reason) => {
                warn!("Failed to toggle quote {}: {}", id, reason);
                if let Ok(quote) = store.find_by_id_mut(id) {
                    quote.negocio_fechado = previous;
                }
                self.ctx.publish(store).await;
                self.ctx.observer.notify(Notice::error(MSG_TOGGLE_FAILED));
                Ok(MutationOutcome::RolledBack { reason })
            }
        }
    }

    pub async fn delete(&self, id: &QuoteId) -> Result<MutationOutcome, AppError> {
        let _mutation = self.ctx.flags.begin_mutation();

        let (index, removed) = {
            let mut store = self.ctx.store.write().await;
            let (index, removed) = store
                .remove(id)
                .ok_or_else(|| AppError::NotFound(format!("quote {id}")))?;
            self.ctx.publish(store).await;
            (index, removed)
        };
        self.ctx.observer.notify(Notice::success(MSG_DELETED));

        if !self.remote_reachable_for(id).await {
            return Ok(MutationOutcome::LocalOnlyDeleted);
        }

        match self.remote.delete(id).await {
            Ok(()) => Ok(MutationOutcome::Deleted),
            Err(reason) => {
                warn!("Failed to delete quote {}: {}", id, reason);
                let mut store = self.ctx.store.write().await;
                if !store.contains(id) {
                    store.insert_at(index, removed);
                }
                self.ctx.publish(store).await;
                self.ctx.observer.notify(Notice::error(MSG_DELETE_FAILED));
                Ok(MutationOutcome::RolledBack { reason })
            }
        }
    }

    pub async fn quotes(&self) -> Vec<Quote> {
        self.ctx.snapshot().await
    }

    pub async fn filtered(&self, filter: &QuoteFilter) -> Vec<Quote> {
        filter.apply(self.ctx.store.read().await.get_all())
    }

    pub async fn find(&self, id: &QuoteId) -> Result<Quote, AppError> {
        self.ctx.store.read().await.find_by_id(id).cloned()
    }

    /// Removes a just-committed quote whose placeholder was deleted locally.
    async fn delete_abandoned(&self, quote: Quote) -> MutationOutcome {
        info!("Quote {} was deleted before its create settled", quote.id);
        match self.remote.delete(&quote.id).await {
            Ok(()) => MutationOutcome::Deleted,
            Err(reason) => {
                warn!("Failed to delete quote {}: {}", quote.id, reason);
                let mut store = self.ctx.store.write().await;
                if !store.contains(&quote.id) {
                    store.insert_front(quote.clone());
                }
                self.ctx.publish(store).await;
                self.ctx.observer.notify(Notice::error(MSG_DELETE_FAILED));
                MutationOutcome::Committed(quote)
            }
        }
    }

    /// Sends a closed flag toggled on the placeholder while its create was pending.
    async fn push_closed_flag(&self, quote: Quote, closed: bool) -> MutationOutcome {
        let result = self
            .remote
            .update(&quote.id, &QuotePatch::closed(closed))
            .await;

        let mut store = self.ctx.store.write().await;
        match result {
            Ok(updated) => {
                store.replace_id(&quote.id, updated.clone());
                self.ctx.publish(store).await;
                MutationOutcome::Committed(updated)
            }
            Err(reason) => {
                warn!("Failed to toggle quote {}: {}", quote.id, reason);
                if let Ok(local) = store.find_by_id_mut(&quote.id) {
                    local.negocio_fechado = quote.negocio_fechado;
                }
                self.ctx.publish(store).await;
                self.ctx.observer.notify(Notice::error(MSG_TOGGLE_FAILED));
                MutationOutcome::Committed(quote)
            }
        }
    }

    fn begin_submit(&self) -> Result<SubmitGuard, AppError> {
        self.ctx
            .flags
            .try_begin_submit()
            .ok_or_else(|| AppError::Busy("a quote submission is already running".to_string()))
    }

    // Provisional records have no server counterpart yet.
    async fn remote_reachable_for(&self, id: &QuoteId) -> bool {
        if id.is_temporary() {
            debug!("Quote {} is provisional, change kept locally", id);
            return false;
        }
        if !self.check_server_status().await {
            info!("Offline, change to quote {} kept locally", id);
            return false;
        }
        true
    }
}
