use std::sync::Arc;

use shared::{
    domain::{Creator, CreatorId},
    protocol::MutationAck,
};
use tracing::info;

use crate::{
    confirm::ConfirmationGate,
    edit::EditSession,
    error::CoreError,
    filter::SearchFilter,
    forms::CreatorDraft,
    gateway::{CommandGateway, CreatorSource},
    referential,
    sanitize::Sanitizer,
    store::EntityStore,
};

/// Destructive intents on the creators view, gated behind confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatorAction {
    Delete(CreatorId),
    DiscardEdit,
}

pub struct CreatorsView {
    gateway: Arc<dyn CommandGateway>,
    sanitizer: Arc<dyn Sanitizer>,
    store: EntityStore<Creator>,
    edit: EditSession<Creator>,
    filter: SearchFilter<Creator>,
    gate: ConfirmationGate<CreatorAction>,
}

impl CreatorsView {
    pub fn new(gateway: Arc<dyn CommandGateway>, sanitizer: Arc<dyn Sanitizer>) -> Self {
        Self {
            store: EntityStore::new(Arc::new(CreatorSource(Arc::clone(&gateway)))),
            gateway,
            sanitizer,
            edit: EditSession::default(),
            filter: SearchFilter::default(),
            gate: ConfirmationGate::new(),
        }
    }

    pub async fn refresh(&self) -> Result<Vec<Creator>, CoreError> {
        self.store.load().await
    }

    /// Filter projection over the current snapshot.
    pub async fn visible(&self) -> Vec<Creator> {
        self.filter.apply(&self.store.current().await)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.set_query(query);
    }

    pub fn begin_edit(&mut self, record: Creator) {
        self.edit.begin(record);
    }

    pub fn editing(&self) -> Option<&Creator> {
        self.edit.editing()
    }

    /// Discarding an active edit loses typed work, so it routes through the
    /// gate like any other destructive action.
    pub fn request_cancel_edit(&mut self) {
        if self.edit.is_active() {
            self.gate.request(CreatorAction::DiscardEdit);
        }
    }

    pub fn request_delete(&mut self, id: CreatorId) {
        self.gate.request(CreatorAction::Delete(id));
    }

    pub fn pending_confirmation(&self) -> Option<&CreatorAction> {
        self.gate.pending()
    }

    pub fn dismiss_confirmation(&mut self) {
        self.gate.cancel();
    }

    /// Executes the pending action exactly once. Deletion is blocked while
    /// blacklist entries still reference the creator, and a failed delete
    /// leaves the visible list untouched.
    pub async fn confirm_pending(&mut self) -> Result<Option<MutationAck>, CoreError> {
        match self.gate.confirm() {
            None => Ok(None),
            Some(CreatorAction::DiscardEdit) => {
                self.edit.reset();
                Ok(None)
            }
            Some(CreatorAction::Delete(id)) => {
                let entries = self
                    .gateway
                    .read_blacklisted_creators()
                    .await
                    .map_err(CoreError::load)?;
                referential::ensure_no_dependents(id, &entries)?;
                let ack = self
                    .gateway
                    .delete_creator(id)
                    .await
                    .map_err(CoreError::mutation)?;
                info!(creator_id = id.0, "view: creator deleted");
                self.store.load().await?;
                Ok(Some(ack))
            }
        }
    }

    /// Create-or-update chosen by the edit session. Text fields pass the
    /// sanitizer exactly once, here; on failure nothing local changes, so
    /// the caller's draft survives for a retry.
    pub async fn submit(&mut self, draft: &CreatorDraft) -> Result<MutationAck, CoreError> {
        let clean = draft.sanitized(self.sanitizer.as_ref());
        clean.validate()?;
        let ack = match self.edit.editing() {
            Some(current) => {
                self.gateway
                    .update_creator(current.id, clean.name, clean.homepage, clean.rate)
                    .await
            }
            None => {
                self.gateway
                    .create_creator(clean.name, clean.homepage, clean.rate)
                    .await
            }
        }
        .map_err(CoreError::mutation)?;
        self.edit.reset();
        self.store.load().await?;
        Ok(ack)
    }

    pub fn store(&self) -> &EntityStore<Creator> {
        &self.store
    }
}
