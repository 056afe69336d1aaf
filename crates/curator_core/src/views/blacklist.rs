use std::{collections::HashSet, sync::Arc};

use shared::{
    domain::{BlacklistEntryId, BlacklistedCreator, Creator, CreatorId},
    protocol::MutationAck,
};
use tracing::info;

use crate::{
    confirm::ConfirmationGate,
    edit::EditSession,
    error::CoreError,
    filter::SearchFilter,
    forms::BlacklistDraft,
    gateway::{BlacklistSource, CommandGateway, CreatorSource},
    referential,
    sanitize::Sanitizer,
    store::EntityStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistAction {
    Delete(BlacklistEntryId),
    DiscardEdit,
}

/// The blacklist page also owns a creator store: the reference guard
/// validates entries against the current creator id set, and the UI lists
/// creators to pick from.
pub struct BlacklistView {
    gateway: Arc<dyn CommandGateway>,
    sanitizer: Arc<dyn Sanitizer>,
    store: EntityStore<BlacklistedCreator>,
    creators: EntityStore<Creator>,
    edit: EditSession<BlacklistedCreator>,
    filter: SearchFilter<BlacklistedCreator>,
    gate: ConfirmationGate<BlacklistAction>,
}

impl BlacklistView {
    pub fn new(gateway: Arc<dyn CommandGateway>, sanitizer: Arc<dyn Sanitizer>) -> Self {
        Self {
            store: EntityStore::new(Arc::new(BlacklistSource(Arc::clone(&gateway)))),
            creators: EntityStore::new(Arc::new(CreatorSource(Arc::clone(&gateway)))),
            gateway,
            sanitizer,
            edit: EditSession::default(),
            filter: SearchFilter::default(),
            gate: ConfirmationGate::new(),
        }
    }

    /// Reloads both collections this page depends on.
    pub async fn refresh(&self) -> Result<Vec<BlacklistedCreator>, CoreError> {
        self.creators.load().await?;
        self.store.load().await
    }

    pub async fn visible(&self) -> Vec<BlacklistedCreator> {
        self.filter.apply(&self.store.current().await)
    }

    pub async fn known_creators(&self) -> Vec<Creator> {
        self.creators.current().await
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.set_query(query);
    }

    pub fn begin_edit(&mut self, record: BlacklistedCreator) {
        self.edit.begin(record);
    }

    pub fn editing(&self) -> Option<&BlacklistedCreator> {
        self.edit.editing()
    }

    pub fn request_cancel_edit(&mut self) {
        if self.edit.is_active() {
            self.gate.request(BlacklistAction::DiscardEdit);
        }
    }

    pub fn request_delete(&mut self, id: BlacklistEntryId) {
        self.gate.request(BlacklistAction::Delete(id));
    }

    pub fn pending_confirmation(&self) -> Option<&BlacklistAction> {
        self.gate.pending()
    }

    pub fn dismiss_confirmation(&mut self) {
        self.gate.cancel();
    }

    pub async fn confirm_pending(&mut self) -> Result<Option<MutationAck>, CoreError> {
        match self.gate.confirm() {
            None => Ok(None),
            Some(BlacklistAction::DiscardEdit) => {
                self.edit.reset();
                Ok(None)
            }
            Some(BlacklistAction::Delete(id)) => {
                let ack = self
                    .gateway
                    .delete_blacklisted_creator(id)
                    .await
                    .map_err(CoreError::mutation)?;
                info!(entry_id = id.0, "view: blacklist entry deleted");
                self.store.load().await?;
                Ok(Some(ack))
            }
        }
    }

    /// The reference is parsed and checked against the cached creator set
    /// before any verb goes out; dangling or malformed references never
    /// reach the gateway.
    pub async fn submit(&mut self, draft: &BlacklistDraft) -> Result<MutationAck, CoreError> {
        let clean = draft.sanitized(self.sanitizer.as_ref());
        let creator_id = referential::parse_reference(&clean.creator_id)?;
        clean.validate()?;

        let known: HashSet<CreatorId> = self
            .creators
            .current()
            .await
            .iter()
            .map(|creator| creator.id)
            .collect();
        referential::validate_blacklist_entry(creator_id, &known)?;

        let ack = match self.edit.editing() {
            Some(current) => {
                self.gateway
                    .update_blacklisted_creator(current.id, creator_id, clean.reason, clean.date)
                    .await
            }
            None => {
                self.gateway
                    .create_blacklisted_creator(creator_id, clean.reason, clean.date)
                    .await
            }
        }
        .map_err(CoreError::mutation)?;
        self.edit.reset();
        self.store.load().await?;
        Ok(ack)
    }

    pub fn store(&self) -> &EntityStore<BlacklistedCreator> {
        &self.store
    }
}
