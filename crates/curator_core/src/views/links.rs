use std::sync::Arc;

use shared::{
    domain::{InterestingLink, LinkId},
    protocol::MutationAck,
};
use tracing::info;

use crate::{
    confirm::ConfirmationGate,
    edit::EditSession,
    error::CoreError,
    filter::SearchFilter,
    forms::LinkDraft,
    gateway::{CommandGateway, LinkSource},
    sanitize::Sanitizer,
    store::EntityStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    Delete(LinkId),
    DiscardEdit,
}

pub struct LinksView {
    gateway: Arc<dyn CommandGateway>,
    sanitizer: Arc<dyn Sanitizer>,
    store: EntityStore<InterestingLink>,
    edit: EditSession<InterestingLink>,
    filter: SearchFilter<InterestingLink>,
    gate: ConfirmationGate<LinkAction>,
    hide_downloaded: bool,
}

impl LinksView {
    pub fn new(gateway: Arc<dyn CommandGateway>, sanitizer: Arc<dyn Sanitizer>) -> Self {
        Self {
            store: EntityStore::new(Arc::new(LinkSource(Arc::clone(&gateway)))),
            gateway,
            sanitizer,
            edit: EditSession::default(),
            filter: SearchFilter::default(),
            gate: ConfirmationGate::new(),
            hide_downloaded: false,
        }
    }

    pub async fn refresh(&self) -> Result<Vec<InterestingLink>, CoreError> {
        self.store.load().await
    }

    pub async fn visible(&self) -> Vec<InterestingLink> {
        self.filter.apply(&self.store.current().await)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.set_query(query);
    }

    /// Toggles the "hide already-downloaded" extra predicate.
    pub fn set_hide_downloaded(&mut self, hide: bool) {
        self.hide_downloaded = hide;
        if hide {
            self.filter
                .set_predicates(vec![Arc::new(|link: &InterestingLink| !link.downloaded)]);
        } else {
            self.filter.clear_predicates();
        }
    }

    pub fn hides_downloaded(&self) -> bool {
        self.hide_downloaded
    }

    pub fn begin_edit(&mut self, record: InterestingLink) {
        self.edit.begin(record);
    }

    pub fn editing(&self) -> Option<&InterestingLink> {
        self.edit.editing()
    }

    pub fn request_cancel_edit(&mut self) {
        if self.edit.is_active() {
            self.gate.request(LinkAction::DiscardEdit);
        }
    }

    pub fn request_delete(&mut self, id: LinkId) {
        self.gate.request(LinkAction::Delete(id));
    }

    pub fn pending_confirmation(&self) -> Option<&LinkAction> {
        self.gate.pending()
    }

    pub fn dismiss_confirmation(&mut self) {
        self.gate.cancel();
    }

    pub async fn confirm_pending(&mut self) -> Result<Option<MutationAck>, CoreError> {
        match self.gate.confirm() {
            None => Ok(None),
            Some(LinkAction::DiscardEdit) => {
                self.edit.reset();
                Ok(None)
            }
            Some(LinkAction::Delete(id)) => {
                let ack = self
                    .gateway
                    .delete_interesting_link(id)
                    .await
                    .map_err(CoreError::mutation)?;
                info!(link_id = id.0, "view: interesting link deleted");
                self.store.load().await?;
                Ok(Some(ack))
            }
        }
    }

    pub async fn submit(&mut self, draft: &LinkDraft) -> Result<MutationAck, CoreError> {
        let clean = draft.sanitized(self.sanitizer.as_ref());
        clean.validate()?;
        let ack = match self.edit.editing() {
            Some(current) => {
                self.gateway
                    .update_interesting_link(
                        current.id,
                        clean.url,
                        clean.source,
                        clean.downloaded,
                        clean.date,
                    )
                    .await
            }
            None => {
                self.gateway
                    .create_interesting_link(clean.url, clean.source, clean.downloaded, clean.date)
                    .await
            }
        }
        .map_err(CoreError::mutation)?;
        self.edit.reset();
        self.store.load().await?;
        Ok(ack)
    }

    pub fn store(&self) -> &EntityStore<InterestingLink> {
        &self.store
    }
}
