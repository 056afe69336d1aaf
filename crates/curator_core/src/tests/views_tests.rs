use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use shared::{
    domain::{BlacklistEntryId, BlacklistedCreator, Creator, CreatorId, InterestingLink, LinkId},
    error::{ApiError, ErrorCode},
    protocol::MutationAck,
};

use super::*;
use crate::gateway::GatewayResult;

#[derive(Default)]
struct GatewayState {
    creators: Vec<Creator>,
    blacklist: Vec<BlacklistedCreator>,
    links: Vec<InterestingLink>,
    calls: Vec<&'static str>,
    fail_mutations_with: Option<String>,
}

#[derive(Default)]
struct TestCommandGateway {
    state: StdMutex<GatewayState>,
}

impl TestCommandGateway {
    fn with_creators(creators: Vec<Creator>) -> Self {
        Self {
            state: StdMutex::new(GatewayState {
                creators,
                ..GatewayState::default()
            }),
        }
    }

    fn with_data(
        creators: Vec<Creator>,
        blacklist: Vec<BlacklistedCreator>,
        links: Vec<InterestingLink>,
    ) -> Self {
        Self {
            state: StdMutex::new(GatewayState {
                creators,
                blacklist,
                links,
                ..GatewayState::default()
            }),
        }
    }

    fn failing_mutations(self, message: impl Into<String>) -> Self {
        self.state
            .lock()
            .expect("state lock")
            .fail_mutations_with = Some(message.into());
        self
    }

    fn calls(&self) -> Vec<&'static str> {
        self.state.lock().expect("state lock").calls.clone()
    }

    fn call_count(&self, verb: &str) -> usize {
        self.calls().iter().filter(|&&name| name == verb).count()
    }

    fn stored_creators(&self) -> Vec<Creator> {
        self.state.lock().expect("state lock").creators.clone()
    }

    fn stored_blacklist(&self) -> Vec<BlacklistedCreator> {
        self.state.lock().expect("state lock").blacklist.clone()
    }

    fn mutation_guard(state: &GatewayState) -> Result<(), ApiError> {
        match &state.fail_mutations_with {
            Some(message) => Err(ApiError::new(ErrorCode::Internal, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CommandGateway for TestCommandGateway {
    async fn read_creators(&self) -> GatewayResult<Vec<Creator>> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("read_creators");
        Ok(state.creators.clone())
    }

    async fn create_creator(
        &self,
        name: String,
        homepage: String,
        rate: i32,
    ) -> GatewayResult<MutationAck> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("create_creator");
        Self::mutation_guard(&state)?;
        let id = CreatorId(state.creators.iter().map(|c| c.id.0).max().unwrap_or(0) + 1);
        state.creators.push(Creator {
            id,
            name,
            homepage,
            rate,
        });
        Ok(MutationAck::new("Creator added successfully"))
    }

    async fn update_creator(
        &self,
        id: CreatorId,
        name: String,
        homepage: String,
        rate: i32,
    ) -> GatewayResult<MutationAck> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("update_creator");
        Self::mutation_guard(&state)?;
        if let Some(creator) = state.creators.iter_mut().find(|c| c.id == id) {
            creator.name = name;
            creator.homepage = homepage;
            creator.rate = rate;
        }
        Ok(MutationAck::new("Creator updated successfully"))
    }

    async fn delete_creator(&self, id: CreatorId) -> GatewayResult<MutationAck> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("delete_creator");
        Self::mutation_guard(&state)?;
        state.creators.retain(|c| c.id != id);
        Ok(MutationAck::new("Creator deleted successfully"))
    }

    async fn read_blacklisted_creators(&self) -> GatewayResult<Vec<BlacklistedCreator>> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("read_blacklisted_creators");
        Ok(state.blacklist.clone())
    }

    async fn create_blacklisted_creator(
        &self,
        creator_id: CreatorId,
        reason: String,
        date: String,
    ) -> GatewayResult<MutationAck> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("create_blacklisted_creator");
        Self::mutation_guard(&state)?;
        let id = BlacklistEntryId(state.blacklist.iter().map(|e| e.id.0).max().unwrap_or(0) + 1);
        state.blacklist.push(BlacklistedCreator {
            id,
            creator_id,
            reason,
            date,
        });
        Ok(MutationAck::new("Blacklisted creator added successfully"))
    }

    async fn update_blacklisted_creator(
        &self,
        id: BlacklistEntryId,
        creator_id: CreatorId,
        reason: String,
        date: String,
    ) -> GatewayResult<MutationAck> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("update_blacklisted_creator");
        Self::mutation_guard(&state)?;
        if let Some(entry) = state.blacklist.iter_mut().find(|e| e.id == id) {
            entry.creator_id = creator_id;
            entry.reason = reason;
            entry.date = date;
        }
        Ok(MutationAck::new("Blacklisted creator updated successfully"))
    }

    async fn delete_blacklisted_creator(&self, id: BlacklistEntryId) -> GatewayResult<MutationAck> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("delete_blacklisted_creator");
        Self::mutation_guard(&state)?;
        state.blacklist.retain(|e| e.id != id);
        Ok(MutationAck::new("Blacklisted creator deleted successfully"))
    }

    async fn read_interesting_links(&self) -> GatewayResult<Vec<InterestingLink>> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("read_interesting_links");
        Ok(state.links.clone())
    }

    async fn create_interesting_link(
        &self,
        url: String,
        source: Option<String>,
        downloaded: bool,
        date: Option<String>,
    ) -> GatewayResult<MutationAck> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("create_interesting_link");
        Self::mutation_guard(&state)?;
        let id = LinkId(state.links.iter().map(|l| l.id.0).max().unwrap_or(0) + 1);
        state.links.push(InterestingLink {
            id,
            url,
            source,
            downloaded,
            date,
        });
        Ok(MutationAck::new("Interesting link added successfully"))
    }

    async fn update_interesting_link(
        &self,
        id: LinkId,
        url: String,
        source: Option<String>,
        downloaded: bool,
        date: Option<String>,
    ) -> GatewayResult<MutationAck> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("update_interesting_link");
        Self::mutation_guard(&state)?;
        if let Some(link) = state.links.iter_mut().find(|l| l.id == id) {
            link.url = url;
            link.source = source;
            link.downloaded = downloaded;
            link.date = date;
        }
        Ok(MutationAck::new("Interesting link updated successfully"))
    }

    async fn delete_interesting_link(&self, id: LinkId) -> GatewayResult<MutationAck> {
        let mut state = self.state.lock().expect("state lock");
        state.calls.push("delete_interesting_link");
        Self::mutation_guard(&state)?;
        state.links.retain(|l| l.id != id);
        Ok(MutationAck::new("Interesting link deleted successfully"))
    }
}

/// Sanitizer double that strips a recognizable marker, so tests can prove
/// cleaning happened exactly at the submission boundary.
struct TagSanitizer;

impl Sanitizer for TagSanitizer {
    fn clean(&self, text: &str) -> String {
        text.replace("<script>", "").replace("</script>", "")
    }
}

fn alice() -> Creator {
    Creator {
        id: CreatorId(1),
        name: "Alice".to_string(),
        homepage: "a.example".to_string(),
        rate: 5,
    }
}

fn entry(id: i64, creator_id: i64, reason: &str) -> BlacklistedCreator {
    BlacklistedCreator {
        id: BlacklistEntryId(id),
        creator_id: CreatorId(creator_id),
        reason: reason.to_string(),
        date: "01/01/2024".to_string(),
    }
}

fn link(id: i64, url: &str, source: Option<&str>, downloaded: bool) -> InterestingLink {
    InterestingLink {
        id: LinkId(id),
        url: url.to_string(),
        source: source.map(str::to_string),
        downloaded,
        date: None,
    }
}

fn creators_view(gateway: Arc<TestCommandGateway>) -> CreatorsView {
    CreatorsView::new(gateway, Arc::new(PassthroughSanitizer))
}

fn blacklist_view(gateway: Arc<TestCommandGateway>) -> BlacklistView {
    BlacklistView::new(gateway, Arc::new(PassthroughSanitizer))
}

fn links_view(gateway: Arc<TestCommandGateway>) -> LinksView {
    LinksView::new(gateway, Arc::new(PassthroughSanitizer))
}

#[tokio::test]
async fn create_submit_reloads_and_goes_idle() {
    let gateway = Arc::new(TestCommandGateway::default());
    let mut view = creators_view(Arc::clone(&gateway));

    let ack = view
        .submit(&CreatorDraft {
            name: "Alice".into(),
            homepage: "a.example".into(),
            rate: 5,
        })
        .await
        .expect("submit");

    assert_eq!(ack.message, "Creator added successfully");
    assert!(view.editing().is_none());
    assert_eq!(view.store().current().await, gateway.stored_creators());
    assert_eq!(gateway.calls(), vec!["create_creator", "read_creators"]);
}

#[tokio::test]
async fn submit_sanitizes_text_fields_at_the_boundary() {
    let gateway = Arc::new(TestCommandGateway::default());
    let mut view = CreatorsView::new(Arc::clone(&gateway) as Arc<dyn CommandGateway>, Arc::new(TagSanitizer));

    view.submit(&CreatorDraft {
        name: "Alice<script>alert(1)</script>".into(),
        homepage: "a.example".into(),
        rate: 5,
    })
    .await
    .expect("submit");

    let stored = gateway.stored_creators();
    assert_eq!(stored[0].name, "Alicealert(1)");
}

#[tokio::test]
async fn out_of_range_rate_fails_before_any_gateway_call() {
    let gateway = Arc::new(TestCommandGateway::default());
    let mut view = creators_view(Arc::clone(&gateway));

    let err = view
        .submit(&CreatorDraft {
            name: "Alice".into(),
            homepage: "a.example".into(),
            rate: 11,
        })
        .await
        .expect_err("must fail");

    assert_eq!(
        err,
        CoreError::Validation(ValidationError::RateOutOfRange { rate: 11 })
    );
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn missing_name_fails_before_any_gateway_call() {
    let gateway = Arc::new(TestCommandGateway::default());
    let mut view = creators_view(Arc::clone(&gateway));

    let err = view
        .submit(&CreatorDraft {
            name: "  ".into(),
            homepage: "a.example".into(),
            rate: 3,
        })
        .await
        .expect_err("must fail");

    assert_eq!(
        err,
        CoreError::Validation(ValidationError::MissingField { field: "name" })
    );
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn submit_updates_the_edit_target() {
    let gateway = Arc::new(TestCommandGateway::with_creators(vec![alice()]));
    let mut view = creators_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    view.begin_edit(alice());
    let mut draft = CreatorDraft::from_record(&alice());
    draft.rate = 9;
    view.submit(&draft).await.expect("submit");

    assert!(view.editing().is_none());
    assert_eq!(gateway.call_count("update_creator"), 1);
    assert_eq!(gateway.call_count("create_creator"), 0);
    assert_eq!(gateway.stored_creators()[0].rate, 9);
}

#[tokio::test]
async fn failed_submit_keeps_the_edit_session_active() {
    let gateway =
        Arc::new(TestCommandGateway::with_creators(vec![alice()]).failing_mutations("disk full"));
    let mut view = creators_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");
    view.begin_edit(alice());

    let err = view
        .submit(&CreatorDraft::from_record(&alice()))
        .await
        .expect_err("must fail");

    assert_eq!(
        err,
        CoreError::Mutation {
            message: "disk full".to_string()
        }
    );
    // Nothing cleared: the user retries from where they were.
    assert_eq!(view.editing(), Some(&alice()));
}

#[tokio::test]
async fn delete_confirmation_is_last_request_wins() {
    let bob = Creator {
        id: CreatorId(2),
        name: "Bob".to_string(),
        homepage: "b.example".to_string(),
        rate: 2,
    };
    let gateway = Arc::new(TestCommandGateway::with_creators(vec![alice(), bob]));
    let mut view = creators_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    // A second request before the first is confirmed replaces it; only the
    // newest action may ever execute.
    view.request_delete(CreatorId(1));
    view.request_delete(CreatorId(2));
    view.confirm_pending().await.expect("confirm");

    assert_eq!(gateway.call_count("delete_creator"), 1);
    let remaining = gateway.stored_creators();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, CreatorId(1));

    // The gate is spent; confirming again is a no-op.
    assert_eq!(view.confirm_pending().await.expect("noop"), None);
    assert_eq!(gateway.call_count("delete_creator"), 1);
}

#[tokio::test]
async fn rapid_duplicate_delete_requests_issue_one_verb() {
    let gateway = Arc::new(TestCommandGateway::with_creators(vec![alice()]));
    let mut view = creators_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    view.request_delete(CreatorId(1));
    view.request_delete(CreatorId(1));
    view.confirm_pending().await.expect("confirm");
    view.confirm_pending().await.expect("noop");

    assert_eq!(gateway.call_count("delete_creator"), 1);
}

#[tokio::test]
async fn failed_delete_keeps_the_row_visible() {
    let gateway =
        Arc::new(TestCommandGateway::with_creators(vec![alice()]).failing_mutations("locked"));
    let mut view = creators_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    view.request_delete(CreatorId(1));
    let err = view.confirm_pending().await.expect_err("must fail");
    assert_eq!(
        err,
        CoreError::Mutation {
            message: "locked".to_string()
        }
    );
    // No optimistic removal.
    assert_eq!(view.store().current().await, vec![alice()]);
}

#[tokio::test]
async fn delete_is_blocked_while_blacklist_entries_reference_the_creator() {
    let gateway = Arc::new(TestCommandGateway::with_data(
        vec![alice()],
        vec![entry(10, 1, "spam")],
        Vec::new(),
    ));
    let mut view = creators_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    view.request_delete(CreatorId(1));
    let err = view.confirm_pending().await.expect_err("must be blocked");

    assert_eq!(
        err,
        CoreError::DependentEntries {
            creator_id: 1,
            count: 1
        }
    );
    assert_eq!(gateway.call_count("delete_creator"), 0);
    assert_eq!(gateway.stored_creators(), vec![alice()]);
}

#[tokio::test]
async fn cancelling_an_edit_routes_through_the_gate() {
    let gateway = Arc::new(TestCommandGateway::with_creators(vec![alice()]));
    let mut view = creators_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");
    view.begin_edit(alice());

    view.request_cancel_edit();
    // Still editing until the discard is confirmed.
    assert!(view.editing().is_some());
    assert_eq!(
        view.pending_confirmation(),
        Some(&CreatorAction::DiscardEdit)
    );

    view.confirm_pending().await.expect("confirm discard");
    assert!(view.editing().is_none());
}

#[tokio::test]
async fn dismissing_the_confirmation_keeps_the_edit() {
    let gateway = Arc::new(TestCommandGateway::with_creators(vec![alice()]));
    let mut view = creators_view(Arc::clone(&gateway));
    view.begin_edit(alice());

    view.request_cancel_edit();
    view.dismiss_confirmation();

    assert_eq!(view.editing(), Some(&alice()));
    assert!(view.pending_confirmation().is_none());
}

#[tokio::test]
async fn blacklisting_an_existing_creator_succeeds() {
    let gateway = Arc::new(TestCommandGateway::with_creators(vec![alice()]));
    let mut view = blacklist_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    let ack = view
        .submit(&BlacklistDraft {
            creator_id: "1".into(),
            reason: "spam".into(),
            date: "01/01/2024".into(),
        })
        .await
        .expect("submit");

    assert_eq!(ack.message, "Blacklisted creator added successfully");
    let stored = gateway.stored_blacklist();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].creator_id, CreatorId(1));
    assert_eq!(view.store().current().await, stored);
}

#[tokio::test]
async fn dangling_reference_fails_with_no_mutation_verb() {
    let gateway = Arc::new(TestCommandGateway::with_creators(vec![alice()]));
    let mut view = blacklist_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    let err = view
        .submit(&BlacklistDraft {
            creator_id: "99".into(),
            reason: "spam".into(),
            date: "01/01/2024".into(),
        })
        .await
        .expect_err("must fail");

    assert_eq!(err, CoreError::DanglingReference { creator_id: 99 });
    assert_eq!(gateway.call_count("create_blacklisted_creator"), 0);
    assert!(gateway.stored_blacklist().is_empty());
    assert!(view.store().current().await.is_empty());
}

#[tokio::test]
async fn non_positive_or_non_numeric_references_fail_before_any_call() {
    let gateway = Arc::new(TestCommandGateway::with_creators(vec![alice()]));
    let mut view = blacklist_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");
    let reads_before = gateway.calls().len();

    for raw in ["0", "-4", "abc", ""] {
        let err = view
            .submit(&BlacklistDraft {
                creator_id: raw.into(),
                reason: "spam".into(),
                date: "01/01/2024".into(),
            })
            .await
            .expect_err("must fail");
        assert!(
            matches!(err, CoreError::InvalidReference { .. }),
            "raw {raw:?} gave {err:?}"
        );
    }

    // Submission never reached the gateway.
    assert_eq!(gateway.calls().len(), reads_before);
}

#[tokio::test]
async fn blacklist_missing_reason_is_a_validation_failure() {
    let gateway = Arc::new(TestCommandGateway::with_creators(vec![alice()]));
    let mut view = blacklist_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    let err = view
        .submit(&BlacklistDraft {
            creator_id: "1".into(),
            reason: "".into(),
            date: "01/01/2024".into(),
        })
        .await
        .expect_err("must fail");

    assert_eq!(
        err,
        CoreError::Validation(ValidationError::MissingField { field: "reason" })
    );
    assert_eq!(gateway.call_count("create_blacklisted_creator"), 0);
}

#[tokio::test]
async fn repointing_an_entry_validates_the_new_reference() {
    let bob = Creator {
        id: CreatorId(2),
        name: "Bob".to_string(),
        homepage: "b.example".to_string(),
        rate: 2,
    };
    let gateway = Arc::new(TestCommandGateway::with_data(
        vec![alice(), bob],
        vec![entry(10, 1, "spam")],
        Vec::new(),
    ));
    let mut view = blacklist_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    view.begin_edit(entry(10, 1, "spam"));
    let mut draft = BlacklistDraft::from_record(&entry(10, 1, "spam"));
    draft.creator_id = "2".into();
    view.submit(&draft).await.expect("repoint to existing");
    assert_eq!(gateway.stored_blacklist()[0].creator_id, CreatorId(2));

    view.begin_edit(entry(10, 2, "spam"));
    draft.creator_id = "99".into();
    let err = view.submit(&draft).await.expect_err("dangling repoint");
    assert_eq!(err, CoreError::DanglingReference { creator_id: 99 });
    assert_eq!(gateway.call_count("update_blacklisted_creator"), 1);
}

#[tokio::test]
async fn link_search_matches_url_or_source() {
    let gateway = Arc::new(TestCommandGateway::with_data(
        Vec::new(),
        Vec::new(),
        vec![
            link(1, "foo.com", None, false),
            link(2, "bar.com", Some("foo-feed"), false),
        ],
    ));
    let mut view = links_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    view.set_query("foo");
    let hits = view.visible().await;
    assert_eq!(hits.len(), 2);

    view.set_query("zzz");
    assert!(view.visible().await.is_empty());
}

#[tokio::test]
async fn hide_downloaded_predicate_composes_with_search() {
    let gateway = Arc::new(TestCommandGateway::with_data(
        Vec::new(),
        Vec::new(),
        vec![
            link(1, "foo.com", None, true),
            link(2, "foo.org", None, false),
        ],
    ));
    let mut view = links_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    view.set_query("foo");
    view.set_hide_downloaded(true);
    let hits = view.visible().await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, LinkId(2));

    view.set_hide_downloaded(false);
    assert_eq!(view.visible().await.len(), 2);
}

#[tokio::test]
async fn link_without_url_fails_validation() {
    let gateway = Arc::new(TestCommandGateway::default());
    let mut view = links_view(Arc::clone(&gateway));

    let err = view
        .submit(&LinkDraft {
            url: "".into(),
            source: Some("feed".into()),
            downloaded: false,
            date: None,
        })
        .await
        .expect_err("must fail");

    assert_eq!(
        err,
        CoreError::Validation(ValidationError::MissingField { field: "url" })
    );
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn link_delete_reloads_the_collection() {
    let gateway = Arc::new(TestCommandGateway::with_data(
        Vec::new(),
        Vec::new(),
        vec![link(1, "foo.com", None, false)],
    ));
    let mut view = links_view(Arc::clone(&gateway));
    view.refresh().await.expect("refresh");

    view.request_delete(LinkId(1));
    let ack = view.confirm_pending().await.expect("confirm");
    assert_eq!(
        ack.map(|a| a.message),
        Some("Interesting link deleted successfully".to_string())
    );
    assert!(view.store().current().await.is_empty());
}
