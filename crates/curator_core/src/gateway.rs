use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{BlacklistEntryId, BlacklistedCreator, Creator, CreatorId, InterestingLink, LinkId},
    error::{ApiError, ErrorCode},
    protocol::MutationAck,
};

pub type GatewayResult<T> = Result<T, ApiError>;

/// Async request/response seam to the backend store, one method per verb.
/// The backend owns all persistent state; callers hold cached copies only.
#[async_trait]
pub trait CommandGateway: Send + Sync {
    async fn read_creators(&self) -> GatewayResult<Vec<Creator>>;
    async fn create_creator(
        &self,
        name: String,
        homepage: String,
        rate: i32,
    ) -> GatewayResult<MutationAck>;
    async fn update_creator(
        &self,
        id: CreatorId,
        name: String,
        homepage: String,
        rate: i32,
    ) -> GatewayResult<MutationAck>;
    async fn delete_creator(&self, id: CreatorId) -> GatewayResult<MutationAck>;

    async fn read_blacklisted_creators(&self) -> GatewayResult<Vec<BlacklistedCreator>>;
    async fn create_blacklisted_creator(
        &self,
        creator_id: CreatorId,
        reason: String,
        date: String,
    ) -> GatewayResult<MutationAck>;
    async fn update_blacklisted_creator(
        &self,
        id: BlacklistEntryId,
        creator_id: CreatorId,
        reason: String,
        date: String,
    ) -> GatewayResult<MutationAck>;
    async fn delete_blacklisted_creator(&self, id: BlacklistEntryId) -> GatewayResult<MutationAck>;

    async fn read_interesting_links(&self) -> GatewayResult<Vec<InterestingLink>>;
    async fn create_interesting_link(
        &self,
        url: String,
        source: Option<String>,
        downloaded: bool,
        date: Option<String>,
    ) -> GatewayResult<MutationAck>;
    async fn update_interesting_link(
        &self,
        id: LinkId,
        url: String,
        source: Option<String>,
        downloaded: bool,
        date: Option<String>,
    ) -> GatewayResult<MutationAck>;
    async fn delete_interesting_link(&self, id: LinkId) -> GatewayResult<MutationAck>;
}

fn unavailable() -> ApiError {
    ApiError::new(ErrorCode::Unavailable, "command gateway is unavailable")
}

/// Stand-in used before a real gateway is wired up; every verb fails.
pub struct MissingCommandGateway;

#[async_trait]
impl CommandGateway for MissingCommandGateway {
    async fn read_creators(&self) -> GatewayResult<Vec<Creator>> {
        Err(unavailable())
    }

    async fn create_creator(
        &self,
        _name: String,
        _homepage: String,
        _rate: i32,
    ) -> GatewayResult<MutationAck> {
        Err(unavailable())
    }

    async fn update_creator(
        &self,
        _id: CreatorId,
        _name: String,
        _homepage: String,
        _rate: i32,
    ) -> GatewayResult<MutationAck> {
        Err(unavailable())
    }

    async fn delete_creator(&self, _id: CreatorId) -> GatewayResult<MutationAck> {
        Err(unavailable())
    }

    async fn read_blacklisted_creators(&self) -> GatewayResult<Vec<BlacklistedCreator>> {
        Err(unavailable())
    }

    async fn create_blacklisted_creator(
        &self,
        _creator_id: CreatorId,
        _reason: String,
        _date: String,
    ) -> GatewayResult<MutationAck> {
        Err(unavailable())
    }

    async fn update_blacklisted_creator(
        &self,
        _id: BlacklistEntryId,
        _creator_id: CreatorId,
        _reason: String,
        _date: String,
    ) -> GatewayResult<MutationAck> {
        Err(unavailable())
    }

    async fn delete_blacklisted_creator(&self, _id: BlacklistEntryId) -> GatewayResult<MutationAck> {
        Err(unavailable())
    }

    async fn read_interesting_links(&self) -> GatewayResult<Vec<InterestingLink>> {
        Err(unavailable())
    }

    async fn create_interesting_link(
        &self,
        _url: String,
        _source: Option<String>,
        _downloaded: bool,
        _date: Option<String>,
    ) -> GatewayResult<MutationAck> {
        Err(unavailable())
    }

    async fn update_interesting_link(
        &self,
        _id: LinkId,
        _url: String,
        _source: Option<String>,
        _downloaded: bool,
        _date: Option<String>,
    ) -> GatewayResult<MutationAck> {
        Err(unavailable())
    }

    async fn delete_interesting_link(&self, _id: LinkId) -> GatewayResult<MutationAck> {
        Err(unavailable())
    }
}

/// Read-side seam for [`crate::store::EntityStore`]: how one collection is
/// fetched in full from the gateway.
#[async_trait]
pub trait CollectionSource<T>: Send + Sync {
    async fn fetch_all(&self) -> GatewayResult<Vec<T>>;
}

pub struct CreatorSource(pub Arc<dyn CommandGateway>);

#[async_trait]
impl CollectionSource<Creator> for CreatorSource {
    async fn fetch_all(&self) -> GatewayResult<Vec<Creator>> {
        self.0.read_creators().await
    }
}

pub struct BlacklistSource(pub Arc<dyn CommandGateway>);

#[async_trait]
impl CollectionSource<BlacklistedCreator> for BlacklistSource {
    async fn fetch_all(&self) -> GatewayResult<Vec<BlacklistedCreator>> {
        self.0.read_blacklisted_creators().await
    }
}

pub struct LinkSource(pub Arc<dyn CommandGateway>);

#[async_trait]
impl CollectionSource<InterestingLink> for LinkSource {
    async fn fetch_all(&self) -> GatewayResult<Vec<InterestingLink>> {
        self.0.read_interesting_links().await
    }
}
