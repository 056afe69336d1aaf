use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{BlacklistEntryId, BlacklistedCreator, Creator, CreatorId, InterestingLink, LinkId},
    error::{ApiError, ErrorCode},
    protocol::{GatewayCommand, GatewayReply, MutationAck},
};

use crate::gateway::{CommandGateway, GatewayResult};

/// Gateway implementation speaking JSON to a command backend: every verb is
/// POSTed as a tagged [`GatewayCommand`] to `{base_url}/command`.
pub struct HttpCommandGateway {
    http: Client,
    base_url: String,
}

impl HttpCommandGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Requests time out after `timeout`; a timeout surfaces like any other
    /// transport failure.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }

    async fn dispatch(&self, command: GatewayCommand) -> Result<GatewayReply, ApiError> {
        let response = self
            .http
            .post(format!("{}/command", self.base_url))
            .json(&command)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        let reply: GatewayReply = response.json().await.map_err(transport)?;
        match reply {
            GatewayReply::Error(err) => Err(err),
            reply => Ok(reply),
        }
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::new(ErrorCode::Unavailable, err.to_string())
}

fn unexpected(verb: &str) -> ApiError {
    ApiError::new(
        ErrorCode::Internal,
        format!("unexpected gateway reply for {verb}"),
    )
}

#[async_trait]
impl CommandGateway for HttpCommandGateway {
    async fn read_creators(&self) -> GatewayResult<Vec<Creator>> {
        match self.dispatch(GatewayCommand::ReadCreators).await? {
            GatewayReply::Creators(rows) => Ok(rows),
            _ => Err(unexpected("read_creators")),
        }
    }

    async fn create_creator(
        &self,
        name: String,
        homepage: String,
        rate: i32,
    ) -> GatewayResult<MutationAck> {
        match self
            .dispatch(GatewayCommand::CreateCreator {
                name,
                homepage,
                rate,
            })
            .await?
        {
            GatewayReply::Ack(ack) => Ok(ack),
            _ => Err(unexpected("create_creator")),
        }
    }

    async fn update_creator(
        &self,
        id: CreatorId,
        name: String,
        homepage: String,
        rate: i32,
    ) -> GatewayResult<MutationAck> {
        match self
            .dispatch(GatewayCommand::UpdateCreator {
                id,
                name,
                homepage,
                rate,
            })
            .await?
        {
            GatewayReply::Ack(ack) => Ok(ack),
            _ => Err(unexpected("update_creator")),
        }
    }

    async fn delete_creator(&self, id: CreatorId) -> GatewayResult<MutationAck> {
        match self.dispatch(GatewayCommand::DeleteCreator { id }).await? {
            GatewayReply::Ack(ack) => Ok(ack),
            _ => Err(unexpected("delete_creator")),
        }
    }

    async fn read_blacklisted_creators(&self) -> GatewayResult<Vec<BlacklistedCreator>> {
        match self.dispatch(GatewayCommand::ReadBlacklistedCreators).await? {
            GatewayReply::BlacklistedCreators(rows) => Ok(rows),
            _ => Err(unexpected("read_blacklisted_creators")),
        }
    }

    async fn create_blacklisted_creator(
        &self,
        creator_id: CreatorId,
        reason: String,
        date: String,
    ) -> GatewayResult<MutationAck> {
        match self
            .dispatch(GatewayCommand::CreateBlacklistedCreator {
                creator_id,
                reason,
                date,
            })
            .await?
        {
            GatewayReply::Ack(ack) => Ok(ack),
            _ => Err(unexpected("create_blacklisted_creator")),
        }
    }

    async fn update_blacklisted_creator(
        &self,
        id: BlacklistEntryId,
        creator_id: CreatorId,
        reason: String,
        date: String,
    ) -> GatewayResult<MutationAck> {
        match self
            .dispatch(GatewayCommand::UpdateBlacklistedCreator {
                id,
                creator_id,
                reason,
                date,
            })
            .await?
        {
            GatewayReply::Ack(ack) => Ok(ack),
            _ => Err(unexpected("update_blacklisted_creator")),
        }
    }

    async fn delete_blacklisted_creator(&self, id: BlacklistEntryId) -> GatewayResult<MutationAck> {
        match self
            .dispatch(GatewayCommand::DeleteBlacklistedCreator { id })
            .await?
        {
            GatewayReply::Ack(ack) => Ok(ack),
            _ => Err(unexpected("delete_blacklisted_creator")),
        }
    }

    async fn read_interesting_links(&self) -> GatewayResult<Vec<InterestingLink>> {
        match self.dispatch(GatewayCommand::ReadInterestingLinks).await? {
            GatewayReply::InterestingLinks(rows) => Ok(rows),
            _ => Err(unexpected("read_interesting_links")),
        }
    }

    async fn create_interesting_link(
        &self,
        url: String,
        source: Option<String>,
        downloaded: bool,
        date: Option<String>,
    ) -> GatewayResult<MutationAck> {
        match self
            .dispatch(GatewayCommand::CreateInterestingLink {
                url,
                source,
                downloaded,
                date,
            })
            .await?
        {
            GatewayReply::Ack(ack) => Ok(ack),
            _ => Err(unexpected("create_interesting_link")),
        }
    }

    async fn update_interesting_link(
        &self,
        id: LinkId,
        url: String,
        source: Option<String>,
        downloaded: bool,
        date: Option<String>,
    ) -> GatewayResult<MutationAck> {
        match self
            .dispatch(GatewayCommand::UpdateInterestingLink {
                id,
                url,
                source,
                downloaded,
                date,
            })
            .await?
        {
            GatewayReply::Ack(ack) => Ok(ack),
            _ => Err(unexpected("update_interesting_link")),
        }
    }

    async fn delete_interesting_link(&self, id: LinkId) -> GatewayResult<MutationAck> {
        match self
            .dispatch(GatewayCommand::DeleteInterestingLink { id })
            .await?
        {
            GatewayReply::Ack(ack) => Ok(ack),
            _ => Err(unexpected("delete_interesting_link")),
        }
    }
}
