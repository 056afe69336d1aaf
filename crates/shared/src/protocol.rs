use serde::{Deserialize, Serialize};

use crate::{
    domain::{BlacklistEntryId, BlacklistedCreator, Creator, CreatorId, InterestingLink, LinkId},
    error::ApiError,
};

/// One verb per entity-operation. Every text field is expected to be
/// sanitized before a command is transmitted; dates travel as locale
/// `DD/MM/YYYY` text and are not calendar-validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verb", content = "payload", rename_all = "snake_case")]
pub enum GatewayCommand {
    ReadCreators,
    CreateCreator {
        name: String,
        homepage: String,
        rate: i32,
    },
    UpdateCreator {
        id: CreatorId,
        name: String,
        homepage: String,
        rate: i32,
    },
    DeleteCreator {
        id: CreatorId,
    },
    ReadBlacklistedCreators,
    CreateBlacklistedCreator {
        creator_id: CreatorId,
        reason: String,
        date: String,
    },
    UpdateBlacklistedCreator {
        id: BlacklistEntryId,
        creator_id: CreatorId,
        reason: String,
        date: String,
    },
    DeleteBlacklistedCreator {
        id: BlacklistEntryId,
    },
    ReadInterestingLinks,
    CreateInterestingLink {
        url: String,
        source: Option<String>,
        downloaded: bool,
        date: Option<String>,
    },
    UpdateInterestingLink {
        id: LinkId,
        url: String,
        source: Option<String>,
        downloaded: bool,
        date: Option<String>,
    },
    DeleteInterestingLink {
        id: LinkId,
    },
}

/// Acknowledgement for a successful mutation, carrying the backend's
/// human-readable message (e.g. "Creator deleted successfully").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationAck {
    pub message: String,
}

impl MutationAck {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GatewayReply {
    Creators(Vec<Creator>),
    BlacklistedCreators(Vec<BlacklistedCreator>),
    InterestingLinks(Vec<InterestingLink>),
    Ack(MutationAck),
    Error(ApiError),
}
