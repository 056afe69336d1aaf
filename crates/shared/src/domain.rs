use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(CreatorId);
id_newtype!(BlacklistEntryId);
id_newtype!(LinkId);

/// An attributed content source. `rate` is a quality rating in `[0, 10]`,
/// enforced client-side before any mutation verb is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: CreatorId,
    pub name: String,
    pub homepage: String,
    pub rate: i32,
}

/// A record excluding a creator from future use. `creator_id` must always
/// reference an existing [`Creator`]; re-pointing it means pointing at a
/// different existing creator, never at a dangling id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistedCreator {
    pub id: BlacklistEntryId,
    pub creator_id: CreatorId,
    pub reason: String,
    pub date: String,
}

/// A candidate URL queued for review/download. No referential dependency on
/// other entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestingLink {
    pub id: LinkId,
    pub url: String,
    pub source: Option<String>,
    pub downloaded: bool,
    pub date: Option<String>,
}
