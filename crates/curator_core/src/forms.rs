//! Form value containers. Drafts stay caller-owned so a failed submit never
//! loses typed work; the views sanitize and validate them at the submission
//! boundary only.

use shared::domain::{BlacklistedCreator, Creator, InterestingLink};

use crate::{error::ValidationError, sanitize::Sanitizer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatorDraft {
    pub name: String,
    pub homepage: String,
    pub rate: i32,
}

impl CreatorDraft {
    /// Prefills the form when an edit session begins on `record`.
    pub fn from_record(record: &Creator) -> Self {
        Self {
            name: record.name.clone(),
            homepage: record.homepage.clone(),
            rate: record.rate,
        }
    }

    pub(crate) fn sanitized(&self, sanitizer: &dyn Sanitizer) -> Self {
        Self {
            name: sanitizer.clean(&self.name),
            homepage: sanitizer.clean(&self.homepage),
            rate: self.rate,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }
        if self.homepage.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "homepage" });
        }
        if !(0..=10).contains(&self.rate) {
            return Err(ValidationError::RateOutOfRange { rate: self.rate });
        }
        Ok(())
    }
}

/// `creator_id` is kept as the raw text the user typed or selected; the
/// referential guard parses and checks it before any verb is issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistDraft {
    pub creator_id: String,
    pub reason: String,
    pub date: String,
}

impl BlacklistDraft {
    pub fn from_record(record: &BlacklistedCreator) -> Self {
        Self {
            creator_id: record.creator_id.0.to_string(),
            reason: record.reason.clone(),
            date: record.date.clone(),
        }
    }

    pub(crate) fn sanitized(&self, sanitizer: &dyn Sanitizer) -> Self {
        Self {
            creator_id: self.creator_id.clone(),
            reason: sanitizer.clean(&self.reason),
            date: sanitizer.clean(&self.date),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.reason.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "reason" });
        }
        if self.date.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "date" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDraft {
    pub url: String,
    pub source: Option<String>,
    pub downloaded: bool,
    pub date: Option<String>,
}

impl LinkDraft {
    pub fn from_record(record: &InterestingLink) -> Self {
        Self {
            url: record.url.clone(),
            source: record.source.clone(),
            downloaded: record.downloaded,
            date: record.date.clone(),
        }
    }

    pub(crate) fn sanitized(&self, sanitizer: &dyn Sanitizer) -> Self {
        Self {
            url: sanitizer.clean(&self.url),
            source: self.source.as_deref().map(|source| sanitizer.clean(source)),
            downloaded: self.downloaded,
            date: self.date.as_deref().map(|date| sanitizer.clean(date)),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "url" });
        }
        Ok(())
    }
}
