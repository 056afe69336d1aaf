//! Entity-state synchronization core for the curation console.
//!
//! The backend command interface owns all persistent state; this crate keeps
//! the cached entity collections coherent under create/update/delete,
//! enforces referential integrity between creators and blacklist entries,
//! manages single-record edit sessions with confirmed cancellation, derives
//! search projections, and gates destructive operations behind confirmation.

pub mod confirm;
pub mod edit;
pub mod error;
pub mod filter;
pub mod forms;
pub mod gateway;
pub mod http;
pub mod referential;
pub mod sanitize;
pub mod store;
pub mod views;

pub use confirm::ConfirmationGate;
pub use edit::EditSession;
pub use error::{CoreError, ValidationError};
pub use filter::{SearchFilter, Searchable};
pub use forms::{BlacklistDraft, CreatorDraft, LinkDraft};
pub use gateway::{CommandGateway, MissingCommandGateway};
pub use http::HttpCommandGateway;
pub use sanitize::{PassthroughSanitizer, Sanitizer};
pub use store::EntityStore;
pub use views::{
    BlacklistAction, BlacklistView, CreatorAction, CreatorsView, LinkAction, LinksView,
};

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod views_tests;

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod http_tests;
