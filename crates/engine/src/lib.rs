//! Folder listing engine.
//!
//! Turns a flat, prefix-addressed object store into a one-level-at-a-time
//! directory view scoped by an [`AccessGrant`](folio_core::AccessGrant).
//! A listing request flows through:
//!
//! 1. grant lookup and expiration gate ([`FolderService`])
//! 2. [`resolve_query_prefix`]
//! 3. [`PaginatedLister`] feeding a [`ChildClassifier`] page by page
//! 4. [`sign_files`] for file links, [`folder_url`] for folder links
//! 5. [`sort_entries`]

pub mod builder;
pub mod classify;
pub mod error;
pub mod lister;
pub mod nav;
pub mod prefix;
pub mod present;
pub mod service;
pub mod signer;

pub use builder::FolderServiceBuilder;
pub use classify::{ChildClassifier, Classified, FileChild};
pub use error::EngineError;
pub use lister::{ListingStats, PaginatedLister};
pub use nav::folder_url;
pub use prefix::resolve_query_prefix;
pub use present::sort_entries;
pub use service::{FolderService, ListingRequest};
pub use signer::sign_files;
