pub mod entry;
pub mod error;
pub mod grant;

pub use entry::Entry;
pub use error::CoreError;
pub use grant::{
    AccessGrant, DEFAULT_GRANT_TTL_SECONDS, generate_grant_id, is_valid_grant_id,
    normalize_root_prefix,
};
