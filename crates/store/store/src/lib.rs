pub mod error;
pub mod grant;
pub mod object;
pub mod testing;

pub use error::StoreError;
pub use grant::GrantStore;
pub use object::{ListPage, ObjectStore, ObjectSummary};
