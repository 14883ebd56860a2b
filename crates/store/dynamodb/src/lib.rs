mod config;
mod store;
mod table;

pub use config::DynamoConfig;
pub use store::{DynamoGrantStore, build_client};
pub use table::create_table;
