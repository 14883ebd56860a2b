use std::sync::Arc;

#[cfg(feature = "dynamodb")]
use folio_store_dynamodb::{DynamoConfig, DynamoGrantStore};
use folio_store::GrantStore;
use folio_store_memory::MemoryGrantStore;
use tracing::info;

use crate::config::GrantsConfig;
use crate::error::ServerError;

/// Create a grant store from the given configuration.
///
/// # Errors
///
/// Returns [`ServerError::Config`] for an unknown backend or a failed table
/// creation.
#[allow(clippy::unused_async)]
pub async fn create_grant_store(config: &GrantsConfig) -> Result<Arc<dyn GrantStore>, ServerError> {
    let store: Arc<dyn GrantStore> = match config.backend.as_str() {
        "memory" => Arc::new(MemoryGrantStore::new()),
        #[cfg(feature = "dynamodb")]
        "dynamodb" => {
            let dynamo_config = dynamo_config(config);
            let store = DynamoGrantStore::new(&dynamo_config).await;
            if config.create_table {
                folio_store_dynamodb::create_table(store.client(), store.table_name())
                    .await
                    .map_err(|e| ServerError::Config(format!("grant table creation: {e}")))?;
                info!(table = %dynamo_config.table_name, "grant table ready");
            }
            Arc::new(store)
        }
        other => {
            return Err(ServerError::Config(format!(
                "unknown grant backend: {other} (is the feature enabled?)"
            )));
        }
    };
    info!(backend = %config.backend, "grant store ready");
    Ok(store)
}

/// Create the `DynamoDB` grant table described by `config` if it is missing.
///
/// # Errors
///
/// Returns [`ServerError::Config`] if the backend is not `dynamodb` or the
/// table cannot be created.
#[cfg(feature = "dynamodb")]
pub async fn provision_grant_table(config: &GrantsConfig) -> Result<(), ServerError> {
    if config.backend != "dynamodb" {
        return Err(ServerError::Config(format!(
            "create-table needs [grants] backend = \"dynamodb\" (got {:?})",
            config.backend
        )));
    }
    let dynamo_config = dynamo_config(config);
    let client = folio_store_dynamodb::build_client(&dynamo_config).await;
    folio_store_dynamodb::create_table(&client, &dynamo_config.table_name)
        .await
        .map_err(|e| ServerError::Config(format!("grant table creation: {e}")))?;
    info!(table = %dynamo_config.table_name, "grant table ready");
    Ok(())
}

#[cfg(feature = "dynamodb")]
fn dynamo_config(config: &GrantsConfig) -> DynamoConfig {
    let defaults = DynamoConfig::default();
    DynamoConfig {
        table_name: config.table_name.clone(),
        region: config.region.clone().unwrap_or(defaults.region),
        endpoint_url: config.endpoint_url.clone(),
    }
}
