use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use tracing::{debug, instrument};

use folio_core::AccessGrant;
use folio_store::error::StoreError;
use folio_store::grant::GrantStore;

use crate::config::DynamoConfig;
use crate::table::{ATTR_ID, grant_to_item, item_to_grant};

/// DynamoDB-backed implementation of [`GrantStore`].
///
/// Each grant is one item keyed by `id`. Expiration is stored both as an
/// RFC 3339 string and as an epoch-seconds `ttl` attribute so the table's
/// native TTL can reap stale grants in the background.
pub struct DynamoGrantStore {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoGrantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoGrantStore")
            .field("table_name", &self.table_name)
            .field("client", &"<DynamoDbClient>")
            .finish()
    }
}

impl DynamoGrantStore {
    /// Create a new `DynamoGrantStore` from the provided configuration.
    ///
    /// Loads AWS credentials and configuration from the environment and
    /// optionally overrides the endpoint URL for local development.
    pub async fn new(config: &DynamoConfig) -> Self {
        let client = build_client(config).await;
        Self::from_client(client, config)
    }

    /// Create a new `DynamoGrantStore` from an existing `DynamoDB` client.
    pub fn from_client(client: Client, config: &DynamoConfig) -> Self {
        Self {
            client,
            table_name: config.table_name.clone(),
        }
    }

    /// The underlying client (e.g. for [`create_table`](crate::create_table)).
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The table this store reads and writes.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn backend_error<E: std::error::Error>(operation: &str, err: &E) -> StoreError {
    StoreError::Backend(format!("{operation}: {}", DisplayErrorContext(err)))
}

#[async_trait]
impl GrantStore for DynamoGrantStore {
    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn load(&self, id: &str) -> Result<Option<AccessGrant>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, AttributeValue::S(id.to_owned()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| backend_error("GetItem", &e))?;

        let Some(item) = result.item() else {
            debug!("grant not found");
            return Ok(None);
        };

        item_to_grant(item).map(Some)
    }

    #[instrument(skip(self, grant), fields(table = %self.table_name, grant_id = %grant.id))]
    async fn save(&self, grant: &AccessGrant) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(grant_to_item(grant)))
            .send()
            .await
            .map_err(|e| backend_error("PutItem", &e))?;
        debug!("grant saved");
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, AttributeValue::S(id.to_owned()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| backend_error("DeleteItem", &e))?;

        let existed = result.attributes().is_some_and(|attrs| !attrs.is_empty());
        debug!(existed, "grant deleted");
        Ok(existed)
    }
}

/// Build a `DynamoDB` client from the given configuration.
pub async fn build_client(config: &DynamoConfig) -> Client {
    let mut aws_config =
        aws_config::from_env().region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        aws_config = aws_config.endpoint_url(endpoint);
    }

    let sdk_config = aws_config.load().await;
    Client::new(&sdk_config)
}
