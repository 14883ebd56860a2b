use std::collections::HashMap;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType,
};
use chrono::{DateTime, Utc};

use folio_core::AccessGrant;
use folio_store::error::StoreError;

/// Partition key attribute.
pub(crate) const ATTR_ID: &str = "id";
const ATTR_PREFIX: &str = "prefix";
const ATTR_CREATED_AT: &str = "created_at";
const ATTR_EXPIRES_AT: &str = "expires_at";
/// Epoch-seconds copy of `expires_at` for `DynamoDB`'s native TTL reaper.
const ATTR_TTL: &str = "ttl";

/// Render a grant as a `DynamoDB` item.
pub(crate) fn grant_to_item(grant: &AccessGrant) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (ATTR_ID.to_owned(), AttributeValue::S(grant.id.clone())),
        (
            ATTR_PREFIX.to_owned(),
            AttributeValue::S(grant.root_prefix.clone()),
        ),
        (
            ATTR_CREATED_AT.to_owned(),
            AttributeValue::S(grant.created_at.to_rfc3339()),
        ),
        (
            ATTR_EXPIRES_AT.to_owned(),
            AttributeValue::S(grant.expires_at.to_rfc3339()),
        ),
        (
            ATTR_TTL.to_owned(),
            AttributeValue::N(grant.expires_at.timestamp().to_string()),
        ),
    ])
}

/// Parse a `DynamoDB` item back into a grant.
pub(crate) fn item_to_grant(
    item: &HashMap<String, AttributeValue>,
) -> Result<AccessGrant, StoreError> {
    Ok(AccessGrant {
        id: string_attr(item, ATTR_ID)?.to_owned(),
        root_prefix: string_attr(item, ATTR_PREFIX)?.to_owned(),
        created_at: time_attr(item, ATTR_CREATED_AT)?,
        expires_at: time_attr(item, ATTR_EXPIRES_AT)?,
    })
}

fn string_attr<'a>(
    item: &'a HashMap<String, AttributeValue>,
    name: &str,
) -> Result<&'a str, StoreError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value),
        Some(_) => Err(StoreError::Serialization(format!(
            "attribute '{name}' is not a string"
        ))),
        None => Err(StoreError::Serialization(format!(
            "missing attribute '{name}'"
        ))),
    }
}

fn time_attr(
    item: &HashMap<String, AttributeValue>,
    name: &str,
) -> Result<DateTime<Utc>, StoreError> {
    let raw = string_attr(item, name)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Serialization(format!("attribute '{name}': {e}")))
}

/// Create the grant table programmatically.
///
/// The table uses `id` (String) as its only key and on-demand billing.
/// Intended for tests and local development; production tables are usually
/// provisioned by infrastructure tooling, with TTL enabled on `ttl`.
///
/// # Errors
///
/// Returns an error if the `CreateTable` call fails for reasons other than
/// the table already existing.
pub async fn create_table(client: &Client, table_name: &str) -> Result<(), StoreError> {
    let key_schema = KeySchemaElement::builder()
        .attribute_name(ATTR_ID)
        .key_type(KeyType::Hash)
        .build()
        .map_err(|e| StoreError::Configuration(e.to_string()))?;
    let id_definition = AttributeDefinition::builder()
        .attribute_name(ATTR_ID)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| StoreError::Configuration(e.to_string()))?;

    let result = client
        .create_table()
        .table_name(table_name)
        .key_schema(key_schema)
        .attribute_definitions(id_definition)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(err) => {
            // Tolerate "table already exists" errors so `create_table` is idempotent.
            let service_err = err.into_service_error();
            if service_err.is_resource_in_use_exception() {
                Ok(())
            } else {
                Err(StoreError::Backend(
                    DisplayErrorContext(&service_err).to_string(),
                ))
            }
        }
    }
}
