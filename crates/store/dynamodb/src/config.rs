/// Configuration for the `DynamoDB` grant store.
#[derive(Debug, Clone)]
pub struct DynamoConfig {
    /// `DynamoDB` table name.
    pub table_name: String,

    /// AWS region (e.g. `"us-east-1"`).
    pub region: String,

    /// Optional endpoint URL for local development (e.g. `DynamoDB` Local).
    pub endpoint_url: Option<String>,
}

impl Default for DynamoConfig {
    fn default() -> Self {
        Self {
            table_name: String::from("folio_grants"),
            region: String::from("us-east-1"),
            endpoint_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = DynamoConfig::default();
        assert_eq!(cfg.table_name, "folio_grants");
        assert_eq!(cfg.region, "us-east-1");
        assert!(cfg.endpoint_url.is_none());
    }

    #[test]
    fn custom_values() {
        let cfg = DynamoConfig {
            table_name: "grants".into(),
            region: "eu-west-1".into(),
            endpoint_url: Some("http://localhost:8000".into()),
        };
        assert_eq!(cfg.table_name, "grants");
        assert_eq!(cfg.region, "eu-west-1");
        assert_eq!(cfg.endpoint_url.as_deref(), Some("http://localhost:8000"));
    }
}
