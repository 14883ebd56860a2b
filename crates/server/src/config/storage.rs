use serde::Deserialize;

/// Object storage backend holding the listed files.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Which backend to use: `"memory"` or `"s3"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Bucket every grant prefix lives in. Required for `s3`.
    pub bucket: Option<String>,
    /// AWS region.
    pub region: Option<String>,
    /// Endpoint override for S3-compatible servers.
    pub endpoint_url: Option<String>,
    /// IAM role to assume for bucket access.
    pub role_arn: Option<String>,
    /// STS session name when assuming `role_arn`.
    pub session_name: Option<String>,
    /// External ID for the role's trust policy.
    pub external_id: Option<String>,
    /// Use path-style addressing.
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            bucket: None,
            region: None,
            endpoint_url: None,
            role_arn: None,
            session_name: None,
            external_id: None,
            force_path_style: false,
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}
