//! AWS plumbing for Folio.
//!
//! - [`AwsBaseConfig`](config::AwsBaseConfig) holds region, endpoint override,
//!   and optional STS assume-role settings shared by every AWS client.
//! - **S3** (`s3` feature) provides [`S3ObjectStore`], the production
//!   [`ObjectStore`](folio_store::ObjectStore) used for listing and signing.

pub mod auth;
pub mod config;
pub mod error;

#[cfg(feature = "s3")]
pub mod s3;

pub use config::AwsBaseConfig;
pub use error::AwsStoreError;

#[cfg(feature = "s3")]
pub use s3::{S3Config, S3ObjectStore};
