pub mod api;
pub mod config;
pub mod error;
pub mod grant_store_factory;
pub mod object_store_factory;
pub mod telemetry;
