//! `waste2meals-http` is an async HTTP client for the Waste2Meals batch API.
//!
//! Every request runs through a [`ResilientExecutor`], which applies a
//! composed retry + per-attempt timeout policy and decodes JSON responses:
//! - [`Waste2MealsClient::batch_definitions`]
//! - [`Waste2MealsClient::batch_inventories`]
//!
//! List endpoints take a typed filter that is encoded into a query string by
//! [`encode`].

mod classify;
mod client;
mod decode;
mod error;
mod executor;
mod filter;
mod options;
pub mod policy;
mod query;
mod types;

pub use classify::{classify_status, FailureKind};
pub use client::{BatchDefinitions, BatchInventories, Waste2MealsClient};
pub use decode::DecodeOptions;
pub use error::ClientError;
pub use executor::ResilientExecutor;
pub use filter::{BatchDefinitionFilter, BatchInventoryFilter};
pub use options::ClientOptions;
pub use policy::{build as build_policy, PassThroughPolicy, ResiliencePolicy, RetryTimeoutPolicy};
pub use query::{encode, QueryFilter, QueryString};
pub use types::{
    BatchDefinition, BatchInventory, CreateBatchDefinitionRequest, CreateBatchInventoryRequest,
    UpdateBatchDefinitionRequest, UpdateBatchInventoryRequest,
};

pub type Result<T> = std::result::Result<T, ClientError>;
