//! # sfsoql-client
//!
//! Core HTTP transport for the sfsoql Salesforce handler.
//!
//! This crate provides:
//! - A reqwest-backed client with timeouts, compression and a TLS floor
//! - Request building with bearer auth, JSON, XML and form bodies
//! - Salesforce error-response mapping with sanitized messages
//! - `SalesforceClient`, which binds a service URL, API endpoint and
//!   bearer token into authenticated request builders
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │           (sf-rest query pipeline, SoqlHandler)             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SalesforceClient                          │
//! │  - Holds service URL, API endpoint, bearer token            │
//! │  - Joins URLs the way the Salesforce REST API expects       │
//! │  - Provides typed JSON methods (get_json, post_json, ...)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Raw HTTP with compression and timeouts                   │
//! │  - Response error mapping                                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfsoql_client::SalesforceClient;
//!
//! let client = SalesforceClient::new(
//!     "https://myorg.my.salesforce.com/",
//!     "/services/data/v62.0/",
//!     access_token,
//! )?;
//!
//! let page: serde_json::Value = client
//!     .get_json(&client.api_url("query?q=SELECT+Id+FROM+Account"))
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod salesforce_client;
pub mod security;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, CompressionConfig, TlsVersion};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{sanitize_error_message, Response, ResponseExt};
pub use salesforce_client::{QueryResult, SalesforceClient};

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("sfsoql/", env!("CARGO_PKG_VERSION"));
