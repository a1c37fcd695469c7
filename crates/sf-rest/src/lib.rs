//! # sfsoql-rest
//!
//! Salesforce REST API client for SOQL queries and record updates.
//!
//! ## Features
//!
//! - **SOQL Query** - Follow `nextRecordsUrl` cursors and merge every page
//!   into one result document
//! - **Projection** - Flatten a merged result into columns named by the
//!   query's `SELECT` list
//! - **SObject updates** - PATCH and POST single fields as XML, or whole
//!   records as JSON
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfsoql_rest::SalesforceRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfsoql_rest::Error> {
//!     let client = SalesforceRestClient::new(
//!         "https://myorg.my.salesforce.com",
//!         "/services/data/v62.0/",
//!         "access_token_here",
//!     )?;
//!
//!     let table = client.query_table("SELECT Id, Name FROM Account").await?;
//!     for row in table.rows() {
//!         println!("{}", row.join("\t"));
//!     }
//!
//!     let created = client
//!         .create("Account", &serde_json::json!({"Name": "New Account"}))
//!         .await?;
//!
//!     client
//!         .patch_value("Account", &created.id, "Name", "Updated")
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod projection;
mod query;
mod sobject;

pub use client::SalesforceRestClient;
pub use error::{Error, ErrorKind, Result};
pub use projection::{cell, extract_columns, Column, Table};
pub use query::{PageMerger, QueryResult};
pub use sobject::{xml_record, CreateResult, SalesforceError};
