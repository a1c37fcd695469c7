//! Connect with credentials from `SF_*` environment variables and print a
//! query as a tab-separated table.
//!
//! ```text
//! export SF_LOGIN_ENDPOINT=https://login.salesforce.com/services/oauth2/token
//! export SF_API_ENDPOINT=/services/data/v62.0/
//! export SF_SERVICE_URL=https://myorg.my.salesforce.com
//! export SF_OAUTH_ENDPOINT=https://myorg.my.salesforce.com/services/oauth2/token
//! export SF_USERNAME=... SF_PASSWORD=... SF_SECURITY_TOKEN=...
//! export SF_CONSUMER_KEY=... SF_CONSUMER_SECRET=...
//!
//! RUST_LOG=sfsoql=debug cargo run --example query_table -- "SELECT Id, Name FROM Account"
//! ```

use sfsoql::{EnvSource, SoqlHandler};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let soql = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "SELECT Id, Name FROM Account".to_string());

    let handler = SoqlHandler::from_source(&EnvSource::default()).await?;
    let table = handler.query_table(&soql).await?;

    println!("{}", table.column_names().join("\t"));
    for row in table.rows() {
        println!("{}", row.join("\t"));
    }
    eprintln!("{} records", table.record_count());

    Ok(())
}
