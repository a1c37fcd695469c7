use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::projection::{extract_columns, Table};
use crate::query::{self, PageMerger, QueryResult};

impl super::SalesforceRestClient {
    /// Execute a SOQL query and merge every page into one document.
    ///
    /// The query text is placed into the URL as given. Pages are fetched one
    /// after another by following `nextRecordsUrl`; a failure on any page
    /// fails the whole query. The result has `done = true` and no
    /// `nextRecordsUrl`.
    ///
    /// # Security
    ///
    /// **IMPORTANT**: If you are including user-provided values in the WHERE clause,
    /// you MUST escape them to prevent SOQL injection attacks:
    ///
    /// ```rust,ignore
    /// use sfsoql_client::security::soql;
    ///
    /// let safe_value = soql::escape_string(user_input);
    /// let query = format!("SELECT Id FROM Account WHERE Name = '{}'", safe_value);
    /// ```
    #[instrument(skip(self, soql))]
    pub async fn query_merged(&self, soql: &str) -> Result<Value> {
        let mut merger = PageMerger::new();
        let mut url = self.client.api_url(&format!("query?q={}", soql));

        loop {
            let page: Value = self.client.get_json(&url).await?;
            let page_records = page
                .get("records")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);

            let next = merger.push(page)?;
            debug!(
                page = merger.pages(),
                records = page_records,
                total = merger.record_count(),
                more = next.is_some(),
                "Fetched query page"
            );

            match next {
                Some(next_url) => url = self.client.url(&next_url),
                None => break,
            }
        }

        merger.finish()
    }

    /// Execute a SOQL query and return the merged result as typed records.
    #[instrument(skip(self, soql))]
    pub async fn query_result<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        let merged = self.query_merged(soql).await?;
        Ok(serde_json::from_value(merged)?)
    }

    /// Execute a SOQL query and project it onto the columns it selects.
    ///
    /// The column list is read before any request is sent, so malformed
    /// query text fails without a network call.
    #[instrument(skip(self, soql))]
    pub async fn query_table(&self, soql: &str) -> Result<Table> {
        let columns = extract_columns(soql)?;
        let merged = self.query_merged(soql).await?;
        Ok(Table::from_records(columns, query::records(&merged)?))
    }
}
