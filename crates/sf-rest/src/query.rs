//! SOQL query result types and page merging.
//!
//! A query answer arrives as a chain of pages linked by `nextRecordsUrl`.
//! [`PageMerger`] folds the parsed pages into one document: the first page
//! supplies `totalSize` and any other top-level members, every page
//! contributes its `records` in arrival order, and the finished document has
//! `done = true` and no `nextRecordsUrl`.

use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};

// Re-export QueryResult from sfsoql_client to ensure type compatibility
pub use sfsoql_client::QueryResult;

const RECORDS: &str = "records";
const NEXT_RECORDS_URL: &str = "nextRecordsUrl";
const DONE: &str = "done";

/// Accumulates query pages into a single merged document.
#[derive(Debug, Default)]
pub struct PageMerger {
    merged: Option<Value>,
    pages: usize,
}

impl PageMerger {
    /// Create an empty merger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages pushed so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Number of records accumulated so far.
    pub fn record_count(&self) -> usize {
        self.merged
            .as_ref()
            .and_then(|doc| doc.get(RECORDS))
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Add the next page.
    ///
    /// Returns the page's `nextRecordsUrl` when there is another page to
    /// fetch. A page that is not an object with a `records` array is a
    /// parse error.
    pub fn push(&mut self, mut page: Value) -> Result<Option<String>> {
        let page_number = self.pages + 1;
        let object = page.as_object_mut().ok_or_else(|| {
            Error::new(ErrorKind::Json(format!(
                "query page {} is not a JSON object",
                page_number
            )))
        })?;

        let next = match object.remove(NEXT_RECORDS_URL) {
            Some(Value::String(url)) => Some(url),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(Error::new(ErrorKind::Json(format!(
                    "query page {} has a non-string nextRecordsUrl: {}",
                    page_number, other
                ))))
            }
        };

        let records = match object.remove(RECORDS) {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(Error::new(ErrorKind::Json(format!(
                    "query page {} has no records array",
                    page_number
                ))))
            }
        };

        match self.merged.as_mut() {
            None => {
                object.insert(RECORDS.to_string(), Value::Array(records));
                self.merged = Some(page);
            }
            Some(merged) => {
                if let Some(Value::Array(all)) = merged.get_mut(RECORDS) {
                    all.extend(records);
                }
            }
        }

        self.pages = page_number;
        Ok(next)
    }

    /// Finish merging.
    ///
    /// Fails when no page was pushed.
    pub fn finish(self) -> Result<Value> {
        let mut merged = self.merged.ok_or_else(|| {
            Error::new(ErrorKind::Json("query returned no pages".to_string()))
        })?;

        if let Some(object) = merged.as_object_mut() {
            object.insert(DONE.to_string(), Value::Bool(true));
            object.remove(NEXT_RECORDS_URL);
        }
        Ok(merged)
    }
}

/// The `records` array of a merged document.
pub(crate) fn records(document: &Value) -> Result<&[Value]> {
    document
        .get(RECORDS)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::new(ErrorKind::Json("result has no records array".to_string())))
}
