//! Column-oriented projection of query results.
//!
//! Column names come from the SOQL text itself: every whitespace-separated
//! token between `SELECT` and the first `FROM` after it, split on commas.
//! Each column then holds one string cell per record, in record order.
//!
//! ```rust
//! use serde_json::json;
//! use sfsoql_rest::Table;
//!
//! let merged = json!({
//!     "totalSize": 2,
//!     "done": true,
//!     "records": [
//!         {"Id": "001A", "Name": "Acme"},
//!         {"Id": "001B", "Name": null}
//!     ]
//! });
//!
//! let table = Table::project("SELECT Id, Name FROM Account", &merged).unwrap();
//! assert_eq!(table.column_names(), ["Id", "Name"]);
//! assert_eq!(
//!     table.to_nested(),
//!     vec![vec!["Id", "001A", "001B"], vec!["Name", "Acme", ""]]
//! );
//! ```

use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};
use crate::query;

/// Read the selected field names out of SOQL text.
///
/// Matching of `SELECT` and `FROM` is case-sensitive. Tokens are split on
/// commas, so `f1,f2` names two columns; empty pieces (a lone `,`) are
/// skipped.
pub fn extract_columns(soql: &str) -> Result<Vec<String>> {
    let tokens: Vec<&str> = soql.split_whitespace().collect();

    let start = tokens
        .iter()
        .position(|t| *t == "SELECT")
        .ok_or_else(|| malformed(soql, "no SELECT keyword"))?;

    let end = tokens[start + 1..]
        .iter()
        .position(|t| *t == "FROM")
        .map(|offset| start + 1 + offset)
        .ok_or_else(|| malformed(soql, "no FROM keyword after SELECT"))?;

    let columns: Vec<String> = tokens[start + 1..end]
        .iter()
        .flat_map(|t| t.split(','))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if columns.is_empty() {
        return Err(malformed(soql, "no columns between SELECT and FROM"));
    }
    Ok(columns)
}

fn malformed(soql: &str, reason: &str) -> Error {
    Error::new(ErrorKind::MalformedQuery(format!("{}: {}", reason, soql)))
}

/// The cell text for `field` on one record.
///
/// Missing fields, JSON null and the string `"null"` (any case) become an
/// empty string. Strings are used verbatim; other values use their compact
/// JSON text. A dotted name such as `Owner.Name` that is not a top-level key
/// is looked up through the nested relationship objects.
pub fn cell(record: &Value, field: &str) -> String {
    let value = match record.get(field) {
        Some(value) => Some(value),
        None if field.contains('.') => field
            .split('.')
            .try_fold(record, |node, part| node.get(part)),
        None => None,
    };

    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("null") => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// One projected column: a field name and a cell per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    cells: Vec<String>,
}

impl Column {
    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cells, one per record.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// The header followed by the cells.
    pub fn with_header(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.cells.iter().cloned())
            .collect()
    }
}

/// Query result flattened into columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    record_count: usize,
}

impl Table {
    /// Project a merged query document onto the columns named in `soql`.
    pub fn project(soql: &str, merged: &Value) -> Result<Self> {
        let names = extract_columns(soql)?;
        let records = query::records(merged)?;
        Ok(Self::from_records(names, records))
    }

    /// Build a table from explicit column names and records.
    pub fn from_records(names: Vec<String>, records: &[Value]) -> Self {
        let columns = names
            .into_iter()
            .map(|name| {
                let cells = records.iter().map(|record| cell(record, &name)).collect();
                Column { name, cells }
            })
            .collect();

        Self {
            columns,
            record_count: records.len(),
        }
    }

    /// Columns in SELECT order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in SELECT order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Look up a column by field name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of records projected.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// True when the query matched no records.
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// One inner list per column: the header then every cell.
    pub fn to_nested(&self) -> Vec<Vec<String>> {
        self.columns.iter().map(Column::with_header).collect()
    }

    /// Iterate record by record, cells in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.record_count).map(move |i| {
            self.columns
                .iter()
                .map(|column| column.cells[i].as_str())
                .collect()
        })
    }
}
