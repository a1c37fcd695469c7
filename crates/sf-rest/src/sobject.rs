//! SObject record bodies and results.

use serde::{Deserialize, Serialize};
use sfsoql_client::security::{soql, xml};

use crate::error::{Error, ErrorKind, Result};

/// Result of a create operation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateResult {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<SalesforceError>,
}

/// Salesforce error in operation results.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SalesforceError {
    #[serde(rename = "statusCode")]
    pub status_code: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Build the XML body `<root><field>value</field></root>`.
///
/// The value is XML-escaped. The field name becomes an element name, so it
/// must be a valid SObject field name.
pub fn xml_record(field: &str, value: &str) -> Result<String> {
    if !soql::is_safe_field_name(field) {
        return Err(Error::new(ErrorKind::InvalidInput(format!(
            "'{}' is not a valid field name",
            field
        ))));
    }
    Ok(format!(
        "<root><{field}>{value}</{field}></root>",
        field = field,
        value = xml::escape(value)
    ))
}

pub(crate) fn check_sobject_name(record_type: &str) -> Result<()> {
    if soql::is_safe_sobject_name(record_type) {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::InvalidInput(format!(
            "'{}' is not a valid SObject name",
            record_type
        ))))
    }
}
