use serde::Serialize;
use tracing::instrument;

use sfsoql_client::security::url as url_security;

use crate::error::Result;
use crate::sobject::{check_sobject_name, xml_record, CreateResult};

impl super::SalesforceRestClient {
    fn sobject_url(&self, record_type: &str) -> Result<String> {
        check_sobject_name(record_type)?;
        Ok(self.client.api_url(&format!("sobjects/{}", record_type)))
    }

    fn record_url(&self, record_type: &str, record_id: &str) -> Result<String> {
        let base = self.sobject_url(record_type)?;
        Ok(format!("{}/{}", base, url_security::encode_param(record_id)))
    }

    /// Set one field on a record, sending the value as XML.
    ///
    /// Returns the response body, which Salesforce normally leaves empty.
    #[instrument(skip(self, value))]
    pub async fn patch_value(
        &self,
        record_type: &str,
        record_id: &str,
        field: &str,
        value: &str,
    ) -> Result<String> {
        let url = self.record_url(record_type, record_id)?;
        let body = xml_record(field, value)?;
        Ok(self.client.patch_xml(&url, body).await?)
    }

    /// Update a record from a JSON object of field values.
    #[instrument(skip(self, fields))]
    pub async fn patch_fields<T: Serialize>(
        &self,
        record_type: &str,
        record_id: &str,
        fields: &T,
    ) -> Result<()> {
        let url = self.record_url(record_type, record_id)?;
        self.client.patch_json(&url, fields).await?;
        Ok(())
    }

    /// Create a record with one field set, sending the value as XML.
    ///
    /// Returns the raw XML response body.
    #[instrument(skip(self, value))]
    pub async fn post_value(&self, record_type: &str, field: &str, value: &str) -> Result<String> {
        let url = self.sobject_url(record_type)?;
        let body = xml_record(field, value)?;
        Ok(self.client.post_xml(&url, body).await?)
    }

    /// Create a record from a JSON object of field values.
    #[instrument(skip(self, record))]
    pub async fn create<T: Serialize>(&self, record_type: &str, record: &T) -> Result<CreateResult> {
        let url = self.sobject_url(record_type)?;
        Ok(self.client.post_json(&url, record).await?)
    }
}
