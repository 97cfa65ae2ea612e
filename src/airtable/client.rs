use async_trait::async_trait;
use reqwest::{header, Client, Response};

use crate::airtable::record::{CreateRecord, RecordFields};
use crate::airtable::schema::{BaseSchema, FieldDescriptor};
use crate::config::AirtableConfig;
use crate::error::{Error, Result};

/// The three calls the uploader makes against a base.
#[async_trait]
pub trait AirtableApi: Send + Sync {
    async fn get_base_schema(&self) -> Result<BaseSchema>;
    async fn create_field(&self, field: &FieldDescriptor) -> Result<()>;
    async fn create_record(&self, fields: &RecordFields) -> Result<()>;
    fn table_id(&self) -> &str;
}

pub struct AirtableClient {
    client: Client,
    base_url: String,
    base_id: String,
    table_id: String,
}

impl AirtableClient {
    pub fn new(config: &AirtableConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("commentflow/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            base_id: config.base_id.clone(),
            table_id: config.table_id.clone(),
        })
    }

    fn schema_url(&self) -> String {
        format!("{}/meta/bases/{}/tables", self.base_url, self.base_id)
    }

    fn fields_url(&self) -> String {
        format!(
            "{}/meta/bases/{}/tables/{}/fields",
            self.base_url, self.base_id, self.table_id
        )
    }

    fn records_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.base_id, self.table_id)
    }
}

async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Airtable(format!("{}: {} - {}", what, status, body)))
}

#[async_trait]
impl AirtableApi for AirtableClient {
    async fn get_base_schema(&self) -> Result<BaseSchema> {
        let url = self.schema_url();
        tracing::info!("Fetching schema from: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("Schema response status: {}", response.status());
        let response = ensure_success(response, "Failed to get schema").await?;

        Ok(response.json().await?)
    }

    async fn create_field(&self, field: &FieldDescriptor) -> Result<()> {
        let config = field.to_config();
        tracing::info!("Creating field: {} ({})", config.name, config.field_type);
        tracing::debug!("Field config: {}", serde_json::to_string(&config)?);

        let response = self.client.post(self.fields_url()).json(&config).send().await?;
        ensure_success(response, &format!("Failed to create field {}", field.name)).await?;

        Ok(())
    }

    async fn create_record(&self, fields: &RecordFields) -> Result<()> {
        let response = self
            .client
            .post(self.records_url())
            .json(&CreateRecord { fields })
            .send()
            .await?;
        ensure_success(response, "Failed to create record").await?;

        Ok(())
    }

    fn table_id(&self) -> &str {
        &self.table_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AirtableConfig {
        AirtableConfig {
            api_key: "patTest".to_string(),
            base_id: "appBase".to_string(),
            table_id: "tblTable".to_string(),
            api_url: "https://api.airtable.com/v0/".to_string(),
        }
    }

    #[test]
    fn test_urls() {
        let client = AirtableClient::new(&config()).unwrap();
        assert_eq!(
            client.schema_url(),
            "https://api.airtable.com/v0/meta/bases/appBase/tables"
        );
        assert_eq!(
            client.fields_url(),
            "https://api.airtable.com/v0/meta/bases/appBase/tables/tblTable/fields"
        );
        assert_eq!(
            client.records_url(),
            "https://api.airtable.com/v0/appBase/tblTable"
        );
        assert_eq!(client.table_id(), "tblTable");
    }

    #[test]
    fn test_bad_token_is_rejected() {
        let mut bad = config();
        bad.api_key = "line\nbreak".to_string();
        assert!(matches!(
            AirtableClient::new(&bad),
            Err(Error::InvalidHeader(_))
        ));
    }
}
