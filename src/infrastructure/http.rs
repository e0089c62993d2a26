use crate::domain::ledger::{LedgerAccount, LedgerEntry};
use crate::domain::ports::{ImagePublisher, LedgerClient, MarkSource};
use crate::domain::transaction::ImageLocator;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_UPLOAD_URL: &str = "https://api.pixhost.to/images";
pub const DEFAULT_LEDGER_URL: &str = "https://gateway.okeconnect.com/api/mutasi/qris";

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| PaymentError::Config(format!("HTTP client: {e}")))
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("timed out: {error}")
    } else {
        error.to_string()
    }
}

/// Downloads the brand mark over HTTP(S).
#[derive(Clone)]
pub struct HttpMarkSource {
    client: Client,
}

impl HttpMarkSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(build_client(timeout)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MarkSource for HttpMarkSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| PaymentError::MarkFetch(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaymentError::MarkFetch(format!(
                "{locator} answered {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PaymentError::MarkFetch(describe(&e)))?;
        Ok(bytes.to_vec())
    }
}

/// Uploads rendered images to a multipart image host.
///
/// The host is expected to answer with a JSON object whose `url_field` holds
/// the public address of the stored image.
#[derive(Clone)]
pub struct HttpImagePublisher {
    client: Client,
    endpoint: String,
    file_field: String,
    url_field: String,
    form_fields: Vec<(String, String)>,
}

impl HttpImagePublisher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(endpoint, build_client(timeout)?))
    }

    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            file_field: "img".to_string(),
            url_field: "show_url".to_string(),
            form_fields: vec![("content_type".to_string(), "0".to_string())],
        }
    }

    pub fn file_field(mut self, name: impl Into<String>) -> Self {
        self.file_field = name.into();
        self
    }

    pub fn url_field(mut self, name: impl Into<String>) -> Self {
        self.url_field = name.into();
        self
    }

    pub fn form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form_fields.push((name.into(), value.into()));
        self
    }
}

#[async_trait]
impl ImagePublisher for HttpImagePublisher {
    async fn publish(&self, png: Vec<u8>, file_name: &str) -> Result<ImageLocator> {
        let part = Part::bytes(png)
            .file_name(file_name.to_string())
            .mime_str("image/png")
            .map_err(|e| PaymentError::Publish(describe(&e)))?;
        let mut form = Form::new().part(self.file_field.clone(), part);
        for (name, value) in &self.form_fields {
            form = form.text(name.clone(), value.clone());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PaymentError::Publish(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaymentError::Publish(format!(
                "{} answered {status}",
                self.endpoint
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PaymentError::Publish(format!("unreadable response: {e}")))?;
        let url = body
            .get(&self.url_field)
            .and_then(serde_json::Value::as_str)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                PaymentError::Publish(format!("response has no '{}' field", self.url_field))
            })?;

        Ok(ImageLocator {
            url: url.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct MutationResponse {
    #[serde(default)]
    data: Option<Vec<LedgerEntry>>,
}

/// Reads the QRIS mutation log from the payment gateway.
#[derive(Clone)]
pub struct HttpLedgerClient {
    client: Client,
    base_url: String,
}

impl HttpLedgerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(base_url, build_client(timeout)?))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn mutations_url(&self, account: &LedgerAccount) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PaymentError::Config(format!("ledger URL '{}': {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| {
                PaymentError::Config(format!("ledger URL '{}' cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .push(&account.merchant)
            .push(&account.key);
        Ok(url)
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn mutations(&self, account: &LedgerAccount) -> Result<Vec<LedgerEntry>> {
        let url = self.mutations_url(account)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PaymentError::LedgerUnavailable(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaymentError::LedgerUnavailable(format!(
                "gateway answered {status}"
            )));
        }

        let body: MutationResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::LedgerUnavailable(format!("unreadable response: {e}")))?;
        Ok(body.data.unwrap_or_default())
    }
}
