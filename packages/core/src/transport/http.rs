//! HTTP transport backed by `reqwest`.

use crate::config::ClientConfig;
use crate::transport::{BodyEncoding, Method, Request, Transport, TransportError};
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Talks to a notes server over HTTP.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpTransport {
    /// Create a transport from validated client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing HTTP transport: url={}, timeout={}s",
            config.base_url, config.timeout_seconds
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, request: &Request) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
        };

        if let Some(ref token) = self.auth_token {
            builder = builder.bearer_auth(token);
        }

        match (&request.body, request.encoding) {
            (None, _) => builder,
            (Some(body), BodyEncoding::Json) => builder.json(body),
            (Some(body), BodyEncoding::Form) => {
                let form = form_fields(body)
                    .into_iter()
                    .fold(Form::new(), |form, (name, value)| form.text(name, value));
                builder.multipart(form)
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Value, TransportError> {
        debug!("-> {}", request);

        let response = self.build_request(&request).send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!("<- {} {}", status.as_u16(), request);

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Flatten a JSON body into multipart form fields.
///
/// Nested objects become dotted names (`textContent.title`), arrays repeat
/// their field name, and `null` values are left out.
pub fn form_fields(body: &Value) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    collect_form_fields(None, body, &mut fields);
    fields
}

fn collect_form_fields(prefix: Option<&str>, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, nested) in map {
                let name = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, key),
                    None => key.clone(),
                };
                collect_form_fields(Some(&name), nested, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_form_fields(prefix, item, out);
            }
        }
        Value::String(text) => {
            if let Some(name) = prefix {
                out.push((name.to_string(), text.clone()));
            }
        }
        Value::Bool(_) | Value::Number(_) => {
            if let Some(name) = prefix {
                out.push((name.to_string(), value.to_string()));
            }
        }
    }
}
