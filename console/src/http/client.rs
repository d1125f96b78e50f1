//! HTTP client implementation

use std::time::Duration;

use deployments_api::models::ProblemDetail;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::errors::ConsoleError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// HTTP client for backend communication
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConsoleError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request, expecting 200 with a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(failure("GET", response).await);
        }

        let body = response.text().await?;
        let value = serde_json::from_str(&body)?;
        Ok(value)
    }

    /// Make a form POST, expecting 204 No Content
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<(), ConsoleError> {
        let url = format!("{}{}", self.base_url, path);
        let body = encode_form(fields);
        debug!("POST {} {}", url, body);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(header::ACCEPT, "application/json")
            .body(body)
            .send()
            .await?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(failure("POST", response).await);
        }

        Ok(())
    }
}

/// Url-encode form fields in order
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter())
        .finish()
}

/// Log the failed response and turn it into a server error
async fn failure(method: &str, response: Response) -> ConsoleError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = describe_body(&body);
    error!("HTTP {} failed: {} - {}", method, status, detail);
    ConsoleError::ServerError {
        status: status.as_u16(),
        detail,
    }
}

/// Diagnostic detail of an error body, problem details preferred
pub fn describe_body(body: &str) -> String {
    match serde_json::from_str::<ProblemDetail>(body) {
        Ok(problem) if !problem.summary().is_empty() => problem.summary(),
        _ => body.trim().to_string(),
    }
}
