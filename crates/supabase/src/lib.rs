//! Hosted backend: Supabase's REST (PostgREST) and auth (GoTrue) endpoints.
//!
//! Every request carries the project's anon key as `apikey`. Admin reads and
//! writes are authorized with the admin's access token; public requests use
//! the anon key as bearer.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use url::Url;

pub use error::ClientError;

mod auth;
mod error;
mod rest;

pub const DEFAULT_TABLE: &str = "inscricoes";

/// Body fields that carry a readable message, first one present wins.
const MESSAGE_FIELDS: [&str; 4] = ["msg", "message", "error_description", "error"];

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    base_url: Url,
    anon_key: String,
    table: String,
    http: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(url).map_err(|source| ClientError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            anon_key: anon_key.into(),
            table: DEFAULT_TABLE.to_string(),
            http: reqwest::Client::new(),
        })
    }

    /// Use another table for registrations.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::Endpoint {
                path: path.to_string(),
                source,
            })
    }

    /// Request with the anon key as both `apikey` and bearer.
    fn public(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// Request on behalf of a signed-in admin.
    fn authorized(&self, builder: RequestBuilder, access_token: &str) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }
}

/// Reads the message out of an error response, falling back to the status.
async fn error_message(res: Response) -> (StatusCode, String) {
    let status = res.status();
    let body = res.json::<Value>().await.ok();
    let message = body
        .as_ref()
        .and_then(|body| {
            MESSAGE_FIELDS
                .iter()
                .find_map(|field| body.get(field).and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());
    (status, message)
}
