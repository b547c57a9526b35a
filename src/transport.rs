//! HTTP transport abstraction.
//!
//! Every cloud call is a single JSON POST. The [`Transport`] trait captures
//! exactly that, so the rest of the crate never touches the HTTP client
//! directly. [`HttpTransport`] is the `reqwest`-backed implementation used by
//! default; tests substitute their own.

use std::borrow::Cow;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use log::trace;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::envelope::CloudMethod;
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Status and body of a finished HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpReply {
            status,
            body: body.into(),
        }
    }

    /// A `200 OK` reply carrying the given JSON value.
    pub fn ok_json(value: &Value) -> Self {
        HttpReply::new(200, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with [`Error::Status`] unless the status is 2xx.
    pub fn error_for_status(self, method: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::status(method, self.status))
        }
    }

    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(Error::JsonLoad)
    }
}

/// Trait for posting JSON bodies to the cloud.
///
/// `method` is the cloud method name and is only used to label errors.
/// Implementations must not interpret the HTTP status; callers decide what
/// a non-success status means.
pub trait Transport: Send + Sync {
    fn post<'a>(
        &'a self,
        method: &'a str,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpReply>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post<'a>(
        &'a self,
        method: &'a str,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpReply>> {
        (**self).post(method, url, body)
    }
}

/// `reqwest`-based transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client honouring the timeout and user agent in `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;
        Ok(HttpTransport { client })
    }

    /// Wrap an existing `reqwest` client.
    pub fn with_client(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        HttpTransport::with_client(reqwest::Client::new())
    }
}

impl Transport for HttpTransport {
    fn post<'a>(
        &'a self,
        method: &'a str,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpReply>> {
        async move {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .map_err(|e| Error::request(method, e))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| Error::request(method, e))?;
            trace!("{} reply ({}): {}", method, status, loggable_body(method, &body));
            Ok(HttpReply { status, body })
        }
        .boxed()
    }
}

/// Login replies carry the session token and are never logged verbatim.
fn loggable_body<'a>(method: &str, body: &'a str) -> Cow<'a, str> {
    if method == CloudMethod::Login.as_ref() {
        Cow::Owned(format!("<{} bytes redacted>", body.len()))
    } else {
        Cow::Borrowed(body)
    }
}
