//! Authenticated session against the Kasa cloud.

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::envelope::{CloudMethod, Envelope, LoginParams, cloud_error};
use crate::errors::Error;
use crate::transport::{HttpTransport, Transport};

type Result<T> = std::result::Result<T, Error>;

/// A cloud session holding the authentication token.
///
/// A session is created once, either from a token you already have or from
/// account credentials, and never changes afterwards. Every operation is a
/// method on `Session`; cloning is cheap and clones share the transport.
///
/// # Example
///
/// ```
/// use kasa_cloud_rs::Session;
///
/// let session = Session::from_token("0c7b4a19-ABCDEFG");
/// assert_eq!(
///     session.request_url(),
///     "https://wap.tplinkcloud.com/?token=0c7b4a19-ABCDEFG"
/// );
/// ```
#[derive(Clone)]
pub struct Session {
    token: String,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.config.endpoint)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Use a token obtained elsewhere. No validation is performed.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::from_token_with(token, ClientConfig::default(), HttpTransport::default())
    }

    /// Use a token with an [`HttpTransport`] built from `config`, so its
    /// timeout and user agent apply to every request.
    pub fn from_token_with_config(token: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::from_token_with(token, config, transport))
    }

    /// Use a token with an explicit configuration and transport.
    ///
    /// Only the endpoint of `config` is read here. The timeout and user agent
    /// are transport settings and take effect only if `transport` was built
    /// from the same configuration, e.g. with [`HttpTransport::new`].
    pub fn from_token_with(
        token: impl Into<String>,
        config: ClientConfig,
        transport: impl Transport + 'static,
    ) -> Self {
        Session {
            token: token.into(),
            config,
            transport: Arc::new(transport),
        }
    }

    /// Log in with account credentials and keep the returned token.
    pub async fn from_credentials(username: &str, password: &str) -> Result<Self> {
        Self::from_credentials_with(
            username,
            password,
            ClientConfig::default(),
            HttpTransport::default(),
        )
        .await
    }

    /// Log in with an [`HttpTransport`] built from `config`.
    pub async fn from_credentials_with_config(
        username: &str,
        password: &str,
        config: ClientConfig,
    ) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::from_credentials_with(username, password, config, transport).await
    }

    /// Log in through an explicit configuration and transport.
    ///
    /// As with [`from_token_with`](Self::from_token_with), the timeout and
    /// user agent of `config` only apply if `transport` was built from it.
    ///
    /// Each call generates a fresh terminal UUID. A non-success HTTP status
    /// fails with [`Error::Status`] before the body is looked at; a body
    /// without a token fails with [`Error::Authentication`].
    pub async fn from_credentials_with(
        username: &str,
        password: &str,
        config: ClientConfig,
        transport: impl Transport + 'static,
    ) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(transport);
        let params = LoginParams {
            app_type: &config.app_type,
            cloud_user_name: username,
            cloud_password: password,
            terminal_uuid: Uuid::new_v4(),
        };

        debug!("logging in to {}", config.endpoint);
        let body = post(
            transport.as_ref(),
            &config.endpoint,
            CloudMethod::Login,
            Some(params),
        )
        .await?;
        let token = extract_token(&body)?;

        Ok(Session {
            token,
            config,
            transport,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Endpoint with the token attached as a query parameter.
    pub fn request_url(&self) -> String {
        format!("{}?token={}", self.config.endpoint, self.token)
    }

    /// Call an authenticated cloud method and return the parsed body.
    pub(crate) async fn call<P: Serialize>(
        &self,
        method: CloudMethod,
        params: Option<P>,
    ) -> Result<Value> {
        post(
            self.transport.as_ref(),
            &self.request_url(),
            method,
            params,
        )
        .await
    }
}

async fn post<P: Serialize>(
    transport: &dyn Transport,
    url: &str,
    method: CloudMethod,
    params: Option<P>,
) -> Result<Value> {
    let body = Envelope::new(method, params).to_json()?;
    let reply = transport
        .post(method.as_ref(), url, body)
        .await?
        .error_for_status(method.as_ref())?;
    debug!("{} answered with status {}", method, reply.status);
    reply.json()
}

fn extract_token(body: &Value) -> Result<String> {
    if let Some(err) = cloud_error(body) {
        return Err(Error::Authentication(err.to_string()));
    }
    body.get("result")
        .and_then(|result| result.get("token"))
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| Error::Authentication("login response did not contain a token".into()))
}
