//! Outer request envelope of the cloud RPC protocol.

use serde::Serialize;
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Cloud RPC methods used by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CloudMethod {
    Login,
    GetDeviceList,
    Passthrough,
}

/// `{ "method": ..., "params": ... }`, with `params` omitted when absent.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
pub(crate) struct Envelope<P> {
    method: CloudMethod,
    params: Option<P>,
}

impl<P: Serialize> Envelope<P> {
    pub(crate) fn new(method: CloudMethod, params: Option<P>) -> Self {
        Envelope { method, params }
    }

    pub(crate) fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::JsonDump)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginParams<'a> {
    pub app_type: &'a str,
    pub cloud_user_name: &'a str,
    pub cloud_password: &'a str,
    #[serde(rename = "terminalUUID")]
    pub terminal_uuid: Uuid,
}

/// `requestData` carries the inner device command already encoded as a JSON
/// string; the cloud rejects a nested object here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PassthroughParams<'a> {
    pub device_id: &'a str,
    pub request_data: String,
}

/// Application-level error code of a cloud response, when non-zero.
pub(crate) fn cloud_error(body: &Value) -> Option<Error> {
    let code = body.get("error_code").and_then(Value::as_i64)?;
    if code == 0 {
        return None;
    }
    let message = body
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or("no message")
        .to_string();
    Some(Error::Cloud { code, message })
}

/// The `result` member of a cloud response.
///
/// A non-zero `error_code` is reported as [`Error::Cloud`]; otherwise a
/// missing `result` is [`Error::MissingField`].
pub(crate) fn cloud_result<'a>(body: &'a Value, context: &str) -> Result<&'a Value> {
    if let Some(err) = cloud_error(body) {
        return Err(err);
    }
    body.get("result")
        .ok_or_else(|| Error::missing_field(context, "result"))
}
