//! Passthrough response types.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::envelope::cloud_result;
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// The top-level cloud response to a `passthrough` call.
///
/// The device's own answer is nested inside as a JSON *string*
/// (`result.responseData`); [`response_data`](Self::response_data) decodes it.
///
/// # Examples
///
/// ```
/// use kasa_cloud_rs::PassthroughResponse;
/// use serde_json::json;
///
/// let resp = PassthroughResponse::new("8012ABCD", json!({
///     "error_code": 0,
///     "result": {"responseData": "{\"system\":{\"set_relay_state\":{\"err_code\":0}}}"},
/// }));
/// assert_eq!(resp.response_data().unwrap()["system"]["set_relay_state"]["err_code"], 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PassthroughResponse {
    device_id: String,
    raw: Value,
}

impl PassthroughResponse {
    pub fn new(device_id: &str, raw: Value) -> Self {
        PassthroughResponse {
            device_id: device_id.to_string(),
            raw,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// The response exactly as the cloud returned it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// Decode the nested `responseData` string.
    pub fn response_data(&self) -> Result<Value> {
        let result = cloud_result(&self.raw, "passthrough response")?;
        let data = result
            .get("responseData")
            .ok_or_else(|| Error::missing_field("passthrough result", "responseData"))?;
        let text = data
            .as_str()
            .ok_or_else(|| Error::unexpected_type("passthrough result", "responseData"))?;
        serde_json::from_str(text).map_err(Error::JsonLoad)
    }

    /// Decode `responseData` and deserialize `<service>.<operation>` into `T`.
    ///
    /// A non-zero `err_code` becomes [`Error::Device`], whether the device
    /// reports it for the whole service or for the operation.
    pub fn service_response<T: DeserializeOwned>(
        &self,
        service: &str,
        operation: &str,
    ) -> Result<T> {
        let data = self.response_data()?;
        let service_reply = data
            .get(service)
            .ok_or_else(|| Error::missing_field("device response", service))?;
        device_error(service_reply)?;

        let reply = service_reply
            .get(operation)
            .ok_or_else(|| Error::missing_field(service, operation))?;
        device_error(reply)?;

        T::deserialize(reply).map_err(Error::JsonLoad)
    }
}

fn device_error(reply: &Value) -> Result<()> {
    match reply.get("err_code").and_then(Value::as_i64) {
        Some(code) if code != 0 => {
            let message = reply
                .get("err_msg")
                .and_then(Value::as_str)
                .unwrap_or("no message")
                .to_string();
            Err(Error::Device { code, message })
        }
        _ => Ok(()),
    }
}
