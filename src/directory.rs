//! Device enumeration.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::{CloudMethod, cloud_result};
use crate::errors::Error;
use crate::session::Session;

type Result<T> = std::result::Result<T, Error>;

/// A device registered to the account, as listed by the cloud.
///
/// The record is kept verbatim. A record without a string `deviceId` is
/// still listed, and [`id`](Self::id) returns `None` for it.
///
/// # Examples
///
/// ```
/// use kasa_cloud_rs::Device;
///
/// let device: Device = serde_json::from_str(
///     r#"{"deviceId": "8012ABCD", "alias": "Desk", "deviceModel": "KL110(US)", "fwVer": "1.8.11"}"#,
/// ).unwrap();
/// assert_eq!(device.id(), Some("8012ABCD"));
/// assert_eq!(device.alias(), Some("Desk"));
/// assert_eq!(device.get("fwVer").and_then(|v| v.as_str()), Some("1.8.11"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Device {
    fields: Map<String, Value>,
}

impl Device {
    pub fn id(&self) -> Option<&str> {
        self.get_str("deviceId")
    }

    /// Any field of the record.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn alias(&self) -> Option<&str> {
        self.get_str("alias")
    }

    pub fn device_model(&self) -> Option<&str> {
        self.get_str("deviceModel")
    }

    pub fn device_type(&self) -> Option<&str> {
        self.get_str("deviceType")
    }

    /// Cloud connection status; `1` means the device is online.
    pub fn status(&self) -> Option<i64> {
        self.get("status").and_then(Value::as_i64)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

impl Session {
    /// List the account's devices in the order the cloud returns them.
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let body = self
            .call(CloudMethod::GetDeviceList, None::<Value>)
            .await?;
        let result = cloud_result(&body, "getDeviceList response")?;
        let list = result
            .get("deviceList")
            .ok_or_else(|| Error::missing_field("getDeviceList result", "deviceList"))?;
        let devices = Vec::<Device>::deserialize(list).map_err(Error::JsonLoad)?;
        debug!("cloud lists {} device(s)", devices.len());
        Ok(devices)
    }

    /// The device list keyed by device identifier.
    ///
    /// Fails if any record lacks a string `deviceId`.
    pub async fn device_map(&self) -> Result<HashMap<String, Device>> {
        self.list_devices()
            .await?
            .into_iter()
            .map(|device| {
                let id = device
                    .id()
                    .ok_or_else(|| Error::missing_field("device record", "deviceId"))?
                    .to_string();
                Ok((id, device))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::config::ClientConfig;
    use crate::testing::ScriptedTransport;
    use crate::transport::HttpReply;
    use std::sync::Arc;

    fn session(transport: Arc<ScriptedTransport>) -> Session {
        Session::from_token_with("tok", ClientConfig::default(), transport)
    }

    #[tokio::test]
    async fn test_list_devices() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({
            "error_code": 0,
            "result": {"deviceList": [
                {"deviceId": "b", "alias": "Hall"},
                {"deviceId": "a", "alias": "Desk", "status": 0},
            ]},
        }));

        let devices = session(transport.clone()).list_devices().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id(), Some("b"));
        assert_eq!(devices[1].alias(), Some("Desk"));
        assert_eq!(devices[1].status(), Some(0));

        let sent = transport.requests();
        assert_eq!(sent[0].url, "https://wap.tplinkcloud.com/?token=tok");
        assert_eq!(sent[0].body, json!({"method": "getDeviceList"}));
    }

    #[tokio::test]
    async fn test_device_map() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({
            "error_code": 0,
            "result": {"deviceList": [{"deviceId": "x1"}, {"deviceId": "x2"}]},
        }));

        let map = session(transport).device_map().await.unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["x2"].id(), Some("x2"));
    }

    #[tokio::test]
    async fn test_missing_result_is_protocol_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({"error_code": 0}));

        let err = session(transport).list_devices().await.unwrap_err();
        assert!(err.is_protocol());
        assert_eq!(err, Error::missing_field("getDeviceList response", "result"));
    }

    #[tokio::test]
    async fn test_missing_device_list() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({"error_code": 0, "result": {}}));

        let err = session(transport).device_map().await.unwrap_err();
        assert_eq!(err, Error::missing_field("getDeviceList result", "deviceList"));
    }

    #[tokio::test]
    async fn test_http_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(HttpReply::new(500, "oops"));

        let err = session(transport).list_devices().await.unwrap_err();
        assert_eq!(err, Error::status("getDeviceList", 500));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({"error_code": -20651, "msg": "Token expired"}));

        let err = session(transport).list_devices().await.unwrap_err();
        assert!(matches!(err, Error::Cloud { code: -20651, .. }));
    }

    fn list_with_anonymous_record() -> Value {
        json!({
            "error_code": 0,
            "result": {"deviceList": [
                {"deviceId": "a"},
                {"alias": "Hub child", "deviceType": "IOT.SMARTBULB"},
            ]},
        })
    }

    #[tokio::test]
    async fn test_list_keeps_record_without_id() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(list_with_anonymous_record());

        let devices = session(transport).list_devices().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id(), Some("a"));
        assert_eq!(devices[1].id(), None);
        assert_eq!(devices[1].alias(), Some("Hub child"));
        assert_eq!(devices[1].device_type(), Some("IOT.SMARTBULB"));
    }

    #[tokio::test]
    async fn test_device_map_rejects_record_without_id() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(list_with_anonymous_record());

        let err = session(transport).device_map().await.unwrap_err();
        assert!(err.is_protocol());
        assert_eq!(err, Error::missing_field("device record", "deviceId"));
    }
}
