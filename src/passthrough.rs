//! Generic command dispatch through the cloud's `passthrough` method.

use log::debug;
use serde::Serialize;

use crate::envelope::{CloudMethod, PassthroughParams};
use crate::errors::Error;
use crate::response::PassthroughResponse;
use crate::session::Session;

type Result<T> = std::result::Result<T, Error>;

impl Session {
    /// Tunnel `command` to a device.
    ///
    /// The command is encoded to a JSON string before it is placed in the
    /// envelope. The returned response is not inspected beyond the HTTP
    /// status; use [`PassthroughResponse::response_data`] to decode the
    /// device's reply.
    pub async fn passthrough<C>(&self, device_id: &str, command: &C) -> Result<PassthroughResponse>
    where
        C: Serialize + ?Sized,
    {
        let request_data = serde_json::to_string(command).map_err(Error::JsonDump)?;
        debug!("passthrough to {}: {}", device_id, request_data);

        let params = PassthroughParams {
            device_id,
            request_data,
        };
        let raw = self.call(CloudMethod::Passthrough, Some(params)).await?;
        Ok(PassthroughResponse::new(device_id, raw))
    }
}
