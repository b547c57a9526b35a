//! In-memory transports for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};

use crate::command::LIGHTING_SERVICE;
use crate::envelope::CloudMethod;
use crate::errors::Error;
use crate::transport::{HttpReply, Transport};

type Result<T> = std::result::Result<T, Error>;

/// A request as seen by a test transport.
#[derive(Debug, Clone)]
pub(crate) struct SentRequest {
    pub url: String,
    pub body: Value,
}

fn record(log: &Mutex<Vec<SentRequest>>, url: &str, body: &str) -> Value {
    let body: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    log.lock().unwrap().push(SentRequest {
        url: url.to_string(),
        body: body.clone(),
    });
    body
}

/// Replays queued replies in order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<HttpReply>>,
    requests: Mutex<Vec<SentRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: HttpReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_json(&self, value: Value) {
        self.push(HttpReply::ok_json(&value));
    }

    pub fn requests(&self) -> Vec<SentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn post<'a>(
        &'a self,
        _method: &'a str,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpReply>> {
        record(&self.requests, url, &body);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left");
        async move { Ok(reply) }.boxed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BulbState {
    pub on: bool,
    pub brightness: u8,
}

/// A cloud with a single simulated bulb behind `passthrough`.
///
/// The bulb applies `transition_light_state` commands and answers
/// `get_light_state` the way real bulbs do: live brightness while on,
/// `dft_on_state` while off. Every decoded inner command is kept so tests can
/// check the exact dispatch sequence.
pub(crate) struct FakeCloud {
    state: Mutex<BulbState>,
    commands: Mutex<Vec<Value>>,
    requests: Mutex<Vec<SentRequest>>,
    /// Fail the n-th passthrough (0-based) with an HTTP 503.
    fail_at: Option<usize>,
}

impl FakeCloud {
    pub fn new(on: bool, brightness: u8) -> Self {
        FakeCloud {
            state: Mutex::new(BulbState { on, brightness }),
            commands: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            fail_at: None,
        }
    }

    pub fn failing_at(mut self, passthrough_index: usize) -> Self {
        self.fail_at = Some(passthrough_index);
        self
    }

    pub fn state(&self) -> BulbState {
        *self.state.lock().unwrap()
    }

    /// Lighting service operations received, in order.
    pub fn commands(&self) -> Vec<Value> {
        self.commands.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<SentRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn handle(&self, body: &Value) -> HttpReply {
        let method = body["method"].as_str().and_then(|m| m.parse::<CloudMethod>().ok());
        match method {
            Some(CloudMethod::GetDeviceList) => HttpReply::ok_json(&json!({
                "error_code": 0,
                "result": {"deviceList": [
                    {"deviceId": "bulb-1", "alias": "Desk", "deviceModel": "KL110(US)", "status": 1},
                ]},
            })),
            Some(CloudMethod::Passthrough) => self.passthrough(&body["params"]),
            _ => HttpReply::new(400, "unknown method"),
        }
    }

    fn passthrough(&self, params: &Value) -> HttpReply {
        let index = self.commands.lock().unwrap().len();
        if self.fail_at == Some(index) {
            self.commands.lock().unwrap().push(Value::Null);
            return HttpReply::new(503, "");
        }

        let request_data = params["requestData"].as_str().unwrap_or_default();
        let command: Value = serde_json::from_str(request_data).unwrap_or(Value::Null);
        let operation = command[LIGHTING_SERVICE].clone();
        self.commands.lock().unwrap().push(operation.clone());

        let mut state = self.state.lock().unwrap();
        let reply = if operation.get("get_light_state").is_some() {
            json!({LIGHTING_SERVICE: {"get_light_state": light_state_json(&state)}})
        } else if let Some(transition) = operation.get("transition_light_state") {
            if let Some(on_off) = transition.get("on_off").and_then(Value::as_u64) {
                state.on = on_off == 1;
            }
            if let Some(brightness) = transition.get("brightness").and_then(Value::as_u64) {
                state.brightness = brightness as u8;
            }
            json!({LIGHTING_SERVICE: {"transition_light_state": light_state_json(&state)}})
        } else {
            json!({LIGHTING_SERVICE: {"err_code": -2, "err_msg": "member not support"}})
        };

        HttpReply::ok_json(&json!({
            "error_code": 0,
            "result": {"responseData": reply.to_string()},
        }))
    }
}

fn light_state_json(state: &BulbState) -> Value {
    if state.on {
        json!({
            "on_off": 1,
            "mode": "normal",
            "hue": 0,
            "saturation": 0,
            "color_temp": 2700,
            "brightness": state.brightness,
            "err_code": 0,
        })
    } else {
        json!({
            "on_off": 0,
            "dft_on_state": {
                "mode": "normal",
                "hue": 0,
                "saturation": 0,
                "color_temp": 2700,
                "brightness": state.brightness,
            },
            "err_code": 0,
        })
    }
}

impl Transport for FakeCloud {
    fn post<'a>(
        &'a self,
        _method: &'a str,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpReply>> {
        let body = record(&self.requests, url, &body);
        let reply = self.handle(&body);
        async move { Ok(reply) }.boxed()
    }
}

/// Shorthand for an expected `transition_light_state` operation.
pub(crate) fn transition(params: Value) -> Value {
    json!({"transition_light_state": params})
}

pub(crate) fn get_light_state() -> Value {
    json!({"get_light_state": ""})
}
