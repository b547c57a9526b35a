//! Inner device commands tunneled through `passthrough`.

use std::time::Duration;

use serde::{Serialize, Serializer};
use strum_macros::AsRefStr;

/// Service key of the smart bulb lighting service.
pub const LIGHTING_SERVICE: &str = "smartlife.iot.smartbulb.lightingservice";

/// Parameters of `transition_light_state`.
///
/// Only the attributes that were set end up in the JSON sent to the bulb.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use kasa_cloud_rs::TransitionLightState;
///
/// let mut state = TransitionLightState::new();
/// assert_eq!(state.is_valid(), false);
///
/// state.brightness(70);
/// state.transition(Duration::from_millis(1500));
/// assert_eq!(
///     serde_json::to_string(&state).unwrap(),
///     r#"{"brightness":70,"transition_period":1500}"#
/// );
/// ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionLightState {
    pub(crate) on_off: Option<u8>,
    pub(crate) brightness: Option<u8>,
    pub(crate) transition_period: Option<u64>,
}

impl TransitionLightState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this command changes at least one attribute.
    pub fn is_valid(&self) -> bool {
        self.on_off.is_some() || self.brightness.is_some()
    }

    pub fn power(&mut self, on: bool) {
        self.on_off = Some(u8::from(on));
    }

    /// Set the brightness. Values are passed to the bulb unchecked.
    pub fn brightness(&mut self, brightness: u8) {
        self.brightness = Some(brightness);
    }

    /// Set the fade duration, sent to the bulb in whole milliseconds.
    ///
    /// Sub-millisecond fractions are truncated and durations too long for a
    /// `u64` saturate.
    pub fn transition(&mut self, duration: Duration) {
        self.transition_period = Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
    }
}

/// Serializes as the empty string the bulb expects for parameterless queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoParams;

impl Serialize for NoParams {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        "".serialize(serializer)
    }
}

/// Operations of the lighting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LightingOperation {
    TransitionLightState(TransitionLightState),
    GetLightState(NoParams),
}

/// A complete lighting service command:
/// `{ "smartlife.iot.smartbulb.lightingservice": { "<operation>": <params> } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightingCommand {
    #[serde(rename = "smartlife.iot.smartbulb.lightingservice")]
    operation: LightingOperation,
}

impl LightingCommand {
    pub fn transition(state: TransitionLightState) -> Self {
        LightingCommand {
            operation: LightingOperation::TransitionLightState(state),
        }
    }

    pub fn get_light_state() -> Self {
        LightingCommand {
            operation: LightingOperation::GetLightState(NoParams),
        }
    }

    pub fn operation(&self) -> &LightingOperation {
        &self.operation
    }

    /// Wire name of the operation, e.g. `transition_light_state`.
    pub fn name(&self) -> &str {
        self.operation.as_ref()
    }
}

impl From<TransitionLightState> for LightingCommand {
    fn from(state: TransitionLightState) -> Self {
        LightingCommand::transition(state)
    }
}
