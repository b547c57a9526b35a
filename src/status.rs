//! Light state as reported by `get_light_state`.

use serde::{Deserialize, Serialize};
use serde_with::{BoolFromInt, serde_as};

/// Settings a bulb will resume when it is next turned on.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultOnState {
    pub brightness: Option<u8>,
    pub mode: Option<String>,
    pub hue: Option<u16>,
    pub saturation: Option<u8>,
    pub color_temp: Option<u16>,
}

/// Current state of a smart bulb.
///
/// A bulb that is on reports its live `brightness`; a bulb that is off usually
/// omits it and reports `dft_on_state` instead.
///
/// # Examples
///
/// ```
/// use kasa_cloud_rs::LightState;
///
/// let state: LightState = serde_json::from_str(
///     r#"{"on_off": 0, "dft_on_state": {"brightness": 50}, "err_code": 0}"#,
/// ).unwrap();
/// assert!(!state.is_on());
/// assert_eq!(state.reference_brightness(), Some(50));
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    #[serde_as(as = "BoolFromInt")]
    pub on_off: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dft_on_state: Option<DefaultOnState>,
}

impl LightState {
    pub fn is_on(&self) -> bool {
        self.on_off
    }

    /// The brightness the bulb should settle back to after an effect:
    /// the live brightness when on, the remembered one when off.
    pub fn reference_brightness(&self) -> Option<u8> {
        if self.on_off {
            self.brightness
        } else {
            self.dft_on_state.as_ref().and_then(|s| s.brightness)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_on_state() {
        let state: LightState = serde_json::from_value(json!({
            "on_off": 1,
            "mode": "normal",
            "hue": 0,
            "saturation": 0,
            "color_temp": 2700,
            "brightness": 80,
            "err_code": 0,
        }))
        .unwrap();
        assert!(state.is_on());
        assert_eq!(state.color_temp, Some(2700));
        assert_eq!(state.reference_brightness(), Some(80));
    }

    #[test]
    fn test_off_state_ignores_stale_brightness() {
        let state: LightState = serde_json::from_value(json!({
            "on_off": 0,
            "brightness": 5,
            "dft_on_state": {"brightness": 60, "mode": "normal"},
        }))
        .unwrap();
        assert_eq!(state.reference_brightness(), Some(60));
    }

    #[test]
    fn test_missing_reference() {
        let state: LightState = serde_json::from_value(json!({"on_off": 0})).unwrap();
        assert_eq!(state.reference_brightness(), None);
    }

    #[test]
    fn test_on_off_must_be_flag() {
        assert!(serde_json::from_value::<LightState>(json!({"on_off": 7})).is_err());
    }

    #[test]
    fn test_serialize_back_to_wire_shape() {
        let state = LightState {
            on_off: true,
            brightness: Some(40),
            mode: None,
            hue: None,
            saturation: None,
            color_temp: None,
            dft_on_state: None,
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({"on_off": 1, "brightness": 40})
        );
    }
}
