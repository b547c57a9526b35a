//! Smart bulb control.

use std::time::Duration;

use log::debug;

use crate::command::{LIGHTING_SERVICE, LightingCommand, TransitionLightState};
use crate::errors::Error;
use crate::response::PassthroughResponse;
use crate::session::Session;
use crate::status::LightState;

type Result<T> = std::result::Result<T, Error>;

/// Fade duration used when the caller does not pick one.
pub const DEFAULT_TRANSITION: Duration = Duration::from_secs(1);

impl Session {
    /// Apply a `transition_light_state` command to a bulb.
    pub async fn transition_light_state(
        &self,
        device_id: &str,
        state: TransitionLightState,
    ) -> Result<PassthroughResponse> {
        self.passthrough(device_id, &LightingCommand::transition(state))
            .await
    }

    /// Fade to `brightness` over `duration`. One dispatch.
    ///
    /// The duration is sent in whole milliseconds, truncating any finer
    /// fraction.
    pub async fn set_brightness(
        &self,
        device_id: &str,
        brightness: u8,
        duration: Duration,
    ) -> Result<PassthroughResponse> {
        debug!("setting {} to brightness {}", device_id, brightness);
        let mut state = TransitionLightState::new();
        state.brightness(brightness);
        state.transition(duration);
        self.transition_light_state(device_id, state).await
    }

    pub async fn turn_off_bulb(&self, device_id: &str) -> Result<PassthroughResponse> {
        debug!("turning {} off", device_id);
        let mut state = TransitionLightState::new();
        state.power(false);
        self.transition_light_state(device_id, state).await
    }

    /// Turn a bulb on, then optionally fade it to `brightness`.
    ///
    /// Power and brightness are two separate round trips, so the bulb may
    /// briefly show its previous brightness. The second element is `None`
    /// when no brightness was requested.
    pub async fn turn_on_bulb(
        &self,
        device_id: &str,
        brightness: Option<u8>,
        duration: Duration,
    ) -> Result<(PassthroughResponse, Option<PassthroughResponse>)> {
        debug!("turning {} on", device_id);
        let mut state = TransitionLightState::new();
        state.power(true);
        let power = self.transition_light_state(device_id, state).await?;

        let dimmed = match brightness {
            Some(brightness) => Some(self.set_brightness(device_id, brightness, duration).await?),
            None => None,
        };
        Ok((power, dimmed))
    }

    /// Query the bulb's current light state.
    pub async fn get_light_state(&self, device_id: &str) -> Result<LightState> {
        let command = LightingCommand::get_light_state();
        self.passthrough(device_id, &command)
            .await?
            .service_response(LIGHTING_SERVICE, command.name())
    }
}
