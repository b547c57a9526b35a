//! Client-side blink effect.
//!
//! A blink reads the bulb's state, flickers to a contrasting brightness and
//! back `count` times, and leaves the bulb exactly as it found it: same power
//! state, same brightness. The steps are planned up front from the initial
//! state and then dispatched one by one. There is no rollback: if a dispatch
//! fails the error is returned and the bulb stays wherever the last
//! successful dispatch left it.

use log::debug;

use crate::bulb::DEFAULT_TRANSITION;
use crate::errors::Error;
use crate::session::Session;
use crate::status::LightState;

type Result<T> = std::result::Result<T, Error>;

/// Picks the brightness to flicker to when the caller does not supply one.
///
/// Given the brightness the bulb will be restored to, return one that is
/// perceptibly different from it. Any `Fn(u8) -> u8` works as a strategy.
pub trait BlinkStrategy {
    fn blink_brightness(&self, reference: u8) -> u8;
}

impl<F> BlinkStrategy for F
where
    F: Fn(u8) -> u8,
{
    fn blink_brightness(&self, reference: u8) -> u8 {
        self(reference)
    }
}

/// Default strategy: dim bright bulbs, brighten dim ones.
///
/// # Examples
///
/// ```
/// use kasa_cloud_rs::{BlinkStrategy, ContrastBlink};
///
/// assert_eq!(ContrastBlink.blink_brightness(80), 40);
/// assert_eq!(ContrastBlink.blink_brightness(10), 50);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContrastBlink;

impl ContrastBlink {
    pub const THRESHOLD: u8 = 50;
    pub const STEP: u8 = 40;
}

impl BlinkStrategy for ContrastBlink {
    fn blink_brightness(&self, reference: u8) -> u8 {
        if reference >= Self::THRESHOLD {
            reference - Self::STEP
        } else {
            reference + Self::STEP
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlinkStep {
    /// Power on, then fade to the given brightness.
    TurnOn(u8),
    SetBrightness(u8),
    TurnOff,
}

/// Plan the dispatches for a blink starting from `state`.
///
/// `count == 0` still performs the first flicker.
pub(crate) fn plan(
    state: &LightState,
    count: u32,
    blink: Option<u8>,
    strategy: &dyn BlinkStrategy,
) -> Result<Vec<BlinkStep>> {
    let field = if state.on_off {
        "brightness"
    } else {
        "dft_on_state.brightness"
    };
    let reference = state
        .reference_brightness()
        .ok_or_else(|| Error::missing_field("get_light_state reply", field))?;
    let blink = blink.unwrap_or_else(|| strategy.blink_brightness(reference));

    let mut steps = Vec::new();
    if state.on_off {
        steps.push(BlinkStep::SetBrightness(blink));
    } else {
        steps.push(BlinkStep::TurnOn(blink));
    }
    steps.push(BlinkStep::SetBrightness(reference));

    for _ in 1..count {
        steps.push(BlinkStep::SetBrightness(blink));
        steps.push(BlinkStep::SetBrightness(reference));
    }

    if !state.on_off {
        steps.push(BlinkStep::TurnOff);
    }
    Ok(steps)
}

impl Session {
    /// Blink a bulb `count` times using [`ContrastBlink`] when no
    /// `brightness` is given.
    pub async fn blink(&self, device_id: &str, count: u32, brightness: Option<u8>) -> Result<()> {
        self.blink_with(device_id, count, brightness, &ContrastBlink)
            .await
    }

    /// Blink a bulb, choosing the blink brightness with `strategy` when
    /// `brightness` is `None`.
    ///
    /// The strategy is consulted with the reference brightness: the live
    /// brightness of a bulb that is on, or the remembered on-brightness of a
    /// bulb that is off.
    pub async fn blink_with(
        &self,
        device_id: &str,
        count: u32,
        brightness: Option<u8>,
        strategy: &(dyn BlinkStrategy + Sync),
    ) -> Result<()> {
        let state = self.get_light_state(device_id).await?;
        let steps = plan(&state, count, brightness, strategy)?;
        debug!("blinking {} with {} step(s)", device_id, steps.len());

        for step in steps {
            match step {
                BlinkStep::TurnOn(brightness) => {
                    self.turn_on_bulb(device_id, Some(brightness), DEFAULT_TRANSITION)
                        .await?;
                }
                BlinkStep::SetBrightness(brightness) => {
                    self.set_brightness(device_id, brightness, DEFAULT_TRANSITION)
                        .await?;
                }
                BlinkStep::TurnOff => {
                    self.turn_off_bulb(device_id).await?;
                }
            }
        }
        Ok(())
    }
}
