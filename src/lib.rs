//! # kasa_cloud_rs
//!
//! An async Rust client for TP-Link Kasa smart bulbs, driven through the Kasa
//! cloud rather than the local network.
//!
//! The cloud exposes a small JSON-RPC style API: `login` trades account
//! credentials for a token, `getDeviceList` enumerates the account's devices,
//! and `passthrough` tunnels a device-specific command to one device and hands
//! back the device's reply. Everything in this crate is built on those three
//! calls.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kasa_cloud_rs::{Session, DEFAULT_TRANSITION};
//!
//! async fn flicker_desk_lamp() -> Result<(), kasa_cloud_rs::Error> {
//!     let session = Session::from_credentials("me@example.com", "hunter2").await?;
//!
//!     let devices = session.device_map().await?;
//!     let (desk, _) = devices
//!         .iter()
//!         .find(|(_, d)| d.alias() == Some("Desk"))
//!         .expect("no desk lamp");
//!
//!     session.turn_on_bulb(desk, Some(60), DEFAULT_TRANSITION).await?;
//!     session.blink(desk, 3, None).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Sessions**: From an existing token or from credentials, see [`Session`]
//! - **Device listing**: [`Session::list_devices`] and [`Session::device_map`]
//! - **Passthrough**: Send any device command with [`Session::passthrough`]
//! - **Bulb control**: Power, brightness and state queries
//! - **Blink**: A restore-safe flicker effect with a pluggable [`BlinkStrategy`]
//!
//! ## Double encoding
//!
//! The inner device command travels as a JSON *string* inside the outer
//! request, and the device's reply comes back the same way. The crate encodes
//! and decodes both layers; [`PassthroughResponse::raw`] still exposes the
//! outer response untouched.
//!
//! ## Transport
//!
//! Requests go through the [`Transport`] trait. [`HttpTransport`] (backed by
//! `reqwest`) is used by default; supply your own to add retries, proxies or
//! recording.

mod blink;
mod bulb;
mod command;
mod config;
mod directory;
mod envelope;
mod errors;
mod passthrough;
mod response;
mod session;
mod status;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export public API
pub use blink::{BlinkStrategy, ContrastBlink};
pub use bulb::DEFAULT_TRANSITION;
pub use command::{
    LIGHTING_SERVICE, LightingCommand, LightingOperation, NoParams, TransitionLightState,
};
pub use config::ClientConfig;
pub use directory::Device;
pub use envelope::CloudMethod;
pub use errors::{Error, ErrorKind};
pub use response::PassthroughResponse;
pub use session::Session;
pub use status::{DefaultOnState, LightState};
pub use transport::{HttpReply, HttpTransport, Transport};
