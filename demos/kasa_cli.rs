//! CLI application for controlling Kasa bulbs through the cloud.
//!
//! Run with: cargo run --example kasa_cli -- --help

use std::time::Duration;

use clap::{Parser, Subcommand};
use kasa_cloud_rs::{ClientConfig, DEFAULT_TRANSITION, Session};

#[derive(Parser)]
#[command(name = "kasa-cli")]
#[command(about = "Control Kasa smart bulbs through the Kasa cloud", long_about = None)]
struct Cli {
    /// Cloud token (skips the login exchange)
    #[arg(long, env = "KASA_TOKEN", global = true)]
    token: Option<String>,

    /// Account e-mail, used when no token is given
    #[arg(long, env = "KASA_USERNAME", global = true)]
    username: Option<String>,

    /// Account password, used when no token is given
    #[arg(long, env = "KASA_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List devices registered to the account
    Devices,

    /// Print the current light state of a bulb
    State {
        device_id: String,
    },

    /// Turn a bulb on
    On {
        device_id: String,
        /// Brightness to fade to after turning on
        #[arg(short, long)]
        brightness: Option<u8>,
    },

    /// Turn a bulb off
    Off {
        device_id: String,
    },

    /// Fade a bulb to a brightness
    Brightness {
        device_id: String,
        level: u8,
        /// Transition time in milliseconds (default: 1000)
        #[arg(short, long, default_value = "1000")]
        transition_ms: u64,
    },

    /// Flicker a bulb and restore its state
    Blink {
        device_id: String,
        /// Number of flickers (default: 1)
        #[arg(short, long, default_value = "1")]
        count: u32,
        /// Brightness to flicker to (default: chosen from the current brightness)
        #[arg(short, long)]
        brightness: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ClientConfig::from_env()?;
    let session = match (cli.token, cli.username, cli.password) {
        (Some(token), _, _) => Session::from_token_with_config(token, config)?,
        (None, Some(username), Some(password)) => {
            Session::from_credentials_with_config(&username, &password, config).await?
        }
        _ => return Err("either --token or --username and --password are required".into()),
    };

    match cli.command {
        Commands::Devices => {
            let devices = session.list_devices().await?;
            if devices.is_empty() {
                println!("No devices registered to this account.");
            } else {
                println!("Found {} device(s):", devices.len());
                for device in devices {
                    println!(
                        "  {:40}  {:20}  {}",
                        device.id().unwrap_or("-"),
                        device.alias().unwrap_or("-"),
                        device.device_model().unwrap_or("-")
                    );
                }
            }
        }

        Commands::State { device_id } => {
            let state = session.get_light_state(&device_id).await?;
            println!("Power: {}", if state.is_on() { "ON" } else { "OFF" });
            if let Some(brightness) = state.reference_brightness() {
                println!("Brightness: {}%", brightness);
            }
            if let Some(temp) = state.color_temp {
                println!("Temperature: {}K", temp);
            }
        }

        Commands::On {
            device_id,
            brightness,
        } => {
            session
                .turn_on_bulb(&device_id, brightness, DEFAULT_TRANSITION)
                .await?;
            println!("Bulb turned ON");
        }

        Commands::Off { device_id } => {
            session.turn_off_bulb(&device_id).await?;
            println!("Bulb turned OFF");
        }

        Commands::Brightness {
            device_id,
            level,
            transition_ms,
        } => {
            session
                .set_brightness(&device_id, level, Duration::from_millis(transition_ms))
                .await?;
            println!("Brightness set to {}%", level);
        }

        Commands::Blink {
            device_id,
            count,
            brightness,
        } => {
            session.blink(&device_id, count, brightness).await?;
            println!("Blinked {} time(s)", count.max(1));
        }
    }

    Ok(())
}
