//! CH9329 Bridge entry point.
//!
//! Opens the serial link to the CH9329, then types every line read from stdin
//! on the remote machine until stdin closes or Ctrl+C is pressed.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()          -- platform config.toml, defaults if absent
//!  └─ SerialTransport::open() -- serial device from config or CH9329_DEVICE
//!  └─ BridgeSession::from_config() -- forwarders sharing the transport
//!  └─ stdin loop
//!       ├─ line             -> TypeTextUseCase::type_text(line + "\n")
//!       ├─ EOF              -> stop
//!       └─ Ctrl+C           -> stop
//!  └─ BridgeSession::shutdown() -- release all keys
//! ```
//!
//! # Shutdown (for beginners)
//!
//! Whatever ends the loop, one all-zero keyboard report is written before the
//! process exits. Without it a key that was down when the bridge stopped
//! would stay pressed on the remote machine until the chip is power-cycled.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ch9329_bridge::application::session::BridgeSession;
use ch9329_bridge::infrastructure::{
    storage::config::load_config,
    transport::{SerialTransport, Transport},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = load_config().context("failed to load configuration")?;
    config.apply_env_overrides();

    // Initialise structured logging; RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.bridge.log_level)),
        )
        .init();

    info!("CH9329 Bridge starting");

    // ── Serial transport ──────────────────────────────────────────────────────
    let transport: Arc<dyn Transport> = Arc::new(
        SerialTransport::open(&config.serial.device, config.serial.baud_rate)
            .with_context(|| format!("failed to open serial device {}", config.serial.device))?,
    );

    let mut session = BridgeSession::from_config(transport, &config)
        .context("invalid [keyboard] typing options")?;

    info!(session = %session.session_id(), "ready; type lines to send, Ctrl+C to quit");

    // ── Main stdin loop ───────────────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Err(e) = session.typist.type_text(&format!("{line}\n")) {
                        error!("typing failed: {e}");
                        break;
                    }
                }
                Ok(None) => {
                    info!("stdin closed");
                    break;
                }
                Err(e) => {
                    error!("stdin read error: {e}");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────
    if let Err(e) = session.shutdown() {
        warn!("failed to release keys on shutdown: {e}");
    }

    info!("CH9329 Bridge stopped");
    Ok(())
}
