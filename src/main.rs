//! Wii Remote Bridge.
//!
//! Wii Remote (+ extension) over hidraw -> normalized Pro Controller 0x30
//! reports, logged or printed as JSON lines.

mod hid;

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};

use hid::HidTransport;
use wiimote_bridge::{Address, ControllerSession};

#[derive(Parser)]
#[command(name = "wiimote-bridge", about = "Bridge: Wii Remote -> Pro Controller reports")]
struct Args {
    /// Bluetooth address of the remote to open (default: first one found)
    #[arg(long)]
    address: Option<Address>,

    /// Player LED to light (1-4)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
    player: u8,

    /// Print normalized reports as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing (stderr, so --json output stays clean)
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    info!("=== Wii Remote Bridge ===");
    info!("Player LED: {}", args.player);

    let stop = Arc::new(AtomicBool::new(false));
    let bridge_stop = stop.clone();
    let mut bridge = tokio::task::spawn_blocking(move || run_bridge(&args, &bridge_stop));

    tokio::select! {
        result = &mut bridge => result??,
        _ = tokio::signal::ctrl_c() => {
            info!("[BRIDGE] Shutting down...");
            stop.store(true, Ordering::Relaxed);
            bridge.await??;
        }
    }

    info!("Done.");
    Ok(())
}

/// Open the remote and convert its reports until `stop` is set or the
/// device goes away.
fn run_bridge(args: &Args, stop: &AtomicBool) -> anyhow::Result<()> {
    let (transport, address) = HidTransport::open(args.address)?;
    let mut session = ControllerSession::new(address, transport);

    session.initialize()?;
    session.set_player_leds(1 << (args.player - 1))?;

    info!("[BRIDGE] Wii Remote {address} active.");

    let mut stdout = std::io::stdout().lock();
    let mut buf = [0u8; hid::MAX_REPORT_LEN];

    while !stop.load(Ordering::Relaxed) {
        let n = session
            .transport()
            .read_timeout(&mut buf, hid::READ_TIMEOUT_MS)?;
        if n == 0 {
            continue;
        }

        let frame = session.convert(&buf[..n]);

        if args.json {
            let line = serde_json::json!({
                "extension": session.extension(),
                "report": frame,
            });
            serde_json::to_writer(&mut stdout, &line)?;
            writeln!(stdout)?;
        } else {
            debug!("[BRIDGE] {:02X?}", frame.to_report());
        }
    }

    Ok(())
}
