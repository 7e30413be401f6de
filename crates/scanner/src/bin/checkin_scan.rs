use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use api::{AlreadyCheckedInSignal, ApiClient, ApiConfig};
use clap::Parser;
use scanner::{Facing, ScanConfig, ScanController, ScanHandle, ScanNotice, camera::LineCamera};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "checkin-scan")]
#[command(about = "Event check-in scanner: reads participant QR codes and checks them in", long_about = None)]
#[command(version)]
struct Cli {
    /// QR reader device (serial/HID character device or FIFO). Repeatable.
    #[arg(long = "device", env = "SCANNER_DEVICES", value_delimiter = ',')]
    devices: Vec<PathBuf>,

    #[arg(long, default_value = "environment")]
    facing: Facing,

    #[arg(long, env = "SCAN_SETTLE_MS", default_value_t = 1500)]
    settle_ms: u64,

    #[arg(long, env = "ALREADY_CHECKED_IN_SIGNAL", default_value = "conflict")]
    already_checked_in: AlreadyCheckedInSignal,

    #[arg(long, env = "API_BASE_URL")]
    api_base_url: String,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "checkin_scan={},scanner={},api={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::new(cli.api_base_url)
        .with_already_checked_in(cli.already_checked_in)
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let client = ApiClient::new(config).context("Failed to build API client")?;

    tracing::info!(
        "Checking in against {} ({} reader(s), already-checked-in signal: {})",
        client.base_url(),
        cli.devices.len(),
        client.already_checked_in_signal()
    );

    let camera = LineCamera::new(cli.devices);
    let (controller, notices) = ScanController::new(Arc::new(camera), Arc::new(client));
    let controller = controller
        .with_config(ScanConfig {
            facing: cli.facing,
            ..ScanConfig::default()
        })
        .with_settle_delay(Duration::from_millis(cli.settle_ms));

    let handle = controller.handle();
    let printer = tokio::spawn(print_notices(notices));
    tokio::spawn(read_manual_entries(handle.clone()));
    tokio::spawn(stop_on_ctrl_c(handle));

    let result = controller.run().await;
    printer.await.context("Notice printer panicked")?;

    result.context("Scan session failed")?;
    Ok(())
}

async fn print_notices(mut notices: mpsc::UnboundedReceiver<ScanNotice>) {
    while let Some(notice) = notices.recv().await {
        println!("{}", notice);
    }
}

/// Each stdin line is submitted as if it had been scanned.
async fn read_manual_entries(handle: ScanHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => {
                if !handle.submit(line) {
                    println!("Masih memproses QR sebelumnya, coba lagi");
                }
            }
            Ok(None) => {
                tracing::debug!("Manual entry closed");
                break;
            }
            Err(e) => {
                tracing::warn!("Failed to read manual entry: {}", e);
                break;
            }
        }
    }
}

async fn stop_on_ctrl_c(handle: ScanHandle) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Interrupted, stopping scanner");
        handle.stop();
    }
}
