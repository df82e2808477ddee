//! Hoppie CLI: log on to a CPDLC station, send telex and fetch weather
//! from the command line.

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hoppie_models::{AcarsEndpointCallsign, ResponseRequirement, WeatherRequestKind};
use hoppie_sdk::{HoppieManager, ManagerOptions, SdkError};
use tracing::info;

/// Hoppie ACARS/CPDLC client.
#[derive(Parser, Debug)]
#[command(name = "hoppie-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Hoppie logon code.
    #[arg(long)]
    logon: String,

    /// Own callsign (e.g. AFR1234).
    #[arg(long)]
    callsign: AcarsEndpointCallsign,

    /// Seconds between polls; overrides HOPPIE_POLL_INTERVAL.
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Seconds to wait for the logon to be accepted; overrides
    /// HOPPIE_LOGON_TIMEOUT.
    #[arg(long)]
    logon_timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log on to a CPDLC station and print incoming messages.
    Logon {
        /// Ground station (e.g. WLS2).
        station: AcarsEndpointCallsign,
        /// CPDLC request to send once connected.
        #[arg(long)]
        request: Option<String>,
    },
    /// Send a free-text telex.
    Telex {
        /// Receiving station or aircraft.
        station: AcarsEndpointCallsign,
        /// Message text.
        text: String,
    },
    /// Request a weather report.
    Weather {
        /// Airport ICAO code (e.g. EGLL).
        icao: String,
        /// Report kind: metar, taf, shorttaf, vatatis, peatis, ivaoatis.
        #[arg(long, default_value_t = WeatherRequestKind::Metar)]
        kind: WeatherRequestKind,
    },
    /// Show the active Hoppie NOTAMs.
    Notams,
}

impl Cli {
    fn options(&self) -> ManagerOptions {
        let mut options = ManagerOptions::from_env();
        if let Some(seconds) = self.poll_interval {
            options = options.with_poll_interval(Duration::from_secs(seconds));
        }
        if let Some(seconds) = self.logon_timeout {
            options = options.with_logon_timeout(Duration::from_secs(seconds));
        }
        options
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (controlled via RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let manager = HoppieManager::new(cli.logon.clone(), cli.callsign.clone(), cli.options())
        .context("failed to create hoppie session")?;

    match cli.command {
        Command::Logon { station, request } => logon(&manager, station, request).await?,
        Command::Telex { station, text } => {
            manager.telex(&text, station.clone()).await?;
            info!(%station, "telex sent");
        }
        Command::Weather { icao, kind } => {
            let envelope = manager.weather_request(&icao, kind).await?;
            println!("{}", envelope.payload);
        }
        Command::Notams => {
            let status = manager.status().await?;
            if status.notams.is_empty() {
                println!("no active NOTAMs");
            }
            for notam in &status.notams {
                println!("{notam}");
            }
        }
    }

    Ok(())
}

async fn logon(
    manager: &HoppieManager,
    station: AcarsEndpointCallsign,
    request: Option<String>,
) -> anyhow::Result<()> {
    manager
        .connect(station.clone())
        .await
        .with_context(|| format!("logon to {station} failed"))?;

    let events = manager.clone();
    manager.spawn(async move {
        while let Some(envelope) = events.recv().await {
            println!("[{}] {} {}", envelope.message_type, envelope.sender, envelope.payload);
        }
        Ok(())
    });

    let states = manager.clone();
    manager.spawn(async move {
        let session = states.clone();
        states
            .on_connected(move |station| {
                let session = session.clone();
                let request = request.clone();
                async move {
                    info!(%station, "CPDLC connection established");
                    if let Some(text) = request {
                        session
                            .cpdlc_request(&text, ResponseRequirement::Required)
                            .await?;
                        info!(%station, %text, "CPDLC request sent");
                    }
                    Ok::<_, SdkError>(())
                }
            })
            .await
    });

    let cancelled = manager.cancellation_token();
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for ctrl-c")?;
            info!("interrupted");
        }
        () = cancelled.cancelled() => {}
    }

    manager.shutdown().await?;
    Ok(())
}
