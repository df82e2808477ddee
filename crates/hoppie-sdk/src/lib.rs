//! # Hoppie SDK
//!
//! Session engine for the **Hoppie** ACARS/CPDLC datalink used by flight
//! simulators.
//!
//! The SDK provides:
//!
//! * [`HoppieManager`]: one CPDLC session (logon handshake, background
//!   polling, outbound CPDLC/telex/weather/ADS-C requests).
//! * [`ConnectionState`]: `Disconnected → Waiting → Connected`.
//! * [`Transport`]: the request/response seam, with [`HttpTransport`] as
//!   the production implementation.
//! * [`ManagerOptions`]: poll interval, logon timeout and endpoints.
//! * [`SdkError`]: unified error type for all SDK operations.
//!
//! Codec types from [`hoppie_models`] are re-exported for convenience.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use hoppie_sdk::{HoppieManager, ManagerOptions, ResponseRequirement};
//!
//! # async fn run() -> Result<(), hoppie_sdk::SdkError> {
//! let manager = HoppieManager::new("s3cr3t", "AFR1234", ManagerOptions::default())?;
//! manager.connect("WLS2").await?;
//!
//! let session = manager.clone();
//! manager
//!     .on_connected(|station| {
//!         let session = session.clone();
//!         async move {
//!             tracing::info!(%station, "connected");
//!             session
//!                 .cpdlc_request("REQUEST CLIMB FL350", ResponseRequirement::Required)
//!                 .await
//!         }
//!     })
//!     .await
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod manager;
pub mod status;
pub mod transport;

mod supervisor;

#[cfg(test)]
mod mock;

pub use config::ManagerOptions;
pub use connection::ConnectionState;
pub use error::SdkError;
pub use manager::HoppieManager;
pub use transport::{AcarsRequest, HttpTransport, Transport};

// Re-export codec types for ergonomic usage.
pub use hoppie_models::{
    AcarsEndpointCallsign, AcarsEnvelope, AdscReport, CpdlcPacket, MessageType,
    ResponseRequirement, Status, WeatherRequestKind,
};
