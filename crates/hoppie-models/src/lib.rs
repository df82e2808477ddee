#![deny(missing_docs)]

//! # Hoppie Models
//!
//! Wire codec for the Hoppie ACARS/CPDLC datalink. Everything in this crate
//! is pure: no I/O, no shared state.
//!
//! ## Message hierarchy
//!
//! ```text
//! response body   ok {WLS2 cpdlc {/data2/7/1/NE/LOGON ACCEPTED}} {…}
//! └── AcarsEnvelope { sender, message_type, payload }   (decode_envelopes)
//!     ├── cpdlc  → CpdlcPacket { min, mrn, rrk, data }   (decode_cpdlc)
//!     ├── ads-c  → AdscReport { callsign, time, … }       (decode_adsc)
//!     └── telex / inforeq / … → raw payload
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`acars`] | Envelope scan, `MessageType`, callsigns |
//! | [`cpdlc`] | `CpdlcPacket`, `ResponseRequirement`, encode/decode |
//! | [`adsc`] | `AdscReport` decode/render |
//! | [`weather`] | `ICAOAirportCode`, `WeatherRequestKind` |
//! | [`status`] | Status document served by the Hoppie status endpoint |
//! | [`error`] | `ModelError` and its `ErrorKind` |

pub mod acars;
pub mod adsc;
pub mod cpdlc;
pub mod error;
pub mod status;
pub mod weather;

// Re-export all public types at crate root for convenience.
// Downstream crates can use `hoppie_models::CpdlcPacket` directly.
pub use acars::*;
pub use adsc::*;
pub use cpdlc::*;
pub use error::*;
pub use status::*;
pub use weather::*;
