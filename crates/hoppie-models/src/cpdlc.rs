//! CPDLC (Controller–Pilot Data Link Communications) packets.
//!
//! Hoppie carries CPDLC inside `cpdlc` ACARS envelopes using the packet
//! format
//!
//! ```text
//! /data2/<min>/<mrn-or-empty>/<rrk>/<data>
//! ```
//!
//! - `min`: message identification number assigned by the sender.
//! - `mrn`: the `min` this packet answers; empty on originating messages.
//! - `rrk`: the [`ResponseRequirement`] wire code.
//! - `data`: free text, which must not contain `/`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Packet data of the aircraft's logon request.
pub const LOGON_REQUEST: &str = "REQUEST LOGON";

/// Packet data a ground station sends to accept a logon.
pub const LOGON_ACCEPTED: &str = "LOGON ACCEPTED";

const CPDLC_PREFIX: &str = "/data2/";
const CPDLC_FIELD_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// ResponseRequirement
// ---------------------------------------------------------------------------

/// Response requirement key (RRK): what kind of reply a packet expects.
///
/// `Display` and `FromStr` use the wire codes `WU, AN, R, NE, Y, N`.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum ResponseRequirement {
    /// Wilco or Unable.
    #[strum(serialize = "WU")]
    #[serde(rename = "WU")]
    WilcoUnable,
    /// Affirm or Negative.
    #[strum(serialize = "AN")]
    #[serde(rename = "AN")]
    AffirmNegative,
    /// Roger.
    #[strum(serialize = "R")]
    #[serde(rename = "R")]
    Roger,
    /// Operational response required.
    #[strum(serialize = "NE")]
    #[serde(rename = "NE")]
    OperationalResponse,
    /// A response is required.
    #[strum(serialize = "Y")]
    #[serde(rename = "Y")]
    Required,
    /// No response required.
    #[strum(serialize = "N")]
    #[serde(rename = "N")]
    NotRequired,
}

impl ResponseRequirement {
    /// The wire code.
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::WilcoUnable => "Wilco or Unable",
            Self::AffirmNegative => "Affirm or Negative",
            Self::Roger => "Roger",
            Self::OperationalResponse => "Operational Response Required",
            Self::Required => "Response Required",
            Self::NotRequired => "Response Not Required",
        }
    }
}

// ---------------------------------------------------------------------------
// CpdlcPacket
// ---------------------------------------------------------------------------

/// A decoded CPDLC packet.
///
/// # Examples
///
/// ```
/// use hoppie_models::{CpdlcPacket, ResponseRequirement};
///
/// let packet: CpdlcPacket = "/data2/12/3/WU/CLIMB TO FL350".parse().unwrap();
/// assert_eq!(packet.min, 12);
/// assert_eq!(packet.mrn, Some(3));
/// assert_eq!(packet.response_requirement, ResponseRequirement::WilcoUnable);
/// assert_eq!(packet.to_string(), "/data2/12/3/WU/CLIMB TO FL350");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CpdlcPacket {
    /// Message identification number.
    pub min: u32,
    /// Message reference number; `None` on originating messages.
    pub mrn: Option<u32>,
    /// What kind of reply the packet expects.
    pub response_requirement: ResponseRequirement,
    /// Message text.
    pub data: String,
}

impl CpdlcPacket {
    /// Construct a packet from its parts.
    pub fn new(
        min: u32,
        mrn: Option<u32>,
        response_requirement: ResponseRequirement,
        data: impl Into<String>,
    ) -> Self {
        Self {
            min,
            mrn,
            response_requirement,
            data: data.into(),
        }
    }

    /// Returns `true` if this packet accepts the logon request sent with
    /// `logon_min`.
    pub fn accepts_logon(&self, logon_min: u32) -> bool {
        self.data == LOGON_ACCEPTED && self.mrn == Some(logon_min)
    }
}

impl fmt::Display for CpdlcPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CPDLC_PREFIX}{}/", self.min)?;
        if let Some(mrn) = self.mrn {
            write!(f, "{mrn}")?;
        }
        write!(f, "/{}/{}", self.response_requirement, self.data)
    }
}

impl FromStr for CpdlcPacket {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_cpdlc(s)
    }
}

/// Decode a `/data2/…` payload.
///
/// # Errors
///
/// [`ModelError::InvalidCpdlcFormat`] if the prefix is missing or the
/// remainder does not split into exactly four fields;
/// [`ModelError::InvalidMin`], [`ModelError::InvalidMrn`] or
/// [`ModelError::UnknownResponseRequirement`] for out-of-domain fields.
pub fn decode_cpdlc(payload: &str) -> Result<CpdlcPacket, ModelError> {
    let stripped =
        payload
            .strip_prefix(CPDLC_PREFIX)
            .ok_or_else(|| ModelError::InvalidCpdlcFormat {
                value: payload.to_string(),
                reason: format!("missing {CPDLC_PREFIX} prefix"),
            })?;

    let fields: Vec<&str> = stripped.split('/').collect();
    let [min, mrn, rrk, data] = fields[..] else {
        return Err(ModelError::InvalidCpdlcFormat {
            value: payload.to_string(),
            reason: format!(
                "got {} fields, expected {CPDLC_FIELD_COUNT}",
                fields.len()
            ),
        });
    };

    let min = min.parse::<u32>().map_err(|_| ModelError::InvalidMin {
        value: min.to_string(),
    })?;

    let mrn = if mrn.is_empty() {
        None
    } else {
        Some(mrn.parse::<u32>().map_err(|_| ModelError::InvalidMrn {
            value: mrn.to_string(),
        })?)
    };

    let response_requirement =
        rrk.parse::<ResponseRequirement>()
            .map_err(|_| ModelError::UnknownResponseRequirement {
                value: rrk.to_string(),
            })?;

    Ok(CpdlcPacket::new(min, mrn, response_requirement, data))
}

/// Encode a packet; the inverse of [`decode_cpdlc`].
///
/// ```
/// use hoppie_models::{encode_cpdlc, ResponseRequirement, LOGON_REQUEST};
///
/// assert_eq!(
///     encode_cpdlc(1, None, ResponseRequirement::Required, LOGON_REQUEST),
///     "/data2/1//Y/REQUEST LOGON",
/// );
/// ```
pub fn encode_cpdlc(
    min: u32,
    mrn: Option<u32>,
    response_requirement: ResponseRequirement,
    data: &str,
) -> String {
    CpdlcPacket::new(min, mrn, response_requirement, data).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
