//! Information-request (weather / ATIS) types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

// ---------------------------------------------------------------------------
// ICAOAirportCode
// ---------------------------------------------------------------------------

/// A four-character ICAO airport code (e.g. `"EGLL"`, `"KJFK"`).
///
/// # Examples
///
/// ```
/// use hoppie_models::ICAOAirportCode;
///
/// let parsed: ICAOAirportCode = "EGLL".parse().unwrap();
/// assert_eq!(parsed.as_str(), "EGLL");
///
/// assert!("EGL".parse::<ICAOAirportCode>().is_err());
/// assert!("EGLLX".parse::<ICAOAirportCode>().is_err());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ICAOAirportCode(String);

impl ICAOAirportCode {
    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), ModelError> {
        if s.chars().count() == 4 {
            Ok(())
        } else {
            Err(ModelError::InvalidICAOCode {
                value: s.to_string(),
                reason: "must be exactly 4 characters".to_string(),
            })
        }
    }
}

impl fmt::Display for ICAOAirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ICAOAirportCode {
    type Error = ModelError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }
}

impl FromStr for ICAOAirportCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

// ---------------------------------------------------------------------------
// WeatherRequestKind
// ---------------------------------------------------------------------------

/// What an `inforeq` message asks the `SERVER` station for.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WeatherRequestKind {
    /// Current METAR.
    #[default]
    Metar,
    /// Terminal aerodrome forecast.
    Taf,
    /// Short TAF.
    ShortTaf,
    /// VATSIM ATIS.
    #[strum(serialize = "vatatis")]
    #[serde(rename = "vatatis")]
    VatsimAtis,
    /// PilotEdge ATIS.
    #[strum(serialize = "peatis")]
    #[serde(rename = "peatis")]
    PilotEdgeAtis,
    /// IVAO ATIS.
    #[strum(serialize = "ivaoatis")]
    #[serde(rename = "ivaoatis")]
    IvaoAtis,
}

impl WeatherRequestKind {
    /// Build the `inforeq` packet for `icao`, e.g. `"metar EGLL"`.
    pub fn packet(self, icao: &ICAOAirportCode) -> String {
        format!("{self} {icao}")
    }
}
