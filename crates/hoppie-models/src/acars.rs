//! ACARS (Aircraft Communications Addressing and Reporting System) types.
//!
//! Hoppie wraps every message in an envelope of the form
//! `{SENDER TYPE {PAYLOAD}}`. A single response body can carry any number of
//! these units, embedded in arbitrary surrounding text (`ok {...} {...}`),
//! so [`decode_envelopes`] is a lenient scan rather than a strict parse.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AcarsEndpointCallsign
// ---------------------------------------------------------------------------

/// The callsign of an ACARS endpoint (e.g. `"AFR1234"` or `"WLS2"`).
///
/// Used to identify both aircraft and ground stations.
///
/// # Examples
///
/// ```
/// use hoppie_models::AcarsEndpointCallsign;
///
/// let cs: AcarsEndpointCallsign = "AFR1234".into();
/// assert_eq!(cs.to_string(), "AFR1234");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AcarsEndpointCallsign(String);

impl AcarsEndpointCallsign {
    /// Create a new callsign.
    pub fn new(callsign: &str) -> Self {
        Self(callsign.to_string())
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the callsign is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AcarsEndpointCallsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AcarsEndpointCallsign {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AcarsEndpointCallsign {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for AcarsEndpointCallsign {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl PartialEq<str> for AcarsEndpointCallsign {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

// ---------------------------------------------------------------------------
// MessageType
// ---------------------------------------------------------------------------

/// The `type` of a Hoppie ACARS message.
///
/// `Display` and `FromStr` use the lowercase wire code.
///
/// ```
/// use hoppie_models::MessageType;
///
/// assert_eq!(MessageType::Adsc.to_string(), "ads-c");
/// assert_eq!("cpdlc".parse::<MessageType>().unwrap(), MessageType::Cpdlc);
/// assert_eq!(MessageType::Poll.description(), "Communication Server Message Poll");
/// ```
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
pub enum MessageType {
    /// Information request (METAR, TAF, ATIS…) answered by the `SERVER` station.
    #[strum(serialize = "inforeq")]
    #[serde(rename = "inforeq")]
    InfoRequest,
    /// Data request.
    #[strum(serialize = "datareq")]
    #[serde(rename = "datareq")]
    DataRequest,
    /// ADS-C position report.
    #[strum(serialize = "ads-c")]
    #[serde(rename = "ads-c")]
    Adsc,
    /// Free-text telex.
    #[strum(serialize = "telex")]
    #[serde(rename = "telex")]
    Telex,
    /// CPDLC packet (see [`crate::cpdlc`]).
    #[strum(serialize = "cpdlc")]
    #[serde(rename = "cpdlc")]
    Cpdlc,
    /// OOOI progress report.
    #[strum(serialize = "progress")]
    #[serde(rename = "progress")]
    Progress,
    /// Look at pending messages without consuming them.
    #[strum(serialize = "peek")]
    #[serde(rename = "peek")]
    Peek,
    /// Fetch and consume pending messages.
    #[strum(serialize = "poll")]
    #[serde(rename = "poll")]
    Poll,
    /// Connection ping.
    #[strum(serialize = "ping")]
    #[serde(rename = "ping")]
    Ping,
}

impl MessageType {
    /// The wire code, as sent in the `type` request parameter.
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::InfoRequest => "Information Request",
            Self::DataRequest => "Data Request",
            Self::Adsc => "ADS-C",
            Self::Telex => "Telex",
            Self::Cpdlc => "CPDLC",
            Self::Progress => "Progress Report",
            Self::Peek => "Message Peek",
            Self::Poll => "Communication Server Message Poll",
            Self::Ping => "Connection Ping",
        }
    }
}

// ---------------------------------------------------------------------------
// AcarsEnvelope
// ---------------------------------------------------------------------------

/// One `{SENDER TYPE {PAYLOAD}}` unit decoded from a Hoppie response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AcarsEnvelope {
    /// Callsign of the station that sent the message.
    pub sender: AcarsEndpointCallsign,
    /// The ACARS message type.
    pub message_type: MessageType,
    /// Raw payload between the inner braces.
    pub payload: String,
}

impl AcarsEnvelope {
    /// Construct an envelope from its parts.
    pub fn new(
        sender: impl Into<AcarsEndpointCallsign>,
        message_type: MessageType,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            message_type,
            payload: payload.into(),
        }
    }
}

impl fmt::Display for AcarsEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {} {{{}}}}}", self.sender, self.message_type, self.payload)
    }
}

static ENVELOPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Z0-9]+)\s+([a-z-]+)\s+\{([^}]+)\}\}").expect("envelope pattern is valid")
});

/// Scan `raw` for every `{SENDER TYPE {PAYLOAD}}` unit, in input order.
///
/// Surrounding text is ignored, as are units whose TYPE is not a known
/// [`MessageType`] code. No match yields an empty vector.
///
/// ```
/// use hoppie_models::{decode_envelopes, MessageType};
///
/// let envelopes = decode_envelopes("ok {WLS2 cpdlc {/data2/3/1/NE/LOGON ACCEPTED}}");
/// assert_eq!(envelopes.len(), 1);
/// assert_eq!(envelopes[0].sender.as_str(), "WLS2");
/// assert_eq!(envelopes[0].message_type, MessageType::Cpdlc);
/// ```
pub fn decode_envelopes(raw: &str) -> Vec<AcarsEnvelope> {
    ENVELOPE_PATTERN
        .captures_iter(raw)
        .filter_map(|caps| {
            let message_type = caps[2].parse::<MessageType>().ok()?;
            Some(AcarsEnvelope::new(&caps[1], message_type, &caps[3]))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callsign_display_and_from() {
        let cs = AcarsEndpointCallsign::new("AFR1234");
        assert_eq!(cs.to_string(), "AFR1234");
        assert_eq!(cs.as_str(), "AFR1234");

        let cs2: AcarsEndpointCallsign = "AFR1234".into();
        assert_eq!(cs, cs2);
        assert!(cs == *"AFR1234");
        assert!(AcarsEndpointCallsign::new("").is_empty());
    }

    #[test]
    fn message_type_codes_roundtrip() {
        use strum::IntoEnumIterator;
        let codes: Vec<&str> = MessageType::iter().map(MessageType::code).collect();
        assert_eq!(
            codes,
            vec![
                "inforeq", "datareq", "ads-c", "telex", "cpdlc", "progress", "peek", "poll",
                "ping"
            ]
        );
        for t in MessageType::iter() {
            assert_eq!(t.to_string().parse::<MessageType>().unwrap(), t);
            assert!(!t.description().is_empty());
        }
    }

    #[test]
    fn message_type_rejects_unknown_code() {
        assert!("CPDLC".parse::<MessageType>().is_err());
        assert!("foo".parse::<MessageType>().is_err());
    }

    #[test]
    fn decode_preserves_order() {
        let envelopes = decode_envelopes("{A cpdlc {X}}{B telex {Y}}");
        assert_eq!(
            envelopes,
            vec![
                AcarsEnvelope::new("A", MessageType::Cpdlc, "X"),
                AcarsEnvelope::new("B", MessageType::Telex, "Y"),
            ]
        );
    }

    #[test]
    fn decode_ignores_surrounding_text() {
        let raw = "ok {EGLL inforeq {EGLL 141250Z 24012KT 9999 FEW030 14/08 Q1012}} trailing";
        let envelopes = decode_envelopes(raw);
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].sender.as_str(), "EGLL");
        assert_eq!(envelopes[0].message_type, MessageType::InfoRequest);
        assert_eq!(
            envelopes[0].payload,
            "EGLL 141250Z 24012KT 9999 FEW030 14/08 Q1012"
        );
    }

    #[test]
    fn decode_without_match_is_empty() {
        assert!(decode_envelopes("ok").is_empty());
        assert!(decode_envelopes("").is_empty());
        assert!(decode_envelopes("{lower cpdlc {X}}").is_empty());
    }

    #[test]
    fn decode_accepts_hyphenated_type() {
        let envelopes = decode_envelopes("ok {AFR1 ads-c {REPORT AFR1 1200 51.4 -0.4 35000}}");
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].message_type, MessageType::Adsc);
    }

    #[test]
    fn decode_skips_unknown_type() {
        let envelopes = decode_envelopes("{A bogus {X}} {B telex {Y}}");
        assert_eq!(envelopes, vec![AcarsEnvelope::new("B", MessageType::Telex, "Y")]);
    }

    #[test]
    fn decode_is_idempotent_on_rendered_output() {
        let original = decode_envelopes("ok {A cpdlc {X}} {B telex {HELLO WORLD}}");
        let rendered: String = original.iter().map(ToString::to_string).collect();
        assert_eq!(decode_envelopes(&rendered), original);
    }

    #[test]
    fn envelope_serde_roundtrip() {
        let envelope = AcarsEnvelope::new("WLS2", MessageType::Cpdlc, "/data2/1//Y/REQUEST LOGON");
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("\"cpdlc\""));
        let back: AcarsEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(envelope, back);
    }
}
