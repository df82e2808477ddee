//! ADS-C (Automatic Dependent Surveillance – Contract) position reports.
//!
//! Wire form: `REPORT <callsign> <time> <lat> <long> <alt> [<heading>]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

const ADSC_PREFIX: &str = "REPORT ";
const ADSC_REQUIRED_FIELDS: usize = 5;
const MAX_HEADING: u16 = 360;

/// A decoded ADS-C position report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdscReport {
    /// Reporting aircraft.
    pub callsign: String,
    /// Report time, as sent (typically `HHMMSS` or `DDHHMM`).
    pub time: String,
    /// Latitude in decimal degrees.
    pub latitude: f32,
    /// Longitude in decimal degrees.
    pub longitude: f32,
    /// Altitude in feet.
    pub altitude: i32,
    /// Heading in degrees, `0..=360`.
    pub heading: Option<u16>,
}

impl fmt::Display for AdscReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ADSC_PREFIX}{} {} {} {} {}",
            self.callsign, self.time, self.latitude, self.longitude, self.altitude
        )?;
        if let Some(heading) = self.heading {
            write!(f, " {heading}")?;
        }
        Ok(())
    }
}

impl FromStr for AdscReport {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_adsc(s)
    }
}

/// Decode a `REPORT …` message.
///
/// Fields beyond the sixth are ignored.
///
/// # Errors
///
/// In check order: [`ModelError::InvalidAdscPrefix`],
/// [`ModelError::InvalidAdscFieldCount`] (fewer than five fields),
/// [`ModelError::InvalidHeading`], [`ModelError::InvalidPosition`],
/// [`ModelError::InvalidAltitude`].
///
/// ```
/// use hoppie_models::decode_adsc;
///
/// let report = decode_adsc("REPORT BAW12 141230 51.47 -0.45 35000 270").unwrap();
/// assert_eq!(report.altitude, 35000);
/// assert_eq!(report.heading, Some(270));
/// ```
pub fn decode_adsc(message: &str) -> Result<AdscReport, ModelError> {
    let stripped = message
        .strip_prefix(ADSC_PREFIX)
        .ok_or_else(|| ModelError::InvalidAdscPrefix {
            value: message.to_string(),
        })?;

    let fields: Vec<&str> = stripped.split_whitespace().collect();
    if fields.len() < ADSC_REQUIRED_FIELDS {
        return Err(ModelError::InvalidAdscFieldCount {
            got: fields.len(),
            expected: ADSC_REQUIRED_FIELDS,
        });
    }

    let heading = fields.get(5).copied().map(parse_heading).transpose()?;
    let latitude = parse_coordinate(fields[2])?;
    let longitude = parse_coordinate(fields[3])?;
    let altitude = fields[4]
        .parse::<i32>()
        .map_err(|_| ModelError::InvalidAltitude {
            value: fields[4].to_string(),
        })?;

    Ok(AdscReport {
        callsign: fields[0].to_string(),
        time: fields[1].to_string(),
        latitude,
        longitude,
        altitude,
        heading,
    })
}

fn parse_heading(raw: &str) -> Result<u16, ModelError> {
    raw.parse::<u16>()
        .ok()
        .filter(|heading| *heading <= MAX_HEADING)
        .ok_or_else(|| ModelError::InvalidHeading {
            value: raw.to_string(),
        })
}

fn parse_coordinate(raw: &str) -> Result<f32, ModelError> {
    raw.parse::<f32>().map_err(|_| ModelError::InvalidPosition {
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with_heading(heading: &str) -> String {
        format!("REPORT AFR1234 141230 48.85 2.35 35000 {heading}")
    }

    #[test]
    fn decode_without_heading() {
        let report = decode_adsc("REPORT AFR1234 141230 48.85 2.35 35000").unwrap();
        assert_eq!(
            report,
            AdscReport {
                callsign: "AFR1234".into(),
                time: "141230".into(),
                latitude: 48.85,
                longitude: 2.35,
                altitude: 35000,
                heading: None,
            }
        );
    }

    #[test]
    fn heading_boundaries_are_inclusive() {
        assert_eq!(decode_adsc(&report_with_heading("0")).unwrap().heading, Some(0));
        assert_eq!(
            decode_adsc(&report_with_heading("360")).unwrap().heading,
            Some(360)
        );
    }

    #[test]
    fn heading_out_of_range_fails() {
        for raw in ["-1", "361", "north"] {
            let err = decode_adsc(&report_with_heading(raw)).unwrap_err();
            assert_eq!(err, ModelError::InvalidHeading { value: raw.into() });
        }
    }

    #[test]
    fn four_fields_is_field_count_error() {
        let err = decode_adsc("REPORT AFR1234 141230 48.85 2.35").unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidAdscFieldCount {
                got: 4,
                expected: 5
            }
        );
        assert!(err.to_string().contains("got 4, expected 5"));
    }

    #[test]
    fn missing_prefix_fails() {
        let err = decode_adsc("POSITION AFR1234 141230 48.85 2.35 35000").unwrap_err();
        assert!(matches!(err, ModelError::InvalidAdscPrefix { .. }));
    }

    #[test]
    fn bad_position_fails() {
        let err = decode_adsc("REPORT AFR1234 141230 N48 2.35 35000").unwrap_err();
        assert_eq!(err, ModelError::InvalidPosition { value: "N48".into() });

        let err = decode_adsc("REPORT AFR1234 141230 48.85 E2 35000").unwrap_err();
        assert_eq!(err, ModelError::InvalidPosition { value: "E2".into() });
    }

    #[test]
    fn bad_altitude_is_format_error() {
        let err = decode_adsc("REPORT AFR1234 141230 48.85 2.35 FL350").unwrap_err();
        assert_eq!(err, ModelError::InvalidAltitude { value: "FL350".into() });
        assert_eq!(err.kind(), crate::error::ErrorKind::Format);
    }

    #[test]
    fn heading_checked_before_position() {
        let err = decode_adsc("REPORT AFR1234 141230 N48 2.35 35000 999").unwrap_err();
        assert!(matches!(err, ModelError::InvalidHeading { .. }));
    }

    #[test]
    fn display_renders_wire_form() {
        let report = AdscReport {
            callsign: "BAW12".into(),
            time: "141230".into(),
            latitude: 51.47,
            longitude: -0.45,
            altitude: 35000,
            heading: Some(270),
        };
        let wire = report.to_string();
        assert_eq!(wire, "REPORT BAW12 141230 51.47 -0.45 35000 270");
        assert_eq!(wire.parse::<AdscReport>().unwrap(), report);
    }
}
