//! Error types for the `hoppie-models` crate.
//!
//! Every decoder in this crate returns variants of [`ModelError`]. Each
//! variant belongs to one [`ErrorKind`]: either the text broke the wire
//! grammar, or it parsed but carried a value outside its domain.

/// Coarse classification of a [`ModelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ErrorKind {
    /// Grammar, prefix or field-count violation.
    Format,
    /// A value that parsed but is out of its domain.
    Validation,
}

/// Errors produced when decoding or validating wire messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A CPDLC payload was missing the `/data2/` prefix or had the wrong
    /// number of `/`-separated fields.
    #[error("invalid CPDLC format \"{value}\": {reason}")]
    InvalidCpdlcFormat {
        /// The payload that failed to decode.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// The MIN field was not an integer.
    #[error("MIN \"{value}\" is not a valid identification number")]
    InvalidMin {
        /// The raw MIN field.
        value: String,
    },

    /// The MRN field was present but not an integer.
    #[error("MRN \"{value}\" is not a valid message reference number")]
    InvalidMrn {
        /// The raw MRN field.
        value: String,
    },

    /// The RRK field was not one of the six known codes.
    #[error("\"{value}\" is not a valid response requirement key")]
    UnknownResponseRequirement {
        /// The raw RRK field.
        value: String,
    },

    /// An ADS-C message did not start with `REPORT `.
    #[error("invalid ADS-C message prefix in \"{value}\"")]
    InvalidAdscPrefix {
        /// The message that failed to decode.
        value: String,
    },

    /// An ADS-C report carried too few fields.
    #[error("invalid ADS-C field count (got {got}, expected {expected})")]
    InvalidAdscFieldCount {
        /// Number of fields present.
        got: usize,
        /// Minimum number of fields required.
        expected: usize,
    },

    /// The heading field was not an integer in `0..=360`.
    #[error("invalid heading value \"{value}\"")]
    InvalidHeading {
        /// The raw heading field.
        value: String,
    },

    /// Latitude or longitude did not parse as a float.
    #[error("invalid position data \"{value}\" (latitude or longitude)")]
    InvalidPosition {
        /// The raw coordinate field.
        value: String,
    },

    /// The altitude field did not parse as an integer.
    #[error("invalid ADS-C altitude \"{value}\"")]
    InvalidAltitude {
        /// The raw altitude field.
        value: String,
    },

    /// An ICAO airport code was not exactly 4 characters.
    #[error("invalid ICAO airport code \"{value}\": {reason}")]
    InvalidICAOCode {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },
}

impl ModelError {
    /// Return which side of the taxonomy this error falls on.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCpdlcFormat { .. }
            | Self::InvalidAdscPrefix { .. }
            | Self::InvalidAdscFieldCount { .. }
            | Self::InvalidAltitude { .. } => ErrorKind::Format,
            Self::InvalidMin { .. }
            | Self::InvalidMrn { .. }
            | Self::UnknownResponseRequirement { .. }
            | Self::InvalidHeading { .. }
            | Self::InvalidPosition { .. }
            | Self::InvalidICAOCode { .. } => ErrorKind::Validation,
        }
    }
}
