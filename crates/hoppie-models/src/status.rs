//! Hoppie system status document.
//!
//! Served as JSON by the status endpoint; carries the current load, online
//! user counts per network and the active NOTAMs.

use serde::{Deserialize, Serialize};

/// The status document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Status {
    /// Status code reported by the system (e.g. `"ok"`).
    pub status_code: String,
    /// Server time, as reported.
    pub system_time: String,
    /// Optional operator message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Current system load in percent.
    #[serde(rename = "system_load_percent")]
    pub load_percentage: f32,
    /// Online user counts per network.
    #[serde(rename = "online_users")]
    pub user_count: OnlineUsers,
    /// Active NOTAMs.
    #[serde(default)]
    pub notams: Vec<String>,
}

/// Online users per simulation network.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnlineUsers {
    /// Users on IVAO.
    #[serde(rename = "IVAO", default)]
    pub ivao: u32,
    /// Users not attached to any network.
    #[serde(rename = "None", default)]
    pub none: u32,
    /// Users on VATSIM.
    #[serde(rename = "VATSIM", default)]
    pub vatsim: u32,
}

impl OnlineUsers {
    /// Sum over all networks.
    pub fn total(&self) -> u32 {
        self.ivao + self.none + self.vatsim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status_code": "ok",
        "system_time": "2026-10-14 12:00:00",
        "system_load_percent": 12.5,
        "online_users": { "IVAO": 40, "None": 3, "VATSIM": 211 },
        "notams": ["CPDLC WLS2 OFFLINE 1200-1300Z"]
    }"#;

    #[test]
    fn decode_status_document() {
        let status: Status = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(status.status_code, "ok");
        assert_eq!(status.message, None);
        assert!((status.load_percentage - 12.5).abs() < f32::EPSILON);
        assert_eq!(
            status.user_count,
            OnlineUsers {
                ivao: 40,
                none: 3,
                vatsim: 211
            }
        );
        assert_eq!(status.user_count.total(), 254);
        assert_eq!(status.notams, vec!["CPDLC WLS2 OFFLINE 1200-1300Z"]);
    }

    #[test]
    fn message_is_optional_and_roundtrips() {
        let mut status: Status = serde_json::from_str(SAMPLE).unwrap();
        status.message = Some("maintenance tonight".into());
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"system_load_percent\""));
        assert!(json.contains("\"IVAO\""));
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }
}
