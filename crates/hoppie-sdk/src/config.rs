//! Manager configuration.
//!
//! [`ManagerOptions`] is built once and handed to
//! [`HoppieManager::new`](crate::HoppieManager::new). Defaults match the
//! public Hoppie service; [`ManagerOptions::from_env`] overrides them from
//! environment variables.

use std::time::Duration;

/// Hoppie ACARS request endpoint.
pub const DEFAULT_CONNECT_URL: &str = "http://www.hoppie.nl/acars/system/connect.html";

/// Hoppie status endpoint.
pub const DEFAULT_STATUS_URL: &str = "https://www.hoppie.nl/acars/system/status.html";

/// Default inbound poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Options controlling a [`HoppieManager`](crate::HoppieManager) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Interval between inbound polls. Never zero.
    pub poll_interval: Duration,
    /// How long to wait for `LOGON ACCEPTED` before dropping back to
    /// `Disconnected`. `None` waits indefinitely.
    pub logon_timeout: Option<Duration>,
    /// Allow sending ADS-C reports.
    pub adsc_reporting: bool,
    /// ACARS request endpoint.
    pub connect_url: String,
    /// Status document endpoint.
    pub status_url: String,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            logon_timeout: None,
            adsc_reporting: false,
            connect_url: DEFAULT_CONNECT_URL.to_string(),
            status_url: DEFAULT_STATUS_URL.to_string(),
        }
    }
}

impl ManagerOptions {
    /// Build the options from environment variables.
    ///
    /// | Variable                | Default                  | Description                       |
    /// |-------------------------|--------------------------|-----------------------------------|
    /// | `HOPPIE_POLL_INTERVAL`  | `60`                     | Poll interval in seconds          |
    /// | `HOPPIE_LOGON_TIMEOUT`  | unset                    | Logon timeout in seconds          |
    /// | `HOPPIE_ADSC_REPORTING` | `false`                  | `true`/`1` enables ADS-C reports  |
    /// | `HOPPIE_CONNECT_URL`    | [`DEFAULT_CONNECT_URL`]  | ACARS request endpoint            |
    /// | `HOPPIE_STATUS_URL`     | [`DEFAULT_STATUS_URL`]   | Status endpoint                   |
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seconds = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        };

        let mut options = Self::default();
        if let Some(interval) = seconds("HOPPIE_POLL_INTERVAL") {
            options = options.with_poll_interval(interval);
        }
        options.logon_timeout = seconds("HOPPIE_LOGON_TIMEOUT");
        options.adsc_reporting = lookup("HOPPIE_ADSC_REPORTING")
            .is_some_and(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"));
        if let Some(url) = lookup("HOPPIE_CONNECT_URL") {
            options.connect_url = url;
        }
        if let Some(url) = lookup("HOPPIE_STATUS_URL") {
            options.status_url = url;
        }
        options
    }

    /// Set the poll interval. A zero interval is ignored.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.poll_interval = interval;
        }
        self
    }

    /// Set the logon timeout.
    #[must_use]
    pub fn with_logon_timeout(mut self, timeout: Duration) -> Self {
        self.logon_timeout = Some(timeout);
        self
    }

    /// Enable or disable ADS-C reporting.
    #[must_use]
    pub fn with_adsc_reporting(mut self, enable: bool) -> Self {
        self.adsc_reporting = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let options = ManagerOptions::default();
        assert_eq!(options.poll_interval, Duration::from_secs(60));
        assert_eq!(options.logon_timeout, None);
        assert!(!options.adsc_reporting);
        assert_eq!(options.connect_url, DEFAULT_CONNECT_URL);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(
            ManagerOptions::from_lookup(lookup_from(&[])),
            ManagerOptions::default()
        );
    }

    #[test]
    fn environment_overrides() {
        let options = ManagerOptions::from_lookup(lookup_from(&[
            ("HOPPIE_POLL_INTERVAL", "30"),
            ("HOPPIE_LOGON_TIMEOUT", "120"),
            ("HOPPIE_ADSC_REPORTING", "true"),
            ("HOPPIE_CONNECT_URL", "http://localhost:8080/connect.html"),
        ]));
        assert_eq!(options.poll_interval, Duration::from_secs(30));
        assert_eq!(options.logon_timeout, Some(Duration::from_secs(120)));
        assert!(options.adsc_reporting);
        assert_eq!(options.connect_url, "http://localhost:8080/connect.html");
        assert_eq!(options.status_url, DEFAULT_STATUS_URL);
    }

    #[test]
    fn invalid_values_fall_back() {
        let options = ManagerOptions::from_lookup(lookup_from(&[
            ("HOPPIE_POLL_INTERVAL", "soon"),
            ("HOPPIE_LOGON_TIMEOUT", "-5"),
        ]));
        assert_eq!(options.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(options.logon_timeout, None);
    }

    #[test]
    fn zero_poll_interval_is_ignored() {
        let options = ManagerOptions::default().with_poll_interval(Duration::ZERO);
        assert_eq!(options.poll_interval, DEFAULT_POLL_INTERVAL);

        let options = ManagerOptions::from_lookup(lookup_from(&[("HOPPIE_POLL_INTERVAL", "0")]));
        assert_eq!(options.poll_interval, DEFAULT_POLL_INTERVAL);
    }
}
